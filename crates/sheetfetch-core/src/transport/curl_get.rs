//! Blocking HTTP GET through libcurl.

use super::{FetchError, Transport};
use std::collections::BTreeMap;
use std::time::Duration;

/// Upper bound on a whole transfer that keeps making progress.
const TRANSFER_CAP: Duration = Duration::from_secs(3600);

/// One curl easy handle per request: follows redirects, sends the configured
/// User-Agent and static headers.
///
/// `timeout` limits connecting and any stretch without incoming data, not the
/// whole transfer, so a slow but steady body still completes.
#[derive(Debug, Clone)]
pub struct CurlTransport {
    timeout: Duration,
    user_agent: String,
    headers: BTreeMap<String, String>,
}

impl CurlTransport {
    pub fn new(timeout: Duration, user_agent: impl Into<String>) -> Self {
        Self {
            timeout,
            user_agent: user_agent.into(),
            headers: BTreeMap::new(),
        }
    }

    pub fn with_headers(mut self, headers: BTreeMap<String, String>) -> Self {
        self.headers = headers;
        self
    }
}

impl Transport for CurlTransport {
    fn get(&mut self, url: &str) -> Result<Vec<u8>, FetchError> {
        let mut body = Vec::new();

        let mut easy = curl::easy::Easy::new();
        easy.url(url)?;
        easy.follow_location(true)?;
        easy.max_redirections(10)?;
        easy.connect_timeout(self.timeout)?;
        easy.low_speed_limit(1)?;
        easy.low_speed_time(self.timeout)?;
        easy.timeout(TRANSFER_CAP.max(self.timeout))?;
        easy.useragent(&self.user_agent)?;

        let mut list = curl::easy::List::new();
        for (k, v) in &self.headers {
            list.append(&format!("{}: {}", k.trim(), v.trim()))?;
        }
        if !self.headers.is_empty() {
            easy.http_headers(list)?;
        }

        {
            let mut transfer = easy.transfer();
            transfer.write_function(|data| {
                body.extend_from_slice(data);
                Ok(data.len())
            })?;
            transfer.perform()?;
        }

        let code = easy.response_code()?;
        if code >= 400 {
            return Err(FetchError::Http(code));
        }
        Ok(body)
    }
}
