//! Network access behind a small trait so the fetcher can run against a fake.

mod curl_get;

pub use curl_get::CurlTransport;

/// Why a single download attempt failed. Every variant is retried.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// Curl reported an error (timeout, connection, DNS, ...).
    #[error("{0}")]
    Curl(#[from] curl::Error),
    /// Response had an error status (4xx/5xx).
    #[error("HTTP {0}")]
    Http(u32),
    /// The body could not be written to disk.
    #[error("storage: {0}")]
    Storage(#[from] std::io::Error),
}

/// Fetches the full body of a URL.
pub trait Transport {
    fn get(&mut self, url: &str) -> Result<Vec<u8>, FetchError>;
}

impl<T: Transport + ?Sized> Transport for &mut T {
    fn get(&mut self, url: &str) -> Result<Vec<u8>, FetchError> {
        (**self).get(url)
    }
}
