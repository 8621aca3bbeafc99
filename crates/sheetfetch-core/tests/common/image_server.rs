//! Minimal HTTP/1.1 server for integration tests.
//!
//! Serves fixed responses per path and records every request's path and
//! User-Agent. Unknown paths answer 404.

use std::collections::HashMap;
use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct SeenRequest {
    pub path: String,
    pub user_agent: Option<String>,
}

pub struct ImageServer {
    /// e.g. "http://127.0.0.1:12345"
    pub base: String,
    requests: Arc<Mutex<Vec<SeenRequest>>>,
}

impl ImageServer {
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base, path)
    }

    pub fn requests(&self) -> Vec<SeenRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn hits(&self, path: &str) -> usize {
        self.requests().iter().filter(|r| r.path == path).count()
    }
}

/// Route response. `Trickle` sends the body one byte per tick after the
/// headers; `Stall` sends headers then nothing for the given duration.
#[derive(Clone)]
pub enum Reply {
    Full(u16, Vec<u8>),
    Trickle(Vec<u8>, Duration),
    Stall(usize, Duration),
}

/// Starts a server in a background thread. `routes` maps a path to
/// (status, body). The server runs until the process exits.
pub fn start(routes: Vec<(&str, u16, &[u8])>) -> ImageServer {
    start_with(
        routes
            .into_iter()
            .map(|(p, s, b)| (p, Reply::Full(s, b.to_vec())))
            .collect(),
    )
}

pub fn start_with(routes: Vec<(&str, Reply)>) -> ImageServer {
    let routes: Arc<HashMap<String, Reply>> = Arc::new(
        routes
            .into_iter()
            .map(|(p, r)| (p.to_string(), r))
            .collect(),
    );
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().unwrap().port();
    let requests = Arc::new(Mutex::new(Vec::new()));
    let seen = Arc::clone(&requests);
    thread::spawn(move || {
        for stream in listener.incoming().flatten() {
            let routes = Arc::clone(&routes);
            let seen = Arc::clone(&seen);
            thread::spawn(move || handle(stream, &routes, &seen));
        }
    });
    ImageServer {
        base: format!("http://127.0.0.1:{}", port),
        requests,
    }
}

fn handle(
    mut stream: TcpStream,
    routes: &HashMap<String, Reply>,
    seen: &Mutex<Vec<SeenRequest>>,
) {
    let _ = stream.set_read_timeout(Some(Duration::from_secs(2)));
    let _ = stream.set_write_timeout(Some(Duration::from_secs(2)));
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];
    while !buf.windows(4).any(|w| w == b"\r\n\r\n") {
        match stream.read(&mut chunk) {
            Ok(0) | Err(_) => break,
            Ok(n) => buf.extend_from_slice(&chunk[..n]),
        }
    }
    let request = String::from_utf8_lossy(&buf);
    let mut lines = request.lines();
    let path = lines
        .next()
        .and_then(|l| l.split_whitespace().nth(1))
        .unwrap_or("/")
        .to_string();
    let user_agent = lines
        .take_while(|l| !l.is_empty())
        .filter_map(|l| l.split_once(':'))
        .find(|(name, _)| name.trim().eq_ignore_ascii_case("user-agent"))
        .map(|(_, v)| v.trim().to_string());
    seen.lock().unwrap().push(SeenRequest {
        path: path.clone(),
        user_agent,
    });

    let reply = routes
        .get(&path)
        .cloned()
        .unwrap_or_else(|| Reply::Full(404, b"not found".to_vec()));
    match reply {
        Reply::Full(status, body) => {
            let _ = stream.write_all(head(status, body.len()).as_bytes());
            let _ = stream.write_all(&body);
        }
        Reply::Trickle(body, interval) => {
            let _ = stream.write_all(head(200, body.len()).as_bytes());
            for byte in body {
                thread::sleep(interval);
                if stream.write_all(&[byte]).is_err() {
                    return;
                }
            }
        }
        Reply::Stall(len, pause) => {
            let _ = stream.write_all(head(200, len).as_bytes());
            thread::sleep(pause);
        }
    }
}

fn head(status: u16, len: usize) -> String {
    let reason = match status {
        200 => "OK",
        404 => "Not Found",
        500 => "Internal Server Error",
        503 => "Service Unavailable",
        _ => "Status",
    };
    format!(
        "HTTP/1.1 {} {}\r\nContent-Length: {}\r\nContent-Type: image/png\r\nConnection: close\r\n\r\n",
        status, reason, len
    )
}
