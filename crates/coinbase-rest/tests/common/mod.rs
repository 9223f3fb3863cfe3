//! Common test utilities: an in-process HTTP responder that records requests

#![allow(dead_code)]

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use coinbase_rest::{ClientConfig, CoinbaseRestClient, Credentials};
use hmac::{Hmac, Mac};
use sha2::Sha256;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinHandle;

pub const API_KEY: &str = "test-api-key";
/// base64("integration-secret")
pub const API_SECRET: &str = "aW50ZWdyYXRpb24tc2VjcmV0";
pub const PASSPHRASE: &str = "test-passphrase";

/// A request as seen by the test server
#[derive(Debug, Clone)]
pub struct CapturedRequest {
    pub method: String,
    pub target: String,
    pub headers: HashMap<String, String>,
    pub body: String,
}

impl CapturedRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }

    pub fn timestamp(&self) -> u64 {
        self.header("cb-access-timestamp")
            .expect("timestamp header")
            .parse()
            .expect("numeric timestamp")
    }

    pub fn body_text(&self) -> Option<&str> {
        if self.body.is_empty() {
            None
        } else {
            Some(&self.body)
        }
    }
}

type Responder = Arc<dyn Fn(&CapturedRequest) -> (u16, String) + Send + Sync>;

/// HTTP/1.1 server answering every request through a responder closure
pub struct TestServer {
    pub base_url: String,
    requests: Arc<Mutex<Vec<CapturedRequest>>>,
    task: JoinHandle<()>,
}

impl TestServer {
    pub async fn start<F>(responder: F) -> Self
    where
        F: Fn(&CapturedRequest) -> (u16, String) + Send + Sync + 'static,
    {
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
        let addr = listener.local_addr().expect("local addr");
        let requests = Arc::new(Mutex::new(Vec::new()));
        let responder: Responder = Arc::new(responder);

        let recorded = Arc::clone(&requests);
        let task = tokio::spawn(async move {
            while let Ok((stream, _)) = listener.accept().await {
                let recorded = Arc::clone(&recorded);
                let responder = Arc::clone(&responder);
                tokio::spawn(async move {
                    let _ = handle_connection(stream, recorded, responder).await;
                });
            }
        });

        Self {
            base_url: format!("http://{}", addr),
            requests,
            task,
        }
    }

    /// Server answering every request with the same status and body
    pub async fn fixed(status: u16, body: &str) -> Self {
        let body = body.to_string();
        Self::start(move |_| (status, body.clone())).await
    }

    pub fn requests(&self) -> Vec<CapturedRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn single_request(&self) -> CapturedRequest {
        let requests = self.requests();
        assert_eq!(requests.len(), 1, "expected exactly one request");
        requests.into_iter().next().unwrap()
    }

    pub fn client(&self) -> CoinbaseRestClient {
        client_for(&self.base_url, 5)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// Server that accepts connections and never answers
pub async fn spawn_silent_server() -> (String, JoinHandle<()>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("local addr");

    let task = tokio::spawn(async move {
        let mut held = Vec::new();
        while let Ok((stream, _)) = listener.accept().await {
            held.push(stream);
        }
    });

    (format!("http://{}", addr), task)
}

pub fn credentials() -> Credentials {
    Credentials::new(API_KEY, API_SECRET, PASSPHRASE).expect("valid credentials")
}

pub fn client_for(base_url: &str, timeout_secs: u64) -> CoinbaseRestClient {
    let config = ClientConfig::new()
        .with_base_url(base_url)
        .with_timeout(timeout_secs);
    CoinbaseRestClient::new(credentials(), config).expect("client")
}

/// HMAC-SHA256 over `message`, computed independently of the crate
pub fn expected_signature(message: &str) -> String {
    let key = BASE64.decode(API_SECRET).unwrap();
    let mut mac = Hmac::<Sha256>::new_from_slice(&key).unwrap();
    mac.update(message.as_bytes());
    BASE64.encode(mac.finalize().into_bytes())
}

/// Check that the captured signature matches what was actually sent
pub fn assert_signature_matches(request: &CapturedRequest) {
    let message = format!(
        "{}{}{}{}",
        request.timestamp(),
        request.method,
        request.target,
        request.body
    );
    assert_eq!(
        request.header("cb-access-sign"),
        Some(expected_signature(&message).as_str()),
        "signature mismatch for {}",
        message
    );
}

fn header_end(buf: &[u8]) -> Option<usize> {
    buf.windows(4).position(|w| w == b"\r\n\r\n").map(|i| i + 4)
}

async fn read_request(stream: &mut TcpStream) -> std::io::Result<Option<CapturedRequest>> {
    let mut buffer = Vec::new();
    let mut chunk = [0u8; 2048];

    let head_len = loop {
        let n = stream.read(&mut chunk).await?;
        if n == 0 {
            return Ok(None);
        }
        buffer.extend_from_slice(&chunk[..n]);
        if let Some(end) = header_end(&buffer) {
            break end;
        }
    };

    let head = String::from_utf8_lossy(&buffer[..head_len]).to_string();
    let mut lines = head.split("\r\n");
    let mut request_line = lines.next().unwrap_or_default().split_whitespace();
    let method = request_line.next().unwrap_or_default().to_string();
    let target = request_line.next().unwrap_or_default().to_string();

    let headers: HashMap<String, String> = lines
        .filter_map(|line| line.split_once(':'))
        .map(|(k, v)| (k.trim().to_ascii_lowercase(), v.trim().to_string()))
        .collect();

    let content_length = headers
        .get("content-length")
        .and_then(|v| v.parse::<usize>().ok())
        .unwrap_or(0);

    while buffer.len() - head_len < content_length {
        let n = stream.read(&mut chunk).await?;
        if n == 0 {
            break;
        }
        buffer.extend_from_slice(&chunk[..n]);
    }

    let body = String::from_utf8_lossy(&buffer[head_len..]).to_string();

    Ok(Some(CapturedRequest {
        method,
        target,
        headers,
        body,
    }))
}

async fn handle_connection(
    mut stream: TcpStream,
    recorded: Arc<Mutex<Vec<CapturedRequest>>>,
    responder: Responder,
) -> std::io::Result<()> {
    let Some(request) = read_request(&mut stream).await? else {
        return Ok(());
    };

    let (status, body) = responder(&request);
    recorded.lock().unwrap().push(request);

    let reply = format!(
        "HTTP/1.1 {} Test\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        status,
        body.len(),
        body
    );
    stream.write_all(reply.as_bytes()).await?;
    stream.flush().await?;
    stream.shutdown().await
}
