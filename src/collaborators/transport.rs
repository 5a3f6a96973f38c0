use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;

/// A provider-agnostic HTTP request. Adapters build these rather than
/// reaching for `reqwest` directly, mirroring how the teacher's
/// `fetch_data` jobs go through a single `reqwest::Client` built once and
/// shared, not constructed per call.
#[derive(Debug, Clone)]
pub struct TransportRequest {
    pub method: Method,
    pub url: String,
    pub headers: HashMap<String, String>,
    pub body: Option<Vec<u8>>,
    pub timeout: Duration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

impl TransportRequest {
    pub fn get(url: impl Into<String>, timeout: Duration) -> Self {
        TransportRequest { method: Method::Get, url: url.into(), headers: HashMap::new(), body: None, timeout }
    }

    pub fn post(url: impl Into<String>, body: Vec<u8>, timeout: Duration) -> Self {
        TransportRequest { method: Method::Post, url: url.into(), headers: HashMap::new(), body: Some(body), timeout }
    }

    pub fn with_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }
}

#[derive(Debug, Clone)]
pub struct TransportResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl TransportResponse {
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// The three failure shapes a transport can surface; adapters classify
/// these into `CoreError::Provider{Transient,Permanent,Auth}` /
/// `RateLimited` the way `validate::ValidationError` enumerates distinct
/// failure variants rather than collapsing everything to one string.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("request to {url} timed out")]
    Timeout { url: String },
    #[error("connection error calling {url}: {message}")]
    Connection { url: String, message: String },
    #[error("http {status} from {url}: {body}")]
    HttpStatus { url: String, status: u16, body: String },
}

/// Outbound HTTP, kept behind a trait so the solver/execution layers never
/// import `reqwest` directly and so tests can substitute a scripted fake
/// (see `providers::fx`/`providers::crypto` tests for callers of
/// `FakeTransport`).
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: TransportRequest) -> Result<TransportResponse, TransportError>;
}

/// A scripted transport for adapter tests: maps exact URLs to canned
/// bodies, with no real I/O. Missing URLs surface as a permanent HTTP 404
/// rather than panicking, so an adapter bug shows up as a normal error
/// path instead of a test harness crash.
#[cfg(test)]
pub struct FakeTransport {
    responses: std::collections::HashMap<String, Vec<u8>>,
}

#[cfg(test)]
impl FakeTransport {
    pub fn new() -> Self {
        FakeTransport { responses: std::collections::HashMap::new() }
    }

    pub fn with_response(mut self, url: impl Into<String>, body: impl Into<Vec<u8>>) -> Self {
        self.responses.insert(url.into(), body.into());
        self
    }
}

#[cfg(test)]
impl Default for FakeTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[async_trait]
impl Transport for FakeTransport {
    async fn send(&self, request: TransportRequest) -> Result<TransportResponse, TransportError> {
        match self.responses.get(&request.url) {
            Some(body) => Ok(TransportResponse { status: 200, body: body.clone() }),
            None => Err(TransportError::HttpStatus { url: request.url, status: 404, body: "not found".into() }),
        }
    }
}

/// `reqwest`-backed implementation, one client shared across all calls —
/// the same construction-once discipline as the teacher's
/// `fetch_data::build_client` (timeout + user-agent set once, reused).
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    pub fn new() -> Self {
        let client = reqwest::Client::builder()
            .user_agent("corridor-router/0.1")
            .build()
            .expect("reqwest client builds with default TLS backend");
        HttpTransport { client }
    }
}

impl Default for HttpTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: TransportRequest) -> Result<TransportResponse, TransportError> {
        let mut builder = match request.method {
            Method::Get => self.client.get(&request.url),
            Method::Post => self.client.post(&request.url),
        };
        builder = builder.timeout(request.timeout);
        for (k, v) in &request.headers {
            builder = builder.header(k, v);
        }
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder.send().await.map_err(|e| {
            if e.is_timeout() {
                TransportError::Timeout { url: request.url.clone() }
            } else {
                TransportError::Connection { url: request.url.clone(), message: e.to_string() }
            }
        })?;

        let status = response.status().as_u16();
        let body = response
            .bytes()
            .await
            .map_err(|e| TransportError::Connection { url: request.url.clone(), message: e.to_string() })?
            .to_vec();

        if !(200..300).contains(&status) {
            return Err(TransportError::HttpStatus {
                url: request.url,
                status,
                body: String::from_utf8_lossy(&body).into_owned(),
            });
        }

        Ok(TransportResponse { status, body })
    }
}
