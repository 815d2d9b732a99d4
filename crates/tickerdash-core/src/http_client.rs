//! Transport seam between the relay client and the network.
//!
//! The relay client only ever issues `GET`s and reads the body as text, so
//! the seam is a single boxed-future method. Tests substitute canned
//! implementations; production uses [`ReqwestHttpClient`].

use std::collections::BTreeMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;

const DEFAULT_TIMEOUT_MS: u64 = 5_000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub url: String,
    /// Lowercased header names.
    pub headers: BTreeMap<String, String>,
    pub timeout_ms: u64,
}

impl HttpRequest {
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            headers: BTreeMap::new(),
            timeout_ms: DEFAULT_TIMEOUT_MS,
        }
    }

    pub fn with_header(mut self, name: impl AsRef<str>, value: impl Into<String>) -> Self {
        self.headers
            .insert(name.as_ref().to_ascii_lowercase(), value.into());
        self
    }

    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }
}

/// Status and raw body, whatever the status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn ok_json(body: impl Into<String>) -> Self {
        Self::new(200, body)
    }

    pub const fn is_success(&self) -> bool {
        matches!(self.status, 200..=299)
    }
}

/// The request never produced a status line.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HttpError {
    #[error("request timed out after {timeout_ms} ms")]
    Timeout { timeout_ms: u64 },
    #[error("connection failed: {0}")]
    Connect(String),
    #[error("failed to read response body: {0}")]
    Body(String),
    #[error("request failed: {0}")]
    Other(String),
}

pub trait HttpClient: Send + Sync {
    fn get<'a>(
        &'a self,
        request: HttpRequest,
    ) -> Pin<Box<dyn Future<Output = Result<HttpResponse, HttpError>> + Send + 'a>>;
}

#[derive(Debug, Clone, Default)]
pub struct ReqwestHttpClient {
    client: Arc<reqwest::Client>,
}

impl ReqwestHttpClient {
    pub fn new() -> Result<Self, HttpError> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("tickerdash/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| HttpError::Other(e.to_string()))?;
        Ok(Self::with_client(client))
    }

    pub fn with_client(client: reqwest::Client) -> Self {
        Self {
            client: Arc::new(client),
        }
    }
}

fn classify(error: reqwest::Error, timeout_ms: u64) -> HttpError {
    let error = error.without_url();
    if error.is_timeout() {
        HttpError::Timeout { timeout_ms }
    } else if error.is_connect() {
        HttpError::Connect(error.to_string())
    } else if error.is_body() || error.is_decode() {
        HttpError::Body(error.to_string())
    } else {
        HttpError::Other(error.to_string())
    }
}

impl HttpClient for ReqwestHttpClient {
    fn get<'a>(
        &'a self,
        request: HttpRequest,
    ) -> Pin<Box<dyn Future<Output = Result<HttpResponse, HttpError>> + Send + 'a>> {
        Box::pin(async move {
            let timeout_ms = request.timeout_ms;
            let builder = request.headers.iter().fold(
                self.client
                    .get(&request.url)
                    .timeout(Duration::from_millis(timeout_ms)),
                |builder, (name, value)| builder.header(name, value),
            );

            let response = builder
                .send()
                .await
                .map_err(|e| classify(e, timeout_ms))?;
            let status = response.status().as_u16();
            let body = response
                .text()
                .await
                .map_err(|e| classify(e, timeout_ms))?;

            Ok(HttpResponse { status, body })
        })
    }
}
