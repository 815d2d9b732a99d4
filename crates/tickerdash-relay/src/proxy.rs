//! HTTP surface of the relay: `/api/finnhub/*path` and `/healthz`.

use std::sync::Arc;
use std::time::Duration;

use axum::extract::{Path, RawQuery, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;
use serde_json::{json, Value};
use tracing::{debug, error, warn};

use crate::config::RelayConfig;
use crate::quota::RelayQuota;
use crate::RelayServerError;

pub const MISSING_KEY_MESSAGE: &str = "API key is not configured";
pub const PROXY_FAILURE_MESSAGE: &str = "Internal Server Error proxying to upstream";
pub const RATE_LIMITED_MESSAGE: &str = "relay rate limit exceeded";

const UPSTREAM_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Clone)]
pub struct AppState {
    config: Arc<RelayConfig>,
    client: reqwest::Client,
    quota: RelayQuota,
}

impl AppState {
    pub fn new(config: RelayConfig) -> Result<Self, RelayServerError> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("tickerdash-relay/", env!("CARGO_PKG_VERSION")))
            .timeout(UPSTREAM_TIMEOUT)
            .build()?;
        let quota = RelayQuota::per_minute(config.quota_per_minute);
        Ok(Self {
            config: Arc::new(config),
            client,
            quota,
        })
    }

    pub fn config(&self) -> &RelayConfig {
        &self.config
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/api/finnhub/*path", get(proxy))
        .with_state(state)
}

#[derive(Debug, Serialize)]
struct Health {
    status: &'static str,
    key_configured: bool,
}

async fn healthz(State(state): State<AppState>) -> Json<Health> {
    Json(Health {
        status: "ok",
        key_configured: state.config.key_configured(),
    })
}

async fn proxy(
    State(state): State<AppState>,
    Path(path): Path<String>,
    RawQuery(query): RawQuery,
) -> Response {
    let path = path.trim_start_matches('/');

    let Some(key) = state.config.api_key.as_deref() else {
        warn!(path, "rejecting proxied call: {MISSING_KEY_MESSAGE}");
        return error_response(StatusCode::INTERNAL_SERVER_ERROR, MISSING_KEY_MESSAGE, None);
    };

    if !state.quota.try_acquire() {
        warn!(path, limit = state.quota.limit(), "relay quota exhausted");
        return error_response(StatusCode::TOO_MANY_REQUESTS, RATE_LIMITED_MESSAGE, None);
    }

    let url = upstream_url(&state.config.upstream_url, path, query.as_deref(), key);
    let logged_url = redact_token(&url);
    debug!(url = %logged_url, "proxying to upstream");

    let response = match state.client.get(&url).send().await {
        Ok(response) => response,
        Err(e) => {
            let e = e.without_url();
            error!(url = %logged_url, error = %e, "upstream request failed");
            return error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                PROXY_FAILURE_MESSAGE,
                Some(Value::String(e.to_string())),
            );
        }
    };

    let status = response.status().as_u16();
    let body = match response.text().await {
        Ok(body) => body,
        Err(e) => {
            let e = e.without_url();
            error!(url = %logged_url, error = %e, "failed to read upstream body");
            return error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                PROXY_FAILURE_MESSAGE,
                Some(Value::String(e.to_string())),
            );
        }
    };

    let status = StatusCode::from_u16(status).unwrap_or(StatusCode::BAD_GATEWAY);
    if !status.is_success() {
        let reason = status.canonical_reason().unwrap_or("Unknown Status");
        warn!(url = %logged_url, status = status.as_u16(), "upstream returned an error");
        let details = serde_json::from_str::<Value>(&body).unwrap_or(Value::String(body));
        return error_response(status, &format!("Error from upstream: {reason}"), Some(details));
    }

    match serde_json::from_str::<Value>(&body) {
        Ok(value) => (StatusCode::OK, Json(value)).into_response(),
        Err(e) => {
            error!(url = %logged_url, error = %e, "upstream body is not JSON");
            error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                PROXY_FAILURE_MESSAGE,
                Some(Value::String(e.to_string())),
            )
        }
    }
}

fn error_response(status: StatusCode, message: &str, details: Option<Value>) -> Response {
    let body = match details {
        Some(details) => json!({ "message": message, "details": details }),
        None => json!({ "message": message }),
    };
    (status, Json(body)).into_response()
}

/// `<base>/<path>?<client query without token>&token=<key>`.
pub fn upstream_url(base: &str, path: &str, query: Option<&str>, key: &str) -> String {
    let token = format!("token={}", urlencoding::encode(key));
    let pairs = query
        .unwrap_or_default()
        .split('&')
        .filter(|pair| !pair.is_empty() && !is_token_pair(pair))
        .chain(std::iter::once(token.as_str()))
        .collect::<Vec<_>>();
    format!(
        "{}/{}?{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/'),
        pairs.join("&")
    )
}

/// Replaces the `token` query value so URLs can be logged.
pub fn redact_token(url: &str) -> String {
    let Some((head, query)) = url.split_once('?') else {
        return url.to_owned();
    };
    let query = query
        .split('&')
        .map(|pair| if is_token_pair(pair) { "token=REDACTED" } else { pair })
        .collect::<Vec<_>>()
        .join("&");
    format!("{head}?{query}")
}

fn is_token_pair(pair: &str) -> bool {
    pair == "token" || pair.starts_with("token=")
}
