//! Client for the key-holding relay. The relay injects the provider credential;
//! this side never sees or sends it.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::debug;

use crate::http_client::{HttpClient, HttpRequest};
use crate::window::TimeWindow;
use crate::{QuoteSnapshot, RelayError, Sample, Symbol, SymbolMatch};

/// Maximum number of search hits returned.
pub const SEARCH_LIMIT: usize = 10;

const SEARCHABLE_KINDS: [&str; 2] = ["Common Stock", "ETF"];

#[derive(Clone)]
pub struct RelayClient {
    base_url: String,
    http_client: Arc<dyn HttpClient>,
    timeout_ms: u64,
}

impl RelayClient {
    pub fn new(base_url: impl Into<String>, http_client: Arc<dyn HttpClient>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_owned();
        Self {
            base_url,
            http_client,
            timeout_ms: 5_000,
        }
    }

    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Closing prices for `symbol` across `window`, timestamps in milliseconds.
    pub async fn candles(
        &self,
        symbol: &Symbol,
        window: &TimeWindow,
    ) -> Result<Vec<Sample>, RelayError> {
        let payload: CandlePayload = self
            .get_json(
                "stock/candle",
                &[
                    ("symbol", symbol.as_str().to_owned()),
                    ("resolution", window.resolution.as_str().to_owned()),
                    ("from", window.start.unix_seconds().to_string()),
                    ("to", window.end.unix_seconds().to_string()),
                ],
            )
            .await?;

        match payload.s.as_deref() {
            Some("ok") => {}
            other => {
                return Err(RelayError::NoData {
                    status: other.unwrap_or("missing").to_owned(),
                })
            }
        }

        let timestamps = payload
            .t
            .ok_or_else(|| RelayError::Payload(String::from("candle payload has no timestamps")))?;
        let closes = payload
            .c
            .ok_or_else(|| RelayError::Payload(String::from("candle payload has no prices")))?;

        if timestamps.len() != closes.len() {
            return Err(RelayError::Payload(format!(
                "candle payload has {} timestamps but {} prices",
                timestamps.len(),
                closes.len()
            )));
        }

        let mut samples = timestamps
            .into_iter()
            .zip(closes)
            .map(|(seconds, price)| {
                Sample::new(seconds.saturating_mul(1_000), price)
                    .map_err(|e| RelayError::Payload(e.to_string()))
            })
            .collect::<Result<Vec<_>, _>>()?;

        samples.sort_by_key(|sample| sample.timestamp_ms);
        samples.dedup_by_key(|sample| sample.timestamp_ms);
        Ok(samples)
    }

    pub async fn quote(&self, symbol: &Symbol) -> Result<QuoteSnapshot, RelayError> {
        let payload: QuotePayload = self
            .get_json("quote", &[("symbol", symbol.as_str().to_owned())])
            .await?;

        let current = payload
            .c
            .ok_or_else(|| RelayError::Payload(String::from("quote payload has no current price")))?;

        Ok(QuoteSnapshot {
            symbol: symbol.clone(),
            current,
            change: payload.d.unwrap_or_default(),
            percent_change: payload.dp.unwrap_or_default(),
            open: payload.o.unwrap_or_default(),
            high: payload.h.unwrap_or_default(),
            low: payload.l.unwrap_or_default(),
            previous_close: payload.pc.unwrap_or_default(),
        })
    }

    /// Stock and ETF matches for `query`, provider order, at most [`SEARCH_LIMIT`].
    pub async fn search(&self, query: &str) -> Result<Vec<SymbolMatch>, RelayError> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(Vec::new());
        }

        let payload: SearchPayload = self.get_json("search", &[("q", query.to_owned())]).await?;

        Ok(payload
            .result
            .into_iter()
            .filter(|hit| SEARCHABLE_KINDS.contains(&hit.kind.as_str()))
            .filter_map(|hit| {
                let symbol = Symbol::parse(&hit.symbol).ok()?;
                Some(SymbolMatch {
                    symbol,
                    description: hit.description,
                    kind: hit.kind,
                })
            })
            .take(SEARCH_LIMIT)
            .collect())
    }

    fn endpoint(&self, path: &str, query: &[(&str, String)]) -> String {
        let query = query
            .iter()
            .map(|(name, value)| format!("{name}={}", urlencoding::encode(value)))
            .collect::<Vec<_>>()
            .join("&");
        format!("{}/{path}?{query}", self.base_url)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, RelayError> {
        let url = self.endpoint(path, query);
        debug!(%url, "relay request");

        let request = HttpRequest::get(url)
            .with_header("accept", "application/json")
            .with_timeout_ms(self.timeout_ms);
        let response = self
            .http_client
            .get(request)
            .await
            .map_err(|e| RelayError::Transport(e.to_string()))?;

        if !response.is_success() {
            return Err(RelayError::Status {
                status: response.status,
                message: error_message(&response.body),
            });
        }

        serde_json::from_str(&response.body).map_err(|e| RelayError::Payload(e.to_string()))
    }
}

fn error_message(body: &str) -> String {
    #[derive(Deserialize)]
    struct ErrorBody {
        message: String,
    }

    serde_json::from_str::<ErrorBody>(body)
        .map(|parsed| parsed.message)
        .unwrap_or_else(|_| body.trim().to_owned())
}

#[derive(Debug, Deserialize)]
struct CandlePayload {
    #[serde(default)]
    s: Option<String>,
    #[serde(default)]
    t: Option<Vec<i64>>,
    #[serde(default)]
    c: Option<Vec<f64>>,
}

#[derive(Debug, Deserialize)]
struct QuotePayload {
    #[serde(default)]
    c: Option<f64>,
    #[serde(default)]
    d: Option<f64>,
    #[serde(default)]
    dp: Option<f64>,
    #[serde(default)]
    h: Option<f64>,
    #[serde(default)]
    l: Option<f64>,
    #[serde(default)]
    o: Option<f64>,
    #[serde(default)]
    pc: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct SearchPayload {
    #[serde(default)]
    result: Vec<SearchHit>,
}

#[derive(Debug, Deserialize)]
struct SearchHit {
    #[serde(default)]
    description: String,
    symbol: String,
    #[serde(rename = "type", default)]
    kind: String,
}
