//! Relay configuration loaded from environment variables.
//!
//! - `TICKERDASH_FINNHUB_API_KEY` (fallback `FINNHUB_API_KEY`): provider credential.
//!   Optional: without it the relay still starts and rejects proxied calls.
//! - `TICKERDASH_RELAY_ADDR`: listen address, default `127.0.0.1:8787`.
//! - `TICKERDASH_UPSTREAM_URL`: provider base URL, default `https://finnhub.io/api/v1`.
//! - `TICKERDASH_RELAY_QUOTA_PER_MINUTE`: proxied calls allowed per minute, default 60.

use std::fmt::{Debug, Formatter};
use std::net::SocketAddr;

use crate::RelayServerError;

pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8787";
pub const DEFAULT_UPSTREAM_URL: &str = "https://finnhub.io/api/v1";
pub const DEFAULT_QUOTA_PER_MINUTE: u32 = 60;

const API_KEY_VAR: &str = "TICKERDASH_FINNHUB_API_KEY";
const API_KEY_FALLBACK_VAR: &str = "FINNHUB_API_KEY";
const BIND_ADDR_VAR: &str = "TICKERDASH_RELAY_ADDR";
const UPSTREAM_URL_VAR: &str = "TICKERDASH_UPSTREAM_URL";
const QUOTA_VAR: &str = "TICKERDASH_RELAY_QUOTA_PER_MINUTE";

#[derive(Clone, PartialEq, Eq)]
pub struct RelayConfig {
    pub api_key: Option<String>,
    pub bind_addr: SocketAddr,
    pub upstream_url: String,
    pub quota_per_minute: u32,
}

impl Debug for RelayConfig {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RelayConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("bind_addr", &self.bind_addr)
            .field("upstream_url", &self.upstream_url)
            .field("quota_per_minute", &self.quota_per_minute)
            .finish()
    }
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 8787)),
            upstream_url: String::from(DEFAULT_UPSTREAM_URL),
            quota_per_minute: DEFAULT_QUOTA_PER_MINUTE,
        }
    }
}

impl RelayConfig {
    pub fn from_env() -> Result<Self, RelayServerError> {
        Self::from_lookup(non_empty_var)
    }

    /// Builds the config from any variable source; `lookup` returns `None` for unset names.
    pub fn from_lookup(
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, RelayServerError> {
        let api_key = lookup(API_KEY_VAR).or_else(|| lookup(API_KEY_FALLBACK_VAR));

        let bind_raw = lookup(BIND_ADDR_VAR).unwrap_or_else(|| String::from(DEFAULT_BIND_ADDR));
        let bind_addr = bind_raw
            .parse::<SocketAddr>()
            .map_err(|e| RelayServerError::InvalidConfig {
                name: BIND_ADDR_VAR,
                value: bind_raw.clone(),
                reason: e.to_string(),
            })?;

        let upstream_url = lookup(UPSTREAM_URL_VAR)
            .unwrap_or_else(|| String::from(DEFAULT_UPSTREAM_URL))
            .trim_end_matches('/')
            .to_owned();

        let quota_per_minute = match lookup(QUOTA_VAR) {
            None => DEFAULT_QUOTA_PER_MINUTE,
            Some(raw) => match raw.trim().parse::<u32>() {
                Ok(value) if value > 0 => value,
                Ok(_) => {
                    return Err(RelayServerError::InvalidConfig {
                        name: QUOTA_VAR,
                        value: raw,
                        reason: String::from("must be greater than zero"),
                    })
                }
                Err(e) => {
                    return Err(RelayServerError::InvalidConfig {
                        name: QUOTA_VAR,
                        value: raw,
                        reason: e.to_string(),
                    })
                }
            },
        };

        Ok(Self {
            api_key,
            bind_addr,
            upstream_url,
            quota_per_minute,
        })
    }

    pub fn key_configured(&self) -> bool {
        self.api_key.is_some()
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|value| !value.trim().is_empty())
}
