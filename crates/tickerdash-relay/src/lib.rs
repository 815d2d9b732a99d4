//! # Tickerdash Relay
//!
//! Server-side holder of the market-data provider credential. Dashboards call
//! `GET /api/finnhub/<path>?<query>`; the relay appends the credential and
//! forwards the call upstream, so the key never leaves this process.
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`config`] | Environment-driven configuration |
//! | [`proxy`] | Axum router, proxy and health handlers |
//! | [`quota`] | Process-wide rate limit on proxied calls |
//! | [`error`] | Startup and serving errors |

pub mod config;
pub mod error;
pub mod proxy;
pub mod quota;

pub use config::RelayConfig;
pub use error::RelayServerError;
pub use proxy::{redact_token, router, upstream_url, AppState};
pub use quota::RelayQuota;
