//! # Tickerdash Core
//!
//! Data orchestration for the tickerdash stock dashboard.
//!
//! ## Overview
//!
//! Given a live set of selected tickers and an active time range, this crate:
//!
//! - **Resolves** the range into a sampling window and resolution
//! - **Produces** one price series per ticker, synthetic or fetched through the relay
//! - **Caches** the latest result per selected ticker with last-request-wins semantics
//! - **Composes** ready series into one chart model in selection order
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`window`] | Range label to time window, plus the clock seam |
//! | [`generator`] | Bounded random-walk series generator |
//! | [`source`] | Series fetch adapter (simulated / live) |
//! | [`cache`] | Per-ticker series cache |
//! | [`compositor`] | Selection-ordered chart model |
//! | [`selection`] | Observable selection and range state |
//! | [`dashboard`] | Driver tying state, cache and compositor together |
//! | [`relay`] | Client for the key-holding relay |
//! | [`quotes`] | Quote cards |
//! | [`search`] | Debounced symbol search |
//! | [`config`] | Explicit dashboard configuration |
//! | [`domain`] | Domain models |
//! | [`error`] | Error types |
//! | [`http_client`] | HTTP transport abstraction |
//!
//! ## Data Flow
//!
//! ```text
//! SelectionState ──▶ resolve() ──▶ SeriesSource ──▶ SeriesCache ──▶ Compositor
//!                                  (generator |                    (Arc<CompositeChart>)
//!                                   RelayClient)
//! ```
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use tickerdash_core::{Dashboard, SeriesGenerator, SimulatedSource, Symbol, SystemClock, TimeRange};
//!
//! let dashboard = Dashboard::new(
//!     Arc::new(SimulatedSource::new(SeriesGenerator::seeded(7))),
//!     Arc::new(SystemClock),
//! );
//! dashboard.add(Symbol::parse("msft")?);
//! dashboard.set_range(TimeRange::FiveDay);
//!
//! for series in dashboard.chart().series() {
//!     println!("{}: {} samples", series.label, series.len());
//! }
//! ```
//!
//! ## Errors
//!
//! Per-ticker failures never escape as `Err`: they become
//! [`SeriesResult::Failed`] for that ticker and the rest of the chart is
//! unaffected.

pub mod cache;
pub mod compositor;
pub mod config;
pub mod dashboard;
pub mod domain;
pub mod error;
pub mod generator;
pub mod http_client;
pub mod quotes;
pub mod relay;
pub mod search;
pub mod selection;
pub mod source;
pub mod window;

// Domain models
pub use domain::{
    PriceSeries, QuoteSnapshot, QuoteStatus, Resolution, Sample, SeriesResult, SeriesStatus,
    StyleHint, Symbol, SymbolMatch, TimeRange, UtcDateTime,
};

// Error types
pub use error::{RelayError, ValidationError};

// Orchestration
pub use cache::{CacheSnapshot, SeriesCache, SyncOutcome};
pub use compositor::{compose, CompositeChart, Compositor};
pub use dashboard::{Dashboard, TickerStatus};
pub use selection::{Selection, SelectionState};
pub use window::{resolve, resolve_label, Clock, ManualClock, SystemClock, TimeWindow};

// Series production
pub use generator::{SeriesGenerator, MAX_SAMPLES};
pub use source::{DataMode, RelaySource, SeriesRequest, SeriesSource, SimulatedSource};

// Relay-backed features
pub use quotes::QuoteBoard;
pub use relay::{RelayClient, SEARCH_LIMIT};
pub use search::{Debouncer, SymbolSearch};

// Configuration
pub use config::DashboardConfig;

// HTTP client types
pub use http_client::{HttpClient, HttpError, HttpRequest, HttpResponse, ReqwestHttpClient};
