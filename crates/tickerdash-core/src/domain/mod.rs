//! # Domain Models
//!
//! Canonical domain types for the dashboard.
//!
//! | Type | Description |
//! |------|-------------|
//! | [`Symbol`] | Normalized ticker identity |
//! | [`TimeRange`] | Active range label (1D .. MAX) |
//! | [`Resolution`] | Sampling granularity and relay code |
//! | [`UtcDateTime`] | UTC timestamp |
//! | [`Sample`] | One (timestamp, price) point |
//! | [`PriceSeries`] | Strictly time-ordered samples plus label and style |
//! | [`SeriesResult`] | Pending / Failed / Ready per ticker |
//! | [`QuoteSnapshot`] | Quote card payload |
//! | [`SymbolMatch`] | Search hit |

mod quote;
mod range;
mod series;
mod symbol;
mod timestamp;

pub use quote::{QuoteSnapshot, QuoteStatus, SymbolMatch};
pub use range::{Resolution, TimeRange};
pub use series::{PriceSeries, Sample, SeriesResult, SeriesStatus, StyleHint};
pub use symbol::Symbol;
pub use timestamp::UtcDateTime;
