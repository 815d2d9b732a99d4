use serde::{Deserialize, Serialize};

use crate::Symbol;

/// Latest quote for one ticker, as shown on a quote card.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuoteSnapshot {
    pub symbol: Symbol,
    pub current: f64,
    pub change: f64,
    pub percent_change: f64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub previous_close: f64,
}

impl QuoteSnapshot {
    pub fn is_positive(&self) -> bool {
        self.change >= 0.0
    }

    /// `+1.25 (+0.84%)` style change line.
    pub fn change_line(&self) -> String {
        let sign = if self.is_positive() { "+" } else { "" };
        format!(
            "{sign}{:.2} ({sign}{:.2}%)",
            self.change, self.percent_change
        )
    }
}

/// Tri-state of a quote card.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", content = "detail", rename_all = "snake_case")]
pub enum QuoteStatus {
    Loading,
    Error(String),
    Ready(QuoteSnapshot),
}

/// One search hit offered for selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymbolMatch {
    pub symbol: Symbol,
    pub description: String,
    pub kind: String,
}
