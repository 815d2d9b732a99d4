//! Selected tickers and active range, mutated only through the methods here.

use serde::Serialize;
use tokio::sync::watch;

use crate::{Symbol, TimeRange};

const DEFAULT_TICKER: &str = "AAPL";

/// Ordered, duplicate-free ticker list plus the active range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Selection {
    pub tickers: Vec<Symbol>,
    pub range: TimeRange,
}

impl Selection {
    pub fn new(tickers: impl IntoIterator<Item = Symbol>, range: TimeRange) -> Self {
        let mut selection = Self {
            tickers: Vec::new(),
            range,
        };
        for symbol in tickers {
            selection.push_unique(symbol);
        }
        selection
    }

    pub fn contains(&self, symbol: &Symbol) -> bool {
        self.tickers.contains(symbol)
    }

    fn push_unique(&mut self, symbol: Symbol) -> bool {
        if self.contains(&symbol) {
            return false;
        }
        self.tickers.push(symbol);
        true
    }
}

impl Default for Selection {
    fn default() -> Self {
        let tickers = Symbol::parse(DEFAULT_TICKER).into_iter();
        Self::new(tickers, TimeRange::default())
    }
}

/// Observable selection state. Subscribers see every effective change.
#[derive(Debug)]
pub struct SelectionState {
    tx: watch::Sender<Selection>,
}

impl Default for SelectionState {
    fn default() -> Self {
        Self::new(Selection::default())
    }
}

impl SelectionState {
    pub fn new(initial: Selection) -> Self {
        let (tx, _) = watch::channel(initial);
        Self { tx }
    }

    pub fn current(&self) -> Selection {
        self.tx.borrow().clone()
    }

    pub fn tickers(&self) -> Vec<Symbol> {
        self.tx.borrow().tickers.clone()
    }

    pub fn range(&self) -> TimeRange {
        self.tx.borrow().range
    }

    /// Appends `symbol` unless already selected. Returns whether anything changed.
    pub fn add(&self, symbol: Symbol) -> bool {
        self.tx.send_if_modified(|selection| selection.push_unique(symbol))
    }

    pub fn remove(&self, symbol: &Symbol) -> bool {
        self.tx.send_if_modified(|selection| {
            let before = selection.tickers.len();
            selection.tickers.retain(|selected| selected != symbol);
            selection.tickers.len() != before
        })
    }

    /// Replaces the whole list; duplicates collapse, first position wins.
    pub fn replace_all(&self, symbols: impl IntoIterator<Item = Symbol>) -> bool {
        let next = Selection::new(symbols, self.range());
        self.tx.send_if_modified(|selection| {
            if selection.tickers == next.tickers {
                return false;
            }
            selection.tickers = next.tickers;
            true
        })
    }

    pub fn set_range(&self, range: TimeRange) -> bool {
        self.tx.send_if_modified(|selection| {
            if selection.range == range {
                return false;
            }
            selection.range = range;
            true
        })
    }

    pub fn subscribe(&self) -> watch::Receiver<Selection> {
        self.tx.subscribe()
    }
}
