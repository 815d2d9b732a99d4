//! Assembles ready series into one chart model, in selection order.

use std::collections::HashSet;
use std::sync::Arc;

use serde::Serialize;

use crate::cache::CacheSnapshot;
use crate::{PriceSeries, Symbol};

/// Plottable series in selection order. Pending, failed and empty entries are absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CompositeChart {
    series: Vec<Arc<PriceSeries>>,
}

impl CompositeChart {
    pub fn series(&self) -> &[Arc<PriceSeries>] {
        &self.series
    }

    pub fn len(&self) -> usize {
        self.series.len()
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }

    pub fn symbols(&self) -> Vec<&Symbol> {
        self.series.iter().map(|series| &series.symbol).collect()
    }
}

/// Builds the chart by walking `selection`, not the cache.
pub fn compose(selection: &[Symbol], snapshot: &CacheSnapshot) -> CompositeChart {
    let mut seen = HashSet::with_capacity(selection.len());
    let series = selection
        .iter()
        .filter(|symbol| seen.insert(*symbol))
        .filter_map(|symbol| snapshot.get(symbol)?.as_ready())
        .filter(|series| !series.is_empty())
        .cloned()
        .collect();

    CompositeChart { series }
}

#[derive(Debug)]
struct Memo {
    selection: Vec<Symbol>,
    version: u64,
    chart: Arc<CompositeChart>,
}

/// Memoising wrapper around [`compose`]: unchanged inputs return the same `Arc`.
#[derive(Debug, Default)]
pub struct Compositor {
    memo: Option<Memo>,
}

impl Compositor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn compose(&mut self, selection: &[Symbol], snapshot: &CacheSnapshot) -> Arc<CompositeChart> {
        if let Some(memo) = &self.memo {
            if memo.version == snapshot.version && memo.selection == selection {
                return Arc::clone(&memo.chart);
            }
        }

        let chart = Arc::new(compose(selection, snapshot));
        self.memo = Some(Memo {
            selection: selection.to_vec(),
            version: snapshot.version,
            chart: Arc::clone(&chart),
        });
        chart
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::SeriesCache;
    use crate::generator::SeriesGenerator;
    use crate::source::SimulatedSource;
    use crate::{TimeRange, UtcDateTime};

    fn symbols(raw: &[&str]) -> Vec<Symbol> {
        raw.iter()
            .map(|s| Symbol::parse(s).expect("valid symbol"))
            .collect()
    }

    fn cache_with(selection: &[Symbol]) -> SeriesCache {
        let cache = SeriesCache::new(Arc::new(SimulatedSource::new(SeriesGenerator::seeded(5))));
        let now = UtcDateTime::parse("2025-06-15T00:00:00Z").expect("valid timestamp");
        cache.sync(selection, TimeRange::SixMonth, now);
        cache
    }

    #[test]
    fn follows_selection_order_not_cache_order() {
        let cache = cache_with(&symbols(&["AAPL", "MSFT"]));
        let chart = compose(&symbols(&["MSFT", "AAPL"]), &cache.snapshot());

        let order = chart
            .symbols()
            .into_iter()
            .map(Symbol::as_str)
            .collect::<Vec<_>>();
        assert_eq!(order, vec!["MSFT", "AAPL"]);
    }

    #[test]
    fn skips_tickers_missing_from_snapshot() {
        let cache = cache_with(&symbols(&["AAPL"]));
        let chart = compose(&symbols(&["AAPL", "GOOG"]), &cache.snapshot());
        assert_eq!(chart.len(), 1);
    }

    #[test]
    fn empty_selection_gives_empty_chart() {
        let cache = cache_with(&[]);
        assert!(compose(&[], &cache.snapshot()).is_empty());
    }

    #[test]
    fn memo_returns_same_arc_until_inputs_change() {
        let selection = symbols(&["AAPL", "MSFT"]);
        let cache = cache_with(&selection);
        let mut compositor = Compositor::new();

        let first = compositor.compose(&selection, &cache.snapshot());
        let second = compositor.compose(&selection, &cache.snapshot());
        assert!(Arc::ptr_eq(&first, &second));

        let reordered = symbols(&["MSFT", "AAPL"]);
        let third = compositor.compose(&reordered, &cache.snapshot());
        assert!(!Arc::ptr_eq(&first, &third));
        assert_eq!(third.len(), 2);
    }
}
