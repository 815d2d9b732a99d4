//! Orchestration driver: selection state in, chart model and statuses out.
//!
//! Every mutator updates the selection first and then applies the recompute
//! rule through [`SeriesCache::sync`]. Live sources spawn fetches, so a
//! dashboard backed by one must be driven from inside a Tokio runtime.

use std::sync::{Arc, Mutex};

use serde::Serialize;
use tokio::sync::watch;

use crate::cache::{CacheSnapshot, SeriesCache, SyncOutcome};
use crate::compositor::{CompositeChart, Compositor};
use crate::config::DashboardConfig;
use crate::http_client::HttpClient;
use crate::selection::{Selection, SelectionState};
use crate::source::SeriesSource;
use crate::window::{resolve, Clock, SystemClock, TimeWindow};
use crate::{SeriesStatus, Symbol, TimeRange};

/// Per-ticker indicator state, in selection order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TickerStatus {
    pub symbol: Symbol,
    pub status: SeriesStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

pub struct Dashboard {
    state: SelectionState,
    cache: SeriesCache,
    compositor: Mutex<Compositor>,
    clock: Arc<dyn Clock>,
}

impl Dashboard {
    /// Starts from the default selection (AAPL over one year).
    pub fn new(source: Arc<dyn SeriesSource>, clock: Arc<dyn Clock>) -> Self {
        Self::with_selection(Selection::default(), source, clock)
    }

    pub fn with_selection(
        selection: Selection,
        source: Arc<dyn SeriesSource>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let dashboard = Self {
            state: SelectionState::new(selection),
            cache: SeriesCache::new(source),
            compositor: Mutex::new(Compositor::new()),
            clock,
        };
        dashboard.recompute();
        dashboard
    }

    pub fn from_config(
        config: &DashboardConfig,
        selection: Selection,
        http_client: Arc<dyn HttpClient>,
    ) -> Self {
        Self::with_selection(
            selection,
            config.series_source(http_client),
            Arc::new(SystemClock),
        )
    }

    fn recompute(&self) -> SyncOutcome {
        let selection = self.state.current();
        self.cache
            .sync(&selection.tickers, selection.range, self.clock.now())
    }

    fn recompute_if(&self, changed: bool) -> SyncOutcome {
        if changed {
            self.recompute()
        } else {
            SyncOutcome::default()
        }
    }

    pub fn add(&self, symbol: Symbol) -> SyncOutcome {
        self.recompute_if(self.state.add(symbol))
    }

    pub fn remove(&self, symbol: &Symbol) -> SyncOutcome {
        self.recompute_if(self.state.remove(symbol))
    }

    pub fn replace_all(&self, symbols: impl IntoIterator<Item = Symbol>) -> SyncOutcome {
        self.recompute_if(self.state.replace_all(symbols))
    }

    pub fn set_range(&self, range: TimeRange) -> SyncOutcome {
        self.recompute_if(self.state.set_range(range))
    }

    /// Re-resolves the window against the clock and re-fetches every ticker.
    pub fn refresh(&self) -> SyncOutcome {
        let selection = self.state.current();
        self.cache
            .refresh(&selection.tickers, selection.range, self.clock.now())
    }

    pub fn selection(&self) -> Selection {
        self.state.current()
    }

    pub fn window(&self) -> TimeWindow {
        resolve(self.state.range(), self.clock.now())
    }

    pub fn cache(&self) -> &SeriesCache {
        &self.cache
    }

    /// Memoised chart: the same `Arc` until the selection or the cache changes.
    pub fn chart(&self) -> Arc<CompositeChart> {
        self.compose(&self.cache.snapshot())
    }

    fn compose(&self, snapshot: &CacheSnapshot) -> Arc<CompositeChart> {
        let tickers = self.state.tickers();
        self.compositor
            .lock()
            .expect("compositor lock is not poisoned")
            .compose(&tickers, snapshot)
    }

    pub fn statuses(&self) -> Vec<TickerStatus> {
        let snapshot = self.cache.snapshot();
        self.state
            .tickers()
            .into_iter()
            .map(|symbol| {
                let result = snapshot.get(&symbol);
                TickerStatus {
                    status: result.map_or(SeriesStatus::Loading, |result| result.status()),
                    reason: result
                        .and_then(|result| result.failure_reason())
                        .map(str::to_owned),
                    symbol,
                }
            })
            .collect()
    }

    /// Waits for every pending fetch, then returns the chart.
    pub async fn settled(&self) -> Arc<CompositeChart> {
        let snapshot = self.cache.settled().await;
        self.compose(&snapshot)
    }

    pub fn subscribe_selection(&self) -> watch::Receiver<Selection> {
        self.state.subscribe()
    }

    pub fn subscribe_series(&self) -> watch::Receiver<u64> {
        self.cache.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::SeriesGenerator;
    use crate::source::SimulatedSource;
    use crate::window::ManualClock;
    use crate::UtcDateTime;

    fn symbol(raw: &str) -> Symbol {
        Symbol::parse(raw).expect("valid symbol")
    }

    fn dashboard() -> Dashboard {
        let now = UtcDateTime::parse("2025-06-15T00:00:00Z").expect("valid timestamp");
        Dashboard::new(
            Arc::new(SimulatedSource::new(SeriesGenerator::seeded(21))),
            Arc::new(ManualClock::new(now)),
        )
    }

    #[test]
    fn starts_with_default_ticker_charted() {
        let dashboard = dashboard();
        let chart = dashboard.chart();
        assert_eq!(chart.symbols(), vec![&symbol("AAPL")]);
        assert_eq!(dashboard.statuses()[0].status, SeriesStatus::Ready);
    }

    #[test]
    fn no_op_mutations_keep_chart_identity() {
        let dashboard = dashboard();
        let before = dashboard.chart();

        assert!(dashboard.add(symbol("AAPL")).is_noop());
        assert!(dashboard.set_range(TimeRange::OneYear).is_noop());

        assert!(Arc::ptr_eq(&before, &dashboard.chart()));
    }

    #[test]
    fn range_change_refetches_every_ticker() {
        let dashboard = dashboard();
        dashboard.add(symbol("MSFT"));

        let outcome = dashboard.set_range(TimeRange::FiveDay);

        assert_eq!(outcome.fetched, vec![symbol("AAPL"), symbol("MSFT")]);
        assert!(dashboard
            .chart()
            .series()
            .iter()
            .all(|series| series.resolution == TimeRange::FiveDay.resolution()));
    }

    #[test]
    fn removing_everything_empties_chart_and_cache() {
        let dashboard = dashboard();
        dashboard.remove(&symbol("AAPL"));
        assert!(dashboard.chart().is_empty());
        assert!(dashboard.cache().is_empty());
        assert!(dashboard.statuses().is_empty());
    }
}
