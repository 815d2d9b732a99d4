use std::sync::Arc;
use std::time::Duration;

use crate::generator::SeriesGenerator;
use crate::http_client::HttpClient;
use crate::relay::RelayClient;
use crate::search::{SymbolSearch, DEFAULT_DEBOUNCE};
use crate::source::{DataMode, RelaySource, SeriesSource, SimulatedSource};

pub const DEFAULT_RELAY_URL: &str = "http://127.0.0.1:8787/api/finnhub";
pub const DEFAULT_TIMEOUT_MS: u64 = 5_000;

/// Explicit dashboard settings. Nothing here is read from the environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardConfig {
    pub mode: DataMode,
    pub relay_url: String,
    pub timeout_ms: u64,
    pub seed: Option<u64>,
    pub search_debounce: Duration,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            mode: DataMode::Simulated,
            relay_url: String::from(DEFAULT_RELAY_URL),
            timeout_ms: DEFAULT_TIMEOUT_MS,
            seed: None,
            search_debounce: DEFAULT_DEBOUNCE,
        }
    }
}

impl DashboardConfig {
    pub fn generator(&self) -> SeriesGenerator {
        self.seed
            .map(SeriesGenerator::seeded)
            .unwrap_or_default()
    }

    pub fn relay_client(&self, http_client: Arc<dyn HttpClient>) -> RelayClient {
        RelayClient::new(self.relay_url.clone(), http_client).with_timeout_ms(self.timeout_ms)
    }

    /// Series source for the configured mode.
    pub fn series_source(&self, http_client: Arc<dyn HttpClient>) -> Arc<dyn SeriesSource> {
        match self.mode {
            DataMode::Simulated => Arc::new(SimulatedSource::new(self.generator())),
            DataMode::Live => Arc::new(RelaySource::new(self.relay_client(http_client))),
        }
    }

    pub fn symbol_search(&self, http_client: Arc<dyn HttpClient>) -> SymbolSearch {
        SymbolSearch::new(self.relay_client(http_client), self.search_debounce)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http_client::ReqwestHttpClient;

    #[test]
    fn default_config_is_simulated_and_unseeded() {
        let config = DashboardConfig::default();
        assert_eq!(config.mode, DataMode::Simulated);
        assert_eq!(config.generator(), SeriesGenerator::unseeded());
        assert_eq!(config.search_debounce, Duration::from_millis(300));
    }

    #[test]
    fn series_source_follows_mode() {
        let http: Arc<dyn HttpClient> =
            Arc::new(ReqwestHttpClient::new().expect("client builds"));
        let live = DashboardConfig {
            mode: DataMode::Live,
            ..DashboardConfig::default()
        };

        assert_eq!(
            DashboardConfig::default().series_source(Arc::clone(&http)).mode(),
            DataMode::Simulated
        );
        assert_eq!(live.series_source(http).mode(), DataMode::Live);
    }
}
