use std::sync::Arc;

use serde::Serialize;
use tickerdash_core::{
    Dashboard, DashboardConfig, DataMode, HttpClient, PriceSeries, Resolution, Selection,
    SeriesStatus, Symbol, TickerStatus, TimeRange, TimeWindow,
};
use tracing::warn;

use crate::cli::{parse_symbols, ChartArgs, Cli};
use crate::error::CliError;

use super::{CommandOutput, ItemError};

#[derive(Debug, Serialize)]
struct ChartResponseData {
    range: TimeRange,
    resolution: Resolution,
    mode: DataMode,
    window: TimeWindow,
    series: Vec<Arc<PriceSeries>>,
    summaries: Vec<SeriesSummary>,
    statuses: Vec<TickerStatus>,
}

/// Opening and closing price of each plotted series.
#[derive(Debug, Serialize)]
struct SeriesSummary {
    symbol: Symbol,
    samples: usize,
    first_price: Option<f64>,
    last_price: Option<f64>,
}

impl From<&PriceSeries> for SeriesSummary {
    fn from(series: &PriceSeries) -> Self {
        Self {
            symbol: series.symbol.clone(),
            samples: series.len(),
            first_price: series.first_price(),
            last_price: series.last_price(),
        }
    }
}

pub async fn run(
    cli: &Cli,
    args: &ChartArgs,
    http: Arc<dyn HttpClient>,
) -> Result<CommandOutput, CliError> {
    let range = args.time_range()?;
    let symbols = parse_symbols(&args.symbols)?;
    let selection = if symbols.is_empty() {
        Selection {
            range,
            ..Selection::default()
        }
    } else {
        Selection::new(symbols, range)
    };

    let config = DashboardConfig {
        mode: args.data_mode()?,
        seed: args.seed,
        ..cli.dashboard_config()
    };
    let dashboard = Dashboard::from_config(&config, selection, http);

    let chart = match tokio::time::timeout(cli.timeout(), dashboard.settled()).await {
        Ok(chart) => chart,
        Err(_) => {
            warn!(timeout_ms = cli.timeout_ms, "chart did not settle in time");
            dashboard.chart()
        }
    };

    let statuses = dashboard.statuses();
    let errors = statuses
        .iter()
        .filter_map(|status| match status.status {
            SeriesStatus::Error => Some(ItemError::for_symbol(
                &status.symbol,
                status.reason.clone().unwrap_or_default(),
            )),
            SeriesStatus::Loading => Some(ItemError::for_symbol(
                &status.symbol,
                format!("no result within {} ms", cli.timeout_ms),
            )),
            SeriesStatus::Ready => None,
        })
        .collect::<Vec<_>>();

    let window = dashboard.window();
    let data = serde_json::to_value(ChartResponseData {
        range,
        resolution: window.resolution,
        mode: config.mode,
        window,
        series: chart.series().to_vec(),
        summaries: chart
            .series()
            .iter()
            .map(|series| SeriesSummary::from(series.as_ref()))
            .collect(),
        statuses,
    })?;

    Ok(CommandOutput::ok(data).with_errors(errors))
}
