//! Series fetch adapter: one seam, a simulated and a relay-backed implementation.

use std::fmt::{Display, Formatter};
use std::future::Future;
use std::pin::Pin;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::generator::SeriesGenerator;
use crate::relay::RelayClient;
use crate::window::TimeWindow;
use crate::{PriceSeries, SeriesResult, StyleHint, Symbol, TimeRange, ValidationError};

/// Where series come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataMode {
    #[default]
    Simulated,
    Live,
}

impl DataMode {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Simulated => "simulated",
            Self::Live => "live",
        }
    }
}

impl Display for DataMode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DataMode {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "simulated" | "sim" => Ok(Self::Simulated),
            "live" => Ok(Self::Live),
            other => Err(ValidationError::InvalidDataMode {
                value: other.to_owned(),
            }),
        }
    }
}

/// Inputs of one fetch. `slot` is the ticker's position in the selection at request time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeriesRequest {
    pub symbol: Symbol,
    pub range: TimeRange,
    pub window: TimeWindow,
    pub slot: usize,
}

/// Produces one ticker's series. Failures are folded into `SeriesResult::Failed`.
pub trait SeriesSource: Send + Sync {
    fn mode(&self) -> DataMode;

    fn fetch<'a>(
        &'a self,
        request: SeriesRequest,
    ) -> Pin<Box<dyn Future<Output = SeriesResult> + Send + 'a>>;

    /// Result available without suspending, if any. Sources that answer here
    /// never expose a pending state.
    fn fetch_now(&self, request: &SeriesRequest) -> Option<SeriesResult> {
        let _ = request;
        None
    }
}

#[derive(Debug, Clone, Default)]
pub struct SimulatedSource {
    generator: SeriesGenerator,
}

impl SimulatedSource {
    pub fn new(generator: SeriesGenerator) -> Self {
        Self { generator }
    }

    fn generate(&self, request: &SeriesRequest) -> SeriesResult {
        self.generator
            .generate(&request.window, &request.symbol, request.slot)
    }
}

impl SeriesSource for SimulatedSource {
    fn mode(&self) -> DataMode {
        DataMode::Simulated
    }

    fn fetch<'a>(
        &'a self,
        request: SeriesRequest,
    ) -> Pin<Box<dyn Future<Output = SeriesResult> + Send + 'a>> {
        Box::pin(async move { self.generate(&request) })
    }

    fn fetch_now(&self, request: &SeriesRequest) -> Option<SeriesResult> {
        Some(self.generate(request))
    }
}

/// Live closing prices through the relay.
#[derive(Clone)]
pub struct RelaySource {
    client: RelayClient,
}

impl RelaySource {
    pub fn new(client: RelayClient) -> Self {
        Self { client }
    }
}

impl SeriesSource for RelaySource {
    fn mode(&self) -> DataMode {
        DataMode::Live
    }

    fn fetch<'a>(
        &'a self,
        request: SeriesRequest,
    ) -> Pin<Box<dyn Future<Output = SeriesResult> + Send + 'a>> {
        Box::pin(async move {
            let SeriesRequest {
                symbol,
                window,
                slot,
                ..
            } = request;

            match self.client.candles(&symbol, &window).await {
                Ok(samples) => SeriesResult::ready(PriceSeries::new(
                    symbol.clone(),
                    symbol.to_string(),
                    StyleHint::for_slot(slot, window.resolution),
                    window.resolution,
                    samples,
                )),
                Err(error) => {
                    if error.is_configuration() {
                        warn!(symbol = %symbol, "relay has no provider credential configured");
                    }
                    SeriesResult::failed(error.to_string())
                }
            }
        })
    }
}
