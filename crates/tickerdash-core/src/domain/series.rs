use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::{Resolution, Symbol, ValidationError};

/// One plotted point: epoch milliseconds and a non-negative price.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    pub timestamp_ms: i64,
    pub price: f64,
}

impl Sample {
    pub fn new(timestamp_ms: i64, price: f64) -> Result<Self, ValidationError> {
        if !price.is_finite() {
            return Err(ValidationError::NonFiniteValue { field: "price" });
        }
        if price < 0.0 {
            return Err(ValidationError::NegativeValue { field: "price" });
        }
        Ok(Self {
            timestamp_ms,
            price,
        })
    }
}

/// Rendering hint carried alongside a series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StyleHint {
    pub hue: u16,
    pub saturation: u8,
    pub lightness: u8,
    pub point_radius: u8,
}

impl StyleHint {
    /// Hues step 60 degrees per selection slot so neighbouring lines separate.
    pub fn for_slot(index: usize, resolution: Resolution) -> Self {
        Self {
            hue: ((index % 6) * 60) as u16,
            saturation: 70,
            lightness: 50,
            point_radius: if resolution.is_coarse() { 0 } else { 1 },
        }
    }

    pub fn css_color(&self) -> String {
        format!("hsl({}, {}%, {}%)", self.hue, self.saturation, self.lightness)
    }
}

/// A ready-to-plot price series for one ticker.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriceSeries {
    pub symbol: Symbol,
    pub label: String,
    pub style: StyleHint,
    pub resolution: Resolution,
    samples: Vec<Sample>,
}

impl PriceSeries {
    /// Builds a series, ordering samples by timestamp and dropping duplicate
    /// timestamps so the sequence is strictly increasing.
    pub fn new(
        symbol: Symbol,
        label: impl Into<String>,
        style: StyleHint,
        resolution: Resolution,
        mut samples: Vec<Sample>,
    ) -> Self {
        if !samples.windows(2).all(|pair| pair[0].timestamp_ms < pair[1].timestamp_ms) {
            samples.sort_by_key(|sample| sample.timestamp_ms);
            samples.dedup_by_key(|sample| sample.timestamp_ms);
        }

        Self {
            symbol,
            label: label.into(),
            style,
            resolution,
            samples,
        }
    }

    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn first_price(&self) -> Option<f64> {
        self.samples.first().map(|sample| sample.price)
    }

    pub fn last_price(&self) -> Option<f64> {
        self.samples.last().map(|sample| sample.price)
    }
}

/// Latest known state of one ticker's series.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", content = "detail", rename_all = "snake_case")]
pub enum SeriesResult {
    Pending,
    Failed(String),
    Ready(Arc<PriceSeries>),
}

impl SeriesResult {
    pub fn ready(series: PriceSeries) -> Self {
        Self::Ready(Arc::new(series))
    }

    pub fn failed(reason: impl Into<String>) -> Self {
        Self::Failed(reason.into())
    }

    pub const fn status(&self) -> SeriesStatus {
        match self {
            Self::Pending => SeriesStatus::Loading,
            Self::Failed(_) => SeriesStatus::Error,
            Self::Ready(_) => SeriesStatus::Ready,
        }
    }

    pub fn as_ready(&self) -> Option<&Arc<PriceSeries>> {
        match self {
            Self::Ready(series) => Some(series),
            Self::Pending | Self::Failed(_) => None,
        }
    }

    pub fn failure_reason(&self) -> Option<&str> {
        match self {
            Self::Failed(reason) => Some(reason),
            Self::Pending | Self::Ready(_) => None,
        }
    }

    pub const fn is_pending(&self) -> bool {
        matches!(self, Self::Pending)
    }
}

/// Tri-state exposed to loading/error indicators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeriesStatus {
    Loading,
    Error,
    Ready,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn symbol() -> Symbol {
        Symbol::parse("AAPL").expect("valid symbol")
    }

    #[test]
    fn rejects_negative_and_non_finite_prices() {
        assert!(matches!(
            Sample::new(0, -1.0),
            Err(ValidationError::NegativeValue { field: "price" })
        ));
        assert!(matches!(
            Sample::new(0, f64::NAN),
            Err(ValidationError::NonFiniteValue { field: "price" })
        ));
    }

    #[test]
    fn series_orders_and_deduplicates_samples() {
        let samples = vec![
            Sample::new(3_000, 3.0).expect("valid"),
            Sample::new(1_000, 1.0).expect("valid"),
            Sample::new(3_000, 3.5).expect("valid"),
            Sample::new(2_000, 2.0).expect("valid"),
        ];
        let series = PriceSeries::new(
            symbol(),
            "AAPL",
            StyleHint::for_slot(0, Resolution::Daily),
            Resolution::Daily,
            samples,
        );

        let stamps = series
            .samples()
            .iter()
            .map(|sample| sample.timestamp_ms)
            .collect::<Vec<_>>();
        assert_eq!(stamps, vec![1_000, 2_000, 3_000]);
    }

    #[test]
    fn style_hint_cycles_hues_and_hides_points_for_coarse_series() {
        let first = StyleHint::for_slot(0, Resolution::Weekly);
        let seventh = StyleHint::for_slot(6, Resolution::FifteenMinutes);
        assert_eq!(first.hue, 0);
        assert_eq!(first.point_radius, 0);
        assert_eq!(seventh.hue, 0);
        assert_eq!(seventh.point_radius, 1);
        assert_eq!(StyleHint::for_slot(2, Resolution::Daily).css_color(), "hsl(120, 70%, 50%)");
    }

    #[test]
    fn status_maps_pending_to_loading() {
        assert_eq!(SeriesResult::Pending.status(), SeriesStatus::Loading);
        assert_eq!(SeriesResult::failed("boom").status(), SeriesStatus::Error);
        assert_eq!(SeriesResult::failed("boom").failure_reason(), Some("boom"));
    }
}
