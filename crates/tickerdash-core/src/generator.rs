//! Synthetic price series: a bounded random walk stepped at the window's resolution.

use tracing::debug;

use crate::window::TimeWindow;
use crate::{PriceSeries, Sample, SeriesResult, StyleHint, Symbol};

/// Upper bound on emitted samples, whatever the window size.
pub const MAX_SAMPLES: usize = 2_000;

const BASE_PRICE_OFFSET: f64 = 100.0;
const SLOT_SPREAD: f64 = 5.0;
const STEP_FRACTION: f64 = 0.02;
const DRIFT_CENTER: f64 = 0.49;
const FLOOR_FRACTION: f64 = 0.1;

/// Random-walk generator. Unseeded by default; a seed makes output
/// reproducible per (seed, ticker, slot).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeriesGenerator {
    seed: Option<u64>,
}

impl SeriesGenerator {
    pub const fn unseeded() -> Self {
        Self { seed: None }
    }

    pub const fn seeded(seed: u64) -> Self {
        Self { seed: Some(seed) }
    }

    pub const fn seed(&self) -> Option<u64> {
        self.seed
    }

    /// `100 + (leading char code mod 20) + slot * 5`, so tickers separate visually.
    pub fn base_price(symbol: &Symbol, slot: usize) -> f64 {
        BASE_PRICE_OFFSET + f64::from(symbol.leading_code() % 20) + slot as f64 * SLOT_SPREAD
    }

    /// Generates a ready series. Never fails.
    pub fn generate(&self, window: &TimeWindow, symbol: &Symbol, slot: usize) -> SeriesResult {
        let samples = self.samples(window, symbol, slot);
        SeriesResult::ready(PriceSeries::new(
            symbol.clone(),
            format!("{symbol} (Simulated)"),
            StyleHint::for_slot(slot, window.resolution),
            window.resolution,
            samples,
        ))
    }

    pub fn samples(&self, window: &TimeWindow, symbol: &Symbol, slot: usize) -> Vec<Sample> {
        let base = Self::base_price(symbol, slot);

        if window.start >= window.end {
            return vec![Sample {
                timestamp_ms: window.start.unix_millis(),
                price: round_cents(base),
            }];
        }

        let mut rng = self.rng_for(symbol, slot);
        let step = window.resolution.step();
        let expected = (window.span().whole_seconds() / step.whole_seconds().max(1)) as usize + 1;
        let mut samples = Vec::with_capacity(expected.min(MAX_SAMPLES));

        let floor = base * FLOOR_FRACTION;
        let mut price = base;
        let mut current = window.start;

        while current <= window.end {
            if samples.len() == MAX_SAMPLES {
                debug!(
                    symbol = %symbol,
                    expected,
                    "synthetic series capped at {MAX_SAMPLES} samples"
                );
                break;
            }

            let change = (rng.f64() - DRIFT_CENTER) * (base * STEP_FRACTION);
            price = (price + change).max(floor);
            samples.push(Sample {
                timestamp_ms: current.unix_millis(),
                price: round_cents(price),
            });

            current = current + step;
        }

        samples
    }

    fn rng_for(&self, symbol: &Symbol, slot: usize) -> fastrand::Rng {
        match self.seed {
            Some(seed) => {
                fastrand::Rng::with_seed(seed ^ symbol_seed(symbol) ^ (slot as u64).rotate_left(32))
            }
            None => fastrand::Rng::new(),
        }
    }
}

fn symbol_seed(symbol: &Symbol) -> u64 {
    symbol.as_str().bytes().fold(7_u64, |acc, byte| {
        acc.wrapping_mul(37).wrapping_add(byte as u64)
    })
}

fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
