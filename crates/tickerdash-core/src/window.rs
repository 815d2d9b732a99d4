//! Time-window resolution: range label + "now" -> (start, end, resolution).

use std::sync::Mutex;

use serde::Serialize;
use time::Duration;

use crate::{Resolution, TimeRange, UtcDateTime};

/// Derived sampling window. Never persisted: "now" moves, so it is resolved on every read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct TimeWindow {
    pub start: UtcDateTime,
    pub end: UtcDateTime,
    pub resolution: Resolution,
}

impl TimeWindow {
    pub fn new(start: UtcDateTime, end: UtcDateTime, resolution: Resolution) -> Self {
        Self {
            start,
            end,
            resolution,
        }
    }

    pub fn span(&self) -> Duration {
        self.end - self.start
    }
}

/// Resolves a range label against `now`. Total: every label maps to a window.
pub fn resolve(range: TimeRange, now: UtcDateTime) -> TimeWindow {
    let start = match range {
        TimeRange::Intraday => now - Duration::days(1),
        TimeRange::FiveDay => now - Duration::days(5),
        TimeRange::OneMonth => now.minus_months(1),
        TimeRange::SixMonth => now.minus_months(6),
        TimeRange::OneYear => now.minus_months(12),
        TimeRange::FiveYear => now.minus_months(60),
        // Placeholder depth, not full history.
        TimeRange::Max => now.minus_months(120),
    };

    TimeWindow::new(start, now, range.resolution())
}

/// Resolves a raw label; unrecognized labels get the one-year mapping.
pub fn resolve_label(label: &str, now: UtcDateTime) -> TimeWindow {
    resolve(TimeRange::parse_or_default(label), now)
}

/// Source of "now" for the orchestration layer.
pub trait Clock: Send + Sync {
    fn now(&self) -> UtcDateTime;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> UtcDateTime {
        UtcDateTime::now()
    }
}

/// Manually driven clock for deterministic runs.
#[derive(Debug)]
pub struct ManualClock {
    now: Mutex<UtcDateTime>,
}

impl ManualClock {
    pub fn new(now: UtcDateTime) -> Self {
        Self {
            now: Mutex::new(now),
        }
    }

    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock().expect("manual clock lock is not poisoned");
        *now = *now + by;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> UtcDateTime {
        *self.now.lock().expect("manual clock lock is not poisoned")
    }
}
