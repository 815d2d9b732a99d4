use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use time::Duration;

use crate::ValidationError;

/// Time range label selectable on the dashboard. Exactly one is active at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TimeRange {
    #[serde(rename = "1D")]
    Intraday,
    #[serde(rename = "5D")]
    FiveDay,
    #[serde(rename = "1M")]
    OneMonth,
    #[serde(rename = "6M")]
    SixMonth,
    #[default]
    #[serde(rename = "1Y")]
    OneYear,
    #[serde(rename = "5Y")]
    FiveYear,
    #[serde(rename = "MAX")]
    Max,
}

impl TimeRange {
    pub const ALL: [Self; 7] = [
        Self::Intraday,
        Self::FiveDay,
        Self::OneMonth,
        Self::SixMonth,
        Self::OneYear,
        Self::FiveYear,
        Self::Max,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Intraday => "1D",
            Self::FiveDay => "5D",
            Self::OneMonth => "1M",
            Self::SixMonth => "6M",
            Self::OneYear => "1Y",
            Self::FiveYear => "5Y",
            Self::Max => "MAX",
        }
    }

    /// Parses a label, falling back to one-year for anything unrecognized.
    pub fn parse_or_default(value: &str) -> Self {
        Self::from_str(value).unwrap_or_default()
    }

    pub const fn resolution(self) -> Resolution {
        match self {
            Self::Intraday => Resolution::FifteenMinutes,
            Self::FiveDay => Resolution::Hourly,
            Self::OneMonth | Self::SixMonth | Self::OneYear => Resolution::Daily,
            Self::FiveYear | Self::Max => Resolution::Weekly,
        }
    }
}

impl Display for TimeRange {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TimeRange {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_uppercase().as_str() {
            "1D" => Ok(Self::Intraday),
            "5D" => Ok(Self::FiveDay),
            "1M" => Ok(Self::OneMonth),
            "6M" => Ok(Self::SixMonth),
            "1Y" => Ok(Self::OneYear),
            "5Y" => Ok(Self::FiveYear),
            "MAX" => Ok(Self::Max),
            other => Err(ValidationError::InvalidTimeRange {
                value: other.to_owned(),
            }),
        }
    }
}

/// Sampling granularity of a price series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Resolution {
    #[serde(rename = "15")]
    FifteenMinutes,
    #[serde(rename = "60")]
    Hourly,
    #[serde(rename = "D")]
    Daily,
    #[serde(rename = "W")]
    Weekly,
}

impl Resolution {
    /// Code understood by the relay's candle endpoint.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::FifteenMinutes => "15",
            Self::Hourly => "60",
            Self::Daily => "D",
            Self::Weekly => "W",
        }
    }

    pub const fn step(self) -> Duration {
        match self {
            Self::FifteenMinutes => Duration::minutes(15),
            Self::Hourly => Duration::hours(1),
            Self::Daily => Duration::days(1),
            Self::Weekly => Duration::weeks(1),
        }
    }

    /// Daily and weekly series are dense enough to hide individual points.
    pub const fn is_coarse(self) -> bool {
        matches!(self, Self::Daily | Self::Weekly)
    }
}

impl Display for Resolution {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Resolution {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_uppercase().as_str() {
            "15" => Ok(Self::FifteenMinutes),
            "60" => Ok(Self::Hourly),
            "D" => Ok(Self::Daily),
            "W" => Ok(Self::Weekly),
            other => Err(ValidationError::InvalidResolution {
                value: other.to_owned(),
            }),
        }
    }
}
