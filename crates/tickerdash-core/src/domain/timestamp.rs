use std::fmt::{Display, Formatter};
use std::ops::{Add, Sub};

use serde::{Deserialize, Serialize};
use time::format_description::well_known::Rfc3339;
use time::{Date, Duration, Month, OffsetDateTime};

use crate::ValidationError;

/// An instant in UTC. Serialized as RFC3339 with a `Z` suffix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UtcDateTime(OffsetDateTime);

impl UtcDateTime {
    pub fn now() -> Self {
        Self(OffsetDateTime::now_utc())
    }

    /// Accepts RFC3339 input whose offset is UTC; other offsets are rejected
    /// rather than converted.
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        OffsetDateTime::parse(input, &Rfc3339)
            .ok()
            .filter(|parsed| parsed.offset().is_utc())
            .map(Self)
            .ok_or_else(|| ValidationError::TimestampNotUtc {
                value: input.to_owned(),
            })
    }

    pub fn unix_seconds(self) -> i64 {
        self.0.unix_timestamp()
    }

    /// Milliseconds since the epoch, the unit samples are plotted in.
    pub fn unix_millis(self) -> i64 {
        self.unix_seconds() * 1_000 + i64::from(self.0.millisecond())
    }

    /// Calendar month subtraction, clamping the day to the target month
    /// (31 March minus one month is the last day of February).
    pub fn minus_months(self, months: u32) -> Self {
        self.checked_minus_months(months)
            .unwrap_or_else(|| self - Duration::days(i64::from(months) * 30))
    }

    fn checked_minus_months(self, months: u32) -> Option<Self> {
        let months_since_epoch = self.0.year() * 12 + i32::from(u8::from(self.0.month())) - 1;
        let target = months_since_epoch.checked_sub(i32::try_from(months).ok()?)?;

        let year = target.div_euclid(12);
        let month = Month::try_from(u8::try_from(target.rem_euclid(12) + 1).ok()?).ok()?;
        let day = self.0.day().min(month.length(year));

        let date = Date::from_calendar_date(year, month, day).ok()?;
        Some(Self(self.0.replace_date(date)))
    }

    pub fn format_rfc3339(self) -> String {
        self.to_string()
    }
}

impl Add<Duration> for UtcDateTime {
    type Output = Self;

    fn add(self, rhs: Duration) -> Self {
        Self(self.0 + rhs)
    }
}

impl Sub<Duration> for UtcDateTime {
    type Output = Self;

    fn sub(self, rhs: Duration) -> Self {
        Self(self.0 - rhs)
    }
}

impl Sub for UtcDateTime {
    type Output = Duration;

    fn sub(self, rhs: Self) -> Duration {
        self.0 - rhs.0
    }
}

impl Display for UtcDateTime {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self.0.format(&Rfc3339) {
            Ok(formatted) => f.write_str(&formatted),
            // Years outside 0..=9999 have no RFC3339 form.
            Err(_) => write!(f, "{}", self.0),
        }
    }
}

impl TryFrom<String> for UtcDateTime {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<UtcDateTime> for String {
    fn from(value: UtcDateTime) -> Self {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(input: &str) -> UtcDateTime {
        UtcDateTime::parse(input).expect("valid timestamp")
    }

    #[test]
    fn keeps_utc_input_verbatim() {
        assert_eq!(at("2024-01-01T00:00:00Z").to_string(), "2024-01-01T00:00:00Z");
    }

    #[test]
    fn rejects_other_offsets() {
        assert_eq!(
            UtcDateTime::parse("2024-01-01T01:00:00+01:00"),
            Err(ValidationError::TimestampNotUtc {
                value: String::from("2024-01-01T01:00:00+01:00")
            })
        );
        assert!(UtcDateTime::parse("yesterday").is_err());
    }

    #[test]
    fn month_subtraction_clamps_day_of_month() {
        let ts = at("2024-03-31T12:00:00Z");
        assert_eq!(ts.minus_months(1).format_rfc3339(), "2024-02-29T12:00:00Z");
        assert_eq!(ts.minus_months(13).format_rfc3339(), "2023-02-28T12:00:00Z");
    }

    #[test]
    fn month_subtraction_crosses_year_boundary() {
        assert_eq!(
            at("2024-02-15T00:00:00Z").minus_months(6),
            at("2023-08-15T00:00:00Z")
        );
    }

    #[test]
    fn millis_include_the_sub_second_part() {
        let ts = at("2023-11-14T22:13:20.250Z");
        assert_eq!(ts.unix_seconds(), 1_700_000_000);
        assert_eq!(ts.unix_millis(), 1_700_000_000_250);
    }

    #[test]
    fn difference_is_a_duration() {
        let later = at("2025-06-15T00:00:00Z");
        assert_eq!(later - at("2025-06-10T00:00:00Z"), Duration::days(5));
    }

    #[test]
    fn serde_goes_through_validation() {
        let ts: UtcDateTime =
            serde_json::from_str("\"2025-06-15T00:00:00Z\"").expect("utc json timestamp");
        assert_eq!(
            serde_json::to_string(&ts).expect("serializes"),
            "\"2025-06-15T00:00:00Z\""
        );
        assert!(serde_json::from_str::<UtcDateTime>("\"2025-06-15T00:00:00+02:00\"").is_err());
    }
}
