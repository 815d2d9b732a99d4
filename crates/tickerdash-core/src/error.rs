use thiserror::Error;

/// Validation and contract errors exposed by `tickerdash-core`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("symbol cannot be empty")]
    EmptySymbol,
    #[error("symbol length {len} exceeds max {max}")]
    SymbolTooLong { len: usize, max: usize },
    #[error("symbol must start with an ASCII letter or digit: '{ch}'")]
    SymbolInvalidStart { ch: char },
    #[error("symbol contains invalid character '{ch}' at index {index}")]
    SymbolInvalidChar { ch: char, index: usize },

    #[error("invalid time range '{value}', expected one of 1D, 5D, 1M, 6M, 1Y, 5Y, MAX")]
    InvalidTimeRange { value: String },
    #[error("invalid resolution '{value}', expected one of 15, 60, D, W")]
    InvalidResolution { value: String },
    #[error("invalid data mode '{value}', expected simulated or live")]
    InvalidDataMode { value: String },

    #[error("timestamp must be RFC3339 UTC (suffix Z): '{value}'")]
    TimestampNotUtc { value: String },

    #[error("field '{field}' must be finite")]
    NonFiniteValue { field: &'static str },
    #[error("field '{field}' must be non-negative")]
    NegativeValue { field: &'static str },
}

/// Errors raised while talking to the key-holding relay.
///
/// Inside the orchestration layer these never escape as `Err`: they are folded
/// into a per-ticker `SeriesResult::Failed`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RelayError {
    #[error("relay transport error: {0}")]
    Transport(String),

    #[error("relay returned status {status}: {message}")]
    Status { status: u16, message: String },

    #[error("malformed relay payload: {0}")]
    Payload(String),

    #[error("relay reported no data ({status})")]
    NoData { status: String },
}

const MISSING_KEY_MESSAGE: &str = "API key is not configured";

impl RelayError {
    /// True when the relay has no provider credential configured.
    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::Status { status: 500, message } if message.contains(MISSING_KEY_MESSAGE))
    }

    pub const fn code(&self) -> &'static str {
        match self {
            Self::Transport(_) => "relay.transport",
            Self::Status { .. } => "relay.status",
            Self::Payload(_) => "relay.payload",
            Self::NoData { .. } => "relay.no_data",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_key_status_is_a_configuration_error() {
        let error = RelayError::Status {
            status: 500,
            message: String::from("API key is not configured"),
        };
        assert!(error.is_configuration());
        assert_eq!(error.code(), "relay.status");
    }

    #[test]
    fn upstream_failure_is_not_a_configuration_error() {
        let error = RelayError::Status {
            status: 403,
            message: String::from("Error from upstream: Forbidden"),
        };
        assert!(!error.is_configuration());
    }
}
