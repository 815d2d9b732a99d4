use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ValidationError;

/// Longest ticker accepted, exchange prefix included (`BINANCE:BTCUSDT`).
const MAX_TICKER_LEN: usize = 15;

/// Uppercase ticker; the identity key of every per-ticker entry.
///
/// Input is trimmed and uppercased, so `" msft "` and `"MSFT"` are the same
/// ticker. The first character must be a letter or digit (`0700.HK`); the
/// rest may also be `.`, `-` or `:`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Symbol(String);

impl Symbol {
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        let ticker = input.trim().to_ascii_uppercase();

        let mut len = 0;
        for (index, ch) in ticker.chars().enumerate() {
            len += 1;
            if index == 0 && !ch.is_ascii_alphanumeric() {
                return Err(ValidationError::SymbolInvalidStart { ch });
            }
            if !is_ticker_char(ch) {
                return Err(ValidationError::SymbolInvalidChar { ch, index });
            }
        }

        match len {
            0 => Err(ValidationError::EmptySymbol),
            len if len > MAX_TICKER_LEN => Err(ValidationError::SymbolTooLong {
                len,
                max: MAX_TICKER_LEN,
            }),
            _ => Ok(Self(ticker)),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Code point of the first character; spreads synthetic base prices apart.
    pub fn leading_code(&self) -> u32 {
        self.0.chars().next().map_or(0, u32::from)
    }
}

fn is_ticker_char(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || matches!(ch, '.' | '-' | ':')
}

impl AsRef<str> for Symbol {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Display for Symbol {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Symbol {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Symbol {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Symbol> for String {
    fn from(value: Symbol) -> Self {
        value.0
    }
}
