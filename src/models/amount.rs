//! Fixed-point decimal amounts.
//!
//! Weights and money values carry exactly two decimal places. They are stored
//! as `BIGINT` hundredths (never floats) and exchanged with clients as decimal
//! strings such as `"1250.50"`.
//!
//! For example:
//! - `"10.5"` is stored as 1050
//! - `"100"` is stored as 10000

use std::{fmt, str::FromStr};

use serde::{Deserialize, Deserializer, Serialize, Serializer, de};

/// Maximum number of significant digits, fractional digits included.
pub const MAX_DIGITS: usize = 19;

/// Number of fractional digits.
pub const DECIMAL_PLACES: usize = 2;

/// A decimal value with two fractional digits, held as hundredths.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, sqlx::Type)]
#[sqlx(transparent)]
pub struct Amount(i64);

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseAmountError {
    #[error("a valid number is required")]
    Invalid,

    #[error("ensure that there are no more than 2 decimal places")]
    TooManyDecimalPlaces,

    #[error("ensure that there are no more than 19 digits in total")]
    TooManyDigits,

    #[error("value is out of range")]
    OutOfRange,
}

impl Amount {
    pub const ZERO: Amount = Amount(0);

    pub const fn from_hundredths(hundredths: i64) -> Self {
        Self(hundredths)
    }

    pub const fn hundredths(self) -> i64 {
        self.0
    }

    pub const fn is_negative(self) -> bool {
        self.0 < 0
    }

    /// Multiply by a whole quantity, e.g. unit price times number of units.
    pub fn checked_mul(self, quantity: i64) -> Option<Self> {
        self.0.checked_mul(quantity).map(Self)
    }

    pub fn checked_add(self, other: Amount) -> Option<Self> {
        self.0.checked_add(other.0).map(Self)
    }
}

impl FromStr for Amount {
    type Err = ParseAmountError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (negative, digits) = match s.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, s.strip_prefix('+').unwrap_or(s)),
        };

        let (whole, fraction) = digits.split_once('.').unwrap_or((digits, ""));
        if whole.is_empty() || !whole.bytes().all(|b| b.is_ascii_digit()) {
            return Err(ParseAmountError::Invalid);
        }
        if !fraction.bytes().all(|b| b.is_ascii_digit()) {
            return Err(ParseAmountError::Invalid);
        }
        if fraction.len() > DECIMAL_PLACES {
            return Err(ParseAmountError::TooManyDecimalPlaces);
        }

        let whole = whole.trim_start_matches('0');
        if whole.len() + DECIMAL_PLACES > MAX_DIGITS {
            return Err(ParseAmountError::TooManyDigits);
        }

        let whole_value: i64 = if whole.is_empty() {
            0
        } else {
            whole.parse().map_err(|_| ParseAmountError::OutOfRange)?
        };
        let fraction_value: i64 = format!("{fraction:0<width$}", width = DECIMAL_PLACES)
            .parse()
            .map_err(|_| ParseAmountError::Invalid)?;

        let hundredths = whole_value
            .checked_mul(100)
            .and_then(|v| v.checked_add(fraction_value))
            .ok_or(ParseAmountError::OutOfRange)?;

        Ok(Self(if negative { -hundredths } else { hundredths }))
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        write!(f, "{sign}{}.{:02}", abs / 100, abs % 100)
    }
}

impl Serialize for Amount {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Amount {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct AmountVisitor;

        impl de::Visitor<'_> for AmountVisitor {
            type Value = Amount;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a decimal number with at most two decimal places")
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<Amount, E> {
                v.parse().map_err(E::custom)
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<Amount, E> {
                v.checked_mul(100)
                    .map(Amount)
                    .ok_or_else(|| E::custom(ParseAmountError::OutOfRange))
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<Amount, E> {
                i64::try_from(v)
                    .map_err(|_| E::custom(ParseAmountError::OutOfRange))
                    .and_then(|v| self.visit_i64(v))
            }

            // JSON numbers with a fraction arrive as f64; the shortest
            // round-trip representation is parsed like a string.
            fn visit_f64<E: de::Error>(self, v: f64) -> Result<Amount, E> {
                if !v.is_finite() {
                    return Err(E::custom(ParseAmountError::Invalid));
                }
                self.visit_str(&v.to_string())
            }
        }

        deserializer.deserialize_any(AmountVisitor)
    }
}
