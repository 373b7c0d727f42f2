//! Dinar price representation using decimal arithmetic.
//!
//! Catalog and order payloads carry prices as display strings in the French
//! convention: comma as the decimal separator, optional space grouping, and
//! an optional `DA` (dinar algérien) suffix - `"1 234,56 DA"`. All arithmetic
//! happens on the underlying [`Decimal`]; the formatted string is only a
//! wire/storage format and is normalized on the way in.

use core::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize, Serializer};

/// Errors that can occur when parsing a [`Price`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PriceError {
    /// The input string is empty (after stripping the currency suffix).
    #[error("price cannot be empty")]
    Empty,
    /// The input is not a valid decimal number.
    #[error("invalid price: {0}")]
    Invalid(String),
}

/// A price in Algerian dinars.
///
/// ## Accepted input
///
/// - `"1 234,56 DA"` - full display form
/// - `"1234,56"` - comma decimal separator
/// - `"1234.56"` - dot decimal separator
/// - a bare JSON number (when deserializing)
///
/// ## Serialized form
///
/// Serializes as the comma-decimal string without suffix (`"1234,56"`), the
/// format the order sink and the local history store expect. [`fmt::Display`]
/// appends the `DA` suffix for user-facing output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Price(Decimal);

impl Price {
    /// A price of zero dinars.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Create a price from a decimal amount.
    #[must_use]
    pub const fn new(amount: Decimal) -> Self {
        Self(amount)
    }

    /// Parse a price from a display string.
    ///
    /// Normalizes the French display convention: strips a trailing `DA`
    /// suffix and space grouping (regular and narrow no-break spaces), and
    /// accepts either comma or dot as the decimal separator.
    ///
    /// # Errors
    ///
    /// Returns [`PriceError`] if the remaining text is empty or not a number.
    pub fn parse(s: &str) -> Result<Self, PriceError> {
        let trimmed = s.trim();
        let trimmed = trimmed
            .strip_suffix("DA")
            .or_else(|| trimmed.strip_suffix("da"))
            .unwrap_or(trimmed)
            .trim_end();

        // Grouping uses regular, no-break or narrow no-break spaces; all are
        // Unicode whitespace.
        let normalized: String = trimmed
            .chars()
            .filter(|c| !c.is_whitespace())
            .map(|c| if c == ',' { '.' } else { c })
            .collect();

        if normalized.is_empty() {
            return Err(PriceError::Empty);
        }

        Decimal::from_str(&normalized)
            .map(Self)
            .map_err(|_| PriceError::Invalid(s.to_owned()))
    }

    /// The underlying decimal amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// The comma-decimal wire format, without the `DA` suffix.
    #[must_use]
    pub fn to_wire(&self) -> String {
        self.0.to_string().replace('.', ",")
    }

    /// Multiply by a line quantity.
    #[must_use]
    pub fn times(&self, quantity: u32) -> Self {
        Self(self.0 * Decimal::from(quantity))
    }

    /// Add another price.
    #[must_use]
    pub fn plus(&self, other: Self) -> Self {
        Self(self.0 + other.0)
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} DA", self.to_wire())
    }
}

impl FromStr for Price {
    type Err = PriceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl From<Decimal> for Price {
    fn from(amount: Decimal) -> Self {
        Self(amount)
    }
}

impl Serialize for Price {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_wire())
    }
}

impl<'de> Deserialize<'de> for Price {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct PriceVisitor;

        impl de::Visitor<'_> for PriceVisitor {
            type Value = Price;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a price string or number")
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<Price, E> {
                Price::parse(v).map_err(E::custom)
            }

            fn visit_f64<E: de::Error>(self, v: f64) -> Result<Price, E> {
                Decimal::try_from(v).map(Price::new).map_err(E::custom)
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<Price, E> {
                Ok(Price::new(Decimal::from(v)))
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<Price, E> {
                Ok(Price::new(Decimal::from(v)))
            }
        }

        deserializer.deserialize_any(PriceVisitor)
    }
}
