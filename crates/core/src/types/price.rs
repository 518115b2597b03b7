//! Type-safe price representation using decimal arithmetic.
//!
//! All amounts are Brazilian reais. Arithmetic is exact (`rust_decimal`);
//! only the [`Display`](core::fmt::Display) output is cut down to two
//! decimal places, and it truncates rather than rounds.

use core::fmt;
use core::iter::Sum;
use core::ops::Add;
use core::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`Price`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PriceError {
    /// The input string is empty.
    #[error("price cannot be empty")]
    Empty,
    /// The input is not a decimal number.
    #[error("invalid price amount: {0}")]
    InvalidAmount(String),
    /// The amount is below zero.
    #[error("price cannot be negative")]
    Negative,
}

/// A non-negative amount in reais.
///
/// # Examples
///
/// ```
/// use terminal_cafe_core::Price;
///
/// let price = Price::parse_brl("12,50").unwrap();
/// assert_eq!(price.to_string(), "R$ 12.50");
/// assert_eq!(price.times(2).to_string(), "R$ 25.00");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Price(Decimal);

impl Price {
    /// Zero reais.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Currency symbol used when displaying prices.
    pub const SYMBOL: &'static str = "R$";

    /// Create a price from a decimal amount.
    ///
    /// # Errors
    ///
    /// Returns [`PriceError::Negative`] if the amount is below zero.
    pub fn new(amount: Decimal) -> Result<Self, PriceError> {
        if amount.is_sign_negative() && !amount.is_zero() {
            return Err(PriceError::Negative);
        }
        Ok(Self(amount))
    }

    /// Create a price from an amount in centavos.
    #[must_use]
    pub fn from_centavos(centavos: u32) -> Self {
        Self(Decimal::new(i64::from(centavos), 2))
    }

    /// Parse an amount written with a decimal comma (`"12,50"`, `"7"`,
    /// `"1.234,56"`).
    ///
    /// When a comma is present, dots are thousands separators and are dropped.
    /// Only the first comma is treated as the decimal separator, and a dangling
    /// separator (`"12,"`) is accepted as a whole amount.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is empty, not a number, or negative.
    pub fn parse_brl(s: &str) -> Result<Self, PriceError> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(PriceError::Empty);
        }

        let normalized = if trimmed.contains(',') {
            trimmed.replace('.', "").replacen(',', ".", 1)
        } else {
            trimmed.to_owned()
        };
        let normalized = normalized.strip_suffix('.').unwrap_or(&normalized);

        let amount = Decimal::from_str(normalized)
            .map_err(|_| PriceError::InvalidAmount(trimmed.to_owned()))?;
        Self::new(amount)
    }

    /// The exact decimal amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// The amount rounded to centavos, as sent to payment providers.
    #[must_use]
    pub fn rounded(&self) -> Decimal {
        self.0.round_dp(2)
    }

    /// Multiply by a quantity.
    #[must_use]
    pub fn times(&self, quantity: u32) -> Self {
        Self(self.0 * Decimal::from(quantity))
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let truncated = self.0.round_dp_with_strategy(2, RoundingStrategy::ToZero);
        write!(f, "{} {truncated:.2}", Self::SYMBOL)
    }
}

impl Add for Price {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}

impl Sum for Price {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

impl FromStr for Price {
    type Err = PriceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_brl(s)
    }
}
