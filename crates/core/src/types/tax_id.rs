//! CPF (Brazilian individual taxpayer id).

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`TaxId`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum TaxIdError {
    /// The input does not have exactly [`TaxId::LENGTH`] characters.
    #[error("CPF must have exactly {expected} characters (got {actual})")]
    InvalidLength {
        /// Required length.
        expected: usize,
        /// Length of the rejected input.
        actual: usize,
    },
}

/// A CPF as typed by the customer.
///
/// Only the length is checked. Check digits and the digits-only format are not
/// verified here; the payment provider performs its own validation.
///
/// ```
/// use terminal_cafe_core::TaxId;
///
/// assert!(TaxId::parse("12345678901").is_ok());
/// assert!(TaxId::parse("123.456.789-01").is_err());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct TaxId(String);

impl TaxId {
    /// Number of characters in a CPF without punctuation.
    pub const LENGTH: usize = 11;

    /// Parse a `TaxId` from a string.
    ///
    /// # Errors
    ///
    /// Returns [`TaxIdError::InvalidLength`] unless the input is exactly 11 characters.
    pub fn parse(s: &str) -> Result<Self, TaxIdError> {
        let actual = s.chars().count();
        if actual != Self::LENGTH {
            return Err(TaxIdError::InvalidLength {
                expected: Self::LENGTH,
                actual,
            });
        }
        Ok(Self(s.to_owned()))
    }

    /// Returns the CPF as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TaxId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
