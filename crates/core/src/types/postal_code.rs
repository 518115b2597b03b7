//! CEP (Brazilian postal code).

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`PostalCode`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PostalCodeError {
    /// The input does not have exactly [`PostalCode::LENGTH`] characters.
    #[error("CEP must have exactly {expected} characters (got {actual})")]
    InvalidLength {
        /// Required length.
        expected: usize,
        /// Length of the rejected input.
        actual: usize,
    },
}

/// An eight character CEP, e.g. `01310100`.
///
/// ```
/// use terminal_cafe_core::PostalCode;
///
/// assert!(PostalCode::parse("01310100").is_ok());
/// assert!(PostalCode::parse("01310-100").is_err());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct PostalCode(String);

impl PostalCode {
    /// Number of characters in a CEP without the hyphen.
    pub const LENGTH: usize = 8;

    /// Parse a `PostalCode` from a string.
    ///
    /// # Errors
    ///
    /// Returns [`PostalCodeError::InvalidLength`] unless the input is exactly 8 characters.
    pub fn parse(s: &str) -> Result<Self, PostalCodeError> {
        let actual = s.chars().count();
        if actual != Self::LENGTH {
            return Err(PostalCodeError::InvalidLength {
                expected: Self::LENGTH,
                actual,
            });
        }
        Ok(Self(s.to_owned()))
    }

    /// Returns the CEP as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PostalCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for PostalCode {
    type Err = PostalCodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid() {
        let cep = PostalCode::parse("01310100");
        assert_eq!(cep.map(|c| c.to_string()), Ok("01310100".to_string()));
    }

    #[test]
    fn test_parse_with_hyphen_rejected() {
        assert_eq!(
            PostalCode::parse("01310-100"),
            Err(PostalCodeError::InvalidLength {
                expected: 8,
                actual: 9
            })
        );
    }

    #[test]
    fn test_parse_empty_rejected() {
        assert!(PostalCode::parse("").is_err());
    }
}
