//! Customer contact and delivery record.

use core::fmt;

use serde::{Deserialize, Serialize};

use super::{Email, PostalCode, TaxId};

/// Kind of dwelling the order is delivered to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum DwellingType {
    #[default]
    House,
    Apartment,
}

impl DwellingType {
    /// Exact answer that selects [`DwellingType::Apartment`].
    pub const APARTMENT_KEYWORD: &'static str = "apartment";

    /// Interpret the customer's answer to the dwelling prompt.
    ///
    /// Only an exact match on [`Self::APARTMENT_KEYWORD`] selects an apartment;
    /// every other answer is treated as a house.
    ///
    /// ```
    /// use terminal_cafe_core::DwellingType;
    ///
    /// assert_eq!(DwellingType::from_answer("apartment"), DwellingType::Apartment);
    /// assert_eq!(DwellingType::from_answer("Apartment"), DwellingType::House);
    /// ```
    #[must_use]
    pub fn from_answer(answer: &str) -> Self {
        if answer == Self::APARTMENT_KEYWORD {
            Self::Apartment
        } else {
            Self::House
        }
    }

    #[must_use]
    pub const fn is_apartment(self) -> bool {
        matches!(self, Self::Apartment)
    }
}

impl fmt::Display for DwellingType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::House => f.write_str("house"),
            Self::Apartment => f.write_str("apartment"),
        }
    }
}

/// Everything collected about the buyer during checkout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    pub email: Email,
    pub tax_id: TaxId,
    /// Free text, not validated.
    pub phone: String,
    pub postal_code: PostalCode,
    pub street: String,
    pub number: String,
    pub dwelling: DwellingType,
    /// Apartment number. Always `None` for houses.
    pub unit: Option<String>,
    /// Optional, `None` when the customer skipped it.
    pub complement: Option<String>,
}

impl Customer {
    /// One-line delivery address as shown in the order summary.
    #[must_use]
    pub fn delivery_line(&self) -> String {
        format!("{}, {} - {}", self.street, self.number, self.postal_code)
    }
}
