//! Core types for Terminal Café.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod customer;
pub mod email;
pub mod id;
pub mod postal_code;
pub mod price;
pub mod tax_id;

pub use customer::{Customer, DwellingType};
pub use email::{Email, EmailError};
pub use id::*;
pub use postal_code::{PostalCode, PostalCodeError};
pub use price::{Price, PriceError};
pub use tax_id::{TaxId, TaxIdError};
