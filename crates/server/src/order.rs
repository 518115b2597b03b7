//! Order accumulation.
//!
//! [`OrderDraft`] collects line items and the customer record while a session
//! is running. Once every field is present it is sealed into an [`Order`],
//! which is what the payment and notification services receive.

use std::fmt;

use serde::Serialize;
use terminal_cafe_core::{Customer, DwellingType, Email, PostalCode, Price, TaxId};
use thiserror::Error;

use crate::catalog::CatalogEntry;
use crate::services::ShippingQuote;

/// Errors raised by the order accumulator.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OrderError {
    /// Quantity below one (or too large to represent).
    #[error("quantity must be a whole number of at least 1 (got {0})")]
    InvalidQuantity(i64),

    /// Checkout attempted with no line items.
    #[error("no items were selected")]
    Empty,

    /// Checkout attempted before the customer record was complete.
    #[error("customer details are incomplete: missing {0}")]
    IncompleteCustomer(&'static str),

    /// Checkout attempted before a shipping quote was obtained.
    #[error("no shipping quote was obtained")]
    MissingShipping,
}

/// A catalog entry snapshot and how many of it were ordered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LineItem {
    pub entry: CatalogEntry,
    pub quantity: u32,
}

impl LineItem {
    /// Unit price times quantity.
    #[must_use]
    pub fn line_total(&self) -> Price {
        self.entry.price.times(self.quantity)
    }
}

/// `2x Espresso (R$ 5.00 each) = R$ 10.00`
impl fmt::Display for LineItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}x {} ({} each) = {}",
            self.quantity,
            self.entry.name,
            self.entry.price,
            self.line_total()
        )
    }
}

/// Customer fields gathered so far.
#[derive(Debug, Clone, Default)]
pub struct CustomerDraft {
    pub email: Option<Email>,
    pub tax_id: Option<TaxId>,
    pub phone: Option<String>,
    pub postal_code: Option<PostalCode>,
    pub street: Option<String>,
    pub number: Option<String>,
    pub dwelling: Option<DwellingType>,
    pub unit: Option<String>,
    pub complement: Option<String>,
}

impl CustomerDraft {
    fn finish(self) -> Result<Customer, OrderError> {
        let dwelling = self
            .dwelling
            .ok_or(OrderError::IncompleteCustomer("dwelling type"))?;

        Ok(Customer {
            email: self.email.ok_or(OrderError::IncompleteCustomer("email"))?,
            tax_id: self.tax_id.ok_or(OrderError::IncompleteCustomer("CPF"))?,
            phone: self.phone.ok_or(OrderError::IncompleteCustomer("phone"))?,
            postal_code: self
                .postal_code
                .ok_or(OrderError::IncompleteCustomer("CEP"))?,
            street: self.street.ok_or(OrderError::IncompleteCustomer("street"))?,
            number: self.number.ok_or(OrderError::IncompleteCustomer("number"))?,
            dwelling,
            unit: if dwelling.is_apartment() {
                self.unit
            } else {
                None
            },
            complement: self.complement.filter(|c| !c.is_empty()),
        })
    }
}

/// In-progress order owned by a single session.
#[derive(Debug, Clone, Default)]
pub struct OrderDraft {
    items: Vec<LineItem>,
    pub customer: CustomerDraft,
}

impl OrderDraft {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a line item for `entry`.
    ///
    /// Selecting the same product twice yields two separate line items.
    ///
    /// # Errors
    ///
    /// Returns [`OrderError::InvalidQuantity`] when `quantity < 1`.
    pub fn add_item(&mut self, entry: &CatalogEntry, quantity: i64) -> Result<(), OrderError> {
        let quantity = u32::try_from(quantity)
            .ok()
            .filter(|&q| q >= 1)
            .ok_or(OrderError::InvalidQuantity(quantity))?;

        self.items.push(LineItem {
            entry: entry.clone(),
            quantity,
        });
        Ok(())
    }

    #[must_use]
    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Merchandise total so far.
    #[must_use]
    pub fn total(&self) -> Price {
        self.items.iter().map(LineItem::line_total).sum()
    }

    /// Seal the draft into an order.
    ///
    /// # Errors
    ///
    /// Returns [`OrderError::Empty`] with no items, or
    /// [`OrderError::IncompleteCustomer`] if a required field is missing.
    pub fn complete(self, shipping: ShippingQuote) -> Result<Order, OrderError> {
        if self.items.is_empty() {
            return Err(OrderError::Empty);
        }

        Ok(Order {
            items: self.items,
            customer: self.customer.finish()?,
            shipping,
        })
    }
}

/// A completed order, ready for payment.
#[derive(Debug, Clone, Serialize)]
pub struct Order {
    pub items: Vec<LineItem>,
    pub customer: Customer,
    pub shipping: ShippingQuote,
}

impl Order {
    /// Sum of price times quantity over all line items.
    #[must_use]
    pub fn total(&self) -> Price {
        self.items.iter().map(LineItem::line_total).sum()
    }

    /// Merchandise total plus shipping. This is the amount charged.
    #[must_use]
    pub fn total_with_shipping(&self) -> Price {
        self.total() + self.shipping.price
    }
}
