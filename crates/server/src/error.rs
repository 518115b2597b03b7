//! Session and start-up error types with Sentry integration.
//!
//! [`SessionError`] is what ends a session early. Collaborator failures are
//! captured to Sentry before the session reports them to the customer;
//! validation failures are only logged.

use std::fmt;

use thiserror::Error;

use crate::catalog::CatalogError;
use crate::config::ConfigError;
use crate::order::OrderError;
use crate::services::{PaymentError, ShippingError};

/// A contact field whose validation is fatal to the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Email,
    TaxId,
    PostalCode,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Email => "email",
            Self::TaxId => "CPF",
            Self::PostalCode => "CEP",
        })
    }
}

/// Reasons a session ends without completing an order.
#[derive(Debug, Error)]
pub enum SessionError {
    /// The peer is not an interactive terminal.
    #[error("an interactive terminal is required")]
    TransportUnsuitable,

    /// Input ended before the order was finished.
    #[error("connection closed before the order was finished")]
    Disconnected,

    /// Reading from or writing to the terminal failed.
    #[error("terminal I/O failed: {0}")]
    Io(#[from] std::io::Error),

    /// Checkout requested with no items.
    #[error("no items were selected")]
    EmptyOrder,

    /// A contact or address field was rejected.
    #[error("invalid {field}: {reason}")]
    InvalidField { field: Field, reason: String },

    /// Shipping quote failed.
    #[error("failed to calculate shipping: {0}")]
    Shipping(#[from] ShippingError),

    /// Payment creation failed.
    #[error("failed to process payment: {0}")]
    Payment(#[from] PaymentError),

    /// Payment was created but has no PIX code to show.
    #[error("payment provider returned no payment code")]
    PaymentDataUnavailable,

    /// The order could not be sealed.
    #[error("order error: {0}")]
    Order(OrderError),
}

impl From<OrderError> for SessionError {
    fn from(err: OrderError) -> Self {
        match err {
            OrderError::Empty => Self::EmptyOrder,
            other => Self::Order(other),
        }
    }
}

impl SessionError {
    pub(crate) fn invalid(field: Field, reason: impl ToString) -> Self {
        Self::InvalidField {
            field,
            reason: reason.to_string(),
        }
    }

    /// Whether an external service caused this error.
    #[must_use]
    pub const fn is_collaborator_failure(&self) -> bool {
        matches!(
            self,
            Self::Shipping(_) | Self::Payment(_) | Self::PaymentDataUnavailable
        )
    }

    /// Log the error, capturing collaborator failures to Sentry.
    pub fn report(&self) {
        if self.is_collaborator_failure() {
            let event_id = sentry::capture_error(self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Session aborted"
            );
        } else {
            tracing::info!(error = %self, "Session aborted");
        }
    }
}

/// How a session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionOutcome {
    Completed,
    Aborted,
}

impl SessionOutcome {
    /// Process exit status for this outcome.
    #[must_use]
    pub const fn exit_code(self) -> i32 {
        match self {
            Self::Completed => 0,
            Self::Aborted => 1,
        }
    }
}

/// Errors that stop the process before any session is served.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("catalog error: {0}")]
    Catalog(#[from] CatalogError),

    #[error("shipping client error: {0}")]
    Shipping(#[from] ShippingError),

    #[error("payment client error: {0}")]
    Payment(#[from] PaymentError),

    #[error("SMTP error: {0}")]
    Smtp(#[from] lettre::transport::smtp::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Add a breadcrumb marking session progress.
///
/// Breadcrumbs appear in Sentry reports to show how far a session got before
/// a collaborator failed.
pub fn add_breadcrumb(message: &str) {
    sentry::add_breadcrumb(sentry::Breadcrumb {
        category: Some("session".to_string()),
        message: Some(message.to_string()),
        level: sentry::Level::Info,
        ..Default::default()
    });
}
