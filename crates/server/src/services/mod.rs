//! External collaborators used by an order session.
//!
//! # Services
//!
//! - `correios` - Shipping quotes from the Correios API
//! - `mercadopago` - PIX payments through Mercado Pago
//! - `email` - New-order notifications via SMTP
//!
//! Sessions only see the traits defined here. Which implementation backs them
//! is decided by whoever builds the [`Services`] bundle.

pub mod correios;
pub mod email;
pub mod mercadopago;

use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use terminal_cafe_core::{PaymentId, PostalCode, Price};
use thiserror::Error;

use crate::order::Order;

pub use correios::CorreiosClient;
pub use email::EmailNotifier;
pub use mercadopago::MercadoPagoClient;

/// Errors from the shipping-rate service.
#[derive(Debug, Error)]
pub enum ShippingError {
    /// HTTP request failed.
    #[error("request failed: {0}")]
    Request(String),

    /// API returned a non-success status.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// Credentials were rejected.
    #[error("authentication failed: {0}")]
    Auth(String),

    /// The carrier cannot deliver to this CEP with the configured service.
    #[error("service unavailable for this CEP: {0}")]
    Unavailable(String),

    /// Failed to parse the response.
    #[error("unexpected response: {0}")]
    Parse(String),
}

/// Errors from the payment service.
#[derive(Debug, Error)]
pub enum PaymentError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// API returned an error response.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// Unauthorized (invalid access token).
    #[error("unauthorized: invalid access token")]
    Unauthorized,

    /// Failed to parse the response.
    #[error("parse error: {0}")]
    Parse(String),
}

/// Errors from the notification service.
#[derive(Debug, Error)]
pub enum NotificationError {
    /// SMTP transport error.
    #[error("SMTP error: {0}")]
    Smtp(#[from] lettre::transport::smtp::Error),

    /// Failed to build email message.
    #[error("failed to build message: {0}")]
    MessageBuild(#[from] lettre::error::Error),

    /// Invalid email address.
    #[error("invalid email address: {0}")]
    InvalidAddress(String),

    /// Template rendering error.
    #[error("template error: {0}")]
    Template(#[from] askama::Error),
}

/// A delivery quote for one parcel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShippingQuote {
    /// Carrier service name, e.g. `PAC`.
    pub service: String,
    pub price: Price,
    /// Business days until delivery.
    pub deadline_days: u32,
}

/// What the payment provider hands back for the customer to pay with.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PaymentArtifact {
    pub payment_id: Option<PaymentId>,
    /// PIX copy-and-paste code. Empty when the provider did not return one.
    pub scannable_code: String,
    /// Base64 PNG rendering of the same code.
    pub scannable_code_encoded: String,
}

impl PaymentArtifact {
    /// Whether there is anything the customer can pay with.
    #[must_use]
    pub const fn is_payable(&self) -> bool {
        !self.scannable_code.is_empty()
    }
}

/// Quotes shipping for the fixed parcel profile.
#[async_trait]
pub trait ShippingRates: Send + Sync {
    /// Quote delivery to `destination`.
    async fn quote(&self, destination: &PostalCode) -> Result<ShippingQuote, ShippingError>;
}

/// Creates a payment for a completed order.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Create a PIX payment for the order total including shipping.
    async fn create_payment(&self, order: &Order) -> Result<PaymentArtifact, PaymentError>;
}

/// Tells the shop about a new order.
#[async_trait]
pub trait OrderNotifier: Send + Sync {
    async fn notify_new_order(&self, order: &Order) -> Result<(), NotificationError>;
}

/// The collaborators a session talks to.
#[derive(Clone)]
pub struct Services {
    pub shipping: Arc<dyn ShippingRates>,
    pub payments: Arc<dyn PaymentGateway>,
    pub notifier: Arc<dyn OrderNotifier>,
}

impl std::fmt::Debug for Services {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Services").finish_non_exhaustive()
    }
}
