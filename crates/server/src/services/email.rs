//! New-order notifications by e-mail.
//!
//! Uses SMTP via lettre for delivery with an Askama plain-text template.

use askama::Template;
use async_trait::async_trait;
use chrono::{DateTime, Local};
use lettre::{
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
    message::header::ContentType,
    transport::smtp::{Error as SmtpError, authentication::Credentials},
};
use secrecy::ExposeSecret;
use terminal_cafe_core::{Customer, Price};

use super::{NotificationError, OrderNotifier, ShippingQuote};
use crate::config::EmailConfig;
use crate::order::{LineItem, Order};

/// Plain text template for the new-order e-mail.
#[derive(Template)]
#[template(path = "email/new_order.txt")]
struct NewOrderEmailText<'a> {
    placed_at: String,
    customer: &'a Customer,
    dwelling: String,
    complement: Option<&'a str>,
    items: &'a [LineItem],
    subtotal: Price,
    shipping: &'a ShippingQuote,
    total: Price,
}

impl<'a> NewOrderEmailText<'a> {
    fn new(order: &'a Order, placed_at: DateTime<Local>) -> Self {
        let customer = &order.customer;
        let dwelling = match (customer.dwelling.is_apartment(), customer.unit.as_deref()) {
            (true, Some(unit)) => format!("Apartment: {unit}"),
            (true, None) => "Apartment".to_string(),
            (false, _) => "House".to_string(),
        };

        Self {
            placed_at: placed_at.format("%d/%m/%Y %H:%M:%S").to_string(),
            customer,
            dwelling,
            complement: customer.complement.as_deref(),
            items: &order.items,
            subtotal: order.total(),
            shipping: &order.shipping,
            total: order.total_with_shipping(),
        }
    }
}

/// Subject line, numbered by the order's unix timestamp.
fn subject(placed_at: DateTime<Local>) -> String {
    format!("New order #{} - Terminal Café", placed_at.timestamp())
}

/// Sends one e-mail per completed order to the shop's inbox.
#[derive(Clone)]
pub struct EmailNotifier {
    mailer: AsyncSmtpTransport<Tokio1Executor>,
    from_address: String,
    notify_address: String,
}

impl std::fmt::Debug for EmailNotifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EmailNotifier")
            .field("from_address", &self.from_address)
            .field("notify_address", &self.notify_address)
            .finish_non_exhaustive()
    }
}

impl EmailNotifier {
    /// Create a new notifier from configuration.
    ///
    /// # Errors
    ///
    /// Returns error if the SMTP relay cannot be configured.
    pub fn new(config: &EmailConfig) -> Result<Self, SmtpError> {
        let credentials = Credentials::new(
            config.from_address.clone(),
            config.smtp_password.expose_secret().to_string(),
        );

        let mailer = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.smtp_host)?
            .port(config.smtp_port)
            .credentials(credentials)
            .build();

        Ok(Self {
            mailer,
            from_address: config.from_address.clone(),
            notify_address: config.notify_address.clone(),
        })
    }

    fn build_message(
        &self,
        order: &Order,
        placed_at: DateTime<Local>,
    ) -> Result<Message, NotificationError> {
        let body = NewOrderEmailText::new(order, placed_at).render()?;

        let message = Message::builder()
            .from(
                self.from_address
                    .parse()
                    .map_err(|_| NotificationError::InvalidAddress(self.from_address.clone()))?,
            )
            .to(self
                .notify_address
                .parse()
                .map_err(|_| NotificationError::InvalidAddress(self.notify_address.clone()))?)
            .subject(subject(placed_at))
            .header(ContentType::TEXT_PLAIN)
            .body(body)?;

        Ok(message)
    }
}

#[async_trait]
impl OrderNotifier for EmailNotifier {
    async fn notify_new_order(&self, order: &Order) -> Result<(), NotificationError> {
        let message = self.build_message(order, Local::now())?;
        self.mailer.send(message).await?;

        tracing::info!(
            to = %self.notify_address,
            items = order.items.len(),
            "Order notification sent"
        );
        Ok(())
    }
}
