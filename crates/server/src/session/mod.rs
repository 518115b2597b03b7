//! Interactive order sessions.
//!
//! [`OrderSession`] drives one customer through [`flow::OrderFlow`] over a
//! [`Terminal`], calling the shipping, payment and notification services at
//! the points where the flow asks for them.

pub mod flow;
pub mod render;

use tracing::instrument;

use crate::catalog::Catalog;
use crate::error::{SessionError, SessionOutcome};
use crate::order::Order;
use crate::services::{PaymentArtifact, Services};
use crate::transport::Terminal;

pub use flow::{InputError, OrderFlow, Prompt, Step};
use render::{MenuView, OrderSummary, PaymentInstructions, ShippingNotice};

/// A finished order and what the customer was given to pay with.
#[derive(Debug, Clone)]
pub struct CompletedOrder {
    pub order: Order,
    pub payment: PaymentArtifact,
}

/// One customer's session against a shared catalog.
#[derive(Debug, Clone, Copy)]
pub struct OrderSession<'a> {
    catalog: &'a Catalog,
    services: &'a Services,
}

impl<'a> OrderSession<'a> {
    #[must_use]
    pub const fn new(catalog: &'a Catalog, services: &'a Services) -> Self {
        Self { catalog, services }
    }

    /// Run the session to completion and report how it ended.
    ///
    /// Any error is written to the terminal's error stream before returning
    /// [`SessionOutcome::Aborted`].
    pub async fn run<T: Terminal + ?Sized>(&self, terminal: &mut T) -> SessionOutcome {
        match self.take_order(terminal).await {
            Ok(completed) => {
                tracing::info!(
                    items = completed.order.items.len(),
                    total = %completed.order.total_with_shipping(),
                    payment_id = ?completed.payment.payment_id,
                    "Order completed"
                );
                SessionOutcome::Completed
            }
            Err(err) => {
                err.report();
                if let Err(io_err) = terminal.write_error(&format!("Error: {err}\n")).await {
                    tracing::debug!(error = %io_err, "Could not deliver error to terminal");
                }
                SessionOutcome::Aborted
            }
        }
    }

    /// Take one order from start to payment.
    ///
    /// # Errors
    ///
    /// Returns the [`SessionError`] that ended the session.
    #[instrument(skip_all)]
    pub async fn take_order<T: Terminal + ?Sized>(
        &self,
        terminal: &mut T,
    ) -> Result<CompletedOrder, SessionError> {
        if !terminal.is_interactive() {
            return Err(SessionError::TransportUnsuitable);
        }

        terminal.write(render::WELCOME).await?;

        let mut flow = OrderFlow::new(self.catalog);
        while let Some(prompt) = flow.prompt() {
            if prompt == Prompt::Product {
                terminal.write(&MenuView(self.catalog).to_string()).await?;
            }
            terminal.write(prompt.text()).await?;

            let input = terminal.read_line().await?.ok_or(SessionError::Disconnected)?;
            match flow.submit(&input)? {
                Step::Next => {}
                Step::Retry(err) => terminal.write_error(&format!("{err}\n")).await?,
                Step::ItemAdded(item) => {
                    tracing::debug!(
                        product = %item.entry.name,
                        quantity = item.quantity,
                        "Item added"
                    );
                    terminal.write(render::ITEM_ADDED).await?;
                }
                Step::NeedsShippingQuote(postal_code) => {
                    let quote = self.services.shipping.quote(&postal_code).await?;
                    terminal.write(&ShippingNotice(&quote).to_string()).await?;
                    flow.accept_quote(quote);
                }
                Step::ReadyForCheckout => break,
            }
        }

        let order = flow.checkout()?;
        self.finalize(terminal, order).await
    }

    async fn finalize<T: Terminal + ?Sized>(
        &self,
        terminal: &mut T,
        order: Order,
    ) -> Result<CompletedOrder, SessionError> {
        terminal.write(&OrderSummary(&order).to_string()).await?;

        let payment = self.services.payments.create_payment(&order).await?;
        if !payment.is_payable() {
            return Err(SessionError::PaymentDataUnavailable);
        }
        terminal
            .write(&PaymentInstructions(&payment).to_string())
            .await?;

        if let Err(e) = self.services.notifier.notify_new_order(&order).await {
            tracing::warn!(error = %e, "Failed to send order notification");
        }

        terminal.write(render::THANK_YOU).await?;
        Ok(CompletedOrder { order, payment })
    }
}
