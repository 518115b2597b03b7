//! Integration tests for Terminal Café.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p terminal-cafe-integration-tests
//! ```
//!
//! Sessions run against a [`ScriptedTerminal`] that replays canned input and
//! records everything written, and against fake collaborators that record
//! how they were called. No network access is needed.

use std::collections::VecDeque;
use std::io;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use async_trait::async_trait;
use terminal_cafe_core::{PostalCode, Price};
use terminal_cafe_server::order::Order;
use terminal_cafe_server::services::{
    NotificationError, OrderNotifier, PaymentArtifact, PaymentError, PaymentGateway, Services,
    ShippingError, ShippingQuote, ShippingRates,
};
use terminal_cafe_server::transport::Terminal;

/// One-product menu used by most scenarios.
pub const ESPRESSO_MENU: &str = "\
## Coffee
### Espresso
- Preço: R$ 5,00
- Descrição: Short and strong.
";

// ============================================================================
// Terminal
// ============================================================================

/// Terminal that replays a fixed list of input lines.
///
/// Reading past the last line reports end of stream.
#[derive(Debug, Default)]
pub struct ScriptedTerminal {
    input: VecDeque<String>,
    output: String,
    errors: String,
    interactive: bool,
}

impl ScriptedTerminal {
    #[must_use]
    pub fn new(lines: &[&str]) -> Self {
        Self {
            input: lines.iter().map(|l| (*l).to_string()).collect(),
            output: String::new(),
            errors: String::new(),
            interactive: true,
        }
    }

    /// A terminal that is not interactive, like a piped stdin.
    #[must_use]
    pub fn non_interactive(lines: &[&str]) -> Self {
        Self {
            interactive: false,
            ..Self::new(lines)
        }
    }

    /// Everything written to the output stream.
    #[must_use]
    pub fn output(&self) -> &str {
        &self.output
    }

    /// Everything written to the error stream.
    #[must_use]
    pub fn errors(&self) -> &str {
        &self.errors
    }

    /// Lines that were never read.
    #[must_use]
    pub fn unread(&self) -> usize {
        self.input.len()
    }
}

#[async_trait]
impl Terminal for ScriptedTerminal {
    fn is_interactive(&self) -> bool {
        self.interactive
    }

    async fn read_line(&mut self) -> io::Result<Option<String>> {
        Ok(self.input.pop_front().map(|line| line.trim().to_string()))
    }

    async fn write(&mut self, text: &str) -> io::Result<()> {
        self.output.push_str(text);
        Ok(())
    }

    async fn write_error(&mut self, text: &str) -> io::Result<()> {
        self.errors.push_str(text);
        Ok(())
    }
}

// ============================================================================
// Collaborators
// ============================================================================

/// Shipping service with a fixed answer.
#[derive(Debug)]
pub struct FakeShipping {
    quote: Option<ShippingQuote>,
    requests: Mutex<Vec<PostalCode>>,
}

impl FakeShipping {
    /// Always quote PAC at `centavos`, delivered in `days`.
    #[must_use]
    pub fn quoting(centavos: u32, days: u32) -> Self {
        Self {
            quote: Some(ShippingQuote {
                service: "PAC".to_string(),
                price: Price::from_centavos(centavos),
                deadline_days: days,
            }),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Always report the CEP as unserviceable.
    #[must_use]
    pub fn unavailable() -> Self {
        Self {
            quote: None,
            requests: Mutex::new(Vec::new()),
        }
    }

    /// CEPs that were quoted, in order.
    #[must_use]
    pub fn requests(&self) -> Vec<PostalCode> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[async_trait]
impl ShippingRates for FakeShipping {
    async fn quote(&self, destination: &PostalCode) -> Result<ShippingQuote, ShippingError> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(destination.clone());
        self.quote
            .clone()
            .ok_or_else(|| ShippingError::Unavailable("destination not served".to_string()))
    }
}

/// Payment service with a fixed answer.
#[derive(Debug)]
pub struct FakePayments {
    artifact: Option<PaymentArtifact>,
    orders: Mutex<Vec<Order>>,
}

impl FakePayments {
    /// Return a PIX code for every order.
    #[must_use]
    pub fn paying() -> Self {
        Self::returning(PaymentArtifact {
            payment_id: Some(1_234_567_890_i64.into()),
            scannable_code: "00020126580014br.gov.bcb.pix0136terminal-cafe".to_string(),
            scannable_code_encoded: "iVBORw0KGgoAAAANSUhEUg==".to_string(),
        })
    }

    /// Return `artifact` for every order.
    #[must_use]
    pub fn returning(artifact: PaymentArtifact) -> Self {
        Self {
            artifact: Some(artifact),
            orders: Mutex::new(Vec::new()),
        }
    }

    /// Reject every order.
    #[must_use]
    pub fn failing() -> Self {
        Self {
            artifact: None,
            orders: Mutex::new(Vec::new()),
        }
    }

    /// Orders that were charged.
    #[must_use]
    pub fn orders(&self) -> Vec<Order> {
        self.orders
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[async_trait]
impl PaymentGateway for FakePayments {
    async fn create_payment(&self, order: &Order) -> Result<PaymentArtifact, PaymentError> {
        self.orders
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(order.clone());
        self.artifact.clone().ok_or(PaymentError::Api {
            status: 400,
            message: "payer email rejected".to_string(),
        })
    }
}

/// Notification service that counts calls.
#[derive(Debug, Default)]
pub struct FakeNotifier {
    fail: bool,
    calls: AtomicUsize,
}

impl FakeNotifier {
    #[must_use]
    pub fn working() -> Self {
        Self::default()
    }

    /// Fail every notification.
    #[must_use]
    pub fn failing() -> Self {
        Self {
            fail: true,
            calls: AtomicUsize::new(0),
        }
    }

    #[must_use]
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl OrderNotifier for FakeNotifier {
    async fn notify_new_order(&self, _order: &Order) -> Result<(), NotificationError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(NotificationError::InvalidAddress(
                "orders@terminal.cafe".to_string(),
            ));
        }
        Ok(())
    }
}

/// Fakes wired into a [`Services`] bundle, with handles kept for assertions.
#[derive(Debug, Clone)]
pub struct Fakes {
    pub shipping: Arc<FakeShipping>,
    pub payments: Arc<FakePayments>,
    pub notifier: Arc<FakeNotifier>,
}

impl Fakes {
    #[must_use]
    pub fn new(shipping: FakeShipping, payments: FakePayments, notifier: FakeNotifier) -> Self {
        Self {
            shipping: Arc::new(shipping),
            payments: Arc::new(payments),
            notifier: Arc::new(notifier),
        }
    }

    /// Shipping at R$ 10.00 in 5 days, payments and notifications succeed.
    #[must_use]
    pub fn happy_path() -> Self {
        Self::new(
            FakeShipping::quoting(1000, 5),
            FakePayments::paying(),
            FakeNotifier::working(),
        )
    }

    #[must_use]
    pub fn services(&self) -> Services {
        Services {
            shipping: self.shipping.clone(),
            payments: self.payments.clone(),
            notifier: self.notifier.clone(),
        }
    }
}

/// Contact answers for a house delivery, starting at the email prompt.
pub const HOUSE_DETAILS: &[&str] = &[
    "ana@example.com",
    "12345678901",
    "11999990000",
    "01310100",
    "Av. Paulista",
    "1000",
    "house",
    "",
];
