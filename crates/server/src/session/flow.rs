//! Order-taking state machine.
//!
//! [`OrderFlow`] holds the phase of a session and the order being built. Each
//! line of customer input goes through [`OrderFlow::submit`], which validates
//! it, updates the draft and says what the caller should do next. The flow
//! never touches a terminal or a network service, so every transition can be
//! driven directly from a test.
//!
//! Item selection is forgiving: a bad product number or quantity yields
//! [`Step::Retry`] and the customer is asked again. Contact collection is not:
//! a rejected email, CPF or CEP ends the session.

use terminal_cafe_core::{DwellingType, Email, PostalCode, TaxId};
use thiserror::Error;

use crate::catalog::{Catalog, CatalogEntry, CatalogError};
use crate::error::{Field, SessionError};
use crate::order::{LineItem, Order, OrderDraft, OrderError};
use crate::services::ShippingQuote;

/// Menu choice that ends item selection.
pub const FINISH_CHOICE: i64 = 0;

/// Input problems the customer can correct by typing again.
#[derive(Debug, Error)]
pub enum InputError {
    #[error("'{0}' is not a number")]
    NotANumber(String),

    #[error(transparent)]
    UnknownProduct(#[from] CatalogError),

    #[error("invalid quantity '{0}': enter a whole number of at least 1")]
    InvalidQuantity(String),
}

/// The question currently put to the customer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Prompt {
    Product,
    Quantity,
    Email,
    TaxId,
    Phone,
    PostalCode,
    Street,
    Number,
    Dwelling,
    Unit,
    Complement,
}

impl Prompt {
    /// Text written to the terminal before reading the answer.
    #[must_use]
    pub const fn text(self) -> &'static str {
        match self {
            Self::Product => "\nEnter the product number (or 0 to finish): ",
            Self::Quantity => "Quantity: ",
            Self::Email => "\n=== Delivery Details ===\n\nEmail: ",
            Self::TaxId => "CPF (numbers only): ",
            Self::Phone => "Phone (with area code): ",
            Self::PostalCode => "CEP: ",
            Self::Street => "Street address: ",
            Self::Number => "Number: ",
            Self::Dwelling => "Type (house/apartment): ",
            Self::Unit => "Apartment number: ",
            Self::Complement => "Complement (optional, press Enter to skip): ",
        }
    }
}

/// What the caller should do after an answer was accepted.
#[derive(Debug)]
pub enum Step {
    /// Ask the next prompt.
    Next,
    /// Report the error and ask again.
    Retry(InputError),
    /// A line item was appended to the order.
    ItemAdded(LineItem),
    /// The CEP is known; fetch a quote and hand it to [`OrderFlow::accept_quote`].
    NeedsShippingQuote(PostalCode),
    /// Every field is collected; call [`OrderFlow::checkout`].
    ReadyForCheckout,
}

#[derive(Debug, Clone)]
enum Phase {
    SelectingItems { pending: Option<CatalogEntry> },
    CollectingContact(Prompt),
    AwaitingQuote(PostalCode),
    Complete,
}

/// One session's progress through the order.
#[derive(Debug)]
pub struct OrderFlow<'c> {
    catalog: &'c Catalog,
    phase: Phase,
    draft: OrderDraft,
    quote: Option<ShippingQuote>,
}

impl<'c> OrderFlow<'c> {
    #[must_use]
    pub fn new(catalog: &'c Catalog) -> Self {
        Self {
            catalog,
            phase: Phase::SelectingItems { pending: None },
            draft: OrderDraft::new(),
            quote: None,
        }
    }

    /// The prompt awaiting an answer, or `None` while no input is expected.
    #[must_use]
    pub const fn prompt(&self) -> Option<Prompt> {
        match &self.phase {
            Phase::SelectingItems { pending: None } => Some(Prompt::Product),
            Phase::SelectingItems { pending: Some(_) } => Some(Prompt::Quantity),
            Phase::CollectingContact(prompt) => Some(*prompt),
            Phase::AwaitingQuote(_) | Phase::Complete => None,
        }
    }

    #[must_use]
    pub const fn draft(&self) -> &OrderDraft {
        &self.draft
    }

    /// Feed one trimmed line of input.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::EmptyOrder`] when selection ends with no items,
    /// and [`SessionError::InvalidField`] for a rejected email, CPF or CEP.
    pub fn submit(&mut self, input: &str) -> Result<Step, SessionError> {
        match &mut self.phase {
            Phase::SelectingItems { pending } => match pending.take() {
                None => self.choose_product(input),
                Some(entry) => Ok(self.add_quantity(&entry, input)),
            },
            Phase::CollectingContact(prompt) => {
                let prompt = *prompt;
                self.collect(prompt, input)
            }
            Phase::AwaitingQuote(postal_code) => {
                Ok(Step::NeedsShippingQuote(postal_code.clone()))
            }
            Phase::Complete => Ok(Step::ReadyForCheckout),
        }
    }

    /// Record the shipping quote and resume address collection.
    pub fn accept_quote(&mut self, quote: ShippingQuote) {
        self.quote = Some(quote);
        if matches!(self.phase, Phase::AwaitingQuote(_)) {
            self.phase = Phase::CollectingContact(Prompt::Street);
        }
    }

    /// Seal the collected data into an order.
    ///
    /// # Errors
    ///
    /// Fails if called before every field and the shipping quote are in.
    pub fn checkout(self) -> Result<Order, SessionError> {
        if self.draft.is_empty() {
            return Err(SessionError::EmptyOrder);
        }
        if !matches!(self.phase, Phase::Complete) {
            return Err(OrderError::IncompleteCustomer("delivery details").into());
        }
        let quote = self.quote.ok_or(OrderError::MissingShipping)?;
        Ok(self.draft.complete(quote)?)
    }

    fn choose_product(&mut self, input: &str) -> Result<Step, SessionError> {
        let Ok(choice) = input.parse::<i64>() else {
            return Ok(Step::Retry(InputError::NotANumber(input.to_string())));
        };

        if choice == FINISH_CHOICE {
            if self.draft.is_empty() {
                return Err(SessionError::EmptyOrder);
            }
            crate::error::add_breadcrumb("Item selection finished");
            self.phase = Phase::CollectingContact(Prompt::Email);
            return Ok(Step::Next);
        }

        match self.catalog.get(choice) {
            Ok(entry) => {
                self.phase = Phase::SelectingItems {
                    pending: Some(entry.clone()),
                };
                Ok(Step::Next)
            }
            Err(e) => Ok(Step::Retry(e.into())),
        }
    }

    /// A rejected quantity drops the pending product; the customer picks again.
    fn add_quantity(&mut self, entry: &CatalogEntry, input: &str) -> Step {
        let added = input
            .parse::<i64>()
            .ok()
            .and_then(|quantity| self.draft.add_item(entry, quantity).ok());

        match (added, self.draft.items().last()) {
            (Some(()), Some(item)) => Step::ItemAdded(item.clone()),
            _ => Step::Retry(InputError::InvalidQuantity(input.to_string())),
        }
    }

    fn collect(&mut self, prompt: Prompt, input: &str) -> Result<Step, SessionError> {
        let customer = &mut self.draft.customer;

        let next = match prompt {
            Prompt::Email => {
                let email =
                    Email::parse(input).map_err(|e| SessionError::invalid(Field::Email, e))?;
                customer.email = Some(email);
                Prompt::TaxId
            }
            Prompt::TaxId => {
                let tax_id =
                    TaxId::parse(input).map_err(|e| SessionError::invalid(Field::TaxId, e))?;
                customer.tax_id = Some(tax_id);
                Prompt::Phone
            }
            Prompt::Phone => {
                customer.phone = Some(input.to_string());
                Prompt::PostalCode
            }
            Prompt::PostalCode => {
                let postal_code = PostalCode::parse(input)
                    .map_err(|e| SessionError::invalid(Field::PostalCode, e))?;
                customer.postal_code = Some(postal_code.clone());
                crate::error::add_breadcrumb("Contact details collected");
                self.phase = Phase::AwaitingQuote(postal_code.clone());
                return Ok(Step::NeedsShippingQuote(postal_code));
            }
            Prompt::Street => {
                customer.street = Some(input.to_string());
                Prompt::Number
            }
            Prompt::Number => {
                customer.number = Some(input.to_string());
                Prompt::Dwelling
            }
            Prompt::Dwelling => {
                let dwelling = DwellingType::from_answer(input);
                customer.dwelling = Some(dwelling);
                if dwelling.is_apartment() {
                    Prompt::Unit
                } else {
                    Prompt::Complement
                }
            }
            Prompt::Unit => {
                customer.unit = Some(input.to_string());
                Prompt::Complement
            }
            Prompt::Complement => {
                customer.complement = Some(input.to_string());
                self.phase = Phase::Complete;
                return Ok(Step::ReadyForCheckout);
            }
            Prompt::Product | Prompt::Quantity => return Ok(Step::Next),
        };

        self.phase = Phase::CollectingContact(next);
        Ok(Step::Next)
    }
}
