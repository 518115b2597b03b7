//! Terminal Café order server library.
//!
//! Customers connect with a telnet-capable line-oriented terminal, pick products from
//! the menu, give their delivery details and receive a PIX code to pay with.
//! This crate provides the whole engine as a library so the operator CLI and
//! the integration tests can drive sessions without a network listener.
//!
//! # Modules
//!
//! - [`catalog`] - menu parsing and the read-only catalog
//! - [`order`] - order accumulation and totals
//! - [`session`] - the order-taking state machine and its terminal driver
//! - [`services`] - shipping, payment and notification collaborators
//! - [`transport`] - terminals over TCP streams or stdio
//! - [`server`] - the TCP listener
//! - [`telnet`] - terminal-type negotiation and command stripping

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod catalog;
pub mod config;
pub mod error;
pub mod order;
pub mod server;
pub mod services;
pub mod session;
pub mod state;
pub mod telnet;
pub mod transport;

pub use catalog::{Catalog, CatalogEntry, CatalogError};
pub use error::{SessionError, SessionOutcome, StartupError};
pub use order::{LineItem, Order, OrderDraft};
pub use session::{CompletedOrder, OrderSession};
pub use state::AppState;
