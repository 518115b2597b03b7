//! Terminal Café Core - Shared domain types.
//!
//! This crate provides the value types used across all Terminal Café components:
//! - `server` - Catalog, order-taking sessions and the TCP listener
//! - `cli` - Operator tooling (menu inspection, shipping quotes, local sessions)
//!
//! # Architecture
//!
//! The core crate contains only types and validation - no I/O, no HTTP clients,
//! no terminal handling. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for product IDs, prices, emails, tax ids,
//!   postal codes and the customer record

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
