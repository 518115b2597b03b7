//! Shipping quotes.
//!
//! # Usage
//!
//! ```bash
//! tc-cli quote 20040002
//! ```
//!
//! # Environment Variables
//!
//! - `CORREIOS_CODE` - Correios contract code
//! - `CORREIOS_PASSWORD` - Correios API password
//! - `STORE_CEP` - CEP the parcels leave from
//! - `CORREIOS_API_URL` - optional API base URL override

use std::io::{self, Write};

use terminal_cafe_core::{PostalCode, PostalCodeError};
use terminal_cafe_server::config::{ConfigError, CorreiosConfig};
use terminal_cafe_server::services::{CorreiosClient, ShippingError, ShippingRates};
use terminal_cafe_server::session::render::ShippingNotice;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum QuoteError {
    #[error("invalid CEP: {0}")]
    PostalCode(#[from] PostalCodeError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("shipping error: {0}")]
    Shipping(#[from] ShippingError),

    #[error("failed to write output: {0}")]
    Io(#[from] io::Error),
}

/// Ask Correios for a quote to `destination`.
pub async fn quote(destination: &str) -> Result<(), QuoteError> {
    let destination = PostalCode::parse(destination)?;
    let config = CorreiosConfig::from_env()?;
    let client = CorreiosClient::new(&config)?;

    tracing::info!(origin = %config.origin, %destination, "Requesting quote");
    let quote = client.quote(&destination).await?;

    write!(io::stdout().lock(), "{}", ShippingNotice(&quote))?;
    Ok(())
}
