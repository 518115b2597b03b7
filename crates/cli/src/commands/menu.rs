//! Menu inspection.
//!
//! # Usage
//!
//! ```bash
//! tc-cli menu products/menu.md
//! ```
//!
//! Prints the menu exactly as customers see it, followed by the number of
//! products. Use it to check a menu edit before restarting the server.

use std::io::{self, Write};
use std::path::Path;

use terminal_cafe_server::catalog::{Catalog, CatalogError};
use terminal_cafe_server::session::render::MenuView;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MenuError {
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error("failed to write output: {0}")]
    Io(#[from] io::Error),
}

/// Parse the menu at `path` and print it.
pub fn show(path: &Path) -> Result<(), MenuError> {
    let catalog = Catalog::load(path)?;

    let mut out = io::stdout().lock();
    write!(out, "{}", MenuView(&catalog))?;
    writeln!(out, "\n{} products in {}", catalog.len(), path.display())?;

    for entry in catalog.entries().iter().filter(|e| e.price.amount().is_zero()) {
        tracing::warn!(product = %entry.name, "Product has no price");
    }
    Ok(())
}
