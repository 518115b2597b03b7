//! Read-only product catalog.
//!
//! The catalog is parsed once at start-up from the menu document (see
//! [`loader`]) and then shared between sessions behind an `Arc`. Nothing
//! mutates it after loading, so sessions never need to lock it.

pub mod loader;

use std::path::{Path, PathBuf};

use serde::Serialize;
use terminal_cafe_core::{Price, ProductId};
use thiserror::Error;

/// Errors raised while loading or querying the catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The menu document could not be opened or read.
    #[error("failed to read menu {}: {source}", .path.display())]
    Source {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A menu choice outside `1..=count`.
    #[error("product {choice} does not exist (menu has {count} products)")]
    NotFound { choice: i64, count: usize },
}

/// One purchasable item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CatalogEntry {
    pub id: ProductId,
    pub name: String,
    /// Heading the entry appeared under; empty when none preceded it.
    pub category: String,
    pub price: Price,
    pub description: String,
}

/// Ordered, immutable list of catalog entries.
///
/// Entry ids are dense and 1-based, so menu choice `n` is the entry at
/// index `n - 1`.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    entries: Vec<CatalogEntry>,
}

impl Catalog {
    /// Load and parse a menu document from disk.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Source`] if the file cannot be read. Malformed
    /// lines inside the document never fail the load.
    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let text = std::fs::read_to_string(path).map_err(|source| CatalogError::Source {
            path: path.to_path_buf(),
            source,
        })?;

        let catalog = Self::parse(&text);
        tracing::info!(
            path = %path.display(),
            products = catalog.len(),
            "Catalog loaded"
        );
        Ok(catalog)
    }

    /// Parse a menu document that is already in memory.
    #[must_use]
    pub fn parse(text: &str) -> Self {
        Self {
            entries: loader::parse_menu(text),
        }
    }

    /// All entries in menu order.
    #[must_use]
    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    /// Look up an entry by its 1-based menu choice.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::NotFound`] unless `1 <= choice <= len()`.
    pub fn get(&self, choice: i64) -> Result<&CatalogEntry, CatalogError> {
        let not_found = || CatalogError::NotFound {
            choice,
            count: self.entries.len(),
        };

        let index = usize::try_from(choice)
            .ok()
            .and_then(|n| n.checked_sub(1))
            .ok_or_else(not_found)?;

        self.entries.get(index).ok_or_else(not_found)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
