//! State shared by every session.

use std::sync::Arc;

use crate::catalog::Catalog;
use crate::config::CafeConfig;
use crate::error::StartupError;
use crate::services::{CorreiosClient, EmailNotifier, MercadoPagoClient, Services};
use crate::session::OrderSession;

/// Catalog and collaborators shared across all connections.
///
/// This struct is cheaply cloneable via `Arc`. Nothing in it is mutated after
/// start-up.
#[derive(Clone, Debug)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

#[derive(Debug)]
struct AppStateInner {
    catalog: Catalog,
    services: Services,
}

impl AppState {
    #[must_use]
    pub fn new(catalog: Catalog, services: Services) -> Self {
        Self {
            inner: Arc::new(AppStateInner { catalog, services }),
        }
    }

    /// Load the catalog and build the production clients.
    ///
    /// # Errors
    ///
    /// Returns an error if the menu cannot be read or a client cannot be built.
    pub fn from_config(config: &CafeConfig) -> Result<Self, StartupError> {
        let catalog = Catalog::load(&config.menu_path)?;
        let services = production_services(config)?;
        Ok(Self::new(catalog, services))
    }

    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.inner.catalog
    }

    #[must_use]
    pub fn services(&self) -> &Services {
        &self.inner.services
    }

    /// A session over this state.
    #[must_use]
    pub fn session(&self) -> OrderSession<'_> {
        OrderSession::new(&self.inner.catalog, &self.inner.services)
    }
}

/// Correios, Mercado Pago and SMTP clients built from configuration.
///
/// # Errors
///
/// Returns an error if any client fails to build.
pub fn production_services(config: &CafeConfig) -> Result<Services, StartupError> {
    Ok(Services {
        shipping: Arc::new(CorreiosClient::new(&config.shipping)?),
        payments: Arc::new(MercadoPagoClient::new(&config.payment)?),
        notifier: Arc::new(EmailNotifier::new(&config.email)?),
    })
}
