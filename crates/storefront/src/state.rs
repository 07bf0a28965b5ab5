//! Application state shared across handlers.

use std::sync::Arc;

use tokio::sync::{Mutex, MutexGuard};

use crate::catalog::Catalog;
use crate::config::StorefrontConfig;
use crate::freight::FreightClient;
use crate::storage::Storage;
use crate::stores::ShopperSession;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc`. The server hosts a single
/// shopper session, hydrated once at startup.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    catalog: Catalog,
    freight: FreightClient,
    session: Mutex<ShopperSession>,
}

impl AppState {
    /// Create a new application state.
    ///
    /// # Arguments
    ///
    /// * `config` - Storefront configuration
    /// * `catalog` - Loaded catalog
    /// * `storage` - Backend the shopper stores hydrate from and write to
    #[must_use]
    pub fn new(config: StorefrontConfig, catalog: Catalog, storage: &Arc<dyn Storage>) -> Self {
        let freight = FreightClient::new(&config.freight);
        let session = ShopperSession::load(storage);

        tracing::info!(
            cart_lines = session.cart.line_count(),
            wishlist = session.wishlist.len(),
            comparison = session.comparison.len(),
            "Shopper session hydrated"
        );

        Self {
            inner: Arc::new(AppStateInner {
                config,
                catalog,
                freight,
                session: Mutex::new(session),
            }),
        }
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the catalog.
    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.inner.catalog
    }

    /// Get a reference to the freight quote client.
    #[must_use]
    pub fn freight(&self) -> &FreightClient {
        &self.inner.freight
    }

    /// Lock the shopper session.
    ///
    /// Do not hold the guard across network calls.
    pub async fn session(&self) -> MutexGuard<'_, ShopperSession> {
        self.inner.session.lock().await
    }
}
