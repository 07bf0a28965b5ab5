//! CLI command implementations.

pub mod catalog;
pub mod quote;
pub mod stores;

use std::path::Path;
use std::sync::Arc;

use thiserror::Error;
use tradeyard_core::ProductId;
use tradeyard_storefront::catalog::{Catalog, CatalogError, Product};
use tradeyard_storefront::config::ConfigError;
use tradeyard_storefront::freight::QuoteError;
use tradeyard_storefront::storage::{FileStorage, Storage, StorageError};
use tradeyard_storefront::stores::ShopperSession;

/// Errors that can occur while running a command.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Quote(#[from] QuoteError),

    #[error("Unknown product: {0}")]
    UnknownProduct(String),

    #[error("Product {0} is not in the cart")]
    NotInCart(ProductId),

    #[error("{0}")]
    Invalid(String),
}

/// Catalog and storage shared by every command.
pub struct Context {
    pub catalog: Catalog,
    pub storage: Arc<dyn Storage>,
}

impl Context {
    /// Load the seeded catalog and open file storage under `data_dir`.
    pub fn open(data_dir: &Path) -> Result<Self, CliError> {
        let storage: Arc<dyn Storage> = Arc::new(FileStorage::open(data_dir)?);
        tracing::debug!(data_dir = %data_dir.display(), "Storage opened");
        Ok(Self {
            catalog: Catalog::seeded()?,
            storage,
        })
    }

    /// Hydrate the shopper stores.
    pub fn session(&self) -> ShopperSession {
        ShopperSession::load(&self.storage)
    }

    pub(crate) fn product(&self, id: ProductId) -> Result<&Product, CliError> {
        self.catalog
            .product_by_id(id)
            .ok_or_else(|| CliError::UnknownProduct(id.to_string()))
    }
}
