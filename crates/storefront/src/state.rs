//! Shared application state.

use std::sync::Arc;

use thiserror::Error;

use crate::api::{ApiClient, ApiError};
use crate::catalog::ProductFeed;
use crate::config::StorefrontConfig;
use crate::services::cep::{CepClient, CepLookupError};
use crate::store::{CartStore, FavoritesStore, JsonFileStorage, Storage, StoreError};

/// Errors raised while wiring the application together.
#[derive(Debug, Error)]
pub enum StateError {
    #[error("failed to build API client: {0}")]
    Api(#[from] ApiError),

    #[error("failed to open local storage: {0}")]
    Store(#[from] StoreError),

    #[error("failed to build CEP client: {0}")]
    Cep(#[from] CepLookupError),
}

/// Application state shared across all request handlers.
///
/// Cheaply cloneable; all fields live behind a single `Arc`.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    api: ApiClient,
    feed: ProductFeed,
    favorites: FavoritesStore,
    cart: CartStore,
    cep: CepClient,
}

impl AppState {
    /// Build the full state from configuration: API client, product feed,
    /// file-backed stores and the CEP client.
    ///
    /// # Errors
    ///
    /// Returns an error if a client fails to build or the data directory
    /// cannot be created.
    pub fn new(config: StorefrontConfig) -> Result<Self, StateError> {
        let api = ApiClient::new(&config.api)?;
        let feed = ProductFeed::new(api.clone());

        let storage: Arc<dyn Storage> = Arc::new(JsonFileStorage::new(&config.data_dir)?);
        let favorites = FavoritesStore::new(storage.clone());
        let cart = CartStore::new(storage);

        let cep = CepClient::new(config.viacep_base_url.clone())?;

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                api,
                feed,
                favorites,
                cart,
                cep,
            }),
        })
    }

    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    #[must_use]
    pub fn api(&self) -> &ApiClient {
        &self.inner.api
    }

    #[must_use]
    pub fn feed(&self) -> &ProductFeed {
        &self.inner.feed
    }

    #[must_use]
    pub fn favorites(&self) -> &FavoritesStore {
        &self.inner.favorites
    }

    #[must_use]
    pub fn cart(&self) -> &CartStore {
        &self.inner.cart
    }

    #[must_use]
    pub fn cep(&self) -> &CepClient {
        &self.inner.cep
    }
}
