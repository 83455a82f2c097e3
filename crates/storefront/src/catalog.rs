//! Product feed shared by the catalog pages.
//!
//! The feed remembers the outcome of the most recent product fetch so every
//! page render sees a consistent `products / loading / error` triple. Each
//! fetch gets a monotonically increasing request token; a response is applied
//! only if its token is still the latest, so a slow response for a category
//! the visitor already navigated away from can never clobber newer results.

use std::sync::{Arc, Mutex, PoisonError};

use crate::api::types::Product;
use crate::api::{ApiClient, ApiError};

/// Message shown when a product fetch fails, regardless of cause.
pub const FETCH_ERROR_MESSAGE: &str = "Erro ao buscar produtos.";

/// Point-in-time view of the feed, safe to hand to templates.
#[derive(Debug, Clone)]
pub struct FeedSnapshot {
    pub products: Vec<Product>,
    pub loading: bool,
    pub error: Option<&'static str>,
    pub category: Option<String>,
}

#[derive(Debug, Default)]
struct FeedState {
    products: Vec<Product>,
    loading: bool,
    error: Option<&'static str>,
    category: Option<String>,
    latest_request: u64,
}

impl FeedState {
    /// Start a new fetch: bump the token, clear any stale error and flag the
    /// feed as loading. Returns the token the response must present.
    fn begin(&mut self, category: Option<&str>) -> u64 {
        self.latest_request += 1;
        self.loading = true;
        self.error = None;
        self.category = category.map(str::to_owned);
        self.latest_request
    }

    /// Apply a fetch outcome. Returns `false` (leaving the state untouched)
    /// when a newer fetch has started since `token` was issued.
    fn resolve(&mut self, token: u64, outcome: Result<Vec<Product>, ApiError>) -> bool {
        if token != self.latest_request {
            return false;
        }

        self.loading = false;
        match outcome {
            Ok(products) => {
                self.products = products;
                self.error = None;
            }
            Err(_) => {
                self.products = Vec::new();
                self.error = Some(FETCH_ERROR_MESSAGE);
            }
        }
        true
    }

    fn snapshot(&self) -> FeedSnapshot {
        FeedSnapshot {
            products: self.products.clone(),
            loading: self.loading,
            error: self.error,
            category: self.category.clone(),
        }
    }
}

/// Shared product feed backed by the Meada API.
///
/// Cheaply cloneable via `Arc`; the mutex is only held for bookkeeping,
/// never across the network call.
#[derive(Clone)]
pub struct ProductFeed {
    inner: Arc<FeedInner>,
}

struct FeedInner {
    api: ApiClient,
    state: Mutex<FeedState>,
}

impl ProductFeed {
    #[must_use]
    pub fn new(api: ApiClient) -> Self {
        Self {
            inner: Arc::new(FeedInner {
                api,
                state: Mutex::new(FeedState::default()),
            }),
        }
    }

    /// Fetch products for `category` (or everything when `None`) and return
    /// the resulting snapshot.
    ///
    /// Always hits the API; nothing is cached. If a concurrent `refresh`
    /// started after this one, the slower outcome is discarded and the
    /// snapshot reflects whatever state the newer fetch left behind.
    pub async fn refresh(&self, category: Option<&str>) -> FeedSnapshot {
        let token = self.lock_state().begin(category);

        let outcome = self.inner.api.list_products(category).await;

        let mut state = self.lock_state();
        match &outcome {
            Ok(products) => {
                tracing::debug!(
                    category = ?category,
                    count = products.len(),
                    "Product fetch finished"
                );
            }
            Err(error) => {
                tracing::error!(category = ?category, error = %error, "Product fetch failed");
            }
        }
        if !state.resolve(token, outcome) {
            tracing::debug!(category = ?category, token, "Discarding stale product fetch");
        }
        state.snapshot()
    }

    /// Current state without touching the API.
    #[must_use]
    pub fn snapshot(&self) -> FeedSnapshot {
        self.lock_state().snapshot()
    }

    fn lock_state(&self) -> std::sync::MutexGuard<'_, FeedState> {
        // A poisoned lock only means another fetch panicked mid-update;
        // the state itself is still a valid triple.
        self.inner
            .state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}
