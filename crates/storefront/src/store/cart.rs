//! Shopping cart persisted under the `cart` key.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use meada_core::ProductId;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{Storage, StoreError};
use crate::api::types::Product;

/// Storage key for the cart contents.
pub const CART_KEY: &str = "cart";

/// One cart line.
///
/// Carries a snapshot of the product taken when it was added, so the cart
/// page renders without refetching every product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartItem {
    pub id: ProductId,
    pub name: String,
    pub price: Decimal,
    #[serde(default)]
    pub image: Option<String>,
    pub quantity: u32,
}

impl CartItem {
    /// Price times quantity for this line.
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.price * Decimal::from(self.quantity)
    }
}

/// Visitor's cart, rehydrated from storage at startup and written through
/// on every effective change.
#[derive(Clone)]
pub struct CartStore {
    inner: Arc<CartInner>,
}

struct CartInner {
    storage: Arc<dyn Storage>,
    items: Mutex<Vec<CartItem>>,
}

impl CartStore {
    /// Create the store, loading any previously persisted cart.
    #[must_use]
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        let items = match storage.load(CART_KEY) {
            Ok(Some(raw)) => serde_json::from_str(&raw).unwrap_or_else(|e| {
                tracing::warn!(error = %e, "Discarding unreadable cart");
                Vec::new()
            }),
            Ok(None) => Vec::new(),
            Err(e) => {
                tracing::warn!(error = %e, "Failed to load cart, starting empty");
                Vec::new()
            }
        };

        Self {
            inner: Arc::new(CartInner {
                storage,
                items: Mutex::new(items),
            }),
        }
    }

    /// Add `quantity` of `product` to the cart, merging with an existing
    /// line for the same product. Zero is treated as one; a merged line
    /// saturates at `u32::MAX` rather than wrapping.
    ///
    /// # Errors
    ///
    /// Returns an error if the updated cart cannot be persisted.
    pub fn add(&self, product: &Product, quantity: u32) -> Result<(), StoreError> {
        let quantity = quantity.max(1);
        let mut items = self.lock_items();

        if let Some(line) = items.iter_mut().find(|line| line.id == product.id) {
            line.quantity = line.quantity.saturating_add(quantity);
        } else {
            items.push(CartItem {
                id: product.id.clone(),
                name: product.name.clone(),
                price: product.price,
                image: product.image.clone(),
                quantity,
            });
        }

        self.persist(&items)
    }

    /// Set the quantity of an existing line. Zero removes the line;
    /// unknown ids are ignored.
    ///
    /// # Errors
    ///
    /// Returns an error if the updated cart cannot be persisted.
    pub fn set_quantity(&self, id: &ProductId, quantity: u32) -> Result<(), StoreError> {
        let mut items = self.lock_items();

        if quantity == 0 {
            items.retain(|line| &line.id != id);
        } else if let Some(line) = items.iter_mut().find(|line| &line.id == id) {
            line.quantity = quantity;
        } else {
            return Ok(());
        }

        self.persist(&items)
    }

    /// Remove a line from the cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the updated cart cannot be persisted.
    pub fn remove(&self, id: &ProductId) -> Result<(), StoreError> {
        let mut items = self.lock_items();
        let before = items.len();
        items.retain(|line| &line.id != id);
        if items.len() == before {
            return Ok(());
        }
        self.persist(&items)
    }

    /// Empty the cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the emptied cart cannot be persisted.
    pub fn clear(&self) -> Result<(), StoreError> {
        let mut items = self.lock_items();
        items.clear();
        self.persist(&items)
    }

    /// Snapshot of the current lines.
    #[must_use]
    pub fn items(&self) -> Vec<CartItem> {
        self.lock_items().clone()
    }

    /// Sum of all line totals.
    #[must_use]
    pub fn total(&self) -> Decimal {
        self.lock_items().iter().map(CartItem::line_total).sum()
    }

    /// Total number of units across all lines, saturating at `u32::MAX`.
    #[must_use]
    pub fn count(&self) -> u32 {
        self.lock_items()
            .iter()
            .fold(0, |sum, line| sum.saturating_add(line.quantity))
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock_items().is_empty()
    }

    fn persist(&self, items: &[CartItem]) -> Result<(), StoreError> {
        let raw = serde_json::to_string(items)?;
        self.inner.storage.store(CART_KEY, &raw)
    }

    fn lock_items(&self) -> MutexGuard<'_, Vec<CartItem>> {
        self.inner
            .items
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}
