//! Favorites list persisted under the `favorites` key.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use meada_core::ProductId;
use serde::{Deserialize, Serialize};

use super::{Storage, StoreError};

/// Storage key for the favorites list.
pub const FAVORITES_KEY: &str = "favorites";

/// One favorited product.
///
/// Kept as a struct rather than a bare id so the persisted shape can grow
/// fields without a migration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FavoriteItem {
    pub id: ProductId,
}

/// Visitor's favorites, rehydrated from storage at startup and written
/// through on every effective change.
#[derive(Clone)]
pub struct FavoritesStore {
    inner: Arc<FavoritesInner>,
}

struct FavoritesInner {
    storage: Arc<dyn Storage>,
    items: Mutex<Vec<FavoriteItem>>,
}

impl FavoritesStore {
    /// Create the store, loading any previously persisted list.
    ///
    /// A missing or unreadable list starts the store empty rather than
    /// failing; favorites are a convenience, not critical data.
    #[must_use]
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        let items = match storage.load(FAVORITES_KEY) {
            Ok(Some(raw)) => serde_json::from_str(&raw).unwrap_or_else(|e| {
                tracing::warn!(error = %e, "Discarding unreadable favorites list");
                Vec::new()
            }),
            Ok(None) => Vec::new(),
            Err(e) => {
                tracing::warn!(error = %e, "Failed to load favorites, starting empty");
                Vec::new()
            }
        };

        Self {
            inner: Arc::new(FavoritesInner {
                storage,
                items: Mutex::new(items),
            }),
        }
    }

    /// Add `id` to the favorites. Returns `true` if the list changed;
    /// adding an existing favorite is a no-op.
    ///
    /// # Errors
    ///
    /// Returns an error if the updated list cannot be persisted.
    pub fn add_item(&self, id: &ProductId) -> Result<bool, StoreError> {
        let mut items = self.lock_items();
        if items.iter().any(|item| &item.id == id) {
            return Ok(false);
        }
        items.push(FavoriteItem { id: id.clone() });
        self.persist(&items)?;
        Ok(true)
    }

    /// Remove `id` from the favorites. Returns `true` if the list changed;
    /// removing an absent id is a no-op.
    ///
    /// # Errors
    ///
    /// Returns an error if the updated list cannot be persisted.
    pub fn remove_item(&self, id: &ProductId) -> Result<bool, StoreError> {
        let mut items = self.lock_items();
        let before = items.len();
        items.retain(|item| &item.id != id);
        if items.len() == before {
            return Ok(false);
        }
        self.persist(&items)?;
        Ok(true)
    }

    /// Flip the favorite state of `id`, returning the new state.
    ///
    /// # Errors
    ///
    /// Returns an error if the updated list cannot be persisted.
    pub fn toggle(&self, id: &ProductId) -> Result<bool, StoreError> {
        if self.is_favorite(id) {
            self.remove_item(id)?;
            Ok(false)
        } else {
            self.add_item(id)?;
            Ok(true)
        }
    }

    /// Whether `id` is currently favorited. Read-only.
    #[must_use]
    pub fn is_favorite(&self, id: &ProductId) -> bool {
        self.lock_items().iter().any(|item| &item.id == id)
    }

    /// Snapshot of the current list.
    #[must_use]
    pub fn items(&self) -> Vec<FavoriteItem> {
        self.lock_items().clone()
    }

    fn persist(&self, items: &[FavoriteItem]) -> Result<(), StoreError> {
        let raw = serde_json::to_string(items)?;
        self.inner.storage.store(FAVORITES_KEY, &raw)
    }

    fn lock_items(&self) -> MutexGuard<'_, Vec<FavoriteItem>> {
        self.inner
            .items
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::super::MemoryStorage;
    use super::*;

    fn store() -> (Arc<MemoryStorage>, FavoritesStore) {
        let storage = Arc::new(MemoryStorage::new());
        let favorites = FavoritesStore::new(storage.clone());
        (storage, favorites)
    }

    #[test]
    fn add_is_idempotent() {
        let (_, favorites) = store();
        let id = ProductId::from("p1");

        assert!(favorites.add_item(&id).unwrap());
        assert!(!favorites.add_item(&id).unwrap());

        assert!(favorites.is_favorite(&id));
        assert_eq!(favorites.items().len(), 1);
    }

    #[test]
    fn remove_is_idempotent() {
        let (_, favorites) = store();
        let id = ProductId::from("p1");

        favorites.add_item(&id).unwrap();
        assert!(favorites.remove_item(&id).unwrap());
        assert!(!favorites.remove_item(&id).unwrap());
        assert!(!favorites.is_favorite(&id));
    }

    #[test]
    fn toggle_flips_state() {
        let (_, favorites) = store();
        let id = ProductId::from("p1");

        assert!(favorites.toggle(&id).unwrap());
        assert!(favorites.is_favorite(&id));
        assert!(!favorites.toggle(&id).unwrap());
        assert!(!favorites.is_favorite(&id));
    }

    #[test]
    fn list_survives_a_restart() {
        let storage = Arc::new(MemoryStorage::new());

        let favorites = FavoritesStore::new(storage.clone());
        favorites.add_item(&ProductId::from("p1")).unwrap();
        favorites.add_item(&ProductId::from("p2")).unwrap();
        favorites.remove_item(&ProductId::from("p1")).unwrap();
        drop(favorites);

        let reloaded = FavoritesStore::new(storage);
        assert!(!reloaded.is_favorite(&ProductId::from("p1")));
        assert!(reloaded.is_favorite(&ProductId::from("p2")));
    }

    #[test]
    fn corrupt_persisted_list_starts_empty() {
        let storage = Arc::new(MemoryStorage::new());
        storage.store(FAVORITES_KEY, "not json").unwrap();

        let favorites = FavoritesStore::new(storage);
        assert!(favorites.items().is_empty());
    }

    #[test]
    fn persisted_shape_is_a_json_list() {
        let (storage, favorites) = store();
        favorites.add_item(&ProductId::from("p1")).unwrap();

        let raw = storage.load(FAVORITES_KEY).unwrap().unwrap();
        assert_eq!(raw, "[{\"id\":\"p1\"}]");
    }
}
