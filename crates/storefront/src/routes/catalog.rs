//! Category page and product grid handlers.
//!
//! The category page renders a shell that pulls the grid fragment over
//! HTMX once loaded, so navigation between categories stays instant while
//! the products come in. Each grid request goes through the shared
//! [`crate::catalog::ProductFeed`], which discards stale responses when
//! the visitor has already moved on to another category.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::{Path, State};
use tracing::instrument;

use super::{category_label, format_brl};
use crate::api::types::Product;
use crate::filters;
use crate::state::AppState;
use crate::store::FavoritesStore;

/// Product card display data for templates.
#[derive(Debug, Clone)]
pub struct ProductCardView {
    pub id: String,
    pub name: String,
    pub price: String,
    pub image: Option<String>,
    pub favorited: bool,
    pub in_stock: bool,
}

impl ProductCardView {
    /// Build a card, marking it favorited according to the store.
    #[must_use]
    pub fn new(product: &Product, favorites: &FavoritesStore) -> Self {
        Self {
            id: product.id.to_string(),
            name: product.name.clone(),
            price: format_brl(&product.price),
            image: product.image.clone(),
            favorited: favorites.is_favorite(&product.id),
            in_stock: product.in_stock(),
        }
    }
}

/// Category page template (shell around the grid fragment).
#[derive(Template, WebTemplate)]
#[template(path = "catalog/show.html")]
pub struct CatalogShowTemplate {
    pub slug: String,
    pub label: String,
}

/// Product grid fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/product_grid.html")]
pub struct ProductGridTemplate {
    pub products: Vec<ProductCardView>,
    pub error: Option<&'static str>,
}

/// Display a category page.
#[instrument]
pub async fn show(Path(categoria): Path<String>) -> CatalogShowTemplate {
    CatalogShowTemplate {
        label: category_label(&categoria),
        slug: categoria,
    }
}

/// Fetch and render the product grid for a category (HTMX).
#[instrument(skip(state))]
pub async fn grid(
    State(state): State<AppState>,
    Path(categoria): Path<String>,
) -> ProductGridTemplate {
    let snapshot = state.feed().refresh(Some(&categoria)).await;

    ProductGridTemplate {
        products: snapshot
            .products
            .iter()
            .map(|product| ProductCardView::new(product, state.favorites()))
            .collect(),
        error: snapshot.error,
    }
}
