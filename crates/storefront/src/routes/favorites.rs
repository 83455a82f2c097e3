//! Favorites page and toggle handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::{Path, State};
use meada_core::ProductId;
use tracing::instrument;

use super::catalog::ProductCardView;
use crate::catalog::FETCH_ERROR_MESSAGE;
use crate::filters;
use crate::state::AppState;

/// Favorites page template.
#[derive(Template, WebTemplate)]
#[template(path = "favorites/show.html")]
pub struct FavoritesShowTemplate {
    pub products: Vec<ProductCardView>,
    pub error: Option<&'static str>,
}

/// The slice of product card data the favorite button needs.
///
/// The fragment template also renders against full product cards, so the
/// field names match [`ProductCardView`].
#[derive(Debug, Clone)]
pub struct FavoriteMarker {
    pub id: String,
    pub favorited: bool,
}

/// Favorite button fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/favorite_button.html")]
pub struct FavoriteButtonTemplate {
    pub card: FavoriteMarker,
}

/// Display the favorites page.
///
/// The favorites store only keeps ids, so the page fetches the full
/// product list and keeps the favorited ones.
#[instrument(skip(state))]
pub async fn show(State(state): State<AppState>) -> FavoritesShowTemplate {
    match state.api().list_products(None).await {
        Ok(products) => FavoritesShowTemplate {
            products: products
                .iter()
                .filter(|product| state.favorites().is_favorite(&product.id))
                .map(|product| ProductCardView::new(product, state.favorites()))
                .collect(),
            error: None,
        },
        Err(e) => {
            tracing::error!(error = %e, "Failed to load products for favorites page");
            FavoritesShowTemplate {
                products: Vec::new(),
                error: Some(FETCH_ERROR_MESSAGE),
            }
        }
    }
}

/// Flip the favorite state of a product (HTMX).
///
/// Always answers with the button in its current state; a persistence
/// failure is logged and the button simply reflects whatever the store
/// still holds.
#[instrument(skip(state))]
pub async fn toggle(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> FavoriteButtonTemplate {
    let id = ProductId::from(id);

    let favorited = match state.favorites().toggle(&id) {
        Ok(favorited) => favorited,
        Err(e) => {
            tracing::error!(error = %e, product_id = %id, "Failed to persist favorites");
            state.favorites().is_favorite(&id)
        }
    };

    FavoriteButtonTemplate {
        card: FavoriteMarker {
            id: id.to_string(),
            favorited,
        },
    }
}
