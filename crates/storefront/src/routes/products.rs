//! Product detail handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::{Path, State};
use meada_core::ProductId;
use tracing::instrument;

use super::catalog::ProductCardView;
use crate::error::Result;
use crate::filters;
use crate::state::AppState;

/// Product detail page template.
#[derive(Template, WebTemplate)]
#[template(path = "products/show.html")]
pub struct ProductShowTemplate {
    pub card: ProductCardView,
    pub description: Option<String>,
    pub size: Option<String>,
    pub color: Option<String>,
    pub category: Option<String>,
}

/// Display a product page.
///
/// Unknown ids bubble up as a 404 through the API client's not-found
/// mapping.
#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<ProductShowTemplate> {
    let id = ProductId::from(id);
    let product = state.api().get_product(&id).await?;

    Ok(ProductShowTemplate {
        card: ProductCardView::new(&product, state.favorites()),
        description: product.description.clone(),
        size: product.size.clone(),
        color: product.color.clone(),
        category: product.category.clone(),
    })
}
