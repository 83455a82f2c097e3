//! Cart route handlers.
//!
//! Cart operations use HTMX for dynamic updates without full page reloads.
//! Adding to the cart refetches the product from the API so the stored
//! line always carries a server-side price snapshot.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    http::StatusCode,
    response::{AppendHeaders, Html, IntoResponse, Response},
};
use meada_core::ProductId;
use serde::Deserialize;
use tracing::instrument;

use super::format_brl;
use crate::filters;
use crate::state::AppState;
use crate::store::{CartItem, CartStore};

/// Cart line display data for templates.
#[derive(Debug, Clone)]
pub struct CartItemView {
    pub id: String,
    pub name: String,
    pub price: String,
    pub line_total: String,
    pub image: Option<String>,
    pub quantity: u32,
}

impl From<&CartItem> for CartItemView {
    fn from(line: &CartItem) -> Self {
        Self {
            id: line.id.to_string(),
            name: line.name.clone(),
            price: format_brl(&line.price),
            line_total: format_brl(&line.line_total()),
            image: line.image.clone(),
            quantity: line.quantity,
        }
    }
}

/// Cart display data for templates.
#[derive(Debug, Clone)]
pub struct CartView {
    pub items: Vec<CartItemView>,
    pub subtotal: String,
    pub count: u32,
}

impl From<&CartStore> for CartView {
    fn from(cart: &CartStore) -> Self {
        Self {
            items: cart.items().iter().map(CartItemView::from).collect(),
            subtotal: format_brl(&cart.total()),
            count: cart.count(),
        }
    }
}

/// Add to cart form data.
#[derive(Debug, Deserialize)]
pub struct AddToCartForm {
    pub produto_id: String,
    pub quantidade: Option<u32>,
}

/// Update cart form data.
#[derive(Debug, Deserialize)]
pub struct UpdateCartForm {
    pub produto_id: String,
    pub quantidade: u32,
}

/// Remove from cart form data.
#[derive(Debug, Deserialize)]
pub struct RemoveFromCartForm {
    pub produto_id: String,
}

/// Cart page template.
#[derive(Template, WebTemplate)]
#[template(path = "cart/show.html")]
pub struct CartShowTemplate {
    pub cart: CartView,
}

/// Cart lines fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_items.html")]
pub struct CartItemsTemplate {
    pub cart: CartView,
}

/// Cart count badge fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_count.html")]
pub struct CartCountTemplate {
    pub count: u32,
}

/// Display the cart page.
#[instrument(skip(state))]
pub async fn show(State(state): State<AppState>) -> CartShowTemplate {
    CartShowTemplate {
        cart: CartView::from(state.cart()),
    }
}

/// Add a product to the cart (HTMX).
///
/// Returns the count badge plus an HTMX trigger so other cart widgets on
/// the page refresh themselves.
#[instrument(skip(state))]
pub async fn add(State(state): State<AppState>, Form(form): Form<AddToCartForm>) -> Response {
    let id = ProductId::from(form.produto_id);

    let product = match state.api().get_product(&id).await {
        Ok(product) => product,
        Err(e) => {
            tracing::error!(error = %e, product_id = %id, "Failed to fetch product for cart");
            return (
                StatusCode::BAD_GATEWAY,
                Html("<span class=\"form-error\">Não foi possível adicionar ao carrinho.</span>"),
            )
                .into_response();
        }
    };

    if let Err(e) = state.cart().add(&product, form.quantidade.unwrap_or(1)) {
        tracing::error!(error = %e, product_id = %id, "Failed to persist cart");
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Html("<span class=\"form-error\">Não foi possível adicionar ao carrinho.</span>"),
        )
            .into_response();
    }

    (
        AppendHeaders([("HX-Trigger", "cart-updated")]),
        CartCountTemplate {
            count: state.cart().count(),
        },
    )
        .into_response()
}

/// Update a line's quantity (HTMX). Quantity zero removes the line.
#[instrument(skip(state))]
pub async fn update(State(state): State<AppState>, Form(form): Form<UpdateCartForm>) -> Response {
    let id = ProductId::from(form.produto_id);

    if let Err(e) = state.cart().set_quantity(&id, form.quantidade) {
        tracing::error!(error = %e, product_id = %id, "Failed to persist cart");
    }

    (
        AppendHeaders([("HX-Trigger", "cart-updated")]),
        CartItemsTemplate {
            cart: CartView::from(state.cart()),
        },
    )
        .into_response()
}

/// Remove a line from the cart (HTMX).
#[instrument(skip(state))]
pub async fn remove(State(state): State<AppState>, Form(form): Form<RemoveFromCartForm>) -> Response {
    let id = ProductId::from(form.produto_id);

    if let Err(e) = state.cart().remove(&id) {
        tracing::error!(error = %e, product_id = %id, "Failed to persist cart");
    }

    (
        AppendHeaders([("HX-Trigger", "cart-updated")]),
        CartItemsTemplate {
            cart: CartView::from(state.cart()),
        },
    )
        .into_response()
}

/// Cart count badge (HTMX).
#[instrument(skip(state))]
pub async fn count(State(state): State<AppState>) -> CartCountTemplate {
    CartCountTemplate {
        count: state.cart().count(),
    }
}
