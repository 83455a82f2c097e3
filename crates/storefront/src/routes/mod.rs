//! HTTP route handlers for the storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                                   - Home page
//! GET  /health                             - Health check
//!
//! # Catalog
//! GET  /categorias/{categoria}             - Category page
//! GET  /categorias/{categoria}/produtos    - Product grid fragment (HTMX)
//! GET  /produtos/{id}                      - Product detail
//!
//! # Favorites (HTMX fragments)
//! GET  /favoritos                          - Favorites page
//! POST /favoritos/{id}                     - Toggle favorite (returns button fragment)
//!
//! # Cart (HTMX fragments)
//! GET  /carrinho                           - Cart page
//! POST /carrinho/adicionar                 - Add to cart (returns count, triggers cart-updated)
//! POST /carrinho/atualizar                 - Update quantity (returns cart_items fragment)
//! POST /carrinho/remover                   - Remove line (returns cart_items fragment)
//! GET  /carrinho/contagem                  - Cart count badge (fragment)
//!
//! # Checkout
//! GET  /checkout                           - Checkout form
//! POST /checkout                           - Place order
//! GET  /checkout/cep                       - Address lookup fragment (HTMX)
//! GET  /checkout/confirmacao/{id}          - Order confirmation
//!
//! # Account
//! GET  /conta                              - Account settings
//! POST /conta/email                        - Update email (returns result fragment)
//! POST /conta/senha                        - Update password (returns result fragment)
//! ```

pub mod account;
pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod favorites;
pub mod home;
pub mod products;

use axum::{
    Router,
    routing::{get, post},
};
use meada_core::Price;
use rust_decimal::Decimal;

use crate::state::AppState;

/// A category the storefront links to from the navigation.
#[derive(Debug, Clone, Copy)]
pub struct CategoryLink {
    pub slug: &'static str,
    pub label: &'static str,
}

/// Categories shown in the navigation, in display order.
pub const CATEGORIES: [CategoryLink; 2] = [
    CategoryLink {
        slug: "barbantes",
        label: "Barbantes",
    },
    CategoryLink {
        slug: "croches",
        label: "Crochês",
    },
];

/// Display label for a category slug. Unknown slugs fall back to the slug
/// itself so deep links to new categories still render.
#[must_use]
pub fn category_label(slug: &str) -> String {
    CATEGORIES
        .iter()
        .find(|category| category.slug == slug)
        .map_or_else(|| slug.to_owned(), |category| category.label.to_owned())
}

/// Format a decimal amount as a Brazilian price string.
pub(crate) fn format_brl(amount: &Decimal) -> String {
    Price::brl(*amount).display()
}

/// Create the catalog routes router.
pub fn catalog_routes() -> Router<AppState> {
    Router::new()
        .route("/{categoria}", get(catalog::show))
        .route("/{categoria}/produtos", get(catalog::grid))
}

/// Create the product routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new().route("/{id}", get(products::show))
}

/// Create the favorites routes router.
pub fn favorites_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(favorites::show))
        .route("/{id}", post(favorites::toggle))
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/adicionar", post(cart::add))
        .route("/atualizar", post(cart::update))
        .route("/remover", post(cart::remove))
        .route("/contagem", get(cart::count))
}

/// Create the checkout routes router.
pub fn checkout_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(checkout::show).post(checkout::submit))
        .route("/cep", get(checkout::cep_lookup))
        .route("/confirmacao/{id}", get(checkout::confirmation))
}

/// Create the account routes router.
pub fn account_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(account::show))
        .route("/email", post(account::update_email))
        .route("/senha", post(account::update_password))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(home::home))
        .nest("/categorias", catalog_routes())
        .nest("/produtos", product_routes())
        .nest("/favoritos", favorites_routes())
        .nest("/carrinho", cart_routes())
        .nest("/checkout", checkout_routes())
        .nest("/conta", account_routes())
}
