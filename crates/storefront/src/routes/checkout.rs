//! Checkout route handlers.
//!
//! The form posts as a regular page submission; only the CEP lookup runs
//! over HTMX, swapping prefilled address fields into the form. Validation
//! failures re-render the page with the submitted values intact.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, Query, State},
    response::{IntoResponse, Redirect, Response},
};
use meada_core::{Cep, PaymentMethod};
use serde::Deserialize;
use tracing::instrument;

use super::cart::CartView;
use crate::checkout::{self, CheckoutError, CheckoutForm, SUBMIT_ERROR_MESSAGE};
use crate::filters;
use crate::services::cep::CepLookupError;
use crate::state::AppState;

/// Checkout page template.
#[derive(Template, WebTemplate)]
#[template(path = "checkout/show.html")]
pub struct CheckoutShowTemplate {
    pub cart: CartView,
    pub form: CheckoutForm,
    pub error: Option<String>,
    pub payment_methods: &'static [PaymentMethod],
}

/// Address fields fragment template (for HTMX).
///
/// Field names mirror the form so the fragment can swap straight into it.
#[derive(Template, WebTemplate)]
#[template(path = "partials/address_fields.html")]
pub struct AddressFieldsTemplate {
    pub rua: String,
    pub numero: String,
    pub bairro: String,
    pub cidade: String,
    pub uf: String,
    pub complemento: String,
    pub cep_error: String,
}

impl AddressFieldsTemplate {
    fn empty_with_error(message: &str) -> Self {
        Self {
            rua: String::new(),
            numero: String::new(),
            bairro: String::new(),
            cidade: String::new(),
            uf: String::new(),
            complemento: String::new(),
            cep_error: message.to_owned(),
        }
    }
}

/// Order confirmation page template.
#[derive(Template, WebTemplate)]
#[template(path = "checkout/confirmation.html")]
pub struct ConfirmationTemplate {
    pub order_id: String,
}

/// CEP lookup query parameters.
#[derive(Debug, Deserialize)]
pub struct CepQuery {
    #[serde(default)]
    pub cep: String,
}

fn page(state: &AppState, form: CheckoutForm, error: Option<String>) -> CheckoutShowTemplate {
    CheckoutShowTemplate {
        cart: CartView::from(state.cart()),
        form,
        error,
        payment_methods: &PaymentMethod::ALL,
    }
}

/// Display the checkout form.
#[instrument(skip(state))]
pub async fn show(State(state): State<AppState>) -> Response {
    if state.cart().is_empty() {
        return Redirect::to("/carrinho").into_response();
    }

    page(&state, CheckoutForm::default(), None).into_response()
}

/// Place the order.
///
/// On success the cart is cleared and the visitor lands on the
/// confirmation page. On any failure the form is re-rendered with the
/// submitted values and an inline message; nothing in the cart changes.
#[instrument(skip(state, form))]
pub async fn submit(State(state): State<AppState>, Form(form): Form<CheckoutForm>) -> Response {
    match checkout::place_order(state.api(), state.cart(), &form).await {
        Ok(created) => {
            Redirect::to(&format!("/checkout/confirmacao/{}", created.id)).into_response()
        }
        Err(CheckoutError::Validation(e)) => {
            page(&state, form, Some(e.to_string())).into_response()
        }
        Err(CheckoutError::Submit(e)) => {
            tracing::error!(error = %e, "Order submission failed");
            sentry::capture_error(&e);
            page(&state, form, Some(SUBMIT_ERROR_MESSAGE.to_owned())).into_response()
        }
    }
}

/// Look up a CEP and return prefilled address fields (HTMX).
///
/// A malformed CEP is rejected locally and never reaches the lookup
/// service.
#[instrument(skip(state))]
pub async fn cep_lookup(
    State(state): State<AppState>,
    Query(query): Query<CepQuery>,
) -> AddressFieldsTemplate {
    let cep = match Cep::parse(&query.cep) {
        Ok(cep) => cep,
        Err(_) => return AddressFieldsTemplate::empty_with_error("CEP inválido."),
    };

    match state.cep().lookup(&cep).await {
        Ok(address) => AddressFieldsTemplate {
            rua: address.street,
            numero: String::new(),
            bairro: address.neighborhood,
            cidade: address.city,
            uf: address.uf,
            complemento: String::new(),
            cep_error: String::new(),
        },
        Err(CepLookupError::NotFound(_)) => {
            AddressFieldsTemplate::empty_with_error("CEP não encontrado.")
        }
        Err(e) => {
            tracing::warn!(error = %e, "CEP lookup failed");
            AddressFieldsTemplate::empty_with_error("Não foi possível consultar o CEP.")
        }
    }
}

/// Display the order confirmation page.
#[instrument]
pub async fn confirmation(Path(id): Path<String>) -> ConfirmationTemplate {
    ConfirmationTemplate { order_id: id }
}
