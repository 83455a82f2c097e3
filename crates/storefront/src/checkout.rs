//! Checkout: form validation, order assembly and submission.
//!
//! Validation is pure and happens entirely before any network call; the
//! order only reaches the API once every field checks out. On success the
//! cart is cleared; on failure it is left untouched so the visitor can fix
//! the form and resubmit.

use meada_core::{Cep, CepError, Email, EmailError, PaymentMethod};
use serde::Deserialize;
use thiserror::Error;

use crate::api::types::{CreateOrder, CreatedOrder, Customer, DeliveryAddress, OrderItem};
use crate::api::{ApiClient, ApiError};
use crate::store::{CartItem, CartStore};

/// Message shown when order submission fails after a valid form.
pub const SUBMIT_ERROR_MESSAGE: &str = "Não foi possível concluir o pedido. Tente novamente.";

/// A checkout form that failed validation. `Display` is the message shown
/// next to the form, so every variant reads as visitor-facing Portuguese.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Informe seu nome completo.")]
    EmptyName,

    #[error("Informe um telefone para contato.")]
    EmptyPhone,

    #[error("E-mail inválido.")]
    InvalidEmail(#[source] EmailError),

    #[error("Forma de pagamento inválida.")]
    InvalidPaymentMethod,

    #[error("CEP inválido.")]
    InvalidCep(#[source] CepError),

    #[error("Informe o endereço completo para entrega.")]
    IncompleteAddress,

    #[error("Seu carrinho está vazio.")]
    EmptyCart,
}

/// Raw checkout form, straight out of the request body.
#[derive(Debug, Clone, Deserialize)]
pub struct CheckoutForm {
    #[serde(default)]
    pub nome: String,
    #[serde(default)]
    pub telefone: String,
    #[serde(default)]
    pub email: String,
    /// Checkbox: present means home delivery, absent means pickup.
    #[serde(default)]
    pub entrega: Option<String>,
    #[serde(default)]
    pub cep: String,
    #[serde(default)]
    pub rua: String,
    #[serde(default)]
    pub numero: String,
    #[serde(default)]
    pub bairro: String,
    #[serde(default)]
    pub cidade: String,
    #[serde(default)]
    pub uf: String,
    #[serde(default)]
    pub complemento: String,
    #[serde(default)]
    pub observacoes: String,
    #[serde(default)]
    pub forma_pagamento: String,
}

impl Default for CheckoutForm {
    /// A blank form with Pix preselected, for the first render.
    fn default() -> Self {
        Self {
            nome: String::new(),
            telefone: String::new(),
            email: String::new(),
            entrega: None,
            cep: String::new(),
            rua: String::new(),
            numero: String::new(),
            bairro: String::new(),
            cidade: String::new(),
            uf: String::new(),
            complemento: String::new(),
            observacoes: String::new(),
            forma_pagamento: PaymentMethod::default().as_str().to_owned(),
        }
    }
}

impl CheckoutForm {
    /// Whether the visitor asked for home delivery.
    #[must_use]
    pub fn wants_delivery(&self) -> bool {
        self.entrega.is_some()
    }

    /// Whether `method` is the one currently selected on the form.
    #[must_use]
    pub fn pays_with(&self, method: &PaymentMethod) -> bool {
        self.forma_pagamento == method.as_str()
    }
}

/// A checkout form that passed validation.
#[derive(Debug, Clone)]
pub struct ValidatedCheckout {
    pub customer: Customer,
    /// `None` means pickup at the atelier.
    pub address: Option<DeliveryAddress>,
    pub notes: Option<String>,
    pub payment_method: PaymentMethod,
}

/// Checkout failure: either the form is invalid or the API rejected the
/// order. Validation failures render inline; submission failures map to
/// [`SUBMIT_ERROR_MESSAGE`].
#[derive(Debug, Error)]
pub enum CheckoutError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("order submission failed: {0}")]
    Submit(#[from] ApiError),
}

/// Validate the raw form.
///
/// # Errors
///
/// Returns the first problem found, in the order the fields appear on the
/// page.
pub fn validate(form: &CheckoutForm) -> Result<ValidatedCheckout, ValidationError> {
    let name = form.nome.trim();
    if name.is_empty() {
        return Err(ValidationError::EmptyName);
    }

    let phone = form.telefone.trim();
    if phone.is_empty() {
        return Err(ValidationError::EmptyPhone);
    }

    let email = match form.email.trim() {
        "" => None,
        raw => Some(Email::parse(raw).map_err(ValidationError::InvalidEmail)?),
    };

    let payment_method = form
        .forma_pagamento
        .parse::<PaymentMethod>()
        .map_err(|_| ValidationError::InvalidPaymentMethod)?;

    let address = if form.wants_delivery() {
        Some(validate_address(form)?)
    } else {
        None
    };

    let notes = match form.observacoes.trim() {
        "" => None,
        raw => Some(raw.to_owned()),
    };

    Ok(ValidatedCheckout {
        customer: Customer {
            name: name.to_owned(),
            phone: phone.to_owned(),
            email,
        },
        address,
        notes,
        payment_method,
    })
}

fn validate_address(form: &CheckoutForm) -> Result<DeliveryAddress, ValidationError> {
    let cep = Cep::parse(&form.cep).map_err(ValidationError::InvalidCep)?;

    let street = form.rua.trim();
    let number = form.numero.trim();
    let neighborhood = form.bairro.trim();
    let city = form.cidade.trim();
    let uf = form.uf.trim();

    if [street, number, neighborhood, city, uf]
        .iter()
        .any(|field| field.is_empty())
    {
        return Err(ValidationError::IncompleteAddress);
    }

    let complement = match form.complemento.trim() {
        "" => None,
        raw => Some(raw.to_owned()),
    };

    Ok(DeliveryAddress {
        cep,
        street: street.to_owned(),
        number: number.to_owned(),
        neighborhood: neighborhood.to_owned(),
        city: city.to_owned(),
        uf: uf.to_owned(),
        complement,
    })
}

/// Assemble the order payload from a validated checkout and the cart lines.
/// The total is derived here, never taken from the client.
///
/// # Errors
///
/// Returns `ValidationError::EmptyCart` when there is nothing to order.
pub fn build_order(
    checkout: ValidatedCheckout,
    items: &[CartItem],
) -> Result<CreateOrder, ValidationError> {
    if items.is_empty() {
        return Err(ValidationError::EmptyCart);
    }

    let total = items.iter().map(CartItem::line_total).sum();
    let items = items
        .iter()
        .map(|line| OrderItem {
            product_id: line.id.clone(),
            quantity: line.quantity,
        })
        .collect();

    Ok(CreateOrder {
        items,
        total,
        delivery_address: checkout.address,
        customer: checkout.customer,
        notes: checkout.notes,
        payment_method: checkout.payment_method,
    })
}

/// Validate the form, submit the order and clear the cart on success.
///
/// # Errors
///
/// Returns a validation error without touching the network, or a submit
/// error leaving the cart intact.
pub async fn place_order(
    api: &ApiClient,
    cart: &CartStore,
    form: &CheckoutForm,
) -> Result<CreatedOrder, CheckoutError> {
    let checkout = validate(form)?;
    let order = build_order(checkout, &cart.items())?;

    let created = api.create_order(&order).await?;

    // The order exists upstream at this point. A failure to persist the
    // emptied cart must not turn the checkout into an error.
    if let Err(e) = cart.clear() {
        tracing::warn!(error = %e, order_id = %created.id, "Order placed but cart not cleared");
    }

    tracing::info!(order_id = %created.id, "Order placed");
    Ok(created)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    fn pickup_form() -> CheckoutForm {
        CheckoutForm {
            nome: "Ana Souza".to_owned(),
            telefone: "11 91234-5678".to_owned(),
            forma_pagamento: "pix".to_owned(),
            ..CheckoutForm::default()
        }
    }

    fn delivery_form() -> CheckoutForm {
        CheckoutForm {
            entrega: Some("on".to_owned()),
            cep: "01310-100".to_owned(),
            rua: "Avenida Paulista".to_owned(),
            numero: "1000".to_owned(),
            bairro: "Bela Vista".to_owned(),
            cidade: "São Paulo".to_owned(),
            uf: "SP".to_owned(),
            ..pickup_form()
        }
    }

    fn cart_line(id: &str, cents: i64, quantity: u32) -> CartItem {
        CartItem {
            id: id.into(),
            name: format!("Produto {id}"),
            price: Decimal::new(cents, 2),
            image: None,
            quantity,
        }
    }

    #[test]
    fn pickup_form_validates_without_address() {
        let checkout = validate(&pickup_form()).unwrap();

        assert!(checkout.address.is_none());
        assert_eq!(checkout.customer.name, "Ana Souza");
        assert_eq!(checkout.payment_method, PaymentMethod::Pix);
        assert!(checkout.notes.is_none());
    }

    #[test]
    fn delivery_form_validates_with_full_address() {
        let checkout = validate(&delivery_form()).unwrap();

        let address = checkout.address.unwrap();
        assert_eq!(address.cep.as_str(), "01310100");
        assert_eq!(address.city, "São Paulo");
        assert!(address.complement.is_none());
    }

    #[test]
    fn blank_name_is_rejected() {
        let form = CheckoutForm {
            nome: "   ".to_owned(),
            ..pickup_form()
        };
        assert!(matches!(validate(&form), Err(ValidationError::EmptyName)));
    }

    #[test]
    fn blank_phone_is_rejected() {
        let form = CheckoutForm {
            telefone: String::new(),
            ..pickup_form()
        };
        assert!(matches!(validate(&form), Err(ValidationError::EmptyPhone)));
    }

    #[test]
    fn empty_email_is_allowed_but_invalid_email_is_not() {
        let checkout = validate(&pickup_form()).unwrap();
        assert!(checkout.customer.email.is_none());

        let form = CheckoutForm {
            email: "sem-arroba".to_owned(),
            ..pickup_form()
        };
        assert!(matches!(
            validate(&form),
            Err(ValidationError::InvalidEmail(_))
        ));
    }

    #[test]
    fn unknown_payment_method_is_rejected() {
        let form = CheckoutForm {
            forma_pagamento: "cheque".to_owned(),
            ..pickup_form()
        };
        assert!(matches!(
            validate(&form),
            Err(ValidationError::InvalidPaymentMethod)
        ));
    }

    #[test]
    fn delivery_requires_a_valid_cep() {
        let form = CheckoutForm {
            cep: "123".to_owned(),
            ..delivery_form()
        };
        assert!(matches!(validate(&form), Err(ValidationError::InvalidCep(_))));
    }

    #[test]
    fn delivery_requires_every_address_field() {
        let form = CheckoutForm {
            cidade: String::new(),
            ..delivery_form()
        };
        assert!(matches!(
            validate(&form),
            Err(ValidationError::IncompleteAddress)
        ));
    }

    #[test]
    fn validation_messages_read_as_portuguese() {
        assert_eq!(
            ValidationError::EmptyName.to_string(),
            "Informe seu nome completo."
        );
        assert_eq!(
            ValidationError::EmptyCart.to_string(),
            "Seu carrinho está vazio."
        );
    }

    #[test]
    fn build_order_rejects_an_empty_cart() {
        let checkout = validate(&pickup_form()).unwrap();
        assert!(matches!(
            build_order(checkout, &[]),
            Err(ValidationError::EmptyCart)
        ));
    }

    #[test]
    fn build_order_derives_the_total_from_the_lines() {
        let checkout = validate(&pickup_form()).unwrap();
        let lines = [cart_line("p1", 2980, 2), cart_line("p2", 1500, 1)];

        let order = build_order(checkout, &lines).unwrap();

        assert_eq!(order.total, Decimal::new(7460, 2));
        assert_eq!(order.items.len(), 2);
        assert_eq!(order.items[0].quantity, 2);
        assert!(order.delivery_address.is_none());
    }

    #[test]
    fn build_order_keeps_the_delivery_address() {
        let checkout = validate(&delivery_form()).unwrap();
        let lines = [cart_line("p1", 2980, 1)];

        let order = build_order(checkout, &lines).unwrap();

        let address = order.delivery_address.unwrap();
        assert_eq!(address.uf, "SP");
    }
}
