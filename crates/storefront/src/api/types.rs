//! Wire types for the Meada API.

use chrono::{DateTime, Utc};
use meada_core::{Cep, Email, OrderId, PaymentMethod, ProductId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Wrapper for endpoints that nest their payload under a `data` field.
///
/// The product listing responds with `{"data": [...]}`.
#[derive(Debug, Deserialize)]
pub struct DataEnvelope<T> {
    pub data: T,
}

/// A product as returned by the API.
///
/// Products are immutable once fetched; all mutation happens server-side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    #[serde(rename = "nome")]
    pub name: String,
    #[serde(rename = "descricao", default)]
    pub description: Option<String>,
    #[serde(rename = "preco")]
    pub price: Decimal,
    #[serde(rename = "imagem", default)]
    pub image: Option<String>,
    #[serde(rename = "tamanho", default)]
    pub size: Option<String>,
    #[serde(rename = "cor", default)]
    pub color: Option<String>,
    #[serde(rename = "numero", default)]
    pub number: Option<String>,
    #[serde(rename = "categoria", default)]
    pub category: Option<String>,
    #[serde(rename = "quantidade", default)]
    pub quantity: Option<i32>,
    #[serde(rename = "estoque", default)]
    pub stock: Option<i32>,
    #[serde(rename = "estoqueMinimo", default)]
    pub minimum_stock: Option<i32>,
    #[serde(rename = "createdAt", default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(rename = "updatedAt", default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Product {
    /// Whether the product can currently be sold.
    ///
    /// Products without stock tracking are always available.
    #[must_use]
    pub fn in_stock(&self) -> bool {
        self.stock.is_none_or(|stock| stock > 0)
    }
}

/// One line of an order: which product and how many.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderItem {
    #[serde(rename = "produtoId")]
    pub product_id: ProductId,
    #[serde(rename = "quantidade")]
    pub quantity: u32,
}

/// Delivery address block of an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryAddress {
    pub cep: Cep,
    #[serde(rename = "rua")]
    pub street: String,
    #[serde(rename = "numero")]
    pub number: String,
    #[serde(rename = "bairro")]
    pub neighborhood: String,
    #[serde(rename = "cidade")]
    pub city: String,
    pub uf: String,
    #[serde(rename = "complemento", default, skip_serializing_if = "Option::is_none")]
    pub complement: Option<String>,
}

/// Customer contact block of an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    #[serde(rename = "nome")]
    pub name: String,
    #[serde(rename = "telefone")]
    pub phone: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<Email>,
}

/// Payload for creating an order.
///
/// `delivery_address` is `null` for pickup orders; `total` is derived from
/// the item lines at assembly time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateOrder {
    #[serde(rename = "produtos")]
    pub items: Vec<OrderItem>,
    pub total: Decimal,
    #[serde(rename = "enderecoEntrega")]
    pub delivery_address: Option<DeliveryAddress>,
    #[serde(rename = "cliente")]
    pub customer: Customer,
    #[serde(rename = "observacoes", default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(rename = "formaPagamento")]
    pub payment_method: PaymentMethod,
}

/// Response from the order creation endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct CreatedOrder {
    pub id: OrderId,
}

/// Payload for updating the account email.
#[derive(Debug, Clone, Serialize)]
pub struct UpdateEmail {
    pub email: Email,
}

/// Payload for updating the account password.
#[derive(Debug, Clone, Serialize)]
pub struct UpdatePassword {
    pub password: String,
}
