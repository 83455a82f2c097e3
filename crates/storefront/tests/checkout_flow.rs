//! Integration tests for the checkout flow: validation, submission and
//! the cart's fate on each outcome.

#![allow(clippy::unwrap_used)]

use std::sync::Arc;

use httpmock::prelude::*;
use meada_storefront::api::ApiClient;
use meada_storefront::api::types::Product;
use meada_storefront::checkout::{self, CheckoutError, CheckoutForm, ValidationError};
use meada_storefront::config::ApiConfig;
use meada_storefront::store::{CartStore, JsonFileStorage, Storage};
use rust_decimal::Decimal;
use serde_json::json;

fn api(server: &MockServer) -> ApiClient {
    ApiClient::new(&ApiConfig {
        base_url: server.base_url(),
        token: None,
    })
    .unwrap()
}

fn file_cart(dir: &std::path::Path) -> CartStore {
    let storage: Arc<dyn Storage> = Arc::new(JsonFileStorage::new(dir).unwrap());
    CartStore::new(storage)
}

fn product(id: &str, cents: i64) -> Product {
    serde_json::from_value(json!({
        "id": id,
        "nome": format!("Produto {id}"),
        "preco": Decimal::new(cents, 2).to_string(),
    }))
    .unwrap()
}

fn valid_form() -> CheckoutForm {
    CheckoutForm {
        nome: "Ana Souza".to_owned(),
        telefone: "11 91234-5678".to_owned(),
        forma_pagamento: "pix".to_owned(),
        ..CheckoutForm::default()
    }
}

#[tokio::test]
async fn successful_order_clears_the_cart() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST).path("/pedidos").json_body(json!({
                "produtos": [{"produtoId": "p1", "quantidade": 2}],
                "total": "59.60",
                "enderecoEntrega": null,
                "cliente": {"nome": "Ana Souza", "telefone": "11 91234-5678"},
                "formaPagamento": "pix"
            }));
            then.status(201).json_body(json!({"id": "ped_1"}));
        })
        .await;

    let dir = tempfile::tempdir().unwrap();
    let cart = file_cart(dir.path());
    cart.add(&product("p1", 2980), 2).unwrap();

    let created = checkout::place_order(&api(&server), &cart, &valid_form())
        .await
        .unwrap();

    mock.assert_async().await;
    assert_eq!(created.id.as_str(), "ped_1");
    assert!(cart.is_empty());

    // The cleared cart was persisted, not just dropped from memory.
    let reloaded = file_cart(dir.path());
    assert!(reloaded.is_empty());
}

#[tokio::test]
async fn failed_submission_leaves_the_cart_intact() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/pedidos");
            then.status(500).body("boom");
        })
        .await;

    let dir = tempfile::tempdir().unwrap();
    let cart = file_cart(dir.path());
    cart.add(&product("p1", 2980), 2).unwrap();

    let result = checkout::place_order(&api(&server), &cart, &valid_form()).await;

    assert!(matches!(result, Err(CheckoutError::Submit(_))));
    assert_eq!(cart.count(), 2);

    let reloaded = file_cart(dir.path());
    assert_eq!(reloaded.count(), 2);
}

#[tokio::test]
async fn invalid_form_never_reaches_the_api() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST).path("/pedidos");
            then.status(201).json_body(json!({"id": "ped_1"}));
        })
        .await;

    let dir = tempfile::tempdir().unwrap();
    let cart = file_cart(dir.path());
    cart.add(&product("p1", 2980), 1).unwrap();

    let form = CheckoutForm {
        nome: String::new(),
        ..valid_form()
    };
    let result = checkout::place_order(&api(&server), &cart, &form).await;

    assert!(matches!(
        result,
        Err(CheckoutError::Validation(ValidationError::EmptyName))
    ));
    assert_eq!(cart.count(), 1);
    mock.assert_hits_async(0).await;
}

#[tokio::test]
async fn empty_cart_never_reaches_the_api() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST).path("/pedidos");
            then.status(201).json_body(json!({"id": "ped_1"}));
        })
        .await;

    let dir = tempfile::tempdir().unwrap();
    let cart = file_cart(dir.path());

    let result = checkout::place_order(&api(&server), &cart, &valid_form()).await;

    assert!(matches!(
        result,
        Err(CheckoutError::Validation(ValidationError::EmptyCart))
    ));
    mock.assert_hits_async(0).await;
}

#[tokio::test]
async fn delivery_order_carries_the_address() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST).path("/pedidos").json_body(json!({
                "produtos": [{"produtoId": "p1", "quantidade": 1}],
                "total": "29.80",
                "enderecoEntrega": {
                    "cep": "01310-100",
                    "rua": "Avenida Paulista",
                    "numero": "1000",
                    "bairro": "Bela Vista",
                    "cidade": "São Paulo",
                    "uf": "SP"
                },
                "cliente": {"nome": "Ana Souza", "telefone": "11 91234-5678"},
                "observacoes": "Entregar à tarde",
                "formaPagamento": "dinheiro"
            }));
            then.status(201).json_body(json!({"id": "ped_2"}));
        })
        .await;

    let dir = tempfile::tempdir().unwrap();
    let cart = file_cart(dir.path());
    cart.add(&product("p1", 2980), 1).unwrap();

    let form = CheckoutForm {
        entrega: Some("on".to_owned()),
        cep: "01310-100".to_owned(),
        rua: "Avenida Paulista".to_owned(),
        numero: "1000".to_owned(),
        bairro: "Bela Vista".to_owned(),
        cidade: "São Paulo".to_owned(),
        uf: "SP".to_owned(),
        observacoes: "Entregar à tarde".to_owned(),
        forma_pagamento: "dinheiro".to_owned(),
        ..valid_form()
    };

    let created = checkout::place_order(&api(&server), &cart, &form)
        .await
        .unwrap();

    mock.assert_async().await;
    assert_eq!(created.id.as_str(), "ped_2");
    assert!(cart.is_empty());
}
