//! Integration tests for the shared product feed.

#![allow(clippy::unwrap_used)]

use httpmock::prelude::*;
use meada_storefront::api::ApiClient;
use meada_storefront::catalog::{FETCH_ERROR_MESSAGE, ProductFeed};
use meada_storefront::config::ApiConfig;
use serde_json::json;

fn feed(server: &MockServer) -> ProductFeed {
    let api = ApiClient::new(&ApiConfig {
        base_url: server.base_url(),
        token: None,
    })
    .unwrap();
    ProductFeed::new(api)
}

#[tokio::test]
async fn refresh_fills_the_snapshot() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/produtos")
                .query_param("categoria", "barbantes");
            then.status(200).json_body(json!({
                "data": [{"id": "p1", "nome": "Barbante cru 400g", "preco": "29.80"}]
            }));
        })
        .await;

    let feed = feed(&server);
    let snapshot = feed.refresh(Some("barbantes")).await;

    assert!(!snapshot.loading);
    assert!(snapshot.error.is_none());
    assert_eq!(snapshot.products.len(), 1);
    assert_eq!(snapshot.category.as_deref(), Some("barbantes"));

    // The stored state matches what refresh returned.
    let stored = feed.snapshot();
    assert_eq!(stored.products.len(), 1);
}

#[tokio::test]
async fn failed_refresh_reports_the_fixed_message() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/produtos");
            then.status(500).body("boom");
        })
        .await;

    let snapshot = feed(&server).refresh(Some("barbantes")).await;

    assert!(!snapshot.loading);
    assert_eq!(snapshot.error, Some(FETCH_ERROR_MESSAGE));
    assert!(snapshot.products.is_empty());
}

#[tokio::test]
async fn switching_categories_fetches_each_one() {
    let server = MockServer::start_async().await;
    let barbantes = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/produtos")
                .query_param("categoria", "barbantes");
            then.status(200).json_body(json!({
                "data": [{"id": "p1", "nome": "Barbante cru 400g", "preco": "29.80"}]
            }));
        })
        .await;
    let croches = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/produtos")
                .query_param("categoria", "croches");
            then.status(200).json_body(json!({
                "data": [{"id": "p2", "nome": "Touca de crochê", "preco": "45.00"}]
            }));
        })
        .await;

    let feed = feed(&server);

    let first = feed.refresh(Some("barbantes")).await;
    assert_eq!(first.products[0].name, "Barbante cru 400g");

    let second = feed.refresh(Some("croches")).await;
    assert_eq!(second.products[0].name, "Touca de crochê");
    assert_eq!(second.category.as_deref(), Some("croches"));

    barbantes.assert_hits_async(1).await;
    croches.assert_hits_async(1).await;
}

#[tokio::test]
async fn every_refresh_hits_the_api() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(GET).path("/produtos");
            then.status(200).json_body(json!({"data": []}));
        })
        .await;

    let feed = feed(&server);
    feed.refresh(None).await;
    feed.refresh(None).await;

    mock.assert_hits_async(2).await;
}
