//! HTTP client for the Meada product and order API.
//!
//! Thin typed wrapper over `reqwest`: a small set of JSON verbs plus one
//! method per endpoint. Account operations attach the configured bearer
//! token; catalog and order endpoints are public.

use std::sync::Arc;

use meada_core::ProductId;
use reqwest::Method;
use reqwest::header::{ACCEPT, HeaderMap, HeaderValue};
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::instrument;

use super::types::{CreateOrder, CreatedOrder, DataEnvelope, Product, UpdateEmail, UpdatePassword};
use crate::config::ApiConfig;

/// Errors that can occur when talking to the Meada API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request never produced an HTTP response.
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The API responded with a non-success status.
    #[error("API error: {status} - {message}")]
    Http { status: u16, message: String },

    /// The requested resource does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// The response body could not be parsed.
    #[error("parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Client for the Meada API.
///
/// Cheaply cloneable via `Arc`; share one instance across handlers.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ApiClientInner>,
}

struct ApiClientInner {
    client: reqwest::Client,
    base_url: String,
    token: Option<SecretString>,
}

impl ApiClient {
    /// Create a new API client.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to build.
    pub fn new(config: &ApiConfig) -> Result<Self, ApiError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()?;

        Ok(Self {
            inner: Arc::new(ApiClientInner {
                client,
                base_url: config.base_url.clone(),
                token: config.token.clone(),
            }),
        })
    }

    // =========================================================================
    // Typed endpoints
    // =========================================================================

    /// List products, optionally filtered by category.
    ///
    /// Every call issues a fresh request; the storefront never caches
    /// product data.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response cannot be parsed.
    #[instrument(skip(self))]
    pub async fn list_products(&self, category: Option<&str>) -> Result<Vec<Product>, ApiError> {
        let query: Vec<(&str, &str)> = category.map(|c| ("categoria", c)).into_iter().collect();
        let envelope: DataEnvelope<Vec<Product>> = self.get("/produtos", &query).await?;
        Ok(envelope.data)
    }

    /// Fetch a single product by id.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::NotFound` for unknown ids.
    #[instrument(skip(self), fields(product_id = %id))]
    pub async fn get_product(&self, id: &ProductId) -> Result<Product, ApiError> {
        self.get(&format!("/produtos/{id}"), &[]).await
    }

    /// Create an order.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails; the caller decides whether to
    /// retry (nothing is persisted locally until this succeeds).
    #[instrument(skip(self, order), fields(item_count = order.items.len()))]
    pub async fn create_order(&self, order: &CreateOrder) -> Result<CreatedOrder, ApiError> {
        self.post("/pedidos", order, None).await
    }

    /// Update the account email, using the configured bearer token.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self, update))]
    pub async fn update_email(&self, update: &UpdateEmail) -> Result<(), ApiError> {
        self.patch("/users/email", update, self.account_token()).await
    }

    /// Update the account password, using the configured bearer token.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self, update))]
    pub async fn update_password(&self, update: &UpdatePassword) -> Result<(), ApiError> {
        self.patch("/users/password", update, self.account_token())
            .await
    }

    // =========================================================================
    // HTTP verbs
    // =========================================================================

    /// GET `path` and decode the JSON response.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the body cannot be parsed.
    pub async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<T, ApiError> {
        let response = self
            .send(Method::GET, path, query, None::<&()>, None)
            .await?;
        Self::decode(path, response).await
    }

    /// POST `body` as JSON to `path` and decode the JSON response.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the body cannot be parsed.
    pub async fn post<B, T>(
        &self,
        path: &str,
        body: &B,
        token: Option<&SecretString>,
    ) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let response = self
            .send(Method::POST, path, &[], Some(body), token)
            .await?;
        Self::decode(path, response).await
    }

    /// PATCH `body` as JSON to `path`, discarding any response body.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn patch<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
        token: Option<&SecretString>,
    ) -> Result<(), ApiError> {
        self.send(Method::PATCH, path, &[], Some(body), token)
            .await?;
        Ok(())
    }

    // =========================================================================
    // Internals
    // =========================================================================

    fn account_token(&self) -> Option<&SecretString> {
        self.inner.token.as_ref()
    }

    async fn send<B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, &str)],
        body: Option<&B>,
        token: Option<&SecretString>,
    ) -> Result<reqwest::Response, ApiError> {
        let url = format!("{}{path}", self.inner.base_url);

        let mut request = self.inner.client.request(method, &url);
        if !query.is_empty() {
            request = request.query(query);
        }
        if let Some(body) = body {
            request = request.json(body);
        }
        if let Some(token) = token {
            request = request.bearer_auth(token.expose_secret());
        }

        let response = request.send().await?;
        let status = response.status();

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(ApiError::NotFound(path.to_owned()));
        }

        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            tracing::error!(
                status = %status,
                path = %path,
                body = %message.chars().take(500).collect::<String>(),
                "Meada API returned non-success status"
            );
            return Err(ApiError::Http {
                status: status.as_u16(),
                message,
            });
        }

        Ok(response)
    }

    async fn decode<T: DeserializeOwned>(
        path: &str,
        response: reqwest::Response,
    ) -> Result<T, ApiError> {
        // Read the body as text first for better parse diagnostics
        let text = response.text().await?;
        serde_json::from_str(&text).map_err(|e| {
            tracing::error!(
                path = %path,
                error = %e,
                body = %text.chars().take(500).collect::<String>(),
                "Failed to parse Meada API response"
            );
            e.into()
        })
    }
}
