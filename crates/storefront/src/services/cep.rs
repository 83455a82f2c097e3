//! ViaCEP postal-code lookup.
//!
//! ViaCEP answers `GET {base}/ws/{cep}/json/` with an address object, or
//! with `{"erro": true}` (HTTP 200) when the CEP does not exist. Malformed
//! CEPs never reach this client: [`CepClient::lookup`] takes an already
//! validated [`Cep`].

use std::time::Duration;

use meada_core::Cep;
use serde::{Deserialize, Deserializer};
use thiserror::Error;
use tracing::instrument;

/// Errors from a postal-code lookup.
#[derive(Debug, Error)]
pub enum CepLookupError {
    /// The request never produced an HTTP response.
    #[error("CEP service unreachable: {0}")]
    Http(#[from] reqwest::Error),

    /// The service responded with a non-success status.
    #[error("CEP service error: {status} - {message}")]
    Api { status: u16, message: String },

    /// The CEP is well formed but does not exist.
    #[error("CEP not found: {0}")]
    NotFound(String),
}

/// Address returned by a successful lookup. Fields the service omits
/// come back empty.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CepAddress {
    #[serde(default)]
    pub cep: String,
    #[serde(default, rename = "logradouro")]
    pub street: String,
    #[serde(default, rename = "complemento")]
    pub complement: String,
    #[serde(default, rename = "bairro")]
    pub neighborhood: String,
    #[serde(default, rename = "localidade")]
    pub city: String,
    #[serde(default)]
    pub uf: String,
}

#[derive(Debug, Deserialize)]
struct ViaCepResponse {
    #[serde(flatten)]
    address: CepAddress,
    #[serde(default, deserialize_with = "deserialize_erro")]
    erro: bool,
}

/// ViaCEP has served the marker both as `"erro": true` and `"erro": "true"`.
fn deserialize_erro<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Erro {
        Bool(bool),
        Text(String),
    }

    Ok(match Erro::deserialize(deserializer)? {
        Erro::Bool(b) => b,
        Erro::Text(s) => s == "true",
    })
}

/// Client for the ViaCEP lookup service.
#[derive(Debug, Clone)]
pub struct CepClient {
    client: reqwest::Client,
    base_url: String,
}

impl CepClient {
    /// Create a new client against `base_url` (e.g. `https://viacep.com.br`).
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to build.
    pub fn new(base_url: impl Into<String>) -> Result<Self, CepLookupError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }

    /// Look up the address for `cep`.
    ///
    /// # Errors
    ///
    /// Returns `CepLookupError::NotFound` for CEPs the service does not
    /// know, and transport or status errors otherwise.
    #[instrument(skip(self), fields(cep = %cep))]
    pub async fn lookup(&self, cep: &Cep) -> Result<CepAddress, CepLookupError> {
        let url = format!("{}/ws/{}/json/", self.base_url, cep.as_str());

        let response = self.client.get(&url).send().await?;
        let status = response.status();

        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            tracing::warn!(status = %status, "CEP lookup failed");
            return Err(CepLookupError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body: ViaCepResponse = response.json().await?;
        if body.erro {
            return Err(CepLookupError::NotFound(cep.formatted()));
        }

        tracing::debug!(city = %body.address.city, "CEP lookup succeeded");
        Ok(body.address)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn parses_a_full_address() {
        let body: ViaCepResponse = serde_json::from_str(
            r#"{
                "cep": "01310-100",
                "logradouro": "Avenida Paulista",
                "complemento": "de 612 a 1510 - lado par",
                "bairro": "Bela Vista",
                "localidade": "São Paulo",
                "uf": "SP"
            }"#,
        )
        .unwrap();

        assert!(!body.erro);
        assert_eq!(body.address.street, "Avenida Paulista");
        assert_eq!(body.address.neighborhood, "Bela Vista");
        assert_eq!(body.address.city, "São Paulo");
        assert_eq!(body.address.uf, "SP");
    }

    #[test]
    fn parses_the_error_marker_as_bool_or_string() {
        let body: ViaCepResponse = serde_json::from_str(r#"{"erro": true}"#).unwrap();
        assert!(body.erro);

        let body: ViaCepResponse = serde_json::from_str(r#"{"erro": "true"}"#).unwrap();
        assert!(body.erro);
    }

    #[test]
    fn missing_fields_default_to_empty() {
        let body: ViaCepResponse = serde_json::from_str(r#"{"localidade": "Campinas"}"#).unwrap();
        assert_eq!(body.address.city, "Campinas");
        assert!(body.address.street.is_empty());
        assert!(!body.erro);
    }
}
