//! Application error types and HTTP response mapping.

use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use thiserror::Error;

use crate::api::ApiError;
use crate::store::StoreError;

/// Convenience alias for handler results.
pub type Result<T> = std::result::Result<T, AppError>;

/// Top-level application error.
///
/// Handlers bubble these up with `?`; the `IntoResponse` impl decides the
/// status code and the (deliberately vague) message shown to visitors.
#[derive(Debug, Error)]
pub enum AppError {
    /// Upstream Meada API failure.
    #[error("API error: {0}")]
    Api(#[from] ApiError),

    /// Local persistence failure.
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// The requested page or resource does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// The request was malformed.
    #[error("bad request: {0}")]
    BadRequest(String),

    /// Anything else.
    #[error("internal error: {0}")]
    Internal(String),
}

impl AppError {
    const fn status_code(&self) -> StatusCode {
        match self {
            Self::Api(ApiError::NotFound(_)) | Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Api(_) => StatusCode::BAD_GATEWAY,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Store(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message shown to visitors. Never leaks upstream details.
    const fn public_message(&self) -> &'static str {
        match self {
            Self::Api(ApiError::NotFound(_)) | Self::NotFound(_) => "Página não encontrada.",
            Self::Api(_) => "Falha ao comunicar com o serviço externo.",
            Self::BadRequest(_) => "Requisição inválida.",
            Self::Store(_) | Self::Internal(_) => "Erro interno no servidor.",
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
            sentry::capture_error(&self);
        } else {
            tracing::warn!(error = %self, status = %status, "Request rejected");
        }

        let body = format!(
            "<main class=\"error-page\"><h1>{}</h1><p>{}</p></main>",
            status.as_u16(),
            self.public_message()
        );

        (status, Html(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_not_found_maps_to_404() {
        let err = AppError::Api(ApiError::NotFound("/produtos/zzz".to_owned()));
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(err.public_message(), "Página não encontrada.");
    }

    #[test]
    fn api_failure_maps_to_bad_gateway() {
        let err = AppError::Api(ApiError::Http {
            status: 500,
            message: "boom".to_owned(),
        });
        assert_eq!(err.status_code(), StatusCode::BAD_GATEWAY);
        assert_eq!(err.public_message(), "Falha ao comunicar com o serviço externo.");
    }

    #[test]
    fn bad_request_maps_to_400() {
        let err = AppError::BadRequest("missing field".to_owned());
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn internal_maps_to_500() {
        let err = AppError::Internal("oops".to_owned());
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.public_message(), "Erro interno no servidor.");
    }

    #[test]
    fn display_includes_source() {
        let err = AppError::NotFound("/nada".to_owned());
        assert_eq!(err.to_string(), "not found: /nada");
    }
}
