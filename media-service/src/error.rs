use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use log::error;
use serde_json::json;
use thiserror::Error;

use crate::provider::ProviderError;
use crate::signing::SigningError;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("{0}")]
    InvalidRequest(String),

    #[error("{0}")]
    Upstream(String),

    #[error("{0}")]
    Configuration(String),

    #[error("{0}")]
    MethodNotAllowed(String),

    #[error("{0}")]
    Internal(String),
}

impl AppError {
    pub fn bad_request(message: String) -> Self {
        AppError::InvalidRequest(message)
    }

    pub fn upstream(message: String) -> Self {
        AppError::Upstream(message)
    }

    pub fn configuration(message: String) -> Self {
        AppError::Configuration(message)
    }

    pub fn method_not_allowed(message: String) -> Self {
        AppError::MethodNotAllowed(message)
    }

    pub fn internal_server_error(message: String) -> Self {
        AppError::Internal(message)
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            AppError::MethodNotAllowed(_) => StatusCode::METHOD_NOT_ALLOWED,
            AppError::Upstream(_) | AppError::Configuration(_) | AppError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Short machine-readable name sent as the `error` field.
    pub fn kind(&self) -> &'static str {
        match self {
            AppError::InvalidRequest(_) => "InvalidRequest",
            AppError::Upstream(_) => "UpstreamError",
            AppError::Configuration(_) => "ConfigurationError",
            AppError::MethodNotAllowed(_) => "MethodNotAllowed",
            AppError::Internal(_) => "InternalServerError",
        }
    }
}

impl From<SigningError> for AppError {
    fn from(err: SigningError) -> Self {
        AppError::InvalidRequest(err.to_string())
    }
}

impl From<ProviderError> for AppError {
    fn from(err: ProviderError) -> Self {
        AppError::Upstream(err.to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!("Request failed with {}: {}", self.kind(), self);
        }
        let body = Json(json!({
            "error": self.kind(),
            "message": self.to_string(),
        }));
        (status, body).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
