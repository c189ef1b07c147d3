use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use async_graphql::ErrorExtensions;
use serde::Serialize;
use thiserror::Error;

use crate::models::domain::ModelId;

#[derive(Debug, Clone, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Model unavailable: {0}")]
    ModelUnavailable(String),

    #[error("Model failure: {0}")]
    ModelFailure(String),

    #[error("Internal server error: {0}")]
    InternalError(String),
}

impl AppError {
    fn error_code(&self) -> &'static str {
        match self {
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::ValidationError(_) => "VALIDATION_ERROR",
            AppError::BadRequest(_) => "BAD_REQUEST",
            AppError::ModelUnavailable(_) => "MODEL_UNAVAILABLE",
            AppError::ModelFailure(_) => "MODEL_FAILURE",
            AppError::InternalError(_) => "INTERNAL_ERROR",
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: u16,
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::ValidationError(_) => StatusCode::BAD_REQUEST,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::ModelUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::ModelFailure(_) => StatusCode::BAD_GATEWAY,
            AppError::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(ErrorResponse {
            error: self.to_string(),
            code: self.status_code().as_u16(),
        })
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        AppError::ValidationError(err.to_string())
    }
}

impl From<async_graphql::Error> for AppError {
    fn from(err: async_graphql::Error) -> Self {
        AppError::InternalError(err.message)
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::InternalError(format!("JSON serialization error: {}", err))
    }
}

impl From<ModelError> for AppError {
    fn from(err: ModelError) -> Self {
        if err.is_retryable() {
            AppError::ModelUnavailable(err.to_string())
        } else {
            AppError::ModelFailure(err.to_string())
        }
    }
}

impl ErrorExtensions for AppError {
    fn extend(&self) -> async_graphql::Error {
        async_graphql::Error::new(self.to_string()).extend_with(|_err, e| {
            e.set("code", self.error_code());
        })
    }
}

pub type AppResult<T> = Result<T, AppError>;

/// Message fragments that mark a model call failure as transient.
const RETRYABLE_SIGNATURES: &[&str] = &["429", "Too Many Requests", "quota", "503", "500"];

/// Transport wording for dropped connections and timeouts, matched case-insensitively.
const RETRYABLE_TRANSPORT_SIGNATURES: &[&str] = &[
    "econnreset",
    "connection reset",
    "etimedout",
    "timed out",
    "timeout",
];

/// Returns true when an error message carries a rate-limit, quota, server
/// overload, connection-reset or timeout signature.
pub fn is_retryable_message(message: &str) -> bool {
    if RETRYABLE_SIGNATURES.iter().any(|sig| message.contains(sig)) {
        return true;
    }
    let lowered = message.to_lowercase();
    RETRYABLE_TRANSPORT_SIGNATURES
        .iter()
        .any(|sig| lowered.contains(sig))
}

/// Failure of a single structured-output call against one model.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    #[error("Unknown model: {0}")]
    UnknownModel(String),

    #[error("Model {model} request failed: {message}")]
    Request { model: ModelId, message: String },

    #[error("Model {model} returned an empty response")]
    EmptyResponse { model: ModelId },

    #[error("Model {model} returned output that does not match the schema: {message}")]
    SchemaViolation { model: ModelId, message: String },
}

impl ModelError {
    pub fn is_retryable(&self) -> bool {
        match self {
            ModelError::Request { message, .. } => is_retryable_message(message),
            _ => false,
        }
    }

    pub fn model(&self) -> Option<ModelId> {
        match self {
            ModelError::UnknownModel(_) => None,
            ModelError::Request { model, .. }
            | ModelError::EmptyResponse { model }
            | ModelError::SchemaViolation { model, .. } => Some(*model),
        }
    }
}
