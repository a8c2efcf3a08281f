use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use thiserror::Error;
use validator::ValidationErrors;
use crate::models::ErrorResponse;

/// Errors surfaced by the HTTP layer
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Invalid {entity}: {source}")]
    Validation {
        entity: String,
        #[source]
        source: ValidationErrors,
    },

    #[error("Invalid JSON: {0}")]
    InvalidJson(String),

    #[error("Computation failed: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn validation(entity: impl Into<String>, source: ValidationErrors) -> Self {
        ApiError::Validation {
            entity: entity.into(),
            source,
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            ApiError::Validation { .. } => "validation_failed",
            ApiError::InvalidJson(_) => "invalid_json",
            ApiError::Internal(_) => "internal_error",
        }
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            _ => StatusCode::BAD_REQUEST,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(ErrorResponse {
            error: self.kind().to_string(),
            message: self.to_string(),
            status_code: self.status_code().as_u16(),
        })
    }
}
