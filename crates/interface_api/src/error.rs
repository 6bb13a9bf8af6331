//! API error handling

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use tracing::warn;

use domain_pool::PoolError;
use interface_ussd::UssdError;

/// API error types
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Internal server error: {0}")]
    Internal(String),

    #[error("Validation error: {0}")]
    Validation(String, Vec<String>),
}

impl ApiError {
    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::Validation(message.into(), Vec::new())
    }
}

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<String>>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_type, message, details) = match self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", msg, None),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "bad_request", msg, None),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, "conflict", msg, None),
            ApiError::Internal(msg) => {
                warn!(error = %msg, "internal error");
                (StatusCode::INTERNAL_SERVER_ERROR, "internal_error", msg, None)
            }
            ApiError::Validation(msg, details) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "validation_error",
                msg,
                (!details.is_empty()).then_some(details),
            ),
        };

        let body = ErrorResponse {
            error: error_type.to_string(),
            message,
            details,
        };

        (status, Json(body)).into_response()
    }
}

impl From<PoolError> for ApiError {
    fn from(err: PoolError) -> Self {
        if err.is_invalid_input() {
            return ApiError::validation(err.to_string());
        }
        match err {
            PoolError::UnknownMember(_) | PoolError::ClaimNotFound(_) => ApiError::NotFound(err.to_string()),
            PoolError::IllegalTransition(_) | PoolError::ConcurrentModification { .. } | PoolError::Claim(_) => {
                ApiError::Conflict(err.to_string())
            }
            PoolError::InvalidInput(_) => ApiError::validation(err.to_string()),
        }
    }
}

impl From<UssdError> for ApiError {
    fn from(err: UssdError) -> Self {
        match err {
            UssdError::UnknownMember(_) => ApiError::NotFound(err.to_string()),
            UssdError::InvalidSession(_) => ApiError::BadRequest(err.to_string()),
        }
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let details = errors
            .field_errors()
            .into_iter()
            .flat_map(|(field, errs)| {
                errs.iter().map(move |e| match &e.message {
                    Some(message) => format!("{field}: {message}"),
                    None => format!("{field}: {}", e.code),
                })
            })
            .collect();
        ApiError::Validation("request failed validation".to_string(), details)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain_claims::ClaimError;

    fn status_of(err: impl Into<ApiError>) -> StatusCode {
        err.into().into_response().status()
    }

    #[test]
    fn test_pool_error_statuses() {
        assert_eq!(status_of(PoolError::invalid_input("amount")), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(
            status_of(PoolError::Claim(ClaimError::invalid_input("description"))),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(status_of(PoolError::ClaimNotFound("x".into())), StatusCode::NOT_FOUND);
        assert_eq!(status_of(PoolError::UnknownMember("x".into())), StatusCode::NOT_FOUND);
        assert_eq!(status_of(PoolError::IllegalTransition("paid".into())), StatusCode::CONFLICT);
        assert_eq!(status_of(PoolError::ConcurrentModification { attempts: 8 }), StatusCode::CONFLICT);
    }

    #[test]
    fn test_ussd_error_statuses() {
        assert_eq!(status_of(UssdError::UnknownMember("x".into())), StatusCode::NOT_FOUND);
        assert_eq!(status_of(UssdError::InvalidSession("blank".into())), StatusCode::BAD_REQUEST);
    }
}
