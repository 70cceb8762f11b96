use poem_openapi::{payload::Json, ApiResponse};

use crate::errors::guard::GuardError;
use crate::types::dto::common::ErrorResponse;

/// Reporting endpoint error types
#[derive(ApiResponse, Debug)]
pub enum AdminError {
    /// Invalid or malformed JWT
    #[oai(status = 401)]
    InvalidToken(Json<ErrorResponse>),

    /// JWT has expired
    #[oai(status = 401)]
    ExpiredToken(Json<ErrorResponse>),

    /// Caller lacks staff privileges
    #[oai(status = 403)]
    Forbidden(Json<ErrorResponse>),

    /// Internal server error
    #[oai(status = 500)]
    InternalError(Json<ErrorResponse>),
}

impl AdminError {
    /// Create an InvalidToken error
    pub fn invalid_token() -> Self {
        AdminError::InvalidToken(Json(ErrorResponse {
            error: "invalid_token".to_string(),
            message: "Invalid or malformed JWT".to_string(),
            status_code: 401,
        }))
    }

    /// Create an ExpiredToken error
    pub fn expired_token() -> Self {
        AdminError::ExpiredToken(Json(ErrorResponse {
            error: "expired_token".to_string(),
            message: "JWT has expired".to_string(),
            status_code: 401,
        }))
    }

    /// Create a Forbidden error
    pub fn forbidden() -> Self {
        AdminError::Forbidden(Json(ErrorResponse {
            error: "forbidden".to_string(),
            message: "Staff privileges required".to_string(),
            status_code: 403,
        }))
    }

    /// Create an InternalError with a generic message, details go to the log
    pub fn internal_error(message: String) -> Self {
        AdminError::InternalError(Json(ErrorResponse {
            error: "internal_error".to_string(),
            message,
            status_code: 500,
        }))
    }
}

impl From<GuardError> for AdminError {
    fn from(err: GuardError) -> Self {
        match err {
            GuardError::InvalidToken | GuardError::UnknownUser => AdminError::invalid_token(),
            GuardError::ExpiredToken => AdminError::expired_token(),
            GuardError::NotStaff => AdminError::forbidden(),
            GuardError::Database(msg) => AdminError::internal_error(msg),
        }
    }
}
