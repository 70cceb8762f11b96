use poem_openapi::{payload::Json, ApiResponse};

use crate::errors::guard::GuardError;
use crate::types::dto::common::ErrorResponse;

/// Offer administration error types
#[derive(ApiResponse, Debug)]
pub enum OfferError {
    /// No offer with the given id
    #[oai(status = 404)]
    NotFound(Json<ErrorResponse>),

    /// Offer still has tickets referencing it
    #[oai(status = 400)]
    TicketsExist(Json<ErrorResponse>),

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

impl OfferError {
    /// Create a NotFound error
    pub fn not_found() -> Self {
        OfferError::NotFound(Json(ErrorResponse {
            error: "offer_not_found".to_string(),
            message: "Offer not found".to_string(),
            status_code: 404,
        }))
    }

    /// Create a TicketsExist error
    pub fn tickets_exist() -> Self {
        OfferError::TicketsExist(Json(ErrorResponse {
            error: "offer_has_tickets".to_string(),
            message: "Offer cannot be deleted while tickets reference it".to_string(),
            status_code: 400,
        }))
    }

    /// Create an InvalidToken error
    pub fn invalid_token() -> Self {
        OfferError::InvalidToken(Json(ErrorResponse {
            error: "invalid_token".to_string(),
            message: "Invalid or malformed JWT".to_string(),
            status_code: 401,
        }))
    }

    /// Create an ExpiredToken error
    pub fn expired_token() -> Self {
        OfferError::ExpiredToken(Json(ErrorResponse {
            error: "expired_token".to_string(),
            message: "JWT has expired".to_string(),
            status_code: 401,
        }))
    }

    /// Create a Forbidden error
    pub fn forbidden() -> Self {
        OfferError::Forbidden(Json(ErrorResponse {
            error: "forbidden".to_string(),
            message: "Staff privileges required".to_string(),
            status_code: 403,
        }))
    }

    /// Create an InternalError
    pub fn internal_error(message: String) -> Self {
        OfferError::InternalError(Json(ErrorResponse {
            error: "internal_error".to_string(),
            message,
            status_code: 500,
        }))
    }
}

impl From<GuardError> for OfferError {
    fn from(err: GuardError) -> Self {
        match err {
            GuardError::InvalidToken | GuardError::UnknownUser => OfferError::invalid_token(),
            GuardError::ExpiredToken => OfferError::expired_token(),
            GuardError::NotStaff => OfferError::forbidden(),
            GuardError::Database(msg) => OfferError::internal_error(msg),
        }
    }
}
