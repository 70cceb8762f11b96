use poem_openapi::{payload::Json, ApiResponse};
use std::fmt;

use crate::errors::guard::GuardError;
use crate::types::dto::common::ErrorResponse;

/// Ticket purchase and validation error types
#[derive(ApiResponse, Debug)]
pub enum TicketError {
    /// No offer with the given id
    #[oai(status = 404)]
    OfferNotFound(Json<ErrorResponse>),

    /// No ticket with the given id or final key
    #[oai(status = 404)]
    TicketNotFound(Json<ErrorResponse>),

    /// Ticket has already been validated
    #[oai(status = 400)]
    AlreadyUsed(Json<ErrorResponse>),

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

impl TicketError {
    /// Create an OfferNotFound error
    pub fn offer_not_found() -> Self {
        TicketError::OfferNotFound(Json(ErrorResponse {
            error: "offer_not_found".to_string(),
            message: "Offer not found".to_string(),
            status_code: 404,
        }))
    }

    /// Create a TicketNotFound error
    pub fn ticket_not_found() -> Self {
        TicketError::TicketNotFound(Json(ErrorResponse {
            error: "ticket_not_found".to_string(),
            message: "Ticket not found".to_string(),
            status_code: 404,
        }))
    }

    /// Create an AlreadyUsed error
    pub fn already_used() -> Self {
        TicketError::AlreadyUsed(Json(ErrorResponse {
            error: "ticket_already_used".to_string(),
            message: "Ticket has already been used".to_string(),
            status_code: 400,
        }))
    }

    /// Create an InvalidToken error
    pub fn invalid_token() -> Self {
        TicketError::InvalidToken(Json(ErrorResponse {
            error: "invalid_token".to_string(),
            message: "Invalid or malformed JWT".to_string(),
            status_code: 401,
        }))
    }

    /// Create an ExpiredToken error
    pub fn expired_token() -> Self {
        TicketError::ExpiredToken(Json(ErrorResponse {
            error: "expired_token".to_string(),
            message: "JWT has expired".to_string(),
            status_code: 401,
        }))
    }

    /// Create a Forbidden error
    pub fn forbidden() -> Self {
        TicketError::Forbidden(Json(ErrorResponse {
            error: "forbidden".to_string(),
            message: "Staff privileges required".to_string(),
            status_code: 403,
        }))
    }

    /// Create an InternalError
    pub fn internal_error(message: String) -> Self {
        TicketError::InternalError(Json(ErrorResponse {
            error: "internal_error".to_string(),
            message,
            status_code: 500,
        }))
    }

    /// Get the error message from the error variant
    pub fn message(&self) -> String {
        match self {
            TicketError::OfferNotFound(json) => json.0.message.clone(),
            TicketError::TicketNotFound(json) => json.0.message.clone(),
            TicketError::AlreadyUsed(json) => json.0.message.clone(),
            TicketError::InvalidToken(json) => json.0.message.clone(),
            TicketError::ExpiredToken(json) => json.0.message.clone(),
            TicketError::Forbidden(json) => json.0.message.clone(),
            TicketError::InternalError(json) => json.0.message.clone(),
        }
    }
}

impl fmt::Display for TicketError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl From<GuardError> for TicketError {
    fn from(err: GuardError) -> Self {
        match err {
            GuardError::InvalidToken | GuardError::UnknownUser => TicketError::invalid_token(),
            GuardError::ExpiredToken => TicketError::expired_token(),
            GuardError::NotStaff => TicketError::forbidden(),
            GuardError::Database(msg) => TicketError::internal_error(msg),
        }
    }
}
