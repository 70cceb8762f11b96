use poem_openapi::{payload::Json, ApiResponse, Object};
use serde::{Deserialize, Serialize};

use crate::types::dto::offers::OfferResponse;

/// Request model for ticket purchase
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct PurchaseRequest {
    /// ID of the offer to purchase
    pub offer_id: i32,
}

/// Response model for a completed purchase
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct PurchaseReceipt {
    /// Always "purchased"
    pub status: String,

    /// ID of the created ticket
    pub ticket_id: i32,

    /// Absolute URL of the ticket's QR code image
    pub qr_code_url: String,

    /// The string encoded in the QR code
    pub final_key: String,

    /// Name of the purchased offer
    pub offer: String,
}

/// API response for the purchase endpoint
#[derive(ApiResponse)]
pub enum PurchaseCreated {
    /// Ticket created
    #[oai(status = 201)]
    Created(Json<PurchaseReceipt>),
}

/// A ticket as seen by its owner
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct TicketResponse {
    /// Ticket ID
    pub id: i32,

    /// The purchased offer
    pub offer: OfferResponse,

    /// Purchase time (Unix timestamp)
    pub purchase_date: i64,

    /// Absolute URL of the QR code image
    pub qr_code_url: String,

    /// Whether the ticket has been validated at the gate
    pub is_used: bool,

    /// The string encoded in the QR code
    pub final_key: String,
}

/// Identifying info about a ticket's owner, for admin views
#[derive(Object, Debug, Clone, Serialize, Deserialize)]
pub struct TicketOwner {
    /// User ID (UUID)
    pub id: String,

    /// Username
    pub username: String,

    /// Email address
    pub email: String,

    /// First name
    pub first_name: String,

    /// Last name
    pub last_name: String,
}

impl From<crate::types::db::user::Model> for TicketOwner {
    fn from(u: crate::types::db::user::Model) -> Self {
        Self {
            id: u.id,
            username: u.username,
            email: u.email,
            first_name: u.first_name,
            last_name: u.last_name,
        }
    }
}

/// A ticket with owner and offer details, for the admin listing
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct AdminTicketResponse {
    /// Ticket ID
    pub id: i32,

    /// The owning user
    pub user: TicketOwner,

    /// The purchased offer
    pub offer: OfferResponse,

    /// Purchase time (Unix timestamp)
    pub purchase_date: i64,

    /// Whether the ticket has been validated at the gate
    pub is_used: bool,

    /// The string encoded in the QR code
    pub final_key: String,

    /// Absolute URL of the QR code image
    pub qr_code_url: String,
}

/// Response model for ticket validation
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct ValidateResponse {
    /// Success message
    pub message: String,

    /// ID of the validated ticket
    pub ticket_id: i32,

    /// The ticket's owner
    pub user: TicketOwner,

    /// The purchased offer
    pub offer: OfferResponse,
}

/// Request model for final-key lookup
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct VerifyTicketRequest {
    /// Final key scanned from a QR code
    pub final_key: String,
}

/// Response model for final-key lookup; read-only, never mutates the ticket
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct VerifyTicketResponse {
    /// ID of the matching ticket
    pub ticket_id: i32,

    /// Whether the ticket has already been validated
    pub is_used: bool,

    /// The ticket's owner
    pub user: TicketOwner,

    /// The purchased offer
    pub offer: OfferResponse,
}
