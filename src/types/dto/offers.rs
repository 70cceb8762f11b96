use poem_openapi::{payload::Json, ApiResponse, Enum, Object};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::db::offer::{self, OfferType};

/// Ticket offer category
#[derive(Enum, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[oai(rename_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum OfferKind {
    /// Admits one person
    Solo,
    /// Admits two people
    Duo,
    /// Admits four people
    Family,
}

impl From<OfferType> for OfferKind {
    fn from(t: OfferType) -> Self {
        match t {
            OfferType::Solo => OfferKind::Solo,
            OfferType::Duo => OfferKind::Duo,
            OfferType::Family => OfferKind::Family,
        }
    }
}

impl From<OfferKind> for OfferType {
    fn from(k: OfferKind) -> Self {
        match k {
            OfferKind::Solo => OfferType::Solo,
            OfferKind::Duo => OfferType::Duo,
            OfferKind::Family => OfferType::Family,
        }
    }
}

/// Public view of a ticket offer
#[derive(Object, Debug, Clone, Serialize, Deserialize)]
pub struct OfferResponse {
    /// Offer ID
    pub id: i32,

    /// Offer name
    pub name: String,

    /// Offer category
    pub offer_type: OfferKind,

    /// Offer description
    pub description: String,

    /// Price per ticket
    pub price: Decimal,

    /// Whether the offer is currently purchasable from the listing
    pub available: bool,

    /// Creation time (Unix timestamp)
    pub created_at: i64,

    /// Last modification time (Unix timestamp)
    pub updated_at: i64,
}

impl From<offer::Model> for OfferResponse {
    fn from(o: offer::Model) -> Self {
        Self {
            id: o.id,
            name: o.name,
            offer_type: o.offer_type.into(),
            description: o.description,
            price: o.price,
            available: o.available,
            created_at: o.created_at,
            updated_at: o.updated_at,
        }
    }
}

/// API response for offer creation
#[derive(ApiResponse)]
pub enum OfferCreated {
    /// Offer created
    #[oai(status = 201)]
    Created(Json<OfferResponse>),
}

/// Request model for offer creation
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct CreateOfferRequest {
    /// Offer name
    pub name: String,

    /// Offer category
    pub offer_type: OfferKind,

    /// Offer description
    pub description: String,

    /// Price per ticket
    pub price: Decimal,

    /// Initial availability (defaults to true)
    pub available: Option<bool>,
}

/// Request model for offer update; absent fields are left unchanged
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct UpdateOfferRequest {
    /// New offer name
    pub name: Option<String>,

    /// New offer category
    pub offer_type: Option<OfferKind>,

    /// New offer description
    pub description: Option<String>,

    /// New price per ticket
    pub price: Option<Decimal>,

    /// New availability flag
    pub available: Option<bool>,
}
