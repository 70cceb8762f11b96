use poem_openapi::Object;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::dto::offers::{OfferKind, OfferResponse};

/// Running sales counter for one offer
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct OfferSalesStats {
    /// The offer these stats belong to
    pub offer: OfferResponse,

    /// Number of tickets sold
    pub sales_count: i32,

    /// Last counter update (Unix timestamp)
    pub last_updated: i64,
}

/// Dashboard row for a single offer
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct OfferDashboardRow {
    /// Offer ID
    pub offer_id: i32,

    /// Offer name
    pub name: String,

    /// Offer category
    pub offer_type: OfferKind,

    /// Tickets sold for this offer
    pub tickets_sold: i64,

    /// Tickets already validated for this offer
    pub tickets_used: i64,

    /// Revenue (price x tickets sold)
    pub revenue: Decimal,
}

/// Dashboard row aggregated over an offer category
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct TypeDashboardRow {
    /// Offer category
    pub offer_type: OfferKind,

    /// Tickets sold across offers of this category
    pub tickets_sold: i64,

    /// Revenue across offers of this category
    pub revenue: Decimal,
}

/// Aggregate sales dashboard, computed fresh per request
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct DashboardResponse {
    /// Total tickets sold
    pub total_tickets: i64,

    /// Tickets already validated
    pub used_tickets: i64,

    /// used/total as a percentage; 0 when no tickets exist
    pub usage_rate: f64,

    /// Per-offer breakdown
    pub by_offer: Vec<OfferDashboardRow>,

    /// Per-category breakdown
    pub by_type: Vec<TypeDashboardRow>,
}
