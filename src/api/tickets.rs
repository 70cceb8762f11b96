use poem_openapi::{payload::Json, OpenApi, Tags};
use std::sync::Arc;

use crate::api::auth::BearerAuth;
use crate::api::helpers;
use crate::errors::ticket::TicketError;
use crate::services::TokenService;
use crate::stores::{AccountStore, OfferStore, TicketStore};
use crate::types::dto::tickets::{
    PurchaseCreated, PurchaseReceipt, PurchaseRequest, TicketResponse,
};

/// Ticket purchase API for authenticated users
pub struct TicketsApi {
    ticket_store: Arc<TicketStore>,
    offer_store: Arc<OfferStore>,
    account_store: Arc<AccountStore>,
    token_manager: Arc<TokenService>,
    public_base_url: String,
}

impl TicketsApi {
    pub fn new(
        ticket_store: Arc<TicketStore>,
        offer_store: Arc<OfferStore>,
        account_store: Arc<AccountStore>,
        token_manager: Arc<TokenService>,
        public_base_url: String,
    ) -> Self {
        Self {
            ticket_store,
            offer_store,
            account_store,
            token_manager,
            public_base_url,
        }
    }
}

/// API tags for ticket endpoints
#[derive(Tags)]
enum TicketTags {
    /// Ticket purchase and listing
    Tickets,
}

#[OpenApi]
impl TicketsApi {
    /// Purchase a ticket for an offer
    ///
    /// Creates a new ticket on every call; the response carries the final
    /// key and the URL of the generated QR code image.
    #[oai(path = "/tickets/purchase", method = "post", tag = "TicketTags::Tickets")]
    pub async fn purchase(
        &self,
        auth: BearerAuth,
        body: Json<PurchaseRequest>,
    ) -> Result<PurchaseCreated, TicketError> {
        let buyer = helpers::current_user(&self.token_manager, &self.account_store, &auth.0).await?;

        // Resolved by id alone; availability is a listing concern
        let offer = self
            .offer_store
            .find_by_id(body.offer_id)
            .await
            .map_err(|e| TicketError::internal_error(format!("Offer lookup failed: {:?}", e)))?
            .ok_or_else(TicketError::offer_not_found)?;

        let ticket = self.ticket_store.create_ticket(&buyer, &offer).await?;

        tracing::info!(
            ticket_id = ticket.id,
            offer_id = offer.id,
            "Ticket purchased"
        );

        Ok(PurchaseCreated::Created(Json(PurchaseReceipt {
            status: "purchased".to_string(),
            ticket_id: ticket.id,
            qr_code_url: helpers::media_url(&self.public_base_url, &ticket.qr_code),
            final_key: ticket.final_key,
            offer: offer.name,
        })))
    }

    /// The caller's own tickets, newest first
    #[oai(path = "/tickets", method = "get", tag = "TicketTags::Tickets")]
    pub async fn list(&self, auth: BearerAuth) -> Result<Json<Vec<TicketResponse>>, TicketError> {
        let user = helpers::current_user(&self.token_manager, &self.account_store, &auth.0).await?;

        let rows = self.ticket_store.list_for_user(&user.id).await?;

        Ok(Json(
            rows.into_iter()
                .map(|(t, o)| TicketResponse {
                    id: t.id,
                    offer: o.into(),
                    purchase_date: t.purchase_date,
                    qr_code_url: helpers::media_url(&self.public_base_url, &t.qr_code),
                    is_used: t.is_used,
                    final_key: t.final_key,
                })
                .collect(),
        ))
    }
}
