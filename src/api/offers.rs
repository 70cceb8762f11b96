use poem_openapi::{param::Path, payload::Json, OpenApi, Tags};
use std::sync::Arc;

use crate::api::auth::BearerAuth;
use crate::api::helpers;
use crate::errors::offer::OfferError;
use crate::services::TokenService;
use crate::stores::{AccountStore, NewOffer, OfferChanges, OfferStore};
use crate::types::dto::common::MessageResponse;
use crate::types::dto::offers::{
    CreateOfferRequest, OfferCreated, OfferResponse, UpdateOfferRequest,
};

/// Offer catalog API: public listing plus staff-only administration
pub struct OffersApi {
    offer_store: Arc<OfferStore>,
    account_store: Arc<AccountStore>,
    token_manager: Arc<TokenService>,
}

impl OffersApi {
    pub fn new(
        offer_store: Arc<OfferStore>,
        account_store: Arc<AccountStore>,
        token_manager: Arc<TokenService>,
    ) -> Self {
        Self {
            offer_store,
            account_store,
            token_manager,
        }
    }
}

/// API tags for offer endpoints
#[derive(Tags)]
enum OfferTags {
    /// Ticket offer catalog
    Offers,
}

#[OpenApi]
impl OffersApi {
    /// List available offers (public)
    #[oai(path = "/ticket-offers", method = "get", tag = "OfferTags::Offers")]
    pub async fn list(&self) -> Result<Json<Vec<OfferResponse>>, OfferError> {
        let offers = self.offer_store.list_available().await?;
        Ok(Json(offers.into_iter().map(OfferResponse::from).collect()))
    }

    /// Fetch one available offer (public)
    #[oai(path = "/ticket-offers/:offer_id", method = "get", tag = "OfferTags::Offers")]
    pub async fn get(&self, offer_id: Path<i32>) -> Result<Json<OfferResponse>, OfferError> {
        let offer = self
            .offer_store
            .find_available(offer_id.0)
            .await?
            .ok_or_else(OfferError::not_found)?;
        Ok(Json(offer.into()))
    }

    /// Create a new offer (staff only)
    #[oai(path = "/ticket-offers", method = "post", tag = "OfferTags::Offers")]
    pub async fn create(
        &self,
        auth: BearerAuth,
        body: Json<CreateOfferRequest>,
    ) -> Result<OfferCreated, OfferError> {
        helpers::require_staff(&self.token_manager, &self.account_store, &auth.0).await?;

        let created = self
            .offer_store
            .create(NewOffer {
                name: body.name.clone(),
                offer_type: body.offer_type.into(),
                description: body.description.clone(),
                price: body.price,
                available: body.available.unwrap_or(true),
            })
            .await?;

        Ok(OfferCreated::Created(Json(created.into())))
    }

    /// Update an offer; absent fields are left unchanged (staff only)
    #[oai(path = "/ticket-offers/:offer_id", method = "put", tag = "OfferTags::Offers")]
    pub async fn update(
        &self,
        auth: BearerAuth,
        offer_id: Path<i32>,
        body: Json<UpdateOfferRequest>,
    ) -> Result<Json<OfferResponse>, OfferError> {
        helpers::require_staff(&self.token_manager, &self.account_store, &auth.0).await?;

        let updated = self
            .offer_store
            .update(
                offer_id.0,
                OfferChanges {
                    name: body.name.clone(),
                    offer_type: body.offer_type.map(Into::into),
                    description: body.description.clone(),
                    price: body.price,
                    available: body.available,
                },
            )
            .await?;

        Ok(Json(updated.into()))
    }

    /// Soft-delete an offer by marking it unavailable (staff only)
    ///
    /// The offer disappears from the public listing but keeps its id for
    /// existing tickets.
    #[oai(path = "/ticket-offers/:offer_id", method = "delete", tag = "OfferTags::Offers")]
    pub async fn soft_delete(
        &self,
        auth: BearerAuth,
        offer_id: Path<i32>,
    ) -> Result<Json<OfferResponse>, OfferError> {
        helpers::require_staff(&self.token_manager, &self.account_store, &auth.0).await?;

        let updated = self.offer_store.set_availability(offer_id.0, false).await?;
        Ok(Json(updated.into()))
    }

    /// Make a soft-deleted offer purchasable again (staff only)
    #[oai(
        path = "/ticket-offers/:offer_id/reactivate",
        method = "post",
        tag = "OfferTags::Offers"
    )]
    pub async fn reactivate(
        &self,
        auth: BearerAuth,
        offer_id: Path<i32>,
    ) -> Result<Json<OfferResponse>, OfferError> {
        helpers::require_staff(&self.token_manager, &self.account_store, &auth.0).await?;

        let updated = self.offer_store.set_availability(offer_id.0, true).await?;
        Ok(Json(updated.into()))
    }

    /// Permanently delete an offer with no referencing tickets (staff only)
    #[oai(
        path = "/ticket-offers/:offer_id/permanent",
        method = "delete",
        tag = "OfferTags::Offers"
    )]
    pub async fn permanent_delete(
        &self,
        auth: BearerAuth,
        offer_id: Path<i32>,
    ) -> Result<Json<MessageResponse>, OfferError> {
        helpers::require_staff(&self.token_manager, &self.account_store, &auth.0).await?;

        self.offer_store.permanent_delete(offer_id.0).await?;

        Ok(Json(MessageResponse {
            message: "Offer deleted".to_string(),
        }))
    }
}
