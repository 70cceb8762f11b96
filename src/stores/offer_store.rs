use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, ModelTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set,
};

use crate::errors::offer::OfferError;
use crate::types::db::offer::{self, Entity as Offer, OfferType};
use crate::types::db::ticket;

/// Data for a new offer
#[derive(Debug, Clone)]
pub struct NewOffer {
    pub name: String,
    pub offer_type: OfferType,
    pub description: String,
    pub price: Decimal,
    pub available: bool,
}

/// Partial update of an offer; `None` fields are left unchanged
#[derive(Debug, Clone, Default)]
pub struct OfferChanges {
    pub name: Option<String>,
    pub offer_type: Option<OfferType>,
    pub description: Option<String>,
    pub price: Option<Decimal>,
    pub available: Option<bool>,
}

/// OfferStore manages the purchasable offer catalog
pub struct OfferStore {
    db: DatabaseConnection,
}

impl OfferStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    fn db_error(e: sea_orm::DbErr) -> OfferError {
        OfferError::internal_error(format!("Database error: {}", e))
    }

    /// Offers visible in the public listing (available only, oldest first)
    pub async fn list_available(&self) -> Result<Vec<offer::Model>, OfferError> {
        Offer::find()
            .filter(offer::Column::Available.eq(true))
            .order_by_asc(offer::Column::Id)
            .all(&self.db)
            .await
            .map_err(Self::db_error)
    }

    /// Look up an offer by id regardless of availability
    pub async fn find_by_id(&self, offer_id: i32) -> Result<Option<offer::Model>, OfferError> {
        Offer::find_by_id(offer_id)
            .one(&self.db)
            .await
            .map_err(Self::db_error)
    }

    /// Look up an available offer by id, as the public detail view sees it
    pub async fn find_available(&self, offer_id: i32) -> Result<Option<offer::Model>, OfferError> {
        Offer::find_by_id(offer_id)
            .filter(offer::Column::Available.eq(true))
            .one(&self.db)
            .await
            .map_err(Self::db_error)
    }

    /// Create a new offer
    pub async fn create(&self, new_offer: NewOffer) -> Result<offer::Model, OfferError> {
        let now = Utc::now().timestamp();

        offer::ActiveModel {
            id: sea_orm::ActiveValue::NotSet,
            name: Set(new_offer.name),
            offer_type: Set(new_offer.offer_type),
            description: Set(new_offer.description),
            price: Set(new_offer.price),
            available: Set(new_offer.available),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&self.db)
        .await
        .map_err(Self::db_error)
    }

    /// Apply a partial update to an offer
    pub async fn update(
        &self,
        offer_id: i32,
        changes: OfferChanges,
    ) -> Result<offer::Model, OfferError> {
        let found = self
            .find_by_id(offer_id)
            .await?
            .ok_or_else(OfferError::not_found)?;

        let mut active: offer::ActiveModel = found.into();
        if let Some(name) = changes.name {
            active.name = Set(name);
        }
        if let Some(offer_type) = changes.offer_type {
            active.offer_type = Set(offer_type);
        }
        if let Some(description) = changes.description {
            active.description = Set(description);
        }
        if let Some(price) = changes.price {
            active.price = Set(price);
        }
        if let Some(available) = changes.available {
            active.available = Set(available);
        }
        active.updated_at = Set(Utc::now().timestamp());

        active.update(&self.db).await.map_err(Self::db_error)
    }

    /// Flip an offer's availability; soft delete sets it to false
    pub async fn set_availability(
        &self,
        offer_id: i32,
        available: bool,
    ) -> Result<offer::Model, OfferError> {
        let found = self
            .find_by_id(offer_id)
            .await?
            .ok_or_else(OfferError::not_found)?;

        let mut active: offer::ActiveModel = found.into();
        active.available = Set(available);
        active.updated_at = Set(Utc::now().timestamp());

        active.update(&self.db).await.map_err(Self::db_error)
    }

    /// Permanently delete an offer
    ///
    /// Rejected while any ticket references the offer; soft delete is the
    /// normal removal path.
    pub async fn permanent_delete(&self, offer_id: i32) -> Result<(), OfferError> {
        let found = self
            .find_by_id(offer_id)
            .await?
            .ok_or_else(OfferError::not_found)?;

        let referencing = ticket::Entity::find()
            .filter(ticket::Column::OfferId.eq(offer_id))
            .count(&self.db)
            .await
            .map_err(Self::db_error)?;

        if referencing > 0 {
            return Err(OfferError::tickets_exist());
        }

        found.delete(&self.db).await.map_err(Self::db_error)?;
        Ok(())
    }
}
