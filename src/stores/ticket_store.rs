use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

use crate::errors::ticket::TicketError;
use crate::services::QrRenderer;
use crate::types::db::{offer, offer_stats, ticket, user};

/// Upper bound on final key length; concatenated UUIDs stay well below it
const FINAL_KEY_MAX_LEN: usize = 256;

/// A ticket joined with its owner and offer
#[derive(Debug, Clone)]
pub struct TicketRecord {
    pub ticket: ticket::Model,
    pub user: user::Model,
    pub offer: offer::Model,
}

/// TicketStore manages ticket issuance, lookups and single-use validation
pub struct TicketStore {
    db: DatabaseConnection,
    qr_renderer: Arc<QrRenderer>,
}

impl TicketStore {
    pub fn new(db: DatabaseConnection, qr_renderer: Arc<QrRenderer>) -> Self {
        Self { db, qr_renderer }
    }

    fn db_error(e: sea_orm::DbErr) -> TicketError {
        TicketError::internal_error(format!("Database error: {}", e))
    }

    /// Derive a ticket's final key from its owner's account key and its own
    /// purchase key: plain concatenation, truncated to 256 characters
    pub fn derive_final_key(account_key: &str, purchase_key: &str) -> String {
        let mut key = format!("{}{}", account_key, purchase_key);
        key.truncate(FINAL_KEY_MAX_LEN);
        key
    }

    /// Issue a new ticket for `buyer` on `offer`
    ///
    /// Assigns a fresh purchase key, derives the final key, renders the QR
    /// image, and inserts the ticket together with the per-offer sales
    /// counter bump (create at 1 on first sale) in a single transaction.
    ///
    /// Every call creates a new ticket; there is no duplicate-purchase guard.
    pub async fn create_ticket(
        &self,
        buyer: &user::Model,
        offer: &offer::Model,
    ) -> Result<ticket::Model, TicketError> {
        let purchase_key = Uuid::new_v4().to_string();
        let final_key = Self::derive_final_key(&buyer.account_key, &purchase_key);

        let qr_path = self
            .qr_renderer
            .render_ticket_qr(&buyer.username, &purchase_key, &final_key)
            .map_err(|e| TicketError::internal_error(format!("Failed to render QR code: {}", e)))?;

        let now = Utc::now().timestamp();

        let txn = self.db.begin().await.map_err(Self::db_error)?;

        let created = ticket::ActiveModel {
            id: sea_orm::ActiveValue::NotSet,
            user_id: Set(buyer.id.clone()),
            offer_id: Set(offer.id),
            purchase_key: Set(purchase_key),
            final_key: Set(final_key),
            qr_code: Set(qr_path),
            purchase_date: Set(now),
            is_used: Set(false),
        }
        .insert(&txn)
        .await
        .map_err(Self::db_error)?;

        // Bump the sales counter inside the same transaction
        match offer_stats::Entity::find_by_id(offer.id)
            .one(&txn)
            .await
            .map_err(Self::db_error)?
        {
            Some(stats) => {
                let next = stats.sales_count + 1;
                let mut active: offer_stats::ActiveModel = stats.into();
                active.sales_count = Set(next);
                active.last_updated = Set(now);
                active.update(&txn).await.map_err(Self::db_error)?;
            }
            None => {
                offer_stats::ActiveModel {
                    offer_id: Set(offer.id),
                    sales_count: Set(1),
                    last_updated: Set(now),
                }
                .insert(&txn)
                .await
                .map_err(Self::db_error)?;
            }
        }

        txn.commit().await.map_err(Self::db_error)?;

        Ok(created)
    }

    /// A user's own tickets with their offers, newest first
    pub async fn list_for_user(
        &self,
        user_id: &str,
    ) -> Result<Vec<(ticket::Model, offer::Model)>, TicketError> {
        let rows = ticket::Entity::find()
            .filter(ticket::Column::UserId.eq(user_id))
            .order_by_desc(ticket::Column::PurchaseDate)
            .find_also_related(offer::Entity)
            .all(&self.db)
            .await
            .map_err(Self::db_error)?;

        rows.into_iter()
            .map(|(t, o)| {
                let o = o.ok_or_else(|| {
                    TicketError::internal_error(format!("Ticket {} has no offer", t.id))
                })?;
                Ok((t, o))
            })
            .collect()
    }

    /// All tickets with owner and offer details, for the admin listing
    pub async fn list_all(&self) -> Result<Vec<TicketRecord>, TicketError> {
        let rows = ticket::Entity::find()
            .order_by_asc(ticket::Column::Id)
            .find_also_related(offer::Entity)
            .all(&self.db)
            .await
            .map_err(Self::db_error)?;

        let user_ids: Vec<String> = rows.iter().map(|(t, _)| t.user_id.clone()).collect();
        let users: HashMap<String, user::Model> = user::Entity::find()
            .filter(user::Column::Id.is_in(user_ids))
            .all(&self.db)
            .await
            .map_err(Self::db_error)?
            .into_iter()
            .map(|u| (u.id.clone(), u))
            .collect();

        rows.into_iter()
            .map(|(t, o)| {
                let offer = o.ok_or_else(|| {
                    TicketError::internal_error(format!("Ticket {} has no offer", t.id))
                })?;
                let user = users.get(&t.user_id).cloned().ok_or_else(|| {
                    TicketError::internal_error(format!("Ticket {} has no owner", t.id))
                })?;
                Ok(TicketRecord {
                    ticket: t,
                    user,
                    offer,
                })
            })
            .collect()
    }

    /// Mark a ticket as used
    ///
    /// One-way transition: validating an already-used ticket fails with
    /// AlreadyUsed and leaves the row untouched.
    pub async fn mark_used(&self, ticket_id: i32) -> Result<TicketRecord, TicketError> {
        let found = ticket::Entity::find_by_id(ticket_id)
            .one(&self.db)
            .await
            .map_err(Self::db_error)?
            .ok_or_else(TicketError::ticket_not_found)?;

        if found.is_used {
            return Err(TicketError::already_used());
        }

        let mut active: ticket::ActiveModel = found.into();
        active.is_used = Set(true);
        let updated = active.update(&self.db).await.map_err(Self::db_error)?;

        self.load_record(updated).await
    }

    /// Find a ticket by the final key scanned from a QR code; read-only
    pub async fn find_by_final_key(&self, final_key: &str) -> Result<TicketRecord, TicketError> {
        let found = ticket::Entity::find()
            .filter(ticket::Column::FinalKey.eq(final_key))
            .one(&self.db)
            .await
            .map_err(Self::db_error)?
            .ok_or_else(TicketError::ticket_not_found)?;

        self.load_record(found).await
    }

    async fn load_record(&self, t: ticket::Model) -> Result<TicketRecord, TicketError> {
        let user = user::Entity::find_by_id(t.user_id.clone())
            .one(&self.db)
            .await
            .map_err(Self::db_error)?
            .ok_or_else(|| TicketError::internal_error(format!("Ticket {} has no owner", t.id)))?;

        let offer = offer::Entity::find_by_id(t.offer_id)
            .one(&self.db)
            .await
            .map_err(Self::db_error)?
            .ok_or_else(|| TicketError::internal_error(format!("Ticket {} has no offer", t.id)))?;

        Ok(TicketRecord {
            ticket: t,
            user,
            offer,
        })
    }
}
