use rust_decimal::Decimal;
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, FromQueryResult, QueryFilter, QueryOrder,
    QuerySelect,
};
use std::collections::HashMap;

use crate::errors::admin::AdminError;
use crate::types::db::offer::{self, OfferType};
use crate::types::db::{offer_stats, ticket};

/// Aggregates for a single offer
#[derive(Debug, Clone)]
pub struct OfferAggregate {
    pub offer: offer::Model,
    pub tickets_sold: i64,
    pub tickets_used: i64,
    pub revenue: Decimal,
}

/// Aggregates for an offer category
#[derive(Debug, Clone)]
pub struct TypeAggregate {
    pub offer_type: OfferType,
    pub tickets_sold: i64,
    pub revenue: Decimal,
}

/// Full dashboard aggregation, computed fresh on every call
#[derive(Debug, Clone)]
pub struct DashboardData {
    pub total_tickets: i64,
    pub used_tickets: i64,
    pub usage_rate: f64,
    pub by_offer: Vec<OfferAggregate>,
    pub by_type: Vec<TypeAggregate>,
}

/// Grouped ticket counts, one row per offer
#[derive(FromQueryResult)]
struct OfferTicketCount {
    offer_id: i32,
    count: i64,
}

/// StatsStore serves the admin reporting endpoints
pub struct StatsStore {
    db: DatabaseConnection,
}

impl StatsStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    fn db_error(e: sea_orm::DbErr) -> AdminError {
        tracing::error!("Sales aggregation query failed: {}", e);
        AdminError::internal_error("Failed to compute sales statistics".to_string())
    }

    /// Per-offer running sales counters with their offers
    pub async fn sales_stats(
        &self,
    ) -> Result<Vec<(offer_stats::Model, offer::Model)>, AdminError> {
        let rows = offer_stats::Entity::find()
            .order_by_asc(offer_stats::Column::OfferId)
            .find_also_related(offer::Entity)
            .all(&self.db)
            .await
            .map_err(Self::db_error)?;

        Ok(rows
            .into_iter()
            .filter_map(|(stats, o)| o.map(|o| (stats, o)))
            .collect())
    }

    /// Grouped ticket counts, optionally restricted to used tickets
    async fn ticket_counts(&self, used_only: bool) -> Result<HashMap<i32, i64>, AdminError> {
        let mut query = ticket::Entity::find()
            .select_only()
            .column(ticket::Column::OfferId)
            .column_as(ticket::Column::Id.count(), "count")
            .group_by(ticket::Column::OfferId);

        if used_only {
            query = query.filter(ticket::Column::IsUsed.eq(true));
        }

        let rows: Vec<OfferTicketCount> = query
            .into_model()
            .all(&self.db)
            .await
            .map_err(Self::db_error)?;

        Ok(rows.into_iter().map(|r| (r.offer_id, r.count)).collect())
    }

    /// Aggregate counts and revenue by offer and category, plus global totals
    ///
    /// Usage rate is used/total as a percentage, defined as 0 when no tickets
    /// exist.
    pub async fn dashboard(&self) -> Result<DashboardData, AdminError> {
        let offers = offer::Entity::find()
            .order_by_asc(offer::Column::Id)
            .all(&self.db)
            .await
            .map_err(Self::db_error)?;

        let sold = self.ticket_counts(false).await?;
        let used = self.ticket_counts(true).await?;

        let by_offer: Vec<OfferAggregate> = offers
            .into_iter()
            .map(|o| {
                let tickets_sold = sold.get(&o.id).copied().unwrap_or(0);
                let tickets_used = used.get(&o.id).copied().unwrap_or(0);
                let revenue = o.price * Decimal::from(tickets_sold);
                OfferAggregate {
                    offer: o,
                    tickets_sold,
                    tickets_used,
                    revenue,
                }
            })
            .collect();

        let by_type: Vec<TypeAggregate> = [OfferType::Solo, OfferType::Duo, OfferType::Family]
            .into_iter()
            .map(|offer_type| {
                let (tickets_sold, revenue) = by_offer
                    .iter()
                    .filter(|agg| agg.offer.offer_type == offer_type)
                    .fold((0_i64, Decimal::ZERO), |(count, sum), agg| {
                        (count + agg.tickets_sold, sum + agg.revenue)
                    });
                TypeAggregate {
                    offer_type,
                    tickets_sold,
                    revenue,
                }
            })
            .collect();

        let total_tickets: i64 = by_offer.iter().map(|agg| agg.tickets_sold).sum();
        let used_tickets: i64 = by_offer.iter().map(|agg| agg.tickets_used).sum();

        let usage_rate = if total_tickets == 0 {
            0.0
        } else {
            used_tickets as f64 / total_tickets as f64 * 100.0
        };

        Ok(DashboardData {
            total_tickets,
            used_tickets,
            usage_rate,
            by_offer,
            by_type,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::QrRenderer;
    use crate::stores::{AccountStore, NewAccount, NewOffer, OfferStore, TicketStore};
    use crate::types::db::user;
    use migration::{Migrator, MigratorTrait};
    use sea_orm::Database;
    use std::sync::Arc;
    use tempfile::TempDir;

    struct TestContext {
        _media_dir: TempDir,
        stats: StatsStore,
        tickets: TicketStore,
        offers: OfferStore,
        buyer: user::Model,
    }

    async fn setup() -> TestContext {
        let db = Database::connect("sqlite::memory:")
            .await
            .expect("Failed to create test database");

        Migrator::up(&db, None)
            .await
            .expect("Failed to run migrations");

        let media_dir = tempfile::tempdir().expect("Failed to create media dir");
        let tickets = TicketStore::new(db.clone(), Arc::new(QrRenderer::new(media_dir.path())));
        let offers = OfferStore::new(db.clone());
        let stats = StatsStore::new(db.clone());

        let accounts = AccountStore::new(db.clone(), "test-pepper".to_string());
        let buyer = accounts
            .register(NewAccount {
                username: "alice".to_string(),
                email: "alice@example.com".to_string(),
                password: "Str0ng!pass".to_string(),
                first_name: "Alice".to_string(),
                last_name: "Martin".to_string(),
            })
            .await
            .expect("Failed to register buyer");

        TestContext {
            _media_dir: media_dir,
            stats,
            tickets,
            offers,
            buyer,
        }
    }

    async fn make_offer(ctx: &TestContext, name: &str, offer_type: OfferType, cents: i64) -> offer::Model {
        ctx.offers
            .create(NewOffer {
                name: name.to_string(),
                offer_type,
                description: "Test offer".to_string(),
                price: Decimal::new(cents, 2),
                available: true,
            })
            .await
            .expect("Failed to create offer")
    }

    #[tokio::test]
    async fn test_dashboard_is_empty_without_tickets() {
        let ctx = setup().await;
        make_offer(&ctx, "Solo pass", OfferType::Solo, 2500).await;

        let data = ctx.stats.dashboard().await.expect("Failed to aggregate");

        assert_eq!(data.total_tickets, 0);
        assert_eq!(data.used_tickets, 0);
        // Rate is defined as 0 when there are no tickets
        assert_eq!(data.usage_rate, 0.0);
        assert_eq!(data.by_offer.len(), 1);
        assert_eq!(data.by_offer[0].revenue, Decimal::ZERO);
    }

    #[tokio::test]
    async fn test_dashboard_counts_and_revenue() {
        let ctx = setup().await;
        let solo = make_offer(&ctx, "Solo pass", OfferType::Solo, 2500).await;
        let duo = make_offer(&ctx, "Duo pass", OfferType::Duo, 4000).await;

        let t1 = ctx.tickets.create_ticket(&ctx.buyer, &solo).await.unwrap();
        ctx.tickets.create_ticket(&ctx.buyer, &solo).await.unwrap();
        ctx.tickets.create_ticket(&ctx.buyer, &duo).await.unwrap();
        ctx.tickets.mark_used(t1.id).await.unwrap();

        let data = ctx.stats.dashboard().await.expect("Failed to aggregate");

        assert_eq!(data.total_tickets, 3);
        assert_eq!(data.used_tickets, 1);
        assert!((data.usage_rate - 100.0 / 3.0).abs() < 1e-9);

        let solo_row = data
            .by_offer
            .iter()
            .find(|agg| agg.offer.id == solo.id)
            .unwrap();
        assert_eq!(solo_row.tickets_sold, 2);
        assert_eq!(solo_row.tickets_used, 1);
        assert_eq!(solo_row.revenue, Decimal::new(5000, 2));

        let duo_row = data
            .by_type
            .iter()
            .find(|agg| agg.offer_type == OfferType::Duo)
            .unwrap();
        assert_eq!(duo_row.tickets_sold, 1);
        assert_eq!(duo_row.revenue, Decimal::new(4000, 2));
    }

    #[tokio::test]
    async fn test_sales_stats_reflects_counters() {
        let ctx = setup().await;
        let solo = make_offer(&ctx, "Solo pass", OfferType::Solo, 2500).await;

        ctx.tickets.create_ticket(&ctx.buyer, &solo).await.unwrap();
        ctx.tickets.create_ticket(&ctx.buyer, &solo).await.unwrap();

        let stats = ctx.stats.sales_stats().await.expect("Failed to query");

        assert_eq!(stats.len(), 1);
        assert_eq!(stats[0].0.sales_count, 2);
        assert_eq!(stats[0].1.id, solo.id);
    }
}
