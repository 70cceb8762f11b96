use poem_openapi::{param::Path, payload::Json, OpenApi, Tags};
use std::sync::Arc;

use crate::api::auth::BearerAuth;
use crate::api::helpers;
use crate::errors::admin::AdminError;
use crate::errors::ticket::TicketError;
use crate::services::TokenService;
use crate::stores::{AccountStore, StatsStore, TicketRecord, TicketStore};
use crate::types::dto::stats::{
    DashboardResponse, OfferDashboardRow, OfferSalesStats, TypeDashboardRow,
};
use crate::types::dto::tickets::{
    AdminTicketResponse, ValidateResponse, VerifyTicketRequest, VerifyTicketResponse,
};

/// Staff-only ticket administration and reporting API
pub struct AdminApi {
    ticket_store: Arc<TicketStore>,
    stats_store: Arc<StatsStore>,
    account_store: Arc<AccountStore>,
    token_manager: Arc<TokenService>,
    public_base_url: String,
}

impl AdminApi {
    pub fn new(
        ticket_store: Arc<TicketStore>,
        stats_store: Arc<StatsStore>,
        account_store: Arc<AccountStore>,
        token_manager: Arc<TokenService>,
        public_base_url: String,
    ) -> Self {
        Self {
            ticket_store,
            stats_store,
            account_store,
            token_manager,
            public_base_url,
        }
    }

    fn ticket_response(&self, record: TicketRecord) -> AdminTicketResponse {
        AdminTicketResponse {
            id: record.ticket.id,
            user: record.user.into(),
            offer: record.offer.into(),
            purchase_date: record.ticket.purchase_date,
            is_used: record.ticket.is_used,
            final_key: record.ticket.final_key,
            qr_code_url: helpers::media_url(&self.public_base_url, &record.ticket.qr_code),
        }
    }
}

/// API tags for admin endpoints
#[derive(Tags)]
enum AdminTags {
    /// Ticket validation and sales reporting
    Admin,
}

#[OpenApi(prefix_path = "/admin")]
impl AdminApi {
    /// Full ticket list with owner and offer details (staff only)
    #[oai(path = "/tickets", method = "get", tag = "AdminTags::Admin")]
    pub async fn list_tickets(
        &self,
        auth: BearerAuth,
    ) -> Result<Json<Vec<AdminTicketResponse>>, TicketError> {
        helpers::require_staff(&self.token_manager, &self.account_store, &auth.0).await?;

        let records = self.ticket_store.list_all().await?;

        Ok(Json(
            records
                .into_iter()
                .map(|r| self.ticket_response(r))
                .collect(),
        ))
    }

    /// Mark a ticket as used (staff only)
    ///
    /// One-shot transition: a second validation of the same ticket fails
    /// with 400 and changes nothing.
    #[oai(
        path = "/tickets/:ticket_id/validate",
        method = "post",
        tag = "AdminTags::Admin"
    )]
    pub async fn validate_ticket(
        &self,
        auth: BearerAuth,
        ticket_id: Path<i32>,
    ) -> Result<Json<ValidateResponse>, TicketError> {
        let admin =
            helpers::require_staff(&self.token_manager, &self.account_store, &auth.0).await?;

        let record = self.ticket_store.mark_used(ticket_id.0).await?;

        tracing::info!(
            ticket_id = record.ticket.id,
            admin = %admin.username,
            "Ticket validated"
        );

        Ok(Json(ValidateResponse {
            message: "Ticket validated successfully".to_string(),
            ticket_id: record.ticket.id,
            user: record.user.into(),
            offer: record.offer.into(),
        }))
    }

    /// Look up a ticket by its final key (staff only, read-only)
    #[oai(path = "/verify-ticket", method = "post", tag = "AdminTags::Admin")]
    pub async fn verify_ticket(
        &self,
        auth: BearerAuth,
        body: Json<VerifyTicketRequest>,
    ) -> Result<Json<VerifyTicketResponse>, TicketError> {
        helpers::require_staff(&self.token_manager, &self.account_store, &auth.0).await?;

        let record = self.ticket_store.find_by_final_key(&body.final_key).await?;

        Ok(Json(VerifyTicketResponse {
            ticket_id: record.ticket.id,
            is_used: record.ticket.is_used,
            user: record.user.into(),
            offer: record.offer.into(),
        }))
    }

    /// Per-offer sales counters (staff only)
    #[oai(path = "/sales-stats", method = "get", tag = "AdminTags::Admin")]
    pub async fn sales_stats(
        &self,
        auth: BearerAuth,
    ) -> Result<Json<Vec<OfferSalesStats>>, AdminError> {
        helpers::require_staff(&self.token_manager, &self.account_store, &auth.0).await?;

        let rows = self.stats_store.sales_stats().await?;

        Ok(Json(
            rows.into_iter()
                .map(|(stats, offer)| OfferSalesStats {
                    offer: offer.into(),
                    sales_count: stats.sales_count,
                    last_updated: stats.last_updated,
                })
                .collect(),
        ))
    }

    /// Aggregate sales dashboard (staff only)
    #[oai(path = "/dashboard", method = "get", tag = "AdminTags::Admin")]
    pub async fn dashboard(&self, auth: BearerAuth) -> Result<Json<DashboardResponse>, AdminError> {
        helpers::require_staff(&self.token_manager, &self.account_store, &auth.0).await?;

        let data = self.stats_store.dashboard().await?;

        Ok(Json(DashboardResponse {
            total_tickets: data.total_tickets,
            used_tickets: data.used_tickets,
            usage_rate: data.usage_rate,
            by_offer: data
                .by_offer
                .into_iter()
                .map(|agg| OfferDashboardRow {
                    offer_id: agg.offer.id,
                    name: agg.offer.name.clone(),
                    offer_type: agg.offer.offer_type.into(),
                    tickets_sold: agg.tickets_sold,
                    tickets_used: agg.tickets_used,
                    revenue: agg.revenue,
                })
                .collect(),
            by_type: data
                .by_type
                .into_iter()
                .map(|agg| TypeDashboardRow {
                    offer_type: agg.offer_type.into(),
                    tickets_sold: agg.tickets_sold,
                    revenue: agg.revenue,
                })
                .collect(),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::QrRenderer;
    use crate::stores::{NewAccount, NewOffer, OfferStore};
    use crate::types::db::offer::OfferType;
    use crate::types::db::user;
    use migration::{Migrator, MigratorTrait};
    use poem_openapi::auth::Bearer;
    use rust_decimal::Decimal;
    use sea_orm::Database;
    use tempfile::TempDir;

    struct TestContext {
        _media_dir: TempDir,
        api: AdminApi,
        accounts: Arc<AccountStore>,
        offers: Arc<OfferStore>,
        tickets: Arc<TicketStore>,
        tokens: Arc<TokenService>,
    }

    async fn setup() -> TestContext {
        let db = Database::connect("sqlite::memory:")
            .await
            .expect("Failed to create test database");

        Migrator::up(&db, None)
            .await
            .expect("Failed to run migrations");

        let media_dir = tempfile::tempdir().expect("Failed to create media dir");
        let accounts = Arc::new(AccountStore::new(db.clone(), "test-pepper".to_string()));
        let tokens = Arc::new(TokenService::new(
            "test-secret-key-minimum-32-characters-long".to_string(),
            "test-refresh-secret-minimum-32-chars".to_string(),
        ));
        let offers = Arc::new(OfferStore::new(db.clone()));
        let tickets = Arc::new(TicketStore::new(
            db.clone(),
            Arc::new(QrRenderer::new(media_dir.path())),
        ));
        let stats = Arc::new(StatsStore::new(db));

        let api = AdminApi::new(
            tickets.clone(),
            stats,
            accounts.clone(),
            tokens.clone(),
            "http://localhost:3000".to_string(),
        );

        TestContext {
            _media_dir: media_dir,
            api,
            accounts,
            offers,
            tickets,
            tokens,
        }
    }

    async fn register(ctx: &TestContext, username: &str, staff: bool) -> (user::Model, String) {
        let created = ctx
            .accounts
            .register(NewAccount {
                username: username.to_string(),
                email: format!("{}@example.com", username),
                password: "Str0ng!pass".to_string(),
                first_name: "Test".to_string(),
                last_name: "User".to_string(),
            })
            .await
            .unwrap();

        if staff {
            ctx.accounts.set_staff(&created.id, true).await.unwrap();
        }

        let jwt = ctx
            .tokens
            .generate_jwt(&uuid::Uuid::parse_str(&created.id).unwrap())
            .unwrap();
        (created, jwt)
    }

    fn bearer(jwt: &str) -> BearerAuth {
        BearerAuth(Bearer {
            token: jwt.to_string(),
        })
    }

    async fn purchase(ctx: &TestContext, buyer: &user::Model) -> crate::types::db::ticket::Model {
        let offer = ctx
            .offers
            .create(NewOffer {
                name: "Solo pass".to_string(),
                offer_type: OfferType::Solo,
                description: "Single admission".to_string(),
                price: Decimal::new(2500, 2),
                available: true,
            })
            .await
            .unwrap();

        ctx.tickets.create_ticket(buyer, &offer).await.unwrap()
    }

    #[tokio::test]
    async fn test_non_staff_gets_403_everywhere() {
        let ctx = setup().await;
        let (_user, jwt) = register(&ctx, "alice", false).await;

        assert!(matches!(
            ctx.api.list_tickets(bearer(&jwt)).await,
            Err(TicketError::Forbidden(_))
        ));
        assert!(matches!(
            ctx.api.validate_ticket(bearer(&jwt), Path(1)).await,
            Err(TicketError::Forbidden(_))
        ));
        assert!(matches!(
            ctx.api.sales_stats(bearer(&jwt)).await,
            Err(AdminError::Forbidden(_))
        ));
        assert!(matches!(
            ctx.api.dashboard(bearer(&jwt)).await,
            Err(AdminError::Forbidden(_))
        ));
    }

    #[tokio::test]
    async fn test_validate_marks_ticket_used_exactly_once() {
        let ctx = setup().await;
        let (buyer, _) = register(&ctx, "alice", false).await;
        let (_admin, jwt) = register(&ctx, "admin", true).await;
        let ticket = purchase(&ctx, &buyer).await;

        let first = ctx
            .api
            .validate_ticket(bearer(&jwt), Path(ticket.id))
            .await
            .expect("First validation should succeed");
        assert_eq!(first.ticket_id, ticket.id);
        assert_eq!(first.user.username, "alice");
        assert_eq!(first.message, "Ticket validated successfully");

        let second = ctx.api.validate_ticket(bearer(&jwt), Path(ticket.id)).await;
        assert!(matches!(second, Err(TicketError::AlreadyUsed(_))));
    }

    #[tokio::test]
    async fn test_validate_unknown_ticket_returns_404() {
        let ctx = setup().await;
        let (_admin, jwt) = register(&ctx, "admin", true).await;

        let result = ctx.api.validate_ticket(bearer(&jwt), Path(999)).await;

        assert!(matches!(result, Err(TicketError::TicketNotFound(_))));
    }

    #[tokio::test]
    async fn test_verify_reports_usage_state_without_mutating() {
        let ctx = setup().await;
        let (buyer, _) = register(&ctx, "alice", false).await;
        let (_admin, jwt) = register(&ctx, "admin", true).await;
        let ticket = purchase(&ctx, &buyer).await;

        let before = ctx
            .api
            .verify_ticket(
                bearer(&jwt),
                Json(VerifyTicketRequest {
                    final_key: ticket.final_key.clone(),
                }),
            )
            .await
            .unwrap();
        assert!(!before.is_used);

        ctx.api
            .validate_ticket(bearer(&jwt), Path(ticket.id))
            .await
            .unwrap();

        let after = ctx
            .api
            .verify_ticket(
                bearer(&jwt),
                Json(VerifyTicketRequest {
                    final_key: ticket.final_key.clone(),
                }),
            )
            .await
            .unwrap();
        assert!(after.is_used);
    }

    #[tokio::test]
    async fn test_verify_unknown_final_key_returns_404() {
        let ctx = setup().await;
        let (_admin, jwt) = register(&ctx, "admin", true).await;

        let result = ctx
            .api
            .verify_ticket(
                bearer(&jwt),
                Json(VerifyTicketRequest {
                    final_key: "no-such-key".to_string(),
                }),
            )
            .await;

        assert!(matches!(result, Err(TicketError::TicketNotFound(_))));
    }

    #[tokio::test]
    async fn test_dashboard_usage_rate_is_zero_without_tickets() {
        let ctx = setup().await;
        let (_admin, jwt) = register(&ctx, "admin", true).await;

        let data = ctx.api.dashboard(bearer(&jwt)).await.unwrap();

        assert_eq!(data.total_tickets, 0);
        assert_eq!(data.usage_rate, 0.0);
    }

    #[tokio::test]
    async fn test_sales_stats_lists_counters() {
        let ctx = setup().await;
        let (buyer, _) = register(&ctx, "alice", false).await;
        let (_admin, jwt) = register(&ctx, "admin", true).await;
        purchase(&ctx, &buyer).await;

        let stats = ctx.api.sales_stats(bearer(&jwt)).await.unwrap();

        assert_eq!(stats.len(), 1);
        assert_eq!(stats[0].sales_count, 1);
        assert_eq!(stats[0].offer.name, "Solo pass");
    }

    #[tokio::test]
    async fn test_admin_listing_includes_owner_details() {
        let ctx = setup().await;
        let (buyer, _) = register(&ctx, "alice", false).await;
        let (_admin, jwt) = register(&ctx, "admin", true).await;
        purchase(&ctx, &buyer).await;

        let listed = ctx.api.list_tickets(bearer(&jwt)).await.unwrap();

        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].user.username, "alice");
        assert_eq!(listed[0].offer.name, "Solo pass");
        assert!(listed[0]
            .qr_code_url
            .starts_with("http://localhost:3000/media/qr_codes/"));
    }
}
