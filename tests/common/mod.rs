// Common test utilities for integration tests

use migration::{Migrator, MigratorTrait};
use poem_openapi::auth::Bearer;
use sea_orm::{Database, DatabaseConnection};
use std::sync::Arc;
use tempfile::TempDir;

use ticketbooth_backend::api::auth::BearerAuth;
use ticketbooth_backend::api::{AdminApi, AuthApi, OffersApi, TicketsApi, UserApi};
use ticketbooth_backend::services::{QrRenderer, TokenService};
use ticketbooth_backend::stores::{AccountStore, OfferStore, StatsStore, TicketStore};

pub const TEST_BASE_URL: &str = "http://localhost:3000";

/// A fully wired application instance over an in-memory database
pub struct TestApp {
    pub media_dir: TempDir,
    pub db: DatabaseConnection,
    pub accounts: Arc<AccountStore>,
    pub offers: Arc<OfferStore>,
    pub tickets: Arc<TicketStore>,
    pub stats: Arc<StatsStore>,
    pub tokens: Arc<TokenService>,
    pub auth_api: AuthApi,
    pub user_api: UserApi,
    pub offers_api: OffersApi,
    pub tickets_api: TicketsApi,
    pub admin_api: AdminApi,
}

/// Wire every store and API surface against a fresh in-memory database
pub async fn spawn_app() -> TestApp {
    let db = Database::connect("sqlite::memory:")
        .await
        .expect("Failed to create test database");

    Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");

    let media_dir = tempfile::tempdir().expect("Failed to create media dir");

    let accounts = Arc::new(AccountStore::new(
        db.clone(),
        "integration-test-pepper".to_string(),
    ));
    let offers = Arc::new(OfferStore::new(db.clone()));
    let tickets = Arc::new(TicketStore::new(
        db.clone(),
        Arc::new(QrRenderer::new(media_dir.path())),
    ));
    let stats = Arc::new(StatsStore::new(db.clone()));
    let tokens = Arc::new(TokenService::new(
        "test-secret-key-minimum-32-characters-long".to_string(),
        "test-refresh-secret-minimum-32-chars".to_string(),
    ));

    let auth_api = AuthApi::new(accounts.clone(), tokens.clone());
    let user_api = UserApi::new(accounts.clone(), tokens.clone());
    let offers_api = OffersApi::new(offers.clone(), accounts.clone(), tokens.clone());
    let tickets_api = TicketsApi::new(
        tickets.clone(),
        offers.clone(),
        accounts.clone(),
        tokens.clone(),
        TEST_BASE_URL.to_string(),
    );
    let admin_api = AdminApi::new(
        tickets.clone(),
        stats.clone(),
        accounts.clone(),
        tokens.clone(),
        TEST_BASE_URL.to_string(),
    );

    TestApp {
        media_dir,
        db,
        accounts,
        offers,
        tickets,
        stats,
        tokens,
        auth_api,
        user_api,
        offers_api,
        tickets_api,
        admin_api,
    }
}

/// Wrap a JWT for handler-level calls
pub fn bearer(jwt: &str) -> BearerAuth {
    BearerAuth(Bearer {
        token: jwt.to_string(),
    })
}
