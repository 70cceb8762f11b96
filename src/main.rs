use poem::{endpoint::StaticFilesEndpoint, listener::TcpListener, Route, Server};
use poem_openapi::OpenApiService;
use sea_orm::{Database, DatabaseConnection};
use std::sync::Arc;

use migration::{Migrator, MigratorTrait};
use ticketbooth_backend::api::{AdminApi, AuthApi, HealthApi, OffersApi, TicketsApi, UserApi};
use ticketbooth_backend::config::{logging, AppSettings};
use ticketbooth_backend::errors::AuthError;
use ticketbooth_backend::services::{QrRenderer, TokenService};
use ticketbooth_backend::stores::{AccountStore, NewAccount, OfferStore, StatsStore, TicketStore};

/// Create the bootstrap staff account when ADMIN_EMAIL/ADMIN_PASSWORD are set
async fn seed_admin(settings: &AppSettings, account_store: &AccountStore) {
    let (email, password) = match (&settings.admin_email, &settings.admin_password) {
        (Some(email), Some(password)) => (email.clone(), password.clone()),
        _ => return,
    };

    match account_store
        .register(NewAccount {
            username: settings.admin_username.clone(),
            email,
            password,
            first_name: "Admin".to_string(),
            last_name: "Account".to_string(),
        })
        .await
    {
        Ok(admin) => match account_store.set_staff(&admin.id, true).await {
            Ok(()) => tracing::info!(username = %admin.username, "Bootstrap admin created"),
            Err(e) => tracing::error!("Failed to promote bootstrap admin: {}", e),
        },
        Err(AuthError::DuplicateEmail(_)) | Err(AuthError::DuplicateUsername(_)) => {
            tracing::debug!("Bootstrap admin already exists, skipping");
        }
        Err(e) => tracing::error!("Failed to create bootstrap admin: {}", e),
    }
}

#[tokio::main]
async fn main() -> Result<(), std::io::Error> {
    // Load environment variables from .env file
    dotenv::dotenv().ok();

    logging::init_logging().expect("Failed to initialize logging");

    let settings = AppSettings::from_env().expect("Failed to load settings");

    // Connect to database and run migrations
    let db: DatabaseConnection = Database::connect(&settings.database_url)
        .await
        .expect("Failed to connect to database");
    tracing::info!(database_url = %settings.database_url, "Connected to database");

    Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");
    tracing::info!("Database migrations completed");

    // Wire stores and services
    let account_store = Arc::new(AccountStore::new(
        db.clone(),
        settings.password_pepper.clone(),
    ));
    let offer_store = Arc::new(OfferStore::new(db.clone()));
    let qr_renderer = Arc::new(QrRenderer::new(settings.media_root.clone()));
    let ticket_store = Arc::new(TicketStore::new(db.clone(), qr_renderer));
    let stats_store = Arc::new(StatsStore::new(db.clone()));
    let token_manager = Arc::new(TokenService::new(
        settings.jwt_secret.clone(),
        settings.refresh_token_secret.clone(),
    ));

    seed_admin(&settings, &account_store).await;

    // Assemble API surfaces
    let auth_api = AuthApi::new(account_store.clone(), token_manager.clone());
    let user_api = UserApi::new(account_store.clone(), token_manager.clone());
    let offers_api = OffersApi::new(
        offer_store.clone(),
        account_store.clone(),
        token_manager.clone(),
    );
    let tickets_api = TicketsApi::new(
        ticket_store.clone(),
        offer_store.clone(),
        account_store.clone(),
        token_manager.clone(),
        settings.public_base_url.clone(),
    );
    let admin_api = AdminApi::new(
        ticket_store.clone(),
        stats_store.clone(),
        account_store.clone(),
        token_manager.clone(),
        settings.public_base_url.clone(),
    );

    let api_service = OpenApiService::new(
        (
            HealthApi, auth_api, user_api, offers_api, tickets_api, admin_api,
        ),
        "Ticketbooth API",
        "1.0.0",
    )
    .server(format!("{}/api", settings.public_base_url));

    let ui = api_service.swagger_ui();

    // Compose routes: API under /api, Swagger under /swagger, QR images under /media
    let app = Route::new()
        .nest("/api", api_service)
        .nest("/swagger", ui)
        .nest(
            "/media",
            StaticFilesEndpoint::new(settings.media_root.clone()),
        );

    tracing::info!(bind_addr = %settings.bind_addr, "Starting server");

    Server::new(TcpListener::bind(settings.bind_addr.clone()))
        .run(app)
        .await
}
