use std::env;
use std::path::PathBuf;

/// Errors raised while loading settings from the environment
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("Required environment variable {0} is not set")]
    MissingVar(&'static str),
}

/// Application settings, loaded once at startup
#[derive(Debug, Clone)]
pub struct AppSettings {
    /// SeaORM connection string
    pub database_url: String,

    /// Address the HTTP server binds to
    pub bind_addr: String,

    /// Base URL clients use to reach this server; QR URLs are built from it
    pub public_base_url: String,

    /// Directory holding generated media (QR images land under qr_codes/)
    pub media_root: PathBuf,

    /// HS256 signing secret for access tokens
    pub jwt_secret: String,

    /// HMAC secret for refresh token hashing
    pub refresh_token_secret: String,

    /// Server-side pepper mixed into password hashes
    pub password_pepper: String,

    /// Optional bootstrap admin account, created at startup when both are set
    pub admin_email: Option<String>,
    pub admin_password: Option<String>,
    pub admin_username: String,
}

impl AppSettings {
    /// Load settings from environment variables
    ///
    /// Secrets are required; everything else has development defaults.
    pub fn from_env() -> Result<Self, SettingsError> {
        let require = |name: &'static str| env::var(name).map_err(|_| SettingsError::MissingVar(name));

        Ok(Self {
            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| "sqlite://tickets.db?mode=rwc".to_string()),
            bind_addr: env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string()),
            public_base_url: env::var("PUBLIC_BASE_URL")
                .unwrap_or_else(|_| "http://localhost:3000".to_string()),
            media_root: env::var("MEDIA_ROOT")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("media")),
            jwt_secret: require("JWT_SECRET")?,
            refresh_token_secret: require("REFRESH_TOKEN_SECRET")?,
            password_pepper: require("PASSWORD_PEPPER")?,
            admin_email: env::var("ADMIN_EMAIL").ok(),
            admin_password: env::var("ADMIN_PASSWORD").ok(),
            admin_username: env::var("ADMIN_USERNAME").unwrap_or_else(|_| "admin".to_string()),
        })
    }
}
