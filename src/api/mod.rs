// API layer - HTTP endpoints
pub mod admin;
pub mod auth;
pub mod health;
pub mod helpers;
pub mod offers;
pub mod tickets;
pub mod user;

pub use admin::AdminApi;
pub use auth::AuthApi;
pub use health::HealthApi;
pub use offers::OffersApi;
pub use tickets::TicketsApi;
pub use user::UserApi;
