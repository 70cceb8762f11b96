// Database entities - SeaORM models
pub mod offer;
pub mod offer_stats;
pub mod refresh_token;
pub mod ticket;
pub mod user;
