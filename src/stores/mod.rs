// Stores layer - Data access and repository pattern
pub mod account_store;
pub mod offer_store;
pub mod stats_store;
pub mod ticket_store;

pub use account_store::{AccountStore, NewAccount};
pub use offer_store::{NewOffer, OfferChanges, OfferStore};
pub use stats_store::{DashboardData, OfferAggregate, StatsStore, TypeAggregate};
pub use ticket_store::{TicketRecord, TicketStore};
