// Internal types - not exposed over the API
pub mod auth;
