// Configuration layer - environment-derived settings and logging setup
pub mod logging;
pub mod settings;

pub use settings::{AppSettings, SettingsError};
