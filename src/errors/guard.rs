/// Outcome of resolving a bearer token to a user, shared by the
/// authenticated API surfaces and mapped into each surface's error type
#[derive(Debug, thiserror::Error)]
pub enum GuardError {
    #[error("invalid or malformed JWT")]
    InvalidToken,

    #[error("JWT has expired")]
    ExpiredToken,

    #[error("token subject no longer exists")]
    UnknownUser,

    #[error("staff privileges required")]
    NotStaff,

    #[error("database error: {0}")]
    Database(String),
}
