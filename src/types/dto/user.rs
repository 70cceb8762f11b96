use poem_openapi::Object;
use serde::{Deserialize, Serialize};

use crate::types::db::user;

/// Public view of a user account
#[derive(Object, Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    /// User ID (UUID)
    pub id: String,

    /// Username
    pub username: String,

    /// Email address
    pub email: String,

    /// First name
    pub first_name: String,

    /// Last name
    pub last_name: String,

    /// Per-user secret component of ticket keys (UUID)
    pub account_key: String,

    /// Whether the user has staff privileges
    pub is_staff: bool,

    /// Registration time (Unix timestamp)
    pub date_joined: i64,
}

impl From<user::Model> for UserProfile {
    fn from(u: user::Model) -> Self {
        Self {
            id: u.id,
            username: u.username,
            email: u.email,
            first_name: u.first_name,
            last_name: u.last_name,
            account_key: u.account_key,
            is_staff: u.is_staff,
            date_joined: u.created_at,
        }
    }
}
