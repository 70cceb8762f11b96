use poem_openapi::auth::Bearer;

use crate::errors::auth::AuthError;
use crate::errors::guard::GuardError;
use crate::services::TokenService;
use crate::stores::AccountStore;
use crate::types::db::user;

/// Resolve a bearer token to its user record
pub async fn current_user(
    token_service: &TokenService,
    account_store: &AccountStore,
    bearer: &Bearer,
) -> Result<user::Model, GuardError> {
    let claims = token_service
        .validate_jwt(&bearer.token)
        .map_err(|e| match e {
            AuthError::ExpiredToken(_) => GuardError::ExpiredToken,
            _ => GuardError::InvalidToken,
        })?;

    account_store
        .find_by_id(&claims.sub)
        .await
        .map_err(|e| GuardError::Database(e.message()))?
        .ok_or(GuardError::UnknownUser)
}

/// Resolve a bearer token and require staff privileges
pub async fn require_staff(
    token_service: &TokenService,
    account_store: &AccountStore,
    bearer: &Bearer,
) -> Result<user::Model, GuardError> {
    let user = current_user(token_service, account_store, bearer).await?;
    if !user.is_staff {
        return Err(GuardError::NotStaff);
    }
    Ok(user)
}

/// Build the public URL for a media-root-relative path
pub fn media_url(public_base_url: &str, relative: &str) -> String {
    format!("{}/media/{}", public_base_url.trim_end_matches('/'), relative)
}
