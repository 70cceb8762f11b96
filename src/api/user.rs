use poem_openapi::{payload::Json, OpenApi, Tags};
use std::sync::Arc;

use crate::api::auth::BearerAuth;
use crate::errors::auth::AuthError;
use crate::services::TokenService;
use crate::stores::AccountStore;
use crate::types::dto::user::UserProfile;

/// Current-user API endpoints
pub struct UserApi {
    account_store: Arc<AccountStore>,
    token_manager: Arc<TokenService>,
}

impl UserApi {
    pub fn new(account_store: Arc<AccountStore>, token_manager: Arc<TokenService>) -> Self {
        Self {
            account_store,
            token_manager,
        }
    }
}

/// API tags for user endpoints
#[derive(Tags)]
enum UserTags {
    /// User profile endpoints
    Users,
}

#[OpenApi(prefix_path = "/user")]
impl UserApi {
    /// Profile of the authenticated user
    #[oai(path = "/me", method = "get", tag = "UserTags::Users")]
    pub async fn me(&self, auth: BearerAuth) -> Result<Json<UserProfile>, AuthError> {
        let claims = self.token_manager.validate_jwt(&auth.0.token)?;

        let user = self
            .account_store
            .find_by_id(&claims.sub)
            .await?
            .ok_or_else(AuthError::invalid_token)?;

        Ok(Json(user.into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stores::NewAccount;
    use migration::{Migrator, MigratorTrait};
    use poem_openapi::auth::Bearer;
    use sea_orm::Database;

    async fn setup_test_api() -> (UserApi, Arc<AccountStore>, Arc<TokenService>) {
        let db = Database::connect("sqlite::memory:")
            .await
            .expect("Failed to create test database");

        Migrator::up(&db, None)
            .await
            .expect("Failed to run migrations");

        let account_store = Arc::new(AccountStore::new(db, "test-pepper".to_string()));
        let token_manager = Arc::new(TokenService::new(
            "test-secret-key-minimum-32-characters-long".to_string(),
            "test-refresh-secret-minimum-32-chars".to_string(),
        ));

        let api = UserApi::new(account_store.clone(), token_manager.clone());
        (api, account_store, token_manager)
    }

    #[tokio::test]
    async fn test_me_returns_profile_for_valid_jwt() {
        let (api, store, tokens) = setup_test_api().await;

        let created = store
            .register(NewAccount {
                username: "alice".to_string(),
                email: "alice@example.com".to_string(),
                password: "Str0ng!pass".to_string(),
                first_name: "Alice".to_string(),
                last_name: "Martin".to_string(),
            })
            .await
            .unwrap();

        let jwt = tokens
            .generate_jwt(&uuid::Uuid::parse_str(&created.id).unwrap())
            .unwrap();

        let result = api.me(BearerAuth(Bearer { token: jwt })).await;

        assert!(result.is_ok());
        let profile = result.unwrap();
        assert_eq!(profile.id, created.id);
        assert_eq!(profile.username, "alice");
        assert_eq!(profile.account_key, created.account_key);
        assert!(!profile.is_staff);
    }

    #[tokio::test]
    async fn test_me_rejects_invalid_jwt() {
        let (api, _store, _tokens) = setup_test_api().await;

        let result = api
            .me(BearerAuth(Bearer {
                token: "garbage".to_string(),
            }))
            .await;

        assert!(matches!(result, Err(AuthError::InvalidToken(_))));
    }

    #[tokio::test]
    async fn test_me_rejects_token_for_deleted_user() {
        let (api, _store, tokens) = setup_test_api().await;

        // Valid signature but the subject was never registered
        let jwt = tokens.generate_jwt(&uuid::Uuid::new_v4()).unwrap();

        let result = api.me(BearerAuth(Bearer { token: jwt })).await;

        assert!(matches!(result, Err(AuthError::InvalidToken(_))));
    }
}
