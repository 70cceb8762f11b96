use poem_openapi::{auth::Bearer, payload::Json, OpenApi, SecurityScheme, Tags};
use std::sync::Arc;

use crate::errors::auth::AuthError;
use crate::services::{password_policy, TokenService};
use crate::stores::{AccountStore, NewAccount};
use crate::types::db::user;
use crate::types::dto::auth::{
    LoginRequest, LogoutRequest, LogoutResponse, RefreshRequest, RefreshResponse, RegisterCreated,
    RegisterRequest, RegisterResponse, TokenResponse,
};

/// Authentication API endpoints
pub struct AuthApi {
    account_store: Arc<AccountStore>,
    token_manager: Arc<TokenService>,
}

impl AuthApi {
    /// Create a new AuthApi with the given AccountStore and TokenService
    pub fn new(account_store: Arc<AccountStore>, token_manager: Arc<TokenService>) -> Self {
        Self {
            account_store,
            token_manager,
        }
    }

    /// Issue an access/refresh token pair for a freshly authenticated user
    async fn issue_tokens(&self, user: &user::Model) -> Result<(String, String), AuthError> {
        let user_id = uuid::Uuid::parse_str(&user.id)
            .map_err(|e| AuthError::internal_error(format!("Invalid user_id format: {}", e)))?;

        let access_token = self.token_manager.generate_jwt(&user_id)?;
        let refresh_token = self.token_manager.generate_refresh_token();

        let token_hash = self.token_manager.hash_refresh_token(&refresh_token);
        let expires_at = self.token_manager.refresh_expiration();
        self.account_store
            .store_refresh_token(token_hash, user.id.clone(), expires_at)
            .await?;

        Ok((access_token, refresh_token))
    }
}

/// JWT Bearer token authentication
#[derive(SecurityScheme)]
#[oai(
    ty = "bearer",
    key_name = "Authorization",
    key_in = "header",
    bearer_format = "JWT"
)]
pub struct BearerAuth(pub Bearer);

/// API tags for authentication endpoints
#[derive(Tags)]
enum AuthTags {
    /// Authentication endpoints
    Authentication,
}

#[OpenApi(prefix_path = "/auth")]
impl AuthApi {
    /// Register a new account and receive authentication tokens
    #[oai(path = "/register", method = "post", tag = "AuthTags::Authentication")]
    pub async fn register(&self, body: Json<RegisterRequest>) -> Result<RegisterCreated, AuthError> {
        password_policy::validate_password(&body.password)
            .map_err(|e| AuthError::weak_password(e.to_string()))?;

        let created = self
            .account_store
            .register(NewAccount {
                username: body.username.clone(),
                email: body.email.clone(),
                password: body.password.clone(),
                first_name: body.first_name.clone(),
                last_name: body.last_name.clone(),
            })
            .await?;

        let (access_token, refresh_token) = self.issue_tokens(&created).await?;

        Ok(RegisterCreated::Created(Json(RegisterResponse {
            user: created.into(),
            access_token,
            refresh_token,
            token_type: "Bearer".to_string(),
            expires_in: self.token_manager.access_ttl_seconds(),
        })))
    }

    /// Login with email and password to receive authentication tokens
    #[oai(path = "/login", method = "post", tag = "AuthTags::Authentication")]
    pub async fn login(&self, body: Json<LoginRequest>) -> Result<Json<TokenResponse>, AuthError> {
        let user = self
            .account_store
            .verify_credentials(&body.email, &body.password)
            .await?;

        let (access_token, refresh_token) = self.issue_tokens(&user).await?;

        Ok(Json(TokenResponse {
            access_token,
            refresh_token,
            token_type: "Bearer".to_string(),
            expires_in: self.token_manager.access_ttl_seconds(),
        }))
    }

    /// Refresh access token using a refresh token
    #[oai(path = "/refresh", method = "post", tag = "AuthTags::Authentication")]
    pub async fn refresh(&self, body: Json<RefreshRequest>) -> Result<Json<RefreshResponse>, AuthError> {
        let token_hash = self.token_manager.hash_refresh_token(&body.refresh_token);

        let user_id_str = self.account_store.validate_refresh_token(&token_hash).await?;

        let user_id = uuid::Uuid::parse_str(&user_id_str)
            .map_err(|e| AuthError::internal_error(format!("Invalid user_id format: {}", e)))?;

        let access_token = self.token_manager.generate_jwt(&user_id)?;

        // Same refresh token stays valid until logout or expiry
        Ok(Json(RefreshResponse {
            access_token,
            token_type: "Bearer".to_string(),
            expires_in: self.token_manager.access_ttl_seconds(),
        }))
    }

    /// Logout and revoke refresh token
    #[oai(path = "/logout", method = "post", tag = "AuthTags::Authentication")]
    pub async fn logout(
        &self,
        auth: BearerAuth,
        body: Json<LogoutRequest>,
    ) -> Result<Json<LogoutResponse>, AuthError> {
        let claims = self.token_manager.validate_jwt(&auth.0.token)?;

        let token_hash = self.token_manager.hash_refresh_token(&body.refresh_token);

        // Revoke only the caller's own token; unknown tokens are a no-op
        self.account_store
            .revoke_refresh_token(&token_hash, &claims.sub)
            .await?;

        Ok(Json(LogoutResponse {
            message: "Logged out successfully".to_string(),
        }))
    }
}
