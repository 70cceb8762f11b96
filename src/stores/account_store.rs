use argon2::{
    password_hash::SaltString, Algorithm, Argon2, Params, PasswordHash, PasswordHasher,
    PasswordVerifier, Version,
};
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set,
    TransactionTrait,
};
use uuid::Uuid;

use crate::errors::auth::AuthError;
use crate::types::db::refresh_token::{self, ActiveModel as RefreshTokenActiveModel};
use crate::types::db::user::{self, ActiveModel, Entity as User};

/// Registration data for a new account
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub username: String,
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
}

/// AccountStore manages user accounts, credentials and refresh tokens
pub struct AccountStore {
    db: DatabaseConnection,
    password_pepper: String,
}

impl AccountStore {
    /// Create a new AccountStore with the given database connection and password pepper
    ///
    /// # Arguments
    /// * `db` - The database connection
    /// * `password_pepper` - The secret key mixed into password hashes
    pub fn new(db: DatabaseConnection, password_pepper: String) -> Self {
        Self {
            db,
            password_pepper,
        }
    }

    fn argon2(&self) -> Result<Argon2<'_>, AuthError> {
        Argon2::new_with_secret(
            self.password_pepper.as_bytes(),
            Algorithm::Argon2id,
            Version::V0x13,
            Params::default(),
        )
        .map_err(|e| AuthError::internal_error(format!("Failed to initialize Argon2: {}", e)))
    }

    /// Register a new account
    ///
    /// The caller is expected to have run the password policy first; this
    /// method only enforces uniqueness and persistence.
    ///
    /// # Returns
    /// * `Ok(user::Model)` - The created user, including its fresh `account_key`
    /// * `Err(AuthError)` - DuplicateUsername / DuplicateEmail, or InternalError
    pub async fn register(&self, account: NewAccount) -> Result<user::Model, AuthError> {
        let existing_username = User::find()
            .filter(user::Column::Username.eq(&account.username))
            .one(&self.db)
            .await
            .map_err(|e| AuthError::internal_error(format!("Database error: {}", e)))?;
        if existing_username.is_some() {
            return Err(AuthError::duplicate_username());
        }

        let existing_email = User::find()
            .filter(user::Column::Email.eq(&account.email))
            .one(&self.db)
            .await
            .map_err(|e| AuthError::internal_error(format!("Database error: {}", e)))?;
        if existing_email.is_some() {
            return Err(AuthError::duplicate_email());
        }

        // Hash password with Argon2id, peppered
        let salt = SaltString::generate(&mut rand_core::OsRng);
        let password_hash = self
            .argon2()?
            .hash_password(account.password.as_bytes(), &salt)
            .map_err(|e| AuthError::internal_error(format!("Password hashing error: {}", e)))?
            .to_string();

        let now = Utc::now().timestamp();

        let new_user = ActiveModel {
            id: Set(Uuid::new_v4().to_string()),
            username: Set(account.username),
            email: Set(account.email),
            password_hash: Set(password_hash),
            first_name: Set(account.first_name),
            last_name: Set(account.last_name),
            account_key: Set(Uuid::new_v4().to_string()),
            is_staff: Set(false),
            created_at: Set(now),
            updated_at: Set(now),
        };

        new_user.insert(&self.db).await.map_err(|e| {
            // Unique constraint races fall through the pre-checks
            if e.to_string().contains("UNIQUE") {
                AuthError::duplicate_username()
            } else {
                AuthError::internal_error(format!("Database error: {}", e))
            }
        })
    }

    /// Verify login credentials and return the matching user
    ///
    /// # Arguments
    /// * `email` - The login email
    /// * `password` - The plaintext password to verify
    ///
    /// # Returns
    /// * `Ok(user::Model)` - The authenticated user
    /// * `Err(AuthError)` - InvalidCredentials if email unknown or password wrong
    pub async fn verify_credentials(
        &self,
        email: &str,
        password: &str,
    ) -> Result<user::Model, AuthError> {
        let found = User::find()
            .filter(user::Column::Email.eq(email))
            .one(&self.db)
            .await
            .map_err(|_| AuthError::invalid_credentials())?;

        let found = found.ok_or_else(AuthError::invalid_credentials)?;

        let parsed_hash =
            PasswordHash::new(&found.password_hash).map_err(|_| AuthError::invalid_credentials())?;

        self.argon2()
            .map_err(|_| AuthError::invalid_credentials())?
            .verify_password(password.as_bytes(), &parsed_hash)
            .map_err(|_| AuthError::invalid_credentials())?;

        Ok(found)
    }

    /// Look up a user by id
    pub async fn find_by_id(&self, user_id: &str) -> Result<Option<user::Model>, AuthError> {
        User::find_by_id(user_id)
            .one(&self.db)
            .await
            .map_err(|e| AuthError::internal_error(format!("Database error: {}", e)))
    }

    /// Grant or revoke staff privileges
    pub async fn set_staff(&self, user_id: &str, is_staff: bool) -> Result<(), AuthError> {
        let found = self
            .find_by_id(user_id)
            .await?
            .ok_or_else(AuthError::invalid_token)?;

        let mut active: ActiveModel = found.into();
        active.is_staff = Set(is_staff);
        active.updated_at = Set(Utc::now().timestamp());
        active
            .update(&self.db)
            .await
            .map_err(|e| AuthError::internal_error(format!("Database error: {}", e)))?;

        Ok(())
    }

    /// Store a refresh token hash for a user
    ///
    /// # Arguments
    /// * `token_hash` - HMAC-SHA256 hash of the refresh token
    /// * `user_id` - The user this token belongs to
    /// * `expires_at` - Unix timestamp when the token expires
    pub async fn store_refresh_token(
        &self,
        token_hash: String,
        user_id: String,
        expires_at: i64,
    ) -> Result<(), AuthError> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| AuthError::internal_error(format!("Failed to start transaction: {}", e)))?;

        let new_token = RefreshTokenActiveModel {
            id: sea_orm::ActiveValue::NotSet,
            token_hash: Set(token_hash),
            user_id: Set(user_id),
            expires_at: Set(expires_at),
            created_at: Set(Utc::now().timestamp()),
        };

        new_token
            .insert(&txn)
            .await
            .map_err(|e| AuthError::internal_error(format!("Failed to store refresh token: {}", e)))?;

        txn.commit()
            .await
            .map_err(|e| AuthError::internal_error(format!("Failed to commit transaction: {}", e)))?;

        Ok(())
    }

    /// Validate a refresh token hash and return the owning user id
    ///
    /// # Returns
    /// * `Ok(String)` - The user id if the token exists and has not expired
    /// * `Err(AuthError)` - InvalidRefreshToken if unknown, ExpiredRefreshToken if expired
    pub async fn validate_refresh_token(&self, token_hash: &str) -> Result<String, AuthError> {
        let token = refresh_token::Entity::find()
            .filter(refresh_token::Column::TokenHash.eq(token_hash))
            .one(&self.db)
            .await
            .map_err(|e| AuthError::internal_error(format!("Database error: {}", e)))?;

        let token = token.ok_or_else(AuthError::invalid_refresh_token)?;

        if token.expires_at < Utc::now().timestamp() {
            return Err(AuthError::expired_refresh_token());
        }

        Ok(token.user_id)
    }

    /// Revoke a refresh token, scoped to its owner
    ///
    /// Deleting a token that does not exist or belongs to another user is a
    /// no-op; logout stays idempotent and leaks nothing about other sessions.
    pub async fn revoke_refresh_token(
        &self,
        token_hash: &str,
        user_id: &str,
    ) -> Result<(), AuthError> {
        refresh_token::Entity::delete_many()
            .filter(refresh_token::Column::TokenHash.eq(token_hash))
            .filter(refresh_token::Column::UserId.eq(user_id))
            .exec(&self.db)
            .await
            .map_err(|e| AuthError::internal_error(format!("Failed to revoke refresh token: {}", e)))?;

        Ok(())
    }
}

impl std::fmt::Debug for AccountStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccountStore")
            .field("db", &"<connection>")
            .field("password_pepper", &"<redacted>")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use migration::{Migrator, MigratorTrait};
    use sea_orm::Database;

    async fn setup_test_db() -> (DatabaseConnection, AccountStore) {
        let db = Database::connect("sqlite::memory:")
            .await
            .expect("Failed to create test database");

        Migrator::up(&db, None)
            .await
            .expect("Failed to run migrations");

        let store = AccountStore::new(db.clone(), "test-pepper-for-unit-tests".to_string());
        (db, store)
    }

    fn test_account(username: &str, email: &str) -> NewAccount {
        NewAccount {
            username: username.to_string(),
            email: email.to_string(),
            password: "Str0ng!pass".to_string(),
            first_name: "Test".to_string(),
            last_name: "User".to_string(),
        }
    }

    #[tokio::test]
    async fn test_register_creates_user_with_account_key() {
        let (_db, store) = setup_test_db().await;

        let created = store
            .register(test_account("alice", "alice@example.com"))
            .await
            .expect("Failed to register");

        assert!(!created.id.is_empty());
        assert!(Uuid::parse_str(&created.account_key).is_ok());
        assert!(!created.is_staff);
    }

    #[tokio::test]
    async fn test_register_hashes_password() {
        let (db, store) = setup_test_db().await;

        store
            .register(test_account("alice", "alice@example.com"))
            .await
            .expect("Failed to register");

        let stored = User::find()
            .filter(user::Column::Username.eq("alice"))
            .one(&db)
            .await
            .expect("Failed to query user")
            .expect("User not found");

        assert_ne!(stored.password_hash, "Str0ng!pass");
        assert!(stored.password_hash.starts_with("$argon2"));
    }

    #[tokio::test]
    async fn test_register_rejects_duplicate_username() {
        let (_db, store) = setup_test_db().await;

        store
            .register(test_account("alice", "alice@example.com"))
            .await
            .expect("Failed to register");

        let result = store
            .register(test_account("alice", "other@example.com"))
            .await;

        assert!(matches!(result, Err(AuthError::DuplicateUsername(_))));
    }

    #[tokio::test]
    async fn test_register_rejects_duplicate_email() {
        let (_db, store) = setup_test_db().await;

        store
            .register(test_account("alice", "alice@example.com"))
            .await
            .expect("Failed to register");

        let result = store
            .register(test_account("bob", "alice@example.com"))
            .await;

        assert!(matches!(result, Err(AuthError::DuplicateEmail(_))));
    }

    #[tokio::test]
    async fn test_verify_credentials_succeeds_with_correct_password() {
        let (_db, store) = setup_test_db().await;

        let created = store
            .register(test_account("alice", "alice@example.com"))
            .await
            .expect("Failed to register");

        let verified = store
            .verify_credentials("alice@example.com", "Str0ng!pass")
            .await
            .expect("Failed to verify");

        assert_eq!(verified.id, created.id);
    }

    #[tokio::test]
    async fn test_verify_credentials_fails_with_wrong_password() {
        let (_db, store) = setup_test_db().await;

        store
            .register(test_account("alice", "alice@example.com"))
            .await
            .expect("Failed to register");

        let result = store
            .verify_credentials("alice@example.com", "Wr0ng!pass")
            .await;

        assert!(matches!(result, Err(AuthError::InvalidCredentials(_))));
    }

    #[tokio::test]
    async fn test_verify_credentials_fails_for_unknown_email() {
        let (_db, store) = setup_test_db().await;

        let result = store
            .verify_credentials("nobody@example.com", "Str0ng!pass")
            .await;

        assert!(matches!(result, Err(AuthError::InvalidCredentials(_))));
    }

    #[tokio::test]
    async fn test_refresh_token_roundtrip() {
        let (_db, store) = setup_test_db().await;

        let created = store
            .register(test_account("alice", "alice@example.com"))
            .await
            .expect("Failed to register");

        let expires_at = Utc::now().timestamp() + 3600;
        store
            .store_refresh_token("hash-1".to_string(), created.id.clone(), expires_at)
            .await
            .expect("Failed to store token");

        let user_id = store
            .validate_refresh_token("hash-1")
            .await
            .expect("Failed to validate token");

        assert_eq!(user_id, created.id);
    }

    #[tokio::test]
    async fn test_validate_refresh_token_rejects_unknown_hash() {
        let (_db, store) = setup_test_db().await;

        let result = store.validate_refresh_token("missing-hash").await;

        assert!(matches!(result, Err(AuthError::InvalidRefreshToken(_))));
    }

    #[tokio::test]
    async fn test_validate_refresh_token_rejects_expired() {
        let (_db, store) = setup_test_db().await;

        let created = store
            .register(test_account("alice", "alice@example.com"))
            .await
            .expect("Failed to register");

        let expired = Utc::now().timestamp() - 3600;
        store
            .store_refresh_token("hash-expired".to_string(), created.id, expired)
            .await
            .expect("Failed to store token");

        let result = store.validate_refresh_token("hash-expired").await;

        assert!(matches!(result, Err(AuthError::ExpiredRefreshToken(_))));
    }

    #[tokio::test]
    async fn test_revoke_refresh_token_is_owner_scoped() {
        let (_db, store) = setup_test_db().await;

        let alice = store
            .register(test_account("alice", "alice@example.com"))
            .await
            .expect("Failed to register alice");
        let bob = store
            .register(test_account("bob", "bob@example.com"))
            .await
            .expect("Failed to register bob");

        let expires_at = Utc::now().timestamp() + 3600;
        store
            .store_refresh_token("alice-hash".to_string(), alice.id.clone(), expires_at)
            .await
            .expect("Failed to store token");

        // Bob cannot revoke alice's token
        store
            .revoke_refresh_token("alice-hash", &bob.id)
            .await
            .expect("Revoke should be a no-op");
        assert!(store.validate_refresh_token("alice-hash").await.is_ok());

        // Alice can
        store
            .revoke_refresh_token("alice-hash", &alice.id)
            .await
            .expect("Failed to revoke");
        assert!(matches!(
            store.validate_refresh_token("alice-hash").await,
            Err(AuthError::InvalidRefreshToken(_))
        ));
    }
}
