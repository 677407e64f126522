use async_trait::async_trait;
use chrono::Duration;

use crate::domain::auth::errors::AuthError;
use crate::domain::auth::errors::HashError;
use crate::domain::auth::errors::StorageError;
use crate::domain::auth::errors::TokenError;
use crate::domain::auth::models::App;
use crate::domain::auth::models::AppId;
use crate::domain::auth::models::User;
use crate::domain::auth::models::UserId;

/// Port for authentication domain service operations.
///
/// Dropping a returned future cancels the operation together with the
/// collaborator calls it is awaiting.
#[async_trait]
pub trait AuthServicePort: Send + Sync + 'static {
    /// Verify credentials and issue a token scoped to an application.
    ///
    /// # Arguments
    /// * `email` - User email
    /// * `password` - Plaintext password
    /// * `app_id` - Application the token is issued for
    ///
    /// # Returns
    /// Signed access token
    ///
    /// # Errors
    /// * `InvalidCredentials` - Unknown email or wrong password
    /// * `UnknownApplication` - Application does not exist
    /// * `Internal` - Storage, hashing or signing failed
    async fn login(&self, email: &str, password: &str, app_id: AppId)
        -> Result<String, AuthError>;

    /// Register a new user.
    ///
    /// # Arguments
    /// * `email` - Email, must not be registered yet
    /// * `password` - Plaintext password (hashed before storage)
    ///
    /// # Returns
    /// Identifier assigned to the new user
    ///
    /// # Errors
    /// * `UserAlreadyExists` - Email is already registered
    /// * `Internal` - Storage or hashing failed
    async fn register_new_user(&self, email: &str, password: &str) -> Result<UserId, AuthError>;

    /// Check whether a user has administrator privilege.
    ///
    /// # Errors
    /// * `NotFound` - User does not exist
    /// * `Internal` - Storage failed
    async fn is_admin(&self, user_id: UserId) -> Result<bool, AuthError>;
}

/// Writes new users.
#[async_trait]
pub trait UserSaver: Send + Sync + 'static {
    /// Persist a new user and return its assigned identifier.
    ///
    /// # Errors
    /// * `DuplicateEmail` - Email is already registered
    /// * `Database` - Storage operation failed
    async fn save_user(&self, email: &str, password_hash: &[u8]) -> Result<UserId, StorageError>;
}

/// Reads users.
#[async_trait]
pub trait UserProvider: Send + Sync + 'static {
    /// Retrieve user by email (exact, case-sensitive match).
    ///
    /// # Errors
    /// * `UserNotFound` - No user with this email
    /// * `Database` - Storage operation failed
    async fn user(&self, email: &str) -> Result<User, StorageError>;

    /// Retrieve the administrator flag of a user.
    ///
    /// # Errors
    /// * `UserNotFound` - User does not exist
    /// * `Database` - Storage operation failed
    async fn is_admin(&self, user_id: UserId) -> Result<bool, StorageError>;
}

/// Reads client applications.
#[async_trait]
pub trait AppProvider: Send + Sync + 'static {
    /// Retrieve application by identifier.
    ///
    /// # Errors
    /// * `AppNotFound` - Application does not exist
    /// * `Database` - Storage operation failed
    async fn app(&self, app_id: AppId) -> Result<App, StorageError>;
}

/// One-way password hashing.
///
/// Implementations are CPU bound; the service calls them from the
/// blocking thread pool.
pub trait CredentialHasher: Send + Sync + 'static {
    /// Hash a password with a fresh salt.
    fn hash(&self, password: &str) -> Result<Vec<u8>, HashError>;

    /// Check a password against a hash produced by `hash`.
    fn verify(&self, password: &str, password_hash: &[u8]) -> Result<bool, HashError>;
}

/// Builds signed access tokens.
pub trait TokenIssuer: Send + Sync + 'static {
    /// Issue a token for `user`, scoped to and signed for `app`, valid for `ttl`.
    fn issue(&self, user: &User, app: &App, ttl: Duration) -> Result<String, TokenError>;
}
