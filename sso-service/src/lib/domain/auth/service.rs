use std::sync::Arc;

use async_trait::async_trait;
use chrono::Duration;
use tokio::sync::OnceCell;

use crate::domain::auth::errors::AuthError;
use crate::domain::auth::errors::AuthErrorKind;
use crate::domain::auth::errors::HashError;
use crate::domain::auth::errors::StorageError;
use crate::domain::auth::models::AppId;
use crate::domain::auth::models::UserId;
use crate::domain::auth::ports::AppProvider;
use crate::domain::auth::ports::AuthServicePort;
use crate::domain::auth::ports::CredentialHasher;
use crate::domain::auth::ports::TokenIssuer;
use crate::domain::auth::ports::UserProvider;
use crate::domain::auth::ports::UserSaver;

const OP_LOGIN: &str = "auth.login";
const OP_REGISTER: &str = "auth.register_new_user";
const OP_IS_ADMIN: &str = "auth.is_admin";

/// Password hashed once to build the hash that unknown emails are verified against.
const DUMMY_PASSWORD: &str = "sso-dummy-password";

/// Domain service implementation for authentication operations.
///
/// Stateless orchestration over injected collaborators: it holds no
/// mutable state and never retries. Its job is translating collaborator
/// failures into `AuthErrorKind`s.
pub struct AuthService<US, UP, AP, CH, TI>
where
    US: UserSaver,
    UP: UserProvider,
    AP: AppProvider,
    CH: CredentialHasher,
    TI: TokenIssuer,
{
    user_saver: Arc<US>,
    user_provider: Arc<UP>,
    app_provider: Arc<AP>,
    hasher: Arc<CH>,
    token_issuer: Arc<TI>,
    token_ttl: Duration,
    dummy_hash: OnceCell<Vec<u8>>,
}

impl<US, UP, AP, CH, TI> AuthService<US, UP, AP, CH, TI>
where
    US: UserSaver,
    UP: UserProvider,
    AP: AppProvider,
    CH: CredentialHasher,
    TI: TokenIssuer,
{
    /// Create a new auth service with injected dependencies.
    ///
    /// # Arguments
    /// * `user_saver` - User write storage
    /// * `user_provider` - User read storage
    /// * `app_provider` - Application read storage
    /// * `hasher` - Password hashing implementation
    /// * `token_issuer` - Access token signing implementation
    /// * `token_ttl` - Lifetime of issued tokens
    pub fn new(
        user_saver: Arc<US>,
        user_provider: Arc<UP>,
        app_provider: Arc<AP>,
        hasher: Arc<CH>,
        token_issuer: Arc<TI>,
        token_ttl: Duration,
    ) -> Self {
        Self {
            user_saver,
            user_provider,
            app_provider,
            hasher,
            token_issuer,
            token_ttl,
            dummy_hash: OnceCell::new(),
        }
    }

    async fn hash_password(&self, password: &str) -> Result<Vec<u8>, HashError> {
        let hasher = Arc::clone(&self.hasher);
        let password = password.to_owned();

        tokio::task::spawn_blocking(move || hasher.hash(&password))
            .await
            .map_err(|e| HashError::HashingFailed(e.to_string()))?
    }

    async fn verify_password(&self, password: &str, password_hash: &[u8]) -> Result<bool, HashError> {
        let hasher = Arc::clone(&self.hasher);
        let password = password.to_owned();
        let password_hash = password_hash.to_vec();

        tokio::task::spawn_blocking(move || hasher.verify(&password, &password_hash))
            .await
            .map_err(|e| HashError::VerificationFailed(e.to_string()))?
    }

    /// Spend one verification on an unknown email, matching the cost of a
    /// wrong password. The outcome is discarded.
    async fn verify_dummy(&self, password: &str) {
        let dummy_hash = self
            .dummy_hash
            .get_or_try_init(|| self.hash_password(DUMMY_PASSWORD))
            .await;

        let result = match dummy_hash {
            Ok(dummy_hash) => self.verify_password(password, dummy_hash).await.map(|_| ()),
            Err(e) => Err(e),
        };

        if let Err(e) = result {
            tracing::debug!(op = OP_LOGIN, error = %e, "dummy verification failed");
        }
    }
}

#[async_trait]
impl<US, UP, AP, CH, TI> AuthServicePort for AuthService<US, UP, AP, CH, TI>
where
    US: UserSaver,
    UP: UserProvider,
    AP: AppProvider,
    CH: CredentialHasher,
    TI: TokenIssuer,
{
    async fn login(
        &self,
        email: &str,
        password: &str,
        app_id: AppId,
    ) -> Result<String, AuthError> {
        tracing::info!(op = OP_LOGIN, email, app_id = %app_id, "attempting to login user");

        let user = match self.user_provider.user(email).await {
            Ok(user) => user,
            Err(StorageError::UserNotFound(_)) => {
                tracing::warn!(op = OP_LOGIN, email, "user not found");
                self.verify_dummy(password).await;
                return Err(AuthError::new(OP_LOGIN, AuthErrorKind::InvalidCredentials));
            }
            Err(e) => {
                tracing::error!(op = OP_LOGIN, email, error = %e, "failed to get user");
                return Err(AuthError::internal(OP_LOGIN, e));
            }
        };

        let password_matches = self
            .verify_password(password, &user.password_hash)
            .await
            .map_err(|e| {
                tracing::error!(op = OP_LOGIN, user_id = %user.id, error = %e, "failed to verify password");
                AuthError::internal(OP_LOGIN, e)
            })?;

        if !password_matches {
            tracing::info!(op = OP_LOGIN, user_id = %user.id, "invalid credentials");
            return Err(AuthError::new(OP_LOGIN, AuthErrorKind::InvalidCredentials));
        }

        let app = match self.app_provider.app(app_id).await {
            Ok(app) => app,
            Err(e @ StorageError::AppNotFound(_)) => {
                tracing::warn!(op = OP_LOGIN, app_id = %app_id, "app not found");
                return Err(AuthError::with_source(
                    OP_LOGIN,
                    AuthErrorKind::UnknownApplication,
                    e,
                ));
            }
            Err(e) => {
                tracing::error!(op = OP_LOGIN, app_id = %app_id, error = %e, "failed to get app");
                return Err(AuthError::internal(OP_LOGIN, e));
            }
        };

        let token = self
            .token_issuer
            .issue(&user, &app, self.token_ttl)
            .map_err(|e| {
                tracing::error!(op = OP_LOGIN, app_id = %app_id, error = %e, "failed to generate token");
                AuthError::internal(OP_LOGIN, e)
            })?;

        tracing::info!(op = OP_LOGIN, user_id = %user.id, app_id = %app_id, "user logged in successfully");

        Ok(token)
    }

    async fn register_new_user(&self, email: &str, password: &str) -> Result<UserId, AuthError> {
        tracing::info!(op = OP_REGISTER, email, "registering user");

        let password_hash = self.hash_password(password).await.map_err(|e| {
            tracing::error!(op = OP_REGISTER, email, error = %e, "failed to generate password hash");
            AuthError::internal(OP_REGISTER, e)
        })?;

        let user_id = match self.user_saver.save_user(email, &password_hash).await {
            Ok(user_id) => user_id,
            Err(e @ StorageError::DuplicateEmail(_)) => {
                tracing::warn!(op = OP_REGISTER, email, "user already exists");
                return Err(AuthError::with_source(
                    OP_REGISTER,
                    AuthErrorKind::UserAlreadyExists,
                    e,
                ));
            }
            Err(e) => {
                tracing::error!(op = OP_REGISTER, email, error = %e, "failed to save user");
                return Err(AuthError::internal(OP_REGISTER, e));
            }
        };

        tracing::info!(op = OP_REGISTER, user_id = %user_id, "user registered");

        Ok(user_id)
    }

    async fn is_admin(&self, user_id: UserId) -> Result<bool, AuthError> {
        tracing::info!(op = OP_IS_ADMIN, user_id = %user_id, "checking if user is admin");

        let is_admin = match self.user_provider.is_admin(user_id).await {
            Ok(is_admin) => is_admin,
            Err(e @ StorageError::UserNotFound(_)) => {
                tracing::warn!(op = OP_IS_ADMIN, user_id = %user_id, "user not found");
                return Err(AuthError::with_source(OP_IS_ADMIN, AuthErrorKind::NotFound, e));
            }
            Err(e) => {
                tracing::error!(op = OP_IS_ADMIN, user_id = %user_id, error = %e, "failed to check admin status");
                return Err(AuthError::internal(OP_IS_ADMIN, e));
            }
        };

        tracing::info!(op = OP_IS_ADMIN, user_id = %user_id, is_admin, "checked if user is admin");

        Ok(is_admin)
    }
}
