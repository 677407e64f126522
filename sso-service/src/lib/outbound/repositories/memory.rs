use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::auth::errors::StorageError;
use crate::domain::auth::models::App;
use crate::domain::auth::models::AppId;
use crate::domain::auth::models::User;
use crate::domain::auth::models::UserId;
use crate::domain::auth::ports::AppProvider;
use crate::domain::auth::ports::UserProvider;
use crate::domain::auth::ports::UserSaver;

/// In-memory implementation of the user and application storage ports.
///
/// Identifiers are assigned sequentially starting at 1. The write lock is
/// the serialization point for concurrent registrations of the same email.
#[derive(Default)]
pub struct InMemoryStorage {
    state: RwLock<State>,
}

#[derive(Default)]
struct State {
    users: HashMap<UserId, User>,
    user_ids_by_email: HashMap<String, UserId>,
    apps: HashMap<AppId, App>,
    last_user_id: i64,
}

impl InMemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Provision a client application, replacing any with the same id.
    pub async fn insert_app(&self, app: App) {
        self.state.write().await.apps.insert(app.id, app);
    }

    /// Grant or revoke administrator privilege.
    ///
    /// # Errors
    /// * `UserNotFound` - User does not exist
    pub async fn set_admin(&self, user_id: UserId, is_admin: bool) -> Result<(), StorageError> {
        let mut state = self.state.write().await;
        let user = state
            .users
            .get_mut(&user_id)
            .ok_or_else(|| StorageError::user_not_found(user_id))?;
        user.is_admin = is_admin;
        Ok(())
    }

    /// Number of registered users.
    pub async fn user_count(&self) -> usize {
        self.state.read().await.users.len()
    }
}

#[async_trait]
impl UserSaver for InMemoryStorage {
    async fn save_user(&self, email: &str, password_hash: &[u8]) -> Result<UserId, StorageError> {
        let mut state = self.state.write().await;

        if state.user_ids_by_email.contains_key(email) {
            return Err(StorageError::DuplicateEmail(email.to_string()));
        }

        state.last_user_id += 1;
        let id = UserId(state.last_user_id);

        state.user_ids_by_email.insert(email.to_string(), id);
        state.users.insert(
            id,
            User {
                id,
                email: email.to_string(),
                password_hash: password_hash.to_vec(),
                is_admin: false,
            },
        );

        Ok(id)
    }
}

#[async_trait]
impl UserProvider for InMemoryStorage {
    async fn user(&self, email: &str) -> Result<User, StorageError> {
        let state = self.state.read().await;

        state
            .user_ids_by_email
            .get(email)
            .and_then(|id| state.users.get(id))
            .cloned()
            .ok_or_else(|| StorageError::UserNotFound(email.to_string()))
    }

    async fn is_admin(&self, user_id: UserId) -> Result<bool, StorageError> {
        self.state
            .read()
            .await
            .users
            .get(&user_id)
            .map(|user| user.is_admin)
            .ok_or_else(|| StorageError::user_not_found(user_id))
    }
}

#[async_trait]
impl AppProvider for InMemoryStorage {
    async fn app(&self, app_id: AppId) -> Result<App, StorageError> {
        self.state
            .read()
            .await
            .apps
            .get(&app_id)
            .cloned()
            .ok_or(StorageError::AppNotFound(app_id))
    }
}
