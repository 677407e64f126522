use std::str::FromStr;

use async_trait::async_trait;
use sqlx::migrate::MigrateError;
use sqlx::migrate::Migrator;
use sqlx::sqlite::SqliteConnectOptions;
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;

use crate::domain::auth::errors::StorageError;
use crate::domain::auth::models::App;
use crate::domain::auth::models::AppId;
use crate::domain::auth::models::User;
use crate::domain::auth::models::UserId;
use crate::domain::auth::ports::AppProvider;
use crate::domain::auth::ports::UserProvider;
use crate::domain::auth::ports::UserSaver;

/// Schema migrations embedded at compile time.
pub static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

const MAX_CONNECTIONS: u32 = 5;

/// SQLite implementation of the user and application storage ports.
pub struct SqliteStorage {
    pool: SqlitePool,
}

#[derive(sqlx::FromRow)]
struct UserRow {
    id: i64,
    email: String,
    pass_hash: Vec<u8>,
    is_admin: bool,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        Self {
            id: UserId(row.id),
            email: row.email,
            password_hash: row.pass_hash,
            is_admin: row.is_admin,
        }
    }
}

#[derive(sqlx::FromRow)]
struct AppRow {
    id: i32,
    name: String,
    secret: String,
}

impl From<AppRow> for App {
    fn from(row: AppRow) -> Self {
        Self {
            id: AppId(row.id),
            name: row.name,
            secret: row.secret,
        }
    }
}

impl SqliteStorage {
    /// Create a storage over an existing pool.
    ///
    /// # Arguments
    /// * `pool` - SQLite connection pool
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Open a pool for `url`, creating the database file if missing.
    ///
    /// In-memory databases are private to a connection, so they get a
    /// single connection that is never recycled.
    ///
    /// # Errors
    /// * `Database` - URL is invalid or the database cannot be opened
    pub async fn connect(url: &str) -> Result<Self, StorageError> {
        let options = SqliteConnectOptions::from_str(url)
            .map_err(|e| StorageError::Database(e.to_string()))?
            .create_if_missing(true);

        let pool_options = if url.contains(":memory:") {
            SqlitePoolOptions::new()
                .max_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            SqlitePoolOptions::new().max_connections(MAX_CONNECTIONS)
        };

        let pool = pool_options
            .connect_with(options)
            .await
            .map_err(|e| StorageError::Database(e.to_string()))?;

        tracing::info!(
            max_connections = pool.options().get_max_connections(),
            database = "sqlite",
            "Database connection pool created"
        );

        Ok(Self::new(pool))
    }

    /// Apply pending embedded migrations.
    pub async fn migrate(&self) -> Result<(), MigrateError> {
        MIGRATOR.run(&self.pool).await
    }

    /// Provision a client application.
    ///
    /// Applications are managed out of band; this is the seeding path.
    pub async fn insert_app(&self, app: &App) -> Result<(), StorageError> {
        sqlx::query("INSERT INTO apps (id, name, secret) VALUES (?, ?, ?)")
            .bind(app.id.0)
            .bind(&app.name)
            .bind(&app.secret)
            .execute(&self.pool)
            .await
            .map_err(|e| StorageError::Database(e.to_string()))?;

        Ok(())
    }

    /// Grant or revoke administrator privilege.
    ///
    /// # Errors
    /// * `UserNotFound` - User does not exist
    /// * `Database` - Storage operation failed
    pub async fn set_admin(&self, user_id: UserId, is_admin: bool) -> Result<(), StorageError> {
        let result = sqlx::query("UPDATE users SET is_admin = ? WHERE id = ?")
            .bind(is_admin)
            .bind(user_id.0)
            .execute(&self.pool)
            .await
            .map_err(|e| StorageError::Database(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(StorageError::user_not_found(user_id));
        }

        Ok(())
    }
}

#[async_trait]
impl UserSaver for SqliteStorage {
    async fn save_user(&self, email: &str, password_hash: &[u8]) -> Result<UserId, StorageError> {
        let result = sqlx::query("INSERT INTO users (email, pass_hash) VALUES (?, ?)")
            .bind(email)
            .bind(password_hash)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                if let Some(db_err) = e.as_database_error() {
                    if db_err.is_unique_violation() {
                        return StorageError::DuplicateEmail(email.to_string());
                    }
                }
                StorageError::Database(e.to_string())
            })?;

        Ok(UserId(result.last_insert_rowid()))
    }
}

#[async_trait]
impl UserProvider for SqliteStorage {
    async fn user(&self, email: &str) -> Result<User, StorageError> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, email, pass_hash, is_admin
            FROM users
            WHERE email = ?
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| StorageError::Database(e.to_string()))?;

        row.map(User::from)
            .ok_or_else(|| StorageError::UserNotFound(email.to_string()))
    }

    async fn is_admin(&self, user_id: UserId) -> Result<bool, StorageError> {
        sqlx::query_scalar::<_, bool>("SELECT is_admin FROM users WHERE id = ?")
            .bind(user_id.0)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| StorageError::Database(e.to_string()))?
            .ok_or_else(|| StorageError::user_not_found(user_id))
    }
}

#[async_trait]
impl AppProvider for SqliteStorage {
    async fn app(&self, app_id: AppId) -> Result<App, StorageError> {
        let row = sqlx::query_as::<_, AppRow>(
            r#"
            SELECT id, name, secret
            FROM apps
            WHERE id = ?
            "#,
        )
        .bind(app_id.0)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| StorageError::Database(e.to_string()))?;

        row.map(App::from)
            .ok_or(StorageError::AppNotFound(app_id))
    }
}
