//! Apply the SSO service schema migrations to a SQLite database.

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use sqlx::migrate::Migrator;
use sqlx::sqlite::SqliteConnectOptions;
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;
use sso_service::config::Env;
use sso_service::outbound::repositories::sqlite::MIGRATOR;
use sso_service::telemetry;

/// `migrator` command arguments.
///
/// There is no migrations-table option: sqlx always records applied
/// migrations in `_sqlx_migrations` and cannot be pointed at another table.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "migrator",
    about = "Apply schema migrations to the SSO service SQLite database",
    version
)]
struct CliArgs {
    /// Path to the SQLite database file. Created when missing.
    #[arg(long = "storage-path", value_name = "path")]
    storage_path: PathBuf,
    /// Directory of migration scripts. Defaults to the embedded set.
    #[arg(long = "migrations-path", value_name = "dir")]
    migrations_path: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    telemetry::init(Env::Local);

    let args = CliArgs::parse();

    let options = SqliteConnectOptions::new()
        .filename(&args.storage_path)
        .create_if_missing(true);
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(options)
        .await
        .with_context(|| format!("open database {}", args.storage_path.display()))?;

    let external;
    let migrator: &Migrator = match &args.migrations_path {
        Some(path) => {
            external = Migrator::new(path.as_path())
                .await
                .with_context(|| format!("read migrations from {}", path.display()))?;
            &external
        }
        None => &MIGRATOR,
    };

    let applied_before = applied_count(&pool).await?;
    migrator.run(&pool).await.context("apply migrations")?;
    let applied_after = applied_count(&pool).await?;

    if applied_after == applied_before {
        tracing::info!(storage_path = %args.storage_path.display(), "No migrations to apply");
    } else {
        tracing::info!(
            storage_path = %args.storage_path.display(),
            applied = applied_after - applied_before,
            "Migrations applied"
        );
    }

    Ok(())
}

async fn applied_count(pool: &SqlitePool) -> Result<i64, anyhow::Error> {
    let tables: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = '_sqlx_migrations'",
    )
    .fetch_one(pool)
    .await?;

    if tables == 0 {
        return Ok(0);
    }

    let count = sqlx::query_scalar("SELECT COUNT(*) FROM _sqlx_migrations WHERE success = 1")
        .fetch_one(pool)
        .await?;

    Ok(count)
}
