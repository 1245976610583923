//! Async database connection pool and migrations.
//!
//! Uses the bb8 pool manager bundled with diesel_async for PostgreSQL.

use std::time::Duration;

use diesel::pg::PgConnection;
use diesel::Connection;
use diesel_async::AsyncPgConnection;
use diesel_async::pooled_connection::AsyncDieselConnectionManager;
use diesel_async::pooled_connection::bb8::{Pool, PooledConnection};
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};

use crate::config::DatabaseConfig;
use crate::error::{AppError, AppResult};

/// Migrations compiled into the binary from `migrations/`.
pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// bb8 pools are reference counted, so cloning is cheap.
pub type AsyncDbPool = Pool<AsyncPgConnection>;

pub type DbConnection<'a> = PooledConnection<'a, AsyncPgConnection>;

/// Builds a pool sized and timed by `config`.
///
/// ```ignore
/// let pool = establish_async_connection_pool(&settings.database).await?;
/// let mut conn = pool.get().await?;
/// ```
pub async fn establish_async_connection_pool(config: &DatabaseConfig) -> AppResult<AsyncDbPool> {
    let manager = AsyncDieselConnectionManager::<AsyncPgConnection>::new(config.url.as_str());

    Pool::builder()
        .max_size(config.max_connections)
        .min_idle(Some(config.min_connections))
        .connection_timeout(Duration::from_secs(config.connection_timeout))
        .build(manager)
        .await
        .map_err(|e| AppError::ConnectionPool {
            source: anyhow::anyhow!("Failed to build connection pool: {}", e),
        })
}

/// Checks a connection out of the pool.
pub async fn get_connection(pool: &AsyncDbPool) -> AppResult<DbConnection<'_>> {
    pool.get().await.map_err(|e| AppError::ConnectionPool {
        source: anyhow::anyhow!("Failed to get database connection: {}", e),
    })
}

/// Outcome of [`run_migrations`].
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct MigrationReport {
    /// Versions applied (or reverted) by this run
    pub versions: Vec<String>,
    /// Versions that were pending before the run
    pub pending: Vec<String>,
}

/// What [`run_migrations`] should do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MigrationAction {
    /// Apply all pending migrations
    Apply,
    /// List pending migrations without touching the schema
    DryRun,
    /// Revert the given number of most recently applied migrations
    Rollback(usize),
}

/// Runs embedded migrations over a blocking connection on the blocking pool.
pub async fn run_migrations(database_url: &str, action: MigrationAction) -> AppResult<MigrationReport> {
    let url = database_url.to_string();

    tokio::task::spawn_blocking(move || -> AppResult<MigrationReport> {
        let mut conn = PgConnection::establish(&url).map_err(|e| AppError::ConnectionPool {
            source: anyhow::anyhow!("Failed to connect for migrations: {}", e),
        })?;

        let pending = conn
            .pending_migrations(MIGRATIONS)
            .map_err(migration_error)?
            .iter()
            .map(|m| m.name().version().to_string())
            .collect::<Vec<_>>();

        let versions = match action {
            MigrationAction::DryRun => Vec::new(),
            MigrationAction::Apply => conn
                .run_pending_migrations(MIGRATIONS)
                .map_err(migration_error)?
                .iter()
                .map(|v| v.to_string())
                .collect(),
            MigrationAction::Rollback(steps) => {
                let applied = conn.applied_migrations().map_err(migration_error)?.len();
                if applied < steps {
                    return Err(AppError::Validation {
                        field: "rollback".to_string(),
                        reason: format!(
                            "cannot revert {} migration(s), only {} applied",
                            steps, applied
                        ),
                    });
                }

                let mut reverted = Vec::with_capacity(steps);
                for _ in 0..steps {
                    let version = conn
                        .revert_last_migration(MIGRATIONS)
                        .map_err(migration_error)?;
                    reverted.push(version.to_string());
                }
                reverted
            }
        };

        Ok(MigrationReport { versions, pending })
    })
    .await
    .map_err(|e| AppError::Internal {
        source: anyhow::anyhow!("Migration task panicked: {}", e),
    })?
}

fn migration_error(e: Box<dyn std::error::Error + Send + Sync>) -> AppError {
    AppError::Database {
        operation: "run migrations".to_string(),
        source: anyhow::anyhow!(e),
    }
}
