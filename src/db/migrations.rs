//! Embedded diesel migrations.
//!
//! `diesel_migrations` only drives synchronous connections, so every function
//! here opens a short-lived `PgConnection` on the blocking thread pool.

use diesel::Connection;
use diesel::pg::PgConnection;
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};

use crate::error::{AppError, AppResult};

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

fn establish(database_url: &str, operation: &str) -> AppResult<PgConnection> {
    PgConnection::establish(database_url).map_err(|e| AppError::Database {
        operation: operation.to_string(),
        source: anyhow::anyhow!("Connection error: {}", e),
    })
}

async fn run_blocking<T, F>(f: F) -> AppResult<T>
where
    T: Send + 'static,
    F: FnOnce() -> AppResult<T> + Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| AppError::Internal {
            source: anyhow::Error::from(e),
        })?
}

/// Names of the migrations not yet applied.
pub async fn pending_migrations(database_url: &str) -> AppResult<Vec<String>> {
    let database_url = database_url.to_string();
    run_blocking(move || {
        let mut conn = establish(&database_url, "establish connection for migration check")?;
        let pending = conn
            .pending_migrations(MIGRATIONS)
            .map_err(|e| AppError::Database {
                operation: "check pending migrations".to_string(),
                source: anyhow::anyhow!("Migration error: {}", e),
            })?;
        Ok(pending.iter().map(|m| m.name().to_string()).collect())
    })
    .await
}

/// Applies every pending migration and returns the applied versions.
pub async fn run_pending_migrations(database_url: &str) -> AppResult<Vec<String>> {
    let database_url = database_url.to_string();
    run_blocking(move || {
        let mut conn = establish(&database_url, "establish connection for migrations")?;
        let applied = conn
            .run_pending_migrations(MIGRATIONS)
            .map_err(|e| AppError::Database {
                operation: "run pending migrations".to_string(),
                source: anyhow::anyhow!("Migration error: {}", e),
            })?;
        Ok(applied.iter().map(|m| m.to_string()).collect())
    })
    .await
}

/// Reverts the last `steps` applied migrations.
pub async fn revert_migrations(database_url: &str, steps: u32) -> AppResult<usize> {
    if steps == 0 {
        return Err(AppError::Validation {
            field: "rollback_steps".to_string(),
            reason: "Number of rollback steps must be greater than 0".to_string(),
        });
    }

    let database_url = database_url.to_string();
    run_blocking(move || {
        let mut conn = establish(&database_url, "establish connection for rollback")?;
        let applied = conn
            .applied_migrations()
            .map_err(|e| AppError::Database {
                operation: "get applied migrations".to_string(),
                source: anyhow::anyhow!("Migration error: {}", e),
            })?;

        if applied.len() < steps as usize {
            return Err(AppError::Validation {
                field: "rollback_steps".to_string(),
                reason: format!(
                    "Cannot rollback {} migrations - only {} applied migrations available",
                    steps,
                    applied.len()
                ),
            });
        }

        for _ in 0..steps {
            conn.revert_last_migration(MIGRATIONS)
                .map_err(|e| AppError::Database {
                    operation: "revert migration".to_string(),
                    source: anyhow::anyhow!("Migration rollback error: {}", e),
                })?;
        }
        Ok(steps as usize)
    })
    .await
}
