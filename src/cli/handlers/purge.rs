//! Purge command handler
//!
//! Deletes expired rows from the SQL backend's table. Reads already skip
//! them, so this is housekeeping only.

use serde_json::Value;

use crate::cache::SqlStore;
use crate::config::settings::Settings;
use crate::db::establish_async_connection_pool;
use crate::error::AppResult;

/// Handler for the purge command
pub struct PurgeCommandHandler {
    config: Settings,
}

impl PurgeCommandHandler {
    pub fn new(config: Settings) -> Self {
        Self { config }
    }

    /// Purge expired entries and report how many were removed
    ///
    /// # Errors
    /// - Database configuration validation errors
    /// - Pool creation or delete failures
    pub async fn execute(&self) -> AppResult<usize> {
        self.config.database.validate()?;

        let pool = establish_async_connection_pool(&self.config.database).await?;
        let store = SqlStore::<Value>::new(pool, &self.config.cache.sql);
        let purged = store.purge_expired().await?;

        println!("✓ Purged {} expired cache entr{}", purged, if purged == 1 { "y" } else { "ies" });
        Ok(purged)
    }
}
