//! Serve command handler
//!
//! Dry-run validation for the serve command. Actual startup lives in
//! [`crate::server::Server`].

use crate::config::settings::Settings;
use crate::error::AppResult;

/// Handler for the serve command
pub struct ServeCommandHandler {
    config: Settings,
}

impl ServeCommandHandler {
    pub fn new(config: Settings) -> Self {
        Self { config }
    }

    /// Execute the serve command
    ///
    /// With `dry_run` the configuration is validated and summarized; without
    /// it this returns Ok and lets `main` start the server.
    pub async fn execute(&self, dry_run: bool) -> AppResult<()> {
        if dry_run {
            self.validate_only()
        } else {
            Ok(())
        }
    }

    /// Validate configuration without starting the server
    pub fn validate_only(&self) -> AppResult<()> {
        self.config.validate()?;

        println!("✓ Configuration is valid");
        println!("✓ Server would bind to: {}", self.config.server.address());
        println!("✓ Cache backends: {}", self.enabled_backends().join(", "));

        match self.config.cache.default_ttl_seconds {
            Some(seconds) => println!("✓ Default TTL: {}s", seconds),
            None => println!("✓ Default TTL: none, entries without ttl_seconds never expire"),
        }

        if self.config.cache.sql.enabled {
            println!(
                "✓ SQL backend reads with {} isolation",
                if self.config.cache.sql.snapshot_reads {
                    "repeatable read"
                } else {
                    "read committed"
                }
            );
        }

        println!("Dry run completed successfully - configuration is ready for deployment");
        Ok(())
    }

    fn enabled_backends(&self) -> Vec<&'static str> {
        let cache = &self.config.cache;
        [
            (cache.memory.enabled, "memory"),
            (cache.redis.enabled, "redis"),
            (cache.sql.enabled, "sql"),
        ]
        .into_iter()
        .filter_map(|(enabled, name)| enabled.then_some(name))
        .collect()
    }

    pub fn config(&self) -> &Settings {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_serve_handler_dry_run() {
        let handler = ServeCommandHandler::new(Settings::default());
        assert!(handler.execute(true).await.is_ok());
        assert_eq!(handler.enabled_backends(), vec!["memory"]);
    }

    #[tokio::test]
    async fn test_serve_handler_dry_run_invalid_config() {
        let mut config = Settings::default();
        config.server.port = 0;
        let handler = ServeCommandHandler::new(config);

        assert!(handler.execute(true).await.is_err());
    }

    #[tokio::test]
    async fn test_serve_handler_without_dry_run_defers_to_server() {
        let mut config = Settings::default();
        config.server.port = 0;
        let handler = ServeCommandHandler::new(config);

        assert!(handler.execute(false).await.is_ok());
    }
}
