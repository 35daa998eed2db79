//! Server module for managing HTTP server lifecycle
//!
//! This module handles store initialization, startup, and graceful shutdown.

use std::sync::Arc;

use serde_json::Value;
use tokio::net::TcpListener;
use tokio::signal;

use crate::api::routes::create_router;
use crate::cache::{MemoryStore, RedisStore, SqlStore};
use crate::config::{Environment, settings::Settings};
use crate::db::{establish_async_connection_pool, run_pending_migrations};
use crate::error::AppResult;
use crate::state::{AppState, JsonStoreResolver};

/// Registers one store per enabled backend.
///
/// The SQL backend gets its own connection pool and, with
/// `database.auto_migrate`, pending migrations are applied first.
pub async fn build_resolver(settings: &Settings) -> AppResult<JsonStoreResolver> {
    let cache = &settings.cache;
    let mut resolver = JsonStoreResolver::new();

    if cache.memory.enabled {
        resolver.register(Arc::new(MemoryStore::<Value>::new(&cache.memory)));
        tracing::info!(max_size = cache.memory.max_size, "Memory cache backend enabled");
    }

    if cache.redis.enabled {
        let store = RedisStore::<Value>::new(&cache.redis).await?;
        resolver.register(Arc::new(store));
        tracing::info!(
            pool_size = cache.redis.pool_size,
            key_prefix = %cache.redis.key_prefix,
            "Redis cache backend enabled"
        );
    }

    if cache.sql.enabled {
        if settings.database.auto_migrate {
            let applied = run_pending_migrations(&settings.database.url).await?;
            tracing::info!(count = applied.len(), "Applied pending migrations");
        }

        let pool = establish_async_connection_pool(&settings.database).await?;
        let store = SqlStore::<Value>::new(pool, &cache.sql);
        tracing::info!(isolation = ?store.isolation(), "SQL cache backend enabled");
        resolver.register(Arc::new(store));
    }

    Ok(resolver)
}

/// HTTP server manager
pub struct Server {
    settings: Settings,
}

impl Server {
    pub fn new(settings: Settings) -> Self {
        Self { settings }
    }

    /// Start the server and run until shutdown signal
    ///
    /// # Errors
    /// - Cache backend initialization errors
    /// - Address binding errors
    /// - Server runtime errors
    pub async fn run(self) -> anyhow::Result<()> {
        tracing::info!(
            app_name = %self.settings.application.name,
            app_version = %self.settings.application.version,
            environment = %Environment::from_env(),
            "Application starting"
        );

        tracing::info!(
            host = %self.settings.server.host,
            port = %self.settings.server.port,
            request_timeout = %self.settings.server.request_timeout,
            "Server configuration loaded"
        );

        let resolver = build_resolver(&self.settings).await?;
        let backends: Vec<&str> = resolver.backends().iter().map(|b| b.as_str()).collect();
        tracing::info!(
            backends = ?backends,
            default_ttl_seconds = ?self.settings.cache.default_ttl_seconds,
            "Cache backends ready"
        );

        let state = AppState::new(resolver, self.settings.cache.default_ttl())
            .with_request_timeout(self.settings.server.request_timeout());
        let router = create_router(state);

        let address = self.settings.server.address();
        let listener = TcpListener::bind(&address).await.map_err(|e| {
            tracing::error!(error = %e, address = %address, "Failed to bind to address");
            anyhow::anyhow!("Failed to bind to {}: {}", address, e)
        })?;

        tracing::info!(address = %address, "Server listening");

        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("Server shutdown complete");

        Ok(())
    }
}

/// Waits for Ctrl+C or SIGTERM.
///
/// If a handler cannot be installed, that signal is ignored and the other
/// one still triggers shutdown.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, initiating graceful shutdown");
        }
    }
}
