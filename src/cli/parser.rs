//! CLI argument parsing with clap
//!
//! This module defines the command-line interface structure using clap,
//! including all commands, arguments, and their documentation.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use crate::build;

/// Key-value cache service over memory, Redis and PostgreSQL backends
#[derive(Parser, Debug)]
#[command(name = "omnicache")]
#[command(about = "Key-value cache service over memory, Redis and PostgreSQL backends")]
#[command(long_about = "
omnicache serves one HTTP API over three interchangeable cache backends.
Every backend validates keys the same way and treats expired entries exactly
like missing ones.

EXAMPLES:
    # Start the server with default configuration
    omnicache serve

    # Start server on custom host and port
    omnicache serve --host 0.0.0.0 --port 8080

    # Use custom configuration file
    omnicache --config /path/to/config.toml serve

    # Check configuration without starting server
    omnicache serve --dry-run

    # Create the cache table
    omnicache migrate

    # Preview pending migrations
    omnicache migrate --dry-run

    # Delete expired rows from the cache table
    omnicache purge
")]
#[command(version = build::CLAP_LONG_VERSION)]
pub struct Cli {
    /// Subcommand to execute; `serve` when omitted
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Configuration file path
    ///
    /// Load this single TOML file instead of the layered `config/` directory.
    /// `OMNICACHE_*` environment variables still override its values.
    ///
    /// Example: --config /etc/omnicache/production.toml
    #[arg(short, long, value_name = "FILE", value_parser = super::validation::validate_config_file_path)]
    pub config: Option<PathBuf>,

    /// Override environment detection
    ///
    /// Selects which `{environment}.toml` is layered over `default.toml`.
    /// Takes precedence over OMNICACHE_APP_ENV.
    #[arg(short, long, value_enum)]
    pub env: Option<Environment>,

    /// Enable verbose logging (debug level)
    #[arg(short, long)]
    pub verbose: bool,

    /// Only log errors
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the HTTP server (default)
    ///
    /// Connects every enabled cache backend and serves the cache API.
    ///
    /// Examples:
    ///   omnicache serve                           # Start with defaults
    ///   omnicache serve --host 0.0.0.0 --port 80  # Bind to all interfaces on port 80
    ///   omnicache serve --dry-run                 # Validate config without starting
    Serve {
        /// Host address to bind to (default: 127.0.0.1)
        #[arg(long, value_name = "ADDRESS", value_parser = super::validation::validate_host_address)]
        host: Option<String>,

        /// Port number to listen on (default: 3000)
        #[arg(short, long, value_name = "PORT", value_parser = super::validation::validate_port)]
        port: Option<u16>,

        /// Log level override, takes precedence over --verbose/--quiet
        #[arg(long, value_enum)]
        log_level: Option<LogLevel>,

        /// Validate configuration and exit
        #[arg(long)]
        dry_run: bool,
    },
    /// Database migration operations for the SQL backend
    ///
    /// Examples:
    ///   omnicache migrate                    # Apply all pending migrations
    ///   omnicache migrate --dry-run          # Show pending migrations without applying
    ///   omnicache migrate --rollback 1       # Revert the most recent migration
    Migrate {
        /// Show pending migrations without applying
        #[arg(long, conflicts_with = "rollback")]
        dry_run: bool,

        /// Number of migrations to roll back (1-100)
        #[arg(long, value_name = "STEPS", conflicts_with = "dry_run", value_parser = super::validation::validate_rollback_steps)]
        rollback: Option<u32>,
    },
    /// Delete expired rows from the SQL cache table
    ///
    /// Expired rows are already invisible to reads; this reclaims their space.
    Purge,
}

/// Environment options
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Environment {
    #[value(name = "development", alias = "dev")]
    Development,
    #[value(name = "test")]
    Test,
    #[value(name = "staging", alias = "stage")]
    Staging,
    #[value(name = "production", alias = "prod")]
    Production,
}

/// Log level options
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum LogLevel {
    #[value(name = "error")]
    Error,
    #[value(name = "warn", alias = "warning")]
    Warn,
    #[value(name = "info")]
    Info,
    #[value(name = "debug")]
    Debug,
    #[value(name = "trace")]
    Trace,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

impl Cli {
    /// Checks argument combinations clap cannot express.
    pub fn validate(&self) -> Result<(), String> {
        if let Some(Commands::Migrate {
            dry_run: true,
            rollback: Some(_),
        }) = self.command
        {
            return Err("Cannot use --dry-run and --rollback together".to_string());
        }

        if self.verbose && self.quiet {
            return Err("Cannot use --verbose and --quiet together".to_string());
        }

        Ok(())
    }
}

impl From<Environment> for crate::config::Environment {
    fn from(env: Environment) -> Self {
        match env {
            Environment::Development => crate::config::Environment::Development,
            Environment::Test => crate::config::Environment::Test,
            Environment::Staging => crate::config::Environment::Staging,
            Environment::Production => crate::config::Environment::Production,
        }
    }
}
