//! Configuration merger for CLI arguments and config files
//!
//! CLI arguments take precedence over file and environment configuration.

use std::path::Path;

use super::parser::{Cli, Commands};
use crate::config::error::ConfigError;
use crate::config::{ConfigLoader, settings::Settings};

/// Applies CLI overrides on top of file-based configuration
pub struct ConfigurationMerger {
    base_config: Settings,
}

impl ConfigurationMerger {
    pub fn new(base_config: Settings) -> Self {
        Self { base_config }
    }

    /// Load the base configuration the way the CLI asked for it.
    ///
    /// `--config` selects single-file mode; otherwise the layered `config/`
    /// directory is read, with `--env` overriding `OMNICACHE_APP_ENV`.
    ///
    /// # Errors
    /// Returns ConfigError if loading or validation fails
    pub fn from_cli(cli: &Cli) -> Result<Self, ConfigError> {
        let loader = match cli.config.as_deref() {
            Some(path) => Self::file_loader(path)?,
            None => ConfigLoader::new()?,
        };

        let loader = match cli.env {
            Some(env) => loader.with_environment(env.into()),
            None => loader,
        };

        Ok(Self::new(loader.load()?))
    }

    fn file_loader(path: &Path) -> Result<ConfigLoader, ConfigError> {
        if !path.is_file() {
            return Err(ConfigError::validation(
                "config_file",
                format!("Configuration file does not exist: '{}'", path.display()),
            ));
        }
        Ok(ConfigLoader::from_file(path))
    }

    /// Merge CLI arguments into a copy of the base configuration.
    ///
    /// # Errors
    /// Returns ConfigError if the merged configuration is invalid
    pub fn merge_cli_args(&self, cli: &Cli) -> Result<Settings, ConfigError> {
        let mut config = self.base_config.clone();

        if cli.verbose {
            config.logger.level = "debug".to_string();
        } else if cli.quiet {
            config.logger.level = "error".to_string();
        }

        if let Some(Commands::Serve {
            host,
            port,
            log_level,
            ..
        }) = &cli.command
        {
            if let Some(host) = host {
                config.server.host = host.clone();
            }
            if let Some(port) = port {
                config.server.port = *port;
            }
            // Command-specific level beats --verbose/--quiet
            if let Some(level) = log_level {
                config.logger.level = level.as_str().to_string();
            }
        }

        config.validate()?;

        Ok(config)
    }

    pub fn config(&self) -> &Settings {
        &self.base_config
    }
}
