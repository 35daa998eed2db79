//! Command executor for dispatching CLI commands

use super::handlers::{MigrateCommandHandler, PurgeCommandHandler, ServeCommandHandler};
use super::parser::{Cli, Commands};
use crate::config::settings::Settings;
use crate::error::{AppError, AppResult};

/// What `main` should do once a command has been executed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandOutcome {
    /// Start the HTTP server
    StartServer,
    /// The command ran to completion; exit
    Completed,
}

/// Execute a CLI command with the given settings
///
/// # Errors
/// Returns argument validation errors or errors from the command handler
pub async fn execute_command(cli: &Cli, settings: Settings) -> AppResult<CommandOutcome> {
    cli.validate().map_err(|reason| AppError::Validation {
        field: "cli_arguments".to_string(),
        reason,
    })?;

    match &cli.command {
        Some(Commands::Serve { dry_run: true, .. }) => {
            ServeCommandHandler::new(settings).execute(true).await?;
            Ok(CommandOutcome::Completed)
        }
        Some(Commands::Serve { .. }) | None => Ok(CommandOutcome::StartServer),
        Some(Commands::Migrate { dry_run, rollback }) => {
            if let Some(steps) = rollback
                && *steps > 50
            {
                tracing::warn!(steps = *steps, "Rolling back a large number of migrations");
            }
            MigrateCommandHandler::new(settings)
                .execute(*dry_run, *rollback)
                .await?;
            Ok(CommandOutcome::Completed)
        }
        Some(Commands::Purge) => {
            PurgeCommandHandler::new(settings).execute().await?;
            Ok(CommandOutcome::Completed)
        }
    }
}
