//! Command handlers for CLI operations

pub mod migrate;
pub mod purge;
pub mod serve;

pub use migrate::MigrateCommandHandler;
pub use purge::PurgeCommandHandler;
pub use serve::ServeCommandHandler;
