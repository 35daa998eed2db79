use clap::Parser;

use omnicache::cli::{
    Cli, CommandOutcome, execute_command, init_logger_from_settings, load_and_merge_config,
};
use omnicache::server::Server;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let settings = load_and_merge_config(&cli)?;
    init_logger_from_settings(&settings)?;

    match execute_command(&cli, settings.clone()).await? {
        CommandOutcome::StartServer => Server::new(settings).run().await,
        CommandOutcome::Completed => Ok(()),
    }
}
