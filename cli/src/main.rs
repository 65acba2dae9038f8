mod commands;
mod terminal;

use std::process::ExitCode;

use commands::{CommandLine, Commands, generate, print};
use pvesd_common::error;

#[tokio::main]
async fn main() -> ExitCode {
    let commands = CommandLine::parse_args();

    terminal::logging::init(commands.quiet);

    match run(commands).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(commands: CommandLine) -> anyhow::Result<()> {
    let cfg = commands.settings.to_config()?;

    match commands.command.unwrap_or_default() {
        Commands::Generate => generate::generate(&cfg).await,
        Commands::Print => print::print(&cfg).await,
    }
}
