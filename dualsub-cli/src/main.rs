//! dualsub command-line entry point

use clap::Parser;
use dualsub_cli::commands::{Commands, GlobalArgs};

/// Caption sentence reconstruction and subtitle timing tools
#[derive(Debug, Parser)]
#[command(name = "dualsub", author, version, about, long_about = None)]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,

    #[command(subcommand)]
    command: Commands,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    cli.global.init_logging();
    cli.command.execute(&cli.global)
}
