use anyhow::Result;
use clap::Parser;
use std::io::{self, IsTerminal};

use llama_chat::cli::commands::{chat, config};
use llama_chat::cli::{Args, Command};
use llama_chat::output::{self, OutputConfig};

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let defaults = OutputConfig::default();
    output::init(OutputConfig {
        quiet: args.quiet,
        no_color: args.no_color || defaults.no_color || !io::stdout().is_terminal(),
    });
    output::init_logging();

    let options = args.resolve_options();
    match args.command {
        Some(Command::Config) => config::print_config(&options)?,
        None => chat::run_chat(&options).await?,
    }

    Ok(())
}
