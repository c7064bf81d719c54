use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod commands;
mod config;
mod host;

#[derive(Parser)]
#[command(name = "hotswap", about = "Reload view modules into a live display")]
#[command(version, propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Use this configuration file instead of the user config
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage configuration
    Config(commands::config::ConfigArgs),
    /// List the view types a module exports
    Inspect(commands::inspect::InspectArgs),
    /// Reload every configured target once and show the result
    Reload(commands::reload::ReloadArgs),
    /// Keep the display up and reload on each line of input
    Run(commands::run::RunArgs),
}

// Not async: the display dispatcher blocks and must stay outside a runtime.
fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config_path = cli.config.as_deref();
    match cli.command {
        Commands::Config(args) => commands::config::run(args, config_path),
        Commands::Inspect(args) => commands::inspect::run(args, config_path),
        Commands::Reload(args) => commands::reload::run(args, config_path),
        Commands::Run(args) => commands::run::run(args, config_path),
    }
}
