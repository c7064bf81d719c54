use crate::config::ConfigLoader;
use anyhow::Result;
use clap::{Args, Subcommand};
use std::path::Path;

#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommands,
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Show current configuration (merged)
    Show,
    /// Show configuration file paths
    Path,
    /// Write a default configuration file if none exists
    Init,
}

pub fn run(args: ConfigArgs, config_path: Option<&Path>) -> Result<()> {
    match args.command {
        ConfigCommands::Show => show_config(config_path),
        ConfigCommands::Path => show_paths(config_path),
        ConfigCommands::Init => init_config(config_path),
    }
}

fn show_config(config_path: Option<&Path>) -> Result<()> {
    let config = ConfigLoader::load(config_path)?;
    let toml_str = toml::to_string_pretty(&config)?;
    println!("{}", toml_str);
    Ok(())
}

fn show_paths(config_path: Option<&Path>) -> Result<()> {
    println!("User config:    {:?}", ConfigLoader::effective_user_path(config_path));
    println!("Project config: {:?}", ConfigLoader::project_config_path());
    Ok(())
}

fn init_config(config_path: Option<&Path>) -> Result<()> {
    let path = ConfigLoader::effective_user_path(config_path);
    if ConfigLoader::ensure_exists(&path)? {
        println!("Wrote default configuration to {}", path.display());
    } else {
        println!("Configuration already exists at {}", path.display());
    }
    let config = ConfigLoader::load_from(&path)?;
    println!("Modules are read from {}", config.module_dir().display());
    Ok(())
}
