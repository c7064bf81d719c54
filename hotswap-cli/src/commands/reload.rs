//! One-shot reload of every configured target

use anyhow::{Result, bail};
use clap::Args;
use std::path::Path;

use crate::config::ConfigLoader;
use crate::host::{Session, print_snapshot};

#[derive(Args)]
pub struct ReloadArgs {
    /// Reload only targets whose type name matches
    #[arg(long)]
    pub only: Option<String>,
}

pub fn run(args: ReloadArgs, config_path: Option<&Path>) -> Result<()> {
    let mut config = ConfigLoader::load(config_path)?;
    if let Some(only) = &args.only {
        config.targets.retain(|t| t.type_name() == only.as_str());
    }

    if config.targets.is_empty() {
        println!("No reload targets configured");
        println!();
        let path = ConfigLoader::effective_user_path(config_path);
        println!("Add one to {}:", path.display());
        println!("  [[targets]]");
        println!("  module = \"libhello_view.so\"");
        println!("  namespace = \"Demo.Views\"");
        println!("  type_name = \"HelloView\"");
        return Ok(());
    }

    println!("Reloading from {}", config.module_dir().display());
    let session = Session::start(&config)?;
    let failed = session.reload_targets(&config);
    print_snapshot(session.snapshot()?.as_ref());
    session.shutdown()?;

    if failed > 0 {
        bail!("{} of {} targets failed to reload", failed, config.targets.len());
    }
    Ok(())
}
