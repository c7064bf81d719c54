//! List the view types a module exports

use anyhow::Result;
use clap::Args;
use hotswap_core::HotReloadError;
use hotswap_view_api::ViewTypeInfo;
use std::path::Path;

use crate::config::{ConfigLoader, HotswapConfig};
use crate::host;

#[derive(Args)]
pub struct InspectArgs {
    /// Module file name, relative to the module directory
    pub module: String,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

pub fn run(args: InspectArgs, config_path: Option<&Path>) -> Result<()> {
    let config = ConfigLoader::load(config_path)?;
    let types = list_types(&config, &args.module)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&types)?);
    } else {
        print_types(&args.module, &types);
    }
    Ok(())
}

/// Read and materialize `module` from the configured module directory.
/// No display thread is started.
fn list_types(config: &HotswapConfig, module: &str) -> Result<Vec<ViewTypeInfo>, HotReloadError> {
    hotswap_core::inspect_module(&host::swap_config(config), &host::resolver(config), module)
}

fn print_types(module: &str, types: &[ViewTypeInfo]) {
    if types.is_empty() {
        println!("{} exports no view types", module);
        return;
    }

    println!("{} exports {} view type(s):", module, types.len());
    for info in types {
        println!("  {}", info.full_name);
    }
}
