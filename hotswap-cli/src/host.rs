//! Wiring from configuration to a running swapper

use anyhow::{Context, Result, anyhow};
use hotswap_core::{
    DisplayHost, HotReloadError, HotSwapConfig, HotSwapper, NativeImageLoader, SwapReport,
    TypeResolver, ViewSnapshot,
};
use std::sync::Arc;
use std::thread::JoinHandle;

use crate::config::HotswapConfig;

/// A swapper plus the display thread it publishes to
pub struct Session {
    swapper: HotSwapper,
    display_thread: JoinHandle<()>,
}

impl Session {
    /// Start the display thread and build a swapper from `config`
    pub fn start(config: &HotswapConfig) -> Result<Self> {
        let (dispatcher, display_thread) =
            DisplayHost::spawn("display").context("starting display thread")?;

        let swapper = HotSwapper::new(swap_config(config), resolver(config), dispatcher);

        tracing::debug!(
            module_dir = %config.module_dir().display(),
            shadow_dir = %config.shadow_dir().display(),
            policy = ?config.application.match_policy,
            "Hot swap session started"
        );

        Ok(Self {
            swapper,
            display_thread,
        })
    }

    /// Reload every configured target and print one line per outcome.
    ///
    /// Returns how many targets failed.
    pub fn reload_targets(&self, config: &HotswapConfig) -> usize {
        let outcomes = self.swapper.reload_all(&config.targets);
        let mut failed = 0;
        for (target, outcome) in config.targets.iter().zip(&outcomes) {
            match outcome {
                Ok(report) => print_report(report),
                Err(e) => {
                    failed += 1;
                    print_failure(target, e);
                }
            }
        }
        failed
    }

    /// Current display content
    pub fn snapshot(&self) -> Result<Option<ViewSnapshot>> {
        Ok(self.swapper.display().snapshot()?)
    }

    /// Drop the swapper and wait for the display thread to exit
    pub fn shutdown(self) -> Result<()> {
        let Self {
            swapper,
            display_thread,
        } = self;
        drop(swapper);
        display_thread
            .join()
            .map_err(|_| anyhow!("display thread panicked"))
    }
}

/// Native resolver using the configured shadow directory and match policy
pub fn resolver(config: &HotswapConfig) -> TypeResolver {
    let loader = NativeImageLoader::new(config.shadow_dir());
    TypeResolver::new(Arc::new(loader), config.application.match_policy)
}

/// Where module file names are resolved, per the configuration
pub fn swap_config(config: &HotswapConfig) -> HotSwapConfig {
    HotSwapConfig::new(config.module_dir())
}

fn print_report(report: &SwapReport) {
    println!(
        "  ✓ {} from {} ({} bytes, generation {})",
        report.type_name,
        report.path.display(),
        report.module_bytes,
        report.generation
    );
}

fn print_failure(target: &hotswap_core::ReloadTarget, error: &HotReloadError) {
    println!("  ✗ {}: {}", target, error);
}

/// Print what the display is showing
pub fn print_snapshot(snapshot: Option<&ViewSnapshot>) {
    match snapshot {
        Some(view) => {
            println!();
            println!("┌ {} [{}] #{}", view.title, view.type_name, view.generation);
            for line in view.content.lines() {
                println!("│ {}", line);
            }
            println!("└");
        }
        None => println!("(display is empty)"),
    }
}
