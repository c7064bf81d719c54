//! Long-lived host: keeps the display up and reloads on demand

use anyhow::Result;
use clap::Args;
use std::io::{self, BufRead, Write};
use std::path::Path;

use crate::config::ConfigLoader;
use crate::host::{Session, print_snapshot};

#[derive(Args)]
pub struct RunArgs {
    /// Skip the initial reload at startup
    #[arg(long)]
    pub no_initial: bool,
}

/// What a line of input asks for
#[derive(Debug, PartialEq, Eq)]
enum Trigger {
    Reload,
    Show,
    Quit,
    Unknown,
}

fn parse_trigger(line: &str) -> Trigger {
    match line.trim() {
        "" | "r" | "reload" => Trigger::Reload,
        "s" | "show" => Trigger::Show,
        "q" | "quit" | "exit" => Trigger::Quit,
        _ => Trigger::Unknown,
    }
}

pub fn run(args: RunArgs, config_path: Option<&Path>) -> Result<()> {
    let config = ConfigLoader::load(config_path)?;
    let session = Session::start(&config)?;

    println!("Watching {}", config.module_dir().display());
    println!("Enter to reload, 's' to show, 'q' to quit");

    if !args.no_initial {
        reload(&session, &config)?;
    }

    let stdin = io::stdin();
    prompt()?;
    for line in stdin.lock().lines() {
        match parse_trigger(&line?) {
            Trigger::Reload => reload(&session, &config)?,
            Trigger::Show => print_snapshot(session.snapshot()?.as_ref()),
            Trigger::Quit => break,
            Trigger::Unknown => println!("Unknown command (Enter, s, q)"),
        }
        prompt()?;
    }

    session.shutdown()
}

fn reload(session: &Session, config: &crate::config::HotswapConfig) -> Result<()> {
    let failed = session.reload_targets(config);
    if failed > 0 {
        tracing::warn!(failed, "Some targets failed; display keeps its last good view");
    }
    print_snapshot(session.snapshot()?.as_ref());
    Ok(())
}

fn prompt() -> Result<()> {
    print!("> ");
    io::stdout().flush()?;
    Ok(())
}
