//! jsizzle: edit JavaScript on the left, run it, read the output on the right.
//!
//! With `--file`, runs the script once and prints its console output instead
//! of starting the interface.

use std::io;
use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::Parser;
use jsizzle::exit_codes;
use jsizzle::io::config::{AppConfig, load_config};
use jsizzle::io::engine::QuickJsEngine;
use jsizzle::{batch, logging, tui};

#[derive(Parser)]
#[command(
    name = "jsizzle",
    version,
    about = "Two-pane terminal scratchpad for JavaScript"
)]
struct Cli {
    /// JavaScript file to run without starting the interface.
    #[arg(short, long)]
    file: Option<PathBuf>,

    /// TOML configuration file.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Draw on the main screen instead of the alternate screen.
    #[arg(long)]
    no_alt_screen: bool,
}

fn main() {
    let code = match run() {
        Ok(code) => code,
        Err(err) => {
            eprintln!("{:#}", err);
            exit_codes::INVALID
        }
    };
    std::process::exit(code);
}

fn run() -> Result<i32> {
    let cli = Cli::parse();
    let config = resolve_config(cli.config.as_deref())?;

    if let Some(path) = cli.file {
        logging::init();
        let engine = QuickJsEngine::new(&config.execution);
        return batch::run_file(
            &engine,
            &path,
            &mut io::stdout().lock(),
            &mut io::stderr().lock(),
        );
    }

    if let Some(log_file) = &config.interface.log_file {
        logging::init_file(log_file)?;
    }
    let alt_screen = config.interface.alt_screen && !cli.no_alt_screen;
    tui::run(&config, alt_screen)?;
    Ok(exit_codes::OK)
}

fn resolve_config(path: Option<&Path>) -> Result<AppConfig> {
    path.map_or_else(|| Ok(AppConfig::default()), load_config)
}
