#![allow(clippy::print_stderr)]

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use std::path::Path;

use dtsb_cli::args::CliArgs;
use dtsb_cli::config::{BundleConfig, load_config, resolve_options};
use dtsb_cli::{driver, tracing_config};

fn main() -> Result<()> {
    // Initialize tracing if DTSB_LOG or RUST_LOG is set.
    tracing_config::init_tracing();

    let args = CliArgs::parse();
    let cwd = std::env::current_dir().context("failed to resolve current directory")?;

    let (config, config_dir) = match &args.config {
        Some(path) => {
            let path = dtsb_common::path_utils::ensure_absolute(path, &cwd);
            let config = load_config(&path)?;
            let dir = path.parent().unwrap_or(Path::new("/")).to_path_buf();
            (config, dir)
        }
        None => {
            let default = cwd.join("dtsb.json");
            if default.is_file() {
                (load_config(&default)?, cwd.clone())
            } else {
                (BundleConfig::default(), cwd.clone())
            }
        }
    };
    let options = resolve_options(&config, &config_dir, &args, &cwd)?;

    let report = match driver::run(&options) {
        Ok(report) => report,
        Err(err) => {
            eprintln!("{}", format!("{err:?}").red());
            std::process::exit(1);
        }
    };

    if let Some(err) = &report.fallback_error {
        eprintln!("{}", format!("{err:?}").red());
        println!("Fallback to original declaration files");
    }
    if options.list_emitted_files {
        println!("{}", driver::emitted_files_listing(&report.emitted));
    }
    Ok(())
}
