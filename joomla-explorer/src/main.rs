//! Joomla Explorer - Main entry point
//!
//! Analyses a Joomla extension manifest and probes the paths it declares.

use anyhow::Result;
use clap::Parser;
use joomla_explorer::{config::Config, explorer, utils};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Manifest URL, e.g. https://target/administrator/manifests/files/joomla.xml
    url: String,

    /// Path to configuration file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Directory for report and wordlist (overrides config)
    #[arg(short, long, value_name = "DIR")]
    output_dir: Option<PathBuf>,

    /// Maximum probes in flight (overrides config)
    #[arg(long)]
    concurrency: Option<usize>,

    /// Write report and wordlist without probing the target
    #[arg(long)]
    no_probe: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long)]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let args = Args::parse();

    // Load configuration
    let mut config = if let Some(config_path) = &args.config {
        Config::from_file(config_path)?
    } else {
        Config::default()
    };

    if let Some(dir) = &args.output_dir {
        config.relocate_outputs(dir);
    }
    if let Some(concurrency) = args.concurrency {
        config.probe.concurrency = concurrency;
    }
    if args.no_probe {
        config.probe.enabled = false;
    }

    // Initialize logging
    let log_level = args.log_level.as_deref().unwrap_or(&config.log.level);
    utils::logger::init(log_level)?;

    let result = explorer::run(&args.url, &config).await;
    let status = explorer::conclude(&result, &mut std::io::stdout());
    Ok(status.into())
}
