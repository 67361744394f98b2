//! Folio gateway - API backend for a portfolio site

#![allow(missing_docs)]

use clap::Parser;
use folio_gateway::config::DEFAULT_CONFIG_PATH;
use folio_gateway::server;
use std::path::PathBuf;
use std::process::ExitCode;

/// Command line arguments
#[derive(Debug, Parser)]
#[command(name = "gateway", version, about = "API backend for a portfolio site")]
struct Args {
    /// Path to the YAML configuration file
    #[arg(short, long, env = "FOLIO_CONFIG", default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,
}

#[tokio::main]
async fn main() -> ExitCode {
    // A missing .env file is fine.
    let _ = dotenvy::dotenv();
    let args = Args::parse();

    // Loads the config, installs tracing, then serves until shutdown.
    match server::run_server(Some(&args.config)).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            // Display keeps the message readable
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
