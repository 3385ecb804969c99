//! fleetgate - authorization gateway for the fleet console

#![allow(missing_docs)]

use clap::Parser;
use fleetgate::server::builder::{load_config, run_server};
use fleetgate::utils::init_tracing;
use std::path::PathBuf;
use std::process::ExitCode;

/// Command line arguments
#[derive(Debug, Parser)]
#[command(name = "fleetgate", version, about)]
struct Args {
    /// Configuration file (defaults to config/fleetgate.yaml when present)
    #[arg(short, long, env = "FLEETGATE_CONFIG")]
    config: Option<PathBuf>,

    /// Override the bind host
    #[arg(long)]
    host: Option<String>,

    /// Override the bind port
    #[arg(short, long)]
    port: Option<u16>,
}

async fn run(args: Args) -> anyhow::Result<()> {
    let mut config = load_config(args.config.as_deref()).await?;

    if let Some(host) = args.host {
        config.console.server.host = host;
    }
    if let Some(port) = args.port {
        config.console.server.port = port;
    }
    config.validate()?;

    init_tracing(config.logging())?;
    run_server(config).await?;
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    // A missing .env file is fine
    let _ = dotenvy::dotenv();

    match run(Args::parse()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
