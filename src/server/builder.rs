//! Server startup from a configuration file

use crate::config::Config;
use crate::server::server::HttpServer;
use crate::utils::error::Result;
use std::path::Path;
use tracing::info;

/// Default configuration location
pub const DEFAULT_CONFIG_PATH: &str = "config/fleetgate.yaml";

/// Load configuration, falling back to defaults when no file exists
pub async fn load_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(path) => Config::from_file(path).await,
        None if Path::new(DEFAULT_CONFIG_PATH).exists() => {
            Config::from_file(DEFAULT_CONFIG_PATH).await
        }
        None => {
            info!(
                "No configuration file at {}, using defaults",
                DEFAULT_CONFIG_PATH
            );
            Config::from_env()
        }
    }
}

/// Start the server with a loaded configuration
pub async fn run_server(config: Config) -> Result<()> {
    info!("Starting fleetgate {}", crate::VERSION);
    info!(
        "Server starting at: http://{}:{}",
        config.server().host,
        config.server().port
    );
    info!("API endpoints:");
    info!("   GET    /health");
    info!("   GET    /api/permissions");
    info!("   GET    /api/permissions/search?q=");
    info!("   GET    /api/session");
    info!("   DELETE /api/session");
    info!("   POST   /api/authorize");

    HttpServer::new(config)?.start().await
}
