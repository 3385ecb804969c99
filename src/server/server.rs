//! HTTP server core implementation

use crate::config::{Config, ServerConfig};
use crate::server::middleware::AdmissionMiddleware;
use crate::server::routes;
use crate::server::state::AppState;
use crate::utils::error::{AdminError, Result};
use actix_web::{
    App, HttpServer as ActixHttpServer,
    middleware::{DefaultHeaders, Logger},
    web,
};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

/// How often expired session tokens are swept from the cache
const SESSION_SWEEP_PERIOD: Duration = Duration::from_secs(60);

/// HTTP server
pub struct HttpServer {
    /// Server configuration
    config: ServerConfig,
    /// Application state
    state: AppState,
}

impl HttpServer {
    /// Create a new HTTP server
    pub fn new(config: Config) -> Result<Self> {
        info!("Creating HTTP server");

        let server = config.server().clone();
        let state = AppState::new(config)?;

        Ok(Self {
            config: server,
            state,
        })
    }

    /// Create the Actix-web application
    pub fn create_app(
        state: web::Data<AppState>,
    ) -> App<
        impl actix_web::dev::ServiceFactory<
            actix_web::dev::ServiceRequest,
            Config = (),
            Response = actix_web::dev::ServiceResponse<impl actix_web::body::MessageBody>,
            Error = actix_web::Error,
            InitError = (),
        >,
    > {
        App::new()
            .app_data(state)
            .wrap(AdmissionMiddleware)
            .wrap(Logger::default())
            .wrap(DefaultHeaders::new().add(("Server", "fleetgate")))
            .configure(routes::configure_routes)
    }

    /// Start the HTTP server
    pub async fn start(self) -> Result<()> {
        let bind_addr = self.config.address();
        info!("Starting HTTP server on {}", bind_addr);

        let _watcher = Arc::clone(&self.state.sessions).spawn_role_watcher();
        let _sweeper =
            Arc::clone(&self.state.sessions).spawn_expiry_sweeper(SESSION_SWEEP_PERIOD);
        let state = web::Data::new(self.state);

        let mut server = ActixHttpServer::new(move || Self::create_app(state.clone()));
        if let Some(workers) = self.config.workers {
            server = server.workers(workers);
        }

        let server = server
            .bind(&bind_addr)
            .map_err(|e| AdminError::config(format!("Failed to bind {}: {}", bind_addr, e)))?
            .run();

        info!("HTTP server listening on {}", bind_addr);

        server
            .await
            .map_err(|e| AdminError::internal(format!("Server error: {}", e)))?;

        info!("HTTP server stopped");
        Ok(())
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }
}
