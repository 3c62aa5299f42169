//! # HTTP Server
//!
//! Combines the person and health routers behind CORS and request tracing.

use std::io;
use std::sync::Arc;

use axum::Router;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use super::config::HttpServerConfig;
use super::health_routes::health_routes;
use super::person_routes::{person_routes, PersonState};
use crate::observability::Event;
use crate::store::PersonService;

/// HTTP Server for the person API
pub struct HttpServer {
    config: HttpServerConfig,
    router: Router,
}

impl HttpServer {
    /// Create a new HTTP server with default configuration
    pub fn new(service: Arc<PersonService>) -> Self {
        Self::with_config(HttpServerConfig::default(), service)
    }

    /// Create a new HTTP server with custom configuration
    pub fn with_config(config: HttpServerConfig, service: Arc<PersonService>) -> Self {
        let router = Self::build_router(&config, service);
        Self { config, router }
    }

    /// Build the combined router with all endpoints
    fn build_router(config: &HttpServerConfig, service: Arc<PersonService>) -> Router {
        Router::new()
            .merge(health_routes())
            .merge(person_routes(PersonState::new(service)))
            .layer(config.cors_layer())
            .layer(TraceLayer::new_for_http())
    }

    pub fn config(&self) -> &HttpServerConfig {
        &self.config
    }

    /// Get the router (for testing)
    pub fn router(self) -> Router {
        self.router
    }

    /// Bind and serve until Ctrl-C
    pub async fn start(self) -> Result<(), io::Error> {
        let addr = self.config.bind_addr()?;
        let listener = TcpListener::bind(addr).await?;
        info!(event = %Event::Serving, %addr, "person API listening");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown_signal())
            .await
    }
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_err() {
        warn!("failed to listen for Ctrl-C; shutdown signal disabled");
        std::future::pending::<()>().await;
    }
    info!(event = %Event::ShutdownStart, "shutting down");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::DurableLog;
    use tempfile::TempDir;

    fn service(temp: &TempDir) -> Arc<PersonService> {
        Arc::new(PersonService::new(DurableLog::new(temp.path().join("persons.csv"))))
    }

    #[test]
    fn test_server_creation() {
        let temp = TempDir::new().unwrap();
        let server = HttpServer::new(service(&temp));
        assert_eq!(server.config(), &HttpServerConfig::default());
    }

    #[test]
    fn test_server_with_custom_port() {
        let temp = TempDir::new().unwrap();
        let config = HttpServerConfig::with_port(9000);
        let server = HttpServer::with_config(config, service(&temp));
        assert_eq!(server.config().port, 9000);
    }

    #[test]
    fn test_router_builds_with_origin_list() {
        let temp = TempDir::new().unwrap();
        let config = HttpServerConfig {
            cors_origins: vec!["http://localhost:5173".to_string(), "bad\norigin".to_string()],
            ..Default::default()
        };
        let _router = HttpServer::with_config(config, service(&temp)).router();
    }
}
