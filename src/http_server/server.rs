//! # HTTP Server
//!
//! Combines the capture, export and health routers into one axum server.

use std::io;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use tokio::net::TcpListener;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};

use crate::capture::CaptureEngine;
use crate::export::CsvProjector;
use crate::observability::{log_event_with_fields, Event};
use crate::schema::Schema;
use crate::storage::RecordStore;

use super::auth::BasicCredentials;
use super::capture_routes::capture_routes;
use super::config::HttpServerConfig;
use super::export_routes::{export_routes, ExportState};
use super::observability_routes::health_routes;

/// Everything the routes need, wired from one schema and one store
#[derive(Clone)]
pub struct AppServices {
    pub engine: Arc<CaptureEngine>,
    pub projector: CsvProjector,
    pub credentials: BasicCredentials,
}

impl AppServices {
    pub fn new(
        schema: Arc<Schema>,
        store: Arc<dyn RecordStore>,
        credentials: BasicCredentials,
    ) -> Self {
        Self {
            engine: Arc::new(CaptureEngine::new(schema.clone(), store.clone())),
            projector: CsvProjector::new(schema, store),
            credentials,
        }
    }
}

/// HTTP server for formcapture
pub struct HttpServer {
    config: HttpServerConfig,
    router: Router,
}

impl HttpServer {
    pub fn new(config: HttpServerConfig, services: AppServices) -> Self {
        let router = Self::build_router(&config, services);
        Self { config, router }
    }

    fn build_router(config: &HttpServerConfig, services: AppServices) -> Router {
        let cors = if config.cors_origins.is_empty() {
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any)
        } else {
            let origins: Vec<_> = config
                .cors_origins
                .iter()
                .filter_map(|s| s.parse().ok())
                .collect();

            CorsLayer::new()
                .allow_origin(AllowOrigin::list(origins))
                .allow_methods(Any)
                .allow_headers(Any)
        };

        let export_state = Arc::new(ExportState {
            projector: services.projector,
            credentials: services.credentials,
        });

        Router::new()
            .merge(health_routes())
            .merge(capture_routes(services.engine))
            .merge(export_routes(export_state))
            .layer(cors)
    }

    pub fn socket_addr(&self) -> String {
        self.config.socket_addr()
    }

    /// Get the router (for testing)
    pub fn router(self) -> Router {
        self.router
    }

    /// Bind and serve until the listener fails
    pub async fn start(self) -> io::Result<()> {
        let addr: SocketAddr = self.config.socket_addr().parse().map_err(|e| {
            io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("invalid socket address '{}': {}", self.config.socket_addr(), e),
            )
        })?;

        let listener = TcpListener::bind(addr).await?;
        log_event_with_fields(
            Event::ServerListening,
            &[
                ("addr", &addr.to_string()),
                ("capture", "/capture_data"),
                ("export", "/data.csv"),
            ],
        );

        axum::serve(listener, self.router).await?;

        Ok(())
    }
}
