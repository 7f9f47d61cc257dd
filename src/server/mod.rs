//! HTTP exposure layer
//!
//! One JSON endpoint describing the data tree and a static mount serving the
//! files themselves.

pub mod handlers;

use crate::error::ApiError;
use crate::tree::WalkerConfig;
use axum::{routing::get, Router};
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::info;

/// Resolved server settings
#[derive(Debug, Clone)]
pub struct ServerSettings {
    pub data_dir: PathBuf,
    pub walker: WalkerConfig,
    pub host: String,
    pub port: u16,
    /// Without slashes
    pub structure_endpoint: String,
    /// Without slashes
    pub data_mount: String,
    pub cors: bool,
}

impl ServerSettings {
    pub fn structure_route(&self) -> String {
        format!("/api/{}", self.structure_endpoint)
    }

    pub fn data_route(&self) -> String {
        format!("/{}", self.data_mount)
    }
}

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    pub data_dir: Arc<PathBuf>,
    pub walker: Arc<WalkerConfig>,
}

impl AppState {
    pub fn new(data_dir: PathBuf, walker: WalkerConfig) -> Self {
        Self {
            data_dir: Arc::new(data_dir),
            walker: Arc::new(walker),
        }
    }
}

/// Build application router
pub fn build_router(settings: &ServerSettings) -> Router {
    let state = AppState::new(settings.data_dir.clone(), settings.walker.clone());

    let router = Router::new()
        .route(&settings.structure_route(), get(handlers::get_structure))
        .route("/health", get(handlers::health_check))
        .nest_service(&settings.data_route(), ServeDir::new(&settings.data_dir))
        .with_state(state)
        .layer(TraceLayer::new_for_http());

    if settings.cors {
        router.layer(CorsLayer::permissive())
    } else {
        router
    }
}

/// Bind and serve until the process exits.
pub async fn serve(settings: &ServerSettings) -> Result<(), ApiError> {
    let app = build_router(settings);
    let listener = tokio::net::TcpListener::bind((settings.host.as_str(), settings.port))
        .await
        .map_err(|e| {
            ApiError::ServerError(format!(
                "Failed to bind to {}:{}: {}",
                settings.host, settings.port, e
            ))
        })?;
    let addr = listener
        .local_addr()
        .map_err(|e| ApiError::ServerError(format!("Failed to read listen address: {}", e)))?;

    info!(
        data_dir = %settings.data_dir.display(),
        "Listening on http://{}{}",
        addr,
        settings.structure_route()
    );

    axum::serve(listener, app)
        .await
        .map_err(|e| ApiError::ServerError(format!("Server error: {}", e)))
}
