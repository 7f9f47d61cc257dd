//! HTTP handlers

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::error;

use super::AppState;
use crate::tree::{read_structure, DirectoryNode, StructureFormat};

/// Query parameters for the structure endpoint
#[derive(Debug, Default, Deserialize)]
pub struct StructureQuery {
    /// `flat` (default) or `tagged`
    #[serde(default)]
    pub format: StructureFormat,
}

/// Error payload: `{ "error": "<message>" }` with a 500 status
#[derive(Debug)]
pub struct StructureError(pub String);

impl IntoResponse for StructureError {
    fn into_response(self) -> Response {
        let body = Json(json!({
            "error": self.0,
        }));
        (StatusCode::INTERNAL_SERVER_ERROR, body).into_response()
    }
}

/// GET /api/<structure_endpoint>
///
/// Reads the data directory on a blocking thread. A data root that is not a
/// directory yields an empty object.
pub async fn get_structure(
    State(state): State<AppState>,
    Query(query): Query<StructureQuery>,
) -> Result<Json<Value>, StructureError> {
    let data_dir = state.data_dir.clone();
    let walker = state.walker.clone();

    let read = tokio::task::spawn_blocking(move || read_structure(&data_dir, &walker))
        .await
        .map_err(|e| {
            error!(error = %e, "Structure read task failed");
            StructureError(format!("Structure read task failed: {}", e))
        })?;

    let node = read.map_err(|e| {
        error!(error = %e, "Failed to read data structure");
        StructureError(e.to_string())
    })?;

    let rendered = node
        .unwrap_or_else(DirectoryNode::new)
        .render(query.format)
        .map_err(|e| StructureError(format!("Failed to render structure: {}", e)))?;
    Ok(Json(rendered))
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub module: String,
    pub version: String,
}

/// GET /health
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        module: "vizdata".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}
