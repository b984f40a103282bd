//! Predefined position endpoints

use axum::extract::State;
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};

use super::ApiError;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct PositionsUploadRequest {
    pub filename: String,
    /// TOML document of `[[position]]` entries
    pub content: String,
}

#[derive(Debug, Deserialize)]
pub struct PositionsRemoveRequest {
    pub filename: String,
}

/// POST /api/positions/upload
pub async fn upload_positions(
    State(state): State<AppState>,
    Json(request): Json<PositionsUploadRequest>,
) -> Result<Json<Value>, ApiError> {
    let mut positions = state.positions.write().await;
    let count = positions.load_toml(&request.content, &request.filename)?;
    Ok(Json(json!({
        "filename": request.filename,
        "count": count,
        "positions": positions.all(),
    })))
}

/// GET /api/positions
pub async fn get_positions(State(state): State<AppState>) -> Json<Value> {
    let positions = state.positions.read().await;
    Json(json!({
        "count": positions.all().len(),
        "by_file": positions.by_file(),
    }))
}

/// POST /api/positions/remove
pub async fn remove_positions(
    State(state): State<AppState>,
    Json(request): Json<PositionsRemoveRequest>,
) -> Json<Value> {
    let mut positions = state.positions.write().await;
    let removed = positions.remove_by_file(&request.filename);
    Json(json!({ "removed": removed }))
}

/// DELETE /api/positions
pub async fn clear_positions(State(state): State<AppState>) -> Json<Value> {
    let mut positions = state.positions.write().await;
    positions.clear();
    Json(json!({ "count": 0 }))
}
