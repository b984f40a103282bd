//! Configuration and geocoding endpoints

use axum::extract::{Query, State};
use axum::Json;
use geotag_common::config::{ConfigUpdate, GeotagConfig};
use geotag_common::coord::validate_coordinates;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::warn;

use super::ApiError;
use crate::{services, AppState};

#[derive(Debug, Deserialize)]
pub struct GeocodeQuery {
    pub latitude: f64,
    pub longitude: f64,
}

/// GET /api/config
pub async fn get_config(State(state): State<AppState>) -> Json<GeotagConfig> {
    let manager = state.config.read().await;
    Json(manager.config.clone())
}

/// POST /api/config
///
/// Apply a partial settings update; the file is written back when auto-save
/// is enabled.
pub async fn update_config(
    State(state): State<AppState>,
    Json(update): Json<ConfigUpdate>,
) -> Json<GeotagConfig> {
    let mut manager = state.config.write().await;
    manager.config.apply(update);
    if manager.config.auto_save_config {
        if let Err(e) = manager.save() {
            warn!("Could not save configuration: {}", e);
        }
    }
    Json(manager.config.clone())
}

/// GET /api/geocode?latitude=..&longitude=..
///
/// Reverse geocode a position into place names for display.
pub async fn reverse_geocode(
    State(state): State<AppState>,
    Query(query): Query<GeocodeQuery>,
) -> Result<Json<Value>, ApiError> {
    validate_coordinates(query.latitude, query.longitude)?;

    match services::geocoding::reverse(&state.http, query.latitude, query.longitude).await {
        Some(place) => Ok(Json(json!({ "place": place }))),
        None => Err(ApiError::Upstream(
            "reverse geocoding unavailable".to_string(),
        )),
    }
}
