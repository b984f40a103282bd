//! geotag-ui library - the embedding web service
//!
//! Hosts the geolocation engine behind an HTTP API: folder scanning, track
//! upload, offsets, manual placement, tagging, renaming, predefined
//! positions and configuration. All engine state sits behind a single
//! read/write lock, so mutating requests serialize (single writer) while
//! read-only queries may overlap.

use axum::routing::{get, post};
use axum::Router;
use geotag_common::config::ConfigManager;
use geotag_common::positions::PositionStore;
use geotag_common::GeotagSession;
use std::sync::Arc;
use tokio::sync::RwLock;
use tower_http::trace::TraceLayer;

pub mod api;
pub mod gpx;
pub mod scan;
pub mod services;

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// The engine: photo collection + loaded tracks
    pub session: Arc<RwLock<GeotagSession>>,
    /// Live configuration and its backing file
    pub config: Arc<RwLock<ConfigManager>>,
    /// Predefined named positions
    pub positions: Arc<RwLock<PositionStore>>,
    /// Shared HTTP client for elevation and geocoding lookups
    pub http: reqwest::Client,
}

impl AppState {
    /// Create new application state around a configuration manager
    pub fn new(config: ConfigManager) -> Self {
        Self {
            session: Arc::new(RwLock::new(GeotagSession::new())),
            config: Arc::new(RwLock::new(config)),
            positions: Arc::new(RwLock::new(PositionStore::new())),
            http: reqwest::Client::new(),
        }
    }
}

/// Build the application router
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(api::serve_index))
        .route("/health", get(api::health_check))
        .route("/api/scan-folder", post(api::scan_folder))
        .route("/api/photos", get(api::get_photos))
        .route("/api/photos/bulk-tag", post(api::bulk_tag))
        .route("/api/photos/:index", get(api::get_photo))
        .route("/api/photos/:index/tag", post(api::update_tag))
        .route(
            "/api/photos/:index/manual-location",
            post(api::set_manual_location).delete(api::delete_manual_location),
        )
        .route("/api/sort", post(api::set_sort_order))
        .route("/api/rename", post(api::apply_rename))
        .route("/api/tracks", get(api::get_tracks).delete(api::clear_tracks))
        .route("/api/tracks/upload", post(api::upload_track))
        .route("/api/tracks/remove", post(api::remove_tracks))
        .route("/api/tracks/offset", post(api::apply_track_offset))
        .route(
            "/api/positions",
            get(api::get_positions).delete(api::clear_positions),
        )
        .route("/api/positions/upload", post(api::upload_positions))
        .route("/api/positions/remove", post(api::remove_positions))
        .route("/api/config", get(api::get_config).post(api::update_config))
        .route("/api/geocode", get(api::reverse_geocode))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
