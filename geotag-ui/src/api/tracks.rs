//! Track log endpoints: upload, listing, removal and time offsets

use axum::extract::State;
use axum::Json;
use geotag_common::track::OffsetTarget;
use geotag_common::TrackSummary;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use super::ApiError;
use crate::{gpx, AppState};

#[derive(Debug, Deserialize)]
pub struct TrackUploadRequest {
    /// Source file name; becomes the track's identity
    pub filename: String,
    /// Raw GPX document text
    pub content: String,
}

#[derive(Debug, Deserialize)]
pub struct TrackRemoveRequest {
    pub names: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct TrackOffsetRequest {
    /// `"*"` applies the main offset to every track, otherwise one track
    /// by name
    pub track: String,
    /// Signed `HH:MM:SS`
    pub offset: String,
}

#[derive(Debug, Serialize)]
pub struct TrackUploadResponse {
    pub track: TrackSummary,
    pub tracks: Vec<TrackSummary>,
}

/// POST /api/tracks/upload
///
/// Decode a GPX document and ingest it as one track. Photos are re-matched
/// against the new track before the response is produced.
pub async fn upload_track(
    State(state): State<AppState>,
    Json(request): Json<TrackUploadRequest>,
) -> Result<Json<TrackUploadResponse>, ApiError> {
    let points = gpx::parse_track_points(&request.content);
    if points.is_empty() {
        return Err(ApiError::BadRequest(format!(
            "no usable track points in {}",
            request.filename
        )));
    }

    let mut session = state.session.write().await;
    let track = session.ingest_track(&request.filename, points)?;
    let tracks = session.tracks().summaries();
    Ok(Json(TrackUploadResponse { track, tracks }))
}

/// GET /api/tracks
pub async fn get_tracks(State(state): State<AppState>) -> Json<Value> {
    let session = state.session.read().await;
    let tracks = session.tracks().summaries();
    Json(json!({ "count": tracks.len(), "tracks": tracks }))
}

/// POST /api/tracks/remove
///
/// Remove tracks by name; names with no matching track are ignored.
pub async fn remove_tracks(
    State(state): State<AppState>,
    Json(request): Json<TrackRemoveRequest>,
) -> Json<Value> {
    let mut session = state.session.write().await;
    let removed = session.remove_tracks(&request.names);
    Json(json!({ "removed": removed, "tracks": session.tracks().summaries() }))
}

/// DELETE /api/tracks
pub async fn clear_tracks(State(state): State<AppState>) -> Json<Value> {
    let mut session = state.session.write().await;
    session.clear_tracks();
    Json(json!({ "tracks": [] }))
}

/// POST /api/tracks/offset
///
/// Apply a time offset to every track (`"*"`) or one track by name. The
/// offset string must carry an explicit sign.
pub async fn apply_track_offset(
    State(state): State<AppState>,
    Json(request): Json<TrackOffsetRequest>,
) -> Result<Json<Value>, ApiError> {
    let mut session = state.session.write().await;
    let target = if request.track == "*" {
        OffsetTarget::AllTracks
    } else {
        OffsetTarget::Track(&request.track)
    };
    let offset_seconds = session.apply_offset(target, &request.offset)?;
    Ok(Json(json!({
        "track": request.track,
        "offset_seconds": offset_seconds,
        "tracks": session.tracks().summaries(),
    })))
}
