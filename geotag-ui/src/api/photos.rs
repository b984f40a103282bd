//! Photo collection endpoints: scanning, listing, tagging, manual
//! placement, sorting and renaming

use axum::extract::{Path, Query, State};
use axum::Json;
use geotag_common::coord::validate_coordinates;
use geotag_common::photo::{PhotoFilter, SortOrder};
use geotag_common::PhotoRecord;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::warn;

use super::ApiError;
use crate::{scan, services, AppState};

#[derive(Debug, Deserialize)]
pub struct ScanFolderRequest {
    pub folder_path: String,
    /// Overrides the configured include_subfolders setting when present
    pub recursive: Option<bool>,
}

#[derive(Debug, Deserialize)]
pub struct PhotosQuery {
    #[serde(default)]
    pub filter: PhotoFilter,
}

#[derive(Debug, Deserialize)]
pub struct TagUpdateRequest {
    pub tagged: bool,
}

#[derive(Debug, Deserialize)]
pub struct BulkTagRequest {
    pub indices: Vec<usize>,
    pub tagged: bool,
}

#[derive(Debug, Deserialize)]
pub struct LocationUpdateRequest {
    pub latitude: f64,
    pub longitude: f64,
    /// When absent, the configured elevation service fills it in (best
    /// effort; lookup failure just leaves the altitude empty)
    pub altitude: Option<f64>,
}

#[derive(Debug, Deserialize)]
pub struct SortRequest {
    pub sort_by: SortOrder,
}

#[derive(Debug, Deserialize)]
pub struct RenameRequest {
    /// strftime template; defaults to the configured filename format
    pub format: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct PhotoResponse {
    pub index: usize,
    pub photo: PhotoRecord,
}

/// POST /api/scan-folder
///
/// Scan a folder for photos, replacing the current collection. Tracks stay
/// loaded and the fresh photos are matched against them immediately.
pub async fn scan_folder(
    State(state): State<AppState>,
    Json(request): Json<ScanFolderRequest>,
) -> Result<Json<Value>, ApiError> {
    let (recursive, sort_by, auto_save) = {
        let manager = state.config.read().await;
        (
            request.recursive.unwrap_or(manager.config.include_subfolders),
            manager.config.sort_by,
            manager.config.auto_save_config,
        )
    };

    let folder = std::path::PathBuf::from(&request.folder_path);
    let registrations = tokio::task::spawn_blocking(move || scan::scan_folder(&folder, recursive))
        .await
        .map_err(|e| ApiError::Internal(e.to_string()))?
        .map_err(|e| ApiError::BadRequest(e.to_string()))?;

    let count = {
        let mut session = state.session.write().await;
        let count = session.load_photos(registrations);
        session.set_sort_order(sort_by);
        count
    };

    {
        let mut manager = state.config.write().await;
        manager.config.folder_path = request.folder_path.clone();
        if auto_save {
            if let Err(e) = manager.save() {
                warn!("Could not save configuration: {}", e);
            }
        }
    }

    Ok(Json(json!({
        "folder": request.folder_path,
        "count": count,
    })))
}

/// GET /api/photos?filter=all|tagged|untagged
pub async fn get_photos(
    State(state): State<AppState>,
    Query(query): Query<PhotosQuery>,
) -> Json<Value> {
    let session = state.session.read().await;
    let photos = session.filtered_photos(query.filter);
    Json(json!({
        "count": photos.len(),
        "photos": photos,
    }))
}

/// GET /api/photos/:index
pub async fn get_photo(
    State(state): State<AppState>,
    Path(index): Path<usize>,
) -> Result<Json<PhotoResponse>, ApiError> {
    let session = state.session.read().await;
    let photo = session
        .photos()
        .get_by_index(index)
        .cloned()
        .ok_or_else(|| ApiError::NotFound(format!("photo index {index}")))?;
    Ok(Json(PhotoResponse { index, photo }))
}

/// POST /api/photos/:index/tag
pub async fn update_tag(
    State(state): State<AppState>,
    Path(index): Path<usize>,
    Json(request): Json<TagUpdateRequest>,
) -> Result<Json<PhotoResponse>, ApiError> {
    let mut session = state.session.write().await;
    let id = photo_id_at(&session, index)?;
    let photo = session.set_tag(&id, request.tagged)?;
    Ok(Json(PhotoResponse { index, photo }))
}

/// POST /api/photos/bulk-tag
pub async fn bulk_tag(
    State(state): State<AppState>,
    Json(request): Json<BulkTagRequest>,
) -> Json<Value> {
    let mut session = state.session.write().await;
    let ids: Vec<String> = request
        .indices
        .iter()
        .filter_map(|&index| session.photos().get_by_index(index))
        .map(|record| record.id().to_string())
        .collect();
    let updated = session.bulk_set_tag(&ids, request.tagged);
    Json(json!({ "updated": updated, "tagged": request.tagged }))
}

/// POST /api/photos/:index/manual-location
///
/// Manual placement. When the request carries no altitude the configured
/// elevation service is consulted first; the engine itself never does I/O.
pub async fn set_manual_location(
    State(state): State<AppState>,
    Path(index): Path<usize>,
    Json(request): Json<LocationUpdateRequest>,
) -> Result<Json<PhotoResponse>, ApiError> {
    validate_coordinates(request.latitude, request.longitude)?;

    let altitude = match request.altitude {
        Some(altitude) => Some(altitude),
        None => {
            let provider = state.config.read().await.config.elevation_service.clone();
            services::elevation::lookup(&state.http, &provider, request.latitude, request.longitude)
                .await
        }
    };

    let mut session = state.session.write().await;
    let id = photo_id_at(&session, index)?;
    let photo = session.set_manual(&id, request.latitude, request.longitude, altitude)?;
    Ok(Json(PhotoResponse { index, photo }))
}

/// DELETE /api/photos/:index/manual-location
pub async fn delete_manual_location(
    State(state): State<AppState>,
    Path(index): Path<usize>,
) -> Result<Json<PhotoResponse>, ApiError> {
    let mut session = state.session.write().await;
    let id = photo_id_at(&session, index)?;
    let photo = session.clear_manual(&id)?;
    Ok(Json(PhotoResponse { index, photo }))
}

/// POST /api/sort
pub async fn set_sort_order(
    State(state): State<AppState>,
    Json(request): Json<SortRequest>,
) -> Json<Value> {
    {
        let mut session = state.session.write().await;
        session.set_sort_order(request.sort_by);
    }

    let mut manager = state.config.write().await;
    manager.config.sort_by = request.sort_by;
    if manager.config.auto_save_config {
        if let Err(e) = manager.save() {
            warn!("Could not save configuration: {}", e);
        }
    }

    Json(json!({ "sort_by": request.sort_by }))
}

/// POST /api/rename
///
/// Run the rename pass over the current photo sequence and return the
/// generated names in order.
pub async fn apply_rename(
    State(state): State<AppState>,
    Json(request): Json<RenameRequest>,
) -> Json<Value> {
    let template = match request.format {
        Some(format) => format,
        None => state.config.read().await.config.filename_format.clone(),
    };

    let mut session = state.session.write().await;
    let named = session.apply_filename_format(&template);
    let names: Vec<Value> = session
        .photos()
        .all()
        .iter()
        .map(|record| {
            json!({
                "file_name": record.file_name(),
                "generated_name": record.generated_name(),
            })
        })
        .collect();

    Json(json!({ "named": named, "names": names }))
}

fn photo_id_at(
    session: &geotag_common::GeotagSession,
    index: usize,
) -> Result<String, ApiError> {
    session
        .photos()
        .get_by_index(index)
        .map(|record| record.id().to_string())
        .ok_or_else(|| ApiError::NotFound(format!("photo index {index}")))
}
