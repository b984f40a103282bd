//! Integration tests for the geotag-ui API endpoints
//!
//! Drives the router directly with `tower::ServiceExt::oneshot`: track
//! upload and offset flows, folder scanning, manual placement, tagging,
//! renaming, positions and configuration. Elevation/geocoding lookups are
//! kept off the network by configuring the "none" provider.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use geotag_common::config::ConfigManager;
use geotag_ui::{build_router, AppState};
use serde_json::{json, Value};
use tower::util::ServiceExt; // for `oneshot` method

const GPX_SAMPLE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<gpx version="1.1" creator="test">
  <trk><trkseg>
    <trkpt lat="43.2630" lon="-2.9350">
      <ele>15.2</ele>
      <time>2026-06-15T10:30:00Z</time>
    </trkpt>
    <trkpt lat="43.2640" lon="-2.9360">
      <time>2026-06-15T10:40:00Z</time>
    </trkpt>
  </trkseg></trk>
</gpx>
"#;

/// Test helper: app with default (file-less) configuration
fn setup_app() -> axum::Router {
    build_router(AppState::new(ConfigManager::new(None)))
}

/// Test helper: GET request
fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

/// Test helper: request with a JSON body
fn with_json(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_vec(&body).unwrap()))
        .unwrap()
}

/// Test helper: extract JSON body from a response
async fn extract_json(body: Body) -> Value {
    let bytes = axum::body::to_bytes(body, usize::MAX)
        .await
        .expect("Should read body");
    serde_json::from_slice(&bytes).expect("Should parse JSON")
}

#[tokio::test]
async fn test_health_endpoint() {
    let app = setup_app();
    let response = app.oneshot(get("/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = extract_json(response.into_body()).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["module"], "geotag-ui");
    assert!(body["version"].is_string());
}

#[tokio::test]
async fn test_index_page() {
    let app = setup_app();
    let response = app.oneshot(get("/")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_track_upload_and_duplicate_rejection() {
    let app = setup_app();

    let upload = with_json(
        "POST",
        "/api/tracks/upload",
        json!({"filename": "walk.gpx", "content": GPX_SAMPLE}),
    );
    let response = app.clone().oneshot(upload).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = extract_json(response.into_body()).await;
    assert_eq!(body["track"]["name"], "walk.gpx");
    assert_eq!(body["track"]["point_count"], 2);
    assert_eq!(body["track"]["offset_seconds"], 0);

    // same file name, different case: rejected, store unchanged
    let duplicate = with_json(
        "POST",
        "/api/tracks/upload",
        json!({"filename": "WALK.GPX", "content": GPX_SAMPLE}),
    );
    let response = app.clone().oneshot(duplicate).await.unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let response = app.oneshot(get("/api/tracks")).await.unwrap();
    let body = extract_json(response.into_body()).await;
    assert_eq!(body["count"], 1);
}

#[tokio::test]
async fn test_track_upload_without_points_is_rejected() {
    let app = setup_app();
    let upload = with_json(
        "POST",
        "/api/tracks/upload",
        json!({"filename": "bad.gpx", "content": "not a gpx document"}),
    );
    let response = app.oneshot(upload).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_track_offsets() {
    let app = setup_app();
    let upload = with_json(
        "POST",
        "/api/tracks/upload",
        json!({"filename": "walk.gpx", "content": GPX_SAMPLE}),
    );
    app.clone().oneshot(upload).await.unwrap();

    // missing sign: rejected with no state change
    let invalid = with_json(
        "POST",
        "/api/tracks/offset",
        json!({"track": "*", "offset": "00:10:00"}),
    );
    let response = app.clone().oneshot(invalid).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // unknown track name
    let unknown = with_json(
        "POST",
        "/api/tracks/offset",
        json!({"track": "ghost.gpx", "offset": "+00:10:00"}),
    );
    let response = app.clone().oneshot(unknown).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    // per-track offset applies
    let valid = with_json(
        "POST",
        "/api/tracks/offset",
        json!({"track": "walk.gpx", "offset": "-01:15:00"}),
    );
    let response = app.clone().oneshot(valid).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = extract_json(response.into_body()).await;
    assert_eq!(body["offset_seconds"], -4500);

    // main offset targets every track
    let main = with_json(
        "POST",
        "/api/tracks/offset",
        json!({"track": "*", "offset": "+02:30:00"}),
    );
    let response = app.clone().oneshot(main).await.unwrap();
    let body = extract_json(response.into_body()).await;
    assert_eq!(body["tracks"][0]["offset_seconds"], 9000);
}

#[tokio::test]
async fn test_track_removal_is_idempotent() {
    let app = setup_app();
    let upload = with_json(
        "POST",
        "/api/tracks/upload",
        json!({"filename": "walk.gpx", "content": GPX_SAMPLE}),
    );
    app.clone().oneshot(upload).await.unwrap();

    let remove = with_json(
        "POST",
        "/api/tracks/remove",
        json!({"names": ["walk.gpx", "missing.gpx"]}),
    );
    let response = app.clone().oneshot(remove).await.unwrap();
    let body = extract_json(response.into_body()).await;
    assert_eq!(body["removed"], 1);

    let again = with_json("POST", "/api/tracks/remove", json!({"names": ["walk.gpx"]}));
    let response = app.oneshot(again).await.unwrap();
    let body = extract_json(response.into_body()).await;
    assert_eq!(body["removed"], 0);
}

#[tokio::test]
async fn test_empty_photo_listing_and_missing_photo() {
    let app = setup_app();

    let response = app.clone().oneshot(get("/api/photos")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = extract_json(response.into_body()).await;
    assert_eq!(body["count"], 0);

    let response = app.oneshot(get("/api/photos/0")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_scan_and_manual_placement_flow() {
    let app = setup_app();

    // keep the elevation provider off the network
    let configure = with_json("POST", "/api/config", json!({"elevation_service": "none"}));
    let response = app.clone().oneshot(configure).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("a.jpg"), b"not a real jpeg").unwrap();
    std::fs::write(dir.path().join("b.jpg"), b"also not a jpeg").unwrap();
    std::fs::write(dir.path().join("notes.txt"), b"ignored").unwrap();

    let scan = with_json(
        "POST",
        "/api/scan-folder",
        json!({"folder_path": dir.path().to_string_lossy(), "recursive": false}),
    );
    let response = app.clone().oneshot(scan).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = extract_json(response.into_body()).await;
    assert_eq!(body["count"], 2);

    // undecodable files register with absent layers
    let response = app.clone().oneshot(get("/api/photos/0")).await.unwrap();
    let body = extract_json(response.into_body()).await;
    assert_eq!(body["photo"]["exif"], Value::Null);
    assert_eq!(body["photo"]["resolved"], Value::Null);

    // manual placement with explicit altitude
    let place = with_json(
        "POST",
        "/api/photos/0/manual-location",
        json!({"latitude": 43.4452, "longitude": -2.7840, "altitude": 125.0}),
    );
    let response = app.clone().oneshot(place).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = extract_json(response.into_body()).await;
    assert_eq!(body["photo"]["resolved"]["latitude"], 43.4452);
    assert_eq!(body["photo"]["resolved"]["altitude"], 125.0);

    // replacement without altitude: provider is "none", so altitude stays
    // empty rather than inheriting the previous value
    let replace = with_json(
        "POST",
        "/api/photos/0/manual-location",
        json!({"latitude": 10.0, "longitude": 20.0}),
    );
    let response = app.clone().oneshot(replace).await.unwrap();
    let body = extract_json(response.into_body()).await;
    assert_eq!(body["photo"]["resolved"]["latitude"], 10.0);
    assert_eq!(body["photo"]["resolved"]["altitude"], Value::Null);

    // out-of-range coordinates are rejected
    let invalid = with_json(
        "POST",
        "/api/photos/0/manual-location",
        json!({"latitude": 91.0, "longitude": 0.0}),
    );
    let response = app.clone().oneshot(invalid).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // delete restores the (absent) lower layers
    let delete = Request::builder()
        .method("DELETE")
        .uri("/api/photos/0/manual-location")
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(delete).await.unwrap();
    let body = extract_json(response.into_body()).await;
    assert_eq!(body["photo"]["manual"], Value::Null);
    assert_eq!(body["photo"]["resolved"], Value::Null);
}

#[tokio::test]
async fn test_tagging_and_filtering() {
    let app = setup_app();
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("a.jpg"), b"x").unwrap();
    std::fs::write(dir.path().join("b.jpg"), b"x").unwrap();

    let scan = with_json(
        "POST",
        "/api/scan-folder",
        json!({"folder_path": dir.path().to_string_lossy()}),
    );
    app.clone().oneshot(scan).await.unwrap();

    let tag = with_json("POST", "/api/photos/0/tag", json!({"tagged": true}));
    let response = app.clone().oneshot(tag).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .clone()
        .oneshot(get("/api/photos?filter=tagged"))
        .await
        .unwrap();
    let body = extract_json(response.into_body()).await;
    assert_eq!(body["count"], 1);

    let bulk = with_json(
        "POST",
        "/api/photos/bulk-tag",
        json!({"indices": [0, 1, 99], "tagged": true}),
    );
    let response = app.clone().oneshot(bulk).await.unwrap();
    let body = extract_json(response.into_body()).await;
    assert_eq!(body["updated"], 2);

    let response = app
        .oneshot(get("/api/photos?filter=untagged"))
        .await
        .unwrap();
    let body = extract_json(response.into_body()).await;
    assert_eq!(body["count"], 0);
}

#[tokio::test]
async fn test_rename_pass_over_scanned_photos() {
    let app = setup_app();
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("a.jpg"), b"x").unwrap();
    std::fs::write(dir.path().join("b.jpg"), b"x").unwrap();

    let scan = with_json(
        "POST",
        "/api/scan-folder",
        json!({"folder_path": dir.path().to_string_lossy()}),
    );
    app.clone().oneshot(scan).await.unwrap();

    // a tokenless template forces the dedup suffixes
    let rename = with_json("POST", "/api/rename", json!({"format": "holiday"}));
    let response = app.oneshot(rename).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = extract_json(response.into_body()).await;
    assert_eq!(body["named"], 2);

    let names: Vec<&str> = body["names"]
        .as_array()
        .unwrap()
        .iter()
        .map(|entry| entry["generated_name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["holiday.jpg", "holidaya.jpg"]);
}

#[tokio::test]
async fn test_positions_flow() {
    let app = setup_app();
    let content = "[[position]]\nname = \"Home\"\nlatitude = 43.26\nlongitude = -2.93\naltitude = 40.0\n";

    let upload = with_json(
        "POST",
        "/api/positions/upload",
        json!({"filename": "spots.toml", "content": content}),
    );
    let response = app.clone().oneshot(upload).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = extract_json(response.into_body()).await;
    assert_eq!(body["count"], 1);

    let broken = with_json(
        "POST",
        "/api/positions/upload",
        json!({"filename": "broken.toml", "content": "not [ toml"}),
    );
    let response = app.clone().oneshot(broken).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app.clone().oneshot(get("/api/positions")).await.unwrap();
    let body = extract_json(response.into_body()).await;
    assert_eq!(body["count"], 1);
    assert_eq!(body["by_file"]["spots.toml"][0]["name"], "Home");

    let remove = with_json(
        "POST",
        "/api/positions/remove",
        json!({"filename": "spots.toml"}),
    );
    let response = app.clone().oneshot(remove).await.unwrap();
    let body = extract_json(response.into_body()).await;
    assert_eq!(body["removed"], 1);
}

#[tokio::test]
async fn test_config_round_trip() {
    let app = setup_app();

    let response = app.clone().oneshot(get("/api/config")).await.unwrap();
    let body = extract_json(response.into_body()).await;
    assert_eq!(body["map_provider"], "osm");
    assert_eq!(body["sort_by"], "time");

    let update = with_json(
        "POST",
        "/api/config",
        json!({"map_provider": "esri", "include_subfolders": true}),
    );
    let response = app.clone().oneshot(update).await.unwrap();
    let body = extract_json(response.into_body()).await;
    assert_eq!(body["map_provider"], "esri");
    assert_eq!(body["include_subfolders"], true);

    // unrelated keys keep their values
    let response = app.oneshot(get("/api/config")).await.unwrap();
    let body = extract_json(response.into_body()).await;
    assert_eq!(body["map_provider"], "esri");
    assert_eq!(body["elevation_service"], "open-elevation");
}

#[tokio::test]
async fn test_geocode_validates_coordinates() {
    let app = setup_app();
    let response = app
        .oneshot(get("/api/geocode?latitude=95.0&longitude=0.0"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
