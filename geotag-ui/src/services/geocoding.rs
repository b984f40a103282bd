//! Reverse geocoding
//!
//! Turns a position into display place names. Tries Nominatim first and
//! falls back to Photon; both are OpenStreetMap-based and need no API key.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;
use tracing::warn;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);
const USER_AGENT: &str = concat!("geotag/", env!("CARGO_PKG_VERSION"));

/// Place names for one position; any component may be missing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaceInfo {
    pub city: Option<String>,
    pub sublocation: Option<String>,
    pub state: Option<String>,
    pub country: Option<String>,
}

/// Reverse geocode a position, trying each provider in turn
pub async fn reverse(
    client: &reqwest::Client,
    latitude: f64,
    longitude: f64,
) -> Option<PlaceInfo> {
    if let Some(place) = nominatim(client, latitude, longitude).await {
        return Some(place);
    }
    photon(client, latitude, longitude).await
}

async fn nominatim(client: &reqwest::Client, latitude: f64, longitude: f64) -> Option<PlaceInfo> {
    let response = client
        .get("https://nominatim.openstreetmap.org/reverse")
        .query(&[
            ("lat", latitude.to_string()),
            ("lon", longitude.to_string()),
            ("format", "json".to_string()),
            ("addressdetails", "1".to_string()),
            ("zoom", "18".to_string()),
        ])
        .header(reqwest::header::USER_AGENT, USER_AGENT)
        .timeout(REQUEST_TIMEOUT)
        .send()
        .await;

    let body: Value = match response {
        Ok(response) if response.status().is_success() => response.json().await.ok()?,
        Ok(response) => {
            warn!("Nominatim returned {}", response.status());
            return None;
        }
        Err(e) => {
            warn!("Nominatim request failed: {}", e);
            return None;
        }
    };

    let address = body.get("address")?;
    Some(PlaceInfo {
        city: first_of(address, &["city", "town", "village", "municipality", "hamlet"]),
        sublocation: first_of(address, &["suburb", "neighbourhood", "quarter"]),
        state: first_of(address, &["state", "province", "region"]),
        country: first_of(address, &["country"]),
    })
}

async fn photon(client: &reqwest::Client, latitude: f64, longitude: f64) -> Option<PlaceInfo> {
    let response = client
        .get("https://photon.komoot.io/reverse")
        .query(&[
            ("lat", latitude.to_string()),
            ("lon", longitude.to_string()),
        ])
        .timeout(REQUEST_TIMEOUT)
        .send()
        .await;

    let body: Value = match response {
        Ok(response) if response.status().is_success() => response.json().await.ok()?,
        Ok(response) => {
            warn!("Photon returned {}", response.status());
            return None;
        }
        Err(e) => {
            warn!("Photon request failed: {}", e);
            return None;
        }
    };

    let properties = body.get("features")?.get(0)?.get("properties")?;
    Some(PlaceInfo {
        city: first_of(properties, &["city", "town", "village"]),
        sublocation: first_of(properties, &["suburb", "neighbourhood", "district"]),
        state: first_of(properties, &["state", "county"]),
        country: first_of(properties, &["country"]),
    })
}

/// First present string value among the listed keys
fn first_of(object: &Value, keys: &[&str]) -> Option<String> {
    keys.iter()
        .filter_map(|key| object.get(key))
        .filter_map(|value| value.as_str())
        .map(|s| s.to_string())
        .next()
}
