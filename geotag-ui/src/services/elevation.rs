//! Elevation lookup
//!
//! Used when a manual placement arrives without an altitude. Lookup failure
//! is never an error; the placement simply stays without altitude.

use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, warn};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Deserialize)]
struct LookupResponse {
    #[serde(default)]
    results: Vec<LookupResult>,
}

#[derive(Debug, Deserialize)]
struct LookupResult {
    elevation: Option<f64>,
}

/// Fetch the elevation in meters for a position from the configured
/// provider. Unknown or disabled providers (including "google", which needs
/// an API key this service does not manage) return `None` without a network
/// round trip.
pub async fn lookup(
    client: &reqwest::Client,
    provider: &str,
    latitude: f64,
    longitude: f64,
) -> Option<f64> {
    let url = match provider {
        "open-elevation" => "https://api.open-elevation.com/api/v1/lookup".to_string(),
        // SRTM 90m dataset: global coverage
        "opentopodata" => "https://api.opentopodata.org/v1/srtm90m".to_string(),
        other => {
            debug!("Elevation lookup skipped (provider {:?})", other);
            return None;
        }
    };

    let locations = format!("{latitude},{longitude}");
    let response = client
        .get(&url)
        .query(&[("locations", locations.as_str())])
        .timeout(REQUEST_TIMEOUT)
        .send()
        .await;

    let elevation = match response {
        Ok(response) => match response.error_for_status() {
            Ok(response) => response
                .json::<LookupResponse>()
                .await
                .ok()
                .and_then(|body| body.results.into_iter().next())
                .and_then(|result| result.elevation),
            Err(e) => {
                warn!("Elevation lookup from {} failed: {}", provider, e);
                None
            }
        },
        Err(e) => {
            warn!("Elevation lookup from {} failed: {}", provider, e);
            None
        }
    };

    if let Some(value) = elevation {
        debug!(
            "Elevation for {},{} from {}: {}m",
            latitude, longitude, provider, value
        );
    }
    elevation
}
