//! Nearest-in-time track point matching
//!
//! Given a photo's capture time, finds the single best point across all
//! loaded tracks: the point whose offset-adjusted time lies closest to the
//! capture time, within a fixed tolerance window. No match is a normal
//! outcome; photos taken while the logger was off simply have no track
//! position.

use crate::coord::GeoPoint;
use crate::track::TrackStore;
use chrono::{DateTime, Utc};

/// Maximum time distance, in seconds, between capture time and a track
/// point for the point to count as a match. The boundary is inclusive.
pub const TOLERANCE_SECONDS: i64 = 300;

/// A successful match against the track store
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrackMatch {
    /// Location of the matched point, elevation carried as altitude
    pub position: GeoPoint,
    /// The point's offset-adjusted time
    pub adjusted_time: DateTime<Utc>,
    /// Absolute time distance to the capture time, in seconds
    pub distance_seconds: i64,
}

/// Find the track point closest in time to `target`.
///
/// Candidates are all points with `|adjusted_time - target| <=`
/// [`TOLERANCE_SECONDS`]. Among them the smallest distance wins; exact ties
/// prefer the earlier adjusted time, and remaining ties the earlier track in
/// ingestion order (then point order within a track). The scan keeps the
/// first best candidate and replaces it only on strict improvement, which
/// realizes exactly that ordering deterministically.
pub fn find_closest(tracks: &TrackStore, target: DateTime<Utc>) -> Option<TrackMatch> {
    let mut best: Option<TrackMatch> = None;

    for (point, adjusted_time) in tracks.all_points() {
        let distance_seconds = (adjusted_time - target).num_seconds().abs();
        if distance_seconds > TOLERANCE_SECONDS {
            continue;
        }

        let improves = match &best {
            None => true,
            Some(current) => {
                distance_seconds < current.distance_seconds
                    || (distance_seconds == current.distance_seconds
                        && adjusted_time < current.adjusted_time)
            }
        };

        if improves {
            best = Some(TrackMatch {
                position: point.position(),
                adjusted_time,
                distance_seconds,
            });
        }
    }

    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::track::{OffsetTarget, TrackPoint};
    use chrono::TimeZone;

    fn ts(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(secs, 0).unwrap()
    }

    fn point(lat: f64, secs: i64) -> TrackPoint {
        TrackPoint {
            latitude: lat,
            longitude: lat,
            elevation: Some(lat * 100.0),
            time: ts(secs),
        }
    }

    #[test]
    fn picks_nearest_point_in_window() {
        // points at T+0 and T+600, photo at T+60: first point is 60s away,
        // second is 540s away and outside the window anyway
        let mut tracks = TrackStore::new();
        tracks
            .ingest("hike.gpx", vec![point(1.0, 0), point(2.0, 600)])
            .unwrap();

        let found = find_closest(&tracks, ts(60)).unwrap();
        assert_eq!(found.position.latitude, 1.0);
        assert_eq!(found.distance_seconds, 60);
    }

    #[test]
    fn offset_can_move_points_out_of_reach() {
        let mut tracks = TrackStore::new();
        tracks
            .ingest("hike.gpx", vec![point(1.0, 0), point(2.0, 600)])
            .unwrap();
        tracks.set_offset(OffsetTarget::Track("hike.gpx"), 600).unwrap();

        // adjusted times are now T+600 and T+1200; photo at T+60 sees
        // nothing within 300s
        assert_eq!(find_closest(&tracks, ts(60)), None);
    }

    #[test]
    fn tolerance_boundary_is_inclusive() {
        let mut tracks = TrackStore::new();
        tracks.ingest("a.gpx", vec![point(1.0, 1000)]).unwrap();

        let at_boundary = find_closest(&tracks, ts(1000 - TOLERANCE_SECONDS));
        assert_eq!(at_boundary.unwrap().distance_seconds, TOLERANCE_SECONDS);

        let past_boundary = find_closest(&tracks, ts(1000 - TOLERANCE_SECONDS - 1));
        assert_eq!(past_boundary, None);
    }

    #[test]
    fn equidistant_tie_prefers_earlier_adjusted_time() {
        let mut tracks = TrackStore::new();
        // photo at T+100 sits exactly between points at T+40 and T+160
        tracks
            .ingest("a.gpx", vec![point(2.0, 160), point(1.0, 40)])
            .unwrap();

        let found = find_closest(&tracks, ts(100)).unwrap();
        assert_eq!(found.adjusted_time, ts(40));
        assert_eq!(found.position.latitude, 1.0);
    }

    #[test]
    fn full_tie_prefers_earlier_ingested_track() {
        let mut tracks = TrackStore::new();
        tracks.ingest("first.gpx", vec![point(1.0, 100)]).unwrap();
        tracks.ingest("second.gpx", vec![point(2.0, 100)]).unwrap();

        let found = find_closest(&tracks, ts(100)).unwrap();
        assert_eq!(found.position.latitude, 1.0);
    }

    #[test]
    fn empty_store_never_matches() {
        let tracks = TrackStore::new();
        assert_eq!(find_closest(&tracks, ts(0)), None);
    }

    #[test]
    fn match_carries_elevation() {
        let mut tracks = TrackStore::new();
        tracks.ingest("a.gpx", vec![point(3.0, 100)]).unwrap();

        let found = find_closest(&tracks, ts(100)).unwrap();
        assert_eq!(found.position.altitude, Some(300.0));
        assert_eq!(found.distance_seconds, 0);
    }
}
