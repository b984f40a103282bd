//! Track log storage
//!
//! Each ingested location-log file becomes one [`Track`]: an ordered run of
//! time-stamped points plus an adjustable time offset. Tracks are identified
//! by their source file name; the photo side never holds references into
//! this store, it only queries it by adjusted time.

use crate::coord::GeoPoint;
use crate::{Error, Result};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// One recorded location sample. Immutable once ingested; the effective
/// (adjusted) time is derived from the owning track's offset on read.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrackPoint {
    pub latitude: f64,
    pub longitude: f64,
    pub elevation: Option<f64>,
    pub time: DateTime<Utc>,
}

impl TrackPoint {
    /// The point's location as a [`GeoPoint`], elevation carried as altitude
    pub fn position(&self) -> GeoPoint {
        GeoPoint::with_altitude(self.latitude, self.longitude, self.elevation)
    }
}

/// An ingested track: points sorted ascending by original time, plus the
/// offset currently applied to this track in seconds.
#[derive(Debug, Clone)]
pub struct Track {
    name: String,
    points: Vec<TrackPoint>,
    offset_seconds: i64,
}

impl Track {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn points(&self) -> &[TrackPoint] {
        &self.points
    }

    pub fn offset_seconds(&self) -> i64 {
        self.offset_seconds
    }

    /// Effective time of a point under this track's current offset
    pub fn adjusted_time(&self, point: &TrackPoint) -> DateTime<Utc> {
        point.time + Duration::seconds(self.offset_seconds)
    }
}

/// Geographic bounding box of a track, for map framing
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TrackBounds {
    pub north: f64,
    pub south: f64,
    pub east: f64,
    pub west: f64,
}

/// Display-level description of one track with its live offset
#[derive(Debug, Clone, Serialize)]
pub struct TrackSummary {
    pub name: String,
    pub point_count: usize,
    pub offset_seconds: i64,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    pub bounds: Option<TrackBounds>,
}

/// Which tracks an offset-apply targets
#[derive(Debug, Clone, Copy)]
pub enum OffsetTarget<'a> {
    /// The main offset: applied to every loaded track
    AllTracks,
    /// A single track, by source file name
    Track(&'a str),
}

/// In-memory store of all loaded tracks, in ingestion order
#[derive(Debug, Default)]
pub struct TrackStore {
    tracks: Vec<Track>,
}

impl TrackStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ingest a decoded track log under its source file name.
    ///
    /// Points are stored sorted ascending by time (nearest-time search
    /// relies on it) and the track starts with a zero offset. A name already
    /// present (compared case-insensitively, matching the file-name dedup
    /// policy used for generated photo names) is rejected without touching
    /// the store.
    pub fn ingest(&mut self, name: &str, mut points: Vec<TrackPoint>) -> Result<TrackSummary> {
        if self.tracks.iter().any(|t| t.name.eq_ignore_ascii_case(name)) {
            return Err(Error::DuplicateTrack(name.to_string()));
        }

        points.sort_by_key(|p| p.time);
        info!("Loaded track {} with {} points", name, points.len());

        let track = Track {
            name: name.to_string(),
            points,
            offset_seconds: 0,
        };
        let summary = summarize(&track);
        self.tracks.push(track);
        Ok(summary)
    }

    /// Remove tracks by name, case-insensitively. Names with no matching
    /// track are ignored, so removal is idempotent. Returns the number of
    /// tracks actually removed.
    pub fn remove(&mut self, names: &[String]) -> usize {
        let before = self.tracks.len();
        self.tracks
            .retain(|t| !names.iter().any(|n| n.eq_ignore_ascii_case(&t.name)));
        let removed = before - self.tracks.len();
        if removed > 0 {
            info!("Removed {} track(s)", removed);
        }
        removed
    }

    /// Drop every loaded track
    pub fn clear(&mut self) {
        self.tracks.clear();
    }

    /// Set the offset, in seconds, on every track or on one named track.
    ///
    /// Assigns the value (it does not accumulate). Targeting an unknown
    /// track name fails with [`Error::TrackNotFound`] and changes nothing.
    pub fn set_offset(&mut self, target: OffsetTarget<'_>, offset_seconds: i64) -> Result<()> {
        match target {
            OffsetTarget::AllTracks => {
                for track in &mut self.tracks {
                    track.offset_seconds = offset_seconds;
                }
                debug!("Applied main offset of {}s to all tracks", offset_seconds);
                Ok(())
            }
            OffsetTarget::Track(name) => {
                let track = self
                    .tracks
                    .iter_mut()
                    .find(|t| t.name.eq_ignore_ascii_case(name))
                    .ok_or_else(|| Error::TrackNotFound(name.to_string()))?;
                track.offset_seconds = offset_seconds;
                debug!("Applied offset of {}s to track {}", offset_seconds, name);
                Ok(())
            }
        }
    }

    /// Lazy walk of every point across all tracks, in ingestion order, each
    /// paired with its offset-adjusted time. Restartable: each call starts a
    /// fresh pass.
    pub fn all_points(&self) -> impl Iterator<Item = (&TrackPoint, DateTime<Utc>)> + '_ {
        self.tracks.iter().flat_map(|track| {
            let offset = Duration::seconds(track.offset_seconds);
            track.points.iter().map(move |p| (p, p.time + offset))
        })
    }

    /// Per-track display summaries with live offsets, in ingestion order
    pub fn summaries(&self) -> Vec<TrackSummary> {
        self.tracks.iter().map(summarize).collect()
    }

    pub fn get(&self, name: &str) -> Option<&Track> {
        self.tracks.iter().find(|t| t.name.eq_ignore_ascii_case(name))
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }
}

fn summarize(track: &Track) -> TrackSummary {
    let bounds = track.points.iter().fold(None::<TrackBounds>, |acc, p| {
        Some(match acc {
            None => TrackBounds {
                north: p.latitude,
                south: p.latitude,
                east: p.longitude,
                west: p.longitude,
            },
            Some(b) => TrackBounds {
                north: b.north.max(p.latitude),
                south: b.south.min(p.latitude),
                east: b.east.max(p.longitude),
                west: b.west.min(p.longitude),
            },
        })
    });

    TrackSummary {
        name: track.name.clone(),
        point_count: track.points.len(),
        offset_seconds: track.offset_seconds,
        start_time: track.points.first().map(|p| p.time),
        end_time: track.points.last().map(|p| p.time),
        bounds,
    }
}
