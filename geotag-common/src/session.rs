//! Geotagging session
//!
//! The session is the explicit store object a scan creates and a new scan
//! tears down: it owns the track store and the photo store and keeps them
//! consistent. The two stores never reference each other; they meet only
//! in the time-based match query. Every track mutation goes through the
//! session, which re-resolves the affected photos before returning.

use crate::matching;
use crate::photo::{PhotoFilter, PhotoRecord, PhotoRecordStore, PhotoRegistration, SortOrder};
use crate::rename;
use crate::track::{OffsetTarget, TrackPoint, TrackStore, TrackSummary};
use crate::{time, Error, Result};
use tracing::{debug, info};

/// One working session: the photo collection of the scanned folder plus all
/// loaded track logs.
#[derive(Debug, Default)]
pub struct GeotagSession {
    photos: PhotoRecordStore,
    tracks: TrackStore,
}

impl GeotagSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn photos(&self) -> &PhotoRecordStore {
        &self.photos
    }

    pub fn tracks(&self) -> &TrackStore {
        &self.tracks
    }

    /// Replace the photo collection with a fresh scan result and resolve
    /// every photo against the currently loaded tracks. Returns the number
    /// of photos registered.
    pub fn load_photos(&mut self, registrations: Vec<PhotoRegistration>) -> usize {
        self.photos.clear();
        for registration in registrations {
            self.photos.register(registration);
        }
        let count = self.photos.len();
        info!("Registered {} photos", count);
        self.rematch_all();
        count
    }

    /// Register a single additional photo and resolve it immediately
    pub fn register_photo(&mut self, registration: PhotoRegistration) -> Result<PhotoRecord> {
        let id = registration.id.clone();
        self.photos.register(registration);
        self.rematch_one(&id)
    }

    /// Ingest a decoded track log and re-resolve every photo against it
    pub fn ingest_track(&mut self, name: &str, points: Vec<TrackPoint>) -> Result<TrackSummary> {
        let summary = self.tracks.ingest(name, points)?;
        self.rematch_all();
        Ok(summary)
    }

    /// Remove tracks by name; previously matched photos fall back to their
    /// remaining layers. Returns the number of tracks removed.
    pub fn remove_tracks(&mut self, names: &[String]) -> usize {
        let removed = self.tracks.remove(names);
        if removed > 0 {
            self.rematch_all();
        }
        removed
    }

    /// Drop every track and clear all track-match layers
    pub fn clear_tracks(&mut self) {
        self.tracks.clear();
        self.rematch_all();
    }

    /// Parse a signed `HH:MM:SS` offset and apply it to all tracks (`target`
    /// [`OffsetTarget::AllTracks`]) or one track, then re-resolve every
    /// photo. Parsing and target lookup both happen before any state
    /// changes. Returns the parsed offset in seconds.
    pub fn apply_offset(&mut self, target: OffsetTarget<'_>, offset: &str) -> Result<i64> {
        let offset_seconds = time::parse_offset(offset)?;
        self.tracks.set_offset(target, offset_seconds)?;
        self.rematch_all();
        Ok(offset_seconds)
    }

    /// Re-resolve the track-match layer of every photo against the current
    /// track state. Eager batch form: called after every track mutation so
    /// no read can ever observe a stale match. Photos without a capture time
    /// never match.
    pub fn rematch_all(&mut self) {
        let mut matched = 0;
        for record in self.photos.records_mut() {
            let found = record
                .capture_time()
                .and_then(|capture| matching::find_closest(&self.tracks, capture));
            if found.is_some() {
                matched += 1;
            }
            record.set_track_layer(found.map(|m| m.position));
        }
        debug!("Track match: {}/{} photos matched", matched, self.photos.len());
    }

    /// Incremental form of [`rematch_all`](Self::rematch_all) for one photo.
    /// Returns the freshly resolved record.
    pub fn rematch_one(&mut self, id: &str) -> Result<PhotoRecord> {
        let capture = self
            .photos
            .get(id)
            .ok_or_else(|| Error::PhotoNotFound(id.to_string()))?
            .capture_time();

        let found = capture.and_then(|c| matching::find_closest(&self.tracks, c));
        match found {
            Some(m) => self.photos.set_track_point(id, m.position)?,
            None => self.photos.clear_track_point(id)?,
        }

        self.photos
            .get(id)
            .cloned()
            .ok_or_else(|| Error::PhotoNotFound(id.to_string()))
    }

    /// Manual placement; validates coordinates, resolves the cascade and
    /// returns the updated record
    pub fn set_manual(
        &mut self,
        id: &str,
        latitude: f64,
        longitude: f64,
        altitude: Option<f64>,
    ) -> Result<PhotoRecord> {
        Ok(self
            .photos
            .set_manual(id, latitude, longitude, altitude)?
            .clone())
    }

    /// Remove the manual placement; the cascade falls back to the track
    /// match or camera GPS
    pub fn clear_manual(&mut self, id: &str) -> Result<PhotoRecord> {
        Ok(self.photos.clear_manual(id)?.clone())
    }

    pub fn set_tag(&mut self, id: &str, tagged: bool) -> Result<PhotoRecord> {
        Ok(self.photos.set_tag(id, tagged)?.clone())
    }

    pub fn bulk_set_tag(&mut self, ids: &[String], tagged: bool) -> usize {
        self.photos.bulk_set_tag(ids, tagged)
    }

    pub fn set_sort_order(&mut self, order: SortOrder) {
        self.photos.set_sort_order(order);
    }

    pub fn filtered_photos(&self, filter: PhotoFilter) -> Vec<&PhotoRecord> {
        self.photos.filtered(filter)
    }

    /// Run the rename pass over the current photo sequence. Returns the
    /// number of photos named.
    pub fn apply_filename_format(&mut self, template: &str) -> usize {
        rename::apply_filename_format(&mut self.photos, template)
    }
}
