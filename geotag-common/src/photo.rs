//! Photo record storage
//!
//! One record per photo in the working folder, holding identity and time
//! fields plus the four coordinate layers: embedded camera GPS (write-once
//! at registration), the derived track match, manual placement, and the
//! always-derived resolved position. Every layer write recomputes the
//! resolved position synchronously, so a caller can never observe a stale
//! one.

use crate::cascade;
use crate::coord::{validate_coordinates, GeoPoint};
use crate::{Error, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Sequence order for the photo collection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    /// Capture time, falling back to file creation time
    #[default]
    Time,
    /// Original file name
    Name,
}

/// Tag-based view filter for photo listings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PhotoFilter {
    #[default]
    All,
    Tagged,
    Untagged,
}

/// Everything the scan collaborator hands over for one photo: identity,
/// time fields and the already-decoded camera GPS layer (absent when the
/// file carries none).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PhotoRegistration {
    pub id: String,
    pub file_name: String,
    pub capture_time: Option<DateTime<Utc>>,
    pub creation_time: DateTime<Utc>,
    pub exif: Option<GeoPoint>,
}

/// One photo's full location state.
///
/// Layers are private so every write funnels through a method that
/// recomputes the resolved position; reads go through the accessors below.
#[derive(Debug, Clone, Serialize)]
pub struct PhotoRecord {
    id: String,
    file_name: String,
    capture_time: Option<DateTime<Utc>>,
    creation_time: DateTime<Utc>,
    exif: Option<GeoPoint>,
    track: Option<GeoPoint>,
    manual: Option<GeoPoint>,
    resolved: Option<GeoPoint>,
    tagged: bool,
    generated_name: Option<String>,
}

impl PhotoRecord {
    fn new(registration: PhotoRegistration) -> Self {
        let mut record = Self {
            id: registration.id,
            file_name: registration.file_name,
            capture_time: registration.capture_time,
            creation_time: registration.creation_time,
            exif: registration.exif,
            track: None,
            manual: None,
            resolved: None,
            tagged: false,
            generated_name: None,
        };
        record.recompute();
        record
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn capture_time(&self) -> Option<DateTime<Utc>> {
        self.capture_time
    }

    pub fn creation_time(&self) -> DateTime<Utc> {
        self.creation_time
    }

    pub fn exif(&self) -> Option<&GeoPoint> {
        self.exif.as_ref()
    }

    pub fn track(&self) -> Option<&GeoPoint> {
        self.track.as_ref()
    }

    pub fn manual(&self) -> Option<&GeoPoint> {
        self.manual.as_ref()
    }

    /// The authoritative position, always equal to the cascade of the three
    /// source layers
    pub fn resolved(&self) -> Option<&GeoPoint> {
        self.resolved.as_ref()
    }

    pub fn tagged(&self) -> bool {
        self.tagged
    }

    pub fn generated_name(&self) -> Option<&str> {
        self.generated_name.as_deref()
    }

    pub(crate) fn set_track_layer(&mut self, position: Option<GeoPoint>) {
        self.track = position;
        self.recompute();
    }

    pub(crate) fn set_generated_name(&mut self, name: String) {
        self.generated_name = Some(name);
    }

    fn recompute(&mut self) {
        self.resolved = cascade::resolve(
            self.manual.as_ref(),
            self.track.as_ref(),
            self.exif.as_ref(),
        );
    }
}

/// In-memory store of all registered photos, in sequence order (insertion
/// order until a sort is applied)
#[derive(Debug, Default)]
pub struct PhotoRecordStore {
    records: Vec<PhotoRecord>,
}

impl PhotoRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register one photo. The track and manual layers start empty and the
    /// resolved position is computed immediately (camera GPS or absent).
    pub fn register(&mut self, registration: PhotoRegistration) -> &PhotoRecord {
        self.records.push(PhotoRecord::new(registration));
        &self.records[self.records.len() - 1]
    }

    /// Write the manual placement layer.
    ///
    /// Coordinates are validated before anything is touched; a failing call
    /// leaves the record exactly as it was. Altitude is whatever the caller
    /// resolved (user input or an elevation lookup). `None` means the
    /// placement has no altitude, it does not preserve a previous one.
    pub fn set_manual(
        &mut self,
        id: &str,
        latitude: f64,
        longitude: f64,
        altitude: Option<f64>,
    ) -> Result<&PhotoRecord> {
        validate_coordinates(latitude, longitude)?;
        let index = self.require(id)?;
        let record = &mut self.records[index];
        record.manual = Some(GeoPoint::with_altitude(latitude, longitude, altitude));
        record.recompute();
        Ok(&self.records[index])
    }

    /// Clear the manual placement layer. Idempotent: clearing an absent
    /// layer recomputes to the same resolved position.
    pub fn clear_manual(&mut self, id: &str) -> Result<&PhotoRecord> {
        let index = self.require(id)?;
        let record = &mut self.records[index];
        record.manual = None;
        record.recompute();
        Ok(&self.records[index])
    }

    /// Write the track-match layer (match resolver result)
    pub fn set_track_point(&mut self, id: &str, position: GeoPoint) -> Result<()> {
        let index = self.require(id)?;
        self.records[index].set_track_layer(Some(position));
        Ok(())
    }

    /// Clear the track-match layer (no point within tolerance)
    pub fn clear_track_point(&mut self, id: &str) -> Result<()> {
        let index = self.require(id)?;
        self.records[index].set_track_layer(None);
        Ok(())
    }

    /// Set the tag flag on one photo
    pub fn set_tag(&mut self, id: &str, tagged: bool) -> Result<&PhotoRecord> {
        let index = self.require(id)?;
        self.records[index].tagged = tagged;
        Ok(&self.records[index])
    }

    /// Set the tag flag on each listed photo; unknown ids are silently
    /// skipped. Returns how many records were updated.
    pub fn bulk_set_tag(&mut self, ids: &[String], tagged: bool) -> usize {
        let mut updated = 0;
        for record in &mut self.records {
            if ids.iter().any(|id| id == &record.id) {
                record.tagged = tagged;
                updated += 1;
            }
        }
        updated
    }

    pub fn get(&self, id: &str) -> Option<&PhotoRecord> {
        self.records.iter().find(|r| r.id == id)
    }

    pub fn get_by_index(&self, index: usize) -> Option<&PhotoRecord> {
        self.records.get(index)
    }

    /// All records in current sequence order
    pub fn all(&self) -> &[PhotoRecord] {
        &self.records
    }

    /// Records passing the tag filter, in sequence order
    pub fn filtered(&self, filter: PhotoFilter) -> Vec<&PhotoRecord> {
        self.records
            .iter()
            .filter(|r| match filter {
                PhotoFilter::All => true,
                PhotoFilter::Tagged => r.tagged,
                PhotoFilter::Untagged => !r.tagged,
            })
            .collect()
    }

    /// Re-sort the sequence. Stable, so equal keys keep their relative
    /// order.
    pub fn set_sort_order(&mut self, order: SortOrder) {
        match order {
            SortOrder::Time => self
                .records
                .sort_by_key(|r| r.capture_time.unwrap_or(r.creation_time)),
            SortOrder::Name => self
                .records
                .sort_by(|a, b| a.file_name.cmp(&b.file_name)),
        }
    }

    /// Drop every record (new folder scan)
    pub fn clear(&mut self) {
        self.records.clear();
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub(crate) fn records_mut(&mut self) -> &mut [PhotoRecord] {
        &mut self.records
    }

    fn require(&self, id: &str) -> Result<usize> {
        self.records
            .iter()
            .position(|r| r.id == id)
            .ok_or_else(|| Error::PhotoNotFound(id.to_string()))
    }
}
