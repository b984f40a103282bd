//! Final-coordinate cascade
//!
//! A photo carries three independently-writable coordinate layers; the
//! authoritative position is always derived from them, never written
//! directly. Priority: manual placement beats a track match beats embedded
//! camera GPS.

use crate::coord::GeoPoint;

/// Pick the authoritative position from the three source layers.
///
/// The first present layer wins outright: its altitude travels with it even
/// when `None`, so a manual placement without altitude never inherits the
/// altitude of a lower-priority layer. Returns `None` when every layer is
/// absent.
pub fn resolve(
    manual: Option<&GeoPoint>,
    track: Option<&GeoPoint>,
    exif: Option<&GeoPoint>,
) -> Option<GeoPoint> {
    manual.or(track).or(exif).copied()
}
