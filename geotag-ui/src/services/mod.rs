//! Network collaborators
//!
//! Elevation and reverse-geocoding lookups. Both run outside the engine and
//! hand it already-resolved values; both degrade gracefully when the
//! upstream service is unreachable.

pub mod elevation;
pub mod geocoding;
