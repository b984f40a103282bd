//! Common error types for the geotagging engine

use thiserror::Error;

/// Common result type for geotag operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types shared across the engine and its embedding layers.
///
/// Every engine error is a local validation failure detected before any
/// state mutation: a failing call leaves the track and photo stores exactly
/// as they were. A missing track-point match is a normal outcome, not an
/// error, and has no variant here.
#[derive(Error, Debug)]
pub enum Error {
    /// A track with the same source file name is already loaded
    /// (file names compare case-insensitively)
    #[error("Duplicate track: {0}")]
    DuplicateTrack(String),

    /// No loaded track has the requested name
    #[error("Track not found: {0}")]
    TrackNotFound(String),

    /// Time offset string does not match the signed HH:MM:SS form
    #[error("Invalid offset format {0:?} (expected +HH:MM:SS or -HH:MM:SS)")]
    InvalidOffsetFormat(String),

    /// Latitude or longitude outside the valid range
    #[error("Coordinates out of range: latitude {latitude}, longitude {longitude}")]
    InvalidCoordinate { latitude: f64, longitude: f64 },

    /// No registered photo has the requested id
    #[error("Photo not found: {0}")]
    PhotoNotFound(String),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
