//! Photo folder scanner
//!
//! Walks a folder for image files and decodes the metadata the engine
//! consumes: capture time and the embedded GPS position. Decode problems
//! are per-file and non-fatal: a photo with unreadable metadata still
//! registers, just with an absent camera-GPS layer.

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use exif::{In, Tag, Value};
use geotag_common::{GeoPoint, PhotoRegistration};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

/// Photo scanner errors
#[derive(Debug, Error)]
pub enum ScanError {
    /// Specified path does not exist
    #[error("Folder not found: {0}")]
    FolderNotFound(PathBuf),

    /// Path exists but is not a directory
    #[error("Not a folder: {0}")]
    NotAFolder(PathBuf),
}

const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "bmp", "tiff", "tif", "heic"];

/// Scan a folder for photos and decode each into a registration for the
/// engine. Non-recursive scans stay at the top level; recursive scans
/// descend the whole tree. Files come back sorted by path so registration
/// order is deterministic.
pub fn scan_folder(root: &Path, recursive: bool) -> Result<Vec<PhotoRegistration>, ScanError> {
    if !root.exists() {
        return Err(ScanError::FolderNotFound(root.to_path_buf()));
    }
    if !root.is_dir() {
        return Err(ScanError::NotAFolder(root.to_path_buf()));
    }

    let max_depth = if recursive { usize::MAX } else { 1 };
    let mut files: Vec<PathBuf> = Vec::new();

    for entry in WalkDir::new(root).follow_links(false).max_depth(max_depth) {
        match entry {
            Ok(entry) => {
                if entry.file_type().is_file() && is_image_file(entry.path()) {
                    files.push(entry.path().to_path_buf());
                }
            }
            Err(e) => {
                warn!("Error accessing entry: {}", e);
                // Continue scanning, don't abort
            }
        }
    }
    files.sort();

    let registrations: Vec<PhotoRegistration> = files.iter().map(|path| read_photo(path)).collect();
    info!(
        "Scanned {}: {} photos found",
        root.display(),
        registrations.len()
    );
    Ok(registrations)
}

/// Check the file extension against the supported image formats
fn is_image_file(path: &Path) -> bool {
    path.extension()
        .map(|ext| ext.to_string_lossy().to_lowercase())
        .is_some_and(|ext| IMAGE_EXTENSIONS.contains(&ext.as_str()))
}

/// Decode one photo into its registration
fn read_photo(path: &Path) -> PhotoRegistration {
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_default();
    let creation_time = file_creation_time(path);

    let decoded = read_exif(path);
    let (capture_time, exif_position) = match decoded {
        Some(decoded) => (decoded.capture_time, decoded.position),
        None => {
            debug!("No EXIF metadata in {}", path.display());
            (None, None)
        }
    };

    PhotoRegistration {
        id: path.display().to_string(),
        file_name,
        // the rename pass falls back to creation time on its own; the
        // capture time stays honest about what the camera recorded
        capture_time,
        creation_time,
        exif: exif_position,
    }
}

/// Filesystem creation time, falling back to modification time on
/// filesystems that do not record birth times
fn file_creation_time(path: &Path) -> DateTime<Utc> {
    let fallback = std::time::SystemTime::UNIX_EPOCH;
    let system_time = std::fs::metadata(path)
        .map(|meta| meta.created().or_else(|_| meta.modified()).unwrap_or(fallback))
        .unwrap_or(fallback);
    DateTime::<Utc>::from(system_time)
}

struct DecodedExif {
    capture_time: Option<DateTime<Utc>>,
    position: Option<GeoPoint>,
}

/// Read capture time and GPS position from a file's EXIF block
fn read_exif(path: &Path) -> Option<DecodedExif> {
    let file = File::open(path).ok()?;
    let mut reader = BufReader::new(file);
    let exif = exif::Reader::new().read_from_container(&mut reader).ok()?;

    let capture_time = field_text(&exif, Tag::DateTimeOriginal)
        .or_else(|| field_text(&exif, Tag::DateTime))
        .and_then(|text| parse_exif_datetime(&text));

    let latitude = decimal_coordinate(&exif, Tag::GPSLatitude, Tag::GPSLatitudeRef, "S");
    let longitude = decimal_coordinate(&exif, Tag::GPSLongitude, Tag::GPSLongitudeRef, "W");
    let position = match (latitude, longitude) {
        (Some(latitude), Some(longitude)) => Some(GeoPoint {
            latitude,
            longitude,
            altitude: altitude_meters(&exif),
        }),
        // a half-present pair decodes to an absent layer
        _ => None,
    };

    Some(DecodedExif {
        capture_time,
        position,
    })
}

/// EXIF timestamps are local camera time in `YYYY:MM:DD HH:MM:SS` form;
/// they are treated as UTC, matching track logs recorded in UTC
fn parse_exif_datetime(text: &str) -> Option<DateTime<Utc>> {
    NaiveDateTime::parse_from_str(text.trim(), "%Y:%m:%d %H:%M:%S")
        .ok()
        .map(|naive| Utc.from_utc_datetime(&naive))
}

/// A GPS coordinate stored as degree/minute/second rationals, converted to
/// signed decimal degrees (`negative_ref` marks the southern/western
/// hemisphere)
fn decimal_coordinate(
    exif: &exif::Exif,
    value_tag: Tag,
    ref_tag: Tag,
    negative_ref: &str,
) -> Option<f64> {
    let field = exif.get_field(value_tag, In::PRIMARY)?;
    let Value::Rational(ref components) = field.value else {
        return None;
    };
    if components.len() < 3 {
        return None;
    }

    let decimal = components[0].to_f64()
        + components[1].to_f64() / 60.0
        + components[2].to_f64() / 3600.0;

    let reference = field_text(exif, ref_tag)?;
    Some(if reference.trim() == negative_ref {
        -decimal
    } else {
        decimal
    })
}

/// GPS altitude in meters, negated when the reference marks below sea level
fn altitude_meters(exif: &exif::Exif) -> Option<f64> {
    let field = exif.get_field(Tag::GPSAltitude, In::PRIMARY)?;
    let Value::Rational(ref components) = field.value else {
        return None;
    };
    let altitude = components.first()?.to_f64();

    let below_sea_level = exif
        .get_field(Tag::GPSAltitudeRef, In::PRIMARY)
        .map(|field| matches!(field.value, Value::Byte(ref v) if v.first() == Some(&1)))
        .unwrap_or(false);

    Some(if below_sea_level { -altitude } else { altitude })
}

/// First ASCII string of a field, if the field exists and is textual
fn field_text(exif: &exif::Exif, tag: Tag) -> Option<String> {
    let field = exif.get_field(tag, In::PRIMARY)?;
    match field.value {
        Value::Ascii(ref lines) => lines
            .first()
            .map(|line| String::from_utf8_lossy(line).to_string()),
        _ => None,
    }
}
