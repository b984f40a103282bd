//! GPX track point extraction
//!
//! Pulls the `<trkpt>` elements out of a GPX document: latitude/longitude
//! attributes, optional `<ele>` and the RFC 3339 `<time>`. Points without a
//! parseable time are skipped, since time is what track matching runs on.
//! The extractor is deliberately narrow; everything else in a GPX file
//! (waypoints, routes, extensions) is ignored.

use chrono::{DateTime, Utc};
use geotag_common::TrackPoint;
use tracing::warn;

/// Extract the ordered track points of a GPX document. An unparseable or
/// point-free document yields an empty vector; the caller decides whether
/// that is an error.
pub fn parse_track_points(content: &str) -> Vec<TrackPoint> {
    let mut points = Vec::new();
    let mut skipped = 0usize;
    let mut rest = content;

    while let Some(start) = rest.find("<trkpt") {
        let after = &rest[start..];
        let Some(tag_end) = after.find('>') else {
            break;
        };
        let tag = &after[..tag_end + 1];

        let (body, consumed) = if tag.ends_with("/>") {
            ("", start + tag_end + 1)
        } else if let Some(close) = after.find("</trkpt>") {
            (&after[tag_end + 1..close], start + close + "</trkpt>".len())
        } else {
            ("", start + tag_end + 1)
        };

        match parse_point(tag, body) {
            Some(point) => points.push(point),
            None => skipped += 1,
        }
        rest = &rest[consumed..];
    }

    if skipped > 0 {
        warn!("Skipped {} track points without usable data", skipped);
    }
    points
}

fn parse_point(tag: &str, body: &str) -> Option<TrackPoint> {
    let latitude: f64 = attribute(tag, "lat")?.trim().parse().ok()?;
    let longitude: f64 = attribute(tag, "lon")?.trim().parse().ok()?;
    let time = element_text(body, "time")
        .and_then(|text| DateTime::parse_from_rfc3339(text.trim()).ok())
        .map(|time| time.with_timezone(&Utc))?;
    let elevation = element_text(body, "ele").and_then(|text| text.trim().parse().ok());

    Some(TrackPoint {
        latitude,
        longitude,
        elevation,
        time,
    })
}

/// Value of an attribute inside an opening tag, double or single quoted
fn attribute<'a>(tag: &'a str, name: &str) -> Option<&'a str> {
    for quote in ['"', '\''] {
        let needle = format!("{name}={quote}");
        if let Some(position) = tag.find(&needle) {
            let value = &tag[position + needle.len()..];
            if let Some(end) = value.find(quote) {
                return Some(&value[..end]);
            }
        }
    }
    None
}

/// Text content of the first `<name>...</name>` child
fn element_text<'a>(body: &'a str, name: &str) -> Option<&'a str> {
    let open = format!("<{name}>");
    let close = format!("</{name}>");
    let start = body.find(&open)? + open.len();
    let end = body[start..].find(&close)? + start;
    Some(&body[start..end])
}
