//! Track time-offset parsing and formatting
//!
//! Track logs and camera clocks frequently disagree (timezone set wrong on
//! one device, drift on the other). Offsets are entered as signed
//! `HH:MM:SS` strings and applied to tracks in whole seconds.

use crate::{Error, Result};

/// Parse a signed `HH:MM:SS` offset string into seconds.
///
/// The leading sign is mandatory, every field is exactly two digits and
/// minutes/seconds stay below 60. Anything else is rejected, leaving the
/// caller's state untouched.
///
/// # Examples
///
/// ```
/// use geotag_common::time::parse_offset;
///
/// assert_eq!(parse_offset("+02:30:00").unwrap(), 2 * 3600 + 30 * 60);
/// assert_eq!(parse_offset("-01:15:00").unwrap(), -(3600 + 15 * 60));
/// assert_eq!(parse_offset("+00:00:00").unwrap(), 0);
/// assert!(parse_offset("00:00:00").is_err());
/// ```
pub fn parse_offset(input: &str) -> Result<i64> {
    let invalid = || Error::InvalidOffsetFormat(input.to_string());

    let (sign, digits) = match input.strip_prefix('+') {
        Some(rest) => (1, rest),
        None => match input.strip_prefix('-') {
            Some(rest) => (-1, rest),
            None => return Err(invalid()),
        },
    };

    let fields: Vec<&str> = digits.split(':').collect();
    if fields.len() != 3
        || fields
            .iter()
            .any(|f| f.len() != 2 || !f.bytes().all(|b| b.is_ascii_digit()))
    {
        return Err(invalid());
    }

    let hours: i64 = fields[0].parse().map_err(|_| invalid())?;
    let minutes: i64 = fields[1].parse().map_err(|_| invalid())?;
    let seconds: i64 = fields[2].parse().map_err(|_| invalid())?;

    if minutes > 59 || seconds > 59 {
        return Err(invalid());
    }

    Ok(sign * (hours * 3600 + minutes * 60 + seconds))
}

/// Format an offset in seconds back to the signed `HH:MM:SS` form.
///
/// Inverse of [`parse_offset`] for offsets below 100 hours; used by the
/// track listings so a stored offset displays in the form it was entered.
pub fn format_offset(offset_seconds: i64) -> String {
    let sign = if offset_seconds < 0 { '-' } else { '+' };
    let abs = offset_seconds.abs();
    format!(
        "{}{:02}:{:02}:{:02}",
        sign,
        abs / 3600,
        (abs % 3600) / 60,
        abs % 60
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_positive_offset() {
        assert_eq!(parse_offset("+02:30:00").unwrap(), 9000);
        assert_eq!(parse_offset("+00:10:00").unwrap(), 600);
    }

    #[test]
    fn parses_negative_offset() {
        assert_eq!(parse_offset("-01:15:00").unwrap(), -4500);
        assert_eq!(parse_offset("-00:00:01").unwrap(), -1);
    }

    #[test]
    fn parses_signed_zero() {
        assert_eq!(parse_offset("+00:00:00").unwrap(), 0);
        assert_eq!(parse_offset("-00:00:00").unwrap(), 0);
    }

    #[test]
    fn rejects_missing_sign() {
        assert!(matches!(
            parse_offset("00:00:00"),
            Err(Error::InvalidOffsetFormat(_))
        ));
        assert!(parse_offset("02:30:00").is_err());
    }

    #[test]
    fn rejects_malformed_fields() {
        assert!(parse_offset("+2:30:00").is_err());
        assert!(parse_offset("+02:30").is_err());
        assert!(parse_offset("+02:30:00:00").is_err());
        assert!(parse_offset("+aa:bb:cc").is_err());
        assert!(parse_offset("+02 30 00").is_err());
        assert!(parse_offset("").is_err());
        assert!(parse_offset("+").is_err());
    }

    #[test]
    fn rejects_out_of_range_minutes_and_seconds() {
        assert!(parse_offset("+00:60:00").is_err());
        assert!(parse_offset("+00:00:60").is_err());
        assert!(parse_offset("+00:59:59").is_ok());
    }

    #[test]
    fn formats_round_trip() {
        for text in ["+02:30:00", "-01:15:00", "+00:00:00", "-10:00:59"] {
            assert_eq!(format_offset(parse_offset(text).unwrap()), text);
        }
        // unsigned zero formats with an explicit plus
        assert_eq!(format_offset(0), "+00:00:00");
    }
}
