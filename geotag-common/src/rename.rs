//! Generated-name resolution
//!
//! Walks the photo sequence in its current order, expands the timestamp
//! format into a base name per photo, and guarantees that no two photos in
//! one pass receive the same generated name: a repeated base gets the first
//! unused lowercase-letter suffix (`a`, `b`, ... `z`, `aa`, ...), checked
//! case-insensitively against everything already emitted. The original file
//! extension is preserved unchanged.

use crate::photo::PhotoRecordStore;
use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, Utc};
use std::collections::HashSet;
use tracing::debug;

/// Assign a generated name to every photo in the store, in sequence order.
/// Returns the number of photos named.
pub fn apply_filename_format(store: &mut PhotoRecordStore, template: &str) -> usize {
    let mut emitted: HashSet<String> = HashSet::new();
    let mut named = 0;

    for record in store.records_mut() {
        let stamp = record.capture_time().unwrap_or_else(|| record.creation_time());
        let base = expand_template(stamp, template);

        let chosen = if emitted.contains(&base.to_lowercase()) {
            let mut n = 1;
            loop {
                let candidate = format!("{base}{}", letter_suffix(n));
                if !emitted.contains(&candidate.to_lowercase()) {
                    break candidate;
                }
                n += 1;
            }
        } else {
            base
        };

        emitted.insert(chosen.to_lowercase());
        let extension = extension_of(record.file_name()).to_string();
        record.set_generated_name(format!("{chosen}{extension}"));
        named += 1;
    }

    debug!("Generated {} photo names", named);
    named
}

/// Expand a strftime template against a timestamp. A template chrono cannot
/// interpret (or one with no tokens at all) passes through as literal text,
/// which yields a constant base name and leans on suffixing. That is
/// allowed, not an error.
fn expand_template(stamp: DateTime<Utc>, template: &str) -> String {
    let items: Vec<Item<'_>> = StrftimeItems::new(template).collect();
    if items.iter().any(|item| matches!(item, Item::Error)) {
        return template.to_string();
    }
    stamp.format_with_items(items.into_iter()).to_string()
}

/// n-th suffix of the sequence `a, b, ... z, aa, ab, ...` (1-indexed)
fn letter_suffix(mut n: usize) -> String {
    let mut letters = Vec::new();
    while n > 0 {
        n -= 1;
        letters.push((b'a' + (n % 26) as u8) as char);
        n /= 26;
    }
    letters.iter().rev().collect()
}

/// The extension of a file name including the dot, or empty. A leading dot
/// alone (hidden file) is not an extension.
fn extension_of(file_name: &str) -> &str {
    match file_name.rfind('.') {
        Some(position) if position > 0 => &file_name[position..],
        _ => "",
    }
}
