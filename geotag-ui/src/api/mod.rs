//! HTTP API handlers

mod config;
mod error;
mod health;
mod photos;
mod positions;
mod tracks;
mod ui;

pub use config::{get_config, reverse_geocode, update_config};
pub use error::ApiError;
pub use health::health_check;
pub use photos::{
    apply_rename, bulk_tag, delete_manual_location, get_photo, get_photos, scan_folder,
    set_manual_location, set_sort_order, update_tag,
};
pub use positions::{clear_positions, get_positions, remove_positions, upload_positions};
pub use tracks::{apply_track_offset, clear_tracks, get_tracks, remove_tracks, upload_track};
pub use ui::serve_index;
