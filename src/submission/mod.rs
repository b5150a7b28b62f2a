//! Submission pipeline: identity, staging names, and the upload→log flow

pub mod workflow;

use std::path::PathBuf;

use chrono::{DateTime, Local};

// Re-exports for convenience
pub use workflow::submit_saved_photo;

/// One incoming screenshot, staged on disk and ready for upload
///
/// Consumed once by the workflow; the staged file stays on disk afterwards
/// but is never re-read.
#[derive(Debug, Clone)]
pub struct Submission {
    /// Display handle: the Telegram username, or `user_<id>` when absent
    pub handle: String,
    /// Stable Telegram user id
    pub user_id: u64,
    /// Name the file carries in the staging directory and in Drive
    pub filename: String,
    /// Staged file location
    pub local_path: PathBuf,
}

/// Derives the display handle for a submitter.
///
/// Users without a public username get a synthesized `user_<id>` handle so
/// their submissions still land in a dedicated folder. This deliberately
/// differs from the upload step's `"unknown"` fallback, which only applies
/// when the handle is empty by the time the upload runs.
pub fn display_handle(username: Option<&str>, user_id: u64) -> String {
    match username {
        Some(u) if !u.is_empty() => u.to_string(),
        _ => format!("user_{}", user_id),
    }
}

/// Builds the staging filename: `{handle}_{YYYY-MM-DD_HH-MM-SS}.jpg`.
///
/// Two photos from the same handle within the same second collide and the
/// later write wins. Accepted; submissions are manual and rare.
pub fn staging_filename(handle: &str, taken: &DateTime<Local>) -> String {
    format!("{}_{}.jpg", handle, taken.format("%Y-%m-%d_%H-%M-%S"))
}
