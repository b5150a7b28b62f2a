use once_cell::sync::Lazy;
use std::env;
use std::time::Duration;

/// Configuration constants for the bot
/// Bot token
/// Read from BOT_TOKEN or TELOXIDE_TOKEN environment variable
pub static BOT_TOKEN: Lazy<String> = Lazy::new(|| {
    env::var("BOT_TOKEN")
        .or_else(|_| env::var("TELOXIDE_TOKEN"))
        .unwrap_or_else(|_| String::new())
});

/// Service-account credentials for the Google backends
/// Read from GOOGLE_JSON environment variable as a raw JSON blob
/// The account needs Drive read/write on the root folder and edit access
/// to the submissions spreadsheet
pub static GOOGLE_JSON: Lazy<String> = Lazy::new(|| env::var("GOOGLE_JSON").unwrap_or_else(|_| String::new()));

/// Name of the shared submissions spreadsheet
/// Read from SHEET_NAME environment variable
/// Default: "POP Submissions"
pub static SHEET_NAME: Lazy<String> =
    Lazy::new(|| env::var("SHEET_NAME").unwrap_or_else(|_| "POP Submissions".to_string()));

/// Local staging directory for incoming screenshots
/// Read from POP_DIR environment variable
/// Created at startup if absent; staged files are never cleaned up
pub static POP_DIR: Lazy<String> = Lazy::new(|| env::var("POP_DIR").unwrap_or_else(|_| "pop_submissions".to_string()));

/// Root Drive folder that holds all per-user folders
/// Read from DRIVE_FOLDER_ID environment variable
pub static DRIVE_FOLDER_ID: Lazy<String> =
    Lazy::new(|| env::var("DRIVE_FOLDER_ID").unwrap_or_else(|_| "1GvJdGDW7ZZPTyhbxNW-W9P1J94unyGvp".to_string()));

/// Log file path
/// Read from LOG_FILE_PATH environment variable
/// Default: app.log
pub static LOG_FILE_PATH: Lazy<String> =
    Lazy::new(|| env::var("LOG_FILE_PATH").unwrap_or_else(|_| "app.log".to_string()));

/// Network configuration
pub mod network {
    use super::Duration;

    /// Request timeout for Telegram HTTP requests (in seconds)
    /// Covers photo downloads from the Bot API file endpoint
    pub const REQUEST_TIMEOUT_SECS: u64 = 120;

    /// Request timeout duration
    pub fn timeout() -> Duration {
        Duration::from_secs(REQUEST_TIMEOUT_SECS)
    }
}

/// Retry configuration
pub mod retry {
    use super::Duration;

    /// Maximum number of get_me attempts while the Bot API warms up
    pub const MAX_STARTUP_RETRIES: u32 = 12;

    /// Delay between startup retry attempts (in seconds)
    pub const STARTUP_RETRY_DELAY_SECS: u64 = 5;

    /// Startup retry delay duration
    pub fn startup_delay() -> Duration {
        Duration::from_secs(STARTUP_RETRY_DELAY_SECS)
    }
}

/// Drive upload configuration
pub mod upload {
    /// MIME type declared for every uploaded screenshot, regardless of
    /// actual file content (all Telegram photos arrive as JPEG)
    pub const SCREENSHOT_MIME: &str = "image/jpeg";

    /// Folder MIME type in the Drive API
    pub const FOLDER_MIME: &str = "application/vnd.google-apps.folder";

    /// Spreadsheet MIME type in the Drive API
    pub const SPREADSHEET_MIME: &str = "application/vnd.google-apps.spreadsheet";
}
