use thiserror::Error;

/// Centralized error types for the application
///
/// All errors in the application are converted to this enum for consistent error handling.
/// Uses `thiserror` for automatic error conversion and display formatting.
#[derive(Error, Debug)]
pub enum AppError {
    /// Telegram API errors
    #[error("Telegram error: {0}")]
    Telegram(#[from] teloxide::RequestError),

    /// Telegram file download errors
    #[error("Telegram download error: {0}")]
    TelegramDownload(#[from] teloxide::DownloadError),

    /// Drive backend errors (folder lookup/create, media upload)
    #[error("Drive error: {0}")]
    Drive(google_drive3::Error),

    /// Sheets backend errors (row append)
    #[error("Sheets error: {0}")]
    Sheets(google_sheets4::Error),

    /// HTTP/Fetch errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// URL parsing errors
    #[error("URL parsing error: {0}")]
    Url(#[from] url::ParseError),

    /// Anyhow errors (for general error handling)
    #[error("Application error: {0}")]
    Anyhow(#[from] anyhow::Error),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    /// Submission pipeline errors that carry only a message
    #[error("Submission error: {0}")]
    Submission(String),
}

/// Type alias for Result with AppError
pub type AppResult<T> = Result<T, AppError>;

/// Helper function to convert String to AppError::Submission
impl From<String> for AppError {
    fn from(err: String) -> Self {
        AppError::Submission(err)
    }
}

/// Helper function to convert &str to AppError::Submission
impl From<&str> for AppError {
    fn from(err: &str) -> Self {
        AppError::Submission(err.to_string())
    }
}
