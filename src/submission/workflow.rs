//! Upload→log orchestration for a staged submission
//!
//! The two backend calls are independent: no transaction spans them and
//! nothing rolls back. If the upload fails, nothing is logged. If the log
//! append fails after a successful upload, the file stays in Drive with no
//! corresponding row.

use chrono::Local;

use crate::core::error::AppResult;
use crate::storage::{SubmissionLog, SubmissionStorage};
use crate::submission::Submission;

/// Runs the upload and log steps for a screenshot already staged on disk,
/// returning the shareable Drive link.
///
/// The log row's date and time are recomputed here rather than reused from
/// the staging filename, so the two can differ by a second or two.
pub async fn submit_saved_photo(
    storage: &SubmissionStorage,
    log: &SubmissionLog,
    submission: &Submission,
) -> AppResult<String> {
    let link = storage
        .upload_submission(Some(&submission.handle), &submission.filename, &submission.local_path)
        .await?;

    let logged_at = Local::now();
    log.append(&submission.handle, submission.user_id, &logged_at, &link)
        .await?;

    Ok(link)
}
