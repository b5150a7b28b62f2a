//! Submission log appends to the shared Google Sheet
//!
//! Mirrors the Drive module's shape: `SheetApi` is the trait seam,
//! `GoogleSheet` talks to the real hub, `SubmissionLog` owns the row
//! format. Rows are append-only; there is no update or delete path, no
//! dedup, and no transaction with the upload step. A failed append after
//! a successful upload leaves the file in Drive with no log row.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Local};
use google_sheets4::api::ValueRange;

use crate::core::error::{AppError, AppResult};
use crate::storage::credentials::SheetsHub;

/// A1-notation range targeting the first worksheet
const APPEND_RANGE: &str = "A1";

/// Minimal Sheets surface used by the log step
#[async_trait]
pub trait SheetApi: Send + Sync {
    /// Appends one row of cell values to the worksheet.
    async fn append_row(&self, row: Vec<String>) -> AppResult<()>;
}

/// `SheetApi` implementation backed by the real Sheets hub
pub struct GoogleSheet {
    hub: SheetsHub,
    spreadsheet_id: String,
}

impl GoogleSheet {
    pub fn new(hub: SheetsHub, spreadsheet_id: impl Into<String>) -> Self {
        Self {
            hub,
            spreadsheet_id: spreadsheet_id.into(),
        }
    }
}

#[async_trait]
impl SheetApi for GoogleSheet {
    async fn append_row(&self, row: Vec<String>) -> AppResult<()> {
        let values = row.into_iter().map(serde_json::Value::String).collect();
        let request = ValueRange {
            values: Some(vec![values]),
            ..Default::default()
        };

        self.hub
            .spreadsheets()
            .values_append(request, &self.spreadsheet_id, APPEND_RANGE)
            .value_input_option("USER_ENTERED")
            .doit()
            .await
            .map_err(AppError::Sheets)?;

        Ok(())
    }
}

/// Builds a log row in the fixed column order:
/// username, user id as text, date, time, shareable link.
pub fn log_row(username: &str, user_id: u64, submitted: &DateTime<Local>, link: &str) -> Vec<String> {
    vec![
        username.to_string(),
        user_id.to_string(),
        submitted.format("%Y-%m-%d").to_string(),
        submitted.format("%H:%M:%S").to_string(),
        link.to_string(),
    ]
}

/// Append-only submissions log
pub struct SubmissionLog {
    sink: Arc<dyn SheetApi>,
}

impl SubmissionLog {
    pub fn new(sink: Arc<dyn SheetApi>) -> Self {
        Self { sink }
    }

    /// Appends one row for a successful submission.
    pub async fn append(&self, username: &str, user_id: u64, submitted: &DateTime<Local>, link: &str) -> AppResult<()> {
        self.sink.append_row(log_row(username, user_id, submitted, link)).await
    }
}
