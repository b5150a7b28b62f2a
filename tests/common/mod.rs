//! Common test utilities
//!
//! In-memory fakes for the Drive and Sheets backends, shared across all
//! integration tests. Failure injection is deterministic: flip the
//! `fail_*` switches instead of configuring rates.

#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use popkeeper::core::error::{AppError, AppResult};
use popkeeper::storage::drive::{DriveApi, FolderInfo};
use popkeeper::storage::sheets::SheetApi;
use popkeeper::storage::{SubmissionLog, SubmissionStorage};

/// A folder created in the fake Drive
#[derive(Debug, Clone)]
pub struct FakeFolder {
    pub parent_id: String,
    pub name: String,
    pub id: String,
}

/// A file uploaded to the fake Drive
#[derive(Debug, Clone)]
pub struct FakeUpload {
    pub folder_id: String,
    pub filename: String,
    pub mime_type: String,
    pub content_len: usize,
}

/// In-memory Drive backend
#[derive(Default)]
pub struct FakeDrive {
    pub folders: Mutex<Vec<FakeFolder>>,
    pub uploads: Mutex<Vec<FakeUpload>>,
    pub fail_uploads: AtomicBool,
    next_id: AtomicU64,
}

impl FakeDrive {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of folders carrying `name`, across all parents
    pub fn folders_named(&self, name: &str) -> usize {
        self.folders.lock().unwrap().iter().filter(|f| f.name == name).count()
    }

    /// Uploads recorded for a given folder id
    pub fn uploads_in(&self, folder_id: &str) -> Vec<FakeUpload> {
        self.uploads
            .lock()
            .unwrap()
            .iter()
            .filter(|u| u.folder_id == folder_id)
            .cloned()
            .collect()
    }

    pub fn upload_count(&self) -> usize {
        self.uploads.lock().unwrap().len()
    }
}

#[async_trait]
impl DriveApi for FakeDrive {
    async fn list_folders(&self, name: &str, parent_id: &str) -> AppResult<Vec<FolderInfo>> {
        Ok(self
            .folders
            .lock()
            .unwrap()
            .iter()
            .filter(|f| f.parent_id == parent_id && f.name == name)
            .map(|f| FolderInfo {
                id: f.id.clone(),
                name: f.name.clone(),
            })
            .collect())
    }

    async fn create_folder(&self, name: &str, parent_id: &str) -> AppResult<String> {
        let id = format!("folder_{}", self.next_id.fetch_add(1, Ordering::Relaxed));
        self.folders.lock().unwrap().push(FakeFolder {
            parent_id: parent_id.to_string(),
            name: name.to_string(),
            id: id.clone(),
        });
        Ok(id)
    }

    async fn upload_file(
        &self,
        folder_id: &str,
        filename: &str,
        content: Vec<u8>,
        mime_type: &str,
    ) -> AppResult<String> {
        if self.fail_uploads.load(Ordering::Relaxed) {
            return Err(AppError::from("simulated Drive outage"));
        }
        self.uploads.lock().unwrap().push(FakeUpload {
            folder_id: folder_id.to_string(),
            filename: filename.to_string(),
            mime_type: mime_type.to_string(),
            content_len: content.len(),
        });
        Ok(format!("https://drive.example/view/{}", filename))
    }

    async fn find_spreadsheet(&self, _name: &str) -> AppResult<Option<String>> {
        Ok(Some("sheet_1".to_string()))
    }
}

/// In-memory Sheets backend
#[derive(Default)]
pub struct FakeSheet {
    pub rows: Mutex<Vec<Vec<String>>>,
    pub fail_appends: AtomicBool,
}

impl FakeSheet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn row_count(&self) -> usize {
        self.rows.lock().unwrap().len()
    }
}

#[async_trait]
impl SheetApi for FakeSheet {
    async fn append_row(&self, row: Vec<String>) -> AppResult<()> {
        if self.fail_appends.load(Ordering::Relaxed) {
            return Err(AppError::from("simulated Sheets outage"));
        }
        self.rows.lock().unwrap().push(row);
        Ok(())
    }
}

/// Root folder id used by every test environment
pub const TEST_ROOT_ID: &str = "root_folder";

/// Everything a pipeline test needs: both fakes plus the storage/log
/// handles wired over them
pub struct TestBackends {
    pub drive: Arc<FakeDrive>,
    pub sheet: Arc<FakeSheet>,
    pub storage: SubmissionStorage,
    pub log: SubmissionLog,
}

impl TestBackends {
    pub fn new() -> Self {
        let drive = Arc::new(FakeDrive::new());
        let sheet = Arc::new(FakeSheet::new());
        let storage = SubmissionStorage::new(Arc::clone(&drive) as Arc<dyn DriveApi>, TEST_ROOT_ID);
        let log = SubmissionLog::new(Arc::clone(&sheet) as Arc<dyn SheetApi>);
        Self {
            drive,
            sheet,
            storage,
            log,
        }
    }
}
