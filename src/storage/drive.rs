//! Drive folder resolution and screenshot upload
//!
//! The `DriveApi` trait is the seam between the submission logic and the
//! Drive backend: `GoogleDrive` implements it against the real hub, tests
//! substitute an in-memory fake. The get-or-create folder policy lives in
//! `SubmissionStorage`, above the trait, so it is exercised either way.
//!
//! The folder lookup is exact-match and case-sensitive, reads only the
//! first page of results, and takes the first match. Lookup and create are
//! two separate calls with no backend-side uniqueness constraint, so two
//! concurrent first-time submissions by the same user can create duplicate
//! folders. Known race, accepted.

use std::io::Cursor;
use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use google_drive3::api::File;

use crate::core::config;
use crate::core::error::{AppError, AppResult};
use crate::storage::credentials::Drive;

/// A folder entry returned by a lookup
#[derive(Debug, Clone)]
pub struct FolderInfo {
    pub id: String,
    pub name: String,
}

/// Minimal Drive surface used by the submission pipeline
///
/// All methods are `&self`; implementations hold their own client state.
#[async_trait]
pub trait DriveApi: Send + Sync {
    /// Lists folders named exactly `name` whose parent is `parent_id`
    /// (first result page only).
    async fn list_folders(&self, name: &str, parent_id: &str) -> AppResult<Vec<FolderInfo>>;

    /// Creates a folder named `name` under `parent_id` and returns its id.
    async fn create_folder(&self, name: &str, parent_id: &str) -> AppResult<String>;

    /// Uploads `content` as `filename` into `folder_id` and returns the
    /// shareable view link.
    async fn upload_file(&self, folder_id: &str, filename: &str, content: Vec<u8>, mime_type: &str)
        -> AppResult<String>;

    /// Finds a spreadsheet file by exact name, returning its id if present.
    async fn find_spreadsheet(&self, name: &str) -> AppResult<Option<String>>;
}

/// `DriveApi` implementation backed by the real Drive hub
pub struct GoogleDrive {
    hub: Drive,
}

impl GoogleDrive {
    pub fn new(hub: Drive) -> Self {
        Self { hub }
    }
}

fn parse_mime(mime_type: &str) -> AppResult<google_drive3::mime::Mime> {
    mime_type
        .parse()
        .map_err(|_| AppError::Validation(format!("invalid MIME type: {}", mime_type)))
}

#[async_trait]
impl DriveApi for GoogleDrive {
    async fn list_folders(&self, name: &str, parent_id: &str) -> AppResult<Vec<FolderInfo>> {
        let query = format!(
            "name = '{}' and mimeType = '{}' and '{}' in parents",
            name,
            config::upload::FOLDER_MIME,
            parent_id
        );

        let (_, list) = self
            .hub
            .files()
            .list()
            .q(&query)
            .spaces("drive")
            .param("fields", "files(id, name)")
            .doit()
            .await
            .map_err(AppError::Drive)?;

        Ok(list
            .files
            .unwrap_or_default()
            .into_iter()
            .filter_map(|f| match (f.id, f.name) {
                (Some(id), Some(name)) => Some(FolderInfo { id, name }),
                _ => None,
            })
            .collect())
    }

    async fn create_folder(&self, name: &str, parent_id: &str) -> AppResult<String> {
        let metadata = File {
            name: Some(name.to_string()),
            mime_type: Some(config::upload::FOLDER_MIME.to_string()),
            parents: Some(vec![parent_id.to_string()]),
            ..Default::default()
        };

        // Metadata-only create still goes through upload() in this client;
        // an empty cursor carries no media.
        let (_, created) = self
            .hub
            .files()
            .create(metadata)
            .param("fields", "id")
            .upload(Cursor::new(Vec::new()), parse_mime(config::upload::FOLDER_MIME)?)
            .await
            .map_err(AppError::Drive)?;

        created
            .id
            .ok_or_else(|| AppError::Validation("Drive returned a folder without an id".to_string()))
    }

    async fn upload_file(
        &self,
        folder_id: &str,
        filename: &str,
        content: Vec<u8>,
        mime_type: &str,
    ) -> AppResult<String> {
        let metadata = File {
            name: Some(filename.to_string()),
            parents: Some(vec![folder_id.to_string()]),
            ..Default::default()
        };

        let (_, uploaded) = self
            .hub
            .files()
            .create(metadata)
            .param("fields", "id, webViewLink")
            .upload(Cursor::new(content), parse_mime(mime_type)?)
            .await
            .map_err(AppError::Drive)?;

        uploaded
            .web_view_link
            .ok_or_else(|| AppError::Validation("Drive returned no webViewLink for uploaded file".to_string()))
    }

    async fn find_spreadsheet(&self, name: &str) -> AppResult<Option<String>> {
        let query = format!(
            "name = '{}' and mimeType = '{}'",
            name,
            config::upload::SPREADSHEET_MIME
        );

        let (_, list) = self
            .hub
            .files()
            .list()
            .q(&query)
            .spaces("drive")
            .param("fields", "files(id, name)")
            .doit()
            .await
            .map_err(AppError::Drive)?;

        Ok(list
            .files
            .unwrap_or_default()
            .into_iter()
            .find_map(|f| f.id))
    }
}

/// Per-user folder resolution and screenshot upload
///
/// Holds the Drive handle and the fixed root folder id. One folder per
/// distinct display handle, created lazily under the root on first
/// submission; anonymous submissions (empty handle) land directly in the
/// root folder with no per-user folder.
pub struct SubmissionStorage {
    api: Arc<dyn DriveApi>,
    root_folder_id: String,
}

impl SubmissionStorage {
    pub fn new(api: Arc<dyn DriveApi>, root_folder_id: impl Into<String>) -> Self {
        Self {
            api,
            root_folder_id: root_folder_id.into(),
        }
    }

    pub fn root_folder_id(&self) -> &str {
        &self.root_folder_id
    }

    /// Returns the folder id for `username`, creating the folder under the
    /// root if it does not exist yet.
    ///
    /// An empty `username` resolves to the root folder itself and never
    /// creates anything. When more than one folder matches, the first
    /// result wins; backend ordering is not guaranteed stable.
    pub async fn resolve_user_folder(&self, username: &str) -> AppResult<String> {
        if username.is_empty() {
            return Ok(self.root_folder_id.clone());
        }

        let matches = self.api.list_folders(username, &self.root_folder_id).await?;
        if let Some(existing) = matches.first() {
            return Ok(existing.id.clone());
        }

        self.api.create_folder(username, &self.root_folder_id).await
    }

    /// Uploads the staged screenshot into the submitter's folder and
    /// returns the shareable link.
    ///
    /// A missing or empty `username` falls back to the literal folder name
    /// "unknown". The content type is always declared as `image/jpeg`
    /// regardless of what the file actually contains.
    pub async fn upload_submission(
        &self,
        username: Option<&str>,
        filename: &str,
        local_path: &Path,
    ) -> AppResult<String> {
        let owner = match username {
            Some(u) if !u.is_empty() => u,
            _ => "unknown",
        };

        let folder_id = self.resolve_user_folder(owner).await?;
        let content = tokio::fs::read(local_path).await?;

        self.api
            .upload_file(&folder_id, filename, content, config::upload::SCREENSHOT_MIME)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::atomic::{AtomicU64, Ordering};
    use std::sync::Mutex;

    /// In-memory Drive fake tracking folders and uploads
    #[derive(Default)]
    struct FakeDrive {
        folders: Mutex<Vec<(String, String, String)>>, // (parent, name, id)
        uploads: Mutex<Vec<(String, String, String)>>, // (folder_id, filename, mime)
        next_id: AtomicU64,
        create_calls: AtomicU64,
    }

    impl FakeDrive {
        fn folder_count(&self) -> usize {
            self.folders.lock().unwrap().len()
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
                .filter(|(parent, folder_name, _)| parent == parent_id && folder_name == name)
                .map(|(_, folder_name, id)| FolderInfo {
                    id: id.clone(),
                    name: folder_name.clone(),
                })
                .collect())
        }

        async fn create_folder(&self, name: &str, parent_id: &str) -> AppResult<String> {
            self.create_calls.fetch_add(1, Ordering::Relaxed);
            let id = format!("folder_{}", self.next_id.fetch_add(1, Ordering::Relaxed));
            self.folders
                .lock()
                .unwrap()
                .push((parent_id.to_string(), name.to_string(), id.clone()));
            Ok(id)
        }

        async fn upload_file(
            &self,
            folder_id: &str,
            filename: &str,
            _content: Vec<u8>,
            mime_type: &str,
        ) -> AppResult<String> {
            self.uploads
                .lock()
                .unwrap()
                .push((folder_id.to_string(), filename.to_string(), mime_type.to_string()));
            Ok(format!("https://drive.example/view/{}", filename))
        }

        async fn find_spreadsheet(&self, _name: &str) -> AppResult<Option<String>> {
            Ok(None)
        }
    }

    fn storage_with_fake() -> (Arc<FakeDrive>, SubmissionStorage) {
        let fake = Arc::new(FakeDrive::default());
        let storage = SubmissionStorage::new(Arc::clone(&fake) as Arc<dyn DriveApi>, "root");
        (fake, storage)
    }

    #[tokio::test]
    async fn test_resolve_creates_folder_once() {
        let (fake, storage) = storage_with_fake();

        let first = storage.resolve_user_folder("alice").await.unwrap();
        let second = storage.resolve_user_folder("alice").await.unwrap();

        assert_eq!(first, second);
        assert_eq!(fake.create_calls.load(Ordering::Relaxed), 1);
        assert_eq!(fake.folder_count(), 1);
    }

    #[tokio::test]
    async fn test_resolve_empty_handle_returns_root() {
        let (fake, storage) = storage_with_fake();

        let resolved = storage.resolve_user_folder("").await.unwrap();

        assert_eq!(resolved, "root");
        assert_eq!(fake.folder_count(), 0);
    }

    #[tokio::test]
    async fn test_resolve_reuses_existing_folder() {
        let (fake, storage) = storage_with_fake();
        fake.folders
            .lock()
            .unwrap()
            .push(("root".to_string(), "bob".to_string(), "folder_bob".to_string()));

        let resolved = storage.resolve_user_folder("bob").await.unwrap();

        assert_eq!(resolved, "folder_bob");
        assert_eq!(fake.create_calls.load(Ordering::Relaxed), 0);
    }

    #[tokio::test]
    async fn test_upload_falls_back_to_unknown() {
        let (fake, storage) = storage_with_fake();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("anon.jpg");
        std::fs::write(&path, b"jpeg bytes").unwrap();

        storage.upload_submission(None, "anon.jpg", &path).await.unwrap();
        storage.upload_submission(Some(""), "anon2.jpg", &path).await.unwrap();

        let folders = fake.folders.lock().unwrap();
        assert_eq!(folders.len(), 1);
        assert_eq!(folders[0].1, "unknown");
    }

    #[tokio::test]
    async fn test_upload_declares_jpeg_mime() {
        let (fake, storage) = storage_with_fake();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pop.png");
        std::fs::write(&path, b"actually png").unwrap();

        let link = storage
            .upload_submission(Some("carol"), "pop.png", &path)
            .await
            .unwrap();

        assert!(link.contains("pop.png"));
        let uploads = fake.uploads.lock().unwrap();
        assert_eq!(uploads.len(), 1);
        assert_eq!(uploads[0].2, "image/jpeg");
    }

    #[tokio::test]
    async fn test_upload_missing_file_propagates() {
        let (_fake, storage) = storage_with_fake();

        let result = storage
            .upload_submission(Some("dave"), "gone.jpg", Path::new("/nonexistent/gone.jpg"))
            .await;

        assert!(matches!(result, Err(AppError::Io(_))));
    }
}
