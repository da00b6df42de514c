//! `DocumentStore` adapter writing beneath a capability-scoped directory.
//!
//! All access goes through a `cap_std` [`Dir`] opened on the upload root, so
//! a relative path can never resolve outside it.

use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use cap_std::{ambient_authority, fs::Dir};
use tracing::debug;

use crate::domain::ports::{DocumentStore, DocumentStoreError};
use crate::domain::{DocumentFolder, DocumentUpload, StoredDocument};

/// The upload root could not be created or opened.
#[derive(Debug, thiserror::Error)]
#[error("failed to open upload root {path}: {source}")]
pub struct StorageOpenError {
    path: PathBuf,
    #[source]
    source: io::Error,
}

/// Document store rooted at a local directory.
#[derive(Clone)]
pub struct LocalDocumentStore {
    root: Arc<Dir>,
}

impl LocalDocumentStore {
    /// Create `root` if needed and open it.
    ///
    /// # Errors
    ///
    /// Returns [`StorageOpenError`] when the directory cannot be created or
    /// opened.
    pub fn open(root: &Path) -> Result<Self, StorageOpenError> {
        let wrap = |source| StorageOpenError {
            path: root.to_path_buf(),
            source,
        };
        Dir::create_ambient_dir_all(root, ambient_authority()).map_err(wrap)?;
        let dir = Dir::open_ambient_dir(root, ambient_authority()).map_err(wrap)?;
        Ok(Self {
            root: Arc::new(dir),
        })
    }
}

#[async_trait]
impl DocumentStore for LocalDocumentStore {
    async fn store(
        &self,
        folder: &DocumentFolder,
        upload: &DocumentUpload,
    ) -> Result<StoredDocument, DocumentStoreError> {
        let dir = Arc::clone(&self.root);
        let folder_path = folder.relative_path();
        let path = folder.new_document_path(&upload.file_name);
        let target = path.clone();
        let bytes = upload.bytes.clone();

        tokio::task::spawn_blocking(move || -> io::Result<()> {
            dir.create_dir_all(&folder_path)?;
            dir.write(&target, bytes)
        })
        .await
        .map_err(|err| DocumentStoreError::write(err.to_string()))?
        .map_err(|err| DocumentStoreError::write(format!("{path}: {err}")))?;

        debug!(%path, size = upload.bytes.len(), "stored document");
        Ok(StoredDocument {
            path,
            file_name: upload.file_name.clone(),
        })
    }

    async fn exists(&self, path: &str) -> Result<bool, DocumentStoreError> {
        let dir = Arc::clone(&self.root);
        let target = path.to_owned();
        let metadata = tokio::task::spawn_blocking(move || dir.metadata(&target))
            .await
            .map_err(|err| DocumentStoreError::read(err.to_string()))?;
        match metadata {
            Ok(meta) => Ok(meta.is_file()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(err) => Err(DocumentStoreError::read(format!("{path}: {err}"))),
        }
    }

    async fn read(&self, path: &str) -> Result<Option<Vec<u8>>, DocumentStoreError> {
        let dir = Arc::clone(&self.root);
        let target = path.to_owned();
        let contents = tokio::task::spawn_blocking(move || -> io::Result<Option<Vec<u8>>> {
            if !dir.metadata(&target)?.is_file() {
                return Ok(None);
            }
            dir.read(&target).map(Some)
        })
        .await
        .map_err(|err| DocumentStoreError::read(err.to_string()))?;
        match contents {
            Ok(bytes) => Ok(bytes),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(DocumentStoreError::read(format!("{path}: {err}"))),
        }
    }
}
