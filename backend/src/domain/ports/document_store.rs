//! Port for writing uploaded documents beneath the upload root.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;

use crate::domain::{DocumentFolder, DocumentUpload, StoredDocument};

use super::define_port_error;

define_port_error! {
    /// Errors raised by document store adapters.
    pub enum DocumentStoreError {
        /// The document could not be written.
        Write { message: String } => "document write failed: {message}",
        /// The store could not be inspected.
        Read { message: String } => "document lookup failed: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Write `upload` into `folder` under a fresh key.
    async fn store(
        &self,
        folder: &DocumentFolder,
        upload: &DocumentUpload,
    ) -> Result<StoredDocument, DocumentStoreError>;

    /// True when a document exists at `path`, relative to the upload root.
    async fn exists(&self, path: &str) -> Result<bool, DocumentStoreError>;

    /// Contents of the document at `path`, or `None` when it is missing.
    async fn read(&self, path: &str) -> Result<Option<Vec<u8>>, DocumentStoreError>;
}

/// In-memory store used by tests and database-less runs.
#[derive(Debug, Default)]
pub struct FixtureDocumentStore {
    files: Mutex<HashMap<String, Vec<u8>>>,
}

impl FixtureDocumentStore {
    /// Bytes stored at `path`, if any.
    pub fn contents(&self, path: &str) -> Option<Vec<u8>> {
        self.lock().get(path).cloned()
    }

    /// Drop a stored file, simulating removal from disk.
    pub fn remove(&self, path: &str) {
        self.lock().remove(path);
    }

    /// Number of stored files.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// True when nothing has been stored.
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, Vec<u8>>> {
        self.files.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl DocumentStore for FixtureDocumentStore {
    async fn store(
        &self,
        folder: &DocumentFolder,
        upload: &DocumentUpload,
    ) -> Result<StoredDocument, DocumentStoreError> {
        let path = folder.new_document_path(&upload.file_name);
        self.lock().insert(path.clone(), upload.bytes.clone());
        Ok(StoredDocument {
            path,
            file_name: upload.file_name.clone(),
        })
    }

    async fn exists(&self, path: &str) -> Result<bool, DocumentStoreError> {
        Ok(self.lock().contains_key(path))
    }

    async fn read(&self, path: &str) -> Result<Option<Vec<u8>>, DocumentStoreError> {
        Ok(self.contents(path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn stored_documents_can_be_found_until_removed() {
        let store = FixtureDocumentStore::default();
        let upload = DocumentUpload {
            field: "photos".into(),
            file_name: "scan.pdf".into(),
            bytes: b"%PDF".to_vec(),
        };
        let stored = store
            .store(&DocumentFolder::customer("C1"), &upload)
            .await
            .expect("store");
        assert_eq!(stored.file_name, "scan.pdf");
        assert!(store.exists(&stored.path).await.expect("exists"));
        assert_eq!(
            store.read(&stored.path).await.expect("read"),
            Some(b"%PDF".to_vec())
        );

        store.remove(&stored.path);
        assert!(!store.exists(&stored.path).await.expect("exists"));
    }
}
