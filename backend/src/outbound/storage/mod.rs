//! Filesystem adapters for uploaded documents.

mod local_document_store;

pub use local_document_store::{LocalDocumentStore, StorageOpenError};
