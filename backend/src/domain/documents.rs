//! Uploaded documents and where they are kept.
//!
//! Client-supplied names never become paths. Every stored file gets a fresh
//! UUID key and keeps a sanitised extension; the original name survives only
//! as metadata on [`StoredDocument`].

use serde::{Deserialize, Serialize};
use uuid::Uuid;

const MAX_EXTENSION_LEN: usize = 10;

/// One file received in a multipart submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentUpload {
    /// Form field the file arrived under.
    pub field: String,
    /// File name as sent by the browser.
    pub file_name: String,
    pub bytes: Vec<u8>,
}

/// A document written beneath the upload root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredDocument {
    /// Path relative to the upload root, `/`-separated.
    pub path: String,
    /// Original file name, for display only.
    pub file_name: String,
}

/// Directory beneath the upload root that owns a set of documents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentFolder(Vec<String>);

impl DocumentFolder {
    /// General attachments of a customer.
    pub fn customer(customer_code: &str) -> Self {
        Self(vec![sanitize_segment(customer_code)])
    }

    /// Scan of a customer's trade license.
    pub fn trade_license(customer_code: &str, trade_license_no: &str) -> Self {
        Self(vec![
            sanitize_segment(customer_code),
            sanitize_segment(trade_license_no),
        ])
    }

    /// Identity documents of a customer's partners.
    pub fn partners(customer_code: &str) -> Self {
        Self(vec![sanitize_segment(customer_code), "partners".to_owned()])
    }

    /// Identity documents of a customer's memorandum representatives.
    pub fn memorandum(customer_code: &str) -> Self {
        Self(vec![sanitize_segment(customer_code), "memorandum".to_owned()])
    }

    /// Sanitised path segments, outermost first.
    pub fn segments(&self) -> &[String] {
        &self.0
    }

    /// Relative directory path, `/`-separated.
    pub fn relative_path(&self) -> String {
        self.0.join("/")
    }

    /// Fresh storage key for an upload named `file_name`.
    pub fn new_document_path(&self, file_name: &str) -> String {
        format!(
            "{}/{}{}",
            self.relative_path(),
            Uuid::new_v4(),
            sanitized_extension(file_name)
        )
    }
}

/// Replace anything outside `[A-Za-z0-9._-]` and neutralise dot-only names.
pub fn sanitize_segment(raw: &str) -> String {
    let cleaned: String = raw
        .trim()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                c
            } else {
                '_'
            }
        })
        .collect();
    if cleaned.is_empty() || cleaned.chars().all(|c| c == '.') {
        "_".to_owned()
    } else {
        cleaned
    }
}

/// Lower-cased extension including the dot, or `""` when unusable.
fn sanitized_extension(file_name: &str) -> String {
    let Some((stem, ext)) = file_name.rsplit_once('.') else {
        return String::new();
    };
    if stem.is_empty()
        || ext.is_empty()
        || ext.len() > MAX_EXTENSION_LEN
        || !ext.chars().all(|c| c.is_ascii_alphanumeric())
    {
        return String::new();
    }
    format!(".{}", ext.to_ascii_lowercase())
}
