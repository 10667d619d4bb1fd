//! File-backed document store.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use sha2::{Digest, Sha256};
use tokio::fs;
use tracing::{debug, trace};

use crate::domain::entities::{DocumentId, StoredDocument};
use crate::domain::errors::DocumentError;
use crate::domain::ports::DocumentStorePort;
use crate::infrastructure::config::storage::persist_atomically;

const DOCUMENTS_DIR: &str = "documents";

/// Stores each document as a JSON file named by the hash of its id.
pub struct FileDocumentStore {
    root: PathBuf,
}

impl FileDocumentStore {
    /// Creates a store under `data_dir/documents`.
    #[must_use]
    pub fn new(data_dir: &Path) -> Self {
        Self {
            root: data_dir.join(DOCUMENTS_DIR),
        }
    }

    /// Returns the directory holding document files.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn document_path(&self, id: &DocumentId) -> PathBuf {
        let digest = Sha256::digest(id.as_str().as_bytes());
        self.root.join(format!("{}.json", hex::encode(digest)))
    }
}

#[async_trait]
impl DocumentStorePort for FileDocumentStore {
    async fn read(&self, id: &DocumentId) -> Result<Option<StoredDocument>, DocumentError> {
        let path = self.document_path(id);

        let content = match fs::read_to_string(&path).await {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                trace!(document_id = %id, "Document file does not exist");
                return Ok(None);
            }
            Err(e) => return Err(DocumentError::read_failed(id.as_str(), e.to_string())),
        };

        let document: StoredDocument = serde_json::from_str(&content)
            .map_err(|e| DocumentError::corrupt(id.as_str(), e.to_string()))?;

        if &document.id != id {
            return Err(DocumentError::corrupt(
                id.as_str(),
                format!("file holds document {}", document.id),
            ));
        }

        debug!(document_id = %id, images = document.image_urls.len(), "Loaded document");
        Ok(Some(document))
    }

    async fn write(&self, document: &StoredDocument) -> Result<(), DocumentError> {
        let path = self.document_path(&document.id);
        let id = document.id.as_str().to_string();

        let content = serde_json::to_vec_pretty(document)
            .map_err(|e| DocumentError::write_failed(&id, e.to_string()))?;

        let result =
            tokio::task::spawn_blocking(move || persist_atomically(&path, &content)).await;

        match result {
            Ok(Ok(())) => {
                debug!(document_id = %id, "Document written");
                Ok(())
            }
            Ok(Err(e)) => Err(DocumentError::write_failed(id, e.to_string())),
            Err(e) => Err(DocumentError::write_failed(id, format!("write task failed: {e}"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::{AssociationSet, ImageReference};
    use tempfile::tempdir;

    fn document(id: &str) -> StoredDocument {
        let images: AssociationSet = [ImageReference::new("https://cdn/upload/v1/a.jpg")]
            .into_iter()
            .collect();
        StoredDocument::new(
            DocumentId::new(id),
            r#"<img src="https://cdn/upload/v1/a.jpg">"#.to_string(),
            images,
        )
    }

    #[tokio::test]
    async fn test_missing_document_reads_as_none() {
        let dir = tempdir().unwrap();
        let store = FileDocumentStore::new(dir.path());

        let result = store.read(&DocumentId::new("nope")).await.unwrap();

        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_write_then_read() {
        let dir = tempdir().unwrap();
        let store = FileDocumentStore::new(dir.path());
        let doc = document("papers/p1/paper/3");

        store.write(&doc).await.unwrap();
        let loaded = store.read(&doc.id).await.unwrap().unwrap();

        assert_eq!(loaded, doc);
        assert_eq!(std::fs::read_dir(store.root()).unwrap().count(), 1);
    }

    #[tokio::test]
    async fn test_overwrite_keeps_last_write() {
        let dir = tempdir().unwrap();
        let store = FileDocumentStore::new(dir.path());
        let mut doc = document("q1");

        store.write(&doc).await.unwrap();
        doc.body = "<p>edited</p>".to_string();
        doc.image_urls = AssociationSet::new();
        store.write(&doc).await.unwrap();

        let loaded = store.read(&doc.id).await.unwrap().unwrap();
        assert_eq!(loaded.body, "<p>edited</p>");
        assert!(loaded.image_urls.is_empty());
    }

    #[tokio::test]
    async fn test_corrupt_file_is_an_error() {
        let dir = tempdir().unwrap();
        let store = FileDocumentStore::new(dir.path());
        let id = DocumentId::new("q1");
        std::fs::create_dir_all(store.root()).unwrap();
        std::fs::write(store.document_path(&id), "{not json").unwrap();

        let result = store.read(&id).await;

        assert!(matches!(result, Err(DocumentError::Corrupt { .. })));
    }
}
