//! Document save use case implementation.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::application::dto::{SaveRequest, SaveResponse};
use crate::application::services::{ImageExtractor, ImageReconciler};
use crate::domain::entities::{AssociationSet, DocumentId, StoredDocument};
use crate::domain::errors::DocumentError;
use crate::domain::ports::{DocumentStorePort, MediaStorePort};

/// Saves an edited document and keeps its images in sync with the media store.
///
/// Image failures never fail the save; only the document store can. Callers
/// must not run two saves of the same document at once, the last write wins.
#[derive(Clone)]
pub struct SaveDocumentUseCase {
    document_store: Arc<dyn DocumentStorePort>,
    reconciler: ImageReconciler,
}

impl SaveDocumentUseCase {
    /// Creates new save use case.
    #[must_use]
    pub fn new(
        document_store: Arc<dyn DocumentStorePort>,
        media_store: Arc<dyn MediaStorePort>,
    ) -> Self {
        Self {
            document_store,
            reconciler: ImageReconciler::new(media_store),
        }
    }

    /// Executes the save.
    ///
    /// # Errors
    /// Returns error if the previous version cannot be read or the new one
    /// cannot be written.
    pub async fn execute(&self, request: SaveRequest) -> Result<SaveResponse, DocumentError> {
        let SaveRequest {
            document_id,
            body,
            metadata,
        } = request;

        let (document_id, previous) = match document_id {
            Some(id) => {
                let previous = self.previous_association(&id).await?;
                (id, previous)
            }
            None => {
                let id = DocumentId::generate();
                debug!(document_id = %id, "Creating new document");
                (id, AssociationSet::new())
            }
        };

        let current = ImageExtractor::extract_set(&body);
        debug!(
            document_id = %document_id,
            previous = previous.len(),
            current = current.len(),
            "Extracted image references"
        );

        let reconciliation = self
            .reconciler
            .reconcile(&previous, &current, &metadata)
            .await;
        let body = reconciliation.rewrite_body(&body);

        let document = StoredDocument::new(
            document_id.clone(),
            body.clone(),
            reconciliation.association.clone(),
        );

        self.document_store.write(&document).await.map_err(|e| {
            tracing::error!(document_id = %document_id, error = %e, "Failed to persist document");
            e
        })?;

        if reconciliation.has_failures() {
            warn!(
                document_id = %document_id,
                failed = reconciliation.failures().count(),
                "Document saved, some image operations did not complete"
            );
        } else {
            info!(document_id = %document_id, images = document.image_urls.len(), "Document saved");
        }

        Ok(SaveResponse {
            document_id,
            body,
            reconciliation,
        })
    }

    async fn previous_association(&self, id: &DocumentId) -> Result<AssociationSet, DocumentError> {
        match self.document_store.read(id).await? {
            Some(document) => Ok(document.image_urls),
            None => {
                debug!(document_id = %id, "Document not stored yet, starting from no images");
                Ok(AssociationSet::new())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::{ContentIdentifier, ImageReference, PaperMetadata};
    use crate::domain::ports::MockDocumentStorePort;
    use crate::domain::ports::mocks::{MediaCall, MockMediaStore};

    fn stored(id: &str, body: &str) -> StoredDocument {
        StoredDocument::new(
            DocumentId::new(id),
            body.to_string(),
            ImageExtractor::extract_set(body),
        )
    }

    #[tokio::test]
    async fn test_save_rewrites_body_and_persists_association() {
        let previous = stored("q1", r#"<img src="https://cdn/upload/v1/old.jpg">"#);
        let mut documents = MockDocumentStorePort::new();
        documents
            .expect_read()
            .times(1)
            .returning(move |_| Ok(Some(previous.clone())));
        documents
            .expect_write()
            .withf(|doc| {
                doc.id.as_str() == "q1"
                    && doc.body == r#"<p>A</p><img src="https://cdn/new.png">"#
                    && doc.image_urls
                        == [ImageReference::new("https://cdn/new.png")]
                            .into_iter()
                            .collect::<AssociationSet>()
            })
            .times(1)
            .returning(|_| Ok(()));
        let media = Arc::new(MockMediaStore::new("https://cdn"));

        let use_case = SaveDocumentUseCase::new(Arc::new(documents), media.clone());
        let request = SaveRequest::new(
            r#"<p>A</p><img src="https://foreign.com/new.png">"#.to_string(),
            PaperMetadata::default(),
        )
        .for_document(DocumentId::new("q1"));

        let response = use_case.execute(request).await.unwrap();

        assert_eq!(response.document_id.as_str(), "q1");
        assert!(!response.is_partial());
        let calls = media.calls().await;
        assert!(calls.contains(&MediaCall::Delete(ContentIdentifier::new("old"))));
        assert!(calls.contains(&MediaCall::Upload(ImageReference::new(
            "https://foreign.com/new.png"
        ))));
    }

    #[tokio::test]
    async fn test_new_document_gets_generated_id_without_read() {
        let mut documents = MockDocumentStorePort::new();
        documents.expect_read().never();
        documents.expect_write().times(1).returning(|_| Ok(()));

        let use_case = SaveDocumentUseCase::new(
            Arc::new(documents),
            Arc::new(MockMediaStore::new("https://cdn")),
        );

        let response = use_case
            .execute(SaveRequest::new(
                "<p>text only</p>".to_string(),
                PaperMetadata::default(),
            ))
            .await
            .unwrap();

        assert!(!response.document_id.as_str().is_empty());
        assert!(response.reconciliation.is_noop());
    }

    #[tokio::test]
    async fn test_image_failures_do_not_fail_save() {
        let mut documents = MockDocumentStorePort::new();
        documents.expect_read().returning(|_| Ok(None));
        documents
            .expect_write()
            .withf(|doc| doc.image_urls.contains(&ImageReference::new("https://foreign.com/x.png")))
            .times(1)
            .returning(|_| Ok(()));
        let media =
            Arc::new(MockMediaStore::new("https://cdn").fail_upload("https://foreign.com/x.png"));

        let use_case = SaveDocumentUseCase::new(Arc::new(documents), media);
        let body = r#"<img src="https://foreign.com/x.png">"#;
        let response = use_case
            .execute(
                SaveRequest::new(body.to_string(), PaperMetadata::default())
                    .for_document(DocumentId::new("p7")),
            )
            .await
            .unwrap();

        assert!(response.is_partial());
        assert_eq!(response.body, body);
    }

    #[tokio::test]
    async fn test_write_failure_is_returned() {
        let mut documents = MockDocumentStorePort::new();
        documents.expect_read().returning(|_| Ok(None));
        documents
            .expect_write()
            .returning(|doc| Err(DocumentError::write_failed(doc.id.as_str(), "disk full")));

        let use_case = SaveDocumentUseCase::new(
            Arc::new(documents),
            Arc::new(MockMediaStore::new("https://cdn")),
        );

        let result = use_case
            .execute(
                SaveRequest::new(String::new(), PaperMetadata::default())
                    .for_document(DocumentId::new("p1")),
            )
            .await;

        assert!(matches!(result, Err(DocumentError::WriteFailed { .. })));
    }

    #[tokio::test]
    async fn test_read_failure_aborts_before_touching_media() {
        let mut documents = MockDocumentStorePort::new();
        documents
            .expect_read()
            .returning(|id| Err(DocumentError::corrupt(id.as_str(), "bad json")));
        documents.expect_write().never();
        let media = Arc::new(MockMediaStore::new("https://cdn"));

        let use_case = SaveDocumentUseCase::new(Arc::new(documents), media.clone());
        let result = use_case
            .execute(
                SaveRequest::new(
                    r#"<img src="https://foreign.com/x.png">"#.to_string(),
                    PaperMetadata::default(),
                )
                .for_document(DocumentId::new("p1")),
            )
            .await;

        assert!(matches!(result, Err(DocumentError::Corrupt { .. })));
        assert!(media.calls().await.is_empty());
    }
}
