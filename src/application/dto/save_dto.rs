//! Document save DTOs.

use super::ReconciliationResult;
use crate::domain::entities::{DocumentId, PaperMetadata};

/// Save request coming from the editor.
#[derive(Debug, Clone)]
pub struct SaveRequest {
    /// Existing document, or `None` to create one.
    pub document_id: Option<DocumentId>,
    /// Edited HTML body.
    pub body: String,
    /// Paper the document belongs to.
    pub metadata: PaperMetadata,
}

impl SaveRequest {
    /// Creates a request for a new document.
    #[must_use]
    pub const fn new(body: String, metadata: PaperMetadata) -> Self {
        Self {
            document_id: None,
            body,
            metadata,
        }
    }

    /// Targets an existing document.
    #[must_use]
    pub fn for_document(mut self, id: DocumentId) -> Self {
        self.document_id = Some(id);
        self
    }
}

/// Outcome of a successful save.
#[derive(Debug, Clone)]
pub struct SaveResponse {
    /// Id the document was stored under.
    pub document_id: DocumentId,
    /// Body as persisted, with re-hosted image URLs.
    pub body: String,
    /// Image operations performed during the save.
    pub reconciliation: ReconciliationResult,
}

impl SaveResponse {
    /// Returns whether some image operation was skipped or failed.
    #[must_use]
    pub fn is_partial(&self) -> bool {
        self.reconciliation.has_failures()
    }
}
