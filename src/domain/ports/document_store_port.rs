//! Document persistence port definition.

use async_trait::async_trait;

use crate::domain::entities::{DocumentId, StoredDocument};
use crate::domain::errors::DocumentError;

/// Port for reading and writing documents. Each call is atomic on its own.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DocumentStorePort: Send + Sync {
    /// Loads a document, or `None` if it has never been saved.
    async fn read(&self, id: &DocumentId) -> Result<Option<StoredDocument>, DocumentError>;

    /// Creates or replaces a document.
    async fn write(&self, document: &StoredDocument) -> Result<(), DocumentError>;
}
