//! Persisted document and stored asset types.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{AssociationSet, ContentIdentifier, ImageReference};

/// Identifier of a question, answer or paper page document.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentId(String);

impl DocumentId {
    /// Creates an id from an existing value.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Generates a fresh random id for a new document.
    #[must_use]
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    /// Returns the id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A document body together with the images it owns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredDocument {
    /// Document id.
    pub id: DocumentId,
    /// Full HTML body.
    pub body: String,
    /// Images associated with the body as of this save.
    #[serde(default)]
    pub image_urls: AssociationSet,
    /// Time of the save that produced this record.
    pub updated_at: DateTime<Utc>,
}

impl StoredDocument {
    /// Creates a record stamped with the current time.
    #[must_use]
    pub fn new(id: DocumentId, body: String, image_urls: AssociationSet) -> Self {
        Self {
            id,
            body,
            image_urls,
            updated_at: Utc::now(),
        }
    }
}

/// An asset persisted by the media store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedAsset {
    /// Canonical delivery URL.
    pub url: ImageReference,
    /// Store key of the asset.
    pub public_id: ContentIdentifier,
}

impl UploadedAsset {
    /// Creates a new asset description.
    #[must_use]
    pub const fn new(url: ImageReference, public_id: ContentIdentifier) -> Self {
        Self { url, public_id }
    }
}
