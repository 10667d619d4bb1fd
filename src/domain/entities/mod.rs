//! Domain entities.

mod association_set;
mod content_identifier;
mod document;
mod image_reference;
mod paper_metadata;

pub use association_set::AssociationSet;
pub use content_identifier::{ContentIdentifier, UPLOAD_MARKER};
pub use document::{DocumentId, StoredDocument, UploadedAsset};
pub use image_reference::ImageReference;
pub use paper_metadata::PaperMetadata;
