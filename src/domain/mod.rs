//! Domain layer with value types, errors and port definitions.

/// Entity definitions.
pub mod entities;
/// Error types.
pub mod errors;
/// Port definitions.
pub mod ports;

pub use entities::{
    AssociationSet, ContentIdentifier, DocumentId, ImageReference, PaperMetadata, StoredDocument,
    UploadedAsset,
};
pub use errors::{DocumentError, MediaError};
pub use ports::{DocumentStorePort, MediaStorePort};
