//! Domain error types.

mod document_error;
mod media_error;

pub use document_error::DocumentError;
pub use media_error::MediaError;
