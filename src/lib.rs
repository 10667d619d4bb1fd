//! pqa-media - image lifecycle management for question-paper documents.
//!
//! Keeps the images embedded in rich-text question, answer and paper bodies in
//! sync with a Cloudinary media store: foreign images are re-hosted, images
//! dropped from a body are deleted, and the body is rewritten to the hosted URLs.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

/// Application layer containing services, use cases and DTOs.
pub mod application;
/// Domain layer containing value types, errors, and port definitions.
pub mod domain;
/// Infrastructure layer containing adapters for external services.
pub mod infrastructure;

/// Current version of the application.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name.
pub const NAME: &str = "pqa-media";
