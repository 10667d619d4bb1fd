//! Infrastructure layer with external service adapters.

/// Cloudinary media store.
pub mod cloudinary;
/// Application configuration.
pub mod config;
/// File-backed document persistence.
pub mod document_store;

pub use cloudinary::{ApiSecret, CloudinaryClient, CloudinaryCredentials};
pub use config::{
    AppConfig, CliArgs, Command, ConfigError, ConfigOrigin, LogLevel, StorageManager,
};
pub use document_store::FileDocumentStore;
