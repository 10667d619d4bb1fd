mod document_store_port;
mod media_store_port;

pub use document_store_port::DocumentStorePort;
pub use media_store_port::MediaStorePort;

#[cfg(test)]
pub use document_store_port::MockDocumentStorePort;
