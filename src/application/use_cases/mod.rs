//! Use case implementations.

mod save_document_use_case;

pub use save_document_use_case::SaveDocumentUseCase;
