//! Application layer with services, use cases and DTOs.

/// Data transfer objects.
pub mod dto;
/// Stateless services over document bodies and the media store.
pub mod services;
/// Use case implementations.
pub mod use_cases;

pub use dto::{ImageOutcome, ReconciliationResult, SaveRequest, SaveResponse};
pub use services::{BodyRewriter, ImageExtractor, ImageReconciler, ReconcilePlan};
pub use use_cases::SaveDocumentUseCase;
