//! Image extraction, rewriting and reconciliation services.

mod body_rewriter;
mod image_extractor;
mod image_reconciler;

pub use body_rewriter::BodyRewriter;
pub use image_extractor::ImageExtractor;
pub use image_reconciler::{ImageReconciler, ReconcilePlan};
