//! Data transfer objects for the application layer.

mod reconcile_dto;
mod save_dto;

pub use reconcile_dto::{ImageOutcome, ReconciliationResult};
pub use save_dto::{SaveRequest, SaveResponse};
