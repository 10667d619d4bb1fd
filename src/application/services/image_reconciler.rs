//! Image reconciliation between a document body and the media store.

use std::sync::Arc;

use futures_util::future::{join, join_all};
use tracing::{debug, info, warn};

use crate::application::dto::{ImageOutcome, ReconciliationResult};
use crate::domain::entities::{AssociationSet, ContentIdentifier, ImageReference, PaperMetadata};
use crate::domain::ports::MediaStorePort;

/// Which references appeared and disappeared between two saves.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconcilePlan {
    /// Referenced before, not anymore.
    pub removed: Vec<ImageReference>,
    /// Newly referenced.
    pub added: Vec<ImageReference>,
}

impl ReconcilePlan {
    /// Diffs the previous association against the current references.
    #[must_use]
    pub fn compute(previous: &AssociationSet, current: &AssociationSet) -> Self {
        Self {
            removed: previous.difference(current),
            added: current.difference(previous),
        }
    }

    /// Returns whether there is nothing to reconcile.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.removed.is_empty() && self.added.is_empty()
    }
}

/// Converges the media store with the images a document references.
///
/// Every deletion and upload of a run is in flight at the same time on the
/// caller's task, and the run returns only once all of them have settled.
/// Individual failures are recorded in the result and never abort siblings.
#[derive(Clone)]
pub struct ImageReconciler {
    media_store: Arc<dyn MediaStorePort>,
}

impl ImageReconciler {
    /// Creates new reconciler.
    #[must_use]
    pub const fn new(media_store: Arc<dyn MediaStorePort>) -> Self {
        Self { media_store }
    }

    /// Deletes images no longer referenced and re-hosts newly referenced ones.
    ///
    /// The returned association is the previous one minus deleted and
    /// unresolvable references, plus re-hosted URLs and the sources of failed
    /// uploads, so a later save retries them.
    pub async fn reconcile(
        &self,
        previous: &AssociationSet,
        current: &AssociationSet,
        metadata: &PaperMetadata,
    ) -> ReconciliationResult {
        let plan = ReconcilePlan::compute(previous, current);

        if plan.is_empty() {
            debug!(images = previous.len(), "No image changes to reconcile");
            return ReconciliationResult::unchanged(previous.clone());
        }

        info!(
            added = plan.added.len(),
            removed = plan.removed.len(),
            "Reconciling document images"
        );

        let mut outcomes = Vec::with_capacity(plan.removed.len() + plan.added.len());
        let mut deletable = Vec::with_capacity(plan.removed.len());

        for reference in &plan.removed {
            if let Some(public_id) = reference.content_identifier() {
                deletable.push((reference, public_id));
            } else {
                warn!(reference = %reference, "Cannot derive public id, skipping deletion");
                outcomes.push(ImageOutcome::Unresolvable {
                    reference: reference.clone(),
                });
            }
        }

        let deletions = join_all(
            deletable
                .into_iter()
                .map(|(reference, public_id)| self.delete_one(reference, public_id)),
        );
        let uploads = join_all(
            plan.added
                .iter()
                .map(|source| self.upload_one(source, metadata)),
        );

        let (deleted, uploaded) = join(deletions, uploads).await;
        outcomes.extend(deleted);
        outcomes.extend(uploaded);

        let association = next_association(previous, &outcomes);
        let result = ReconciliationResult {
            outcomes,
            association,
        };

        let failed = result.failures().count();
        if failed > 0 {
            warn!(
                failed,
                total = result.outcomes.len(),
                "Image reconciliation finished with failures"
            );
        } else {
            info!(
                total = result.outcomes.len(),
                "Image reconciliation finished"
            );
        }

        result
    }

    async fn delete_one(
        &self,
        reference: &ImageReference,
        public_id: ContentIdentifier,
    ) -> ImageOutcome {
        debug!(public_id = %public_id, "Deleting image");

        match self.media_store.delete(&public_id).await {
            Ok(()) => ImageOutcome::Deleted {
                reference: reference.clone(),
                public_id,
            },
            Err(error) => {
                warn!(reference = %reference, public_id = %public_id, error = %error, "Failed to delete image");
                ImageOutcome::DeletionFailed {
                    reference: reference.clone(),
                    public_id,
                    error,
                }
            }
        }
    }

    async fn upload_one(&self, source: &ImageReference, metadata: &PaperMetadata) -> ImageOutcome {
        debug!(reference = %source, "Uploading image by reference");

        match self.media_store.upload_by_reference(source, metadata).await {
            Ok(asset) => {
                debug!(reference = %source, url = %asset.url, "Image re-hosted");
                ImageOutcome::Uploaded {
                    source: source.clone(),
                    asset,
                }
            }
            Err(error) => {
                warn!(reference = %source, error = %error, "Failed to upload image");
                ImageOutcome::UploadFailed {
                    source: source.clone(),
                    error,
                }
            }
        }
    }
}

fn next_association(previous: &AssociationSet, outcomes: &[ImageOutcome]) -> AssociationSet {
    let mut association = previous.clone();

    for outcome in outcomes {
        if let ImageOutcome::Deleted { reference, .. } | ImageOutcome::Unresolvable { reference } =
            outcome
        {
            association.remove(reference);
        }
    }

    // Removals go first so a re-hosted URL equal to a removed one survives.
    for outcome in outcomes {
        match outcome {
            ImageOutcome::Uploaded { asset, .. } => {
                association.insert(asset.url.clone());
            }
            ImageOutcome::UploadFailed { source, .. } => {
                association.insert(source.clone());
            }
            _ => {}
        }
    }

    association
}
