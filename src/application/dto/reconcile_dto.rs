//! Reconciliation outcome DTOs.

use crate::application::services::BodyRewriter;
use crate::domain::entities::{AssociationSet, ContentIdentifier, ImageReference, UploadedAsset};
use crate::domain::errors::MediaError;

/// Result of one image operation issued during a reconciliation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageOutcome {
    /// A newly referenced image was re-hosted by the media store.
    Uploaded {
        /// Reference found in the body.
        source: ImageReference,
        /// Store copy that replaces it.
        asset: UploadedAsset,
    },
    /// The upload of a newly referenced image failed.
    UploadFailed {
        /// Reference left in the body.
        source: ImageReference,
        /// Cause.
        error: MediaError,
    },
    /// A no longer referenced image was removed from the store.
    Deleted {
        /// Removed reference.
        reference: ImageReference,
        /// Store key that was deleted.
        public_id: ContentIdentifier,
    },
    /// The store did not confirm a deletion.
    DeletionFailed {
        /// Reference kept in the association set.
        reference: ImageReference,
        /// Store key of the asset.
        public_id: ContentIdentifier,
        /// Cause.
        error: MediaError,
    },
    /// No store key could be derived, so no deletion was attempted.
    Unresolvable {
        /// Reference that does not follow the store's URL layout.
        reference: ImageReference,
    },
}

impl ImageOutcome {
    /// Returns whether the operation did not take effect.
    #[must_use]
    pub const fn is_failure(&self) -> bool {
        matches!(
            self,
            Self::UploadFailed { .. } | Self::DeletionFailed { .. } | Self::Unresolvable { .. }
        )
    }

    /// Returns the media store error of a failed request.
    #[must_use]
    pub const fn error(&self) -> Option<&MediaError> {
        match self {
            Self::UploadFailed { error, .. } | Self::DeletionFailed { error, .. } => Some(error),
            _ => None,
        }
    }

    /// Returns the document reference this outcome is about.
    #[must_use]
    pub const fn reference(&self) -> &ImageReference {
        match self {
            Self::Uploaded { source, .. } | Self::UploadFailed { source, .. } => source,
            Self::Deleted { reference, .. }
            | Self::DeletionFailed { reference, .. }
            | Self::Unresolvable { reference } => reference,
        }
    }
}

/// Everything a reconciliation run produced.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconciliationResult {
    /// Per-image outcomes, deletions first, each group in reference order.
    pub outcomes: Vec<ImageOutcome>,
    /// Images owned by the document after this run.
    pub association: AssociationSet,
}

impl ReconciliationResult {
    /// Creates a result that changed nothing.
    #[must_use]
    pub fn unchanged(association: AssociationSet) -> Self {
        Self {
            outcomes: Vec::new(),
            association,
        }
    }

    /// Successfully re-hosted `(old, new)` reference pairs.
    pub fn uploaded_pairs(&self) -> impl Iterator<Item = (&ImageReference, &ImageReference)> {
        self.outcomes.iter().filter_map(|outcome| match outcome {
            ImageOutcome::Uploaded { source, asset } => Some((source, &asset.url)),
            _ => None,
        })
    }

    /// References whose assets were deleted.
    pub fn deleted_references(&self) -> impl Iterator<Item = &ImageReference> {
        self.outcomes.iter().filter_map(|outcome| match outcome {
            ImageOutcome::Deleted { reference, .. } => Some(reference),
            _ => None,
        })
    }

    /// Outcomes of operations that did not take effect.
    pub fn failures(&self) -> impl Iterator<Item = &ImageOutcome> {
        self.outcomes.iter().filter(|outcome| outcome.is_failure())
    }

    /// Returns whether any operation did not take effect.
    #[must_use]
    pub fn has_failures(&self) -> bool {
        self.failures().next().is_some()
    }

    /// Returns whether some request failed in a way the next save will not
    /// fix on its own, such as a rejected file or missing credentials.
    #[must_use]
    pub fn needs_attention(&self) -> bool {
        self.outcomes
            .iter()
            .filter_map(ImageOutcome::error)
            .any(|error| !error.is_recoverable())
    }

    /// Returns whether no operation was issued.
    #[must_use]
    pub fn is_noop(&self) -> bool {
        self.outcomes.is_empty()
    }

    /// Applies the upload rewrites to a document body.
    #[must_use]
    pub fn rewrite_body(&self, body: &str) -> String {
        BodyRewriter::rewrite(body, self.uploaded_pairs())
    }
}
