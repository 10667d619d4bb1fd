//! Set of image references owned by a document.

use std::collections::BTreeSet;
use std::collections::btree_set;

use serde::{Deserialize, Serialize};

use super::ImageReference;

/// Image references considered to belong to a document as of its last save.
///
/// Serialized as a sorted JSON array without duplicates.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AssociationSet(BTreeSet<ImageReference>);

impl AssociationSet {
    /// Creates an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if the reference is part of the set.
    #[must_use]
    pub fn contains(&self, reference: &ImageReference) -> bool {
        self.0.contains(reference)
    }

    /// Adds a reference. Returns false if it was already present.
    pub fn insert(&mut self, reference: ImageReference) -> bool {
        self.0.insert(reference)
    }

    /// Removes a reference. Returns false if it was not present.
    pub fn remove(&mut self, reference: &ImageReference) -> bool {
        self.0.remove(reference)
    }

    /// References in `self` that are not in `other`, in sorted order.
    #[must_use]
    pub fn difference(&self, other: &Self) -> Vec<ImageReference> {
        self.0.difference(&other.0).cloned().collect()
    }

    /// References present in both sets.
    #[must_use]
    pub fn intersection(&self, other: &Self) -> Self {
        self.0.intersection(&other.0).cloned().collect()
    }

    /// Returns the number of references.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if the set is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates over references in sorted order.
    pub fn iter(&self) -> btree_set::Iter<'_, ImageReference> {
        self.0.iter()
    }
}

impl FromIterator<ImageReference> for AssociationSet {
    fn from_iter<I: IntoIterator<Item = ImageReference>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl Extend<ImageReference> for AssociationSet {
    fn extend<I: IntoIterator<Item = ImageReference>>(&mut self, iter: I) {
        self.0.extend(iter);
    }
}

impl IntoIterator for AssociationSet {
    type Item = ImageReference;
    type IntoIter = btree_set::IntoIter<ImageReference>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a AssociationSet {
    type Item = &'a ImageReference;
    type IntoIter = btree_set::Iter<'a, ImageReference>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
