//! Image reference value object.

use std::borrow::Borrow;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::ContentIdentifier;

/// URL of an image as it appears inside a document body.
///
/// Comparison is exact-string: two URLs that differ only by casing, a trailing
/// slash or a query parameter are distinct references.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ImageReference(String);

impl ImageReference {
    /// Creates a reference from a raw URL.
    #[must_use]
    pub fn new(url: impl Into<String>) -> Self {
        Self(url.into())
    }

    /// Returns the URL as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the reference and returns the inner URL.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }

    /// Derives the media store identifier for this reference.
    #[must_use]
    pub fn content_identifier(&self) -> Option<ContentIdentifier> {
        ContentIdentifier::derive(&self.0)
    }
}

impl fmt::Display for ImageReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ImageReference {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for ImageReference {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ImageReference {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for ImageReference {
    fn from(value: String) -> Self {
        Self(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_string_equality() {
        let a = ImageReference::new("https://cdn/x.jpg");
        let b = ImageReference::new("https://cdn/x.jpg?w=100");
        let c = ImageReference::new("HTTPS://cdn/x.jpg");

        assert_ne!(a, b);
        assert_ne!(a, c);
        assert_eq!(a, ImageReference::from("https://cdn/x.jpg"));
    }

    #[test]
    fn test_serializes_as_plain_string() {
        let reference = ImageReference::new("https://cdn/x.jpg");
        let json = serde_json::to_string(&reference).unwrap();
        assert_eq!(json, "\"https://cdn/x.jpg\"");
    }
}
