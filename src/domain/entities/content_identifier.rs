//! Media store content identifier.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Path marker that precedes the stored asset path in a delivery URL.
pub const UPLOAD_MARKER: &str = "/upload/";

static VERSION_SEGMENT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^v\d+/").expect("Invalid regex"));

/// The media store's key for a stored asset (Cloudinary `public_id`).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContentIdentifier(String);

impl ContentIdentifier {
    /// Creates an identifier from a known public id.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Derives the identifier from a delivery URL.
    ///
    /// Strips the query string, everything up to and including `/upload/`, a
    /// leading `v<digits>/` version segment and the file extension. Returns
    /// `None` when the URL has no upload marker or no path after it.
    #[must_use]
    pub fn derive(url: &str) -> Option<Self> {
        let clean = url.split('?').next().unwrap_or(url);
        let (_, path) = clean.split_once(UPLOAD_MARKER)?;
        let path = VERSION_SEGMENT_RE
            .find(path)
            .map_or(path, |m| &path[m.end()..]);

        let id = match path.rfind('.') {
            Some(idx) if idx > 0 => &path[..idx],
            _ => path,
        };

        if id.is_empty() {
            return None;
        }

        Some(Self(id.to_string()))
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ContentIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
