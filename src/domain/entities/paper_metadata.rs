//! Descriptive metadata of the paper a document belongs to.

use serde::{Deserialize, Serialize};

/// Paper information attached to stored assets as tags and context.
///
/// Never used for lookups; every field may be empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PaperMetadata {
    /// Subject name.
    pub subject: String,
    /// Examining authority.
    pub authority: String,
    /// Course.
    pub course: String,
    /// Field of study.
    pub field: String,
    /// Term.
    pub term: String,
    /// Season.
    pub season: String,
    /// Paper set.
    pub set: String,
    /// Year.
    pub year: String,
}

impl PaperMetadata {
    /// Key/value pairs in the order they are written to asset context.
    #[must_use]
    pub fn context_entries(&self) -> [(&'static str, &str); 8] {
        [
            ("authority", self.authority.as_str()),
            ("field", self.field.as_str()),
            ("course", self.course.as_str()),
            ("season", self.season.as_str()),
            ("term", self.term.as_str()),
            ("set", self.set.as_str()),
            ("subject", self.subject.as_str()),
            ("year", self.year.as_str()),
        ]
    }

    /// Non-empty values in tag order.
    #[must_use]
    pub fn tags(&self) -> Vec<&str> {
        [
            &self.field,
            &self.course,
            &self.authority,
            &self.season,
            &self.term,
            &self.set,
            &self.subject,
            &self.year,
        ]
        .into_iter()
        .map(|v| v.trim())
        .filter(|v| !v.is_empty())
        .collect()
    }
}
