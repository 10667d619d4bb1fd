//! Text fields sent with every upload.

use chrono::{DateTime, SecondsFormat, Utc};

use crate::domain::entities::PaperMetadata;

const IMAGE_LABEL: &str = "qa-image";

/// Builds the `context` field: `key=value` pairs joined by `|`.
#[must_use]
pub fn context_value(metadata: &PaperMetadata, timestamp: DateTime<Utc>) -> String {
    let mut entries = vec![
        format!("caption={IMAGE_LABEL}"),
        format!("alt={IMAGE_LABEL}"),
    ];

    entries.extend(
        metadata
            .context_entries()
            .into_iter()
            .map(|(key, value)| format!("{key}={}", escape_context(value.trim()))),
    );

    entries.push(format!(
        "timestamp={}",
        escape_context(&timestamp.to_rfc3339_opts(SecondsFormat::Millis, true))
    ));

    entries.join("|")
}

/// Builds the comma separated `tags` field, or `None` without any tag.
#[must_use]
pub fn tags_value(metadata: &PaperMetadata) -> Option<String> {
    let tags: Vec<String> = metadata
        .tags()
        .into_iter()
        .map(|tag| tag.replace(',', " "))
        .collect();

    if tags.is_empty() {
        None
    } else {
        Some(tags.join(","))
    }
}

/// Context values must escape the pair and entry separators.
fn escape_context(value: &str) -> String {
    value.replace('|', "\\|").replace('=', "\\=")
}
