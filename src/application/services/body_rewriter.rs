//! Rewrites image URLs inside a document body.

use std::ops::Range;

use super::image_extractor::{encode_attribute, source_attributes};
use crate::domain::entities::ImageReference;

/// Characters that can continue a URL, so a match touching one of them is part
/// of a longer URL.
const URL_CHARS: &str = "-._~:/?#@!$&*+,;=%";

struct Edit {
    range: Range<usize>,
    text: String,
}

/// Replaces re-hosted image URLs in HTML bodies.
pub struct BodyRewriter;

impl BodyRewriter {
    /// Replaces every occurrence of each old URL with its new URL.
    ///
    /// `<img src>` values are compared after decoding character references and
    /// re-encoded for their quoting. Anywhere else an old URL is replaced,
    /// raw or attribute-escaped, only where it stands as a whole URL: a longer
    /// URL that merely starts or ends with it is left alone.
    #[must_use]
    pub fn rewrite<'a, I>(body: &str, pairs: I) -> String
    where
        I: IntoIterator<Item = (&'a ImageReference, &'a ImageReference)>,
    {
        let pairs: Vec<_> = pairs
            .into_iter()
            .filter(|(old, new)| old != new && !old.as_str().is_empty())
            .collect();
        if pairs.is_empty() {
            return body.to_string();
        }

        let mut edits: Vec<Edit> = Vec::new();

        for attr in source_attributes(body) {
            if let Some((_, new)) = pairs.iter().find(|(old, _)| old.as_str() == attr.value) {
                edits.push(Edit {
                    range: attr.span,
                    text: attr.quote.encode(new.as_str()),
                });
            }
        }

        for (old, new) in &pairs {
            let escaped_old = encode_attribute(old.as_str());
            let mut forms = vec![(old.as_str().to_string(), new.as_str().to_string())];
            if escaped_old != old.as_str() {
                forms.push((escaped_old, encode_attribute(new.as_str())));
            }

            for (needle, replacement) in forms {
                for (start, _) in body.match_indices(needle.as_str()) {
                    let range = start..start + needle.len();
                    if !stands_alone(body, &range)
                        || edits.iter().any(|edit| overlaps(&edit.range, &range))
                    {
                        continue;
                    }
                    edits.push(Edit {
                        range,
                        text: replacement.clone(),
                    });
                }
            }
        }

        edits.sort_by_key(|edit| edit.range.start);

        let mut rewritten = String::with_capacity(body.len());
        let mut cursor = 0;
        for edit in edits {
            rewritten.push_str(&body[cursor..edit.range.start]);
            rewritten.push_str(&edit.text);
            cursor = edit.range.end;
        }
        rewritten.push_str(&body[cursor..]);

        rewritten
    }
}

fn is_url_char(c: char) -> bool {
    c.is_alphanumeric() || URL_CHARS.contains(c)
}

fn stands_alone(body: &str, range: &Range<usize>) -> bool {
    let before = body[..range.start].chars().next_back();
    let after = body[range.end..].chars().next();

    !before.is_some_and(is_url_char) && !after.is_some_and(is_url_char)
}

const fn overlaps(a: &Range<usize>, b: &Range<usize>) -> bool {
    a.start < b.end && b.start < a.end
}
