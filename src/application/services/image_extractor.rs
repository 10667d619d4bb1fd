use std::ops::Range;
use std::sync::LazyLock;

use regex::{Captures, Regex};

use crate::domain::entities::{AssociationSet, ImageReference};

static IMG_SRC_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?i)<img\b(?:[^>"']|"[^"]*"|'[^']*')*?\ssrc\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s"'<>`]+))(?:[^>"']|"[^"]*"|'[^']*')*>"#,
    )
    .expect("Invalid regex")
});

static CHAR_REF_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"&(?:#([0-9]{1,7})|#[xX]([0-9a-fA-F]{1,6})|(amp|lt|gt|quot|apos));")
        .expect("Invalid regex")
});

const COMMENT_OPEN: &str = "<!--";
const COMMENT_CLOSE: &str = "-->";

/// How an attribute value is delimited in the markup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Quote {
    Double,
    Single,
    Bare,
}

impl Quote {
    /// Encodes `value` so it can stand in for the original attribute value.
    pub(crate) fn encode(self, value: &str) -> String {
        match self {
            Self::Double => encode_attribute(value),
            Self::Single => value.replace('&', "&amp;").replace('\'', "&#39;"),
            Self::Bare if value.contains(|c: char| c.is_whitespace() || "\"'<>`=".contains(c)) => {
                format!("\"{}\"", encode_attribute(value))
            }
            Self::Bare => value.replace('&', "&amp;"),
        }
    }
}

/// A `src` attribute value of an `<img>` element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct SourceAttribute {
    /// Byte range of the raw value in the markup, quotes excluded.
    pub span: Range<usize>,
    pub quote: Quote,
    /// Value with character references decoded and whitespace trimmed.
    pub value: String,
}

/// Finds image sources in HTML fragments.
pub struct ImageExtractor;

impl ImageExtractor {
    /// Returns the `src` of every `<img>` element in document order, duplicates
    /// included.
    ///
    /// Parsing is permissive: tags that are never closed, elements without a
    /// non-empty `src`, elements inside comments, and input that is not HTML
    /// all contribute nothing.
    #[must_use]
    pub fn extract(html: &str) -> Vec<ImageReference> {
        source_attributes(html)
            .into_iter()
            .filter(|attr| !attr.value.is_empty())
            .map(|attr| ImageReference::new(attr.value))
            .collect()
    }

    /// Returns the distinct image sources of a fragment.
    #[must_use]
    pub fn extract_set(html: &str) -> AssociationSet {
        Self::extract(html).into_iter().collect()
    }
}

/// Scans `html` for `<img src>` values outside comments, in document order.
pub(crate) fn source_attributes(html: &str) -> Vec<SourceAttribute> {
    let mut attributes = Vec::new();

    for (offset, segment) in uncommented_segments(html) {
        for cap in IMG_SRC_RE.captures_iter(segment) {
            let (m, quote) = match (cap.get(1), cap.get(2), cap.get(3)) {
                (Some(m), _, _) => (m, Quote::Double),
                (_, Some(m), _) => (m, Quote::Single),
                (_, _, Some(m)) => (m, Quote::Bare),
                _ => continue,
            };

            attributes.push(SourceAttribute {
                span: offset + m.start()..offset + m.end(),
                quote,
                value: decode_entities(m.as_str().trim()),
            });
        }
    }

    attributes
}

/// Splits `html` around `<!-- ... -->` spans. An unterminated comment runs to
/// the end of the input.
fn uncommented_segments(html: &str) -> Vec<(usize, &str)> {
    let mut segments = Vec::new();
    let mut offset = 0;

    while let Some(open) = html[offset..].find(COMMENT_OPEN) {
        let start = offset + open;
        segments.push((offset, &html[offset..start]));

        let body = start + COMMENT_OPEN.len();
        match html[body..].find(COMMENT_CLOSE) {
            Some(close) => offset = body + close + COMMENT_CLOSE.len(),
            None => return segments,
        }
    }

    segments.push((offset, &html[offset..]));
    segments
}

/// Decodes named and numeric character references in one pass, so `&amp;#38;`
/// stays `&#38;`.
fn decode_entities(value: &str) -> String {
    if !value.contains('&') {
        return value.to_string();
    }

    CHAR_REF_RE
        .replace_all(value, |cap: &Captures<'_>| {
            let decoded = if let Some(dec) = cap.get(1) {
                dec.as_str().parse().ok().and_then(char::from_u32)
            } else if let Some(hex) = cap.get(2) {
                u32::from_str_radix(hex.as_str(), 16)
                    .ok()
                    .and_then(char::from_u32)
            } else {
                match cap.get(3).map(|m| m.as_str()) {
                    Some("amp") => Some('&'),
                    Some("lt") => Some('<'),
                    Some("gt") => Some('>'),
                    Some("quot") => Some('"'),
                    Some("apos") => Some('\''),
                    _ => None,
                }
            };

            decoded
                .filter(|c| *c != '\0')
                .map_or_else(|| cap[0].to_string(), String::from)
        })
        .into_owned()
}

/// Escapes a value the way it appears inside a double-quoted attribute.
pub(crate) fn encode_attribute(value: &str) -> String {
    value.replace('&', "&amp;").replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    fn urls(html: &str) -> Vec<String> {
        ImageExtractor::extract(html)
            .into_iter()
            .map(ImageReference::into_inner)
            .collect()
    }

    #[test]
    fn test_document_order_with_duplicates() {
        let html = r#"<p><img src="https://a.com/1.png"></p>
            <img alt="x" src='https://b.com/2.jpg' />
            <img src="https://a.com/1.png">"#;

        assert_eq!(
            urls(html),
            vec![
                "https://a.com/1.png",
                "https://b.com/2.jpg",
                "https://a.com/1.png"
            ]
        );
    }

    #[test]
    fn test_unquoted_and_uppercase() {
        let html = "<IMG SRC=https://a.com/1.png width=10>";
        assert_eq!(urls(html), vec!["https://a.com/1.png"]);
    }

    #[test]
    fn test_data_src_is_not_src() {
        let html = r#"<img data-src="https://lazy.com/x.png" src="https://a.com/1.png">"#;
        assert_eq!(urls(html), vec!["https://a.com/1.png"]);
    }

    #[test_case(r#"<img alt="x > y" src="https://cdn/upload/v1/keep.jpg">"# ; "gt_in_double_quoted_alt")]
    #[test_case(r#"<img alt='a > b' src="https://cdn/upload/v1/keep.jpg">"# ; "gt_in_single_quoted_alt")]
    #[test_case(r#"<img title="<b>" alt="x" src="https://cdn/upload/v1/keep.jpg" data-note="1 > 0">"# ; "gt_before_and_after_src")]
    fn test_angle_bracket_in_other_attribute(html: &str) {
        assert_eq!(urls(html), vec!["https://cdn/upload/v1/keep.jpg"]);
    }

    #[test]
    fn test_src_text_inside_other_attribute_is_ignored() {
        let html = r#"<img alt="see src=https://x.com/no.png" src="https://a.com/1.png">"#;
        assert_eq!(urls(html), vec!["https://a.com/1.png"]);
    }

    #[test_case(r#"<img src="https://a.com/i.png?w=1&amp;h=2">"# ; "named")]
    #[test_case(r#"<img src="https://a.com/i.png?w=1&#38;h=2">"# ; "decimal")]
    #[test_case(r#"<img src="https://a.com/i.png?w=1&#x26;h=2">"# ; "hex")]
    #[test_case(r#"<img src="https://a.com/i.png?w=1&#X26;h=2">"# ; "hex_upper")]
    fn test_entities_are_decoded(html: &str) {
        assert_eq!(urls(html), vec!["https://a.com/i.png?w=1&h=2"]);
    }

    #[test]
    fn test_entities_decode_once() {
        let html = r#"<img src="https://a.com/i.png?q=&amp;#38;">"#;
        assert_eq!(urls(html), vec!["https://a.com/i.png?q=&#38;"]);
    }

    #[test]
    fn test_unknown_reference_is_kept() {
        let html = r#"<img src="https://a.com/i.png?a=1&copy=2&#xFFFFFF;">"#;
        assert_eq!(urls(html), vec!["https://a.com/i.png?a=1&copy=2&#xFFFFFF;"]);
    }

    #[test]
    fn test_multiline_tag() {
        let html = "<img\n  class=\"wide\"\n  src=\"https://a.com/1.png\"\n>";
        assert_eq!(urls(html), vec!["https://a.com/1.png"]);
    }

    #[test]
    fn test_commented_out_image_is_skipped() {
        let html = r#"<img src="https://a.com/1.png"><!-- <img src="https://f.com/c.png"> --><img src="https://a.com/2.png">"#;
        assert_eq!(urls(html), vec!["https://a.com/1.png", "https://a.com/2.png"]);
    }

    #[test_case("" ; "empty")]
    #[test_case("<p>no images</p>" ; "no_images")]
    #[test_case("<img src=" ; "truncated_tag")]
    #[test_case("<img src=\"https://a.com/1.png\"" ; "unclosed_tag")]
    #[test_case("<img alt=\"nothing\">" ; "missing_src")]
    #[test_case("<img src=\"\">" ; "empty_src")]
    #[test_case("just plain text https://a.com/1.png" ; "not_html")]
    #[test_case("<imgur src=\"https://a.com/1.png\">" ; "other_element")]
    #[test_case("<!-- <img src=\"https://f.com/c.png\">" ; "unterminated_comment")]
    fn test_yields_nothing(html: &str) {
        assert!(ImageExtractor::extract(html).is_empty());
    }

    #[test]
    fn test_extract_set_collapses_duplicates() {
        let html = r#"<img src="a.png"><img src="a.png"><img src="b.png">"#;
        assert_eq!(ImageExtractor::extract_set(html).len(), 2);
    }

    #[test]
    fn test_source_spans_point_at_raw_values() {
        let html = r#"<!-- x --><img src='b.png'><img src=c.png>"#;
        let attrs = source_attributes(html);

        let raw: Vec<(&str, Quote)> = attrs
            .iter()
            .map(|a| (&html[a.span.clone()], a.quote))
            .collect();
        assert_eq!(raw, vec![("b.png", Quote::Single), ("c.png", Quote::Bare)]);
    }

    #[test]
    fn test_encode_attribute() {
        assert_eq!(encode_attribute("a.png?w=1&h=2"), "a.png?w=1&amp;h=2");
    }

    #[test]
    fn test_quote_encoding() {
        assert_eq!(Quote::Double.encode("a?x=1&y=\"2\""), "a?x=1&amp;y=&quot;2&quot;");
        assert_eq!(Quote::Single.encode("it's&"), "it&#39;s&amp;");
        assert_eq!(Quote::Bare.encode("https://cdn/a.png"), "https://cdn/a.png");
        assert_eq!(Quote::Bare.encode("a b.png"), "\"a b.png\"");
    }
}
