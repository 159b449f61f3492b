//! Fingerprint normalization and barcode parsing.
//!
//! Scanned codes look like `OPENPGP4FPR:<fingerprint>?<query>#<fragment>`.
//! Typed input is whatever the user pasted into the text box, usually with
//! grouping spaces.
//!
//! ```text
//! "openpgp4fpr: ABCD 1234?MAC=ff#MAC=00"
//!   -> strip whitespace   "openpgp4fpr:ABCD1234?MAC=ff#MAC=00"
//!   -> strip prefix       "ABCD1234?MAC=ff#MAC=00"
//!   -> split              path "ABCD1234", query "MAC=ff", fragment "MAC=00"
//!   -> merge attributes   query first, then fragment (fragment wins)
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Scheme prefix used by OpenPGP fingerprint barcodes.
pub const FPR_PREFIX: &str = "OPENPGP4FPR:";

/// Attribute carrying the authentication code in a scanned barcode.
pub const MAC_ATTRIBUTE: &str = "MAC";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FingerprintError {
    /// Nothing was left after normalization.
    #[error("malformed fingerprint: {input:?}")]
    MalformedFingerprint { input: String },
}

/// Result of parsing a decoded barcode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedBarcode {
    pub fingerprint: String,
    #[serde(default)]
    pub attributes: BTreeMap<String, Vec<String>>,
}

impl ParsedBarcode {
    /// A barcode carrying only a fingerprint.
    pub fn from_fingerprint(fingerprint: impl Into<String>) -> Self {
        Self {
            fingerprint: fingerprint.into(),
            attributes: BTreeMap::new(),
        }
    }

    /// First value of the given attribute, if any.
    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes
            .get(key)
            .and_then(|values| values.first())
            .map(String::as_str)
    }

    /// Authentication code transferred alongside the fingerprint.
    pub fn mac(&self) -> Option<&str> {
        self.attribute(MAC_ATTRIBUTE)
    }
}

/// Removes all whitespace and a leading `OPENPGP4FPR:` (any case).
pub fn strip_fingerprint(input: &str) -> String {
    let cleaned: String = input.split_whitespace().collect();

    let has_prefix = cleaned
        .get(..FPR_PREFIX.len())
        .is_some_and(|head| head.eq_ignore_ascii_case(FPR_PREFIX));

    if has_prefix {
        cleaned[FPR_PREFIX.len()..].to_string()
    } else {
        cleaned
    }
}

/// Normalizes a fingerprint typed by the user.
pub fn normalize_typed(raw_text: &str) -> Result<String, FingerprintError> {
    let cleaned = strip_fingerprint(raw_text);
    if cleaned.is_empty() {
        return Err(FingerprintError::MalformedFingerprint {
            input: raw_text.to_string(),
        });
    }
    tracing::debug!(fingerprint = %cleaned, "normalized typed fingerprint");
    Ok(cleaned)
}

/// Parses the text of a decoded barcode.
///
/// The path component becomes the fingerprint. Query and fragment pairs are
/// merged into `attributes`; on a key collision the fragment's values replace
/// the query's.
pub fn parse_barcode(raw_text: &str) -> Result<ParsedBarcode, FingerprintError> {
    let cleaned = strip_fingerprint(raw_text);

    let (before_fragment, fragment) = match cleaned.split_once('#') {
        Some((head, fragment)) => (head, Some(fragment)),
        None => (cleaned.as_str(), None),
    };
    let (path, query) = match before_fragment.split_once('?') {
        Some((path, query)) => (path, Some(query)),
        None => (before_fragment, None),
    };

    if path.is_empty() {
        return Err(FingerprintError::MalformedFingerprint {
            input: raw_text.to_string(),
        });
    }

    let mut attributes = query.map(parse_pairs).unwrap_or_default();
    if let Some(fragment) = fragment {
        attributes.extend(parse_pairs(fragment));
    }

    let parsed = ParsedBarcode {
        fingerprint: path.to_string(),
        attributes,
    };
    tracing::debug!(raw = %raw_text, parsed = ?parsed, "parsed barcode");
    Ok(parsed)
}

/// Form-urlencoded pairs; blank values and bare keys are dropped.
fn parse_pairs(input: &str) -> BTreeMap<String, Vec<String>> {
    let mut pairs: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for (key, value) in url::form_urlencoded::parse(input.as_bytes()) {
        if value.is_empty() {
            continue;
        }
        pairs
            .entry(key.into_owned())
            .or_default()
            .push(value.into_owned());
    }
    pairs
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strip_fingerprint_removes_prefix_in_any_case() {
        assert_eq!(strip_fingerprint("OpenPGP4Fpr: ABCD 1234"), "ABCD1234");
        assert_eq!(strip_fingerprint("openpgp4fpr:abcd"), "abcd");
        assert_eq!(strip_fingerprint("OPENPGP4FPR:ABCD"), "ABCD");
    }

    #[test]
    fn strip_fingerprint_keeps_text_without_prefix() {
        assert_eq!(strip_fingerprint(" 0123 4567\n89AB\t"), "0123456789AB");
        assert_eq!(strip_fingerprint("OPENPGP"), "OPENPGP");
    }

    #[test]
    fn normalize_typed_rejects_whitespace_only_input() {
        for input in ["", " ", "\n\t  ", "\u{2003}"] {
            let err = normalize_typed(input).unwrap_err();
            assert!(matches!(err, FingerprintError::MalformedFingerprint { .. }));
        }
    }

    #[test]
    fn normalize_typed_rejects_bare_prefix() {
        assert!(normalize_typed("openpgp4fpr: ").is_err());
    }

    #[test]
    fn parse_barcode_extracts_fingerprint() {
        let parsed = parse_barcode("OpenPGP4Fpr: ABCD 1234").unwrap();
        assert_eq!(parsed.fingerprint, "ABCD1234");
        assert!(parsed.attributes.is_empty());
        assert_eq!(parsed.mac(), None);
    }

    #[test]
    fn parse_barcode_collects_query_attributes() {
        let parsed = parse_barcode("OPENPGP4FPR:ABCD?MAC=ff00&foo=a&foo=b").unwrap();
        assert_eq!(parsed.fingerprint, "ABCD");
        assert_eq!(parsed.mac(), Some("ff00"));
        assert_eq!(
            parsed.attributes.get("foo"),
            Some(&vec!["a".to_string(), "b".to_string()])
        );
    }

    #[test]
    fn parse_barcode_fragment_overrides_query() {
        let parsed = parse_barcode("OPENPGP4FPR:ABCD?MAC=query&q=1#MAC=fragment").unwrap();
        assert_eq!(parsed.mac(), Some("fragment"));
        assert_eq!(parsed.attributes.get("MAC").map(Vec::len), Some(1));
        assert_eq!(parsed.attribute("q"), Some("1"));
    }

    #[test]
    fn parse_barcode_decodes_escapes_and_drops_blank_values() {
        let parsed = parse_barcode("OPENPGP4FPR:ABCD?name=a%2Bb&empty=&bare").unwrap();
        assert_eq!(parsed.attribute("name"), Some("a+b"));
        assert!(!parsed.attributes.contains_key("empty"));
        assert!(!parsed.attributes.contains_key("bare"));
    }

    #[test]
    fn parse_barcode_question_mark_inside_fragment_is_not_a_query() {
        let parsed = parse_barcode("OPENPGP4FPR:ABCD#MAC=x?y=z").unwrap();
        assert_eq!(parsed.fingerprint, "ABCD");
        assert_eq!(parsed.mac(), Some("x?y=z"));
    }

    #[test]
    fn parse_barcode_without_fingerprint_fails() {
        assert!(parse_barcode("OPENPGP4FPR:?MAC=ff").is_err());
        assert!(parse_barcode("   ").is_err());
    }
}
