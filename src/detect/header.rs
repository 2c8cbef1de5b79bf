//! Header parsing
//!
//! Survey exports concatenate a question identifier, the question text and
//! (for grid questions) the first sub-item into a single header cell, e.g.
//! `"A1. Jak oceniasz jakość usług? Uprzejmość personelu"`. This parser
//! recovers the parts. Splitting is biased toward the null hypothesis: a
//! candidate sub-item is only accepted when it is clearly shorter than the
//! remainder, so an ordinary long sentence is never chopped into a false
//! sub-item.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use super::config::DetectionConfig;

/// Leading question identifier: one uppercase letter, digits, an optional
/// lowercase letter and a period, e.g. `A1.`, `B3a.`, `M10.`
static QUESTION_ID_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)^([A-Z]\d+[a-z]?)\.\s*(.+)").unwrap());

/// Parent sentence ending in punctuation, followed by a sub-item starting
/// with an uppercase letter (Polish alphabet included) and at least five
/// further characters
static SUB_ITEM_SPLIT_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)^(.+?[.?!:;])\s+([A-ZĄĆĘŁŃÓŚŹŻ].{5,})$").unwrap());

/// Parsed parts of one raw column header
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeaderParts {
    /// Question identifier, when the header carries one
    pub id: Option<String>,
    /// Display label: either the full header (no identifier) or the
    /// identifier plus the parent question text
    pub label: String,
    /// Inline sub-item label split off the header, when one was accepted
    pub sub_label: Option<String>,
}

/// Parse one raw header string
///
/// Without a recognizable identifier the whole string becomes the label.
/// With one, the remainder is optionally split into parent text and a
/// sub-item; the split is accepted only when the sub-item is shorter than
/// `sub_item_max_share` of the remainder.
pub fn parse_header(header: &str, config: &DetectionConfig) -> HeaderParts {
    let Some(caps) = QUESTION_ID_REGEX.captures(header) else {
        return HeaderParts {
            id: None,
            label: header.to_string(),
            sub_label: None,
        };
    };

    let id = caps[1].to_string();
    let rest = caps[2].trim();

    if let Some(split) = SUB_ITEM_SPLIT_REGEX.captures(rest) {
        let parent = split[1].trim().to_string();
        let sub = split[2].trim().to_string();
        let rest_len = rest.chars().count() as f64;
        if (sub.chars().count() as f64) < rest_len * config.sub_item_max_share {
            return HeaderParts {
                label: format!("{id}. {parent}"),
                id: Some(id),
                sub_label: Some(sub),
            };
        }
    }

    HeaderParts {
        label: format!("{id}. {rest}"),
        id: Some(id),
        sub_label: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(header: &str) -> HeaderParts {
        parse_header(header, &DetectionConfig::default())
    }

    #[test]
    fn test_parse_header_with_sub_item() {
        let parts = parse("A1. Jak oceniasz jakość usług? Uprzejmość personelu");
        assert_eq!(parts.id.as_deref(), Some("A1"));
        assert_eq!(parts.label, "A1. Jak oceniasz jakość usług?");
        assert_eq!(parts.sub_label.as_deref(), Some("Uprzejmość personelu"));
    }

    #[test]
    fn test_parse_header_without_sub_item() {
        let parts = parse("B2a. Czy korzystasz z tej usługi");
        assert_eq!(parts.id.as_deref(), Some("B2a"));
        assert_eq!(parts.label, "B2a. Czy korzystasz z tej usługi");
        assert_eq!(parts.sub_label, None);
    }

    #[test]
    fn test_parse_header_without_identifier() {
        let parts = parse("Miejscowość");
        assert_eq!(parts.id, None);
        assert_eq!(parts.label, "Miejscowość");
        assert_eq!(parts.sub_label, None);
    }

    #[test]
    fn test_identifier_spans_newlines() {
        let parts = parse("C3. Pierwsza linia pytania?\nDruga linia");
        assert_eq!(parts.id.as_deref(), Some("C3"));
        assert_eq!(parts.sub_label.as_deref(), Some("Druga linia"));
    }

    #[test]
    fn test_long_sub_item_candidate_is_rejected() {
        // The candidate after the colon covers nearly the whole remainder,
        // so the split must not be accepted.
        let parts = parse("D1. Uwaga: Proszę ocenić wszystkie wymienione poniżej elementy obsługi");
        assert_eq!(parts.id.as_deref(), Some("D1"));
        assert_eq!(parts.sub_label, None);
        assert!(parts.label.starts_with("D1. Uwaga:"));
    }

    #[test]
    fn test_lowercase_letter_suffix_in_identifier() {
        let parts = parse("M2a. Wiek respondenta");
        assert_eq!(parts.id.as_deref(), Some("M2a"));
    }

    #[test]
    fn test_polish_uppercase_starts_sub_item() {
        let parts = parse("E5. Proszę ocenić. Świeżość produktów");
        assert_eq!(parts.sub_label.as_deref(), Some("Świeżość produktów"));
    }
}
