//! Column signature detection
//!
//! Classifies one column's value sequence into exactly one
//! [`ColumnSignature`]. Rules apply in a fixed order; the first match wins.
//! The ordering is conservative: boolean mention flags and explicit
//! ordinal-code columns are checked before anything could fall through to
//! open text.

use std::collections::{BTreeMap, BTreeSet};

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use super::config::DetectionConfig;

/// Leading `N: label` ordinal code pattern, e.g. `"3: Raczej się zgadzam"`
static LIKERT_PREFIX_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d+)\s*:\s*(.+)").unwrap());

/// Split a raw value into its ordinal code and label, if it carries the
/// `N: label` prefix
pub fn likert_code(value: &str) -> Option<(i64, &str)> {
    let caps = LIKERT_PREFIX_REGEX.captures(value)?;
    let code = caps.get(1)?.as_str().parse::<i64>().ok()?;
    Some((code, caps.get(2)?.as_str().trim()))
}

/// Classification of a single column's value sequence
///
/// A pure function of the column's non-missing value multiset:
/// reordering rows never changes the signature.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ColumnSignature {
    /// No non-missing, non-blank values
    Empty,
    /// Values are a subset of the mentioned / not-mentioned tokens
    MultiChoice,
    /// Ordinal scale with `N: label` coded values
    Likert {
        /// Smallest non-sentinel code (falls back to all codes when every
        /// code is sentinel)
        scale_min: i64,
        /// Largest non-sentinel code (same fallback)
        scale_max: i64,
        /// Label text per observed code
        scale_labels: BTreeMap<i64, String>,
        /// Codes whose labels carry a non-response cue
        sentinel_codes: BTreeSet<i64>,
    },
    /// Plain numeric values
    NumericScale { scale_min: f64, scale_max: f64 },
    /// Low-cardinality categorical values
    SingleChoice {
        /// Sorted distinct categories
        categories: Vec<String>,
    },
    /// High-cardinality free text
    OpenText { distinct_count: usize },
}

impl ColumnSignature {
    /// Stable name of the signature variant
    pub fn variant_name(&self) -> &'static str {
        match self {
            ColumnSignature::Empty => "empty",
            ColumnSignature::MultiChoice => "multiple_choice",
            ColumnSignature::Likert { .. } => "likert",
            ColumnSignature::NumericScale { .. } => "numeric_scale",
            ColumnSignature::SingleChoice { .. } => "single_choice",
            ColumnSignature::OpenText { .. } => "open_text",
        }
    }
}

/// Classify one column's cells
///
/// Rules, first match wins:
/// 1. nothing left after dropping missing and blank values -> `Empty`
/// 2. distinct values ⊆ {mentioned, not mentioned} -> `MultiChoice`
/// 3. more than `likert_prefix_share` of values carry an `N: label`
///    prefix -> `Likert`
/// 4. more than `numeric_share` parse as numbers and no genuine text
///    failures remain -> `NumericScale`
/// 5. more than `open_text_distinct` distinct values -> `OpenText`
/// 6. otherwise -> `SingleChoice`
pub fn detect_column(cells: &[Option<String>], config: &DetectionConfig) -> ColumnSignature {
    let values: Vec<&str> = cells
        .iter()
        .filter_map(|cell| cell.as_deref())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .collect();

    if values.is_empty() {
        return ColumnSignature::Empty;
    }

    let distinct: BTreeSet<&str> = values.iter().copied().collect();
    if distinct
        .iter()
        .all(|v| *v == config.mentioned_token || *v == config.not_mentioned_token)
    {
        return ColumnSignature::MultiChoice;
    }

    let likert_hits = values.iter().filter(|v| likert_code(v).is_some()).count();
    if likert_hits as f64 > values.len() as f64 * config.likert_prefix_share {
        return detect_likert(&values, config);
    }

    let mut numeric_values = Vec::new();
    let mut text_failures = 0usize;
    for value in &values {
        match value.parse::<f64>() {
            Ok(n) => numeric_values.push(n),
            Err(_) => {
                if !config.is_non_response(value) {
                    text_failures += 1;
                }
            }
        }
    }
    if numeric_values.len() as f64 > values.len() as f64 * config.numeric_share
        && text_failures == 0
    {
        let finite = numeric_values.iter().copied().filter(|n| !n.is_nan());
        let scale_min = finite.clone().fold(f64::INFINITY, f64::min);
        let scale_max = finite.fold(f64::NEG_INFINITY, f64::max);
        return ColumnSignature::NumericScale {
            scale_min,
            scale_max,
        };
    }

    if distinct.len() > config.open_text_distinct {
        return ColumnSignature::OpenText {
            distinct_count: distinct.len(),
        };
    }

    ColumnSignature::SingleChoice {
        categories: distinct.into_iter().map(String::from).collect(),
    }
}

fn detect_likert(values: &[&str], config: &DetectionConfig) -> ColumnSignature {
    let mut scale_labels: BTreeMap<i64, String> = BTreeMap::new();
    for value in values {
        if let Some((code, label)) = likert_code(value) {
            scale_labels.insert(code, label.to_string());
        }
    }

    let sentinel_codes: BTreeSet<i64> = scale_labels
        .iter()
        .filter(|(_, label)| config.is_sentinel_label(label))
        .map(|(code, _)| *code)
        .collect();

    let usable: Vec<i64> = scale_labels
        .keys()
        .filter(|code| !sentinel_codes.contains(code))
        .copied()
        .collect();
    let bounds_over = if usable.is_empty() {
        scale_labels.keys().copied().collect()
    } else {
        usable
    };
    let scale_min = bounds_over.iter().copied().min().unwrap_or(0);
    let scale_max = bounds_over.iter().copied().max().unwrap_or(0);

    ColumnSignature::Likert {
        scale_min,
        scale_max,
        scale_labels,
        sentinel_codes,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cells(values: &[&str]) -> Vec<Option<String>> {
        values
            .iter()
            .map(|v| {
                if v.is_empty() {
                    None
                } else {
                    Some(v.to_string())
                }
            })
            .collect()
    }

    #[test]
    fn test_detect_empty() {
        let config = DetectionConfig::default();
        assert_eq!(
            detect_column(&cells(&["", "", ""]), &config),
            ColumnSignature::Empty
        );
        assert_eq!(detect_column(&[None, None], &config), ColumnSignature::Empty);
        assert_eq!(
            detect_column(&[Some("   ".to_string())], &config),
            ColumnSignature::Empty
        );
    }

    #[test]
    fn test_detect_multi_choice() {
        let config = DetectionConfig::default();
        let sig = detect_column(
            &cells(&["MENTIONED", "NOT MENTIONED", "MENTIONED", ""]),
            &config,
        );
        assert_eq!(sig, ColumnSignature::MultiChoice);

        // A single token still counts as multiple choice
        let sig = detect_column(&cells(&["MENTIONED", "MENTIONED"]), &config);
        assert_eq!(sig, ColumnSignature::MultiChoice);
    }

    #[test]
    fn test_detect_likert_with_sentinel() {
        let config = DetectionConfig::default();
        let sig = detect_column(
            &cells(&["1: Tak", "2: Nie", "6: Nie wiem", "1: Tak", "2: Nie"]),
            &config,
        );
        match sig {
            ColumnSignature::Likert {
                scale_min,
                scale_max,
                scale_labels,
                sentinel_codes,
            } => {
                assert_eq!(scale_min, 1);
                assert_eq!(scale_max, 2);
                assert_eq!(sentinel_codes, BTreeSet::from([6]));
                assert_eq!(scale_labels[&1], "Tak");
                assert_eq!(scale_labels[&6], "Nie wiem");
            }
            other => panic!("expected likert, got {other:?}"),
        }
    }

    #[test]
    fn test_likert_all_sentinel_falls_back_to_full_bounds() {
        let config = DetectionConfig::default();
        let sig = detect_column(&cells(&["6: Nie wiem", "7: Odmowa", "6: Nie wiem"]), &config);
        match sig {
            ColumnSignature::Likert {
                scale_min,
                scale_max,
                sentinel_codes,
                ..
            } => {
                assert_eq!((scale_min, scale_max), (6, 7));
                assert_eq!(sentinel_codes, BTreeSet::from([6, 7]));
            }
            other => panic!("expected likert, got {other:?}"),
        }
    }

    #[test]
    fn test_detect_numeric_scale() {
        let config = DetectionConfig::default();
        let sig = detect_column(&cells(&["1", "3.5", "10", "nie wiem", "7"]), &config);
        assert_eq!(
            sig,
            ColumnSignature::NumericScale {
                scale_min: 1.0,
                scale_max: 10.0
            }
        );
    }

    #[test]
    fn test_numeric_vetoed_by_text_failure() {
        let config = DetectionConfig::default();
        // 3 of 4 parse numerically, but "czerwony" is a genuine text value
        let sig = detect_column(&cells(&["1", "2", "3", "czerwony"]), &config);
        assert!(matches!(sig, ColumnSignature::SingleChoice { .. }));
    }

    #[test]
    fn test_detect_open_text() {
        let config = DetectionConfig::default();
        let values: Vec<String> = (0..20).map(|i| format!("odpowiedź {i}")).collect();
        let cells: Vec<Option<String>> = values.into_iter().map(Some).collect();
        assert_eq!(
            detect_column(&cells, &config),
            ColumnSignature::OpenText { distinct_count: 20 }
        );
    }

    #[test]
    fn test_detect_single_choice_sorted_categories() {
        let config = DetectionConfig::default();
        let sig = detect_column(&cells(&["Kobieta", "Mężczyzna", "Kobieta"]), &config);
        assert_eq!(
            sig,
            ColumnSignature::SingleChoice {
                categories: vec!["Kobieta".to_string(), "Mężczyzna".to_string()]
            }
        );
    }

    #[test]
    fn test_signature_is_order_independent() {
        let config = DetectionConfig::default();
        let forward = detect_column(&cells(&["1: Tak", "2: Nie", "6: Nie wiem"]), &config);
        let reverse = detect_column(&cells(&["6: Nie wiem", "2: Nie", "1: Tak"]), &config);
        assert_eq!(forward, reverse);
    }

    #[test]
    fn test_likert_code_parsing() {
        assert_eq!(likert_code("3: Raczej tak"), Some((3, "Raczej tak")));
        assert_eq!(likert_code("12 :  spaced"), Some((12, "spaced")));
        assert_eq!(likert_code("tak"), None);
        assert_eq!(likert_code(": bez kodu"), None);
    }
}
