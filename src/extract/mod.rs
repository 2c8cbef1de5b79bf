//! Group data extraction
//!
//! Turns one [`QuestionGroup`]'s raw member columns into parsed numeric
//! columns ready for the statistics layer. The parsing rule follows the
//! group's type tag:
//!
//! - **Likert** - strip the leading `code:` prefix and keep the code;
//!   sentinel codes become missing
//! - **Numeric scale** - parse directly; non-response phrases become
//!   missing
//! - **Multiple choice** - mentioned token -> 1, anything else -> 0
//!
//! Single-choice and open-text groups are categorical; read their raw
//! column from the [`Dataset`] and feed it to
//! [`frequency_table`](crate::stats::frequency_table) instead.

use tracing::{debug, warn};

use crate::dataset::Dataset;
use crate::detect::{DetectionConfig, likert_code};
use crate::group::{QuestionGroup, QuestionType};

/// Header names recognized as the respondent weight column
const WEIGHT_HEADERS: [&str; 3] = ["waga", "weight", "wagi"];

/// Parsed numeric view of one question group
#[derive(Debug, Clone, PartialEq)]
pub struct GroupData {
    /// Per-member labels, aligned with `columns`
    pub labels: Vec<String>,
    /// Parsed member columns; `None` marks a missing or suppressed value
    pub columns: Vec<Vec<Option<f64>>>,
    /// Per-respondent weights, when a weight column was requested and found
    pub weights: Option<Vec<f64>>,
}

impl GroupData {
    /// Number of respondents
    pub fn row_count(&self) -> usize {
        self.columns.first().map_or(0, Vec::len)
    }

    /// Number of member columns
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }
}

/// Parse a raw Likert cell into its numeric code
///
/// Accepts either a `code: label` value or a bare number; non-response
/// phrases and unparseable text become `None`. Sentinel suppression is
/// applied per group in [`extract_group_data`], not here.
pub fn parse_likert_value(raw: &str, config: &DetectionConfig) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    if let Some((code, _)) = likert_code(trimmed) {
        return Some(code as f64);
    }
    if config.is_non_response(trimmed) {
        return None;
    }
    trimmed.parse::<f64>().ok()
}

/// Parse a raw numeric cell
///
/// Non-response phrases and unparseable text become `None`.
pub fn parse_numeric_value(raw: &str, config: &DetectionConfig) -> Option<f64> {
    let trimmed = raw.trim();
    if config.is_non_response(trimmed) {
        return None;
    }
    trimmed.parse::<f64>().ok()
}

/// Position of the first column whose header names the respondent weight
pub fn find_weight_column(dataset: &Dataset) -> Option<usize> {
    dataset.headers().iter().position(|header| {
        let normalized = header.trim().to_lowercase();
        WEIGHT_HEADERS.contains(&normalized.as_str())
    })
}

/// Extract one group's member columns as parsed numeric data
///
/// When `weight_column` names an existing column it is parsed alongside,
/// with missing or invalid entries defaulting to 1.0; a name that matches
/// no column is logged and ignored.
pub fn extract_group_data(
    dataset: &Dataset,
    group: &QuestionGroup,
    weight_column: Option<&str>,
    config: &DetectionConfig,
) -> GroupData {
    let mut labels = Vec::with_capacity(group.columns.len());
    let mut columns = Vec::with_capacity(group.columns.len());

    for (position, member) in group.columns.iter().enumerate() {
        let label = group
            .column_labels
            .get(position)
            .cloned()
            .or_else(|| dataset.header(*member).map(String::from))
            .unwrap_or_else(|| format!("col_{member}"));
        let cells = dataset.column(*member).unwrap_or(&[]);

        let parsed: Vec<Option<f64>> = match group.question_type {
            QuestionType::Likert => cells
                .iter()
                .map(|cell| {
                    cell.as_deref()
                        .and_then(|raw| parse_likert_value(raw, config))
                        .filter(|value| !is_sentinel(*value, group))
                })
                .collect(),
            QuestionType::MultipleChoice => cells
                .iter()
                .map(|cell| {
                    let mentioned =
                        cell.as_deref().map(str::trim) == Some(config.mentioned_token.as_str());
                    Some(if mentioned { 1.0 } else { 0.0 })
                })
                .collect(),
            // Numeric scales parse directly; for categorical groups this is
            // a best-effort numeric view and mostly yields missing values.
            QuestionType::NumericScale
            | QuestionType::SingleChoice
            | QuestionType::OpenText => cells
                .iter()
                .map(|cell| {
                    cell.as_deref()
                        .and_then(|raw| parse_numeric_value(raw, config))
                })
                .collect(),
        };

        labels.push(label);
        columns.push(parsed);
    }

    let weights = weight_column.and_then(|name| match dataset.column_index(name) {
        Some(index) => {
            debug!(column = %name, "using weight column");
            dataset.weights_from_column(index)
        }
        None => {
            warn!(column = %name, "weight column not found, using unweighted analysis");
            None
        }
    });

    GroupData {
        labels,
        columns,
        weights,
    }
}

fn is_sentinel(value: f64, group: &QuestionGroup) -> bool {
    value.fract() == 0.0 && group.sentinel_codes.contains(&(value as i64))
}
