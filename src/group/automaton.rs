//! The grouping scan
//!
//! One ordered pass over the column list. State is an explicit record
//! (cursor, consumed positions, seen headers) advanced column by column;
//! the sets are ordered so the scan's behavior does not depend on hash
//! iteration order.

use std::collections::{BTreeMap, BTreeSet};

use tracing::{debug, info};

use crate::dataset::Dataset;
use crate::detect::{ColumnSignature, DetectionConfig, HeaderParts, detect_column, parse_header};

use super::config::GroupingConfig;
use super::types::{ChartHint, QuestionGroup, QuestionType};

/// Mutable scan state
#[derive(Debug, Default)]
struct ScanState {
    cursor: usize,
    consumed: BTreeSet<usize>,
    seen_headers: BTreeSet<String>,
}

/// Partitions a dataset's columns into question groups
pub struct GroupScanner<'a> {
    dataset: &'a Dataset,
    detection: &'a DetectionConfig,
    grouping: &'a GroupingConfig,
}

/// Detect question groups with default configuration
pub fn detect_questions(dataset: &Dataset) -> Vec<QuestionGroup> {
    detect_questions_with(
        dataset,
        &DetectionConfig::default(),
        &GroupingConfig::default(),
    )
}

/// Detect question groups with explicit configuration
pub fn detect_questions_with(
    dataset: &Dataset,
    detection: &DetectionConfig,
    grouping: &GroupingConfig,
) -> Vec<QuestionGroup> {
    GroupScanner::new(dataset, detection, grouping).scan()
}

impl<'a> GroupScanner<'a> {
    /// Create a scanner over one dataset
    pub fn new(
        dataset: &'a Dataset,
        detection: &'a DetectionConfig,
        grouping: &'a GroupingConfig,
    ) -> Self {
        Self {
            dataset,
            detection,
            grouping,
        }
    }

    /// Run the scan and return the ordered question groups
    pub fn scan(&self) -> Vec<QuestionGroup> {
        let n_cols = self.dataset.column_count();
        let signatures: Vec<ColumnSignature> = (0..n_cols)
            .map(|i| detect_column(self.dataset.column(i).unwrap_or(&[]), self.detection))
            .collect();

        let mut state = ScanState::default();
        let mut groups = Vec::new();

        while state.cursor < n_cols {
            let i = state.cursor;
            if state.consumed.contains(&i) {
                state.cursor += 1;
                continue;
            }

            let header = self.dataset.header(i).unwrap_or("").to_string();
            let normalized = header.trim().to_lowercase();

            if matches!(signatures[i], ColumnSignature::Empty)
                || self.grouping.is_meta(&header)
                || self.grouping.is_excluded(&header)
                || state.seen_headers.contains(&normalized)
            {
                debug!(
                    column = i,
                    header = %header,
                    signature = signatures[i].variant_name(),
                    "skipping column"
                );
                state.consumed.insert(i);
                state.cursor += 1;
                continue;
            }
            state.seen_headers.insert(normalized);

            let parts = parse_header(&header, self.detection);
            if let Some(id) = &parts.id {
                if self.grouping.excluded_ids.contains(id) {
                    debug!(column = i, id = %id, "skipping excluded identifier");
                    state.consumed.insert(i);
                    state.cursor += 1;
                    continue;
                }
            }

            let is_demographic = parts
                .id
                .as_ref()
                .is_some_and(|id| self.grouping.demographic_ids.contains(id));

            let group = match &signatures[i] {
                ColumnSignature::Likert { .. }
                | ColumnSignature::NumericScale { .. }
                | ColumnSignature::MultiChoice => {
                    self.scan_run(i, &header, &parts, is_demographic, &signatures, &mut state)
                }
                ColumnSignature::SingleChoice { categories } => {
                    state.consumed.insert(i);
                    state.cursor += 1;
                    singleton_group(
                        parts.id.clone().unwrap_or_else(|| format!("choice_{i}")),
                        &parts,
                        i,
                        &header,
                        QuestionType::SingleChoice,
                        ChartHint::for_question(QuestionType::SingleChoice, categories.len()),
                        is_demographic,
                    )
                }
                ColumnSignature::OpenText { .. } => {
                    // Stray unclassified columns stay visible as their own
                    // conservative singleton group rather than being dropped.
                    state.consumed.insert(i);
                    state.cursor += 1;
                    singleton_group(
                        parts.id.clone().unwrap_or_else(|| format!("text_{i}")),
                        &parts,
                        i,
                        &header,
                        QuestionType::OpenText,
                        ChartHint::for_question(QuestionType::OpenText, 0),
                        is_demographic,
                    )
                }
                // Empty columns were skipped above
                ColumnSignature::Empty => unreachable!("empty columns are consumed before grouping"),
            };

            debug!(
                id = %group.id,
                question_type = %group.question_type,
                members = group.columns.len(),
                "question group closed"
            );
            groups.push(group);
        }

        info!(groups = groups.len(), "auto-detected question groups");
        groups
    }

    /// Extend a Likert / numeric-scale / multiple-choice group forward over
    /// identifier-less columns of the same signature
    fn scan_run(
        &self,
        start: usize,
        header: &str,
        parts: &HeaderParts,
        is_demographic: bool,
        signatures: &[ColumnSignature],
        state: &mut ScanState,
    ) -> QuestionGroup {
        let question_type = QuestionType::from_signature(&signatures[start])
            .expect("run openers have a group-level type");

        let mut columns = vec![start];
        let mut column_labels = vec![parts
            .sub_label
            .clone()
            .unwrap_or_else(|| header.to_string())];

        let mut j = start + 1;
        while j < signatures.len() {
            let next_header = self.dataset.header(j).unwrap_or("").to_string();
            let next_normalized = next_header.trim().to_lowercase();

            // A column with its own identifier starts the next group.
            if parse_header(&next_header, self.detection).id.is_some() {
                break;
            }

            if self.grouping.is_meta(&next_header) || self.grouping.is_excluded(&next_header) {
                state.consumed.insert(j);
                j += 1;
                continue;
            }
            if state.seen_headers.contains(&next_normalized) {
                state.consumed.insert(j);
                j += 1;
                continue;
            }

            match QuestionType::from_signature(&signatures[j]) {
                // Empty columns are consumed without ending the run.
                None => {
                    state.consumed.insert(j);
                    j += 1;
                    continue;
                }
                Some(t) if t != question_type => break,
                Some(_) => {
                    columns.push(j);
                    column_labels.push(next_header);
                    state.seen_headers.insert(next_normalized);
                    j += 1;
                }
            }
        }

        let (scale_min, scale_max, scale_labels, sentinel_codes) =
            merge_scale_info(&columns, signatures);

        state.consumed.extend(columns.iter().copied());
        state.cursor = j;

        QuestionGroup {
            id: parts.id.clone().unwrap_or_else(|| format!("group_{start}")),
            label: parts.label.clone(),
            columns,
            column_labels,
            question_type,
            chart_hint: ChartHint::for_question(question_type, 0),
            scale_min,
            scale_max,
            scale_labels,
            sentinel_codes,
            is_demographic,
        }
    }
}

fn singleton_group(
    id: String,
    parts: &HeaderParts,
    column: usize,
    header: &str,
    question_type: QuestionType,
    chart_hint: ChartHint,
    is_demographic: bool,
) -> QuestionGroup {
    QuestionGroup {
        id,
        label: parts.label.clone(),
        columns: vec![column],
        column_labels: vec![header.to_string()],
        question_type,
        chart_hint,
        scale_min: None,
        scale_max: None,
        scale_labels: BTreeMap::new(),
        sentinel_codes: BTreeSet::new(),
        is_demographic,
    }
}

/// Merge member scale bounds by min/max and union their code labels and
/// sentinel sets
fn merge_scale_info(
    columns: &[usize],
    signatures: &[ColumnSignature],
) -> (
    Option<i64>,
    Option<i64>,
    BTreeMap<i64, String>,
    BTreeSet<i64>,
) {
    let mut min: Option<f64> = None;
    let mut max: Option<f64> = None;
    let mut labels = BTreeMap::new();
    let mut sentinels = BTreeSet::new();

    for &column in columns {
        match &signatures[column] {
            ColumnSignature::Likert {
                scale_min,
                scale_max,
                scale_labels,
                sentinel_codes,
            } => {
                merge_bound(&mut min, *scale_min as f64, f64::min);
                merge_bound(&mut max, *scale_max as f64, f64::max);
                labels.extend(scale_labels.iter().map(|(k, v)| (*k, v.clone())));
                sentinels.extend(sentinel_codes.iter().copied());
            }
            ColumnSignature::NumericScale {
                scale_min,
                scale_max,
            } => {
                if scale_min.is_finite() {
                    merge_bound(&mut min, *scale_min, f64::min);
                }
                if scale_max.is_finite() {
                    merge_bound(&mut max, *scale_max, f64::max);
                }
            }
            _ => {}
        }
    }

    (
        min.map(|v| v as i64),
        max.map(|v| v as i64),
        labels,
        sentinels,
    )
}

fn merge_bound(slot: &mut Option<f64>, value: f64, pick: fn(f64, f64) -> f64) {
    *slot = Some(slot.map_or(value, |current| pick(current, value)));
}
