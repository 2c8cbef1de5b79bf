//! Descriptive statistics, frequency tables and cross-tabulations
//!
//! Table rows serialize directly, so report layers can pass them through
//! to documents or spreadsheets without reshaping.

use serde::Serialize;

use crate::extract::GroupData;

use super::weighted::{round_to, weighted_mean, weighted_median, weighted_std};

/// Descriptive statistics for one group member
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DescriptiveRow {
    /// Member label
    pub item: String,
    /// Count of non-missing values (unweighted)
    pub count: usize,
    /// Weighted mean, rounded to 2 decimals
    pub mean: Option<f64>,
    /// Weighted median, rounded to 2 decimals
    pub median: Option<f64>,
    /// Weighted population standard deviation, rounded to 2 decimals
    pub std_dev: Option<f64>,
    /// Smallest non-missing value
    pub min: Option<f64>,
    /// Largest non-missing value
    pub max: Option<f64>,
}

/// Descriptive statistics for every member column of a group
pub fn descriptive_stats(data: &GroupData) -> Vec<DescriptiveRow> {
    let weights = data.weights.as_deref();
    data.labels
        .iter()
        .zip(&data.columns)
        .map(|(label, column)| {
            let valid: Vec<f64> = column.iter().flatten().filter(|v| !v.is_nan()).copied().collect();
            DescriptiveRow {
                item: label.clone(),
                count: valid.len(),
                mean: weighted_mean(column, weights).map(|v| round_to(v, 2)),
                median: weighted_median(column, weights).map(|v| round_to(v, 2)),
                std_dev: weighted_std(column, weights).map(|v| round_to(v, 2)),
                min: valid.iter().copied().reduce(f64::min),
                max: valid.iter().copied().reduce(f64::max),
            }
        })
        .collect()
}

/// One category of a frequency table
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FrequencyRow {
    /// Category value, as stored
    pub category: String,
    /// Weighted count
    pub count: f64,
    /// Share of the total weighted count, rounded to 1 decimal
    pub percent: f64,
}

/// Weighted frequency table over one categorical column
///
/// Missing and blank values are dropped. Categories keep first-seen order
/// unless `sort_by_count` requests descending weighted counts. Percentages
/// sum to 100 up to rounding; a zero total yields 0 percentages.
pub fn frequency_table(
    values: &[Option<String>],
    weights: Option<&[f64]>,
    sort_by_count: bool,
) -> Vec<FrequencyRow> {
    let mut order: Vec<String> = Vec::new();
    let mut counts: Vec<f64> = Vec::new();

    for (i, value) in values.iter().enumerate() {
        let Some(category) = value.as_deref().filter(|v| !v.trim().is_empty()) else {
            continue;
        };
        let weight = weights.map_or(1.0, |w| w.get(i).copied().unwrap_or(1.0));
        match order.iter().position(|c| c == category) {
            Some(index) => counts[index] += weight,
            None => {
                order.push(category.to_string());
                counts.push(weight);
            }
        }
    }

    let total: f64 = counts.iter().sum();
    let mut rows: Vec<FrequencyRow> = order
        .into_iter()
        .zip(counts)
        .map(|(category, count)| FrequencyRow {
            category,
            count,
            percent: if total > 0.0 {
                round_to(count / total * 100.0, 1)
            } else {
                0.0
            },
        })
        .collect();

    if sort_by_count {
        rows.sort_by(|a, b| b.count.partial_cmp(&a.count).unwrap_or(std::cmp::Ordering::Equal));
    }
    rows
}

/// One option of a multiple-choice table
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MultipleChoiceRow {
    /// Option label
    pub option: String,
    /// Respondents who mentioned the option (unweighted)
    pub mentions: usize,
    /// Weighted share of respondents who mentioned it, rounded to 1 decimal
    pub percent: f64,
}

/// Mention percentages for a multiple-choice group
///
/// The denominator is the total weight of all respondents (or the
/// respondent count when unweighted), not just those who answered. Rows
/// sort descending by percentage.
pub fn multiple_choice_table(data: &GroupData) -> Vec<MultipleChoiceRow> {
    let weights = data.weights.as_deref();
    let row_count = data.row_count();

    let mut rows: Vec<MultipleChoiceRow> = data
        .labels
        .iter()
        .zip(&data.columns)
        .map(|(label, column)| {
            let mentioned = |value: &Option<f64>| matches!(value, Some(v) if *v == 1.0);
            let mentions = column.iter().filter(|v| mentioned(v)).count();

            let percent = match weights {
                Some(w) => {
                    let mentioned_weight: f64 = column
                        .iter()
                        .enumerate()
                        .filter(|(_, v)| mentioned(v))
                        .map(|(i, _)| w.get(i).copied().unwrap_or(1.0))
                        .sum();
                    let total_weight: f64 = (0..row_count)
                        .map(|i| w.get(i).copied().unwrap_or(1.0))
                        .sum();
                    if total_weight > 0.0 {
                        mentioned_weight / total_weight * 100.0
                    } else {
                        0.0
                    }
                }
                None => {
                    if row_count > 0 {
                        mentions as f64 / row_count as f64 * 100.0
                    } else {
                        0.0
                    }
                }
            };

            MultipleChoiceRow {
                option: label.clone(),
                mentions,
                percent: round_to(percent, 1),
            }
        })
        .collect();

    rows.sort_by(|a, b| b.percent.partial_cmp(&a.percent).unwrap_or(std::cmp::Ordering::Equal));
    rows
}

/// Mean/median/std of a numeric column within one breakdown category
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CrossTabMeansRow {
    /// Breakdown category
    pub category: String,
    /// Count of valid paired observations (unweighted)
    pub count: usize,
    /// Weighted mean, rounded to 2 decimals
    pub mean: Option<f64>,
    /// Weighted median, rounded to 2 decimals
    pub median: Option<f64>,
    /// Weighted population standard deviation, rounded to 2 decimals
    pub std_dev: Option<f64>,
}

/// Per-category statistics of `values` over the categories of `groups`
///
/// Rows are ordered by the category's string form. Observations missing
/// either the value or the category are dropped.
pub fn cross_tab_means(
    values: &[Option<f64>],
    groups: &[Option<String>],
    weights: Option<&[f64]>,
) -> Vec<CrossTabMeansRow> {
    let mut categories: Vec<&str> = Vec::new();
    for (value, group) in values.iter().zip(groups) {
        if let (Some(v), Some(g)) = (value, group) {
            if !v.is_nan() && !categories.contains(&g.as_str()) {
                categories.push(g.as_str());
            }
        }
    }
    categories.sort_unstable();

    categories
        .into_iter()
        .map(|category| {
            let mut subset: Vec<Option<f64>> = Vec::new();
            let mut subset_weights: Vec<f64> = Vec::new();
            for (i, (value, group)) in values.iter().zip(groups).enumerate() {
                if let (Some(v), Some(g)) = (value, group) {
                    if !v.is_nan() && g == category {
                        subset.push(Some(*v));
                        subset_weights.push(weights.map_or(1.0, |w| {
                            w.get(i).copied().unwrap_or(1.0)
                        }));
                    }
                }
            }
            let w = weights.map(|_| subset_weights.as_slice());
            CrossTabMeansRow {
                category: category.to_string(),
                count: subset.len(),
                mean: weighted_mean(&subset, w).map(|v| round_to(v, 2)),
                median: weighted_median(&subset, w).map(|v| round_to(v, 2)),
                std_dev: weighted_std(&subset, w).map(|v| round_to(v, 2)),
            }
        })
        .collect()
}

/// Category × category percentage matrix
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CrossTab {
    /// Data categories (rows)
    pub row_labels: Vec<String>,
    /// Breakdown categories (columns)
    pub col_labels: Vec<String>,
    /// Column-normalized percentages, `values[row][col]`
    pub values: Vec<Vec<f64>>,
}

impl CrossTab {
    /// One cell, by position
    pub fn get(&self, row: usize, col: usize) -> Option<f64> {
        self.values.get(row).and_then(|r| r.get(col)).copied()
    }
}

/// Weighted percentage distribution of `values` within each category of
/// `groups`
///
/// Each breakdown column is normalized to sum to 100; a column with zero
/// total weight stays all zero rather than dividing by zero. Categories on
/// both axes are ordered by their string form.
pub fn cross_tab_frequencies(
    values: &[Option<String>],
    groups: &[Option<String>],
    weights: Option<&[f64]>,
) -> CrossTab {
    let mut row_labels: Vec<String> = Vec::new();
    let mut col_labels: Vec<String> = Vec::new();
    for (value, group) in values.iter().zip(groups) {
        if let (Some(v), Some(g)) = (value, group) {
            if !row_labels.contains(v) {
                row_labels.push(v.clone());
            }
            if !col_labels.contains(g) {
                col_labels.push(g.clone());
            }
        }
    }
    row_labels.sort_unstable();
    col_labels.sort_unstable();

    let mut counts = vec![vec![0.0f64; col_labels.len()]; row_labels.len()];
    for (i, (value, group)) in values.iter().zip(groups).enumerate() {
        if let (Some(v), Some(g)) = (value, group) {
            let row = row_labels.iter().position(|l| l == v).unwrap();
            let col = col_labels.iter().position(|l| l == g).unwrap();
            counts[row][col] += weights.map_or(1.0, |w| w.get(i).copied().unwrap_or(1.0));
        }
    }

    let col_sums: Vec<f64> = (0..col_labels.len())
        .map(|col| counts.iter().map(|row| row[col]).sum())
        .collect();
    let values = counts
        .into_iter()
        .map(|row| {
            row.into_iter()
                .enumerate()
                .map(|(col, count)| {
                    if col_sums[col] > 0.0 {
                        round_to(count / col_sums[col] * 100.0, 1)
                    } else {
                        0.0
                    }
                })
                .collect()
        })
        .collect();

    CrossTab {
        row_labels,
        col_labels,
        values,
    }
}
