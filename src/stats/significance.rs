//! Significance tests
//!
//! Chi-square independence testing over weighted contingency tables and
//! automatic group-difference testing. Rank-based tests are the default
//! for group comparisons because survey scales are ordinal; a mean-based
//! t-test is available on request.
//!
//! Degenerate inputs (too few observations, one group, a degenerate
//! table) return a typed undefined result instead of an error, so one
//! unanswerable question never aborts a batch report.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use statrs::distribution::{ChiSquared, ContinuousCDF, Normal, StudentsT};
use tracing::debug;

use super::weighted::round_to;

/// Minimum valid paired observations for any significance test
const MIN_OBSERVATIONS: usize = 5;

/// Which test produced a [`TestResult`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TestKind {
    /// Chi-square test of independence
    ChiSquare,
    /// Mann-Whitney U rank test (two groups)
    MannWhitneyU,
    /// Two-sample t-test (two groups, on request)
    TTest,
    /// Kruskal-Wallis rank test (three or more groups)
    KruskalWallis,
    /// Too few valid observations to test
    InsufficientData,
    /// Fewer than two distinct groups
    SingleGroup,
}

impl fmt::Display for TestKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TestKind::ChiSquare => "chi2",
            TestKind::MannWhitneyU => "Mann-Whitney U",
            TestKind::TTest => "t-test",
            TestKind::KruskalWallis => "Kruskal-Wallis",
            TestKind::InsufficientData => "insufficient_data",
            TestKind::SingleGroup => "single_group",
        };
        f.write_str(name)
    }
}

/// Outcome of a significance test
///
/// `statistic` and `p_value` are `None` when the test is undefined for
/// the given input.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TestResult {
    /// Test that was (or would have been) applied
    pub test: TestKind,
    /// Test statistic, rounded to 2 decimals
    pub statistic: Option<f64>,
    /// Two-sided p-value, rounded to 4 decimals
    pub p_value: Option<f64>,
}

impl TestResult {
    fn undefined(test: TestKind) -> Self {
        Self {
            test,
            statistic: None,
            p_value: None,
        }
    }

    fn new(test: TestKind, statistic: f64, p_value: Option<f64>) -> Self {
        Self {
            test,
            statistic: Some(round_to(statistic, 2)),
            p_value: p_value.map(|p| round_to(p, 4)),
        }
    }
}

/// Test selection for [`test_group_differences`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TestSelection {
    /// Rank-based test (Mann-Whitney U for two groups)
    #[default]
    Auto,
    /// Mean-based two-sample t-test for two groups
    TTest,
}

/// Chi-square test of independence between two categorical columns
///
/// The contingency table uses weighted counts when weights are given.
/// Fewer than five valid pairs, fewer than two categories on either
/// dimension, or a zero expected count yield an undefined result.
pub fn chi_square_test(
    values: &[Option<String>],
    groups: &[Option<String>],
    weights: Option<&[f64]>,
) -> TestResult {
    let mut pairs: Vec<(&str, &str, f64)> = Vec::new();
    for (i, (value, group)) in values.iter().zip(groups).enumerate() {
        if let (Some(v), Some(g)) = (value, group) {
            let (v, g) = (v.trim(), g.trim());
            if !v.is_empty() && !g.is_empty() {
                let weight = weights.map_or(1.0, |w| w.get(i).copied().unwrap_or(1.0));
                pairs.push((v, g, weight));
            }
        }
    }

    if pairs.len() < MIN_OBSERVATIONS {
        return TestResult::undefined(TestKind::ChiSquare);
    }

    // Weighted contingency table
    let mut table: BTreeMap<&str, BTreeMap<&str, f64>> = BTreeMap::new();
    let mut columns: BTreeMap<&str, f64> = BTreeMap::new();
    for &(value, group, weight) in &pairs {
        *table
            .entry(value)
            .or_default()
            .entry(group)
            .or_insert(0.0) += weight;
        *columns.entry(group).or_insert(0.0) += weight;
    }

    let n_rows = table.len();
    let n_cols = columns.len();
    if n_rows < 2 || n_cols < 2 {
        return TestResult::undefined(TestKind::ChiSquare);
    }

    let grand_total: f64 = columns.values().sum();
    if grand_total <= 0.0 {
        return TestResult::undefined(TestKind::ChiSquare);
    }
    let row_totals: Vec<f64> = table
        .values()
        .map(|row| row.values().sum::<f64>())
        .collect();
    let col_totals: Vec<f64> = columns.values().copied().collect();
    let col_names: Vec<&str> = columns.keys().copied().collect();

    let dof = (n_rows - 1) * (n_cols - 1);
    // Yates continuity correction on 2x2 tables
    let correction = if dof == 1 { 0.5 } else { 0.0 };

    let mut statistic = 0.0;
    for (r, row) in table.values().enumerate() {
        for (c, col_name) in col_names.iter().enumerate() {
            let observed = row.get(col_name).copied().unwrap_or(0.0);
            let expected = row_totals[r] * col_totals[c] / grand_total;
            if expected <= 0.0 {
                return TestResult::undefined(TestKind::ChiSquare);
            }
            let deviation = ((observed - expected).abs() - correction).max(0.0);
            statistic += deviation * deviation / expected;
        }
    }

    let p_value = chi2_sf(statistic, dof as f64);
    debug!(statistic, dof, "chi-square test");
    TestResult::new(TestKind::ChiSquare, statistic, p_value)
}

/// Test for differences of a numeric column between breakdown groups
///
/// Two groups get a Mann-Whitney U test (or a t-test when requested);
/// three or more get a Kruskal-Wallis test. Fewer than five valid
/// observations or fewer than two distinct groups yield the matching
/// undefined marker.
pub fn test_group_differences(
    values: &[Option<f64>],
    groups: &[Option<String>],
    selection: TestSelection,
) -> TestResult {
    let mut group_names: Vec<&str> = Vec::new();
    let mut samples: Vec<Vec<f64>> = Vec::new();
    let mut total = 0usize;

    for (value, group) in values.iter().zip(groups) {
        if let (Some(v), Some(g)) = (value, group) {
            if v.is_nan() {
                continue;
            }
            total += 1;
            match group_names.iter().position(|name| *name == g.as_str()) {
                Some(index) => samples[index].push(*v),
                None => {
                    group_names.push(g.as_str());
                    samples.push(vec![*v]);
                }
            }
        }
    }

    if total < MIN_OBSERVATIONS {
        return TestResult::undefined(TestKind::InsufficientData);
    }
    if samples.len() < 2 {
        return TestResult::undefined(TestKind::SingleGroup);
    }

    if samples.len() == 2 {
        return match selection {
            TestSelection::Auto => mann_whitney_u(&samples[0], &samples[1]),
            TestSelection::TTest => t_test(&samples[0], &samples[1]),
        };
    }
    kruskal_wallis(&samples)
}

/// Mann-Whitney U test, asymptotic with tie correction and continuity
/// correction; the statistic is U of the first sample
fn mann_whitney_u(a: &[f64], b: &[f64]) -> TestResult {
    let n1 = a.len() as f64;
    let n2 = b.len() as f64;
    let combined: Vec<f64> = a.iter().chain(b).copied().collect();
    let (ranks, tie_term) = rank_with_ties(&combined);

    let rank_sum_a: f64 = ranks[..a.len()].iter().sum();
    let u1 = rank_sum_a - n1 * (n1 + 1.0) / 2.0;

    let n = n1 + n2;
    let mean = n1 * n2 / 2.0;
    let variance = n1 * n2 / 12.0 * ((n + 1.0) - tie_term / (n * (n - 1.0)));
    let p_value = if variance > 0.0 {
        let bigger_u = u1.max(n1 * n2 - u1);
        let z = (bigger_u - mean - 0.5) / variance.sqrt();
        normal_sf(z).map(|p| (2.0 * p).min(1.0))
    } else {
        None
    };

    TestResult::new(TestKind::MannWhitneyU, u1, p_value)
}

/// Two-sample pooled-variance t-test, two-sided
fn t_test(a: &[f64], b: &[f64]) -> TestResult {
    let n1 = a.len() as f64;
    let n2 = b.len() as f64;
    let dof = n1 + n2 - 2.0;
    if dof <= 0.0 {
        return TestResult::undefined(TestKind::TTest);
    }

    let mean1 = a.iter().sum::<f64>() / n1;
    let mean2 = b.iter().sum::<f64>() / n2;
    let ss1: f64 = a.iter().map(|v| (v - mean1).powi(2)).sum();
    let ss2: f64 = b.iter().map(|v| (v - mean2).powi(2)).sum();
    let pooled_variance = (ss1 + ss2) / dof;
    let standard_error = (pooled_variance * (1.0 / n1 + 1.0 / n2)).sqrt();
    if standard_error <= 0.0 {
        return TestResult::undefined(TestKind::TTest);
    }

    let statistic = (mean1 - mean2) / standard_error;
    let p_value = t_sf(statistic.abs(), dof).map(|p| (2.0 * p).min(1.0));
    TestResult::new(TestKind::TTest, statistic, p_value)
}

/// Kruskal-Wallis H test with tie correction
fn kruskal_wallis(samples: &[Vec<f64>]) -> TestResult {
    let combined: Vec<f64> = samples.iter().flatten().copied().collect();
    let n = combined.len() as f64;
    let (ranks, tie_term) = rank_with_ties(&combined);

    let mut h = 0.0;
    let mut offset = 0usize;
    for sample in samples {
        let rank_sum: f64 = ranks[offset..offset + sample.len()].iter().sum();
        h += rank_sum * rank_sum / sample.len() as f64;
        offset += sample.len();
    }
    h = 12.0 / (n * (n + 1.0)) * h - 3.0 * (n + 1.0);

    // All values identical -> the test is undefined
    let tie_correction = 1.0 - tie_term / (n * n * n - n);
    if tie_correction <= 0.0 {
        return TestResult::undefined(TestKind::KruskalWallis);
    }
    h /= tie_correction;

    let dof = samples.len() as f64 - 1.0;
    let p_value = chi2_sf(h, dof);
    TestResult::new(TestKind::KruskalWallis, h, p_value)
}

/// Ranks with average ranks for ties, plus the tie term Σ(t³ - t)
fn rank_with_ties(values: &[f64]) -> (Vec<f64>, f64) {
    let mut order: Vec<usize> = (0..values.len()).collect();
    order.sort_by(|&i, &j| {
        values[i]
            .partial_cmp(&values[j])
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let mut ranks = vec![0.0; values.len()];
    let mut tie_term = 0.0;
    let mut start = 0usize;
    while start < order.len() {
        let mut end = start;
        while end + 1 < order.len() && values[order[end + 1]] == values[order[start]] {
            end += 1;
        }
        let tied = (end - start + 1) as f64;
        // Average of 1-based ranks start+1 ..= end+1
        let rank = (start + end) as f64 / 2.0 + 1.0;
        for &index in &order[start..=end] {
            ranks[index] = rank;
        }
        tie_term += tied * tied * tied - tied;
        start = end + 1;
    }
    (ranks, tie_term)
}

fn normal_sf(z: f64) -> Option<f64> {
    Normal::new(0.0, 1.0).ok().map(|d| 1.0 - d.cdf(z))
}

fn chi2_sf(x: f64, dof: f64) -> Option<f64> {
    ChiSquared::new(dof).ok().map(|d| 1.0 - d.cdf(x))
}

fn t_sf(x: f64, dof: f64) -> Option<f64> {
    StudentsT::new(0.0, 1.0, dof).ok().map(|d| 1.0 - d.cdf(x))
}
