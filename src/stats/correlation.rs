//! Correlation matrices
//!
//! Spearman rank correlation is the default - survey scales are ordinal,
//! so monotone association matters more than linearity. Pearson is
//! available for genuinely continuous fields. Pairs use pairwise-complete
//! observations; columns with no data at all are dropped before computing.

use serde::Serialize;

use super::weighted::round_to;

/// Correlation method
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CorrelationMethod {
    /// Spearman rank correlation
    #[default]
    Spearman,
    /// Pearson product-moment correlation
    Pearson,
}

/// Pairwise correlation matrix
///
/// `values[i][j]` is the correlation between columns `i` and `j`; `None`
/// marks an undefined pair (fewer than two complete observations or zero
/// variance).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CorrelationMatrix {
    /// Column names, after dropping all-missing columns
    pub names: Vec<String>,
    /// Coefficients rounded to 3 decimals
    pub values: Vec<Vec<Option<f64>>>,
}

impl CorrelationMatrix {
    /// One coefficient, by position
    pub fn get(&self, row: usize, col: usize) -> Option<f64> {
        self.values.get(row).and_then(|r| r.get(col)).copied().flatten()
    }
}

/// Pairwise correlation across numeric columns
///
/// Columns whose values are entirely missing are dropped first. Each pair
/// is computed over the rows where both columns are present.
pub fn correlation_matrix(
    columns: &[Vec<Option<f64>>],
    names: &[String],
    method: CorrelationMethod,
) -> CorrelationMatrix {
    let kept: Vec<usize> = (0..columns.len())
        .filter(|&i| columns[i].iter().any(|v| matches!(v, Some(x) if !x.is_nan())))
        .collect();

    let kept_names: Vec<String> = kept
        .iter()
        .map(|&i| names.get(i).cloned().unwrap_or_else(|| format!("col_{i}")))
        .collect();

    let n = kept.len();
    let mut values = vec![vec![None; n]; n];
    for a in 0..n {
        values[a][a] = Some(1.0);
        for b in (a + 1)..n {
            let r = pairwise(&columns[kept[a]], &columns[kept[b]], method)
                .map(|r| round_to(r, 3));
            values[a][b] = r;
            values[b][a] = r;
        }
    }

    CorrelationMatrix {
        names: kept_names,
        values,
    }
}

/// Correlation of one pair over pairwise-complete observations
fn pairwise(a: &[Option<f64>], b: &[Option<f64>], method: CorrelationMethod) -> Option<f64> {
    let mut xs = Vec::new();
    let mut ys = Vec::new();
    for (x, y) in a.iter().zip(b) {
        if let (Some(x), Some(y)) = (x, y) {
            if !x.is_nan() && !y.is_nan() {
                xs.push(*x);
                ys.push(*y);
            }
        }
    }
    if xs.len() < 2 {
        return None;
    }

    match method {
        CorrelationMethod::Pearson => pearson(&xs, &ys),
        CorrelationMethod::Spearman => {
            let rx = average_ranks(&xs);
            let ry = average_ranks(&ys);
            pearson(&rx, &ry)
        }
    }
}

fn pearson(xs: &[f64], ys: &[f64]) -> Option<f64> {
    let n = xs.len() as f64;
    let mean_x = xs.iter().sum::<f64>() / n;
    let mean_y = ys.iter().sum::<f64>() / n;

    let mut covariance = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;
    for (x, y) in xs.iter().zip(ys) {
        let dx = x - mean_x;
        let dy = y - mean_y;
        covariance += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }
    if var_x <= 0.0 || var_y <= 0.0 {
        return None;
    }
    Some(covariance / (var_x.sqrt() * var_y.sqrt()))
}

/// 1-based ranks with average ranks for ties
fn average_ranks(values: &[f64]) -> Vec<f64> {
    let mut order: Vec<usize> = (0..values.len()).collect();
    order.sort_by(|&i, &j| {
        values[i]
            .partial_cmp(&values[j])
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let mut ranks = vec![0.0; values.len()];
    let mut start = 0usize;
    while start < order.len() {
        let mut end = start;
        while end + 1 < order.len() && values[order[end + 1]] == values[order[start]] {
            end += 1;
        }
        let rank = (start + end) as f64 / 2.0 + 1.0;
        for &index in &order[start..=end] {
            ranks[index] = rank;
        }
        start = end + 1;
    }
    ranks
}
