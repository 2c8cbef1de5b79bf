//! Weighted mean, median and standard deviation
//!
//! Missing values (`None` or NaN) are ignored. Weights align with values
//! by position; an absent weight slice means all ones, and an individual
//! weight missing past the end of the slice defaults to 1.0. A zero total
//! weight makes the result undefined (`None`).

/// Weight of the observation at `index`
#[inline]
fn weight_at(weights: Option<&[f64]>, index: usize) -> f64 {
    weights.map_or(1.0, |w| w.get(index).copied().unwrap_or(1.0))
}

/// Valid (value, weight) pairs, skipping missing values
fn valid_pairs(values: &[Option<f64>], weights: Option<&[f64]>) -> Vec<(f64, f64)> {
    values
        .iter()
        .enumerate()
        .filter_map(|(i, value)| {
            value
                .filter(|v| !v.is_nan())
                .map(|v| (v, weight_at(weights, i)))
        })
        .collect()
}

/// Weighted average of the non-missing values
///
/// Empty input or zero total weight -> `None`.
pub fn weighted_mean(values: &[Option<f64>], weights: Option<&[f64]>) -> Option<f64> {
    let pairs = valid_pairs(values, weights);
    let total: f64 = pairs.iter().map(|(_, w)| w).sum();
    if pairs.is_empty() || total <= 0.0 {
        return None;
    }
    Some(pairs.iter().map(|(v, w)| v * w).sum::<f64>() / total)
}

/// Weighted median: the smallest value whose cumulative weight reaches
/// half the total weight
///
/// With uniform weights this is the ordinary median of the sorted values.
/// Empty input or zero total weight -> `None`.
pub fn weighted_median(values: &[Option<f64>], weights: Option<&[f64]>) -> Option<f64> {
    let mut pairs = valid_pairs(values, weights);
    let total: f64 = pairs.iter().map(|(_, w)| w).sum();
    if pairs.is_empty() || total <= 0.0 {
        return None;
    }

    pairs.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(std::cmp::Ordering::Equal));
    let cutoff = total / 2.0;
    let mut cumulative = 0.0;
    for (value, weight) in &pairs {
        cumulative += weight;
        if cumulative >= cutoff {
            return Some(*value);
        }
    }
    pairs.last().map(|(v, _)| *v)
}

/// Weighted population standard deviation of the non-missing values
///
/// Fewer than two values or zero total weight -> `None`.
pub fn weighted_std(values: &[Option<f64>], weights: Option<&[f64]>) -> Option<f64> {
    let pairs = valid_pairs(values, weights);
    if pairs.len() < 2 {
        return None;
    }
    let total: f64 = pairs.iter().map(|(_, w)| w).sum();
    if total <= 0.0 {
        return None;
    }

    let mean = pairs.iter().map(|(v, w)| v * w).sum::<f64>() / total;
    let variance = pairs
        .iter()
        .map(|(v, w)| w * (v - mean).powi(2))
        .sum::<f64>()
        / total;
    Some(variance.sqrt())
}

/// Round to a fixed number of decimal places
pub(crate) fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}
