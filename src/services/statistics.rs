//! Descriptive and bivariate statistics over well measurements.
//!
//! Every function here is total over well-formed numeric sequences: empty
//! input produces a defined zero-valued result, and non-finite entries
//! are filtered rather than rejected.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use serde::{Deserialize, Serialize};

use crate::config::ValidationSettings;
use crate::models::well::WellRecord;

/// Descriptive summary of a numeric sequence.
///
/// `count == 0` leaves every other field at zero so downstream consumers
/// never see NaN.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StatisticalSummary {
    pub count: usize,
    pub mean: f64,
    pub median: f64,
    pub std_dev: f64,
    pub min: f64,
    pub max: f64,
    pub q25: f64,
    pub q75: f64,
}

/// Pearson correlation with a coarse significance bucket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Correlation {
    pub r: f64,
    /// Coarse bucket from [`approximate_p_value`]; an annotation
    /// heuristic, not a calibrated p-value.
    pub p: f64,
}

/// Ordinary least-squares fit of y on x.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Trendline {
    pub slope: f64,
    pub intercept: f64,
    pub r2: f64,
}

/// Per-plate viability counts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViabilityCounts {
    pub plate_id: String,
    pub viable: usize,
    pub non_viable: usize,
    pub total: usize,
    pub viability_rate: f64,
}

/// Linear-interpolated percentile over an already-sorted slice
/// (`index = (n - 1) * p`). This is the interpolating definition, not
/// nearest-rank; the dashboard's annotations depend on it exactly.
pub fn percentile(sorted: &[f64], p: f64) -> f64 {
    if sorted.is_empty() {
        return 0.0;
    }
    let index = (sorted.len() - 1) as f64 * p.clamp(0.0, 1.0);
    let lower = index.floor() as usize;
    let upper = index.ceil() as usize;
    if lower == upper {
        sorted[lower]
    } else {
        sorted[lower] + (sorted[upper] - sorted[lower]) * (index - lower as f64)
    }
}

/// Compute a descriptive summary. Non-finite values are filtered first,
/// so NaN and infinity never propagate.
pub fn calculate_statistics(values: &[f64]) -> StatisticalSummary {
    let mut finite: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    if finite.is_empty() {
        return StatisticalSummary::default();
    }
    finite.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

    let count = finite.len();
    let mean = finite.iter().sum::<f64>() / count as f64;
    let variance = finite
        .iter()
        .map(|v| {
            let diff = v - mean;
            diff * diff
        })
        .sum::<f64>()
        / count as f64;

    StatisticalSummary {
        count,
        mean,
        median: percentile(&finite, 0.5),
        std_dev: variance.sqrt(),
        min: finite[0],
        max: finite[count - 1],
        q25: percentile(&finite, 0.25),
        q75: percentile(&finite, 0.75),
    }
}

/// Coarse significance estimate from a t-statistic: t above 1.96 maps to
/// 0.001, anything else to 0.05.
///
/// This is a deliberate simplification for chart annotations. It is not a
/// calibrated p-value and must not be presented as one in derived reports.
pub fn approximate_p_value(t: f64) -> f64 {
    if t > 1.96 {
        0.001
    } else {
        0.05
    }
}

/// Pearson's r via the standard sum-of-products formula.
///
/// Returns `r = 0` when fewer than 2 finite pairs exist or either input
/// has zero variance, never NaN.
pub fn calculate_correlation(x: &[f64], y: &[f64]) -> Correlation {
    let pairs: Vec<(f64, f64)> = x
        .iter()
        .zip(y.iter())
        .filter(|(a, b)| a.is_finite() && b.is_finite())
        .map(|(a, b)| (*a, *b))
        .collect();

    let n = pairs.len();
    if n < 2 {
        return Correlation { r: 0.0, p: 0.05 };
    }

    let mean_x = pairs.iter().map(|(a, _)| a).sum::<f64>() / n as f64;
    let mean_y = pairs.iter().map(|(_, b)| b).sum::<f64>() / n as f64;

    let mut numerator = 0.0;
    let mut sum_sq_x = 0.0;
    let mut sum_sq_y = 0.0;
    for (a, b) in &pairs {
        let dx = a - mean_x;
        let dy = b - mean_y;
        numerator += dx * dy;
        sum_sq_x += dx * dx;
        sum_sq_y += dy * dy;
    }

    let denominator = (sum_sq_x * sum_sq_y).sqrt();
    if denominator == 0.0 {
        return Correlation { r: 0.0, p: 0.05 };
    }

    let r: f64 = (numerator / denominator).clamp(-1.0, 1.0);
    let t = if 1.0 - r * r <= f64::EPSILON {
        f64::INFINITY
    } else {
        r.abs() * ((n - 2) as f64 / (1.0 - r * r)).sqrt()
    };

    Correlation {
        r,
        p: approximate_p_value(t),
    }
}

/// Ordinary least-squares fit. R-squared is defined as
/// `1 - SS_residual / SS_total` and defaults to 0 for constant y.
pub fn calculate_trendline(x: &[f64], y: &[f64]) -> Trendline {
    let pairs: Vec<(f64, f64)> = x
        .iter()
        .zip(y.iter())
        .filter(|(a, b)| a.is_finite() && b.is_finite())
        .map(|(a, b)| (*a, *b))
        .collect();

    let n = pairs.len();
    if n < 2 {
        return Trendline::default();
    }

    let mean_x = pairs.iter().map(|(a, _)| a).sum::<f64>() / n as f64;
    let mean_y = pairs.iter().map(|(_, b)| b).sum::<f64>() / n as f64;

    let mut numerator = 0.0;
    let mut sum_sq_x = 0.0;
    let mut ss_total = 0.0;
    for (a, b) in &pairs {
        let dx = a - mean_x;
        numerator += dx * (b - mean_y);
        sum_sq_x += dx * dx;
        ss_total += (b - mean_y) * (b - mean_y);
    }

    // Constant x: no defined slope.
    if sum_sq_x == 0.0 {
        return Trendline::default();
    }

    let slope = numerator / sum_sq_x;
    let intercept = mean_y - slope * mean_x;

    let ss_residual: f64 = pairs
        .iter()
        .map(|(a, b)| {
            let predicted = slope * a + intercept;
            (b - predicted) * (b - predicted)
        })
        .sum();

    let r2 = if ss_total == 0.0 {
        0.0
    } else {
        1.0 - ss_residual / ss_total
    };

    Trendline {
        slope,
        intercept,
        r2,
    }
}

/// Group records by plate and count the viability flag. Output is sorted
/// by plate identifier for deterministic rendering.
pub fn calculate_viability_counts(records: &[WellRecord]) -> Vec<ViabilityCounts> {
    let mut per_plate: BTreeMap<&str, (usize, usize)> = BTreeMap::new();
    for record in records {
        let entry = per_plate.entry(record.plate_id.as_str()).or_default();
        if record.viable {
            entry.0 += 1;
        } else {
            entry.1 += 1;
        }
    }

    per_plate
        .into_iter()
        .map(|(plate_id, (viable, non_viable))| {
            let total = viable + non_viable;
            ViabilityCounts {
                plate_id: plate_id.to_string(),
                viable,
                non_viable,
                total,
                viability_rate: if total > 0 {
                    viable as f64 / total as f64
                } else {
                    0.0
                },
            }
        })
        .collect()
}

/// Advisory data-quality checks: missing metric values, extreme robust
/// outliers, duplicate well identifiers, and low overall viability.
///
/// Warnings are text for the caller to surface; nothing here is fatal and
/// the caller decides whether to block on them.
pub fn validate_data(records: &[WellRecord], settings: &ValidationSettings) -> Vec<String> {
    let mut warnings = Vec::new();
    if records.is_empty() {
        return warnings;
    }

    let metric_names: BTreeSet<&str> = records
        .iter()
        .flat_map(|r| r.metrics.keys().map(String::as_str))
        .collect();

    for name in &metric_names {
        let missing = records.iter().filter(|r| r.metric(name).is_none()).count();
        if missing > 0 {
            warnings.push(format!(
                "{} wells are missing a value for metric '{}'",
                missing, name
            ));
        }
    }

    for name in &metric_names {
        let values: Vec<f64> = records.iter().filter_map(|r| r.metric(name)).collect();
        let outliers = count_robust_outliers(&values, settings.outlier_robust_z);
        if outliers > 0 {
            warnings.push(format!(
                "{} extreme outliers in metric '{}' (robust score magnitude > {})",
                outliers, name, settings.outlier_robust_z
            ));
        }
    }

    let mut seen: HashMap<(&str, &str), usize> = HashMap::new();
    for record in records {
        *seen
            .entry((record.plate_id.as_str(), record.well_id.as_str()))
            .or_default() += 1;
    }
    let mut duplicates: Vec<&str> = seen
        .iter()
        .filter(|(_, count)| **count > 1)
        .map(|((_, well_id), _)| *well_id)
        .collect();
    if !duplicates.is_empty() {
        duplicates.sort_unstable();
        duplicates.dedup();
        warnings.push(format!(
            "Duplicate well identifiers treated as independent samples: {}",
            duplicates.join(", ")
        ));
    }

    let viable = records.iter().filter(|r| r.viable).count();
    let viability_rate = viable as f64 / records.len() as f64;
    if viability_rate < settings.min_viability_rate {
        warnings.push(format!(
            "Overall viability rate {:.1}% is below the acceptable {:.0}% threshold",
            viability_rate * 100.0,
            settings.min_viability_rate * 100.0
        ));
    }

    for warning in &warnings {
        log::debug!("data validation: {}", warning);
    }
    warnings
}

/// Count values whose median/MAD robust score magnitude exceeds `bound`.
/// Falls back to the standard deviation when the MAD collapses to zero.
fn count_robust_outliers(values: &[f64], bound: f64) -> usize {
    if values.len() < 3 {
        return 0;
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let median = percentile(&sorted, 0.5);

    let mut deviations: Vec<f64> = values.iter().map(|v| (v - median).abs()).collect();
    deviations.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let mad = percentile(&deviations, 0.5);

    let scale = if mad > 0.0 {
        1.4826 * mad
    } else {
        calculate_statistics(values).std_dev
    };
    if scale == 0.0 {
        return 0;
    }

    values
        .iter()
        .filter(|v| (**v - median).abs() / scale > bound)
        .count()
}
