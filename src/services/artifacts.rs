//! Spatial artifact detection.
//!
//! Decides whether edge, corner, row, or column groups deviate from the
//! plate-wide baseline by more than a configured threshold, expressed in
//! standard-deviation units of the overall distribution. Such systematic
//! bias typically comes from evaporation, temperature gradients, or
//! dispensing errors and contaminates downstream hit calling.
//!
//! Given identical positions, values, and settings the detector is fully
//! deterministic: groupings are fixed and iterated in index order.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::config::ArtifactSettings;
use crate::models::well::WellRecord;
use crate::services::layout::{row_label_from_index, PlateLayout};
use crate::services::statistics::{approximate_p_value, calculate_statistics, StatisticalSummary};

/// Kind of systematic spatial deviation.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EffectType {
    Edge,
    Corner,
    Row,
    Column,
}

/// Severity tier of a detected effect.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
}

/// Numeric evidence reported alongside each detection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EffectStatistics {
    /// Group mean minus reference-group mean, in measurement units.
    pub mean_difference: f64,
    /// Normalized magnitude in standard-deviation units of the overall
    /// distribution.
    pub effect_size: f64,
    /// Coarse significance bucket for the edge-vs-interior comparison;
    /// an annotation heuristic, not a calibrated p-value.
    pub p_value: Option<f64>,
}

/// One detected spatial artifact. Produced fresh on every invocation and
/// never persisted between calls.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpatialEffect {
    pub effect_type: EffectType,
    pub severity: Severity,
    pub affected_wells: Vec<String>,
    pub description: String,
    pub statistics: EffectStatistics,
}

struct PositionedValue<'a> {
    row: usize,
    column: usize,
    well_id: &'a str,
    value: f64,
}

/// Detect edge, corner, row, and column bias in one measurement column.
///
/// Requires at least `settings.min_wells` positioned, finite-valued wells;
/// below that nothing is detected (insufficient data is not an error).
/// Effects are returned sorted by descending effect size, most severe
/// artifact first.
pub fn detect_spatial_artifacts(
    layout: &PlateLayout,
    records: &[WellRecord],
    metric: &str,
    settings: &ArtifactSettings,
) -> Vec<SpatialEffect> {
    let mut by_id: HashMap<&str, Vec<&WellRecord>> = HashMap::new();
    for record in records {
        by_id
            .entry(record.well_id.as_str())
            .or_default()
            .push(record);
    }

    // Duplicate identifiers are joined per occurrence, so each record
    // remains an independent sample at its own position.
    let mut taken: HashMap<&str, usize> = HashMap::new();
    let points: Vec<PositionedValue> = layout
        .wells
        .iter()
        .filter_map(|well| {
            let occurrence = taken.entry(well.well_id.as_str()).or_default();
            let record = by_id.get(well.well_id.as_str())?.get(*occurrence)?;
            *occurrence += 1;
            record.metric(metric).map(|value| PositionedValue {
                row: well.row,
                column: well.column,
                well_id: well.well_id.as_str(),
                value,
            })
        })
        .collect();

    if points.len() < settings.min_wells {
        log::debug!(
            "spatial artifact detection skipped for '{}': {} valid wells (minimum {})",
            metric,
            points.len(),
            settings.min_wells
        );
        return Vec::new();
    }

    let values: Vec<f64> = points.iter().map(|p| p.value).collect();
    let overall = calculate_statistics(&values);
    // A constant plate has no spatial structure to report.
    if overall.std_dev == 0.0 {
        return Vec::new();
    }

    let format = layout.format;
    let last_row = format.rows - 1;
    let last_column = format.columns - 1;

    let mut effects = Vec::new();

    let is_corner = |p: &PositionedValue| {
        (p.row == 0 || p.row == last_row) && (p.column == 0 || p.column == last_column)
    };
    // The four corners belong to the corner grouping, not the edge ring.
    let edge: Vec<&PositionedValue> = points
        .iter()
        .filter(|p| {
            (p.row == 0 || p.row == last_row || p.column == 0 || p.column == last_column)
                && !is_corner(*p)
        })
        .collect();
    let interior: Vec<&PositionedValue> = points
        .iter()
        .filter(|p| p.row > 0 && p.row < last_row && p.column > 0 && p.column < last_column)
        .collect();

    if !edge.is_empty() && !interior.is_empty() {
        let interior_values: Vec<f64> = interior.iter().map(|p| p.value).collect();
        let interior_mean = mean(&interior_values);

        let edge_values: Vec<f64> = edge.iter().map(|p| p.value).collect();
        let edge_mean = mean(&edge_values);
        let effect_size = (edge_mean - interior_mean).abs() / overall.std_dev;
        if effect_size > settings.effect_threshold {
            effects.push(SpatialEffect {
                effect_type: EffectType::Edge,
                severity: edge_severity(effect_size),
                affected_wells: edge.iter().map(|p| p.well_id.to_string()).collect(),
                description: format!(
                    "Edge wells average {:.2} {} than interior wells ({:.2} SD)",
                    (edge_mean - interior_mean).abs(),
                    direction(edge_mean, interior_mean),
                    effect_size
                ),
                statistics: EffectStatistics {
                    mean_difference: edge_mean - interior_mean,
                    effect_size,
                    p_value: Some(two_sample_p(&edge_values, &interior_values)),
                },
            });
        }

        let corners: Vec<&PositionedValue> = points.iter().filter(|p| is_corner(*p)).collect();
        if !corners.is_empty() {
            let corner_values: Vec<f64> = corners.iter().map(|p| p.value).collect();
            let corner_mean = mean(&corner_values);
            let effect_size = (corner_mean - interior_mean).abs() / overall.std_dev;
            if effect_size > settings.effect_threshold {
                effects.push(SpatialEffect {
                    effect_type: EffectType::Corner,
                    severity: corner_severity(effect_size),
                    affected_wells: corners.iter().map(|p| p.well_id.to_string()).collect(),
                    description: format!(
                        "Corner wells average {:.2} {} than interior wells ({:.2} SD)",
                        (corner_mean - interior_mean).abs(),
                        direction(corner_mean, interior_mean),
                        effect_size
                    ),
                    statistics: EffectStatistics {
                        mean_difference: corner_mean - interior_mean,
                        effect_size,
                        p_value: None,
                    },
                });
            }
        }
    }

    if let Some(effect) = detect_axis_effect(&points, format.rows, Axis::Row, &overall, settings) {
        effects.push(effect);
    }
    if let Some(effect) =
        detect_axis_effect(&points, format.columns, Axis::Column, &overall, settings)
    {
        effects.push(effect);
    }

    effects.sort_by(|a, b| {
        b.statistics
            .effect_size
            .partial_cmp(&a.statistics.effect_size)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    effects
}

#[derive(Copy, Clone)]
enum Axis {
    Row,
    Column,
}

/// Row/column analysis: each individual line is compared against the
/// overall plate mean, and every qualifying line is reported together as
/// one aggregate effect tiered on the largest deviation.
fn detect_axis_effect(
    points: &[PositionedValue],
    line_count: usize,
    axis: Axis,
    overall: &StatisticalSummary,
    settings: &ArtifactSettings,
) -> Option<SpatialEffect> {
    let mut qualifying: Vec<(usize, f64, f64, Vec<String>)> = Vec::new();

    for line in 0..line_count {
        let group: Vec<&PositionedValue> = points
            .iter()
            .filter(|p| match axis {
                Axis::Row => p.row == line,
                Axis::Column => p.column == line,
            })
            .collect();
        // Near-empty lines in irregular layouts produce spurious effects.
        if group.len() < settings.min_group_size {
            continue;
        }

        let group_values: Vec<f64> = group.iter().map(|p| p.value).collect();
        let group_mean = mean(&group_values);
        let effect_size = (group_mean - overall.mean).abs() / overall.std_dev;
        if effect_size > settings.effect_threshold {
            qualifying.push((
                line,
                group_mean,
                effect_size,
                group.iter().map(|p| p.well_id.to_string()).collect(),
            ));
        }
    }

    if qualifying.is_empty() {
        return None;
    }

    let (largest_line, largest_mean, largest_effect) = qualifying
        .iter()
        .max_by(|a, b| a.2.partial_cmp(&b.2).unwrap_or(std::cmp::Ordering::Equal))
        .map(|(line, mean, effect, _)| (*line, *mean, *effect))?;

    let labels: Vec<String> = qualifying
        .iter()
        .map(|(line, _, _, _)| match axis {
            Axis::Row => row_label_from_index(*line),
            Axis::Column => (line + 1).to_string(),
        })
        .collect();
    let affected_wells: Vec<String> = qualifying
        .iter()
        .flat_map(|(_, _, _, wells)| wells.iter().cloned())
        .collect();

    let (effect_type, noun, largest_label) = match axis {
        Axis::Row => (EffectType::Row, "Rows", row_label_from_index(largest_line)),
        Axis::Column => (
            EffectType::Column,
            "Columns",
            (largest_line + 1).to_string(),
        ),
    };

    Some(SpatialEffect {
        effect_type,
        severity: edge_severity(largest_effect),
        affected_wells,
        description: format!(
            "{} {} deviate from the plate average; largest effect in {} ({:.2} SD)",
            noun,
            labels.join(", "),
            largest_label,
            largest_effect
        ),
        statistics: EffectStatistics {
            mean_difference: largest_mean - overall.mean,
            effect_size: largest_effect,
            p_value: None,
        },
    })
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

fn edge_severity(effect_size: f64) -> Severity {
    if effect_size > 0.4 {
        Severity::High
    } else if effect_size > 0.25 {
        Severity::Medium
    } else {
        Severity::Low
    }
}

fn corner_severity(effect_size: f64) -> Severity {
    if effect_size > 0.5 {
        Severity::High
    } else if effect_size > 0.3 {
        Severity::Medium
    } else {
        Severity::Low
    }
}

fn direction(group_mean: f64, reference_mean: f64) -> &'static str {
    if group_mean >= reference_mean {
        "higher"
    } else {
        "lower"
    }
}

/// Approximate two-sample t-test between two groups using pooled
/// variance, reduced to the coarse significance buckets.
fn two_sample_p(a: &[f64], b: &[f64]) -> f64 {
    let (na, nb) = (a.len(), b.len());
    if na < 2 || nb < 2 {
        return 0.05;
    }

    let mean_a = mean(a);
    let mean_b = mean(b);
    let var_a = a.iter().map(|v| (v - mean_a).powi(2)).sum::<f64>() / (na - 1) as f64;
    let var_b = b.iter().map(|v| (v - mean_b).powi(2)).sum::<f64>() / (nb - 1) as f64;

    let pooled =
        ((na - 1) as f64 * var_a + (nb - 1) as f64 * var_b) / (na + nb - 2) as f64;
    if pooled <= 0.0 {
        // Both groups constant.
        return if mean_a == mean_b { 0.05 } else { 0.001 };
    }

    let standard_error = (pooled * (1.0 / na as f64 + 1.0 / nb as f64)).sqrt();
    approximate_p_value((mean_a - mean_b).abs() / standard_error)
}
