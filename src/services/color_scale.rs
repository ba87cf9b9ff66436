//! Color-scale presets, domain calibration, and value-to-color mapping.
//!
//! Every heatmap in the dashboard maps numbers to colors through this
//! module so that the same kind of metric always renders with a
//! consistent, data-appropriate scale. The mapper holds no mutable state:
//! the same value and scale always produce the same color.

use serde::{Deserialize, Serialize};

use crate::services::statistics::calculate_statistics;

/// Scale family.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScaleType {
    /// Two hues diverging from a neutral center; for signed metrics.
    Diverging,
    /// Single hue from low to high intensity; for unsigned magnitudes.
    Sequential,
}

/// A named numeric-to-color mapping.
///
/// Either a preset selected by name, or a preset whose domain has been
/// recalibrated from observed data via [`optimize_scale_for_values`].
/// The recalibrated variant is a new value, not a mutation of the preset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColorScale {
    pub name: String,
    /// Ordered "#rrggbb" color stops.
    pub colors: Vec<String>,
    pub scale_type: ScaleType,
    /// Numeric domain `[min, max]`.
    pub domain: [f64; 2],
    /// Center value for diverging scales.
    pub center: Option<f64>,
    pub description: String,
}

/// Result of mapping one value through a scale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColorMapping {
    pub color: String,
    /// Normalized position in the domain: 0..1 for sequential scales,
    /// -1..1 signed relative to the center for diverging scales.
    pub intensity: f64,
}

/// One legend sample.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LegendEntry {
    pub value: f64,
    pub color: String,
}

/// Options for optimal-domain calculation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DomainOptions {
    /// Make the diverging domain symmetric around the center.
    pub symmetric: bool,
    /// Override the diverging center (defaults to 0).
    pub center: Option<f64>,
}

// Blue-white-red stops for signed scores.
const DIVERGING_STOPS: [&str; 5] = ["#2166ac", "#92c5de", "#f7f7f7", "#f4a582", "#b2182b"];
// Viridis-style ramp for unsigned magnitudes.
const SEQUENTIAL_STOPS: [&str; 5] = ["#440154", "#3b528b", "#21918c", "#5ec962", "#fde725"];
// Binary dead/alive stops.
const VIABILITY_STOPS: [&str; 2] = ["#d62728", "#2ca02c"];
// Grey ramp fallback for unrecognized metrics.
const NEUTRAL_STOPS: [&str; 2] = ["#f7f7f7", "#252525"];

/// Categorical palette for discrete series (d3 category10 order).
pub const CATEGORICAL_PALETTE: [&str; 10] = [
    "#1f77b4", "#ff7f0e", "#2ca02c", "#d62728", "#9467bd", "#8c564b", "#e377c2", "#7f7f7f",
    "#bcbd22", "#17becf",
];

fn stops(colors: &[&str]) -> Vec<String> {
    colors.iter().map(|c| c.to_string()).collect()
}

/// Diverging preset for signed scores centered at zero.
pub fn diverging_score_scale() -> ColorScale {
    ColorScale {
        name: "score".to_string(),
        colors: stops(&DIVERGING_STOPS),
        scale_type: ScaleType::Diverging,
        domain: [-3.0, 3.0],
        center: Some(0.0),
        description: "Diverging blue-white-red scale for signed scores centered at zero"
            .to_string(),
    }
}

/// Sequential preset for ratio-like magnitudes.
pub fn sequential_ratio_scale() -> ColorScale {
    ColorScale {
        name: "ratio".to_string(),
        colors: stops(&SEQUENTIAL_STOPS),
        scale_type: ScaleType::Sequential,
        domain: [0.0, 1.0],
        center: None,
        description: "Sequential viridis-style scale for unsigned ratios".to_string(),
    }
}

/// Two-stop binary preset for viability flags.
pub fn viability_scale() -> ColorScale {
    ColorScale {
        name: "viability".to_string(),
        colors: stops(&VIABILITY_STOPS),
        scale_type: ScaleType::Sequential,
        domain: [0.0, 1.0],
        center: None,
        description: "Binary red-green scale for viability".to_string(),
    }
}

/// Neutral sequential fallback.
pub fn neutral_scale() -> ColorScale {
    ColorScale {
        name: "neutral".to_string(),
        colors: stops(&NEUTRAL_STOPS),
        scale_type: ScaleType::Sequential,
        domain: [0.0, 1.0],
        center: None,
        description: "Neutral grey scale for unrecognized metrics".to_string(),
    }
}

/// Select a preset scale from metric-name conventions. Unrecognized names
/// fall back to the neutral sequential scale, never an error.
pub fn get_color_scale_for_data_type(metric_name: &str) -> ColorScale {
    let name = metric_name.to_ascii_lowercase();
    if name.contains("score") || name.ends_with("_z") || name.contains("ssmd") {
        diverging_score_scale()
    } else if name.contains("ratio") || name.contains("fold") {
        sequential_ratio_scale()
    } else if name.contains("viab") || name.contains("alive") || name.contains("survival") {
        viability_scale()
    } else {
        neutral_scale()
    }
}

/// Compute a numerically stable domain for the observed values.
///
/// Symmetric diverging scales get `[center - m, center + m]` where `m` is
/// the largest absolute deviation from the center; sequential scales get
/// `[min, max]`. Empty or all-equal input yields a padded, well-ordered
/// domain rather than a degenerate `[v, v]`.
pub fn calculate_optimal_domain(
    values: &[f64],
    scale_type: ScaleType,
    options: &DomainOptions,
) -> [f64; 2] {
    let stats = calculate_statistics(values);
    if stats.count == 0 {
        return [-1.0, 1.0];
    }

    match scale_type {
        ScaleType::Diverging if options.symmetric => {
            let center = options.center.unwrap_or(0.0);
            let magnitude = (stats.max - center).abs().max((stats.min - center).abs());
            let magnitude = if magnitude > 0.0 { magnitude } else { 1.0 };
            [center - magnitude, center + magnitude]
        }
        _ => {
            if stats.min == stats.max {
                [stats.min - 1.0, stats.max + 1.0]
            } else {
                [stats.min, stats.max]
            }
        }
    }
}

/// Return a copy of `scale` with its domain recalibrated to `values`.
pub fn optimize_scale_for_values(scale: &ColorScale, values: &[f64]) -> ColorScale {
    let options = DomainOptions {
        symmetric: scale.scale_type == ScaleType::Diverging,
        center: scale.center,
    };
    ColorScale {
        domain: calculate_optimal_domain(values, scale.scale_type, &options),
        ..scale.clone()
    }
}

/// Map a value to a color through a scale.
///
/// The value is clamped into the domain, converted to a normalized
/// position (the configured center of a diverging scale maps to the
/// middle stop), and linearly interpolated in RGB between the two
/// bracketing stops. Out-of-domain values take the nearest boundary
/// color; non-finite values take the domain minimum.
pub fn map_value_to_color(value: f64, scale: &ColorScale) -> ColorMapping {
    let [min, max] = scale.domain;
    if !min.is_finite() || !max.is_finite() || max <= min {
        return ColorMapping {
            color: scale
                .colors
                .first()
                .cloned()
                .unwrap_or_else(|| "#808080".to_string()),
            intensity: 0.0,
        };
    }

    let value = if value.is_finite() { value.clamp(min, max) } else { min };

    let position = match (scale.scale_type, scale.center) {
        (ScaleType::Diverging, Some(center)) if center > min && center < max => {
            if value <= center {
                0.5 * (value - min) / (center - min)
            } else {
                0.5 + 0.5 * (value - center) / (max - center)
            }
        }
        _ => (value - min) / (max - min),
    };

    let intensity = match scale.scale_type {
        ScaleType::Diverging => (position - 0.5) * 2.0,
        ScaleType::Sequential => position,
    };

    ColorMapping {
        color: interpolate_stops(&scale.colors, position),
        intensity,
    }
}

/// Produce `steps` evenly spaced domain samples with their mapped colors,
/// for rendering a gradient legend.
pub fn generate_color_scale_legend(scale: &ColorScale, steps: usize) -> Vec<LegendEntry> {
    let [min, max] = scale.domain;
    (0..steps)
        .map(|i| {
            let value = if steps > 1 {
                min + (max - min) * i as f64 / (steps - 1) as f64
            } else {
                min
            };
            LegendEntry {
                value,
                color: map_value_to_color(value, scale).color,
            }
        })
        .collect()
}

/// Categorical palette colors for `n` discrete series, cycling after 10.
pub fn get_categorical_palette(n: usize) -> Vec<String> {
    (0..n)
        .map(|i| CATEGORICAL_PALETTE[i % CATEGORICAL_PALETTE.len()].to_string())
        .collect()
}

/// Linear RGB interpolation between the two stops bracketing `position`.
fn interpolate_stops(colors: &[String], position: f64) -> String {
    if colors.is_empty() {
        return "#808080".to_string();
    }
    if colors.len() == 1 {
        return colors[0].clone();
    }

    let position = position.clamp(0.0, 1.0);
    let scaled = position * (colors.len() - 1) as f64;
    let lower = scaled.floor() as usize;
    let upper = (lower + 1).min(colors.len() - 1);
    let t = scaled - lower as f64;

    match (parse_hex_color(&colors[lower]), parse_hex_color(&colors[upper])) {
        (Some(a), Some(b)) => {
            let lerp = |a: u8, b: u8| (a as f64 + (b as f64 - a as f64) * t).round() as u8;
            format_hex_color(lerp(a.0, b.0), lerp(a.1, b.1), lerp(a.2, b.2))
        }
        _ => colors[lower].clone(),
    }
}

/// Parse a "#rrggbb" color into RGB components.
pub fn parse_hex_color(hex: &str) -> Option<(u8, u8, u8)> {
    let hex = hex.strip_prefix('#')?;
    if hex.len() != 6 || !hex.is_ascii() {
        return None;
    }
    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
    Some((r, g, b))
}

/// Format RGB components as "#rrggbb".
pub fn format_hex_color(r: u8, g: u8, b: u8) -> String {
    format!("#{:02x}{:02x}{:02x}", r, g, b)
}
