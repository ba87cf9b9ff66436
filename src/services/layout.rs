//! Plate coordinate model.
//!
//! Translates between the three coordinate representations of a well:
//! the identifier string ("A01"), logical row/column indices, and
//! on-canvas pixel position. Also infers plate density from a batch of
//! identifiers.

use serde::{Deserialize, Serialize};

use crate::error::{AnalysisError, AnalysisResult};
use crate::models::plate::{PlateFormat, FORMAT_1536, PLATE_FORMATS};

/// Fraction of each canvas dimension reserved for axis labels.
pub const PLOT_MARGIN_FRACTION: f64 = 0.10;

/// Parsed well identifier, before any canvas mapping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedWellId {
    pub row: usize,
    pub column: usize,
    pub row_label: String,
    pub column_label: String,
}

/// A well resolved to canvas coordinates for one rendering context.
///
/// Positions are recomputed whenever the canvas size changes; they are
/// never persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WellPosition {
    pub well_id: String,
    pub row: usize,
    pub column: usize,
    pub row_label: String,
    pub column_label: String,
    pub x: f64,
    pub y: f64,
}

/// Observed pixel bounding box of a layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlotBounds {
    pub x_min: f64,
    pub x_max: f64,
    pub y_min: f64,
    pub y_max: f64,
}

/// Complete plate layout for one canvas.
#[derive(Debug, Clone, Serialize)]
pub struct PlateLayout {
    pub format: PlateFormat,
    pub wells: Vec<WellPosition>,
    pub bounds: PlotBounds,
}

/// Decode a spreadsheet-style row label ("A" = 0, "Z" = 25, "AA" = 26) to
/// a zero-based row index. Base-26 with no zero digit.
pub fn row_index_from_label(label: &str) -> Option<usize> {
    if label.is_empty() {
        return None;
    }
    let mut value = 0usize;
    for c in label.chars() {
        let c = c.to_ascii_uppercase();
        if !c.is_ascii_uppercase() {
            return None;
        }
        value = value * 26 + (c as usize - 'A' as usize + 1);
    }
    Some(value - 1)
}

/// Encode a zero-based row index to its spreadsheet-style label.
/// Round-trips exactly with [`row_index_from_label`] for every index.
pub fn row_label_from_index(row: usize) -> String {
    let mut n = row + 1;
    let mut letters = Vec::new();
    while n > 0 {
        let rem = (n - 1) % 26;
        letters.push((b'A' + rem as u8) as char);
        n = (n - 1) / 26;
    }
    letters.iter().rev().collect()
}

/// Parse a well identifier such as "A01", "AB12", or the reversed "12AB".
///
/// Row letters are spreadsheet-style base-26; column digits are 1-based.
/// Returns `None` for anything unparseable; callers skip such wells
/// rather than failing.
pub fn parse_well_id(id: &str) -> Option<ParsedWellId> {
    let id = id.trim();
    let first = id.chars().next()?;

    let (letters, digits) = if first.is_ascii_alphabetic() {
        let split = id
            .char_indices()
            .find(|(_, c)| !c.is_ascii_alphabetic())
            .map(|(i, _)| i)
            .unwrap_or(id.len());
        let (letters, digits) = id.split_at(split);
        if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
            return None;
        }
        (letters, digits)
    } else if first.is_ascii_digit() {
        let split = id
            .char_indices()
            .find(|(_, c)| !c.is_ascii_digit())
            .map(|(i, _)| i)
            .unwrap_or(id.len());
        let (digits, letters) = id.split_at(split);
        if letters.is_empty() || !letters.chars().all(|c| c.is_ascii_alphabetic()) {
            return None;
        }
        (letters, digits)
    } else {
        return None;
    };

    let row = row_index_from_label(letters)?;
    let column_number: usize = digits.parse().ok()?;
    if column_number == 0 {
        return None;
    }

    Some(ParsedWellId {
        row,
        column: column_number - 1,
        row_label: letters.to_ascii_uppercase(),
        column_label: column_number.to_string(),
    })
}

/// Classify a batch of well identifiers into the smallest known format
/// whose row/column bounds accommodate every parsed identifier.
///
/// When nothing parses, falls back to classifying purely by identifier
/// count. That fallback is deliberately permissive: a batch of junk
/// identifiers still gets a usable format rather than an error.
pub fn detect_plate_format<S: AsRef<str>>(ids: &[S]) -> PlateFormat {
    let mut max_row: Option<usize> = None;
    let mut max_column: Option<usize> = None;

    for id in ids {
        if let Some(parsed) = parse_well_id(id.as_ref()) {
            max_row = Some(max_row.map_or(parsed.row, |m| m.max(parsed.row)));
            max_column = Some(max_column.map_or(parsed.column, |m| m.max(parsed.column)));
        }
    }

    match (max_row, max_column) {
        (Some(row), Some(column)) => PLATE_FORMATS
            .iter()
            .copied()
            .find(|f| row < f.rows && column < f.columns)
            .unwrap_or(FORMAT_1536),
        _ => format_for_well_count(ids.len()),
    }
}

fn format_for_well_count(count: usize) -> PlateFormat {
    PLATE_FORMATS
        .iter()
        .copied()
        .find(|f| count <= f.wells)
        .unwrap_or(FORMAT_1536)
}

/// Map a row/column index to canvas pixels.
///
/// The index is first mapped to a fractional position across the usable
/// plotting area (midpoint when the format has a single row or column),
/// then scaled into pixels after reserving [`PLOT_MARGIN_FRACTION`] on
/// each side for axis labels.
pub fn calculate_well_position(
    row: usize,
    column: usize,
    format: PlateFormat,
    canvas_width: f64,
    canvas_height: f64,
) -> (f64, f64) {
    let fx = if format.columns > 1 {
        column as f64 / (format.columns - 1) as f64
    } else {
        0.5
    };
    let fy = if format.rows > 1 {
        row as f64 / (format.rows - 1) as f64
    } else {
        0.5
    };

    let usable = 1.0 - 2.0 * PLOT_MARGIN_FRACTION;
    let x = canvas_width * (PLOT_MARGIN_FRACTION + fx * usable);
    let y = canvas_height * (PLOT_MARGIN_FRACTION + fy * usable);
    (x, y)
}

/// Build the complete layout for a batch of well identifiers: detect the
/// format once, position every parseable identifier, and track the
/// observed pixel bounding box.
///
/// Duplicate identifiers are preserved as separate positions; the
/// statistics and artifact layers treat them as independent samples.
/// Bounds default to the full canvas when no identifier resolves, so
/// callers never receive infinite values.
pub fn create_plate_layout<S: AsRef<str>>(
    ids: &[S],
    canvas_width: f64,
    canvas_height: f64,
) -> AnalysisResult<PlateLayout> {
    if !canvas_width.is_finite()
        || !canvas_height.is_finite()
        || canvas_width <= 0.0
        || canvas_height <= 0.0
    {
        return Err(AnalysisError::InvalidCanvas {
            width: canvas_width,
            height: canvas_height,
        });
    }

    let format = detect_plate_format(ids);
    let mut wells = Vec::with_capacity(ids.len());
    let mut bounds: Option<PlotBounds> = None;

    for id in ids {
        let Some(parsed) = parse_well_id(id.as_ref()) else {
            continue;
        };
        let (x, y) =
            calculate_well_position(parsed.row, parsed.column, format, canvas_width, canvas_height);

        match &mut bounds {
            Some(b) => {
                b.x_min = b.x_min.min(x);
                b.x_max = b.x_max.max(x);
                b.y_min = b.y_min.min(y);
                b.y_max = b.y_max.max(y);
            }
            None => {
                bounds = Some(PlotBounds {
                    x_min: x,
                    x_max: x,
                    y_min: y,
                    y_max: y,
                });
            }
        }

        wells.push(WellPosition {
            well_id: id.as_ref().to_string(),
            row: parsed.row,
            column: parsed.column,
            row_label: parsed.row_label,
            column_label: parsed.column_label,
            x,
            y,
        });
    }

    let bounds = bounds.unwrap_or(PlotBounds {
        x_min: 0.0,
        x_max: canvas_width,
        y_min: 0.0,
        y_max: canvas_height,
    });

    Ok(PlateLayout {
        format,
        wells,
        bounds,
    })
}

/// Linear nearest-neighbor search under Euclidean distance, capped at
/// `max_distance`. Used for pointer-hover interactions; a linear scan is
/// adequate at plate scale (at most 1536 wells).
pub fn find_nearest_well<'a>(
    x: f64,
    y: f64,
    wells: &'a [WellPosition],
    max_distance: f64,
) -> Option<&'a WellPosition> {
    let mut best: Option<(&WellPosition, f64)> = None;
    for well in wells {
        let distance = ((well.x - x).powi(2) + (well.y - y).powi(2)).sqrt();
        if distance <= max_distance && best.map_or(true, |(_, d)| distance < d) {
            best = Some((well, distance));
        }
    }
    best.map(|(well, _)| well)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_standard_id() {
        let parsed = parse_well_id("A01").unwrap();
        assert_eq!(parsed.row, 0);
        assert_eq!(parsed.column, 0);
        assert_eq!(parsed.row_label, "A");
        assert_eq!(parsed.column_label, "1");
    }

    #[test]
    fn test_parse_reversed_id() {
        let parsed = parse_well_id("12AB").unwrap();
        assert_eq!(parsed.row, 27);
        assert_eq!(parsed.column, 11);
    }

    #[test]
    fn test_parse_rejects_junk() {
        assert!(parse_well_id("").is_none());
        assert!(parse_well_id("A0").is_none());
        assert!(parse_well_id("A1B2").is_none());
        assert!(parse_well_id("-A1").is_none());
        assert!(parse_well_id("well").is_none());
        assert!(parse_well_id("42").is_none());
    }

    #[test]
    fn test_single_row_format_uses_midpoint() {
        let format = PlateFormat {
            name: "strip",
            rows: 1,
            columns: 12,
            wells: 12,
        };
        let (_, y) = calculate_well_position(0, 0, format, 100.0, 100.0);
        assert!((y - 50.0).abs() < 1e-9);
    }
}
