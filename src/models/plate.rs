//! Plate format registry.
//!
//! The known microtiter plate shapes, held as immutable module-level
//! constants. Formats are detected once per plate and shared by reference;
//! nothing here is ever mutated.

use serde::Serialize;

/// Fixed grid shape of a microtiter plate.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
pub struct PlateFormat {
    pub name: &'static str,
    pub rows: usize,
    pub columns: usize,
    pub wells: usize,
}

/// Standard 96-well plate (8 rows x 12 columns).
pub const FORMAT_96: PlateFormat = PlateFormat {
    name: "96-well",
    rows: 8,
    columns: 12,
    wells: 96,
};

/// Standard 384-well plate (16 rows x 24 columns).
pub const FORMAT_384: PlateFormat = PlateFormat {
    name: "384-well",
    rows: 16,
    columns: 24,
    wells: 384,
};

/// Standard 1536-well plate (32 rows x 48 columns).
pub const FORMAT_1536: PlateFormat = PlateFormat {
    name: "1536-well",
    rows: 32,
    columns: 48,
    wells: 1536,
};

/// Known formats, smallest first. Detection walks this in order so ties
/// resolve toward the smaller plate.
pub const PLATE_FORMATS: [PlateFormat; 3] = [FORMAT_96, FORMAT_384, FORMAT_1536];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_grid_consistency() {
        for format in PLATE_FORMATS {
            assert_eq!(format.rows * format.columns, format.wells);
        }
    }

    #[test]
    fn test_formats_ordered_smallest_first() {
        assert!(PLATE_FORMATS
            .windows(2)
            .all(|pair| pair[0].wells < pair[1].wells));
    }
}
