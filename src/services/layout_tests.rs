#[cfg(test)]
mod tests {
    use crate::error::AnalysisError;
    use crate::models::plate::{FORMAT_1536, FORMAT_384, FORMAT_96};
    use crate::services::layout::{
        create_plate_layout, detect_plate_format, find_nearest_well, parse_well_id,
        row_index_from_label, row_label_from_index, PLOT_MARGIN_FRACTION,
    };

    /// Build the identifiers of a full grid, e.g. all 96 wells of an 8x12 plate.
    fn grid_ids(rows: usize, columns: usize) -> Vec<String> {
        let mut ids = Vec::with_capacity(rows * columns);
        for row in 0..rows {
            for column in 0..columns {
                ids.push(format!("{}{:02}", row_label_from_index(row), column + 1));
            }
        }
        ids
    }

    #[test]
    fn test_row_label_round_trip() {
        for row in 0..2000 {
            let label = row_label_from_index(row);
            assert_eq!(
                row_index_from_label(&label),
                Some(row),
                "row {} -> label {}",
                row,
                label
            );
        }
    }

    #[test]
    fn test_row_label_boundary_transitions() {
        assert_eq!(row_label_from_index(0), "A");
        assert_eq!(row_label_from_index(25), "Z");
        assert_eq!(row_label_from_index(26), "AA");
        assert_eq!(row_label_from_index(51), "AZ");
        assert_eq!(row_label_from_index(52), "BA");
        assert_eq!(row_index_from_label("AA"), Some(26));
        assert_eq!(row_index_from_label("ba"), Some(52));
    }

    #[test]
    fn test_detect_format_96() {
        let ids = grid_ids(8, 12);
        assert_eq!(detect_plate_format(&ids), FORMAT_96);
    }

    #[test]
    fn test_detect_format_monotonic_switch_to_384() {
        let mut ids = grid_ids(8, 12);
        assert_eq!(detect_plate_format(&ids), FORMAT_96);

        // One identifier at row index 10 pushes the same set to 384-well.
        ids.push(format!("{}05", row_label_from_index(10)));
        assert_eq!(detect_plate_format(&ids), FORMAT_384);
    }

    #[test]
    fn test_detect_format_1536() {
        let ids = vec!["AF48".to_string()];
        assert_eq!(detect_plate_format(&ids), FORMAT_1536);
    }

    #[test]
    fn test_detect_format_fallback_by_count() {
        let junk: Vec<String> = (0..300).map(|i| format!("well#{}", i)).collect();
        assert_eq!(detect_plate_format(&junk), FORMAT_384);

        let few: Vec<String> = (0..5).map(|i| format!("well#{}", i)).collect();
        assert_eq!(detect_plate_format(&few), FORMAT_96);
    }

    #[test]
    fn test_layout_positions_respect_margin() {
        let ids = grid_ids(8, 12);
        let layout = create_plate_layout(&ids, 1000.0, 800.0).unwrap();
        assert_eq!(layout.wells.len(), 96);

        let margin_x = 1000.0 * PLOT_MARGIN_FRACTION;
        let margin_y = 800.0 * PLOT_MARGIN_FRACTION;
        for well in &layout.wells {
            assert!(well.x >= margin_x - 1e-9 && well.x <= 1000.0 - margin_x + 1e-9);
            assert!(well.y >= margin_y - 1e-9 && well.y <= 800.0 - margin_y + 1e-9);
        }

        assert!((layout.bounds.x_min - margin_x).abs() < 1e-9);
        assert!((layout.bounds.x_max - (1000.0 - margin_x)).abs() < 1e-9);
    }

    #[test]
    fn test_layout_skips_unparseable_ids() {
        let ids = vec!["A01".to_string(), "garbage".to_string(), "B02".to_string()];
        let layout = create_plate_layout(&ids, 500.0, 500.0).unwrap();
        assert_eq!(layout.wells.len(), 2);
    }

    #[test]
    fn test_layout_preserves_duplicates() {
        let ids = vec!["A01".to_string(), "A01".to_string()];
        let layout = create_plate_layout(&ids, 500.0, 500.0).unwrap();
        assert_eq!(layout.wells.len(), 2);
        assert_eq!(layout.wells[0].x, layout.wells[1].x);
    }

    #[test]
    fn test_layout_empty_input_has_finite_bounds() {
        let ids: Vec<String> = vec![];
        let layout = create_plate_layout(&ids, 640.0, 480.0).unwrap();
        assert!(layout.wells.is_empty());
        assert_eq!(layout.bounds.x_min, 0.0);
        assert_eq!(layout.bounds.x_max, 640.0);
        assert_eq!(layout.bounds.y_min, 0.0);
        assert_eq!(layout.bounds.y_max, 480.0);
    }

    #[test]
    fn test_layout_rejects_invalid_canvas() {
        let ids = vec!["A01".to_string()];
        let result = create_plate_layout(&ids, 0.0, 600.0);
        assert!(matches!(result, Err(AnalysisError::InvalidCanvas { .. })));

        let result = create_plate_layout(&ids, f64::NAN, 600.0);
        assert!(result.is_err());
    }

    #[test]
    fn test_find_nearest_well() {
        let ids = grid_ids(8, 12);
        let layout = create_plate_layout(&ids, 1000.0, 800.0).unwrap();

        let target = &layout.wells[30];
        let found = find_nearest_well(target.x + 2.0, target.y - 2.0, &layout.wells, 10.0);
        assert_eq!(found.unwrap().well_id, target.well_id);
    }

    #[test]
    fn test_find_nearest_well_respects_max_distance() {
        let ids = grid_ids(8, 12);
        let layout = create_plate_layout(&ids, 1000.0, 800.0).unwrap();

        assert!(find_nearest_well(-500.0, -500.0, &layout.wells, 10.0).is_none());
        assert!(find_nearest_well(0.0, 0.0, &[], 1000.0).is_none());
    }

    #[test]
    fn test_parsed_column_is_zero_based() {
        let parsed = parse_well_id("H12").unwrap();
        assert_eq!(parsed.row, 7);
        assert_eq!(parsed.column, 11);
        assert_eq!(parsed.column_label, "12");
    }
}
