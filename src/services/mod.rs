//! Service layer: the analytic components over immutable well data.
//!
//! Each service is a set of pure functions. Nothing here performs I/O,
//! holds mutable state, or writes back into another component; all four
//! are safe to invoke concurrently on independent inputs.

pub mod artifacts;

pub mod color_scale;

pub mod layout;

pub mod statistics;

#[cfg(test)]
mod layout_tests;

pub use artifacts::detect_spatial_artifacts;
pub use color_scale::{
    calculate_optimal_domain, generate_color_scale_legend, get_categorical_palette,
    get_color_scale_for_data_type, map_value_to_color, optimize_scale_for_values,
};
pub use layout::{
    calculate_well_position, create_plate_layout, detect_plate_format, find_nearest_well,
    parse_well_id, row_index_from_label, row_label_from_index,
};
pub use statistics::{
    calculate_correlation, calculate_statistics, calculate_trendline, calculate_viability_counts,
    validate_data,
};
