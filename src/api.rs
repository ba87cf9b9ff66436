//! Public API surface for the analytics engine.
//!
//! This file consolidates the DTO types handed to the rendering layer.
//! All types serialize to JSON for the charting frontend.

pub use crate::config::{AnalysisConfig, ArtifactSettings, ValidationSettings};
pub use crate::error::{AnalysisError, AnalysisResult};
pub use crate::models::plate::{PlateFormat, FORMAT_1536, FORMAT_384, FORMAT_96, PLATE_FORMATS};
pub use crate::models::well::WellRecord;
pub use crate::services::artifacts::{EffectStatistics, EffectType, Severity, SpatialEffect};
pub use crate::services::color_scale::{
    ColorMapping, ColorScale, DomainOptions, LegendEntry, ScaleType, CATEGORICAL_PALETTE,
};
pub use crate::services::layout::{
    ParsedWellId, PlateLayout, PlotBounds, WellPosition, PLOT_MARGIN_FRACTION,
};
pub use crate::services::statistics::{
    Correlation, StatisticalSummary, Trendline, ViabilityCounts,
};
