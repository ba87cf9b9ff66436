//! # Platescan Rust Backend
//!
//! Plate spatial-analytics engine for high-throughput screening dashboards.
//!
//! This crate provides the computational support layer underneath the
//! screening dashboard's heatmaps and charts: well-identifier parsing and
//! plate-format detection, robust descriptive statistics over well
//! measurements, systematic spatial-bias detection, and color-scale domain
//! calibration. Everything here is a pure function over immutable inputs;
//! rendering, transport, and persistence live elsewhere.
//!
//! ## Architecture
//!
//! The crate is organized into several logical modules:
//!
//! - [`api`]: Data Transfer Objects (DTOs) consumed by the rendering layer
//! - [`models`]: Core domain types (well records, plate formats)
//! - [`services`]: The analytic components (layout, statistics, artifacts,
//!   color scales)
//! - [`config`]: TOML-backed analysis thresholds
//!
//! ## Failure semantics
//!
//! Data-quality problems are never errors. Unparseable well identifiers are
//! skipped, insufficient samples produce empty results, and degenerate
//! numeric input takes explicit fallback branches. No valid input produces
//! NaN or infinity in any serialized output. The [`error::AnalysisError`]
//! type is reserved for contract violations such as a zero-sized canvas or
//! an unparseable configuration file.

pub mod api;
pub mod config;
pub mod error;
pub mod models;

pub mod services;

#[cfg(test)]
mod api_tests;
