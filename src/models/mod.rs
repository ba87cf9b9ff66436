//! Core domain types for plate analytics.

pub mod plate;

pub mod well;

pub use plate::{PlateFormat, FORMAT_1536, FORMAT_384, FORMAT_96, PLATE_FORMATS};
pub use well::WellRecord;
