//! Error types for the analytics engine.
//!
//! Almost everything in this crate degrades instead of failing: missing
//! metrics, unparseable well identifiers, and insufficient sample counts
//! all produce empty or zero-valued outputs. Errors are reserved for
//! contract violations by the caller.

/// Result type for analytics operations.
pub type AnalysisResult<T> = Result<T, AnalysisError>;

/// Error type for contract-level failures.
#[derive(Debug, thiserror::Error)]
pub enum AnalysisError {
    /// Configuration file could not be read or parsed.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Canvas dimensions must be finite and positive.
    #[error("Invalid canvas size: {width}x{height}")]
    InvalidCanvas { width: f64, height: f64 },
}
