//! Well record type.
//!
//! Records are produced by the upstream analysis pipeline and are read-only
//! to this crate. The metric map is open-ended: the upstream pipeline owns
//! the metric names and hit-calling thresholds, and this crate iterates
//! them generically.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One measured well on a plate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WellRecord {
    /// Well identifier, e.g. "A01".
    pub well_id: String,
    /// Plate identifier.
    pub plate_id: String,
    /// Named metric values. A missing metric is simply absent from the map.
    #[serde(default)]
    pub metrics: HashMap<String, f64>,
    /// Viability flag from the upstream pipeline.
    pub viable: bool,
    /// Hit-calling label computed upstream ("reporter hit", "vitality hit",
    /// "platform hit"); carried through unmodified.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hit_call: Option<String>,
}

impl WellRecord {
    /// Create a viable record with no metrics.
    pub fn new(well_id: impl Into<String>, plate_id: impl Into<String>) -> Self {
        WellRecord {
            well_id: well_id.into(),
            plate_id: plate_id.into(),
            metrics: HashMap::new(),
            viable: true,
            hit_call: None,
        }
    }

    /// Attach a metric value.
    pub fn with_metric(mut self, name: impl Into<String>, value: f64) -> Self {
        self.metrics.insert(name.into(), value);
        self
    }

    /// Finite value of the named metric, or `None` when the metric is
    /// missing or non-finite. Statistics and the artifact detector only
    /// ever see wells through this accessor.
    pub fn metric(&self, name: &str) -> Option<f64> {
        self.metrics.get(name).copied().filter(|v| v.is_finite())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metric_accessor_filters_non_finite() {
        let record = WellRecord::new("A01", "plate-1")
            .with_metric("ratio", 1.5)
            .with_metric("score", f64::NAN);

        assert_eq!(record.metric("ratio"), Some(1.5));
        assert_eq!(record.metric("score"), None);
        assert_eq!(record.metric("absent"), None);
    }

    #[test]
    fn test_deserialize_without_optional_fields() {
        let json = r#"{"well_id": "B03", "plate_id": "p1", "viable": false}"#;
        let record: WellRecord = serde_json::from_str(json).unwrap();

        assert_eq!(record.well_id, "B03");
        assert!(!record.viable);
        assert!(record.metrics.is_empty());
        assert!(record.hit_call.is_none());
    }
}
