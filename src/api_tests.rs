#[cfg(test)]
mod tests {
    use crate::api::{
        EffectStatistics, EffectType, ScaleType, Severity, SpatialEffect, StatisticalSummary,
        WellRecord,
    };
    use crate::services::color_scale::diverging_score_scale;

    #[test]
    fn test_well_record_json_round_trip() {
        let record = WellRecord::new("A01", "plate-7")
            .with_metric("reporter_ratio", 1.25)
            .with_metric("normalized_score", -2.1);

        let json = serde_json::to_string(&record).unwrap();
        let back: WellRecord = serde_json::from_str(&json).unwrap();

        assert_eq!(back.well_id, "A01");
        assert_eq!(back.metric("reporter_ratio"), Some(1.25));
        assert_eq!(back.metric("normalized_score"), Some(-2.1));
    }

    #[test]
    fn test_summary_serializes_without_nan() {
        let summary = StatisticalSummary::default();
        let json = serde_json::to_string(&summary).unwrap();
        assert!(!json.contains("null"));
        assert!(json.contains("\"count\":0"));
    }

    #[test]
    fn test_effect_type_serializes_lowercase() {
        let effect = SpatialEffect {
            effect_type: EffectType::Edge,
            severity: Severity::High,
            affected_wells: vec!["A01".to_string()],
            description: "Edge wells average 50.00 higher than interior wells".to_string(),
            statistics: EffectStatistics {
                mean_difference: 50.0,
                effect_size: 2.0,
                p_value: Some(0.001),
            },
        };

        let json = serde_json::to_string(&effect).unwrap();
        assert!(json.contains("\"effect_type\":\"edge\""));
        assert!(json.contains("\"severity\":\"high\""));
    }

    #[test]
    fn test_color_scale_json_shape() {
        let scale = diverging_score_scale();
        let json = serde_json::to_string(&scale).unwrap();
        assert!(json.contains("\"scale_type\":\"diverging\""));
        assert!(json.contains("\"domain\":[-3.0,3.0]"));

        let back: crate::api::ColorScale = serde_json::from_str(&json).unwrap();
        assert_eq!(back.scale_type, ScaleType::Diverging);
        assert_eq!(back.center, Some(0.0));
    }
}
