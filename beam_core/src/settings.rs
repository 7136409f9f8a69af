//! # Analysis Settings
//!
//! Engine-wide knobs that are not part of a beam configuration. Settings
//! serialize to JSON; missing fields take their defaults so older settings
//! files keep loading.
//!
//! ## JSON Example
//!
//! ```json
//! {
//!   "diagram_points": 40,
//!   "num_scale_threshold": 1e15,
//!   "processing_delay_ms": 600,
//!   "share_param": "beam"
//! }
//! ```

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::configuration::BeamConfiguration;

/// Default number of diagram intervals (41 samples)
pub const DEFAULT_DIAGRAM_POINTS: usize = 40;

/// Default load × span⁴ magnitude (N·m⁴) above which `NUM_SCALE` is raised
pub const DEFAULT_NUM_SCALE_THRESHOLD: f64 = 1e15;

/// Default artificial recalculation delay
pub const DEFAULT_PROCESSING_DELAY_MS: u64 = 600;

/// Default share-link query parameter name
pub const DEFAULT_SHARE_PARAM: &str = "beam";

/// Engine settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisSettings {
    /// Number of intervals the span is divided into for diagrams
    pub diagram_points: usize,

    /// Magnitude of factored load × span⁴ (base units) that triggers `NUM_SCALE`
    pub num_scale_threshold: f64,

    /// Artificial "processing" delay before a recalculation completes
    pub processing_delay_ms: u64,

    /// Query parameter carrying the share token
    pub share_param: String,

    /// Configuration used when nothing else is available
    pub default_configuration: BeamConfiguration,
}

impl Default for AnalysisSettings {
    fn default() -> Self {
        AnalysisSettings {
            diagram_points: DEFAULT_DIAGRAM_POINTS,
            num_scale_threshold: DEFAULT_NUM_SCALE_THRESHOLD,
            processing_delay_ms: DEFAULT_PROCESSING_DELAY_MS,
            share_param: DEFAULT_SHARE_PARAM.to_string(),
            default_configuration: BeamConfiguration::default(),
        }
    }
}

impl AnalysisSettings {
    /// Processing delay as a Duration
    pub fn processing_delay(&self) -> Duration {
        Duration::from_millis(self.processing_delay_ms)
    }

    /// Diagram interval count, never below one
    pub fn diagram_intervals(&self) -> usize {
        self.diagram_points.max(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let s = AnalysisSettings::default();
        assert_eq!(s.diagram_points, 40);
        assert_eq!(s.share_param, "beam");
        assert_eq!(s.processing_delay(), Duration::from_millis(600));
        assert_eq!(s.default_configuration, BeamConfiguration::default());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let s: AnalysisSettings = serde_json::from_str(r#"{ "diagram_points": 80 }"#).unwrap();
        assert_eq!(s.diagram_points, 80);
        assert_eq!(s.num_scale_threshold, DEFAULT_NUM_SCALE_THRESHOLD);
        assert_eq!(s.share_param, DEFAULT_SHARE_PARAM);
    }

    #[test]
    fn test_zero_points_clamped() {
        let s = AnalysisSettings {
            diagram_points: 0,
            ..Default::default()
        };
        assert_eq!(s.diagram_intervals(), 1);
    }
}
