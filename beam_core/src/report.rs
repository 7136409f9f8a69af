//! # Report Text
//!
//! Plain-text pieces an export consumer needs: the labelled configuration
//! summary and the headline result lines. Rendering them into a document or
//! image is left to the consumer.
//!
//! ```rust
//! use beam_core::calculations::solve;
//! use beam_core::configuration::BeamConfiguration;
//! use beam_core::report::{report_lines, ConfigurationSummary};
//! use beam_core::settings::AnalysisSettings;
//!
//! let config = BeamConfiguration::default();
//! let summary = ConfigurationSummary::from_configuration(&config);
//! let result = solve(&config, &AnalysisSettings::default());
//!
//! for line in report_lines(&summary, &result) {
//!     println!("{}", line);
//! }
//! ```

use serde::{Deserialize, Serialize};

use crate::calculations::AnalysisResult;
use crate::configuration::{BeamConfiguration, LoadType};
use crate::units::{Kilonewtons, Meters, Newtons};

/// Report title
pub const REPORT_TITLE: &str = "Beam Deflection & Load Report";

/// Labelled configuration values, formatted for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfigurationSummary {
    /// Span with unit, e.g. "6.00 m"
    pub length: String,
    pub support: String,
    pub material: String,
    pub section: String,
    pub load_type: String,
    /// Load with unit, e.g. "50 kN" or "12.5 kN/m"
    pub load: String,
    /// Only for point loads
    pub position: Option<String>,
    pub unit_label: String,
}

impl ConfigurationSummary {
    pub fn from_configuration(config: &BeamConfiguration) -> Self {
        let unit = config.unit_system.length_label();
        ConfigurationSummary {
            length: format!("{:.2} {}", config.length, unit),
            support: config.support_type.display_name().to_string(),
            material: config.material.display_name().to_string(),
            section: config.section_shape.display_name().to_string(),
            load_type: config.load_type.display_name().to_string(),
            load: format!("{} {}", config.load_value, config.load_type.load_label()),
            position: match config.load_type {
                LoadType::PointLoad => Some(format!("{} {}", config.load_position, unit)),
                LoadType::UniformDistributed => None,
            },
            unit_label: unit.to_string(),
        }
    }

    /// "Label: value" pairs in display order
    pub fn entries(&self) -> Vec<(&'static str, &str)> {
        let mut entries = vec![
            ("L", self.length.as_str()),
            ("Support", self.support.as_str()),
            ("Material", self.material.as_str()),
            ("Section", self.section.as_str()),
            ("Load", self.load.as_str()),
        ];
        if let Some(pos) = &self.position {
            entries.push(("Pos", pos.as_str()));
        }
        entries
    }
}

/// Report header plus headline values.
///
/// Deflection is printed in mm, shear in kN and moment in kN·m. A safety
/// factor below 1.0 gets the "Increase section / reduce load" advice.
pub fn report_lines(summary: &ConfigurationSummary, result: &AnalysisResult) -> Vec<String> {
    let mut lines = vec![
        REPORT_TITLE.to_string(),
        format!(
            "Material: {} | Support: {} | Load: {}",
            summary.material, summary.support, summary.load_type
        ),
        format!(
            "Max Deflection: {:.2} mm",
            Meters(result.deflection_max_m).millimeters()
        ),
        format!(
            "Max Shear: {:.2} kN",
            Kilonewtons::from(Newtons(result.shear_max_n)).0
        ),
        format!(
            "Max Moment: {:.2} kN·m",
            Kilonewtons::from(Newtons(result.moment_max_nm)).0
        ),
        format!("Safety Factor: {:.2}", result.safety_factor),
    ];
    if result.safety_factor > 0.0 && result.safety_factor < 1.0 {
        lines.push("Increase section / reduce load".to_string());
    }
    lines.extend(result.warnings.iter().map(|w| w.to_string()));
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculations::solve;
    use crate::settings::AnalysisSettings;
    use crate::units::UnitSystem;

    #[test]
    fn test_summary_point_load() {
        let s = ConfigurationSummary::from_configuration(&BeamConfiguration::default());
        assert_eq!(s.length, "6.00 m");
        assert_eq!(s.support, "Simply Supported");
        assert_eq!(s.load, "50 kN");
        assert_eq!(s.position.as_deref(), Some("3 m"));
        assert_eq!(s.entries().len(), 6);
    }

    #[test]
    fn test_summary_uniform_imperial() {
        let c = BeamConfiguration {
            load_type: LoadType::UniformDistributed,
            load_value: 12.5,
            unit_system: UnitSystem::Imperial,
            length: 20.0,
            ..Default::default()
        };
        let s = ConfigurationSummary::from_configuration(&c);
        assert_eq!(s.length, "20.00 ft");
        assert_eq!(s.load, "12.5 kN/m");
        assert!(s.position.is_none());
        assert_eq!(s.entries().len(), 5);
    }

    #[test]
    fn test_report_lines() {
        let c = BeamConfiguration::default();
        let r = solve(&c, &AnalysisSettings::default());
        let lines = report_lines(&ConfigurationSummary::from_configuration(&c), &r);
        assert_eq!(lines[0], REPORT_TITLE);
        assert_eq!(lines[3], "Max Shear: 25.00 kN");
        assert_eq!(lines[4], "Max Moment: 75.00 kN·m");
        assert_eq!(lines.len(), 6);
    }
}
