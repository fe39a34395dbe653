//! Trouble records produced by the classifiers

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::Reading;

// ============================================================================
// Classifier Mode
// ============================================================================

/// Which classifier a request runs.
///
/// The two modes keep their own rule priority: threshold mode checks raw
/// limits only, regression mode checks the residual before any raw limit.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum ClassifierMode {
    /// Fixed pressure / temperature / DV limits
    #[default]
    Threshold,
    /// OLS baseline `DV ~ Pressure + Temperature`, residual check first
    Regression,
}

impl std::fmt::Display for ClassifierMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ClassifierMode::Threshold => write!(f, "threshold"),
            ClassifierMode::Regression => write!(f, "regression"),
        }
    }
}

// ============================================================================
// Trouble Type
// ============================================================================

/// Kind of trouble attributed to a reading.
///
/// The first three variants come from threshold mode, the rest from
/// regression mode. A reading that is not troubled has no `TroubleType`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TroubleType {
    PressureIssue,
    TemperatureIssue,
    DvExtreme,
    HighAnomaly,
    LowPressure,
    HighPressure,
    LowTemperature,
    HighTemperature,
    ExtremeDv,
}

impl TroubleType {
    /// Wire name, identical to the serde representation.
    pub fn as_str(self) -> &'static str {
        match self {
            TroubleType::PressureIssue => "PRESSURE_ISSUE",
            TroubleType::TemperatureIssue => "TEMPERATURE_ISSUE",
            TroubleType::DvExtreme => "DV_EXTREME",
            TroubleType::HighAnomaly => "HIGH_ANOMALY",
            TroubleType::LowPressure => "LOW_PRESSURE",
            TroubleType::HighPressure => "HIGH_PRESSURE",
            TroubleType::LowTemperature => "LOW_TEMPERATURE",
            TroubleType::HighTemperature => "HIGH_TEMPERATURE",
            TroubleType::ExtremeDv => "EXTREME_DV",
        }
    }
}

impl std::fmt::Display for TroubleType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Trouble
// ============================================================================

/// A reading flagged by a classifier.
///
/// All measurement fields are copied verbatim from the source reading.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Trouble {
    #[serde(with = "super::timestamp")]
    pub timestamp: NaiveDateTime,
    pub pressure: f64,
    pub temperature: f64,
    pub dv: f64,
    pub trouble_type: TroubleType,
}

impl Trouble {
    pub fn from_reading(reading: &Reading, trouble_type: TroubleType) -> Self {
        Self {
            timestamp: reading.timestamp,
            pressure: reading.pressure,
            temperature: reading.temperature,
            dv: reading.dv,
            trouble_type,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_trouble_copies_reading_fields() {
        let ts = NaiveDate::from_ymd_opt(2024, 6, 19)
            .unwrap()
            .and_hms_opt(12, 30, 5)
            .unwrap();
        let reading = Reading::new(ts, 25.0, 50.0, -3.5);
        let trouble = Trouble::from_reading(&reading, TroubleType::PressureIssue);

        assert_eq!(trouble.timestamp, reading.timestamp);
        assert_eq!(trouble.pressure, reading.pressure);
        assert_eq!(trouble.temperature, reading.temperature);
        assert_eq!(trouble.dv, reading.dv);
    }

    #[test]
    fn test_trouble_json_shape() {
        let ts = NaiveDate::from_ymd_opt(2024, 6, 19)
            .unwrap()
            .and_hms_opt(12, 30, 5)
            .unwrap();
        let trouble = Trouble::from_reading(
            &Reading::new(ts, 10.0, 25.0, 600.0),
            TroubleType::DvExtreme,
        );
        let json = serde_json::to_value(trouble).unwrap();
        assert_eq!(json["timestamp"], "2024-06-19 12:30:05");
        assert_eq!(json["trouble_type"], "DV_EXTREME");
    }

    #[test]
    fn test_trouble_type_display_matches_serde() {
        for kind in [
            TroubleType::PressureIssue,
            TroubleType::HighAnomaly,
            TroubleType::LowTemperature,
            TroubleType::ExtremeDv,
        ] {
            let json = serde_json::to_value(kind).unwrap();
            assert_eq!(json, kind.to_string());
        }
    }

    #[test]
    fn test_mode_parses_lowercase() {
        let mode: ClassifierMode = serde_json::from_str("\"regression\"").unwrap();
        assert_eq!(mode, ClassifierMode::Regression);
        assert_eq!(ClassifierMode::default(), ClassifierMode::Threshold);
    }
}
