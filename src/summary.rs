//! Dashboard summary aggregation
//!
//! Turns a dataset plus its trouble list into the figures shown on the
//! dashboard: counts, rate, status banner, per-type counts, averages and the
//! alert panel text.

use std::collections::BTreeMap;

use serde::Serialize;
use statrs::statistics::Statistics;

use crate::config::SummaryConfig;
use crate::types::{DashboardStatus, Dataset, Trouble, TroubleType};

/// Alert panel line when nothing is wrong.
pub const NO_ALERTS_MESSAGE: &str = "No active alerts";

/// Fixed follow-up actions shown whenever at least one trouble exists.
pub const RECOMMENDATIONS: [&str; 3] = [
    "Check sensor readings",
    "Monitor system parameters",
    "Review recent changes",
];

/// Dataset means, rounded to 2 decimals.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Averages {
    pub avg_dv: f64,
    pub avg_pressure: f64,
    pub avg_temperature: f64,
}

impl Averages {
    /// All zero for an empty dataset.
    pub fn from_dataset(dataset: &Dataset) -> Self {
        if dataset.is_empty() {
            return Self::default();
        }
        Self {
            avg_dv: round2(dataset.dvs().mean()),
            avg_pressure: round2(dataset.pressures().mean()),
            avg_temperature: round2(dataset.temperatures().mean()),
        }
    }
}

/// Aggregated view of one classification pass.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    pub status: DashboardStatus,
    pub trouble_count: usize,
    pub total_count: usize,
    /// Percentage of troubled readings, 0 when the dataset is empty.
    pub trouble_rate: f64,
    pub alerts: Vec<Trouble>,
    pub trouble_counts: BTreeMap<TroubleType, usize>,
    pub averages: Averages,
    pub messages: Vec<String>,
    pub recommendations: Vec<String>,
}

impl Summary {
    pub fn build(dataset: &Dataset, troubles: &[Trouble], config: &SummaryConfig) -> Self {
        let trouble_count = troubles.len();
        let total_count = dataset.len();

        let mut trouble_counts = BTreeMap::new();
        for t in troubles {
            *trouble_counts.entry(t.trouble_type).or_insert(0) += 1;
        }

        let messages = if troubles.is_empty() {
            vec![NO_ALERTS_MESSAGE.to_string()]
        } else {
            troubles
                .iter()
                .take(config.message_limit)
                .map(alert_message)
                .collect()
        };

        let recommendations = if troubles.is_empty() {
            Vec::new()
        } else {
            RECOMMENDATIONS.iter().map(|s| s.to_string()).collect()
        };

        Self {
            status: DashboardStatus::from_trouble_count(trouble_count),
            trouble_count,
            total_count,
            trouble_rate: trouble_rate(trouble_count, total_count),
            alerts: troubles.iter().take(config.alert_limit).copied().collect(),
            trouble_counts,
            averages: Averages::from_dataset(dataset),
            messages,
            recommendations,
        }
    }
}

/// `trouble_count / total_count * 100`, or 0 for an empty dataset.
pub fn trouble_rate(trouble_count: usize, total_count: usize) -> f64 {
    if total_count == 0 {
        0.0
    } else {
        trouble_count as f64 / total_count as f64 * 100.0
    }
}

/// Alert panel line for one trouble.
pub fn alert_message(trouble: &Trouble) -> String {
    match trouble.trouble_type {
        TroubleType::HighAnomaly => "DV anomaly detected".to_string(),
        TroubleType::PressureIssue => format!("Pressure issue: {:.2}", trouble.pressure),
        TroubleType::TemperatureIssue => format!("Temperature issue: {:.1}°C", trouble.temperature),
        TroubleType::LowPressure => format!("Low pressure: {:.2}", trouble.pressure),
        TroubleType::HighPressure => format!("High pressure: {:.2}", trouble.pressure),
        TroubleType::LowTemperature => format!("Low temperature: {:.1}°C", trouble.temperature),
        TroubleType::HighTemperature => format!("High temperature: {:.1}°C", trouble.temperature),
        TroubleType::DvExtreme | TroubleType::ExtremeDv => {
            format!("Extreme DV value: {:.1}", trouble.dv)
        }
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
