//! Chart series for the dashboard page
//!
//! The page draws its own charts, so the server hands it a bounded,
//! reproducible sample of readings instead of the full dataset.

use chrono::NaiveDateTime;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;

use crate::classifier::LinearModel;
use crate::config::SeriesConfig;
use crate::types::{ClassifierMode, Dataset, Trouble, TroubleType};

/// One sampled reading.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SeriesPoint {
    #[serde(with = "crate::types::timestamp")]
    pub timestamp: NaiveDateTime,
    pub pressure: f64,
    pub temperature: f64,
    pub dv: f64,
    /// Model prediction, regression mode only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub predicted_dv: Option<f64>,
}

/// Trouble overlaid on the DV chart.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TroubleMarker {
    #[serde(with = "crate::types::timestamp")]
    pub timestamp: NaiveDateTime,
    pub dv: f64,
    pub trouble_type: TroubleType,
}

impl From<&Trouble> for TroubleMarker {
    fn from(t: &Trouble) -> Self {
        Self {
            timestamp: t.timestamp,
            dv: t.dv,
            trouble_type: t.trouble_type,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Series {
    pub mode: ClassifierMode,
    pub points: Vec<SeriesPoint>,
    pub troubles: Vec<TroubleMarker>,
}

impl Series {
    pub fn build(
        dataset: &Dataset,
        troubles: &[Trouble],
        model: Option<&LinearModel>,
        mode: ClassifierMode,
        config: &SeriesConfig,
    ) -> Self {
        let mut points: Vec<SeriesPoint> = sample_indices(dataset.len(), config.sample_size, config.seed)
            .into_iter()
            .map(|i| {
                let r = &dataset.readings()[i];
                SeriesPoint {
                    timestamp: r.timestamp,
                    pressure: r.pressure,
                    temperature: r.temperature,
                    dv: r.dv,
                    predicted_dv: model.map(|m| m.predict(r.pressure, r.temperature)),
                }
            })
            .collect();

        // Stable sort keeps source order for equal timestamps
        points.sort_by_key(|p| p.timestamp);

        Self {
            mode,
            points,
            troubles: troubles
                .iter()
                .take(config.marker_limit)
                .map(TroubleMarker::from)
                .collect(),
        }
    }
}

/// `min(sample_size, len)` distinct indices drawn with a seeded RNG.
fn sample_indices(len: usize, sample_size: usize, seed: u64) -> Vec<usize> {
    let amount = sample_size.min(len);
    let mut rng = StdRng::seed_from_u64(seed);
    rand::seq::index::sample(&mut rng, len, amount).into_vec()
}
