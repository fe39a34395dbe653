//! Per-request dashboard pipeline: load → classify → summarize
//!
//! Nothing is cached between calls. Each build reloads the CSV named by the
//! config and recomputes everything from scratch, so the result always
//! reflects the file as it is now.

use serde::Serialize;
use tracing::info;

use crate::acquisition::{load_csv, LoadError};
use crate::classifier::{Classifier, Detection};
use crate::config::DashboardConfig;
use crate::series::Series;
use crate::summary::Summary;
use crate::types::{ClassifierMode, Dataset};

/// Body of `GET /api/dashboard-data`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardData {
    #[serde(flatten)]
    pub summary: Summary,
    /// Always `null`; charts are drawn client-side from `/api/series`.
    pub plot_url: Option<String>,
    pub mode: ClassifierMode,
}

/// One classification pass over a loaded dataset.
#[derive(Debug, Clone)]
pub struct Analysis {
    pub dataset: Dataset,
    pub detection: Detection,
    pub mode: ClassifierMode,
}

impl Analysis {
    /// Classify an already loaded dataset.
    pub fn run(dataset: Dataset, config: &DashboardConfig) -> Self {
        let classifier = Classifier::new(&config.classifier);
        let detection = classifier.detect(&dataset);
        Self {
            dataset,
            detection,
            mode: classifier.mode(),
        }
    }

    /// Load the configured CSV and classify it.
    pub fn load(config: &DashboardConfig) -> Result<Self, LoadError> {
        let dataset = load_csv(&config.data.path)?;
        let analysis = Self::run(dataset, config);
        info!(
            mode = %analysis.mode,
            total = analysis.dataset.len(),
            troubles = analysis.detection.troubles.len(),
            "Dashboard analysis complete"
        );
        Ok(analysis)
    }

    pub fn dashboard_data(&self, config: &DashboardConfig) -> DashboardData {
        DashboardData {
            summary: Summary::build(&self.dataset, &self.detection.troubles, &config.summary),
            plot_url: None,
            mode: self.mode,
        }
    }

    pub fn series(&self, config: &DashboardConfig) -> Series {
        Series::build(
            &self.dataset,
            &self.detection.troubles,
            self.detection.model.as_ref(),
            self.mode,
            &config.series,
        )
    }
}

/// Full dashboard payload for the configured data file.
pub fn build_dashboard(config: &DashboardConfig) -> Result<DashboardData, LoadError> {
    Ok(Analysis::load(config)?.dashboard_data(config))
}

/// Chart series for the configured data file.
pub fn build_series(config: &DashboardConfig) -> Result<Series, LoadError> {
    Ok(Analysis::load(config)?.series(config))
}
