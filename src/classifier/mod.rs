//! Trouble detection
//!
//! Two interchangeable strategies share one entry point:
//!
//! - **Threshold**: fixed limits on pressure, temperature and DV
//! - **Regression**: OLS baseline for DV plus residual and raw-limit checks
//!
//! Detection is a pure function of the dataset and the classifier config.
//! Troubles come back in dataset order, at most one per reading.

pub mod regression;
pub mod threshold;

pub use regression::{classify_regression, LinearModel};
pub use threshold::classify_threshold;

use tracing::debug;

use crate::config::{ClassifierConfig, ThresholdLimits};
use crate::types::{ClassifierMode, Dataset, Reading, Trouble, TroubleType};

/// Result of one detection pass.
#[derive(Debug, Clone, Default)]
pub struct Detection {
    pub troubles: Vec<Trouble>,
    /// Fitted baseline, present only in regression mode with a non-empty dataset.
    pub model: Option<LinearModel>,
}

/// Configured trouble detector.
#[derive(Debug, Clone)]
pub struct Classifier {
    mode: ClassifierMode,
    limits: ThresholdLimits,
    residual_sigma: f64,
}

impl Classifier {
    pub fn new(config: &ClassifierConfig) -> Self {
        Self {
            mode: config.mode,
            limits: config.limits,
            residual_sigma: config.residual_sigma,
        }
    }

    /// Same classifier, different mode.
    pub fn with_mode(mut self, mode: ClassifierMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn mode(&self) -> ClassifierMode {
        self.mode
    }

    /// Classify every reading in `dataset`.
    pub fn detect(&self, dataset: &Dataset) -> Detection {
        let model = match self.mode {
            ClassifierMode::Threshold => None,
            ClassifierMode::Regression => LinearModel::fit(dataset),
        };

        let troubles: Vec<Trouble> = dataset
            .iter()
            .filter_map(|r| {
                self.classify(r, model.as_ref())
                    .map(|kind| Trouble::from_reading(r, kind))
            })
            .collect();

        debug!(
            mode = %self.mode,
            total = dataset.len(),
            troubles = troubles.len(),
            "Trouble detection complete"
        );

        Detection { troubles, model }
    }

    /// Classify one reading. In regression mode a missing model means the
    /// dataset was empty, so there is nothing to score against.
    pub fn classify(&self, reading: &Reading, model: Option<&LinearModel>) -> Option<TroubleType> {
        match self.mode {
            ClassifierMode::Threshold => classify_threshold(reading, &self.limits),
            ClassifierMode::Regression => model.and_then(|m| {
                classify_regression(reading, m, self.residual_sigma, &self.limits)
            }),
        }
    }
}

impl Default for Classifier {
    fn default() -> Self {
        Self::new(&ClassifierConfig::default())
    }
}
