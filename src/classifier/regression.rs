//! Regression-residual classification.
//!
//! Fits `dv ≈ a·pressure + b·temperature + c` by ordinary least squares over
//! the whole dataset, then scores every reading by its residual. The residual
//! check outranks every raw limit:
//!
//! 1. `|residual| > sigma · residual_std` → `HIGH_ANOMALY`
//! 2. pressure below / above limits        → `LOW_PRESSURE` / `HIGH_PRESSURE`
//! 3. temperature below / above limits     → `LOW_TEMPERATURE` / `HIGH_TEMPERATURE`
//! 4. DV out of range                      → `EXTREME_DV`
//!
//! The residual standard deviation is the sample (n − 1) estimate, computed
//! once per fit.

use serde::Serialize;
use statrs::statistics::Statistics;

use super::threshold::dv_out_of_range;
use crate::config::ThresholdLimits;
use crate::types::{Dataset, Reading, TroubleType};

/// Relative determinant below which the normal equations are treated as singular.
const SINGULAR_TOLERANCE: f64 = 1e-12;

// ============================================================================
// Linear Model
// ============================================================================

/// OLS baseline for DV, fitted once per request.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LinearModel {
    pub slope_pressure: f64,
    pub slope_temperature: f64,
    pub intercept: f64,
    /// Sample standard deviation of the training residuals.
    /// `None` when fewer than two readings were available.
    pub residual_std: Option<f64>,
}

impl LinearModel {
    /// Fit the model over every reading in `dataset`. Returns `None` for an
    /// empty dataset.
    ///
    /// Collinear or constant regressors never fail the fit: the minimum-norm
    /// least-squares solution is used instead.
    pub fn fit(dataset: &Dataset) -> Option<Self> {
        if dataset.is_empty() {
            return None;
        }

        let mean_p = dataset.pressures().mean();
        let mean_t = dataset.temperatures().mean();
        let mean_y = dataset.dvs().mean();

        // Centered cross-products (normal equations without the intercept)
        let (mut spp, mut stt, mut spt, mut spy, mut sty) = (0.0, 0.0, 0.0, 0.0, 0.0);
        for r in dataset {
            let dp = r.pressure - mean_p;
            let dt = r.temperature - mean_t;
            let dy = r.dv - mean_y;
            spp += dp * dp;
            stt += dt * dt;
            spt += dp * dt;
            spy += dp * dy;
            sty += dt * dy;
        }

        let (slope_pressure, slope_temperature) = solve_normal_equations(spp, stt, spt, spy, sty);
        let intercept = mean_y - slope_pressure * mean_p - slope_temperature * mean_t;

        let mut model = Self {
            slope_pressure,
            slope_temperature,
            intercept,
            residual_std: None,
        };

        if dataset.len() >= 2 {
            let residuals: Vec<f64> = dataset.iter().map(|r| model.residual(r)).collect();
            let std = residuals.iter().std_dev();
            model.residual_std = std.is_finite().then_some(std);
        }

        Some(model)
    }

    pub fn predict(&self, pressure: f64, temperature: f64) -> f64 {
        self.slope_pressure * pressure + self.slope_temperature * temperature + self.intercept
    }

    /// Actual DV minus predicted DV.
    pub fn residual(&self, reading: &Reading) -> f64 {
        reading.dv - self.predict(reading.pressure, reading.temperature)
    }
}

/// Solve the 2×2 system `[[spp, spt], [spt, stt]] · [a, b] = [spy, sty]`.
///
/// Rank-deficient systems get the pseudo-inverse solution. For a rank-1
/// symmetric matrix `S`, `S⁺ = S / trace(S)²`.
fn solve_normal_equations(spp: f64, stt: f64, spt: f64, spy: f64, sty: f64) -> (f64, f64) {
    let det = spp * stt - spt * spt;
    let scale = spp * stt;

    if scale > 0.0 && det > SINGULAR_TOLERANCE * scale {
        let a = (stt * spy - spt * sty) / det;
        let b = (spp * sty - spt * spy) / det;
        return (a, b);
    }

    let trace = spp + stt;
    if trace <= 0.0 {
        return (0.0, 0.0);
    }
    let trace_sq = trace * trace;
    (
        (spp * spy + spt * sty) / trace_sq,
        (spt * spy + stt * sty) / trace_sq,
    )
}

// ============================================================================
// Classification
// ============================================================================

/// Classify one reading against a fitted model. `None` means the reading is normal.
///
/// `sigma` is the residual multiplier (2.0 by default). When the model has no
/// residual standard deviation the residual check is skipped.
pub fn classify_regression(
    reading: &Reading,
    model: &LinearModel,
    sigma: f64,
    limits: &ThresholdLimits,
) -> Option<TroubleType> {
    if let Some(std) = model.residual_std {
        if model.residual(reading).abs() > sigma * std {
            return Some(TroubleType::HighAnomaly);
        }
    }

    if reading.pressure < limits.pressure_min {
        Some(TroubleType::LowPressure)
    } else if reading.pressure > limits.pressure_max {
        Some(TroubleType::HighPressure)
    } else if reading.temperature < limits.temperature_min {
        Some(TroubleType::LowTemperature)
    } else if reading.temperature > limits.temperature_max {
        Some(TroubleType::HighTemperature)
    } else if dv_out_of_range(reading.dv, limits) {
        Some(TroubleType::ExtremeDv)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveDate, NaiveDateTime};

    fn ts(minute: i64) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 6, 18)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
            + Duration::minutes(minute)
    }

    /// DV = 3·P − 2·T + 10 with a small deterministic wobble.
    fn linear_dataset(n: usize) -> Dataset {
        (0..n)
            .map(|i| {
                let p = 1.0 + (i % 7) as f64 * 1.5;
                let t = 21.0 + (i % 5) as f64 * 2.0;
                let wobble = if i % 2 == 0 { 0.5 } else { -0.5 };
                Reading::new(ts(i as i64), p, t, 3.0 * p - 2.0 * t + 10.0 + wobble)
            })
            .collect()
    }

    #[test]
    fn test_fit_recovers_coefficients() {
        let dataset: Dataset = (0..35)
            .map(|i| {
                let p = 1.0 + (i % 7) as f64;
                let t = 21.0 + (i / 7) as f64;
                Reading::new(ts(i), p, t, 3.0 * p - 2.0 * t + 10.0)
            })
            .collect();

        let model = LinearModel::fit(&dataset).unwrap();
        assert!((model.slope_pressure - 3.0).abs() < 1e-9);
        assert!((model.slope_temperature + 2.0).abs() < 1e-9);
        assert!((model.intercept - 10.0).abs() < 1e-6);
        assert!(model.residual_std.unwrap() < 1e-6);
    }

    #[test]
    fn test_empty_dataset_has_no_model() {
        assert!(LinearModel::fit(&Dataset::default()).is_none());
    }

    #[test]
    fn test_single_reading_has_no_residual_std() {
        let dataset = Dataset::new(vec![Reading::new(ts(0), 5.0, 25.0, 40.0)]);
        let model = LinearModel::fit(&dataset).unwrap();
        assert_eq!(model.residual_std, None);
        assert_eq!(model.predict(5.0, 25.0), 40.0);
    }

    #[test]
    fn test_constant_temperature_falls_back_to_simple_regression() {
        let dataset: Dataset = (0..10)
            .map(|i| {
                let p = i as f64;
                Reading::new(ts(i), p, 25.0, 4.0 * p + 1.0)
            })
            .collect();

        let model = LinearModel::fit(&dataset).unwrap();
        assert!((model.slope_pressure - 4.0).abs() < 1e-9);
        assert_eq!(model.slope_temperature, 0.0);
        assert!((model.predict(3.0, 25.0) - 13.0).abs() < 1e-9);
    }

    #[test]
    fn test_collinear_regressors_still_fit() {
        // Temperature is an exact linear function of pressure
        let dataset: Dataset = (0..10)
            .map(|i| {
                let p = 1.0 + i as f64;
                Reading::new(ts(i), p, 2.0 * p + 20.0, 5.0 * p)
            })
            .collect();

        let model = LinearModel::fit(&dataset).unwrap();
        for r in &dataset {
            assert!(model.residual(r).abs() < 1e-6);
        }
    }

    #[test]
    fn test_single_outlier_is_the_only_high_anomaly() {
        let mut readings = linear_dataset(60).readings().to_vec();
        readings[30].dv += 400.0;
        let dataset = Dataset::new(readings);

        let model = LinearModel::fit(&dataset).unwrap();
        let limits = ThresholdLimits::default();
        let anomalies: Vec<usize> = dataset
            .iter()
            .enumerate()
            .filter(|(_, r)| {
                classify_regression(r, &model, 2.0, &limits) == Some(TroubleType::HighAnomaly)
            })
            .map(|(i, _)| i)
            .collect();

        assert_eq!(anomalies, vec![30]);
    }

    #[test]
    fn test_residual_check_outranks_raw_limits() {
        let model = LinearModel {
            slope_pressure: 0.0,
            slope_temperature: 0.0,
            intercept: 0.0,
            residual_std: Some(10.0),
        };
        let limits = ThresholdLimits::default();
        // Pressure is out of range, but the residual wins
        let r = Reading::new(ts(0), 50.0, 25.0, 100.0);
        assert_eq!(classify_regression(&r, &model, 2.0, &limits), Some(TroubleType::HighAnomaly));
    }

    #[test]
    fn test_raw_rules_in_order() {
        let model = LinearModel {
            slope_pressure: 0.0,
            slope_temperature: 0.0,
            intercept: 0.0,
            residual_std: Some(1_000.0),
        };
        let limits = ThresholdLimits::default();
        let classify = |p, t, dv| classify_regression(&Reading::new(ts(0), p, t, dv), &model, 2.0, &limits);

        assert_eq!(classify(0.05, 50.0, 0.0), Some(TroubleType::LowPressure));
        assert_eq!(classify(25.0, 10.0, 0.0), Some(TroubleType::HighPressure));
        assert_eq!(classify(10.0, 15.0, 600.0), Some(TroubleType::LowTemperature));
        assert_eq!(classify(10.0, 36.0, 0.0), Some(TroubleType::HighTemperature));
        assert_eq!(classify(10.0, 25.0, 600.0), Some(TroubleType::ExtremeDv));
        assert_eq!(classify(10.0, 25.0, 0.0), None);
    }

    #[test]
    fn test_missing_residual_std_skips_residual_check() {
        let model = LinearModel {
            slope_pressure: 0.0,
            slope_temperature: 0.0,
            intercept: 0.0,
            residual_std: None,
        };
        let r = Reading::new(ts(0), 10.0, 25.0, 400.0);
        assert_eq!(classify_regression(&r, &model, 2.0, &ThresholdLimits::default()), None);
    }
}
