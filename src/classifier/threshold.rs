//! Threshold classification: fixed pressure / temperature / DV limits.
//!
//! Rules are checked in a fixed order and the first match wins, so a reading
//! that breaks several limits is attributed to the earliest rule only:
//!
//! 1. pressure out of range    → `PRESSURE_ISSUE`
//! 2. temperature out of range → `TEMPERATURE_ISSUE`
//! 3. DV out of range          → `DV_EXTREME`

use crate::config::ThresholdLimits;
use crate::types::{Reading, TroubleType};

/// Classify one reading against raw limits. `None` means the reading is normal.
pub fn classify_threshold(reading: &Reading, limits: &ThresholdLimits) -> Option<TroubleType> {
    if pressure_out_of_range(reading.pressure, limits) {
        Some(TroubleType::PressureIssue)
    } else if temperature_out_of_range(reading.temperature, limits) {
        Some(TroubleType::TemperatureIssue)
    } else if dv_out_of_range(reading.dv, limits) {
        Some(TroubleType::DvExtreme)
    } else {
        None
    }
}

pub(crate) fn pressure_out_of_range(pressure: f64, limits: &ThresholdLimits) -> bool {
    pressure < limits.pressure_min || pressure > limits.pressure_max
}

pub(crate) fn temperature_out_of_range(temperature: f64, limits: &ThresholdLimits) -> bool {
    temperature < limits.temperature_min || temperature > limits.temperature_max
}

pub(crate) fn dv_out_of_range(dv: f64, limits: &ThresholdLimits) -> bool {
    dv < limits.dv_min || dv > limits.dv_max
}
