//! Sensor readings and the per-request dataset

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

// ============================================================================
// Reading
// ============================================================================

/// One row of the sensor CSV.
///
/// Built once at load time and never mutated. Classifiers only ever read it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Reading {
    /// Sample time (naive, zone offsets normalized to UTC at load)
    #[serde(with = "super::timestamp")]
    pub timestamp: NaiveDateTime,
    /// Line pressure
    pub pressure: f64,
    /// Temperature in °C
    pub temperature: f64,
    /// Derived process signal, treated as an opaque metric
    pub dv: f64,
}

impl Reading {
    pub fn new(timestamp: NaiveDateTime, pressure: f64, temperature: f64, dv: f64) -> Self {
        Self {
            timestamp,
            pressure,
            temperature,
            dv,
        }
    }
}

// ============================================================================
// Dataset
// ============================================================================

/// Readings in source order, plus how many CSV rows were dropped on the way in.
///
/// Chronological order is not guaranteed; consumers that need time order
/// (the chart series) sort their own copy.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    readings: Vec<Reading>,
    dropped_rows: usize,
}

impl Dataset {
    pub fn new(readings: Vec<Reading>) -> Self {
        Self {
            readings,
            dropped_rows: 0,
        }
    }

    /// Attach the number of source rows skipped because of null/unparseable fields.
    pub fn with_dropped_rows(mut self, dropped_rows: usize) -> Self {
        self.dropped_rows = dropped_rows;
        self
    }

    pub fn readings(&self) -> &[Reading] {
        &self.readings
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Reading> {
        self.readings.iter()
    }

    pub fn len(&self) -> usize {
        self.readings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.readings.is_empty()
    }

    pub fn dropped_rows(&self) -> usize {
        self.dropped_rows
    }

    pub fn pressures(&self) -> impl Iterator<Item = f64> + '_ {
        self.readings.iter().map(|r| r.pressure)
    }

    pub fn temperatures(&self) -> impl Iterator<Item = f64> + '_ {
        self.readings.iter().map(|r| r.temperature)
    }

    pub fn dvs(&self) -> impl Iterator<Item = f64> + '_ {
        self.readings.iter().map(|r| r.dv)
    }
}

impl FromIterator<Reading> for Dataset {
    fn from_iter<I: IntoIterator<Item = Reading>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a Dataset {
    type Item = &'a Reading;
    type IntoIter = std::slice::Iter<'a, Reading>;

    fn into_iter(self) -> Self::IntoIter {
        self.readings.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn ts(hour: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 6, 18)
            .unwrap()
            .and_hms_opt(hour, 0, 0)
            .unwrap()
    }

    #[test]
    fn test_reading_serializes_dashboard_timestamp() {
        let reading = Reading::new(ts(7), 1.5, 25.0, 10.0);
        let json = serde_json::to_value(reading).unwrap();
        assert_eq!(json["timestamp"], "2024-06-18 07:00:00");
        assert_eq!(json["pressure"], 1.5);
    }

    #[test]
    fn test_dataset_keeps_source_order() {
        let dataset: Dataset = vec![
            Reading::new(ts(9), 1.0, 25.0, 0.0),
            Reading::new(ts(3), 2.0, 26.0, 1.0),
        ]
        .into_iter()
        .collect();

        assert_eq!(dataset.len(), 2);
        assert_eq!(dataset.readings()[0].timestamp, ts(9));
        assert_eq!(dataset.pressures().collect::<Vec<_>>(), vec![1.0, 2.0]);
        assert_eq!(dataset.dropped_rows(), 0);
    }
}
