//! Sensor data acquisition module
//!
//! Loads the sensor CSV into a `Dataset`. Rows with a missing or unparseable
//! field are dropped before anything downstream sees them.

pub mod csv_loader;

pub use csv_loader::{load_csv, load_from_reader, parse_timestamp, LoadError};
