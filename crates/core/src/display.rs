//! Text shown on the kiosk display for one tick.

use crate::reading::Reading;
use crate::types::{LocalTime, DATETIME_FORMAT};

/// Pre-formatted strings for every field on screen. Renderers only lay
/// these out; they never format numbers themselves.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayFrame {
    pub location: String,
    /// `YYYY-MM-DD HH:MM`
    pub datetime: String,
    /// One decimal, e.g. `22.7`.
    pub temperature: String,
    /// One decimal, e.g. `53.5`.
    pub humidity: String,
    /// Whole hPa, e.g. `1015`.
    pub pressure: String,
}

impl DisplayFrame {
    pub fn new(location: &str, reading: &Reading, now: &LocalTime) -> Self {
        Self {
            location: location.to_string(),
            datetime: now.format(DATETIME_FORMAT).to_string(),
            temperature: format!("{:.1}", reading.temperature_c),
            humidity: format!("{:.1}", reading.humidity_pct),
            pressure: format!("{:.0}", reading.pressure_hpa),
        }
    }
}
