//! Outbound telemetry payload.
//!
//! One JSON object per publish. Numeric fields are rounded to one decimal;
//! optional fields serialize as `null` when absent.

use serde::Serialize;

use crate::metrics::DerivedMetrics;
use crate::reading::Reading;
use crate::types::{LocalTime, DATETIME_FORMAT};

/// Error type for payload encoding.
#[derive(Debug, thiserror::Error)]
pub enum PayloadError {
    #[error("payload serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Identifies the sensor in every payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SensorIdentity {
    pub sensor_id: String,
    pub location: String,
}

/// Field order matches the wire format.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TelemetryPayload {
    pub timestamp: String,
    pub sensor_id: String,
    pub sensor_location: String,
    pub temperature: f64,
    pub humidity: f64,
    pub pressure: f64,
    pub gas_resistance: Option<f64>,
    pub altitude: Option<f64>,
    pub dew_point: Option<f64>,
}

impl TelemetryPayload {
    pub fn to_json(&self) -> Result<String, PayloadError> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Assemble the payload for one reading taken at `at`.
pub fn build_payload(
    reading: &Reading,
    derived: &DerivedMetrics,
    identity: &SensorIdentity,
    at: &LocalTime,
) -> TelemetryPayload {
    TelemetryPayload {
        timestamp: at.format(DATETIME_FORMAT).to_string(),
        sensor_id: identity.sensor_id.clone(),
        sensor_location: identity.location.clone(),
        temperature: round1(reading.temperature_c),
        humidity: round1(reading.humidity_pct),
        pressure: round1(reading.pressure_hpa),
        gas_resistance: reading.gas_resistance_kohm.map(round1),
        altitude: derived.altitude_m.map(round1),
        dew_point: derived.dew_point_c.map(round1),
    }
}

/// Round the exact binary value of `value` to one decimal place, ties to
/// even.
///
/// `0.35` is stored as `0.34999...` and rounds down; only quarter values
/// such as `1013.25` are true ties.
pub fn round1(value: f64) -> f64 {
    let quarters = value * 4.0;
    if quarters.fract() == 0.0 && quarters % 2.0 != 0.0 {
        // m/4 with m odd: value * 10 is exact, so the tie is real.
        return (value * 10.0).round_ties_even() / 10.0;
    }
    format!("{value:.1}").parse().unwrap_or(value)
}
