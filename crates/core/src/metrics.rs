//! Derived environmental metrics.
//!
//! Pure functions turning raw pressure, temperature and humidity into
//! altitude and dew point. Both computations are best-effort telemetry:
//! an input or result that is not a finite number yields `None` instead
//! of an error, and the caller reports the field as absent.

use crate::reading::Reading;

/// Standard atmosphere pressure at sea level, in hPa.
pub const DEFAULT_SEA_LEVEL_HPA: f64 = 1013.25;

/// Barometric formula coefficients (international standard atmosphere).
const ALTITUDE_SCALE_M: f64 = 44330.0;
const ALTITUDE_EXPONENT: f64 = 0.1903;

/// Magnus formula coefficients.
const MAGNUS_A: f64 = 17.27;
const MAGNUS_B: f64 = 237.7;

/// Humidity is clamped to this range before taking its logarithm.
const MIN_HUMIDITY_PCT: f64 = 0.1;
const MAX_HUMIDITY_PCT: f64 = 100.0;

/// Metrics computed from a single [`Reading`]. Recomputed every tick.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DerivedMetrics {
    /// Altitude above sea level in meters.
    pub altitude_m: Option<f64>,
    /// Dew point in degrees Celsius.
    pub dew_point_c: Option<f64>,
}

impl DerivedMetrics {
    /// Compute every derived metric for `reading` against the configured
    /// sea-level reference pressure.
    pub fn compute(reading: &Reading, sea_level_hpa: f64) -> Self {
        Self {
            altitude_m: compute_altitude(reading.pressure_hpa, sea_level_hpa),
            dew_point_c: compute_dew_point(reading.temperature_c, reading.humidity_pct),
        }
    }
}

/// Altitude in meters for a station pressure, relative to `sea_level_hpa`.
///
/// `44330 * (1 - (p / p0) ^ 0.1903)`
pub fn compute_altitude(pressure_hpa: f64, sea_level_hpa: f64) -> Option<f64> {
    if !pressure_hpa.is_finite() || !sea_level_hpa.is_finite() {
        return None;
    }

    let altitude =
        ALTITUDE_SCALE_M * (1.0 - (pressure_hpa / sea_level_hpa).powf(ALTITUDE_EXPONENT));
    altitude.is_finite().then_some(altitude)
}

/// Dew point in degrees Celsius using the Magnus approximation.
///
/// Relative humidity is clamped to `[0.1, 100.0]` first so the logarithm
/// stays defined.
pub fn compute_dew_point(temp_c: f64, rel_humidity_pct: f64) -> Option<f64> {
    if !temp_c.is_finite() || !rel_humidity_pct.is_finite() {
        return None;
    }

    let rh = rel_humidity_pct.clamp(MIN_HUMIDITY_PCT, MAX_HUMIDITY_PCT);
    let alpha = (MAGNUS_A * temp_c) / (MAGNUS_B + temp_c) + (rh / 100.0).ln();
    if alpha == MAGNUS_A {
        return None;
    }

    let dew_point = (MAGNUS_B * alpha) / (MAGNUS_A - alpha);
    dew_point.is_finite().then_some(dew_point)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn altitude_is_zero_at_reference_pressure() {
        let altitude = compute_altitude(1013.25, 1013.25).unwrap();
        assert!(altitude.abs() < 1e-9, "got {altitude}");

        let altitude = compute_altitude(1000.0, 1000.0).unwrap();
        assert!(altitude.abs() < 1e-9, "got {altitude}");
    }

    #[test]
    fn altitude_decreases_as_pressure_rises() {
        let pressures = [300.0, 500.0, 700.0, 900.0, 1013.25, 1050.0];
        let altitudes: Vec<f64> = pressures
            .iter()
            .map(|p| compute_altitude(*p, DEFAULT_SEA_LEVEL_HPA).unwrap())
            .collect();

        for pair in altitudes.windows(2) {
            assert!(pair[0] > pair[1], "{} should exceed {}", pair[0], pair[1]);
        }
        assert!(altitudes.iter().all(|a| a.is_finite()));
    }

    #[test]
    fn altitude_of_typical_low_pressure_is_plausible() {
        // ~900 hPa is roughly 1 km up.
        let altitude = compute_altitude(900.0, DEFAULT_SEA_LEVEL_HPA).unwrap();
        assert!((950.0..1050.0).contains(&altitude), "got {altitude}");
    }

    #[test]
    fn altitude_absent_on_bad_input() {
        assert_eq!(compute_altitude(f64::NAN, DEFAULT_SEA_LEVEL_HPA), None);
        assert_eq!(compute_altitude(1000.0, f64::INFINITY), None);
        assert_eq!(compute_altitude(-5.0, DEFAULT_SEA_LEVEL_HPA), None);
        assert_eq!(compute_altitude(1000.0, 0.0), None);
    }

    #[test]
    fn dew_point_equals_temperature_at_saturation() {
        for t in -20..=50 {
            let t = f64::from(t);
            let dew = compute_dew_point(t, 100.0).unwrap();
            assert!(dew <= t + 1e-9, "dew point {dew} above temperature {t}");
            assert!((dew - t).abs() < 1e-6);
        }
    }

    #[test]
    fn dew_point_below_temperature_when_unsaturated() {
        let dew = compute_dew_point(20.0, 50.0).unwrap();
        assert!(dew < 20.0);
        assert!((dew - 9.3).abs() < 0.2, "got {dew}");
    }

    #[test]
    fn dew_point_clamps_humidity() {
        assert_eq!(compute_dew_point(20.0, 0.0), compute_dew_point(20.0, 0.1));
        assert_eq!(compute_dew_point(20.0, -15.0), compute_dew_point(20.0, 0.1));
        assert_eq!(compute_dew_point(20.0, 130.0), compute_dew_point(20.0, 100.0));
    }

    #[test]
    fn dew_point_absent_on_bad_input() {
        assert_eq!(compute_dew_point(f64::NAN, 50.0), None);
        assert_eq!(compute_dew_point(20.0, f64::NAN), None);
        // b + t == 0 blows up the first term.
        assert_eq!(compute_dew_point(-237.7, 50.0), None);
    }

    #[test]
    fn derived_metrics_for_warm_humid_room() {
        let reading = Reading::new(25.0, 60.0, 1013.25);
        let derived = DerivedMetrics::compute(&reading, 1013.25);

        let altitude = derived.altitude_m.unwrap();
        let dew_point = derived.dew_point_c.unwrap();
        assert!(altitude.abs() <= 0.5, "altitude {altitude}");
        assert!((dew_point - 16.7).abs() <= 0.2, "dew point {dew_point}");
    }
}
