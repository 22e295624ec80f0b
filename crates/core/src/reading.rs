//! Raw sensor readings and the placeholder values used when the sensor
//! is unavailable.

/// Shown (and reported) when the sensor returns nothing.
pub const FALLBACK_TEMPERATURE_C: f64 = 22.7;
pub const FALLBACK_HUMIDITY_PCT: f64 = 53.5;
pub const FALLBACK_PRESSURE_HPA: f64 = 1015.0;

/// One temperature / humidity / pressure triple as returned by a sensor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    pub temperature_c: f64,
    pub humidity_pct: f64,
    pub pressure_hpa: f64,
}

/// Where the values of a [`Reading`] came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadingSource {
    Sensor,
    /// Sensor unavailable; placeholder values substituted.
    Fallback,
}

/// The values a single tick works with.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Reading {
    pub temperature_c: f64,
    pub humidity_pct: f64,
    pub pressure_hpa: f64,
    /// Gas resistance in kΩ, when the sensor reported one.
    pub gas_resistance_kohm: Option<f64>,
    pub source: ReadingSource,
}

impl Reading {
    pub fn new(temperature_c: f64, humidity_pct: f64, pressure_hpa: f64) -> Self {
        Self {
            temperature_c,
            humidity_pct,
            pressure_hpa,
            gas_resistance_kohm: None,
            source: ReadingSource::Sensor,
        }
    }

    /// Placeholder reading used for display continuity.
    pub fn fallback() -> Self {
        Self {
            source: ReadingSource::Fallback,
            ..Self::new(
                FALLBACK_TEMPERATURE_C,
                FALLBACK_HUMIDITY_PCT,
                FALLBACK_PRESSURE_HPA,
            )
        }
    }

    /// Build a reading from what the sensor returned, substituting the
    /// fallback values when it returned nothing.
    ///
    /// Fallback values flow into derived metrics and the outbound payload
    /// exactly like real ones; check [`Reading::is_fallback`] to tell them
    /// apart.
    pub fn from_sample(sample: Option<Sample>) -> Self {
        match sample {
            Some(s) => Self::new(s.temperature_c, s.humidity_pct, s.pressure_hpa),
            None => Self::fallback(),
        }
    }

    pub fn with_gas(mut self, gas_resistance_kohm: Option<f64>) -> Self {
        self.gas_resistance_kohm = gas_resistance_kohm;
        self
    }

    pub fn is_fallback(&self) -> bool {
        self.source == ReadingSource::Fallback
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sample_becomes_sensor_reading() {
        let reading = Reading::from_sample(Some(Sample {
            temperature_c: 21.4,
            humidity_pct: 40.2,
            pressure_hpa: 1009.8,
        }));

        assert_eq!(reading.temperature_c, 21.4);
        assert_eq!(reading.humidity_pct, 40.2);
        assert_eq!(reading.pressure_hpa, 1009.8);
        assert_eq!(reading.gas_resistance_kohm, None);
        assert!(!reading.is_fallback());
    }

    #[test]
    fn missing_sample_uses_placeholders() {
        let reading = Reading::from_sample(None);

        assert_eq!(reading.temperature_c, 22.7);
        assert_eq!(reading.humidity_pct, 53.5);
        assert_eq!(reading.pressure_hpa, 1015.0);
        assert!(reading.is_fallback());
    }

    #[test]
    fn gas_is_attached_without_touching_source() {
        let reading = Reading::fallback().with_gas(Some(12.5));
        assert_eq!(reading.gas_resistance_kohm, Some(12.5));
        assert!(reading.is_fallback());
    }
}
