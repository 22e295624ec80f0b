//! BME680 sensor access over Linux I2C.
//!
//! [`Bme680Sensor`] probes the sensor on the configured bus and performs a
//! forced-mode measurement per read.
//!
//! Initialisation is **gracefully optional** -- if no sensor answers on
//! either address the agent logs a warning and every read reports nothing,
//! so the display keeps running on placeholder values.

use bme680::{
    Bme680, I2CAddress, IIRFilterSize, OversamplingSetting, PowerMode, SettingsBuilder,
};
use envboard_core::reading::Sample;
use linux_embedded_hal::{Delay, I2cdev};

/// Anything that can produce raw readings once per tick.
pub trait SensorSource {
    /// Temperature / humidity / pressure, or `None` if unavailable.
    fn read(&mut self) -> Option<Sample>;

    /// Gas resistance in kΩ, or `None` if unavailable.
    fn read_gas(&mut self) -> Option<f64>;
}

#[derive(Debug, thiserror::Error)]
pub enum SensorError {
    #[error("Failed to open I2C bus {bus}: {message}")]
    Bus { bus: String, message: String },

    #[error("BME680 error: {0}")]
    Device(String),
}

type Device = Bme680<I2cdev, Delay>;

pub struct Bme680Sensor {
    /// `None` when no sensor could be initialised.
    device: Option<Device>,
    delay: Delay,
    /// Gas resistance from the latest successful read.
    last_gas_kohm: Option<f64>,
}

impl Bme680Sensor {
    /// Probe for a BME680 on `bus`.
    ///
    /// Returns a sensor that always reports `None` if nothing answers.
    pub fn open(bus: &str) -> Self {
        let mut delay = Delay;

        // Secondary (0x77) first, as on most breakout boards.
        let probes = [(I2CAddress::Secondary, 0x77u8), (I2CAddress::Primary, 0x76)];

        for (i2c_address, address) in probes {
            match init_device(bus, i2c_address, &mut delay) {
                Ok(device) => {
                    tracing::info!(bus, address = %format!("0x{address:02X}"), "BME680 connected");
                    return Self {
                        device: Some(device),
                        delay,
                        last_gas_kohm: None,
                    };
                }
                Err(e) => {
                    tracing::warn!(
                        bus,
                        address = %format!("0x{address:02X}"),
                        error = %e,
                        "BME680 initialisation failed",
                    );
                }
            }
        }

        tracing::warn!(bus, "No BME680 found -- displaying placeholder values");
        Self {
            device: None,
            delay,
            last_gas_kohm: None,
        }
    }

    pub fn is_present(&self) -> bool {
        self.device.is_some()
    }
}

impl SensorSource for Bme680Sensor {
    fn read(&mut self) -> Option<Sample> {
        self.last_gas_kohm = None;
        let device = self.device.as_mut()?;

        if let Err(e) = device.set_sensor_mode(&mut self.delay, PowerMode::ForcedMode) {
            tracing::error!(error = ?e, "Failed to trigger BME680 measurement");
            return None;
        }

        match device.get_sensor_data(&mut self.delay) {
            Ok((data, _condition)) => {
                self.last_gas_kohm = Some(f64::from(data.gas_resistance_ohm()) / 1000.0);
                Some(Sample {
                    temperature_c: f64::from(data.temperature_celsius()),
                    humidity_pct: f64::from(data.humidity_percent()),
                    pressure_hpa: f64::from(data.pressure_hpa()),
                })
            }
            Err(e) => {
                tracing::error!(error = ?e, "Sensor read failed");
                None
            }
        }
    }

    fn read_gas(&mut self) -> Option<f64> {
        self.last_gas_kohm
    }
}

/// Open the bus and configure a sensor at `address`. The gas heater stays
/// off so it does not warm the temperature reading.
fn init_device(
    bus: &str,
    i2c_address: I2CAddress,
    delay: &mut Delay,
) -> Result<Device, SensorError> {
    let i2c = I2cdev::new(bus).map_err(|e| SensorError::Bus {
        bus: bus.to_string(),
        message: e.to_string(),
    })?;

    let mut device = Bme680::init(i2c, delay, i2c_address)
        .map_err(|e| SensorError::Device(format!("{e:?}")))?;

    let settings = SettingsBuilder::new()
        .with_humidity_oversampling(OversamplingSetting::OS2x)
        .with_pressure_oversampling(OversamplingSetting::OS4x)
        .with_temperature_oversampling(OversamplingSetting::OS8x)
        .with_temperature_filter(IIRFilterSize::Size3)
        .with_run_gas(false)
        .build();

    device
        .set_sensor_settings(delay, settings)
        .map_err(|e| SensorError::Device(format!("{e:?}")))?;

    Ok(device)
}
