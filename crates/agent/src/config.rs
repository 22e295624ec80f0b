//! Agent configuration, read once at startup from the environment.

use std::time::Duration;

use envboard_core::metrics::DEFAULT_SEA_LEVEL_HPA;

const DEFAULT_MQTT_PORT: u16 = 1883;
const DEFAULT_TOPIC: &str = "bme680/data";
const DEFAULT_SENSOR_ID: &str = "raspi-bme680";
const DEFAULT_SENSOR_LOCATION: &str = "LIVINGROOM";
const DEFAULT_PUBLISH_INTERVAL_SECS: u64 = 600;
const DEFAULT_REFRESH_INTERVAL_SECS: u64 = 5;
const DEFAULT_I2C_BUS: &str = "/dev/i2c-1";

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum ConfigError {
    #[error("{key} must be a valid {expected}, got {value:?}")]
    Invalid {
        key: &'static str,
        value: String,
        expected: &'static str,
    },
}

/// Broker connection settings. Only present when `MQTT_SERVER` is set.
#[derive(Debug, Clone, PartialEq)]
pub struct MqttConfig {
    pub host: String,
    pub port: u16,
    pub username: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AgentConfig {
    /// `None` disables publishing entirely.
    pub mqtt: Option<MqttConfig>,
    /// Base topic; the sensor id is appended per publish.
    pub topic: String,
    pub sensor_id: String,
    pub sensor_location: String,
    pub publish_interval: Duration,
    pub sea_level_hpa: f64,
    /// Display refresh / tick cadence.
    pub refresh_interval: Duration,
    pub i2c_bus: String,
}

impl AgentConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default         |
    /// |------------------------|-----------------|
    /// | `MQTT_SERVER`          | unset (no MQTT) |
    /// | `MQTT_PORT`            | `1883`          |
    /// | `MQTT_USER`            | unset           |
    /// | `MQTT_PASSWORD`        | unset           |
    /// | `MQTT_TOPIC`           | `bme680/data`   |
    /// | `SENSOR_ID`            | `raspi-bme680`  |
    /// | `SENSOR_LOCATION`      | `LIVINGROOM`    |
    /// | `PUBLISH_INTERVAL_SEC` | `600`           |
    /// | `SEA_LEVEL_HPA`        | `1013.25`       |
    /// | `REFRESH_INTERVAL_SEC` | `5`             |
    /// | `I2C_BUS`              | `/dev/i2c-1`    |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) but reading values through
    /// `lookup`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        // Empty values count as unset, matching how `.env` files are
        // usually written (`MQTT_SERVER=`).
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let mqtt = match get("MQTT_SERVER") {
            Some(host) => Some(MqttConfig {
                host,
                port: parse_or("MQTT_PORT", get("MQTT_PORT"), DEFAULT_MQTT_PORT, "port number")?,
                username: get("MQTT_USER"),
                password: get("MQTT_PASSWORD"),
            }),
            None => None,
        };

        let publish_interval_secs: u64 = parse_or(
            "PUBLISH_INTERVAL_SEC",
            get("PUBLISH_INTERVAL_SEC"),
            DEFAULT_PUBLISH_INTERVAL_SECS,
            "number of seconds",
        )?;

        let refresh_interval_secs: u64 = parse_or(
            "REFRESH_INTERVAL_SEC",
            get("REFRESH_INTERVAL_SEC"),
            DEFAULT_REFRESH_INTERVAL_SECS,
            "number of seconds",
        )?;
        if refresh_interval_secs == 0 {
            return Err(ConfigError::Invalid {
                key: "REFRESH_INTERVAL_SEC",
                value: "0".into(),
                expected: "positive number of seconds",
            });
        }

        let sea_level_hpa: f64 = parse_or(
            "SEA_LEVEL_HPA",
            get("SEA_LEVEL_HPA"),
            DEFAULT_SEA_LEVEL_HPA,
            "pressure in hPa",
        )?;

        Ok(Self {
            mqtt,
            topic: get("MQTT_TOPIC").unwrap_or_else(|| DEFAULT_TOPIC.into()),
            sensor_id: get("SENSOR_ID").unwrap_or_else(|| DEFAULT_SENSOR_ID.into()),
            sensor_location: get("SENSOR_LOCATION")
                .unwrap_or_else(|| DEFAULT_SENSOR_LOCATION.into()),
            publish_interval: Duration::from_secs(publish_interval_secs),
            sea_level_hpa,
            refresh_interval: Duration::from_secs(refresh_interval_secs),
            i2c_bus: get("I2C_BUS").unwrap_or_else(|| DEFAULT_I2C_BUS.into()),
        })
    }
}

fn parse_or<T: std::str::FromStr>(
    key: &'static str,
    raw: Option<String>,
    default: T,
    expected: &'static str,
) -> Result<T, ConfigError> {
    match raw {
        None => Ok(default),
        Some(value) => value.trim().parse().map_err(|_| ConfigError::Invalid {
            key,
            value,
            expected,
        }),
    }
}
