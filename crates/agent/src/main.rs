//! `envboard-agent` -- environment kiosk daemon.
//!
//! Samples a BME680 sensor every few seconds, redraws the dashboard on the
//! console, and forwards readings with derived altitude and dew point to an
//! MQTT broker every `PUBLISH_INTERVAL_SEC`.
//!
//! # Environment variables
//!
//! | Variable               | Required | Default        | Description                        |
//! |------------------------|----------|----------------|------------------------------------|
//! | `MQTT_SERVER`          | no       | --             | Broker host; publishing is off when unset |
//! | `MQTT_PORT`            | no       | `1883`         | Broker port                        |
//! | `MQTT_USER`            | no       | --             | Broker username                    |
//! | `MQTT_PASSWORD`        | no       | --             | Broker password                    |
//! | `MQTT_TOPIC`           | no       | `bme680/data`  | Base topic, `/<SENSOR_ID>` appended |
//! | `SENSOR_ID`            | no       | `raspi-bme680` | Sensor identifier                  |
//! | `SENSOR_LOCATION`      | no       | `LIVINGROOM`   | Location label                     |
//! | `PUBLISH_INTERVAL_SEC` | no       | `600`          | Seconds between publishes          |
//! | `SEA_LEVEL_HPA`        | no       | `1013.25`      | Altitude reference pressure        |
//! | `REFRESH_INTERVAL_SEC` | no       | `5`            | Seconds between display refreshes  |
//! | `I2C_BUS`              | no       | `/dev/i2c-1`   | I2C device the sensor is wired to  |

use envboard_agent::config::AgentConfig;
use envboard_agent::display::TerminalDisplay;
use envboard_agent::reporter::Reporter;
use envboard_agent::sensor::Bme680Sensor;
use envboard_agent::station::Station;
use envboard_agent::transport::MqttTransport;
use envboard_core::clock::SystemClock;
use envboard_core::payload::SensorIdentity;
use tokio::time::MissedTickBehavior;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "envboard_agent=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = AgentConfig::from_env().unwrap_or_else(|e| {
        tracing::error!(error = %e, "Invalid configuration");
        std::process::exit(1);
    });

    tracing::info!(
        sensor_id = %config.sensor_id,
        location = %config.sensor_location,
        mqtt = config.mqtt.is_some(),
        publish_interval_secs = config.publish_interval.as_secs(),
        refresh_interval_secs = config.refresh_interval.as_secs(),
        "Starting envboard-agent",
    );

    let sensor = Bme680Sensor::open(&config.i2c_bus);
    tracing::info!(present = sensor.is_present(), "Sensor detection complete");

    let transport = config
        .mqtt
        .as_ref()
        .map(|mqtt| MqttTransport::connect(mqtt, &config.sensor_id));
    if transport.is_none() {
        tracing::info!("MQTT_SERVER not set -- publishing disabled");
    }

    let identity = SensorIdentity {
        sensor_id: config.sensor_id.clone(),
        location: config.sensor_location.clone(),
    };
    let reporter = Reporter::new(transport, identity, &config.topic, config.publish_interval);

    let mut station = Station::new(
        sensor,
        TerminalDisplay::new(std::io::stdout()),
        reporter,
        SystemClock,
        config.sensor_location.clone(),
        config.sea_level_hpa,
    );

    let mut ticker = tokio::time::interval(config.refresh_interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    let shutdown = shutdown_signal();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                station.tick();
            }
            () = &mut shutdown => break,
        }
    }

    if let Some(transport) = station.into_reporter().into_transport() {
        transport.shutdown().await;
    }
    tracing::info!("envboard-agent stopped");
}

/// Wait for SIGINT (Ctrl-C) or, on Unix, SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl-C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), shutting down");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, shutting down");
        }
    }
}
