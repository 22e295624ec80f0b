//! The tick driver.
//!
//! [`Station`] owns the sensor, display, reporter and clock. Each
//! [`tick`](Station::tick) reads the sensor, refreshes the display,
//! computes derived metrics and gives the reporter a chance to publish.
//! Nothing in a tick is fatal; every failure degrades to skipping that
//! tick's side effect.

use envboard_core::clock::Clock;
use envboard_core::display::DisplayFrame;
use envboard_core::metrics::DerivedMetrics;
use envboard_core::reading::Reading;

use crate::display::DisplaySink;
use crate::reporter::{PublishOutcome, Reporter};
use crate::sensor::SensorSource;
use crate::transport::Transport;

/// Result of one tick, for logging and tests.
#[derive(Debug, Clone, PartialEq)]
pub struct TickSummary {
    pub reading: Reading,
    pub derived: DerivedMetrics,
    pub frame: DisplayFrame,
    pub outcome: PublishOutcome,
}

pub struct Station<S, D, T, C> {
    sensor: S,
    display: D,
    reporter: Reporter<T>,
    clock: C,
    location: String,
    sea_level_hpa: f64,
}

impl<S, D, T, C> Station<S, D, T, C>
where
    S: SensorSource,
    D: DisplaySink,
    T: Transport,
    C: Clock,
{
    pub fn new(
        sensor: S,
        display: D,
        reporter: Reporter<T>,
        clock: C,
        location: String,
        sea_level_hpa: f64,
    ) -> Self {
        Self {
            sensor,
            display,
            reporter,
            clock,
            location,
            sea_level_hpa,
        }
    }

    pub fn reporter(&self) -> &Reporter<T> {
        &self.reporter
    }

    pub fn into_reporter(self) -> Reporter<T> {
        self.reporter
    }

    /// Run one read-compute-display-maybe-publish cycle.
    pub fn tick(&mut self) -> TickSummary {
        let now = self.clock.now();

        let reading = Reading::from_sample(self.sensor.read());
        if reading.is_fallback() {
            // Placeholder values are also what gets published.
            tracing::warn!("Sensor unavailable -- using placeholder reading");
        }

        let frame = DisplayFrame::new(&self.location, &reading, &now);
        if let Err(e) = self.display.render(&frame) {
            tracing::warn!(error = %e, "Display refresh failed");
        }

        let reading = reading.with_gas(self.sensor.read_gas());
        let derived = DerivedMetrics::compute(&reading, self.sea_level_hpa);

        tracing::debug!(
            temperature_c = reading.temperature_c,
            humidity_pct = reading.humidity_pct,
            pressure_hpa = reading.pressure_hpa,
            gas_kohm = ?reading.gas_resistance_kohm,
            altitude_m = ?derived.altitude_m,
            dew_point_c = ?derived.dew_point_c,
            "Tick",
        );

        let outcome = self.reporter.report(&reading, &derived, &now);

        TickSummary {
            reading,
            derived,
            frame,
            outcome,
        }
    }
}
