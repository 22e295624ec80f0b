//! `envboard-core` -- pure domain logic for the environment kiosk.
//!
//! Derived metrics, publish gating, payload and display formatting. No
//! I/O lives here; the `envboard-agent` crate binds these to the sensor,
//! the screen and the MQTT broker.

pub mod clock;
pub mod display;
pub mod gate;
pub mod metrics;
pub mod payload;
pub mod reading;
pub mod types;
