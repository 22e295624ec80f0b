//! `envboard-agent` library crate.
//!
//! Re-exports internal modules for integration testing. The binary
//! entrypoint lives in `main.rs`.

pub mod config;
pub mod display;
pub mod reporter;
pub mod sensor;
pub mod station;
pub mod transport;
