//! Publishes derived readings to the broker on a slow cadence.
//!
//! [`Reporter`] combines a [`PublishGate`] with an optional transport. With
//! no transport (no broker configured) it never publishes. A failed publish
//! leaves the gate untouched, so the next tick retries.

use std::time::Duration;

use chrono::Utc;
use envboard_core::gate::PublishGate;
use envboard_core::metrics::DerivedMetrics;
use envboard_core::payload::{build_payload, PayloadError, SensorIdentity, TelemetryPayload};
use envboard_core::reading::Reading;
use envboard_core::types::LocalTime;

use crate::transport::{Transport, TransportError};

#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error(transparent)]
    Payload(#[from] PayloadError),

    #[error(transparent)]
    Transport(#[from] TransportError),
}

/// What happened to the publish opportunity of one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PublishOutcome {
    /// Not connected, or the interval has not elapsed.
    Skipped,
    Published,
    /// Attempted but failed; retried on the next tick.
    Failed,
}

pub struct Reporter<T> {
    transport: Option<T>,
    gate: PublishGate,
    identity: SensorIdentity,
    topic: String,
}

impl<T: Transport> Reporter<T> {
    /// `base_topic` is suffixed with `/<sensor-id>`.
    pub fn new(
        transport: Option<T>,
        identity: SensorIdentity,
        base_topic: &str,
        interval: Duration,
    ) -> Self {
        let topic = format!("{base_topic}/{}", identity.sensor_id);
        Self {
            transport,
            gate: PublishGate::new(interval),
            identity,
            topic,
        }
    }

    pub fn topic(&self) -> &str {
        &self.topic
    }

    pub fn gate(&self) -> &PublishGate {
        &self.gate
    }

    pub fn transport(&self) -> Option<&T> {
        self.transport.as_ref()
    }

    pub fn into_transport(self) -> Option<T> {
        self.transport
    }

    pub fn is_connected(&self) -> bool {
        self.transport.as_ref().is_some_and(Transport::is_connected)
    }

    /// `true` iff a transport is connected and the publish interval has
    /// elapsed.
    pub fn should_publish(&self, now: &LocalTime) -> bool {
        self.gate
            .should_publish(now.with_timezone(&Utc), self.is_connected())
    }

    /// Record a successful publish at `now`.
    pub fn mark_published(&mut self, now: &LocalTime) {
        self.gate.mark_published(now.with_timezone(&Utc));
    }

    pub fn build_payload(
        &self,
        reading: &Reading,
        derived: &DerivedMetrics,
        at: &LocalTime,
    ) -> TelemetryPayload {
        build_payload(reading, derived, &self.identity, at)
    }

    /// Serialize and hand one payload to the transport.
    pub fn publish(
        &self,
        reading: &Reading,
        derived: &DerivedMetrics,
        at: &LocalTime,
    ) -> Result<(), ReportError> {
        let transport = self.transport.as_ref().ok_or(TransportError::NotConnected)?;
        let json = self.build_payload(reading, derived, at).to_json()?;
        transport.publish(&self.topic, json)?;
        Ok(())
    }

    /// Publish if the gate allows it, advancing the gate only on success.
    pub fn report(
        &mut self,
        reading: &Reading,
        derived: &DerivedMetrics,
        now: &LocalTime,
    ) -> PublishOutcome {
        if !self.should_publish(now) {
            return PublishOutcome::Skipped;
        }

        match self.publish(reading, derived, now) {
            Ok(()) => {
                self.mark_published(now);
                tracing::info!(topic = %self.topic, "Published reading");
                PublishOutcome::Published
            }
            Err(e) => {
                tracing::error!(topic = %self.topic, error = %e, "MQTT publish failed");
                PublishOutcome::Failed
            }
        }
    }
}
