//! MQTT transport.
//!
//! [`MqttTransport`] owns an `rumqttc` client and drives its event loop on a
//! background task. The event loop only maintains a shared "connected"
//! flag; publishes are queued with `try_publish` and never block the tick.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use rumqttc::{AsyncClient, Event, EventLoop, MqttOptions, Outgoing, Packet, QoS};
use tokio::task::JoinHandle;

use crate::config::MqttConfig;

/// Delay before polling the event loop again after a connection error.
/// The next poll reconnects.
const RECONNECT_DELAY: Duration = Duration::from_secs(5);

const KEEP_ALIVE: Duration = Duration::from_secs(60);

/// Outgoing request queue depth.
const REQUEST_CAPACITY: usize = 10;

/// Something that can forward a payload to a topic.
pub trait Transport {
    fn is_connected(&self) -> bool;

    fn publish(&self, topic: &str, payload: String) -> Result<(), TransportError>;
}

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("Not connected to broker")]
    NotConnected,

    #[error("Publish rejected: {0}")]
    Publish(String),
}

pub struct MqttTransport {
    client: AsyncClient,
    connected: Arc<AtomicBool>,
    event_loop: JoinHandle<()>,
}

impl MqttTransport {
    /// Start connecting to the broker described by `config`.
    ///
    /// Returns immediately; [`is_connected`](Transport::is_connected) turns
    /// true once the broker acknowledges the connection. Must be called from
    /// within a Tokio runtime.
    pub fn connect(config: &MqttConfig, client_id: &str) -> Self {
        let mut options = MqttOptions::new(client_id, config.host.clone(), config.port);
        options.set_keep_alive(KEEP_ALIVE);
        if let Some(username) = &config.username {
            options.set_credentials(username.clone(), config.password.clone().unwrap_or_default());
        }

        let (client, event_loop) = AsyncClient::new(options, REQUEST_CAPACITY);
        let connected = Arc::new(AtomicBool::new(false));

        tracing::info!(host = %config.host, port = config.port, "Connecting to MQTT broker");
        let event_loop = tokio::spawn(drive_event_loop(
            event_loop,
            Arc::clone(&connected),
            config.host.clone(),
        ));

        Self {
            client,
            connected,
            event_loop,
        }
    }

    /// Disconnect from the broker and stop the event loop.
    pub async fn shutdown(self) {
        if let Err(e) = self.client.try_disconnect() {
            tracing::warn!(error = %e, "MQTT disconnect request failed");
        }
        // Give the event loop a moment to flush the DISCONNECT packet.
        let _ = tokio::time::timeout(Duration::from_secs(1), async {
            while self.connected.load(Ordering::Relaxed) {
                tokio::time::sleep(Duration::from_millis(50)).await;
            }
        })
        .await;
        self.event_loop.abort();
        tracing::info!("MQTT transport shut down");
    }
}

impl Transport for MqttTransport {
    fn is_connected(&self) -> bool {
        self.connected.load(Ordering::Relaxed)
    }

    fn publish(&self, topic: &str, payload: String) -> Result<(), TransportError> {
        if !self.is_connected() {
            return Err(TransportError::NotConnected);
        }
        self.client
            .try_publish(topic, QoS::AtMostOnce, false, payload)
            .map_err(|e| TransportError::Publish(e.to_string()))
    }
}

/// How an event loop event changes the connected flag, if at all.
fn connection_change(event: &Event) -> Option<bool> {
    match event {
        Event::Incoming(Packet::ConnAck(_)) => Some(true),
        Event::Incoming(Packet::Disconnect) | Event::Outgoing(Outgoing::Disconnect) => Some(false),
        _ => None,
    }
}

/// Poll the MQTT event loop forever, tracking connection state.
async fn drive_event_loop(mut event_loop: EventLoop, connected: Arc<AtomicBool>, host: String) {
    loop {
        match event_loop.poll().await {
            Ok(event) => match connection_change(&event) {
                Some(true) => {
                    connected.store(true, Ordering::Relaxed);
                    tracing::info!(host = %host, "MQTT connected");
                }
                Some(false) => {
                    if connected.swap(false, Ordering::Relaxed) {
                        tracing::warn!(host = %host, "MQTT session closed");
                    }
                }
                None => {}
            },
            Err(e) => {
                if connected.swap(false, Ordering::Relaxed) {
                    tracing::warn!(host = %host, error = %e, "MQTT connection lost");
                } else {
                    tracing::error!(host = %host, error = %e, "MQTT connection failed");
                }
                tokio::time::sleep(RECONNECT_DELAY).await;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use rumqttc::{ConnAck, ConnectReturnCode};

    use super::*;

    #[test]
    fn connack_marks_connected() {
        let event = Event::Incoming(Packet::ConnAck(ConnAck {
            session_present: false,
            code: ConnectReturnCode::Success,
        }));
        assert_eq!(connection_change(&event), Some(true));
    }

    #[test]
    fn disconnect_in_either_direction_clears_connected() {
        assert_eq!(connection_change(&Event::Incoming(Packet::Disconnect)), Some(false));
        assert_eq!(connection_change(&Event::Outgoing(Outgoing::Disconnect)), Some(false));
    }

    #[test]
    fn keep_alive_traffic_leaves_flag_alone() {
        assert_eq!(connection_change(&Event::Incoming(Packet::PingResp)), None);
        assert_eq!(connection_change(&Event::Outgoing(Outgoing::PingReq)), None);
    }
}
