//! Publish-interval gating.
//!
//! The display refreshes every few seconds but readings are only forwarded
//! to the broker every `interval`. [`PublishGate`] tracks the earliest
//! instant at which the next publish is allowed.
//!
//! Pure logic. The caller supplies the current time and whether a
//! transport connection is up, and confirms each successful publish with
//! [`PublishGate::mark_published`]. A failed publish is simply not
//! confirmed, so the next tick tries again.

use std::time::Duration;

use crate::types::Timestamp;

#[derive(Debug, Clone)]
pub struct PublishGate {
    interval: Duration,
    /// `None` until the first confirmed publish, i.e. eligible right away.
    next_eligible: Option<Timestamp>,
}

impl PublishGate {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            next_eligible: None,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Earliest instant a publish is allowed, or `None` if nothing has been
    /// published yet.
    pub fn next_eligible(&self) -> Option<Timestamp> {
        self.next_eligible
    }

    /// Whether enough time has passed since the last confirmed publish.
    /// Never changes state.
    pub fn is_due(&self, now: Timestamp) -> bool {
        match self.next_eligible {
            Some(next) => now >= next,
            None => true,
        }
    }

    /// `true` iff a connection is up and the gate is due.
    pub fn should_publish(&self, now: Timestamp, connected: bool) -> bool {
        connected && self.is_due(now)
    }

    /// Record a successful publish at `now`, pushing the next eligible
    /// instant to `now + interval`. The next eligible instant never moves
    /// backwards.
    pub fn mark_published(&mut self, now: Timestamp) {
        let candidate = chrono::Duration::from_std(self.interval)
            .ok()
            .and_then(|step| now.checked_add_signed(step))
            .unwrap_or(Timestamp::MAX_UTC);

        self.next_eligible = Some(match self.next_eligible {
            Some(current) if current > candidate => current,
            _ => candidate,
        });
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;

    fn t0() -> Timestamp {
        Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()
    }

    fn secs(n: i64) -> chrono::Duration {
        chrono::Duration::seconds(n)
    }

    #[test]
    fn fresh_gate_is_due_immediately() {
        let gate = PublishGate::new(Duration::from_secs(600));
        assert!(gate.is_due(t0()));
        assert!(gate.should_publish(t0(), true));
        assert_eq!(gate.next_eligible(), None);
    }

    #[test]
    fn interval_elapses_exactly_at_boundary() {
        let mut gate = PublishGate::new(Duration::from_secs(600));
        gate.mark_published(t0());

        assert!(!gate.should_publish(t0() + secs(599), true));
        assert!(gate.should_publish(t0() + secs(600), true));
        assert!(gate.should_publish(t0() + secs(3600), true));
    }

    #[test]
    fn never_publishes_without_connection() {
        let mut gate = PublishGate::new(Duration::from_secs(600));
        assert!(!gate.should_publish(t0(), false));

        gate.mark_published(t0());
        for offset in [0, 599, 600, 86_400] {
            assert!(!gate.should_publish(t0() + secs(offset), false));
        }
    }

    #[test]
    fn inspection_does_not_advance() {
        let gate = PublishGate::new(Duration::from_secs(600));
        for offset in 0..10 {
            assert!(gate.should_publish(t0() + secs(offset), true));
        }
        assert_eq!(gate.next_eligible(), None);
    }

    #[test]
    fn next_eligible_never_moves_backwards() {
        let mut gate = PublishGate::new(Duration::from_secs(600));
        gate.mark_published(t0() + secs(1000));
        let after_late = gate.next_eligible();

        // A confirmation carrying an older timestamp is ignored.
        gate.mark_published(t0());
        assert_eq!(gate.next_eligible(), after_late);
        assert_eq!(gate.next_eligible(), Some(t0() + secs(1600)));
    }

    #[test]
    fn oversized_interval_saturates() {
        let mut gate = PublishGate::new(Duration::from_secs(u64::MAX));
        gate.mark_published(t0());
        assert_eq!(gate.next_eligible(), Some(Timestamp::MAX_UTC));
        assert!(!gate.should_publish(t0() + secs(86_400 * 365), true));
    }
}
