//! Injectable time source.

use std::cell::Cell;
use std::rc::Rc;

use chrono::Local;

use crate::types::LocalTime;

pub trait Clock {
    fn now(&self) -> LocalTime;
}

/// Reads the host's wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> LocalTime {
        Local::now()
    }
}

/// A clock that only moves when told to.
///
/// Clones share the same instant, so a test can keep a handle after moving
/// the clock into a driver.
#[derive(Debug, Clone)]
pub struct ManualClock {
    now: Rc<Cell<LocalTime>>,
}

impl ManualClock {
    pub fn new(start: LocalTime) -> Self {
        Self {
            now: Rc::new(Cell::new(start)),
        }
    }

    pub fn advance(&self, by: chrono::Duration) {
        self.now.set(self.now.get() + by);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> LocalTime {
        self.now.get()
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn manual_clock_clones_share_time() {
        let start = Local
            .with_ymd_and_hms(2024, 5, 1, 8, 0, 0)
            .single()
            .expect("unambiguous local time");
        let clock = ManualClock::new(start);
        let handle = clock.clone();

        handle.advance(chrono::Duration::seconds(90));
        assert_eq!(clock.now(), start + chrono::Duration::seconds(90));
    }
}
