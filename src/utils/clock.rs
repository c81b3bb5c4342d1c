use chrono::Utc;
use parking_lot::Mutex;

/// The 64-bit unsigned integer type used to store time in ms.
pub type TimeT = u64;

pub trait Clock: Send + Sync {
    fn now(&self) -> TimeT;
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> TimeT {
        TimeT::try_from(Utc::now().timestamp_millis()).unwrap_or_default()
    }
}

/// A clock that only moves when told to.
pub struct FakeClock {
    current: Mutex<TimeT>,
}

impl FakeClock {
    pub fn new(start: TimeT) -> Self {
        Self {
            current: Mutex::new(start),
        }
    }

    pub fn advance(&self, duration: TimeT) {
        let mut guard = self.current.lock();
        *guard = guard.saturating_add(duration);
    }

    /// Moves the clock forward to `timestamp`. Never moves it backwards.
    pub fn advance_to(&self, timestamp: TimeT) {
        let mut guard = self.current.lock();
        *guard = (*guard).max(timestamp);
    }
}

impl Default for FakeClock {
    fn default() -> Self {
        Self::new(0)
    }
}

impl Clock for FakeClock {
    fn now(&self) -> TimeT {
        *self.current.lock()
    }
}
