use crate::utils::TimeT;
use std::{cmp::Ordering, fmt, time::Duration};
use uuid::Uuid;

/// Work run when a timer pops.
pub type Callback = Box<dyn FnOnce() + Send + 'static>;

/// A Universally Unique Identifier (UUID) for Timers.
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy)]
pub struct TimerId(pub Uuid);

impl TimerId {
    pub fn new() -> Self {
        TimerId(Uuid::new_v4())
    }
}

impl Default for TimerId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for TimerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Converts a delay in seconds to a `Duration`.
///
/// Negative and NaN delays mean "as soon as possible" and clamp to zero.
/// Delays too large to represent saturate.
pub fn delay_from_secs(secs: f64) -> Duration {
    if secs.is_nan() || secs <= 0.0 {
        return Duration::ZERO;
    }
    Duration::try_from_secs_f64(secs).unwrap_or(Duration::MAX)
}

pub(crate) fn duration_to_ms(duration: Duration) -> TimeT {
    TimeT::try_from(duration.as_millis()).unwrap_or(TimeT::MAX)
}

/// A timer waiting in a manual queue.
pub(crate) struct PendingTimer {
    pub id: TimerId,
    seq: u64,
    start_time: TimeT,
    interval: TimeT,
    pub callback: Callback,
}

impl PendingTimer {
    pub fn new(seq: u64, start_time: TimeT, interval: TimeT, callback: Callback) -> Self {
        Self {
            id: TimerId::new(),
            seq,
            start_time,
            interval,
            callback,
        }
    }

    pub fn pop_time(&self) -> TimeT {
        self.start_time.saturating_add(self.interval)
    }
}

impl PartialEq for PendingTimer {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for PendingTimer {}

// Reversed so that `BinaryHeap` yields the earliest pop time first, then the
// earliest scheduled among equal pop times.
impl Ord for PendingTimer {
    fn cmp(&self, other: &Self) -> Ordering {
        (other.pop_time(), other.seq).cmp(&(self.pop_time(), self.seq))
    }
}

impl PartialOrd for PendingTimer {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
