use crate::{
    scheduling::timer::{Callback, PendingTimer, duration_to_ms},
    utils::{Clock, FakeClock, TimeT},
};
use parking_lot::Mutex;
use std::{collections::BinaryHeap, time::Duration};
use tokio::{runtime::Handle, time::Instant};
use tracing::{debug, trace};

/// Runs a closure once, after a delay, on an execution context.
///
/// There is no handle and no error: cancellation is layered on top by
/// [`CancellableHandle`](crate::scheduling::CancellableHandle).
pub trait TimerService: Send + Sync {
    fn schedule(&self, delay: Duration, callback: Callback);
}

/// Timers backed by a tokio runtime.
///
/// Each timer is a task on the runtime that sleeps until its deadline. On a
/// `current_thread` runtime every callback runs on the same thread as the
/// code that scheduled it.
#[derive(Clone)]
pub struct TokioTimerService {
    runtime: Handle,
}

impl TokioTimerService {
    pub fn new(runtime: Handle) -> Self {
        Self { runtime }
    }
}

impl TimerService for TokioTimerService {
    fn schedule(&self, delay: Duration, callback: Callback) {
        // Deadline is taken now, not when the task is first polled.
        let Some(deadline) = Instant::now().checked_add(delay) else {
            // Too far out to ever fire.
            trace!(?delay, "delay out of range, timer dropped");
            return;
        };
        trace!(?delay, "arming tokio timer");

        self.runtime.spawn(async move {
            tokio::time::sleep_until(deadline).await;
            callback();
        });
    }
}

/// A deterministic timer service driven by hand.
///
/// Time only moves through [`advance`](Self::advance). Callbacks never run
/// inside `schedule`, even with a zero delay.
pub struct ManualTimerService {
    clock: FakeClock,
    queue: Mutex<Queue>,
}

#[derive(Default)]
struct Queue {
    timers: BinaryHeap<PendingTimer>,
    next_seq: u64,
}

impl ManualTimerService {
    pub fn new() -> Self {
        Self {
            clock: FakeClock::default(),
            queue: Mutex::new(Queue::default()),
        }
    }

    /// Current virtual time in ms.
    pub fn now(&self) -> TimeT {
        self.clock.now()
    }

    /// Number of timers that have been armed but not fired.
    pub fn pending(&self) -> usize {
        self.queue.lock().timers.len()
    }

    /// Moves virtual time forward by `duration`, firing every timer that
    /// comes due along the way. Returns the number of callbacks run.
    pub fn advance(&self, duration: Duration) -> usize {
        let target = self.now().saturating_add(duration_to_ms(duration));
        let mut fired = 0;

        while let Some(timer) = self.pop_due(target) {
            self.clock.advance_to(timer.pop_time());
            debug!(id = %timer.id, at = timer.pop_time(), "manual timer popped");
            // Lock is released here so the callback can arm new timers.
            (timer.callback)();
            fired += 1;
        }

        self.clock.advance_to(target);
        fired
    }

    /// Fires every timer already due at the current virtual time.
    pub fn run_pending(&self) -> usize {
        self.advance(Duration::ZERO)
    }

    fn pop_due(&self, target: TimeT) -> Option<PendingTimer> {
        let mut queue = self.queue.lock();
        match queue.timers.peek() {
            Some(next) if next.pop_time() <= target => queue.timers.pop(),
            _ => None,
        }
    }
}

impl Default for ManualTimerService {
    fn default() -> Self {
        Self::new()
    }
}

impl TimerService for ManualTimerService {
    fn schedule(&self, delay: Duration, callback: Callback) {
        let mut queue = self.queue.lock();
        let seq = queue.next_seq;
        queue.next_seq = seq.wrapping_add(1);
        queue.timers.push(PendingTimer::new(
            seq,
            self.clock.now(),
            duration_to_ms(delay),
            callback,
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    };
    use test_case::test_case;

    fn counter() -> (Arc<AtomicUsize>, impl Fn() -> Callback) {
        let count = Arc::new(AtomicUsize::new(0));
        let make = {
            let count = count.clone();
            move || -> Callback {
                let count = count.clone();
                Box::new(move || {
                    count.fetch_add(1, Ordering::SeqCst);
                })
            }
        };
        (count, make)
    }

    #[test_case(100; "short")]
    #[test_case(1600; "long")]
    #[test_case(3600 * 1000 * 10; "really_long")]
    fn manual_timer_pops_after_interval(interval: u64) {
        let service = ManualTimerService::new();
        let (count, callback) = counter();
        service.schedule(Duration::from_millis(interval), callback());

        assert_eq!(0, service.advance(Duration::from_millis(interval - 1)));
        assert_eq!(0, count.load(Ordering::SeqCst));

        assert_eq!(1, service.advance(Duration::from_millis(1)));
        assert_eq!(1, count.load(Ordering::SeqCst));
        assert_eq!(0, service.pending());
    }

    #[test]
    fn manual_zero_delay_waits_for_next_turn() {
        let service = ManualTimerService::new();
        let (count, callback) = counter();
        service.schedule(Duration::ZERO, callback());

        assert_eq!(0, count.load(Ordering::SeqCst));
        assert_eq!(1, service.pending());

        assert_eq!(1, service.run_pending());
        assert_eq!(1, count.load(Ordering::SeqCst));
    }

    #[test]
    fn manual_timers_fire_in_deadline_order() {
        let service = ManualTimerService::new();
        let order = Arc::new(Mutex::new(Vec::new()));

        for (label, delay_ms) in [("late", 300), ("early", 100), ("tie_a", 200), ("tie_b", 200)] {
            let order = order.clone();
            service.schedule(
                Duration::from_millis(delay_ms),
                Box::new(move || order.lock().push(label)),
            );
        }

        assert_eq!(4, service.advance(Duration::from_secs(1)));
        assert_eq!(vec!["early", "tie_a", "tie_b", "late"], *order.lock());
        assert_eq!(1000, service.now());
    }

    #[test]
    fn manual_callback_can_arm_another_timer() {
        let service = Arc::new(ManualTimerService::new());
        let (count, callback) = counter();

        let inner = service.clone();
        let chained = callback();
        service.schedule(
            Duration::from_millis(10),
            Box::new(move || inner.schedule(Duration::from_millis(10), chained)),
        );

        assert_eq!(2, service.advance(Duration::from_millis(20)));
        assert_eq!(1, count.load(Ordering::SeqCst));
    }

    #[test]
    fn manual_clock_tracks_popped_timer() {
        let service = Arc::new(ManualTimerService::new());
        let seen = Arc::new(Mutex::new(None));

        let (observer, slot) = (service.clone(), seen.clone());
        service.schedule(
            Duration::from_millis(250),
            Box::new(move || *slot.lock() = Some(observer.now())),
        );

        service.advance(Duration::from_secs(2));
        assert_eq!(Some(250), *seen.lock());
    }

    #[tokio::test(start_paused = true)]
    async fn tokio_timer_pops_after_delay() {
        let service = TokioTimerService::new(Handle::current());
        let (count, callback) = counter();
        service.schedule(Duration::from_millis(500), callback());

        tokio::time::sleep(Duration::from_millis(499)).await;
        assert_eq!(0, count.load(Ordering::SeqCst));

        tokio::time::sleep(Duration::from_millis(2)).await;
        assert_eq!(1, count.load(Ordering::SeqCst));

        tokio::time::sleep(Duration::from_secs(5)).await;
        assert_eq!(1, count.load(Ordering::SeqCst));
    }

    #[tokio::test(start_paused = true)]
    async fn tokio_zero_delay_never_runs_synchronously() {
        let service = TokioTimerService::new(Handle::current());
        let (count, callback) = counter();
        service.schedule(Duration::ZERO, callback());

        assert_eq!(0, count.load(Ordering::SeqCst));

        tokio::time::sleep(Duration::from_millis(1)).await;
        assert_eq!(1, count.load(Ordering::SeqCst));
    }

    #[tokio::test(start_paused = true)]
    async fn tokio_unreachable_delay_spawns_nothing() {
        let service = TokioTimerService::new(Handle::current());
        let captured = Arc::new(());

        for _ in 0..100 {
            let held = captured.clone();
            service.schedule(Duration::MAX, Box::new(move || drop(held)));
        }

        assert_eq!(0, Handle::current().metrics().num_alive_tasks());
        assert_eq!(1, Arc::strong_count(&captured));
    }

    #[tokio::test(start_paused = true)]
    async fn tokio_shorter_delay_fires_first() {
        let service = TokioTimerService::new(Handle::current());
        let order = Arc::new(Mutex::new(Vec::new()));

        for (label, delay_ms) in [("slow", 200), ("fast", 100)] {
            let order = order.clone();
            service.schedule(
                Duration::from_millis(delay_ms),
                Box::new(move || order.lock().push(label)),
            );
        }

        tokio::time::sleep(Duration::from_millis(250)).await;
        assert_eq!(vec!["fast", "slow"], *order.lock());
    }
}
