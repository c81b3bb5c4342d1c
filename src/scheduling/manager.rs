use crate::scheduling::{
    handle::Cancellable,
    handle_factory::HandleFactory,
    timer::{Callback, delay_from_secs},
};
use std::{sync::Arc, time::Duration};
use tracing::debug;

/// A bounded set of deferred callbacks that can be called off together.
pub trait Scheduler {
    /// Schedules `callback` after `delay`. Silently dropped when full.
    fn schedule(&mut self, delay: Duration, callback: Callback);

    /// Cancels everything scheduled so far and empties the set.
    fn reset(&mut self);

    /// Same as [`schedule`](Self::schedule) with the delay in seconds.
    /// Negative delays run as soon as possible.
    fn schedule_secs(&mut self, secs: f64, callback: Callback) {
        self.schedule(delay_from_secs(secs), callback);
    }
}

/// Holds up to `capacity` handles in the order they were scheduled.
///
/// Requests beyond capacity are dropped rather than queued or evicting older
/// handles. Handles are never removed individually, only all at once by
/// [`reset`](Scheduler::reset). Dropping the manager does not cancel anything.
pub struct SchedulerManager<F: HandleFactory> {
    handles: Vec<F::Handle>,
    capacity: usize,
    factory: Arc<F>,
}

impl<F: HandleFactory> SchedulerManager<F> {
    pub fn new(factory: Arc<F>, capacity: usize) -> Self {
        Self {
            handles: Vec::new(),
            capacity,
            factory,
        }
    }

    pub fn len(&self) -> usize {
        self.handles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn is_full(&self) -> bool {
        self.handles.len() >= self.capacity
    }
}

impl<F: HandleFactory> Scheduler for SchedulerManager<F> {
    fn schedule(&mut self, delay: Duration, callback: Callback) {
        if self.is_full() {
            debug!(capacity = self.capacity, "manager full, schedule request dropped");
            return;
        }
        self.handles.push(self.factory.create_handle(delay, callback));
    }

    fn reset(&mut self) {
        debug!(count = self.handles.len(), "resetting manager");
        self.handles.drain(..).for_each(|handle| handle.cancel());
    }
}
