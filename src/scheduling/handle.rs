use crate::scheduling::{
    timer::{Callback, TimerId},
    timer_service::TimerService,
};
use parking_lot::Mutex;
use std::{sync::Arc, time::Duration};
use tracing::debug;

/// Something scheduled that can be called off.
pub trait Cancellable: Send {
    /// Stops the work from running if it has not run yet.
    ///
    /// Idempotent: cancelling twice, or after the work ran, does nothing.
    fn cancel(&self);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandleState {
    Pending,
    Fired,
    Cancelled,
}

enum WorkItem {
    Pending(Callback),
    Fired,
    Cancelled,
}

impl WorkItem {
    fn state(&self) -> HandleState {
        match self {
            WorkItem::Pending(_) => HandleState::Pending,
            WorkItem::Fired => HandleState::Fired,
            WorkItem::Cancelled => HandleState::Cancelled,
        }
    }
}

/// One deferred callback, armed on construction.
///
/// The callback either fires or is cancelled, exactly once. Dropping the
/// handle does not cancel it.
pub struct CancellableHandle {
    id: TimerId,
    work: Arc<Mutex<WorkItem>>,
}

impl CancellableHandle {
    pub fn new<T>(timer_service: &T, delay: Duration, callback: Callback) -> Self
    where
        T: TimerService + ?Sized,
    {
        let id = TimerId::new();
        let work = Arc::new(Mutex::new(WorkItem::Pending(callback)));

        let trigger = {
            let work = work.clone();
            move || {
                // Take the callback under the lock, run it outside.
                let callback = {
                    let mut item = work.lock();
                    match std::mem::replace(&mut *item, WorkItem::Fired) {
                        WorkItem::Pending(callback) => callback,
                        other => {
                            *item = other;
                            return;
                        }
                    }
                };
                debug!(%id, "handle fired");
                callback();
            }
        };

        debug!(%id, ?delay, "handle armed");
        timer_service.schedule(delay, Box::new(trigger));

        Self { id, work }
    }

    pub fn id(&self) -> TimerId {
        self.id
    }

    pub fn state(&self) -> HandleState {
        self.work.lock().state()
    }
}

impl Cancellable for CancellableHandle {
    fn cancel(&self) {
        let mut work = self.work.lock();
        if let WorkItem::Pending(_) = *work {
            // Drops the callback along with anything it captured.
            *work = WorkItem::Cancelled;
            debug!(id = %self.id, "handle cancelled");
        }
    }
}
