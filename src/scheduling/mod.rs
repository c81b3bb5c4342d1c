//! One-shot deferred callbacks with bulk cancellation.
//!
//! A [`TimerService`] runs a closure after a delay. A [`CancellableHandle`]
//! wraps one such closure so it can be called off. A [`SchedulerManager`]
//! keeps a bounded list of handles and cancels them all on
//! [`reset`](Scheduler::reset). The factories exist so that each layer can be
//! swapped for a test double.

mod timer;
pub use timer::{Callback, TimerId, delay_from_secs};

mod timer_service;
pub use timer_service::{ManualTimerService, TimerService, TokioTimerService};

mod handle;
pub use handle::{Cancellable, CancellableHandle, HandleState};

mod handle_factory;
pub use handle_factory::{HandleFactory, TimerHandleFactory};

mod manager;
pub use manager::{Scheduler, SchedulerManager};

mod manager_factory;
pub use manager_factory::{ManagerFactory, SchedulerManagerFactory};
