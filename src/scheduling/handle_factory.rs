use crate::scheduling::{
    handle::{Cancellable, CancellableHandle},
    timer::Callback,
    timer_service::TimerService,
};
use std::{sync::Arc, time::Duration};

pub trait HandleFactory: Send + Sync {
    type Handle: Cancellable;

    /// Builds a handle whose timer is already armed.
    fn create_handle(&self, delay: Duration, callback: Callback) -> Self::Handle;
}

/// Arms [`CancellableHandle`]s on a shared timer service.
pub struct TimerHandleFactory<T: TimerService> {
    timer_service: Arc<T>,
}

impl<T: TimerService> TimerHandleFactory<T> {
    pub fn new(timer_service: Arc<T>) -> Self {
        Self { timer_service }
    }
}

impl<T: TimerService> HandleFactory for TimerHandleFactory<T> {
    type Handle = CancellableHandle;

    fn create_handle(&self, delay: Duration, callback: Callback) -> CancellableHandle {
        CancellableHandle::new(self.timer_service.as_ref(), delay, callback)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scheduling::{HandleState, ManualTimerService};
    use std::sync::atomic::{AtomicBool, Ordering};

    #[test]
    fn factory_creates_armed_handle() {
        let service = Arc::new(ManualTimerService::new());
        let factory = TimerHandleFactory::new(service.clone());
        let fired = Arc::new(AtomicBool::new(false));

        let flag = fired.clone();
        let handle = factory.create_handle(
            Duration::from_millis(500),
            Box::new(move || flag.store(true, Ordering::SeqCst)),
        );

        assert_eq!(1, service.pending());
        assert_eq!(HandleState::Pending, handle.state());

        service.advance(Duration::from_millis(500));
        assert!(fired.load(Ordering::SeqCst));
        assert_eq!(HandleState::Fired, handle.state());
    }

    #[test]
    fn handles_share_one_timer_service() {
        let service = Arc::new(ManualTimerService::new());
        let factory = TimerHandleFactory::new(service.clone());

        let first = factory.create_handle(Duration::from_secs(1), Box::new(|| {}));
        let second = factory.create_handle(Duration::from_secs(2), Box::new(|| {}));

        assert_eq!(2, service.pending());
        assert_ne!(first.id(), second.id());
    }
}
