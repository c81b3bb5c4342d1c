use crate::scheduling::{
    handle_factory::HandleFactory,
    manager::{Scheduler, SchedulerManager},
};
use std::sync::Arc;

pub trait ManagerFactory {
    type Manager: Scheduler;

    fn create_manager(&self, capacity: usize) -> Self::Manager;
}

/// Builds [`SchedulerManager`]s that share one handle factory.
pub struct SchedulerManagerFactory<F: HandleFactory> {
    handle_factory: Arc<F>,
}

impl<F: HandleFactory> SchedulerManagerFactory<F> {
    pub fn new(handle_factory: Arc<F>) -> Self {
        Self { handle_factory }
    }
}

impl<F: HandleFactory> ManagerFactory for SchedulerManagerFactory<F> {
    type Manager = SchedulerManager<F>;

    fn create_manager(&self, capacity: usize) -> SchedulerManager<F> {
        SchedulerManager::new(self.handle_factory.clone(), capacity)
    }
}
