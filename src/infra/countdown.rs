use crate::{
    scheduling::{ManagerFactory, Scheduler},
    utils::{Clock, TimeT},
};
use std::sync::{Arc, Weak};
use tokio::sync::watch;
use tracing::info;

pub const COMPLETE_TEXT: &str = "Delayer Complete!";

/// Where countdown text ends up.
pub trait CountdownView: Send + Sync {
    fn show(&self, text: &str);
}

/// Prints each line to stdout, prefixed with the time since the view was
/// created.
pub struct TerminalView {
    clock: Arc<dyn Clock>,
    origin: TimeT,
}

impl TerminalView {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        let origin = clock.now();
        Self { clock, origin }
    }

    fn render(&self, text: &str) -> String {
        let elapsed = self.clock.now().saturating_sub(self.origin);
        format!("[+{}.{:03}s] {}", elapsed / 1000, elapsed % 1000, text)
    }
}

impl CountdownView for TerminalView {
    fn show(&self, text: &str) {
        println!("{}", self.render(text));
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Running,
    Complete,
}

/// A countdown of `seconds` ticks, one deferred callback per second.
pub struct Countdown<M: Scheduler> {
    seconds: u32,
    manager: M,
    view: Arc<dyn CountdownView>,
    phase: Arc<watch::Sender<Phase>>,
}

impl<M: Scheduler> Countdown<M> {
    pub fn new<F>(factory: &F, seconds: u32, view: Arc<dyn CountdownView>) -> Self
    where
        F: ManagerFactory<Manager = M>,
    {
        let manager = factory.create_manager(usize::try_from(seconds).unwrap_or(usize::MAX));
        let (phase, _) = watch::channel(Phase::Idle);
        let countdown = Self {
            seconds,
            manager,
            view,
            phase: Arc::new(phase),
        };
        countdown.view.show(&countdown.idle_text());
        countdown
    }

    pub fn subscribe(&self) -> watch::Receiver<Phase> {
        self.phase.subscribe()
    }

    pub fn phase(&self) -> Phase {
        *self.phase.borrow()
    }

    /// Starts from the top, abandoning any countdown already running.
    pub fn start(&mut self) {
        info!(seconds = self.seconds, "countdown started");
        self.view.show(&format!("{} second delay started", self.seconds));
        self.manager.reset();
        self.phase.send_replace(Phase::Running);

        for i in 1..=self.seconds {
            let view = Arc::downgrade(&self.view);
            let phase = self.phase.clone();
            let seconds = self.seconds;

            self.manager.schedule_secs(
                f64::from(i),
                Box::new(move || tick(&view, &phase, seconds, i)),
            );
        }

        if self.seconds == 0 {
            self.phase.send_replace(Phase::Complete);
        }
    }

    pub fn cancel(&mut self) {
        info!("countdown cancelled");
        self.view.show(&self.idle_text());
        self.manager.reset();
        self.phase.send_replace(Phase::Idle);
    }

    fn idle_text(&self) -> String {
        format!("Type `start` to begin a {} second delay", self.seconds)
    }
}

fn tick(view: &Weak<dyn CountdownView>, phase: &watch::Sender<Phase>, seconds: u32, i: u32) {
    let Some(view) = view.upgrade() else {
        return;
    };

    if i < seconds {
        view.show(&(seconds - i).to_string());
    } else {
        view.show(COMPLETE_TEXT);
        phase.send_replace(Phase::Complete);
        info!("countdown complete");
    }
}
