use crate::{
    infra::{
        config::Config,
        countdown::{Countdown, TerminalView},
        countdown_app::CountdownApp,
    },
    scheduling::{SchedulerManagerFactory, TimerHandleFactory, TokioTimerService},
    utils::{SystemClock, logger},
};
use anyhow::{Context, Result};
use std::sync::Arc;
use tokio::{io::BufReader, runtime::Handle, sync::oneshot};
use tracing::{info, warn};

pub struct MainProgram {
    config: Config,
}

impl MainProgram {
    pub fn new(config: Config) -> Result<Self> {
        logger::init(&config.log_level)?;
        Ok(Self { config })
    }

    pub async fn run(&mut self) -> Result<()> {
        let (termination_sender, termination_receiver) = oneshot::channel();
        let (readiness_sender, readiness_receiver) = oneshot::channel();

        self.set_ctrlc_handler(termination_sender);

        tokio::spawn(async move {
            if readiness_receiver.await.is_ok() {
                info!("Application is ready");
            }
        });

        self.run_inner(termination_receiver, readiness_sender).await
    }

    async fn run_inner(
        &mut self,
        termination_receiver: oneshot::Receiver<()>,
        readiness_sender: oneshot::Sender<()>,
    ) -> Result<()> {
        self.log_startup_banner();

        let timer_service = Arc::new(TokioTimerService::new(Handle::current()));
        let handle_factory = Arc::new(TimerHandleFactory::new(timer_service));
        let manager_factory = SchedulerManagerFactory::new(handle_factory);

        let view = Arc::new(TerminalView::new(Arc::new(SystemClock)));
        let countdown = Countdown::new(&manager_factory, self.config.seconds, view);

        let mut app = CountdownApp::new(
            countdown,
            BufReader::new(tokio::io::stdin()),
            &self.config,
        );

        app.run(termination_receiver, readiness_sender)
            .await
            .context("Countdown application run failed")?;

        Ok(())
    }

    fn log_startup_banner(&self) {
        info!("delayer - version {}", env!("CARGO_PKG_VERSION"));
        info!(
            seconds = self.config.seconds,
            auto_start = self.config.auto_start,
            cancel_after = ?self.config.cancel_after(),
            "Configuration loaded"
        );
    }

    fn set_ctrlc_handler(&self, termination_sender: oneshot::Sender<()>) {
        tokio::spawn(async move {
            match tokio::signal::ctrl_c().await {
                Ok(()) => {
                    let _ = termination_sender.send(());
                }
                Err(err) => warn!("Error setting Ctrl-C handler: {err}"),
            }
        });

        info!("Press CTRL-C to terminate program");
    }
}
