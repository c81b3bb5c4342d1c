use crate::{
    infra::{
        config::Config,
        countdown::{Countdown, Phase},
        events::CountdownEvent,
    },
    scheduling::Scheduler,
};
use anyhow::{Context, Result};
use std::{pin::Pin, time::Duration};
use tokio::{
    io::{AsyncBufRead, AsyncBufReadExt, Lines},
    sync::oneshot,
    time::{Instant, Sleep},
};
use tracing::{debug, info, warn};

/// Drives a [`Countdown`] from lines of input.
///
/// Runs until `quit`, termination, or end of input once no countdown is
/// running.
pub struct CountdownApp<M: Scheduler, R> {
    countdown: Countdown<M>,
    input: Lines<R>,
    auto_start: bool,
    cancel_after: Option<Duration>,
}

impl<M, R> CountdownApp<M, R>
where
    M: Scheduler,
    R: AsyncBufRead + Unpin,
{
    pub fn new(countdown: Countdown<M>, input: R, config: &Config) -> Self {
        Self {
            countdown,
            input: input.lines(),
            auto_start: config.auto_start,
            cancel_after: config.cancel_after(),
        }
    }

    pub async fn run(
        &mut self,
        mut termination_receiver: oneshot::Receiver<()>,
        readiness_sender: oneshot::Sender<()>,
    ) -> Result<()> {
        let mut phase = self.countdown.subscribe();
        let cancel_timer = tokio::time::sleep(Duration::ZERO);
        tokio::pin!(cancel_timer);
        let mut cancel_armed = false;
        let mut input_open = true;
        let mut termination_open = true;

        readiness_sender
            .send(())
            .map_err(|_| anyhow::anyhow!("Failed to send readiness signal"))?;

        if self.auto_start {
            self.countdown.start();
            cancel_armed = arm(cancel_timer.as_mut(), self.cancel_after);
        }

        loop {
            tokio::select! {
                signal = &mut termination_receiver, if termination_open => {
                    match signal {
                        Ok(()) => {
                            info!("Termination requested");
                            break;
                        }
                        // Sender gone: no termination signal will ever come.
                        Err(_) => {
                            debug!("Termination signal unavailable");
                            termination_open = false;
                        }
                    }
                }

                // Incoming command
                line = self.input.next_line(), if input_open => {
                    match line.context("Failed to read command")? {
                        Some(line) => match line.parse::<CountdownEvent>() {
                            Ok(CountdownEvent::Start) => {
                                self.countdown.start();
                                cancel_armed = arm(cancel_timer.as_mut(), self.cancel_after);
                            }
                            Ok(CountdownEvent::Cancel) => {
                                self.countdown.cancel();
                                cancel_armed = false;
                            }
                            Ok(CountdownEvent::Quit) => {
                                info!("Quit requested");
                                break;
                            }
                            Err(unknown) if unknown.is_blank() => {}
                            Err(unknown) => warn!("{unknown}"),
                        },
                        None => {
                            debug!("Input closed");
                            input_open = false;
                        }
                    }
                }

                // Scripted cancellation
                () = &mut cancel_timer, if cancel_armed => {
                    cancel_armed = false;
                    self.countdown.cancel();
                }

                Ok(()) = phase.changed() => {}
            }

            if !input_open && self.countdown.phase() != Phase::Running {
                info!("Input closed and no countdown running");
                break;
            }
        }

        Ok(())
    }
}

fn arm(timer: Pin<&mut Sleep>, after: Option<Duration>) -> bool {
    match after.and_then(|after| Instant::now().checked_add(after)) {
        Some(deadline) => {
            timer.reset(deadline);
            true
        }
        None => false,
    }
}
