use crate::scheduling::delay_from_secs;
use clap::Parser;
use std::time::Duration;

/// Terminal countdown built on cancellable deferred callbacks.
#[derive(Parser, Debug, Clone)]
#[command(name = "delayer", version, about)]
pub struct Config {
    /// Length of the countdown in seconds. Also the number of timers a
    /// countdown may hold.
    #[arg(short, long, env = "DELAYER_SECONDS", default_value_t = 10)]
    pub seconds: u32,

    /// Start a countdown as soon as the program is ready.
    #[arg(long)]
    pub auto_start: bool,

    /// Cancel the running countdown after this many seconds.
    #[arg(long, value_name = "SECS")]
    pub cancel_after: Option<f64>,

    /// Log filter, e.g. `info` or `delayer=debug`. `RUST_LOG` overrides it.
    #[arg(long, env = "DELAYER_LOG", default_value = "info")]
    pub log_level: String,
}

impl Config {
    pub fn cancel_after(&self) -> Option<Duration> {
        self.cancel_after.map(delay_from_secs)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            seconds: 10,
            auto_start: false,
            cancel_after: None,
            log_level: "info".to_owned(),
        }
    }
}
