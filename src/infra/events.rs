use std::str::FromStr;
use thiserror::Error;

/// A command typed at the countdown prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CountdownEvent {
    Start,
    Cancel,
    Quit,
}

/// Input that is not a known command. Holds the normalised text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown command '{0}'")]
pub struct UnknownCommand(pub String);

impl UnknownCommand {
    pub fn is_blank(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromStr for CountdownEvent {
    type Err = UnknownCommand;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        match line.trim().to_ascii_lowercase().as_str() {
            "start" | "s" => Ok(CountdownEvent::Start),
            "cancel" | "c" => Ok(CountdownEvent::Cancel),
            "quit" | "q" | "exit" => Ok(CountdownEvent::Quit),
            other => Err(UnknownCommand(other.to_owned())),
        }
    }
}
