mod config;
pub use config::Config;

mod countdown;
pub use countdown::{COMPLETE_TEXT, Countdown, CountdownView, Phase, TerminalView};

mod countdown_app;
pub use countdown_app::CountdownApp;

mod events;
pub use events::{CountdownEvent, UnknownCommand};

mod main_program;
pub use main_program::MainProgram;
