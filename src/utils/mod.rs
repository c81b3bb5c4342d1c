mod clock;
pub use clock::{Clock, FakeClock, SystemClock, TimeT};

pub mod logger;
