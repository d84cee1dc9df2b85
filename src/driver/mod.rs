pub mod frame_clock;
pub mod manual;
pub mod player;

pub use frame_clock::{FrameClock, IntervalClock, DEFAULT_FRAME_INTERVAL};
pub use manual::{ManualClock, ManualClockHandle};
pub use player::{Command, StoryPlayer};
