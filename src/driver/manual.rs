use async_trait::async_trait;
use crate::driver::frame_clock::FrameClock;
use std::time::Duration;
use tokio::sync::mpsc;

/// Frame clock stepped by hand, for tests and scripted playback
///
/// Each call to [`ManualClockHandle::advance`] delivers exactly one frame.
pub struct ManualClock {
    frames: mpsc::UnboundedReceiver<Duration>,
}

/// Sending side of a [`ManualClock`]
#[derive(Clone)]
pub struct ManualClockHandle {
    frames: mpsc::UnboundedSender<Duration>,
}

impl ManualClock {
    pub fn new() -> (Self, ManualClockHandle) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { frames: rx }, ManualClockHandle { frames: tx })
    }
}

impl ManualClockHandle {
    /// Queue one frame; returns false once the clock's owner is gone
    pub fn advance(&self, delta: Duration) -> bool {
        self.frames.send(delta).is_ok()
    }
}

#[async_trait]
impl FrameClock for ManualClock {
    async fn next_frame(&mut self) -> Option<Duration> {
        self.frames.recv().await
    }
}
