use crate::driver::frame_clock::FrameClock;
use crate::input::{Gesture, GestureTracker};
use crate::playback::{PlaybackController, Snapshot};
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, info};

/// Capacity of the command queue between the handle and the playback task
const COMMAND_QUEUE_SIZE: usize = 100;

/// Operation forwarded from a [`StoryPlayer`] handle to its playback task
#[derive(Debug)]
pub enum Command {
    Pause,
    Resume,
    SkipForward,
    SkipBackward,
    JumpTo(usize),
    Gesture(Gesture),
    /// Ask for the current snapshot
    Query(oneshot::Sender<Snapshot>),
    /// Close the session; acknowledged once the clock is cancelled
    Dispose(oneshot::Sender<()>),
}

/// Async host for a playback session
///
/// The controller is moved into a single tokio task that owns it exclusively.
/// Commands and frames are applied one at a time in that task, and every
/// snapshot the controller emits is forwarded on the snapshot channel in
/// emission order.
pub struct StoryPlayer {
    commands: mpsc::Sender<Command>,
    task: JoinHandle<()>,
}

impl StoryPlayer {
    /// Start hosting `controller`, driven by `clock`
    ///
    /// The returned receiver yields the current snapshot first, then every
    /// snapshot the session emits. It closes once the session is disposed.
    pub fn spawn<C>(
        mut controller: PlaybackController,
        clock: C,
    ) -> (Self, mpsc::UnboundedReceiver<Snapshot>)
    where
        C: FrameClock + 'static,
    {
        let (command_tx, command_rx) = mpsc::channel::<Command>(COMMAND_QUEUE_SIZE);
        let (snapshot_tx, snapshot_rx) = mpsc::unbounded_channel::<Snapshot>();

        let _ = snapshot_tx.send(controller.snapshot());
        controller.subscribe(move |snapshot| {
            let _ = snapshot_tx.send(*snapshot);
        });

        let task = tokio::spawn(Self::run(controller, clock, command_rx));

        (
            Self {
                commands: command_tx,
                task,
            },
            snapshot_rx,
        )
    }

    async fn run<C: FrameClock>(
        mut controller: PlaybackController,
        mut clock: C,
        mut commands: mpsc::Receiver<Command>,
    ) {
        let mut gestures = GestureTracker::new();
        let mut clock_running = true;

        while !controller.is_closed() {
            tokio::select! {
                biased;

                command = commands.recv() => match command {
                    Some(command) => Self::apply(&mut controller, &mut gestures, command),
                    None => {
                        debug!("All player handles dropped, disposing session");
                        controller.dispose();
                    }
                },

                frame = clock.next_frame(), if clock_running => match frame {
                    Some(delta) => controller.tick(delta),
                    None => {
                        info!("Frame clock stopped; playback no longer advances");
                        clock_running = false;
                    }
                },
            }
        }

        debug!("Playback task finished");
    }

    fn apply(controller: &mut PlaybackController, gestures: &mut GestureTracker, command: Command) {
        match command {
            Command::Pause => controller.pause(),
            Command::Resume => controller.resume(),
            Command::SkipForward => controller.skip_forward(),
            Command::SkipBackward => controller.skip_backward(),
            Command::JumpTo(index) => controller.jump_to(index),
            Command::Gesture(gesture) => gestures.handle(gesture, controller),
            Command::Query(reply) => {
                let _ = reply.send(controller.snapshot());
            }
            Command::Dispose(ack) => {
                controller.dispose();
                let _ = ack.send(());
            }
        }
    }

    // Commands sent after the session closed are dropped
    async fn send(&self, command: Command) {
        if self.commands.send(command).await.is_err() {
            debug!("Playback session already closed, ignoring command");
        }
    }

    pub async fn pause(&self) {
        self.send(Command::Pause).await;
    }

    pub async fn resume(&self) {
        self.send(Command::Resume).await;
    }

    pub async fn skip_forward(&self) {
        self.send(Command::SkipForward).await;
    }

    pub async fn skip_backward(&self) {
        self.send(Command::SkipBackward).await;
    }

    pub async fn jump_to(&self, index: usize) {
        self.send(Command::JumpTo(index)).await;
    }

    pub async fn gesture(&self, gesture: Gesture) {
        self.send(Command::Gesture(gesture)).await;
    }

    /// Current snapshot, or `None` once the session has closed
    pub async fn snapshot(&self) -> Option<Snapshot> {
        let (tx, rx) = oneshot::channel();
        self.send(Command::Query(tx)).await;
        rx.await.ok()
    }

    /// Whether the playback task has ended
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Close the session
    ///
    /// Returns after the playback task has cancelled its clock and exited, so
    /// no snapshot is sent after this completes.
    pub async fn dispose(self) {
        let (ack_tx, ack_rx) = oneshot::channel();
        self.send(Command::Dispose(ack_tx)).await;
        let _ = ack_rx.await;
        let _ = self.task.await;
    }

    /// Wait for the session to close on its own
    pub async fn closed(self) {
        let _ = self.task.await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Segment;
    use crate::driver::{IntervalClock, ManualClock};
    use crate::input::TouchZone;
    use crate::playback::{EndOfSequence, PlaybackConfig, PlaybackState};
    use std::time::Duration;

    fn controller(n: usize, end: EndOfSequence) -> PlaybackController {
        let segments: Vec<Segment> = (0..n)
            .map(|i| Segment::new(format!("https://cdn/{}.jpg", i), i as u32))
            .collect();
        let config = PlaybackConfig {
            end_of_sequence: end,
            ..PlaybackConfig::default()
        };
        PlaybackController::new(segments, config).unwrap()
    }

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[tokio::test]
    async fn test_initial_snapshot_and_frames() {
        let (clock, frames) = ManualClock::new();
        let (player, mut snapshots) = StoryPlayer::spawn(controller(3, EndOfSequence::Loop), clock);

        let first = snapshots.recv().await.unwrap();
        assert_eq!(first.current_index, 0);
        assert_eq!(first.progress, 0.0);
        assert_eq!(first.state, PlaybackState::Playing);

        frames.advance(ms(1500));
        let next = snapshots.recv().await.unwrap();
        assert!((next.progress - 0.5).abs() < 1e-6);

        frames.advance(ms(1500));
        let next = snapshots.recv().await.unwrap();
        assert_eq!(next.current_index, 1);
        assert_eq!(next.progress, 0.0);

        player.dispose().await;
    }

    #[tokio::test]
    async fn test_pause_resume_through_handle() {
        let (clock, frames) = ManualClock::new();
        let (player, mut snapshots) = StoryPlayer::spawn(controller(3, EndOfSequence::Loop), clock);
        snapshots.recv().await.unwrap();

        frames.advance(ms(1000));
        snapshots.recv().await.unwrap();

        player.pause().await;
        let paused = snapshots.recv().await.unwrap();
        assert!(paused.paused);
        assert!((paused.progress - 1.0 / 3.0).abs() < 1e-6);

        player.resume().await;
        let resumed = snapshots.recv().await.unwrap();
        assert!(!resumed.paused);
        assert_eq!(resumed.progress, paused.progress);

        player.dispose().await;
    }

    #[tokio::test]
    async fn test_gestures_through_handle() {
        let (clock, _frames) = ManualClock::new();
        let (player, mut snapshots) = StoryPlayer::spawn(controller(3, EndOfSequence::Loop), clock);
        snapshots.recv().await.unwrap();

        player.gesture(Gesture::PressIn(TouchZone::Right)).await;
        player
            .gesture(Gesture::Release { zone: TouchZone::Right, tapped: true })
            .await;

        assert!(snapshots.recv().await.unwrap().paused);
        let skipped = snapshots.recv().await.unwrap();
        assert_eq!(skipped.current_index, 1);
        assert!(!skipped.paused);

        player.jump_to(2).await;
        assert_eq!(snapshots.recv().await.unwrap().current_index, 2);
        assert_eq!(player.snapshot().await.unwrap().current_index, 2);

        player.dispose().await;
    }

    #[tokio::test]
    async fn test_dispose_drops_queued_frames() {
        let (clock, frames) = ManualClock::new();
        let (player, mut snapshots) = StoryPlayer::spawn(controller(3, EndOfSequence::Loop), clock);

        for _ in 0..10 {
            frames.advance(ms(500));
        }
        player.dispose().await;

        let mut remaining = Vec::new();
        while let Some(snapshot) = snapshots.recv().await {
            remaining.push(snapshot);
        }
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].progress, 0.0);
        assert!(!frames.advance(ms(500)));
    }

    #[tokio::test]
    async fn test_dropping_handle_disposes() {
        let (clock, _frames) = ManualClock::new();
        let (player, mut snapshots) = StoryPlayer::spawn(controller(2, EndOfSequence::Loop), clock);
        snapshots.recv().await.unwrap();

        drop(player);
        assert_eq!(snapshots.recv().await, None);
    }

    #[tokio::test]
    async fn test_close_policy_ends_task() {
        let (clock, frames) = ManualClock::new();
        let (player, mut snapshots) =
            StoryPlayer::spawn(controller(2, EndOfSequence::Close), clock);

        frames.advance(ms(3000));
        frames.advance(ms(3000));

        let mut last = None;
        while let Some(snapshot) = snapshots.recv().await {
            last = Some(snapshot);
        }
        let last = last.unwrap();
        assert!(last.is_closed());
        assert_eq!(last.current_index, 1);

        player.skip_backward().await;
        assert_eq!(player.snapshot().await, None);
        player.closed().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_interval_clock_auto_advances() {
        let clock = IntervalClock::new(ms(100));
        let (player, mut snapshots) = StoryPlayer::spawn(controller(3, EndOfSequence::Loop), clock);

        tokio::time::sleep(ms(3250)).await;
        let current = player.snapshot().await.unwrap();
        assert_eq!(current.current_index, 1);
        assert!(current.progress > 0.0 && current.progress < 0.2);

        player.dispose().await;
        let mut indices = Vec::new();
        while let Some(snapshot) = snapshots.recv().await {
            indices.push(snapshot.current_index);
        }
        assert!(indices.windows(2).all(|w| w[0] <= w[1]));
    }
}
