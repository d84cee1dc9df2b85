use anyhow::{Context, Result};
use story_reel::driver::IntervalClock;
use story_reel::input::load_story;
use story_reel::playback::indicator::render_bars;
use story_reel::{EndOfSequence, PlaybackController, Snapshot, Story, StoryPlayer, ViewerSettings};
use std::path::PathBuf;
use tracing::{debug, error, info};
use tracing_subscriber::EnvFilter;

const HELP: &str = "\
story-reel - play a story headlessly

USAGE:
  story-reel --story <FILE> [OPTIONS]

OPTIONS:
  --story <FILE>        Story JSON file
  --config <FILE>       Settings JSON (defaults to the user config directory)
  --duration-ms <N>     Time each segment stays on screen
  --end <loop|close>    What happens after the last segment
  --frame-ms <N>        Time between animation frames
  --cycles <N>          Stop after N passes through a looping story [default: 1]
  -h, --help            Print help
";

/// Command line options
struct Args {
    story: PathBuf,
    config: Option<PathBuf>,
    duration_ms: Option<u64>,
    end: Option<EndOfSequence>,
    frame_ms: Option<u64>,
    cycles: u32,
}

impl Args {
    fn parse() -> Result<Option<Self>> {
        let mut pargs = pico_args::Arguments::from_env();
        if pargs.contains(["-h", "--help"]) {
            return Ok(None);
        }

        let args = Self {
            story: pargs.value_from_str("--story").context("Missing --story <FILE>")?,
            config: pargs.opt_value_from_str("--config")?,
            duration_ms: pargs.opt_value_from_str("--duration-ms")?,
            end: pargs.opt_value_from_str("--end")?,
            frame_ms: pargs.opt_value_from_str("--frame-ms")?,
            cycles: pargs.opt_value_from_fn("--cycles", parse_cycles)?.unwrap_or(1),
        };

        let rest = pargs.finish();
        if !rest.is_empty() {
            anyhow::bail!("Unexpected arguments: {:?}", rest);
        }
        Ok(Some(args))
    }

    fn settings(&self) -> Result<ViewerSettings> {
        let mut settings = match &self.config {
            Some(path) => ViewerSettings::load_from(path)?,
            None => ViewerSettings::load(),
        };
        if let Some(ms) = self.duration_ms {
            settings.playback.segment_duration_ms = ms;
        }
        if let Some(end) = self.end {
            settings.playback.end_of_sequence = end;
        }
        if let Some(ms) = self.frame_ms {
            settings.frame_interval_ms = ms;
        }
        Ok(settings)
    }
}

fn parse_cycles(value: &str) -> Result<u32, String> {
    match value.parse::<u32>() {
        Ok(0) => Err("--cycles must be at least 1".to_string()),
        Ok(n) => Ok(n),
        Err(e) => Err(format!("invalid --cycles value {:?}: {}", value, e)),
    }
}

/// Whether moving from `prev` to `next` finished a pass through a looping story
fn completes_pass(prev: &Snapshot, next: &Snapshot, len: usize) -> bool {
    len > 1
        && prev.current_index + 1 == len
        && next.current_index == 0
        && !next.paused
        && !next.is_closed()
}

fn main() -> Result<()> {
    // Initialize logging
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let Some(args) = Args::parse()? else {
        print!("{}", HELP);
        return Ok(());
    };
    let settings = args.settings()?;
    let story = load_story(&args.story)?;

    // The controller runs on a single event thread
    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to create Tokio runtime")?;

    rt.block_on(play(story, settings, args.cycles))
}

async fn play(story: Story, settings: ViewerSettings, cycles: u32) -> Result<()> {
    let controller = match PlaybackController::new(story.segments(), settings.playback.clone()) {
        Ok(controller) => controller,
        Err(e) => {
            error!("Story {} unavailable: {}", story.id, e);
            return Err(e.into());
        }
    };

    info!("Opening story {} ({} segments)", story.id, story.len());

    // A lone looping image never advances, so one pass is one segment duration
    let lone_loop = story.len() == 1 && settings.playback.end_of_sequence == EndOfSequence::Loop;
    let lone_passes = tokio::time::sleep(settings.playback.segment_duration() * cycles);
    let header_faded = tokio::time::sleep(settings.playback.header_fade());
    tokio::pin!(lone_passes, header_faded);
    let mut header_shown = false;

    let clock = IntervalClock::new(settings.frame_interval());
    let (player, mut snapshots) = StoryPlayer::spawn(controller, clock);

    let mut last: Option<Snapshot> = None;
    let mut completed = 0u32;

    loop {
        tokio::select! {
            _ = &mut header_faded, if !header_shown => {
                header_shown = true;
                info!("{} - by {}", story.title(), story.author.display_label());
            }
            _ = &mut lone_passes, if lone_loop => {
                info!("Finished pass {} of {}", cycles, cycles);
                player.dispose().await;
                return Ok(());
            }
            snapshot = snapshots.recv() => {
                let Some(snapshot) = snapshot else { break };

                if let Some(prev) = last {
                    if completes_pass(&prev, &snapshot, story.len()) {
                        completed += 1;
                        info!("Finished pass {} of {}", completed, cycles);
                    }
                }
                report(&story, &snapshot, last.as_ref(), settings.bar_width);
                last = Some(snapshot);

                if snapshot.is_closed() {
                    break;
                }
                if completed >= cycles {
                    player.dispose().await;
                    return Ok(());
                }
            }
            _ = tokio::signal::ctrl_c() => {
                info!("Interrupted, closing viewer");
                player.dispose().await;
                return Ok(());
            }
        }
    }

    player.closed().await;
    Ok(())
}

fn report(story: &Story, snapshot: &Snapshot, prev: Option<&Snapshot>, bar_width: usize) {
    let bars = render_bars(&snapshot.indicator_fills(story.len()), bar_width);
    let index_changed = prev.map_or(true, |p| p.current_index != snapshot.current_index);
    let state_changed = prev.map_or(true, |p| p.state != snapshot.state);

    if index_changed || state_changed {
        let segment = &story.items[snapshot.current_index];
        info!(
            "{} {:?} {}/{} {}{}",
            bars,
            snapshot.state,
            snapshot.current_index + 1,
            story.len(),
            segment.media_ref,
            segment.caption_text().map(|c| format!(" \"{}\"", c)).unwrap_or_default()
        );
    } else {
        debug!("{} {:.0}%", bars, snapshot.progress * 100.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use story_reel::PlaybackState;

    fn snapshot(index: usize, state: PlaybackState) -> Snapshot {
        Snapshot {
            current_index: index,
            progress: 0.0,
            paused: state == PlaybackState::Paused,
            state,
        }
    }

    #[test]
    fn test_parse_cycles_rejects_zero() {
        assert_eq!(parse_cycles("3"), Ok(3));
        assert!(parse_cycles("0").is_err());
        assert!(parse_cycles("many").is_err());
    }

    #[test]
    fn test_completes_pass_on_wraparound() {
        let last = snapshot(2, PlaybackState::Playing);
        assert!(completes_pass(&last, &snapshot(0, PlaybackState::Playing), 3));
        assert!(!completes_pass(&last, &snapshot(0, PlaybackState::Paused), 3));
        assert!(!completes_pass(&snapshot(1, PlaybackState::Playing), &last, 3));
    }

    #[test]
    fn test_single_segment_snapshots_never_complete_a_pass() {
        let only = snapshot(0, PlaybackState::Playing);
        assert!(!completes_pass(&only, &snapshot(0, PlaybackState::Paused), 1));
        assert!(!completes_pass(&only, &snapshot(0, PlaybackState::Closed), 1));
    }
}
