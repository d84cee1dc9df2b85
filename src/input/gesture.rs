use crate::playback::PlaybackController;
use tracing::debug;

/// Half of the viewer a touch landed on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TouchZone {
    /// Goes back one segment on tap
    Left,
    /// Goes forward one segment on tap
    Right,
}

/// Touch input from the presentation layer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gesture {
    /// Finger down on a zone
    PressIn(TouchZone),
    /// Finger up; `tapped` is set when the press completed as a tap
    Release { zone: TouchZone, tapped: bool },
    /// A horizontal page swipe settled on a page
    PageSettled(usize),
}

/// Zone for a touch at `x` on a viewer `width` wide
pub fn zone_at(x: f32, width: f32) -> TouchZone {
    if x < width / 2.0 {
        TouchZone::Left
    } else {
        TouchZone::Right
    }
}

/// Page a paged list settled on, from its horizontal scroll offset
///
/// Returns `None` for a degenerate page width.
pub fn page_at(offset_x: f32, page_width: f32, len: usize) -> Option<usize> {
    if page_width <= 0.0 || len == 0 || !offset_x.is_finite() {
        return None;
    }
    let page = (offset_x / page_width).round().max(0.0) as usize;
    Some(page.min(len - 1))
}

/// Maps touch input onto controller operations
///
/// Pressing a zone pauses playback. Releasing it as a tap skips in that
/// zone's direction; any other release of a tracked press resumes. A tap
/// that cannot skip because the session is at a boundary resumes instead of
/// leaving the session paused. A release with no tracked press never
/// resumes, so a pause set by the host survives stray touch events.
#[derive(Debug, Default)]
pub struct GestureTracker {
    pressed: Option<TouchZone>,
}

impl GestureTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Zone currently held down, if any
    pub fn pressed(&self) -> Option<TouchZone> {
        self.pressed
    }

    pub fn handle(&mut self, gesture: Gesture, controller: &mut PlaybackController) {
        debug!("Gesture: {:?}", gesture);
        match gesture {
            Gesture::PressIn(zone) => {
                self.pressed = Some(zone);
                controller.pause();
            }
            Gesture::Release { zone, tapped } => {
                let was_pressed = self.pressed.take().is_some();
                if tapped {
                    let before = controller.current_index();
                    match zone {
                        TouchZone::Left => controller.skip_backward(),
                        TouchZone::Right => controller.skip_forward(),
                    }
                    if controller.current_index() != before {
                        return;
                    }
                }
                // Only undo a pause this tracker started
                if was_pressed {
                    controller.resume();
                }
            }
            Gesture::PageSettled(index) => controller.jump_to(index),
        }
    }
}
