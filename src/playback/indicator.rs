//! Pure helpers the presentation layer uses to draw the indicator bars and fades.

use std::time::Duration;

/// Indicator fill for segment `k`, in percent
///
/// Segments before the current one are full, the current one follows its
/// progress, later ones are empty.
pub fn segment_fill(k: usize, current_index: usize, progress: f64) -> f64 {
    if k < current_index {
        100.0
    } else if k == current_index {
        progress.clamp(0.0, 1.0) * 100.0
    } else {
        0.0
    }
}

/// Opacity of a fade-in that started `elapsed` ago
pub fn fade_opacity(elapsed: Duration, fade: Duration) -> f64 {
    if fade.is_zero() {
        return 1.0;
    }
    (elapsed.as_secs_f64() / fade.as_secs_f64()).clamp(0.0, 1.0)
}

/// Text rendering of the indicator row, one bar per segment
pub fn render_bars(fills: &[f64], bar_width: usize) -> String {
    let mut out = String::with_capacity(fills.len() * (bar_width + 2));
    for fill in fills {
        let filled = ((fill / 100.0) * bar_width as f64).round() as usize;
        let filled = filled.min(bar_width);
        out.push('[');
        out.extend(std::iter::repeat('#').take(filled));
        out.extend(std::iter::repeat('-').take(bar_width - filled));
        out.push(']');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_segment_fill() {
        assert_eq!(segment_fill(0, 2, 0.5), 100.0);
        assert_eq!(segment_fill(2, 2, 0.5), 50.0);
        assert_eq!(segment_fill(3, 2, 0.5), 0.0);
        assert_eq!(segment_fill(2, 2, 1.7), 100.0);
    }

    #[test]
    fn test_fade_opacity() {
        let fade = Duration::from_millis(600);
        assert_eq!(fade_opacity(Duration::ZERO, fade), 0.0);
        assert_eq!(fade_opacity(Duration::from_millis(300), fade), 0.5);
        assert_eq!(fade_opacity(Duration::from_secs(2), fade), 1.0);
        assert_eq!(fade_opacity(Duration::ZERO, Duration::ZERO), 1.0);
    }

    #[test]
    fn test_render_bars() {
        assert_eq!(render_bars(&[100.0, 50.0, 0.0], 4), "[####][##--][----]");
        assert_eq!(render_bars(&[], 4), "");
    }
}
