//! Animated scrolling of the content pane toward a heading

use std::time::{Duration, Instant};

/// Frame interval while an animation runs
pub const FRAME_INTERVAL: Duration = Duration::from_millis(16);

/// An in-flight scroll animation with ease-out timing
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SmoothScroll {
    from: f32,
    to: f32,
    started: Instant,
    duration: Duration,
}

impl SmoothScroll {
    pub fn new(from: f32, to: f32, duration: Duration, now: Instant) -> Self {
        Self {
            from,
            to,
            started: now,
            duration,
        }
    }

    /// Offset at `now`
    pub fn position(&self, now: Instant) -> f32 {
        let t = self.progress(now);
        self.from + (self.to - self.from) * ease_out_cubic(t)
    }

    pub fn is_finished(&self, now: Instant) -> bool {
        self.progress(now) >= 1.0
    }

    fn progress(&self, now: Instant) -> f32 {
        if self.duration.is_zero() {
            return 1.0;
        }
        let elapsed = now.saturating_duration_since(self.started);
        (elapsed.as_secs_f32() / self.duration.as_secs_f32()).min(1.0)
    }
}

fn ease_out_cubic(t: f32) -> f32 {
    1.0 - (1.0 - t).powi(3)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_animation_reaches_target() {
        let start = Instant::now();
        let scroll = SmoothScroll::new(0.0, 400.0, Duration::from_millis(200), start);

        assert_eq!(scroll.position(start), 0.0);
        assert!(!scroll.is_finished(start));

        let end = start + Duration::from_millis(200);
        assert_eq!(scroll.position(end), 400.0);
        assert!(scroll.is_finished(end));
        assert_eq!(scroll.position(end + Duration::from_secs(1)), 400.0);
    }

    #[test]
    fn test_ease_out_front_loads_motion() {
        let start = Instant::now();
        let scroll = SmoothScroll::new(100.0, 0.0, Duration::from_millis(100), start);
        let halfway = scroll.position(start + Duration::from_millis(50));
        // More than half the distance is covered at half time
        assert!(halfway < 50.0);
        assert!(halfway > 0.0);
    }

    #[test]
    fn test_zero_duration_jumps() {
        let start = Instant::now();
        let scroll = SmoothScroll::new(0.0, 250.0, Duration::ZERO, start);
        assert!(scroll.is_finished(start));
        assert_eq!(scroll.position(start), 250.0);
    }
}
