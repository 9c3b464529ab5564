//! Converts host frame timestamps into integration steps.

/// Seconds of wall-clock time are multiplied by this to get simulation time units.
pub const DEFAULT_TIME_SCALE: f64 = 50.0;

/// Tracks the timestamp of the previous frame and turns the elapsed wall-clock time into a
/// scaled step `dt`.
///
/// The first tick has no previous frame and yields `dt = 0`. A timestamp earlier than the
/// previous one also yields `dt = 0`.
#[derive(Clone, Debug)]
pub struct FrameClock {
    scale: f64,
    last_time: Option<f64>,
}

impl FrameClock {
    #[must_use]
    pub fn new(scale: f64) -> Self {
        FrameClock {
            scale,
            last_time: None,
        }
    }

    /// Records the frame at `now` (seconds) and returns the scaled step since the last frame.
    pub fn tick(&mut self, now: f64) -> f64 {
        let elapsed = self.last_time.map_or(0.0, |last| (now - last).max(0.0));
        self.last_time = Some(now);
        elapsed * self.scale
    }

    #[must_use]
    pub fn last_time(&self) -> Option<f64> {
        self.last_time
    }

    #[must_use]
    pub fn scale(&self) -> f64 {
        self.scale
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        FrameClock::new(DEFAULT_TIME_SCALE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_approx_eq::assert_approx_eq;

    #[test]
    fn first_tick_is_zero() {
        let mut clock = FrameClock::default();
        assert_eq!(clock.tick(12.5), 0.0);
        assert_eq!(clock.last_time(), Some(12.5));
    }

    #[test]
    fn scales_elapsed_seconds() {
        let mut clock = FrameClock::default();
        clock.tick(1.0);
        // One 60 Hz refresh.
        assert_approx_eq!(clock.tick(1.0 + 1.0 / 60.0), 50.0 / 60.0);
        assert_approx_eq!(clock.tick(1.1), 50.0 * (0.1 - 1.0 / 60.0));
    }

    #[test]
    fn backwards_time_is_clamped() {
        let mut clock = FrameClock::new(10.0);
        clock.tick(5.0);
        assert_eq!(clock.tick(4.0), 0.0);
        assert_approx_eq!(clock.tick(4.5), 5.0);
    }
}
