use std::time::{Duration, Instant};

/// Frame timing snapshot handed to the frame driver.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct FrameTime {
    /// Time elapsed since the previous tick, in seconds (clamped).
    pub dt: f32,

    /// Time elapsed since the clock started, in seconds.
    pub elapsed: f32,

    /// Monotonic frame counter.
    pub frame_index: u64,
}

impl FrameTime {
    #[inline]
    pub const fn new(dt: f32, elapsed: f32, frame_index: u64) -> Self {
        Self { dt, elapsed, frame_index }
    }
}

/// Frame clock producing `FrameTime` snapshots.
///
/// One clock per scene: delta time is clamped so a stalled or backgrounded
/// host does not make animations jump on resume.
#[derive(Debug, Clone)]
pub struct FrameClock {
    start: Instant,
    last: Instant,
    frame_index: u64,
    dt_min: Duration,
    dt_max: Duration,
}

impl FrameClock {
    /// Creates a new clock with default clamps (0.1 ms .. 250 ms).
    pub fn new() -> Self {
        Self::with_clamps(Duration::from_micros(100), Duration::from_millis(250))
    }

    /// Creates a clock with custom delta-time clamps.
    pub fn with_clamps(dt_min: Duration, dt_max: Duration) -> Self {
        debug_assert!(dt_min <= dt_max);
        let now = Instant::now();
        Self {
            start: now,
            last: now,
            frame_index: 0,
            dt_min,
            dt_max,
        }
    }

    /// Resets the delta baseline without touching elapsed time.
    ///
    /// Call when resuming after the frame driver was idle.
    pub fn reset(&mut self) {
        self.last = Instant::now();
    }

    /// Advances the clock and returns a new `FrameTime`.
    pub fn tick(&mut self) -> FrameTime {
        self.tick_at(Instant::now())
    }

    fn tick_at(&mut self, now: Instant) -> FrameTime {
        let dt = now
            .saturating_duration_since(self.last)
            .clamp(self.dt_min, self.dt_max);

        self.last = now;

        let ft = FrameTime {
            dt: dt.as_secs_f32(),
            elapsed: now.saturating_duration_since(self.start).as_secs_f32(),
            frame_index: self.frame_index,
        };

        self.frame_index = self.frame_index.wrapping_add(1);

        ft
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixed-step clock for headless runs: every tick advances by the same `dt`.
#[derive(Debug, Clone)]
pub struct FixedClock {
    dt: f32,
    elapsed: f32,
    frame_index: u64,
}

impl FixedClock {
    pub fn new(dt: f32) -> Self {
        Self { dt, elapsed: 0.0, frame_index: 0 }
    }

    pub fn tick(&mut self) -> FrameTime {
        self.elapsed += self.dt;
        let ft = FrameTime::new(self.dt, self.elapsed, self.frame_index);
        self.frame_index = self.frame_index.wrapping_add(1);
        ft
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dt_is_clamped_after_a_stall() {
        let mut clock = FrameClock::new();
        let later = clock.last + Duration::from_secs(5);
        let ft = clock.tick_at(later);
        assert!((ft.dt - 0.25).abs() < 1e-6);
        assert!(ft.elapsed >= 5.0);
    }

    #[test]
    fn frame_index_counts_up() {
        let mut clock = FrameClock::new();
        let base = clock.last;
        let a = clock.tick_at(base + Duration::from_millis(16));
        let b = clock.tick_at(base + Duration::from_millis(32));
        assert_eq!(a.frame_index, 0);
        assert_eq!(b.frame_index, 1);
        assert!(b.elapsed > a.elapsed);
    }

    #[test]
    fn fixed_clock_accumulates() {
        let mut clock = FixedClock::new(0.5);
        clock.tick();
        let ft = clock.tick();
        assert_eq!(ft.elapsed, 1.0);
        assert_eq!(ft.frame_index, 1);
    }
}
