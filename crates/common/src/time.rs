use std::time::{Duration, Instant};

/// Frame timing snapshot.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct FrameTime {
    /// Time elapsed since the previous frame tick.
    pub delta: Duration,

    /// Monotonic timestamp taken at the tick.
    pub now: Instant,

    /// Monotonic frame counter, starting at 0.
    pub frame_index: u64,
}

impl FrameTime {
    pub fn delta_ms(&self) -> f64 {
        self.delta.as_secs_f64() * 1000.0
    }

    pub fn delta_secs(&self) -> f32 {
        self.delta.as_secs_f32()
    }
}

/// Frame clock producing `FrameTime` snapshots from host timestamps.
///
/// Deltas are the true elapsed time between ticks; no clamping is applied, so
/// time-based animation stays independent of the achieved frame rate.
/// Timestamps are supplied by the caller so hosts and tests control time.
#[derive(Debug, Clone)]
pub struct FrameClock {
    last: Instant,
    frame_index: u64,
}

impl FrameClock {
    pub fn starting_at(now: Instant) -> Self {
        Self {
            last: now,
            frame_index: 0,
        }
    }

    /// Resets the clock baseline without touching the frame counter.
    pub fn reset(&mut self, now: Instant) {
        self.last = now;
    }

    /// Advances the clock to `now` and returns a new `FrameTime`.
    pub fn tick(&mut self, now: Instant) -> FrameTime {
        let delta = now.saturating_duration_since(self.last);
        self.last = now;

        let ft = FrameTime {
            delta,
            now,
            frame_index: self.frame_index,
        };
        self.frame_index = self.frame_index.wrapping_add(1);
        ft
    }

    pub fn frame_index(&self) -> u64 {
        self.frame_index
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tick_measures_elapsed_time() {
        let t0 = Instant::now();
        let mut clock = FrameClock::starting_at(t0);
        let ft = clock.tick(t0 + Duration::from_millis(16));
        assert_eq!(ft.delta, Duration::from_millis(16));
        assert_eq!(ft.frame_index, 0);

        let ft = clock.tick(t0 + Duration::from_millis(50));
        assert_eq!(ft.delta, Duration::from_millis(34));
        assert_eq!(ft.frame_index, 1);
        assert!((ft.delta_ms() - 34.0).abs() < 1e-9);
    }

    #[test]
    fn time_going_backwards_yields_zero_delta() {
        let t0 = Instant::now() + Duration::from_secs(1);
        let mut clock = FrameClock::starting_at(t0);
        let ft = clock.tick(t0 - Duration::from_millis(5));
        assert_eq!(ft.delta, Duration::ZERO);
    }

    #[test]
    fn reset_moves_baseline_only() {
        let t0 = Instant::now();
        let mut clock = FrameClock::starting_at(t0);
        clock.tick(t0 + Duration::from_millis(10));
        clock.reset(t0 + Duration::from_millis(100));
        let ft = clock.tick(t0 + Duration::from_millis(110));
        assert_eq!(ft.delta, Duration::from_millis(10));
        assert_eq!(ft.frame_index, 1);
    }
}
