use std::time::{Duration, Instant};

/// Timing of one clock tick.
#[derive(Debug, Copy, Clone)]
pub struct FrameTime {
    /// Clamped time since the previous tick, in seconds.
    pub dt: f32,

    /// Monotonic timestamp taken at the tick.
    pub now: Instant,

    /// Zero-based tick counter.
    pub frame_index: u64,
}

/// Per-window frame clock.
///
/// The runtime ticks it once per redraw. Delta time is clamped so a debugger
/// pause or a minimized window does not show up as one enormous frame.
#[derive(Debug, Clone)]
pub struct FrameClock {
    last: Instant,
    frame_index: u64,
    dt_min: Duration,
    dt_max: Duration,

    /// Sum of clamped deltas over every tick.
    total: Duration,
}

impl FrameClock {
    /// Clock clamped to `[100µs, 250ms]`.
    pub fn new() -> Self {
        Self::with_clamps(Duration::from_micros(100), Duration::from_millis(250))
    }

    pub fn with_clamps(dt_min: Duration, dt_max: Duration) -> Self {
        debug_assert!(dt_min <= dt_max);
        Self {
            last: Instant::now(),
            frame_index: 0,
            dt_min,
            dt_max,
            total: Duration::ZERO,
        }
    }

    /// Restarts delta measurement from now, e.g. after the window was hidden.
    pub fn reset(&mut self) {
        self.last = Instant::now();
    }

    pub fn tick(&mut self) -> FrameTime {
        let now = Instant::now();
        let dt = now
            .saturating_duration_since(self.last)
            .clamp(self.dt_min, self.dt_max);

        self.last = now;
        self.total += dt;

        let ft = FrameTime {
            dt: dt.as_secs_f32(),
            now,
            frame_index: self.frame_index,
        };
        self.frame_index = self.frame_index.wrapping_add(1);
        ft
    }

    /// Number of ticks so far.
    pub fn frames(&self) -> u64 {
        self.frame_index
    }

    /// Mean clamped frame time, or `None` before the first tick.
    pub fn average_frame_time(&self) -> Option<Duration> {
        let frames = u32::try_from(self.frame_index).ok()?;
        (frames > 0).then(|| self.total / frames)
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}
