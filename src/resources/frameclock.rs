//! Frame pacing and in-game time.
//!
//! [`FrameScheduler`] owns the wall clock (through a [`TimeSource`]), paces
//! the loop to a target frame rate, measures the per-frame delta and keeps an
//! in-game clock that can be frozen. While frozen, wall time keeps running but
//! in-game time does not; on unfreeze the frozen span is folded into a bias so
//! in-game time resumes exactly where it stopped.
//!
//! In-game time is therefore always `wall - bias`, never decreases, and never
//! exceeds the wall time elapsed since the scheduler was created.

use std::cell::Cell;
use std::rc::Rc;
use std::time::{Duration, Instant};

/// Largest delta handed to gameplay code, in seconds.
pub const DEFAULT_MAX_DT: f32 = 0.25;

/// Convert float seconds to a [`Duration`], saturating instead of panicking.
///
/// Negative values and NaN give zero; infinity and values past the
/// representable range give [`Duration::MAX`].
pub fn secs_to_duration(secs: f32) -> Duration {
    if secs.is_nan() || secs <= 0.0 {
        return Duration::ZERO;
    }
    Duration::try_from_secs_f32(secs).unwrap_or(Duration::MAX)
}

/// Source of monotonic wall time.
pub trait TimeSource {
    /// Time elapsed since an arbitrary fixed origin.
    fn now(&self) -> Duration;

    /// Block the calling thread for `duration`.
    fn sleep(&self, duration: Duration);
}

/// Real clock backed by [`Instant`].
#[derive(Debug, Clone, Copy)]
pub struct SystemTimeSource {
    origin: Instant,
}

impl SystemTimeSource {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemTimeSource {
    fn default() -> Self {
        Self::new()
    }
}

impl TimeSource for SystemTimeSource {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }

    fn sleep(&self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

/// Hand-driven clock for tests and replays; `sleep` advances it instantly.
#[derive(Debug, Clone, Default)]
pub struct ManualTimeSource {
    now: Rc<Cell<Duration>>,
}

impl ManualTimeSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance(&self, by: Duration) {
        self.now.set(self.now.get().saturating_add(by));
    }

    pub fn advance_secs(&self, secs: f32) {
        self.advance(secs_to_duration(secs));
    }

    pub fn set(&self, to: Duration) {
        self.now.set(to);
    }
}

impl TimeSource for ManualTimeSource {
    fn now(&self) -> Duration {
        self.now.get()
    }

    fn sleep(&self, duration: Duration) {
        self.advance(duration);
    }
}

/// Frame clock with freeze-aware in-game time.
pub struct FrameScheduler {
    source: Box<dyn TimeSource>,
    origin: Duration,
    last_tick: Duration,
    dt: f32,
    max_dt: f32,
    frozen_at: Option<Duration>,
    bias: Duration,
    frame_time: Duration,
    frame_index: u64,
}

impl FrameScheduler {
    pub fn new(source: Box<dyn TimeSource>) -> Self {
        let start = source.now();
        Self {
            source,
            origin: start,
            last_tick: start,
            dt: 0.0,
            max_dt: DEFAULT_MAX_DT,
            frozen_at: None,
            bias: start,
            frame_time: Duration::ZERO,
            frame_index: 0,
        }
    }

    pub fn with_max_dt(mut self, max_dt: f32) -> Self {
        self.max_dt = max_dt.max(0.0);
        self
    }

    /// Wait until `1 / target_fps` seconds have passed since the previous
    /// tick and return the measured delta in seconds.
    ///
    /// `target_fps == 0` disables pacing.
    pub fn tick(&mut self, target_fps: u32) -> f32 {
        if target_fps > 0 {
            let frame = Duration::from_secs_f64(1.0 / f64::from(target_fps));
            let elapsed = self.source.now().saturating_sub(self.last_tick);
            if elapsed < frame {
                self.source.sleep(frame - elapsed);
            }
        }
        let now = self.source.now();
        let dt = now.saturating_sub(self.last_tick).as_secs_f32();
        self.last_tick = now;
        self.dt = dt.min(self.max_dt);
        self.dt
    }

    /// Snapshot the in-game time for the frame about to run.
    pub fn refresh(&mut self) {
        self.frame_time = self.now();
        self.frame_index = self.frame_index.wrapping_add(1);
    }

    /// Live in-game time: wall time minus everything spent frozen.
    pub fn now(&self) -> Duration {
        let wall = self.frozen_at.unwrap_or_else(|| self.source.now());
        wall.saturating_sub(self.bias)
    }

    /// Wall time elapsed since the scheduler was created.
    pub fn wall_elapsed(&self) -> Duration {
        self.source.now().saturating_sub(self.origin)
    }

    pub fn freeze(&mut self) {
        if self.frozen_at.is_none() {
            self.frozen_at = Some(self.source.now());
            log::debug!(target: "novaengine::time", "in-game time frozen at {:?}", self.now());
        }
    }

    pub fn unfreeze(&mut self) {
        if let Some(at) = self.frozen_at.take() {
            self.bias += self.source.now().saturating_sub(at);
            log::debug!(target: "novaengine::time", "in-game time resumed at {:?}", self.now());
        }
    }

    pub fn is_frozen(&self) -> bool {
        self.frozen_at.is_some()
    }

    /// Delta measured by the last [`tick`](Self::tick), in seconds.
    pub fn dt(&self) -> f32 {
        self.dt
    }

    /// In-game time captured by the last [`refresh`](Self::refresh).
    pub fn frame_time(&self) -> Duration {
        self.frame_time
    }

    pub fn frame_index(&self) -> u64 {
        self.frame_index
    }

    pub fn fps(&self) -> f32 {
        if self.dt > 0.0 { 1.0 / self.dt } else { 0.0 }
    }

    #[cfg(test)]
    pub(crate) fn set_dt(&mut self, dt: f32) {
        self.dt = dt;
    }
}
