//! Countdown gate keyed off the in-game clock.
//!
//! A [`Cooldown`] is ready until [`start`](Cooldown::start) is called, then
//! becomes ready again once `duration` of in-game time has passed.
//! [`check`](Cooldown::check) only reads; nothing but `start` changes state.
//! Because it reads in-game time, freezing the engine clock also pauses every
//! running cooldown.
//!
//! ```ignore
//! let mut fire = Cooldown::new(&ctx, 0.25);
//! if ctx.input().held(Key::SPACE) && fire.check() {
//!     fire.start();
//!     spawn_bullet();
//! }
//! ```

use std::time::Duration;

use crate::resources::context::Context;
use crate::resources::frameclock::secs_to_duration;

pub struct Cooldown {
    ctx: Context,
    duration: Duration,
    started_at: Option<Duration>,
}

impl Cooldown {
    /// New cooldown of `seconds`, initially ready.
    pub fn new(ctx: &Context, seconds: f32) -> Self {
        Self {
            ctx: ctx.clone(),
            duration: secs_to_duration(seconds),
            started_at: None,
        }
    }

    /// Record the current in-game time as the origin; not ready until
    /// `duration` has elapsed.
    pub fn start(&mut self) -> &mut Self {
        self.started_at = Some(self.ctx.now());
        self
    }

    /// True once at least `duration` has elapsed since the last `start`.
    pub fn check(&self) -> bool {
        match self.started_at {
            None => true,
            Some(origin) => self.ctx.now().saturating_sub(origin) >= self.duration,
        }
    }

    /// In-game time left before the cooldown is ready again.
    pub fn remaining(&self) -> Duration {
        match self.started_at {
            None => Duration::ZERO,
            Some(origin) => {
                let elapsed = self.ctx.now().saturating_sub(origin);
                self.duration.saturating_sub(elapsed)
            }
        }
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }

    pub fn duration_ms(&self) -> u128 {
        self.duration.as_millis()
    }
}

impl std::fmt::Debug for Cooldown {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Cooldown")
            .field("duration", &self.duration)
            .field("started_at", &self.started_at)
            .field("ready", &self.check())
            .finish()
    }
}
