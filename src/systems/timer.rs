//! One-shot and periodic background callbacks.
//!
//! [`Timer`] runs a callback once after a delay; [`Interval`] runs one
//! repeatedly. Both own a named OS thread and have no cancellation: an
//! interval stops only when its callback returns
//! [`ControlFlow::Break`], fails, panics, runs out of repetitions, or the
//! process exits. Engine `quit` does not stop them.
//!
//! Callbacks are `Send + 'static`, so they cannot hold the frame-loop
//! [`Context`](crate::resources::context::Context). To affect the game they
//! go through a [`QuitHandle`](crate::events::request::QuitHandle) or a
//! [`RequestSender`](crate::events::request::RequestSender).
//!
//! Failures are logged under the `novaengine::timer` target and never reach
//! the frame loop.

use std::ops::ControlFlow;
use std::panic::{self, AssertUnwindSafe};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crate::error::{EngineError, panic_message};
use crate::resources::frameclock::secs_to_duration;

/// How many times an [`Interval`] fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Repeat {
    Times(u32),
    Forever,
}

/// Fire a callback once, `delay` later, on a background thread.
#[derive(Debug, Clone, Copy)]
pub struct Timer {
    delay: Duration,
}

impl Timer {
    pub fn new(delay_secs: f32) -> Self {
        Self {
            delay: secs_to_duration(delay_secs),
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    pub fn start<F>(self, callback: F) -> Result<JoinHandle<()>, EngineError>
    where
        F: FnOnce() -> anyhow::Result<()> + Send + 'static,
    {
        let delay = self.delay;
        thread::Builder::new()
            .name("novaengine-timer".into())
            .spawn(move || {
                thread::sleep(delay);
                match panic::catch_unwind(AssertUnwindSafe(callback)) {
                    Ok(Ok(())) => {}
                    Ok(Err(err)) => {
                        log::error!(target: "novaengine::timer", "timer callback failed: {err:#}");
                    }
                    Err(payload) => {
                        log::error!(
                            target: "novaengine::timer",
                            "timer callback panicked: {}",
                            panic_message(payload.as_ref())
                        );
                    }
                }
            })
            .map_err(|source| EngineError::Thread {
                name: "timer",
                source,
            })
    }
}

/// Fire a callback every `period`, starting immediately.
#[derive(Debug, Clone, Copy)]
pub struct Interval {
    repeat: Repeat,
    period: Duration,
}

impl Interval {
    pub fn new(repeat: Repeat, period_secs: f32) -> Self {
        Self {
            repeat,
            period: secs_to_duration(period_secs),
        }
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    pub fn repeat(&self) -> Repeat {
        self.repeat
    }

    pub fn start<F>(self, mut callback: F) -> Result<JoinHandle<()>, EngineError>
    where
        F: FnMut() -> anyhow::Result<ControlFlow<()>> + Send + 'static,
    {
        let Interval { repeat, period } = self;
        thread::Builder::new()
            .name("novaengine-interval".into())
            .spawn(move || {
                let mut fired: u32 = 0;
                loop {
                    if let Repeat::Times(n) = repeat {
                        if fired >= n {
                            break;
                        }
                    }
                    fired = fired.saturating_add(1);

                    match panic::catch_unwind(AssertUnwindSafe(&mut callback)) {
                        Ok(Ok(ControlFlow::Continue(()))) => {}
                        Ok(Ok(ControlFlow::Break(()))) => {
                            log::debug!(target: "novaengine::timer", "interval stopped after {fired} calls");
                            break;
                        }
                        Ok(Err(err)) => {
                            log::error!(target: "novaengine::timer", "interval callback failed, stopping: {err:#}");
                            break;
                        }
                        Err(payload) => {
                            log::error!(
                                target: "novaengine::timer",
                                "interval callback panicked, stopping: {}",
                                panic_message(payload.as_ref())
                            );
                            break;
                        }
                    }
                    thread::sleep(period);
                }
            })
            .map_err(|source| EngineError::Thread {
                name: "interval",
                source,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[test]
    fn timer_fires_once_after_delay() {
        let count = Arc::new(AtomicU32::new(0));
        let seen = Arc::clone(&count);
        let handle = Timer::new(0.01)
            .start(move || {
                seen.fetch_add(1, Ordering::SeqCst);
                Ok(())
            })
            .unwrap();
        handle.join().unwrap();
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn interval_runs_requested_times() {
        let count = Arc::new(AtomicU32::new(0));
        let seen = Arc::clone(&count);
        let handle = Interval::new(Repeat::Times(3), 0.001)
            .start(move || {
                seen.fetch_add(1, Ordering::SeqCst);
                Ok(ControlFlow::Continue(()))
            })
            .unwrap();
        handle.join().unwrap();
        assert_eq!(count.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn forever_interval_stops_on_break() {
        let count = Arc::new(AtomicU32::new(0));
        let seen = Arc::clone(&count);
        let handle = Interval::new(Repeat::Forever, 0.0)
            .start(move || {
                let n = seen.fetch_add(1, Ordering::SeqCst) + 1;
                Ok(if n == 5 { ControlFlow::Break(()) } else { ControlFlow::Continue(()) })
            })
            .unwrap();
        handle.join().unwrap();
        assert_eq!(count.load(Ordering::SeqCst), 5);
    }

    #[test]
    fn failing_interval_stops_without_propagating() {
        let count = Arc::new(AtomicU32::new(0));
        let seen = Arc::clone(&count);
        let handle = Interval::new(Repeat::Forever, 0.0)
            .start(move || {
                seen.fetch_add(1, Ordering::SeqCst);
                anyhow::bail!("sensor offline")
            })
            .unwrap();
        assert!(handle.join().is_ok());
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn huge_or_infinite_delays_saturate() {
        assert_eq!(Timer::new(1e30).delay(), Duration::MAX);
        assert_eq!(Interval::new(Repeat::Forever, f32::INFINITY).period(), Duration::MAX);
        assert_eq!(Timer::new(-1.0).delay(), Duration::ZERO);
    }

    #[test]
    fn panicking_timer_is_contained() {
        let handle = Timer::new(0.0).start(|| panic!("boom")).unwrap();
        assert!(handle.join().is_ok());
    }
}
