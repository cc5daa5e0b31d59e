//! Requests sent to the frame loop from outside of it.
//!
//! Background units (the debug console, [`Timer`](crate::systems::timer::Timer)
//! and [`Interval`](crate::systems::timer::Interval) callbacks) never touch the
//! engine context directly. They either raise the shared quit flag through a
//! [`QuitHandle`] or post an [`EngineRequest`] on a crossbeam channel that the
//! engine drains once per frame at the event step.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crossbeam_channel::{Receiver, Sender, unbounded};

/// Work the frame loop performs on behalf of another thread.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineRequest {
    Quit,
    SetDebug(bool),
    SwitchScene(usize),
    Freeze,
    Unfreeze,
    /// Log frame rate, frame count, in-game time and the active scene.
    LogStats,
}

/// Cloneable, thread-safe flag that asks the engine to stop.
#[derive(Debug, Clone, Default)]
pub struct QuitHandle {
    flag: Arc<AtomicBool>,
}

impl QuitHandle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn request(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    pub fn is_requested(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }
}

/// Sending half of the request channel.
#[derive(Debug, Clone)]
pub struct RequestSender {
    tx: Sender<EngineRequest>,
}

impl RequestSender {
    /// Post a request. Returns `false` once the engine has been dropped.
    pub fn send(&self, request: EngineRequest) -> bool {
        self.tx.send(request).is_ok()
    }
}

/// Create the request channel.
pub fn request_channel() -> (RequestSender, Receiver<EngineRequest>) {
    let (tx, rx) = unbounded();
    (RequestSender { tx }, rx)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quit_handle_is_shared_between_clones() {
        let a = QuitHandle::new();
        let b = a.clone();
        assert!(!a.is_requested());
        b.request();
        assert!(a.is_requested());
    }

    #[test]
    fn requests_cross_threads_in_order() {
        let (tx, rx) = request_channel();
        let handle = std::thread::spawn(move || {
            tx.send(EngineRequest::Freeze);
            tx.send(EngineRequest::SwitchScene(2));
        });
        handle.join().unwrap();
        let got: Vec<_> = rx.try_iter().collect();
        assert_eq!(got, vec![EngineRequest::Freeze, EngineRequest::SwitchScene(2)]);
    }

    #[test]
    fn send_fails_after_receiver_dropped() {
        let (tx, rx) = request_channel();
        drop(rx);
        assert!(!tx.send(EngineRequest::Quit));
    }
}
