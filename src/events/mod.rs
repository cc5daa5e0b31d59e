//! Events flowing into the frame loop.
//!
//! Submodules:
//! - [`platform`] – window/input events drained from the platform and the
//!   handler trait they are dispatched through
//! - [`request`] – requests posted by background threads (console, timers)
//!   and the shared quit flag
pub mod platform;
pub mod request;
