//! Engine services that run beside the scene update.
//!
//! Submodules overview
//! - [`console`] – closed debug-command table and its stdin reader thread
//! - [`debug`] – FPS / clock / cursor overlay drawn in debug mode
//! - [`timer`] – one-shot and periodic callbacks on background threads
pub mod console;
pub mod debug;
pub mod timer;
