//! Engine error types.
//!
//! Only faults that abort an operation live here: failing to load an asset,
//! building an invalid animation clip, misusing the engine state machine or
//! reading a broken configuration file. Per-frame faults raised by user code
//! (sprite callbacks, event handlers, console commands, timers) are plain
//! [`anyhow::Error`]s that get logged at the isolation boundary instead.

use std::path::PathBuf;

use thiserror::Error;

/// Fatal errors surfaced by engine, scene and sprite construction.
#[derive(Debug, Error)]
pub enum EngineError {
    /// An image could not be loaded by the platform.
    #[error("failed to load image {path:?}: {reason}")]
    ImageLoad { path: PathBuf, reason: String },

    /// A font could not be loaded by the platform.
    #[error("failed to load font {path:?}: {reason}")]
    FontLoad { path: PathBuf, reason: String },

    /// An animation clip was registered without frames.
    #[error("animation {0:?} has no frames")]
    EmptyAnimation(String),

    /// `run` was called on an engine that already left the running state.
    #[error("engine already stopped; construct a new engine to run again")]
    AlreadyStopped,

    /// `run` was called re-entrantly while the loop is active.
    #[error("engine is already running")]
    AlreadyRunning,

    /// A scene index does not exist.
    #[error("no scene registered at index {0}")]
    UnknownScene(usize),

    /// The INI configuration could not be read or written.
    #[error("config error: {0}")]
    Config(String),

    /// An attribute key was registered twice or could not be applied.
    #[error("attribute {key:?}: {reason}")]
    Attribute { key: String, reason: String },

    /// The debug console thread could not be spawned.
    #[error("failed to spawn {name} thread: {source}")]
    Thread {
        name: &'static str,
        #[source]
        source: std::io::Error,
    },
}

impl EngineError {
    pub(crate) fn attribute(key: impl Into<String>, reason: impl Into<String>) -> Self {
        EngineError::Attribute {
            key: key.into(),
            reason: reason.into(),
        }
    }
}

/// Convenience alias used across the crate.
pub type Result<T, E = EngineError> = std::result::Result<T, E>;

/// Best-effort text of a caught panic payload.
pub(crate) fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&'static str>() {
        (*msg).to_owned()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "non-string panic payload".to_owned()
    }
}
