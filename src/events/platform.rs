//! Platform events and the handlers they are dispatched to.
//!
//! The engine drains the platform's event queue once per frame, after the
//! active scene ran, and hands every event to every registered
//! [`EventHandler`] in registration order. A handler that fails or panics is
//! logged and skipped; the remaining handlers still see the event.

use glam::Vec2;

use crate::resources::input::{Key, MouseButton};

/// Structured event reported by the platform.
#[derive(Debug, Clone, PartialEq)]
pub enum PlatformEvent {
    /// The window was asked to close.
    Quit,
    /// A key went down; `ch` carries the typed character, if any.
    KeyDown { key: Key, ch: Option<char> },
    KeyUp { key: Key },
    MouseDown { button: MouseButton, pos: Vec2 },
    MouseUp { button: MouseButton, pos: Vec2 },
    MouseWheel { delta: f32 },
    Resized { width: u32, height: u32 },
}

/// Receiver of platform events.
///
/// Closures of the shape `FnMut(&PlatformEvent) -> anyhow::Result<()>`
/// implement this trait directly.
pub trait EventHandler {
    fn handle_event(&mut self, event: &PlatformEvent) -> anyhow::Result<()>;
}

impl<F> EventHandler for F
where
    F: FnMut(&PlatformEvent) -> anyhow::Result<()>,
{
    fn handle_event(&mut self, event: &PlatformEvent) -> anyhow::Result<()> {
        self(event)
    }
}
