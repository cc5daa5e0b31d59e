//! Per-frame keyboard and mouse state.
//!
//! The engine captures one [`KeySnapshot`] and one [`MouseSnapshot`] from the
//! platform at the start of every frame and hands them to [`InputTracker`],
//! which keeps the previous pair around. Every query is answered from that
//! pair alone, so "just pressed" stays stable for the whole frame no matter
//! how many times, or from how many entities, it is asked.

use glam::Vec2;
use rustc_hash::FxHashSet;

/// Keyboard key, identified by the platform key code.
///
/// Codes follow the raylib/GLFW key table so the raylib backend can pass
/// them through untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Key(pub u32);

impl Key {
    pub const SPACE: Key = Key(32);
    pub const A: Key = Key(65);
    pub const D: Key = Key(68);
    pub const P: Key = Key(80);
    pub const S: Key = Key(83);
    pub const W: Key = Key(87);
    pub const ESCAPE: Key = Key(256);
    pub const ENTER: Key = Key(257);
    pub const TAB: Key = Key(258);
    pub const BACKSPACE: Key = Key(259);
    pub const RIGHT: Key = Key(262);
    pub const LEFT: Key = Key(263);
    pub const DOWN: Key = Key(264);
    pub const UP: Key = Key(265);
    pub const F1: Key = Key(290);
    pub const F10: Key = Key(299);
    pub const F11: Key = Key(300);
    pub const F12: Key = Key(301);
    pub const LEFT_SHIFT: Key = Key(340);
    pub const LEFT_CONTROL: Key = Key(341);

    /// Highest key code the backends poll.
    pub const MAX_CODE: u32 = 348;

    /// Key for an ASCII letter or digit, case-insensitive.
    pub fn from_char(c: char) -> Option<Key> {
        match c {
            'a'..='z' => Some(Key(c.to_ascii_uppercase() as u32)),
            'A'..='Z' | '0'..='9' => Some(Key(c as u32)),
            ' ' => Some(Key::SPACE),
            _ => None,
        }
    }
}

/// Mouse buttons, in the order platforms usually report them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    Left = 0,
    Right = 1,
    Middle = 2,
    Side = 3,
    Extra = 4,
}

impl MouseButton {
    pub const ALL: [MouseButton; 5] = [
        MouseButton::Left,
        MouseButton::Right,
        MouseButton::Middle,
        MouseButton::Side,
        MouseButton::Extra,
    ];

    /// Button at `index` in [`MouseButton::ALL`] order.
    pub fn from_index(index: usize) -> Option<MouseButton> {
        Self::ALL.get(index).copied()
    }

    /// Position of this button in the snapshot arrays.
    pub fn index(self) -> usize {
        self as usize
    }
}

/// Set of keys held down at capture time.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct KeySnapshot {
    down: FxHashSet<Key>,
}

impl KeySnapshot {
    /// Snapshot with exactly `keys` held.
    pub fn from_keys(keys: impl IntoIterator<Item = Key>) -> Self {
        Self {
            down: keys.into_iter().collect(),
        }
    }

    /// Whether `key` was down when the snapshot was taken.
    pub fn is_down(&self, key: Key) -> bool {
        self.down.contains(&key)
    }

    /// Mark `key` as down or up.
    pub fn set(&mut self, key: Key, down: bool) {
        if down {
            self.down.insert(key);
        } else {
            self.down.remove(&key);
        }
    }

    /// Keys held in this snapshot.
    pub fn iter(&self) -> impl Iterator<Item = &Key> {
        self.down.iter()
    }
}

/// Mouse buttons and cursor position at capture time.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MouseSnapshot {
    pub buttons: [bool; 5],
    pub position: Vec2,
}

impl MouseSnapshot {
    /// Snapshot with the cursor at `position` and no buttons down.
    pub fn new(position: Vec2) -> Self {
        Self {
            buttons: [false; 5],
            position,
        }
    }

    /// Builder form of setting one button.
    pub fn with_button(mut self, button: MouseButton, down: bool) -> Self {
        self.buttons[button.index()] = down;
        self
    }

    /// Whether `button` was down when the snapshot was taken.
    pub fn is_down(&self, button: MouseButton) -> bool {
        self.buttons[button.index()]
    }
}

/// Previous/current snapshot pair with held and edge queries.
#[derive(Debug, Clone, Default)]
pub struct InputTracker {
    previous_keys: KeySnapshot,
    current_keys: KeySnapshot,
    previous_mouse: MouseSnapshot,
    current_mouse: MouseSnapshot,
}

impl InputTracker {
    /// Tracker with both snapshots empty.
    pub fn new() -> Self {
        Self::default()
    }

    /// Shift the current snapshots into "previous" and store the new ones.
    ///
    /// Called exactly once per frame, before any gameplay code runs.
    pub fn capture(&mut self, keys: KeySnapshot, mouse: MouseSnapshot) {
        self.previous_keys = std::mem::replace(&mut self.current_keys, keys);
        self.previous_mouse = std::mem::replace(&mut self.current_mouse, mouse);
    }

    /// True while `key` is down.
    pub fn held(&self, key: Key) -> bool {
        self.current_keys.is_down(key)
    }

    /// True only on the frame `key` went from up to down.
    pub fn pressed(&self, key: Key) -> bool {
        self.current_keys.is_down(key) && !self.previous_keys.is_down(key)
    }

    /// True only on the frame `key` went from down to up.
    pub fn released(&self, key: Key) -> bool {
        !self.current_keys.is_down(key) && self.previous_keys.is_down(key)
    }

    /// True while any of `keys` is down.
    pub fn any_held(&self, keys: &[Key]) -> bool {
        keys.iter().any(|k| self.held(*k))
    }

    /// True if any of `keys` went down this frame.
    pub fn any_pressed(&self, keys: &[Key]) -> bool {
        keys.iter().any(|k| self.pressed(*k))
    }

    /// True while `button` is down.
    pub fn mouse_held(&self, button: MouseButton) -> bool {
        self.current_mouse.is_down(button)
    }

    /// True only on the frame `button` went from up to down.
    pub fn mouse_pressed(&self, button: MouseButton) -> bool {
        self.current_mouse.is_down(button) && !self.previous_mouse.is_down(button)
    }

    /// True only on the frame `button` went from down to up.
    pub fn mouse_released(&self, button: MouseButton) -> bool {
        !self.current_mouse.is_down(button) && self.previous_mouse.is_down(button)
    }

    /// Cursor position from the current snapshot.
    pub fn cursor(&self) -> Vec2 {
        self.current_mouse.position
    }

    /// Current key snapshot.
    pub fn keys(&self) -> &KeySnapshot {
        &self.current_keys
    }
}
