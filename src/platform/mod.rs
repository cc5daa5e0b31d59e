//! Contracts for the external drawing, input and asset collaborator.
//!
//! The engine core never talks to a windowing library directly. It draws
//! through [`Surface`], polls through [`InputSource`] and loads images through
//! [`ImageLoader`]; a concrete backend implements all three as a [`Platform`].
//!
//! - [`headless::HeadlessPlatform`] records draw calls and replays scripted
//!   input, used by tests and CI.
//! - `raylib::RaylibPlatform` (feature `raylib`) opens a real window.

use std::cell::RefCell;
use std::path::Path;

use glam::Vec2;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::components::rect::Rect;
use crate::error::EngineError;
use crate::events::platform::PlatformEvent;
use crate::resources::input::{KeySnapshot, MouseSnapshot};

pub mod headless;
#[cfg(feature = "raylib")]
pub mod raylib;

/// RGBA colour, 8 bits per channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const RED: Color = Color::rgb(255, 0, 0);
    pub const GREEN: Color = Color::rgb(0, 255, 0);
    pub const BLUE: Color = Color::rgb(0, 0, 255);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Random opaque colour, used to tell sprites apart in debug mode.
    pub fn random() -> Self {
        Self::rgb(fastrand::u8(..), fastrand::u8(..), fastrand::u8(..))
    }

    /// Parse `"r,g,b"` or `"r,g,b,a"`.
    pub fn parse(text: &str) -> Option<Self> {
        let parts: Vec<u8> = text
            .split(',')
            .map(|p| p.trim().parse::<u8>())
            .collect::<Result<_, _>>()
            .ok()?;
        match parts.as_slice() {
            [r, g, b] => Some(Self::rgb(*r, *g, *b)),
            [r, g, b, a] => Some(Self::rgba(*r, *g, *b, *a)),
            _ => None,
        }
    }
}

/// Backend-assigned identifier of a loaded image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ImageId(pub u32);

/// Handle to an image owned by the platform, with its native size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Image {
    pub id: ImageId,
    pub width: f32,
    pub height: f32,
}

impl Image {
    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }
}

/// One recorded drawing operation.
///
/// Both bundled backends buffer these during a frame; the raylib backend
/// replays them inside a single drawing scope on [`Surface::present`].
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCmd {
    Clear(Color),
    Image {
        image: ImageId,
        center: Vec2,
        size: Vec2,
        angle: f32,
    },
    Rect {
        rect: Rect,
        color: Color,
        filled: bool,
    },
    Line {
        from: Vec2,
        to: Vec2,
        color: Color,
    },
    Circle {
        center: Vec2,
        radius: f32,
        color: Color,
        filled: bool,
    },
    Text {
        text: String,
        pos: Vec2,
        size: f32,
        color: Color,
    },
}

/// Drawing half of the platform.
pub trait Surface {
    /// Size of the drawable area in pixels.
    fn size(&self) -> Vec2;

    fn clear(&mut self, color: Color);

    /// Draw `image` stretched to `size`, rotated by `angle` degrees
    /// (counter-clockwise on screen) about its centre, centred on `center`.
    fn draw_image(&mut self, image: &Image, center: Vec2, size: Vec2, angle: f32);

    fn draw_rect(&mut self, rect: Rect, color: Color, filled: bool);

    fn draw_line(&mut self, from: Vec2, to: Vec2, color: Color);

    fn draw_circle(&mut self, center: Vec2, radius: f32, color: Color, filled: bool);

    /// Use the font at `path` for text, or the backend default for `None`.
    fn set_font(&mut self, path: Option<&Path>) -> Result<(), EngineError>;

    /// Measured size of `text` rendered at `size` pixels in the current font.
    fn measure_text(&self, text: &str, size: f32) -> Vec2;

    /// Draw `text` with its top-left (or centre, when `centered`) at `pos`.
    /// Returns the rectangle the text occupies.
    fn draw_text(&mut self, text: &str, pos: Vec2, size: f32, color: Color, centered: bool) -> Rect;

    /// Show everything drawn since the last present.
    fn present(&mut self);
}

/// Input half of the platform. Polled once per frame by the engine.
pub trait InputSource {
    fn key_snapshot(&mut self) -> KeySnapshot;

    fn mouse_snapshot(&mut self) -> MouseSnapshot;

    /// Take every platform event queued since the previous call.
    fn drain_events(&mut self) -> Vec<PlatformEvent>;
}

/// Asset half of the platform.
pub trait ImageLoader {
    fn load_image(&mut self, path: &Path) -> Result<Image, EngineError>;
}

/// A complete backend.
pub trait Platform: Surface + InputSource + ImageLoader {
    /// Apply the window title.
    fn set_title(&mut self, title: &str);
}

/// Entries kept before a [`TextCache`] starts over.
pub const TEXT_CACHE_LIMIT: usize = 512;

/// Memoised text measurements keyed by string and pixel size.
///
/// Overlays redraw the same labels every frame; the cache keeps the backend
/// from re-measuring them. It is tied to one font and must be cleared when
/// the font changes.
#[derive(Debug, Default)]
pub struct TextCache {
    sizes: RefCell<FxHashMap<(String, u32), Vec2>>,
}

impl TextCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached size of `text` at `size`, computed with `measure` on a miss.
    pub fn measure(&self, text: &str, size: f32, measure: impl FnOnce() -> Vec2) -> Vec2 {
        let key = (text.to_owned(), size.to_bits());
        if let Some(found) = self.sizes.borrow().get(&key) {
            return *found;
        }
        let measured = measure();
        let mut sizes = self.sizes.borrow_mut();
        if sizes.len() >= TEXT_CACHE_LIMIT {
            sizes.clear();
        }
        sizes.insert(key, measured);
        measured
    }

    pub fn clear(&self) {
        self.sizes.borrow_mut().clear();
    }

    pub fn len(&self) -> usize {
        self.sizes.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.sizes.borrow().is_empty()
    }
}

/// Shared text placement used by the bundled backends.
pub(crate) fn text_rect(measured: Vec2, pos: Vec2, centered: bool) -> Rect {
    if centered {
        Rect::from_center(pos, measured)
    } else {
        Rect::new(pos.x, pos.y, measured.x, measured.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_color_triplet_and_quad() {
        assert_eq!(Color::parse("255, 255, 255"), Some(Color::WHITE));
        assert_eq!(Color::parse("1,2,3,4"), Some(Color::rgba(1, 2, 3, 4)));
    }

    #[test]
    fn parse_color_rejects_garbage() {
        assert_eq!(Color::parse("1,2"), None);
        assert_eq!(Color::parse("red"), None);
        assert_eq!(Color::parse("300,0,0"), None);
    }

    #[test]
    fn text_cache_measures_each_label_once() {
        let cache = TextCache::new();
        let mut calls = 0;
        for _ in 0..3 {
            let size = cache.measure("FPS: 60", 16.0, || {
                calls += 1;
                Vec2::new(56.0, 16.0)
            });
            assert_eq!(size, Vec2::new(56.0, 16.0));
        }
        cache.measure("FPS: 60", 20.0, || Vec2::new(70.0, 20.0));
        assert_eq!(calls, 1);
        assert_eq!(cache.len(), 2);
        cache.clear();
        assert!(cache.is_empty());
    }

    #[test]
    fn text_cache_is_bounded() {
        let cache = TextCache::new();
        for i in 0..=TEXT_CACHE_LIMIT {
            cache.measure(&i.to_string(), 10.0, || Vec2::ONE);
        }
        assert!(cache.len() <= TEXT_CACHE_LIMIT);
    }

    #[test]
    fn centered_text_rect() {
        let r = text_rect(Vec2::new(10.0, 4.0), Vec2::new(50.0, 50.0), true);
        assert_eq!(r, Rect::new(45.0, 48.0, 10.0, 4.0));
    }
}
