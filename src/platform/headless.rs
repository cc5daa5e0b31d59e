//! Window-less platform that records what the engine does.
//!
//! [`HeadlessPlatform`] keeps every draw call of the frame being built, moves
//! it into the frame history on `present`, serves images registered up front
//! with [`add_image`](HeadlessPlatform::add_image), and replays an input
//! timeline keyed by frame number. Frame numbers count presents: frame 0 is
//! everything before the first present.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use glam::Vec2;
use rustc_hash::FxHashMap;

use crate::components::rect::Rect;
use crate::error::EngineError;
use crate::events::platform::PlatformEvent;
use crate::platform::{
    Color, DrawCmd, Image, ImageId, ImageLoader, InputSource, Platform, Surface, TextCache, text_rect,
};
use crate::resources::input::{KeySnapshot, MouseSnapshot};

#[derive(Debug, Default)]
pub struct HeadlessPlatform {
    size: Vec2,
    title: String,
    font: Option<PathBuf>,
    text_cache: TextCache,
    images: FxHashMap<PathBuf, Image>,
    next_image: u32,
    pending: Vec<DrawCmd>,
    frames: Vec<Vec<DrawCmd>>,
    inputs: BTreeMap<u64, (KeySnapshot, MouseSnapshot)>,
    events: BTreeMap<u64, Vec<PlatformEvent>>,
    quit_after: Option<u64>,
    quit_sent: bool,
}

impl HeadlessPlatform {
    pub fn new(size: Vec2) -> Self {
        Self {
            size,
            ..Self::default()
        }
    }

    /// Emit [`PlatformEvent::Quit`] once `frames` frames were presented.
    pub fn quit_after(mut self, frames: u64) -> Self {
        self.quit_after = Some(frames);
        self
    }

    /// Register a fake image served for `path`.
    pub fn add_image(&mut self, path: impl Into<PathBuf>, width: f32, height: f32) -> Image {
        let image = Image {
            id: ImageId(self.next_image),
            width,
            height,
        };
        self.next_image += 1;
        self.images.insert(path.into(), image);
        image
    }

    /// Input state reported from `frame` on, until a later entry replaces it.
    pub fn set_input_at(&mut self, frame: u64, keys: KeySnapshot, mouse: MouseSnapshot) -> &mut Self {
        self.inputs.insert(frame, (keys, mouse));
        self
    }

    /// Queue `event` for the first drain during or after `frame`.
    pub fn push_event_at(&mut self, frame: u64, event: PlatformEvent) -> &mut Self {
        self.events.entry(frame).or_default().push(event);
        self
    }

    /// Number of presented frames.
    pub fn frame_index(&self) -> u64 {
        self.frames.len() as u64
    }

    /// Draw calls since the last present.
    pub fn pending(&self) -> &[DrawCmd] {
        &self.pending
    }

    /// Draw calls of every presented frame.
    pub fn frames(&self) -> &[Vec<DrawCmd>] {
        &self.frames
    }

    pub fn last_frame(&self) -> Option<&[DrawCmd]> {
        self.frames.last().map(Vec::as_slice)
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    /// Font selected with [`Surface::set_font`], if any.
    pub fn font(&self) -> Option<&Path> {
        self.font.as_deref()
    }

    pub fn text_cache(&self) -> &TextCache {
        &self.text_cache
    }

    fn input_now(&self) -> Option<&(KeySnapshot, MouseSnapshot)> {
        self.inputs.range(..=self.frame_index()).next_back().map(|(_, input)| input)
    }
}

impl Surface for HeadlessPlatform {
    fn size(&self) -> Vec2 {
        self.size
    }

    fn clear(&mut self, color: Color) {
        self.pending.push(DrawCmd::Clear(color));
    }

    fn draw_image(&mut self, image: &Image, center: Vec2, size: Vec2, angle: f32) {
        self.pending.push(DrawCmd::Image {
            image: image.id,
            center,
            size,
            angle,
        });
    }

    fn draw_rect(&mut self, rect: Rect, color: Color, filled: bool) {
        self.pending.push(DrawCmd::Rect { rect, color, filled });
    }

    fn draw_line(&mut self, from: Vec2, to: Vec2, color: Color) {
        self.pending.push(DrawCmd::Line { from, to, color });
    }

    fn draw_circle(&mut self, center: Vec2, radius: f32, color: Color, filled: bool) {
        self.pending.push(DrawCmd::Circle {
            center,
            radius,
            color,
            filled,
        });
    }

    /// Any path is accepted; nothing is read from disk.
    fn set_font(&mut self, path: Option<&Path>) -> Result<(), EngineError> {
        self.font = path.map(Path::to_path_buf);
        self.text_cache.clear();
        Ok(())
    }

    /// Monospace estimate: half the size per glyph.
    fn measure_text(&self, text: &str, size: f32) -> Vec2 {
        self.text_cache
            .measure(text, size, || Vec2::new(text.chars().count() as f32 * size * 0.5, size))
    }

    fn draw_text(&mut self, text: &str, pos: Vec2, size: f32, color: Color, centered: bool) -> Rect {
        let rect = text_rect(self.measure_text(text, size), pos, centered);
        self.pending.push(DrawCmd::Text {
            text: text.to_owned(),
            pos: rect.top_left(),
            size,
            color,
        });
        rect
    }

    fn present(&mut self) {
        let frame = std::mem::take(&mut self.pending);
        self.frames.push(frame);
    }
}

impl InputSource for HeadlessPlatform {
    fn key_snapshot(&mut self) -> KeySnapshot {
        self.input_now().map(|(keys, _)| keys.clone()).unwrap_or_default()
    }

    fn mouse_snapshot(&mut self) -> MouseSnapshot {
        self.input_now().map(|(_, mouse)| *mouse).unwrap_or_default()
    }

    fn drain_events(&mut self) -> Vec<PlatformEvent> {
        let now = self.frame_index();
        let later = self.events.split_off(&(now + 1));
        let due = std::mem::replace(&mut self.events, later);
        let mut events: Vec<PlatformEvent> = due.into_values().flatten().collect();

        if !self.quit_sent && self.quit_after.is_some_and(|n| now + 1 >= n) {
            self.quit_sent = true;
            events.push(PlatformEvent::Quit);
        }
        events
    }
}

impl ImageLoader for HeadlessPlatform {
    fn load_image(&mut self, path: &Path) -> Result<Image, EngineError> {
        self.images.get(path).copied().ok_or_else(|| EngineError::ImageLoad {
            path: path.to_path_buf(),
            reason: "no such image registered".to_owned(),
        })
    }
}

impl Platform for HeadlessPlatform {
    fn set_title(&mut self, title: &str) {
        self.title = title.to_owned();
    }
}
