//! raylib window backend.
//!
//! Draw calls are buffered as [`DrawCmd`]s while the frame is built and
//! replayed inside a single `begin_drawing` scope on `present`, because the
//! engine draws through `&mut dyn Surface` from many places while raylib
//! wants one scoped draw handle per frame.

use std::path::Path;

use glam::Vec2;
use raylib::core::input::key_from_i32;
use raylib::core::text::measure_text_ex;
use raylib::prelude::*;

use crate::components::rect::Rect;
use crate::error::EngineError;
use crate::events::platform::PlatformEvent;
use crate::platform::{
    self, DrawCmd, Image, ImageId, ImageLoader, InputSource, Platform, Surface, TextCache, text_rect,
};
use crate::resources::input::{Key, KeySnapshot, MouseButton as EngineMouseButton, MouseSnapshot};

const FONT_SPACING: f32 = 1.0;

const MOUSE_BUTTONS: [(MouseButton, EngineMouseButton); 3] = [
    (MouseButton::MOUSE_BUTTON_LEFT, EngineMouseButton::Left),
    (MouseButton::MOUSE_BUTTON_RIGHT, EngineMouseButton::Right),
    (MouseButton::MOUSE_BUTTON_MIDDLE, EngineMouseButton::Middle),
];

pub struct RaylibPlatform {
    rl: RaylibHandle,
    thread: RaylibThread,
    textures: Vec<Texture2D>,
    font: Option<Font>,
    text_cache: TextCache,
    pending: Vec<DrawCmd>,
    last_keys: KeySnapshot,
}

impl RaylibPlatform {
    /// Open a `width` x `height` window.
    pub fn open(width: u32, height: u32, title: &str) -> Self {
        let (mut rl, thread) = raylib::init()
            .size(width as i32, height as i32)
            .title(title)
            .build();
        // Escape is left to game code.
        rl.set_exit_key(None);
        Self {
            rl,
            thread,
            textures: Vec::new(),
            font: None,
            text_cache: TextCache::new(),
            pending: Vec::new(),
            last_keys: KeySnapshot::default(),
        }
    }
}

fn rl_color(c: platform::Color) -> Color {
    Color::new(c.r, c.g, c.b, c.a)
}

fn rl_rect(r: Rect) -> Rectangle {
    Rectangle::new(r.x, r.y, r.w, r.h)
}

fn rl_vec(v: Vec2) -> Vector2 {
    Vector2::new(v.x, v.y)
}

impl Surface for RaylibPlatform {
    fn size(&self) -> Vec2 {
        Vec2::new(self.rl.get_screen_width() as f32, self.rl.get_screen_height() as f32)
    }

    fn clear(&mut self, color: platform::Color) {
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

    fn draw_rect(&mut self, rect: Rect, color: platform::Color, filled: bool) {
        self.pending.push(DrawCmd::Rect { rect, color, filled });
    }

    fn draw_line(&mut self, from: Vec2, to: Vec2, color: platform::Color) {
        self.pending.push(DrawCmd::Line { from, to, color });
    }

    fn draw_circle(&mut self, center: Vec2, radius: f32, color: platform::Color, filled: bool) {
        self.pending.push(DrawCmd::Circle {
            center,
            radius,
            color,
            filled,
        });
    }

    fn set_font(&mut self, path: Option<&Path>) -> Result<(), EngineError> {
        self.font = match path {
            None => None,
            Some(path) => {
                let font = self
                    .rl
                    .load_font(&self.thread, &path.to_string_lossy())
                    .map_err(|e| EngineError::FontLoad {
                        path: path.to_path_buf(),
                        reason: e.to_string(),
                    })?;
                log::debug!("Loaded font {}", path.display());
                Some(font)
            }
        };
        self.text_cache.clear();
        Ok(())
    }

    fn measure_text(&self, text: &str, size: f32) -> Vec2 {
        self.text_cache.measure(text, size, || match &self.font {
            Some(font) => {
                let measured = measure_text_ex(font, text, size, FONT_SPACING);
                Vec2::new(measured.x, measured.y)
            }
            None => Vec2::new(self.rl.measure_text(text, size as i32) as f32, size),
        })
    }

    fn draw_text(&mut self, text: &str, pos: Vec2, size: f32, color: platform::Color, centered: bool) -> Rect {
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
        let commands = std::mem::take(&mut self.pending);
        let mut d = self.rl.begin_drawing(&self.thread);
        for cmd in commands {
            match cmd {
                DrawCmd::Clear(color) => d.clear_background(rl_color(color)),
                DrawCmd::Image {
                    image,
                    center,
                    size,
                    angle,
                } => {
                    let Some(tex) = self.textures.get(image.0 as usize) else {
                        continue;
                    };
                    let src = Rectangle::new(0.0, 0.0, tex.width as f32, tex.height as f32);
                    let dest = Rectangle::new(center.x, center.y, size.x, size.y);
                    // raylib rotates clockwise on screen.
                    d.draw_texture_pro(tex, src, dest, rl_vec(size * 0.5), -angle, Color::WHITE);
                }
                DrawCmd::Rect { rect, color, filled } => {
                    if filled {
                        d.draw_rectangle_rec(rl_rect(rect), rl_color(color));
                    } else {
                        d.draw_rectangle_lines_ex(rl_rect(rect), 1.0, rl_color(color));
                    }
                }
                DrawCmd::Line { from, to, color } => d.draw_line_v(rl_vec(from), rl_vec(to), rl_color(color)),
                DrawCmd::Circle {
                    center,
                    radius,
                    color,
                    filled,
                } => {
                    if filled {
                        d.draw_circle_v(rl_vec(center), radius, rl_color(color));
                    } else {
                        d.draw_circle_lines(center.x as i32, center.y as i32, radius, rl_color(color));
                    }
                }
                DrawCmd::Text { text, pos, size, color } => match &self.font {
                    Some(font) => d.draw_text_ex(font, &text, rl_vec(pos), size, FONT_SPACING, rl_color(color)),
                    None => d.draw_text(&text, pos.x as i32, pos.y as i32, size as i32, rl_color(color)),
                },
            }
        }
    }
}

impl InputSource for RaylibPlatform {
    fn key_snapshot(&mut self) -> KeySnapshot {
        let down = (0..=Key::MAX_CODE as i32)
            .filter_map(key_from_i32)
            .filter(|key| self.rl.is_key_down(*key))
            .map(|key| Key(key as u32));
        let snapshot = KeySnapshot::from_keys(down);
        self.last_keys = snapshot.clone();
        snapshot
    }

    fn mouse_snapshot(&mut self) -> MouseSnapshot {
        let pos = self.rl.get_mouse_position();
        MOUSE_BUTTONS
            .iter()
            .fold(MouseSnapshot::new(Vec2::new(pos.x, pos.y)), |snap, (rl_button, button)| {
                snap.with_button(*button, self.rl.is_mouse_button_down(*rl_button))
            })
    }

    fn drain_events(&mut self) -> Vec<PlatformEvent> {
        let mut events = Vec::new();
        if self.rl.window_should_close() {
            events.push(PlatformEvent::Quit);
        }

        while let Some(key) = self.rl.get_key_pressed() {
            events.push(PlatformEvent::KeyDown {
                key: Key(key as u32),
                ch: None,
            });
        }
        // Attach typed characters to the key-down that produced them.
        while let Some(ch) = self.rl.get_char_pressed() {
            let slot = events.iter_mut().find_map(|event| match event {
                PlatformEvent::KeyDown { key, ch: slot @ None } if Key::from_char(ch) == Some(*key) => Some(slot),
                _ => None,
            });
            if let Some(slot) = slot {
                *slot = Some(ch);
            }
        }
        for key in self.last_keys.iter() {
            let released = key_from_i32(key.0 as i32).is_some_and(|k| self.rl.is_key_released(k));
            if released {
                events.push(PlatformEvent::KeyUp { key: *key });
            }
        }

        let pos = self.rl.get_mouse_position();
        let pos = Vec2::new(pos.x, pos.y);
        for (rl_button, button) in MOUSE_BUTTONS {
            if self.rl.is_mouse_button_pressed(rl_button) {
                events.push(PlatformEvent::MouseDown { button, pos });
            }
            if self.rl.is_mouse_button_released(rl_button) {
                events.push(PlatformEvent::MouseUp { button, pos });
            }
        }

        let wheel = self.rl.get_mouse_wheel_move();
        if wheel != 0.0 {
            events.push(PlatformEvent::MouseWheel { delta: wheel });
        }
        if self.rl.is_window_resized() {
            events.push(PlatformEvent::Resized {
                width: self.rl.get_screen_width().max(0) as u32,
                height: self.rl.get_screen_height().max(0) as u32,
            });
        }
        events
    }
}

impl ImageLoader for RaylibPlatform {
    fn load_image(&mut self, path: &Path) -> Result<Image, EngineError> {
        let path_str = path.to_string_lossy();
        let texture = self
            .rl
            .load_texture(&self.thread, &path_str)
            .map_err(|e| EngineError::ImageLoad {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })?;
        let image = Image {
            id: ImageId(self.textures.len() as u32),
            width: texture.width as f32,
            height: texture.height as f32,
        };
        log::debug!("Loaded texture {path_str} as {:?}", image.id);
        self.textures.push(texture);
        Ok(image)
    }
}

impl Platform for RaylibPlatform {
    fn set_title(&mut self, title: &str) {
        self.rl.set_window_title(&self.thread, title);
    }
}
