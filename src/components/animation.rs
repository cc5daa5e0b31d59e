//! Named frame-sequence animations for sprites.
//!
//! A sprite keeps an [`AnimationSet`]: a table of named [`AnimationClip`]s
//! and the name of the clip currently playing. The first clip registered
//! becomes current. Playing a different clip switches to it immediately
//! (index and timer reset, first frame shown); playing the current clip
//! advances it by the frame delta.
//!
//! Advancement is one frame step per call: once the accumulated timer
//! reaches the per-frame duration it resets to zero and the index moves by
//! one. Past the last frame a looping clip wraps to 0, a one-shot clip stays
//! on its last frame.

use rustc_hash::FxHashMap;

use crate::error::EngineError;
use crate::platform::Image;

#[derive(Debug, Clone)]
pub struct AnimationClip {
    frames: Vec<Image>,
    index: usize,
    timer: f32,
    frame_duration: f32,
    looped: bool,
}

impl AnimationClip {
    /// Build a clip; an empty frame list is rejected.
    pub fn new(
        name: &str,
        frames: Vec<Image>,
        frame_duration: f32,
        looped: bool,
    ) -> Result<Self, EngineError> {
        if frames.is_empty() {
            return Err(EngineError::EmptyAnimation(name.to_owned()));
        }
        Ok(Self {
            frames,
            index: 0,
            timer: 0.0,
            frame_duration: frame_duration.max(0.0),
            looped,
        })
    }

    /// Accumulate `dt` and step at most one frame. Returns true when the
    /// displayed frame index changed.
    pub fn advance(&mut self, dt: f32) -> bool {
        self.timer += dt;
        if self.timer < self.frame_duration {
            return false;
        }
        self.timer = 0.0;
        let before = self.index;
        self.index += 1;
        if self.index >= self.frames.len() {
            self.index = if self.looped { 0 } else { self.frames.len() - 1 };
        }
        self.index != before
    }

    pub fn reset(&mut self) {
        self.index = 0;
        self.timer = 0.0;
    }

    pub fn frame(&self) -> Image {
        self.frames[self.index]
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn is_looped(&self) -> bool {
        self.looped
    }

    /// True for a one-shot clip sitting on its last frame.
    pub fn is_finished(&self) -> bool {
        !self.looped && self.index + 1 == self.frames.len()
    }
}

/// Clip table plus the current clip.
#[derive(Debug, Clone, Default)]
pub struct AnimationSet {
    clips: FxHashMap<String, AnimationClip>,
    current: Option<String>,
}

impl AnimationSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register (or replace) a clip. Returns the frame to show when this is
    /// the first clip and therefore became current.
    pub fn insert(&mut self, name: &str, clip: AnimationClip) -> Option<Image> {
        let first = clip.frame();
        self.clips.insert(name.to_owned(), clip);
        if self.current.is_none() {
            self.current = Some(name.to_owned());
            return Some(first);
        }
        None
    }

    /// Switch to `name` or advance the current clip by `dt`.
    ///
    /// Returns the frame to display when it changed. Unknown names are
    /// logged and ignored.
    pub fn play(&mut self, name: Option<&str>, dt: f32) -> Option<Image> {
        if let Some(name) = name.filter(|n| self.current.as_deref() != Some(*n)) {
            let Some(clip) = self.clips.get_mut(name) else {
                log::warn!(target: "novaengine::animation", "unknown animation {name:?}");
                return None;
            };
            clip.reset();
            self.current = Some(name.to_owned());
            return Some(clip.frame());
        }

        let clip = self.current_clip_mut()?;
        clip.advance(dt).then(|| clip.frame())
    }

    pub fn current_name(&self) -> Option<&str> {
        self.current.as_deref()
    }

    pub fn current_clip(&self) -> Option<&AnimationClip> {
        self.current.as_ref().and_then(|name| self.clips.get(name))
    }

    fn current_clip_mut(&mut self) -> Option<&mut AnimationClip> {
        let name = self.current.as_ref()?;
        self.clips.get_mut(name)
    }

    pub fn get(&self, name: &str) -> Option<&AnimationClip> {
        self.clips.get(name)
    }

    pub fn is_empty(&self) -> bool {
        self.clips.is_empty()
    }
}
