//! Engine context shared with every sprite, group, scene and cooldown.
//!
//! Instead of a process-wide engine singleton, each object receives a
//! [`Context`] when it is built and keeps a clone of it. The context is a
//! cheap `Rc` handle to the state the frame loop owns: the frame clock, the
//! input snapshot pair, the scene list and active scene, the layer counter,
//! the debug flag and the quit flag.
//!
//! The context is deliberately `!Send`: only the frame-loop thread can reach
//! it. Background units talk to the loop through
//! [`QuitHandle`](crate::events::request::QuitHandle) and
//! [`RequestSender`](crate::events::request::RequestSender).

use std::cell::{Cell, Ref, RefCell, RefMut};
use std::rc::Rc;
use std::time::Duration;

use glam::Vec2;

use crate::events::request::QuitHandle;
use crate::resources::frameclock::{FrameScheduler, SystemTimeSource, TimeSource};
use crate::resources::input::InputTracker;
use crate::scene::Scene;

struct ContextInner {
    clock: RefCell<FrameScheduler>,
    input: RefCell<InputTracker>,
    scenes: RefCell<Vec<Rc<Scene>>>,
    active: RefCell<Option<Rc<Scene>>>,
    next_layer: Cell<i32>,
    debug: Cell<bool>,
    quit: QuitHandle,
}

/// Handle to the engine state shared by everything the engine drives.
#[derive(Clone)]
pub struct Context {
    inner: Rc<ContextInner>,
}

impl Context {
    /// Context driven by the real clock.
    pub fn new() -> Self {
        Self::with_time_source(Box::new(SystemTimeSource::new()))
    }

    pub fn with_time_source(source: Box<dyn TimeSource>) -> Self {
        Self {
            inner: Rc::new(ContextInner {
                clock: RefCell::new(FrameScheduler::new(source)),
                input: RefCell::new(InputTracker::new()),
                scenes: RefCell::new(Vec::new()),
                active: RefCell::new(None),
                next_layer: Cell::new(0),
                debug: Cell::new(false),
                quit: QuitHandle::new(),
            }),
        }
    }

    // ---- time ----

    pub fn clock(&self) -> Ref<'_, FrameScheduler> {
        self.inner.clock.borrow()
    }

    pub fn clock_mut(&self) -> RefMut<'_, FrameScheduler> {
        self.inner.clock.borrow_mut()
    }

    /// Seconds elapsed during the previous frame.
    pub fn dt(&self) -> f32 {
        self.clock().dt()
    }

    /// Live in-game time.
    pub fn now(&self) -> Duration {
        self.clock().now()
    }

    pub fn freeze(&self) {
        self.clock_mut().freeze();
    }

    pub fn unfreeze(&self) {
        self.clock_mut().unfreeze();
    }

    pub fn is_frozen(&self) -> bool {
        self.clock().is_frozen()
    }

    // ---- input ----

    pub fn input(&self) -> Ref<'_, InputTracker> {
        self.inner.input.borrow()
    }

    pub(crate) fn input_mut(&self) -> RefMut<'_, InputTracker> {
        self.inner.input.borrow_mut()
    }

    pub fn cursor(&self) -> Vec2 {
        self.input().cursor()
    }

    // ---- layers ----

    /// Hand out the next layer number. Sprites and groups call this at
    /// construction so creation order is the default draw order.
    pub fn next_layer(&self) -> i32 {
        let layer = self.inner.next_layer.get().wrapping_add(1);
        self.inner.next_layer.set(layer);
        layer
    }

    // ---- scenes ----

    pub(crate) fn register_scene(&self, scene: Rc<Scene>) {
        self.inner.scenes.borrow_mut().push(scene);
    }

    /// Every scene created with this context, in creation order.
    pub fn scenes(&self) -> Vec<Rc<Scene>> {
        self.inner.scenes.borrow().clone()
    }

    pub fn scene(&self, index: usize) -> Option<Rc<Scene>> {
        self.inner.scenes.borrow().get(index).cloned()
    }

    pub fn active_scene(&self) -> Option<Rc<Scene>> {
        self.inner.active.borrow().clone()
    }

    pub fn set_active_scene(&self, scene: &Rc<Scene>) {
        *self.inner.active.borrow_mut() = Some(Rc::clone(scene));
    }

    // ---- flags ----

    pub fn debug(&self) -> bool {
        self.inner.debug.get()
    }

    pub fn set_debug(&self, debug: bool) {
        self.inner.debug.set(debug);
    }

    pub fn quit_handle(&self) -> QuitHandle {
        self.inner.quit.clone()
    }

    /// Ask the engine to stop after the current frame.
    pub fn request_quit(&self) {
        self.inner.quit.request();
    }
}

impl Default for Context {
    fn default() -> Self {
        Self::new()
    }
}
