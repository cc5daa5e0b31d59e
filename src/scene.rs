//! Scenes: ordered registries of updatable objects plus one loop function.
//!
//! A [`Scene`] tracks shared [`SceneObject`]s (sprites, groups or any user
//! type) in layer order, together with the solids-only subsequence used by
//! [`Sprite::collide_any`](crate::components::sprite::Sprite::collide_any).
//! Both sequences are stable-sorted by layer after every registration, so
//! equal layers keep registration order and the solids are always an
//! order-preserving subset of the full list.
//!
//! Each frame the engine calls [`Scene::run_loop`], which runs the installed
//! loop function or, by default, [`Scene::update`]. `update` isolates faults
//! per object: an error or panic from one object is logged with the scene
//! name, the object's position and layer, and the pass continues.
//!
//! Scenes are created with [`Scene::new`], which registers them with the
//! context's scene list; they live for as long as that context does.

use std::cell::RefCell;
use std::panic::{self, AssertUnwindSafe};
use std::rc::Rc;

use crate::components::rect::Rect;
use crate::error::panic_message;
use crate::platform::Surface;
use crate::resources::context::Context;

/// Anything a scene can hold.
pub trait SceneObject {
    /// Run one frame of behavior.
    fn update(&mut self, surface: &mut dyn Surface) -> anyhow::Result<()>;

    /// Draw/update ordering key; lower runs first.
    fn layer(&self) -> i32;

    fn solid(&self) -> bool {
        false
    }

    /// Collision bounds, if the object has any.
    fn bounds(&self) -> Option<Rect> {
        None
    }

    fn alive(&self) -> bool {
        true
    }
}

/// Shared handle to a scene member.
pub type ObjectRef = Rc<RefCell<dyn SceneObject>>;

/// Per-frame scene logic replacing the default update pass.
pub type LoopFn = dyn FnMut(&Scene, &mut dyn Surface);

#[derive(Clone)]
struct Entry {
    object: ObjectRef,
    layer: i32,
    solid: bool,
}

impl Entry {
    fn new(object: ObjectRef) -> Self {
        let mut entry = Self {
            object,
            layer: 0,
            solid: false,
        };
        entry.refresh();
        entry
    }

    /// Re-read layer and solidity; a busy object keeps its last known values.
    fn refresh(&mut self) {
        if let Ok(object) = self.object.try_borrow() {
            self.layer = object.layer();
            self.solid = object.solid();
        }
    }

    fn is(&self, object: &ObjectRef) -> bool {
        same_object(&self.object, object)
    }
}

fn same_object(a: &ObjectRef, b: &ObjectRef) -> bool {
    std::ptr::addr_eq(Rc::as_ptr(a), Rc::as_ptr(b))
}

/// Collects objects inside a [`Scene::register`] block.
pub struct Registrar {
    pending: Vec<ObjectRef>,
}

impl Registrar {
    /// Queue `object` for registration.
    pub fn add<T: SceneObject + 'static>(&mut self, object: &Rc<RefCell<T>>) -> &mut Self {
        let object: ObjectRef = Rc::clone(object) as ObjectRef;
        self.add_dyn(object)
    }

    pub fn add_dyn(&mut self, object: ObjectRef) -> &mut Self {
        if !self.pending.iter().any(|p| same_object(p, &object)) {
            self.pending.push(object);
        }
        self
    }
}

pub struct Scene {
    ctx: Context,
    name: String,
    entries: RefCell<Vec<Entry>>,
    loop_fn: RefCell<Option<Rc<RefCell<LoopFn>>>>,
}

impl Scene {
    /// Create a scene and append it to the context's scene list.
    pub fn new(ctx: &Context, name: impl Into<String>) -> Rc<Scene> {
        let scene = Rc::new(Scene {
            ctx: ctx.clone(),
            name: name.into(),
            entries: RefCell::new(Vec::new()),
            loop_fn: RefCell::new(None),
        });
        ctx.register_scene(Rc::clone(&scene));
        log::debug!(target: "novaengine::scene", "scene {:?} created", scene.name);
        scene
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn context(&self) -> &Context {
        &self.ctx
    }

    // ---- registration ----

    /// Register every object added inside `block`, then layer-sort.
    ///
    /// ```ignore
    /// scene.register(|r| {
    ///     r.add(&player).add(&walls);
    /// });
    /// ```
    pub fn register(&self, block: impl FnOnce(&mut Registrar)) {
        let mut registrar = Registrar { pending: Vec::new() };
        block(&mut registrar);
        {
            let mut entries = self.entries.borrow_mut();
            for object in registrar.pending {
                if !entries.iter().any(|e| e.is(&object)) {
                    entries.push(Entry::new(object));
                }
            }
        }
        self.resort();
    }

    /// Add one object, keeping layer order. Returns false if already present.
    pub fn add_object<T: SceneObject + 'static>(&self, object: &Rc<RefCell<T>>) -> bool {
        self.add_dyn(Rc::clone(object) as ObjectRef)
    }

    pub fn add_dyn(&self, object: ObjectRef) -> bool {
        {
            let mut entries = self.entries.borrow_mut();
            if entries.iter().any(|e| e.is(&object)) {
                return false;
            }
            entries.push(Entry::new(object));
        }
        self.resort();
        true
    }

    /// Remove one object. Returns false if it was not present.
    pub fn remove_object<T: SceneObject + 'static>(&self, object: &Rc<RefCell<T>>) -> bool {
        self.remove_dyn(&(Rc::clone(object) as ObjectRef))
    }

    pub fn remove_dyn(&self, object: &ObjectRef) -> bool {
        let mut entries = self.entries.borrow_mut();
        let before = entries.len();
        entries.retain(|e| !e.is(object));
        entries.len() != before
    }

    /// Re-read every object's layer and solidity and stable-sort by layer.
    pub fn resort(&self) {
        let mut entries = self.entries.borrow_mut();
        for entry in entries.iter_mut() {
            entry.refresh();
        }
        entries.sort_by_key(|e| e.layer);
    }

    // ---- access ----

    /// Tracked objects in update order.
    pub fn objects(&self) -> Vec<ObjectRef> {
        self.entries.borrow().iter().map(|e| Rc::clone(&e.object)).collect()
    }

    /// Solid objects, in the same relative order as [`objects`](Self::objects).
    pub fn solids(&self) -> Vec<ObjectRef> {
        self.entries
            .borrow()
            .iter()
            .filter(|e| e.solid)
            .map(|e| Rc::clone(&e.object))
            .collect()
    }

    pub fn contains<T: SceneObject + 'static>(&self, object: &Rc<RefCell<T>>) -> bool {
        let object = Rc::clone(object) as ObjectRef;
        self.entries.borrow().iter().any(|e| e.is(&object))
    }

    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }

    // ---- per-frame ----

    /// Update every tracked object in order. Returns the number of objects
    /// that failed in this pass.
    ///
    /// The pass walks a snapshot of the list, so objects may add or remove
    /// scene members from inside their update; changes apply next frame.
    pub fn update(&self, surface: &mut dyn Surface) -> usize {
        let snapshot = self.objects();
        let mut faults = 0;
        for (index, object) in snapshot.iter().enumerate() {
            let Ok(mut object) = object.try_borrow_mut() else {
                log::warn!(
                    target: "novaengine::scene",
                    "scene {:?}: object #{index} is already borrowed, skipped",
                    self.name
                );
                continue;
            };
            let outcome = panic::catch_unwind(AssertUnwindSafe(|| object.update(surface)));
            let reason = match outcome {
                Ok(Ok(())) => continue,
                Ok(Err(err)) => format!("{err:#}"),
                Err(payload) => format!("panicked: {}", panic_message(payload.as_ref())),
            };
            faults += 1;
            log::error!(
                target: "novaengine::scene",
                "scene {:?}: object #{index} (layer {}) failed: {reason}",
                self.name,
                object.layer()
            );
        }
        faults
    }

    /// Install a loop function run instead of [`update`](Self::update).
    pub fn set_loop<F>(&self, f: F)
    where
        F: FnMut(&Scene, &mut dyn Surface) + 'static,
    {
        *self.loop_fn.borrow_mut() = Some(Rc::new(RefCell::new(f)));
    }

    /// Go back to the default update pass.
    pub fn reset_loop(&self) {
        *self.loop_fn.borrow_mut() = None;
    }

    pub fn has_custom_loop(&self) -> bool {
        self.loop_fn.borrow().is_some()
    }

    /// Run whichever loop function is installed.
    pub fn run_loop(&self, surface: &mut dyn Surface) {
        let custom = self.loop_fn.borrow().clone();
        match custom {
            Some(f) => match f.try_borrow_mut() {
                Ok(mut f) => (&mut *f)(self, surface),
                Err(_) => log::warn!(
                    target: "novaengine::scene",
                    "scene {:?}: loop function re-entered, skipped",
                    self.name
                ),
            },
            None => {
                self.update(surface);
            }
        }
    }
}

impl std::fmt::Debug for Scene {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scene")
            .field("name", &self.name)
            .field("objects", &self.len())
            .field("custom_loop", &self.has_custom_loop())
            .finish()
    }
}
