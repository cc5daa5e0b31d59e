//! Identity-deduplicated sprite collection.
//!
//! A [`Group`] references sprites without owning them and forwards batch
//! operations to every member. It takes a layer from the same counter as
//! sprites, so a whole group can be registered into a scene as one object.

use std::cell::RefCell;
use std::rc::Rc;

use smallvec::SmallVec;

use crate::components::rect::Rect;
use crate::components::sprite::{Sprite, SpriteRef};
use crate::platform::Surface;
use crate::resources::context::Context;
use crate::scene::SceneObject;

/// Members reported by [`Group::collide`]; most probes hit only a few.
pub type Hits = SmallVec<[SpriteRef; 4]>;

pub type GroupRef = Rc<RefCell<Group>>;

#[derive(Debug)]
pub struct Group {
    layer: i32,
    sprites: Vec<SpriteRef>,
}

impl Group {
    /// Empty group on the next layer.
    pub fn new(ctx: &Context) -> Self {
        Self {
            layer: ctx.next_layer(),
            sprites: Vec::new(),
        }
    }

    /// Group holding `sprites`, duplicates dropped.
    pub fn with_sprites<'a>(ctx: &Context, sprites: impl IntoIterator<Item = &'a SpriteRef>) -> Self {
        let mut group = Self::new(ctx);
        for sprite in sprites {
            group.add(sprite);
        }
        group
    }

    /// Wrap into a shared handle, e.g. to register in a scene.
    pub fn into_ref(self) -> GroupRef {
        Rc::new(RefCell::new(self))
    }

    /// Append `sprite` unless it is already a member.
    pub fn add(&mut self, sprite: &SpriteRef) -> &mut Self {
        if !self.contains(sprite) {
            self.sprites.push(Rc::clone(sprite));
        }
        self
    }

    /// Remove `sprite` if present.
    pub fn remove(&mut self, sprite: &SpriteRef) -> &mut Self {
        self.sprites.retain(|member| !Rc::ptr_eq(member, sprite));
        self
    }

    /// Identity membership test.
    pub fn contains(&self, sprite: &SpriteRef) -> bool {
        self.sprites.iter().any(|member| Rc::ptr_eq(member, sprite))
    }

    /// Draw every member in insertion order, ignoring layers.
    pub fn draw(&self, surface: &mut dyn Surface) {
        for sprite in &self.sprites {
            if let Ok(mut sprite) = sprite.try_borrow_mut() {
                sprite.draw(surface);
            }
        }
    }

    /// Stable-sort members by layer, then draw and update each one.
    ///
    /// Every member runs even when an earlier one fails; the first error is
    /// returned afterwards.
    pub fn update(&mut self, surface: &mut dyn Surface) -> anyhow::Result<()> {
        self.sprites
            .sort_by_cached_key(|s| s.try_borrow().map(|s| s.layer()).unwrap_or(i32::MAX));

        let mut first_err = None;
        for sprite in &self.sprites {
            let Ok(mut sprite) = sprite.try_borrow_mut() else {
                continue;
            };
            sprite.draw(surface);
            if let Err(err) = sprite.update(surface) {
                let layer = sprite.layer();
                first_err.get_or_insert(err.context(format!("group member on layer {layer}")));
            }
        }
        first_err.map_or(Ok(()), Err)
    }

    /// Move every member by `(dx, dy)`.
    pub fn move_by(&mut self, dx: f32, dy: f32) -> &mut Self {
        self.for_each(|s| {
            s.move_by(dx, dy);
        })
    }

    /// Set every member's scaling size.
    pub fn scale_to(&mut self, width: f32, height: f32) -> &mut Self {
        self.for_each(|s| {
            s.scale_to(width, height);
        })
    }

    /// Rotate every member by `delta` degrees.
    pub fn rotate(&mut self, delta: f32) -> &mut Self {
        self.for_each(|s| {
            s.rotate(delta);
        })
    }

    /// Kill every member. Members stay in the group.
    pub fn kill(&mut self) -> &mut Self {
        self.for_each(|s| {
            s.kill();
        })
    }

    fn for_each(&mut self, mut f: impl FnMut(&mut Sprite)) -> &mut Self {
        for sprite in &self.sprites {
            if let Ok(mut sprite) = sprite.try_borrow_mut() {
                f(&mut *sprite);
            }
        }
        self
    }

    /// Members whose own `collide(probe)` succeeds. The probe itself is
    /// skipped when it is a member.
    pub fn collide(&self, probe: &SpriteRef) -> Hits {
        let Ok(probe_ref) = probe.try_borrow() else {
            return Hits::new();
        };
        self.sprites
            .iter()
            .filter(|member| !Rc::ptr_eq(member, probe))
            .filter(|member| {
                member
                    .try_borrow_mut()
                    .is_ok_and(|mut member| member.collide(&probe_ref))
            })
            .cloned()
            .collect()
    }

    /// First live member overlapping `rect`, by geometry alone.
    ///
    /// No immunity gate is consulted, so a caller can find the partner first
    /// and then spend its own gate once with [`Sprite::collide`].
    pub fn touching(&self, rect: Rect) -> Option<SpriteRef> {
        self.sprites
            .iter()
            .find(|member| {
                member
                    .try_borrow()
                    .is_ok_and(|member| member.is_alive() && member.rect().overlaps(&rect))
            })
            .cloned()
    }

    /// Number of members.
    pub fn len(&self) -> usize {
        self.sprites.len()
    }

    /// True when the group has no members.
    pub fn is_empty(&self) -> bool {
        self.sprites.is_empty()
    }

    /// Member at `index`, in insertion or last-sorted order.
    pub fn get(&self, index: usize) -> Option<&SpriteRef> {
        self.sprites.get(index)
    }

    /// Members in their current order.
    pub fn iter(&self) -> std::slice::Iter<'_, SpriteRef> {
        self.sprites.iter()
    }

    /// Set the layer the group occupies in a scene.
    pub fn set_layer(&mut self, layer: i32) -> &mut Self {
        self.layer = layer;
        self
    }

    /// Layer the group occupies in a scene.
    pub fn layer(&self) -> i32 {
        self.layer
    }
}

impl<'a> IntoIterator for &'a Group {
    type Item = &'a SpriteRef;
    type IntoIter = std::slice::Iter<'a, SpriteRef>;

    fn into_iter(self) -> Self::IntoIter {
        self.sprites.iter()
    }
}

impl SceneObject for Group {
    fn update(&mut self, surface: &mut dyn Surface) -> anyhow::Result<()> {
        Group::update(self, surface)
    }

    fn layer(&self) -> i32 {
        self.layer
    }

    fn bounds(&self) -> Option<Rect> {
        None
    }
}
