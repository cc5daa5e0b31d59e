//! The positioned, drawable, updatable game object.
//!
//! A [`Sprite`] has a base image (or none, in which case it draws as a filled
//! black box), a scaling size, a rotation angle in degrees and a rendered
//! rectangle. The rendered rectangle is never edited independently of the
//! transform: [`draw`](Sprite::draw) rebuilds it from the current centre,
//! scaling size and angle every time, so rotating never shifts the apparent
//! centre.
//!
//! Sprites are shared as [`SpriteRef`] (`Rc<RefCell<Sprite>>`) so scenes and
//! groups can reference them without owning them. Killing a sprite only
//! marks it dead; containers keep it until it is removed explicitly.
//!
//! # Behavior
//!
//! Each sprite carries a [`Behavior`] chosen when the callback is installed:
//!
//! - `Default`: [`update`](Sprite::update) draws the sprite, then runs the
//!   optional callback, and does nothing at all once the sprite is dead.
//! - `Overridden`: the callback is the whole per-frame behavior. Nothing is
//!   drawn unless the callback draws, and it keeps running after `kill`.
//!
//! # Collision gating
//!
//! Every collision query passes through the sprite's single immunity
//! [`Cooldown`]. A query made while the cooldown is not ready returns false
//! without looking at geometry; a query made while it is ready restarts it,
//! whatever the geometric answer. A sprite therefore evaluates at most one
//! collision per immunity window, against any partner.

use std::cell::RefCell;
use std::path::Path;
use std::rc::Rc;

use glam::Vec2;

use crate::components::animation::{AnimationClip, AnimationSet};
use crate::components::cooldown::Cooldown;
use crate::components::rect::Rect;
use crate::error::EngineError;
use crate::platform::{Color, Image, ImageLoader, Surface};
use crate::resources::context::Context;
use crate::scene::SceneObject;

/// Default collision immunity window, in seconds.
pub const DEFAULT_COLLIDE_IMMUNITY: f32 = 0.1;

/// Shared handle to a sprite.
pub type SpriteRef = Rc<RefCell<Sprite>>;

/// Signature of a per-frame sprite callback.
pub type UpdateFn = dyn FnMut(&mut Sprite, &mut dyn Surface) -> anyhow::Result<()>;

type SharedUpdateFn = Rc<RefCell<UpdateFn>>;

/// How a sprite behaves when updated.
#[derive(Clone)]
pub enum Behavior {
    /// Draw, then run the optional callback. Inert once dead.
    Default(Option<SharedUpdateFn>),
    /// Run only the callback, every frame.
    Overridden(SharedUpdateFn),
}

impl Default for Behavior {
    fn default() -> Self {
        Behavior::Default(None)
    }
}

impl std::fmt::Debug for Behavior {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Behavior::Default(cb) => write!(f, "Default(callback: {})", cb.is_some()),
            Behavior::Overridden(_) => write!(f, "Overridden"),
        }
    }
}

pub struct Sprite {
    ctx: Context,
    layer: i32,
    rect: Rect,
    image: Option<Image>,
    scale_size: Vec2,
    angle: f32,
    alive: bool,
    solid: bool,
    immunity: Cooldown,
    animations: AnimationSet,
    behavior: Behavior,
    debug_color: Color,
}

impl Sprite {
    /// Image-less sprite drawn as a filled black box of `size`.
    pub fn new(ctx: &Context, size: Vec2, solid: bool) -> Self {
        Self::build(ctx, None, size, solid)
    }

    /// Sprite showing `image`, scaled to `size` when given.
    pub fn from_image(ctx: &Context, image: Image, size: Option<Vec2>, solid: bool) -> Self {
        let size = size.unwrap_or_else(|| image.size());
        Self::build(ctx, Some(image), size, solid)
    }

    /// Load the base image through `loader`. A load failure is fatal to
    /// construction and returned as-is.
    pub fn from_path(
        ctx: &Context,
        loader: &mut dyn ImageLoader,
        path: impl AsRef<Path>,
        size: Option<Vec2>,
        solid: bool,
    ) -> Result<Self, EngineError> {
        let image = loader.load_image(path.as_ref())?;
        Ok(Self::from_image(ctx, image, size, solid))
    }

    fn build(ctx: &Context, image: Option<Image>, size: Vec2, solid: bool) -> Self {
        Self {
            ctx: ctx.clone(),
            layer: ctx.next_layer(),
            rect: Rect::new(0.0, 0.0, size.x, size.y),
            image,
            scale_size: size,
            angle: 0.0,
            alive: true,
            solid,
            immunity: Cooldown::new(ctx, DEFAULT_COLLIDE_IMMUNITY),
            animations: AnimationSet::new(),
            behavior: Behavior::default(),
            debug_color: Color::random(),
        }
    }

    /// Wrap into a shared handle.
    pub fn into_ref(self) -> SpriteRef {
        Rc::new(RefCell::new(self))
    }

    // ---- behavior ----

    /// Keep the default draw path and run `f` after it while alive.
    pub fn on_update<F>(&mut self, f: F) -> &mut Self
    where
        F: FnMut(&mut Sprite, &mut dyn Surface) -> anyhow::Result<()> + 'static,
    {
        self.behavior = Behavior::Default(Some(Rc::new(RefCell::new(f))));
        self
    }

    /// Replace the default behavior entirely with `f`.
    pub fn override_update<F>(&mut self, f: F) -> &mut Self
    where
        F: FnMut(&mut Sprite, &mut dyn Surface) -> anyhow::Result<()> + 'static,
    {
        self.behavior = Behavior::Overridden(Rc::new(RefCell::new(f)));
        self
    }

    /// Back to plain draw-only behavior.
    pub fn clear_update(&mut self) -> &mut Self {
        self.behavior = Behavior::default();
        self
    }

    /// Installed update behavior.
    pub fn behavior(&self) -> &Behavior {
        &self.behavior
    }

    /// Run one frame of this sprite's behavior.
    pub fn update(&mut self, surface: &mut dyn Surface) -> anyhow::Result<()> {
        let (callback, default_path) = match &self.behavior {
            Behavior::Overridden(cb) => (Some(Rc::clone(cb)), false),
            Behavior::Default(cb) => (cb.clone(), true),
        };
        if default_path {
            if !self.alive {
                return Ok(());
            }
            self.draw(surface);
        }
        let Some(callback) = callback else {
            return Ok(());
        };
        let Ok(mut f) = callback.try_borrow_mut() else {
            // Re-entrant update from inside its own callback.
            return Ok(());
        };
        (&mut *f)(self, surface)
    }

    // ---- drawing ----

    /// Rebuild the rendered rectangle from the transform and blit.
    ///
    /// Dead sprites draw nothing. In debug mode the rendered rectangle is
    /// outlined in the sprite's debug colour with its coordinates.
    pub fn draw(&mut self, surface: &mut dyn Surface) {
        if !self.alive {
            return;
        }
        let center = self.rect.center();
        self.rect = Rect::from_center(center, self.scale_size).rotated_bounds(self.angle);

        match &self.image {
            Some(image) => surface.draw_image(image, center, self.scale_size, self.angle),
            None => surface.draw_rect(Rect::from_center(center, self.scale_size), Color::BLACK, true),
        }

        if self.ctx.debug() {
            surface.draw_rect(self.rect, self.debug_color, false);
            let label = format!("{}, {}", self.rect.x.round(), self.rect.y.round());
            surface.draw_text(&label, self.rect.top_left(), 12.0, self.debug_color, true);
        }
    }

    // ---- lifecycle ----

    /// Mark dead. There is no way back short of building a new sprite.
    pub fn kill(&mut self) -> &mut Self {
        self.alive = false;
        self
    }

    /// False once [`kill`](Self::kill) has been called.
    pub fn is_alive(&self) -> bool {
        self.alive
    }

    // ---- transform ----

    /// Set the top-left of the rendered rectangle; `None` keeps an axis.
    pub fn set_position(&mut self, x: Option<f32>, y: Option<f32>) -> &mut Self {
        let current = self.rect.top_left();
        self.rect
            .set_top_left(Vec2::new(x.unwrap_or(current.x), y.unwrap_or(current.y)));
        self
    }

    /// Move so the rectangle is centered on `center`.
    pub fn place_centered(&mut self, center: Vec2) -> &mut Self {
        self.rect.set_center(center);
        self
    }

    /// Shift the rectangle by `(dx, dy)` pixels.
    pub fn move_by(&mut self, dx: f32, dy: f32) -> &mut Self {
        self.rect.translate(Vec2::new(dx, dy));
        self
    }

    /// Step toward `target` at `speed` pixels per second, scaled by the
    /// frame delta. No movement when already on the target.
    pub fn move_to(&mut self, target: Vec2, speed: f32) -> &mut Self {
        let delta = target - self.rect.center();
        let distance = delta.length();
        if distance > 0.0 {
            let step = delta / distance * speed * self.ctx.dt();
            self.rect.translate(step);
        }
        self
    }

    /// Move `speed` pixels along the facing direction. Angle 0 faces +x,
    /// angles grow counter-clockwise on screen.
    pub fn move_angle(&mut self, speed: f32) -> &mut Self {
        let heading = (self.angle + 90.0).to_radians();
        self.move_by(heading.sin() * speed, heading.cos() * speed)
    }

    /// Set the scaling size the base image is stretched to.
    pub fn scale_to(&mut self, width: f32, height: f32) -> &mut Self {
        self.scale_size = Vec2::new(width, height);
        self
    }

    /// Turn clockwise on screen by `delta` degrees, normalised to `[0, 360)`.
    ///
    /// The angle itself is counter-clockwise (see [`look_at`](Self::look_at)),
    /// so a positive delta lowers it.
    pub fn rotate(&mut self, delta: f32) -> &mut Self {
        self.angle = (self.angle - delta).rem_euclid(360.0);
        self
    }

    /// Set the angle in degrees, normalised to `[0, 360)`.
    pub fn set_angle(&mut self, angle: f32) -> &mut Self {
        self.angle = angle.rem_euclid(360.0);
        self
    }

    /// Face `target`: angle = -atan2(dy, dx) in degrees (y grows downward).
    pub fn look_at(&mut self, target: Vec2) -> &mut Self {
        let delta = target - self.rect.center();
        self.angle = -delta.y.atan2(delta.x).to_degrees();
        self
    }

    /// Clamp the rectangle inside `bounds`.
    pub fn stay_in_rect(&mut self, bounds: Rect) -> &mut Self {
        self.rect = self.rect.clamped_inside(&bounds);
        self
    }

    /// Whether `point` (the cursor when `None`) lies on the sprite.
    pub fn hover(&self, point: Option<Vec2>) -> bool {
        let point = point.unwrap_or_else(|| self.ctx.cursor());
        self.rect.contains_point(point)
    }

    // ---- layers ----

    /// Set the draw/update layer. Scenes pick it up on their next resort.
    pub fn set_layer(&mut self, layer: i32) -> &mut Self {
        self.layer = layer;
        self
    }

    /// Shift the layer by `delta`.
    pub fn change_layer(&mut self, delta: i32) -> &mut Self {
        self.layer += delta;
        self
    }

    /// Current layer; lower runs first.
    pub fn layer(&self) -> i32 {
        self.layer
    }

    // ---- collision ----

    /// Replace the immunity window; the new cooldown starts ready.
    pub fn set_collide_immunity(&mut self, seconds: f32) -> &mut Self {
        self.immunity = Cooldown::new(&self.ctx, seconds);
        self
    }

    /// Cooldown gating collision checks.
    pub fn collide_immunity(&self) -> &Cooldown {
        &self.immunity
    }

    /// Pass the immunity gate, restarting it when open.
    fn pass_gate(&mut self) -> bool {
        if !self.immunity.check() {
            return false;
        }
        self.immunity.start();
        true
    }

    /// Overlap test against another live sprite, rate-limited by immunity.
    pub fn collide(&mut self, other: &Sprite) -> bool {
        self.pass_gate() && other.alive && self.rect.overlaps(&other.rect)
    }

    /// Overlap test against a rectangle, rate-limited by immunity.
    pub fn collide_rect(&mut self, rect: Rect) -> bool {
        self.pass_gate() && self.rect.overlaps(&rect)
    }

    /// Overlap test against every live object of the active scene (or only
    /// its solids), rate-limited by immunity.
    ///
    /// Entries that are currently borrowed are skipped; that covers the
    /// sprite itself, since it is borrowed while asking.
    pub fn collide_any(&mut self, solids_only: bool) -> bool {
        if !self.pass_gate() {
            return false;
        }
        let Some(scene) = self.ctx.active_scene() else {
            return false;
        };
        let entries = if solids_only { scene.solids() } else { scene.objects() };
        entries.iter().any(|entry| {
            entry.try_borrow().is_ok_and(|obj| {
                obj.alive() && obj.bounds().is_some_and(|bounds| self.rect.overlaps(&bounds))
            })
        })
    }

    // ---- animation ----

    /// Register a clip. The first clip becomes current and its first frame
    /// is shown immediately.
    pub fn set_animation(
        &mut self,
        name: &str,
        frames: Vec<Image>,
        frame_duration: f32,
        looped: bool,
    ) -> Result<&mut Self, EngineError> {
        let clip = AnimationClip::new(name, frames, frame_duration, looped)?;
        if let Some(frame) = self.animations.insert(name, clip) {
            self.image = Some(frame);
        }
        Ok(self)
    }

    /// Switch to `name`, or advance the current clip by this frame's delta.
    pub fn play_animation(&mut self, name: Option<&str>) -> &mut Self {
        let dt = self.ctx.dt();
        if let Some(frame) = self.animations.play(name, dt) {
            self.image = Some(frame);
        }
        self
    }

    /// Registered clips and the current one.
    pub fn animations(&self) -> &AnimationSet {
        &self.animations
    }

    // ---- accessors ----

    /// Bounding rectangle from the last draw or move.
    pub fn rect(&self) -> Rect {
        self.rect
    }

    /// Top-left corner of the rectangle.
    pub fn position(&self) -> Vec2 {
        self.rect.top_left()
    }

    /// Center of the rectangle.
    pub fn center(&self) -> Vec2 {
        self.rect.center()
    }

    /// Size the base image is stretched to before rotation.
    pub fn scale_size(&self) -> Vec2 {
        self.scale_size
    }

    /// Angle in degrees, counter-clockwise, in `[0, 360)`.
    pub fn angle(&self) -> f32 {
        self.angle
    }

    /// Image drawn next frame, if any.
    pub fn image(&self) -> Option<Image> {
        self.image
    }

    /// Replace the base image.
    pub fn set_image(&mut self, image: Image) -> &mut Self {
        self.image = Some(image);
        self
    }

    /// Whether the sprite counts for solid-only collision queries.
    pub fn is_solid(&self) -> bool {
        self.solid
    }

    /// Change solidity. Scenes pick it up on their next resort.
    pub fn set_solid(&mut self, solid: bool) -> &mut Self {
        self.solid = solid;
        self
    }

    /// Outline color used by the debug overlay.
    pub fn debug_color(&self) -> Color {
        self.debug_color
    }

    /// Engine context this sprite was built with.
    pub fn context(&self) -> &Context {
        &self.ctx
    }
}

impl SceneObject for Sprite {
    fn update(&mut self, surface: &mut dyn Surface) -> anyhow::Result<()> {
        Sprite::update(self, surface)
    }

    fn layer(&self) -> i32 {
        self.layer
    }

    fn solid(&self) -> bool {
        self.solid
    }

    fn bounds(&self) -> Option<Rect> {
        Some(self.rect)
    }

    fn alive(&self) -> bool {
        self.alive
    }
}

impl std::fmt::Debug for Sprite {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Sprite")
            .field("layer", &self.layer)
            .field("rect", &self.rect)
            .field("angle", &self.angle)
            .field("alive", &self.alive)
            .field("solid", &self.solid)
            .field("behavior", &self.behavior)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::DrawCmd;
    use crate::platform::headless::HeadlessPlatform;
    use crate::resources::frameclock::ManualTimeSource;
    use crate::scene::Scene;
    use std::time::Duration;

    fn setup() -> (ManualTimeSource, Context) {
        let source = ManualTimeSource::new();
        let ctx = Context::with_time_source(Box::new(source.clone()));
        (source, ctx)
    }

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-3
    }

    #[test]
    fn layers_follow_creation_order() {
        let (_s, ctx) = setup();
        let a = Sprite::new(&ctx, Vec2::splat(10.0), false);
        let b = Sprite::new(&ctx, Vec2::splat(10.0), false);
        assert!(b.layer() > a.layer());
    }

    #[test]
    fn rotate_normalises() {
        let (_s, ctx) = setup();
        let mut s = Sprite::new(&ctx, Vec2::splat(10.0), false);
        s.rotate(20.0);
        assert!(approx(s.angle(), 340.0));
        s.rotate(350.0);
        assert!(approx(s.angle(), 350.0));
        s.rotate(-30.0);
        assert!(approx(s.angle(), 20.0));
    }

    #[test]
    fn look_at_uses_screen_coordinates() {
        let (_s, ctx) = setup();
        let mut s = Sprite::new(&ctx, Vec2::splat(10.0), false);
        s.place_centered(Vec2::ZERO);
        s.look_at(Vec2::new(0.0, -10.0));
        assert!(approx(s.angle(), 90.0));
        s.look_at(Vec2::new(10.0, 0.0));
        assert!(approx(s.angle(), 0.0));
    }

    #[test]
    fn move_to_scales_by_dt_and_guards_zero_distance() {
        let (_s, ctx) = setup();
        ctx.clock_mut().set_dt(0.5);
        let mut s = Sprite::new(&ctx, Vec2::splat(10.0), false);
        s.place_centered(Vec2::ZERO);
        s.move_to(Vec2::new(100.0, 0.0), 10.0);
        assert!(approx(s.center().x, 5.0));
        assert!(approx(s.center().y, 0.0));

        let before = s.center();
        s.move_to(before, 10.0);
        assert_eq!(s.center(), before);
    }

    #[test]
    fn move_angle_follows_facing() {
        let (_s, ctx) = setup();
        let mut s = Sprite::new(&ctx, Vec2::splat(10.0), false);
        s.place_centered(Vec2::ZERO);
        s.move_angle(2.0);
        assert!(approx(s.center().x, 2.0));
        s.set_angle(90.0).move_angle(2.0);
        assert!(approx(s.center().y, -2.0));
    }

    #[test]
    fn draw_rebuilds_rect_about_center() {
        let (_s, ctx) = setup();
        let mut platform = HeadlessPlatform::new(Vec2::splat(200.0));
        let image = platform.add_image("ship.png", 20.0, 10.0);
        let mut s = Sprite::from_image(&ctx, image, None, false);
        s.place_centered(Vec2::new(50.0, 50.0)).set_angle(90.0);
        s.draw(&mut platform);

        let rect = s.rect();
        assert!(approx(rect.center().x, 50.0));
        assert!(approx(rect.center().y, 50.0));
        assert!(approx(rect.w, 10.0));
        assert!(approx(rect.h, 20.0));
        assert!(matches!(
            platform.pending()[0],
            DrawCmd::Image { center, angle, .. } if center == Vec2::new(50.0, 50.0) && approx(angle, 90.0)
        ));
    }

    #[test]
    fn dead_sprite_is_inert() {
        let (_s, ctx) = setup();
        let mut platform = HeadlessPlatform::new(Vec2::splat(100.0));
        let calls = Rc::new(RefCell::new(0));
        let counter = Rc::clone(&calls);
        let mut s = Sprite::new(&ctx, Vec2::splat(10.0), false);
        s.on_update(move |_, _| {
            *counter.borrow_mut() += 1;
            Ok(())
        });
        s.kill();
        s.update(&mut platform).unwrap();
        s.draw(&mut platform);
        assert_eq!(*calls.borrow(), 0);
        assert!(platform.pending().is_empty());
    }

    #[test]
    fn override_is_the_only_behavior() {
        let (_s, ctx) = setup();
        let mut platform = HeadlessPlatform::new(Vec2::splat(100.0));
        let mut s = Sprite::new(&ctx, Vec2::splat(10.0), false);
        s.override_update(|sprite, _| {
            sprite.move_by(1.0, 0.0);
            Ok(())
        });
        s.kill();
        s.update(&mut platform).unwrap();
        assert!(platform.pending().is_empty());
        assert!(approx(s.position().x, 1.0));
    }

    #[test]
    fn callback_may_replace_itself() {
        let (_s, ctx) = setup();
        let mut platform = HeadlessPlatform::new(Vec2::splat(100.0));
        let mut s = Sprite::new(&ctx, Vec2::splat(10.0), false);
        s.override_update(|sprite, _| {
            sprite.clear_update();
            Ok(())
        });
        s.update(&mut platform).unwrap();
        assert!(matches!(s.behavior(), Behavior::Default(None)));
    }

    #[test]
    fn collide_is_rate_limited() {
        let (source, ctx) = setup();
        let mut a = Sprite::new(&ctx, Vec2::splat(10.0), false);
        let b = Sprite::new(&ctx, Vec2::splat(10.0), false);
        assert!(a.collide(&b));
        assert!(!a.collide(&b));
        source.advance(Duration::from_millis(101));
        assert!(a.collide(&b));
    }

    #[test]
    fn failed_geometry_still_consumes_the_window() {
        let (_source, ctx) = setup();
        let mut a = Sprite::new(&ctx, Vec2::splat(10.0), false);
        assert!(!a.collide_rect(Rect::new(100.0, 100.0, 5.0, 5.0)));
        assert!(!a.collide_rect(Rect::new(0.0, 0.0, 5.0, 5.0)));
    }

    #[test]
    fn collide_any_checks_the_active_scene() {
        let (source, ctx) = setup();
        let scene = Scene::new(&ctx, "arena");
        ctx.set_active_scene(&scene);
        let me = Sprite::new(&ctx, Vec2::splat(10.0), false).into_ref();
        scene.add_object(&me);

        assert!(!me.borrow_mut().collide_any(false), "a sprite never hits itself");

        let ghost = Sprite::new(&ctx, Vec2::splat(10.0), false).into_ref();
        ghost.borrow_mut().set_position(Some(5.0), Some(5.0));
        scene.add_object(&ghost);

        source.advance(Duration::from_millis(101));
        assert!(!me.borrow_mut().collide_any(true), "non-solid overlap is not a solid hit");

        source.advance(Duration::from_millis(101));
        assert!(me.borrow_mut().collide_any(false));
        assert!(!me.borrow_mut().collide_any(false), "still inside the immunity window");

        source.advance(Duration::from_millis(101));
        ghost.borrow_mut().kill();
        assert!(!me.borrow_mut().collide_any(false), "dead objects are skipped");
    }

    #[test]
    fn collide_any_without_active_scene_misses() {
        let (_s, ctx) = setup();
        let mut me = Sprite::new(&ctx, Vec2::splat(10.0), false);
        assert!(!me.collide_any(false));
    }

    #[test]
    fn collide_ignores_dead_partner() {
        let (_s, ctx) = setup();
        let mut a = Sprite::new(&ctx, Vec2::splat(10.0), false);
        let mut b = Sprite::new(&ctx, Vec2::splat(10.0), false);
        b.kill();
        assert!(!a.collide(&b));
    }

    #[test]
    fn hover_defaults_to_cursor() {
        let (_s, ctx) = setup();
        let s = Sprite::new(&ctx, Vec2::splat(10.0), false);
        assert!(s.hover(None));
        assert!(!s.hover(Some(Vec2::new(50.0, 50.0))));
    }

    #[test]
    fn stay_in_rect_clamps() {
        let (_s, ctx) = setup();
        let mut s = Sprite::new(&ctx, Vec2::splat(10.0), false);
        s.set_position(Some(95.0), Some(-5.0));
        s.stay_in_rect(Rect::new(0.0, 0.0, 100.0, 100.0));
        assert_eq!(s.position(), Vec2::new(90.0, 0.0));
    }

    #[test]
    fn first_animation_snaps_its_first_frame() {
        let (_s, ctx) = setup();
        let mut platform = HeadlessPlatform::new(Vec2::splat(100.0));
        let f0 = platform.add_image("f0.png", 8.0, 8.0);
        let f1 = platform.add_image("f1.png", 8.0, 8.0);
        let mut s = Sprite::new(&ctx, Vec2::splat(8.0), false);
        s.set_animation("walk", vec![f0, f1], 0.1, true).unwrap();
        assert_eq!(s.image(), Some(f0));

        ctx.clock_mut().set_dt(0.1);
        s.play_animation(None);
        assert_eq!(s.image(), Some(f1));
    }

    #[test]
    fn missing_image_fails_construction() {
        let (_s, ctx) = setup();
        let mut platform = HeadlessPlatform::new(Vec2::splat(100.0));
        let err = Sprite::from_path(&ctx, &mut platform, "nope.png", None, false).unwrap_err();
        assert!(matches!(err, EngineError::ImageLoad { .. }));
    }
}
