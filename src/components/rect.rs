//! Axis-aligned rectangles in screen space.
//!
//! [`Rect`] is the geometry used for sprite bounds, collision tests and the
//! clamp used by [`Sprite::stay_in_rect`](crate::components::sprite::Sprite::stay_in_rect).
//! Coordinates follow the screen convention: X grows right, Y grows down.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Rectangle described by its top-left corner and size.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    /// Build a rectangle of `size` whose centre sits at `center`.
    pub fn from_center(center: Vec2, size: Vec2) -> Self {
        Self {
            x: center.x - size.x * 0.5,
            y: center.y - size.y * 0.5,
            w: size.x,
            h: size.y,
        }
    }

    pub fn top_left(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    pub fn size(&self) -> Vec2 {
        Vec2::new(self.w, self.h)
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.w * 0.5, self.y + self.h * 0.5)
    }

    pub fn right(&self) -> f32 {
        self.x + self.w
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.h
    }

    pub fn set_top_left(&mut self, pos: Vec2) {
        self.x = pos.x;
        self.y = pos.y;
    }

    pub fn set_center(&mut self, center: Vec2) {
        self.x = center.x - self.w * 0.5;
        self.y = center.y - self.h * 0.5;
    }

    pub fn translate(&mut self, delta: Vec2) {
        self.x += delta.x;
        self.y += delta.y;
    }

    /// Returns (min, max) corners, normalising negative sizes.
    pub fn min_max(&self) -> (Vec2, Vec2) {
        let p0 = self.top_left();
        let p1 = p0 + self.size();
        (p0.min(p1), p0.max(p1))
    }

    /// Strict overlap test; rectangles that only share an edge do not collide.
    pub fn overlaps(&self, other: &Rect) -> bool {
        let (min_a, max_a) = self.min_max();
        let (min_b, max_b) = other.min_max();
        min_a.x < max_b.x && max_a.x > min_b.x && min_a.y < max_b.y && max_a.y > min_b.y
    }

    /// Point containment, right/bottom edges excluded.
    pub fn contains_point(&self, point: Vec2) -> bool {
        let (min, max) = self.min_max();
        point.x >= min.x && point.x < max.x && point.y >= min.y && point.y < max.y
    }

    /// Move this rectangle the least amount needed to fit inside `bounds`.
    ///
    /// A rectangle larger than `bounds` on one axis is centred on that axis.
    pub fn clamped_inside(&self, bounds: &Rect) -> Rect {
        let clamp_axis = |pos: f32, len: f32, lo: f32, span: f32| {
            if len > span {
                lo + (span - len) * 0.5
            } else {
                pos.clamp(lo, lo + span - len)
            }
        };
        Rect {
            x: clamp_axis(self.x, self.w, bounds.x, bounds.w),
            y: clamp_axis(self.y, self.h, bounds.y, bounds.h),
            w: self.w,
            h: self.h,
        }
    }

    /// Bounding box of this rectangle after rotating it by `degrees` about its centre.
    pub fn rotated_bounds(&self, degrees: f32) -> Rect {
        let (sin, cos) = degrees.to_radians().sin_cos();
        let w = (self.w * cos).abs() + (self.h * sin).abs();
        let h = (self.w * sin).abs() + (self.h * cos).abs();
        Rect::from_center(self.center(), Vec2::new(w, h))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f32 = 1e-4;

    fn approx_eq(a: f32, b: f32) -> bool {
        (a - b).abs() < EPSILON
    }

    #[test]
    fn overlap_requires_positive_area() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert!(a.overlaps(&Rect::new(5.0, 5.0, 10.0, 10.0)));
        assert!(!a.overlaps(&Rect::new(10.0, 0.0, 10.0, 10.0)));
        assert!(!a.overlaps(&Rect::new(0.0, 20.0, 5.0, 5.0)));
    }

    #[test]
    fn negative_sizes_are_normalised() {
        let a = Rect::new(10.0, 10.0, -10.0, -10.0);
        assert!(a.overlaps(&Rect::new(2.0, 2.0, 2.0, 2.0)));
    }

    #[test]
    fn contains_point_excludes_far_edges() {
        let r = Rect::new(0.0, 0.0, 4.0, 4.0);
        assert!(r.contains_point(Vec2::new(0.0, 0.0)));
        assert!(r.contains_point(Vec2::new(3.9, 3.9)));
        assert!(!r.contains_point(Vec2::new(4.0, 1.0)));
    }

    #[test]
    fn clamp_pulls_rect_back_inside() {
        let bounds = Rect::new(0.0, 0.0, 100.0, 100.0);
        let r = Rect::new(95.0, -5.0, 10.0, 10.0).clamped_inside(&bounds);
        assert!(approx_eq(r.x, 90.0));
        assert!(approx_eq(r.y, 0.0));
    }

    #[test]
    fn rotated_bounds_keep_center() {
        let r = Rect::new(10.0, 20.0, 40.0, 20.0);
        let rotated = r.rotated_bounds(90.0);
        assert!(approx_eq(rotated.center().x, r.center().x));
        assert!(approx_eq(rotated.center().y, r.center().y));
        assert!(approx_eq(rotated.w, 20.0));
        assert!(approx_eq(rotated.h, 40.0));
    }

    #[test]
    fn rotated_bounds_grow_at_45_degrees() {
        let r = Rect::new(0.0, 0.0, 10.0, 10.0);
        let rotated = r.rotated_bounds(45.0);
        assert!(approx_eq(rotated.w, 10.0 * 2f32.sqrt()));
    }
}
