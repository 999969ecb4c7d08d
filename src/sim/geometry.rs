//! Axis-aligned collision primitives
//!
//! Everything in the level collides as either a rectangle (tiles, player,
//! enemies, blasts) or a circle (orbs).

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::bottom_center_to_top_left;

/// Axis-aligned rectangle in world units (y grows downward)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(left: f32, top: f32, width: f32, height: f32) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    /// Rectangle of `size` whose bottom edge is centered on `anchor`
    pub fn from_bottom_center(anchor: Vec2, size: Vec2) -> Self {
        let corner = bottom_center_to_top_left(anchor, size);
        Self::new(corner.x, corner.y, size.x, size.y)
    }

    /// Rectangle of `size` centered on `center`
    pub fn from_center(center: Vec2, size: Vec2) -> Self {
        Self::new(center.x - size.x / 2.0, center.y - size.y / 2.0, size.x, size.y)
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.left + self.width
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.top + self.height
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.left + self.width / 2.0, self.top + self.height / 2.0)
    }

    #[inline]
    pub fn bottom_center(&self) -> Vec2 {
        Vec2::new(self.left + self.width / 2.0, self.bottom())
    }

    /// Overlap with positive area (touching edges do not count)
    pub fn intersects(&self, other: &Rect) -> bool {
        self.left < other.right()
            && other.left < self.right()
            && self.top < other.bottom()
            && other.top < self.bottom()
    }

    /// Width and height of the intersection, `None` if there is none
    pub fn overlap(&self, other: &Rect) -> Option<Vec2> {
        let w = self.right().min(other.right()) - self.left.max(other.left);
        let h = self.bottom().min(other.bottom()) - self.top.max(other.top);
        (w > 0.0 && h > 0.0).then_some(Vec2::new(w, h))
    }

    /// Half-open containment: left/top edges inside, right/bottom outside
    pub fn contains(&self, point: Vec2) -> bool {
        point.x >= self.left && point.x < self.right() && point.y >= self.top && point.y < self.bottom()
    }

    /// Nearest point of the rectangle to `point`
    pub fn clamp_point(&self, point: Vec2) -> Vec2 {
        Vec2::new(
            point.x.clamp(self.left, self.right()),
            point.y.clamp(self.top, self.bottom()),
        )
    }
}

/// Bounding circle
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Circle {
    pub center: Vec2,
    pub radius: f32,
}

impl Circle {
    pub fn new(center: Vec2, radius: f32) -> Self {
        Self { center, radius }
    }

    /// Circle vs rectangle via the rectangle's closest point
    pub fn intersects_rect(&self, rect: &Rect) -> bool {
        let nearest = rect.clamp_point(self.center);
        nearest.distance_squared(self.center) < self.radius * self.radius
    }
}
