//! Axis-aligned box geometry
//!
//! Screen coordinates: origin top-left, +y points down. Every entity is a
//! box; overlap is strict, so boxes that merely share an edge do not touch.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// An axis-aligned bounding box given by its top-left corner and size
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub pos: Vec2,
    pub size: Vec2,
}

impl Rect {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self {
            pos: Vec2::new(x, y),
            size: Vec2::new(w, h),
        }
    }

    #[inline]
    pub fn left(&self) -> f32 {
        self.pos.x
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.pos.x + self.size.x
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.pos.y
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.pos.y + self.size.y
    }

    pub fn center(&self) -> Vec2 {
        self.pos + self.size * 0.5
    }

    /// Strict overlap test
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.left() < other.right()
            && other.left() < self.right()
            && self.top() < other.bottom()
            && other.top() < self.bottom()
    }

    /// Inset every edge by `margin`, never below zero size
    pub fn shrink(&self, margin: f32) -> Rect {
        let margin = margin
            .min(self.size.x / 2.0)
            .min(self.size.y / 2.0)
            .max(0.0);
        Rect {
            pos: self.pos + Vec2::splat(margin),
            size: self.size - Vec2::splat(margin * 2.0),
        }
    }

    /// True if no part of the box lies inside `[0, width] x [0, height]`
    pub fn is_outside(&self, width: f32, height: f32) -> bool {
        self.right() < 0.0 || self.left() > width || self.bottom() < 0.0 || self.top() > height
    }
}
