//! Common entity body and the simple movers: projectiles, stones, pickups
//!
//! Entities are never removed while a collection is being iterated. Anything
//! that dies mid-tick only clears `alive`; the tick sweeps dead entities out
//! at the very end.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::Rect;
use crate::tuning::Tuning;

/// Position, size, velocity and liveness shared by every entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Body {
    /// Top-left corner
    pub pos: Vec2,
    pub size: Vec2,
    /// Pixels per tick
    pub vel: Vec2,
    pub alive: bool,
}

impl Body {
    pub fn new(pos: Vec2, size: Vec2) -> Self {
        Self {
            pos,
            size,
            vel: Vec2::ZERO,
            alive: true,
        }
    }

    /// Body whose bottom-centre sits at `foot`
    pub fn standing_at(foot: Vec2, size: Vec2) -> Self {
        Self::new(Vec2::new(foot.x - size.x / 2.0, foot.y - size.y), size)
    }

    /// Body centred on `center`
    pub fn centered_at(center: Vec2, size: Vec2) -> Self {
        Self::new(center - size * 0.5, size)
    }

    #[inline]
    pub fn rect(&self) -> Rect {
        Rect {
            pos: self.pos,
            size: self.size,
        }
    }

    #[inline]
    pub fn integrate(&mut self) {
        self.pos += self.vel;
    }

    pub fn kill(&mut self) {
        self.alive = false;
    }
}

/// A thrown shuriken
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Projectile {
    pub id: u32,
    pub body: Body,
    /// HP removed from the first hostile it touches
    pub damage: u32,
}

impl Projectile {
    /// Spawn centred on `origin`, flying at the tuned speed
    pub fn new(id: u32, origin: Vec2, damage: u32, tuning: &Tuning) -> Self {
        let size = Vec2::new(tuning.projectile.width, tuning.projectile.height);
        let mut body = Body::centered_at(origin, size);
        body.vel = Vec2::new(tuning.projectile.speed, 0.0);
        Self { id, body, damage }
    }

    pub fn is_empowered(&self) -> bool {
        self.damage > 1
    }

    /// Move; expire once fully past either side of the playfield
    pub fn update(&mut self, playfield_width: f32) {
        self.body.integrate();
        let rect = self.body.rect();
        if rect.left() > playfield_width || rect.right() < 0.0 {
            self.body.kill();
        }
    }
}

/// Boss projectile with its own gravity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Stone {
    pub id: u32,
    pub body: Body,
    pub gravity: f32,
}

impl Stone {
    pub fn new(id: u32, center: Vec2, vel: Vec2, tuning: &Tuning) -> Self {
        let diameter = tuning.stone.radius * 2.0;
        let mut body = Body::centered_at(center, Vec2::splat(diameter));
        body.vel = vel;
        Self {
            id,
            body,
            gravity: tuning.stone.gravity,
        }
    }

    /// Fall and fly; gone as soon as it leaves the playfield on any side
    pub fn update(&mut self, width: f32, height: f32) {
        self.body.vel.y += self.gravity;
        self.body.integrate();
        if self.body.rect().is_outside(width, height) {
            self.body.kill();
        }
    }
}

/// Pickup types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PickupKind {
    /// Snack: grants empowered shots
    PowerUp,
    /// Puppy companion: absorbs one fatal hit
    ShieldItem,
}

/// A pickup entity drifting left across the playfield
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pickup {
    pub id: u32,
    pub kind: PickupKind,
    pub body: Body,
}

impl Pickup {
    /// Spawn just past the right edge, floating above the ground
    pub fn new(id: u32, kind: PickupKind, tuning: &Tuning) -> Self {
        let side = match kind {
            PickupKind::PowerUp => tuning.pickups.power_up_size,
            PickupKind::ShieldItem => tuning.pickups.shield_size,
        };
        let center = Vec2::new(
            tuning.playfield.width + tuning.stage.spawn_margin,
            tuning.playfield.ground_y() - tuning.pickups.float_height,
        );
        let mut body = Body::centered_at(center, Vec2::splat(side));
        body.vel = Vec2::new(-tuning.pickups.drift_speed, 0.0);
        Self { id, kind, body }
    }

    pub fn update(&mut self) {
        self.body.integrate();
        if self.body.rect().right() < 0.0 {
            self.body.kill();
        }
    }
}
