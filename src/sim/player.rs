//! The player-controlled ninja pup

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::Rect;
use super::entity::Body;
use crate::tuning::Tuning;

/// Movement intents the player consumes each tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MoveIntent {
    pub left: bool,
    pub right: bool,
    pub jump: bool,
}

/// What a fire action produced
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShotTier {
    Standard,
    /// Spent one empowered shot
    Empowered,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub body: Body,
    pub speed: f32,
    pub vel_y: f32,
    pub on_ground: bool,
    pub alive: bool,
    /// Remaining shield charges (0 = unshielded)
    pub shield_count: u32,
    /// Empowered projectiles remaining
    pub power_shots: u32,
}

impl Player {
    pub fn new(tuning: &Tuning) -> Self {
        let size = Vec2::new(tuning.player.width, tuning.player.height);
        let mut player = Self {
            body: Body::new(Vec2::ZERO, size),
            speed: tuning.player.speed,
            vel_y: 0.0,
            on_ground: true,
            alive: true,
            shield_count: 0,
            power_shots: 0,
        };
        player.respawn(tuning);
        player
    }

    /// Back to the start line, grounded. Keeps shield and power state.
    pub fn respawn(&mut self, tuning: &Tuning) {
        self.body.pos = Vec2::new(
            tuning.player.spawn_x,
            tuning.playfield.ground_y() - self.body.size.y,
        );
        self.vel_y = 0.0;
        self.on_ground = true;
    }

    /// Full reset for a new run
    pub fn reset(&mut self, tuning: &Tuning) {
        self.respawn(tuning);
        self.alive = true;
        self.body.alive = true;
        self.shield_count = 0;
        self.power_shots = 0;
    }

    /// Horizontally centre on the playfield (stage-clear choreography)
    pub fn recenter(&mut self, tuning: &Tuning) {
        self.body.pos.x = (tuning.playfield.width - self.body.size.x) / 2.0;
    }

    pub fn rect(&self) -> Rect {
        self.body.rect()
    }

    /// Hit-box used against hostiles: forgiving when unshielded, full when shielded
    pub fn hitbox(&self, tuning: &Tuning) -> Rect {
        if self.is_shielded() {
            self.rect()
        } else {
            self.rect().shrink(tuning.player.touch_margin)
        }
    }

    /// Fire point: right edge, vertical centre
    pub fn muzzle(&self) -> Vec2 {
        let rect = self.rect();
        Vec2::new(rect.right(), rect.center().y)
    }

    /// Consume one tick of movement intents, then integrate gravity
    pub fn apply_intent(&mut self, intent: MoveIntent, tuning: &Tuning) {
        if !self.alive {
            return;
        }
        if intent.left {
            self.body.pos.x -= self.speed;
        }
        if intent.right {
            self.body.pos.x += self.speed;
        }
        let max_x = (tuning.playfield.width - self.body.size.x).max(0.0);
        self.body.pos.x = self.body.pos.x.clamp(0.0, max_x);

        if intent.jump {
            self.jump(tuning);
        }
        self.integrate_gravity(tuning);
    }

    /// Start a jump; ignored while airborne
    pub fn jump(&mut self, tuning: &Tuning) -> bool {
        if !self.on_ground {
            return false;
        }
        self.vel_y = tuning.player.jump_velocity;
        self.on_ground = false;
        true
    }

    pub fn integrate_gravity(&mut self, tuning: &Tuning) {
        self.vel_y += tuning.player.gravity;
        self.body.pos.y += self.vel_y;
        let ground = tuning.playfield.ground_y();
        if self.body.pos.y + self.body.size.y >= ground {
            self.body.pos.y = ground - self.body.size.y;
            self.vel_y = 0.0;
            self.on_ground = true;
        }
    }

    pub fn is_shielded(&self) -> bool {
        self.shield_count > 0
    }

    /// Fill the shield to `capacity` if currently unshielded.
    ///
    /// Returns false (and changes nothing) when a shield is already up, so
    /// the caller can leave the item in play.
    pub fn acquire_shield(&mut self, capacity: u32) -> bool {
        if self.shield_count > 0 {
            return false;
        }
        self.shield_count = capacity;
        true
    }

    /// Spend one shield charge. Returns whether one was available.
    pub fn consume_shield(&mut self) -> bool {
        if self.shield_count == 0 {
            return false;
        }
        self.shield_count -= 1;
        true
    }

    /// Set empowered shots to `n` (not additive)
    pub fn grant_power(&mut self, n: u32) {
        self.power_shots = n;
    }

    /// Spend an empowered shot if any are left
    pub fn fire(&mut self) -> ShotTier {
        if self.power_shots > 0 {
            self.power_shots -= 1;
            ShotTier::Empowered
        } else {
            ShotTier::Standard
        }
    }

    pub fn die(&mut self) {
        self.alive = false;
        self.body.alive = false;
    }
}
