//! Render interface
//!
//! The simulation never draws. After each tick the host asks for a
//! [`RenderSnapshot`]: a flat list of tagged rectangles plus HUD scalars,
//! copied out of [`GameState`] so drawing can't observe a half-updated world.

use glam::Vec2;
use serde::Serialize;

use crate::highscores::ScoreRecord;
use crate::sim::{GameState, PickupKind, SessionState, Species};

/// Which art to use for a sprite
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SpriteTag {
    Player,
    /// Companion drawn over the player while shielded
    ShieldOverlay,
    Projectile,
    EmpoweredProjectile,
    WeakGround,
    MediumGround,
    StrongGround,
    MinorRoamer,
    Boss,
    Stone,
    PowerUp,
    ShieldItem,
}

impl From<Species> for SpriteTag {
    fn from(species: Species) -> Self {
        match species {
            Species::WeakGround => SpriteTag::WeakGround,
            Species::MediumGround => SpriteTag::MediumGround,
            Species::StrongGround => SpriteTag::StrongGround,
            Species::MinorRoamer => SpriteTag::MinorRoamer,
            Species::Boss => SpriteTag::Boss,
        }
    }
}

impl From<PickupKind> for SpriteTag {
    fn from(kind: PickupKind) -> Self {
        match kind {
            PickupKind::PowerUp => SpriteTag::PowerUp,
            PickupKind::ShieldItem => SpriteTag::ShieldItem,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Sprite {
    /// Top-left corner
    pub pos: Vec2,
    pub size: Vec2,
    pub tag: SpriteTag,
}

/// UI scalars
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Hud {
    pub phase: SessionState,
    pub stage: u32,
    pub score: u64,
    pub elapsed_seconds: f64,
    pub boss_hp_fraction: Option<f32>,
    pub shield_count: u32,
    pub power_shots: u32,
    /// Hostiles left before the boss shows up
    pub remaining_hostiles: u32,
    pub name_buffer: String,
    pub leaderboard: Vec<ScoreRecord>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderSnapshot {
    /// Back-to-front draw order
    pub sprites: Vec<Sprite>,
    pub hud: Hud,
}

/// Copy everything drawable out of `state`.
///
/// The menu shows no sprites; every other phase shows the live world.
pub fn snapshot(state: &GameState) -> RenderSnapshot {
    let world = &state.world;
    let mut sprites = Vec::new();

    if state.phase != SessionState::Menu {
        let mut push = |pos: Vec2, size: Vec2, tag: SpriteTag| {
            sprites.push(Sprite { pos, size, tag });
        };

        for item in world.pickups.iter().filter(|p| p.body.alive) {
            push(item.body.pos, item.body.size, item.kind.into());
        }
        for hostile in world
            .hostiles
            .iter()
            .chain(world.roamers.iter())
            .filter(|h| h.body.alive)
        {
            push(hostile.body.pos, hostile.body.size, hostile.species().into());
        }
        for stone in world.stones.iter().filter(|s| s.body.alive) {
            push(stone.body.pos, stone.body.size, SpriteTag::Stone);
        }
        for shot in world.projectiles.iter().filter(|p| p.body.alive) {
            let tag = if shot.is_empowered() {
                SpriteTag::EmpoweredProjectile
            } else {
                SpriteTag::Projectile
            };
            push(shot.body.pos, shot.body.size, tag);
        }

        let player = &world.player;
        push(player.body.pos, player.body.size, SpriteTag::Player);
        if player.is_shielded() {
            push(player.body.pos, player.body.size, SpriteTag::ShieldOverlay);
        }
    }

    let hud = Hud {
        phase: state.phase,
        stage: state.stage(),
        score: state.score(),
        elapsed_seconds: state.elapsed_seconds(),
        boss_hp_fraction: state.boss_hp_fraction(),
        shield_count: world.player.shield_count,
        power_shots: world.player.power_shots,
        remaining_hostiles: state.stage_progress(),
        name_buffer: state.name_buffer.clone(),
        leaderboard: state.leaderboard.records().to_vec(),
    };

    RenderSnapshot { sprites, hud }
}
