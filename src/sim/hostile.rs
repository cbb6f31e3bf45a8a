//! Hostiles: ground cats, roamers and the stage boss
//!
//! One struct, one tagged behavior enum. Anything that needs to know "what
//! kind of enemy is this" matches on [`HostileKind`] or its [`Species`] tag.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::entity::Body;
use crate::tuning::{GroundTuning, Tuning};

/// Plain species tag (no per-instance data)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Species {
    WeakGround,
    MediumGround,
    StrongGround,
    MinorRoamer,
    Boss,
}

/// The walking cats a wave is drawn from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GroundSpecies {
    Weak,
    Medium,
    Strong,
}

impl GroundSpecies {
    pub const ALL: [GroundSpecies; 3] = [
        GroundSpecies::Weak,
        GroundSpecies::Medium,
        GroundSpecies::Strong,
    ];

    pub fn tuning(self, tuning: &Tuning) -> &GroundTuning {
        match self {
            GroundSpecies::Weak => &tuning.weak,
            GroundSpecies::Medium => &tuning.medium,
            GroundSpecies::Strong => &tuning.strong,
        }
    }
}

impl From<GroundSpecies> for Species {
    fn from(ground: GroundSpecies) -> Self {
        match ground {
            GroundSpecies::Weak => Species::WeakGround,
            GroundSpecies::Medium => Species::MediumGround,
            GroundSpecies::Strong => Species::StrongGround,
        }
    }
}

impl Species {
    /// `None` for roamers and the boss
    pub fn ground(self) -> Option<GroundSpecies> {
        match self {
            Species::WeakGround => Some(GroundSpecies::Weak),
            Species::MediumGround => Some(GroundSpecies::Medium),
            Species::StrongGround => Some(GroundSpecies::Strong),
            Species::MinorRoamer | Species::Boss => None,
        }
    }

    pub fn is_boss(self) -> bool {
        self == Species::Boss
    }

    /// Score awarded for a kill
    pub fn score(self, tuning: &Tuning) -> u64 {
        match self {
            Species::WeakGround => tuning.weak.score,
            Species::MediumGround => tuning.medium.score,
            Species::StrongGround => tuning.strong.score,
            Species::MinorRoamer => tuning.roamer.score,
            Species::Boss => tuning.boss.score,
        }
    }

    pub fn size(self, tuning: &Tuning) -> Vec2 {
        if let Some(ground) = self.ground() {
            let g = ground.tuning(tuning);
            return Vec2::new(g.width, g.height);
        }
        if self.is_boss() {
            Vec2::new(tuning.boss.width, tuning.boss.height)
        } else {
            Vec2::new(tuning.roamer.width, tuning.roamer.height)
        }
    }
}

/// Boss HP at `stage`: `base * 2^(stage-1)`, saturating at `i32::MAX`.
pub fn boss_hp(base: u32, stage: u32) -> i32 {
    let shift = stage.max(1) - 1;
    if shift >= 32 {
        return i32::MAX;
    }
    let hp = (base as i64) << shift;
    hp.min(i32::MAX as i64) as i32
}

/// Starting HP of `species` at `stage` (stages count from 1).
///
/// Non-decreasing in `stage` and a pure function of its inputs.
pub fn hp_for(species: Species, stage: u32, tuning: &Tuning) -> i32 {
    let steps = stage.max(1) as u64 - 1;
    let linear = |base: u32, per_stage: u32| -> i32 {
        let hp = base as u64 + per_stage as u64 * steps;
        hp.min(i32::MAX as u64) as i32
    };
    if let Some(ground) = species.ground() {
        let g = ground.tuning(tuning);
        return linear(g.base_hp, g.hp_per_stage);
    }
    if species.is_boss() {
        boss_hp(tuning.boss.base_hp, stage)
    } else {
        linear(tuning.roamer.base_hp, tuning.roamer.hp_per_stage)
    }
}

/// Boss behavior phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BossPhase {
    /// Just arrived; neither timer runs yet
    Idle,
    /// Standing at the anchor, throwing stones
    Attacking,
    /// Charging left; still throwing stones
    Dashing,
}

/// Boss timers. Attack and movement counters advance independently every tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BossBrain {
    pub phase: BossPhase,
    /// Top-left position the boss returns to after a dash
    pub anchor: Vec2,
    pub entry_ms: f32,
    pub attack_timer_ms: f32,
    pub move_timer_ms: f32,
    /// Randomized wait before the next dash
    pub next_dash_ms: f32,
}

/// A stone the boss wants spawned this tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StoneThrow {
    pub center: Vec2,
    pub vel: Vec2,
}

/// Per-variant behavior data
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum HostileKind {
    WeakGround,
    MediumGround,
    /// Hops at a fixed interval
    StrongGround { hop_timer_ms: f32, vel_y: f32 },
    MinorRoamer,
    Boss(BossBrain),
}

impl HostileKind {
    pub fn species(&self) -> Species {
        match self {
            HostileKind::WeakGround => Species::WeakGround,
            HostileKind::MediumGround => Species::MediumGround,
            HostileKind::StrongGround { .. } => Species::StrongGround,
            HostileKind::MinorRoamer => Species::MinorRoamer,
            HostileKind::Boss(_) => Species::Boss,
        }
    }
}

/// An enemy entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Hostile {
    pub id: u32,
    pub body: Body,
    pub hp: i32,
    pub max_hp: i32,
    pub kind: HostileKind,
}

impl Hostile {
    /// A ground cat entering from the right edge
    pub fn ground(id: u32, ground: GroundSpecies, stage: u32, tuning: &Tuning) -> Self {
        let kind = match ground {
            GroundSpecies::Weak => HostileKind::WeakGround,
            GroundSpecies::Medium => HostileKind::MediumGround,
            GroundSpecies::Strong => HostileKind::StrongGround {
                hop_timer_ms: 0.0,
                vel_y: 0.0,
            },
        };
        let species = Species::from(ground);
        let foot = Vec2::new(
            tuning.playfield.width + tuning.stage.spawn_margin,
            tuning.playfield.ground_y(),
        );
        let body = Body::standing_at(foot, species.size(tuning));
        Self::with_body(id, body, species, stage, kind, tuning)
    }

    /// A roamer flying in from the right at `altitude` (top edge)
    pub fn roamer(id: u32, altitude: f32, stage: u32, tuning: &Tuning) -> Self {
        let size = Species::MinorRoamer.size(tuning);
        let body = Body::new(
            Vec2::new(tuning.playfield.width + tuning.stage.spawn_margin, altitude),
            size,
        );
        Self::with_body(
            id,
            body,
            Species::MinorRoamer,
            stage,
            HostileKind::MinorRoamer,
            tuning,
        )
    }

    /// The stage boss, standing at its anchor
    pub fn boss(id: u32, stage: u32, first_dash_ms: f32, tuning: &Tuning) -> Self {
        let foot = Vec2::new(
            tuning.playfield.width - tuning.boss.anchor_offset,
            tuning.playfield.ground_y(),
        );
        let body = Body::standing_at(foot, Species::Boss.size(tuning));
        let brain = BossBrain {
            phase: BossPhase::Idle,
            anchor: body.pos,
            entry_ms: 0.0,
            attack_timer_ms: 0.0,
            move_timer_ms: 0.0,
            next_dash_ms: first_dash_ms,
        };
        Self::with_body(id, body, Species::Boss, stage, HostileKind::Boss(brain), tuning)
    }

    fn with_body(
        id: u32,
        body: Body,
        species: Species,
        stage: u32,
        kind: HostileKind,
        tuning: &Tuning,
    ) -> Self {
        let hp = hp_for(species, stage, tuning);
        Self {
            id,
            body,
            hp,
            max_hp: hp,
            kind,
        }
    }

    pub fn species(&self) -> Species {
        self.kind.species()
    }

    pub fn is_boss(&self) -> bool {
        matches!(self.kind, HostileKind::Boss(_))
    }

    pub fn boss_brain(&self) -> Option<&BossBrain> {
        match &self.kind {
            HostileKind::Boss(brain) => Some(brain),
            _ => None,
        }
    }

    pub fn hp_fraction(&self) -> f32 {
        if self.max_hp <= 0 {
            0.0
        } else {
            (self.hp.max(0) as f32 / self.max_hp as f32).clamp(0.0, 1.0)
        }
    }

    /// Subtract `damage`, clamping at zero. Returns true only on the hit that
    /// kills, so a kill can never be counted twice.
    pub fn apply_damage(&mut self, damage: u32) -> bool {
        if !self.body.alive {
            return false;
        }
        let damage = damage.min(i32::MAX as u32) as i32;
        self.hp = self.hp.saturating_sub(damage).max(0);
        if self.hp == 0 {
            self.body.kill();
            true
        } else {
            false
        }
    }

    /// Advance one tick. Walkers and roamers that leave past the left edge
    /// die without scoring. The boss may ask for a stone.
    pub fn update<R: Rng + ?Sized>(
        &mut self,
        dt_ms: f32,
        tuning: &Tuning,
        rng: &mut R,
    ) -> Option<StoneThrow> {
        let ground_y = tuning.playfield.ground_y();
        match &mut self.kind {
            HostileKind::WeakGround => {
                self.body.pos.x -= tuning.weak.speed;
            }
            HostileKind::MediumGround => {
                self.body.pos.x -= tuning.medium.speed;
            }
            HostileKind::StrongGround {
                hop_timer_ms,
                vel_y,
            } => {
                let strong = &tuning.strong;
                let on_ground = self.body.pos.y + self.body.size.y >= ground_y;
                *hop_timer_ms += dt_ms;
                let hop_due =
                    strong.hop_interval_ms > 0.0 && *hop_timer_ms >= strong.hop_interval_ms;
                if on_ground && hop_due {
                    *hop_timer_ms = 0.0;
                    *vel_y = strong.hop_velocity;
                }
                *vel_y += strong.hop_gravity;
                self.body.pos.y += *vel_y;
                if self.body.pos.y + self.body.size.y >= ground_y {
                    self.body.pos.y = ground_y - self.body.size.y;
                    *vel_y = 0.0;
                }
                self.body.pos.x -= strong.speed;
            }
            HostileKind::MinorRoamer => {
                self.body.pos.x -= tuning.roamer.speed;
            }
            HostileKind::Boss(brain) => {
                return update_boss(&mut self.body, brain, dt_ms, tuning, rng);
            }
        }
        if self.body.rect().right() < 0.0 {
            self.body.kill();
        }
        None
    }
}

fn update_boss<R: Rng + ?Sized>(
    body: &mut Body,
    brain: &mut BossBrain,
    dt_ms: f32,
    tuning: &Tuning,
    rng: &mut R,
) -> Option<StoneThrow> {
    let boss = &tuning.boss;

    if brain.phase == BossPhase::Idle {
        brain.entry_ms += dt_ms;
        if brain.entry_ms >= boss.entry_delay_ms {
            brain.phase = BossPhase::Attacking;
            log::debug!("Boss engages");
        }
        return None;
    }

    // Attack timer: independent of movement
    brain.attack_timer_ms += dt_ms;
    let throw = if brain.attack_timer_ms >= boss.stone_cooldown_ms {
        brain.attack_timer_ms = 0.0;
        let rect = body.rect();
        let center = Vec2::new(
            rect.center().x + tuning.stone.spawn_offset_x,
            rect.bottom() + tuning.stone.spawn_offset_y,
        );
        let vel = Vec2::new(
            -tuning.stone.speed.sample(rng),
            tuning.stone.drop_speed.sample(rng),
        );
        Some(StoneThrow { center, vel })
    } else {
        None
    };

    // Movement timer
    if brain.phase == BossPhase::Dashing {
        body.pos.x -= boss.dash_speed;
        if body.rect().right() < 0.0 {
            body.pos = brain.anchor;
            brain.phase = BossPhase::Attacking;
        }
    } else {
        brain.move_timer_ms += dt_ms;
        if brain.move_timer_ms >= brain.next_dash_ms {
            brain.move_timer_ms = 0.0;
            brain.next_dash_ms = boss.dash_interval_ms.sample(rng);
            brain.phase = BossPhase::Dashing;
        }
    }

    throw
}
