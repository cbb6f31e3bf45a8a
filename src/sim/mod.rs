//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - One tick per call, driven by the host's delta
//! - Seeded RNG only
//! - Stable iteration order (insertion order, removals deferred to end of tick)
//! - No rendering or platform dependencies

pub mod collision;
pub mod combat;
pub mod director;
pub mod entity;
pub mod hostile;
pub mod player;
pub mod session;
pub mod state;
pub mod tick;

pub use collision::Rect;
pub use combat::CombatOutcome;
pub use director::StageState;
pub use entity::{Body, Pickup, PickupKind, Projectile, Stone};
pub use hostile::{
    BossBrain, BossPhase, GroundSpecies, Hostile, HostileKind, Species, boss_hp, hp_for,
};
pub use player::{MoveIntent, Player, ShotTier};
pub use state::{ClearingState, GameEvent, GameState, SessionState, World};
pub use tick::{TickInput, tick};
