//! Game state and core simulation types
//!
//! One owned [`World`] holds every entity collection; [`GameState`] wraps it
//! with the session phase, tunables, leaderboard and event queue. Nothing is
//! global: the host owns a `GameState` and hands it to [`tick`](super::tick).

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::director::StageState;
use super::entity::{Pickup, PickupKind, Projectile, Stone};
use super::hostile::{Hostile, Species};
use super::player::Player;
use crate::highscores::Leaderboard;
use crate::tuning::Tuning;

/// Top-level session phase. Exactly one is active per tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionState {
    /// Title screen, waiting for confirm
    Menu,
    /// Active gameplay
    Playing,
    /// Timed choreography between stages
    StageClearing,
    /// Typing a name for a leaderboard-qualifying run
    NameEntry,
    /// Run ended in death
    GameOver,
    /// Final boss defeated
    GameClear,
}

/// Things that happened during a tick, for audio/FX collaborators
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    PhaseChanged { from: SessionState, to: SessionState },
    StageStarted { stage: u32 },
    ShotFired { empowered: bool },
    HostileSpawned { species: Species },
    BossSpawned { stage: u32, hp: i32 },
    HostileKilled { species: Species, score: u64, by_shield: bool },
    StoneAbsorbed { score: u64 },
    ShieldUsed { remaining: u32 },
    PickupClaimed { kind: PickupKind },
    StageCleared { stage: u32 },
    PlayerDied { score: u64, qualifies: bool },
    GameCleared { score: u64 },
    RecordSaved { rank: Option<usize> },
}

/// Everything in play during a run
#[derive(Debug, Clone)]
pub struct World {
    pub player: Player,
    /// Player shots (insertion order)
    pub projectiles: Vec<Projectile>,
    /// Ground cats and the boss (insertion order)
    pub hostiles: Vec<Hostile>,
    /// Minor roamers, resolved separately from `hostiles`
    pub roamers: Vec<Hostile>,
    /// Boss projectiles
    pub stones: Vec<Stone>,
    pub pickups: Vec<Pickup>,
    pub stage: StageState,
    pub score: u64,
    /// Play time of the current run
    pub elapsed_ms: f64,
    pub rng: Pcg32,
    next_id: u32,
}

impl World {
    pub fn new(tuning: &Tuning, seed: u64) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let stage = StageState::new(1, tuning, &mut rng);
        Self {
            player: Player::new(tuning),
            projectiles: Vec::new(),
            hostiles: Vec::new(),
            roamers: Vec::new(),
            stones: Vec::new(),
            pickups: Vec::new(),
            stage,
            score: 0,
            elapsed_ms: 0.0,
            rng,
            next_id: 1,
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Fresh run at stage 1. The player is reset in place, not recreated.
    pub fn reset_run(&mut self, tuning: &Tuning, seed: u64) {
        self.rng = Pcg32::seed_from_u64(seed);
        self.player.reset(tuning);
        self.projectiles.clear();
        self.hostiles.clear();
        self.roamers.clear();
        self.stones.clear();
        self.pickups.clear();
        self.stage = StageState::new(1, tuning, &mut self.rng);
        self.score = 0;
        self.elapsed_ms = 0.0;
        self.next_id = 1;
    }

    /// Per-stage timers and one-shot flags start over; the player returns to
    /// the start line. Pickups already in flight stay.
    pub fn begin_stage(&mut self, stage: u32, tuning: &Tuning) {
        self.stage = StageState::new(stage, tuning, &mut self.rng);
        self.player.respawn(tuning);
    }

    /// Drop everything hostile-to-the-choreography when a boss falls
    pub fn clear_for_stage_end(&mut self) {
        self.projectiles.clear();
        self.stones.clear();
        self.roamers.clear();
    }

    /// End-of-tick removal of everything marked dead
    pub fn sweep_dead(&mut self) {
        self.projectiles.retain(|p| p.body.alive);
        self.hostiles.retain(|h| h.body.alive);
        self.roamers.retain(|r| r.body.alive);
        self.stones.retain(|s| s.body.alive);
        self.pickups.retain(|p| p.body.alive);
    }

    pub fn boss(&self) -> Option<&Hostile> {
        self.hostiles.iter().find(|h| h.is_boss() && h.body.alive)
    }

    pub fn live_ground_hostiles(&self) -> usize {
        self.hostiles
            .iter()
            .filter(|h| h.body.alive && !h.is_boss())
            .count()
    }

    pub fn elapsed_seconds(&self) -> f64 {
        self.elapsed_ms / 1000.0
    }
}

/// Progress through the stage-clear choreography
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ClearingState {
    pub elapsed_ms: f32,
    pub jumps_done: u32,
}

/// Complete session state
#[derive(Debug, Clone)]
pub struct GameState {
    pub tuning: Tuning,
    /// Base seed; run `n` is seeded with `seed + n`
    pub seed: u64,
    /// Runs started so far
    pub run_index: u64,
    /// Current phase
    pub phase: SessionState,
    pub world: World,
    /// Ranked records as last loaded from the store
    pub leaderboard: Leaderboard,
    /// Name typed during NameEntry
    pub name_buffer: String,
    pub clearing: ClearingState,
    /// Simulation tick counter
    pub time_ticks: u64,
    events: Vec<GameEvent>,
}

impl GameState {
    /// A session sitting in the menu with an empty leaderboard.
    ///
    /// Use [`session::boot`](super::session::boot) to also load the
    /// leaderboard from a store.
    pub fn new(tuning: Tuning, seed: u64) -> Self {
        let world = World::new(&tuning, seed);
        Self {
            tuning,
            seed,
            run_index: 0,
            phase: SessionState::Menu,
            world,
            leaderboard: Leaderboard::new(),
            name_buffer: String::new(),
            clearing: ClearingState::default(),
            time_ticks: 0,
            events: Vec::new(),
        }
    }

    pub fn push_event(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    pub fn extend_events(&mut self, events: impl IntoIterator<Item = GameEvent>) {
        self.events.extend(events);
    }

    pub fn events(&self) -> &[GameEvent] {
        &self.events
    }

    /// Take all events since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn stage(&self) -> u32 {
        self.world.stage.stage
    }

    pub fn score(&self) -> u64 {
        self.world.score
    }

    pub fn elapsed_seconds(&self) -> f64 {
        self.world.elapsed_seconds()
    }

    /// Hostiles still standing between the player and the boss
    pub fn stage_progress(&self) -> u32 {
        let unspawned = self
            .world
            .stage
            .total_for_stage
            .saturating_sub(self.world.stage.spawned);
        unspawned + self.world.live_ground_hostiles() as u32
    }

    /// Boss HP in `[0, 1]`, if a boss is on the field
    pub fn boss_hp_fraction(&self) -> Option<f32> {
        self.world.boss().map(|b| b.hp_fraction())
    }
}
