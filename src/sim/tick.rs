//! Fixed timestep simulation tick
//!
//! One call = one tick: read intents, run exactly one phase's update, resolve,
//! sweep. The host renders afterwards from a [`crate::render`] snapshot.

use super::combat;
use super::director;
use super::entity::{Projectile, Stone};
use super::player::{MoveIntent, ShotTier};
use super::session;
use super::state::{GameEvent, GameState, SessionState};
use crate::persistence::ScoreStore;

/// Input intents for a single tick (deterministic)
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickInput {
    pub left: bool,
    pub right: bool,
    pub jump: bool,
    /// Throw a shuriken (the host sends this once per press)
    pub fire: bool,
    /// Start / restart / accept a typed name
    pub confirm: bool,
    /// Leave GameOver or GameClear for the menu
    pub back_to_menu: bool,
    /// Character typed this tick (NameEntry only)
    pub text: Option<char>,
    pub backspace: bool,
}

impl TickInput {
    fn movement(&self) -> MoveIntent {
        MoveIntent {
            left: self.left,
            right: self.right,
            jump: self.jump,
        }
    }
}

/// Advance the session by one tick of `dt_ms` milliseconds.
///
/// `store` is only touched on phase transitions that need the leaderboard.
pub fn tick(state: &mut GameState, input: &TickInput, dt_ms: f32, store: &mut dyn ScoreStore) {
    state.time_ticks += 1;

    match state.phase {
        SessionState::Menu => {
            if input.confirm {
                session::start_run(state);
            }
        }
        SessionState::Playing => update_playing(state, input, dt_ms, store),
        SessionState::StageClearing => session::update_stage_clearing(state, dt_ms),
        SessionState::NameEntry => session::update_name_entry(state, input, store),
        SessionState::GameOver | SessionState::GameClear => {
            if input.confirm {
                session::start_run(state);
            } else if input.back_to_menu {
                session::enter_menu(state, store);
            }
        }
    }
}

fn update_playing(
    state: &mut GameState,
    input: &TickInput,
    dt_ms: f32,
    store: &mut dyn ScoreStore,
) {
    let mut events = Vec::new();
    let GameState { tuning, world, .. } = state;

    world.elapsed_ms += dt_ms as f64;

    // Spawning
    director::advance(world, tuning, dt_ms, &mut events);

    // Player
    world.player.apply_intent(input.movement(), tuning);
    if input.fire && world.player.alive {
        let tier = world.player.fire();
        let damage = match tier {
            ShotTier::Standard => 1,
            ShotTier::Empowered => tuning.player.power_damage,
        };
        let id = world.next_entity_id();
        let origin = world.player.muzzle();
        world
            .projectiles
            .push(Projectile::new(id, origin, damage, tuning));
        events.push(GameEvent::ShotFired {
            empowered: tier == ShotTier::Empowered,
        });
    }

    // Movement
    let width = tuning.playfield.width;
    let height = tuning.playfield.height;
    for shot in world.projectiles.iter_mut() {
        shot.update(width);
    }
    let mut throws = Vec::new();
    for hostile in world
        .hostiles
        .iter_mut()
        .chain(world.roamers.iter_mut())
        .filter(|h| h.body.alive)
    {
        if let Some(throw) = hostile.update(dt_ms, tuning, &mut world.rng) {
            throws.push(throw);
        }
    }
    for stone in world.stones.iter_mut() {
        stone.update(width, height);
    }
    for item in world.pickups.iter_mut() {
        item.update();
    }
    for throw in throws {
        let id = world.next_entity_id();
        world
            .stones
            .push(Stone::new(id, throw.center, throw.vel, tuning));
    }

    // Collisions, then removal
    let outcome = combat::resolve(world, tuning, &mut events);
    world.sweep_dead();
    state.extend_events(events);

    // Death wins if both happen on the same tick.
    if outcome.player_died {
        session::on_player_death(state, store);
    } else if outcome.boss_defeated {
        session::on_boss_defeated(state);
    }
}
