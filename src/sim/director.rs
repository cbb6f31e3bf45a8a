//! Stage director: spawn scheduling and the boss trigger
//!
//! Each feature owns an accumulating timer and a target interval. When a timer
//! reaches its target it fires, resets to zero and, for randomized features,
//! draws a fresh target. Features never share a timer.

use rand::Rng;
use rand::seq::IndexedRandom;

use super::entity::{Pickup, PickupKind};
use super::hostile::{GroundSpecies, Hostile, Species};
use super::state::{GameEvent, World};
use crate::tuning::Tuning;

/// Per-stage counters, timers and one-shot flags
#[derive(Debug, Clone, PartialEq)]
pub struct StageState {
    /// 1..=max_stage
    pub stage: u32,
    pub spawned: u32,
    pub total_for_stage: u32,
    pub boss_spawned: bool,
    pub hostile_timer_ms: f32,
    pub next_hostile_ms: f32,
    pub roamer_timer_ms: f32,
    pub next_roamer_ms: f32,
    pub power_up_timer_ms: f32,
    /// The power-up appears once per stage
    pub power_up_spawned: bool,
    pub shield_timer_ms: f32,
    pub next_shield_ms: f32,
}

impl StageState {
    pub fn new<R: Rng + ?Sized>(stage: u32, tuning: &Tuning, rng: &mut R) -> Self {
        Self {
            stage,
            spawned: 0,
            total_for_stage: tuning.stage.hostiles_per_stage,
            boss_spawned: false,
            hostile_timer_ms: 0.0,
            next_hostile_ms: tuning.stage.hostile_spawn_interval_ms.sample(rng),
            roamer_timer_ms: 0.0,
            next_roamer_ms: tuning.roamer.spawn_interval_ms.sample(rng),
            power_up_timer_ms: 0.0,
            power_up_spawned: false,
            shield_timer_ms: 0.0,
            next_shield_ms: tuning.pickups.shield_interval_ms.sample(rng),
        }
    }

    pub fn wave_exhausted(&self) -> bool {
        self.spawned >= self.total_for_stage
    }

    pub fn is_final(&self, tuning: &Tuning) -> bool {
        self.stage >= tuning.stage.max_stage
    }
}

/// Advance every spawn timer by `dt_ms` and create whatever is due.
pub fn advance(world: &mut World, tuning: &Tuning, dt_ms: f32, events: &mut Vec<GameEvent>) {
    spawn_hostiles(world, tuning, dt_ms, events);
    spawn_boss_if_due(world, tuning, events);
    spawn_roamers(world, tuning, dt_ms);
    spawn_power_up(world, tuning, dt_ms);
    spawn_shield_item(world, tuning, dt_ms);
}

fn spawn_hostiles(world: &mut World, tuning: &Tuning, dt_ms: f32, events: &mut Vec<GameEvent>) {
    if world.stage.wave_exhausted() || world.stage.boss_spawned {
        return;
    }
    world.stage.hostile_timer_ms += dt_ms;
    if world.stage.hostile_timer_ms < world.stage.next_hostile_ms {
        return;
    }
    world.stage.hostile_timer_ms = 0.0;
    world.stage.next_hostile_ms = tuning.stage.hostile_spawn_interval_ms.sample(&mut world.rng);

    let ground = *GroundSpecies::ALL
        .choose(&mut world.rng)
        .unwrap_or(&GroundSpecies::Weak);
    let species = Species::from(ground);
    let id = world.next_entity_id();
    world
        .hostiles
        .push(Hostile::ground(id, ground, world.stage.stage, tuning));
    world.stage.spawned += 1;
    log::debug!(
        "Spawned {:?} ({}/{})",
        species,
        world.stage.spawned,
        world.stage.total_for_stage
    );
    events.push(GameEvent::HostileSpawned { species });
}

/// The boss comes out once per stage, after the whole wave has spawned and
/// no enemy, roamers included, is left standing.
fn spawn_boss_if_due(world: &mut World, tuning: &Tuning, events: &mut Vec<GameEvent>) {
    if world.stage.boss_spawned
        || !world.stage.wave_exhausted()
        || world.hostiles.iter().any(|h| h.body.alive)
        || world.roamers.iter().any(|r| r.body.alive)
    {
        return;
    }
    let first_dash = tuning.boss.dash_interval_ms.sample(&mut world.rng);
    let id = world.next_entity_id();
    let boss = Hostile::boss(id, world.stage.stage, first_dash, tuning);
    let hp = boss.hp;
    world.hostiles.push(boss);
    world.stage.boss_spawned = true;
    log::info!("Stage {} boss spawned with {} HP", world.stage.stage, hp);
    events.push(GameEvent::BossSpawned {
        stage: world.stage.stage,
        hp,
    });
}

fn spawn_roamers(world: &mut World, tuning: &Tuning, dt_ms: f32) {
    world.stage.roamer_timer_ms += dt_ms;
    if world.stage.roamer_timer_ms < world.stage.next_roamer_ms {
        return;
    }
    world.stage.roamer_timer_ms = 0.0;
    world.stage.next_roamer_ms = tuning.roamer.spawn_interval_ms.sample(&mut world.rng);
    let altitude = tuning.roamer.altitude.sample(&mut world.rng);
    let id = world.next_entity_id();
    world
        .roamers
        .push(Hostile::roamer(id, altitude, world.stage.stage, tuning));
}

fn spawn_power_up(world: &mut World, tuning: &Tuning, dt_ms: f32) {
    if world.stage.power_up_spawned {
        return;
    }
    world.stage.power_up_timer_ms += dt_ms;
    if world.stage.power_up_timer_ms < tuning.pickups.power_up_delay_ms {
        return;
    }
    world.stage.power_up_spawned = true;
    let id = world.next_entity_id();
    world
        .pickups
        .push(Pickup::new(id, PickupKind::PowerUp, tuning));
}

fn spawn_shield_item(world: &mut World, tuning: &Tuning, dt_ms: f32) {
    world.stage.shield_timer_ms += dt_ms;
    if world.stage.shield_timer_ms < world.stage.next_shield_ms {
        return;
    }
    world.stage.shield_timer_ms = 0.0;
    world.stage.next_shield_ms = tuning.pickups.shield_interval_ms.sample(&mut world.rng);
    let id = world.next_entity_id();
    world
        .pickups
        .push(Pickup::new(id, PickupKind::ShieldItem, tuning));
}
