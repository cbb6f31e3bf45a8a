//! Collision and combat resolution
//!
//! Runs once per Playing tick, after everything has moved, in a fixed order:
//!
//! 1. projectiles vs hostiles and roamers
//! 2. player vs power-ups
//! 3. player vs shield items
//! 4. player vs hostiles, then player vs stones
//! 5. player vs roamers
//!
//! Nothing is removed here; dead entities are only flagged and the tick sweeps
//! them afterwards. Every scan walks its collection in insertion order.

use super::collision::Rect;
use super::entity::PickupKind;
use super::hostile::{Hostile, Species};
use super::state::{GameEvent, World};
use crate::tuning::Tuning;

/// What the session needs to know after resolution
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CombatOutcome {
    pub boss_defeated: bool,
    pub player_died: bool,
}

/// Result of the player touching something dangerous
enum Contact {
    /// Nothing touched the player
    Clear,
    /// Shield absorbed it
    Absorbed,
    Fatal,
}

pub fn resolve(world: &mut World, tuning: &Tuning, events: &mut Vec<GameEvent>) -> CombatOutcome {
    let mut outcome = CombatOutcome::default();

    projectiles_vs_hostiles(world, tuning, events, &mut outcome);
    player_vs_pickups(world, tuning, events);

    if world.player.alive {
        let contact = player_vs_group(world, tuning, events, &mut outcome, Group::Hostiles);
        if let Contact::Fatal = contact {
            outcome.player_died = true;
        }
    }
    if world.player.alive {
        if let Contact::Fatal = player_vs_stones(world, tuning, events) {
            outcome.player_died = true;
        }
    }
    if world.player.alive {
        let contact = player_vs_group(world, tuning, events, &mut outcome, Group::Roamers);
        if let Contact::Fatal = contact {
            outcome.player_died = true;
        }
    }

    outcome
}

fn award(
    world: &mut World,
    species: Species,
    tuning: &Tuning,
    by_shield: bool,
    events: &mut Vec<GameEvent>,
) {
    let score = species.score(tuning);
    world.score += score;
    log::debug!("{:?} down (+{}), score {}", species, score, world.score);
    events.push(GameEvent::HostileKilled {
        species,
        score,
        by_shield,
    });
}

/// Step 1: each live shot hits at most one hostile and is spent by it.
fn projectiles_vs_hostiles(
    world: &mut World,
    tuning: &Tuning,
    events: &mut Vec<GameEvent>,
    outcome: &mut CombatOutcome,
) {
    let mut kills: Vec<Species> = Vec::new();
    for shot in world.projectiles.iter_mut().filter(|p| p.body.alive) {
        let shot_rect = shot.body.rect();
        let target = world
            .hostiles
            .iter_mut()
            .chain(world.roamers.iter_mut())
            .find(|h| h.body.alive && h.body.rect().overlaps(&shot_rect));
        let Some(target) = target else {
            continue;
        };
        shot.body.kill();
        if target.apply_damage(shot.damage) {
            kills.push(target.species());
        }
    }

    for species in kills {
        award(world, species, tuning, false, events);
        if species.is_boss() {
            outcome.boss_defeated = true;
        }
    }
}

/// Steps 2 and 3. A shield item that cannot be used stays in play.
fn player_vs_pickups(world: &mut World, tuning: &Tuning, events: &mut Vec<GameEvent>) {
    if !world.player.alive {
        return;
    }
    let player_rect = world.player.rect();

    for item in world
        .pickups
        .iter_mut()
        .filter(|p| p.body.alive && p.kind == PickupKind::PowerUp)
    {
        if item.body.rect().overlaps(&player_rect) {
            item.body.kill();
            world.player.grant_power(tuning.player.power_shots_max);
            events.push(GameEvent::PickupClaimed {
                kind: PickupKind::PowerUp,
            });
        }
    }

    for item in world
        .pickups
        .iter_mut()
        .filter(|p| p.body.alive && p.kind == PickupKind::ShieldItem)
    {
        if item.body.rect().overlaps(&player_rect)
            && world.player.acquire_shield(tuning.player.shield_capacity)
        {
            item.body.kill();
            events.push(GameEvent::PickupClaimed {
                kind: PickupKind::ShieldItem,
            });
        }
    }
}

#[derive(Clone, Copy)]
enum Group {
    Hostiles,
    Roamers,
}

fn first_touching(group: &[Hostile], hitbox: &Rect) -> Option<usize> {
    group
        .iter()
        .position(|h| h.body.alive && h.body.rect().overlaps(hitbox))
}

/// Steps 4 and 5: the first overlapping enemy ends the scan. A shield
/// destroys whatever it absorbs, the boss included.
fn player_vs_group(
    world: &mut World,
    tuning: &Tuning,
    events: &mut Vec<GameEvent>,
    outcome: &mut CombatOutcome,
    group: Group,
) -> Contact {
    let hitbox = world.player.hitbox(tuning);
    let members = match group {
        Group::Hostiles => &world.hostiles,
        Group::Roamers => &world.roamers,
    };
    let Some(idx) = first_touching(members, &hitbox) else {
        return Contact::Clear;
    };

    if !world.player.consume_shield() {
        world.player.die();
        log::info!("Player hit by {:?}", members[idx].species());
        return Contact::Fatal;
    }
    events.push(GameEvent::ShieldUsed {
        remaining: world.player.shield_count,
    });

    let enemy = match group {
        Group::Hostiles => &mut world.hostiles[idx],
        Group::Roamers => &mut world.roamers[idx],
    };
    let species = enemy.species();
    enemy.hp = 0;
    enemy.body.kill();
    award(world, species, tuning, true, events);
    if species.is_boss() {
        outcome.boss_defeated = true;
    }
    Contact::Absorbed
}

/// Step 4, stone half.
fn player_vs_stones(world: &mut World, tuning: &Tuning, events: &mut Vec<GameEvent>) -> Contact {
    let hitbox = world.player.hitbox(tuning);
    let Some(stone) = world
        .stones
        .iter_mut()
        .find(|s| s.body.alive && s.body.rect().overlaps(&hitbox))
    else {
        return Contact::Clear;
    };

    if !world.player.consume_shield() {
        world.player.die();
        log::info!("Player hit by a stone");
        return Contact::Fatal;
    }
    stone.body.kill();
    world.score += tuning.stone.score;
    events.push(GameEvent::ShieldUsed {
        remaining: world.player.shield_count,
    });
    events.push(GameEvent::StoneAbsorbed {
        score: tuning.stone.score,
    });
    Contact::Absorbed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::entity::{Pickup, Projectile, Stone};
    use crate::sim::hostile::GroundSpecies;
    use glam::Vec2;

    fn setup() -> (World, Tuning) {
        let tuning = Tuning::default();
        let world = World::new(&tuning, 1);
        (world, tuning)
    }

    /// Ground cat standing right on top of the player
    fn cat_on_player(world: &mut World, tuning: &Tuning, species: GroundSpecies) -> u32 {
        let id = world.next_entity_id();
        let mut cat = Hostile::ground(id, species, 1, tuning);
        cat.body.pos.x = world.player.body.pos.x + 10.0;
        world.hostiles.push(cat);
        id
    }

    fn shot_at(world: &mut World, tuning: &Tuning, target: Vec2, damage: u32) {
        let id = world.next_entity_id();
        world
            .projectiles
            .push(Projectile::new(id, target, damage, tuning));
    }

    #[test]
    fn test_projectile_damages_first_hostile_only() {
        let (mut world, tuning) = setup();
        world.player.body.pos.x = 0.0;
        let mut a = Hostile::ground(10, GroundSpecies::Strong, 1, &tuning);
        a.body.pos.x = 400.0;
        let mut b = Hostile::ground(11, GroundSpecies::Strong, 1, &tuning);
        b.body.pos.x = 410.0;
        let center = a.body.rect().center();
        world.hostiles.push(a);
        world.hostiles.push(b);
        shot_at(&mut world, &tuning, center, 1);

        let mut events = Vec::new();
        let outcome = resolve(&mut world, &tuning, &mut events);
        assert_eq!(outcome, CombatOutcome::default());
        assert_eq!(world.hostiles[0].hp, 7);
        assert_eq!(world.hostiles[1].hp, 8);
        assert!(!world.projectiles[0].body.alive);
        assert_eq!(world.score, 0);
    }

    #[test]
    fn test_kill_scores_once_even_with_two_shots() {
        let (mut world, tuning) = setup();
        world.player.body.pos.x = 0.0;
        let mut cat = Hostile::ground(10, GroundSpecies::Weak, 1, &tuning);
        cat.body.pos.x = 400.0;
        let center = cat.body.rect().center();
        world.hostiles.push(cat);
        shot_at(&mut world, &tuning, center, 2);
        shot_at(&mut world, &tuning, center, 2);

        let mut events = Vec::new();
        resolve(&mut world, &tuning, &mut events);
        assert_eq!(world.score, tuning.weak.score);
        assert!(!world.hostiles[0].body.alive);
        assert_eq!(world.hostiles[0].hp, 0);
        // Second shot found no live target and flies on
        assert!(world.projectiles[1].body.alive);
    }

    #[test]
    fn test_boss_kill_flags_stage_clear() {
        let (mut world, tuning) = setup();
        world.player.body.pos.x = 0.0;
        let mut boss = Hostile::boss(10, 1, 1.0e9, &tuning);
        boss.hp = 1;
        let center = boss.body.rect().center();
        world.hostiles.push(boss);
        shot_at(&mut world, &tuning, center, 1);

        let mut events = Vec::new();
        let outcome = resolve(&mut world, &tuning, &mut events);
        assert!(outcome.boss_defeated);
        assert!(!outcome.player_died);
        assert_eq!(world.score, tuning.boss.score);
        assert!(events.contains(&GameEvent::HostileKilled {
            species: Species::Boss,
            score: tuning.boss.score,
            by_shield: false,
        }));
    }

    #[test]
    fn test_unshielded_contact_is_fatal() {
        let (mut world, tuning) = setup();
        cat_on_player(&mut world, &tuning, GroundSpecies::Medium);
        let mut events = Vec::new();
        let outcome = resolve(&mut world, &tuning, &mut events);
        assert!(outcome.player_died);
        assert!(!world.player.alive);
        assert!(world.hostiles[0].body.alive);
    }

    #[test]
    fn test_shielded_contact_consumes_one_and_scores() {
        let (mut world, tuning) = setup();
        world.player.acquire_shield(1);
        cat_on_player(&mut world, &tuning, GroundSpecies::Medium);
        cat_on_player(&mut world, &tuning, GroundSpecies::Weak);

        let mut events = Vec::new();
        let outcome = resolve(&mut world, &tuning, &mut events);
        assert!(!outcome.player_died);
        assert!(world.player.alive);
        assert_eq!(world.player.shield_count, 0);
        assert!(!world.hostiles[0].body.alive);
        // Scan stopped at the first hit
        assert!(world.hostiles[1].body.alive);
        assert_eq!(world.score, tuning.medium.score);

        // Next tick, the survivor is fatal
        let outcome = resolve(&mut world, &tuning, &mut events);
        assert!(outcome.player_died);
    }

    #[test]
    fn test_grazing_contact_forgiven_only_without_shield() {
        let (mut world, tuning) = setup();
        let id = world.next_entity_id();
        let mut cat = Hostile::ground(id, GroundSpecies::Weak, 1, &tuning);
        // Overlaps the full box by 5px, misses the shrunk one
        cat.body.pos.x = world.player.rect().right() - 5.0;
        world.hostiles.push(cat);

        let mut events = Vec::new();
        assert!(!resolve(&mut world, &tuning, &mut events).player_died);
        assert!(world.hostiles[0].body.alive);

        world.player.acquire_shield(1);
        resolve(&mut world, &tuning, &mut events);
        assert!(!world.hostiles[0].body.alive);
        assert_eq!(world.player.shield_count, 0);
    }

    #[test]
    fn test_stone_shield_and_death() {
        let (mut world, tuning) = setup();
        let center = world.player.rect().center();
        world
            .stones
            .push(Stone::new(50, center, Vec2::new(-5.0, 1.0), &tuning));
        world.player.acquire_shield(1);

        let mut events = Vec::new();
        assert!(!resolve(&mut world, &tuning, &mut events).player_died);
        assert!(!world.stones[0].body.alive);
        assert_eq!(world.score, tuning.stone.score);

        world
            .stones
            .push(Stone::new(51, center, Vec2::new(-5.0, 1.0), &tuning));
        assert!(resolve(&mut world, &tuning, &mut events).player_died);
    }

    #[test]
    fn test_hostile_and_stone_each_take_a_charge() {
        let (mut world, tuning) = setup();
        world.player.acquire_shield(2);
        cat_on_player(&mut world, &tuning, GroundSpecies::Weak);
        let center = world.player.rect().center();
        world
            .stones
            .push(Stone::new(50, center, Vec2::new(-5.0, 1.0), &tuning));

        let mut events = Vec::new();
        let outcome = resolve(&mut world, &tuning, &mut events);
        assert!(!outcome.player_died);
        assert_eq!(world.player.shield_count, 0);
        let used = events
            .iter()
            .filter(|e| matches!(e, GameEvent::ShieldUsed { .. }))
            .count();
        assert_eq!(used, 2);
    }

    #[test]
    fn test_shield_item_left_in_play_when_already_shielded() {
        let (mut world, tuning) = setup();
        world.player.acquire_shield(1);
        let mut item = Pickup::new(40, PickupKind::ShieldItem, &tuning);
        item.body.pos = world.player.body.pos;
        world.pickups.push(item);

        let mut events = Vec::new();
        resolve(&mut world, &tuning, &mut events);
        assert_eq!(world.player.shield_count, 1);
        assert!(world.pickups[0].body.alive);

        world.player.consume_shield();
        resolve(&mut world, &tuning, &mut events);
        assert_eq!(world.player.shield_count, 1);
        assert!(!world.pickups[0].body.alive);
    }

    #[test]
    fn test_power_up_claimed() {
        let (mut world, tuning) = setup();
        let mut item = Pickup::new(40, PickupKind::PowerUp, &tuning);
        item.body.pos = world.player.body.pos;
        world.pickups.push(item);

        let mut events = Vec::new();
        resolve(&mut world, &tuning, &mut events);
        assert_eq!(world.player.power_shots, tuning.player.power_shots_max);
        assert!(!world.pickups[0].body.alive);
        assert_eq!(
            events,
            vec![GameEvent::PickupClaimed {
                kind: PickupKind::PowerUp
            }]
        );
    }

    #[test]
    fn test_shielded_boss_contact_destroys_boss() {
        let (mut world, tuning) = setup();
        world.player.acquire_shield(1);
        let mut boss = Hostile::boss(10, 1, 1.0e9, &tuning);
        boss.body.pos.x = world.player.body.pos.x;
        world.hostiles.push(boss);

        let mut events = Vec::new();
        let outcome = resolve(&mut world, &tuning, &mut events);
        assert!(!outcome.player_died);
        assert!(outcome.boss_defeated);
        assert_eq!(world.player.shield_count, 0);
        assert!(!world.hostiles[0].body.alive);
        assert_eq!(world.hostiles[0].hp, 0);
        assert_eq!(world.score, tuning.boss.score);
        assert!(events.contains(&GameEvent::HostileKilled {
            species: Species::Boss,
            score: tuning.boss.score,
            by_shield: true,
        }));
    }

    #[test]
    fn test_roamer_contact_scored_separately() {
        let (mut world, tuning) = setup();
        world.player.acquire_shield(1);
        let altitude = world.player.body.pos.y + 20.0;
        let mut roamer = Hostile::roamer(60, altitude, 1, &tuning);
        roamer.body.pos.x = world.player.body.pos.x + 10.0;
        world.roamers.push(roamer);

        let mut events = Vec::new();
        resolve(&mut world, &tuning, &mut events);
        assert!(!world.roamers[0].body.alive);
        assert_eq!(world.score, tuning.roamer.score);
    }
}
