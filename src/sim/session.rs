//! Session transitions
//!
//! Every change of [`SessionState`] goes through this module. Leaderboard
//! I/O happens only here, on transition edges: entering the menu, dying, and
//! confirming a name. The Playing hot path never touches the store.

use super::state::{ClearingState, GameEvent, GameState, SessionState};
use super::tick::TickInput;
use crate::highscores::{Leaderboard, ScoreRecord};
use crate::persistence::ScoreStore;
use crate::tuning::Tuning;

/// New session in the menu, leaderboard loaded from `store`.
pub fn boot(tuning: Tuning, seed: u64, store: &mut dyn ScoreStore) -> GameState {
    let mut state = GameState::new(tuning, seed);
    reload_leaderboard(&mut state, store);
    log::info!("Session ready (seed {})", seed);
    state
}

fn reload_leaderboard(state: &mut GameState, store: &mut dyn ScoreStore) {
    state.leaderboard = Leaderboard::from_records(store.load());
    log::info!("Leaderboard loaded: {} records", state.leaderboard.len());
}

pub fn set_phase(state: &mut GameState, to: SessionState) {
    let from = state.phase;
    if from == to {
        return;
    }
    log::info!("Phase {:?} -> {:?}", from, to);
    state.phase = to;
    state.push_event(GameEvent::PhaseChanged { from, to });
}

pub fn enter_menu(state: &mut GameState, store: &mut dyn ScoreStore) {
    reload_leaderboard(state, store);
    set_phase(state, SessionState::Menu);
}

/// Fresh run at stage 1. Run `n` of the session is seeded with `seed + n`.
pub fn start_run(state: &mut GameState) {
    let seed = state.seed.wrapping_add(state.run_index);
    state.run_index += 1;
    state.world.reset_run(&state.tuning, seed);
    state.name_buffer.clear();
    state.clearing = ClearingState::default();
    log::info!("Run {} started (seed {})", state.run_index, seed);
    set_phase(state, SessionState::Playing);
    state.push_event(GameEvent::StageStarted { stage: 1 });
}

/// Player died: NameEntry if the run makes the top 10, else GameOver.
pub fn on_player_death(state: &mut GameState, store: &mut dyn ScoreStore) {
    reload_leaderboard(state, store);
    let score = state.score();
    let elapsed = state.elapsed_seconds();
    let qualifies = state.leaderboard.qualifies(score, elapsed);
    log::info!(
        "Player died at stage {} with {} points after {:.1}s",
        state.stage(),
        score,
        elapsed
    );
    state.push_event(GameEvent::PlayerDied { score, qualifies });
    state.name_buffer.clear();
    let next = if qualifies {
        SessionState::NameEntry
    } else {
        SessionState::GameOver
    };
    set_phase(state, next);
}

/// Boss died: GameClear after the final stage, otherwise the clear sequence.
pub fn on_boss_defeated(state: &mut GameState) {
    let stage = state.stage();
    if state.world.stage.is_final(&state.tuning) {
        log::info!("Final boss defeated, score {}", state.score());
        state.push_event(GameEvent::GameCleared {
            score: state.score(),
        });
        set_phase(state, SessionState::GameClear);
        return;
    }

    state.world.clear_for_stage_end();
    state.world.player.recenter(&state.tuning);
    state.clearing = ClearingState::default();
    state.push_event(GameEvent::StageCleared { stage });
    set_phase(state, SessionState::StageClearing);
}

/// Timed choreography: the player hops in place `clear_jumps` times, one
/// jump every `clear_jump_interval_ms` starting immediately, then the next
/// stage begins. A jump that comes due mid-air waits for the landing.
pub fn update_stage_clearing(state: &mut GameState, dt_ms: f32) {
    let GameState {
        tuning,
        world,
        clearing,
        ..
    } = state;
    let stage_tuning = &tuning.stage;

    world.elapsed_ms += dt_ms as f64;
    clearing.elapsed_ms += dt_ms;

    let next_jump_at = clearing.jumps_done as f32 * stage_tuning.clear_jump_interval_ms;
    if clearing.jumps_done < stage_tuning.clear_jumps && clearing.elapsed_ms >= next_jump_at {
        if world.player.jump(tuning) {
            clearing.jumps_done += 1;
        }
    }
    world.player.integrate_gravity(tuning);

    for item in world.pickups.iter_mut() {
        item.update();
    }
    world.sweep_dead();

    if clearing.elapsed_ms >= stage_tuning.clear_duration_ms {
        enter_next_stage(state);
    }
}

fn enter_next_stage(state: &mut GameState) {
    let next = state.stage() + 1;
    state.world.begin_stage(next, &state.tuning);
    state.clearing = ClearingState::default();
    log::info!("Stage {} begins", next);
    set_phase(state, SessionState::Playing);
    state.push_event(GameEvent::StageStarted { stage: next });
}

/// Text editing and confirm while typing a leaderboard name.
pub fn update_name_entry(state: &mut GameState, input: &TickInput, store: &mut dyn ScoreStore) {
    if input.backspace {
        state.name_buffer.pop();
    }
    if let Some(c) = input.text {
        let len = state.name_buffer.chars().count();
        if !c.is_control() && len < state.tuning.leaderboard.name_max_len {
            state.name_buffer.push(c);
        }
    }
    if !input.confirm {
        return;
    }

    let name = state.name_buffer.trim();
    if name.is_empty() {
        return;
    }
    let record = ScoreRecord::new(name, state.score(), state.elapsed_seconds());
    let rank = state.leaderboard.add(record);
    store.save(state.leaderboard.records());
    log::info!("Saved leaderboard entry at rank {:?}", rank);
    state.push_event(GameEvent::RecordSaved { rank });
    set_phase(state, SessionState::GameOver);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStore;

    fn typing(c: char) -> TickInput {
        TickInput {
            text: Some(c),
            ..Default::default()
        }
    }

    fn confirm() -> TickInput {
        TickInput {
            confirm: true,
            ..Default::default()
        }
    }

    fn dead_in_name_entry(store: &mut MemoryStore) -> GameState {
        let mut state = boot(Tuning::default(), 4, store);
        start_run(&mut state);
        state.world.score = 120;
        state.world.elapsed_ms = 30_000.0;
        on_player_death(&mut state, store);
        assert_eq!(state.phase, SessionState::NameEntry);
        state
    }

    #[test]
    fn test_boot_loads_leaderboard_once() {
        let mut store = MemoryStore::with_records(vec![ScoreRecord::new("A", 10, 1.0)]);
        let state = boot(Tuning::default(), 1, &mut store);
        assert_eq!(state.phase, SessionState::Menu);
        assert_eq!(state.leaderboard.len(), 1);
        assert_eq!(store.loads, 1);
        assert_eq!(store.saves, 0);
    }

    #[test]
    fn test_restart_reseeds_per_run() {
        let mut state = GameState::new(Tuning::default(), 100);
        start_run(&mut state);
        let first = state.world.stage.clone();
        start_run(&mut state);
        assert_eq!(state.run_index, 2);

        let mut other = GameState::new(Tuning::default(), 101);
        start_run(&mut other);
        assert_eq!(state.world.stage, other.world.stage);
        assert_eq!(first.stage, 1);
    }

    #[test]
    fn test_start_run_resets_score_and_player() {
        let mut state = GameState::new(Tuning::default(), 1);
        start_run(&mut state);
        state.world.score = 999;
        state.world.player.die();
        state.world.player.acquire_shield(1);
        start_run(&mut state);
        assert_eq!(state.score(), 0);
        assert!(state.world.player.alive);
        assert_eq!(state.world.player.shield_count, 0);
        assert_eq!(state.phase, SessionState::Playing);
    }

    #[test]
    fn test_name_entry_saves_and_ends_run() {
        let mut store = MemoryStore::new();
        let mut state = dead_in_name_entry(&mut store);
        for c in "Pup".chars() {
            update_name_entry(&mut state, &typing(c), &mut store);
        }
        assert_eq!(state.name_buffer, "Pup");
        update_name_entry(&mut state, &confirm(), &mut store);

        assert_eq!(state.phase, SessionState::GameOver);
        assert_eq!(store.saves, 1);
        assert_eq!(store.records, vec![ScoreRecord::new("Pup", 120, 30.0)]);
        assert!(
            state
                .events()
                .contains(&GameEvent::RecordSaved { rank: Some(1) })
        );
    }

    #[test]
    fn test_blank_name_is_not_accepted() {
        let mut store = MemoryStore::new();
        let mut state = dead_in_name_entry(&mut store);
        update_name_entry(&mut state, &confirm(), &mut store);
        update_name_entry(&mut state, &typing(' '), &mut store);
        update_name_entry(&mut state, &confirm(), &mut store);
        assert_eq!(state.phase, SessionState::NameEntry);
        assert_eq!(store.saves, 0);
    }

    #[test]
    fn test_name_length_and_backspace() {
        let mut store = MemoryStore::new();
        let mut state = dead_in_name_entry(&mut store);
        for c in "ABCDEFGHIJKLMNOP".chars() {
            update_name_entry(&mut state, &typing(c), &mut store);
        }
        assert_eq!(state.name_buffer, "ABCDEFGHIJ");
        update_name_entry(&mut state, &typing('\u{8}'), &mut store);
        assert_eq!(state.name_buffer.len(), 10);

        let back = TickInput {
            backspace: true,
            ..Default::default()
        };
        update_name_entry(&mut state, &back, &mut store);
        assert_eq!(state.name_buffer, "ABCDEFGHI");
    }

    #[test]
    fn test_death_without_qualifying_goes_to_game_over() {
        let full: Vec<_> = (0..10)
            .map(|i| ScoreRecord::new(format!("P{i}"), 1000 + i, 10.0))
            .collect();
        let mut store = MemoryStore::with_records(full);
        let mut state = boot(Tuning::default(), 1, &mut store);
        start_run(&mut state);
        state.world.score = 50;
        on_player_death(&mut state, &mut store);
        assert_eq!(state.phase, SessionState::GameOver);
        assert_eq!(store.loads, 2);
        assert!(state.events().contains(&GameEvent::PlayerDied {
            score: 50,
            qualifies: false
        }));
    }

    #[test]
    fn test_final_boss_goes_to_game_clear() {
        let mut state = GameState::new(Tuning::default(), 1);
        start_run(&mut state);
        let max = state.tuning.stage.max_stage;
        state.world.begin_stage(max, &state.tuning);
        on_boss_defeated(&mut state);
        assert_eq!(state.phase, SessionState::GameClear);
        assert_eq!(state.stage(), max);
    }

    #[test]
    fn test_stage_clearing_runs_choreography_then_next_stage() {
        let mut state = GameState::new(Tuning::default(), 1);
        start_run(&mut state);
        on_boss_defeated(&mut state);
        assert_eq!(state.phase, SessionState::StageClearing);
        let centre_x = (800.0 - 70.0) / 2.0;
        assert_eq!(state.world.player.body.pos.x, centre_x);

        let ground = state.tuning.playfield.ground_y();
        let mut airborne_ticks = 0;
        let mut ticks = 0;
        while state.phase == SessionState::StageClearing {
            update_stage_clearing(&mut state, 10.0);
            if state.world.player.rect().bottom() < ground {
                airborne_ticks += 1;
            }
            ticks += 1;
            assert!(ticks <= 300);
        }
        assert_eq!(ticks, 300);
        assert!(airborne_ticks > 0);
        assert_eq!(state.phase, SessionState::Playing);
        assert_eq!(state.stage(), 2);
        assert_eq!(state.world.player.body.pos.x, 50.0);
        assert!(state.events().contains(&GameEvent::StageStarted { stage: 2 }));
    }

    #[test]
    fn test_clearing_makes_three_jumps() {
        let mut state = GameState::new(Tuning::default(), 1);
        start_run(&mut state);
        on_boss_defeated(&mut state);
        for _ in 0..299 {
            update_stage_clearing(&mut state, 10.0);
        }
        assert_eq!(state.clearing.jumps_done, 3);
        assert_eq!(state.phase, SessionState::StageClearing);
    }

    #[test]
    fn test_clearing_counts_only_real_jumps_on_long_frames() {
        let mut state = GameState::new(Tuning::default(), 1);
        start_run(&mut state);
        on_boss_defeated(&mut state);
        let ground = state.tuning.playfield.ground_y();

        // 33ms frames: airtime (~1.3s) outlasts the 1s jump interval
        let mut takeoffs = 0;
        for _ in 0..90 {
            let grounded = state.world.player.rect().bottom() >= ground;
            update_stage_clearing(&mut state, 33.0);
            if grounded && state.world.player.rect().bottom() < ground {
                takeoffs += 1;
            }
            assert_eq!(state.clearing.jumps_done, takeoffs);
        }
        assert_eq!(takeoffs, 3);
        assert_eq!(state.phase, SessionState::StageClearing);
    }

    #[test]
    fn test_boss_kill_clears_projectiles_stones_and_roamers_only() {
        use crate::sim::entity::{Pickup, PickupKind, Projectile, Stone};
        use crate::sim::hostile::Hostile;
        use glam::Vec2;

        let mut state = GameState::new(Tuning::default(), 1);
        start_run(&mut state);
        let tuning = state.tuning.clone();
        let world = &mut state.world;
        world
            .projectiles
            .push(Projectile::new(1, Vec2::new(300.0, 400.0), 1, &tuning));
        world
            .stones
            .push(Stone::new(2, Vec2::new(400.0, 300.0), Vec2::new(-5.0, 1.0), &tuning));
        world.roamers.push(Hostile::roamer(3, 300.0, 1, &tuning));
        world
            .pickups
            .push(Pickup::new(4, PickupKind::ShieldItem, &tuning));
        world.player.acquire_shield(1);

        on_boss_defeated(&mut state);
        assert_eq!(state.phase, SessionState::StageClearing);
        let world = &state.world;
        assert!(world.projectiles.is_empty());
        assert!(world.stones.is_empty());
        assert!(world.roamers.is_empty());
        assert_eq!(world.pickups.len(), 1);
        assert!(world.player.alive);
        assert_eq!(world.player.shield_count, 1);
        assert_eq!(state.score(), 0);
    }
}
