//! Headless runner: plays a session with a simple autopilot.
//!
//! Usage:
//!   ninja-pup --seed 7 --ticks 36000 --scores scores.json
//!   RUST_LOG=debug ninja-pup --config tuning.json
//!   ninja-pup --dump-tuning > tuning.json

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use ninja_pup::consts::{FIXED_DT_MS, MAX_SUBSTEPS};
use ninja_pup::persistence::{JsonFileStore, NullStore, ScoreStore};
use ninja_pup::sim::{GameState, SessionState, TickInput, session, tick};
use ninja_pup::{Tuning, snapshot};

#[derive(Parser)]
#[command(name = "ninja-pup", about = "Run a headless Ninja Pup session with an autopilot")]
struct Cli {
    /// Tuning file (JSON); built-in defaults when absent
    #[arg(long)]
    config: Option<PathBuf>,

    /// Leaderboard file (JSON); nothing is persisted when absent
    #[arg(long)]
    scores: Option<PathBuf>,

    /// Base RNG seed
    #[arg(long, default_value_t = 1)]
    seed: u64,

    /// Maximum simulation ticks before giving up
    #[arg(long, default_value_t = 60 * 60 * 10)]
    ticks: u64,

    /// Host frame time in milliseconds (fed through the fixed-step accumulator)
    #[arg(long, default_value_t = FIXED_DT_MS)]
    frame_ms: f32,

    /// Name typed if the run makes the leaderboard
    #[arg(long, default_value = "AUTO")]
    name: String,

    /// Print the default tuning as JSON and exit
    #[arg(long)]
    dump_tuning: bool,
}

/// Picks per-tick intents from the current state
struct Autopilot {
    name: Vec<char>,
    typed: usize,
    cooldown: u32,
}

impl Autopilot {
    const FIRE_EVERY: u32 = 6;
    const LOOKAHEAD: f32 = 140.0;

    fn new(name: &str) -> Self {
        Self {
            name: name.chars().collect(),
            typed: 0,
            cooldown: 0,
        }
    }

    fn intent(&mut self, state: &GameState) -> TickInput {
        match state.phase {
            SessionState::Menu => TickInput {
                confirm: true,
                ..Default::default()
            },
            SessionState::Playing => self.play(state),
            SessionState::NameEntry => {
                if let Some(&c) = self.name.get(self.typed) {
                    self.typed += 1;
                    TickInput {
                        text: Some(c),
                        ..Default::default()
                    }
                } else {
                    TickInput {
                        confirm: true,
                        ..Default::default()
                    }
                }
            }
            SessionState::StageClearing | SessionState::GameOver | SessionState::GameClear => {
                TickInput::default()
            }
        }
    }

    /// Hold position near the left edge, keep throwing, hop over anything close
    fn play(&mut self, state: &GameState) -> TickInput {
        let world = &state.world;
        let player = world.player.rect();
        let home = state.tuning.player.spawn_x;

        let threat = world
            .hostiles
            .iter()
            .filter(|h| !h.is_boss())
            .chain(world.roamers.iter())
            .map(|h| h.body.rect())
            .chain(world.stones.iter().map(|s| s.body.rect()))
            .any(|r| {
                let gap = r.left() - player.right();
                (-r.size.x..Self::LOOKAHEAD).contains(&gap) && r.bottom() > player.top()
            });

        let fire = self.cooldown == 0;
        self.cooldown = if fire { Self::FIRE_EVERY } else { self.cooldown - 1 };

        TickInput {
            left: player.left() > home + 5.0,
            right: player.left() < home - 5.0,
            jump: threat,
            fire,
            ..Default::default()
        }
    }
}

fn load_tuning(path: Option<&PathBuf>) -> Result<Tuning> {
    match path {
        Some(path) => Tuning::load(path)
            .with_context(|| format!("failed to load tuning from {}", path.display())),
        None => Ok(Tuning::default()),
    }
}

fn main() -> Result<()> {
    #[cfg(not(target_arch = "wasm32"))]
    env_logger::init();

    let cli = Cli::parse();

    if cli.dump_tuning {
        let json = Tuning::default()
            .to_json_pretty()
            .context("failed to serialize tuning")?;
        println!("{json}");
        return Ok(());
    }

    let tuning = load_tuning(cli.config.as_ref())?;
    let mut store: Box<dyn ScoreStore> = match &cli.scores {
        Some(path) => Box::new(JsonFileStore::new(path)),
        None => Box::new(NullStore),
    };

    log::info!("Ninja Pup (headless) starting, seed {}", cli.seed);
    let mut state = session::boot(tuning, cli.seed, store.as_mut());
    let mut pilot = Autopilot::new(&cli.name);

    let frame_ms = if cli.frame_ms > 0.0 {
        cli.frame_ms
    } else {
        FIXED_DT_MS
    };
    let mut accumulator = 0.0f32;
    let mut run_started = false;

    'frames: while state.time_ticks < cli.ticks {
        accumulator += frame_ms;
        let mut substeps = 0;
        while accumulator >= FIXED_DT_MS && substeps < MAX_SUBSTEPS {
            let input = pilot.intent(&state);
            tick(&mut state, &input, FIXED_DT_MS, store.as_mut());
            accumulator -= FIXED_DT_MS;
            substeps += 1;

            for event in state.drain_events() {
                log::debug!("{:?}", event);
            }

            run_started |= state.phase == SessionState::Playing;
            let finished = matches!(state.phase, SessionState::GameOver | SessionState::GameClear);
            if run_started && finished {
                break 'frames;
            }
            if state.time_ticks >= cli.ticks {
                break 'frames;
            }
        }
        // Drop backlog we couldn't simulate
        if substeps == MAX_SUBSTEPS {
            accumulator = 0.0;
        }
    }

    let hud = snapshot(&state).hud;
    log::info!(
        "Finished after {} ticks: {:?} at stage {}, score {}",
        state.time_ticks,
        hud.phase,
        hud.stage,
        hud.score
    );

    println!("=== RESULT ===");
    println!("  Phase:   {:?}", hud.phase);
    println!("  Stage:   {}", hud.stage);
    println!("  Score:   {}", hud.score);
    println!("  Time:    {:.1}s", hud.elapsed_seconds);
    println!();
    println!("=== LEADERBOARD ===");
    for (rank, record) in hud.leaderboard.iter().enumerate() {
        println!(
            "  {:>2}. {:<12} {:>8} {:>8.1}s",
            rank + 1,
            record.name,
            record.score,
            record.elapsed_seconds
        );
    }

    Ok(())
}
