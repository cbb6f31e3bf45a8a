//! Ninja Pup - A side-scrolling stage combat game core
//!
//! Core modules:
//! - `sim`: Deterministic simulation (entities, spawning, combat, session phases)
//! - `render`: Per-tick drawable snapshot for whatever host draws the game
//! - `highscores`: Top-10 leaderboard ranking
//! - `persistence`: Leaderboard load/save collaborators
//! - `tuning`: Data-driven game balance
//! - `error`: Configuration and persistence errors

pub mod error;
pub mod highscores;
pub mod persistence;
pub mod render;
pub mod sim;
pub mod tuning;

pub use error::{ConfigError, PersistError};
pub use highscores::{Leaderboard, ScoreRecord};
pub use persistence::{JsonFileStore, MemoryStore, NullStore, ScoreStore};
pub use render::{RenderSnapshot, snapshot};
pub use sim::{GameEvent, GameState, SessionState, TickInput, tick};
pub use tuning::Tuning;

/// Game loop constants
pub mod consts {
    /// Nominal simulation step (60 Hz); entity motion is tuned per tick at this rate
    pub const FIXED_DT_MS: f32 = 1000.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
}
