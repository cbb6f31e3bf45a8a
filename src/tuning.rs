//! Data-driven game balance
//!
//! Every number the simulation uses lives here. The defaults are tuned for a
//! pixel-per-tick feel at 60 Hz on an 800x600 playfield; a JSON file
//! can override the whole document, but never part of it.

use std::fs;
use std::path::Path;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, ConfigResult};

/// Inclusive `[min, max]` range, sampled uniformly.
///
/// A degenerate range (`min == max`) always yields `min` without touching the
/// RNG, so fixed intervals do not perturb the random stream.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Span {
    pub min: f32,
    pub max: f32,
}

impl Span {
    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    pub const fn fixed(value: f32) -> Self {
        Self {
            min: value,
            max: value,
        }
    }

    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f32 {
        if self.max <= self.min {
            self.min
        } else {
            rng.random_range(self.min..=self.max)
        }
    }

    fn check(&self, field: &'static str) -> ConfigResult<()> {
        if !self.min.is_finite() || !self.max.is_finite() {
            return Err(ConfigError::invalid(field, "range bounds must be finite"));
        }
        if self.min > self.max {
            return Err(ConfigError::invalid(
                field,
                format!("min {} exceeds max {}", self.min, self.max),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PlayfieldTuning {
    pub width: f32,
    pub height: f32,
    /// Height of the ground strip at the bottom of the playfield.
    pub ground_height: f32,
}

impl PlayfieldTuning {
    /// Y coordinate of the ground line (entities stand with their bottom here).
    pub fn ground_y(&self) -> f32 {
        self.height - self.ground_height
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PlayerTuning {
    pub width: f32,
    pub height: f32,
    /// Horizontal speed, pixels per tick
    pub speed: f32,
    /// Initial vertical velocity of a jump (negative = up)
    pub jump_velocity: f32,
    /// Added to vertical velocity every tick
    pub gravity: f32,
    /// Hit-box inset used while unshielded (bigger = more forgiving)
    pub touch_margin: f32,
    /// Charges granted by one shield item
    pub shield_capacity: u32,
    /// Empowered shots granted by one power-up
    pub power_shots_max: u32,
    /// Damage of an empowered projectile
    pub power_damage: u32,
    /// Left edge of the player at stage start
    pub spawn_x: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProjectileTuning {
    pub width: f32,
    pub height: f32,
    /// Pixels per tick; positive fires to the right
    pub speed: f32,
}

/// Stats for one ground-walking species.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GroundTuning {
    pub width: f32,
    pub height: f32,
    pub speed: f32,
    pub base_hp: u32,
    /// Extra HP per stage after the first
    pub hp_per_stage: u32,
    pub score: u64,
    /// Time between hops; only the strong species hops
    pub hop_interval_ms: f32,
    pub hop_velocity: f32,
    pub hop_gravity: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RoamerTuning {
    pub width: f32,
    pub height: f32,
    pub speed: f32,
    pub base_hp: u32,
    pub hp_per_stage: u32,
    pub score: u64,
    pub spawn_interval_ms: Span,
    /// Range of top-edge Y positions a roamer may fly at
    pub altitude: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BossTuning {
    pub width: f32,
    pub height: f32,
    /// HP at stage 1; doubles every stage
    pub base_hp: u32,
    pub score: u64,
    pub stone_cooldown_ms: f32,
    pub dash_interval_ms: Span,
    pub dash_speed: f32,
    /// Grace period after spawning before the boss starts acting
    pub entry_delay_ms: f32,
    /// Distance from the right edge to the boss's horizontal centre
    pub anchor_offset: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StoneTuning {
    pub radius: f32,
    /// Leftward speed, pixels per tick
    pub speed: Span,
    /// Downward speed, pixels per tick
    pub drop_speed: Span,
    pub gravity: f32,
    /// Offset of the stone centre from the boss's bottom-centre
    pub spawn_offset_x: f32,
    pub spawn_offset_y: f32,
    /// Awarded when a shield absorbs a stone
    pub score: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PickupTuning {
    pub power_up_size: f32,
    pub shield_size: f32,
    pub drift_speed: f32,
    /// Height of a pickup's centre above the ground line
    pub float_height: f32,
    /// Delay after stage start before the one-shot power-up appears
    pub power_up_delay_ms: f32,
    pub shield_interval_ms: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StageTuning {
    pub max_stage: u32,
    pub hostiles_per_stage: u32,
    pub hostile_spawn_interval_ms: Span,
    /// How far past the right edge new entities appear
    pub spawn_margin: f32,
    pub clear_duration_ms: f32,
    pub clear_jumps: u32,
    pub clear_jump_interval_ms: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LeaderboardTuning {
    pub name_max_len: usize,
}

/// Complete set of tunables, injected into [`GameState`](crate::sim::GameState).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Tuning {
    pub playfield: PlayfieldTuning,
    pub player: PlayerTuning,
    pub projectile: ProjectileTuning,
    pub weak: GroundTuning,
    pub medium: GroundTuning,
    pub strong: GroundTuning,
    pub roamer: RoamerTuning,
    pub boss: BossTuning,
    pub stone: StoneTuning,
    pub pickups: PickupTuning,
    pub stage: StageTuning,
    pub leaderboard: LeaderboardTuning,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            playfield: PlayfieldTuning {
                width: 800.0,
                height: 600.0,
                ground_height: 50.0,
            },
            player: PlayerTuning {
                width: 70.0,
                height: 80.0,
                speed: 5.0,
                jump_velocity: -12.0,
                gravity: 0.6,
                touch_margin: 20.0,
                shield_capacity: 1,
                power_shots_max: 10,
                power_damage: 2,
                spawn_x: 50.0,
            },
            projectile: ProjectileTuning {
                width: 30.0,
                height: 30.0,
                speed: 15.0,
            },
            // Yellow cat: small and fast
            weak: GroundTuning {
                width: 40.0,
                height: 50.0,
                speed: 9.0,
                base_hp: 2,
                hp_per_stage: 1,
                score: 10,
                hop_interval_ms: 0.0,
                hop_velocity: 0.0,
                hop_gravity: 0.0,
            },
            // Black cat
            medium: GroundTuning {
                width: 50.0,
                height: 60.0,
                speed: 6.0,
                base_hp: 3,
                hp_per_stage: 1,
                score: 20,
                hop_interval_ms: 0.0,
                hop_velocity: 0.0,
                hop_gravity: 0.0,
            },
            // White cat: slow, tough, hops
            strong: GroundTuning {
                width: 50.0,
                height: 60.0,
                speed: 2.0,
                base_hp: 8,
                hp_per_stage: 2,
                score: 50,
                hop_interval_ms: 1000.0,
                hop_velocity: -8.0,
                hop_gravity: 0.4,
            },
            roamer: RoamerTuning {
                width: 40.0,
                height: 30.0,
                speed: 4.0,
                base_hp: 1,
                hp_per_stage: 0,
                score: 15,
                spawn_interval_ms: Span::new(4000.0, 9000.0),
                altitude: Span::new(200.0, 380.0),
            },
            boss: BossTuning {
                width: 120.0,
                height: 100.0,
                base_hp: 50,
                score: 500,
                stone_cooldown_ms: 2000.0,
                dash_interval_ms: Span::new(3000.0, 6000.0),
                dash_speed: 8.0,
                entry_delay_ms: 1000.0,
                anchor_offset: 150.0,
            },
            stone: StoneTuning {
                radius: 40.0,
                speed: Span::new(5.0, 15.0),
                drop_speed: Span::new(0.5, 2.0),
                gravity: 0.0,
                spawn_offset_x: 0.0,
                spawn_offset_y: -20.0,
                score: 5,
            },
            pickups: PickupTuning {
                power_up_size: 60.0,
                shield_size: 50.0,
                drift_speed: 3.0,
                float_height: 30.0,
                power_up_delay_ms: 10_000.0,
                shield_interval_ms: Span::new(3000.0, 8000.0),
            },
            stage: StageTuning {
                max_stage: 10,
                hostiles_per_stage: 10,
                hostile_spawn_interval_ms: Span::fixed(2000.0),
                spawn_margin: 50.0,
                clear_duration_ms: 3000.0,
                clear_jumps: 3,
                clear_jump_interval_ms: 1000.0,
            },
            leaderboard: LeaderboardTuning { name_max_len: 10 },
        }
    }
}

impl Tuning {
    /// Parse a complete tuning document and validate it.
    pub fn from_json_str(json: &str) -> ConfigResult<Self> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Read and validate a tuning file.
    pub fn load(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let json = fs::read_to_string(path)?;
        let tuning = Self::from_json_str(&json)?;
        log::info!("Loaded tuning from {}", path.display());
        Ok(tuning)
    }

    /// Pretty JSON, suitable as a starting point for a custom tuning file.
    pub fn to_json_pretty(&self) -> ConfigResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Reject values the simulation cannot run with.
    pub fn validate(&self) -> ConfigResult<()> {
        positive("playfield.width", self.playfield.width)?;
        positive("playfield.height", self.playfield.height)?;
        non_negative("playfield.ground_height", self.playfield.ground_height)?;
        if self.playfield.ground_height >= self.playfield.height {
            return Err(ConfigError::invalid(
                "playfield.ground_height",
                "ground must leave room above it",
            ));
        }

        positive("player.width", self.player.width)?;
        positive("player.height", self.player.height)?;
        positive("player.speed", self.player.speed)?;
        positive("player.gravity", self.player.gravity)?;
        if self.player.jump_velocity >= 0.0 {
            return Err(ConfigError::invalid(
                "player.jump_velocity",
                "must be negative (upward)",
            ));
        }
        non_negative("player.touch_margin", self.player.touch_margin)?;
        if self.player.touch_margin * 2.0 >= self.player.width.min(self.player.height) {
            return Err(ConfigError::invalid(
                "player.touch_margin",
                "would shrink the hit-box to nothing",
            ));
        }
        if self.player.shield_capacity == 0 {
            return Err(ConfigError::invalid("player.shield_capacity", "must be at least 1"));
        }
        if self.player.power_damage == 0 {
            return Err(ConfigError::invalid("player.power_damage", "must be at least 1"));
        }

        positive("projectile.width", self.projectile.width)?;
        positive("projectile.height", self.projectile.height)?;
        if self.projectile.speed == 0.0 || !self.projectile.speed.is_finite() {
            return Err(ConfigError::invalid("projectile.speed", "must be non-zero"));
        }

        self.weak.check(&GroundFields::WEAK)?;
        self.medium.check(&GroundFields::MEDIUM)?;
        self.strong.check(&GroundFields::STRONG)?;

        positive("roamer.width", self.roamer.width)?;
        positive("roamer.height", self.roamer.height)?;
        positive("roamer.speed", self.roamer.speed)?;
        if self.roamer.base_hp == 0 {
            return Err(ConfigError::invalid("roamer.base_hp", "must be at least 1"));
        }
        self.roamer.spawn_interval_ms.check("roamer.spawn_interval_ms")?;
        positive("roamer.spawn_interval_ms.min", self.roamer.spawn_interval_ms.min)?;
        self.roamer.altitude.check("roamer.altitude")?;

        positive("boss.width", self.boss.width)?;
        positive("boss.height", self.boss.height)?;
        if self.boss.base_hp == 0 {
            return Err(ConfigError::invalid("boss.base_hp", "must be at least 1"));
        }
        positive("boss.stone_cooldown_ms", self.boss.stone_cooldown_ms)?;
        self.boss.dash_interval_ms.check("boss.dash_interval_ms")?;
        positive("boss.dash_interval_ms.min", self.boss.dash_interval_ms.min)?;
        positive("boss.dash_speed", self.boss.dash_speed)?;
        non_negative("boss.entry_delay_ms", self.boss.entry_delay_ms)?;

        positive("stone.radius", self.stone.radius)?;
        self.stone.speed.check("stone.speed")?;
        self.stone.drop_speed.check("stone.drop_speed")?;

        positive("pickups.power_up_size", self.pickups.power_up_size)?;
        positive("pickups.shield_size", self.pickups.shield_size)?;
        positive("pickups.drift_speed", self.pickups.drift_speed)?;
        non_negative("pickups.power_up_delay_ms", self.pickups.power_up_delay_ms)?;
        self.pickups.shield_interval_ms.check("pickups.shield_interval_ms")?;
        positive("pickups.shield_interval_ms.min", self.pickups.shield_interval_ms.min)?;

        if self.stage.max_stage == 0 {
            return Err(ConfigError::invalid("stage.max_stage", "must be at least 1"));
        }
        // Boss HP doubles per stage and must stay representable.
        if self.stage.max_stage > 31
            || (self.boss.base_hp as i64) << (self.stage.max_stage - 1) > i32::MAX as i64
        {
            return Err(ConfigError::invalid(
                "stage.max_stage",
                format!(
                    "boss HP {} doubled {} times overflows",
                    self.boss.base_hp,
                    self.stage.max_stage.saturating_sub(1)
                ),
            ));
        }
        if self.stage.hostiles_per_stage == 0 {
            return Err(ConfigError::invalid("stage.hostiles_per_stage", "must be at least 1"));
        }
        self.stage
            .hostile_spawn_interval_ms
            .check("stage.hostile_spawn_interval_ms")?;
        positive(
            "stage.hostile_spawn_interval_ms.min",
            self.stage.hostile_spawn_interval_ms.min,
        )?;
        non_negative("stage.spawn_margin", self.stage.spawn_margin)?;
        positive("stage.clear_duration_ms", self.stage.clear_duration_ms)?;
        positive("stage.clear_jump_interval_ms", self.stage.clear_jump_interval_ms)?;

        if self.leaderboard.name_max_len == 0 {
            return Err(ConfigError::invalid("leaderboard.name_max_len", "must be at least 1"));
        }

        Ok(())
    }
}

/// Error field names for one ground species' tunables
struct GroundFields {
    width: &'static str,
    height: &'static str,
    speed: &'static str,
    base_hp: &'static str,
    hop_interval_ms: &'static str,
    hop_gravity: &'static str,
}

impl GroundFields {
    const WEAK: Self = Self {
        width: "weak.width",
        height: "weak.height",
        speed: "weak.speed",
        base_hp: "weak.base_hp",
        hop_interval_ms: "weak.hop_interval_ms",
        hop_gravity: "weak.hop_gravity",
    };
    const MEDIUM: Self = Self {
        width: "medium.width",
        height: "medium.height",
        speed: "medium.speed",
        base_hp: "medium.base_hp",
        hop_interval_ms: "medium.hop_interval_ms",
        hop_gravity: "medium.hop_gravity",
    };
    const STRONG: Self = Self {
        width: "strong.width",
        height: "strong.height",
        speed: "strong.speed",
        base_hp: "strong.base_hp",
        hop_interval_ms: "strong.hop_interval_ms",
        hop_gravity: "strong.hop_gravity",
    };
}

impl GroundTuning {
    fn check(&self, fields: &GroundFields) -> ConfigResult<()> {
        positive(fields.width, self.width)?;
        positive(fields.height, self.height)?;
        positive(fields.speed, self.speed)?;
        if self.base_hp == 0 {
            return Err(ConfigError::invalid(fields.base_hp, "must be at least 1"));
        }
        non_negative(fields.hop_interval_ms, self.hop_interval_ms)?;
        non_negative(fields.hop_gravity, self.hop_gravity)?;
        Ok(())
    }
}

fn positive(field: &'static str, value: f32) -> ConfigResult<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::invalid(field, format!("{} must be > 0", value)))
    }
}

fn non_negative(field: &'static str, value: f32) -> ConfigResult<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::invalid(field, format!("{} must be >= 0", value)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_default_is_valid() {
        Tuning::default().validate().unwrap();
    }

    #[test]
    fn test_json_roundtrip_preserves_values() {
        let json = Tuning::default().to_json_pretty().unwrap();
        let parsed = Tuning::from_json_str(&json).unwrap();
        assert_eq!(parsed, Tuning::default());
    }

    #[test]
    fn test_missing_field_fails_fast() {
        let mut value = serde_json::to_value(Tuning::default()).unwrap();
        value["boss"].as_object_mut().unwrap().remove("base_hp");
        let err = Tuning::from_json_str(&value.to_string()).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_unknown_field_rejected() {
        let mut value = serde_json::to_value(Tuning::default()).unwrap();
        value["stage"]["bonus_lives"] = serde_json::json!(3);
        assert!(Tuning::from_json_str(&value.to_string()).is_err());
    }

    #[test]
    fn test_inverted_range_rejected() {
        let mut tuning = Tuning::default();
        tuning.pickups.shield_interval_ms = Span::new(8000.0, 3000.0);
        match tuning.validate() {
            Err(ConfigError::Invalid { field, .. }) => {
                assert_eq!(field, "pickups.shield_interval_ms")
            }
            other => panic!("expected invalid range, got {:?}", other),
        }
    }

    #[test]
    fn test_ground_errors_name_the_species_field() {
        let mut tuning = Tuning::default();
        tuning.strong.speed = 0.0;
        match tuning.validate() {
            Err(ConfigError::Invalid { field, .. }) => assert_eq!(field, "strong.speed"),
            other => panic!("expected invalid speed, got {:?}", other),
        }

        let mut tuning = Tuning::default();
        tuning.medium.base_hp = 0;
        match tuning.validate() {
            Err(ConfigError::Invalid { field, .. }) => assert_eq!(field, "medium.base_hp"),
            other => panic!("expected invalid hp, got {:?}", other),
        }
    }

    #[test]
    fn test_boss_hp_overflow_rejected() {
        let mut tuning = Tuning::default();
        tuning.stage.max_stage = 30;
        assert!(tuning.validate().is_err());
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = Tuning::load("/definitely/not/here/tuning.json").unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }

    #[test]
    fn test_span_sample_within_bounds() {
        let mut rng = Pcg32::seed_from_u64(7);
        let span = Span::new(3000.0, 8000.0);
        for _ in 0..200 {
            let v = span.sample(&mut rng);
            assert!((3000.0..=8000.0).contains(&v));
        }
        assert_eq!(Span::fixed(2000.0).sample(&mut rng), 2000.0);
    }
}
