//! Error types for the configuration and persistence boundaries.
//!
//! Gameplay itself has no error path: dying is a phase transition, not a
//! failure. Only loading tunables and touching the leaderboard file can go
//! wrong, and only the former is allowed to reach the caller.

use std::fmt;
use std::io;

/// Failure to obtain a usable [`Tuning`](crate::tuning::Tuning).
///
/// Fatal at startup; the simulation never sees a half-valid configuration.
#[derive(Debug)]
pub enum ConfigError {
    /// The configuration file could not be read.
    Io(io::Error),
    /// The file was read but is not a complete tuning document.
    Parse(serde_json::Error),
    /// A tunable parsed fine but is outside its usable range.
    Invalid {
        /// Dotted path of the offending field, e.g. `boss.base_hp`.
        field: &'static str,
        /// Human-readable description of the constraint.
        reason: String,
    },
}

impl ConfigError {
    pub(crate) fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        ConfigError::Invalid {
            field,
            reason: reason.into(),
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(err) => write!(f, "could not read tuning file: {}", err),
            ConfigError::Parse(err) => write!(f, "malformed tuning file: {}", err),
            ConfigError::Invalid { field, reason } => {
                write!(f, "invalid tunable '{}': {}", field, reason)
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io(err) => Some(err),
            ConfigError::Parse(err) => Some(err),
            ConfigError::Invalid { .. } => None,
        }
    }
}

impl From<io::Error> for ConfigError {
    fn from(err: io::Error) -> Self {
        ConfigError::Io(err)
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self {
        ConfigError::Parse(err)
    }
}

/// Failure reading or writing the leaderboard file.
///
/// Never escapes a [`ScoreStore`](crate::persistence::ScoreStore): stores log
/// it and fall back to an empty or unchanged leaderboard.
#[derive(Debug)]
pub enum PersistError {
    Io(io::Error),
    Parse(serde_json::Error),
}

impl fmt::Display for PersistError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PersistError::Io(err) => write!(f, "leaderboard i/o failed: {}", err),
            PersistError::Parse(err) => write!(f, "leaderboard file is corrupt: {}", err),
        }
    }
}

impl std::error::Error for PersistError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PersistError::Io(err) => Some(err),
            PersistError::Parse(err) => Some(err),
        }
    }
}

impl From<io::Error> for PersistError {
    fn from(err: io::Error) -> Self {
        PersistError::Io(err)
    }
}

impl From<serde_json::Error> for PersistError {
    fn from(err: serde_json::Error) -> Self {
        PersistError::Parse(err)
    }
}

/// Convenience alias for configuration loading.
pub type ConfigResult<T> = Result<T, ConfigError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn test_invalid_display_names_field() {
        let err = ConfigError::invalid("boss.base_hp", "must be positive");
        assert_eq!(
            err.to_string(),
            "invalid tunable 'boss.base_hp': must be positive"
        );
        assert!(err.source().is_none());
    }

    #[test]
    fn test_io_errors_chain_source() {
        let err: PersistError = io::Error::new(io::ErrorKind::NotFound, "gone").into();
        assert!(err.source().is_some());
        assert!(err.to_string().contains("gone"));
    }
}
