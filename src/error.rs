//! Game-specific error types.
//!
//! Every error here is a startup wiring fault: the game either refuses to
//! start (bad configuration) or shuts down right after spawning a level with
//! a missing collaborator.  Nothing is retried at runtime.

use std::fmt;

/// Top-level error enum for boostfall.
#[derive(Debug, Clone, PartialEq)]
pub enum GameError {
    /// A configuration value is outside the range the game logic supports.
    InvalidConfig {
        /// Name of the config key (for logging).
        name: &'static str,
        /// The value that was rejected.
        value: f32,
        /// Human-readable description of the accepted range.
        expected: &'static str,
    },

    /// A collaborator every level needs (player, camera, HUD meter) is absent.
    MissingCollaborator {
        /// What was looked up.
        name: &'static str,
    },
}

impl fmt::Display for GameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameError::InvalidConfig {
                name,
                value,
                expected,
            } => write!(
                f,
                "config value '{}' = {} is invalid (expected {})",
                name, value, expected
            ),
            GameError::MissingCollaborator { name } => {
                write!(f, "required collaborator '{}' is not wired up", name)
            }
        }
    }
}

impl std::error::Error for GameError {}

/// Convenience alias: a `Result` using `GameError` as the error type.
pub type GameResult<T> = Result<T, GameError>;

/// Fail with [`GameError::MissingCollaborator`] unless exactly `expected`
/// instances of `name` were found.
pub fn require_count(name: &'static str, found: usize, expected: usize) -> GameResult<()> {
    if found == expected {
        Ok(())
    } else {
        Err(GameError::MissingCollaborator { name })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_collaborator_message_names_it() {
        let err = require_count("player", 0, 1).unwrap_err();
        assert_eq!(err.to_string(), "required collaborator 'player' is not wired up");
    }

    #[test]
    fn exact_count_passes() {
        assert!(require_count("camera", 1, 1).is_ok());
    }
}
