//! Centralized error types for the game.
//!
//! Game logic itself has no recoverable errors: broken invariants are bugs and are
//! asserted on. The types here cover the fallible edges: configuration, the SDL2
//! front-end, and the audio collaborator.

/// Main error type for the game.
#[derive(thiserror::Error, Debug)]
pub enum GameError {
    #[error("SDL error: {0}")]
    Sdl(String),
}

/// Failures of the audio collaborator. These are logged and swallowed, never
/// allowed to reach game logic.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum AudioError {
    #[error("Audio is unavailable: {0}")]
    Unavailable(String),

    #[error("Audio device error: {0}")]
    Device(String),
}

/// Errors produced while reading runtime settings.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{var} must be an unsigned integer, got {value:?}")]
    InvalidSeed { var: &'static str, value: String },

    #[error("{var} must be a boolean (1/0, true/false, yes/no, on/off), got {value:?}")]
    InvalidFlag { var: &'static str, value: String },
}

/// Result type for game operations.
pub type GameResult<T> = Result<T, GameError>;
