//! Error types

use thiserror::Error;

/// Rejected world operation, caught before it reaches the physics engine
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum WorldError {
    #[error("radius must be positive, got {0}")]
    NonPositiveRadius(f32),

    #[error("position is not finite: ({0}, {1})")]
    NonFinitePosition(f32, f32),

    #[error("boundary half extents must be positive, got ({half_width}, {half_height})")]
    DegenerateBoundary { half_width: f32, half_height: f32 },

    #[error("physics world has been torn down")]
    TornDown,
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid config: {field} {reason}")]
    Invalid {
        field: &'static str,
        reason: String,
    },
}

#[derive(Error, Debug)]
pub enum GameError {
    #[error("game loop is already running")]
    AlreadyRunning,

    #[error("game loop was stopped; build a new one to play again")]
    AlreadyStopped,

    #[error("game loop is not running")]
    NotRunning,

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    World(#[from] WorldError),
}
