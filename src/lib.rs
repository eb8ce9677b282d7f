//! Merge Drop - a ball-drop merge game core
//!
//! Core modules:
//! - `sim`: Physics world adapter, spawn controller, cooldown/settle tracking
//! - `input`: Pointer gesture tracking (drag vs tap, clamped drop position)
//! - `renderer`: Snapshot → drawable projection and GPU instance packing
//! - `game`: Mount/unmount lifecycle and fixed-timestep loop
//! - `config`: Runtime configuration (JSON), defaults from `consts`

pub mod config;
pub mod error;
pub mod game;
pub mod input;
pub mod playfield;
pub mod renderer;
pub mod sim;

pub use config::GameConfig;
pub use error::{ConfigError, GameError, WorldError};
pub use game::{GameLoop, LoopState};
pub use playfield::Playfield;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz, matches display refresh on most phones)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Longest frame delta fed into the accumulator (seconds)
    pub const MAX_FRAME_DT: f32 = 0.1;

    /// Default playfield size (portrait phone, logical pixels)
    pub const PLAYFIELD_WIDTH: f32 = 390.0;
    pub const PLAYFIELD_HEIGHT: f32 = 844.0;
    /// Wall thickness on each side
    pub const SIDE_MARGIN: f32 = 10.0;
    /// Ground slab thickness
    pub const GROUND_THICKNESS: f32 = 60.0;
    /// Distance from the bottom edge to the ground slab center
    pub const GROUND_OFFSET: f32 = 50.0;

    /// Y coordinate of the indicator and of freshly dropped balls
    pub const SPAWN_HEIGHT: f32 = 50.0;
    /// Downward gravity (pixels/s², screen Y grows downward)
    pub const GRAVITY: f32 = 1000.0;
    /// Pixels per simulation "meter" (rapier tolerance scale)
    pub const LENGTH_UNIT: f32 = 100.0;

    /// Values a new ball can carry
    pub const BALL_VALUES: [u32; 3] = [2, 4, 8];
    /// Radius grows linearly with value
    pub const RADIUS_PER_VALUE: f32 = 4.0;

    /// Ball material
    pub const BALL_RESTITUTION: f32 = 0.5;
    pub const BALL_FRICTION: f32 = 0.1;
    /// ~2% velocity loss per 60 Hz step
    pub const BALL_LINEAR_DAMPING: f32 = 1.2;

    /// Upper bound on the drop cooldown (milliseconds)
    pub const COOLDOWN_MS: u64 = 2000;
    /// Speed under which a dropped ball counts as calm (pixels/s)
    pub const SETTLE_SPEED: f32 = 20.0;
    /// How long a ball must stay calm to count as settled (milliseconds)
    pub const SETTLE_WINDOW_MS: u64 = 150;
    /// Ball counts as landed when its bottom is within this distance of the ground
    pub const LANDING_SLOP: f32 = 2.0;

    /// Live dynamic bodies before the oldest one is evicted
    pub const MAX_BODIES: usize = 64;
}
