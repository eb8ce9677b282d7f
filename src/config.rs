//! Runtime game configuration
//!
//! Every field defaults to the matching constant in `consts`, so a config file
//! only needs to name what it overrides.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::ConfigError;
use crate::playfield::Playfield;
use crate::sim::{BallMaterial, BallValue};

/// Tunables for one game session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub playfield: Playfield,
    /// Downward gravity (pixels/s²)
    pub gravity: f32,
    /// Y coordinate new balls are dropped from
    pub spawn_height: f32,
    pub material: BallMaterial,

    /// Hard upper bound on the drop cooldown
    pub cooldown_ms: u64,
    /// Speed under which a dropped ball counts as calm (pixels/s)
    pub settle_speed: f32,
    /// How long a ball must stay calm before the cooldown releases early
    pub settle_window_ms: u64,

    /// Live dynamic bodies before the oldest is evicted
    pub max_bodies: usize,
    /// RNG seed for next-value draws (None = derive from the clock)
    pub seed: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            playfield: Playfield::default(),
            gravity: GRAVITY,
            spawn_height: SPAWN_HEIGHT,
            material: BallMaterial::default(),
            cooldown_ms: COOLDOWN_MS,
            settle_speed: SETTLE_SPEED,
            settle_window_ms: SETTLE_WINDOW_MS,
            max_bodies: MAX_BODIES,
            seed: None,
        }
    }
}

impl GameConfig {
    /// Parse and validate a JSON config
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a JSON config file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path.as_ref())?;
        let config = Self::from_json_str(&json)?;
        log::info!("Loaded config from {}", path.as_ref().display());
        Ok(config)
    }

    pub fn to_json_string(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn cooldown(&self) -> Duration {
        Duration::from_millis(self.cooldown_ms)
    }

    pub fn settle_window(&self) -> Duration {
        Duration::from_millis(self.settle_window_ms)
    }

    /// Reject configs the physics engine or the clamp logic cannot work with
    pub fn validate(&self) -> Result<(), ConfigError> {
        let field = &self.playfield;
        if !(field.width > 0.0 && field.height > 0.0) {
            return Err(invalid("playfield", "must have positive width and height"));
        }
        // Margins double as wall thickness, so zero would leave no wall
        if !(field.margin_left > 0.0 && field.margin_right > 0.0) {
            return Err(invalid("playfield", "margins must be positive"));
        }
        let largest = BallValue::largest().radius();
        let (lo, hi) = field.drop_range(largest);
        if lo > hi {
            return Err(invalid(
                "playfield",
                format!("too narrow for a ball of radius {largest}"),
            ));
        }
        if !self.gravity.is_finite() {
            return Err(invalid("gravity", "must be finite"));
        }
        if self.spawn_height >= field.ground_top() {
            return Err(invalid("spawn_height", "must be above the ground"));
        }
        if self.settle_speed < 0.0 {
            return Err(invalid("settle_speed", "must not be negative"));
        }
        if self.max_bodies == 0 {
            return Err(invalid("max_bodies", "must be at least 1"));
        }
        Ok(())
    }
}

fn invalid(field: &'static str, reason: impl Into<String>) -> ConfigError {
    ConfigError::Invalid {
        field,
        reason: reason.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let config = GameConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.cooldown(), Duration::from_millis(2000));
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = GameConfig::from_json_str(r#"{ "cooldown_ms": 500, "seed": 7 }"#).unwrap();
        assert_eq!(config.cooldown_ms, 500);
        assert_eq!(config.seed, Some(7));
        assert_eq!(config.gravity, GRAVITY);
        assert_eq!(config.playfield, Playfield::default());
    }

    #[test]
    fn test_json_round_trip() {
        let config = GameConfig {
            max_bodies: 12,
            ..Default::default()
        };
        let json = config.to_json_string().unwrap();
        assert_eq!(GameConfig::from_json_str(&json).unwrap(), config);
    }

    #[test]
    fn test_rejects_narrow_playfield() {
        let json = r#"{ "playfield": { "width": 50.0, "height": 800.0, "margin_left": 10.0, "margin_right": 10.0 } }"#;
        match GameConfig::from_json_str(json) {
            Err(ConfigError::Invalid { field, .. }) => assert_eq!(field, "playfield"),
            other => panic!("expected invalid playfield, got {other:?}"),
        }
    }

    #[test]
    fn test_rejects_zero_or_negative_margins() {
        for (left, right) in [(0.0, 10.0), (10.0, 0.0), (-1.0, 10.0), (f32::NAN, 10.0)] {
            let config = GameConfig {
                playfield: Playfield {
                    margin_left: left,
                    margin_right: right,
                    ..Playfield::default()
                },
                ..Default::default()
            };
            match config.validate() {
                Err(ConfigError::Invalid { field, reason }) => {
                    assert_eq!(field, "playfield");
                    assert!(reason.contains("margins"), "{reason}");
                }
                other => panic!("margins ({left}, {right}) accepted: {other:?}"),
            }
        }
    }

    #[test]
    fn test_rejects_malformed_json() {
        assert!(matches!(
            GameConfig::from_json_str("{ not json"),
            Err(ConfigError::Json(_))
        ));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        assert!(matches!(
            GameConfig::load("/definitely/not/here.json"),
            Err(ConfigError::Io(_))
        ));
    }
}
