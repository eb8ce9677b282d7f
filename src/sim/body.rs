//! Body, boundary and value types shared by the simulation

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Stable body identifier (monotonic per world)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct BodyId(pub u32);

/// Static (immovable) or dynamic (simulated) body
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BodyKind {
    Static,
    Dynamic,
}

/// Value printed on a ball; also decides its size and color
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct BallValue(pub u32);

impl BallValue {
    /// Radius grows linearly with value
    pub fn radius(self) -> f32 {
        self.0 as f32 * RADIUS_PER_VALUE
    }

    /// Largest value a new ball can be dealt
    pub fn largest() -> Self {
        BallValue(BALL_VALUES.iter().copied().max().unwrap_or(0))
    }
}

/// Physical material of a ball
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BallMaterial {
    pub restitution: f32,
    pub friction: f32,
    pub density: f32,
    /// Air drag
    pub linear_damping: f32,
}

impl Default for BallMaterial {
    fn default() -> Self {
        Self {
            restitution: BALL_RESTITUTION,
            friction: BALL_FRICTION,
            density: 1.0,
            linear_damping: BALL_LINEAR_DAMPING,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BoundaryKind {
    Ground,
    LeftWall,
    RightWall,
}

/// Static rectangle the balls collide with
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Boundary {
    pub kind: BoundaryKind,
    pub center: Vec2,
    pub half_extents: Vec2,
}

/// Read-only copy of one body, taken after a step
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BodySnapshot {
    pub id: BodyId,
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    pub value: BallValue,
    pub kind: BodyKind,
}
