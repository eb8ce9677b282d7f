//! Playfield geometry: walls, ground and the horizontal drop range

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::sim::{Boundary, BoundaryKind};

/// The visible box balls are dropped into (screen coordinates, Y down)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Playfield {
    pub width: f32,
    pub height: f32,
    pub margin_left: f32,
    pub margin_right: f32,
}

impl Default for Playfield {
    fn default() -> Self {
        Self {
            width: PLAYFIELD_WIDTH,
            height: PLAYFIELD_HEIGHT,
            margin_left: SIDE_MARGIN,
            margin_right: SIDE_MARGIN,
        }
    }
}

impl Playfield {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            ..Default::default()
        }
    }

    /// Allowed range for the center of a ball of `radius`
    pub fn drop_range(&self, radius: f32) -> (f32, f32) {
        (
            self.margin_left + radius,
            self.width - self.margin_right - radius,
        )
    }

    /// Clamp a horizontal coordinate so a ball of `radius` fits between the walls.
    ///
    /// If the ball is wider than the gap, the midpoint of the gap is returned.
    pub fn clamp_x(&self, x: f32, radius: f32) -> f32 {
        let (lo, hi) = self.drop_range(radius);
        if lo > hi {
            return (self.margin_left + self.width - self.margin_right) / 2.0;
        }
        if x.is_nan() {
            return lo;
        }
        x.clamp(lo, hi)
    }

    /// Center of the ground slab
    pub fn ground_center(&self) -> Vec2 {
        Vec2::new(self.width / 2.0, self.height - GROUND_OFFSET)
    }

    /// Y coordinate of the ground's top surface
    pub fn ground_top(&self) -> f32 {
        self.ground_center().y - GROUND_THICKNESS / 2.0
    }

    /// Static boundaries: ground between the walls, plus both walls at full height
    pub fn boundaries(&self) -> [Boundary; 3] {
        let ground_width = self.width - self.margin_left - self.margin_right;
        [
            Boundary {
                kind: BoundaryKind::Ground,
                center: Vec2::new(
                    self.margin_left + ground_width / 2.0,
                    self.ground_center().y,
                ),
                half_extents: Vec2::new(ground_width / 2.0, GROUND_THICKNESS / 2.0),
            },
            Boundary {
                kind: BoundaryKind::LeftWall,
                center: Vec2::new(self.margin_left / 2.0, self.height / 2.0),
                half_extents: Vec2::new(self.margin_left / 2.0, self.height / 2.0),
            },
            Boundary {
                kind: BoundaryKind::RightWall,
                center: Vec2::new(self.width - self.margin_right / 2.0, self.height / 2.0),
                half_extents: Vec2::new(self.margin_right / 2.0, self.height / 2.0),
            },
        ]
    }
}
