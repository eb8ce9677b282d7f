//! Colors for game elements

use crate::sim::{BallValue, BoundaryKind};

/// Fill color for a ball of `value` (unknown values get `BALL_DEFAULT`)
pub fn ball_color(value: BallValue) -> [f32; 4] {
    match value.0 {
        2 => BALL_2,
        4 => BALL_4,
        8 => BALL_8,
        16 => BALL_16,
        32 => BALL_32,
        64 => BALL_64,
        _ => BALL_DEFAULT,
    }
}

pub fn boundary_color(kind: BoundaryKind) -> [f32; 4] {
    match kind {
        BoundaryKind::Ground => GROUND,
        BoundaryKind::LeftWall | BoundaryKind::RightWall => WALL,
    }
}

/// Same color with its alpha scaled (indicator ball)
pub fn faded(color: [f32; 4], alpha: f32) -> [f32; 4] {
    [color[0], color[1], color[2], color[3] * alpha]
}

pub const BALL_2: [f32; 4] = [1.0, 0.39, 0.28, 1.0]; // Tomato
pub const BALL_4: [f32; 4] = [1.0, 0.65, 0.0, 1.0];
pub const BALL_8: [f32; 4] = [0.95, 0.85, 0.2, 1.0];
pub const BALL_16: [f32; 4] = [0.4, 0.8, 0.35, 1.0];
pub const BALL_32: [f32; 4] = [0.3, 0.6, 1.0, 1.0];
pub const BALL_64: [f32; 4] = [0.6, 0.35, 0.9, 1.0];
pub const BALL_DEFAULT: [f32; 4] = [0.7, 0.7, 0.7, 1.0];
pub const GROUND: [f32; 4] = [0.0, 0.5, 0.0, 1.0];
pub const WALL: [f32; 4] = [0.65, 0.16, 0.16, 1.0];
pub const BACKGROUND: [f32; 4] = [0.93, 0.93, 0.93, 1.0];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_and_unknown_values() {
        assert_eq!(ball_color(BallValue(2)), BALL_2);
        assert_eq!(ball_color(BallValue(8)), BALL_8);
        assert_eq!(ball_color(BallValue(3)), BALL_DEFAULT);
        assert_eq!(ball_color(BallValue(0)), BALL_DEFAULT);
    }
}
