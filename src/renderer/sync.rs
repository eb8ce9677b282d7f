//! Render sync: snapshot → drawables
//!
//! Pure projection, no side effects. Called once per presented frame.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::palette;
use crate::sim::{BallValue, BodyId, BodySnapshot, Boundary, PendingSpawn};

/// Alpha of the not-yet-dropped indicator ball
const INDICATOR_ALPHA: f32 = 0.6;

/// A ball ready to draw
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Drawable {
    pub id: BodyId,
    pub pos: Vec2,
    pub radius: f32,
    pub value: BallValue,
    pub color: [f32; 4],
}

/// The indicator ball at the top of the field
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IndicatorDrawable {
    pub pos: Vec2,
    pub radius: f32,
    pub value: BallValue,
    pub color: [f32; 4],
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RectDrawable {
    pub center: Vec2,
    pub half_extents: Vec2,
    pub color: [f32; 4],
}

/// Everything the presenter needs for one frame
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    /// Playfield background, cleared before anything else is drawn
    pub clear_color: [f32; 4],
    pub bodies: Vec<Drawable>,
    pub indicator: Option<IndicatorDrawable>,
    pub walls: Vec<RectDrawable>,
}

pub fn drawable(body: &BodySnapshot) -> Drawable {
    Drawable {
        id: body.id,
        pos: body.pos,
        radius: body.radius,
        value: body.value,
        color: palette::ball_color(body.value),
    }
}

pub fn indicator(pending: &PendingSpawn) -> IndicatorDrawable {
    IndicatorDrawable {
        pos: pending.pos(),
        radius: pending.radius(),
        value: pending.value,
        color: palette::faded(palette::ball_color(pending.value), INDICATOR_ALPHA),
    }
}

/// Project a snapshot into a frame. `pending` is `None` while a drop is in flight.
pub fn project(
    snapshot: &[BodySnapshot],
    pending: Option<&PendingSpawn>,
    boundaries: &[Boundary],
) -> Frame {
    Frame {
        clear_color: palette::BACKGROUND,
        bodies: snapshot.iter().map(drawable).collect(),
        indicator: pending.map(indicator),
        walls: boundaries
            .iter()
            .map(|b| RectDrawable {
                center: b.center,
                half_extents: b.half_extents,
                color: palette::boundary_color(b.kind),
            })
            .collect(),
    }
}
