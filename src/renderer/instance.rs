//! GPU instance layout for circles and rectangles

use bytemuck::{Pod, Zeroable};

use super::sync::Frame;

/// One circle, laid out for an instanced SDF draw call
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct CircleInstance {
    pub center: [f32; 2],
    pub radius: f32,
    pub _pad: f32,
    pub color: [f32; 4],
}

impl CircleInstance {
    pub const fn new(x: f32, y: f32, radius: f32, color: [f32; 4]) -> Self {
        Self {
            center: [x, y],
            radius,
            _pad: 0.0,
            color,
        }
    }
}

/// One axis-aligned rectangle (walls, ground)
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct RectInstance {
    pub center: [f32; 2],
    pub half_extents: [f32; 2],
    pub color: [f32; 4],
}

/// Flatten a frame into instance buffers (balls first, indicator last)
pub fn pack_frame(frame: &Frame) -> (Vec<CircleInstance>, Vec<RectInstance>) {
    let mut circles: Vec<CircleInstance> = frame
        .bodies
        .iter()
        .map(|d| CircleInstance::new(d.pos.x, d.pos.y, d.radius, d.color))
        .collect();
    if let Some(ind) = &frame.indicator {
        circles.push(CircleInstance::new(ind.pos.x, ind.pos.y, ind.radius, ind.color));
    }

    let rects = frame
        .walls
        .iter()
        .map(|w| RectInstance {
            center: w.center.to_array(),
            half_extents: w.half_extents.to_array(),
            color: w.color,
        })
        .collect();

    (circles, rects)
}

/// Raw bytes for upload
pub fn as_bytes<T: Pod>(instances: &[T]) -> &[u8] {
    bytemuck::cast_slice(instances)
}
