//! Pointer gesture tracking
//!
//! Turns raw down/move/up events into a clamped horizontal drop position.
//! A gesture with any move events is a drag and commits at
//! `anchor + last dx`; a gesture without moves is a tap and commits at the
//! release location.

use serde::{Deserialize, Serialize};

use crate::playfield::Playfield;

/// Raw pointer/touch event in screen coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PointerEvent {
    Down { x: f32, y: f32 },
    /// Displacement since the matching `Down`
    Move { dx: f32, dy: f32 },
    Up { x: f32, y: f32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GestureKind {
    Tap,
    Drag,
}

/// What the game should do in response to a pointer event
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum InputAction {
    /// Move the indicator; must not touch the simulation
    Preview(f32),
    /// Drop at `x` (exactly one per completed gesture)
    Commit { x: f32, gesture: GestureKind },
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Gesture {
    anchor_x: f32,
    last_dx: Option<f32>,
}

#[derive(Debug, Clone, Default)]
pub struct InputTracker {
    active: Option<Gesture>,
}

impl InputTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_tracking(&self) -> bool {
        self.active.is_some()
    }

    /// Feed one event. `radius` is the pending ball's radius (for clamping).
    ///
    /// Move/up without a preceding down are ignored.
    pub fn handle(
        &mut self,
        event: PointerEvent,
        playfield: &Playfield,
        radius: f32,
    ) -> Option<InputAction> {
        match event {
            PointerEvent::Down { x, .. } => {
                // A second down restarts the gesture; the first one never commits
                self.active = Some(Gesture {
                    anchor_x: x,
                    last_dx: None,
                });
                None
            }
            PointerEvent::Move { dx, .. } => {
                let gesture = self.active.as_mut()?;
                gesture.last_dx = Some(dx);
                Some(InputAction::Preview(
                    playfield.clamp_x(gesture.anchor_x + dx, radius),
                ))
            }
            PointerEvent::Up { x, .. } => {
                let gesture = self.active.take()?;
                let (raw_x, kind) = match gesture.last_dx {
                    Some(dx) => (gesture.anchor_x + dx, GestureKind::Drag),
                    None => (x, GestureKind::Tap),
                };
                Some(InputAction::Commit {
                    x: playfield.clamp_x(raw_x, radius),
                    gesture: kind,
                })
            }
        }
    }

    /// Forget any gesture in progress (e.g. on unmount)
    pub fn reset(&mut self) {
        self.active = None;
    }
}
