//! Events emitted by the simulation for the presenter (sounds, effects, HUD)

use serde::{Deserialize, Serialize};

use super::body::{BallValue, BodyId};
use super::cooldown::ReleaseReason;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    /// A ball was dropped
    Spawned { id: BodyId, value: BallValue, x: f32 },
    /// A drop arrived while the previous ball was still in flight
    CommitIgnored { x: f32 },
    /// The dropped ball touched the ground for the first time
    Landed { id: BodyId },
    /// The dropped ball came to rest
    Settled { id: BodyId },
    /// New drops are accepted again
    CooldownReleased { reason: ReleaseReason },
    /// The oldest ball was removed to keep the world under its body cap
    Evicted { id: BodyId },
}
