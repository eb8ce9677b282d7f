//! Drop cooldown: one-shot timer plus settle detection
//!
//! A drop arms the cooldown. It releases as soon as the dropped ball has been
//! calm for a short window, or when the fixed timer runs out, whichever comes
//! first. Time is simulation time, advanced by the caller.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::body::BodyId;

/// Why the cooldown ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReleaseReason {
    /// The dropped ball stopped moving
    Settled,
    /// The fixed upper bound elapsed first
    Timeout,
    /// The dropped ball left the world (evicted or torn down)
    BodyGone,
}

/// Cancellable one-shot timer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cooldown {
    limit: Duration,
    armed_at: Option<Duration>,
}

impl Cooldown {
    pub fn new(limit: Duration) -> Self {
        Self {
            limit,
            armed_at: None,
        }
    }

    pub fn arm(&mut self, now: Duration) {
        self.armed_at = Some(now);
    }

    pub fn cancel(&mut self) {
        self.armed_at = None;
    }

    pub fn is_active(&self) -> bool {
        self.armed_at.is_some()
    }

    /// True once `limit` has passed since arming
    pub fn expired(&self, now: Duration) -> bool {
        self.armed_at
            .is_some_and(|at| now.saturating_sub(at) >= self.limit)
    }

    /// Time left before the timer fires (zero when idle)
    pub fn remaining(&self, now: Duration) -> Duration {
        match self.armed_at {
            Some(at) => self.limit.saturating_sub(now.saturating_sub(at)),
            None => Duration::ZERO,
        }
    }
}

/// Watches one dropped ball until it stays calm long enough
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SettleTracker {
    pub body: BodyId,
    speed_epsilon: f32,
    window: Duration,
    calm_for: Duration,
    /// A ball at rest in the spawn position is not settled yet
    has_moved: bool,
    landed: bool,
}

impl SettleTracker {
    pub fn new(body: BodyId, speed_epsilon: f32, window: Duration) -> Self {
        Self {
            body,
            speed_epsilon,
            window,
            calm_for: Duration::ZERO,
            has_moved: false,
            landed: false,
        }
    }

    /// Feed one step's speed. Returns true once the ball counts as settled.
    pub fn observe(&mut self, speed: f32, dt: Duration) -> bool {
        if speed > self.speed_epsilon {
            self.has_moved = true;
            self.calm_for = Duration::ZERO;
            return false;
        }
        if !self.has_moved {
            return false;
        }
        self.calm_for += dt;
        self.calm_for >= self.window
    }

    /// Mark the first ground contact. Returns true only the first time.
    pub fn mark_landed(&mut self) -> bool {
        !std::mem::replace(&mut self.landed, true)
    }

    pub fn has_landed(&self) -> bool {
        self.landed
    }
}
