//! Spawn controller
//!
//! Turns a committed drop position into a dynamic ball, gates overlapping
//! drops behind the cooldown, and deals the next value.

use std::time::Duration;

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::body::{BallMaterial, BallValue, BodyId};
use super::cooldown::{Cooldown, ReleaseReason, SettleTracker};
use super::events::GameEvent;
use super::world::PhysicsWorld;
use crate::config::GameConfig;
use crate::consts::{BALL_VALUES, LANDING_SLOP};
use crate::error::WorldError;
use crate::playfield::Playfield;

/// The not-yet-dropped ball shown at the top of the field
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PendingSpawn {
    pub value: BallValue,
    /// Tracked horizontal position (already clamped for this ball's radius)
    pub x: f32,
    pub y: f32,
}

impl PendingSpawn {
    pub fn radius(&self) -> f32 {
        self.value.radius()
    }

    pub fn pos(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }
}

/// Result of a drop request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpawnOutcome {
    Spawned(BodyId),
    /// Cooldown was active; nothing happened
    Ignored,
}

/// Draw one of the dealable values uniformly
pub fn random_value(rng: &mut Pcg32) -> BallValue {
    BallValue(BALL_VALUES[rng.random_range(0..BALL_VALUES.len())])
}

pub struct SpawnController {
    rng: Pcg32,
    pending: PendingSpawn,
    cooldown: Cooldown,
    settle: Option<SettleTracker>,
    playfield: Playfield,
    material: BallMaterial,
    settle_speed: f32,
    settle_window: Duration,
    max_bodies: usize,
}

impl SpawnController {
    pub fn new(config: &GameConfig, seed: u64) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let value = random_value(&mut rng);
        let playfield = config.playfield;
        let pending = PendingSpawn {
            value,
            x: playfield.clamp_x(playfield.width / 2.0, value.radius()),
            y: config.spawn_height,
        };

        Self {
            rng,
            pending,
            cooldown: Cooldown::new(config.cooldown()),
            settle: None,
            playfield,
            material: config.material,
            settle_speed: config.settle_speed,
            settle_window: config.settle_window(),
            max_bodies: config.max_bodies,
        }
    }

    pub fn pending(&self) -> PendingSpawn {
        self.pending
    }

    pub fn next_value(&self) -> BallValue {
        self.pending.value
    }

    pub fn is_cooling_down(&self) -> bool {
        self.cooldown.is_active()
    }

    /// Ball currently holding the cooldown, if any
    pub fn tracked_body(&self) -> Option<BodyId> {
        self.settle.map(|s| s.body)
    }

    pub fn cooldown_remaining(&self, now: Duration) -> Duration {
        self.cooldown.remaining(now)
    }

    /// Move the indicator. Never touches the simulation.
    pub fn preview(&mut self, x: f32) {
        self.pending.x = self.playfield.clamp_x(x, self.pending.radius());
    }

    /// Drop the pending ball at `x`.
    ///
    /// While the cooldown is active the request is dropped silently.
    pub fn on_commit(
        &mut self,
        x: f32,
        world: &mut PhysicsWorld,
        now: Duration,
        events: &mut Vec<GameEvent>,
    ) -> Result<SpawnOutcome, WorldError> {
        if self.cooldown.is_active() {
            log::debug!("Drop at x={x:.1} ignored, cooldown active");
            events.push(GameEvent::CommitIgnored { x });
            return Ok(SpawnOutcome::Ignored);
        }

        let value = self.pending.value;
        let radius = value.radius();
        let x = self.playfield.clamp_x(x, radius);

        while world.body_count() >= self.max_bodies {
            let Some(oldest) = world.oldest_dynamic(self.tracked_body()) else {
                break;
            };
            world.remove_body(oldest);
            log::debug!("Evicted ball {} (cap {})", oldest.0, self.max_bodies);
            events.push(GameEvent::Evicted { id: oldest });
        }

        let id = world.spawn_circle(
            Vec2::new(x, self.pending.y),
            radius,
            value,
            self.material,
        )?;
        log::debug!("Dropped ball {} value={} at x={x:.1}", id.0, value.0);
        events.push(GameEvent::Spawned { id, value, x });

        self.cooldown.arm(now);
        self.settle = Some(SettleTracker::new(id, self.settle_speed, self.settle_window));

        let next = random_value(&mut self.rng);
        self.pending = PendingSpawn {
            value: next,
            x: self.playfield.clamp_x(x, next.radius()),
            y: self.pending.y,
        };

        Ok(SpawnOutcome::Spawned(id))
    }

    /// Watch the dropped ball after a step; release the cooldown when it settles
    /// or when the timer runs out.
    pub fn update(
        &mut self,
        world: &PhysicsWorld,
        now: Duration,
        dt: Duration,
        events: &mut Vec<GameEvent>,
    ) -> Option<ReleaseReason> {
        if !self.cooldown.is_active() {
            return None;
        }

        let reason = match self.settle.as_mut() {
            Some(tracker) => match world.body(tracker.body) {
                None => Some(ReleaseReason::BodyGone),
                Some(ball) => {
                    let landing_line = self.playfield.ground_top() - LANDING_SLOP;
                    if ball.pos.y + ball.radius >= landing_line && tracker.mark_landed() {
                        events.push(GameEvent::Landed { id: ball.id });
                    }
                    if tracker.observe(ball.vel.length(), dt) {
                        events.push(GameEvent::Settled { id: ball.id });
                        Some(ReleaseReason::Settled)
                    } else if self.cooldown.expired(now) {
                        Some(ReleaseReason::Timeout)
                    } else {
                        None
                    }
                }
            },
            None if self.cooldown.expired(now) => Some(ReleaseReason::Timeout),
            None => None,
        };

        if let Some(reason) = reason {
            self.release(reason, events);
        }
        reason
    }

    /// Drop any pending cooldown without emitting events (used on unmount)
    pub fn cancel(&mut self) {
        self.cooldown.cancel();
        self.settle = None;
    }

    fn release(&mut self, reason: ReleaseReason, events: &mut Vec<GameEvent>) {
        self.cooldown.cancel();
        self.settle = None;
        log::debug!("Cooldown released ({reason:?})");
        events.push(GameEvent::CooldownReleased { reason });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;

    fn setup(config: &GameConfig) -> (SpawnController, PhysicsWorld) {
        let world = PhysicsWorld::new(
            Vec2::new(0.0, config.gravity),
            &config.playfield.boundaries(),
        )
        .unwrap();
        (SpawnController::new(config, 42), world)
    }

    fn step_for(
        spawner: &mut SpawnController,
        world: &mut PhysicsWorld,
        now: &mut Duration,
        span: Duration,
        events: &mut Vec<GameEvent>,
    ) -> Option<ReleaseReason> {
        let dt = Duration::from_secs_f32(SIM_DT);
        let end = *now + span;
        let mut released = None;
        while *now < end {
            world.step(SIM_DT);
            *now += dt;
            released = released.or(spawner.update(world, *now, dt, events));
        }
        released
    }

    #[test]
    fn test_commit_spawns_pending_value() {
        let config = GameConfig::default();
        let (mut spawner, mut world) = setup(&config);
        let mut events = Vec::new();
        let value = spawner.next_value();

        let outcome = spawner
            .on_commit(120.0, &mut world, Duration::ZERO, &mut events)
            .unwrap();
        let SpawnOutcome::Spawned(id) = outcome else {
            panic!("expected a spawn, got {outcome:?}");
        };

        let ball = world.body(id).unwrap();
        assert_eq!(ball.value, value);
        assert_eq!(ball.radius, value.radius());
        assert_eq!(ball.pos, Vec2::new(120.0, SPAWN_HEIGHT));
        assert!(spawner.is_cooling_down());
        assert_eq!(events, vec![GameEvent::Spawned { id, value, x: 120.0 }]);
    }

    #[test]
    fn test_commit_during_cooldown_is_ignored() {
        let config = GameConfig::default();
        let (mut spawner, mut world) = setup(&config);
        let mut events = Vec::new();

        spawner
            .on_commit(120.0, &mut world, Duration::ZERO, &mut events)
            .unwrap();
        let pending = spawner.pending();
        for ms in [0, 100, 500, 1999] {
            let outcome = spawner
                .on_commit(200.0, &mut world, Duration::from_millis(ms), &mut events)
                .unwrap();
            assert_eq!(outcome, SpawnOutcome::Ignored);
        }
        assert_eq!(world.body_count(), 1);
        assert_eq!(spawner.pending(), pending);
    }

    #[test]
    fn test_commit_clamps_x() {
        let config = GameConfig::default();
        let (mut spawner, mut world) = setup(&config);
        let mut events = Vec::new();
        let radius = spawner.pending().radius();

        let SpawnOutcome::Spawned(id) = spawner
            .on_commit(-500.0, &mut world, Duration::ZERO, &mut events)
            .unwrap()
        else {
            panic!("expected a spawn");
        };
        assert_eq!(world.body(id).unwrap().pos.x, SIDE_MARGIN + radius);
    }

    #[test]
    fn test_timeout_releases_without_settling() {
        // Settle window longer than the timer: only the timer can release
        let config = GameConfig {
            cooldown_ms: 500,
            settle_window_ms: 60_000,
            ..Default::default()
        };
        let (mut spawner, mut world) = setup(&config);
        let mut events = Vec::new();
        let mut now = Duration::ZERO;

        spawner.on_commit(120.0, &mut world, now, &mut events).unwrap();
        let released = step_for(
            &mut spawner,
            &mut world,
            &mut now,
            Duration::from_millis(600),
            &mut events,
        );
        assert_eq!(released, Some(ReleaseReason::Timeout));
        assert!(!spawner.is_cooling_down());
    }

    #[test]
    fn test_settle_releases_before_timeout() {
        let config = GameConfig {
            cooldown_ms: 60_000,
            ..Default::default()
        };
        let (mut spawner, mut world) = setup(&config);
        let mut events = Vec::new();
        let mut now = Duration::ZERO;

        let SpawnOutcome::Spawned(id) = spawner
            .on_commit(120.0, &mut world, now, &mut events)
            .unwrap()
        else {
            panic!("expected a spawn");
        };
        let released = step_for(
            &mut spawner,
            &mut world,
            &mut now,
            Duration::from_secs(10),
            &mut events,
        );
        assert_eq!(released, Some(ReleaseReason::Settled));
        assert!(events.contains(&GameEvent::Landed { id }));
        assert!(events.contains(&GameEvent::Settled { id }));
    }

    #[test]
    fn test_one_spawn_after_release() {
        let config = GameConfig {
            cooldown_ms: 300,
            ..Default::default()
        };
        let (mut spawner, mut world) = setup(&config);
        let mut events = Vec::new();
        let mut now = Duration::ZERO;

        spawner.on_commit(120.0, &mut world, now, &mut events).unwrap();
        step_for(
            &mut spawner,
            &mut world,
            &mut now,
            Duration::from_millis(400),
            &mut events,
        );

        let first = spawner.on_commit(200.0, &mut world, now, &mut events).unwrap();
        let second = spawner.on_commit(260.0, &mut world, now, &mut events).unwrap();
        assert!(matches!(first, SpawnOutcome::Spawned(_)));
        assert_eq!(second, SpawnOutcome::Ignored);
        assert_eq!(world.body_count(), 2);
    }

    #[test]
    fn test_evicted_tracked_body_releases() {
        let config = GameConfig::default();
        let (mut spawner, mut world) = setup(&config);
        let mut events = Vec::new();

        let SpawnOutcome::Spawned(id) = spawner
            .on_commit(120.0, &mut world, Duration::ZERO, &mut events)
            .unwrap()
        else {
            panic!("expected a spawn");
        };
        world.remove_body(id);
        let dt = Duration::from_secs_f32(SIM_DT);
        assert_eq!(
            spawner.update(&world, dt, dt, &mut events),
            Some(ReleaseReason::BodyGone)
        );
    }

    #[test]
    fn test_body_cap_evicts_oldest() {
        let config = GameConfig {
            max_bodies: 2,
            cooldown_ms: 0,
            ..Default::default()
        };
        let (mut spawner, mut world) = setup(&config);
        let mut events = Vec::new();
        let dt = Duration::from_secs_f32(SIM_DT);
        let mut now = Duration::ZERO;

        let mut ids = Vec::new();
        for x in [60.0, 180.0, 300.0] {
            if let SpawnOutcome::Spawned(id) =
                spawner.on_commit(x, &mut world, now, &mut events).unwrap()
            {
                ids.push(id);
            }
            now += dt;
            spawner.update(&world, now, dt, &mut events);
        }

        assert_eq!(ids.len(), 3);
        assert_eq!(world.body_count(), 2);
        assert!(world.body(ids[0]).is_none());
        assert!(events.contains(&GameEvent::Evicted { id: ids[0] }));
    }

    #[test]
    fn test_same_seed_deals_same_values() {
        let mut a = Pcg32::seed_from_u64(9);
        let mut b = Pcg32::seed_from_u64(9);
        let xs: Vec<BallValue> = (0..32).map(|_| random_value(&mut a)).collect();
        let ys: Vec<BallValue> = (0..32).map(|_| random_value(&mut b)).collect();
        assert_eq!(xs, ys);
        assert!(xs.iter().all(|v| BALL_VALUES.contains(&v.0)));
    }

    #[test]
    fn test_preview_moves_indicator_only() {
        let config = GameConfig::default();
        let (mut spawner, world) = setup(&config);
        spawner.preview(10_000.0);
        let pending = spawner.pending();
        let (_, hi) = config.playfield.drop_range(pending.radius());
        assert_eq!(pending.x, hi);
        assert_eq!(world.body_count(), 0);
        assert!(!spawner.is_cooling_down());
    }
}
