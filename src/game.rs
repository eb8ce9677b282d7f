//! Game loop lifecycle
//!
//! `Uninitialized → Running → Stopped`. Mounting builds the world and its
//! boundaries; every frame runs fixed simulation substeps out of an
//! accumulator and projects the result; unmounting cancels the cooldown and
//! tears the world down. A stopped loop cannot be mounted again.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use glam::Vec2;

use crate::config::GameConfig;
use crate::consts::*;
use crate::error::GameError;
use crate::input::{InputAction, InputTracker, PointerEvent};
use crate::renderer::{Frame, project};
use crate::sim::{
    BodySnapshot, GameEvent, PendingSpawn, PhysicsWorld, SpawnController, SpawnOutcome,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    Uninitialized,
    Running,
    Stopped,
}

/// Everything owned by one mounted game
struct Session {
    config: GameConfig,
    world: PhysicsWorld,
    spawner: SpawnController,
    input: InputTracker,
    /// Simulation time since mount
    clock: Duration,
    events: Vec<GameEvent>,
}

impl Session {
    fn new(config: GameConfig) -> Result<Self, GameError> {
        config.validate()?;
        let seed = config.seed.unwrap_or_else(clock_seed);
        let world = PhysicsWorld::new(
            Vec2::new(0.0, config.gravity),
            &config.playfield.boundaries(),
        )?;
        let spawner = SpawnController::new(&config, seed);

        log::info!(
            "Game mounted: {}x{} playfield, seed {}",
            config.playfield.width,
            config.playfield.height,
            seed
        );

        Ok(Self {
            config,
            world,
            spawner,
            input: InputTracker::new(),
            clock: Duration::ZERO,
            events: Vec::new(),
        })
    }

    fn tick(&mut self, dt: f32) {
        let step = Duration::from_secs_f32(dt);
        self.world.step(dt);
        self.clock += step;
        self.spawner
            .update(&self.world, self.clock, step, &mut self.events);
    }

    fn commit(&mut self, x: f32) -> Result<SpawnOutcome, GameError> {
        Ok(self
            .spawner
            .on_commit(x, &mut self.world, self.clock, &mut self.events)?)
    }

    fn frame(&self) -> Frame {
        let pending = (!self.spawner.is_cooling_down()).then(|| self.spawner.pending());
        project(
            &self.world.snapshot(),
            pending.as_ref(),
            self.world.boundaries(),
        )
    }

    fn teardown(&mut self) {
        self.spawner.cancel();
        self.input.reset();
        self.world.teardown();
    }
}

/// Owns the simulation for the lifetime of one mounted view
pub struct GameLoop {
    state: LoopState,
    session: Option<Session>,
    accumulator: f32,
}

impl Default for GameLoop {
    fn default() -> Self {
        Self::new()
    }
}

impl GameLoop {
    pub fn new() -> Self {
        Self {
            state: LoopState::Uninitialized,
            session: None,
            accumulator: 0.0,
        }
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    /// Build the world and start accepting frames and input
    pub fn mount(&mut self, config: GameConfig) -> Result<(), GameError> {
        match self.state {
            LoopState::Running => return Err(GameError::AlreadyRunning),
            LoopState::Stopped => return Err(GameError::AlreadyStopped),
            LoopState::Uninitialized => {}
        }
        self.session = Some(Session::new(config)?);
        self.accumulator = 0.0;
        self.state = LoopState::Running;
        Ok(())
    }

    /// Stop stepping, cancel the pending cooldown and release every body.
    /// Safe to call in any state.
    pub fn unmount(&mut self) {
        if let Some(mut session) = self.session.take() {
            let bodies = session.world.body_count();
            session.teardown();
            log::info!(
                "Game unmounted after {:.1}s ({} balls released)",
                session.clock.as_secs_f32(),
                bodies
            );
        }
        self.state = LoopState::Stopped;
    }

    /// Route a pointer event: moves preview the indicator, a completed gesture drops a ball
    pub fn pointer(&mut self, event: PointerEvent) -> Result<Option<SpawnOutcome>, GameError> {
        let session = self.session.as_mut().ok_or(GameError::NotRunning)?;
        let radius = session.spawner.pending().radius();

        match session
            .input
            .handle(event, &session.config.playfield, radius)
        {
            Some(InputAction::Preview(x)) => {
                session.spawner.preview(x);
                Ok(None)
            }
            Some(InputAction::Commit { x, gesture }) => {
                log::trace!("{gesture:?} released at x={x:.1}");
                session.spawner.preview(x);
                session.commit(x).map(Some)
            }
            None => Ok(None),
        }
    }

    /// Drop the pending ball at `x` directly (clamped)
    pub fn commit_drop(&mut self, x: f32) -> Result<SpawnOutcome, GameError> {
        self.session
            .as_mut()
            .ok_or(GameError::NotRunning)?
            .commit(x)
    }

    /// Advance by real elapsed seconds and return the frame to present.
    ///
    /// Returns `None` unless the loop is running.
    pub fn frame(&mut self, elapsed: f32) -> Option<Frame> {
        let session = self.session.as_mut()?;

        // NaN would survive clamp and stall the accumulator for good
        let elapsed = if elapsed.is_finite() {
            elapsed.clamp(0.0, MAX_FRAME_DT)
        } else {
            0.0
        };
        self.accumulator += elapsed;
        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            session.tick(SIM_DT);
            self.accumulator -= SIM_DT;
            substeps += 1;
        }

        Some(session.frame())
    }

    /// Run exactly one fixed simulation step, bypassing the accumulator
    pub fn step(&mut self) -> Result<(), GameError> {
        self.session
            .as_mut()
            .ok_or(GameError::NotRunning)?
            .tick(SIM_DT);
        Ok(())
    }

    /// Register a hook run after every physics step
    pub fn on_post_step(
        &mut self,
        callback: impl FnMut(&[BodySnapshot]) + 'static,
    ) -> Result<(), GameError> {
        self.session
            .as_mut()
            .ok_or(GameError::NotRunning)?
            .world
            .on_post_step(callback);
        Ok(())
    }

    /// Take the events produced since the last call
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        self.session
            .as_mut()
            .map(|s| std::mem::take(&mut s.events))
            .unwrap_or_default()
    }

    pub fn snapshot(&self) -> Vec<BodySnapshot> {
        self.session
            .as_ref()
            .map(|s| s.world.snapshot())
            .unwrap_or_default()
    }

    pub fn body_count(&self) -> usize {
        self.session.as_ref().map_or(0, |s| s.world.body_count())
    }

    pub fn pending(&self) -> Option<PendingSpawn> {
        self.session.as_ref().map(|s| s.spawner.pending())
    }

    pub fn is_cooling_down(&self) -> bool {
        self.session
            .as_ref()
            .is_some_and(|s| s.spawner.is_cooling_down())
    }

    /// Simulation time since mount
    pub fn elapsed(&self) -> Duration {
        self.session.as_ref().map_or(Duration::ZERO, |s| s.clock)
    }

    pub fn config(&self) -> Option<&GameConfig> {
        self.session.as_ref().map(|s| &s.config)
    }
}

impl Drop for GameLoop {
    fn drop(&mut self) {
        if self.session.is_some() {
            self.unmount();
        }
    }
}

fn clock_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ConfigError;

    fn config() -> GameConfig {
        GameConfig {
            seed: Some(1),
            ..Default::default()
        }
    }

    #[test]
    fn test_lifecycle_transitions() {
        let mut game = GameLoop::new();
        assert_eq!(game.state(), LoopState::Uninitialized);
        assert!(game.frame(SIM_DT).is_none());

        game.mount(config()).unwrap();
        assert_eq!(game.state(), LoopState::Running);
        assert!(matches!(game.mount(config()), Err(GameError::AlreadyRunning)));

        game.unmount();
        assert_eq!(game.state(), LoopState::Stopped);
        assert!(matches!(game.mount(config()), Err(GameError::AlreadyStopped)));
    }

    #[test]
    fn test_unmount_is_idempotent() {
        let mut game = GameLoop::new();
        game.mount(config()).unwrap();
        game.unmount();
        game.unmount();
        assert_eq!(game.state(), LoopState::Stopped);
        assert_eq!(game.body_count(), 0);
    }

    #[test]
    fn test_unmount_cancels_pending_cooldown() {
        let mut game = GameLoop::new();
        game.mount(config()).unwrap();
        game.commit_drop(150.0).unwrap();
        assert!(game.is_cooling_down());

        game.unmount();
        assert!(!game.is_cooling_down());
        assert!(game.frame(SIM_DT).is_none());
        assert!(game.drain_events().is_empty());
    }

    #[test]
    fn test_invalid_config_keeps_loop_uninitialized() {
        let mut game = GameLoop::new();
        let bad = GameConfig {
            max_bodies: 0,
            ..config()
        };
        assert!(matches!(game.mount(bad), Err(GameError::Config(_))));
        assert_eq!(game.state(), LoopState::Uninitialized);
        game.mount(config()).unwrap();
    }

    #[test]
    fn test_zero_margin_fails_validation_not_world_setup() {
        let mut game = GameLoop::new();
        let mut bad = config();
        bad.playfield.margin_left = 0.0;
        assert!(matches!(
            game.mount(bad),
            Err(GameError::Config(ConfigError::Invalid {
                field: "playfield",
                ..
            }))
        ));
        assert_eq!(game.state(), LoopState::Uninitialized);
    }

    #[test]
    fn test_input_before_mount_is_rejected() {
        let mut game = GameLoop::new();
        assert!(matches!(
            game.pointer(PointerEvent::Down { x: 10.0, y: 10.0 }),
            Err(GameError::NotRunning)
        ));
        assert!(matches!(game.step(), Err(GameError::NotRunning)));
    }

    #[test]
    fn test_frame_runs_fixed_substeps() {
        let mut game = GameLoop::new();
        game.mount(config()).unwrap();

        // Leftover half step stays in the accumulator
        game.frame(SIM_DT * 3.5);
        let ticks = (game.elapsed().as_secs_f32() / SIM_DT).round() as u32;
        assert_eq!(ticks, 3);

        // Huge frame gaps are clamped to MAX_FRAME_DT (0.5 + 6 steps)
        game.frame(10.0);
        let ticks = (game.elapsed().as_secs_f32() / SIM_DT).round() as u32;
        assert_eq!(ticks, 3 + 6);
    }

    #[test]
    fn test_non_finite_frame_delta_is_ignored() {
        let mut game = GameLoop::new();
        game.mount(config()).unwrap();
        game.commit_drop(150.0).unwrap();

        game.frame(f32::NAN);
        game.frame(f32::INFINITY);
        game.frame(f32::NEG_INFINITY);
        assert_eq!(game.elapsed(), Duration::ZERO);

        // Stepping resumes and the cooldown still runs out
        let frames = (COOLDOWN_MS as f32 / 1000.0 / SIM_DT) as u32 + 10;
        for _ in 0..frames {
            game.frame(SIM_DT);
        }
        let ticks = (game.elapsed().as_secs_f32() / SIM_DT).round() as u32;
        assert!(ticks + 1 >= frames, "only {ticks} of {frames} frames stepped");
        assert!(!game.is_cooling_down());
    }

    #[test]
    fn test_indicator_hidden_while_ball_in_flight() {
        let mut game = GameLoop::new();
        game.mount(config()).unwrap();

        let frame = game.frame(SIM_DT).unwrap();
        assert!(frame.indicator.is_some());
        assert_eq!(frame.walls.len(), 3);

        game.commit_drop(150.0).unwrap();
        let frame = game.frame(SIM_DT).unwrap();
        assert!(frame.indicator.is_none());
        assert_eq!(frame.bodies.len(), 1);
    }
}
