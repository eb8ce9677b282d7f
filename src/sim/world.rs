//! Physics world adapter
//!
//! Wraps the rapier2d pipeline behind a small capability surface: add static
//! boundaries, spawn circles, step, and copy positions back out. Rigid-body
//! dynamics (integration, contacts, restitution) are entirely rapier's.

use std::collections::BTreeMap;

use glam::Vec2;
use rapier2d::prelude::{
    CCDSolver, ColliderBuilder, ColliderSet, DefaultBroadPhase, ImpulseJointSet,
    IntegrationParameters, IslandManager, MultibodyJointSet, NarrowPhase, PhysicsPipeline,
    QueryPipeline, Real, RigidBodyBuilder, RigidBodyHandle, RigidBodySet, Vector,
};

use super::body::{BallMaterial, BallValue, BodyId, BodyKind, BodySnapshot, Boundary};
use crate::consts::LENGTH_UNIT;
use crate::error::WorldError;

/// Called after every step with the fresh snapshot
pub type PostStepCallback = Box<dyn FnMut(&[BodySnapshot])>;

/// Bookkeeping for one simulated ball
#[derive(Debug, Clone, Copy)]
struct BodyRecord {
    handle: RigidBodyHandle,
    radius: f32,
    value: BallValue,
    kind: BodyKind,
}

/// Owns one rapier simulation instance
pub struct PhysicsWorld {
    gravity: Vector<Real>,
    integration_parameters: IntegrationParameters,
    physics_pipeline: PhysicsPipeline,
    island_manager: IslandManager,
    broad_phase: DefaultBroadPhase,
    narrow_phase: NarrowPhase,
    bodies: RigidBodySet,
    colliders: ColliderSet,
    impulse_joints: ImpulseJointSet,
    multibody_joints: MultibodyJointSet,
    ccd_solver: CCDSolver,
    query_pipeline: QueryPipeline,
    /// Balls by id (BTreeMap keeps snapshot order stable)
    records: BTreeMap<BodyId, BodyRecord>,
    boundaries: Vec<Boundary>,
    next_id: u32,
    post_step: Option<PostStepCallback>,
    torn_down: bool,
}

impl PhysicsWorld {
    /// Create a world with the given gravity (Y down: positive Y pulls down)
    /// and a fixed set of static boundaries.
    pub fn new(gravity: Vec2, boundaries: &[Boundary]) -> Result<Self, WorldError> {
        let mut integration_parameters = IntegrationParameters::default();
        integration_parameters.length_unit = LENGTH_UNIT;

        let mut world = Self {
            gravity: Vector::new(gravity.x, gravity.y),
            integration_parameters,
            physics_pipeline: PhysicsPipeline::new(),
            island_manager: IslandManager::new(),
            broad_phase: DefaultBroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            bodies: RigidBodySet::new(),
            colliders: ColliderSet::new(),
            impulse_joints: ImpulseJointSet::new(),
            multibody_joints: MultibodyJointSet::new(),
            ccd_solver: CCDSolver::new(),
            query_pipeline: QueryPipeline::new(),
            records: BTreeMap::new(),
            boundaries: Vec::with_capacity(boundaries.len()),
            next_id: 1,
            post_step: None,
            torn_down: false,
        };

        for boundary in boundaries {
            world.add_static_boundary(*boundary)?;
        }

        Ok(world)
    }

    /// Insert a fixed rectangle
    pub fn add_static_boundary(&mut self, boundary: Boundary) -> Result<(), WorldError> {
        if self.torn_down {
            return Err(WorldError::TornDown);
        }
        let Boundary {
            center,
            half_extents,
            ..
        } = boundary;
        if !center.is_finite() {
            return Err(WorldError::NonFinitePosition(center.x, center.y));
        }
        if !(half_extents.min_element() > 0.0) || !half_extents.is_finite() {
            return Err(WorldError::DegenerateBoundary {
                half_width: half_extents.x,
                half_height: half_extents.y,
            });
        }

        let rb = RigidBodyBuilder::fixed()
            .translation(Vector::new(center.x, center.y))
            .build();
        let handle = self.bodies.insert(rb);
        let collider = ColliderBuilder::cuboid(half_extents.x, half_extents.y).build();
        self.colliders
            .insert_with_parent(collider, handle, &mut self.bodies);

        self.boundaries.push(boundary);
        Ok(())
    }

    /// Insert a dynamic ball at rest. Geometry is checked before rapier sees it.
    pub fn spawn_circle(
        &mut self,
        pos: Vec2,
        radius: f32,
        value: BallValue,
        material: BallMaterial,
    ) -> Result<BodyId, WorldError> {
        if self.torn_down {
            log::warn!("Rejected ball spawned into a torn-down world");
            return Err(WorldError::TornDown);
        }
        if !(radius > 0.0) || !radius.is_finite() {
            log::warn!("Rejected ball with radius {radius}");
            return Err(WorldError::NonPositiveRadius(radius));
        }
        if !pos.is_finite() {
            log::warn!("Rejected ball at non-finite position {pos}");
            return Err(WorldError::NonFinitePosition(pos.x, pos.y));
        }

        let id = BodyId(self.next_id);
        self.next_id += 1;

        let rb = RigidBodyBuilder::dynamic()
            .translation(Vector::new(pos.x, pos.y))
            .linear_damping(material.linear_damping)
            .ccd_enabled(true)
            .user_data(id.0 as u128)
            .build();
        let handle = self.bodies.insert(rb);

        let collider = ColliderBuilder::ball(radius)
            .restitution(material.restitution)
            .friction(material.friction)
            .density(material.density)
            .build();
        self.colliders
            .insert_with_parent(collider, handle, &mut self.bodies);

        self.records.insert(
            id,
            BodyRecord {
                handle,
                radius,
                value,
                kind: BodyKind::Dynamic,
            },
        );

        Ok(id)
    }

    /// Remove a ball and its collider. Returns false if the id is unknown.
    pub fn remove_body(&mut self, id: BodyId) -> bool {
        let Some(record) = self.records.remove(&id) else {
            return false;
        };
        self.bodies.remove(
            record.handle,
            &mut self.island_manager,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            true,
        );
        true
    }

    /// Advance the simulation by `dt` seconds, then notify the post-step hook
    pub fn step(&mut self, dt: f32) {
        if self.torn_down || dt <= 0.0 {
            return;
        }

        self.integration_parameters.dt = dt;
        self.physics_pipeline.step(
            &self.gravity,
            &self.integration_parameters,
            &mut self.island_manager,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.bodies,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            &mut self.ccd_solver,
            Some(&mut self.query_pipeline),
            &(),
            &(),
        );

        if let Some(mut callback) = self.post_step.take() {
            let snapshot = self.snapshot();
            callback(&snapshot);
            self.post_step = Some(callback);
        }
    }

    /// Register the hook run after every step (replaces any previous hook)
    pub fn on_post_step(&mut self, callback: impl FnMut(&[BodySnapshot]) + 'static) {
        self.post_step = Some(Box::new(callback));
    }

    /// Current state of every ball, ordered by id
    pub fn snapshot(&self) -> Vec<BodySnapshot> {
        self.records
            .iter()
            .filter_map(|(&id, record)| self.snapshot_record(id, record))
            .collect()
    }

    /// Current state of one ball
    pub fn body(&self, id: BodyId) -> Option<BodySnapshot> {
        let record = self.records.get(&id)?;
        self.snapshot_record(id, record)
    }

    /// Lowest-id dynamic ball other than `except`
    pub fn oldest_dynamic(&self, except: Option<BodyId>) -> Option<BodyId> {
        self.records
            .iter()
            .find(|(id, record)| record.kind == BodyKind::Dynamic && Some(**id) != except)
            .map(|(id, _)| *id)
    }

    /// Number of live balls (boundaries excluded)
    pub fn body_count(&self) -> usize {
        self.records.len()
    }

    pub fn boundaries(&self) -> &[Boundary] {
        &self.boundaries
    }

    pub fn is_torn_down(&self) -> bool {
        self.torn_down
    }

    /// Release every body and stop stepping. Safe to call more than once;
    /// later spawns and boundaries are rejected with `WorldError::TornDown`.
    pub fn teardown(&mut self) {
        if self.torn_down {
            return;
        }
        let released = self.records.len();

        self.post_step = None;
        self.records.clear();
        self.boundaries.clear();
        self.bodies = RigidBodySet::new();
        self.colliders = ColliderSet::new();
        self.impulse_joints = ImpulseJointSet::new();
        self.multibody_joints = MultibodyJointSet::new();
        self.island_manager = IslandManager::new();
        self.broad_phase = DefaultBroadPhase::new();
        self.narrow_phase = NarrowPhase::new();
        self.ccd_solver = CCDSolver::new();
        self.query_pipeline = QueryPipeline::new();
        self.torn_down = true;

        log::debug!("Physics world torn down ({released} balls released)");
    }

    fn snapshot_record(&self, id: BodyId, record: &BodyRecord) -> Option<BodySnapshot> {
        let rb = self.bodies.get(record.handle)?;
        let t = rb.translation();
        let v = rb.linvel();
        Some(BodySnapshot {
            id,
            pos: Vec2::new(t.x, t.y),
            vel: Vec2::new(v.x, v.y),
            radius: record.radius,
            value: record.value,
            kind: record.kind,
        })
    }
}
