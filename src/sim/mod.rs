//! Simulation module
//!
//! Everything that touches the physics world lives here:
//! - Fixed timestep only (the caller owns the accumulator)
//! - Seeded RNG only
//! - Stable iteration order (by body ID)
//! - No rendering or platform dependencies

pub mod body;
pub mod cooldown;
pub mod events;
pub mod spawn;
pub mod world;

pub use body::{BallMaterial, BallValue, BodyId, BodyKind, BodySnapshot, Boundary, BoundaryKind};
pub use cooldown::{Cooldown, ReleaseReason, SettleTracker};
pub use events::GameEvent;
pub use spawn::{PendingSpawn, SpawnController, SpawnOutcome, random_value};
pub use world::{PhysicsWorld, PostStepCallback};
