//! rigid2d: a minimal 2D rigid-body physics core
//!
//! Oriented rectangles, SAT collision detection and single-pass impulse
//! resolution with angular response. The host owns a [`PhysicsWorld`],
//! feeds it timesteps and reads body poses back for rendering.

pub mod core;
pub mod engine;

pub use crate::core::{MathError, Vector2D};
pub use crate::engine::clock::SimulationClock;
pub use crate::engine::physics::{
    BodyBuilder, BodyHandle, Collision, Contact, Mass, PhysicsError, PhysicsWorld,
    RestitutionRule, RigidBody, WorldConfig,
};
