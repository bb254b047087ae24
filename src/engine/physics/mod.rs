// Rigid-body physics: bodies, SAT collision, impulse resolution

pub mod body;
mod collision;
mod contact;
mod world;

pub use body::{BodyBuilder, Mass, RigidBody};
pub use collision::Collision;
pub use contact::{line_intersection, Contact};
pub use world::{BodyHandle, PhysicsWorld, RestitutionRule, WorldConfig};

use crate::core::MathError;

/// Physics errors
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PhysicsError {
    #[error("Body not found: {0}")]
    NotFound(BodyHandle),

    #[error("Invalid body: {0}")]
    InvalidBody(String),

    #[error("Invalid timestep: {0}")]
    InvalidTimestep(f64),

    #[error("Math error: {0}")]
    Math(#[from] MathError),
}
