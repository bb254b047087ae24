// Core math shared by the physics engine

pub mod math;

pub use math::Vector2D;

/// Errors raised by vector arithmetic
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum MathError {
    #[error("Type mismatch: expected {expected} components, got {found}")]
    TypeMismatch { expected: usize, found: usize },

    #[error("Division by zero")]
    DivideByZero,

    #[error("Invalid operation: {0}")]
    InvalidOperation(&'static str),
}
