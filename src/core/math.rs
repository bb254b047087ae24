// 2D vector math used by bodies, collision and the world

use super::MathError;
use glam::DVec2;
use std::fmt;
use std::ops::{Add, AddAssign, Mul, Neg, Sub, SubAssign};

/// Immutable 2D vector in double precision
///
/// Every operation returns a new vector. Angles taken by [`Vector2D::rotate`]
/// are in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vector2D(DVec2);

impl Vector2D {
    /// The zero vector
    pub const ZERO: Self = Self(DVec2::ZERO);

    /// Create a vector from its two components
    pub const fn new(x: f64, y: f64) -> Self {
        Self(DVec2::new(x, y))
    }

    /// Build a vector from a slice holding exactly two components
    pub fn from_slice(components: &[f64]) -> Result<Self, MathError> {
        match components {
            [x, y] => Ok(Self::new(*x, *y)),
            _ => Err(MathError::TypeMismatch {
                expected: 2,
                found: components.len(),
            }),
        }
    }

    pub fn x(&self) -> f64 {
        self.0.x
    }

    pub fn y(&self) -> f64 {
        self.0.y
    }

    /// Multiply both components by a scalar
    pub fn scale(self, factor: f64) -> Self {
        Self(self.0 * factor)
    }

    /// Divide both components by a scalar, refusing zero
    pub fn try_div(self, divisor: f64) -> Result<Self, MathError> {
        if divisor == 0.0 {
            return Err(MathError::DivideByZero);
        }
        Ok(Self::new(self.x() / divisor, self.y() / divisor))
    }

    /// Euclidean norm
    pub fn length(&self) -> f64 {
        self.0.length()
    }

    /// Unit vector in the same direction
    pub fn normalize(&self) -> Result<Self, MathError> {
        let length = self.length();
        if length == 0.0 {
            return Err(MathError::InvalidOperation(
                "cannot normalize a zero-length vector",
            ));
        }
        Ok(Self::new(self.x() / length, self.y() / length))
    }

    /// Rotate by `degrees` using the standard rotation matrix
    pub fn rotate(&self, degrees: f64) -> Self {
        Self(DVec2::from_angle(degrees.to_radians()).rotate(self.0))
    }

    pub fn dot(&self, other: Self) -> f64 {
        self.0.dot(other.0)
    }

    /// Scalar 2D cross product: `x1 * y2 - y1 * x2`
    pub fn cross(&self, other: Self) -> f64 {
        self.0.perp_dot(other.0)
    }

    /// `(x, -y)`, the axis generator used by the SAT test
    pub fn orthogonal(&self) -> Self {
        Self::new(self.x(), -self.y())
    }
}

impl TryFrom<&[f64]> for Vector2D {
    type Error = MathError;

    fn try_from(components: &[f64]) -> Result<Self, Self::Error> {
        Self::from_slice(components)
    }
}

impl From<(f64, f64)> for Vector2D {
    fn from((x, y): (f64, f64)) -> Self {
        Self::new(x, y)
    }
}

impl From<[f64; 2]> for Vector2D {
    fn from([x, y]: [f64; 2]) -> Self {
        Self::new(x, y)
    }
}

impl From<DVec2> for Vector2D {
    fn from(v: DVec2) -> Self {
        Self(v)
    }
}

impl From<Vector2D> for DVec2 {
    fn from(v: Vector2D) -> Self {
        v.0
    }
}

impl Add for Vector2D {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self(self.0 + rhs.0)
    }
}

impl Sub for Vector2D {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self(self.0 - rhs.0)
    }
}

impl AddAssign for Vector2D {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl SubAssign for Vector2D {
    fn sub_assign(&mut self, rhs: Self) {
        *self = *self - rhs;
    }
}

impl Neg for Vector2D {
    type Output = Self;

    fn neg(self) -> Self {
        Self(-self.0)
    }
}

impl Mul<f64> for Vector2D {
    type Output = Self;

    fn mul(self, rhs: f64) -> Self {
        self.scale(rhs)
    }
}

impl Mul<Vector2D> for f64 {
    type Output = Vector2D;

    fn mul(self, rhs: Vector2D) -> Vector2D {
        rhs.scale(self)
    }
}

impl fmt::Display for Vector2D {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Vector2D ({}, {})", self.x(), self.y())
    }
}

#[cfg(test)]
impl approx::AbsDiffEq for Vector2D {
    type Epsilon = f64;

    fn default_epsilon() -> f64 {
        1e-9
    }

    fn abs_diff_eq(&self, other: &Self, epsilon: f64) -> bool {
        (self.x() - other.x()).abs() <= epsilon && (self.y() - other.y()).abs() <= epsilon
    }
}
