use super::PhysicsError;
use crate::core::Vector2D;

/// Default restitution for new bodies
pub const DEFAULT_RESTITUTION: f64 = 0.5;

/// Mass of a body
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Mass {
    /// Positive, finite mass
    Finite(f64),
    /// Immovable body, never affected by forces or impulses
    Infinite,
}

impl Mass {
    /// Inverse mass, exactly zero for an infinite mass
    pub fn inverse(self) -> f64 {
        match self {
            Mass::Finite(m) => 1.0 / m,
            Mass::Infinite => 0.0,
        }
    }

    /// Mass as a scalar (`f64::INFINITY` for an infinite mass)
    pub fn value(self) -> f64 {
        match self {
            Mass::Finite(m) => m,
            Mass::Infinite => f64::INFINITY,
        }
    }

    pub fn is_infinite(self) -> bool {
        matches!(self, Mass::Infinite)
    }
}

impl From<f64> for Mass {
    fn from(mass: f64) -> Self {
        if mass == f64::INFINITY {
            Mass::Infinite
        } else {
            Mass::Finite(mass)
        }
    }
}

/// Builder for rigid bodies
///
/// Defaults: angle 0, mass equal to the body's area, restitution 0.5.
#[derive(Debug, Clone)]
pub struct BodyBuilder {
    width: f64,
    height: f64,
    position: Vector2D,
    angle: f64,
    mass: Option<Mass>,
    restitution: f64,
    velocity: Vector2D,
    angular_velocity: f64,
}

impl BodyBuilder {
    /// Start a body of the given size
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            position: Vector2D::ZERO,
            angle: 0.0,
            mass: None,
            restitution: DEFAULT_RESTITUTION,
            velocity: Vector2D::ZERO,
            angular_velocity: 0.0,
        }
    }

    /// Set the initial position of the body's center
    pub fn position(mut self, x: f64, y: f64) -> Self {
        self.position = Vector2D::new(x, y);
        self
    }

    /// Set the initial orientation (degrees)
    pub fn angle(mut self, degrees: f64) -> Self {
        self.angle = degrees;
        self
    }

    /// Set the mass (defaults to width * height)
    pub fn mass(mut self, mass: impl Into<Mass>) -> Self {
        self.mass = Some(mass.into());
        self
    }

    /// Set restitution/bounciness (0.0 = no bounce, 1.0 = perfect bounce)
    pub fn restitution(mut self, restitution: f64) -> Self {
        self.restitution = restitution;
        self
    }

    /// Set the initial linear velocity
    pub fn velocity(mut self, velocity: Vector2D) -> Self {
        self.velocity = velocity;
        self
    }

    /// Set the initial angular velocity (degrees per second)
    pub fn angular_velocity(mut self, angular_velocity: f64) -> Self {
        self.angular_velocity = angular_velocity;
        self
    }

    /// Validate parameters and build the body
    pub fn build(self) -> Result<RigidBody, PhysicsError> {
        if !(self.width.is_finite() && self.width > 0.0) {
            return Err(PhysicsError::InvalidBody(format!(
                "width must be positive and finite, got {}",
                self.width
            )));
        }
        if !(self.height.is_finite() && self.height > 0.0) {
            return Err(PhysicsError::InvalidBody(format!(
                "height must be positive and finite, got {}",
                self.height
            )));
        }
        if !(0.0..=1.0).contains(&self.restitution) {
            return Err(PhysicsError::InvalidBody(format!(
                "restitution must lie in [0, 1], got {}",
                self.restitution
            )));
        }
        for (name, value) in [
            ("position x", self.position.x()),
            ("position y", self.position.y()),
            ("angle", self.angle),
            ("velocity x", self.velocity.x()),
            ("velocity y", self.velocity.y()),
            ("angular velocity", self.angular_velocity),
        ] {
            if !value.is_finite() {
                return Err(PhysicsError::InvalidBody(format!(
                    "{} must be finite, got {}",
                    name, value
                )));
            }
        }

        let mass = self.mass.unwrap_or(Mass::Finite(self.width * self.height));
        if let Mass::Finite(m) = mass {
            if !(m.is_finite() && m > 0.0) {
                return Err(PhysicsError::InvalidBody(format!(
                    "mass must be positive, got {}",
                    m
                )));
            }
        }

        let (inertia, inverse_inertia) = match mass {
            Mass::Finite(m) => {
                let inertia = m * (self.width * self.width + self.height * self.height) / 12.0;
                (inertia, 1.0 / inertia)
            }
            Mass::Infinite => (f64::INFINITY, 0.0),
        };

        let mut body = RigidBody {
            width: self.width,
            height: self.height,
            position: self.position,
            angle: self.angle,
            velocity: Vector2D::ZERO,
            angular_velocity: 0.0,
            force: Vector2D::ZERO,
            torque: 0.0,
            mass,
            inverse_mass: mass.inverse(),
            inertia,
            inverse_inertia,
            restitution: self.restitution,
        };
        body.set_velocity(self.velocity);
        body.set_angular_velocity(self.angular_velocity);
        Ok(body)
    }
}

/// An oriented rectangle with mass, moving under forces and impulses
#[derive(Debug, Clone, PartialEq)]
pub struct RigidBody {
    width: f64,
    height: f64,
    pub(crate) position: Vector2D,
    /// Orientation in degrees
    pub(crate) angle: f64,

    pub(crate) velocity: Vector2D,
    /// Degrees per second
    pub(crate) angular_velocity: f64,

    force: Vector2D,
    torque: f64,

    mass: Mass,
    pub(crate) inverse_mass: f64,
    inertia: f64,
    pub(crate) inverse_inertia: f64,
    restitution: f64,
}

impl RigidBody {
    /// Start building a body of the given size
    pub fn builder(width: f64, height: f64) -> BodyBuilder {
        BodyBuilder::new(width, height)
    }

    /// Body with default angle, mass and restitution
    pub fn new(width: f64, height: f64, x: f64, y: f64) -> Result<Self, PhysicsError> {
        BodyBuilder::new(width, height).position(x, y).build()
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    pub fn position(&self) -> Vector2D {
        self.position
    }

    /// Orientation in degrees
    pub fn angle(&self) -> f64 {
        self.angle
    }

    pub fn velocity(&self) -> Vector2D {
        self.velocity
    }

    /// Angular velocity in degrees per second
    pub fn angular_velocity(&self) -> f64 {
        self.angular_velocity
    }

    pub fn mass(&self) -> Mass {
        self.mass
    }

    pub fn inverse_mass(&self) -> f64 {
        self.inverse_mass
    }

    pub fn inertia(&self) -> f64 {
        self.inertia
    }

    pub fn inverse_inertia(&self) -> f64 {
        self.inverse_inertia
    }

    pub fn restitution(&self) -> f64 {
        self.restitution
    }

    /// Net force accumulated since the last integration
    pub fn force(&self) -> Vector2D {
        self.force
    }

    /// Net torque accumulated since the last integration
    pub fn torque(&self) -> f64 {
        self.torque
    }

    /// Whether the body has infinite mass
    pub fn is_immovable(&self) -> bool {
        self.mass.is_infinite()
    }

    /// Set linear velocity (ignored for immovable bodies)
    pub fn set_velocity(&mut self, velocity: Vector2D) {
        if self.is_immovable() {
            if velocity != Vector2D::ZERO {
                log::warn!("Ignoring velocity {} on immovable body", velocity);
            }
            return;
        }
        self.velocity = velocity;
    }

    /// Set angular velocity (ignored for immovable bodies)
    pub fn set_angular_velocity(&mut self, angular_velocity: f64) {
        if self.is_immovable() {
            if angular_velocity != 0.0 {
                log::warn!(
                    "Ignoring angular velocity {} on immovable body",
                    angular_velocity
                );
            }
            return;
        }
        self.angular_velocity = angular_velocity;
    }

    /// Teleport the body
    pub fn set_position(&mut self, position: Vector2D) {
        self.position = position;
    }

    pub fn set_angle(&mut self, degrees: f64) {
        self.angle = degrees;
    }

    /// World-space corners, in edge order
    pub fn vertices(&self) -> [Vector2D; 4] {
        let (hw, hh) = (self.width / 2.0, self.height / 2.0);
        [
            Vector2D::new(-hw, -hh),
            Vector2D::new(hw, -hh),
            Vector2D::new(hw, hh),
            Vector2D::new(-hw, hh),
        ]
        .map(|corner| self.position + corner.rotate(-self.angle))
    }

    /// Edge vectors, rotated by the body's angle
    pub fn edges(&self) -> [Vector2D; 4] {
        [
            Vector2D::new(self.width, 0.0),
            Vector2D::new(0.0, self.height),
            Vector2D::new(-self.width, 0.0),
            Vector2D::new(0.0, -self.height),
        ]
        .map(|edge| edge.rotate(self.angle))
    }

    /// Apply a force at a local offset from the center
    ///
    /// The force is only taken into account when the offset lies inside the
    /// body's local bounding rectangle. Returns whether it was applied.
    pub fn apply_force(&mut self, force: Vector2D, offset: Vector2D) -> bool {
        if offset.x().abs() > self.width / 2.0 || offset.y().abs() > self.height / 2.0 {
            log::trace!("Dropping force {} outside body at offset {}", force, offset);
            return false;
        }
        self.force += force;
        self.torque += offset.cross(force.rotate(self.angle));
        true
    }

    /// Add a pure torque
    pub fn apply_torque(&mut self, torque: f64) {
        self.torque += torque;
    }

    /// Reset the force and torque accumulators
    pub fn clear_accumulators(&mut self) {
        self.force = Vector2D::ZERO;
        self.torque = 0.0;
    }

    /// Advance the body by `dt` seconds (semi-implicit Euler)
    pub fn integrate(&mut self, dt: f64) {
        if self.is_immovable() {
            self.clear_accumulators();
            return;
        }

        let acceleration = self.force * self.inverse_mass;
        self.velocity += acceleration * dt;
        self.position += self.velocity * dt;

        let angular_acceleration = self.torque * self.inverse_inertia;
        self.angular_velocity += angular_acceleration * dt;
        self.angle += self.angular_velocity * dt;

        self.clear_accumulators();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::{assert_abs_diff_eq, assert_relative_eq};

    #[test]
    fn test_builder_defaults() {
        let body = RigidBody::new(2.0, 3.0, 10.0, 20.0).unwrap();

        assert_eq!(body.position(), Vector2D::new(10.0, 20.0));
        assert_eq!(body.angle(), 0.0);
        assert_eq!(body.mass(), Mass::Finite(6.0));
        assert_eq!(body.restitution(), DEFAULT_RESTITUTION);
        assert_relative_eq!(body.inverse_mass(), 1.0 / 6.0);
        assert_relative_eq!(body.inertia(), 6.0 * 13.0 / 12.0);
        assert_relative_eq!(body.inverse_inertia(), 12.0 / 78.0);
    }

    #[test]
    fn test_builder_infinite_mass() {
        let body = RigidBody::builder(100.0, 100.0)
            .mass(f64::INFINITY)
            .build()
            .unwrap();

        assert!(body.is_immovable());
        assert_eq!(body.inverse_mass(), 0.0);
        assert_eq!(body.inverse_inertia(), 0.0);
        assert_eq!(body.inertia(), f64::INFINITY);
    }

    #[test]
    fn test_builder_rejects_bad_parameters() {
        assert!(RigidBody::builder(0.0, 1.0).build().is_err());
        assert!(RigidBody::builder(1.0, f64::NAN).build().is_err());
        assert!(RigidBody::builder(1.0, 1.0).restitution(1.5).build().is_err());
        assert!(RigidBody::builder(1.0, 1.0).mass(-2.0).build().is_err());
        assert!(RigidBody::builder(1.0, 1.0).mass(0.0).build().is_err());
    }

    #[test]
    fn test_builder_rejects_non_finite_motion() {
        let builders = [
            RigidBody::builder(1.0, 1.0).position(f64::NAN, 0.0),
            RigidBody::builder(1.0, 1.0).position(0.0, f64::INFINITY),
            RigidBody::builder(1.0, 1.0).angle(f64::NAN),
            RigidBody::builder(1.0, 1.0).velocity(Vector2D::new(f64::NEG_INFINITY, 0.0)),
            RigidBody::builder(1.0, 1.0).velocity(Vector2D::new(0.0, f64::NAN)),
            RigidBody::builder(1.0, 1.0).angular_velocity(f64::INFINITY),
        ];
        for builder in builders {
            match builder.build() {
                Err(PhysicsError::InvalidBody(message)) => assert!(message.contains("finite")),
                other => panic!("expected InvalidBody, got {:?}", other),
            }
        }

        // Immovable bodies are checked too, even though their motion is ignored
        let err = RigidBody::builder(1.0, 1.0)
            .mass(Mass::Infinite)
            .angle(f64::NAN)
            .build();
        assert!(matches!(err, Err(PhysicsError::InvalidBody(_))));
    }

    #[test]
    fn test_vertices_axis_aligned() {
        let body = RigidBody::new(2.0, 2.0, 0.0, 0.0).unwrap();

        assert_eq!(
            body.vertices(),
            [
                Vector2D::new(-1.0, -1.0),
                Vector2D::new(1.0, -1.0),
                Vector2D::new(1.0, 1.0),
                Vector2D::new(-1.0, 1.0),
            ]
        );
    }

    #[test]
    fn test_vertices_follow_edges() {
        let body = RigidBody::builder(4.0, 2.0)
            .position(3.0, -1.0)
            .angle(30.0)
            .build()
            .unwrap();
        let vertices = body.vertices();

        // Each side is parallel to its reflected edge vector, so SAT axes match the outline
        for (i, edge) in body.edges().iter().enumerate() {
            let side = vertices[(i + 1) % 4] - vertices[i];
            let axis = edge.orthogonal();
            assert_abs_diff_eq!(side.cross(axis), 0.0, epsilon = 1e-9);
            assert_abs_diff_eq!(side.length(), axis.length(), epsilon = 1e-9);
        }
    }

    #[test]
    fn test_apply_force_inside_box() {
        let mut body = RigidBody::new(2.0, 4.0, 0.0, 0.0).unwrap();

        assert!(body.apply_force(Vector2D::new(0.0, 3.0), Vector2D::new(1.0, 0.0)));
        assert_eq!(body.force(), Vector2D::new(0.0, 3.0));
        assert_abs_diff_eq!(body.torque(), 3.0, epsilon = 1e-12);
    }

    #[test]
    fn test_apply_force_outside_box_is_dropped() {
        let mut body = RigidBody::new(2.0, 4.0, 0.0, 0.0).unwrap();

        assert!(!body.apply_force(Vector2D::new(1.0, 1.0), Vector2D::new(1.5, 0.0)));
        assert!(!body.apply_force(Vector2D::new(1.0, 1.0), Vector2D::new(0.0, -2.5)));
        assert_eq!(body.force(), Vector2D::ZERO);
        assert_eq!(body.torque(), 0.0);
    }

    #[test]
    fn test_integrate() {
        let mut body = RigidBody::builder(1.0, 1.0).mass(2.0).build().unwrap();
        body.apply_force(Vector2D::new(4.0, 0.0), Vector2D::ZERO);
        body.apply_torque(1.0);

        body.integrate(0.5);

        assert_abs_diff_eq!(body.velocity(), Vector2D::new(1.0, 0.0));
        assert_abs_diff_eq!(body.position(), Vector2D::new(0.5, 0.0));
        // inertia = 2 * 2 / 12
        assert_abs_diff_eq!(body.angular_velocity(), 1.5, epsilon = 1e-12);
        assert_abs_diff_eq!(body.angle(), 0.75, epsilon = 1e-12);
        assert_eq!(body.force(), Vector2D::ZERO);
        assert_eq!(body.torque(), 0.0);
    }

    #[test]
    fn test_immovable_body_ignores_everything() {
        let mut body = RigidBody::builder(1.0, 1.0)
            .position(5.0, 5.0)
            .angle(10.0)
            .mass(Mass::Infinite)
            .build()
            .unwrap();

        body.apply_force(Vector2D::new(1e9, -1e9), Vector2D::new(0.5, 0.5));
        body.apply_torque(1e9);
        body.set_velocity(Vector2D::new(3.0, 3.0));
        body.set_angular_velocity(12.0);
        body.integrate(1.0);

        assert_eq!(body.position(), Vector2D::new(5.0, 5.0));
        assert_eq!(body.angle(), 10.0);
        assert_eq!(body.velocity(), Vector2D::ZERO);
        assert_eq!(body.angular_velocity(), 0.0);
    }
}
