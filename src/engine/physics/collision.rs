// Separating-axis test between oriented rectangles

use super::body::RigidBody;
use crate::core::{MathError, Vector2D};

/// Result of a positive SAT test
///
/// `normal` is the unit axis of minimum overlap. Its sign is not resolved;
/// callers orient it using the separation of the two centers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Collision {
    pub normal: Vector2D,
    pub depth: f64,
}

/// Project vertices onto an axis, returning the (min, max) interval
fn project(vertices: &[Vector2D; 4], axis: Vector2D) -> (f64, f64) {
    vertices
        .iter()
        .map(|vertex| vertex.dot(axis))
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(min, max), p| {
            (min.min(p), max.max(p))
        })
}

impl RigidBody {
    /// Test this body against another
    ///
    /// Returns `Ok(None)` when the bodies are apart, otherwise the axis of
    /// minimum penetration and its depth.
    pub fn test(&self, other: &RigidBody) -> Result<Option<Collision>, MathError> {
        // Bounding-circle reject
        let reach = self.width().max(self.height()) + other.width().max(other.height());
        if (self.position - other.position).length() > reach {
            return Ok(None);
        }

        let vertices = self.vertices();
        let other_vertices = other.vertices();
        let mut best: Option<Collision> = None;

        for edge in self.edges().into_iter().chain(other.edges()) {
            let axis = edge.orthogonal().normalize()?;
            let (min_a, max_a) = project(&vertices, axis);
            let (min_b, max_b) = project(&other_vertices, axis);

            let overlap = max_a.min(max_b) - min_a.max(min_b);
            if overlap <= 0.0 {
                return Ok(None);
            }
            if best.map_or(true, |b| overlap < b.depth) {
                best = Some(Collision {
                    normal: axis,
                    depth: overlap,
                });
            }
        }

        Ok(best)
    }

    /// Edge most likely to be the contact face in `direction`
    ///
    /// Picks the vertex furthest along `direction`, then whichever of its two
    /// neighbours also projects further, and returns that edge as a pair of
    /// points in winding order.
    pub fn support_edge(&self, direction: Vector2D) -> (Vector2D, Vector2D) {
        let vertices = self.vertices();
        let mut support = 0;
        let mut max_projection = f64::NEG_INFINITY;
        for (i, vertex) in vertices.iter().enumerate() {
            let projection = vertex.dot(direction);
            if projection > max_projection {
                max_projection = projection;
                support = i;
            }
        }

        let previous = vertices[(support + 3) % 4];
        let next = vertices[(support + 1) % 4];
        if previous.dot(direction) > next.dot(direction) {
            (previous, vertices[support])
        } else {
            (vertices[support], next)
        }
    }
}
