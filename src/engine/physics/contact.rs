use super::world::BodyHandle;
use crate::core::Vector2D;

/// Intersection point of two infinite lines, each given by two points
///
/// Returns `None` for parallel (or coincident) lines.
pub fn line_intersection(
    line_a: (Vector2D, Vector2D),
    line_b: (Vector2D, Vector2D),
) -> Option<Vector2D> {
    fn det(a: (f64, f64), b: (f64, f64)) -> f64 {
        a.0 * b.1 - a.1 * b.0
    }

    let (a1, a2) = line_a;
    let (b1, b2) = line_b;
    let x_diff = (a1.x() - a2.x(), b1.x() - b2.x());
    let y_diff = (a1.y() - a2.y(), b1.y() - b2.y());

    let div = det(x_diff, y_diff);
    if div == 0.0 {
        return None;
    }

    let d = (
        det((a1.x(), a1.y()), (a2.x(), a2.y())),
        det((b1.x(), b1.y()), (b2.x(), b2.y())),
    );
    Some(Vector2D::new(det(d, x_diff) / div, det(d, y_diff) / div))
}

/// A collision resolved during the last world step
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contact {
    /// Earlier body in insertion order
    pub a: BodyHandle,
    /// Later body in insertion order
    pub b: BodyHandle,
    /// Unit normal pointing from `b` toward `a`
    pub normal: Vector2D,
    /// Penetration depth along `normal`
    pub depth: f64,
    /// Impulse magnitude applied along `normal` (0 when both bodies are immovable)
    pub impulse: f64,
    /// Approximate touching point, when the contact edges are not parallel
    pub point: Option<Vector2D>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_crossing_lines() {
        let p = line_intersection(
            (Vector2D::new(0.0, 0.0), Vector2D::new(2.0, 2.0)),
            (Vector2D::new(0.0, 2.0), Vector2D::new(2.0, 0.0)),
        );
        assert_eq!(p, Some(Vector2D::new(1.0, 1.0)));
    }

    #[test]
    fn test_lines_extend_past_segments() {
        let p = line_intersection(
            (Vector2D::new(0.0, 0.0), Vector2D::new(1.0, 0.0)),
            (Vector2D::new(5.0, 1.0), Vector2D::new(5.0, 2.0)),
        )
        .expect("lines cross");
        assert_abs_diff_eq!(p, Vector2D::new(5.0, 0.0));
    }

    #[test]
    fn test_parallel_lines() {
        let p = line_intersection(
            (Vector2D::new(0.5, -0.5), Vector2D::new(0.5, 0.5)),
            (Vector2D::new(0.4, 0.5), Vector2D::new(0.4, -0.5)),
        );
        assert_eq!(p, None);
    }
}
