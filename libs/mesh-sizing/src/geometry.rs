//! # Simplex Geometry
//!
//! Point location against points, segments, triangles and tetrahedra.
//!
//! Every routine returns a [`Projection`]: the barycentric weights of the
//! closest point on the simplex together with the distance to it. A
//! distance of zero means the query lies inside the simplex and the weights
//! are the ordinary barycentric coordinates of the query itself.
//!
//! ## Reference
//!
//! Ericson, C. (2005). Real-Time Collision Detection, section 5.1.5.

use config::constants::{EPSILON, ROUNDING_TOLERANCE_FACTOR};
use glam::{DMat3, DVec3};

/// Closest-point location on a simplex.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projection {
    /// Barycentric weights, one per simplex vertex (unused slots are zero).
    pub weights: [f64; 4],
    /// Distance from the query to the closest point.
    pub distance: f64,
}

impl Projection {
    /// Interpolates per-vertex values with the projection weights.
    ///
    /// # Example
    ///
    /// ```rust
    /// use mesh_sizing::geometry::locate;
    /// use glam::DVec3;
    ///
    /// let tri = [DVec3::ZERO, DVec3::X, DVec3::Y];
    /// let centroid = DVec3::new(1.0 / 3.0, 1.0 / 3.0, 0.0);
    /// let projection = locate(&tri, centroid);
    /// let value = projection.interpolate(&[1.0, 2.0, 3.0]);
    /// assert!((value - 2.0).abs() < 1e-12);
    /// ```
    pub fn interpolate(&self, values: &[f64]) -> f64 {
        values
            .iter()
            .zip(self.weights.iter())
            .map(|(value, weight)| value * weight)
            .sum()
    }
}

/// Locates `point` against a simplex given by 1 to 4 vertices.
///
/// Vertex counts outside that range yield an infinitely distant projection
/// so callers never treat them as hosts.
pub fn locate(vertices: &[DVec3], point: DVec3) -> Projection {
    match *vertices {
        [a] => Projection {
            weights: [1.0, 0.0, 0.0, 0.0],
            distance: point.distance(a),
        },
        [a, b] => locate_segment(point, a, b),
        [a, b, c] => locate_triangle(point, a, b, c),
        [a, b, c, d] => locate_tetrahedron(point, a, b, c, d),
        _ => Projection {
            weights: [0.0; 4],
            distance: f64::INFINITY,
        },
    }
}

/// Axis-aligned bounding box of a vertex set.
pub fn bounds(vertices: &[DVec3]) -> (DVec3, DVec3) {
    let Some(first) = vertices.first() else {
        return (DVec3::ZERO, DVec3::ZERO);
    };
    vertices[1..]
        .iter()
        .fold((*first, *first), |(min, max), v| (min.min(*v), max.max(*v)))
}

/// Tolerance below which `distance` counts as containment for an element
/// with the given vertices.
///
/// Scales with the element's extent and never drops below the rounding
/// error of its coordinates, so elements far from the origin still contain
/// their interior points.
pub fn containment_tolerance(vertices: &[DVec3], relative: f64) -> f64 {
    let (min, max) = bounds(vertices);
    let magnitude = min.abs().max(max.abs()).max_element();
    let rounding = magnitude * f64::EPSILON * ROUNDING_TOLERANCE_FACTOR;
    (relative * (max - min).max_element().max(1.0)).max(rounding)
}

fn locate_segment(p: DVec3, a: DVec3, b: DVec3) -> Projection {
    let ab = b - a;
    let length_sq = ab.length_squared();
    let ap = p - a;
    let t = if length_sq < EPSILON * EPSILON {
        0.0
    } else {
        (ap.dot(ab) / length_sq).clamp(0.0, 1.0)
    };
    Projection {
        weights: [1.0 - t, t, 0.0, 0.0],
        distance: (ap - ab * t).length(),
    }
}

fn locate_triangle(p: DVec3, a: DVec3, b: DVec3, c: DVec3) -> Projection {
    let weights = closest_on_triangle(p, a, b, c);
    // Offsets from `a` keep the residual free of the coordinates' magnitude
    let offset = (b - a) * weights[1] + (c - a) * weights[2];
    Projection {
        weights: [weights[0], weights[1], weights[2], 0.0],
        distance: ((p - a) - offset).length(),
    }
}

/// Barycentric weights of the point of triangle `abc` closest to `p`.
fn closest_on_triangle(p: DVec3, a: DVec3, b: DVec3, c: DVec3) -> [f64; 3] {
    let ab = b - a;
    let ac = c - a;
    let ap = p - a;

    // Vertex region A
    let d1 = ab.dot(ap);
    let d2 = ac.dot(ap);
    if d1 <= 0.0 && d2 <= 0.0 {
        return [1.0, 0.0, 0.0];
    }

    // Vertex region B
    let bp = p - b;
    let d3 = ab.dot(bp);
    let d4 = ac.dot(bp);
    if d3 >= 0.0 && d4 <= d3 {
        return [0.0, 1.0, 0.0];
    }

    // Edge region AB
    let vc = d1 * d4 - d3 * d2;
    if vc <= 0.0 && d1 >= 0.0 && d3 <= 0.0 {
        let v = d1 / (d1 - d3);
        return [1.0 - v, v, 0.0];
    }

    // Vertex region C
    let cp = p - c;
    let d5 = ab.dot(cp);
    let d6 = ac.dot(cp);
    if d6 >= 0.0 && d5 <= d6 {
        return [0.0, 0.0, 1.0];
    }

    // Edge region AC
    let vb = d5 * d2 - d1 * d6;
    if vb <= 0.0 && d2 >= 0.0 && d6 <= 0.0 {
        let w = d2 / (d2 - d6);
        return [1.0 - w, 0.0, w];
    }

    // Edge region BC
    let va = d3 * d6 - d5 * d4;
    if va <= 0.0 && (d4 - d3) >= 0.0 && (d5 - d6) >= 0.0 {
        let w = (d4 - d3) / ((d4 - d3) + (d5 - d6));
        return [0.0, 1.0 - w, w];
    }

    // Face region
    let denom = va + vb + vc;
    if denom.abs() < EPSILON * EPSILON {
        // Degenerate triangle: nearest of its edges
        return closest_on_degenerate_triangle(p, a, b, c);
    }
    let v = vb / denom;
    let w = vc / denom;
    [1.0 - v - w, v, w]
}

fn closest_on_degenerate_triangle(p: DVec3, a: DVec3, b: DVec3, c: DVec3) -> [f64; 3] {
    let candidates = [
        (locate_segment(p, a, b), [0usize, 1]),
        (locate_segment(p, a, c), [0, 2]),
        (locate_segment(p, b, c), [1, 2]),
    ];
    let mut best = candidates[0];
    for candidate in &candidates[1..] {
        if candidate.0.distance < best.0.distance {
            best = *candidate;
        }
    }
    let mut weights = [0.0; 3];
    weights[best.1[0]] = best.0.weights[0];
    weights[best.1[1]] = best.0.weights[1];
    weights
}

fn locate_tetrahedron(p: DVec3, a: DVec3, b: DVec3, c: DVec3, d: DVec3) -> Projection {
    let frame = DMat3::from_cols(b - a, c - a, d - a);
    let det = frame.determinant();
    let scale = (b - a)
        .length()
        .max((c - a).length())
        .max((d - a).length());

    if det.abs() > EPSILON * scale.powi(3) {
        let local = frame.inverse() * (p - a);
        let weights = [1.0 - local.x - local.y - local.z, local.x, local.y, local.z];
        if weights.iter().all(|w| *w >= 0.0) {
            return Projection {
                weights,
                distance: 0.0,
            };
        }
    }

    // Outside (or flat): closest point lies on one of the faces
    let faces: [[usize; 3]; 4] = [[0, 1, 2], [0, 1, 3], [0, 2, 3], [1, 2, 3]];
    let corners = [a, b, c, d];
    let mut best = Projection {
        weights: [0.0; 4],
        distance: f64::INFINITY,
    };
    for face in faces {
        let projection = locate_triangle(p, corners[face[0]], corners[face[1]], corners[face[2]]);
        if projection.distance < best.distance {
            let mut weights = [0.0; 4];
            for (slot, corner) in face.iter().enumerate() {
                weights[*corner] = projection.weights[slot];
            }
            best = Projection {
                weights,
                distance: projection.distance,
            };
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use config::constants::CONTAINMENT_EPSILON;

    #[test]
    fn test_point_distance() {
        let projection = locate(&[DVec3::new(1.0, 0.0, 0.0)], DVec3::new(4.0, 4.0, 0.0));
        assert_relative_eq!(projection.distance, 5.0);
        assert_eq!(projection.weights[0], 1.0);
    }

    #[test]
    fn test_segment_midpoint() {
        let projection = locate(&[DVec3::ZERO, DVec3::new(2.0, 0.0, 0.0)], DVec3::X);
        assert_relative_eq!(projection.distance, 0.0);
        assert_relative_eq!(projection.interpolate(&[1.0, 3.0]), 2.0);
    }

    #[test]
    fn test_segment_clamps_beyond_end() {
        let projection = locate(&[DVec3::ZERO, DVec3::X], DVec3::new(3.0, 0.0, 0.0));
        assert_relative_eq!(projection.distance, 2.0);
        assert_relative_eq!(projection.weights[1], 1.0);
    }

    #[test]
    fn test_triangle_centroid_weights() {
        let tri = [DVec3::ZERO, DVec3::X, DVec3::Y];
        let projection = locate(&tri, DVec3::new(1.0 / 3.0, 1.0 / 3.0, 0.0));
        assert!(projection.distance < 1e-12);
        for weight in &projection.weights[..3] {
            assert_relative_eq!(*weight, 1.0 / 3.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_triangle_outside_projects_to_edge() {
        let tri = [DVec3::ZERO, DVec3::new(2.0, 0.0, 0.0), DVec3::Y];
        let projection = locate(&tri, DVec3::new(1.0, -1.0, 0.0));
        assert_relative_eq!(projection.distance, 1.0, epsilon = 1e-12);
        assert_relative_eq!(projection.weights[0], 0.5, epsilon = 1e-12);
        assert_relative_eq!(projection.weights[1], 0.5, epsilon = 1e-12);
    }

    #[test]
    fn test_triangle_off_plane() {
        let tri = [DVec3::ZERO, DVec3::X, DVec3::Y];
        let projection = locate(&tri, DVec3::new(0.25, 0.25, 2.0));
        assert_relative_eq!(projection.distance, 2.0, epsilon = 1e-12);
    }

    #[test]
    fn test_tetrahedron_inside() {
        let tet = [DVec3::ZERO, DVec3::X, DVec3::Y, DVec3::Z];
        let projection = locate(&tet, DVec3::splat(0.25));
        assert_eq!(projection.distance, 0.0);
        for weight in projection.weights {
            assert_relative_eq!(weight, 0.25, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_tetrahedron_outside_uses_nearest_face() {
        let tet = [DVec3::ZERO, DVec3::X, DVec3::Y, DVec3::Z];
        let projection = locate(&tet, DVec3::new(0.2, 0.2, -1.0));
        assert_relative_eq!(projection.distance, 1.0, epsilon = 1e-12);
        assert_eq!(projection.weights[3], 0.0);
        let sum: f64 = projection.weights.iter().sum();
        assert_relative_eq!(sum, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_tilted_triangle_far_from_origin_contains_interior() {
        let origin = DVec3::new(1e6, 7e5, 3e5);
        let e1 = DVec3::new(1.0, 0.1, 0.2);
        let e2 = DVec3::new(0.1, 1.0, 0.3);
        let tri = [origin, origin + e1, origin + e2];
        let tolerance = containment_tolerance(&tri, CONTAINMENT_EPSILON);

        let projection = locate(&tri, origin + e1 * 0.1 + e2 * 0.35);
        assert!(
            projection.distance <= tolerance,
            "distance {} above tolerance {tolerance}",
            projection.distance
        );
        assert_relative_eq!(projection.weights[1], 0.1, epsilon = 1e-8);
        assert_relative_eq!(projection.weights[2], 0.35, epsilon = 1e-8);
    }

    #[test]
    fn test_tolerance_near_origin_is_relative() {
        let tri = [DVec3::ZERO, DVec3::X, DVec3::Y];
        assert_eq!(containment_tolerance(&tri, 1e-12), 1e-12);
        let wide = [DVec3::ZERO, DVec3::new(10.0, 0.0, 0.0)];
        assert_relative_eq!(containment_tolerance(&wide, 1e-12), 1e-11);
    }

    #[test]
    fn test_bounds() {
        let (min, max) = bounds(&[DVec3::new(1.0, -2.0, 0.0), DVec3::new(-1.0, 3.0, 0.5)]);
        assert_eq!(min, DVec3::new(-1.0, -2.0, 0.0));
        assert_eq!(max, DVec3::new(1.0, 3.0, 0.5));
    }
}
