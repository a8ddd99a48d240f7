//! # Analytic Fields
//!
//! Closed-form fields that need no sample store: a constant size, the
//! distance to a point cloud, and a box with inside/outside sizes.

use glam::DVec3;
use serde::{Deserialize, Serialize};

use crate::error::{check_size, SizingError, SizingResult};

/// The same target size everywhere.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConstantField {
    size: f64,
}

impl ConstantField {
    /// Creates a constant field; `size` must be strictly positive.
    pub fn new(size: f64) -> SizingResult<Self> {
        Ok(Self {
            size: check_size(size)?,
        })
    }

    /// The constant size.
    #[inline]
    pub fn size(&self) -> f64 {
        self.size
    }
}

/// Euclidean distance to the closest of a set of points.
///
/// Not a size by itself; it drives the blend of a threshold combinator.
///
/// # Example
///
/// ```rust
/// use mesh_sizing::field::DistanceField;
/// use glam::DVec3;
///
/// let field = DistanceField::new(vec![DVec3::ZERO, DVec3::new(10.0, 0.0, 0.0)]).unwrap();
/// assert_eq!(field.evaluate(DVec3::new(3.0, 4.0, 0.0)), 5.0);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DistanceField {
    points: Vec<DVec3>,
}

impl DistanceField {
    /// Creates a distance field; at least one point is required.
    pub fn new(points: Vec<DVec3>) -> SizingResult<Self> {
        if points.is_empty() {
            return Err(SizingError::invalid_parameter(
                "distance field needs at least one point",
            ));
        }
        Ok(Self { points })
    }

    /// Reference points.
    pub fn points(&self) -> &[DVec3] {
        &self.points
    }

    /// Distance from `point` to the closest reference point.
    pub fn evaluate(&self, point: DVec3) -> f64 {
        self.points
            .iter()
            .map(|p| p.distance_squared(point))
            .fold(f64::INFINITY, f64::min)
            .sqrt()
    }
}

/// Axis-aligned box with one size inside and another outside.
///
/// Outside the box the size moves linearly from `size_in` to `size_out`
/// across a shell of width `thickness`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoxField {
    min: DVec3,
    max: DVec3,
    size_in: f64,
    size_out: f64,
    thickness: f64,
}

impl BoxField {
    /// Creates a box field.
    ///
    /// Corners may be given in any order; sizes must be strictly positive
    /// and `thickness` non-negative.
    pub fn new(
        corner_a: DVec3,
        corner_b: DVec3,
        size_in: f64,
        size_out: f64,
        thickness: f64,
    ) -> SizingResult<Self> {
        if !(thickness >= 0.0) || !thickness.is_finite() {
            return Err(SizingError::invalid_parameter(format!(
                "box thickness must be non-negative, got {thickness}"
            )));
        }
        Ok(Self {
            min: corner_a.min(corner_b),
            max: corner_a.max(corner_b),
            size_in: check_size(size_in)?,
            size_out: check_size(size_out)?,
            thickness,
        })
    }

    /// Size at `point`.
    pub fn evaluate(&self, point: DVec3) -> f64 {
        let outside = (self.min - point).max(point - self.max).max(DVec3::ZERO);
        let distance = outside.length();
        if distance == 0.0 {
            self.size_in
        } else if distance < self.thickness {
            let t = distance / self.thickness;
            self.size_in + (self.size_out - self.size_in) * t
        } else {
            self.size_out
        }
    }
}
