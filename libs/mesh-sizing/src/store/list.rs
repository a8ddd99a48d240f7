//! # List-Based Sample Store
//!
//! Scattered points, lines, triangles and tetrahedra carrying one target
//! size per vertex, independent of any mesh.

use std::sync::OnceLock;

use config::constants::InterpolationConfig;
use glam::DVec3;

use crate::error::{check_size, SizingError, SizingResult};
use crate::geometry::{bounds, containment_tolerance, locate};
use crate::spatial_index::SpatialIndex;

/// One scattered sample primitive with per-vertex sizes.
#[derive(Debug, Clone, PartialEq)]
pub struct ScatterElement {
    vertices: Vec<DVec3>,
    sizes: Vec<f64>,
}

impl ScatterElement {
    /// Topological dimension: 0 for points up to 3 for tetrahedra.
    #[inline]
    pub fn dimension(&self) -> usize {
        self.vertices.len() - 1
    }

    /// Vertex positions.
    #[inline]
    pub fn vertices(&self) -> &[DVec3] {
        &self.vertices
    }

    /// Per-vertex sizes.
    #[inline]
    pub fn sizes(&self) -> &[f64] {
        &self.sizes
    }
}

/// List-based sample store.
///
/// Primitives may overlap; the store describes the union of their local
/// size descriptions. Lookups are accelerated by a spatial index built on
/// first use and discarded whenever a primitive is added.
///
/// # Example
///
/// ```rust
/// use mesh_sizing::ListStore;
/// use config::constants::InterpolationConfig;
/// use glam::DVec3;
///
/// let mut store = ListStore::new();
/// store
///     .add_scatter_element(
///         &[DVec3::ZERO, DVec3::X, DVec3::Y],
///         &[0.1, 0.2, 0.3],
///     )
///     .unwrap();
/// let size = store
///     .evaluate(DVec3::new(1.0 / 3.0, 1.0 / 3.0, 0.0), &InterpolationConfig::default())
///     .unwrap();
/// assert!((size - 0.2).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ListStore {
    elements: Vec<ScatterElement>,
    index: OnceLock<SpatialIndex>,
}

impl ListStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a zero-dimensional sample.
    ///
    /// Fails with [`SizingError::InvalidValue`] if `size` is not strictly
    /// positive; the store is left untouched.
    pub fn add_scatter_point(&mut self, position: DVec3, size: f64) -> SizingResult<()> {
        check_size(size)?;
        self.push(ScatterElement {
            vertices: vec![position],
            sizes: vec![size],
        });
        Ok(())
    }

    /// Appends a line (2 vertices), triangle (3) or tetrahedron (4) sample.
    ///
    /// Fails with [`SizingError::DimensionMismatch`] when the counts differ
    /// or fall outside 2..=4, and with [`SizingError::InvalidValue`] when
    /// any size is not strictly positive.
    pub fn add_scatter_element(&mut self, vertices: &[DVec3], sizes: &[f64]) -> SizingResult<()> {
        if vertices.len() != sizes.len() || !(2..=4).contains(&vertices.len()) {
            return Err(SizingError::DimensionMismatch {
                vertices: vertices.len(),
                values: sizes.len(),
            });
        }
        for size in sizes {
            check_size(*size)?;
        }
        self.push(ScatterElement {
            vertices: vertices.to_vec(),
            sizes: sizes.to_vec(),
        });
        Ok(())
    }

    fn push(&mut self, element: ScatterElement) {
        self.elements.push(element);
        self.index = OnceLock::new();
    }

    /// Number of stored primitives.
    #[inline]
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Returns true if no primitive is stored.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Total number of per-vertex samples.
    pub fn sample_count(&self) -> usize {
        self.elements.iter().map(|e| e.sizes.len()).sum()
    }

    /// Stored primitives in insertion order.
    pub fn elements(&self) -> &[ScatterElement] {
        &self.elements
    }

    /// Interpolates the target size at `point`.
    ///
    /// The lowest-dimension primitive containing the point wins, earlier
    /// insertions first on ties, and its vertex sizes are blended with
    /// barycentric weights. When no primitive contains the point, the
    /// closest samples are blended with inverse-squared-distance weights.
    pub fn evaluate(&self, point: DVec3, config: &InterpolationConfig) -> SizingResult<f64> {
        if self.elements.is_empty() {
            return Err(SizingError::EmptyStore);
        }

        let index = self.index.get_or_init(|| {
            let boxes: Vec<_> = self.elements.iter().map(|e| bounds(&e.vertices)).collect();
            SpatialIndex::build(&boxes)
        });
        let candidates = index.query_point(point);

        for dimension in 0..=3 {
            for element in candidates
                .iter()
                .map(|i| &self.elements[*i])
                .filter(|e| e.dimension() == dimension)
            {
                let projection = locate(&element.vertices, point);
                let tolerance = containment_tolerance(&element.vertices, config.tolerance);
                if projection.distance <= tolerance {
                    return Ok(projection.interpolate(&element.sizes));
                }
            }
        }

        self.inverse_distance(point, config.nearest_samples)
    }

    /// Inverse-squared-distance blend of the `k` samples closest to `point`.
    fn inverse_distance(&self, point: DVec3, k: usize) -> SizingResult<f64> {
        let samples = self
            .elements
            .iter()
            .flat_map(|e| e.vertices.iter().zip(e.sizes.iter()))
            .map(|(vertex, size)| (vertex.distance_squared(point), *size));
        let nearest = nearest_k(samples, k.max(1));

        tracing::trace!(
            ?point,
            blended = nearest.len(),
            "outside all elements, blending nearest samples"
        );

        let Some(&(closest_sq, closest_size)) = nearest.first() else {
            return Err(SizingError::EmptyStore);
        };
        if closest_sq == 0.0 {
            return Ok(closest_size);
        }

        let (weighted, total) = nearest
            .iter()
            .fold((0.0, 0.0), |(weighted, total), (distance_sq, size)| {
                let weight = 1.0 / distance_sq;
                (weighted + weight * size, total + weight)
            });
        Ok(weighted / total)
    }
}

/// Keeps the `k` entries with the smallest first component.
///
/// Equal distances keep their iteration order, so the result does not
/// depend on anything but insertion order.
fn nearest_k(samples: impl Iterator<Item = (f64, f64)>, k: usize) -> Vec<(f64, f64)> {
    let mut nearest: Vec<(f64, f64)> = Vec::with_capacity(k + 1);
    for sample in samples {
        if nearest.len() == k && sample.0 >= nearest[k - 1].0 {
            continue;
        }
        let slot = nearest.partition_point(|kept| kept.0 <= sample.0);
        nearest.insert(slot, sample);
        nearest.truncate(k);
    }
    nearest
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nearest_k_keeps_smallest() {
        let samples = vec![(4.0, 1.0), (1.0, 2.0), (9.0, 3.0), (0.5, 4.0)];
        let nearest = nearest_k(samples.into_iter(), 2);
        assert_eq!(nearest, vec![(0.5, 4.0), (1.0, 2.0)]);
    }

    #[test]
    fn test_nearest_k_ties_keep_insertion_order() {
        let samples = vec![(1.0, 10.0), (1.0, 20.0), (1.0, 30.0)];
        let nearest = nearest_k(samples.into_iter(), 2);
        assert_eq!(nearest, vec![(1.0, 10.0), (1.0, 20.0)]);
    }

    #[test]
    fn test_nearest_k_fewer_than_k() {
        let nearest = nearest_k(vec![(2.0, 1.0)].into_iter(), 4);
        assert_eq!(nearest.len(), 1);
    }
}
