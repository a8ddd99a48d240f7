//! # Spatial Index for Element Location
//!
//! Uses spatial hashing to find candidate host elements for a query point
//! without scanning the whole sample store.
//!
//! ## Features
//!
//! - **Spatial hashing**: Grid-based acceleration structure over element
//!   bounding boxes
//! - **Point queries**: Candidate elements whose box may contain a point
//! - **Deterministic order**: Candidates come back sorted by element index
//!
//! ## Example
//!
//! ```rust
//! use mesh_sizing::spatial_index::SpatialIndex;
//! use glam::DVec3;
//!
//! let boxes = vec![(DVec3::ZERO, DVec3::ONE), (DVec3::splat(5.0), DVec3::splat(6.0))];
//! let index = SpatialIndex::build(&boxes);
//! assert_eq!(index.query_point(DVec3::splat(0.5)), vec![0]);
//! ```

use config::constants::{MAX_CELLS_PER_ELEMENT, SPATIAL_CELL_FACTOR};
use glam::DVec3;
use std::collections::HashMap;

/// Relative padding applied to element boxes so points on a box face land
/// in an indexed cell.
const BOX_PADDING: f64 = 1e-9;

/// 3D cell coordinate for spatial hashing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct CellCoord {
    x: i32,
    y: i32,
    z: i32,
}

impl CellCoord {
    /// Creates a cell coordinate from 3D position.
    fn from_position(pos: DVec3, cell_size: f64) -> Self {
        Self {
            x: (pos.x / cell_size).floor() as i32,
            y: (pos.y / cell_size).floor() as i32,
            z: (pos.z / cell_size).floor() as i32,
        }
    }
}

/// Spatial index over element bounding boxes.
///
/// Uses a hash grid to map 3D space to element lists. Elements too large
/// for the grid are kept in a side list returned by every query.
#[derive(Debug, Clone)]
pub struct SpatialIndex {
    /// Hash grid: cell -> element indices (ascending)
    grid: HashMap<CellCoord, Vec<usize>>,
    /// Elements spanning too many cells
    oversized: Vec<usize>,
    /// Cell size for hashing
    cell_size: f64,
    /// Bounding box min of all elements
    bounds_min: DVec3,
    /// Bounding box max of all elements
    bounds_max: DVec3,
}

impl SpatialIndex {
    /// Creates a spatial index from per-element bounding boxes.
    ///
    /// The cell size is derived from the overall extent and the element
    /// count.
    pub fn build(boxes: &[(DVec3, DVec3)]) -> Self {
        let (bounds_min, bounds_max) = match boxes.first() {
            Some(first) => boxes[1..]
                .iter()
                .fold(*first, |(min, max), (lo, hi)| (min.min(*lo), max.max(*hi))),
            None => (DVec3::ZERO, DVec3::ZERO),
        };

        let extent = bounds_max - bounds_min;
        let avg_extent = (extent.x + extent.y + extent.z) / 3.0;
        let raw = avg_extent / (boxes.len().max(1) as f64).cbrt() * SPATIAL_CELL_FACTOR;
        let cell_size = if raw.is_finite() && raw > 0.0 {
            raw.max(extent.max_element() * 1e-6)
        } else {
            1.0
        };
        let padding = DVec3::splat(cell_size * BOX_PADDING);

        let mut grid: HashMap<CellCoord, Vec<usize>> = HashMap::new();
        let mut oversized = Vec::new();

        // Index each element box in ascending order, so cell lists stay sorted
        for (i, (lo, hi)) in boxes.iter().enumerate() {
            let cell_min = CellCoord::from_position(*lo - padding, cell_size);
            let cell_max = CellCoord::from_position(*hi + padding, cell_size);

            let span = |a: i32, b: i32| (i64::from(b) - i64::from(a) + 1).max(1) as u128;
            let cells = span(cell_min.x, cell_max.x)
                * span(cell_min.y, cell_max.y)
                * span(cell_min.z, cell_max.z);
            if cells > MAX_CELLS_PER_ELEMENT as u128 {
                oversized.push(i);
                continue;
            }

            for cx in cell_min.x..=cell_max.x {
                for cy in cell_min.y..=cell_max.y {
                    for cz in cell_min.z..=cell_max.z {
                        let cell = CellCoord { x: cx, y: cy, z: cz };
                        grid.entry(cell).or_default().push(i);
                    }
                }
            }
        }

        tracing::trace!(
            elements = boxes.len(),
            cells = grid.len(),
            oversized = oversized.len(),
            cell_size,
            "spatial index built"
        );

        Self {
            grid,
            oversized,
            cell_size,
            bounds_min,
            bounds_max,
        }
    }

    /// Queries elements whose bounding box may contain `point`.
    ///
    /// Returns element indices in ascending order without duplicates.
    pub fn query_point(&self, point: DVec3) -> Vec<usize> {
        let cell = CellCoord::from_position(point, self.cell_size);
        let mut result: Vec<usize> = self.oversized.clone();
        if let Some(elements) = self.grid.get(&cell) {
            result.extend_from_slice(elements);
        }
        result.sort_unstable();
        result.dedup();
        result
    }

    /// Returns the number of cells in the index.
    pub fn cell_count(&self) -> usize {
        self.grid.len()
    }

    /// Returns the cell size used for hashing.
    pub fn cell_size(&self) -> f64 {
        self.cell_size
    }

    /// Returns the bounding box of all indexed elements.
    pub fn bounds(&self) -> (DVec3, DVec3) {
        (self.bounds_min, self.bounds_max)
    }
}
