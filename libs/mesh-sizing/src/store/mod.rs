//! # Sample Stores
//!
//! Raw target-size samples backing a field.
//!
//! - [`ListStore`]: scattered primitives with per-vertex sizes
//! - [`ModelStore`]: sizes on the nodes of a shared [`BackgroundMesh`]
//!
//! Every stored size is strictly positive; invalid input is rejected before
//! the store changes.

pub mod list;
pub mod model;

use std::sync::Arc;

use config::constants::InterpolationConfig;
use glam::DVec3;

use crate::error::SizingResult;

pub use list::{ListStore, ScatterElement};
pub use model::{BackgroundMesh, MeshElement, ModelStore};

/// Size samples owned by a raw field.
#[derive(Debug, Clone)]
pub enum SampleStore {
    /// Scattered, mesh-independent samples.
    List(ListStore),
    /// Values on the nodes of a background mesh.
    Model(ModelStore),
}

impl SampleStore {
    /// Binds node values to a background mesh.
    ///
    /// See [`ModelStore::bind`].
    pub fn bind_model(
        mesh: Arc<BackgroundMesh>,
        node_values: impl IntoIterator<Item = (u32, f64)>,
    ) -> SizingResult<Self> {
        ModelStore::bind(mesh, node_values).map(Self::Model)
    }

    /// Interpolates the target size at `point`.
    pub fn evaluate(&self, point: DVec3, config: &InterpolationConfig) -> SizingResult<f64> {
        match self {
            Self::List(store) => store.evaluate(point, config),
            Self::Model(store) => store.evaluate(point, config),
        }
    }

    /// Number of individual size samples.
    pub fn sample_count(&self) -> usize {
        match self {
            Self::List(store) => store.sample_count(),
            Self::Model(store) => store.sample_count(),
        }
    }

    /// Returns true if the store holds no samples.
    pub fn is_empty(&self) -> bool {
        self.sample_count() == 0
    }
}

impl From<ListStore> for SampleStore {
    fn from(store: ListStore) -> Self {
        Self::List(store)
    }
}

impl From<ModelStore> for SampleStore {
    fn from(store: ModelStore) -> Self {
        Self::Model(store)
    }
}

#[cfg(test)]
mod tests;
