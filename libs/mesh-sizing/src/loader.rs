//! # Field Data Loading
//!
//! Serde records for sample data produced by external tools (post-processing
//! views, simulation results). Records describe stores only; building the
//! store runs the same validation as the incremental API.
//!
//! ```json
//! {
//!   "elements": [
//!     { "vertices": [[0, 0, 0]], "sizes": [0.1] },
//!     { "vertices": [[0, 0, 0], [1, 0, 0], [0, 1, 0]], "sizes": [0.1, 0.2, 0.3] }
//!   ]
//! }
//! ```

use std::sync::Arc;

use glam::DVec3;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::SizingResult;
use crate::store::{BackgroundMesh, ListStore, MeshElement, ModelStore, SampleStore};

/// One scattered primitive: 1 to 4 vertices with one size each.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScatterRecord {
    /// Vertex positions.
    pub vertices: Vec<DVec3>,
    /// Per-vertex sizes.
    pub sizes: Vec<f64>,
}

/// Scattered sample data for a list-based store.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ListFieldData {
    /// Primitives, in insertion order.
    pub elements: Vec<ScatterRecord>,
}

impl ListFieldData {
    /// Builds a list store, failing on the first invalid record.
    pub fn into_store(self) -> SizingResult<SampleStore> {
        let mut store = ListStore::new();
        for record in &self.elements {
            match (record.vertices.as_slice(), record.sizes.as_slice()) {
                ([position], [size]) => store.add_scatter_point(*position, *size)?,
                (vertices, sizes) => store.add_scatter_element(vertices, sizes)?,
            }
        }
        debug!(
            primitives = store.len(),
            samples = store.sample_count(),
            "list field data loaded"
        );
        Ok(store.into())
    }
}

/// A background mesh with node values for a model-based store.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ModelFieldData {
    /// Node positions; a node's identifier is its position in this list.
    pub nodes: Vec<DVec3>,
    /// Elements as node lists of length 2, 3 or 4.
    pub elements: Vec<Vec<u32>>,
    /// `(node, size)` pairs; nodes may be left without a value.
    pub values: Vec<(u32, f64)>,
}

impl ModelFieldData {
    /// Builds the background mesh and binds the values to it.
    pub fn into_store(self) -> SizingResult<SampleStore> {
        let mut mesh = BackgroundMesh::new();
        for position in &self.nodes {
            mesh.add_node(*position);
        }
        for nodes in &self.elements {
            mesh.add_element(MeshElement::from_nodes(nodes)?)?;
        }
        debug!(
            nodes = mesh.node_count(),
            elements = mesh.element_count(),
            values = self.values.len(),
            "model field data loaded"
        );
        ModelStore::bind(Arc::new(mesh), self.values).map(SampleStore::Model)
    }
}
