//! # Model-Based Sample Store
//!
//! Target sizes attached to the nodes of an auxiliary background mesh.

use std::sync::{Arc, OnceLock};

use config::constants::InterpolationConfig;
use glam::DVec3;

use crate::error::{check_size, SizingError, SizingResult};
use crate::geometry::{bounds, containment_tolerance, locate, Projection};
use crate::spatial_index::SpatialIndex;

/// A background mesh element referencing node indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MeshElement {
    /// Two-node segment.
    Line([u32; 2]),
    /// Three-node triangle.
    Triangle([u32; 3]),
    /// Four-node tetrahedron.
    Tetrahedron([u32; 4]),
}

impl MeshElement {
    /// Builds an element from 2 to 4 node indices.
    pub fn from_nodes(nodes: &[u32]) -> SizingResult<Self> {
        match *nodes {
            [a, b] => Ok(Self::Line([a, b])),
            [a, b, c] => Ok(Self::Triangle([a, b, c])),
            [a, b, c, d] => Ok(Self::Tetrahedron([a, b, c, d])),
            _ => Err(SizingError::invalid_parameter(format!(
                "mesh elements need 2 to 4 nodes, got {}",
                nodes.len()
            ))),
        }
    }

    /// Node indices of the element.
    #[inline]
    pub fn nodes(&self) -> &[u32] {
        match self {
            Self::Line(nodes) => nodes,
            Self::Triangle(nodes) => nodes,
            Self::Tetrahedron(nodes) => nodes,
        }
    }
}

/// Auxiliary discretization (nodes + elements) carrying a model-based field.
///
/// # Example
///
/// ```rust
/// use mesh_sizing::{BackgroundMesh, MeshElement};
/// use glam::DVec3;
///
/// let mut mesh = BackgroundMesh::new();
/// let a = mesh.add_node(DVec3::ZERO);
/// let b = mesh.add_node(DVec3::X);
/// let c = mesh.add_node(DVec3::Y);
/// mesh.add_element(MeshElement::Triangle([a, b, c])).unwrap();
/// assert_eq!(mesh.node_count(), 3);
/// assert_eq!(mesh.element_count(), 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct BackgroundMesh {
    nodes: Vec<DVec3>,
    elements: Vec<MeshElement>,
}

impl BackgroundMesh {
    /// Creates an empty mesh.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a node and returns its index.
    pub fn add_node(&mut self, position: DVec3) -> u32 {
        let index = self.nodes.len() as u32;
        self.nodes.push(position);
        index
    }

    /// Adds an element, validating its node references.
    ///
    /// Returns the element index.
    pub fn add_element(&mut self, element: MeshElement) -> SizingResult<usize> {
        if let Some(node) = element
            .nodes()
            .iter()
            .find(|n| **n as usize >= self.nodes.len())
        {
            return Err(SizingError::MissingNode {
                node: *node,
                node_count: self.nodes.len(),
            });
        }
        self.elements.push(element);
        Ok(self.elements.len() - 1)
    }

    /// Returns the number of nodes.
    #[inline]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Returns the number of elements.
    #[inline]
    pub fn element_count(&self) -> usize {
        self.elements.len()
    }

    /// Returns the node positions.
    #[inline]
    pub fn nodes(&self) -> &[DVec3] {
        &self.nodes
    }

    /// Returns the elements.
    #[inline]
    pub fn elements(&self) -> &[MeshElement] {
        &self.elements
    }
}

/// Model-based sample store.
///
/// The mesh is shared read-only; the store owns only the per-node values.
/// Location considers elements whose nodes all carry a value, plus valued
/// nodes that no such element covers.
#[derive(Debug, Clone)]
pub struct ModelStore {
    mesh: Arc<BackgroundMesh>,
    values: Vec<Option<f64>>,
    /// Uncovered valued nodes first, then fully valued elements
    hosts: Vec<Host>,
    index: OnceLock<SpatialIndex>,
}

/// Something a query point can be located against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Host {
    /// Valued node outside every fully valued element.
    Node(u32),
    /// Element index into the background mesh.
    Element(usize),
}

impl ModelStore {
    /// Attaches node values to a background mesh.
    ///
    /// Fails with [`SizingError::MissingNode`] if a value references a node
    /// absent from `mesh`, or [`SizingError::InvalidValue`] for a
    /// non-positive size. A later value for the same node replaces the
    /// earlier one.
    pub fn bind(
        mesh: Arc<BackgroundMesh>,
        node_values: impl IntoIterator<Item = (u32, f64)>,
    ) -> SizingResult<Self> {
        let mut values = vec![None; mesh.node_count()];
        for (node, value) in node_values {
            let slot = values
                .get_mut(node as usize)
                .ok_or(SizingError::MissingNode {
                    node,
                    node_count: mesh.node_count(),
                })?;
            *slot = Some(check_size(value)?);
        }

        let usable: Vec<usize> = mesh
            .elements()
            .iter()
            .enumerate()
            .filter(|(_, e)| e.nodes().iter().all(|n| values[*n as usize].is_some()))
            .map(|(i, _)| i)
            .collect();

        let mut covered = vec![false; mesh.node_count()];
        for i in &usable {
            for node in mesh.elements()[*i].nodes() {
                covered[*node as usize] = true;
            }
        }
        let hosts = values
            .iter()
            .zip(covered.iter())
            .enumerate()
            .filter(|(_, (value, is_covered))| value.is_some() && !**is_covered)
            .map(|(node, _)| Host::Node(node as u32))
            .chain(usable.into_iter().map(Host::Element))
            .collect();

        Ok(Self {
            mesh,
            values,
            hosts,
            index: OnceLock::new(),
        })
    }

    /// The shared background mesh.
    pub fn mesh(&self) -> &Arc<BackgroundMesh> {
        &self.mesh
    }

    /// Number of nodes carrying a value.
    pub fn sample_count(&self) -> usize {
        self.values.iter().filter(|v| v.is_some()).count()
    }

    /// Returns true if no node carries a value.
    pub fn is_empty(&self) -> bool {
        self.sample_count() == 0
    }

    /// Value attached to `node`, if any.
    pub fn value(&self, node: u32) -> Option<f64> {
        self.values.get(node as usize).copied().flatten()
    }

    /// Interpolates the target size at `point`.
    ///
    /// Locates the host containing the point (nearest host when outside the
    /// mesh) and blends its node values barycentrically. Valued nodes that
    /// belong to no fully valued element act as point hosts, so evaluation
    /// is exact at every valued node.
    pub fn evaluate(&self, point: DVec3, config: &InterpolationConfig) -> SizingResult<f64> {
        if self.hosts.is_empty() {
            return Err(SizingError::EmptyStore);
        }

        let index = self.index.get_or_init(|| {
            let boxes: Vec<_> = self
                .hosts
                .iter()
                .map(|host| {
                    let (vertices, count) = self.corners(self.host_nodes(host));
                    bounds(&vertices[..count])
                })
                .collect();
            SpatialIndex::build(&boxes)
        });

        for slot in index.query_point(point) {
            let nodes = self.host_nodes(&self.hosts[slot]);
            let (vertices, count) = self.corners(nodes);
            let projection = locate(&vertices[..count], point);
            let tolerance = containment_tolerance(&vertices[..count], config.tolerance);
            if projection.distance <= tolerance {
                return Ok(self.blend(nodes, &projection));
            }
        }

        // Outside the mesh: nearest host, earliest on ties
        let mut best: Option<(&[u32], Projection)> = None;
        for host in &self.hosts {
            let nodes = self.host_nodes(host);
            let (vertices, count) = self.corners(nodes);
            let projection = locate(&vertices[..count], point);
            if best.map_or(true, |(_, b)| projection.distance < b.distance) {
                best = Some((nodes, projection));
            }
        }
        match best {
            Some((nodes, projection)) => Ok(self.blend(nodes, &projection)),
            None => Err(SizingError::EmptyStore),
        }
    }

    fn host_nodes<'s>(&'s self, host: &'s Host) -> &'s [u32] {
        match host {
            Host::Node(node) => std::slice::from_ref(node),
            Host::Element(i) => self.mesh.elements()[*i].nodes(),
        }
    }

    fn corners(&self, nodes: &[u32]) -> ([DVec3; 4], usize) {
        let mut vertices = [DVec3::ZERO; 4];
        for (slot, node) in nodes.iter().enumerate() {
            vertices[slot] = self.mesh.nodes()[*node as usize];
        }
        (vertices, nodes.len())
    }

    fn blend(&self, nodes: &[u32], projection: &Projection) -> f64 {
        let mut values = [0.0; 4];
        for (slot, node) in nodes.iter().enumerate() {
            values[slot] = self.values[*node as usize].unwrap_or(0.0);
        }
        projection.interpolate(&values[..nodes.len()])
    }
}
