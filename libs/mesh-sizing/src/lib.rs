//! # Mesh Sizing
//!
//! Background sizing fields for mesh generators.
//! Answers "what element size should the mesh have at this point?" from
//! user-supplied sample data, analytic fields and combinations of them.
//!
//! ## Architecture
//!
//! ```text
//! SampleStore (list | model)
//!        ↓
//! Field (raw | analytic | combinator) → FieldRegistry
//!        ↓
//! Evaluator ← BackgroundDesignation + SizeOptions
//!        ↓
//! SizingSession::query_size
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use mesh_sizing::{ConstraintSource, ListStore, SizeConstraint, SizingSession};
//! use glam::DVec3;
//!
//! let mut store = ListStore::new();
//! store
//!     .add_scatter_element(&[DVec3::ZERO, DVec3::X, DVec3::Y], &[0.1, 0.2, 0.3])
//!     .unwrap();
//!
//! let mut session = SizingSession::new();
//! let field = session.add_field(store.into()).unwrap();
//! session.set_background(field).unwrap();
//!
//! let boundary = SizeConstraint::new(ConstraintSource::BoundaryExtension, 0.05);
//! assert_eq!(session.query_size(DVec3::ZERO, &[boundary]).unwrap(), 0.05);
//! ```

pub mod background;
pub mod error;
pub mod evaluator;
pub mod field;
pub mod geometry;
pub mod loader;
pub mod options;
pub mod query;
pub mod registry;
pub mod session;
pub mod shared;
pub mod spatial_index;
pub mod store;

pub use background::{BackgroundDesignation, ConstraintSource, DisregardFlags};
pub use error::{SizingError, SizingResult};
pub use evaluator::Evaluator;
pub use field::{BoxField, Combinator, ConstantField, DistanceField, Field, FieldId, Operator};
pub use loader::{ListFieldData, ModelFieldData, ScatterRecord};
pub use options::{SizeOptions, SizingOption};
pub use query::{SizeConstraint, SizeQuery};
pub use registry::FieldRegistry;
pub use session::SizingSession;
pub use shared::SharedSession;
pub use store::{BackgroundMesh, ListStore, MeshElement, ModelStore, SampleStore, ScatterElement};
