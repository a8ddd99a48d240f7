//! # Error Types
//!
//! Error types for sample stores, the field registry and size queries.
//!
//! ## Error Policy
//!
//! - Construction and registry errors are reported before any state changes
//! - Evaluation errors abort only the query that raised them
//! - Nothing is retried or silently replaced with a fallback size

use crate::field::FieldId;
use thiserror::Error;

// =============================================================================
// ERROR TYPES
// =============================================================================

/// Errors that can occur while building or querying sizing fields.
///
/// ## Example
///
/// ```rust
/// use mesh_sizing::{ListStore, SizingError};
/// use glam::DVec3;
///
/// let mut store = ListStore::new();
/// match store.add_scatter_point(DVec3::ZERO, -1.0) {
///     Err(SizingError::InvalidValue { value }) => assert_eq!(value, -1.0),
///     other => panic!("unexpected: {other:?}"),
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SizingError {
    /// A size that is zero, negative or not finite.
    #[error("Invalid size value: {value} (sizes must be strictly positive)")]
    InvalidValue {
        /// The rejected value.
        value: f64,
    },

    /// Vertex and value counts of a sample element disagree, or the element
    /// has an unsupported vertex count.
    #[error("Dimension mismatch: {vertices} vertices, {values} values")]
    DimensionMismatch {
        /// Number of vertices supplied.
        vertices: usize,
        /// Number of values supplied.
        values: usize,
    },

    /// A node index that does not exist in the background mesh.
    #[error("Missing node {node} (mesh has {node_count} nodes)")]
    MissingNode {
        /// The dangling node index.
        node: u32,
        /// Number of nodes in the mesh.
        node_count: usize,
    },

    /// A combinator child that is not registered.
    #[error("Missing child field {child}")]
    MissingChild {
        /// The unregistered child identifier.
        child: FieldId,
    },

    /// Unknown field identifier.
    #[error("Field {0} not found")]
    NotFound(FieldId),

    /// Removal blocked because a combinator still references the field.
    #[error("Field {field} is in use by field {referenced_by}")]
    FieldInUse {
        /// The field that was to be removed.
        field: FieldId,
        /// The combinator referencing it.
        referenced_by: FieldId,
    },

    /// The child graph revisits a field.
    #[error("Cycle detected at field {0}")]
    CycleDetected(FieldId),

    /// Size query with neither a background field, external constraints nor
    /// a configured default size.
    #[error("No size constraint available at query point")]
    NoConstraint,

    /// Query against a store holding no samples.
    #[error("Sample store is empty")]
    EmptyStore,

    /// Malformed field parameters.
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Explicit identifier already registered.
    #[error("Field {0} already exists")]
    DuplicateField(FieldId),

    /// Every `u32` field identifier has been handed out.
    #[error("Field identifiers exhausted")]
    IdentifiersExhausted,

    /// Combinator nesting deeper than the evaluation limit.
    #[error("Field nesting exceeds depth {limit}")]
    DepthExceeded {
        /// Configured maximum depth.
        limit: usize,
    },

    /// Unrecognized named option.
    #[error("Unknown option: {0}")]
    UnknownOption(String),

    /// A writer panicked while holding the shared session lock.
    #[error("Sizing session lock poisoned")]
    LockPoisoned,
}

impl SizingError {
    /// Creates an invalid parameter error.
    pub fn invalid_parameter(message: impl Into<String>) -> Self {
        Self::InvalidParameter(message.into())
    }
}

// =============================================================================
// RESULT TYPE ALIAS
// =============================================================================

/// Result type alias for sizing operations.
pub type SizingResult<T> = Result<T, SizingError>;

/// Returns `value` if it is a usable size, `InvalidValue` otherwise.
pub(crate) fn check_size(value: f64) -> SizingResult<f64> {
    if config::constants::is_valid_size(value) {
        Ok(value)
    } else {
        Err(SizingError::InvalidValue { value })
    }
}

// =============================================================================
// TESTS
// =============================================================================
