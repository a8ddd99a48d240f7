//! # Configuration Constants
//!
//! Centralized constants for the sizing-field pipeline. Geometric
//! tolerances, interpolation parameters, spatial index tuning and recursion
//! limits are defined here.
//!
//! ## Categories
//!
//! - **Precision**: Floating-point comparison tolerances
//! - **Interpolation**: Fallback sampling parameters
//! - **Spatial Index**: Hash grid tuning
//! - **Limits**: Recursion safety bounds

use std::fmt;

// =============================================================================
// PRECISION CONSTANTS
// =============================================================================

/// Epsilon for floating-point comparisons.
///
/// Used for degenerate-geometry checks (zero-length segments, flat
/// tetrahedra) and for deciding whether two values are "equal".
///
/// # Example
///
/// ```rust
/// use config::constants::EPSILON;
///
/// fn approximately_equal(a: f64, b: f64) -> bool {
///     (a - b).abs() < EPSILON
/// }
///
/// assert!(approximately_equal(1.0, 1.0 + 1e-11));
/// ```
pub const EPSILON: f64 = 1e-10;

/// Relative tolerance for point-in-element tests.
///
/// A query point whose distance to an element is below this value times the
/// element's extent (or below the value itself for tiny elements) is treated
/// as lying inside the element.
///
/// # Example
///
/// ```rust
/// use config::constants::CONTAINMENT_EPSILON;
///
/// let element_extent = 0.3_f64;
/// let tolerance = CONTAINMENT_EPSILON * element_extent.max(1.0);
/// assert!(tolerance > 0.0);
/// ```
pub const CONTAINMENT_EPSILON: f64 = 1e-12;

/// Multiple of machine epsilon, times the largest vertex coordinate, below
/// which a point-in-element distance is rounding noise.
///
/// Keeps containment working for elements far from the origin, where the
/// absolute rounding error of the coordinates exceeds
/// [`CONTAINMENT_EPSILON`].
///
/// # Example
///
/// ```rust
/// use config::constants::ROUNDING_TOLERANCE_FACTOR;
///
/// let coordinate_magnitude = 1e6_f64;
/// let floor = coordinate_magnitude * f64::EPSILON * ROUNDING_TOLERANCE_FACTOR;
/// assert!(floor > 1e-9 && floor < 1e-7);
/// ```
pub const ROUNDING_TOLERANCE_FACTOR: f64 = 64.0;

// =============================================================================
// INTERPOLATION CONSTANTS
// =============================================================================

/// Number of samples blended when a query falls outside every element of a
/// list-based store.
///
/// The fallback is inverse-squared-distance weighting over this many
/// closest samples.
///
/// # Example
///
/// ```rust
/// use config::constants::DEFAULT_NEAREST_SAMPLES;
///
/// let available = 3;
/// let used = available.min(DEFAULT_NEAREST_SAMPLES);
/// assert_eq!(used, 3);
/// ```
pub const DEFAULT_NEAREST_SAMPLES: usize = 4;

// =============================================================================
// SIZE BOUNDS
// =============================================================================

/// Default lower bound applied to every queried size.
pub const DEFAULT_SIZE_MIN: f64 = 0.0;

/// Default upper bound applied to every queried size.
///
/// Large enough to never bind in practice while staying finite, so it
/// survives text serialization.
///
/// # Example
///
/// ```rust
/// use config::constants::DEFAULT_SIZE_MAX;
///
/// let size = 0.01_f64;
/// assert_eq!(size.min(DEFAULT_SIZE_MAX), size);
/// ```
pub const DEFAULT_SIZE_MAX: f64 = 1e22;

/// Default multiplier applied to every queried size.
pub const DEFAULT_SIZE_FACTOR: f64 = 1.0;

// =============================================================================
// SPATIAL INDEX CONSTANTS
// =============================================================================

/// Cell size multiplier for the element hash grid.
///
/// Larger values mean fewer cells but more candidate elements per cell.
pub const SPATIAL_CELL_FACTOR: f64 = 2.0;

/// Maximum number of grid cells a single element may occupy.
///
/// Elements whose bounding box would span more cells than this are kept in a
/// side list that every query inspects.
///
/// # Example
///
/// ```rust
/// use config::constants::MAX_CELLS_PER_ELEMENT;
///
/// let cells_spanned = 10_000;
/// assert!(cells_spanned > MAX_CELLS_PER_ELEMENT);
/// ```
pub const MAX_CELLS_PER_ELEMENT: usize = 512;

// =============================================================================
// LIMIT CONSTANTS
// =============================================================================

/// Bytes of stack space reserved when growing recursion limits using the
/// `stacker` crate.
///
/// # Example
///
/// ```rust
/// use config::constants::STACKER_STACK_SIZE_BYTES;
/// assert!(STACKER_STACK_SIZE_BYTES >= 1024);
/// ```
pub const STACKER_STACK_SIZE_BYTES: usize = 8 * 1024 * 1024;

/// Remaining stack below which `stacker` switches to a fresh segment of
/// [`STACKER_STACK_SIZE_BYTES`].
///
/// # Example
/// ```rust
/// use config::constants::{STACKER_RED_ZONE_BYTES, STACKER_STACK_SIZE_BYTES};
/// assert!(STACKER_RED_ZONE_BYTES < STACKER_STACK_SIZE_BYTES);
/// ```
pub const STACKER_RED_ZONE_BYTES: usize = 64 * 1024;

/// Maximum nesting depth of combinator fields during evaluation.
///
/// Prevents runaway recursion through very deep (but acyclic) field chains.
/// The `stacker` crate keeps evaluation below this depth safe.
///
/// # Example
///
/// ```rust
/// use config::constants::MAX_FIELD_DEPTH;
///
/// let current_depth = 12;
/// assert!(current_depth < MAX_FIELD_DEPTH);
/// ```
pub const MAX_FIELD_DEPTH: usize = 256;

// =============================================================================
// RUNTIME CONFIGURATION
// =============================================================================

/// Tunables for sample-store interpolation that can be overridden per
/// session.
///
/// # Examples
/// ```
/// use config::constants::InterpolationConfig;
/// let config = InterpolationConfig::default();
/// assert!(config.tolerance > 0.0);
/// assert_eq!(config.nearest_samples, 4);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InterpolationConfig {
    /// Relative tolerance for point-in-element tests.
    pub tolerance: f64,
    /// Samples blended by the inverse-distance fallback.
    pub nearest_samples: usize,
}

impl InterpolationConfig {
    /// Builds a configuration enforcing strict validation of the supplied
    /// tolerance and sample count.
    ///
    /// # Examples
    /// ```
    /// use config::constants::InterpolationConfig;
    /// let cfg = InterpolationConfig::new(1.0e-9, 6).expect("valid config");
    /// assert_eq!(cfg.nearest_samples, 6);
    /// ```
    pub fn new(tolerance: f64, nearest_samples: usize) -> Result<Self, ConfigError> {
        if !(tolerance > 0.0) || !tolerance.is_finite() {
            return Err(ConfigError::InvalidTolerance(tolerance));
        }
        if nearest_samples == 0 {
            return Err(ConfigError::InvalidSampleCount(nearest_samples));
        }
        Ok(Self {
            tolerance,
            nearest_samples,
        })
    }
}

impl Default for InterpolationConfig {
    fn default() -> Self {
        Self {
            tolerance: CONTAINMENT_EPSILON,
            nearest_samples: DEFAULT_NEAREST_SAMPLES,
        }
    }
}

/// Error returned when invalid configuration values are provided.
#[derive(Debug, PartialEq)]
pub enum ConfigError {
    /// Raised when tolerance is zero, negative or not finite.
    InvalidTolerance(f64),
    /// Raised when the fallback would blend no samples at all.
    InvalidSampleCount(usize),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidTolerance(value) => {
                write!(f, "tolerance must be positive and finite: {value}")
            }
            ConfigError::InvalidSampleCount(value) => {
                write!(f, "nearest_samples must be >= 1: {value}")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

// =============================================================================
// HELPER FUNCTIONS
// =============================================================================

/// Returns true when `value` is usable as a target element size.
///
/// Sizes must be strictly positive and finite.
///
/// # Example
///
/// ```rust
/// use config::constants::is_valid_size;
///
/// assert!(is_valid_size(0.05));
/// assert!(!is_valid_size(0.0));
/// assert!(!is_valid_size(f64::NAN));
/// ```
#[inline]
pub fn is_valid_size(value: f64) -> bool {
    value > 0.0 && value.is_finite()
}
