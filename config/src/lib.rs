//! # Config Crate
//!
//! Centralized configuration constants for the mesh sizing pipeline.
//! Tolerances, interpolation parameters and safety limits are defined here
//! so the sizing core never scatters literals.
//!
//! ## Usage
//!
//! ```rust
//! use config::constants::{CONTAINMENT_EPSILON, DEFAULT_NEAREST_SAMPLES};
//!
//! // A point this close to an element counts as inside it
//! let distance: f64 = 1e-13;
//! assert!(distance <= CONTAINMENT_EPSILON);
//!
//! // Fallback interpolation blends the four closest samples
//! assert_eq!(DEFAULT_NEAREST_SAMPLES, 4);
//! ```
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: All constants defined once, used everywhere
//! - **Deterministic**: No platform-specific values
//! - **Validated**: Tunables built at runtime go through checked constructors

pub mod constants;
