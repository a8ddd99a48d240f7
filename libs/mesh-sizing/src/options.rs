//! # Sizing Options
//!
//! Session-wide size bounds and the named-option surface exposed to a
//! configuration layer.
//!
//! ## Named Options
//!
//! | Name | Effect |
//! |------|--------|
//! | `Mesh.MeshSizeExtendFromBoundary` | 0 disregards boundary extension |
//! | `Mesh.MeshSizeFromPoints` | 0 disregards point density |
//! | `Mesh.MeshSizeFromCurvature` | 0 disregards curvature |
//! | `Mesh.MeshSizeMin` / `Mesh.MeshSizeMax` | clamp bounds |
//! | `Mesh.MeshSizeFactor` | size multiplier |
//! | `Mesh.MeshSizeDefault` | size used when nothing constrains a point |
//! | `Mesh.BackgroundField` | designates a field id, negative clears |
//!
//! The legacy `Mesh.CharacteristicLength*` spellings are accepted too.

use std::fmt;
use std::str::FromStr;

use config::constants::{
    is_valid_size, InterpolationConfig, DEFAULT_SIZE_FACTOR, DEFAULT_SIZE_MAX, DEFAULT_SIZE_MIN,
};
use serde::{Deserialize, Serialize};

use crate::error::{SizingError, SizingResult};

/// Bounds and scaling applied to every size query result.
///
/// # Example
///
/// ```rust
/// use mesh_sizing::SizeOptions;
///
/// let options = SizeOptions {
///     size_min: 0.01,
///     size_max: 1.0,
///     size_factor: 2.0,
///     ..SizeOptions::default()
/// };
/// assert_eq!(options.apply(0.001), 0.01);
/// assert_eq!(options.apply(0.1), 0.2);
/// assert_eq!(options.apply(5.0), 1.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SizeOptions {
    /// Lower bound on returned sizes.
    pub size_min: f64,
    /// Upper bound on returned sizes.
    pub size_max: f64,
    /// Multiplier applied before clamping.
    pub size_factor: f64,
    /// Size returned when no background field is designated and no
    /// external constraint applies.
    pub default_size: Option<f64>,
    /// Sample-store interpolation tunables.
    #[serde(skip)]
    pub interpolation: InterpolationConfig,
}

impl Default for SizeOptions {
    fn default() -> Self {
        Self {
            size_min: DEFAULT_SIZE_MIN,
            size_max: DEFAULT_SIZE_MAX,
            size_factor: DEFAULT_SIZE_FACTOR,
            default_size: None,
            interpolation: InterpolationConfig::default(),
        }
    }
}

impl SizeOptions {
    /// Scales `size` by the factor, then clamps it to `[size_min, size_max]`.
    #[inline]
    pub fn apply(&self, size: f64) -> f64 {
        (size * self.size_factor).max(self.size_min).min(self.size_max)
    }

    /// Checks the options for consistency.
    pub fn validate(&self) -> SizingResult<()> {
        if !(self.size_min >= 0.0) || !self.size_min.is_finite() {
            return Err(SizingError::invalid_parameter(format!(
                "size_min must be non-negative, got {}",
                self.size_min
            )));
        }
        if !is_valid_size(self.size_max) || self.size_max < self.size_min {
            return Err(SizingError::invalid_parameter(format!(
                "size_max must be positive and >= size_min, got {}",
                self.size_max
            )));
        }
        if !is_valid_size(self.size_factor) {
            return Err(SizingError::invalid_parameter(format!(
                "size_factor must be positive, got {}",
                self.size_factor
            )));
        }
        if let Some(size) = self.default_size {
            if !is_valid_size(size) {
                return Err(SizingError::InvalidValue { value: size });
            }
        }
        Ok(())
    }
}

/// Options settable by name from a configuration layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SizingOption {
    /// Boundary-extension rule on (nonzero) or disregarded (0).
    ExtendFromBoundary,
    /// Point-density rule on (nonzero) or disregarded (0).
    FromPoints,
    /// Curvature rule on (nonzero) or disregarded (0).
    FromCurvature,
    /// Lower size bound.
    SizeMin,
    /// Upper size bound.
    SizeMax,
    /// Size multiplier.
    SizeFactor,
    /// Default size (value <= 0 clears it).
    SizeDefault,
    /// Background field id (negative clears it).
    BackgroundField,
}

impl SizingOption {
    /// Every option, in documentation order.
    pub const ALL: [SizingOption; 8] = [
        SizingOption::ExtendFromBoundary,
        SizingOption::FromPoints,
        SizingOption::FromCurvature,
        SizingOption::SizeMin,
        SizingOption::SizeMax,
        SizingOption::SizeFactor,
        SizingOption::SizeDefault,
        SizingOption::BackgroundField,
    ];

    /// Canonical option name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::ExtendFromBoundary => "Mesh.MeshSizeExtendFromBoundary",
            Self::FromPoints => "Mesh.MeshSizeFromPoints",
            Self::FromCurvature => "Mesh.MeshSizeFromCurvature",
            Self::SizeMin => "Mesh.MeshSizeMin",
            Self::SizeMax => "Mesh.MeshSizeMax",
            Self::SizeFactor => "Mesh.MeshSizeFactor",
            Self::SizeDefault => "Mesh.MeshSizeDefault",
            Self::BackgroundField => "Mesh.BackgroundField",
        }
    }

    fn legacy_name(&self) -> Option<&'static str> {
        match self {
            Self::ExtendFromBoundary => Some("Mesh.CharacteristicLengthExtendFromBoundary"),
            Self::FromPoints => Some("Mesh.CharacteristicLengthFromPoints"),
            Self::FromCurvature => Some("Mesh.CharacteristicLengthFromCurvature"),
            Self::SizeMin => Some("Mesh.CharacteristicLengthMin"),
            Self::SizeMax => Some("Mesh.CharacteristicLengthMax"),
            Self::SizeFactor => Some("Mesh.CharacteristicLengthFactor"),
            Self::SizeDefault | Self::BackgroundField => None,
        }
    }
}

impl FromStr for SizingOption {
    type Err = SizingError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|option| option.name() == name || option.legacy_name() == Some(name))
            .ok_or_else(|| SizingError::UnknownOption(name.to_string()))
    }
}

impl fmt::Display for SizingOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
