//! # Background Designation
//!
//! Which field the mesh generator must treat as authoritative, and which
//! of the generator's own size rules are disregarded in its favour.

use serde::{Deserialize, Serialize};

use crate::field::FieldId;

/// Geometric size rules the mesh generator evaluates on its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConstraintSource {
    /// Sizes propagated inward from the boundary discretization.
    BoundaryExtension,
    /// Sizes prescribed at geometry points.
    PointDensity,
    /// Sizes derived from boundary curvature.
    Curvature,
}

/// Per-source override flags.
///
/// A set flag removes that source's constraints from the size query while a
/// background field is designated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisregardFlags {
    /// Ignore boundary-extension constraints.
    pub boundary_extension: bool,
    /// Ignore point-density constraints.
    pub point_density: bool,
    /// Ignore curvature constraints.
    pub curvature: bool,
}

impl DisregardFlags {
    /// Every source disregarded: the background field alone decides.
    pub const ALL: Self = Self {
        boundary_extension: true,
        point_density: true,
        curvature: true,
    };

    /// Returns true if all three sources are disregarded.
    #[inline]
    pub fn all(&self) -> bool {
        self.boundary_extension && self.point_density && self.curvature
    }

    /// Returns true if constraints from `source` are disregarded.
    #[inline]
    pub fn disregards(&self, source: ConstraintSource) -> bool {
        match source {
            ConstraintSource::BoundaryExtension => self.boundary_extension,
            ConstraintSource::PointDensity => self.point_density,
            ConstraintSource::Curvature => self.curvature,
        }
    }

    /// Sets the flag for `source`.
    pub fn set(&mut self, source: ConstraintSource, disregard: bool) {
        match source {
            ConstraintSource::BoundaryExtension => self.boundary_extension = disregard,
            ConstraintSource::PointDensity => self.point_density = disregard,
            ConstraintSource::Curvature => self.curvature = disregard,
        }
    }
}

/// Zero-or-one background field plus the disregard flags.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BackgroundDesignation {
    field: Option<FieldId>,
    flags: DisregardFlags,
}

impl BackgroundDesignation {
    /// The designated field, if any.
    #[inline]
    pub fn field(&self) -> Option<FieldId> {
        self.field
    }

    /// Designates `id`, returning the previous designation.
    pub(crate) fn set(&mut self, id: FieldId) -> Option<FieldId> {
        self.field.replace(id)
    }

    /// Clears the designation, returning the previous one.
    pub(crate) fn clear(&mut self) -> Option<FieldId> {
        self.field.take()
    }

    /// The disregard flags.
    #[inline]
    pub fn flags(&self) -> DisregardFlags {
        self.flags
    }

    pub(crate) fn flags_mut(&mut self) -> &mut DisregardFlags {
        &mut self.flags
    }
}
