//! # Fields
//!
//! A field answers "what target size applies at this point?". Fields are
//! either raw (a sample store or an analytic rule) or combinators whose
//! value is computed from child fields referenced by [`FieldId`].
//!
//! ## Variants
//!
//! - **Raw**: wraps a [`SampleStore`] (list- or model-based)
//! - **Constant**, **Distance**, **Box**: analytic rules
//! - **Combinator**: `Min`, `Max` or `Threshold` over child fields
//!
//! Child references are weak: the registry owns every field and validates
//! references when fields are added.

pub mod analytic;

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{SizingError, SizingResult};
use crate::store::{ListStore, ModelStore, SampleStore};

pub use analytic::{BoxField, ConstantField, DistanceField};

/// Opaque field identifier, stable for the lifetime of the field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FieldId(u32);

impl FieldId {
    /// Wraps a raw identifier.
    #[inline]
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    /// The raw identifier.
    #[inline]
    pub const fn get(self) -> u32 {
        self.0
    }
}

impl fmt::Display for FieldId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "field#{}", self.0)
    }
}

/// How a combinator merges its children.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Operator {
    /// Smallest child value.
    Min,
    /// Largest child value.
    Max,
    /// Linear blend between the `near` and `far` children driven by the
    /// `input` child (usually a distance).
    Threshold {
        /// Input value at and below which `near` applies.
        dist_min: f64,
        /// Input value at and above which `far` applies.
        dist_max: f64,
    },
}

/// A field computed from other fields.
///
/// # Example
///
/// ```rust
/// use mesh_sizing::field::{Combinator, FieldId};
///
/// let min = Combinator::min(vec![FieldId::new(1), FieldId::new(2)]).unwrap();
/// assert_eq!(min.children(), &[FieldId::new(1), FieldId::new(2)]);
/// assert!(Combinator::min(Vec::new()).is_err());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Combinator {
    operator: Operator,
    children: Vec<FieldId>,
}

impl Combinator {
    /// Minimum of one or more children.
    pub fn min(children: Vec<FieldId>) -> SizingResult<Self> {
        Self::reducing(Operator::Min, children)
    }

    /// Maximum of one or more children.
    pub fn max(children: Vec<FieldId>) -> SizingResult<Self> {
        Self::reducing(Operator::Max, children)
    }

    fn reducing(operator: Operator, children: Vec<FieldId>) -> SizingResult<Self> {
        if children.is_empty() {
            return Err(SizingError::invalid_parameter(
                "min/max combinator needs at least one child",
            ));
        }
        Ok(Self { operator, children })
    }

    /// Threshold blend.
    ///
    /// With `d = input(p)`: `near(p)` when `d <= dist_min`, `far(p)` when
    /// `d >= dist_max`, linear in between. Requires
    /// `0 <= dist_min < dist_max`.
    pub fn threshold(
        input: FieldId,
        near: FieldId,
        far: FieldId,
        dist_min: f64,
        dist_max: f64,
    ) -> SizingResult<Self> {
        if !(dist_min >= 0.0 && dist_min < dist_max && dist_max.is_finite()) {
            return Err(SizingError::invalid_parameter(format!(
                "threshold needs 0 <= dist_min < dist_max, got {dist_min} and {dist_max}"
            )));
        }
        Ok(Self {
            operator: Operator::Threshold { dist_min, dist_max },
            children: vec![input, near, far],
        })
    }

    /// The merge operator.
    #[inline]
    pub fn operator(&self) -> Operator {
        self.operator
    }

    /// Child identifiers in order (`[input, near, far]` for thresholds).
    #[inline]
    pub fn children(&self) -> &[FieldId] {
        &self.children
    }
}

/// A sizing field.
#[derive(Debug, Clone)]
pub enum Field {
    /// Interpolated from stored samples.
    Raw(SampleStore),
    /// Same size everywhere.
    Constant(ConstantField),
    /// Distance to a point set.
    Distance(DistanceField),
    /// Box with inside and outside sizes.
    Box(BoxField),
    /// Computed from child fields.
    Combinator(Combinator),
}

impl Field {
    /// Child identifiers referenced by this field.
    pub fn children(&self) -> &[FieldId] {
        match self {
            Self::Combinator(combinator) => combinator.children(),
            _ => &[],
        }
    }

    /// Short name of the field kind, for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Raw(SampleStore::List(_)) => "list",
            Self::Raw(SampleStore::Model(_)) => "model",
            Self::Constant(_) => "constant",
            Self::Distance(_) => "distance",
            Self::Box(_) => "box",
            Self::Combinator(c) => match c.operator() {
                Operator::Min => "min",
                Operator::Max => "max",
                Operator::Threshold { .. } => "threshold",
            },
        }
    }

    /// Convenience constructor for a constant field.
    pub fn constant(size: f64) -> SizingResult<Self> {
        ConstantField::new(size).map(Self::Constant)
    }
}

impl From<SampleStore> for Field {
    fn from(store: SampleStore) -> Self {
        Self::Raw(store)
    }
}

impl From<ListStore> for Field {
    fn from(store: ListStore) -> Self {
        Self::Raw(store.into())
    }
}

impl From<ModelStore> for Field {
    fn from(store: ModelStore) -> Self {
        Self::Raw(store.into())
    }
}

impl From<Combinator> for Field {
    fn from(combinator: Combinator) -> Self {
        Self::Combinator(combinator)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_id_display() {
        assert_eq!(FieldId::new(7).to_string(), "field#7");
        assert_eq!(FieldId::new(7).get(), 7);
    }

    #[test]
    fn test_threshold_children_order() {
        let t = Combinator::threshold(FieldId::new(1), FieldId::new(2), FieldId::new(3), 0.1, 0.5)
            .unwrap();
        assert_eq!(
            t.children(),
            &[FieldId::new(1), FieldId::new(2), FieldId::new(3)]
        );
        assert_eq!(
            t.operator(),
            Operator::Threshold {
                dist_min: 0.1,
                dist_max: 0.5
            }
        );
    }

    #[test]
    fn test_threshold_rejects_inverted_distances() {
        let ids = (FieldId::new(1), FieldId::new(2), FieldId::new(3));
        assert!(Combinator::threshold(ids.0, ids.1, ids.2, 0.5, 0.5).is_err());
        assert!(Combinator::threshold(ids.0, ids.1, ids.2, -0.1, 0.5).is_err());
        assert!(Combinator::threshold(ids.0, ids.1, ids.2, 0.0, f64::NAN).is_err());
    }

    #[test]
    fn test_field_kind_and_children() {
        let raw = Field::from(SampleStore::from(ListStore::new()));
        assert_eq!(raw.kind(), "list");
        assert!(raw.children().is_empty());

        let max = Field::from(Combinator::max(vec![FieldId::new(4)]).unwrap());
        assert_eq!(max.kind(), "max");
        assert_eq!(max.children(), &[FieldId::new(4)]);

        assert!(Field::constant(-2.0).is_err());
    }
}
