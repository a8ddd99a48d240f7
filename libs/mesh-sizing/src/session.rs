//! # Sizing Session
//!
//! Caller-owned context bundling the field registry, the background
//! designation and the size options of one meshing session. Independent
//! sessions never share state.
//!
//! Mutation (`&mut self`) is meant for the setup phase; once meshing starts
//! the session is only read, and reads are safe from any number of threads.
//! See [`SharedSession`](crate::SharedSession) for mutation during queries.

use glam::DVec3;
use tracing::debug;

use crate::background::{BackgroundDesignation, ConstraintSource, DisregardFlags};
use crate::error::{SizingError, SizingResult};
use crate::evaluator::Evaluator;
use crate::field::{Field, FieldId};
use crate::options::{SizeOptions, SizingOption};
use crate::registry::FieldRegistry;

/// A meshing session's sizing state.
///
/// # Example
///
/// ```rust
/// use mesh_sizing::{Field, SizingSession};
/// use glam::DVec3;
///
/// let mut session = SizingSession::new();
/// let bg = session.add_field(Field::constant(0.05).unwrap()).unwrap();
/// session.set_background(bg).unwrap();
/// assert_eq!(session.query_size(DVec3::ZERO, &[]).unwrap(), 0.05);
/// ```
#[derive(Debug, Clone, Default)]
pub struct SizingSession {
    registry: FieldRegistry,
    background: BackgroundDesignation,
    options: SizeOptions,
}

impl SizingSession {
    /// Creates an empty session with default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty session with validated options.
    pub fn with_options(options: SizeOptions) -> SizingResult<Self> {
        options.validate()?;
        Ok(Self {
            options,
            ..Self::default()
        })
    }

    // =========================================================================
    // FIELDS
    // =========================================================================

    /// The field registry.
    #[inline]
    pub fn registry(&self) -> &FieldRegistry {
        &self.registry
    }

    /// Registers a field under a fresh identifier.
    pub fn add_field(&mut self, field: Field) -> SizingResult<FieldId> {
        self.registry.add(field)
    }

    /// Registers a field under a caller-chosen identifier.
    pub fn add_field_with_id(&mut self, id: FieldId, field: Field) -> SizingResult<FieldId> {
        self.registry.add_with_id(id, field)
    }

    /// Redefines an existing field, returning the previous definition.
    pub fn replace_field(&mut self, id: FieldId, field: Field) -> SizingResult<Field> {
        self.registry.replace(id, field)
    }

    /// Removes a field; clears the background designation if it pointed at
    /// the removed field.
    pub fn remove_field(&mut self, id: FieldId) -> SizingResult<Field> {
        let removed = self.registry.remove(id)?;
        if self.background.field() == Some(id) {
            self.background.clear();
            debug!(field = %id, "background field removed, designation cleared");
        }
        Ok(removed)
    }

    /// Looks up a field.
    pub fn field(&self, id: FieldId) -> SizingResult<&Field> {
        self.registry.get(id)
    }

    // =========================================================================
    // BACKGROUND DESIGNATION
    // =========================================================================

    /// Designates `id` as the background field, replacing any previous one.
    ///
    /// Fails with [`SizingError::NotFound`] if `id` is not registered.
    pub fn set_background(&mut self, id: FieldId) -> SizingResult<()> {
        if !self.registry.contains(id) {
            return Err(SizingError::NotFound(id));
        }
        let previous = self.background.set(id);
        debug!(field = %id, previous = ?previous, "background field set");
        Ok(())
    }

    /// Clears the background designation. No-op if none is set.
    pub fn clear_background(&mut self) {
        if let Some(previous) = self.background.clear() {
            debug!(field = %previous, "background field cleared");
        }
    }

    /// The designated background field.
    #[inline]
    pub fn background(&self) -> Option<FieldId> {
        self.background.field()
    }

    /// The disregard flags.
    #[inline]
    pub fn disregard_flags(&self) -> DisregardFlags {
        self.background.flags()
    }

    /// Sets whether constraints from `source` are disregarded.
    pub fn set_disregard(&mut self, source: ConstraintSource, disregard: bool) {
        self.background.flags_mut().set(source, disregard);
        debug!(?source, disregard, "disregard flag changed");
    }

    // =========================================================================
    // OPTIONS
    // =========================================================================

    /// The size options.
    #[inline]
    pub fn options(&self) -> &SizeOptions {
        &self.options
    }

    /// Replaces the size options after validating them.
    pub fn set_options(&mut self, options: SizeOptions) -> SizingResult<()> {
        options.validate()?;
        self.options = options;
        debug!(?options, "size options replaced");
        Ok(())
    }

    /// Sets a named option.
    ///
    /// Fails with [`SizingError::UnknownOption`] for an unrecognized name,
    /// or the error of the underlying setter; failed calls change nothing.
    pub fn set_option(&mut self, name: &str, value: f64) -> SizingResult<()> {
        let option: SizingOption = name.parse()?;
        match option {
            SizingOption::ExtendFromBoundary => {
                self.set_disregard(ConstraintSource::BoundaryExtension, value == 0.0)
            }
            SizingOption::FromPoints => {
                self.set_disregard(ConstraintSource::PointDensity, value == 0.0)
            }
            SizingOption::FromCurvature => {
                self.set_disregard(ConstraintSource::Curvature, value == 0.0)
            }
            SizingOption::SizeMin => self.set_options(SizeOptions {
                size_min: value,
                ..self.options
            })?,
            SizingOption::SizeMax => self.set_options(SizeOptions {
                size_max: value,
                ..self.options
            })?,
            SizingOption::SizeFactor => self.set_options(SizeOptions {
                size_factor: value,
                ..self.options
            })?,
            SizingOption::SizeDefault => self.set_options(SizeOptions {
                default_size: (value > 0.0).then_some(value),
                ..self.options
            })?,
            SizingOption::BackgroundField => {
                if value < 0.0 {
                    self.clear_background();
                } else {
                    self.set_background(field_id_from_number(value)?)?;
                }
            }
        }
        Ok(())
    }

    /// Reads a named option back as a number.
    ///
    /// Flags read as 1 (rule considered) or 0 (disregarded); an unset
    /// default size or background field reads as -1.
    pub fn option(&self, name: &str) -> SizingResult<f64> {
        let option: SizingOption = name.parse()?;
        let flags = self.background.flags();
        let enabled = |disregarded: bool| if disregarded { 0.0 } else { 1.0 };
        Ok(match option {
            SizingOption::ExtendFromBoundary => enabled(flags.boundary_extension),
            SizingOption::FromPoints => enabled(flags.point_density),
            SizingOption::FromCurvature => enabled(flags.curvature),
            SizingOption::SizeMin => self.options.size_min,
            SizingOption::SizeMax => self.options.size_max,
            SizingOption::SizeFactor => self.options.size_factor,
            SizingOption::SizeDefault => self.options.default_size.unwrap_or(-1.0),
            SizingOption::BackgroundField => self
                .background
                .field()
                .map_or(-1.0, |id| f64::from(id.get())),
        })
    }

    // =========================================================================
    // EVALUATION
    // =========================================================================

    /// Read-only evaluator over this session's fields.
    pub fn evaluator(&self) -> Evaluator<'_> {
        Evaluator::new(&self.registry, &self.options.interpolation)
    }

    /// Evaluates field `id` at `point`, without options or constraints.
    pub fn evaluate(&self, id: FieldId, point: DVec3) -> SizingResult<f64> {
        self.evaluator().evaluate(id, point)
    }

    pub(crate) fn designation(&self) -> &BackgroundDesignation {
        &self.background
    }
}

fn field_id_from_number(value: f64) -> SizingResult<FieldId> {
    if value.fract() != 0.0 || value > f64::from(u32::MAX) {
        return Err(SizingError::invalid_parameter(format!(
            "field identifier must be a non-negative integer, got {value}"
        )));
    }
    Ok(FieldId::new(value as u32))
}
