//! Field evaluation.
//!
//! Resolves a field identifier to a target size at a point, recursing
//! through combinator children. Evaluation only reads the registry and the
//! sample stores, so any number of evaluators may run concurrently over a
//! shared registry.

use config::constants::{
    InterpolationConfig, MAX_FIELD_DEPTH, STACKER_RED_ZONE_BYTES, STACKER_STACK_SIZE_BYTES,
};
use glam::DVec3;
use stacker::maybe_grow;

use crate::error::{SizingError, SizingResult};
use crate::field::{Combinator, Field, FieldId, Operator};
use crate::registry::FieldRegistry;

/// Read-only evaluator over a registry.
///
/// # Examples
/// ```
/// use mesh_sizing::{Evaluator, Field, FieldRegistry};
/// use config::constants::InterpolationConfig;
/// use glam::DVec3;
///
/// let mut registry = FieldRegistry::new();
/// let id = registry.add(Field::constant(0.25).unwrap()).unwrap();
/// let config = InterpolationConfig::default();
/// let evaluator = Evaluator::new(&registry, &config);
/// assert_eq!(evaluator.evaluate(id, DVec3::ZERO).unwrap(), 0.25);
/// ```
#[derive(Clone, Copy, Debug)]
pub struct Evaluator<'a> {
    registry: &'a FieldRegistry,
    config: &'a InterpolationConfig,
}

impl<'a> Evaluator<'a> {
    /// Creates an evaluator borrowing the registry and interpolation tunables.
    pub fn new(registry: &'a FieldRegistry, config: &'a InterpolationConfig) -> Self {
        Self { registry, config }
    }

    /// Evaluates field `id` at `point`.
    ///
    /// Fails with [`SizingError::NotFound`] for an unknown root,
    /// [`SizingError::MissingChild`] for a dangling child and
    /// [`SizingError::CycleDetected`] if recursion revisits a field already
    /// being evaluated.
    pub fn evaluate(&self, id: FieldId, point: DVec3) -> SizingResult<f64> {
        let mut stack = Vec::new();
        self.evaluate_on_stack(id, point, &mut stack)
    }

    fn evaluate_on_stack(
        &self,
        id: FieldId,
        point: DVec3,
        stack: &mut Vec<FieldId>,
    ) -> SizingResult<f64> {
        if stack.contains(&id) {
            return Err(SizingError::CycleDetected(id));
        }
        if stack.len() >= MAX_FIELD_DEPTH {
            return Err(SizingError::DepthExceeded {
                limit: MAX_FIELD_DEPTH,
            });
        }
        let field = match self.registry.get(id) {
            Ok(field) => field,
            Err(_) if !stack.is_empty() => return Err(SizingError::MissingChild { child: id }),
            Err(err) => return Err(err),
        };

        stack.push(id);
        let result = self.evaluate_field(field, point, stack);
        stack.pop();
        result
    }

    fn evaluate_field(
        &self,
        field: &Field,
        point: DVec3,
        stack: &mut Vec<FieldId>,
    ) -> SizingResult<f64> {
        match field {
            Field::Raw(store) => store.evaluate(point, self.config),
            Field::Constant(constant) => Ok(constant.size()),
            Field::Distance(distance) => Ok(distance.evaluate(point)),
            Field::Box(bounded) => Ok(bounded.evaluate(point)),
            Field::Combinator(combinator) => maybe_grow(
                STACKER_RED_ZONE_BYTES,
                STACKER_STACK_SIZE_BYTES,
                || self.combine(combinator, point, stack),
            ),
        }
    }

    fn combine(
        &self,
        combinator: &Combinator,
        point: DVec3,
        stack: &mut Vec<FieldId>,
    ) -> SizingResult<f64> {
        let children = combinator.children();
        match combinator.operator() {
            Operator::Min => children.iter().try_fold(f64::INFINITY, |acc, child| {
                Ok(acc.min(self.evaluate_on_stack(*child, point, stack)?))
            }),
            Operator::Max => children.iter().try_fold(f64::NEG_INFINITY, |acc, child| {
                Ok(acc.max(self.evaluate_on_stack(*child, point, stack)?))
            }),
            Operator::Threshold { dist_min, dist_max } => {
                let [input, near, far] = children else {
                    return Err(SizingError::invalid_parameter(
                        "threshold needs input, near and far children",
                    ));
                };
                let distance = self.evaluate_on_stack(*input, point, stack)?;
                if distance <= dist_min {
                    self.evaluate_on_stack(*near, point, stack)
                } else if distance >= dist_max {
                    self.evaluate_on_stack(*far, point, stack)
                } else {
                    let t = (distance - dist_min) / (dist_max - dist_min);
                    let near_size = self.evaluate_on_stack(*near, point, stack)?;
                    let far_size = self.evaluate_on_stack(*far, point, stack)?;
                    Ok(near_size + (far_size - near_size) * t)
                }
            }
        }
    }
}
