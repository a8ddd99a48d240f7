//! # Size Query Facade
//!
//! The entry point a mesh generator calls at every candidate point.
//!
//! ## Resolution
//!
//! ```text
//! no background          → min(external constraints) or default size
//! background, all flags  → background value
//! background otherwise   → min(background, non-disregarded constraints)
//! ```
//!
//! The result is then scaled and clamped by the session's
//! [`SizeOptions`](crate::SizeOptions).

use glam::DVec3;
use rayon::prelude::*;

use crate::background::ConstraintSource;
use crate::error::{check_size, SizingError, SizingResult};
use crate::session::SizingSession;

/// A size estimate computed by one of the mesh generator's own rules.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SizeConstraint {
    /// Rule that produced the estimate.
    pub source: ConstraintSource,
    /// Estimated size.
    pub size: f64,
}

impl SizeConstraint {
    /// Creates a constraint.
    pub fn new(source: ConstraintSource, size: f64) -> Self {
        Self { source, size }
    }
}

/// One query of a batch.
#[derive(Debug, Clone, PartialEq)]
pub struct SizeQuery {
    /// Query point.
    pub point: DVec3,
    /// External constraints at the point.
    pub constraints: Vec<SizeConstraint>,
}

impl SizeQuery {
    /// Query without external constraints.
    pub fn at(point: DVec3) -> Self {
        Self {
            point,
            constraints: Vec::new(),
        }
    }
}

impl SizingSession {
    /// Target size at `point`.
    ///
    /// Side-effect free; safe to call concurrently from several threads.
    /// Fails with [`SizingError::NoConstraint`] when there is no background
    /// field, no constraint and no default size, with
    /// [`SizingError::InvalidValue`] for a non-positive constraint or
    /// resolved size, and with any error raised by evaluating the
    /// background field.
    pub fn query_size(&self, point: DVec3, constraints: &[SizeConstraint]) -> SizingResult<f64> {
        for constraint in constraints {
            check_size(constraint.size)?;
        }

        let designation = self.designation();
        let size = match designation.field() {
            None => constraints
                .iter()
                .map(|c| c.size)
                .reduce(f64::min)
                .or(self.options().default_size)
                .ok_or(SizingError::NoConstraint)?,
            Some(id) => {
                let background = self.evaluate(id, point)?;
                let flags = designation.flags();
                if flags.all() {
                    background
                } else {
                    constraints
                        .iter()
                        .filter(|c| !flags.disregards(c.source))
                        .map(|c| c.size)
                        .fold(background, f64::min)
                }
            }
        };

        Ok(self.options().apply(check_size(size)?))
    }

    /// Answers a batch of queries in parallel, one result per query in
    /// input order.
    pub fn query_sizes(&self, queries: &[SizeQuery]) -> Vec<SizingResult<f64>> {
        queries
            .par_iter()
            .map(|query| self.query_size(query.point, &query.constraints))
            .collect()
    }
}
