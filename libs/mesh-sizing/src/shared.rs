//! # Shared Session
//!
//! Reader-writer wrapper for sessions that must accept mutations while
//! queries are in flight. Queries take the read lock; registry, background
//! and option changes take the write lock.
//!
//! A plain [`SizingSession`] is enough when all setup happens before
//! meshing starts.

use std::sync::{Arc, RwLock};

use glam::DVec3;

use crate::error::{SizingError, SizingResult};
use crate::query::SizeConstraint;
use crate::session::SizingSession;

/// Cloneable handle to a session guarded by a reader-writer lock.
///
/// # Example
///
/// ```rust
/// use mesh_sizing::{Field, SharedSession, SizingSession};
/// use glam::DVec3;
///
/// let shared = SharedSession::new(SizingSession::new());
/// let id = shared
///     .write(|session| session.add_field(Field::constant(0.2).unwrap()))
///     .unwrap()
///     .unwrap();
/// shared.write(|session| session.set_background(id)).unwrap().unwrap();
/// assert_eq!(shared.query_size(DVec3::ZERO, &[]).unwrap(), 0.2);
/// ```
#[derive(Debug, Clone, Default)]
pub struct SharedSession {
    inner: Arc<RwLock<SizingSession>>,
}

impl SharedSession {
    /// Wraps a session.
    pub fn new(session: SizingSession) -> Self {
        Self {
            inner: Arc::new(RwLock::new(session)),
        }
    }

    /// Runs `f` under the read lock.
    pub fn read<R>(&self, f: impl FnOnce(&SizingSession) -> R) -> SizingResult<R> {
        let guard = self.inner.read().map_err(|_| SizingError::LockPoisoned)?;
        Ok(f(&guard))
    }

    /// Runs `f` under the write lock.
    pub fn write<R>(&self, f: impl FnOnce(&mut SizingSession) -> R) -> SizingResult<R> {
        let mut guard = self.inner.write().map_err(|_| SizingError::LockPoisoned)?;
        Ok(f(&mut guard))
    }

    /// Size query under the read lock.
    pub fn query_size(&self, point: DVec3, constraints: &[SizeConstraint]) -> SizingResult<f64> {
        self.read(|session| session.query_size(point, constraints))?
    }
}
