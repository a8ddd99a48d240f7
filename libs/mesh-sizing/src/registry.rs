//! # Field Registry
//!
//! Owning collection of fields keyed by [`FieldId`].
//!
//! ## Invariants
//!
//! - Every combinator child is registered
//! - The child graph is acyclic
//! - A field referenced by another field cannot be removed
//!
//! Failed mutations leave the registry unchanged.
//!
//! ## Example
//!
//! ```rust
//! use mesh_sizing::{Combinator, Field, FieldRegistry, SizingError};
//!
//! let mut registry = FieldRegistry::new();
//! let a = registry.add(Field::constant(0.05).unwrap()).unwrap();
//! let b = registry.add(Field::constant(0.5).unwrap()).unwrap();
//! let min = registry.add(Combinator::min(vec![a, b]).unwrap().into()).unwrap();
//!
//! assert!(matches!(registry.remove(a), Err(SizingError::FieldInUse { .. })));
//! registry.remove(min).unwrap();
//! registry.remove(a).unwrap();
//! assert_eq!(registry.len(), 1);
//! ```

use std::collections::{BTreeMap, HashSet};

use tracing::debug;

use crate::error::{SizingError, SizingResult};
use crate::field::{Field, FieldId};

/// First identifier handed out by a fresh registry.
const FIRST_FIELD_ID: u32 = 1;

/// Registry of sizing fields.
#[derive(Debug, Clone)]
pub struct FieldRegistry {
    fields: BTreeMap<FieldId, Field>,
    next_id: u32,
}

impl Default for FieldRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self {
            fields: BTreeMap::new(),
            next_id: FIRST_FIELD_ID,
        }
    }

    /// Registers `field` under a fresh identifier.
    ///
    /// Fails with [`SizingError::MissingChild`] if a combinator child is
    /// not registered, or [`SizingError::IdentifiersExhausted`] once the
    /// counter has passed `u32::MAX` (for example after
    /// [`add_with_id`](Self::add_with_id) took the last identifier).
    pub fn add(&mut self, field: Field) -> SizingResult<FieldId> {
        let id = FieldId::new(self.next_id);
        let next_id = self
            .next_id
            .checked_add(1)
            .ok_or(SizingError::IdentifiersExhausted)?;
        self.validate_children(id, &field)?;

        debug!(field = %id, kind = field.kind(), "field added");
        self.fields.insert(id, field);
        self.next_id = next_id;
        Ok(id)
    }

    /// Registers `field` under a caller-chosen identifier.
    ///
    /// Fails with [`SizingError::DuplicateField`] if `id` is taken. Later
    /// [`add`](Self::add) calls continue above the highest identifier seen.
    pub fn add_with_id(&mut self, id: FieldId, field: Field) -> SizingResult<FieldId> {
        if self.fields.contains_key(&id) {
            return Err(SizingError::DuplicateField(id));
        }
        self.validate_children(id, &field)?;

        debug!(field = %id, kind = field.kind(), "field added with explicit id");
        self.fields.insert(id, field);
        self.next_id = self.next_id.max(id.get().saturating_add(1));
        Ok(id)
    }

    /// Redefines an existing field.
    ///
    /// Fails with [`SizingError::NotFound`], [`SizingError::MissingChild`]
    /// or [`SizingError::CycleDetected`]; on failure the previous
    /// definition stays in place.
    pub fn replace(&mut self, id: FieldId, field: Field) -> SizingResult<Field> {
        if !self.fields.contains_key(&id) {
            return Err(SizingError::NotFound(id));
        }
        self.validate_children(id, &field)?;

        debug!(field = %id, kind = field.kind(), "field replaced");
        self.fields
            .insert(id, field)
            .ok_or(SizingError::NotFound(id))
    }

    /// Removes a field and releases its sample store.
    ///
    /// Fails with [`SizingError::NotFound`] if absent, or
    /// [`SizingError::FieldInUse`] if another field references it.
    pub fn remove(&mut self, id: FieldId) -> SizingResult<Field> {
        if !self.fields.contains_key(&id) {
            return Err(SizingError::NotFound(id));
        }
        if let Some(referenced_by) = self.referrer(id) {
            return Err(SizingError::FieldInUse {
                field: id,
                referenced_by,
            });
        }

        debug!(field = %id, "field removed");
        self.fields.remove(&id).ok_or(SizingError::NotFound(id))
    }

    /// Looks up a field.
    pub fn get(&self, id: FieldId) -> SizingResult<&Field> {
        self.fields.get(&id).ok_or(SizingError::NotFound(id))
    }

    /// Returns true if `id` is registered.
    #[inline]
    pub fn contains(&self, id: FieldId) -> bool {
        self.fields.contains_key(&id)
    }

    /// Number of registered fields.
    #[inline]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns true if no field is registered.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Registered identifiers in ascending order.
    pub fn ids(&self) -> impl Iterator<Item = FieldId> + '_ {
        self.fields.keys().copied()
    }

    /// Registered fields in ascending identifier order.
    pub fn iter(&self) -> impl Iterator<Item = (FieldId, &Field)> {
        self.fields.iter().map(|(id, field)| (*id, field))
    }

    /// Inserts without validation, for exercising evaluation guards.
    #[cfg(test)]
    pub(crate) fn insert_unchecked(&mut self, id: FieldId, field: Field) {
        self.fields.insert(id, field);
    }

    /// First field (lowest identifier) listing `id` as a child.
    fn referrer(&self, id: FieldId) -> Option<FieldId> {
        self.fields
            .iter()
            .find(|(owner, field)| **owner != id && field.children().contains(&id))
            .map(|(owner, _)| *owner)
    }

    /// Checks that `field`, stored under `id`, references only registered
    /// fields and cannot reach `id` again.
    fn validate_children(&self, id: FieldId, field: &Field) -> SizingResult<()> {
        let children = field.children();
        if children.contains(&id) {
            return Err(SizingError::CycleDetected(id));
        }
        if let Some(child) = children.iter().find(|c| !self.fields.contains_key(*c)) {
            return Err(SizingError::MissingChild { child: *child });
        }

        let mut visited: HashSet<FieldId> = HashSet::new();
        let mut pending: Vec<FieldId> = children.to_vec();
        while let Some(current) = pending.pop() {
            if current == id {
                return Err(SizingError::CycleDetected(id));
            }
            if !visited.insert(current) {
                continue;
            }
            if let Some(field) = self.fields.get(&current) {
                pending.extend_from_slice(field.children());
            }
        }
        Ok(())
    }
}
