//! `Registry<T>` — id-keyed entity storage with deterministic iteration.
//!
//! # Layout
//!
//! Entities live in a `Vec<Option<T>>` in insertion order; an `FxHashMap`
//! maps each id to its slot.  Removal leaves a tombstone so the order of the
//! survivors never changes, and the slot vector is compacted once tombstones
//! outnumber live entries.
//!
//! Iteration never touches the hash map.  Enumeration order depends only on
//! the sequence of `add`/`remove` calls, which keeps runs reproducible.
//!
//! # Updated set
//!
//! `mark_updated` records ids whose state changed during the current step so
//! a later batch step (car ownership) can process just those.  The set keeps
//! first-marked order and ignores repeats.

use std::fmt::{Debug, Display};
use std::hash::Hash;

use rustc_hash::{FxHashMap, FxHashSet};

use crate::{DataError, DataResult};

/// Tombstone count below which compaction is never attempted.
const COMPACT_MIN_TOMBSTONES: usize = 64;

/// An entity that carries its own id.
pub trait Keyed {
    type Id: Copy + Eq + Hash + Ord + Display + Debug + From<u32> + Into<u32>;

    fn id(&self) -> Self::Id;
}

/// Insertion-ordered store of `T` keyed by `T::Id`.
#[derive(Debug)]
pub struct Registry<T: Keyed> {
    slots:       Vec<Option<T>>,
    index:       FxHashMap<T::Id, usize>,
    max_id:      Option<u32>,
    updated:     Vec<T::Id>,
    updated_set: FxHashSet<T::Id>,
}

impl<T: Keyed> Default for Registry<T> {
    fn default() -> Self {
        Self {
            slots:       Vec::new(),
            index:       FxHashMap::default(),
            max_id:      None,
            updated:     Vec::new(),
            updated_set: FxHashSet::default(),
        }
    }
}

impl<T: Keyed> Registry<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live entities.
    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    pub fn contains(&self, id: T::Id) -> bool {
        self.index.contains_key(&id)
    }

    // ── Lookup ────────────────────────────────────────────────────────────

    /// Fail-fast lookup.
    pub fn get(&self, id: T::Id) -> DataResult<&T> {
        self.try_get(id).ok_or_else(|| DataError::NotFound(id.to_string()))
    }

    pub fn get_mut(&mut self, id: T::Id) -> DataResult<&mut T> {
        let slot = *self.index.get(&id).ok_or_else(|| DataError::NotFound(id.to_string()))?;
        self.slots[slot]
            .as_mut()
            .ok_or_else(|| DataError::NotFound(id.to_string()))
    }

    /// Lookup for call sites where absence is expected.
    pub fn try_get(&self, id: T::Id) -> Option<&T> {
        self.index.get(&id).and_then(|&slot| self.slots[slot].as_ref())
    }

    // ── Mutation ──────────────────────────────────────────────────────────

    /// Insert a new entity.  Fails if its id is already present.
    pub fn add(&mut self, entity: T) -> DataResult<()> {
        let id = entity.id();
        if self.index.contains_key(&id) {
            return Err(DataError::DuplicateId(id.to_string()));
        }
        let raw: u32 = id.into();
        self.max_id = Some(self.max_id.map_or(raw, |m| m.max(raw)));
        self.index.insert(id, self.slots.len());
        self.slots.push(Some(entity));
        Ok(())
    }

    /// Remove and return an entity.  Fails if the id is unknown.
    pub fn remove(&mut self, id: T::Id) -> DataResult<T> {
        let slot = self
            .index
            .remove(&id)
            .ok_or_else(|| DataError::NotFound(id.to_string()))?;
        let entity = self.slots[slot]
            .take()
            .ok_or_else(|| DataError::NotFound(id.to_string()))?;
        if self.updated_set.remove(&id) {
            self.updated.retain(|u| *u != id);
        }
        self.maybe_compact();
        Ok(entity)
    }

    /// The smallest id greater than every id ever inserted.
    pub fn next_id(&self) -> T::Id {
        T::Id::from(self.max_id.map_or(1, |m| m + 1))
    }

    // ── Enumeration ───────────────────────────────────────────────────────

    /// Live entities in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &T> + '_ {
        self.slots.iter().filter_map(Option::as_ref)
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut T> + '_ {
        self.slots.iter_mut().filter_map(Option::as_mut)
    }

    /// Live ids in insertion order.
    pub fn ids(&self) -> Vec<T::Id> {
        self.iter().map(Keyed::id).collect()
    }

    // ── Updated set ───────────────────────────────────────────────────────

    /// Record that `id` changed in the current step.
    pub fn mark_updated(&mut self, id: T::Id) -> DataResult<()> {
        if !self.contains(id) {
            return Err(DataError::NotFound(id.to_string()));
        }
        if self.updated_set.insert(id) {
            self.updated.push(id);
        }
        Ok(())
    }

    /// Ids marked since the last clear, in first-marked order.
    pub fn updated(&self) -> &[T::Id] {
        &self.updated
    }

    pub fn clear_updated(&mut self) {
        self.updated.clear();
        self.updated_set.clear();
    }

    /// Return the updated ids and clear the set in one step.
    pub fn take_updated(&mut self) -> Vec<T::Id> {
        self.updated_set.clear();
        std::mem::take(&mut self.updated)
    }

    // ── Internals ─────────────────────────────────────────────────────────

    fn maybe_compact(&mut self) {
        let tombstones = self.slots.len() - self.index.len();
        if tombstones < COMPACT_MIN_TOMBSTONES || tombstones <= self.index.len() {
            return;
        }
        self.slots.retain(Option::is_some);
        for (slot, entity) in self.slots.iter().enumerate() {
            if let Some(e) = entity {
                self.index.insert(e.id(), slot);
            }
        }
    }
}
