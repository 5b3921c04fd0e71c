//! Per-generation edge midpoint bookkeeping.

use std::collections::hash_map::{Entry, HashMap};

use crate::mesh::{EdgeKey, MeshIndex, PointId};

/// Maps each edge split during the current generation to the point created
/// for it.
///
/// Both cells on either side of an edge resolve the same entry, which is what
/// keeps the refined mesh free of T-junctions. The registry only lives for
/// one generation and is cleared before the next one starts.
#[derive(Debug, Clone)]
pub struct MidpointRegistry<I: MeshIndex = u32> {
    midpoints: HashMap<EdgeKey<I>, PointId<I>>,
}

impl<I: MeshIndex> Default for MidpointRegistry<I> {
    fn default() -> Self {
        Self::new()
    }
}

impl<I: MeshIndex> MidpointRegistry<I> {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            midpoints: HashMap::new(),
        }
    }

    /// Create an empty registry sized for `edges` entries.
    pub fn with_capacity(edges: usize) -> Self {
        Self {
            midpoints: HashMap::with_capacity(edges),
        }
    }

    /// Forget every registered midpoint.
    pub fn clear(&mut self) {
        self.midpoints.clear();
    }

    /// The point registered for `key`, if the edge has been split.
    #[inline]
    pub fn lookup(&self, key: EdgeKey<I>) -> Option<PointId<I>> {
        self.midpoints.get(&key).copied()
    }

    /// Whether the edge has been split.
    #[inline]
    pub fn contains(&self, key: EdgeKey<I>) -> bool {
        self.midpoints.contains_key(&key)
    }

    /// Register `point` as the midpoint of `key`.
    ///
    /// If the edge already has a midpoint, the existing one is returned and
    /// `point` is ignored, so callers can register from either side of an
    /// edge in any order.
    pub fn register(&mut self, key: EdgeKey<I>, point: PointId<I>) -> PointId<I> {
        *self.midpoints.entry(key).or_insert(point)
    }

    /// Return the midpoint of `key`, calling `create` to make one only when
    /// the edge has none yet.
    pub fn get_or_insert_with<F>(&mut self, key: EdgeKey<I>, create: F) -> PointId<I>
    where
        F: FnOnce() -> PointId<I>,
    {
        match self.midpoints.entry(key) {
            Entry::Occupied(e) => *e.get(),
            Entry::Vacant(e) => *e.insert(create()),
        }
    }

    /// Number of split edges.
    #[inline]
    pub fn len(&self) -> usize {
        self.midpoints.len()
    }

    /// Whether no edge has been split.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.midpoints.is_empty()
    }
}
