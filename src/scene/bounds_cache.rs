use crate::bounding_volume::{Aabb, BoundingSphere, BoundingVolume};
use core::cell::Cell;

/// The world-space bounding volumes of a scene node.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct NodeBounds {
    /// The bounding box.
    pub aabb: Aabb,
    /// The bounding sphere. It encloses the node content but is not necessarily minimal.
    pub sphere: BoundingSphere,
}

impl NodeBounds {
    /// Merges the bounds of several nodes.
    ///
    /// Returns `None` if `bounds` is empty.
    pub fn merge_all(bounds: impl IntoIterator<Item = NodeBounds>) -> Option<NodeBounds> {
        bounds.into_iter().reduce(|acc, b| NodeBounds {
            aabb: acc.aabb.merged(&b.aabb),
            sphere: acc.sphere.merged(&b.sphere),
        })
    }
}

/// The state of the cached bounds of a scene node.
#[derive(Copy, Clone, Debug, PartialEq, Default)]
pub enum BoundsState {
    /// The bounds were never computed, or were invalidated since.
    #[default]
    Stale,
    /// The node has no content to bound.
    Unbounded,
    /// The node content is enclosed by these bounds.
    Bounded(NodeBounds),
}

impl BoundsState {
    /// The bounds, if they are computed and the node has content.
    #[inline]
    pub fn bounds(self) -> Option<NodeBounds> {
        match self {
            BoundsState::Bounded(bounds) => Some(bounds),
            BoundsState::Stale | BoundsState::Unbounded => None,
        }
    }

    /// `Bounded` if `bounds` is set, `Unbounded` otherwise.
    #[inline]
    pub fn from_bounds(bounds: Option<NodeBounds>) -> Self {
        bounds.map_or(BoundsState::Unbounded, BoundsState::Bounded)
    }
}

/// Lazily computed bounds, updatable through a shared reference.
#[derive(Debug, Default)]
pub struct BoundsCache(Cell<BoundsState>);

impl BoundsCache {
    /// The current state.
    #[inline]
    pub fn get(&self) -> BoundsState {
        self.0.get()
    }

    /// Are the bounds in need of a recomputation?
    #[inline]
    pub fn is_stale(&self) -> bool {
        self.get() == BoundsState::Stale
    }

    #[inline]
    pub(crate) fn set(&self, state: BoundsState) {
        self.0.set(state)
    }

    /// Marks the bounds as stale.
    #[inline]
    pub fn invalidate(&self) {
        self.0.set(BoundsState::Stale)
    }
}

impl Clone for BoundsCache {
    fn clone(&self) -> Self {
        BoundsCache(Cell::new(self.get()))
    }
}
