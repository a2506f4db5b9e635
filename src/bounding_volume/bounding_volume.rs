use crate::math::{Point, Real};

/// Volumes enclosing some content, used to discard it cheaply before exact tests.
///
/// Both [`Aabb`](crate::bounding_volume::Aabb) and
/// [`BoundingSphere`](crate::bounding_volume::BoundingSphere) implement it.
pub trait BoundingVolume {
    /// A point inside of this volume, ideally its center.
    fn center(&self) -> Point<Real>;

    /// Do this volume and `other` overlap? Touching counts as overlapping.
    fn intersects(&self, other: &Self) -> bool;

    /// Is `other` entirely inside this volume?
    fn contains(&self, other: &Self) -> bool;

    /// Grows this volume in-place so that it also encloses `other`.
    fn merge(&mut self, other: &Self);

    /// The smallest volume of this kind enclosing both `self` and `other`.
    fn merged(&self, other: &Self) -> Self;
}
