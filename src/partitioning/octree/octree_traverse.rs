use super::{IndexRangeSet, OctreeNode, SpatialOctree};
use crate::bounding_volume::Aabb;
use crate::math::Real;
use crate::query::{Ray, RayCast, RayHit};
use arrayvec::ArrayVec;
use ordered_float::OrderedFloat;
use smallvec::SmallVec;

/// Controls whether nearest-hit traversals skip candidates that cannot beat the best hit.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum Pruning {
    /// Candidates are visited nearest-first and skipped as soon as their lower-bound distance
    /// reaches the best hit found so far.
    #[default]
    BranchAndBound,
    /// Every candidate hit by the ray is visited. Only useful to check the results of the
    /// pruned traversal.
    Disabled,
}

impl Pruning {
    /// Should a candidate with the lower-bound distance `bound` be skipped, given the best
    /// hit distance found so far?
    #[inline]
    pub fn skips(self, bound: Real, best: Real) -> bool {
        self == Pruning::BranchAndBound && bound >= best
    }
}

/// Iterator through the leaves of an octree, in depth-first order.
pub struct Leaves<'a> {
    stack: SmallVec<[&'a OctreeNode; 32]>,
}

impl<'a> Leaves<'a> {
    pub(crate) fn new(root: &'a OctreeNode) -> Self {
        let mut stack = SmallVec::new();
        stack.push(root);
        Self { stack }
    }
}

impl<'a> Iterator for Leaves<'a> {
    type Item = (&'a Aabb, &'a IndexRangeSet);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(node) = self.stack.pop() {
            match node {
                OctreeNode::Leaf { aabb, indices } => return Some((aabb, indices)),
                // Reversed so children come out in their storage order.
                OctreeNode::Internal { children, .. } => self.stack.extend(children.iter().rev()),
            }
        }

        None
    }
}

impl SpatialOctree {
    /// Finds the closest triangle hit along a ray.
    ///
    /// The ray must be expressed in the local space of the octree. Children are ordered by
    /// the distance at which the ray enters their box (zero if the ray starts inside it) and
    /// visited nearest-first. The entry distance is a lower bound of the distance of any hit
    /// inside a box, so with [`Pruning::BranchAndBound`] a box is skipped as soon as its entry
    /// distance reaches the best hit found so far.
    ///
    /// The `leaf_check` closure is given a triangle offset and the current best distance, and
    /// returns the hit with that triangle, if any. Only hits strictly closer than the best
    /// distance so far are kept. Returns `None` if no hit closer than `max_distance` exists.
    pub fn cast_ray(
        &self,
        ray: &Ray,
        max_distance: Real,
        pruning: Pruning,
        mut leaf_check: impl FnMut(u32, Real) -> Option<RayHit>,
    ) -> Option<RayHit> {
        let root_entry = self.root.aabb().cast_local_ray(ray, max_distance, true)?;

        let mut best_distance = max_distance;
        let mut best_hit = None;
        let mut stack: SmallVec<[(Real, &OctreeNode); 32]> = SmallVec::new();
        let mut visited_nodes = 0usize;
        let mut tested_triangles = 0usize;
        stack.push((root_entry, &self.root));

        while let Some((entry, node)) = stack.pop() {
            if pruning.skips(entry, best_distance) {
                continue;
            }

            visited_nodes += 1;

            match node {
                OctreeNode::Leaf { indices, .. } => {
                    for offset in indices.iter() {
                        tested_triangles += 1;
                        if let Some(hit) = leaf_check(offset, best_distance) {
                            if hit.distance < best_distance {
                                best_distance = hit.distance;
                                best_hit = Some(hit);
                            }
                        }
                    }
                }
                OctreeNode::Internal { children, .. } => {
                    let mut candidates: ArrayVec<(Real, &OctreeNode), 8> = children
                        .iter()
                        .filter_map(|child| {
                            child
                                .aabb()
                                .cast_local_ray(ray, Real::MAX, true)
                                .map(|entry| (entry, child))
                        })
                        .collect();

                    // Stable sort: ties keep the storage order of the children.
                    candidates.sort_by_key(|(entry, _)| OrderedFloat(*entry));
                    stack.extend(candidates.into_iter().rev());
                }
            }
        }

        log::trace!(
            "octree ray cast: {} nodes visited, {} triangles tested, hit: {}",
            visited_nodes,
            tested_triangles,
            best_hit.is_some()
        );

        best_hit
    }
}
