use crate::math::{Isometry, Real};
use crate::partitioning::Pruning;
use crate::query::{Ray, RayCast, RayHit};
use crate::scene::{NodeId, NodeKind, Scene};
use ordered_float::OrderedFloat;
use smallvec::SmallVec;

/// The closest hit of a ray with the meshes of a scene.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SceneHit {
    /// The hit mesh node.
    pub node: NodeId,
    /// The hit, in world space.
    pub hit: RayHit,
}

/// Where a ray stands relative to one bounding volume.
#[derive(Copy, Clone, Debug, PartialEq)]
enum BoundsDistance {
    /// The ray origin is inside the volume.
    Contained,
    /// The ray enters the volume at this distance.
    Entry(Real),
    /// The ray misses the volume.
    Missed,
}

impl BoundsDistance {
    fn new(toi: Option<Real>) -> Self {
        match toi {
            Some(toi) if toi <= 0.0 => BoundsDistance::Contained,
            Some(toi) => BoundsDistance::Entry(toi),
            None => BoundsDistance::Missed,
        }
    }

    fn value(self) -> Option<Real> {
        match self {
            BoundsDistance::Contained => Some(0.0),
            BoundsDistance::Entry(toi) => Some(toi),
            BoundsDistance::Missed => None,
        }
    }

    /// Combines the distances to two volumes enclosing the same content into one lower
    /// bound of the distance to that content.
    fn combine(self, other: Self) -> Option<Real> {
        match (self, other) {
            (BoundsDistance::Missed, other) | (other, BoundsDistance::Missed) => other.value(),
            (BoundsDistance::Contained, other) | (other, BoundsDistance::Contained) => {
                other.value()
            }
            (BoundsDistance::Entry(a), BoundsDistance::Entry(b)) => Some(a.max(b)),
        }
    }
}

impl Scene {
    /// A lower bound of the distance from the ray origin to any content of `id`.
    ///
    /// Both the bounding box and the bounding sphere of the node are cast: the bound is 0 if
    /// the ray starts inside both, and the farthest entry distance otherwise. Returns `None`
    /// if the ray misses both volumes, or if the node has no bounds.
    pub fn distance_to_bounds(&self, id: NodeId, ray: &Ray) -> Option<Real> {
        let bounds = self.bounds(id)?;
        let to_aabb = BoundsDistance::new(bounds.aabb.cast_local_ray(ray, Real::MAX, true));
        let to_sphere = BoundsDistance::new(bounds.sphere.cast_local_ray(ray, Real::MAX, true));
        to_aabb.combine(to_sphere)
    }

    /// The children of `group` that may be hit by the ray, with their distance lower bound,
    /// in the order they are visited by a ray cast.
    ///
    /// Children are sorted by increasing lower bound. Ties keep the insertion order of the
    /// children. Empty nodes and children without bounds are left out.
    pub fn ordered_children(&self, group: NodeId, ray: &Ray) -> Vec<(NodeId, Real)> {
        let Some(node) = self.get(group) else {
            return Vec::new();
        };

        let mut candidates: Vec<_> = node
            .children()
            .iter()
            .filter(|child| self.get(**child).is_some_and(|child| child.has_bounds()))
            .filter_map(|child| Some((*child, self.distance_to_bounds(*child, ray)?)))
            .collect();

        candidates.sort_by_key(|(_, bound)| OrderedFloat(*bound));
        candidates
    }

    /// Finds the closest mesh hit by a world-space ray in the subtree rooted at `id`.
    ///
    /// Only hits strictly closer than `max_distance` are reported.
    pub fn cast_ray_first(&self, id: NodeId, ray: &Ray, max_distance: Real) -> Option<SceneHit> {
        self.cast_ray_first_with(id, ray, max_distance, Pruning::default())
    }

    /// Finds the closest mesh hit by a world-space ray in the subtree rooted at `id`, with
    /// the given pruning of the scene and mesh traversals.
    pub fn cast_ray_first_with(
        &self,
        id: NodeId,
        ray: &Ray,
        max_distance: Real,
        pruning: Pruning,
    ) -> Option<SceneHit> {
        self.cast_ray_first_impl(id, ray, max_distance, pruning, None)
    }

    /// Same as [`Self::cast_ray_first_with`], also returning the meshes tested, in the order
    /// they were tested.
    pub fn cast_ray_first_traced(
        &self,
        id: NodeId,
        ray: &Ray,
        max_distance: Real,
        pruning: Pruning,
    ) -> (Option<SceneHit>, Vec<NodeId>) {
        let mut tested = Vec::new();
        let hit = self.cast_ray_first_impl(id, ray, max_distance, pruning, Some(&mut tested));
        (hit, tested)
    }

    fn cast_ray_first_impl(
        &self,
        id: NodeId,
        ray: &Ray,
        max_distance: Real,
        pruning: Pruning,
        mut tested: Option<&mut Vec<NodeId>>,
    ) -> Option<SceneHit> {
        let pos = self.world_transform(id)?;

        let mut best_distance = max_distance;
        let mut best_hit = None;
        let mut stack: SmallVec<[(Real, NodeId, Isometry<Real>); 32]> = SmallVec::new();
        let mut visited_nodes = 0usize;
        stack.push((Real::NEG_INFINITY, id, pos));

        while let Some((bound, id, pos)) = stack.pop() {
            if pruning.skips(bound, best_distance) {
                continue;
            }

            let Some(node) = self.get(id) else {
                continue;
            };
            visited_nodes += 1;

            match node.kind() {
                NodeKind::Mesh(mesh) => {
                    if let Some(tested) = tested.as_deref_mut() {
                        tested.push(id);
                    }

                    if let Some(hit) = mesh.cast_ray_first(&pos, ray, best_distance, pruning) {
                        if hit.distance < best_distance {
                            best_distance = hit.distance;
                            best_hit = Some(SceneHit { node: id, hit });
                        }
                    }
                }
                NodeKind::Group => {
                    let candidates = self.ordered_children(id, ray);
                    stack.extend(candidates.into_iter().rev().filter_map(|(child, bound)| {
                        let child_pos = pos * self.get(child)?.local_transform();
                        Some((bound, child, child_pos))
                    }));
                }
                NodeKind::Empty => {}
            }
        }

        log::trace!(
            "scene ray cast: {} nodes visited, hit: {:?}",
            visited_nodes,
            best_hit.map(|hit| hit.node)
        );

        best_hit
    }
}
