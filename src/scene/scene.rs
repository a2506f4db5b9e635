use super::{BoundsState, NodeBounds, NodeKind, SceneNode};
use crate::bounding_volume::{Aabb, BoundingSphere};
use crate::math::{Isometry, Real};
use crate::partitioning::{
    OctreeBuildError, OctreeBuildOptions, OctreeRepr, OctreeReprError, SpatialOctree,
};
use crate::shape::{HasBounds, HasOctree, Mesh, MeshGeometry};
use slab::Slab;
use smallvec::SmallVec;

/// The handle of a node inserted into a [`Scene`].
///
/// Removed nodes free their slot for later insertions. The handle carries the generation of
/// its slot, so a handle kept after its node was removed never designates the new occupant.
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId {
    index: usize,
    generation: u32,
}

impl NodeId {
    /// The index of the slot of this handle.
    #[inline]
    pub fn index(self) -> usize {
        self.index
    }

    /// How many nodes occupied the slot of this handle before its node.
    #[inline]
    pub fn generation(self) -> u32 {
        self.generation
    }
}

/// Error raised by an invalid scene operation. The scene is left unchanged.
#[derive(thiserror::Error, Clone, Debug, PartialEq)]
pub enum SceneError {
    /// The node does not exist in the scene.
    #[error("the node {0:?} does not exist.")]
    UnknownNode(NodeId),
    /// The node cannot have children.
    #[error("the node {0:?} is not a group.")]
    NotAGroup(NodeId),
    /// The node is not a mesh.
    #[error("the node {0:?} is not a mesh.")]
    NotAMesh(NodeId),
    /// The child is the parent itself or one of its ancestors.
    #[error("adding {child:?} to {parent:?} would create a cycle.")]
    Cycle {
        /// The would-be parent.
        parent: NodeId,
        /// The would-be child.
        child: NodeId,
    },
    /// The node is not a child of the given parent.
    #[error("the node {child:?} is not a child of {parent:?}.")]
    NotAChild {
        /// The supposed parent.
        parent: NodeId,
        /// The supposed child.
        child: NodeId,
    },
    /// The octree of a mesh could not be built.
    #[error(transparent)]
    Build(#[from] OctreeBuildError),
    /// A persisted octree could not be attached to a mesh.
    #[error(transparent)]
    Repr(#[from] OctreeReprError),
}

/// The outcome of [`Scene::build_octrees_for_subtree`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SubtreeBuildReport {
    /// The meshes whose octree was built.
    pub built: Vec<NodeId>,
    /// The meshes that already had an octree.
    pub skipped: Vec<NodeId>,
    /// The meshes whose octree could not be built, with the reason.
    pub failed: Vec<(NodeId, OctreeBuildError)>,
}

/// A hierarchy of groups and meshes.
///
/// Nodes are stored in an arena and addressed by [`NodeId`]. Each node has at most one
/// parent, and only groups accept children. The world-space bounds of each node are cached,
/// and invalidated by the edits that can change them.
///
/// The bounds cache relies on interior mutability so queries only need a shared reference,
/// hence a scene cannot be shared between threads.
#[derive(Clone, Debug, Default)]
pub struct Scene {
    nodes: Slab<SceneNode>,
    generations: Vec<u32>,
}

impl Scene {
    /// An empty scene.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a detached node.
    pub fn insert(&mut self, node: SceneNode) -> NodeId {
        let index = self.nodes.insert(node);
        if index == self.generations.len() {
            self.generations.push(0);
        }

        NodeId {
            index,
            generation: self.generations[index],
        }
    }

    /// The number of nodes of this scene.
    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Is this scene empty?
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Does this scene contain the node `id`?
    #[inline]
    pub fn contains(&self, id: NodeId) -> bool {
        self.generations.get(id.index) == Some(&id.generation) && self.nodes.contains(id.index)
    }

    /// The node `id`.
    #[inline]
    pub fn get(&self, id: NodeId) -> Option<&SceneNode> {
        if self.contains(id) {
            self.nodes.get(id.index)
        } else {
            None
        }
    }

    fn node(&self, id: NodeId) -> Result<&SceneNode, SceneError> {
        self.get(id).ok_or(SceneError::UnknownNode(id))
    }

    fn node_mut(&mut self, id: NodeId) -> Result<&mut SceneNode, SceneError> {
        if !self.contains(id) {
            return Err(SceneError::UnknownNode(id));
        }
        self.nodes
            .get_mut(id.index)
            .ok_or(SceneError::UnknownNode(id))
    }

    fn mesh_mut(&mut self, id: NodeId) -> Result<&mut Mesh, SceneError> {
        let node = self.node_mut(id)?;

        match node.kind_mut() {
            NodeKind::Mesh(mesh) => Ok(mesh),
            NodeKind::Group | NodeKind::Empty => Err(SceneError::NotAMesh(id)),
        }
    }

    /// The mesh of the node `id`, if it is a mesh.
    #[inline]
    pub fn mesh(&self, id: NodeId) -> Option<&Mesh> {
        self.get(id)?.as_mesh()
    }

    /// Attaches `child` to the group `parent`, after its existing children.
    ///
    /// If `child` already has a parent, it is detached from it first.
    pub fn add_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), SceneError> {
        if !self.node(parent)?.is_group() {
            return Err(SceneError::NotAGroup(parent));
        }
        let _ = self.node(child)?;

        let mut ancestor = Some(parent);
        while let Some(id) = ancestor {
            if id == child {
                return Err(SceneError::Cycle { parent, child });
            }
            ancestor = self.nodes[id.index].parent;
        }

        self.detach(child);
        self.nodes[child.index].parent = Some(parent);
        self.nodes[parent.index].children.push(child);
        self.invalidate_ancestors(parent);
        self.invalidate_subtree(child);
        Ok(())
    }

    /// Detaches `child` from `parent`.
    pub fn remove_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), SceneError> {
        let _ = self.node(parent)?;
        if self.node(child)?.parent != Some(parent) {
            return Err(SceneError::NotAChild { parent, child });
        }

        self.detach(child);
        Ok(())
    }

    /// Detaches all the children of `parent`.
    pub fn clear_children(&mut self, parent: NodeId) -> Result<(), SceneError> {
        let node = self.node_mut(parent)?;
        let children = core::mem::take(&mut node.children);

        for child in children {
            self.nodes[child.index].parent = None;
            self.invalidate_subtree(child);
        }

        self.invalidate_ancestors(parent);
        Ok(())
    }

    /// Removes `id` and all its descendants from the scene.
    ///
    /// Returns the number of removed nodes.
    pub fn remove_subtree(&mut self, id: NodeId) -> Result<usize, SceneError> {
        let _ = self.node(id)?;
        self.detach(id);

        let mut stack: SmallVec<[NodeId; 32]> = SmallVec::new();
        let mut removed = 0;
        stack.push(id);

        while let Some(id) = stack.pop() {
            let node = self.nodes.remove(id.index);
            self.generations[id.index] = self.generations[id.index].wrapping_add(1);
            stack.extend(node.children);
            removed += 1;
        }

        Ok(removed)
    }

    /// Sets the position of `id` relative to its parent.
    pub fn set_local_transform(
        &mut self,
        id: NodeId,
        local_transform: Isometry<Real>,
    ) -> Result<(), SceneError> {
        self.node_mut(id)?.set_local_transform(local_transform);
        self.invalidate_ancestors(id);
        self.invalidate_subtree(id);
        Ok(())
    }

    /// Replaces the geometry of the mesh `id`. Its octree is dropped.
    pub fn set_mesh_geometry(
        &mut self,
        id: NodeId,
        geometry: MeshGeometry,
    ) -> Result<(), SceneError> {
        self.mesh_mut(id)?.set_geometry(geometry);
        self.invalidate_ancestors(id);
        self.invalidate_subtree(id);
        Ok(())
    }

    /// The position of `id` in world space: the composition of the local transforms from
    /// the root of its hierarchy down to `id`.
    pub fn world_transform(&self, id: NodeId) -> Option<Isometry<Real>> {
        let mut node = self.get(id)?;
        let mut pos = *node.local_transform();

        while let Some(parent) = node.parent {
            node = &self.nodes[parent.index];
            pos = node.local_transform() * pos;
        }

        Some(pos)
    }

    /// The world-space bounding box of `id`.
    ///
    /// Returns `None` if the node does not exist, has no content, or is an empty node.
    pub fn bounding_box(&self, id: NodeId) -> Option<Aabb> {
        self.bounds(id).map(|bounds| bounds.aabb)
    }

    /// A world-space bounding sphere of `id`.
    ///
    /// The sphere of a group merges the spheres of its children, so it is not minimal.
    pub fn bounding_sphere(&self, id: NodeId) -> Option<BoundingSphere> {
        self.bounds(id).map(|bounds| bounds.sphere)
    }

    /// The world-space bounds of `id`, computed if stale.
    pub fn bounds(&self, id: NodeId) -> Option<NodeBounds> {
        let node = self.get(id)?;
        if !node.bounds.is_stale() {
            return node.bounds.get().bounds();
        }

        let pos = self.world_transform(id)?;
        // Post-order: a group is revisited with `true` once all its children are computed.
        let mut stack: SmallVec<[(NodeId, Isometry<Real>, bool); 32]> = SmallVec::new();
        stack.push((id, pos, false));

        while let Some((id, pos, children_done)) = stack.pop() {
            let node = &self.nodes[id.index];
            if !node.bounds.is_stale() {
                continue;
            }

            match node.kind() {
                NodeKind::Mesh(mesh) => {
                    let bounds = mesh
                        .local_aabb()
                        .zip(mesh.local_bounding_sphere())
                        .map(|(aabb, sphere)| NodeBounds {
                            aabb: aabb.transform_by(&pos),
                            sphere: sphere.transform_by(&pos),
                        });
                    node.bounds.set(BoundsState::from_bounds(bounds));
                }
                NodeKind::Empty => node.bounds.set(BoundsState::Unbounded),
                NodeKind::Group if children_done => {
                    let bounds = NodeBounds::merge_all(node.children.iter().filter_map(|child| {
                        let child = &self.nodes[child.index];
                        if child.has_bounds() {
                            child.bounds.get().bounds()
                        } else {
                            None
                        }
                    }));
                    node.bounds.set(BoundsState::from_bounds(bounds));
                }
                NodeKind::Group => {
                    stack.push((id, pos, true));
                    for child_id in &node.children {
                        let child = &self.nodes[child_id.index];
                        if child.bounds.is_stale() {
                            stack.push((*child_id, pos * child.local_transform(), false));
                        }
                    }
                }
            }
        }

        self.nodes[id.index].bounds.get().bounds()
    }

    /// Builds the octree of the mesh `id`, replacing any existing one.
    pub fn build_octree(
        &mut self,
        id: NodeId,
        options: &OctreeBuildOptions,
    ) -> Result<&SpatialOctree, SceneError> {
        Ok(self.mesh_mut(id)?.build_octree(options)?)
    }

    /// Builds the octree of every mesh of the subtree rooted at `root` that has none.
    ///
    /// A mesh failing to build does not prevent the other meshes from being built: the
    /// failure is logged and recorded in the returned report.
    pub fn build_octrees_for_subtree(
        &mut self,
        root: NodeId,
        options: &OctreeBuildOptions,
    ) -> Result<SubtreeBuildReport, SceneError> {
        let mut meshes = Vec::new();
        let mut stack: SmallVec<[NodeId; 32]> = SmallVec::new();
        let _ = self.node(root)?;
        stack.push(root);

        while let Some(id) = stack.pop() {
            let node = &self.nodes[id.index];
            if node.as_mesh().is_some() {
                meshes.push(id);
            }
            stack.extend(node.children.iter().rev().copied());
        }

        let mut report = SubtreeBuildReport::default();

        for id in meshes {
            let mesh = self.mesh_mut(id)?;
            if mesh.octree().is_some() {
                report.skipped.push(id);
                continue;
            }

            match mesh.build_octree(options) {
                Ok(_) => report.built.push(id),
                Err(err) => {
                    log::warn!("failed to build the octree of the mesh {:?}: {}", id, err);
                    report.failed.push((id, err));
                }
            }
        }

        log::debug!(
            "built {} octrees under {:?} ({} skipped, {} failed)",
            report.built.len(),
            root,
            report.skipped.len(),
            report.failed.len()
        );

        Ok(report)
    }

    /// Attaches a persisted octree to the mesh `id`, replacing any existing one.
    pub fn attach_octree(&mut self, id: NodeId, repr: &OctreeRepr) -> Result<(), SceneError> {
        Ok(self.mesh_mut(id)?.attach_octree(repr)?)
    }

    fn detach(&mut self, child: NodeId) {
        if let Some(parent) = self.nodes[child.index].parent.take() {
            self.nodes[parent.index].children.retain(|id| *id != child);
            self.invalidate_ancestors(parent);
            self.invalidate_subtree(child);
        }
    }

    /// Invalidates `id` and all its ancestors.
    fn invalidate_ancestors(&self, id: NodeId) {
        let mut curr = Some(id);
        while let Some(id) = curr {
            let node = &self.nodes[id.index];
            node.bounds.invalidate();
            curr = node.parent;
        }
    }

    /// Invalidates `id` and all its descendants.
    fn invalidate_subtree(&self, id: NodeId) {
        let mut stack: SmallVec<[NodeId; 32]> = SmallVec::new();
        stack.push(id);

        while let Some(id) = stack.pop() {
            let node = &self.nodes[id.index];
            node.bounds.invalidate();
            stack.extend(node.children.iter().copied());
        }
    }
}
