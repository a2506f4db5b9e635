use super::{BoundsCache, NodeId};
use crate::math::{Isometry, Real};
use crate::shape::Mesh;

/// The content of a scene node.
#[derive(Clone, Debug)]
pub enum NodeKind {
    /// A container of other nodes. Its bounds enclose the bounds of its children.
    Group,
    /// A triangle mesh.
    Mesh(Box<Mesh>),
    /// A node without content nor bounds, e.g., a marker or a camera anchor.
    ///
    /// It is ignored by ray casts.
    Empty,
}

/// A node of a [`Scene`](super::Scene).
#[derive(Clone, Debug)]
pub struct SceneNode {
    kind: NodeKind,
    local_transform: Isometry<Real>,
    pub(super) parent: Option<NodeId>,
    pub(super) children: Vec<NodeId>,
    pub(super) bounds: BoundsCache,
}

impl SceneNode {
    fn new(kind: NodeKind, local_transform: Isometry<Real>) -> Self {
        Self {
            kind,
            local_transform,
            parent: None,
            children: Vec::new(),
            bounds: BoundsCache::default(),
        }
    }

    /// A group placed at `local_transform` relative to its parent.
    pub fn group(local_transform: Isometry<Real>) -> Self {
        Self::new(NodeKind::Group, local_transform)
    }

    /// A mesh placed at `local_transform` relative to its parent.
    pub fn mesh(local_transform: Isometry<Real>, mesh: Mesh) -> Self {
        Self::new(NodeKind::Mesh(Box::new(mesh)), local_transform)
    }

    /// An empty node placed at `local_transform` relative to its parent.
    pub fn empty(local_transform: Isometry<Real>) -> Self {
        Self::new(NodeKind::Empty, local_transform)
    }

    /// The content of this node.
    #[inline]
    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    #[inline]
    pub(super) fn kind_mut(&mut self) -> &mut NodeKind {
        &mut self.kind
    }

    /// The mesh of this node, if it is a mesh.
    #[inline]
    pub fn as_mesh(&self) -> Option<&Mesh> {
        match &self.kind {
            NodeKind::Mesh(mesh) => Some(mesh),
            NodeKind::Group | NodeKind::Empty => None,
        }
    }

    /// Is this node a group?
    #[inline]
    pub fn is_group(&self) -> bool {
        matches!(self.kind, NodeKind::Group)
    }

    /// Can this node be bounded? Only groups and meshes can.
    #[inline]
    pub fn has_bounds(&self) -> bool {
        !matches!(self.kind, NodeKind::Empty)
    }

    /// The position of this node relative to its parent.
    #[inline]
    pub fn local_transform(&self) -> &Isometry<Real> {
        &self.local_transform
    }

    #[inline]
    pub(super) fn set_local_transform(&mut self, local_transform: Isometry<Real>) {
        self.local_transform = local_transform;
    }

    /// The parent of this node.
    #[inline]
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// The children of this node, in insertion order.
    #[inline]
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// The cached world-space bounds of this node.
    #[inline]
    pub fn bounds_cache(&self) -> &BoundsCache {
        &self.bounds
    }
}
