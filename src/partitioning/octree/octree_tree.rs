use super::{IndexRangeSet, Leaves};
use crate::bounding_volume::Aabb;
use smallvec::SmallVec;

/// A node of a [`SpatialOctree`].
#[derive(Clone, Debug, PartialEq)]
pub enum OctreeNode {
    /// A node subdivided into at most 8 children, one per non-empty octant of its box.
    Internal {
        /// The box covered by this node.
        aabb: Aabb,
        /// The children of this node.
        children: Vec<OctreeNode>,
    },
    /// A terminal node listing the triangles overlapping its box.
    Leaf {
        /// The box covered by this node.
        aabb: Aabb,
        /// The offsets of the triangles overlapping `aabb`.
        indices: IndexRangeSet,
    },
}

impl OctreeNode {
    /// The box covered by this node.
    #[inline]
    pub fn aabb(&self) -> &Aabb {
        match self {
            OctreeNode::Internal { aabb, .. } | OctreeNode::Leaf { aabb, .. } => aabb,
        }
    }

    /// Is this node a leaf?
    #[inline]
    pub fn is_leaf(&self) -> bool {
        matches!(self, OctreeNode::Leaf { .. })
    }

    /// The children of this node (empty for leaves).
    #[inline]
    pub fn children(&self) -> &[OctreeNode] {
        match self {
            OctreeNode::Internal { children, .. } => children,
            OctreeNode::Leaf { .. } => &[],
        }
    }

    /// The triangle offsets of this node, if it is a leaf.
    #[inline]
    pub fn indices(&self) -> Option<&IndexRangeSet> {
        match self {
            OctreeNode::Internal { .. } => None,
            OctreeNode::Leaf { indices, .. } => Some(indices),
        }
    }
}

/// An octree indexing the triangles of a single mesh.
///
/// The octree is expressed in the local space of the mesh geometry it was built from. A
/// triangle is listed by every leaf whose box it overlaps, so triangles straddling split
/// planes appear in several leaves.
#[derive(Clone, Debug, PartialEq)]
pub struct SpatialOctree {
    pub(crate) root: OctreeNode,
}

impl SpatialOctree {
    /// Wraps a root node built by [`OctreeBuilder`](super::OctreeBuilder) or validated by
    /// [`SpatialOctree::from_repr`]: internal nodes have at most 8 children.
    pub(crate) fn from_root(root: OctreeNode) -> Self {
        Self { root }
    }

    /// The root node of this octree.
    #[inline]
    pub fn root(&self) -> &OctreeNode {
        &self.root
    }

    /// The box covered by this octree.
    #[inline]
    pub fn aabb(&self) -> &Aabb {
        self.root.aabb()
    }

    /// Iterates through the leaves of this octree, in depth-first order.
    pub fn leaves(&self) -> Leaves<'_> {
        Leaves::new(&self.root)
    }

    /// The number of leaves of this octree.
    pub fn leaf_count(&self) -> usize {
        self.leaves().count()
    }

    /// The total number of nodes (internal and leaves) of this octree.
    pub fn node_count(&self) -> usize {
        let mut stack: SmallVec<[&OctreeNode; 32]> = SmallVec::new();
        let mut count = 0;
        stack.push(&self.root);

        while let Some(node) = stack.pop() {
            count += 1;
            stack.extend(node.children());
        }

        count
    }

    /// The number of levels of this octree. A root without children has a depth of 1.
    pub fn depth(&self) -> usize {
        let mut stack: SmallVec<[(&OctreeNode, usize); 32]> = SmallVec::new();
        let mut depth = 0;
        stack.push((&self.root, 1));

        while let Some((node, node_depth)) = stack.pop() {
            depth = depth.max(node_depth);
            stack.extend(node.children().iter().map(|child| (child, node_depth + 1)));
        }

        depth
    }

    /// The sum of the triangle counts of all the leaves.
    ///
    /// This exceeds the number of distinct triangles whenever triangles straddle split planes.
    pub fn triangle_participations(&self) -> usize {
        self.leaves().map(|(_, indices)| indices.count()).sum()
    }
}
