//! The persisted form of an octree.
//!
//! Building an octree is expensive, so it is typically done once (offline or at load time),
//! saved, and re-attached to its mesh later. The types of this module describe the structural
//! layout of an octree with plain data: boxes as `min`/`max` coordinate arrays, and leaves as
//! lists of offset ranges. Internal nodes and leaves are told apart by an explicit `kind` tag.

use super::{IndexRange, IndexRangeSet, OctreeNode, SpatialOctree};
use crate::bounding_volume::Aabb;
use crate::math::{Point, Real};

/// Error raised when rebuilding an octree from an invalid persisted form.
#[derive(thiserror::Error, Copy, Clone, Debug, PartialEq)]
pub enum OctreeReprError {
    /// A box has non-finite coordinates or a `min` greater than its `max`.
    #[error("invalid box: min {min:?}, max {max:?}.")]
    InvalidAabb {
        /// The lower corner of the box.
        min: [Real; 3],
        /// The upper corner of the box.
        max: [Real; 3],
    },
    /// An internal node has more than 8 children.
    #[error("an internal node has {0} children but at most 8 are allowed.")]
    TooManyChildren(usize),
    /// A non-root internal node has no children.
    #[error("a non-root internal node has no children.")]
    EmptyInternalNode,
    /// A leaf lists no triangle.
    #[error("a leaf lists no triangle.")]
    EmptyLeaf,
    /// A range does not start and end on triangle boundaries.
    #[error("the range [{start}, {end}] is empty or does not align on triangles.")]
    InvalidRange {
        /// The start of the range.
        start: u32,
        /// The end of the range.
        end: u32,
    },
    /// The ranges of a leaf are not ascending and disjoint.
    #[error("the range starting at {start} does not come after the previous range ending at {previous_end}.")]
    UnorderedRanges {
        /// The start of the faulty range.
        start: u32,
        /// The end of the range preceding it.
        previous_end: u32,
    },
    /// The declared triangle count of a leaf does not match its ranges.
    #[error("a leaf declares {declared} triangles but its ranges cover {actual}.")]
    CountMismatch {
        /// The count stored in the persisted form.
        declared: usize,
        /// The count covered by the ranges.
        actual: usize,
    },
    /// An offset is beyond the triangles of the mesh the octree is attached to.
    #[error("the triangle offset {offset} is out of the mesh bounds ({index_count} indices).")]
    OffsetOutOfBounds {
        /// The faulty offset.
        offset: u32,
        /// The number of vertex references of the mesh.
        index_count: usize,
    },
}

/// A box, as a pair of corners.
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct AabbRepr {
    /// The corner with the smallest coordinates.
    pub min: [Real; 3],
    /// The corner with the largest coordinates.
    pub max: [Real; 3],
}

/// The triangle offsets of a leaf.
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
#[derive(Clone, Debug, PartialEq)]
pub struct IndexRangesRepr {
    /// The inclusive offset ranges, in ascending order.
    pub ranges: Vec<IndexRange>,
    /// The number of triangles covered by `ranges`.
    pub count: usize,
}

/// A node of a persisted octree.
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
#[cfg_attr(
    feature = "serde-serialize",
    serde(tag = "kind", rename_all = "snake_case")
)]
#[derive(Clone, Debug, PartialEq)]
pub enum OctreeNodeRepr {
    /// An internal node.
    Internal {
        /// The box of the node.
        aabb: AabbRepr,
        /// The children of the node.
        children: Vec<OctreeNodeRepr>,
    },
    /// A leaf.
    Leaf {
        /// The box of the node.
        aabb: AabbRepr,
        /// The triangles of the leaf.
        indices: IndexRangesRepr,
    },
}

/// A persisted octree.
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
#[derive(Clone, Debug, PartialEq)]
pub struct OctreeRepr {
    /// The root node.
    pub root: OctreeNodeRepr,
}

impl From<&Aabb> for AabbRepr {
    fn from(aabb: &Aabb) -> Self {
        Self {
            min: aabb.mins.coords.into(),
            max: aabb.maxs.coords.into(),
        }
    }
}

impl TryFrom<&AabbRepr> for Aabb {
    type Error = OctreeReprError;

    fn try_from(repr: &AabbRepr) -> Result<Self, Self::Error> {
        let aabb = Aabb::new(Point::from(repr.min), Point::from(repr.max));

        if aabb.is_valid() {
            Ok(aabb)
        } else {
            Err(OctreeReprError::InvalidAabb {
                min: repr.min,
                max: repr.max,
            })
        }
    }
}

impl From<&IndexRangeSet> for IndexRangesRepr {
    fn from(indices: &IndexRangeSet) -> Self {
        Self {
            ranges: indices.ranges().to_vec(),
            count: indices.count(),
        }
    }
}

impl TryFrom<&IndexRangesRepr> for IndexRangeSet {
    type Error = OctreeReprError;

    fn try_from(repr: &IndexRangesRepr) -> Result<Self, Self::Error> {
        if repr.ranges.is_empty() {
            return Err(OctreeReprError::EmptyLeaf);
        }

        let mut previous_end = None;
        let mut actual = 0;

        for range in &repr.ranges {
            if range.start > range.end || (range.end - range.start) % 3 != 0 {
                return Err(OctreeReprError::InvalidRange {
                    start: range.start,
                    end: range.end,
                });
            }

            if let Some(previous_end) = previous_end {
                if range.start <= previous_end {
                    return Err(OctreeReprError::UnorderedRanges {
                        start: range.start,
                        previous_end,
                    });
                }
            }

            previous_end = Some(range.end);
            actual += range.len();
        }

        if actual != repr.count {
            return Err(OctreeReprError::CountMismatch {
                declared: repr.count,
                actual,
            });
        }

        Ok(IndexRangeSet::from_raw_parts(repr.ranges.clone(), actual))
    }
}

impl From<&OctreeNode> for OctreeNodeRepr {
    fn from(node: &OctreeNode) -> Self {
        match node {
            OctreeNode::Internal { aabb, children } => OctreeNodeRepr::Internal {
                aabb: aabb.into(),
                children: children.iter().map(OctreeNodeRepr::from).collect(),
            },
            OctreeNode::Leaf { aabb, indices } => OctreeNodeRepr::Leaf {
                aabb: aabb.into(),
                indices: indices.into(),
            },
        }
    }
}

fn node_from_repr(repr: &OctreeNodeRepr, is_root: bool) -> Result<OctreeNode, OctreeReprError> {
    match repr {
        OctreeNodeRepr::Internal { aabb, children } => {
            if children.len() > 8 {
                return Err(OctreeReprError::TooManyChildren(children.len()));
            }
            if children.is_empty() && !is_root {
                return Err(OctreeReprError::EmptyInternalNode);
            }

            Ok(OctreeNode::Internal {
                aabb: aabb.try_into()?,
                children: children
                    .iter()
                    .map(|child| node_from_repr(child, false))
                    .collect::<Result<_, _>>()?,
            })
        }
        OctreeNodeRepr::Leaf { aabb, indices } => Ok(OctreeNode::Leaf {
            aabb: aabb.try_into()?,
            indices: indices.try_into()?,
        }),
    }
}

impl SpatialOctree {
    /// The persisted form of this octree.
    pub fn to_repr(&self) -> OctreeRepr {
        OctreeRepr {
            root: (&self.root).into(),
        }
    }

    /// Rebuilds an octree from its persisted form.
    ///
    /// The structure is validated, but not the geometric consistency with the mesh it will be
    /// attached to.
    pub fn from_repr(repr: &OctreeRepr) -> Result<Self, OctreeReprError> {
        node_from_repr(&repr.root, true).map(SpatialOctree::from_root)
    }
}
