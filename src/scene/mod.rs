//! Hierarchies of meshes, with lazily cached world-space bounds.

pub use self::bounds_cache::{BoundsCache, BoundsState, NodeBounds};
pub use self::node::{NodeKind, SceneNode};
pub use self::scene::{NodeId, Scene, SceneError, SubtreeBuildReport};

mod bounds_cache;
mod node;
mod scene;
