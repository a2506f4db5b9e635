//! Shapes supported by ray casting queries.

pub use self::mesh::{HasBounds, HasOctree, Mesh, Side};
pub use self::mesh_geometry::{DrawRange, GeometryGroup, MeshGeometry};
pub use self::triangle::Triangle;

mod mesh;
mod mesh_geometry;
mod triangle;
