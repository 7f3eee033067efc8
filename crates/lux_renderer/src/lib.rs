//! Lux Renderer - ray/triangle intersection core.
//!
//! Answers nearest-hit and any-hit ray queries against a set of triangle
//! meshes through a ternary spatial subdivision tree.
//!
//! - **`TriangleTree`**: the acceleration structure (register meshes, build
//!   once, query from any thread)
//! - **`Scene`**: owns meshes and a built tree, returns full `Intersection`
//!   records
//! - **`TreeConfig`**: construction settings

mod config;
mod scene;
mod triangle_tree;

pub use config::{TreeConfig, LEAF_THRESHOLD, NODES_PER_BATCH};
pub use scene::{Intersection, Scene};
pub use triangle_tree::{MeshId, TreeStats, TriangleHit, TriangleTree};

/// Re-export the math and mesh types that appear in the public API
pub use lux_core::{MeshError, TriangleMesh};
pub use lux_math::{BoundingBox, DVec3, Interval, Ray, Triangle3, Vec3};
