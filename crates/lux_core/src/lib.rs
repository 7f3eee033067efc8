//! Lux Core - scene geometry for the Lux renderer.
//!
//! This crate provides the mesh layer the acceleration structures consume:
//!
//! - **`TriangleMesh`**: indexed triangles with cached geometric normals,
//!   optional shading normals and UVs
//! - **`MeshError`**: validation errors raised while constructing a mesh
//!
//! # Example
//!
//! ```
//! use lux_core::TriangleMesh;
//! use lux_math::Vec3;
//!
//! let mesh = TriangleMesh::from_indices(
//!     vec![Vec3::ZERO, Vec3::X, Vec3::Y],
//!     vec![0, 1, 2],
//! )?;
//! assert_eq!(mesh.triangle_count(), 1);
//! # Ok::<(), lux_core::MeshError>(())
//! ```

pub mod mesh;

// Re-export commonly used types
pub use mesh::{MeshError, MeshResult, TriangleMesh};
