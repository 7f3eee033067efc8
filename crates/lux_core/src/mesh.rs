//! Triangle mesh geometry for the Lux scene.
//!
//! A [`TriangleMesh`] is immutable once constructed: the per-triangle
//! geometric normals and the bounding box are computed up front, so the mesh
//! can be shared between the acceleration structure and the shading code
//! through an `Arc` without any synchronization.

use lux_math::{BoundingBox, Triangle3, Vec3};
use thiserror::Error;

/// Errors that can occur while constructing a mesh.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MeshError {
    #[error("Index list length {0} is not a multiple of 3")]
    IncompleteTriangle(usize),

    #[error("Triangle {triangle} references vertex {index}, but the mesh has {vertex_count} vertices")]
    IndexOutOfRange {
        triangle: usize,
        index: u32,
        vertex_count: usize,
    },

    #[error("Mesh has {vertex_count} vertices but {count} {attribute}")]
    AttributeCountMismatch {
        attribute: &'static str,
        count: usize,
        vertex_count: usize,
    },
}

/// Result type for mesh construction.
pub type MeshResult<T> = Result<T, MeshError>;

/// An indexed triangle mesh.
#[derive(Clone, Debug)]
pub struct TriangleMesh {
    /// Vertex positions (one Vec3 per vertex)
    positions: Vec<Vec3>,

    /// Vertex indices of each triangle
    triangles: Vec<[u32; 3]>,

    /// Unit geometric normal of each triangle (zero for degenerate triangles)
    triangle_normals: Vec<Vec3>,

    /// Shading normals (optional - one per vertex)
    normals: Option<Vec<Vec3>>,

    /// UV coordinates (optional - one [u, v] per vertex)
    uvs: Option<Vec<[f32; 2]>>,

    bounds: BoundingBox,
}

impl TriangleMesh {
    /// Create a mesh from positions and per-triangle vertex indices.
    ///
    /// Every index must refer to an existing vertex.
    pub fn new(positions: Vec<Vec3>, triangles: Vec<[u32; 3]>) -> MeshResult<Self> {
        for (triangle, indices) in triangles.iter().enumerate() {
            if let Some(&index) = indices
                .iter()
                .find(|&&index| index as usize >= positions.len())
            {
                return Err(MeshError::IndexOutOfRange {
                    triangle,
                    index,
                    vertex_count: positions.len(),
                });
            }
        }

        let triangle_normals = triangles
            .iter()
            .map(|t| Self::corners(&positions, t).normal())
            .collect();
        let bounds = BoundingBox::from_points(positions.iter().copied());

        Ok(Self {
            positions,
            triangles,
            triangle_normals,
            normals: None,
            uvs: None,
            bounds,
        })
    }

    /// Create a mesh from a flat index list (every 3 indices form a triangle).
    pub fn from_indices(positions: Vec<Vec3>, indices: Vec<u32>) -> MeshResult<Self> {
        if indices.len() % 3 != 0 {
            return Err(MeshError::IncompleteTriangle(indices.len()));
        }
        let triangles = indices
            .chunks_exact(3)
            .map(|c| [c[0], c[1], c[2]])
            .collect();
        Self::new(positions, triangles)
    }

    /// Attach per-vertex shading normals.
    pub fn with_normals(mut self, normals: Vec<Vec3>) -> MeshResult<Self> {
        self.check_attribute("normals", normals.len())?;
        self.normals = Some(normals);
        Ok(self)
    }

    /// Attach per-vertex UV coordinates.
    pub fn with_uvs(mut self, uvs: Vec<[f32; 2]>) -> MeshResult<Self> {
        self.check_attribute("uvs", uvs.len())?;
        self.uvs = Some(uvs);
        Ok(self)
    }

    fn check_attribute(&self, attribute: &'static str, count: usize) -> MeshResult<()> {
        if count != self.positions.len() {
            return Err(MeshError::AttributeCountMismatch {
                attribute,
                count,
                vertex_count: self.positions.len(),
            });
        }
        Ok(())
    }

    fn corners(positions: &[Vec3], indices: &[u32; 3]) -> Triangle3 {
        Triangle3::new(
            positions[indices[0] as usize],
            positions[indices[1] as usize],
            positions[indices[2] as usize],
        )
    }

    /// Compute smooth shading normals by averaging the area-weighted normals
    /// of the triangles sharing each vertex. Replaces existing normals.
    pub fn compute_vertex_normals(&mut self) {
        if self.normals.is_some() {
            log::debug!(
                "Replacing shading normals of a mesh with {} vertices",
                self.positions.len()
            );
        }

        let mut normals = vec![Vec3::ZERO; self.positions.len()];
        for indices in &self.triangles {
            let [v0, v1, v2] = Self::corners(&self.positions, indices).vertices;
            // Length is twice the triangle area, which weights the average
            let face_normal = (v1 - v0).cross(v2 - v0);
            for &index in indices {
                normals[index as usize] += face_normal;
            }
        }

        for normal in &mut normals {
            // Vertices used only by degenerate triangles (or none) fall back to up
            *normal = normal.try_normalize().unwrap_or(Vec3::Y);
        }

        self.normals = Some(normals);
    }

    /// Get the number of vertices in the mesh.
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// Get the number of triangles in the mesh.
    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    /// Vertex indices of a triangle.
    pub fn triangle(&self, index: usize) -> [u32; 3] {
        self.triangles[index]
    }

    /// Corner positions of a triangle.
    pub fn triangle_vertices(&self, index: usize) -> Triangle3 {
        Self::corners(&self.positions, &self.triangles[index])
    }

    /// Cached unit geometric normal of a triangle.
    pub fn triangle_normal(&self, index: usize) -> Vec3 {
        self.triangle_normals[index]
    }

    /// Shading normal at barycentric coordinates `(b1, b2)` of a triangle.
    ///
    /// Interpolates vertex normals when present, otherwise returns the
    /// geometric normal.
    pub fn shading_normal(&self, index: usize, b1: f32, b2: f32) -> Vec3 {
        match &self.normals {
            Some(normals) => {
                let [i0, i1, i2] = self.triangles[index];
                let n = normals[i0 as usize] * (1.0 - b1 - b2)
                    + normals[i1 as usize] * b1
                    + normals[i2 as usize] * b2;
                n.try_normalize().unwrap_or(self.triangle_normals[index])
            }
            None => self.triangle_normals[index],
        }
    }

    /// UV coordinates at barycentric coordinates `(b1, b2)` of a triangle, if the mesh has UVs.
    pub fn uv(&self, index: usize, b1: f32, b2: f32) -> Option<[f32; 2]> {
        let uvs = self.uvs.as_ref()?;
        let [i0, i1, i2] = self.triangles[index];
        let (uv0, uv1, uv2) = (uvs[i0 as usize], uvs[i1 as usize], uvs[i2 as usize]);
        let b0 = 1.0 - b1 - b2;
        Some([
            uv0[0] * b0 + uv1[0] * b1 + uv2[0] * b2,
            uv0[1] * b0 + uv1[1] * b1 + uv2[1] * b2,
        ])
    }

    /// Check if the mesh has shading normals.
    pub fn has_normals(&self) -> bool {
        self.normals.is_some()
    }

    /// Check if the mesh has UV coordinates.
    pub fn has_uvs(&self) -> bool {
        self.uvs.is_some()
    }

    /// Axis-aligned bounding box of all vertices.
    pub fn bounds(&self) -> BoundingBox {
        self.bounds
    }
}
