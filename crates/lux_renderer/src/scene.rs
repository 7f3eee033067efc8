//! Scene facade over the triangle tree.
//!
//! A [`Scene`] owns its meshes and a built [`TriangleTree`], and turns raw
//! tree hits into [`Intersection`] records with hit point and surface normal.

use std::sync::Arc;

use glam::{DVec3, Vec3};
use lux_core::TriangleMesh;
use lux_math::{BoundingBox, Ray};

use crate::config::TreeConfig;
use crate::triangle_tree::{MeshId, TriangleHit, TriangleTree};

/// Record of a ray/scene intersection.
#[derive(Debug, Clone)]
pub struct Intersection {
    pub mesh_id: MeshId,
    pub mesh: Arc<TriangleMesh>,
    /// Index of the hit triangle within `mesh`
    pub triangle: usize,
    /// Parameter t where the intersection occurs
    pub t: f64,
    /// Point of intersection
    pub point: DVec3,
    /// Geometric normal (always points against the ray)
    pub normal: Vec3,
    /// Whether the ray hit the side the triangle winding faces
    pub front_face: bool,
    /// Barycentric coordinates relative to the second and third vertex
    pub b1: f64,
    pub b2: f64,
}

impl Intersection {
    fn new(ray: &Ray, hit: TriangleHit, mesh: Arc<TriangleMesh>) -> Self {
        let outward_normal = mesh.triangle_normal(hit.triangle);
        let front_face = ray.direction.dot(outward_normal.as_dvec3()) < 0.0;

        Self {
            mesh_id: hit.mesh,
            mesh,
            triangle: hit.triangle,
            t: hit.t,
            point: ray.at(hit.t),
            normal: if front_face { outward_normal } else { -outward_normal },
            front_face,
            b1: hit.b1,
            b2: hit.b2,
        }
    }

    /// Interpolated shading normal, flipped to the same side as `normal`.
    pub fn shading_normal(&self) -> Vec3 {
        let n = self
            .mesh
            .shading_normal(self.triangle, self.b1 as f32, self.b2 as f32);
        if n.dot(self.normal) < 0.0 {
            -n
        } else {
            n
        }
    }

    /// Interpolated UV coordinates, if the mesh has them.
    pub fn uv(&self) -> Option<[f32; 2]> {
        self.mesh.uv(self.triangle, self.b1 as f32, self.b2 as f32)
    }
}

/// A set of triangle meshes ready for ray queries.
pub struct Scene {
    tree: TriangleTree,
}

impl Scene {
    /// Register every mesh and build the tree with default settings.
    pub fn new(meshes: Vec<Arc<TriangleMesh>>) -> Self {
        Self::with_config(meshes, TreeConfig::default())
    }

    pub fn with_config(meshes: Vec<Arc<TriangleMesh>>, config: TreeConfig) -> Self {
        let mut tree = TriangleTree::with_config(config);
        for mesh in meshes {
            tree.add_mesh(mesh);
        }
        tree.build();
        Self { tree }
    }

    /// Find the nearest intersection. On a hit `ray.max_t` is set to its `t`.
    pub fn intersect(&self, ray: &mut Ray) -> Option<Intersection> {
        let hit = self.tree.intersect(ray)?;
        let mesh = self.tree.mesh(hit.mesh)?.clone();
        Some(Intersection::new(ray, hit, mesh))
    }

    /// Occlusion query: true if anything is hit within the ray's range.
    pub fn intersect_test(&self, ray: &Ray) -> bool {
        self.tree.intersect_test(ray)
    }

    pub fn world_bounds(&self) -> Option<BoundingBox> {
        self.tree.world_bounds()
    }

    pub fn meshes(&self) -> &[Arc<TriangleMesh>] {
        self.tree.meshes()
    }

    pub fn tree(&self) -> &TriangleTree {
        &self.tree
    }
}
