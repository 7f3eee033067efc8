//! Ternary spatial subdivision tree over the triangles of a scene.
//!
//! All registered meshes are flattened into one triangle buffer which the
//! tree partitions in place: every node splits its range into the triangles
//! below, across and above the midplane of its bounding box.
//! Nodes and leaves are plain records stored in two pools and linked by
//! indices, so a tree is released in bulk without walking it.
//!
//! The tree is built once. After [`TriangleTree::build`] it is immutable and
//! can be queried from any number of threads; each query owns its ray.

mod arena;
mod buffer;
mod leaf;
mod node;

use std::sync::Arc;

use lux_core::TriangleMesh;
use lux_math::{BoundingBox, DVec3, Ray};
use rayon::prelude::*;

use crate::config::TreeConfig;
use arena::Pool;
use buffer::{TriangleBuffer, TriangleEntry};
use leaf::{Candidate, Leaf};
use node::{Builder, Child, Node};

pub use buffer::MeshId;

/// The closest triangle found along a ray.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TriangleHit {
    /// Mesh the triangle belongs to
    pub mesh: MeshId,
    /// Index of the triangle within its mesh
    pub triangle: usize,
    /// Ray parameter of the hit point
    pub t: f64,
    /// Barycentric coordinates of the hit point relative to the triangle's
    /// second and third vertex
    pub b1: f64,
    pub b2: f64,
}

/// Shape summary of a built tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TreeStats {
    pub meshes: usize,
    pub triangles: usize,
    pub nodes: usize,
    pub leaves: usize,
    /// Number of elements on the longest root-to-leaf path
    pub max_depth: usize,
    pub max_leaf_size: usize,
}

/// Read-only view of a built tree used by one query.
pub(crate) struct Traversal<'a> {
    nodes: &'a Pool<Node>,
    leaves: &'a Pool<Leaf>,
    triangles: &'a [TriangleEntry],
    pub inv_direction: DVec3,
}

impl Traversal<'_> {
    pub fn nearest(&self, child: Child, ray: &mut Ray, best: &mut Option<Candidate>) {
        match child {
            Child::Node(handle) => self.nodes[handle].intersect(self, ray, best),
            Child::Leaf(handle) => {
                self.leaves[handle].intersect(self.triangles, ray, self.inv_direction, best)
            }
        }
    }

    pub fn any_hit(&self, child: Child, ray: &Ray) -> bool {
        match child {
            Child::Node(handle) => self.nodes[handle].intersect_test(self, ray),
            Child::Leaf(handle) => {
                self.leaves[handle].intersect_test(self.triangles, ray, self.inv_direction)
            }
        }
    }
}

/// Acceleration structure for ray/triangle queries against a set of meshes.
///
/// Lifecycle: create, [`add_mesh`](Self::add_mesh) every mesh,
/// [`build`](Self::build) once, then query. Meshes added after the build are
/// ignored and a second build is a no-op; a changed scene needs a new tree.
pub struct TriangleTree {
    config: TreeConfig,
    meshes: Vec<Arc<TriangleMesh>>,
    buffer: TriangleBuffer,
    nodes: Pool<Node>,
    leaves: Pool<Leaf>,
    root: Option<Child>,
}

impl TriangleTree {
    pub fn new() -> Self {
        Self::with_config(TreeConfig::default())
    }

    pub fn with_config(config: TreeConfig) -> Self {
        Self {
            config,
            meshes: Vec::new(),
            buffer: TriangleBuffer::default(),
            nodes: Pool::new(config.nodes_per_batch),
            leaves: Pool::new(config.nodes_per_batch),
            root: None,
        }
    }

    /// Register a mesh for the next build and return its id.
    ///
    /// Registering the same `Arc` twice is skipped with a warning and returns
    /// the id it already has. Returns `None` once the tree is built.
    pub fn add_mesh(&mut self, mesh: Arc<TriangleMesh>) -> Option<MeshId> {
        if self.is_built() {
            log::warn!("Trying to add a mesh to a triangle tree that is already built. Skipping.");
            return None;
        }

        if let Some(existing) = self.meshes.iter().position(|m| Arc::ptr_eq(m, &mesh)) {
            log::warn!("Mesh {} is already registered with the triangle tree. Skipping.", existing);
            return Some(MeshId(existing));
        }

        self.meshes.push(mesh);
        Some(MeshId(self.meshes.len() - 1))
    }

    /// Build the tree over every registered mesh.
    ///
    /// Does nothing (with a warning) if the tree is already built, and leaves
    /// the tree unbuilt if the meshes have no triangles.
    pub fn build(&mut self) {
        if self.is_built() {
            log::warn!("Trying to build a triangle tree that is already built. Skipping.");
            return;
        }

        self.buffer = TriangleBuffer::flatten(&self.meshes);
        if self.buffer.is_empty() {
            log::warn!("Trying to build an empty triangle tree. Skipping.");
            return;
        }

        let mut builder = Builder {
            buffer: &mut self.buffer,
            nodes: &mut self.nodes,
            leaves: &mut self.leaves,
            leaf_threshold: self.config.leaf_threshold,
        };
        self.root = builder.build_root();

        log::info!(
            "Triangle tree: {} triangles from {} meshes, {} nodes, {} leaves",
            self.buffer.len(),
            self.meshes.len(),
            self.nodes.len(),
            self.leaves.len()
        );
        if log::log_enabled!(log::Level::Debug) {
            let stats = self.stats();
            log::debug!(
                "Triangle tree depth {}, largest leaf {} triangles",
                stats.max_depth,
                stats.max_leaf_size
            );
        }
    }

    /// Find the triangle nearest along the ray within `[min_t, max_t]`.
    ///
    /// On a hit `ray.max_t` is set to the hit's `t`; on a miss the ray is left
    /// unchanged. An unbuilt tree never reports a hit.
    pub fn intersect(&self, ray: &mut Ray) -> Option<TriangleHit> {
        let root = self.root?;
        let traversal = self.traversal(ray);

        let mut best = None;
        traversal.nearest(root, ray, &mut best);

        best.map(|candidate| {
            let entry = &self.buffer.entries()[candidate.entry];
            TriangleHit {
                mesh: entry.mesh,
                triangle: entry.index,
                t: candidate.hit.t,
                b1: candidate.hit.b1,
                b2: candidate.hit.b2,
            }
        })
    }

    /// Check whether any triangle is hit within `[min_t, max_t]`.
    ///
    /// Stops at the first accepted hit, which is not necessarily the nearest.
    pub fn intersect_test(&self, ray: &Ray) -> bool {
        match self.root {
            Some(root) => self.traversal(ray).any_hit(root, ray),
            None => false,
        }
    }

    /// Nearest-hit queries for a batch of rays, run in parallel.
    ///
    /// Each ray is narrowed exactly as by [`intersect`](Self::intersect).
    pub fn intersect_many(&self, rays: &mut [Ray]) -> Vec<Option<TriangleHit>> {
        rays.par_iter_mut().map(|ray| self.intersect(ray)).collect()
    }

    fn traversal(&self, ray: &Ray) -> Traversal<'_> {
        Traversal {
            nodes: &self.nodes,
            leaves: &self.leaves,
            triangles: self.buffer.entries(),
            inv_direction: ray.inv_direction(),
        }
    }

    pub fn is_built(&self) -> bool {
        self.root.is_some()
    }

    pub fn config(&self) -> &TreeConfig {
        &self.config
    }

    /// Number of triangles in the tree (0 until built).
    pub fn triangle_count(&self) -> usize {
        self.buffer.len()
    }

    pub fn meshes(&self) -> &[Arc<TriangleMesh>] {
        &self.meshes
    }

    pub fn mesh(&self, id: MeshId) -> Option<&Arc<TriangleMesh>> {
        self.meshes.get(id.0)
    }

    /// Bounding box of every triangle in the tree, `None` until built.
    pub fn world_bounds(&self) -> Option<BoundingBox> {
        self.root.map(|root| self.bbox(root))
    }

    fn bbox(&self, child: Child) -> BoundingBox {
        match child {
            Child::Node(handle) => self.nodes[handle].bbox,
            Child::Leaf(handle) => self.leaves[handle].bbox,
        }
    }

    /// Walk the tree and summarize its shape.
    pub fn stats(&self) -> TreeStats {
        let mut stats = TreeStats {
            meshes: self.meshes.len(),
            triangles: self.buffer.len(),
            nodes: self.nodes.len(),
            leaves: self.leaves.len(),
            max_leaf_size: self.leaves.iter().map(Leaf::len).max().unwrap_or(0),
            ..TreeStats::default()
        };
        if let Some(root) = self.root {
            stats.max_depth = self.depth(root);
        }
        stats
    }

    fn depth(&self, child: Child) -> usize {
        match child {
            Child::Leaf(_) => 1,
            Child::Node(handle) => {
                let node = &self.nodes[handle];
                1 + node
                    .children
                    .iter()
                    .flatten()
                    .map(|&c| self.depth(c))
                    .max()
                    .unwrap_or(0)
            }
        }
    }
}

impl Drop for TriangleTree {
    fn drop(&mut self) {
        self.root = None;
        self.nodes.purge();
        self.leaves.purge();
    }
}

impl Default for TriangleTree {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::triangle_tree::leaf::intersect_triangle;
    use lux_math::{Triangle3, Vec3};
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn init_logger() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn mesh_of(triangles: &[Triangle3]) -> Arc<TriangleMesh> {
        let positions = triangles.iter().flat_map(|t| t.vertices).collect();
        let indices = (0..triangles.len() as u32)
            .map(|i| [3 * i, 3 * i + 1, 3 * i + 2])
            .collect();
        Arc::new(TriangleMesh::new(positions, indices).unwrap())
    }

    fn tree_of(meshes: &[Arc<TriangleMesh>], config: TreeConfig) -> TriangleTree {
        let mut tree = TriangleTree::with_config(config);
        for mesh in meshes {
            tree.add_mesh(mesh.clone());
        }
        tree.build();
        tree
    }

    fn unit_triangle() -> Triangle3 {
        Triangle3::new(Vec3::ZERO, Vec3::X, Vec3::Y)
    }

    /// The unit triangle moved to `(x, 0, z)`.
    fn layer(x: f32, z: f32) -> Triangle3 {
        let offset = Vec3::new(x, 0.0, z);
        Triangle3::new(offset, offset + Vec3::X, offset + Vec3::Y)
    }

    /// Small non-degenerate triangles scattered through a 20-unit cube.
    fn random_soup(rng: &mut StdRng, count: usize) -> Vec<Triangle3> {
        let mut triangles = Vec::with_capacity(count);
        while triangles.len() < count {
            let center = Vec3::new(
                rng.gen_range(-10.0..10.0),
                rng.gen_range(-10.0..10.0),
                rng.gen_range(-10.0..10.0),
            );
            let mut corner = || {
                let offset = Vec3::new(
                    rng.gen_range(-1.5..1.5),
                    rng.gen_range(-1.5..1.5),
                    rng.gen_range(-1.5..1.5),
                );
                center + offset
            };
            let triangle = Triangle3::new(corner(), corner(), corner());
            if triangle.area() > 1e-2 {
                triangles.push(triangle);
            }
        }
        triangles
    }

    /// Rays from outside the soup aimed at random points inside it.
    fn random_ray(rng: &mut StdRng) -> Ray {
        let origin = DVec3::new(
            rng.gen_range(-20.0..20.0),
            rng.gen_range(-20.0..20.0),
            rng.gen_range(-20.0..20.0),
        );
        let target = DVec3::new(
            rng.gen_range(-10.0..10.0),
            rng.gen_range(-10.0..10.0),
            rng.gen_range(-10.0..10.0),
        );
        Ray::new(origin, target - origin)
    }

    /// Nearest hit by testing every triangle.
    fn brute_force(meshes: &[Arc<TriangleMesh>], ray: &Ray) -> Option<f64> {
        let mut nearest: Option<f64> = None;
        for mesh in meshes {
            for i in 0..mesh.triangle_count() {
                if let Some(hit) = intersect_triangle(&mesh.triangle_vertices(i), ray) {
                    if ray.range().contains(hit.t) && nearest.map_or(true, |t| hit.t < t) {
                        nearest = Some(hit.t);
                    }
                }
            }
        }
        nearest
    }

    #[test]
    fn test_unbuilt_tree_never_hits() {
        let tree = TriangleTree::new();
        let mut ray = Ray::new(DVec3::new(0.0, 0.0, -1.0), DVec3::Z);

        assert!(!tree.is_built());
        assert!(tree.intersect(&mut ray).is_none());
        assert!(!tree.intersect_test(&ray));
        assert_eq!(ray.max_t, f64::INFINITY);
        assert!(tree.world_bounds().is_none());
    }

    #[test]
    fn test_empty_build_stays_unbuilt() {
        init_logger();
        let empty = Arc::new(TriangleMesh::new(vec![Vec3::ZERO], vec![]).unwrap());
        let mut tree = tree_of(&[empty], TreeConfig::default());

        assert!(!tree.is_built());
        assert_eq!(tree.triangle_count(), 0);
        let mut ray = Ray::new(DVec3::ZERO, DVec3::Z);
        assert!(tree.intersect(&mut ray).is_none());

        // Still open for registration
        assert!(tree.add_mesh(mesh_of(&[unit_triangle()])).is_some());
        tree.build();
        assert!(tree.is_built());
        assert_eq!(tree.triangle_count(), 1);
    }

    #[test]
    fn test_leaf_root_up_to_threshold() {
        let mut rng = StdRng::seed_from_u64(7);

        let small = tree_of(&[mesh_of(&random_soup(&mut rng, 10))], TreeConfig::default());
        assert!(matches!(small.root, Some(Child::Leaf(_))));
        assert_eq!(small.stats().nodes, 0);
        assert_eq!(small.stats().leaves, 1);

        let large = tree_of(&[mesh_of(&random_soup(&mut rng, 11))], TreeConfig::default());
        assert!(matches!(large.root, Some(Child::Node(_))));
    }

    #[test]
    fn test_custom_leaf_threshold() {
        let mut rng = StdRng::seed_from_u64(8);
        let mesh = mesh_of(&random_soup(&mut rng, 40));

        let coarse = tree_of(&[mesh.clone()], TreeConfig::default().with_leaf_threshold(64));
        assert!(matches!(coarse.root, Some(Child::Leaf(_))));

        let fine = tree_of(&[mesh], TreeConfig::default().with_leaf_threshold(2));
        assert!(fine.stats().nodes > 0);
        assert!(fine.stats().leaves > coarse.stats().leaves);
    }

    #[test]
    fn test_build_twice_is_noop() {
        init_logger();
        let mut rng = StdRng::seed_from_u64(3);
        let mut tree = tree_of(&[mesh_of(&random_soup(&mut rng, 200))], TreeConfig::default());

        let root = tree.root;
        let buffer = tree.buffer.clone();
        let stats = tree.stats();

        tree.build();
        assert_eq!(tree.root, root);
        assert_eq!(tree.buffer, buffer);
        assert_eq!(tree.stats(), stats);
    }

    #[test]
    fn test_duplicate_mesh_is_skipped() {
        init_logger();
        let mesh = mesh_of(&[unit_triangle()]);
        let other = mesh_of(&[unit_triangle()]);

        let mut tree = TriangleTree::new();
        assert_eq!(tree.add_mesh(mesh.clone()), Some(MeshId(0)));
        assert_eq!(tree.add_mesh(mesh.clone()), Some(MeshId(0)));
        // Equal contents, different mesh
        assert_eq!(tree.add_mesh(other), Some(MeshId(1)));
        assert_eq!(tree.meshes().len(), 2);

        tree.build();
        assert_eq!(tree.triangle_count(), 2);
    }

    #[test]
    fn test_add_after_build_is_ignored() {
        init_logger();
        let mut tree = tree_of(&[mesh_of(&[unit_triangle()])], TreeConfig::default());

        assert_eq!(tree.add_mesh(mesh_of(&[unit_triangle()])), None);
        assert_eq!(tree.meshes().len(), 1);
        assert_eq!(tree.triangle_count(), 1);
    }

    #[test]
    fn test_unit_triangle_scenario() {
        let tree = tree_of(&[mesh_of(&[unit_triangle()])], TreeConfig::default());

        let mut ray = Ray::new(DVec3::new(0.0, 0.0, -1.0), DVec3::Z);
        let hit = tree.intersect(&mut ray).expect("ray along +Z through the corner hits");
        assert!((hit.t - 1.0).abs() < 1e-12);
        assert!(hit.b1 + hit.b2 <= 1.0 + f64::EPSILON);
        assert_eq!(hit.mesh, MeshId(0));
        assert_eq!(hit.triangle, 0);
        assert_eq!(ray.max_t, hit.t);

        let mut offset = Ray::new(DVec3::new(2.0, 2.0, -1.0), DVec3::Z);
        assert!(tree.intersect(&mut offset).is_none());
        assert_eq!(offset.max_t, f64::INFINITY);
        assert!(!tree.intersect_test(&offset));
    }

    #[test]
    fn test_hit_outside_range_is_ignored() {
        let tree = tree_of(&[mesh_of(&[unit_triangle()])], TreeConfig::default());

        let mut short = Ray::with_range(DVec3::new(0.2, 0.2, -1.0), DVec3::Z, 0.0, 0.5);
        assert!(tree.intersect(&mut short).is_none());
        assert_eq!(short.max_t, 0.5);

        let mut late = Ray::with_range(DVec3::new(0.2, 0.2, -1.0), DVec3::Z, 1.5, f64::INFINITY);
        assert!(tree.intersect(&mut late).is_none());
    }

    #[test]
    fn test_reports_owning_mesh() {
        let near = layer(0.0, 1.0);
        let far = layer(0.0, 2.0);
        let aside = layer(5.0, 1.0);

        let tree = tree_of(&[mesh_of(&[far]), mesh_of(&[aside, near])], TreeConfig::default());

        let mut ray = Ray::new(DVec3::new(0.2, 0.2, 0.0), DVec3::Z);
        let hit = tree.intersect(&mut ray).unwrap();
        assert_eq!(hit.mesh, MeshId(1));
        assert_eq!(hit.triangle, 1);
        assert!((hit.t - 1.0).abs() < 1e-12);

        // Starting past the near layer finds the far one
        let mut ray = Ray::with_range(DVec3::new(0.2, 0.2, 0.0), DVec3::Z, 1.5, f64::INFINITY);
        let hit = tree.intersect(&mut ray).unwrap();
        assert_eq!(hit.mesh, MeshId(0));
        assert_eq!(hit.triangle, 0);
    }

    #[test]
    fn test_matches_brute_force() {
        let mut rng = StdRng::seed_from_u64(42);
        let meshes: Vec<_> = (0..3).map(|_| mesh_of(&random_soup(&mut rng, 300))).collect();
        let tree = tree_of(&meshes, TreeConfig::default());
        assert!(tree.stats().nodes > 0);

        let mut hits = 0;
        for _ in 0..2000 {
            let original = random_ray(&mut rng);
            let mut ray = original;

            let expected = brute_force(&meshes, &original);
            let actual = tree.intersect(&mut ray);

            match (expected, actual) {
                (Some(t), Some(hit)) => {
                    hits += 1;
                    assert!((hit.t - t).abs() < 1e-9, "tree t {} vs brute force t {}", hit.t, t);
                    assert_eq!(ray.max_t, hit.t);

                    // The reported triangle really is hit at that distance
                    let mesh = tree.mesh(hit.mesh).unwrap();
                    let triangle = mesh.triangle_vertices(hit.triangle);
                    let check = intersect_triangle(&triangle, &original).unwrap();
                    assert!((check.t - hit.t).abs() < 1e-9);
                }
                (None, None) => assert_eq!(ray, original),
                (expected, actual) => panic!("brute force {:?} vs tree {:?}", expected, actual),
            }

            assert_eq!(tree.intersect_test(&original), expected.is_some());
        }
        assert!(hits > 100, "too few hits ({}) to be meaningful", hits);
    }

    #[test]
    fn test_intersect_many_matches_sequential() {
        let mut rng = StdRng::seed_from_u64(11);
        let tree = tree_of(&[mesh_of(&random_soup(&mut rng, 500))], TreeConfig::default());

        let rays: Vec<Ray> = (0..512).map(|_| random_ray(&mut rng)).collect();
        let mut parallel = rays.clone();
        let results = tree.intersect_many(&mut parallel);

        for ((ray, narrowed), result) in rays.iter().zip(&parallel).zip(&results) {
            let mut sequential = *ray;
            assert_eq!(tree.intersect(&mut sequential), *result);
            assert_eq!(sequential, *narrowed);
        }
    }

    #[test]
    fn test_coincident_triangles_terminate() {
        let p = Vec3::new(1.0, 2.0, 3.0);
        let points = vec![Triangle3::new(p, p, p); 50];
        let tree = tree_of(&[mesh_of(&points)], TreeConfig::default());

        let stats = tree.stats();
        assert_eq!(stats.leaves, 1);
        assert_eq!(stats.nodes, 3);
        assert_eq!(stats.max_leaf_size, 50);

        let mut ray = Ray::new(DVec3::new(1.0, 2.0, 0.0), DVec3::Z);
        assert!(tree.intersect(&mut ray).is_none());
    }

    #[test]
    fn test_stacked_identical_triangles() {
        let copies = vec![unit_triangle(); 30];
        let tree = tree_of(&[mesh_of(&copies)], TreeConfig::default());

        // Every copy straddles every midplane, so only the axis mask ends the recursion
        assert_eq!(tree.stats().max_leaf_size, 30);

        let mut ray = Ray::new(DVec3::new(0.25, 0.25, -1.0), DVec3::Z);
        let hit = tree.intersect(&mut ray).unwrap();
        assert!((hit.t - 1.0).abs() < 1e-12);
    }

    /// Triangles whose corners are `scale * u + shift` with `u` uniform in `[-1, 1)`.
    fn scaled_soup(rng: &mut StdRng, count: usize, scale: f32, shift: f32) -> Vec<Triangle3> {
        let mut corner = || {
            let u = Vec3::new(
                rng.gen_range(-1.0..1.0),
                rng.gen_range(-1.0..1.0),
                rng.gen_range(-1.0..1.0),
            );
            u * scale + Vec3::splat(shift)
        };
        (0..count)
            .map(|_| Triangle3::new(corner(), corner(), corner()))
            .collect()
    }

    #[test]
    fn test_large_finite_coordinates_terminate() {
        let mut rng = StdRng::seed_from_u64(13);
        // All corners in [2e38, 2.8e38]: min + max would overflow f32
        let same_sign = scaled_soup(&mut rng, 20, 0.4e38, 2.4e38);
        // Corners spanning almost the whole f32 range: max - min would overflow
        let full_span = scaled_soup(&mut rng, 30, 3e38, 0.0);

        for triangles in [same_sign, full_span] {
            assert!(triangles.iter().all(|t| t.vertices.iter().all(|v| v.is_finite())));
            let meshes = [mesh_of(&triangles)];
            let tree = tree_of(&meshes, TreeConfig::default());

            let stats = tree.stats();
            assert!(tree.is_built());
            assert_eq!(stats.triangles, triangles.len());
            assert!(stats.nodes > 0);

            // Aim at each centroid, computed in f64 to stay finite
            for triangle in &triangles {
                let [a, b, c] = triangle.vertices.map(|v| v.as_dvec3());
                let ray = Ray::new(DVec3::ZERO, (a + b + c) / 3.0);

                let mut narrowed = ray;
                let hit = tree.intersect(&mut narrowed);
                let expected = brute_force(&meshes, &ray);
                assert_eq!(hit.map(|h| h.t), expected);
            }
        }
    }

    #[test]
    fn test_structure_invariants() {
        let mut rng = StdRng::seed_from_u64(5);
        let meshes: Vec<_> = (0..2).map(|_| mesh_of(&random_soup(&mut rng, 400))).collect();
        let tree = tree_of(&meshes, TreeConfig::default());

        let mut covered = vec![0usize; tree.triangle_count()];
        let mut stack = vec![tree.root.unwrap()];
        while let Some(child) = stack.pop() {
            match child {
                Child::Node(handle) => {
                    let node = &tree.nodes[handle];
                    assert!((1..=3).contains(&node.child_count()));

                    let mut next = node.begin;
                    for &c in node.children.iter().flatten() {
                        let (begin, end) = match c {
                            Child::Node(h) => (tree.nodes[h].begin, tree.nodes[h].end),
                            Child::Leaf(h) => (tree.leaves[h].begin, tree.leaves[h].end),
                        };
                        // Children tile the parent range in order
                        assert_eq!(begin, next);
                        assert!(begin < end);
                        next = end;
                        stack.push(c);
                    }
                    assert_eq!(next, node.end);
                }
                Child::Leaf(handle) => {
                    let leaf = &tree.leaves[handle];
                    let entries = &tree.buffer.entries()[leaf.begin..leaf.end];
                    for (i, entry) in entries.iter().enumerate() {
                        assert!(leaf.bbox.inside_triangle(&entry.triangle));
                        covered[leaf.begin + i] += 1;
                    }
                }
            }
        }
        assert!(covered.iter().all(|&n| n == 1));

        // Tags still match the mesh data after partitioning
        for entry in tree.buffer.entries() {
            let mesh = tree.mesh(entry.mesh).unwrap();
            assert_eq!(entry.triangle, mesh.triangle_vertices(entry.index));
        }
    }

    #[test]
    fn test_world_bounds() {
        let a = Triangle3::new(Vec3::new(-1.0, 0.0, 0.0), Vec3::X, Vec3::Y);
        let b = Triangle3::new(
            Vec3::new(0.0, 0.0, 4.0),
            Vec3::new(0.0, -3.0, 4.0),
            Vec3::new(2.0, 0.0, 4.0),
        );
        let tree = tree_of(&[mesh_of(&[a]), mesh_of(&[b])], TreeConfig::default());

        let bounds = tree.world_bounds().unwrap();
        assert_eq!(bounds.min, Vec3::new(-1.0, -3.0, 0.0));
        assert_eq!(bounds.max, Vec3::new(2.0, 1.0, 4.0));
    }

    #[test]
    fn test_tree_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<TriangleTree>();
    }
}
