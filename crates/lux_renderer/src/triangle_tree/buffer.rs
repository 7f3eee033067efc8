//! Flattened triangle storage shared by every node of a tree.

use std::sync::Arc;

use lux_core::TriangleMesh;
use lux_math::{BoundingBox, Triangle3};

/// Identifier of a mesh registered with a [`TriangleTree`](super::TriangleTree).
///
/// Ids are assigned in registration order, starting at 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MeshId(pub(crate) usize);

impl MeshId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// One triangle of the buffer, tagged with where it came from.
///
/// The tags travel with the corners whenever entries are reordered.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct TriangleEntry {
    pub triangle: Triangle3,
    pub mesh: MeshId,
    /// Index of the triangle within its mesh
    pub index: usize,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct TriangleBuffer {
    entries: Vec<TriangleEntry>,
}

impl TriangleBuffer {
    /// Copy every triangle of every mesh into a single buffer.
    pub fn flatten(meshes: &[Arc<TriangleMesh>]) -> Self {
        let total = meshes.iter().map(|m| m.triangle_count()).sum();
        let mut entries = Vec::with_capacity(total);

        for (mesh_index, mesh) in meshes.iter().enumerate() {
            entries.extend((0..mesh.triangle_count()).map(|index| TriangleEntry {
                triangle: mesh.triangle_vertices(index),
                mesh: MeshId(mesh_index),
                index,
            }));
        }

        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[TriangleEntry] {
        &self.entries
    }

    /// Bounding box of the triangles in `[begin, end)`.
    pub fn bounds(&self, begin: usize, end: usize) -> BoundingBox {
        self.entries[begin..end]
            .iter()
            .flat_map(|e| e.triangle.vertices)
            .fold(BoundingBox::EMPTY, |bbox, p| bbox.union_point(p))
    }

    /// Reorder `[begin, end)` in a single pass into three contiguous groups
    /// along `axis`: triangles entirely below `divider`, triangles touching or
    /// crossing it, and triangles entirely above it.
    ///
    /// Returns `(l1, r1)` such that the groups are `[begin, l1)`, `[l1, r1)`
    /// and `[r1, end)`.
    pub fn partition(
        &mut self,
        begin: usize,
        end: usize,
        axis: usize,
        divider: f32,
    ) -> (usize, usize) {
        let (mut l1, mut r1) = (begin, end);
        let mut i = begin;

        while i < r1 {
            let (min, max) = self.entries[i].triangle.axis_range(axis);
            if max < divider {
                self.entries.swap(l1, i);
                l1 += 1;
                i += 1;
            } else if min > divider {
                r1 -= 1;
                self.entries.swap(i, r1);
            } else {
                i += 1;
            }
        }

        (l1, r1)
    }
}
