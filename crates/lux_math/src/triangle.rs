use std::ops::Index;

use crate::Vec3;

/// A triangle given by three single-precision corner positions.
#[derive(Debug, Copy, Clone, PartialEq, Default)]
pub struct Triangle3 {
    pub vertices: [Vec3; 3],
}

impl Triangle3 {
    pub fn new(v0: Vec3, v1: Vec3, v2: Vec3) -> Self {
        Self {
            vertices: [v0, v1, v2],
        }
    }

    /// Unit normal following the `v0, v1, v2` winding.
    ///
    /// Degenerate triangles return the zero vector.
    pub fn normal(&self) -> Vec3 {
        let [v0, v1, v2] = self.vertices;
        (v1 - v0).cross(v2 - v0).normalize_or_zero()
    }

    /// Surface area of the triangle.
    pub fn area(&self) -> f32 {
        let [v0, v1, v2] = self.vertices;
        0.5 * (v1 - v0).cross(v2 - v0).length()
    }

    /// Minimum and maximum coordinate of the corners along `axis` (0=X, 1=Y, 2=Z).
    ///
    /// NaN coordinates are ignored unless all three are NaN.
    #[inline]
    pub fn axis_range(&self, axis: usize) -> (f32, f32) {
        let [v0, v1, v2] = self.vertices;
        let (a, b, c) = (v0[axis], v1[axis], v2[axis]);
        (a.min(b).min(c), a.max(b).max(c))
    }
}

impl Index<usize> for Triangle3 {
    type Output = Vec3;

    fn index(&self, index: usize) -> &Vec3 {
        &self.vertices[index]
    }
}
