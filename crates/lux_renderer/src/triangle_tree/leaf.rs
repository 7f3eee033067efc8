//! Terminal tree elements and the ray/triangle test.

use lux_math::{BoundingBox, DVec3, Ray, Triangle3};

use super::buffer::{TriangleBuffer, TriangleEntry};

/// Padding of the barycentric simplex so that rays through shared edges hit
/// at least one of the neighbouring triangles.
const BARYCENTRIC_EPSILON: f64 = f64::EPSILON;

/// Parametric distance and barycentric coordinates of a ray/triangle hit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct TriangleIntersection {
    pub t: f64,
    pub b1: f64,
    pub b2: f64,
}

/// Best hit found so far during a nearest-hit traversal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Candidate {
    /// Absolute index into the triangle buffer
    pub entry: usize,
    pub hit: TriangleIntersection,
}

/// Möller-Trumbore ray/triangle intersection in double precision.
///
/// The parametric range of the ray is not checked here. A zero determinant
/// (ray parallel to the triangle plane, or a degenerate triangle) is a miss;
/// the comparison is exact on purpose.
pub(crate) fn intersect_triangle(triangle: &Triangle3, ray: &Ray) -> Option<TriangleIntersection> {
    let v0 = triangle[0].as_dvec3();
    let e1 = triangle[1].as_dvec3() - v0;
    let e2 = triangle[2].as_dvec3() - v0;

    let s1 = ray.direction.cross(e2);
    let divisor = s1.dot(e1);
    if divisor == 0.0 {
        return None;
    }
    let inv_divisor = 1.0 / divisor;

    // First barycentric coordinate
    let d = ray.origin - v0;
    let b1 = d.dot(s1) * inv_divisor;
    if b1 < -BARYCENTRIC_EPSILON || b1 > 1.0 + BARYCENTRIC_EPSILON {
        return None;
    }

    // Second barycentric coordinate
    let s2 = d.cross(e1);
    let b2 = ray.direction.dot(s2) * inv_divisor;
    if b2 < -BARYCENTRIC_EPSILON || b1 + b2 > 1.0 + BARYCENTRIC_EPSILON {
        return None;
    }

    let t = e2.dot(s2) * inv_divisor;
    Some(TriangleIntersection { t, b1, b2 })
}

/// A tree element without children owning the range `[begin, end)` of the
/// triangle buffer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Leaf {
    pub bbox: BoundingBox,
    pub begin: usize,
    pub end: usize,
}

impl Leaf {
    pub fn new(buffer: &TriangleBuffer, begin: usize, end: usize) -> Self {
        Self {
            bbox: buffer.bounds(begin, end),
            begin,
            end,
        }
    }

    pub fn len(&self) -> usize {
        self.end - self.begin
    }

    /// Test every triangle of the leaf, keeping the closest hit inside the
    /// ray's live range. Each accepted hit shrinks `ray.max_t`.
    pub fn intersect(
        &self,
        triangles: &[TriangleEntry],
        ray: &mut Ray,
        inv_direction: DVec3,
        best: &mut Option<Candidate>,
    ) {
        if self.bbox.intersect_inv(ray, inv_direction).is_none() {
            return;
        }

        for (entry, e) in triangles[self.begin..self.end]
            .iter()
            .enumerate()
            .map(|(offset, e)| (self.begin + offset, e))
        {
            let Some(hit) = intersect_triangle(&e.triangle, ray) else {
                continue;
            };
            if hit.t >= ray.min_t && hit.t <= ray.max_t {
                ray.max_t = hit.t;
                *best = Some(Candidate { entry, hit });
            }
        }
    }

    /// True as soon as any triangle of the leaf is hit inside the ray's range.
    pub fn intersect_test(
        &self,
        triangles: &[TriangleEntry],
        ray: &Ray,
        inv_direction: DVec3,
    ) -> bool {
        if self.bbox.intersect_inv(ray, inv_direction).is_none() {
            return false;
        }

        triangles[self.begin..self.end].iter().any(|e| {
            intersect_triangle(&e.triangle, ray).is_some_and(|hit| ray.range().contains(hit.t))
        })
    }
}
