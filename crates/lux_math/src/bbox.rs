use crate::{DVec3, Interval, Ray, Triangle3, Vec3};

/// Axis-aligned bounding box used by the spatial acceleration structures.
///
/// The corners are stored exactly as given: a box whose `max` is below its
/// `min` on some axis is a valid empty (inverted) box. [`BoundingBox::EMPTY`]
/// has `min = +inf` and `max = -inf` on every axis, so folding points or boxes
/// into it with [`BoundingBox::union_point`] / [`BoundingBox::union`] needs no
/// special case for the first element.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct BoundingBox {
    pub min: Vec3,
    pub max: Vec3,
}

impl BoundingBox {
    /// The identity element of [`BoundingBox::union`].
    pub const EMPTY: BoundingBox = BoundingBox {
        min: Vec3::INFINITY,
        max: Vec3::NEG_INFINITY,
    };

    /// Create a box from two corners. The corners are not reordered.
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// A zero-volume box around a single point.
    pub fn from_point(p: Vec3) -> Self {
        Self::new(p, p)
    }

    /// The tightest box containing all three corners of a triangle.
    pub fn from_triangle(triangle: &Triangle3) -> Self {
        Self::from_points(triangle.vertices)
    }

    /// The tightest box containing every point; [`BoundingBox::EMPTY`] for no points.
    pub fn from_points<I: IntoIterator<Item = Vec3>>(points: I) -> Self {
        points
            .into_iter()
            .fold(Self::EMPTY, |bbox, p| bbox.union_point(p))
    }

    /// The box expanded to contain `p`.
    pub fn union_point(&self, p: Vec3) -> Self {
        Self::new(self.min.min(p), self.max.max(p))
    }

    /// The box expanded to contain `other`.
    pub fn union(&self, other: &BoundingBox) -> Self {
        Self::new(self.min.min(other.min), self.max.max(other.max))
    }

    /// Per-axis size (`max - min`); negative components mean an inverted axis.
    pub fn extent(&self) -> Vec3 {
        self.max - self.min
    }

    /// Returns the center point of the bounding box.
    ///
    /// Halves before adding, so boxes near `f32::MAX` do not overflow.
    pub fn center(&self) -> Vec3 {
        self.min * 0.5 + self.max * 0.5
    }

    /// Midpoint of the box along `axis` (0=X, 1=Y, 2=Z).
    ///
    /// Never overflows for finite corners and never leaves `[min, max]`,
    /// including for subnormal coordinates where halving rounds.
    pub fn split_plane(&self, axis: usize) -> f32 {
        let (lo, hi) = (self.min[axis], self.max[axis]);
        (lo * 0.5 + hi * 0.5).max(lo).min(hi)
    }

    /// Surface area of the box.
    pub fn area(&self) -> f32 {
        let d = self.extent();
        2.0 * (d.x * d.y + d.y * d.z + d.z * d.x)
    }

    /// Signed volume of the box.
    ///
    /// Negative when an odd number of axes are inverted; never clamped.
    pub fn volume(&self) -> f32 {
        let d = self.extent();
        d.x * d.y * d.z
    }

    /// True if the box is inverted along any axis.
    pub fn is_empty(&self) -> bool {
        self.max.x < self.min.x || self.max.y < self.min.y || self.max.z < self.min.z
    }

    /// Checks if the point is inside the box. Points on faces, edges and
    /// corners count as inside.
    pub fn inside_point(&self, p: Vec3) -> bool {
        p.x >= self.min.x
            && p.y >= self.min.y
            && p.z >= self.min.z
            && p.x <= self.max.x
            && p.y <= self.max.y
            && p.z <= self.max.z
    }

    /// Checks if all three corners of the triangle are inside the box.
    pub fn inside_triangle(&self, triangle: &Triangle3) -> bool {
        triangle.vertices.iter().all(|&v| self.inside_point(v))
    }

    /// Slab test against the ray's live `[min_t, max_t]` range.
    ///
    /// Returns the narrowed parametric range where the ray is inside the box.
    pub fn intersect(&self, ray: &Ray) -> Option<Interval> {
        self.intersect_inv(ray, ray.inv_direction())
    }

    /// Slab test with a precomputed reciprocal direction (see [`Ray::inv_direction`]).
    ///
    /// Zero direction components must arrive as signed infinities: the slab
    /// distances then come out as `±inf` and the range check handles rays
    /// parallel to a slab without a special case.
    pub fn intersect_inv(&self, ray: &Ray, inv_direction: DVec3) -> Option<Interval> {
        let mut range = ray.range();
        for axis in 0..3 {
            let origin = ray.origin[axis];
            let inv = inv_direction[axis];

            let mut near = (f64::from(self.min[axis]) - origin) * inv;
            let mut far = (f64::from(self.max[axis]) - origin) * inv;
            if inv < 0.0 {
                std::mem::swap(&mut near, &mut far);
            }

            range = range.clip(near, far);
            if range.is_empty() {
                return None;
            }
        }
        Some(range)
    }
}

impl Default for BoundingBox {
    fn default() -> Self {
        Self::EMPTY
    }
}
