use crate::{DVec3, Interval};

/// A segment of a ray in 3D space.
///
/// The ray starts at `origin`, travels along `direction` (not necessarily
/// normalized) and is restricted to the parametric range `[min_t, max_t]`.
/// Intersection queries narrow `max_t` in place as closer hits are found,
/// which is why they take the ray by `&mut`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Ray {
    pub origin: DVec3,
    pub direction: DVec3,
    pub min_t: f64,
    pub max_t: f64,
}

impl Ray {
    /// Create a ray over the parametric range `[0, +inf)`.
    pub fn new(origin: DVec3, direction: DVec3) -> Self {
        Self::with_range(origin, direction, 0.0, f64::INFINITY)
    }

    /// Create a ray over the parametric range `[min_t, max_t]`.
    pub fn with_range(origin: DVec3, direction: DVec3, min_t: f64, max_t: f64) -> Self {
        Self {
            origin,
            direction,
            min_t,
            max_t,
        }
    }

    /// Get the point along the ray at parameter t.
    ///
    /// Returns: origin + t * direction
    #[inline]
    pub fn at(&self, t: f64) -> DVec3 {
        self.origin + self.direction * t
    }

    /// The live parametric range of the ray.
    #[inline]
    pub fn range(&self) -> Interval {
        Interval::new(self.min_t, self.max_t)
    }

    /// Component-wise reciprocal of the direction.
    ///
    /// Zero components become signed infinities, which the slab test relies on.
    #[inline]
    pub fn inv_direction(&self) -> DVec3 {
        DVec3::ONE / self.direction
    }
}

impl Default for Ray {
    fn default() -> Self {
        Self::new(DVec3::ZERO, DVec3::Z)
    }
}
