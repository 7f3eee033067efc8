/// A closed parametric range `[min, max]` along a ray.
///
/// An interval with `min > max` is empty.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Interval {
    pub min: f64,
    pub max: f64,
}

impl Interval {
    /// Create a new interval given min and max values.
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Returns true if x is within the interval [min, max] (inclusive).
    pub fn contains(&self, x: f64) -> bool {
        self.min <= x && x <= self.max
    }

    /// Returns true if no value lies in the interval.
    pub fn is_empty(&self) -> bool {
        self.min > self.max
    }

    /// Narrows this interval to its overlap with `[near, far]`.
    ///
    /// NaN bounds leave the corresponding side untouched.
    pub fn clip(&self, near: f64, far: f64) -> Interval {
        let min = if near > self.min { near } else { self.min };
        let max = if far < self.max { far } else { self.max };
        Interval::new(min, max)
    }

    /// An empty interval (min > max, contains nothing).
    pub const EMPTY: Interval = Interval {
        min: f64::INFINITY,
        max: f64::NEG_INFINITY,
    };
}
