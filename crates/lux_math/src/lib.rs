// Re-export glam for convenience
pub use glam::*;

// Lux math types
mod bbox;
mod interval;
mod ray;
mod triangle;

pub use bbox::BoundingBox;
pub use interval::Interval;
pub use ray::Ray;
pub use triangle::Triangle3;
