//! 2D coordinates and displacements
//!
//! Grid units: x grows to the right, y grows downward, one cell is 1.0.

use glam::Vec2;

/// Immutable 2D vector. Every operation returns a new value.
pub type Vector = Vec2;

/// Named vector arithmetic used by the simulation
pub trait VectorExt {
    /// Component-wise sum
    fn plus(self, other: Vector) -> Vector;
    /// Scale both components
    fn times(self, factor: f32) -> Vector;
}

impl VectorExt for Vector {
    #[inline]
    fn plus(self, other: Vector) -> Vector {
        Vector::new(self.x + other.x, self.y + other.y)
    }

    #[inline]
    fn times(self, factor: f32) -> Vector {
        Vector::new(self.x * factor, self.y * factor)
    }
}
