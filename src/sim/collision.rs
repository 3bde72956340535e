//! Axis-aligned box overlap and grid coverage
//!
//! Every collision in the game is a rectangle test: actor against actor, or
//! actor against the grid cells its box covers.

use super::vector::Vector;

/// An axis-aligned box given by its top-left corner and extent
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vector,
    pub max: Vector,
}

impl Aabb {
    pub fn new(position: Vector, size: Vector) -> Self {
        Self {
            min: position,
            max: position + size,
        }
    }

    /// Strict overlap on both axes
    ///
    /// Boxes that only share an edge or a corner do not overlap.
    #[inline]
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.max.x > other.min.x
            && self.min.x < other.max.x
            && self.min.y < other.max.y
            && self.max.y > other.min.y
    }

    /// Grid cells touched by this box
    pub fn cells(&self) -> CellSpan {
        CellSpan {
            left: self.min.x.floor() as i32,
            right: self.max.x.ceil() as i32,
            top: self.min.y.floor() as i32,
            bottom: self.max.y.ceil() as i32,
        }
    }
}

/// Half-open range of grid cells `[left, right) x [top, bottom)`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellSpan {
    pub left: i32,
    pub right: i32,
    pub top: i32,
    pub bottom: i32,
}

impl CellSpan {
    /// Covered cells in row-major order
    pub fn iter(&self) -> impl Iterator<Item = (i32, i32)> + use<> {
        let (left, right) = (self.left, self.right);
        (self.top..self.bottom).flat_map(move |y| (left..right).map(move |x| (x, y)))
    }
}
