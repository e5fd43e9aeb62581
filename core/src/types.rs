use core::fmt;
use core::ops::{Add, Sub};
use serde::{Deserialize, Serialize};

/// Single coordinate axis used for board width, height, and positions.
pub type Coord = i32;

/// Count type used for mine counts and total-cell counts.
pub type CellCount = u32;

/// Two-dimensional integer coordinates, zero-based.
#[derive(
    Copy, Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct Vec2 {
    pub x: Coord,
    pub y: Coord,
}

impl Vec2 {
    pub const ZERO: Self = Self::new(0, 0);

    pub const fn new(x: Coord, y: Coord) -> Self {
        Self { x, y }
    }
}

impl Add for Vec2 {
    type Output = Vec2;

    fn add(self, rhs: Self) -> Self::Output {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Vec2 {
    type Output = Vec2;

    fn sub(self, rhs: Self) -> Self::Output {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl From<(Coord, Coord)> for Vec2 {
    fn from((x, y): (Coord, Coord)) -> Self {
        Self::new(x, y)
    }
}

impl fmt::Display for Vec2 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

pub(crate) trait ToNdIndex {
    type Output;
    fn to_nd_index(self) -> Self::Output;
}

impl ToNdIndex for Vec2 {
    type Output = [usize; 2];

    /// Rows first, so the array's logical order is row-major. Only valid for in-bounds coordinates.
    fn to_nd_index(self) -> Self::Output {
        [self.y as usize, self.x as usize]
    }
}

/// Checked `width * height`, `None` when it doesn't fit a [`CellCount`].
pub const fn mult(a: Coord, b: Coord) -> Option<CellCount> {
    if a < 0 || b < 0 {
        return None;
    }
    (a as CellCount).checked_mul(b as CellCount)
}

/// Moore neighborhood, in the order neighbors are visited.
pub const ADJACENT_OFFSETS: [Vec2; 8] = [
    Vec2::new(-1, -1),
    Vec2::new(-1, 0),
    Vec2::new(-1, 1),
    Vec2::new(0, -1),
    Vec2::new(0, 1),
    Vec2::new(1, -1),
    Vec2::new(1, 0),
    Vec2::new(1, 1),
];

/// Iterates the in-bounds neighbors of a coordinate.
///
/// Holds no borrow of the grid it was created from, so the grid can be mutated while iterating.
#[derive(Debug, Clone)]
pub struct NeighborIter {
    center: Vec2,
    bounds: Vec2,
    index: u8,
}

impl NeighborIter {
    pub(crate) fn new(center: Vec2, bounds: Vec2) -> Self {
        Self {
            center,
            bounds,
            index: 0,
        }
    }
}

impl Iterator for NeighborIter {
    type Item = Vec2;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(&offset) = ADJACENT_OFFSETS.get(usize::from(self.index)) {
            self.index += 1;

            let next = self.center + offset;
            if (0..self.bounds.x).contains(&next.x) && (0..self.bounds.y).contains(&next.y) {
                return Some(next);
            }
        }
        None
    }
}
