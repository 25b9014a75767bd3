use std::ops::Add;

use itertools::iproduct;

/// Offset into a 3-dimensional grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Offset3 {
    pub x: i64,
    pub y: i64,
    pub z: i64,
}

impl Offset3 {
    pub fn new(x: i64, y: i64, z: i64) -> Self {
        Self { x, y, z }
    }

    /// Converts the 3-dimensional offset into a 1-dimensional index.
    ///
    /// The 3-dimensional offset is an offset from the grid's "origin cell" at
    /// `(0, 0, 0)`. The grid has a finite size; `grid_size` specifies the
    /// width of the grid, in number of cells, in each dimension. The returned
    /// 1-dimensional index is an index into a flat vector that contains the
    /// cells of a grid, with `x` varying fastest.
    ///
    /// If the offset references a cell that is outside the bounds of the grid,
    /// then this will return `None`.
    pub fn into_grid_index1(self, grid_size: (usize, usize, usize)) -> Option<usize> {
        if self.x >= 0
            && (self.x as usize) < grid_size.0
            && self.y >= 0
            && (self.y as usize) < grid_size.1
            && self.z >= 0
            && (self.z as usize) < grid_size.2
        {
            Some(
                (self.x as usize)
                    + (self.y as usize) * grid_size.0
                    + (self.z as usize) * grid_size.0 * grid_size.1,
            )
        } else {
            None
        }
    }

    /// Moves the offset onto the nearest cell that exists in a grid of the
    /// given size. Every axis of `grid_size` must be at least 1.
    pub fn clamp_to_grid(self, grid_size: (usize, usize, usize)) -> Self {
        Self {
            x: self.x.clamp(0, grid_size.0 as i64 - 1),
            y: self.y.clamp(0, grid_size.1 as i64 - 1),
            z: self.z.clamp(0, grid_size.2 as i64 - 1),
        }
    }

    /// Returns the 1-dimensional indices of the cells in the 3×3×3 block
    /// centered on this offset, skipping cells that fall outside the grid.
    ///
    /// Cells are visited with `z` varying slowest and `x` fastest.
    pub fn neighborhood_index1s(
        self,
        grid_size: (usize, usize, usize),
    ) -> impl Iterator<Item = usize> {
        iproduct!(-1..=1, -1..=1, -1..=1).filter_map(move |(dz, dy, dx)| {
            (self + Offset3::new(dx, dy, dz)).into_grid_index1(grid_size)
        })
    }
}

impl Add for Offset3 {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self {
            x: self.x + other.x,
            y: self.y + other.y,
            z: self.z + other.z,
        }
    }
}
