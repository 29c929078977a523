//! Fixed-size 3D grid of cell states

use itertools::iproduct;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Errors raised by grid construction and wholesale replacement
#[derive(Debug, Error, PartialEq, Eq)]
pub enum GridError {
    #[error("grid dimensions must be non-zero on every axis, got {0}")]
    EmptyDimension(Dimensions),
    #[error("grid {0} is too large: each axis must fit in i32 and the cell count in isize")]
    TooLarge(Dimensions),
    #[error("replacement grid is {actual}, store is fixed at {expected}")]
    DimensionMismatch {
        expected: Dimensions,
        actual: Dimensions,
    },
}

/// Extent of a grid along each axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Dimensions {
    pub x: usize,
    pub y: usize,
    pub z: usize,
}

impl Dimensions {
    pub fn new(x: usize, y: usize, z: usize) -> Self {
        Self { x, y, z }
    }

    /// Same extent on all three axes
    pub fn cube(size: usize) -> Self {
        Self::new(size, size, size)
    }

    /// Number of cells, `None` if the product overflows
    pub fn volume(&self) -> Option<usize> {
        self.x.checked_mul(self.y)?.checked_mul(self.z)
    }

    /// Cell count of a grid with these dimensions, or why it cannot be built
    pub fn validate(&self) -> Result<usize, GridError> {
        if self.x == 0 || self.y == 0 || self.z == 0 {
            return Err(GridError::EmptyDimension(*self));
        }

        let max_axis = i32::MAX as usize;
        if self.x > max_axis || self.y > max_axis || self.z > max_axis {
            return Err(GridError::TooLarge(*self));
        }

        match self.volume() {
            Some(volume) if volume <= isize::MAX as usize => Ok(volume),
            _ => Err(GridError::TooLarge(*self)),
        }
    }
}

impl fmt::Display for Dimensions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}x{}", self.x, self.y, self.z)
    }
}

/// Integer cell address. Signed so that negative input is simply out of range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Coord {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl Coord {
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }
}

impl From<(i32, i32, i32)> for Coord {
    fn from((x, y, z): (i32, i32, i32)) -> Self {
        Self::new(x, y, z)
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}

/// Alive/dead tallies over a whole grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellCounts {
    pub alive: usize,
    pub dead: usize,
}

/// Dense boolean voxel grid. Dimensions never change after construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    dimensions: Dimensions,
    cells: Vec<bool>,
}

impl Grid {
    /// Create an all-dead grid
    pub fn new(dimensions: Dimensions) -> Result<Self, GridError> {
        let volume = dimensions.validate()?;

        Ok(Self {
            dimensions,
            cells: vec![false; volume],
        })
    }

    /// Create a grid with the given cells alive; out-of-range coordinates are skipped
    pub fn with_alive<I>(dimensions: Dimensions, alive: I) -> Result<Self, GridError>
    where
        I: IntoIterator<Item = Coord>,
    {
        let mut grid = Self::new(dimensions)?;
        for coord in alive {
            grid.set(coord.x, coord.y, coord.z, true);
        }
        Ok(grid)
    }

    pub fn dimensions(&self) -> Dimensions {
        self.dimensions
    }

    pub fn total_cells(&self) -> usize {
        self.cells.len()
    }

    /// Linear index, x outer, y middle, z inner
    #[inline]
    pub(crate) fn index(&self, x: usize, y: usize, z: usize) -> usize {
        (x * self.dimensions.y + y) * self.dimensions.z + z
    }

    /// Inverse of `index`
    #[inline]
    pub(crate) fn coord_of(&self, idx: usize) -> Coord {
        let z = idx % self.dimensions.z;
        let y = (idx / self.dimensions.z) % self.dimensions.y;
        let x = idx / (self.dimensions.z * self.dimensions.y);
        Coord::new(x as i32, y as i32, z as i32)
    }

    #[inline]
    pub fn in_bounds(&self, x: i32, y: i32, z: i32) -> bool {
        x >= 0
            && y >= 0
            && z >= 0
            && (x as usize) < self.dimensions.x
            && (y as usize) < self.dimensions.y
            && (z as usize) < self.dimensions.z
    }

    fn checked_index(&self, x: i32, y: i32, z: i32) -> Option<usize> {
        if self.in_bounds(x, y, z) {
            Some(self.index(x as usize, y as usize, z as usize))
        } else {
            None
        }
    }

    /// Cell state; anything outside the grid reads as dead
    pub fn get(&self, x: i32, y: i32, z: i32) -> bool {
        self.checked_index(x, y, z)
            .map(|idx| self.cells[idx])
            .unwrap_or(false)
    }

    pub fn get_coord(&self, coord: Coord) -> bool {
        self.get(coord.x, coord.y, coord.z)
    }

    /// Write a cell state. Returns whether the write landed; out-of-range writes are ignored.
    pub fn set(&mut self, x: i32, y: i32, z: i32, alive: bool) -> bool {
        match self.checked_index(x, y, z) {
            Some(idx) => {
                self.cells[idx] = alive;
                true
            }
            None => false,
        }
    }

    pub fn set_coord(&mut self, coord: Coord, alive: bool) -> bool {
        self.set(coord.x, coord.y, coord.z, alive)
    }

    /// Kill every cell
    pub fn clear(&mut self) {
        self.cells.fill(false);
    }

    /// Make each cell alive independently with probability `probability_alive`.
    /// Draws exactly one value from `rng` per cell, in ordinal order.
    pub fn randomize<R: Rng>(&mut self, probability_alive: f64, rng: &mut R) {
        let p = if probability_alive.is_nan() {
            0.0
        } else {
            probability_alive.clamp(0.0, 1.0)
        };
        for cell in self.cells.iter_mut() {
            *cell = rng.random_bool(p);
        }
    }

    /// Swap in the contents of `next`, which must have identical dimensions
    pub fn replace(&mut self, next: Grid) -> Result<(), GridError> {
        if next.dimensions != self.dimensions {
            return Err(GridError::DimensionMismatch {
                expected: self.dimensions,
                actual: next.dimensions,
            });
        }
        self.cells = next.cells;
        Ok(())
    }

    /// Live cells among the 26 surrounding positions. No wraparound.
    pub fn count_neighbors(&self, x: i32, y: i32, z: i32) -> u8 {
        let mut count = 0;

        for dx in -1..=1 {
            for dy in -1..=1 {
                for dz in -1..=1 {
                    if dx == 0 && dy == 0 && dz == 0 {
                        continue;
                    }
                    // Positions past the i32 range are outside any grid
                    let (Some(nx), Some(ny), Some(nz)) =
                        (x.checked_add(dx), y.checked_add(dy), z.checked_add(dz))
                    else {
                        continue;
                    };
                    if self.get(nx, ny, nz) {
                        count += 1;
                    }
                }
            }
        }

        count
    }

    /// Every coordinate in ordinal order
    pub fn coords(&self) -> impl Iterator<Item = Coord> {
        let Dimensions { x, y, z } = self.dimensions;
        iproduct!(0..x, 0..y, 0..z).map(|(x, y, z)| Coord::new(x as i32, y as i32, z as i32))
    }

    /// Live coordinates in ordinal order
    pub fn alive_cells(&self) -> Vec<Coord> {
        self.cells
            .iter()
            .enumerate()
            .filter(|&(_, &alive)| alive)
            .map(|(idx, _)| self.coord_of(idx))
            .collect()
    }

    pub fn alive_count(&self) -> usize {
        self.cells.iter().filter(|&&cell| cell).count()
    }

    pub fn dead_count(&self) -> usize {
        self.total_cells() - self.alive_count()
    }

    pub fn cell_counts(&self) -> CellCounts {
        let alive = self.alive_count();
        CellCounts {
            alive,
            dead: self.total_cells() - alive,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.cells.iter().all(|&cell| !cell)
    }

    pub(crate) fn cells(&self) -> &[bool] {
        &self.cells
    }

    pub(crate) fn from_raw(dimensions: Dimensions, cells: Vec<bool>) -> Self {
        debug_assert_eq!(Some(cells.len()), dimensions.volume());
        Self { dimensions, cells }
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for x in 0..self.dimensions.x as i32 {
            for y in 0..self.dimensions.y as i32 {
                for z in 0..self.dimensions.z as i32 {
                    let symbol = if self.get(x, y, z) { '■' } else { '□' };
                    write!(f, "{}", symbol)?;
                }
                writeln!(f)?;
            }
            if (x as usize) + 1 < self.dimensions.x {
                writeln!(f)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn cube(size: usize) -> Grid {
        Grid::new(Dimensions::cube(size)).unwrap()
    }

    #[test]
    fn test_grid_creation() {
        let grid = Grid::new(Dimensions::new(2, 3, 4)).unwrap();
        assert_eq!(grid.total_cells(), 24);
        assert_eq!(grid.dimensions(), Dimensions::new(2, 3, 4));
        assert!(grid.is_empty());
    }

    #[test]
    fn test_zero_dimension_rejected() {
        let err = Grid::new(Dimensions::new(3, 0, 3)).unwrap_err();
        assert_eq!(err, GridError::EmptyDimension(Dimensions::new(3, 0, 3)));
    }

    #[test]
    fn test_oversized_dimensions_rejected() {
        let wide = Dimensions::new(usize::MAX / 2, usize::MAX / 2, 1);
        assert_eq!(wide.volume(), None);
        assert_eq!(Grid::new(wide).unwrap_err(), GridError::TooLarge(wide));

        let axis = Dimensions::new(i32::MAX as usize + 1, 1, 1);
        assert_eq!(Grid::new(axis).unwrap_err(), GridError::TooLarge(axis));

        let max = i32::MAX as usize;
        let product = Dimensions::new(max, max, max);
        assert_eq!(Grid::new(product).unwrap_err(), GridError::TooLarge(product));

        assert_eq!(Dimensions::new(2, 3, 4).validate(), Ok(24));
    }

    #[test]
    fn test_neighbor_count_near_i32_limits() {
        let grid = Grid::with_alive(Dimensions::cube(2), [Coord::new(0, 0, 0)]).unwrap();
        assert_eq!(grid.count_neighbors(i32::MAX, i32::MAX, i32::MAX), 0);
        assert_eq!(grid.count_neighbors(i32::MIN, 0, 0), 0);
        assert_eq!(grid.count_neighbors(1, 1, 1), 1);
    }

    #[test]
    fn test_index_ordering() {
        let grid = Grid::new(Dimensions::new(2, 3, 4)).unwrap();
        assert_eq!(grid.index(0, 0, 0), 0);
        assert_eq!(grid.index(0, 0, 1), 1);
        assert_eq!(grid.index(0, 1, 0), 4);
        assert_eq!(grid.index(1, 0, 0), 12);
        assert_eq!(grid.index(1, 2, 3), 23);
        assert_eq!(grid.coord_of(23), Coord::new(1, 2, 3));
        assert_eq!(grid.coord_of(5), Coord::new(0, 1, 1));
    }

    #[test]
    fn test_get_set_out_of_bounds() {
        let mut grid = cube(3);
        assert!(grid.set(1, 2, 0, true));
        assert!(grid.get(1, 2, 0));

        assert!(!grid.set(3, 0, 0, true));
        assert!(!grid.set(-1, 0, 0, true));
        assert!(!grid.set(0, 0, 99, true));
        assert!(!grid.get(3, 0, 0));
        assert!(!grid.get(-1, -1, -1));
        assert_eq!(grid.alive_count(), 1);
    }

    #[test]
    fn test_clear() {
        let mut grid = cube(4);
        let mut rng = StdRng::seed_from_u64(7);
        grid.randomize(0.5, &mut rng);
        grid.clear();

        for coord in grid.coords() {
            assert!(!grid.get_coord(coord));
        }
    }

    #[test]
    fn test_randomize_reproducible() {
        let mut a = cube(6);
        let mut b = cube(6);
        a.randomize(0.5, &mut StdRng::seed_from_u64(42));
        b.randomize(0.5, &mut StdRng::seed_from_u64(42));
        assert_eq!(a, b);
        assert!(a.alive_count() > 0);
        assert!(a.dead_count() > 0);
    }

    #[test]
    fn test_randomize_extremes() {
        let mut grid = cube(3);
        let mut rng = StdRng::seed_from_u64(1);
        grid.randomize(1.0, &mut rng);
        assert_eq!(grid.alive_count(), 27);
        grid.randomize(0.0, &mut rng);
        assert!(grid.is_empty());
        // Clamped rather than panicking
        grid.randomize(3.0, &mut rng);
        assert_eq!(grid.alive_count(), 27);
    }

    #[test]
    fn test_replace() {
        let mut store = cube(3);
        let next = Grid::with_alive(Dimensions::cube(3), [Coord::new(1, 1, 1)]).unwrap();
        store.replace(next).unwrap();
        assert!(store.get(1, 1, 1));

        let wrong = Grid::with_alive(Dimensions::new(3, 3, 4), [Coord::new(0, 0, 0)]).unwrap();
        let err = store.replace(wrong).unwrap_err();
        assert!(matches!(err, GridError::DimensionMismatch { .. }));
        assert!(store.get(1, 1, 1));
        assert!(!store.get(0, 0, 0));
        assert_eq!(store.dimensions(), Dimensions::cube(3));
    }

    #[test]
    fn test_neighbor_counting_interior_and_boundary() {
        let mut full = cube(3);
        full.randomize(1.0, &mut StdRng::seed_from_u64(0));

        // Interior cell sees all 26 positions
        assert_eq!(full.count_neighbors(1, 1, 1), 26);
        // Corner sees only the 7 in-bounds positions
        assert_eq!(full.count_neighbors(0, 0, 0), 7);
        // Edge centre: 11 in bounds
        assert_eq!(full.count_neighbors(1, 0, 0), 11);
        // Face centre: 17 in bounds
        assert_eq!(full.count_neighbors(1, 1, 0), 17);
    }

    #[test]
    fn test_no_wraparound() {
        let grid = Grid::with_alive(Dimensions::cube(4), [Coord::new(3, 3, 3)]).unwrap();
        assert_eq!(grid.count_neighbors(0, 0, 0), 0);
        assert_eq!(grid.count_neighbors(2, 2, 2), 1);
    }

    #[test]
    fn test_alive_cells_ordinal_order() {
        let grid = Grid::with_alive(
            Dimensions::cube(3),
            [Coord::new(2, 0, 0), Coord::new(0, 0, 2), Coord::new(0, 1, 0)],
        )
        .unwrap();
        assert_eq!(
            grid.alive_cells(),
            vec![Coord::new(0, 0, 2), Coord::new(0, 1, 0), Coord::new(2, 0, 0)]
        );
        assert_eq!(grid.cell_counts(), CellCounts { alive: 3, dead: 24 });
    }

    #[test]
    fn test_display() {
        let grid = Grid::with_alive(Dimensions::new(2, 1, 2), [Coord::new(1, 0, 1)]).unwrap();
        assert_eq!(grid.to_string(), "□□\n\n□■\n");
    }
}
