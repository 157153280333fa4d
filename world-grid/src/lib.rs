#![deny(clippy::all)]
#![forbid(unsafe_code)]

use rand::SeedableRng;
use rand::distr::uniform::{SampleRange, SampleUniform};
use rand::prelude::*;
use rand::rngs::SmallRng;
use std::fmt::Debug;
use std::mem;
use std::ops::{Index, IndexMut};

/// Something the pixels driver can advance and draw.
pub trait World {
    fn size(&self) -> GridSize;
    fn update(&mut self);
    /// One RGBA color per cell, in row-major order.
    fn cell_colors(&self) -> impl Iterator<Item = [u8; 4]> + '_;
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct GridSize {
    pub width: u32,
    pub height: u32,
}

impl GridSize {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn num_cells(&self) -> usize {
        self.width as usize * self.height as usize
    }

    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && (x as u32) < self.width && (y as u32) < self.height
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Topology {
    /// Edges wrap around, so every cell has eight neighbors.
    #[default]
    Toroidal,
    /// Off-grid neighbors don't exist.
    Bounded,
}

impl Topology {
    pub fn from_wrapping(edge_wrapping: bool) -> Self {
        if edge_wrapping {
            Topology::Toroidal
        } else {
            Topology::Bounded
        }
    }
}

/// Double-buffered cell storage. Readers see `cells`; writers fill
/// `next_cells`; `swap` makes the written generation current.
#[derive(Clone, Debug)]
pub struct WorldGrid<T>
where
    T: Copy + Default,
{
    pub cells: Plane<T>,
    pub next_cells: Plane<T>,
}

impl<T> WorldGrid<T>
where
    T: Copy + Default + Debug,
{
    pub fn new(size: GridSize) -> Self {
        Self {
            cells: Plane::new(size),
            next_cells: Plane::new(size),
        }
    }

    pub fn size(&self) -> GridSize {
        self.cells.size()
    }

    pub fn num_cells(&self) -> usize {
        self.cells.num_cells()
    }

    /// The current generation to read from and the next one to write to.
    pub fn split_mut(&mut self) -> (&Plane<T>, &mut Plane<T>) {
        (&self.cells, &mut self.next_cells)
    }

    pub fn swap(&mut self) {
        mem::swap(&mut self.next_cells, &mut self.cells);
    }
}

/// One value per cell, row-major, addressed by `row * width + col`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Plane<T>
where
    T: Copy + Default,
{
    cells: Vec<T>,
    size: GridSize,
}

impl<T> Plane<T>
where
    T: Copy + Default,
{
    pub fn new(size: GridSize) -> Self {
        assert!(size.width != 0 && size.height != 0);
        Self {
            cells: vec![T::default(); size.num_cells()],
            size,
        }
    }

    pub fn size(&self) -> GridSize {
        self.size
    }

    pub fn width(&self) -> u32 {
        self.size.width
    }

    pub fn height(&self) -> u32 {
        self.size.height
    }

    pub fn num_cells(&self) -> usize {
        self.cells.len()
    }

    pub fn as_slice(&self) -> &[T] {
        &self.cells
    }

    pub fn get(&self, loc: Loc) -> Option<&T> {
        loc.grid_index(self.size).map(|index| &self.cells[index])
    }

    pub fn get_mut(&mut self, loc: Loc) -> Option<&mut T> {
        loc.grid_index(self.size)
            .map(|index| &mut self.cells[index])
    }

    pub fn fill(&mut self, value: T) {
        self.cells.fill(value);
    }
}

impl<T> Index<Loc> for Plane<T>
where
    T: Copy + Default,
{
    type Output = T;

    fn index(&self, loc: Loc) -> &Self::Output {
        self.get(loc)
            .unwrap_or_else(|| panic!("Index indices {}, {} out of bounds", loc.row, loc.col))
    }
}

impl<T> IndexMut<Loc> for Plane<T>
where
    T: Copy + Default,
{
    fn index_mut(&mut self, loc: Loc) -> &mut Self::Output {
        self.get_mut(loc)
            .unwrap_or_else(|| panic!("Index_mut indices {}, {} out of bounds", loc.row, loc.col))
    }
}

impl<T> Index<usize> for Plane<T>
where
    T: Copy + Default,
{
    type Output = T;

    fn index(&self, index: usize) -> &Self::Output {
        &self.cells[index]
    }
}

impl<T> IndexMut<usize> for Plane<T>
where
    T: Copy + Default,
{
    fn index_mut(&mut self, index: usize) -> &mut Self::Output {
        &mut self.cells[index]
    }
}

/// The 3x3 Moore window around a cell. Under `Topology::Bounded` the
/// rows/columns that fall off the grid are `None` and get skipped.
pub struct Neighborhood<'a, T>
where
    T: Copy + Default,
{
    cells: &'a Plane<T>,
    rows: [Option<u32>; 3],
    cols: [Option<u32>; 3],
}

impl<'a, T> Neighborhood<'a, T>
where
    T: Copy + Default,
{
    pub fn new(cells: &'a Plane<T>, center: Loc, topology: Topology) -> Self {
        let (row_above, row_below) = Self::adjacent_indexes(center.row, cells.height(), topology);
        let (col_left, col_right) = Self::adjacent_indexes(center.col, cells.width(), topology);
        Self {
            cells,
            rows: [row_above, Some(center.row), row_below],
            cols: [col_left, Some(center.col), col_right],
        }
    }

    pub fn for_neighbor_cells<F>(&self, mut f: F)
    where
        F: FnMut(&T),
    {
        self.for_cell(0, 0, &mut f);
        self.for_cell(0, 1, &mut f);
        self.for_cell(0, 2, &mut f);

        self.for_cell(1, 0, &mut f);
        self.for_cell(1, 2, &mut f);

        self.for_cell(2, 0, &mut f);
        self.for_cell(2, 1, &mut f);
        self.for_cell(2, 2, &mut f);
    }

    fn for_cell<F>(&self, row: usize, col: usize, f: &mut F)
    where
        F: FnMut(&T),
    {
        if let (Some(row), Some(col)) = (self.rows[row], self.cols[col]) {
            f(&self.cells[Loc::new(row, col)]);
        }
    }

    fn adjacent_indexes(cell_index: u32, max: u32, topology: Topology) -> (Option<u32>, Option<u32>) {
        match topology {
            Topology::Toroidal => (
                Some(Self::modulo(cell_index as i64 - 1, max)),
                Some(Self::modulo(cell_index as i64 + 1, max)),
            ),
            Topology::Bounded => (
                cell_index.checked_sub(1),
                Some(cell_index + 1).filter(|&index| index < max),
            ),
        }
    }

    fn modulo(val: i64, max: u32) -> u32 {
        val.rem_euclid(max as i64) as u32
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Loc {
    pub row: u32,
    pub col: u32,
}

impl Loc {
    pub fn new(row: u32, col: u32) -> Self {
        Self { row, col }
    }

    pub fn from_index(index: usize, size: GridSize) -> Self {
        let width = size.width as usize;
        Self::new((index / width) as u32, (index % width) as u32)
    }

    pub fn grid_index(&self, size: GridSize) -> Option<usize> {
        if self.row < size.height && self.col < size.width {
            Some(self.row as usize * size.width as usize + self.col as usize)
        } else {
            None
        }
    }
}

/// Injectable randomness. Build with `from_seed` for reproducible runs.
#[derive(Clone, Debug)]
pub struct Random {
    rng: SmallRng,
}

impl Random {
    pub fn new() -> Self {
        Self {
            rng: SmallRng::from_rng(&mut rand::rng()),
        }
    }

    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(seed),
        }
    }

    pub fn next_bool(&mut self, p: f64) -> bool {
        if p.is_nan() {
            return false;
        }
        self.rng.random_bool(p.clamp(0.0, 1.0))
    }

    pub fn next_in_range<T, R>(&mut self, range: R) -> T
    where
        T: SampleUniform,
        R: SampleRange<T>,
    {
        self.rng.random_range(range)
    }

    /// Uniform pick in `0..len`. `len` must be non-zero.
    pub fn next_index(&mut self, len: usize) -> usize {
        self.rng.random_range(0..len)
    }
}

impl Default for Random {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plane_with(size: GridSize, live: &[(u32, u32)]) -> Plane<u8> {
        let mut plane = Plane::new(size);
        for &(col, row) in live {
            plane[Loc::new(row, col)] = 1;
        }
        plane
    }

    fn count(plane: &Plane<u8>, center: Loc, topology: Topology) -> u32 {
        let mut result = 0;
        Neighborhood::new(plane, center, topology)
            .for_neighbor_cells(|&cell| result += cell as u32);
        result
    }

    #[test]
    fn toroidal_neighborhood_wraps_corners() {
        let plane = plane_with(GridSize::new(10, 10), &[(9, 9), (0, 9), (9, 0)]);
        assert_eq!(count(&plane, Loc::new(0, 0), Topology::Toroidal), 3);
    }

    #[test]
    fn bounded_neighborhood_skips_off_grid() {
        let plane = plane_with(GridSize::new(10, 10), &[(9, 9), (0, 9), (9, 0), (1, 1)]);
        assert_eq!(count(&plane, Loc::new(0, 0), Topology::Bounded), 1);
    }

    #[test]
    fn bounded_corner_has_three_candidates() {
        let mut plane = Plane::new(GridSize::new(4, 4));
        plane.fill(1u8);
        assert_eq!(count(&plane, Loc::new(0, 0), Topology::Bounded), 3);
        assert_eq!(count(&plane, Loc::new(3, 1), Topology::Bounded), 5);
        assert_eq!(count(&plane, Loc::new(1, 1), Topology::Bounded), 8);
        assert_eq!(count(&plane, Loc::new(0, 0), Topology::Toroidal), 8);
    }

    #[test]
    fn swap_exchanges_buffers() {
        let mut grid: WorldGrid<u8> = WorldGrid::new(GridSize::new(3, 2));
        {
            let (current, next) = grid.split_mut();
            assert_eq!(current[Loc::new(1, 2)], 0);
            next[Loc::new(1, 2)] = 1;
        }
        grid.swap();
        assert_eq!(grid.cells[Loc::new(1, 2)], 1);
        assert_eq!(grid.next_cells[Loc::new(1, 2)], 0);
    }

    #[test]
    fn loc_index_round_trips_and_rejects_outside() {
        let size = GridSize::new(7, 5);
        let loc = Loc::new(4, 6);
        let index = loc.grid_index(size).unwrap();
        assert_eq!(index, 34);
        assert_eq!(Loc::from_index(index, size), loc);
        assert_eq!(Loc::new(5, 0).grid_index(size), None);
        assert_eq!(Loc::new(0, 7).grid_index(size), None);
    }

    #[test]
    fn grid_size_contains_signed_coordinates() {
        let size = GridSize::new(4, 3);
        assert!(size.contains(0, 0));
        assert!(size.contains(3, 2));
        assert!(!size.contains(-1, 0));
        assert!(!size.contains(4, 0));
        assert!(!size.contains(0, 3));
    }

    #[test]
    fn seeded_random_is_reproducible() {
        let mut a = Random::from_seed(42);
        let mut b = Random::from_seed(42);
        for _ in 0..100 {
            assert_eq!(a.next_in_range(0..1000u32), b.next_in_range(0..1000u32));
            assert_eq!(a.next_bool(0.3), b.next_bool(0.3));
        }
    }

    #[test]
    fn next_bool_clamps_probability() {
        let mut rand = Random::from_seed(7);
        assert!((0..50).all(|_| rand.next_bool(1.5)));
        assert!((0..50).all(|_| !rand.next_bool(-0.5)));
        assert!(!rand.next_bool(f64::NAN));
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn bounded_never_sees_more_than_toroidal(
                cells in proptest::collection::vec(0u8..=1, 36),
                row in 0u32..6,
                col in 0u32..6,
            ) {
                let size = GridSize::new(6, 6);
                let mut plane = Plane::new(size);
                for (index, &cell) in cells.iter().enumerate() {
                    plane[index] = cell;
                }
                let center = Loc::new(row, col);
                let bounded = count(&plane, center, Topology::Bounded);
                let toroidal = count(&plane, center, Topology::Toroidal);
                prop_assert!(bounded <= toroidal);
                prop_assert!(toroidal <= 8);
            }
        }
    }
}
