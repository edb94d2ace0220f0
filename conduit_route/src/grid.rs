// Dense 3D occupancy grid for pipe routing.
//
// Cells are stored as a flat `Vec<CellType>` indexed by
// `x + z * size_x + y * size_x * size_z`, giving O(1) read/write access and
// a dense index space the searches use for their closed sets.
//
// Unlike a lenient voxel store, reads and writes through `cell()` and
// `set_cell()` panic out of bounds: every caller is expected to check
// `is_inside()` first, and an unchecked access means a routing bug. Pipe
// placement (`place()` / `remove()`) is the exception and silently skips
// out-of-bounds cells.
//
// Obstacles are seeded before planning (`set_cell`, `fill_box`). Pipe cells
// are only ever written through `place()`.
//
// See also: `types.rs` for `Pipe::occupied_cells()`, `planner.rs` which
// borrows the grid mutably for a whole batch.
//
// **Critical constraint: single owner.** The grid has no interior locking.
// One batch borrows it `&mut` at a time; independent batches use
// independent grids.

use crate::error::PlanError;
use crate::types::{CellType, Coord, Pipe};
use smallvec::SmallVec;

/// Dense 3D grid of cell states.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PipeGrid {
    /// Flat storage: index = x + z * size_x + y * size_x * size_z.
    cells: Vec<CellType>,
    size_x: u32,
    size_y: u32,
    size_z: u32,
}

impl PipeGrid {
    /// Create a grid filled with `Empty`. Every dimension must be non-zero
    /// and addressable by an `i32` coordinate, and the cell count must fit
    /// in a `usize`.
    pub fn new(size_x: u32, size_y: u32, size_z: u32) -> Result<Self, PlanError> {
        let invalid = PlanError::InvalidDimensions(size_x, size_y, size_z);
        let addressable = |s: u32| s > 0 && i32::try_from(s).is_ok();
        if !(addressable(size_x) && addressable(size_y) && addressable(size_z)) {
            return Err(invalid);
        }
        let total = (size_x as usize)
            .checked_mul(size_y as usize)
            .and_then(|n| n.checked_mul(size_z as usize))
            .ok_or(invalid)?;
        Ok(Self {
            cells: vec![CellType::Empty; total],
            size_x,
            size_y,
            size_z,
        })
    }

    pub fn size(&self) -> (u32, u32, u32) {
        (self.size_x, self.size_y, self.size_z)
    }

    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    /// Check whether a coordinate is within bounds.
    pub fn is_inside(&self, coord: Coord) -> bool {
        coord.x >= 0
            && coord.y >= 0
            && coord.z >= 0
            && (coord.x as u32) < self.size_x
            && (coord.y as u32) < self.size_y
            && (coord.z as u32) < self.size_z
    }

    /// Convert a coordinate to a flat index. Returns `None` if out of bounds.
    pub fn index_of(&self, coord: Coord) -> Option<usize> {
        if self.is_inside(coord) {
            let x = coord.x as usize;
            let y = coord.y as usize;
            let z = coord.z as usize;
            let sx = self.size_x as usize;
            let sz = self.size_z as usize;
            Some(x + z * sx + y * sx * sz)
        } else {
            None
        }
    }

    fn checked_index(&self, coord: Coord) -> usize {
        match self.index_of(coord) {
            Some(i) => i,
            None => panic!(
                "cell {coord} is outside the {}x{}x{} grid",
                self.size_x, self.size_y, self.size_z
            ),
        }
    }

    /// Read a cell. Panics if `coord` is out of bounds.
    pub fn cell(&self, coord: Coord) -> CellType {
        self.cells[self.checked_index(coord)]
    }

    /// Write a cell. Panics if `coord` is out of bounds.
    pub fn set_cell(&mut self, coord: Coord, cell: CellType) {
        let i = self.checked_index(coord);
        self.cells[i] = cell;
    }

    /// True if `coord` is inside the grid and `Empty`.
    pub fn is_free(&self, coord: Coord) -> bool {
        self.index_of(coord)
            .is_some_and(|i| self.cells[i].is_passable())
    }

    /// Fill the inclusive box spanned by two corners (in any order), clipped
    /// to the grid. Returns the number of cells written.
    pub fn fill_box(&mut self, a: Coord, b: Coord, cell: CellType) -> usize {
        let lo = Coord::new(a.x.min(b.x).max(0), a.y.min(b.y).max(0), a.z.min(b.z).max(0));
        let hi = Coord::new(
            a.x.max(b.x).min(self.size_x as i32 - 1),
            a.y.max(b.y).min(self.size_y as i32 - 1),
            a.z.max(b.z).min(self.size_z as i32 - 1),
        );
        let mut written = 0;
        for y in lo.y..=hi.y {
            for z in lo.z..=hi.z {
                for x in lo.x..=hi.x {
                    self.set_cell(Coord::new(x, y, z), cell);
                    written += 1;
                }
            }
        }
        written
    }

    /// The cells a pipe covers. Some may lie outside the grid.
    pub fn occupied_cells(pipe: &Pipe) -> SmallVec<[Coord; 2]> {
        pipe.occupied_cells()
    }

    /// True if every cell the pipe covers is inside the grid and `Empty`.
    pub fn can_place(&self, pipe: &Pipe) -> bool {
        pipe.occupied_cells().iter().all(|&c| self.is_free(c))
    }

    /// Commit a pipe: mark its in-bounds cells with the category's cell type.
    pub fn place(&mut self, pipe: &Pipe) {
        let cell = pipe.category.cell_type();
        for c in pipe.occupied_cells() {
            if let Some(i) = self.index_of(c) {
                self.cells[i] = cell;
            }
        }
    }

    /// Undo a placement: reset the pipe's in-bounds cells to `Empty`.
    pub fn remove(&mut self, pipe: &Pipe) {
        for c in pipe.occupied_cells() {
            if let Some(i) = self.index_of(c) {
                self.cells[i] = CellType::Empty;
            }
        }
    }

    /// Number of cells currently in the given state.
    pub fn count(&self, cell: CellType) -> usize {
        self.cells.iter().filter(|&&c| c == cell).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Direction, PipeCategory};

    #[test]
    fn new_grid_is_all_empty() {
        let grid = PipeGrid::new(4, 3, 2).unwrap();
        assert_eq!(grid.cell_count(), 24);
        for x in 0..4 {
            for y in 0..3 {
                for z in 0..2 {
                    assert_eq!(grid.cell(Coord::new(x, y, z)), CellType::Empty);
                }
            }
        }
    }

    #[test]
    fn zero_dimension_is_rejected() {
        assert_eq!(
            PipeGrid::new(4, 0, 4),
            Err(PlanError::InvalidDimensions(4, 0, 4))
        );
        assert!(PipeGrid::new(0, 0, 0).is_err());
    }

    #[test]
    fn oversized_dimensions_are_rejected() {
        assert_eq!(
            PipeGrid::new(u32::MAX, u32::MAX, u32::MAX),
            Err(PlanError::InvalidDimensions(u32::MAX, u32::MAX, u32::MAX))
        );
        // Each axis must stay addressable by an i32 coordinate.
        assert!(PipeGrid::new(1 << 31, 1, 1).is_err());
        // Addressable axes whose product overflows the cell count.
        let big = i32::MAX as u32;
        assert_eq!(
            PipeGrid::new(big, big, big),
            Err(PlanError::InvalidDimensions(big, big, big))
        );
    }

    #[test]
    fn is_inside_bounds() {
        let grid = PipeGrid::new(2, 3, 4).unwrap();
        assert!(grid.is_inside(Coord::new(0, 0, 0)));
        assert!(grid.is_inside(Coord::new(1, 2, 3)));
        assert!(!grid.is_inside(Coord::new(2, 0, 0)));
        assert!(!grid.is_inside(Coord::new(0, 3, 0)));
        assert!(!grid.is_inside(Coord::new(0, 0, 4)));
        assert!(!grid.is_inside(Coord::new(-1, 0, 0)));
    }

    #[test]
    fn indexing_is_correct() {
        // x + z * size_x + y * size_x * size_z
        let grid = PipeGrid::new(10, 8, 6).unwrap();
        assert_eq!(grid.index_of(Coord::new(5, 3, 4)), Some(5 + 4 * 10 + 3 * 60));
        assert_eq!(grid.index_of(Coord::new(10, 0, 0)), None);
    }

    #[test]
    fn set_and_read_cell() {
        let mut grid = PipeGrid::new(8, 8, 8).unwrap();
        let coord = Coord::new(3, 5, 2);
        grid.set_cell(coord, CellType::Obstacle);
        assert_eq!(grid.cell(coord), CellType::Obstacle);
        assert_eq!(grid.cell(Coord::new(3, 5, 3)), CellType::Empty);
        assert!(!grid.is_free(coord));
    }

    #[test]
    #[should_panic(expected = "outside the 4x4x4 grid")]
    fn out_of_bounds_read_panics() {
        let grid = PipeGrid::new(4, 4, 4).unwrap();
        grid.cell(Coord::new(4, 0, 0));
    }

    #[test]
    #[should_panic(expected = "outside")]
    fn out_of_bounds_write_panics() {
        let mut grid = PipeGrid::new(4, 4, 4).unwrap();
        grid.set_cell(Coord::new(0, -1, 0), CellType::Obstacle);
    }

    #[test]
    fn fill_box_accepts_corners_in_any_order_and_clips() {
        let mut grid = PipeGrid::new(5, 5, 5).unwrap();
        let written = grid.fill_box(Coord::new(3, 3, 3), Coord::new(1, 1, 1), CellType::Obstacle);
        assert_eq!(written, 27);
        assert_eq!(grid.count(CellType::Obstacle), 27);

        let written = grid.fill_box(Coord::new(4, -2, 0), Coord::new(9, 0, 0), CellType::Obstacle);
        assert_eq!(written, 1);
        assert_eq!(grid.cell(Coord::new(4, 0, 0)), CellType::Obstacle);
    }

    #[test]
    fn fill_box_entirely_outside_writes_nothing() {
        let mut grid = PipeGrid::new(3, 3, 3).unwrap();
        let written = grid.fill_box(Coord::new(5, 5, 5), Coord::new(7, 7, 7), CellType::Obstacle);
        assert_eq!(written, 0);
        assert_eq!(grid.count(CellType::Empty), 27);
    }

    #[test]
    fn place_straight2_marks_both_cells() {
        let mut grid = PipeGrid::new(4, 4, 4).unwrap();
        let pipe = Pipe::straight2(Coord::new(1, 1, 1), Direction::PosY, PipeCategory::Hot);
        grid.place(&pipe);
        assert_eq!(grid.cell(Coord::new(1, 1, 1)), CellType::HotPipe);
        assert_eq!(grid.cell(Coord::new(1, 2, 1)), CellType::HotPipe);
        assert_eq!(grid.count(CellType::HotPipe), 2);
    }

    #[test]
    fn place_bend_marks_anchor_only() {
        let mut grid = PipeGrid::new(4, 4, 4).unwrap();
        let pipe = Pipe::bend1(
            Coord::new(2, 2, 2),
            Direction::PosX,
            Direction::NegZ,
            PipeCategory::Cold,
        );
        grid.place(&pipe);
        assert_eq!(grid.cell(Coord::new(2, 2, 2)), CellType::ColdPipe);
        assert_eq!(grid.count(CellType::ColdPipe), 1);
    }

    #[test]
    fn place_skips_out_of_bounds_cells() {
        let mut grid = PipeGrid::new(2, 1, 1).unwrap();
        let pipe = Pipe::straight2(Coord::new(1, 0, 0), Direction::PosX, PipeCategory::Cold);
        assert!(!grid.can_place(&pipe));
        grid.place(&pipe);
        assert_eq!(grid.cell(Coord::new(1, 0, 0)), CellType::ColdPipe);
        assert_eq!(grid.count(CellType::ColdPipe), 1);
    }

    #[test]
    fn remove_restores_empty() {
        let mut grid = PipeGrid::new(4, 4, 4).unwrap();
        let pipe = Pipe::straight2(Coord::new(0, 0, 0), Direction::PosZ, PipeCategory::Hot);
        grid.place(&pipe);
        grid.remove(&pipe);
        assert_eq!(grid.count(CellType::Empty), 64);
    }

    #[test]
    fn can_place_rejects_occupied_cells() {
        let mut grid = PipeGrid::new(4, 1, 1).unwrap();
        let pipe = Pipe::straight2(Coord::new(0, 0, 0), Direction::PosX, PipeCategory::Hot);
        assert!(grid.can_place(&pipe));
        grid.set_cell(Coord::new(1, 0, 0), CellType::Obstacle);
        assert!(!grid.can_place(&pipe));
    }
}
