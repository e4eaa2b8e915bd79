//! Grid module - manages the playfield cells
//!
//! The grid is a `width x height` field where each cell is empty or holds the
//! tag of the piece that filled it. Cells are stored in a flat row-major vector
//! for cache locality; dimensions are fixed at construction.
//!
//! Coordinates: (x, y) where x grows left to right and y grows top to bottom.
//! Placement checks allow cells above the top edge (`y < 0`) so a piece can
//! hang partially outside the visible field while it enters.
//!
//! `commit` and `clear_full_rows` never mutate `self`; they return a new grid.

use crate::pieces::Shape;
use crate::types::{Cell, PieceKind, BOARD_HEIGHT, BOARD_WIDTH};

/// The playfield
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Grid {
    width: u8,
    height: u8,
    /// Flat array of cells, row-major order (y * width + x)
    cells: Vec<Cell>,
}

/// Result of compacting full rows
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClearedRows {
    pub grid: Grid,
    pub lines_cleared: u32,
}

impl Grid {
    /// Create an all-empty grid
    ///
    /// # Panics
    ///
    /// Panics if either dimension is zero.
    pub fn new(width: u8, height: u8) -> Self {
        assert!(width > 0 && height > 0, "grid dimensions must be non-zero");
        Self {
            width,
            height,
            cells: vec![None; width as usize * height as usize],
        }
    }

    /// Create an empty grid with the standard 15x16 dimensions
    pub fn standard() -> Self {
        Self::new(BOARD_WIDTH, BOARD_HEIGHT)
    }

    /// Build a grid from rows of cells (top row first)
    ///
    /// # Panics
    ///
    /// Panics if the rows are empty or ragged.
    pub fn from_rows(rows: Vec<Vec<Cell>>) -> Self {
        let height = rows.len();
        assert!(height > 0 && height <= u8::MAX as usize);
        let width = rows[0].len();
        assert!(width > 0 && width <= u8::MAX as usize);
        assert!(rows.iter().all(|row| row.len() == width), "ragged grid rows");

        Self {
            width: width as u8,
            height: height as u8,
            cells: rows.into_iter().flatten().collect(),
        }
    }

    /// Calculate flat index from (x, y) coordinates
    #[inline(always)]
    fn index(&self, x: i16, y: i16) -> Option<usize> {
        if x < 0 || x >= self.width as i16 || y < 0 || y >= self.height as i16 {
            return None;
        }
        Some((y as usize) * (self.width as usize) + (x as usize))
    }

    pub fn width(&self) -> u8 {
        self.width
    }

    pub fn height(&self) -> u8 {
        self.height
    }

    /// Get cell at position (x, y)
    /// Returns None if out of bounds
    pub fn get(&self, x: i16, y: i16) -> Option<Cell> {
        self.index(x, y).map(|idx| self.cells[idx])
    }

    /// Set cell at position (x, y)
    /// Returns false if out of bounds
    pub fn set(&mut self, x: i16, y: i16, cell: Cell) -> bool {
        match self.index(x, y) {
            Some(idx) => {
                self.cells[idx] = cell;
                true
            }
            None => false,
        }
    }

    /// Check if position is occupied (within bounds and filled)
    pub fn is_occupied(&self, x: i16, y: i16) -> bool {
        matches!(self.get(x, y), Some(Some(_)))
    }

    /// One row of cells
    pub fn row(&self, y: usize) -> Option<&[Cell]> {
        if y >= self.height as usize {
            return None;
        }
        let start = y * self.width as usize;
        Some(&self.cells[start..start + self.width as usize])
    }

    /// Iterate rows top to bottom
    pub fn rows(&self) -> impl Iterator<Item = &[Cell]> {
        self.cells.chunks(self.width as usize)
    }

    /// Check if a row is completely filled
    pub fn is_row_full(&self, y: usize) -> bool {
        self.row(y)
            .map(|row| row.iter().all(|cell| cell.is_some()))
            .unwrap_or(false)
    }

    /// Whether `shape` fits with its matrix origin at (x, y)
    ///
    /// Every filled cell must have `0 <= x < width` and `y < height`. Cells with
    /// `y < 0` are allowed; cells with `y >= 0` must not overlap filled cells.
    pub fn is_valid_placement(&self, shape: &Shape, x: i16, y: i16) -> bool {
        shape.filled_cells().all(|(dx, dy)| {
            let px = x + dx as i16;
            let py = y + dy as i16;
            if px < 0 || px >= self.width as i16 || py >= self.height as i16 {
                return false;
            }
            py < 0 || !self.is_occupied(px, py)
        })
    }

    /// Return a new grid with every in-bounds filled cell of `shape` set to `kind`
    ///
    /// Cells above the top edge are dropped. `self` is left untouched.
    pub fn commit(&self, shape: &Shape, x: i16, y: i16, kind: PieceKind) -> Grid {
        let mut next = self.clone();
        for (dx, dy) in shape.filled_cells() {
            let py = y + dy as i16;
            if py >= 0 {
                next.set(x + dx as i16, py, Some(kind));
            }
        }
        next
    }

    /// Remove full rows and insert empty rows at the top
    ///
    /// Dimensions and the relative order of the remaining rows are preserved.
    pub fn clear_full_rows(&self) -> ClearedRows {
        let width = self.width as usize;
        let mut cells: Vec<Cell> = Vec::with_capacity(self.cells.len());
        let mut lines_cleared = 0u32;

        for row in self.rows() {
            if row.iter().all(|cell| cell.is_some()) {
                lines_cleared += 1;
            } else {
                cells.extend_from_slice(row);
            }
        }

        // Pad with empty rows at the top
        let mut padded = vec![None; lines_cleared as usize * width];
        padded.extend(cells);

        ClearedRows {
            grid: Grid {
                width: self.width,
                height: self.height,
                cells: padded,
            },
            lines_cleared,
        }
    }

    /// How many rows `shape` can fall from (x, y) before colliding
    pub fn drop_distance(&self, shape: &Shape, x: i16, y: i16) -> i16 {
        let mut distance = 0;
        while self.is_valid_placement(shape, x, y + distance + 1) {
            distance += 1;
        }
        distance
    }

    /// Number of filled cells
    pub fn filled_count(&self) -> usize {
        self.cells.iter().filter(|cell| cell.is_some()).count()
    }

    /// Get a reference to the internal cells array
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }
}

impl Default for Grid {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pieces::{get_shape, rotate};

    #[test]
    fn test_grid_index_calculation() {
        let grid = Grid::standard();
        assert_eq!(grid.index(0, 0), Some(0));
        assert_eq!(grid.index(14, 0), Some(14));
        assert_eq!(grid.index(0, 1), Some(15));
        assert_eq!(grid.index(14, 15), Some(239));
        assert_eq!(grid.index(-1, 0), None);
        assert_eq!(grid.index(15, 0), None);
        assert_eq!(grid.index(0, 16), None);
    }

    #[test]
    fn test_negative_rows_are_valid_placements() {
        let grid = Grid::standard();
        let i_vertical = rotate(&get_shape(PieceKind::I));
        assert!(grid.is_valid_placement(&i_vertical, 0, -3));
        assert!(!grid.is_valid_placement(&i_vertical, -1, -3));
    }

    #[test]
    fn test_commit_drops_cells_above_top() {
        let grid = Grid::standard();
        let i_vertical = rotate(&get_shape(PieceKind::I));
        let next = grid.commit(&i_vertical, 2, -2, PieceKind::I);
        assert_eq!(next.filled_count(), 2);
        assert!(next.is_occupied(2, 0));
        assert!(next.is_occupied(2, 1));
        assert_eq!(grid.filled_count(), 0);
    }

    #[test]
    fn test_clear_multiple_non_adjacent_rows() {
        let mut grid = Grid::new(3, 4);
        for x in 0..3 {
            grid.set(x, 1, Some(PieceKind::T));
            grid.set(x, 3, Some(PieceKind::L));
        }
        grid.set(0, 2, Some(PieceKind::S));
        grid.set(1, 0, Some(PieceKind::Z));

        let result = grid.clear_full_rows();
        assert_eq!(result.lines_cleared, 2);
        let g = result.grid;
        assert_eq!(g.row(0), Some(&[None, None, None][..]));
        assert_eq!(g.row(1), Some(&[None, None, None][..]));
        assert_eq!(g.row(2), Some(&[None, Some(PieceKind::Z), None][..]));
        assert_eq!(g.row(3), Some(&[Some(PieceKind::S), None, None][..]));
    }

    #[test]
    fn test_drop_distance_on_empty_grid() {
        let grid = Grid::standard();
        let o = get_shape(PieceKind::O);
        assert_eq!(grid.drop_distance(&o, 6, 0), 14);
    }
}
