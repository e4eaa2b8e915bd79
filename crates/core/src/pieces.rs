//! Pieces module - tetromino shape matrices and rotation
//!
//! Each piece is a small 0/1 matrix. Rotation is the plain matrix rotation
//! (transpose, then reverse each row) around the matrix origin; there are no
//! wall kicks, so a rotation that collides is simply rejected by the caller.

use crate::types::PieceKind;

/// Largest side of any piece matrix
pub const MAX_SHAPE_SIDE: usize = 4;

/// A piece shape matrix of up to 4x4 cells
///
/// Only the top-left `rows x cols` region is meaningful; the rest is zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Shape {
    rows: u8,
    cols: u8,
    cells: [[u8; MAX_SHAPE_SIDE]; MAX_SHAPE_SIDE],
}

impl Shape {
    /// Build a shape from a padded matrix
    pub const fn new(rows: u8, cols: u8, cells: [[u8; MAX_SHAPE_SIDE]; MAX_SHAPE_SIDE]) -> Self {
        Self { rows, cols, cells }
    }

    /// Build a shape from row slices (e.g. `&[&[0, 1, 0], &[1, 1, 1]]`)
    ///
    /// # Panics
    ///
    /// Panics if the matrix is empty, ragged, or larger than 4x4.
    pub fn from_rows(rows: &[&[u8]]) -> Self {
        assert!(!rows.is_empty() && rows.len() <= MAX_SHAPE_SIDE);
        let cols = rows[0].len();
        assert!(cols > 0 && cols <= MAX_SHAPE_SIDE);

        let mut cells = [[0u8; MAX_SHAPE_SIDE]; MAX_SHAPE_SIDE];
        for (y, row) in rows.iter().enumerate() {
            assert_eq!(row.len(), cols, "ragged shape matrix");
            for (x, &v) in row.iter().enumerate() {
                cells[y][x] = u8::from(v != 0);
            }
        }

        Self {
            rows: rows.len() as u8,
            cols: cols as u8,
            cells,
        }
    }

    /// Number of matrix rows
    pub fn height(&self) -> u8 {
        self.rows
    }

    /// Number of matrix columns
    pub fn width(&self) -> u8 {
        self.cols
    }

    /// Whether the cell at (x, y) inside the matrix is filled
    pub fn is_filled(&self, x: usize, y: usize) -> bool {
        x < self.cols as usize && y < self.rows as usize && self.cells[y][x] != 0
    }

    /// Offsets `(dx, dy)` of every filled cell, row-major
    pub fn filled_cells(&self) -> impl Iterator<Item = (i8, i8)> + '_ {
        (0..self.rows as usize).flat_map(move |y| {
            (0..self.cols as usize)
                .filter(move |&x| self.cells[y][x] != 0)
                .map(move |x| (x as i8, y as i8))
        })
    }

    /// Matrix rows as vectors (for display and tests)
    pub fn to_rows(&self) -> Vec<Vec<u8>> {
        (0..self.rows as usize)
            .map(|y| self.cells[y][..self.cols as usize].to_vec())
            .collect()
    }
}

/// Static definition of a piece variant
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PieceDefinition {
    pub kind: PieceKind,
    pub shape: Shape,
}

impl PieceDefinition {
    /// Display tag written into grid cells
    pub fn tag(&self) -> &'static str {
        self.kind.as_str()
    }
}

/// Piece table in feed order
pub const PIECES: [PieceDefinition; 7] = [
    PieceDefinition {
        kind: PieceKind::I,
        shape: Shape::new(1, 4, [[1, 1, 1, 1], [0; 4], [0; 4], [0; 4]]),
    },
    PieceDefinition {
        kind: PieceKind::O,
        shape: Shape::new(2, 2, [[1, 1, 0, 0], [1, 1, 0, 0], [0; 4], [0; 4]]),
    },
    PieceDefinition {
        kind: PieceKind::T,
        shape: Shape::new(2, 3, [[0, 1, 0, 0], [1, 1, 1, 0], [0; 4], [0; 4]]),
    },
    PieceDefinition {
        kind: PieceKind::S,
        shape: Shape::new(2, 3, [[0, 1, 1, 0], [1, 1, 0, 0], [0; 4], [0; 4]]),
    },
    PieceDefinition {
        kind: PieceKind::Z,
        shape: Shape::new(2, 3, [[1, 1, 0, 0], [0, 1, 1, 0], [0; 4], [0; 4]]),
    },
    PieceDefinition {
        kind: PieceKind::J,
        shape: Shape::new(2, 3, [[1, 0, 0, 0], [1, 1, 1, 0], [0; 4], [0; 4]]),
    },
    PieceDefinition {
        kind: PieceKind::L,
        shape: Shape::new(2, 3, [[0, 0, 1, 0], [1, 1, 1, 0], [0; 4], [0; 4]]),
    },
];

/// Get the definition for a piece kind
pub fn definition(kind: PieceKind) -> &'static PieceDefinition {
    &PIECES[kind.index()]
}

/// Get the spawn-orientation shape for a piece kind
pub fn get_shape(kind: PieceKind) -> Shape {
    definition(kind).shape
}

/// Rotate a shape 90° clockwise
///
/// Transpose then reverse each row: `out[i][j] = in[rows - 1 - j][i]`.
/// The result is `cols x rows`. Four rotations return the original shape.
pub fn rotate(shape: &Shape) -> Shape {
    let rows = shape.rows as usize;
    let cols = shape.cols as usize;
    let mut cells = [[0u8; MAX_SHAPE_SIDE]; MAX_SHAPE_SIDE];

    for (i, out_row) in cells.iter_mut().enumerate().take(cols) {
        for (j, out_cell) in out_row.iter_mut().enumerate().take(rows) {
            *out_cell = shape.cells[rows - 1 - j][i];
        }
    }

    Shape {
        rows: shape.cols,
        cols: shape.rows,
        cells,
    }
}
