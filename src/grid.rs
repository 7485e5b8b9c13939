//! Occupancy grid for sliding-block puzzles.
//!
//! The grid is stored as a fixed 32x32 array so sessions never reallocate;
//! only the top-left `across x down` region is in use. Cell values are piece
//! identifiers (see [`crate::pieces`]).

use crate::error::PuzzleError;
use crate::pieces::{Direction, PieceId, EMPTY, OBSTACLE};

/// Largest supported number of columns.
pub const MAX_ACROSS: usize = 32;

/// Largest supported number of rows.
pub const MAX_DOWN: usize = 32;

const MAX_CELLS: usize = MAX_ACROSS * MAX_DOWN;

/// Converts (row, col) to a linear index into the backing array.
#[inline(always)]
const fn cell_index(row: usize, col: usize) -> usize {
    row * MAX_ACROSS + col
}

/// A rectangular grid of piece identifiers.
#[derive(Clone, PartialEq, Eq)]
pub struct Grid {
    across: usize,
    down: usize,
    cells: [PieceId; MAX_CELLS],
}

impl Grid {
    /// Creates an all-empty grid.
    pub fn new(across: usize, down: usize) -> Result<Self, PuzzleError> {
        if !(1..=MAX_ACROSS).contains(&across) || !(1..=MAX_DOWN).contains(&down) {
            return Err(PuzzleError::BadDimensions { across, down });
        }
        Ok(Self {
            across,
            down,
            cells: [EMPTY; MAX_CELLS],
        })
    }

    /// Builds a grid from row-major values, `across * down` of them.
    pub fn from_rows(across: usize, down: usize, values: &[PieceId]) -> Result<Self, PuzzleError> {
        let mut grid = Self::new(across, down)?;
        if values.len() != across * down {
            return Err(PuzzleError::WrongCellCount {
                expected: across * down,
                found: values.len(),
            });
        }
        for (row, chunk) in values.chunks(across).enumerate() {
            grid.cells[cell_index(row, 0)..cell_index(row, across)].copy_from_slice(chunk);
        }
        Ok(grid)
    }

    /// Number of columns.
    #[inline]
    pub fn across(&self) -> usize {
        self.across
    }

    /// Number of rows.
    #[inline]
    pub fn down(&self) -> usize {
        self.down
    }

    /// Value at (row, col). Panics outside the grid.
    #[inline]
    pub fn cell_at(&self, row: usize, col: usize) -> PieceId {
        assert!(row < self.down && col < self.across, "cell ({row},{col}) outside grid");
        self.cells[cell_index(row, col)]
    }

    /// Overwrites the value at (row, col). Panics outside the grid.
    #[inline]
    pub fn set_cell(&mut self, row: usize, col: usize, value: PieceId) {
        assert!(row < self.down && col < self.across, "cell ({row},{col}) outside grid");
        self.cells[cell_index(row, col)] = value;
    }

    /// One row of values.
    pub fn row(&self, row: usize) -> &[PieceId] {
        &self.cells[cell_index(row, 0)..cell_index(row, self.across)]
    }

    /// The cell one step from (row, col) in `direction`, if still on the grid.
    #[inline]
    pub fn neighbor(&self, row: usize, col: usize, direction: Direction) -> Option<(usize, usize)> {
        let (dr, dc) = direction.offset();
        let next_row = row.checked_add_signed(dr as isize)?;
        let next_col = col.checked_add_signed(dc as isize)?;
        (next_row < self.down && next_col < self.across).then_some((next_row, next_col))
    }

    /// Cells holding `piece`, in row-major order.
    pub fn cells_of(&self, piece: PieceId) -> impl Iterator<Item = (usize, usize)> + '_ {
        (0..self.down)
            .flat_map(move |row| (0..self.across).map(move |col| (row, col)))
            .filter(move |&(row, col)| self.cells[cell_index(row, col)] == piece)
    }

    /// First cell of `piece` in row-major order.
    pub fn first_cell_of(&self, piece: PieceId) -> Option<(usize, usize)> {
        self.cells_of(piece).next()
    }

    /// Checks whether every cell of `piece` can shift one step in `direction`.
    ///
    /// A step is blocked by the grid edge or by any neighbor that is neither
    /// empty nor part of the same piece, which includes obstacles. A piece
    /// with no cells can trivially move.
    pub fn can_move(&self, piece: PieceId, direction: Direction) -> bool {
        self.cells_of(piece).all(|(row, col)| match self.neighbor(row, col, direction) {
            None => false,
            Some((r, c)) => {
                let neighbor = self.cells[cell_index(r, c)];
                neighbor == EMPTY || neighbor == piece
            }
        })
    }

    /// Shifts every cell of `piece` one step in `direction`.
    ///
    /// Returns the source cells in the order they were moved. Callers must
    /// have checked [`Grid::can_move`] first; cells that would leave the grid
    /// are left untouched.
    pub fn shift_piece(&mut self, piece: PieceId, direction: Direction) -> Vec<(usize, usize)> {
        debug_assert!(self.can_move(piece, direction), "illegal shift of piece {piece} {direction}");
        let mut moved = Vec::new();

        for (row, col) in travel_order(self.across, self.down, direction) {
            if self.cells[cell_index(row, col)] != piece {
                continue;
            }
            let Some((to_row, to_col)) = self.neighbor(row, col, direction) else {
                continue;
            };
            self.cells[cell_index(to_row, to_col)] = piece;
            self.cells[cell_index(row, col)] = EMPTY;
            moved.push((row, col));
        }

        moved
    }

    /// True when every non-empty goal cell holds the same value here.
    ///
    /// Short-circuits on the first mismatch.
    pub fn matches_goal(&self, goal: &Grid) -> bool {
        (0..self.down.min(goal.down)).all(|row| {
            (0..self.across.min(goal.across)).all(|col| {
                let wanted = goal.cells[cell_index(row, col)];
                wanted == EMPTY || wanted == self.cells[cell_index(row, col)]
            })
        })
    }
}

impl std::fmt::Debug for Grid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Grid {}x{}\n{}", self.across, self.down, format_grid(self))
    }
}

/// Visiting order for translating a piece in `direction`.
///
/// Cells nearest the direction of travel come first so that no cell of the
/// moving piece is overwritten before it has been read. Horizontal moves
/// walk row by row, vertical moves column by column.
pub fn travel_order(
    across: usize,
    down: usize,
    direction: Direction,
) -> impl Iterator<Item = (usize, usize)> {
    let horizontal = direction.is_horizontal();
    let reversed = matches!(direction, Direction::Right | Direction::Down);
    let (outer, inner) = if horizontal { (down, across) } else { (across, down) };

    (0..outer).flat_map(move |o| {
        (0..inner).map(move |i| {
            let i = if reversed { inner - 1 - i } else { i };
            if horizontal {
                (o, i)
            } else {
                (i, o)
            }
        })
    })
}

/// Single-character rendering of a cell value.
///
/// Empty cells show as '.', obstacles as '#', ids up to 35 as base-36
/// digits and anything larger as '*'.
fn display_char(value: PieceId) -> char {
    match value {
        EMPTY => '.',
        OBSTACLE => '#',
        v => char::from_digit(v as u32, 36)
            .map(|c| c.to_ascii_uppercase())
            .unwrap_or('*'),
    }
}

/// Formats a grid as one text line per row.
pub fn format_grid(grid: &Grid) -> String {
    let mut output = String::with_capacity((grid.across + 1) * grid.down);
    for row in 0..grid.down {
        output.extend(grid.row(row).iter().map(|&v| display_char(v)));
        output.push('\n');
    }
    output
}
