//! Piece identifiers, move directions and the per-piece move memory.
//!
//! A piece is every grid cell holding the same identifier. Identifier 0 is
//! the gap and 255 an immovable obstacle; everything in between moves.

use derive_more::Display;
use rustc_hash::FxHashMap;

/// Identifier stored in a grid cell.
pub type PieceId = u8;

/// The empty cell pieces slide into.
pub const EMPTY: PieceId = 0;

/// Fixed obstacle: never moves and blocks everything.
pub const OBSTACLE: PieceId = 255;

/// Returns true if `id` names a piece that may be moved.
#[inline]
pub const fn is_movable(id: PieceId) -> bool {
    id != EMPTY && id != OBSTACLE
}

/// One-cell move direction.
#[derive(Clone, Copy, Debug, Display, PartialEq, Eq, Hash)]
pub enum Direction {
    #[display("left")]
    Left,
    #[display("up")]
    Up,
    #[display("right")]
    Right,
    #[display("down")]
    Down,
}

impl Direction {
    /// All directions in the order a fresh preference list holds them.
    pub const ALL: [Direction; 4] = [
        Direction::Left,
        Direction::Up,
        Direction::Right,
        Direction::Down,
    ];

    /// The direction that undoes this one.
    #[inline]
    pub const fn opposite(self) -> Self {
        match self {
            Direction::Left => Direction::Right,
            Direction::Up => Direction::Down,
            Direction::Right => Direction::Left,
            Direction::Down => Direction::Up,
        }
    }

    /// Row and column delta of a single step.
    #[inline]
    pub const fn offset(self) -> (i32, i32) {
        match self {
            Direction::Left => (0, -1),
            Direction::Up => (-1, 0),
            Direction::Right => (0, 1),
            Direction::Down => (1, 0),
        }
    }

    /// True for left and right.
    #[inline]
    pub const fn is_horizontal(self) -> bool {
        matches!(self, Direction::Left | Direction::Right)
    }
}

/// Per-piece ordered memory of which direction to try first.
///
/// Each list is a permutation of [`Direction::ALL`]. Pieces without an
/// entry behave as if they held the initial order, so the table only
/// allocates for pieces that have actually moved.
#[derive(Clone, Debug, Default)]
pub struct MovePreferences {
    lists: FxHashMap<PieceId, [Direction; 4]>,
}

impl MovePreferences {
    pub fn new() -> Self {
        Self::default()
    }

    /// The current try-order for `piece`.
    pub fn order(&self, piece: PieceId) -> [Direction; 4] {
        self.lists.get(&piece).copied().unwrap_or(Direction::ALL)
    }

    /// Demotes the reverse of `moved` to the end of the piece's list.
    ///
    /// The other three keep their relative order. Nothing changes when the
    /// reverse is already last.
    pub fn reorder(&mut self, piece: PieceId, moved: Direction) {
        let reverse = moved.opposite();
        let list = self.lists.entry(piece).or_insert(Direction::ALL);

        if let Some(slot) = list[..3].iter().position(|&d| d == reverse) {
            list[slot..].rotate_left(1);
        }
    }

    /// Forgets every remembered order.
    pub fn clear(&mut self) {
        self.lists.clear();
    }
}
