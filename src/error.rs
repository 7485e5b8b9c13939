//! Errors raised at the puzzle-loading boundary.
//!
//! Gameplay never produces errors: illegal clicks are silent no-ops. These
//! variants only describe puzzle data that cannot be turned into a session.

use derive_more::{Display, Error, From};

/// Errors produced while reading, validating or writing puzzle data.
#[derive(Debug, Display, Error, From)]
pub enum PuzzleError {
    /// Underlying read or write failure.
    #[display("I/O error: {_0}")]
    #[from]
    Io(#[error(source)] std::io::Error),

    /// The first line is not a PUZZ identifier.
    #[display("missing PUZZ identifier (found {found:?})")]
    MissingIdentifier { found: String },

    /// A start move count the counter cannot step back from.
    #[display("start move count {_0} out of range")]
    BadStartMoves(#[error(not(source))] i32),

    /// The header ended before all fields were read.
    #[display("unexpected end of file reading {field}")]
    UnexpectedEof { field: &'static str },

    /// A header line is shorter than its field requires.
    #[display("line {line} too short for {field}: {text:?}")]
    LineTooShort {
        line: usize,
        field: &'static str,
        text: String,
    },

    /// A numeric field could not be parsed.
    #[display("line {line}: {field} is not a valid number: {text:?}")]
    BadNumber {
        line: usize,
        field: &'static str,
        text: String,
    },

    /// Grid dimensions outside `1..=32`.
    #[display("grid dimensions {across}x{down} outside 1..=32")]
    BadDimensions { across: usize, down: usize },

    /// A grid row or cell buffer has the wrong number of values.
    #[display("expected {expected} cells, found {found}")]
    WrongCellCount { expected: usize, found: usize },

    /// A cell width or height of zero.
    #[display("cell size {width}x{height} must be at least 1x1")]
    BadGeometry { width: u8, height: u8 },

    /// A grid origin too close to the pixel limit to fit a full grid.
    #[display("grid origin ({x}, {y}) leaves no room for 32 cells")]
    OriginOutOfRange { x: i32, y: i32 },

    /// Slide mode other than 0, 1 or 2.
    #[display("unknown slide mode {_0}")]
    BadSlideMode(#[error(not(source))] u8),

    /// The `**CANVAS**` marker is absent.
    #[display("missing **CANVAS** marker")]
    MissingCanvas,
}
