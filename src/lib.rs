//! Sliding Block Puzzle Engine
//!
//! Resolves clicks on a grid of rectangular pieces: checks whether a piece
//! may move, moves it (alone, gliding, or as part of a train of pieces pushed
//! toward a gap), remembers each piece's recent directions to avoid
//! jittering back and forth, and detects when the goal layout is reached.
//!
//! Drawing is delegated to a [`render::Canvas`]; puzzle files are read and
//! written by [`persistence`].

pub mod error;
pub mod geometry;
pub mod grid;
pub mod persistence;
pub mod pieces;
pub mod render;
pub mod session;

pub use error::PuzzleError;
pub use persistence::PuzzleFile;
pub use pieces::{Direction, PieceId};
pub use render::{Canvas, CanvasEvent, RecordingCanvas};
pub use session::{Interaction, PuzzleSetup, Session, SlideMode};
