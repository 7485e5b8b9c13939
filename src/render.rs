//! Drawing side effects the engine asks of its display.
//!
//! The engine never touches pixels itself. Every grid mutation is mirrored
//! by a [`Canvas::move_rect`] call, and the move counter and completion are
//! reported through the same trait.

use derive_more::Display;

/// Background colour written into vacated cells.
pub const BACKGROUND: u8 = 0;

/// Display collaborator driven by a [`crate::session::Session`].
pub trait Canvas {
    /// Moves a `width x height` pixel rectangle from `src` to `dst`,
    /// filling the vacated source with colour `fill`.
    fn move_rect(&mut self, src: (i32, i32), dst: (i32, i32), width: u8, height: u8, fill: u8);

    /// Shows the current move count.
    fn update_score(&mut self, moves: i32);

    /// Plays the completion effect.
    fn play_completion(&mut self);
}

/// One recorded canvas call.
#[derive(Clone, Debug, Display, PartialEq, Eq)]
pub enum CanvasEvent {
    #[display("move {width}x{height} ({},{}) -> ({},{}) fill {fill}", src.0, src.1, dst.0, dst.1)]
    MoveRect {
        src: (i32, i32),
        dst: (i32, i32),
        width: u8,
        height: u8,
        fill: u8,
    },
    #[display("score {_0}")]
    Score(i32),
    #[display("complete")]
    Completion,
}

/// Canvas that keeps every call in memory.
#[derive(Clone, Debug, Default)]
pub struct RecordingCanvas {
    pub events: Vec<CanvasEvent>,
}

impl RecordingCanvas {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drops the recorded events and returns them.
    pub fn take(&mut self) -> Vec<CanvasEvent> {
        std::mem::take(&mut self.events)
    }

    /// Number of score updates recorded.
    pub fn score_updates(&self) -> usize {
        self.events
            .iter()
            .filter(|e| matches!(e, CanvasEvent::Score(_)))
            .count()
    }

    /// Number of rectangle moves recorded.
    pub fn rect_moves(&self) -> usize {
        self.events
            .iter()
            .filter(|e| matches!(e, CanvasEvent::MoveRect { .. }))
            .count()
    }

    /// True if a completion was recorded.
    pub fn completed(&self) -> bool {
        self.events.contains(&CanvasEvent::Completion)
    }
}

impl Canvas for RecordingCanvas {
    fn move_rect(&mut self, src: (i32, i32), dst: (i32, i32), width: u8, height: u8, fill: u8) {
        self.events.push(CanvasEvent::MoveRect {
            src,
            dst,
            width,
            height,
            fill,
        });
    }

    fn update_score(&mut self, moves: i32) {
        self.events.push(CanvasEvent::Score(moves));
    }

    fn play_completion(&mut self) {
        self.events.push(CanvasEvent::Completion);
    }
}
