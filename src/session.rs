//! One puzzle session: the move-resolution engine.
//!
//! A session owns the current grid, the goal, the per-piece move memory and
//! the move counter, and mirrors every change onto a [`Canvas`]. Clicks are
//! resolved in two ways:
//! - step moves, where the clicked piece picks its own direction from its
//!   preference list and moves one cell (or glides until blocked)
//! - train slides, where every piece between the clicked piece and a gap in
//!   its row or column shifts one cell toward the gap
//!
//! Illegal clicks are silent no-ops.

use tracing::{debug, info, instrument, trace};

use crate::error::PuzzleError;
use crate::geometry::Geometry;
use crate::grid::{Grid, MAX_ACROSS, MAX_DOWN};
use crate::pieces::{is_movable, Direction, MovePreferences, PieceId, EMPTY, OBSTACLE};
use crate::render::{Canvas, BACKGROUND};

/// How a click on a stuck piece is handled.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SlideMode {
    /// One cell per click.
    Step,
    /// Keep moving in the chosen direction until blocked.
    Glide,
    /// Step if possible, otherwise push a train of pieces toward a gap.
    Train,
}

impl TryFrom<u8> for SlideMode {
    type Error = PuzzleError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(SlideMode::Step),
            1 => Ok(SlideMode::Glide),
            2 => Ok(SlideMode::Train),
            other => Err(PuzzleError::BadSlideMode(other)),
        }
    }
}

impl From<SlideMode> for u8 {
    fn from(mode: SlideMode) -> u8 {
        match mode {
            SlideMode::Step => 0,
            SlideMode::Glide => 1,
            SlideMode::Train => 2,
        }
    }
}

/// Everything needed to start (or restart) a session.
#[derive(Clone, Debug)]
pub struct PuzzleSetup {
    pub grid: Grid,
    pub goal: Grid,
    pub start_moves: i32,
    pub geometry: Geometry,
    pub slide: SlideMode,
}

/// What a click did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Interaction {
    /// Outside the grid, or on a gap or obstacle.
    Ignored,
    /// A movable piece that could not go anywhere.
    Stuck,
    /// The clicked piece moved by itself.
    Stepped(Direction),
    /// A train of pieces slid toward a gap.
    Slid(Direction),
}

impl Interaction {
    /// True if the click changed the grid.
    pub fn moved(self) -> bool {
        matches!(self, Interaction::Stepped(_) | Interaction::Slid(_))
    }
}

/// A loaded puzzle and its display.
#[derive(Debug)]
pub struct Session<C: Canvas> {
    grid: Grid,
    goal: Grid,
    preferences: MovePreferences,
    moves: i32,
    start_moves: i32,
    geometry: Geometry,
    slide: SlideMode,
    canvas: C,
}

impl<C: Canvas> Session<C> {
    /// Starts a session from validated puzzle data.
    ///
    /// The display is told the starting move count straight away. Panics if
    /// the goal does not have the grid's dimensions.
    #[instrument(skip_all, fields(across = setup.grid.across(), down = setup.grid.down(), slide = ?setup.slide))]
    pub fn load(setup: PuzzleSetup, canvas: C) -> Self {
        check_setup(&setup);
        let PuzzleSetup {
            grid,
            goal,
            start_moves,
            geometry,
            slide,
        } = setup;

        let mut session = Self {
            grid,
            goal,
            preferences: MovePreferences::new(),
            moves: start_moves.saturating_sub(1),
            start_moves,
            geometry,
            slide,
            canvas,
        };
        session.bump_score();
        debug!(moves = session.moves, "puzzle loaded");
        session
    }

    /// Replaces the whole puzzle, keeping only the canvas.
    ///
    /// Used to restart a puzzle or switch to another one; move memory is
    /// forgotten.
    #[instrument(skip_all, fields(across = setup.grid.across(), down = setup.grid.down(), slide = ?setup.slide))]
    pub fn reload(&mut self, setup: PuzzleSetup) {
        check_setup(&setup);
        self.grid = setup.grid;
        self.goal = setup.goal;
        self.geometry = setup.geometry;
        self.slide = setup.slide;
        self.start_moves = setup.start_moves;
        self.moves = setup.start_moves.saturating_sub(1);
        self.preferences.clear();
        self.bump_score();
        debug!(moves = self.moves, "puzzle reloaded");
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn goal(&self) -> &Grid {
        &self.goal
    }

    pub fn geometry(&self) -> Geometry {
        self.geometry
    }

    pub fn slide_mode(&self) -> SlideMode {
        self.slide
    }

    pub fn preferences(&self) -> &MovePreferences {
        &self.preferences
    }

    pub fn canvas(&self) -> &C {
        &self.canvas
    }

    pub fn canvas_mut(&mut self) -> &mut C {
        &mut self.canvas
    }

    pub fn into_canvas(self) -> C {
        self.canvas
    }

    /// Moves counted so far, including the loaded starting count.
    pub fn current_move_count(&self) -> i32 {
        self.moves
    }

    /// Captures the session so it can be saved and reloaded later.
    ///
    /// The snapshot starts at the current move count.
    pub fn snapshot(&self) -> PuzzleSetup {
        PuzzleSetup {
            grid: self.grid.clone(),
            goal: self.goal.clone(),
            start_moves: self.moves,
            geometry: self.geometry,
            slide: self.slide,
        }
    }

    /// True once at least one move has been made and every non-empty goal
    /// cell is matched.
    pub fn is_complete(&self) -> bool {
        self.moves != self.start_moves && self.grid.matches_goal(&self.goal)
    }

    /// See [`Grid::can_move`].
    pub fn can_move(&self, piece: PieceId, direction: Direction) -> bool {
        self.grid.can_move(piece, direction)
    }

    /// First direction in the piece's preference list that is legal.
    pub fn suggest_move(&self, piece: PieceId) -> Option<Direction> {
        self.preferences
            .order(piece)
            .into_iter()
            .find(|&direction| self.grid.can_move(piece, direction))
    }

    /// Shifts `piece` one cell and moves its pixels to match.
    ///
    /// Performs no legality check; callers confirm [`Session::can_move`].
    pub fn move_one_piece(&mut self, piece: PieceId, direction: Direction) {
        let (dr, dc) = direction.offset();
        let width = self.geometry.cell_width;
        let height = self.geometry.cell_height;

        for (row, col) in self.grid.shift_piece(piece, direction) {
            let src = self.geometry.cell_origin(row, col);
            let dst = (
                src.0.saturating_add(dc * i32::from(width)),
                src.1.saturating_add(dr * i32::from(height)),
            );
            trace!(piece, row, col, %direction, "cell moved");
            self.canvas.move_rect(src, dst, width, height, BACKGROUND);
        }
    }

    /// Step-moves `piece` in its preferred legal direction.
    ///
    /// In glide mode the piece keeps going until blocked. Counts as a single
    /// move however far it travels. Returns `None`, changing nothing, if the
    /// piece cannot move at all.
    pub fn move_piece(&mut self, piece: PieceId) -> Option<Direction> {
        let direction = self.suggest_move(piece)?;
        self.preferences.reorder(piece, direction);

        self.move_one_piece(piece, direction);
        if self.slide == SlideMode::Glide {
            while self.grid.can_move(piece, direction) {
                self.move_one_piece(piece, direction);
            }
        }
        self.bump_score();
        debug!(piece, %direction, moves = self.moves, "piece stepped");
        Some(direction)
    }

    /// Pushes the pieces between `piece` and a gap in its row or column one
    /// cell toward the gap.
    ///
    /// A gap in the piece's row wins over one in its column. An obstacle
    /// anywhere between the two cancels the slide before anything moves.
    /// Pieces are then moved one by one starting next to the gap; the walk
    /// stops at the first piece that cannot move, keeping whatever already
    /// moved. Returns the slide direction if anything moved.
    #[instrument(skip(self))]
    pub fn slide_pieces(&mut self, piece: PieceId) -> Option<Direction> {
        let (y, x) = self.grid.first_cell_of(piece)?;
        let Some((zy, zx)) = self.find_gap(y, x) else {
            debug!("no gap in row or column");
            return None;
        };

        let direction = if x == zx {
            if y > zy {
                Direction::Up
            } else {
                Direction::Down
            }
        } else if x > zx {
            Direction::Left
        } else {
            Direction::Right
        };

        // cells from beside the gap back to the clicked cell
        let path: Vec<(usize, usize)> = match direction {
            Direction::Up => (zy + 1..=y).map(|row| (row, x)).collect(),
            Direction::Down => (y..zy).rev().map(|row| (row, x)).collect(),
            Direction::Left => (zx + 1..=x).map(|col| (y, col)).collect(),
            Direction::Right => (x..zx).rev().map(|col| (y, col)).collect(),
        };

        let between = &path[..path.len() - 1];
        if between
            .iter()
            .any(|&(row, col)| self.grid.cell_at(row, col) == OBSTACLE)
        {
            debug!(%direction, "slide blocked by obstacle");
            return None;
        }

        let mut moved = false;
        let mut last = EMPTY;
        for (row, col) in path {
            let id = self.grid.cell_at(row, col);
            if id == EMPTY || id == last {
                continue;
            }
            last = id;
            if !self.grid.can_move(id, direction) {
                debug!(piece = id, %direction, "slide stopped");
                break;
            }
            self.move_one_piece(id, direction);
            if !moved {
                moved = true;
                self.bump_score();
            }
        }

        if moved {
            debug!(%direction, moves = self.moves, "pieces slid");
        }
        moved.then_some(direction)
    }

    /// Handles a click at screen pixel (x, y).
    #[instrument(skip(self))]
    pub fn on_click(&mut self, x: i32, y: i32) -> Interaction {
        match self
            .geometry
            .cell_at_pixel(x, y, self.grid.across(), self.grid.down())
        {
            Some((row, col)) => self.click_cell(row, col),
            None => Interaction::Ignored,
        }
    }

    /// Handles a click on grid cell (row, col).
    ///
    /// Plays the completion effect if the click moved something and the
    /// puzzle is now solved.
    pub fn click_cell(&mut self, row: usize, col: usize) -> Interaction {
        if row >= self.grid.down() || col >= self.grid.across() {
            return Interaction::Ignored;
        }
        let piece = self.grid.cell_at(row, col);
        if !is_movable(piece) {
            return Interaction::Ignored;
        }

        let interaction = if let Some(direction) = self.move_piece(piece) {
            Interaction::Stepped(direction)
        } else if self.slide == SlideMode::Train {
            match self.slide_pieces(piece) {
                Some(direction) => Interaction::Slid(direction),
                None => Interaction::Stuck,
            }
        } else {
            Interaction::Stuck
        };

        if interaction.moved() && self.is_complete() {
            info!(moves = self.moves, "puzzle complete");
            self.canvas.play_completion();
        }
        interaction
    }

    /// Last gap in row `y`, else last gap in column `x`.
    fn find_gap(&self, y: usize, x: usize) -> Option<(usize, usize)> {
        (0..self.grid.across())
            .rev()
            .find(|&col| self.grid.cell_at(y, col) == EMPTY)
            .map(|col| (y, col))
            .or_else(|| {
                (0..self.grid.down())
                    .rev()
                    .find(|&row| self.grid.cell_at(row, x) == EMPTY)
                    .map(|row| (row, x))
            })
    }

    fn bump_score(&mut self) {
        self.moves = self.moves.saturating_add(1);
        self.canvas.update_score(self.moves);
    }
}

/// Fatal check that the loader handed over a consistent puzzle.
fn check_setup(setup: &PuzzleSetup) {
    let (grid, goal) = (&setup.grid, &setup.goal);
    assert!(grid.across() <= MAX_ACROSS && grid.down() <= MAX_DOWN);
    assert_eq!(
        (grid.across(), grid.down()),
        (goal.across(), goal.down()),
        "goal dimensions differ from grid"
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::{CanvasEvent, RecordingCanvas};

    const CELL: i32 = 8;

    fn rows_to_grid(across: usize, rows: &[&[PieceId]]) -> Grid {
        let values: Vec<PieceId> = rows.iter().flat_map(|r| r.iter().copied()).collect();
        Grid::from_rows(across, rows.len(), &values).unwrap()
    }

    fn session_with_goal(
        across: usize,
        rows: &[&[PieceId]],
        goal: &[&[PieceId]],
        slide: SlideMode,
    ) -> Session<RecordingCanvas> {
        let setup = PuzzleSetup {
            grid: rows_to_grid(across, rows),
            goal: rows_to_grid(across, goal),
            start_moves: 0,
            geometry: Geometry::new(0, 0, CELL as u8, CELL as u8).unwrap(),
            slide,
        };
        let mut session = Session::load(setup, RecordingCanvas::new());
        session.canvas_mut().take();
        session
    }

    fn session(across: usize, rows: &[&[PieceId]], slide: SlideMode) -> Session<RecordingCanvas> {
        // goal of a single never-reached cell keeps completion out of the way
        let mut goal: Vec<Vec<PieceId>> = rows.iter().map(|r| vec![EMPTY; r.len()]).collect();
        goal[0][0] = 254;
        let goal_rows: Vec<&[PieceId]> = goal.iter().map(|r| r.as_slice()).collect();
        session_with_goal(across, rows, &goal_rows, slide)
    }

    fn click(session: &mut Session<RecordingCanvas>, row: usize, col: usize) -> Interaction {
        session.on_click(col as i32 * CELL + 1, row as i32 * CELL + 1)
    }

    #[test]
    fn test_slide_mode_from_u8() {
        assert_eq!(SlideMode::try_from(0).unwrap(), SlideMode::Step);
        assert_eq!(SlideMode::try_from(1).unwrap(), SlideMode::Glide);
        assert_eq!(SlideMode::try_from(2).unwrap(), SlideMode::Train);
        assert!(matches!(SlideMode::try_from(3), Err(PuzzleError::BadSlideMode(3))));
        assert_eq!(u8::from(SlideMode::Train), 2);
    }

    #[test]
    fn test_load_shows_starting_count_and_is_not_complete() {
        let setup = PuzzleSetup {
            grid: rows_to_grid(2, &[&[1, 0]]),
            goal: rows_to_grid(2, &[&[1, 0]]),
            start_moves: 12,
            geometry: Geometry::new(0, 0, 4, 4).unwrap(),
            slide: SlideMode::Step,
        };
        let session = Session::load(setup, RecordingCanvas::new());

        assert_eq!(session.current_move_count(), 12);
        assert_eq!(session.canvas().events, vec![CanvasEvent::Score(12)]);
        assert!(!session.is_complete(), "fresh load never counts as solved");
    }

    #[test]
    #[should_panic(expected = "goal dimensions differ")]
    fn test_load_rejects_mismatched_goal() {
        let setup = PuzzleSetup {
            grid: rows_to_grid(2, &[&[1, 0]]),
            goal: rows_to_grid(3, &[&[1, 0, 0]]),
            start_moves: 0,
            geometry: Geometry::new(0, 0, 4, 4).unwrap(),
            slide: SlideMode::Step,
        };
        let _ = Session::load(setup, RecordingCanvas::new());
    }

    #[test]
    fn test_step_move_into_gap_completes() {
        let mut s = session_with_goal(2, &[&[1, 0]], &[&[0, 0]], SlideMode::Step);

        assert_eq!(click(&mut s, 0, 0), Interaction::Stepped(Direction::Right));
        assert_eq!(s.grid().row(0), &[0, 1]);
        assert_eq!(s.current_move_count(), 1);
        assert!(s.is_complete());
        assert_eq!(s.canvas().score_updates(), 1);
        assert!(s.canvas().completed());
    }

    #[test]
    fn test_move_one_piece_emits_rect_moves_in_travel_order() {
        let setup = PuzzleSetup {
            grid: rows_to_grid(3, &[&[1, 1, 0]]),
            goal: rows_to_grid(3, &[&[0, 0, 0]]),
            start_moves: 4,
            geometry: Geometry::new(10, 20, 8, 6).unwrap(),
            slide: SlideMode::Step,
        };
        let mut s = Session::load(setup, RecordingCanvas::new());
        s.canvas_mut().take();

        assert_eq!(s.on_click(11, 21), Interaction::Stepped(Direction::Right));
        assert_eq!(
            s.canvas().events,
            vec![
                CanvasEvent::MoveRect {
                    src: (18, 20),
                    dst: (26, 20),
                    width: 8,
                    height: 6,
                    fill: 0
                },
                CanvasEvent::MoveRect {
                    src: (10, 20),
                    dst: (18, 20),
                    width: 8,
                    height: 6,
                    fill: 0
                },
                CanvasEvent::Score(5),
                CanvasEvent::Completion,
            ]
        );
    }

    #[test]
    fn test_preferences_avoid_immediate_reversal() {
        let mut s = session(4, &[&[2, 1, 0, 0]], SlideMode::Step);

        assert_eq!(click(&mut s, 0, 1), Interaction::Stepped(Direction::Right));
        assert_eq!(s.grid().row(0), &[2, 0, 1, 0]);

        // left is legal but was demoted by the previous move
        assert!(s.can_move(1, Direction::Left));
        assert_eq!(s.suggest_move(1), Some(Direction::Right));
        assert_eq!(click(&mut s, 0, 2), Interaction::Stepped(Direction::Right));
        assert_eq!(s.grid().row(0), &[2, 0, 0, 1]);

        assert_eq!(click(&mut s, 0, 3), Interaction::Stepped(Direction::Left));
        assert_eq!(click(&mut s, 0, 2), Interaction::Stepped(Direction::Left));
        assert_eq!(s.grid().row(0), &[2, 1, 0, 0]);
        assert_eq!(s.current_move_count(), 4);
        assert_eq!(
            s.preferences().order(1),
            [Direction::Up, Direction::Down, Direction::Left, Direction::Right]
        );
    }

    #[test]
    fn test_suggest_move_does_not_mutate() {
        let s = session(3, &[&[0, 1, 0]], SlideMode::Step);
        assert_eq!(s.suggest_move(1), Some(Direction::Left));
        assert_eq!(s.suggest_move(1), Some(Direction::Left));
        assert_eq!(s.grid().row(0), &[0, 1, 0]);
        assert!(s.canvas().events.is_empty());
    }

    #[test]
    fn test_glide_moves_until_blocked_as_one_move() {
        let mut s = session(5, &[&[1, 0, 0, 0, 255]], SlideMode::Glide);

        assert_eq!(click(&mut s, 0, 0), Interaction::Stepped(Direction::Right));
        assert_eq!(s.grid().row(0), &[0, 0, 0, 1, 255]);
        assert_eq!(s.current_move_count(), 1);
        assert_eq!(s.canvas().rect_moves(), 3);
        assert_eq!(s.canvas().score_updates(), 1);
    }

    #[test]
    fn test_step_mode_does_not_glide() {
        let mut s = session(4, &[&[1, 0, 0, 0]], SlideMode::Step);
        click(&mut s, 0, 0);
        assert_eq!(s.grid().row(0), &[0, 1, 0, 0]);
    }

    #[test]
    fn test_train_mode_steps_do_not_glide() {
        let mut s = session(4, &[&[1, 0, 0, 0]], SlideMode::Train);
        assert_eq!(click(&mut s, 0, 0), Interaction::Stepped(Direction::Right));
        assert_eq!(s.grid().row(0), &[0, 1, 0, 0]);
        assert_eq!(s.canvas().rect_moves(), 1);
    }

    #[test]
    fn test_train_slide_toward_gap() {
        let mut s = session(3, &[&[2, 1, 0]], SlideMode::Train);

        assert_eq!(click(&mut s, 0, 0), Interaction::Slid(Direction::Right));
        assert_eq!(s.grid().row(0), &[0, 2, 1]);
        assert_eq!(s.canvas().score_updates(), 1);
        assert_eq!(s.current_move_count(), 1);
    }

    #[test]
    fn test_train_slide_blocked_by_obstacle() {
        let mut s = session(3, &[&[1, 255, 0]], SlideMode::Train);

        assert_eq!(click(&mut s, 0, 0), Interaction::Stuck);
        assert_eq!(s.grid().row(0), &[1, 255, 0]);
        assert!(s.canvas().events.is_empty());
        assert_eq!(s.current_move_count(), 0);
    }

    #[test]
    fn test_train_slide_needs_train_mode() {
        let mut s = session(3, &[&[2, 1, 0]], SlideMode::Step);
        assert_eq!(click(&mut s, 0, 0), Interaction::Stuck);
        assert_eq!(s.grid().row(0), &[2, 1, 0]);

        let mut s = session(3, &[&[2, 1, 0]], SlideMode::Glide);
        assert_eq!(click(&mut s, 0, 0), Interaction::Stuck);
    }

    #[test]
    fn test_train_slide_vertical() {
        let mut s = session(1, &[&[0], &[3], &[4]], SlideMode::Train);

        assert_eq!(click(&mut s, 2, 0), Interaction::Slid(Direction::Up));
        assert_eq!(s.grid().cell_at(0, 0), 3);
        assert_eq!(s.grid().cell_at(1, 0), 4);
        assert_eq!(s.grid().cell_at(2, 0), EMPTY);
    }

    #[test]
    fn test_train_slide_down() {
        let mut s = session(1, &[&[3], &[4], &[0]], SlideMode::Train);

        assert_eq!(click(&mut s, 0, 0), Interaction::Slid(Direction::Down));
        assert_eq!(s.grid().cell_at(0, 0), EMPTY);
        assert_eq!(s.grid().cell_at(1, 0), 3);
        assert_eq!(s.grid().cell_at(2, 0), 4);
        assert_eq!(s.canvas().score_updates(), 1);
        assert_eq!(s.canvas().rect_moves(), 2);
        assert_eq!(s.current_move_count(), 1);
    }

    #[test]
    fn test_train_slide_down_blocked_by_obstacle() {
        let mut s = session(1, &[&[1], &[255], &[0]], SlideMode::Train);

        assert_eq!(click(&mut s, 0, 0), Interaction::Stuck);
        assert_eq!(s.grid().cell_at(0, 0), 1);
        assert_eq!(s.grid().cell_at(2, 0), EMPTY);
        assert!(s.canvas().events.is_empty());
    }

    #[test]
    fn test_extreme_counts_and_origins_do_not_overflow() {
        let setup = PuzzleSetup {
            grid: rows_to_grid(2, &[&[1, 0]]),
            goal: rows_to_grid(2, &[&[0, 1]]),
            start_moves: i32::MIN,
            geometry: Geometry {
                origin_x: i32::MAX - 4,
                origin_y: 0,
                cell_width: 8,
                cell_height: 8,
            },
            slide: SlideMode::Step,
        };
        let mut s = Session::load(setup, RecordingCanvas::new());
        assert_eq!(s.current_move_count(), i32::MIN + 1);

        assert_eq!(s.click_cell(0, 0), Interaction::Stepped(Direction::Right));
        assert_eq!(s.grid().row(0), &[0, 1]);
        assert_eq!(
            s.canvas().rect_moves(),
            1,
            "pixel positions clamp instead of wrapping"
        );

        let mut snap = s.snapshot();
        snap.start_moves = i32::MAX;
        s.reload(snap);
        assert_eq!(s.current_move_count(), i32::MAX);
    }

    #[test]
    fn test_train_slide_prefers_row_gap() {
        let mut s = session(
            3,
            &[&[1, 2, 0], &[3, 4, 7], &[0, 6, 8]],
            SlideMode::Train,
        );

        assert_eq!(click(&mut s, 2, 2), Interaction::Slid(Direction::Left));
        assert_eq!(s.grid().row(2), &[6, 8, 0]);
        assert_eq!(s.grid().row(0), &[1, 2, 0]);
        assert_eq!(s.grid().row(1), &[3, 4, 7]);
    }

    #[test]
    fn test_train_slide_uses_last_gap_in_row() {
        let mut s = session(5, &[&[0, 1, 2, 3, 0]], SlideMode::Train);

        assert_eq!(click(&mut s, 0, 2), Interaction::Slid(Direction::Right));
        assert_eq!(s.grid().row(0), &[0, 1, 0, 2, 3]);
    }

    #[test]
    fn test_train_slide_moves_long_piece_once() {
        let mut s = session(5, &[&[0, 3, 3, 3, 4]], SlideMode::Train);

        assert_eq!(click(&mut s, 0, 4), Interaction::Slid(Direction::Left));
        assert_eq!(s.grid().row(0), &[3, 3, 3, 4, 0]);
        assert_eq!(s.canvas().score_updates(), 1);
    }

    #[test]
    fn test_train_slide_keeps_partial_progress() {
        let mut s = session(3, &[&[1, 2, 0], &[1, 255, 9]], SlideMode::Train);

        assert_eq!(click(&mut s, 0, 0), Interaction::Slid(Direction::Right));
        assert_eq!(s.grid().row(0), &[1, 0, 2]);
        assert_eq!(s.grid().row(1), &[1, 255, 9]);
        assert_eq!(s.current_move_count(), 1);
    }

    #[test]
    fn test_train_slide_without_gap_does_nothing() {
        let mut s = session(2, &[&[1, 2], &[3, 0]], SlideMode::Train);
        assert_eq!(s.slide_pieces(1), None);
        assert_eq!(s.slide_pieces(42), None);
        assert!(s.canvas().events.is_empty());
    }

    #[test]
    fn test_clicks_on_gap_obstacle_or_outside_ignored() {
        let mut s = session(3, &[&[1, 255, 0]], SlideMode::Train);

        assert_eq!(click(&mut s, 0, 1), Interaction::Ignored);
        assert_eq!(click(&mut s, 0, 2), Interaction::Ignored);
        assert_eq!(s.on_click(-1, 0), Interaction::Ignored);
        assert_eq!(s.on_click(3 * CELL, 0), Interaction::Ignored);
        assert_eq!(s.on_click(0, CELL), Interaction::Ignored);
        assert_eq!(s.click_cell(5, 0), Interaction::Ignored);
        assert!(s.canvas().events.is_empty());
    }

    #[test]
    fn test_completion_fires_only_on_a_move() {
        let mut s = session_with_goal(3, &[&[1, 0, 2]], &[&[0, 1, 0]], SlideMode::Step);

        assert!(!s.is_complete());
        click(&mut s, 0, 0);
        assert!(s.is_complete());
        assert_eq!(s.canvas_mut().take().last(), Some(&CanvasEvent::Completion));

        // piece 2 is boxed in: no move, no repeated effect
        assert_eq!(s.grid().row(0), &[0, 1, 2]);
        click(&mut s, 0, 2);
        assert!(!s.canvas().completed());
    }

    #[test]
    fn test_reload_replaces_everything() {
        let mut s = session(3, &[&[0, 1, 0]], SlideMode::Step);
        click(&mut s, 0, 1);
        assert_ne!(s.preferences().order(1), Direction::ALL);

        let fresh = PuzzleSetup {
            grid: rows_to_grid(2, &[&[0, 5], &[0, 0]]),
            goal: rows_to_grid(2, &[&[5, 0], &[0, 0]]),
            start_moves: 7,
            geometry: Geometry::new(0, 0, CELL as u8, CELL as u8).unwrap(),
            slide: SlideMode::Glide,
        };
        s.canvas_mut().take();
        s.reload(fresh);

        assert_eq!(s.canvas().events, vec![CanvasEvent::Score(7)]);
        assert_eq!(s.current_move_count(), 7);
        assert_eq!(s.slide_mode(), SlideMode::Glide);
        assert_eq!(s.grid().across(), 2);
        assert_eq!(s.preferences().order(1), Direction::ALL);
        assert!(!s.is_complete());

        assert_eq!(click(&mut s, 0, 1), Interaction::Stepped(Direction::Left));
        assert!(s.is_complete());
    }

    #[test]
    fn test_snapshot_resumes_from_current_count() {
        let mut s = session(3, &[&[1, 0, 0]], SlideMode::Step);
        click(&mut s, 0, 0);
        let snap = s.snapshot();

        assert_eq!(snap.start_moves, 1);
        assert_eq!(snap.grid.row(0), &[0, 1, 0]);

        let resumed = Session::load(snap, RecordingCanvas::new());
        assert_eq!(resumed.current_move_count(), 1);
        assert!(!resumed.is_complete());
    }
}
