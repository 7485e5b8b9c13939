//! Reading and writing PUZZ puzzle files.
//!
//! A puzzle file is a line-based text header followed by a `**CANVAS**`
//! line and the raw picture bytes. Header lines may carry `;` comments and
//! trailing whitespace, both of which are ignored:
//!
//! ```text
//! PUZZ_RP6502_V1.0        identifier
//! name
//! description
//! start move count
//! 6 instruction lines     (may be blank)
//! squares across
//! squares down
//! grid rows               comma or space separated, `down` lines
//! goal rows               `down` lines
//! origin x
//! origin y
//! cell width
//! cell height
//! slide mode              0 step, 1 glide, 2 train
//! move label column
//! move label row
//! move label foreground
//! move label background
//! **CANVAS**
//! <picture bytes to end of file>
//! ```
//!
//! The picture bytes are carried through untouched.

use std::fs;
use std::io::Write;
use std::path::Path;
use std::str::FromStr;

use tracing::debug;

use crate::error::PuzzleError;
use crate::geometry::Geometry;
use crate::grid::Grid;
use crate::pieces::PieceId;
use crate::session::{PuzzleSetup, SlideMode};

/// Identifier written on the first line of saved files.
pub const IDENTIFIER: &str = "PUZZ_RP6502_V1.0";

/// Any file whose first line starts with this is accepted.
const IDENTIFIER_PREFIX: &str = "PUZZ_RP6502_V";

const CANVAS_MARKER: &str = "**CANVAS**";

/// Number of instruction lines in every file.
pub const INSTRUCTION_LINES: usize = 6;

const NAME_LEN: usize = 13;
const INSTRUCTION_LEN: usize = 26;

/// Where and in which colours the move counter is drawn.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ScoreLabel {
    pub col: u8,
    pub row: u8,
    pub fg: u8,
    pub bg: u8,
}

/// A parsed puzzle file.
#[derive(Clone, Debug)]
pub struct PuzzleFile {
    pub name: String,
    pub description: String,
    pub start_moves: i32,
    pub instructions: [String; INSTRUCTION_LINES],
    pub grid: Grid,
    pub goal: Grid,
    pub geometry: Geometry,
    pub slide: SlideMode,
    pub score_label: ScoreLabel,
    /// Picture and palette bytes following the marker.
    pub canvas: Vec<u8>,
}

/// Cursor over header lines.
struct HeaderReader<'a> {
    bytes: &'a [u8],
    pos: usize,
    line: usize,
}

impl<'a> HeaderReader<'a> {
    fn new(bytes: &'a [u8]) -> Self {
        Self {
            bytes,
            pos: 0,
            line: 0,
        }
    }

    /// Next line with comment and trailing whitespace removed.
    fn line(&mut self, field: &'static str, min_len: usize) -> Result<String, PuzzleError> {
        if self.pos >= self.bytes.len() {
            return Err(PuzzleError::UnexpectedEof { field });
        }
        let rest = &self.bytes[self.pos..];
        let end = rest.iter().position(|&b| b == b'\n').unwrap_or(rest.len());
        self.pos += (end + 1).min(rest.len());
        self.line += 1;

        let raw = String::from_utf8_lossy(&rest[..end]);
        let text = raw.split(';').next().unwrap_or_default().trim_end();
        if text.len() < min_len {
            return Err(PuzzleError::LineTooShort {
                line: self.line,
                field,
                text: text.to_string(),
            });
        }
        Ok(text.to_string())
    }

    fn number<T: FromStr>(&mut self, field: &'static str) -> Result<T, PuzzleError> {
        let text = self.line(field, 1)?;
        text.trim().parse().map_err(|_| PuzzleError::BadNumber {
            line: self.line,
            field,
            text,
        })
    }

    /// Reads `down` rows of `across` cell values.
    fn grid(&mut self, field: &'static str, across: usize, down: usize) -> Result<Grid, PuzzleError> {
        let mut values = Vec::with_capacity(across * down);
        for _ in 0..down {
            let text = self.line(field, 2 * across - 1)?;
            let mut count = 0;
            for token in text.split([',', ' ', '\t']).filter(|t| !t.is_empty()) {
                let value: PieceId = token.parse().map_err(|_| PuzzleError::BadNumber {
                    line: self.line,
                    field,
                    text: token.to_string(),
                })?;
                values.push(value);
                count += 1;
            }
            if count != across {
                return Err(PuzzleError::WrongCellCount {
                    expected: across,
                    found: count,
                });
            }
        }
        Grid::from_rows(across, down, &values)
    }

    fn remaining(&self) -> &'a [u8] {
        &self.bytes[self.pos.min(self.bytes.len())..]
    }
}

fn truncated(text: String, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}

impl PuzzleFile {
    /// Parses a complete puzzle file.
    pub fn parse(bytes: &[u8]) -> Result<Self, PuzzleError> {
        let mut reader = HeaderReader::new(bytes);

        let identifier = reader.line("identifier", IDENTIFIER.len())?;
        if !identifier.starts_with(IDENTIFIER_PREFIX) {
            return Err(PuzzleError::MissingIdentifier { found: identifier });
        }

        let name = truncated(reader.line("name", 1)?, NAME_LEN);
        let description = reader.line("description", 1)?;
        let start_moves: i32 = reader.number("start moves")?;
        if start_moves == i32::MIN {
            return Err(PuzzleError::BadStartMoves(start_moves));
        }

        let mut instructions: [String; INSTRUCTION_LINES] = Default::default();
        for slot in &mut instructions {
            *slot = truncated(reader.line("instructions", 0)?, INSTRUCTION_LEN);
        }

        let across: usize = reader.number("squares across")?;
        let down: usize = reader.number("squares down")?;
        // checked before the row reader relies on them
        Grid::new(across, down)?;
        let grid = reader.grid("grid", across, down)?;
        let goal = reader.grid("goal", across, down)?;

        let origin_x = reader.number("origin x")?;
        let origin_y = reader.number("origin y")?;
        let cell_width = reader.number("cell width")?;
        let cell_height = reader.number("cell height")?;
        let geometry = Geometry::new(origin_x, origin_y, cell_width, cell_height)?;
        let slide = SlideMode::try_from(reader.number::<u8>("slide mode")?)?;

        let score_label = ScoreLabel {
            col: reader.number("move label column")?,
            row: reader.number("move label row")?,
            fg: reader.number("move label foreground")?,
            bg: reader.number("move label background")?,
        };

        let marker = reader.line("canvas marker", 0).map_err(|_| PuzzleError::MissingCanvas)?;
        if !marker.starts_with(CANVAS_MARKER) {
            return Err(PuzzleError::MissingCanvas);
        }
        let canvas = reader.remaining().to_vec();

        debug!(%name, across, down, ?slide, canvas_bytes = canvas.len(), "puzzle parsed");
        Ok(Self {
            name,
            description,
            start_moves,
            instructions,
            grid,
            goal,
            geometry,
            slide,
            score_label,
            canvas,
        })
    }

    /// Reads and parses a puzzle file from disk.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, PuzzleError> {
        let bytes = fs::read(path)?;
        Self::parse(&bytes)
    }

    /// Writes the puzzle in the same layout [`PuzzleFile::parse`] reads.
    pub fn write_to(&self, out: &mut impl Write) -> Result<(), PuzzleError> {
        writeln!(out, "{}", IDENTIFIER)?;
        writeln!(out, "{}", self.name)?;
        writeln!(out, "{}", self.description)?;
        writeln!(out, "{}", self.start_moves)?;
        for line in &self.instructions {
            writeln!(out, "{}", line)?;
        }
        writeln!(out, "{}\n{}", self.grid.across(), self.grid.down())?;
        for grid in [&self.grid, &self.goal] {
            for row in 0..grid.down() {
                let values: Vec<String> = grid.row(row).iter().map(|v| v.to_string()).collect();
                writeln!(out, "{}", values.join(","))?;
            }
        }
        let g = &self.geometry;
        writeln!(
            out,
            "{}\n{}\n{}\n{}",
            g.origin_x, g.origin_y, g.cell_width, g.cell_height
        )?;
        let label = &self.score_label;
        writeln!(
            out,
            "{}\n{}\n{}\n{}\n{}",
            u8::from(self.slide),
            label.col,
            label.row,
            label.fg,
            label.bg
        )?;
        writeln!(out, "{}", CANVAS_MARKER)?;
        out.write_all(&self.canvas)?;
        Ok(())
    }

    /// Writes the puzzle to a file on disk.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), PuzzleError> {
        let mut bytes = Vec::new();
        self.write_to(&mut bytes)?;
        fs::write(path, bytes)?;
        Ok(())
    }

    /// Session setup for a fresh start of this puzzle.
    pub fn setup(&self) -> PuzzleSetup {
        PuzzleSetup {
            grid: self.grid.clone(),
            goal: self.goal.clone(),
            start_moves: self.start_moves,
            geometry: self.geometry,
            slide: self.slide,
        }
    }

    /// A copy of this puzzle that resumes from a session snapshot.
    ///
    /// The description records the move count so saved games can be told
    /// apart in a file list.
    pub fn with_progress(&self, snapshot: &PuzzleSetup) -> Self {
        Self {
            description: format!("Saved ({} moves)", snapshot.start_moves),
            start_moves: snapshot.start_moves,
            grid: snapshot.grid.clone(),
            goal: snapshot.goal.clone(),
            geometry: snapshot.geometry,
            slide: snapshot.slide,
            ..self.clone()
        }
    }
}
