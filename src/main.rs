//! PUZZ sliding block puzzles
//!
//! Loads a puzzle file and plays clicks against it from the command line,
//! printing the resulting grid. Picture data in the file is carried through
//! but never drawn; canvas calls can be listed instead.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use puzz::grid::format_grid;
use puzz::{Interaction, PuzzleFile, RecordingCanvas, Session};

/// Plays PUZZ sliding block puzzles from the command line.
#[derive(Parser)]
#[command(name = "puzz")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print a puzzle's details, grid and goal.
    Show {
        /// Puzzle file to read.
        file: PathBuf,
    },
    /// Apply clicks to a puzzle and print the result.
    Play {
        /// Puzzle file to read.
        file: PathBuf,
        /// Click at screen pixel X,Y (repeatable, applied first).
        #[arg(long = "click", value_name = "X,Y", value_parser = parse_pair::<i32>)]
        clicks: Vec<(i32, i32)>,
        /// Click on grid cell ROW,COL (repeatable, applied after pixel clicks).
        #[arg(long = "cell", value_name = "ROW,COL", value_parser = parse_pair::<usize>)]
        cells: Vec<(usize, usize)>,
        /// Write the resulting position as a new puzzle file.
        #[arg(long)]
        save: Option<PathBuf>,
        /// List every canvas call made while playing.
        #[arg(long)]
        events: bool,
    },
    /// Parse a puzzle file and report any problem.
    Check {
        /// Puzzle file to read.
        file: PathBuf,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Show { file } => run_show(&file),
        Command::Play {
            file,
            clicks,
            cells,
            save,
            events,
        } => run_play(&file, &clicks, &cells, save.as_deref(), events),
        Command::Check { file } => run_check(&file),
    }
}

/// Parses "A,B" into a pair of numbers.
fn parse_pair<T: std::str::FromStr>(text: &str) -> Result<(T, T), String> {
    let (a, b) = text
        .split_once(',')
        .ok_or_else(|| format!("expected two comma-separated numbers, got {text:?}"))?;
    let parse = |s: &str| {
        s.trim()
            .parse::<T>()
            .map_err(|_| format!("not a number: {s:?}"))
    };
    Ok((parse(a)?, parse(b)?))
}

fn load(file: &std::path::Path) -> Result<PuzzleFile> {
    PuzzleFile::load(file).with_context(|| format!("failed to load {}", file.display()))
}

/// Prints a puzzle's header fields and both grids.
fn run_show(file: &std::path::Path) -> Result<()> {
    let puzzle = load(file)?;
    let g = puzzle.geometry;

    println!("{} - {}", puzzle.name, puzzle.description);
    for line in puzzle.instructions.iter().filter(|l| !l.is_empty()) {
        println!("  {}", line);
    }
    println!(
        "{}x{} cells of {}x{} px at ({}, {}), {:?} mode, {} moves",
        puzzle.grid.across(),
        puzzle.grid.down(),
        g.cell_width,
        g.cell_height,
        g.origin_x,
        g.origin_y,
        puzzle.slide,
        puzzle.start_moves
    );
    println!("\nGrid:\n{}", format_grid(&puzzle.grid));
    println!("Goal:\n{}", format_grid(&puzzle.goal));
    Ok(())
}

/// Loads a puzzle, applies the clicks and prints the outcome.
fn run_play(
    file: &std::path::Path,
    clicks: &[(i32, i32)],
    cells: &[(usize, usize)],
    save: Option<&std::path::Path>,
    events: bool,
) -> Result<()> {
    let puzzle = load(file)?;
    let mut session = Session::load(puzzle.setup(), RecordingCanvas::new());

    let mut outcomes: Vec<Interaction> = clicks.iter().map(|&(x, y)| session.on_click(x, y)).collect();
    outcomes.extend(cells.iter().map(|&(row, col)| session.click_cell(row, col)));

    for (n, outcome) in outcomes.iter().enumerate() {
        println!("click {}: {:?}", n + 1, outcome);
    }
    print!("\n{}", format_grid(session.grid()));
    println!("Moves: {}", session.current_move_count());
    if session.is_complete() {
        println!("Puzzle complete!");
    }

    if events {
        println!();
        for event in &session.canvas().events {
            println!("{}", event);
        }
    }

    if let Some(path) = save {
        puzzle
            .with_progress(&session.snapshot())
            .save(path)
            .with_context(|| format!("failed to save {}", path.display()))?;
        println!("Saved {}", path.display());
    }

    Ok(())
}

/// Parses a puzzle and reports success.
fn run_check(file: &std::path::Path) -> Result<()> {
    let puzzle = load(file)?;
    println!("{}: ok ({})", file.display(), puzzle.name);
    Ok(())
}
