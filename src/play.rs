//! Line-oriented play session.
//!
//! Reads one command per line and applies it to the engine. Drop
//! coordinates are board-local pixels of the piece's top-left corner.

use std::io::{BufRead, Write};
use std::str::FromStr;

use anyhow::{anyhow, bail, Context};

use puzzle2d::pieces::PixelPoint;
use puzzle2d::snap::classify_drop;
use puzzle2d::tray::TrayMetrics;
use puzzle2d::{Catalog, DropTarget, Engine, Phase, PlacementOutcome};

use crate::visualization::{render_board, render_status, render_tray};

const HELP: &str = "\
commands:
  rotate <id>          turn an unplaced piece 90 degrees clockwise
  flip <id>            mirror an unplaced piece
  drop <id> <x> <y>    drop a piece at board pixel (x, y)
  lift <id>            drop a piece off the board
  stow <id>            return a piece to the tray
  reset                return every piece to the tray
  tray <width>         resize the tray and return every piece to it
  next | prev          switch level
  show                 draw the board and tray
  status               show progress
  quit";

#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    Rotate(String),
    Flip(String),
    Drop { id: String, x: f64, y: f64 },
    Lift(String),
    Stow(String),
    Reset,
    Tray(f64),
    Next,
    Prev,
    Show,
    Status,
    Help,
    Quit,
}

fn next_word<'a>(words: &mut impl Iterator<Item = &'a str>, what: &str) -> anyhow::Result<&'a str> {
    words.next().ok_or_else(|| anyhow!("missing {what}"))
}

fn coordinate<'a>(words: &mut impl Iterator<Item = &'a str>, axis: &str) -> anyhow::Result<f64> {
    let word = next_word(words, axis)?;
    word.parse()
        .with_context(|| format!("{axis} coordinate {word:?} is not a number"))
}

impl FromStr for Command {
    type Err = anyhow::Error;

    fn from_str(line: &str) -> anyhow::Result<Self> {
        let mut words = line.split_whitespace();
        let verb = next_word(&mut words, "command")?;

        let command = match verb {
            "rotate" | "r" => Command::Rotate(next_word(&mut words, "piece id")?.to_string()),
            "flip" | "f" => Command::Flip(next_word(&mut words, "piece id")?.to_string()),
            "drop" | "d" => Command::Drop {
                id: next_word(&mut words, "piece id")?.to_string(),
                x: coordinate(&mut words, "x")?,
                y: coordinate(&mut words, "y")?,
            },
            "lift" => Command::Lift(next_word(&mut words, "piece id")?.to_string()),
            "stow" => Command::Stow(next_word(&mut words, "piece id")?.to_string()),
            "reset" => Command::Reset,
            "tray" => {
                let width = coordinate(&mut words, "width")?;
                if !(width.is_finite() && width > 0.0) {
                    bail!("tray width must be positive, got {width}");
                }
                Command::Tray(width)
            }
            "next" => Command::Next,
            "prev" => Command::Prev,
            "show" => Command::Show,
            "status" => Command::Status,
            "help" | "?" => Command::Help,
            "quit" | "q" => Command::Quit,
            other => bail!("unknown command {other:?}, try `help`"),
        };

        if let Some(extra) = words.next() {
            bail!("unexpected argument {extra:?}");
        }
        Ok(command)
    }
}

/// Runs commands from `input` until it ends or `quit` is read. Command
/// errors are reported to `out` and the session carries on.
pub fn run(
    engine: &mut Engine,
    catalog: &Catalog,
    input: impl BufRead,
    mut out: impl Write,
) -> anyhow::Result<()> {
    show(engine, &mut out)?;

    for line in input.lines() {
        let line = line.context("failed to read command")?;
        if line.trim().is_empty() {
            continue;
        }

        let before = engine.phase();
        let command = match line.parse::<Command>() {
            Ok(command) => command,
            Err(e) => {
                writeln!(out, "error: {e:#}")?;
                continue;
            }
        };
        if command == Command::Quit {
            break;
        }

        match apply(engine, catalog, command, &mut out) {
            Ok(()) => {}
            Err(e) => writeln!(out, "error: {e:#}")?,
        }

        if before != Phase::Complete && engine.phase() == Phase::Complete {
            writeln!(out, "level complete!")?;
        }
    }

    Ok(())
}

fn apply(
    engine: &mut Engine,
    catalog: &Catalog,
    command: Command,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    match command {
        Command::Rotate(id) => {
            let changed = engine.rotate(&id)?;
            report_turn(engine, &id, changed, out)?;
        }
        Command::Flip(id) => {
            let changed = engine.flip(&id)?;
            report_turn(engine, &id, changed, out)?;
        }
        Command::Drop { id, x, y } => {
            let cell_size = engine.config().tray.cell_size;
            let footprint = {
                let piece = engine.piece(&id)?;
                (piece.shape.cols(), piece.shape.rows())
            };
            let grid = &engine.level().context("no level loaded")?.grid;
            let target = classify_drop(grid, footprint, PixelPoint::new(x, y), cell_size);
            let outcome = engine.attempt_placement(&id, target, cell_size)?;
            report_drop(&id, outcome, out)?;
        }
        Command::Lift(id) => {
            let cell_size = engine.config().tray.cell_size;
            let outcome = engine.attempt_placement(&id, DropTarget::OffBoard, cell_size)?;
            report_drop(&id, outcome, out)?;
        }
        Command::Stow(id) => {
            if engine.stow(&id)? {
                writeln!(out, "picked up {id}")?;
            } else {
                writeln!(out, "{id} is back in the tray")?;
            }
        }
        Command::Reset => {
            engine.reset();
            show(engine, out)?;
        }
        Command::Tray(width) => {
            let metrics = TrayMetrics {
                width,
                ..engine.config().tray
            };
            engine.set_tray_metrics(metrics);
            engine.reset();
            show(engine, out)?;
        }
        Command::Next => switch_level(engine, catalog, true, out)?,
        Command::Prev => switch_level(engine, catalog, false, out)?,
        Command::Show => show(engine, out)?,
        Command::Status => writeln!(out, "{}", render_status(&engine.snapshot()))?,
        Command::Help => writeln!(out, "{HELP}")?,
        Command::Quit => {}
    }
    Ok(())
}

fn switch_level(
    engine: &mut Engine,
    catalog: &Catalog,
    forward: bool,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    let current = engine.level().map(|level| level.id.clone()).unwrap_or_default();
    let target = if forward {
        catalog.next_id(&current)
    } else {
        catalog.prev_id(&current)
    };
    let Some(target) = target else {
        writeln!(out, "no more levels that way")?;
        return Ok(());
    };
    engine.load_level_by_id(catalog, target)?;
    show(engine, out)
}

fn report_turn(engine: &Engine, id: &str, changed: bool, out: &mut impl Write) -> anyhow::Result<()> {
    if changed {
        let piece = engine.piece(id)?;
        write!(out, "{}", render_tray(std::slice::from_ref(&piece)))?;
    } else {
        writeln!(out, "{id} is placed; pick it up first")?;
    }
    Ok(())
}

fn report_drop(id: &str, outcome: PlacementOutcome, out: &mut impl Write) -> anyhow::Result<()> {
    match outcome {
        PlacementOutcome::Placed { cell: (x, y) } => writeln!(out, "placed {id} at ({x}, {y})")?,
        PlacementOutcome::Illegal => writeln!(out, "no room for {id} there")?,
        PlacementOutcome::Stowed => writeln!(out, "returned {id} to the tray")?,
    }
    Ok(())
}

fn show(engine: &Engine, out: &mut impl Write) -> anyhow::Result<()> {
    let Some(level) = engine.level() else {
        writeln!(out, "no level loaded")?;
        return Ok(());
    };
    let pieces = engine.pieces();
    writeln!(out, "{} ({})", level.name, level.id)?;
    write!(out, "{}", render_board(&level.grid, &pieces))?;
    write!(out, "{}", render_tray(&pieces))?;
    writeln!(out, "{}", render_status(&engine.snapshot()))?;
    Ok(())
}
