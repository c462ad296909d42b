//! Text rendering of the board and tray.

use puzzle2d::grid::Grid;
use puzzle2d::pieces::Position;
use puzzle2d::{EngineSnapshot, Phase, PieceSnapshot};

/// Draws the board with placed pieces overlaid.
///
/// Blockers are `#`, open cells `.`, and covered cells show the label of
/// the piece covering them.
pub fn render_board(grid: &Grid, pieces: &[PieceSnapshot]) -> String {
    let mut cells: Vec<char> = grid
        .iter()
        .map(|(_, label)| if label.is_blocker() { '#' } else { '.' })
        .collect();

    for piece in pieces {
        let Position::Board { cell: (gx, gy) } = piece.position else {
            continue;
        };
        for (y, x) in piece.shape.filled_cells() {
            if let Some(index) = grid.index_of((gx + x as i32, gy + y as i32)) {
                cells[index] = piece.label;
            }
        }
    }

    let mut output = String::new();
    for row in cells.chunks(grid.cols()) {
        output.extend(row);
        output.push('\n');
    }
    output
}

/// Lists unplaced pieces in tray order, each drawn in its current orientation.
pub fn render_tray(pieces: &[PieceSnapshot]) -> String {
    let mut output = String::new();
    for piece in pieces.iter().filter(|piece| !piece.is_placed) {
        let flipped = if piece.orientation.flipped { ", flipped" } else { "" };
        output.push_str(&format!(
            "{}  rot {}{}\n",
            piece.id,
            piece.orientation.rotation.degrees(),
            flipped
        ));
        for row in piece.shape.to_rows() {
            output.push_str("  ");
            output.extend(row.iter().map(|&filled| if filled { piece.label } else { '.' }));
            output.push('\n');
        }
    }
    output
}

/// One-line progress summary.
pub fn render_status(snapshot: &EngineSnapshot) -> String {
    let placed = snapshot.pieces.iter().filter(|piece| piece.is_placed).count();
    let phase = match snapshot.phase {
        Phase::Loading => "loading",
        Phase::Playing => "playing",
        Phase::Complete => "complete",
    };
    format!(
        "{}: {placed}/{} placed, {phase}",
        snapshot.level_id.as_deref().unwrap_or("-"),
        snapshot.pieces.len()
    )
}
