//! Drop-to-grid snapping.
//!
//! A drop point in board-local pixels is rounded to the nearest cell
//! boundary, then the resolver walks a fixed neighbourhood of that cell
//! looking for the first legal placement.

use serde::Serialize;

use crate::geometry::ShapeMask;
use crate::grid::{CellSet, Coord, Grid};
use crate::pieces::PixelPoint;
use crate::placement::can_place;

/// Candidate offsets from the snapped cell, in search order.
///
/// Ordered near to far by Chebyshev distance; at equal distance axis
/// offsets come before diagonals, horizontal before vertical, left before
/// right, up before down. Distance 2 is searched along the axes only.
pub const SEARCH_OFFSETS: [Coord; 13] = [
    (0, 0),
    (-1, 0),
    (1, 0),
    (0, -1),
    (0, 1),
    (-1, -1),
    (1, -1),
    (-1, 1),
    (1, 1),
    (-2, 0),
    (2, 0),
    (0, -2),
    (0, 2),
];

/// Largest Chebyshev distance in [`SEARCH_OFFSETS`].
const SEARCH_REACH: i32 = 2;

/// Where a dragged piece was released.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DropTarget {
    /// Over the board, at a board-local pixel point (top-left of the piece).
    Board { at: PixelPoint },
    /// Anywhere off the board.
    OffBoard,
}

/// Rounds a fractional grid coordinate to the nearer cell boundary. An
/// exact half rounds down. Saturates at the `i32` range.
#[inline]
pub fn magnetic_round(raw: f64) -> i32 {
    let base = raw.floor();
    if raw - base <= 0.5 {
        base as i32
    } else {
        (base as i32).saturating_add(1)
    }
}

/// The cell a drop point snaps to before any neighbourhood search.
pub fn snap_cell(point: PixelPoint, cell_size: f64) -> Coord {
    (
        magnetic_round(point.x / cell_size),
        magnetic_round(point.y / cell_size),
    )
}

/// Classifies a board-local drop point: it is over the board iff the
/// piece's footprint rectangle anchored there lies inside the board.
pub fn classify_drop(
    grid: &Grid,
    footprint: (usize, usize),
    point: PixelPoint,
    cell_size: f64,
) -> DropTarget {
    let (cols, rows) = footprint;
    let board_width = grid.cols() as f64 * cell_size;
    let board_height = grid.rows() as f64 * cell_size;
    let inside = point.x >= 0.0
        && point.y >= 0.0
        && point.x + cols as f64 * cell_size <= board_width
        && point.y + rows as f64 * cell_size <= board_height;

    if inside {
        DropTarget::Board { at: point }
    } else {
        DropTarget::OffBoard
    }
}

/// Finds the cell where `mask` should land for a drop at `point`, or `None`
/// if no cell in the search neighbourhood is legal.
pub fn resolve(
    grid: &Grid,
    occupied: &CellSet,
    mask: &ShapeMask,
    point: PixelPoint,
    cell_size: f64,
) -> Option<Coord> {
    if cell_size.is_nan() || cell_size <= 0.0 || !point.x.is_finite() || !point.y.is_finite() {
        log::warn!("cannot snap drop at {point:?} with cell size {cell_size}");
        return None;
    }

    // Past this margin no search offset can reach a board cell.
    let slack = f64::from(SEARCH_REACH + 1);
    let (rx, ry) = (point.x / cell_size, point.y / cell_size);
    if rx < -slack || ry < -slack || rx > grid.cols() as f64 + slack || ry > grid.rows() as f64 + slack {
        log::debug!("drop at {point:?} is too far from the board to snap");
        return None;
    }

    let (gx, gy) = snap_cell(point, cell_size);
    let found = SEARCH_OFFSETS.iter().find_map(|&(dx, dy)| {
        let candidate = (gx + dx, gy + dy);
        if can_place(grid, occupied, mask, candidate) {
            Some(candidate)
        } else {
            log::trace!("snap candidate {candidate:?} rejected");
            None
        }
    });

    match found {
        Some(cell) => log::debug!("drop at {point:?} snapped to {cell:?} via {:?}", (gx, gy)),
        None => log::debug!("drop at {point:?} has no legal cell near {:?}", (gx, gy)),
    }
    found
}
