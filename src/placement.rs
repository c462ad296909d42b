//! Placement legality.
//!
//! Any piece may cover any non-blocker cell; the label under a cell does
//! not have to match the piece's own label. Placement is exclusive: a cell
//! covered by a placed piece is unavailable to every other piece.

use crate::geometry::ShapeMask;
use crate::grid::{CellSet, Coord, Grid};

/// Decides whether `mask` fits with its top-left corner on cell `at`.
///
/// Rejects when the mask leaves the grid, when a filled mask cell lands on
/// a blocker, or when it lands on a cell in `occupied`. Pure and O(h * w).
pub fn can_place(grid: &Grid, occupied: &CellSet, mask: &ShapeMask, at: Coord) -> bool {
    let (gx, gy) = at;
    if gx < 0
        || gy < 0
        || gx as usize + mask.cols() > grid.cols()
        || gy as usize + mask.rows() > grid.rows()
    {
        return false;
    }

    mask.filled_cells().all(|(dy, dx)| {
        grid.index_of((gx + dx as i32, gy + dy as i32))
            .is_some_and(|index| !grid.label_at(index).is_blocker() && !occupied.contains(index))
    })
}

/// Linear indices of the grid cells covered by `mask` at `at`. Cells that
/// would fall off the grid are skipped.
pub fn covered_cells<'a>(
    grid: &'a Grid,
    mask: &'a ShapeMask,
    at: Coord,
) -> impl Iterator<Item = usize> + 'a {
    let (gx, gy) = at;
    mask.filled_cells()
        .filter_map(move |(dy, dx)| grid.index_of((gx + dx as i32, gy + dy as i32)))
}
