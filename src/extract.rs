//! Splits a level grid into polyomino pieces.
//!
//! Every 4-connected run of same-labeled group cells becomes one piece. A
//! single visited bitset is shared by the whole pass, so extraction is
//! O(rows * cols) regardless of how many pieces the grid holds.

use std::collections::VecDeque;

use rand::Rng;
use rustc_hash::FxHashMap;

use crate::geometry::{Orientation, ShapeMask};
use crate::grid::{CellLabel, CellSet, Coord, Grid};
use crate::pieces::{Piece, PieceId};

/// Up, down, left, right.
const NEIGHBOURS: [Coord; 4] = [(0, -1), (0, 1), (-1, 0), (1, 0)];

/// A connected component of one piece group, before it becomes a piece.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Component {
    pub label: CellLabel,
    /// Top-left corner of the component's bounding box on the grid.
    pub origin: Coord,
    /// The component cropped to its bounding box.
    pub shape: ShapeMask,
}

/// Finds all connected components, grouped by label in order of first
/// appearance, each group in row-major order of its top-most cell.
///
/// Fully deterministic.
pub fn components(grid: &Grid) -> Vec<Component> {
    let mut visited = CellSet::with_capacity(grid.len());
    let mut queue = VecDeque::new();
    let mut components = Vec::new();

    for label in grid.group_labels() {
        for start in 0..grid.len() {
            if grid.label_at(start) != label || visited.contains(start) {
                continue;
            }
            let cells = flood_fill(grid, start, &mut visited, &mut queue);
            components.push(crop(label, &cells));
        }
    }

    components
}

/// Breadth-first fill from `start` over cells sharing its label.
fn flood_fill(
    grid: &Grid,
    start: usize,
    visited: &mut CellSet,
    queue: &mut VecDeque<usize>,
) -> Vec<Coord> {
    let label = grid.label_at(start);
    let mut cells = Vec::new();

    visited.insert(start);
    queue.push_back(start);

    while let Some(index) = queue.pop_front() {
        let (x, y) = grid.coord_of(index);
        cells.push((x, y));

        for (dx, dy) in NEIGHBOURS {
            let Some(neighbour) = grid.index_of((x + dx, y + dy)) else {
                continue;
            };
            if grid.label_at(neighbour) == label && visited.insert(neighbour) {
                queue.push_back(neighbour);
            }
        }
    }

    cells
}

/// Crops a non-empty cell list to its bounding box.
fn crop(label: CellLabel, cells: &[Coord]) -> Component {
    let min_x = cells.iter().map(|&(x, _)| x).min().unwrap_or(0);
    let max_x = cells.iter().map(|&(x, _)| x).max().unwrap_or(0);
    let min_y = cells.iter().map(|&(_, y)| y).min().unwrap_or(0);
    let max_y = cells.iter().map(|&(_, y)| y).max().unwrap_or(0);

    let mut shape = ShapeMask::new((max_y - min_y + 1) as usize, (max_x - min_x + 1) as usize);
    for &(x, y) in cells {
        shape.set((y - min_y) as usize, (x - min_x) as usize, true);
    }

    Component {
        label,
        origin: (min_x, min_y),
        shape,
    }
}

/// Extracts the pieces of a grid, each with a uniformly random initial
/// orientation. Orientation is the only output that depends on `rng`.
pub fn extract_pieces(grid: &Grid, rng: &mut impl Rng) -> Vec<Piece> {
    let mut ordinals: FxHashMap<CellLabel, usize> = FxHashMap::default();

    let pieces: Vec<Piece> = components(grid)
        .into_iter()
        .map(|component| {
            let ordinal = ordinals.entry(component.label).or_insert(0);
            let id = PieceId::new(component.label, *ordinal);
            *ordinal += 1;

            let orientation = Orientation::ALL[rng.gen_range(0..Orientation::ALL.len())];
            Piece::new(id, component.label, component.shape, orientation)
        })
        .collect();

    log::debug!(
        "extracted {} pieces from a {}x{} grid",
        pieces.len(),
        grid.cols(),
        grid.rows()
    );
    pieces
}
