//! 2D shape masks and the dihedral transformations acting on them.
//!
//! A square has 8 symmetries (the dihedral group D4): the 4 clockwise
//! rotations, each with or without a horizontal reflection. An
//! [`Orientation`] names one of them; the reflection is applied first,
//! then the rotation.

use serde::{Deserialize, Serialize};

/// A rectangular boolean matrix, stored row-major. `true` marks a filled cell.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(into = "Vec<Vec<bool>>")]
pub struct ShapeMask {
    rows: usize,
    cols: usize,
    cells: Vec<bool>,
}

impl ShapeMask {
    /// Creates an all-empty mask of the given dimensions.
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            cells: vec![false; rows * cols],
        }
    }

    /// Builds a mask from a row-major cell vector. Returns `None` if the
    /// length does not match the dimensions.
    pub fn from_cells(rows: usize, cols: usize, cells: Vec<bool>) -> Option<Self> {
        (cells.len() == rows * cols).then_some(Self { rows, cols, cells })
    }

    /// Parses a mask from text rows where `#` is filled and anything else
    /// is empty. Returns `None` for empty or ragged input.
    pub fn from_pattern(pattern: &[&str]) -> Option<Self> {
        let cols = pattern.first()?.chars().count();
        if cols == 0 {
            return None;
        }
        let mut cells = Vec::with_capacity(pattern.len() * cols);
        for line in pattern {
            if line.chars().count() != cols {
                return None;
            }
            cells.extend(line.chars().map(|c| c == '#'));
        }
        Self::from_cells(pattern.len(), cols, cells)
    }

    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    #[inline]
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Returns whether the cell at row `y`, column `x` is filled.
    /// Out-of-range cells read as empty.
    #[inline]
    pub fn get(&self, y: usize, x: usize) -> bool {
        y < self.rows && x < self.cols && self.cells[y * self.cols + x]
    }

    #[inline]
    pub fn set(&mut self, y: usize, x: usize, filled: bool) {
        if y < self.rows && x < self.cols {
            self.cells[y * self.cols + x] = filled;
        }
    }

    /// Number of filled cells.
    pub fn filled_count(&self) -> usize {
        self.cells.iter().filter(|&&filled| filled).count()
    }

    /// Iterates the `(y, x)` positions of filled cells in row-major order.
    pub fn filled_cells(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        let cols = self.cols;
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, filled)| **filled)
            .map(move |(index, _)| (index / cols, index % cols))
    }

    /// A mask is normalized iff it is its own tight bounding box: the first
    /// and last rows and the first and last columns each hold a filled cell.
    pub fn is_normalized(&self) -> bool {
        if self.rows == 0 || self.cols == 0 {
            return false;
        }
        let row_filled = |y: usize| (0..self.cols).any(|x| self.get(y, x));
        let col_filled = |x: usize| (0..self.rows).any(|y| self.get(y, x));
        row_filled(0) && row_filled(self.rows - 1) && col_filled(0) && col_filled(self.cols - 1)
    }

    /// Returns the mask as nested rows.
    pub fn to_rows(&self) -> Vec<Vec<bool>> {
        self.cells.chunks(self.cols.max(1)).map(<[bool]>::to_vec).collect()
    }
}

impl From<ShapeMask> for Vec<Vec<bool>> {
    fn from(mask: ShapeMask) -> Self {
        mask.to_rows()
    }
}

/// Clockwise rotation in quarter turns.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
pub enum Rotation {
    #[default]
    Deg0,
    Deg90,
    Deg180,
    Deg270,
}

impl Rotation {
    pub const ALL: [Rotation; 4] = [
        Rotation::Deg0,
        Rotation::Deg90,
        Rotation::Deg180,
        Rotation::Deg270,
    ];

    pub const fn degrees(self) -> u16 {
        match self {
            Rotation::Deg0 => 0,
            Rotation::Deg90 => 90,
            Rotation::Deg180 => 180,
            Rotation::Deg270 => 270,
        }
    }

    pub const fn quarter_turns(self) -> usize {
        self.degrees() as usize / 90
    }

    /// Advances by +90 degrees, wrapping at 360.
    pub const fn clockwise(self) -> Rotation {
        match self {
            Rotation::Deg0 => Rotation::Deg90,
            Rotation::Deg90 => Rotation::Deg180,
            Rotation::Deg180 => Rotation::Deg270,
            Rotation::Deg270 => Rotation::Deg0,
        }
    }
}

impl From<Rotation> for u16 {
    fn from(rotation: Rotation) -> Self {
        rotation.degrees()
    }
}

impl TryFrom<u16> for Rotation {
    type Error = String;

    fn try_from(degrees: u16) -> Result<Self, Self::Error> {
        match degrees {
            0 => Ok(Rotation::Deg0),
            90 => Ok(Rotation::Deg90),
            180 => Ok(Rotation::Deg180),
            270 => Ok(Rotation::Deg270),
            other => Err(format!("rotation must be 0, 90, 180 or 270, got {other}")),
        }
    }
}

/// One element of D4: an optional horizontal flip followed by a rotation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Orientation {
    pub rotation: Rotation,
    pub flipped: bool,
}

impl Orientation {
    pub const IDENTITY: Orientation = Orientation {
        rotation: Rotation::Deg0,
        flipped: false,
    };

    /// All 8 orientations: the 4 unflipped rotations, then the 4 flipped ones.
    pub const ALL: [Orientation; 8] = [
        Orientation::new(Rotation::Deg0, false),
        Orientation::new(Rotation::Deg90, false),
        Orientation::new(Rotation::Deg180, false),
        Orientation::new(Rotation::Deg270, false),
        Orientation::new(Rotation::Deg0, true),
        Orientation::new(Rotation::Deg90, true),
        Orientation::new(Rotation::Deg180, true),
        Orientation::new(Rotation::Deg270, true),
    ];

    pub const fn new(rotation: Rotation, flipped: bool) -> Self {
        Self { rotation, flipped }
    }

    /// The orientation after one more clockwise quarter turn.
    pub const fn rotated(self) -> Self {
        Self::new(self.rotation.clockwise(), self.flipped)
    }

    /// The orientation with the flip flag toggled.
    pub const fn toggled_flip(self) -> Self {
        Self::new(self.rotation, !self.flipped)
    }
}

/// Mirrors a mask horizontally: `out[y][x] = m[y][cols - 1 - x]`.
pub fn flip_h(mask: &ShapeMask) -> ShapeMask {
    let mut flipped = ShapeMask::new(mask.rows, mask.cols);
    for (y, x) in mask.filled_cells() {
        flipped.set(y, mask.cols - 1 - x, true);
    }
    flipped
}

/// Rotates a mask a quarter turn clockwise: an `h x w` mask becomes `w x h`
/// with `out[x][h - 1 - y] = m[y][x]`.
pub fn rot90(mask: &ShapeMask) -> ShapeMask {
    let mut rotated = ShapeMask::new(mask.cols, mask.rows);
    for (y, x) in mask.filled_cells() {
        rotated.set(x, mask.rows - 1 - y, true);
    }
    rotated
}

/// Rotates a mask clockwise by the given amount.
pub fn rotate(mask: &ShapeMask, rotation: Rotation) -> ShapeMask {
    let mut rotated = mask.clone();
    for _ in 0..rotation.quarter_turns() {
        rotated = rot90(&rotated);
    }
    rotated
}

/// Applies an orientation to a mask: flip first (if set), then rotate.
///
/// Always returns a fresh mask; the input is never aliased.
pub fn transform(mask: &ShapeMask, orientation: Orientation) -> ShapeMask {
    if orientation.flipped {
        rotate(&flip_h(mask), orientation.rotation)
    } else {
        rotate(mask, orientation.rotation)
    }
}

/// Generates all distinct masks in the D4 orbit of a mask.
///
/// Symmetric shapes produce fewer than 8 results.
pub fn distinct_orientations(mask: &ShapeMask) -> Vec<ShapeMask> {
    let mut orientations: Vec<ShapeMask> = Orientation::ALL
        .iter()
        .map(|&orientation| transform(mask, orientation))
        .collect();

    // symmetric shapes map onto themselves under several orientations
    orientations.sort();
    orientations.dedup();
    orientations
}
