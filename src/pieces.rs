//! Puzzle piece definitions.
//!
//! A piece is one connected component of a piece group in the level grid.
//! Its base shape is fixed at extraction; only its orientation and position
//! change during play.

use std::borrow::Borrow;
use std::fmt;

use serde::Serialize;

use crate::geometry::{transform, Orientation, ShapeMask};
use crate::grid::{CellLabel, Coord};

/// Piece colors, indexed by the label's character code modulo the length.
pub const PALETTE: [&str; 18] = [
    "#FF9AA2", // light pink
    "#FFB7B2", // light salmon
    "#FFDAC1", // light peach
    "#E2F0CB", // light lime
    "#B5EAD7", // light mint
    "#C7CEEA", // light blue
    "#F8C8DC", // pastel pink
    "#FDFD96", // pastel yellow
    "#B4F8C8", // pastel green
    "#BCD4E6", // pastel blue
    "#C3B1E1", // lavender
    "#CCCCFF", // periwinkle
    "#FFD1DC", // pink
    "#FFC8A2", // peach
    "#D4F0F0", // light teal
    "#FFFFD8", // light yellow
    "#FFE4E1", // misty rose
    "#E6E6FA", // lavender mist
];

/// Returns the display color for a label. Depends on the label alone, so
/// every piece of a group shares one color across extractions.
pub fn color_for_label(label: CellLabel) -> &'static str {
    let code = label.as_char() as usize;
    PALETTE[code % PALETTE.len()]
}

/// Stable piece identifier of the form `<label>#<ordinal>`, where the
/// ordinal counts pieces of the same label in extraction order.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct PieceId(String);

impl PieceId {
    pub fn new(label: CellLabel, ordinal: usize) -> Self {
        Self(format!("{}#{}", label.as_char(), ordinal))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for PieceId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PieceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A point in pixel space.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct PixelPoint {
    pub x: f64,
    pub y: f64,
}

impl PixelPoint {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Where a piece currently is.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Position {
    /// Placed with the top-left of its transformed mask on a grid cell.
    Board { cell: Coord },
    /// Resting in the tray, at tray-local pixel coordinates.
    Tray { at: PixelPoint },
    /// Left where a rejected drop released it, in board-local pixels.
    Loose { at: PixelPoint },
}

/// A puzzle piece.
#[derive(Clone, Debug, PartialEq)]
pub struct Piece {
    pub(crate) id: PieceId,
    pub(crate) label: CellLabel,
    pub(crate) base_shape: ShapeMask,
    pub(crate) orientation: Orientation,
    pub(crate) color: &'static str,
    pub(crate) position: Position,
    pub(crate) tray_slot: PixelPoint,
}

impl Piece {
    /// Creates an unplaced piece resting at the tray origin.
    pub fn new(id: PieceId, label: CellLabel, base_shape: ShapeMask, orientation: Orientation) -> Self {
        Self {
            id,
            label,
            base_shape,
            orientation,
            color: color_for_label(label),
            position: Position::Tray {
                at: PixelPoint::default(),
            },
            tray_slot: PixelPoint::default(),
        }
    }

    pub fn id(&self) -> &PieceId {
        &self.id
    }

    pub fn label(&self) -> CellLabel {
        self.label
    }

    pub fn base_shape(&self) -> &ShapeMask {
        &self.base_shape
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    pub fn color(&self) -> &'static str {
        self.color
    }

    pub fn position(&self) -> Position {
        self.position
    }

    /// The tray slot assigned by the last tray layout.
    pub fn tray_slot(&self) -> PixelPoint {
        self.tray_slot
    }

    /// The base shape under the current orientation.
    pub fn shape(&self) -> ShapeMask {
        transform(&self.base_shape, self.orientation)
    }

    /// Current footprint as `(cols, rows)` in cells.
    pub fn footprint(&self) -> (usize, usize) {
        let (rows, cols) = (self.base_shape.rows(), self.base_shape.cols());
        if self.orientation.rotation.quarter_turns() % 2 == 0 {
            (cols, rows)
        } else {
            (rows, cols)
        }
    }

    pub fn is_placed(&self) -> bool {
        matches!(self.position, Position::Board { .. })
    }

    /// The grid cell of a placed piece.
    pub fn cell(&self) -> Option<Coord> {
        match self.position {
            Position::Board { cell } => Some(cell),
            _ => None,
        }
    }
}
