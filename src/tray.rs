//! Tray layout for unplaced pieces.
//!
//! Pieces are laid out left to right in insertion order, wrapping to a new
//! row when the next piece would overrun the tray's usable width. Each row
//! is as tall as its tallest piece. Coordinates are tray-local pixels; the
//! renderer owns the tray's on-screen position.

use serde::{Deserialize, Serialize};

use crate::pieces::PixelPoint;

/// Tray geometry supplied by the renderer.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct TrayMetrics {
    /// Tray width in pixels.
    pub width: f64,
    /// Edge length of one grid cell in pixels.
    pub cell_size: f64,
    /// Gap around and between pieces in pixels.
    pub margin: f64,
}

impl Default for TrayMetrics {
    fn default() -> Self {
        Self {
            width: 600.0,
            cell_size: 60.0,
            margin: 10.0,
        }
    }
}

/// Computes the top-left slot of each piece from its `(cols, rows)` footprint.
///
/// A piece wider than the tray still gets its own row rather than leaving
/// an empty one above it.
pub fn layout(footprints: &[(usize, usize)], metrics: &TrayMetrics) -> Vec<PixelPoint> {
    let TrayMetrics {
        width,
        cell_size,
        margin,
    } = *metrics;

    let mut row_x = margin;
    let mut row_y = margin;
    let mut row_height: f64 = 0.0;

    footprints
        .iter()
        .map(|&(cols, rows)| {
            let piece_width = cols as f64 * cell_size + margin;
            let piece_height = rows as f64 * cell_size + margin;

            let row_started = row_x > margin;
            if row_started && row_x + piece_width > width - margin {
                row_x = margin;
                row_y += row_height + margin;
                row_height = 0.0;
            }

            let slot = PixelPoint::new(row_x, row_y);
            row_x += piece_width;
            row_height = row_height.max(piece_height);
            slot
        })
        .collect()
}
