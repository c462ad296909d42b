//! Error types for level loading and engine commands.

use std::path::PathBuf;

/// A level could not be produced or failed schema validation.
///
/// Fatal for the attempted load; the engine keeps its previous state.
#[derive(Debug, thiserror::Error)]
pub enum LevelError {
    #[error("failed to read level file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed level json: {0}")]
    Json(#[from] serde_json::Error),

    #[error("level grid has no rows")]
    EmptyGrid,

    #[error("row {row} of the level grid is empty")]
    EmptyRow { row: usize },

    #[error("jagged grid: row {row} has {found} cells, expected {expected}")]
    Jagged {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("illegal cell label {found:?} at row {row}, column {col}")]
    IllegalLabel {
        row: usize,
        col: usize,
        found: String,
    },

    #[error("unknown level id {0:?}")]
    UnknownLevel(String),

    #[error("invalid level dimensions {width}x{height}")]
    InvalidDimensions { width: usize, height: usize },
}

/// A command could not be applied to the engine state.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("unknown piece id {0:?}")]
    UnknownPiece(String),

    #[error(transparent)]
    Level(#[from] LevelError),
}
