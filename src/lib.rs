//! Polyomino Shape-Packing Puzzle Library
//!
//! Provides the core of a 2D packing puzzle: a level grid is split into
//! polyomino pieces, which the player rotates, flips and drops back onto the
//! board until every piece is placed. Rendering and input stay with the host;
//! drops arrive as board-local pixel points.

pub mod catalog;
pub mod engine;
pub mod error;
pub mod extract;
pub mod generator;
pub mod geometry;
pub mod grid;
pub mod level;
pub mod persistence;
pub mod pieces;
pub mod placement;
pub mod snap;
pub mod tray;

pub use catalog::{Catalog, LevelSource};
pub use engine::{Engine, EngineConfig, EngineSnapshot, Phase, PieceSnapshot, PlacementOutcome};
pub use error::{EngineError, LevelError};
pub use level::Level;
pub use snap::DropTarget;
