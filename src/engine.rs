//! Puzzle engine state and commands.
//!
//! The engine owns the current level and its pieces. All mutation goes
//! through the command methods; readers get copied [`PieceSnapshot`]s.
//! Commands are synchronous and applied in call order.
//!
//! Completion follows a small state machine:
//!
//! ```text
//! Loading --extraction done--> Playing --all pieces placed--> Complete
//!                                 ^                              |
//!                                 +------ piece dislodged -------+
//! ```
//!
//! Loading a level always passes back through `Loading`.

use rand::rngs::StdRng;
use rand::SeedableRng;
use rustc_hash::FxHashMap;
use serde::Serialize;

use crate::catalog::LevelSource;
use crate::error::EngineError;
use crate::extract::extract_pieces;
use crate::geometry::{Orientation, ShapeMask};
use crate::grid::{CellSet, Coord};
use crate::level::Level;
use crate::pieces::{Piece, PieceId, PixelPoint, Position};
use crate::placement::covered_cells;
use crate::snap::{self, DropTarget};
use crate::tray::{self, TrayMetrics};

/// Completion state of the current level.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Loading,
    Playing,
    Complete,
}

/// Engine settings supplied by the host.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct EngineConfig {
    pub tray: TrayMetrics,
}

/// Result of a placement attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum PlacementOutcome {
    /// The piece now sits on this cell.
    Placed { cell: Coord },
    /// No legal cell near the drop point; the piece is loose at the drop site.
    Illegal,
    /// The drop was off the board; the piece went back to its tray slot.
    Stowed,
}

/// A read-only copy of one piece.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PieceSnapshot {
    pub id: PieceId,
    pub label: char,
    pub orientation: Orientation,
    pub base_shape: ShapeMask,
    pub shape: ShapeMask,
    pub color: &'static str,
    pub is_placed: bool,
    pub position: Position,
    pub tray_slot: PixelPoint,
}

impl From<&Piece> for PieceSnapshot {
    fn from(piece: &Piece) -> Self {
        Self {
            id: piece.id().clone(),
            label: piece.label().as_char(),
            orientation: piece.orientation(),
            base_shape: piece.base_shape().clone(),
            shape: piece.shape(),
            color: piece.color(),
            is_placed: piece.is_placed(),
            position: piece.position(),
            tray_slot: piece.tray_slot(),
        }
    }
}

/// A read-only copy of the whole engine state.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct EngineSnapshot {
    pub level_id: Option<String>,
    pub phase: Phase,
    pub is_complete: bool,
    pub pieces: Vec<PieceSnapshot>,
}

/// The puzzle engine.
#[derive(Debug)]
pub struct Engine {
    config: EngineConfig,
    level: Option<Level>,
    pieces: Vec<Piece>,
    index: FxHashMap<PieceId, usize>,
    occupied: CellSet,
    phase: Phase,
    rng: StdRng,
}

impl Engine {
    /// Creates an engine whose initial orientations come from OS entropy.
    pub fn new(config: EngineConfig) -> Self {
        Self::with_rng(config, StdRng::from_entropy())
    }

    /// Creates an engine with reproducible initial orientations.
    pub fn with_seed(config: EngineConfig, seed: u64) -> Self {
        Self::with_rng(config, StdRng::seed_from_u64(seed))
    }

    fn with_rng(config: EngineConfig, rng: StdRng) -> Self {
        Self {
            config,
            level: None,
            pieces: Vec::new(),
            index: FxHashMap::default(),
            occupied: CellSet::default(),
            phase: Phase::Loading,
            rng,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Updates the tray geometry. Takes effect at the next load or reset.
    pub fn set_tray_metrics(&mut self, metrics: TrayMetrics) {
        self.config.tray = metrics;
    }

    pub fn level(&self) -> Option<&Level> {
        self.level.as_ref()
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Replaces the whole state with freshly extracted pieces of `level`.
    pub fn load_level(&mut self, level: Level) {
        self.phase = Phase::Loading;

        self.pieces = extract_pieces(&level.grid, &mut self.rng);
        self.index = self
            .pieces
            .iter()
            .enumerate()
            .map(|(slot, piece)| (piece.id().clone(), slot))
            .collect();
        self.occupied = CellSet::with_capacity(level.grid.len());
        log::info!(
            "loaded level {:?} ({}x{}) with {} pieces",
            level.id,
            level.grid.cols(),
            level.grid.rows(),
            self.pieces.len()
        );
        self.level = Some(level);

        self.lay_out_tray();
        self.phase = Phase::Playing;
        self.update_phase();
    }

    /// Fetches a level by id and loads it. On failure the current state is
    /// left untouched.
    pub fn load_level_by_id(
        &mut self,
        source: &impl LevelSource,
        id: &str,
    ) -> Result<(), EngineError> {
        let level = source.fetch(id).inspect_err(|e| {
            log::warn!("failed to load level {id:?}: {e}");
        })?;
        self.load_level(level);
        Ok(())
    }

    /// Rotates an unplaced piece a quarter turn clockwise. Placed pieces
    /// are left alone. Returns whether the orientation changed.
    pub fn rotate(&mut self, id: &str) -> Result<bool, EngineError> {
        let slot = self.slot_of(id)?;
        let piece = &mut self.pieces[slot];
        if piece.is_placed() {
            return Ok(false);
        }
        piece.orientation = piece.orientation.rotated();
        Ok(true)
    }

    /// Toggles the horizontal flip of an unplaced piece. Placed pieces are
    /// left alone. Returns whether the orientation changed.
    pub fn flip(&mut self, id: &str) -> Result<bool, EngineError> {
        let slot = self.slot_of(id)?;
        let piece = &mut self.pieces[slot];
        if piece.is_placed() {
            return Ok(false);
        }
        piece.orientation = piece.orientation.toggled_flip();
        Ok(true)
    }

    /// Drops a piece. Over the board, the snap resolver picks the cell;
    /// off the board, the piece returns to its tray slot. A piece that was
    /// placed is picked up first, so an unsuccessful drop leaves it unplaced.
    pub fn attempt_placement(
        &mut self,
        id: &str,
        target: DropTarget,
        cell_size: f64,
    ) -> Result<PlacementOutcome, EngineError> {
        let slot = self.slot_of(id)?;
        self.release(slot);

        let outcome = match (target, self.level.as_ref()) {
            (DropTarget::Board { at }, Some(level)) => {
                let piece = &mut self.pieces[slot];
                let mask = piece.shape();
                match snap::resolve(&level.grid, &self.occupied, &mask, at, cell_size) {
                    Some(cell) => {
                        for index in covered_cells(&level.grid, &mask, cell) {
                            self.occupied.insert(index);
                        }
                        piece.position = Position::Board { cell };
                        PlacementOutcome::Placed { cell }
                    }
                    None => {
                        piece.position = Position::Loose { at };
                        PlacementOutcome::Illegal
                    }
                }
            }
            _ => {
                let piece = &mut self.pieces[slot];
                piece.position = Position::Tray {
                    at: piece.tray_slot,
                };
                PlacementOutcome::Stowed
            }
        };

        log::debug!("drop of {id} resolved to {outcome:?}");
        self.update_phase();
        Ok(outcome)
    }

    /// Returns a piece to its tray slot, picking it up if it was placed.
    /// Returns whether the piece was placed.
    pub fn stow(&mut self, id: &str) -> Result<bool, EngineError> {
        let slot = self.slot_of(id)?;
        let was_placed = self.release(slot);
        let piece = &mut self.pieces[slot];
        piece.position = Position::Tray {
            at: piece.tray_slot,
        };
        self.update_phase();
        Ok(was_placed)
    }

    /// Unplaces every piece and lays them out in the tray again, keeping
    /// their current orientations.
    pub fn reset(&mut self) {
        self.occupied.clear();
        self.lay_out_tray();
        if self.level.is_some() {
            self.phase = Phase::Playing;
            self.update_phase();
        }
    }

    /// True iff a level is loaded and every one of its pieces is placed.
    pub fn is_complete(&self) -> bool {
        self.level.is_some() && self.pieces.iter().all(Piece::is_placed)
    }

    /// Snapshots of all pieces in insertion order.
    pub fn pieces(&self) -> Vec<PieceSnapshot> {
        self.pieces.iter().map(PieceSnapshot::from).collect()
    }

    pub fn piece(&self, id: &str) -> Result<PieceSnapshot, EngineError> {
        self.slot_of(id).map(|slot| PieceSnapshot::from(&self.pieces[slot]))
    }

    pub fn snapshot(&self) -> EngineSnapshot {
        EngineSnapshot {
            level_id: self.level.as_ref().map(|level| level.id.clone()),
            phase: self.phase,
            is_complete: self.is_complete(),
            pieces: self.pieces(),
        }
    }

    fn slot_of(&self, id: &str) -> Result<usize, EngineError> {
        self.index.get(id).copied().ok_or_else(|| {
            log::warn!("command referenced unknown piece {id:?}");
            EngineError::UnknownPiece(id.to_string())
        })
    }

    /// Frees the cells of a placed piece and moves it to its tray slot.
    /// Returns whether the piece was placed.
    fn release(&mut self, slot: usize) -> bool {
        let piece = &mut self.pieces[slot];
        let (Some(cell), Some(level)) = (piece.cell(), self.level.as_ref()) else {
            return false;
        };
        for index in covered_cells(&level.grid, &piece.shape(), cell) {
            self.occupied.remove(index);
        }
        piece.position = Position::Tray {
            at: piece.tray_slot,
        };
        true
    }

    fn lay_out_tray(&mut self) {
        let footprints: Vec<(usize, usize)> = self.pieces.iter().map(Piece::footprint).collect();
        let slots = tray::layout(&footprints, &self.config.tray);
        for (piece, slot) in self.pieces.iter_mut().zip(slots) {
            piece.tray_slot = slot;
            piece.position = Position::Tray { at: slot };
        }
    }

    fn update_phase(&mut self) {
        let next = if self.is_complete() {
            Phase::Complete
        } else {
            Phase::Playing
        };
        if next != self.phase {
            match next {
                Phase::Complete => log::info!("level complete"),
                _ => log::debug!("phase {:?} -> {:?}", self.phase, next),
            }
        }
        self.phase = next;
    }
}

#[cfg(test)]
mod tests {
    use rand::Rng;

    use super::*;
    use crate::catalog::Catalog;
    use crate::error::LevelError;
    use crate::extract::components;
    use crate::generator::generate_level;
    use crate::geometry::Rotation;
    use crate::grid::Grid;

    const CELL: f64 = 60.0;

    fn level(rows: &[&str]) -> Level {
        Level::new("test", "Test", Grid::from_rows(rows).unwrap())
    }

    fn engine_with(rows: &[&str]) -> Engine {
        let mut engine = Engine::with_seed(EngineConfig::default(), 7);
        engine.load_level(level(rows));
        engine
    }

    /// Drives rotate/flip until the piece has the wanted orientation.
    fn orient(engine: &mut Engine, id: &str, wanted: Orientation) {
        if engine.piece(id).unwrap().orientation.flipped != wanted.flipped {
            engine.flip(id).unwrap();
        }
        while engine.piece(id).unwrap().orientation.rotation != wanted.rotation {
            engine.rotate(id).unwrap();
        }
    }

    fn drop_at(engine: &mut Engine, id: &str, x: f64, y: f64) -> PlacementOutcome {
        let target = DropTarget::Board {
            at: PixelPoint::new(x, y),
        };
        engine.attempt_placement(id, target, CELL).unwrap()
    }

    fn assert_invariants(engine: &Engine) {
        let grid = &engine.level().unwrap().grid;
        let mut covered = vec![false; grid.len()];
        let pieces = engine.pieces();
        for piece in &pieces {
            let Position::Board { cell: (gx, gy) } = piece.position else {
                assert!(!piece.is_placed);
                continue;
            };
            assert!(piece.is_placed);
            for (y, x) in piece.shape.filled_cells() {
                let index = grid
                    .index_of((gx + x as i32, gy + y as i32))
                    .unwrap_or_else(|| panic!("{} hangs off the grid", piece.id));
                assert!(!grid.label_at(index).is_blocker(), "{} covers a blocker", piece.id);
                assert!(!covered[index], "cell {index} covered twice");
                covered[index] = true;
            }
        }
        assert_eq!(
            engine.occupied.count(),
            covered.iter().filter(|&&c| c).count(),
            "occupancy out of sync"
        );
        let all_placed = pieces.iter().all(|piece| piece.is_placed);
        assert_eq!(engine.is_complete(), all_placed);
        assert_eq!(engine.phase() == Phase::Complete, all_placed);
    }

    #[test]
    fn test_trivial_square_completes() {
        for orientation in Orientation::ALL {
            let mut engine = engine_with(&["11", "11"]);
            assert_eq!(engine.phase(), Phase::Playing);
            orient(&mut engine, "1#0", orientation);
            let outcome = drop_at(&mut engine, "1#0", 0.0, 0.0);
            assert_eq!(outcome, PlacementOutcome::Placed { cell: (0, 0) });
            assert!(engine.is_complete());
            assert_eq!(engine.phase(), Phase::Complete);
        }
    }

    #[test]
    fn test_rotated_l_tromino_rejected_by_blocker() {
        let mut engine = engine_with(&["1X", "11"]);
        orient(&mut engine, "1#0", Orientation::IDENTITY);
        engine.rotate("1#0").unwrap();
        engine.rotate("1#0").unwrap();
        let piece = engine.piece("1#0").unwrap();
        assert_eq!(piece.orientation.rotation, Rotation::Deg180);
        assert_eq!(piece.shape, ShapeMask::from_pattern(&["##", ".#"]).unwrap());

        let outcome = drop_at(&mut engine, "1#0", 0.0, 0.0);
        assert_eq!(outcome, PlacementOutcome::Illegal);
        let piece = engine.piece("1#0").unwrap();
        assert!(!piece.is_placed);
        assert_eq!(
            piece.position,
            Position::Loose {
                at: PixelPoint::new(0.0, 0.0)
            }
        );

        orient(&mut engine, "1#0", Orientation::IDENTITY);
        let outcome = drop_at(&mut engine, "1#0", 0.0, 0.0);
        assert_eq!(outcome, PlacementOutcome::Placed { cell: (0, 0) });
    }

    #[test]
    fn test_magnetic_snap_through_engine() {
        let mut engine = engine_with(&["00000", "00000", "00000", "00000", "00001"]);
        let outcome = drop_at(&mut engine, "1#0", 31.0, 89.0);
        assert_eq!(outcome, PlacementOutcome::Placed { cell: (1, 1) });
    }

    #[test]
    fn test_neighbourhood_fallback_through_engine() {
        let mut engine = engine_with(&["X00", "000", "001"]);
        let outcome = drop_at(&mut engine, "1#0", 10.0, 10.0);
        assert_eq!(outcome, PlacementOutcome::Placed { cell: (1, 0) });
    }

    #[test]
    fn test_dislodge_returns_to_playing() {
        let mut engine = engine_with(&["12", "12"]);
        orient(&mut engine, "1#0", Orientation::IDENTITY);
        orient(&mut engine, "2#0", Orientation::IDENTITY);
        drop_at(&mut engine, "1#0", 0.0, 0.0);
        drop_at(&mut engine, "2#0", 60.0, 0.0);
        assert!(engine.is_complete());

        let outcome = engine
            .attempt_placement("1#0", DropTarget::OffBoard, CELL)
            .unwrap();
        assert_eq!(outcome, PlacementOutcome::Stowed);
        let piece = engine.piece("1#0").unwrap();
        assert!(!piece.is_placed);
        assert_eq!(piece.position, Position::Tray { at: piece.tray_slot });
        assert!(!engine.is_complete());
        assert_eq!(engine.phase(), Phase::Playing);
        assert_invariants(&engine);
    }

    #[test]
    fn test_rotate_and_flip_ignore_placed_piece() {
        let mut engine = engine_with(&["11", "11"]);
        drop_at(&mut engine, "1#0", 0.0, 0.0);
        let before = engine.piece("1#0").unwrap();

        assert!(!engine.rotate("1#0").unwrap());
        assert!(!engine.flip("1#0").unwrap());
        assert_eq!(engine.piece("1#0").unwrap(), before);
    }

    #[test]
    fn test_rotation_wraps_after_four_turns() {
        let mut engine = engine_with(&["10", "11"]);
        let start = engine.piece("1#0").unwrap().orientation;
        for _ in 0..4 {
            assert!(engine.rotate("1#0").unwrap());
        }
        assert_eq!(engine.piece("1#0").unwrap().orientation, start);
        assert!(engine.flip("1#0").unwrap());
        assert_eq!(engine.piece("1#0").unwrap().orientation, start.toggled_flip());
    }

    #[test]
    fn test_unknown_piece_is_an_error() {
        let mut engine = engine_with(&["11"]);
        assert!(matches!(engine.rotate("9#9"), Err(EngineError::UnknownPiece(id)) if id == "9#9"));
        assert!(engine.flip("nope").is_err());
        assert!(engine.stow("nope").is_err());
        assert!(engine
            .attempt_placement("nope", DropTarget::OffBoard, CELL)
            .is_err());
    }

    #[test]
    fn test_pieces_exclude_each_other() {
        let mut engine = engine_with(&["1100", "0000"]);
        orient(&mut engine, "1#0", Orientation::IDENTITY);
        assert_eq!(
            drop_at(&mut engine, "1#0", 60.0, 0.0),
            PlacementOutcome::Placed { cell: (1, 0) }
        );

        // a second level with two dominoes competing for one row
        let mut engine = engine_with(&["1122"]);
        orient(&mut engine, "1#0", Orientation::IDENTITY);
        orient(&mut engine, "2#0", Orientation::IDENTITY);
        drop_at(&mut engine, "1#0", 60.0, 0.0);
        // every in-bounds cell near (1,0) overlaps the first domino
        let outcome = drop_at(&mut engine, "2#0", 60.0, 0.0);
        assert_eq!(outcome, PlacementOutcome::Illegal);
        assert_invariants(&engine);
    }

    #[test]
    fn test_moving_placed_piece_frees_its_cells() {
        let mut engine = engine_with(&["11", "00"]);
        orient(&mut engine, "1#0", Orientation::IDENTITY);
        drop_at(&mut engine, "1#0", 0.0, 0.0);
        let outcome = drop_at(&mut engine, "1#0", 0.0, 60.0);
        assert_eq!(outcome, PlacementOutcome::Placed { cell: (0, 1) });
        assert_invariants(&engine);

        // dropping back onto its own old cells is legal again
        let outcome = drop_at(&mut engine, "1#0", 0.0, 0.0);
        assert_eq!(outcome, PlacementOutcome::Placed { cell: (0, 0) });
    }

    #[test]
    fn test_failed_drop_unplaces_piece() {
        let mut engine = engine_with(&["11", "1X"]);
        orient(&mut engine, "1#0", Orientation::IDENTITY);
        drop_at(&mut engine, "1#0", 0.0, 0.0);
        assert!(engine.is_complete());

        engine.stow("1#0").unwrap();
        orient(&mut engine, "1#0", Orientation::new(Rotation::Deg180, false));
        assert_eq!(drop_at(&mut engine, "1#0", 0.0, 0.0), PlacementOutcome::Illegal);
        assert!(!engine.is_complete());
        assert_eq!(engine.occupied.count(), 0);
    }

    #[test]
    fn test_reset_keeps_orientation_and_is_idempotent() {
        let catalog = Catalog::builtin().unwrap();
        let mut engine = Engine::with_seed(EngineConfig::default(), 3);
        engine.load_level_by_id(&catalog, "level3").unwrap();
        let orientations: Vec<Orientation> =
            engine.pieces().iter().map(|piece| piece.orientation).collect();
        let (ox, oy) = components(&engine.level().unwrap().grid)[0].origin;
        let first = engine.pieces()[0].id.clone();
        orient(&mut engine, first.as_str(), Orientation::IDENTITY);
        drop_at(&mut engine, first.as_str(), ox as f64 * CELL, oy as f64 * CELL);

        engine.reset();
        let once = engine.snapshot();
        engine.reset();
        let twice = engine.snapshot();
        assert_eq!(once, twice);
        assert!(once.pieces.iter().all(|piece| !piece.is_placed));
        assert_eq!(once.phase, Phase::Playing);
        assert_eq!(once.pieces[0].orientation, Orientation::IDENTITY);
        for (piece, original) in once.pieces.iter().zip(&orientations).skip(1) {
            assert_eq!(piece.orientation, *original);
        }
        assert_eq!(engine.occupied.count(), 0);
    }

    #[test]
    fn test_reset_lays_out_tray_in_insertion_order() {
        let mut engine = Engine::with_seed(
            EngineConfig {
                tray: TrayMetrics {
                    width: 1000.0,
                    cell_size: 10.0,
                    margin: 5.0,
                },
            },
            1,
        );
        engine.load_level(level(&["1203"]));
        let xs: Vec<f64> = engine.pieces().iter().map(|piece| piece.tray_slot.x).collect();
        // three monominoes, each 10px wide plus a 5px margin
        assert_eq!(xs, vec![5.0, 20.0, 35.0]);
    }

    #[test]
    fn test_tray_metrics_apply_on_reset() {
        let mut engine = engine_with(&["1203"]);
        let before: Vec<f64> = engine.pieces().iter().map(|piece| piece.tray_slot.x).collect();

        engine.set_tray_metrics(TrayMetrics {
            width: 1000.0,
            cell_size: 10.0,
            margin: 5.0,
        });
        assert_eq!(engine.config().tray.margin, 5.0);
        let unchanged: Vec<f64> = engine.pieces().iter().map(|piece| piece.tray_slot.x).collect();
        assert_eq!(unchanged, before, "slots moved before reset");

        engine.reset();
        let after: Vec<f64> = engine.pieces().iter().map(|piece| piece.tray_slot.x).collect();
        assert_eq!(after, vec![5.0, 20.0, 35.0]);
        for piece in engine.pieces() {
            assert_eq!(piece.position, Position::Tray { at: piece.tray_slot });
        }
    }

    #[test]
    fn test_far_drop_is_illegal() {
        let mut engine = engine_with(&["000", "010"]);
        for x in [1e12, -1e12] {
            let outcome = drop_at(&mut engine, "1#0", x, 0.0);
            assert_eq!(outcome, PlacementOutcome::Illegal, "drop at x = {x}");
            let piece = engine.piece("1#0").unwrap();
            assert_eq!(
                piece.position,
                Position::Loose {
                    at: PixelPoint::new(x, 0.0)
                }
            );
            assert_invariants(&engine);
        }

        assert_eq!(drop_at(&mut engine, "1#0", 60.0, 60.0), PlacementOutcome::Placed { cell: (1, 1) });
        assert!(engine.is_complete());
    }

    #[test]
    fn test_placing_pieces_at_their_origins_solves_builtin_levels() {
        let catalog = Catalog::builtin().unwrap();
        for id in catalog.ids() {
            let mut engine = Engine::with_seed(EngineConfig::default(), 11);
            engine.load_level_by_id(&catalog, id).unwrap();
            let origins: Vec<Coord> = components(&engine.level().unwrap().grid)
                .iter()
                .map(|component| component.origin)
                .collect();
            let ids: Vec<PieceId> = engine.pieces().into_iter().map(|piece| piece.id).collect();
            for (piece_id, (ox, oy)) in ids.iter().zip(origins) {
                orient(&mut engine, piece_id.as_str(), Orientation::IDENTITY);
                let outcome = drop_at(&mut engine, piece_id.as_str(), ox as f64 * CELL, oy as f64 * CELL);
                assert_eq!(outcome, PlacementOutcome::Placed { cell: (ox, oy) }, "{id}: {piece_id}");
                assert_invariants(&engine);
            }
            assert!(engine.is_complete(), "{id} should be complete");
        }
    }

    #[test]
    fn test_failed_load_keeps_previous_state() {
        let catalog = Catalog::builtin().unwrap();
        let mut engine = Engine::with_seed(EngineConfig::default(), 5);
        engine.load_level_by_id(&catalog, "level1").unwrap();
        let before = engine.snapshot();

        let err = engine.load_level_by_id(&catalog, "missing").unwrap_err();
        assert!(matches!(err, EngineError::Level(LevelError::UnknownLevel(_))));
        assert_eq!(engine.snapshot(), before);
    }

    #[test]
    fn test_fresh_engine_is_loading() {
        let engine = Engine::with_seed(EngineConfig::default(), 0);
        assert_eq!(engine.phase(), Phase::Loading);
        assert!(!engine.is_complete());
        assert!(engine.pieces().is_empty());
    }

    #[test]
    fn test_level_without_pieces_is_complete() {
        let engine = engine_with(&["0X", "00"]);
        assert!(engine.is_complete());
        assert_eq!(engine.phase(), Phase::Complete);
    }

    #[test]
    fn test_random_play_preserves_invariants() {
        for seed in 0..16 {
            let mut rng = StdRng::seed_from_u64(seed);
            let level = generate_level("rand", "Random", 7, 6, &mut rng).unwrap();
            let (cols, rows) = (level.grid.cols() as f64, level.grid.rows() as f64);
            let mut engine = Engine::with_seed(EngineConfig::default(), seed);
            engine.load_level(level);
            let ids: Vec<PieceId> = engine.pieces().into_iter().map(|piece| piece.id).collect();
            if ids.is_empty() {
                continue;
            }

            for _ in 0..200 {
                let id = ids[rng.gen_range(0..ids.len())].as_str();
                match rng.gen_range(0..10) {
                    0 => {
                        engine.rotate(id).unwrap();
                    }
                    1 => {
                        engine.flip(id).unwrap();
                    }
                    2 => {
                        engine.attempt_placement(id, DropTarget::OffBoard, CELL).unwrap();
                    }
                    3 if rng.gen_bool(0.1) => engine.reset(),
                    _ => {
                        let x = rng.gen_range(-CELL..cols * CELL);
                        let y = rng.gen_range(-CELL..rows * CELL);
                        if let PlacementOutcome::Placed { cell } = drop_at(&mut engine, id, x, y) {
                            let (sx, sy) = snap::snap_cell(PixelPoint::new(x, y), CELL);
                            assert!((cell.0 - sx).abs().max((cell.1 - sy).abs()) <= 2);
                        }
                    }
                }
                assert_invariants(&engine);
            }
        }
    }

    #[test]
    fn test_snapshot_serializes_to_json() {
        let engine = engine_with(&["1"]);
        let json = serde_json::to_value(engine.snapshot()).unwrap();
        assert_eq!(json["level_id"], "test");
        assert_eq!(json["phase"], "playing");
        assert_eq!(json["pieces"][0]["id"], "1#0");
        assert_eq!(json["pieces"][0]["base_shape"], serde_json::json!([[true]]));
        assert_eq!(json["pieces"][0]["position"]["kind"], "tray");
    }
}
