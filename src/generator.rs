//! Random level generation.
//!
//! Scatters blockers over an empty board, grows a handful of small
//! polyomino groups from random seed cells, then clears the first run of
//! group cells back to empty so the board has room to play.

use rand::Rng;

use crate::error::LevelError;
use crate::grid::{CellLabel, Grid};
use crate::level::Level;

/// Share of cells turned into blockers.
const BLOCKER_RATIO: f64 = 0.12;
/// Share of cells given to piece groups, at roughly four cells per group.
const GROUP_RATIO: f64 = 0.3;
const CELLS_PER_GROUP: f64 = 4.0;
/// Share of group cells cleared back to empty after growth.
const CLEAR_RATIO: f64 = 0.2;
const MAX_GROUPS: usize = 9;
const SEED_ATTEMPTS: usize = 100;

/// Builds a random `width` x `height` level.
///
/// Blocker positions may repeat, so the blocker count is an upper bound.
/// Each group is grown cell by cell to a random size of 2 to 4 by picking
/// uniformly among the empty neighbours of every cell already in the group.
pub fn generate_level(
    id: &str,
    name: &str,
    width: usize,
    height: usize,
    rng: &mut impl Rng,
) -> Result<Level, LevelError> {
    if width == 0 || height == 0 {
        return Err(LevelError::InvalidDimensions { width, height });
    }

    let area = (width * height) as f64;
    let mut cells = vec![vec![CellLabel::Empty; width]; height];

    let blockers = (area * BLOCKER_RATIO) as usize;
    for _ in 0..blockers {
        let x = rng.gen_range(0..width);
        let y = rng.gen_range(0..height);
        cells[y][x] = CellLabel::Blocker;
    }

    let groups = MAX_GROUPS.min((area * GROUP_RATIO / CELLS_PER_GROUP) as usize);
    for digit in 1..=groups as u8 {
        let label = CellLabel::Group(digit);
        let size = rng.gen_range(2..=4);
        if let Some((x, y)) = find_empty(&cells, rng) {
            cells[y][x] = label;
            grow(&mut cells, label, size, rng);
        } else {
            log::debug!("no empty cell found for group {digit}");
        }
    }

    let mut to_clear = (area * CLEAR_RATIO) as usize;
    for cell in cells.iter_mut().flatten() {
        if to_clear == 0 {
            break;
        }
        if matches!(cell, CellLabel::Group(_)) {
            *cell = CellLabel::Empty;
            to_clear -= 1;
        }
    }

    let grid = Grid::from_labels(cells)?;
    log::info!("generated {width}x{height} level {id:?}");
    Ok(Level::new(id, name, grid)
        .with_description(format!("A {width}x{height} puzzle board with various candy pieces.")))
}

/// Samples random cells until one is empty, giving up after a fixed number
/// of attempts.
fn find_empty(cells: &[Vec<CellLabel>], rng: &mut impl Rng) -> Option<(usize, usize)> {
    let (height, width) = (cells.len(), cells[0].len());
    (0..SEED_ATTEMPTS)
        .map(|_| (rng.gen_range(0..width), rng.gen_range(0..height)))
        .find(|&(x, y)| cells[y][x] == CellLabel::Empty)
}

/// Grows `label` one cell at a time until it has `size` cells or no empty
/// neighbour remains. A cell bordering several group cells appears once
/// per neighbour in the frontier, so it is proportionally more likely.
fn grow(cells: &mut [Vec<CellLabel>], label: CellLabel, size: usize, rng: &mut impl Rng) {
    let (height, width) = (cells.len(), cells[0].len());
    let mut frontier = Vec::new();

    for _ in 1..size {
        frontier.clear();
        for y in 0..height {
            for x in 0..width {
                if cells[y][x] != label {
                    continue;
                }
                if y > 0 && cells[y - 1][x] == CellLabel::Empty {
                    frontier.push((x, y - 1));
                }
                if y + 1 < height && cells[y + 1][x] == CellLabel::Empty {
                    frontier.push((x, y + 1));
                }
                if x > 0 && cells[y][x - 1] == CellLabel::Empty {
                    frontier.push((x - 1, y));
                }
                if x + 1 < width && cells[y][x + 1] == CellLabel::Empty {
                    frontier.push((x + 1, y));
                }
            }
        }

        if frontier.is_empty() {
            break;
        }
        let (x, y) = frontier[rng.gen_range(0..frontier.len())];
        cells[y][x] = label;
    }
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use rustc_hash::FxHashMap;

    use super::*;
    use crate::extract::components;

    fn generate(width: usize, height: usize, seed: u64) -> Level {
        generate_level("gen", "Generated", width, height, &mut StdRng::seed_from_u64(seed)).unwrap()
    }

    #[test]
    fn test_generated_dimensions_and_metadata() {
        let level = generate(7, 5, 1);
        assert_eq!(level.grid.cols(), 7);
        assert_eq!(level.grid.rows(), 5);
        assert_eq!(level.id, "gen");
        assert_eq!(
            level.description.as_deref(),
            Some("A 7x5 puzzle board with various candy pieces.")
        );
    }

    #[test]
    fn test_rejects_empty_dimensions() {
        let mut rng = StdRng::seed_from_u64(0);
        assert!(matches!(
            generate_level("gen", "Generated", 0, 4, &mut rng),
            Err(LevelError::InvalidDimensions { width: 0, height: 4 })
        ));
        assert!(generate_level("gen", "Generated", 4, 0, &mut rng).is_err());
    }

    #[test]
    fn test_group_and_blocker_bounds() {
        for seed in 0..50 {
            let level = generate(8, 6, seed);
            let mut per_label: FxHashMap<CellLabel, usize> = FxHashMap::default();
            let mut blockers = 0;
            for (_, label) in level.grid.iter() {
                match label {
                    CellLabel::Blocker => blockers += 1,
                    CellLabel::Group(digit) => {
                        // 8 * 6 * 0.075 = 3.6, so labels 1 to 3 only
                        assert!((1..=3).contains(&digit), "label {digit} out of range");
                        *per_label.entry(label).or_default() += 1;
                    }
                    CellLabel::Empty => {}
                }
            }
            assert!(blockers <= 5, "seed {seed}: {blockers} blockers");
            assert!(per_label.values().all(|&count| count <= 4));
        }
    }

    #[test]
    fn test_small_board_clears_most_group_cells() {
        // a 4x4 board has 1 blocker, 1 group of at most 4 cells and clears 3 cells
        for seed in 0..50 {
            let level = generate(4, 4, seed);
            let cells: usize = components(&level.grid)
                .iter()
                .map(|component| component.shape.filled_count())
                .sum();
            assert!(cells <= 1, "seed {seed} kept {cells} group cells");
        }
    }

    #[test]
    fn test_clears_group_cells_in_row_major_order() {
        // 10x10: 20 cells cleared, at most 28 grown; survivors are the last in scan order
        for seed in 0..20 {
            let level = generate(10, 10, seed);
            let grid = &level.grid;
            let first_group = grid.iter().position(|(_, label)| matches!(label, CellLabel::Group(_)));
            if let Some(first) = first_group {
                let blank_before = (0..first)
                    .filter(|&index| grid.label_at(index) == CellLabel::Empty)
                    .count();
                assert!(blank_before >= 20, "seed {seed}: only {blank_before} empties precede the first group");
            }
        }
    }

    #[test]
    fn test_same_seed_same_level() {
        assert_eq!(generate(9, 7, 42), generate(9, 7, 42));
    }

    #[test]
    fn test_tiny_board_has_no_groups() {
        let level = generate(1, 1, 3);
        assert_eq!(level.grid.to_strings(), vec!["0".to_string()]);
    }

    #[test]
    fn test_generated_level_round_trips_through_json() {
        let level = generate(6, 6, 8);
        let text = level.to_json().unwrap();
        assert_eq!(Level::from_json(&text).unwrap(), level);
    }
}
