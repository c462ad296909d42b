//! Level grid representation.
//!
//! The grid is stored as a flat row-major vector of [`CellLabel`]s. Cell
//! coordinates are `(x, y)` pairs with `x` the column and `y` the row, and
//! linear indices are `y * cols + x`.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::LevelError;

/// A grid cell coordinate `(x, y)`. Signed so that candidate cells left of
/// or above the board can be expressed.
pub type Coord = (i32, i32);

/// One character of a level grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CellLabel {
    /// `X`: no piece may cover this cell.
    Blocker,
    /// `0`: a free target cell.
    Empty,
    /// `1`..`9`: a cell belonging to a piece group.
    Group(u8),
}

impl CellLabel {
    /// Parses a label from the closed alphabet `X`, `0`..`9`.
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            'X' => Some(CellLabel::Blocker),
            '0' => Some(CellLabel::Empty),
            '1'..='9' => Some(CellLabel::Group(c as u8 - b'0')),
            _ => None,
        }
    }

    pub fn as_char(self) -> char {
        match self {
            CellLabel::Blocker => 'X',
            CellLabel::Empty => '0',
            CellLabel::Group(digit) => char::from(b'0' + digit),
        }
    }

    #[inline]
    pub fn is_blocker(self) -> bool {
        self == CellLabel::Blocker
    }
}

/// An immutable, validated rectangular grid of cell labels.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<RawRow>", into = "Vec<String>")]
pub struct Grid {
    rows: usize,
    cols: usize,
    cells: Vec<CellLabel>,
}

/// A grid row as it appears in level files: a string, or an array of
/// one-character strings.
#[derive(Clone, Debug, Deserialize)]
#[serde(untagged)]
pub enum RawRow {
    Text(String),
    Cells(Vec<String>),
}

impl Grid {
    /// Parses a grid from text rows such as `["X00", "011"]`.
    pub fn from_rows<S: AsRef<str>>(rows: &[S]) -> Result<Self, LevelError> {
        let label_rows = rows
            .iter()
            .enumerate()
            .map(|(row, text)| {
                text.as_ref()
                    .chars()
                    .enumerate()
                    .map(|(col, c)| {
                        CellLabel::from_char(c).ok_or_else(|| LevelError::IllegalLabel {
                            row,
                            col,
                            found: c.to_string(),
                        })
                    })
                    .collect::<Result<Vec<_>, _>>()
            })
            .collect::<Result<Vec<_>, _>>()?;
        Self::from_labels(label_rows)
    }

    /// Builds a grid from label rows, rejecting empty and jagged input.
    pub fn from_labels(label_rows: Vec<Vec<CellLabel>>) -> Result<Self, LevelError> {
        let cols = label_rows.first().ok_or(LevelError::EmptyGrid)?.len();
        let mut cells = Vec::with_capacity(label_rows.len() * cols);
        for (row, labels) in label_rows.iter().enumerate() {
            if labels.is_empty() {
                return Err(LevelError::EmptyRow { row });
            }
            if labels.len() != cols {
                return Err(LevelError::Jagged {
                    row,
                    expected: cols,
                    found: labels.len(),
                });
            }
            cells.extend_from_slice(labels);
        }
        Ok(Self {
            rows: label_rows.len(),
            cols,
            cells,
        })
    }

    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    #[inline]
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Total number of cells.
    #[inline]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Converts a coordinate to a linear index, or `None` if off the grid.
    #[inline]
    pub fn index_of(&self, (x, y): Coord) -> Option<usize> {
        if x < 0 || y < 0 || x as usize >= self.cols || y as usize >= self.rows {
            return None;
        }
        Some(y as usize * self.cols + x as usize)
    }

    /// Converts a linear index back to a coordinate.
    #[inline]
    pub fn coord_of(&self, index: usize) -> Coord {
        ((index % self.cols) as i32, (index / self.cols) as i32)
    }

    /// The label at a coordinate, or `None` if off the grid.
    #[inline]
    pub fn get(&self, coord: Coord) -> Option<CellLabel> {
        self.index_of(coord).map(|index| self.cells[index])
    }

    #[inline]
    pub fn label_at(&self, index: usize) -> CellLabel {
        self.cells[index]
    }

    /// Iterates all cells in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (Coord, CellLabel)> + '_ {
        self.cells
            .iter()
            .enumerate()
            .map(|(index, &label)| (self.coord_of(index), label))
    }

    /// Distinct piece-group labels in order of first row-major appearance.
    pub fn group_labels(&self) -> Vec<CellLabel> {
        let mut seen = [false; 10];
        let mut labels = Vec::new();
        for &label in &self.cells {
            if let CellLabel::Group(digit) = label {
                if !seen[digit as usize] {
                    seen[digit as usize] = true;
                    labels.push(label);
                }
            }
        }
        labels
    }

    /// Rows rendered as label strings.
    pub fn to_strings(&self) -> Vec<String> {
        self.cells
            .chunks(self.cols)
            .map(|row| row.iter().map(|label| label.as_char()).collect())
            .collect()
    }
}

impl TryFrom<Vec<RawRow>> for Grid {
    type Error = LevelError;

    fn try_from(raw_rows: Vec<RawRow>) -> Result<Self, Self::Error> {
        let mut text_rows = Vec::with_capacity(raw_rows.len());
        for (row, raw) in raw_rows.into_iter().enumerate() {
            match raw {
                RawRow::Text(text) => text_rows.push(text),
                RawRow::Cells(cells) => {
                    let mut text = String::with_capacity(cells.len());
                    for (col, cell) in cells.iter().enumerate() {
                        let mut chars = cell.chars();
                        match (chars.next(), chars.next()) {
                            (Some(c), None) => text.push(c),
                            _ => {
                                return Err(LevelError::IllegalLabel {
                                    row,
                                    col,
                                    found: cell.clone(),
                                })
                            }
                        }
                    }
                    text_rows.push(text);
                }
            }
        }
        Grid::from_rows(&text_rows)
    }
}

impl From<Grid> for Vec<String> {
    fn from(grid: Grid) -> Self {
        grid.to_strings()
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.to_strings() {
            writeln!(f, "{row}")?;
        }
        Ok(())
    }
}

/// A fixed-capacity bitset over linear cell indices.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CellSet {
    words: Vec<u64>,
}

impl CellSet {
    /// Creates an empty set able to hold indices `0..capacity`.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            words: vec![0; capacity.div_ceil(64)],
        }
    }

    #[inline]
    pub fn contains(&self, index: usize) -> bool {
        self.words
            .get(index / 64)
            .is_some_and(|word| word & (1 << (index % 64)) != 0)
    }

    /// Inserts an index; returns `true` if it was not already present.
    #[inline]
    pub fn insert(&mut self, index: usize) -> bool {
        let (word, bit) = (index / 64, 1u64 << (index % 64));
        if word >= self.words.len() {
            self.words.resize(word + 1, 0);
        }
        let fresh = self.words[word] & bit == 0;
        self.words[word] |= bit;
        fresh
    }

    #[inline]
    pub fn remove(&mut self, index: usize) {
        if let Some(word) = self.words.get_mut(index / 64) {
            *word &= !(1 << (index % 64));
        }
    }

    pub fn clear(&mut self) {
        self.words.iter_mut().for_each(|word| *word = 0);
    }

    pub fn count(&self) -> usize {
        self.words.iter().map(|word| word.count_ones() as usize).sum()
    }
}
