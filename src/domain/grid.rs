//! Page grid geometry
//!
//! A page is a fixed `rows x cols` matrix of slots addressed from `(0, 0)`
//! in the top-left corner. Everything here is pure.

use serde::{Deserialize, Serialize};

pub const MIN_DIMENSION: i32 = 1;
pub const MAX_DIMENSION: i32 = 10;
pub const DEFAULT_DIMENSION: i32 = 3;

/// A `(row, col)` address within a page grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Slot {
    pub row: i32,
    pub col: i32,
}

impl Slot {
    pub const ORIGIN: Slot = Slot { row: 0, col: 0 };

    pub fn new(row: i32, col: i32) -> Self {
        Self { row, col }
    }
}

impl From<(i32, i32)> for Slot {
    fn from((row, col): (i32, i32)) -> Self {
        Self { row, col }
    }
}

/// Dimensions of a page grid, always within `[MIN_DIMENSION, MAX_DIMENSION]`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Grid {
    rows: i32,
    cols: i32,
}

impl Grid {
    /// Builds a grid, clamping both dimensions into the allowed range.
    pub fn new(rows: i32, cols: i32) -> Self {
        Self {
            rows: clamp_dimension(rows),
            cols: clamp_dimension(cols),
        }
    }

    pub fn rows(&self) -> i32 {
        self.rows
    }

    pub fn cols(&self) -> i32 {
        self.cols
    }

    pub fn contains(&self, slot: Slot) -> bool {
        contains(self.rows, self.cols, slot.row, slot.col)
    }

    pub fn capacity(&self) -> usize {
        (self.rows * self.cols) as usize
    }

    /// All slots in row-major order
    pub fn slots(&self) -> impl Iterator<Item = Slot> {
        let cols = self.cols;
        (0..self.rows).flat_map(move |row| (0..cols).map(move |col| Slot { row, col }))
    }
}

impl Default for Grid {
    fn default() -> Self {
        Self::new(DEFAULT_DIMENSION, DEFAULT_DIMENSION)
    }
}

/// True iff `0 <= row < row_count` and `0 <= col < col_count`
pub fn contains(row_count: i32, col_count: i32, row: i32, col: i32) -> bool {
    (0..row_count).contains(&row) && (0..col_count).contains(&col)
}

/// Clamps a requested grid dimension to `[1, 10]`
pub fn clamp_dimension(n: i32) -> i32 {
    n.clamp(MIN_DIMENSION, MAX_DIMENSION)
}
