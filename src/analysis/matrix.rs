//! Payoff matrices and the bimatrix game built from two of them.
//!
//! A `PayoffMatrix` is an R×C grid of finite payoffs for one player, where
//! R is the number of row-player strategies and C the number of
//! column-player strategies. A `Bimatrix` pairs two matrices of identical
//! shape; the shape check happens once, at construction.

use std::fmt;
use std::ops::Index;

use serde::{Deserialize, Serialize};

use crate::analysis::config::AnalysisError;

/// One of the two players of a bimatrix game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Player {
    /// Player 1, choosing rows.
    Row,
    /// Player 2, choosing columns.
    Column,
}

impl Player {
    /// The other player.
    pub fn opponent(self) -> Self {
        match self {
            Player::Row => Player::Column,
            Player::Column => Player::Row,
        }
    }

    /// Zero-based player index (0 for the row player).
    pub fn index(self) -> usize {
        match self {
            Player::Row => 0,
            Player::Column => 1,
        }
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Player::Row => write!(f, "Player 1"),
            Player::Column => write!(f, "Player 2"),
        }
    }
}

/// A pure outcome cell: the row player's and column player's strategy indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct StrategyProfile {
    /// Row (player 1) strategy index.
    pub row: usize,
    /// Column (player 2) strategy index.
    pub col: usize,
}

impl StrategyProfile {
    /// Create a profile from a (row, col) pair.
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// The same cell seen with the players' roles swapped.
    pub fn transposed(self) -> Self {
        Self {
            row: self.col,
            col: self.row,
        }
    }
}

impl From<(usize, usize)> for StrategyProfile {
    fn from((row, col): (usize, usize)) -> Self {
        Self { row, col }
    }
}

impl fmt::Display for StrategyProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// An R×C grid of payoffs for one player, stored row-major.
///
/// Serializes as a nested array `[[f64]]`; deserialization runs the same
/// validation as [`PayoffMatrix::new`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Vec<f64>>", into = "Vec<Vec<f64>>")]
pub struct PayoffMatrix {
    rows: usize,
    cols: usize,
    data: Vec<f64>,
}

impl PayoffMatrix {
    /// Build a matrix from its rows.
    ///
    /// Fails on an empty matrix, rows of unequal length, or a non-finite entry.
    pub fn new(rows: Vec<Vec<f64>>) -> Result<Self, AnalysisError> {
        let cols = rows.first().map(Vec::len).unwrap_or(0);
        if rows.is_empty() || cols == 0 {
            return Err(AnalysisError::EmptyMatrix);
        }

        let mut data = Vec::with_capacity(rows.len() * cols);
        for (i, row) in rows.iter().enumerate() {
            if row.len() != cols {
                return Err(AnalysisError::RaggedRows {
                    row: i,
                    expected: cols,
                    found: row.len(),
                });
            }
            for (j, &value) in row.iter().enumerate() {
                if !value.is_finite() {
                    return Err(AnalysisError::NonFinite { row: i, col: j });
                }
                data.push(value);
            }
        }

        Ok(Self {
            rows: rows.len(),
            cols,
            data,
        })
    }

    /// Build a matrix from a fixed-size array.
    pub fn from_array<const R: usize, const C: usize>(
        array: [[f64; C]; R],
    ) -> Result<Self, AnalysisError> {
        Self::new(array.iter().map(|row| row.to_vec()).collect())
    }

    /// Build a matrix from literal constants known to be finite and non-empty.
    pub(crate) fn from_literal<const R: usize, const C: usize>(array: [[f64; C]; R]) -> Self {
        debug_assert!(R > 0 && C > 0);
        debug_assert!(array.iter().flatten().all(|v| v.is_finite()));
        Self {
            rows: R,
            cols: C,
            data: array.iter().flatten().copied().collect(),
        }
    }

    /// An all-zero matrix of the given shape.
    pub fn zeros(rows: usize, cols: usize) -> Result<Self, AnalysisError> {
        if rows == 0 || cols == 0 {
            return Err(AnalysisError::EmptyMatrix);
        }
        Ok(Self {
            rows,
            cols,
            data: vec![0.0; rows * cols],
        })
    }

    /// Number of row-player strategies.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of column-player strategies.
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// (rows, cols).
    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    /// Whether this is a 2×2 matrix.
    pub fn is_two_by_two(&self) -> bool {
        self.shape() == (2, 2)
    }

    /// Payoff at (row, col), or `None` if out of bounds.
    pub fn get(&self, row: usize, col: usize) -> Option<f64> {
        if row < self.rows && col < self.cols {
            Some(self.data[row * self.cols + col])
        } else {
            None
        }
    }

    /// One row as a slice.
    pub fn row(&self, row: usize) -> &[f64] {
        &self.data[row * self.cols..(row + 1) * self.cols]
    }

    /// One column, top to bottom.
    pub fn column(&self, col: usize) -> impl Iterator<Item = f64> + Clone + '_ {
        self.data.iter().skip(col).step_by(self.cols).copied()
    }

    /// Iterate over all cells as `((row, col), payoff)` in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = ((usize, usize), f64)> + '_ {
        let cols = self.cols;
        self.data
            .iter()
            .enumerate()
            .map(move |(k, &v)| ((k / cols, k % cols), v))
    }

    /// The transposed matrix (C×R).
    pub fn transpose(&self) -> Self {
        let mut data = Vec::with_capacity(self.data.len());
        for j in 0..self.cols {
            data.extend(self.column(j));
        }
        Self {
            rows: self.cols,
            cols: self.rows,
            data,
        }
    }

    /// A copy of the matrix with one payoff replaced.
    pub fn with_value(&self, row: usize, col: usize, value: f64) -> Result<Self, AnalysisError> {
        if row >= self.rows || col >= self.cols {
            return Err(AnalysisError::CellOutOfBounds { row, col });
        }
        if !value.is_finite() {
            return Err(AnalysisError::NonFinite { row, col });
        }
        let mut data = self.data.clone();
        data[row * self.cols + col] = value;
        Ok(Self { data, ..*self })
    }

    /// Nested-vector copy of the matrix.
    pub fn to_rows(&self) -> Vec<Vec<f64>> {
        (0..self.rows).map(|i| self.row(i).to_vec()).collect()
    }

    /// Fail with `NotTwoByTwo` unless this is a 2×2 matrix.
    pub fn require_two_by_two(&self) -> Result<(), AnalysisError> {
        if self.is_two_by_two() {
            Ok(())
        } else {
            Err(AnalysisError::NotTwoByTwo {
                shape: self.shape(),
            })
        }
    }
}

impl Index<(usize, usize)> for PayoffMatrix {
    type Output = f64;

    fn index(&self, (row, col): (usize, usize)) -> &f64 {
        assert!(
            row < self.rows && col < self.cols,
            "index ({}, {}) out of bounds for {}x{} matrix",
            row,
            col,
            self.rows,
            self.cols
        );
        &self.data[row * self.cols + col]
    }
}

impl TryFrom<Vec<Vec<f64>>> for PayoffMatrix {
    type Error = AnalysisError;

    fn try_from(rows: Vec<Vec<f64>>) -> Result<Self, Self::Error> {
        Self::new(rows)
    }
}

impl From<PayoffMatrix> for Vec<Vec<f64>> {
    fn from(matrix: PayoffMatrix) -> Self {
        matrix.to_rows()
    }
}

impl fmt::Display for PayoffMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for i in 0..self.rows {
            let cells: Vec<String> = self.row(i).iter().map(|v| format!("{:>7.2}", v)).collect();
            writeln!(f, "[{}]", cells.join(" "))?;
        }
        Ok(())
    }
}

/// Fail with `ShapeMismatch` unless both matrices have the same shape.
pub fn ensure_same_shape(
    payoff_1: &PayoffMatrix,
    payoff_2: &PayoffMatrix,
) -> Result<(usize, usize), AnalysisError> {
    if payoff_1.shape() != payoff_2.shape() {
        return Err(AnalysisError::ShapeMismatch {
            left: payoff_1.shape(),
            right: payoff_2.shape(),
        });
    }
    Ok(payoff_1.shape())
}

/// Default strategy labels `S1..Sn`.
pub fn default_labels(n: usize) -> Vec<String> {
    (1..=n).map(|i| format!("S{}", i)).collect()
}

/// A two-player game: one payoff matrix per player, same shape, with
/// strategy labels for display.
///
/// Only serializable; games are read through `games::GameSpec` so the
/// shape check cannot be bypassed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Bimatrix {
    payoff_1: PayoffMatrix,
    payoff_2: PayoffMatrix,
    row_labels: Vec<String>,
    col_labels: Vec<String>,
}

impl Bimatrix {
    /// Pair two matrices, labeling strategies `S1..Sn`.
    pub fn new(payoff_1: PayoffMatrix, payoff_2: PayoffMatrix) -> Result<Self, AnalysisError> {
        let (rows, cols) = ensure_same_shape(&payoff_1, &payoff_2)?;
        Ok(Self {
            payoff_1,
            payoff_2,
            row_labels: default_labels(rows),
            col_labels: default_labels(cols),
        })
    }

    /// Pair literal matrices known to share a shape, with fixed labels.
    pub(crate) fn from_literal(
        payoff_1: PayoffMatrix,
        payoff_2: PayoffMatrix,
        row_labels: &[&str],
        col_labels: &[&str],
    ) -> Self {
        debug_assert_eq!(payoff_1.shape(), payoff_2.shape());
        debug_assert_eq!(row_labels.len(), payoff_1.rows());
        debug_assert_eq!(col_labels.len(), payoff_1.cols());
        Self {
            payoff_1,
            payoff_2,
            row_labels: row_labels.iter().map(|s| s.to_string()).collect(),
            col_labels: col_labels.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// An all-zero R×C game.
    pub fn zeros(rows: usize, cols: usize) -> Result<Self, AnalysisError> {
        Self::new(PayoffMatrix::zeros(rows, cols)?, PayoffMatrix::zeros(rows, cols)?)
    }

    /// Replace the strategy labels. Lists of the wrong length are ignored
    /// and the previous labels kept.
    pub fn with_labels(mut self, row_labels: Vec<String>, col_labels: Vec<String>) -> Self {
        if row_labels.len() == self.payoff_1.rows() {
            self.row_labels = row_labels;
        }
        if col_labels.len() == self.payoff_1.cols() {
            self.col_labels = col_labels;
        }
        self
    }

    /// Player 1's payoff matrix.
    pub fn payoff_1(&self) -> &PayoffMatrix {
        &self.payoff_1
    }

    /// Player 2's payoff matrix.
    pub fn payoff_2(&self) -> &PayoffMatrix {
        &self.payoff_2
    }

    /// The payoff matrix of `player`.
    pub fn payoff(&self, player: Player) -> &PayoffMatrix {
        match player {
            Player::Row => &self.payoff_1,
            Player::Column => &self.payoff_2,
        }
    }

    /// Labels of `player`'s strategies.
    pub fn labels(&self, player: Player) -> &[String] {
        match player {
            Player::Row => &self.row_labels,
            Player::Column => &self.col_labels,
        }
    }

    /// (rows, cols) shared by both matrices.
    pub fn shape(&self) -> (usize, usize) {
        self.payoff_1.shape()
    }

    /// Whether both players have exactly two strategies.
    pub fn is_two_by_two(&self) -> bool {
        self.payoff_1.is_two_by_two()
    }

    /// Payoff pair (player 1, player 2) at a cell.
    pub fn payoffs_at(&self, profile: StrategyProfile) -> (f64, f64) {
        let cell = (profile.row, profile.col);
        (self.payoff_1[cell], self.payoff_2[cell])
    }

    /// The same game with the players' roles exchanged: the old column
    /// player now picks rows.
    pub fn swap_players(&self) -> Self {
        Self {
            payoff_1: self.payoff_2.transpose(),
            payoff_2: self.payoff_1.transpose(),
            row_labels: self.col_labels.clone(),
            col_labels: self.row_labels.clone(),
        }
    }
}

impl fmt::Display for Bimatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let width = self
            .row_labels
            .iter()
            .map(String::len)
            .max()
            .unwrap_or(0)
            .max(4);
        write!(f, "{:width$}", "", width = width)?;
        for label in &self.col_labels {
            write!(f, " | {:^16}", label)?;
        }
        writeln!(f)?;
        for (i, label) in self.row_labels.iter().enumerate() {
            write!(f, "{:width$}", label, width = width)?;
            for j in 0..self.payoff_1.cols() {
                let cell = format!("({:.1}, {:.1})", self.payoff_1[(i, j)], self.payoff_2[(i, j)]);
                write!(f, " | {:^16}", cell)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
