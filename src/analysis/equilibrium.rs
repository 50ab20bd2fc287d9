//! Pure-strategy Nash equilibria and best-response tables.
//!
//! A cell (i, j) is a pure equilibrium when player 1's payoff there is
//! maximal in column j and player 2's payoff is maximal in row i. The scan
//! is the naive O(R·C·(R+C)) best-response check; games here are tiny.

use serde::{Deserialize, Serialize};

use crate::analysis::config::AnalysisError;
use crate::analysis::matrix::{ensure_same_shape, PayoffMatrix, StrategyProfile};

/// A pure equilibrium cell together with the payoff pair it yields.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EquilibriumCell {
    /// The strategy profile.
    pub profile: StrategyProfile,
    /// (player 1 payoff, player 2 payoff) at the profile.
    pub payoffs: (f64, f64),
}

/// Find every pure-strategy Nash equilibrium.
///
/// Ties are included: any row attaining the column maximum qualifies for
/// player 1, and likewise for player 2. Cells are returned in row-major
/// order. An empty result is a normal outcome.
///
/// # Errors
/// `ShapeMismatch` if the two matrices differ in shape.
///
/// # Example
/// ```
/// use bimatrix_solver::analysis::{find_pure_equilibria, PayoffMatrix};
///
/// let p1 = PayoffMatrix::from_array([[3.0, 0.0], [5.0, 1.0]]).unwrap();
/// let p2 = PayoffMatrix::from_array([[3.0, 5.0], [0.0, 1.0]]).unwrap();
/// let equilibria = find_pure_equilibria(&p1, &p2).unwrap();
/// assert_eq!(equilibria.len(), 1);
/// assert_eq!(equilibria[0].payoffs, (1.0, 1.0));
/// ```
pub fn find_pure_equilibria(
    payoff_1: &PayoffMatrix,
    payoff_2: &PayoffMatrix,
) -> Result<Vec<EquilibriumCell>, AnalysisError> {
    let (rows, cols) = ensure_same_shape(payoff_1, payoff_2)?;
    let mut equilibria = Vec::new();

    for i in 0..rows {
        for j in 0..cols {
            if is_row_best_response(payoff_1, i, j) && is_col_best_response(payoff_2, i, j) {
                equilibria.push(EquilibriumCell {
                    profile: StrategyProfile::new(i, j),
                    payoffs: (payoff_1[(i, j)], payoff_2[(i, j)]),
                });
            }
        }
    }

    log::debug!(
        "pure equilibrium scan over {}x{} game found {} cell(s)",
        rows,
        cols,
        equilibria.len()
    );
    Ok(equilibria)
}

/// Whether row `i` maximizes player 1's payoff against column `j`.
pub fn is_row_best_response(payoff_1: &PayoffMatrix, i: usize, j: usize) -> bool {
    let value = payoff_1[(i, j)];
    payoff_1.column(j).all(|other| other <= value)
}

/// Whether column `j` maximizes player 2's payoff against row `i`.
pub fn is_col_best_response(payoff_2: &PayoffMatrix, i: usize, j: usize) -> bool {
    let value = payoff_2[(i, j)];
    payoff_2.row(i).iter().all(|&other| other <= value)
}

/// A player's best replies to one fixed opponent strategy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BestResponse {
    /// The opponent's fixed strategy index.
    pub against: usize,
    /// Every strategy attaining the maximum, ascending.
    pub strategies: Vec<usize>,
    /// The maximal payoff.
    pub payoff: f64,
}

/// Best-response tables for both players of a game.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BestResponses {
    /// Player 1's best rows, one entry per column of player 2.
    pub row_player: Vec<BestResponse>,
    /// Player 2's best columns, one entry per row of player 1.
    pub column_player: Vec<BestResponse>,
}

/// Compute both players' best-response tables.
///
/// # Errors
/// `ShapeMismatch` if the two matrices differ in shape.
pub fn best_responses(
    payoff_1: &PayoffMatrix,
    payoff_2: &PayoffMatrix,
) -> Result<BestResponses, AnalysisError> {
    let (rows, cols) = ensure_same_shape(payoff_1, payoff_2)?;

    let row_player = (0..cols)
        .map(|j| arg_max(j, payoff_1.column(j)))
        .collect();
    let column_player = (0..rows)
        .map(|i| arg_max(i, payoff_2.row(i).iter().copied()))
        .collect();

    Ok(BestResponses {
        row_player,
        column_player,
    })
}

fn arg_max(against: usize, payoffs: impl Iterator<Item = f64> + Clone) -> BestResponse {
    let payoff = payoffs.clone().fold(f64::NEG_INFINITY, f64::max);
    let strategies = payoffs
        .enumerate()
        .filter(|&(_, v)| v == payoff)
        .map(|(k, _)| k)
        .collect();
    BestResponse {
        against,
        strategies,
        payoff,
    }
}
