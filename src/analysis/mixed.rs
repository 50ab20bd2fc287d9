//! Closed-form mixed-strategy equilibrium for 2×2 games.
//!
//! With player 1 playing row 0 with probability `p` and player 2 playing
//! column 0 with probability `q`:
//!
//! ```text
//! p makes player 2 indifferent:  p = (b11 - b10) / (b00 - b01 - b10 + b11)
//! q makes player 1 indifferent:  q = (a11 - a01) / (a00 - a01 - a10 + a11)
//! ```
//!
//! where `a` is player 1's matrix and `b` player 2's. A denominator within
//! `indifference_epsilon` of zero means that player's payoffs have no
//! preference reversal and there is no interior equilibrium.

use serde::{Deserialize, Serialize};

use crate::analysis::config::{AnalysisError, AnalyzerConfig};
use crate::analysis::matrix::{ensure_same_shape, PayoffMatrix, Player};

/// An interior mixed equilibrium.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MixedEquilibrium {
    /// Probability player 1 plays their first strategy.
    pub p: f64,
    /// Probability player 2 plays their first strategy.
    pub q: f64,
    /// (player 1, player 2) expected payoff at (p, q).
    pub expected_payoffs: (f64, f64),
}

/// Outcome of the 2×2 mixed solver.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum MixedSolution {
    /// Both probabilities lie in [0, 1].
    Interior(MixedEquilibrium),
    /// No interior mixed equilibrium: the listed players' payoffs show no
    /// strict preference reversal, so the indifference equation that their
    /// payoffs define has a zero denominator.
    Degenerate {
        /// Players whose indifference equation is degenerate.
        players: Vec<Player>,
    },
    /// The indifference equations have a solution but it lies outside the
    /// valid probability range.
    OutOfRange {
        /// Computed probability for player 1.
        p: f64,
        /// Computed probability for player 2.
        q: f64,
    },
}

impl MixedSolution {
    /// The equilibrium, if one was found.
    pub fn equilibrium(&self) -> Option<&MixedEquilibrium> {
        match self {
            MixedSolution::Interior(eq) => Some(eq),
            _ => None,
        }
    }
}

/// Solve a 2×2 game for its mixed equilibrium using the default tolerance.
///
/// # Errors
/// `ShapeMismatch` if the matrices differ in shape, `NotTwoByTwo` if they
/// are not 2×2.
///
/// # Example
/// ```
/// use bimatrix_solver::analysis::{solve_mixed_2x2, MixedSolution, PayoffMatrix};
///
/// let p1 = PayoffMatrix::from_array([[1.0, -1.0], [-1.0, 1.0]]).unwrap();
/// let p2 = PayoffMatrix::from_array([[-1.0, 1.0], [1.0, -1.0]]).unwrap();
/// match solve_mixed_2x2(&p1, &p2).unwrap() {
///     MixedSolution::Interior(eq) => assert_eq!((eq.p, eq.q), (0.5, 0.5)),
///     other => panic!("unexpected {:?}", other),
/// }
/// ```
pub fn solve_mixed_2x2(
    payoff_1: &PayoffMatrix,
    payoff_2: &PayoffMatrix,
) -> Result<MixedSolution, AnalysisError> {
    solve_mixed_2x2_with(payoff_1, payoff_2, &AnalyzerConfig::default())
}

/// Solve a 2×2 game for its mixed equilibrium with an explicit config.
pub fn solve_mixed_2x2_with(
    payoff_1: &PayoffMatrix,
    payoff_2: &PayoffMatrix,
    config: &AnalyzerConfig,
) -> Result<MixedSolution, AnalysisError> {
    ensure_same_shape(payoff_1, payoff_2)?;
    payoff_1.require_two_by_two()?;

    let (a, b) = (payoff_1, payoff_2);
    let denom_p = b[(0, 0)] - b[(0, 1)] - b[(1, 0)] + b[(1, 1)];
    let denom_q = a[(0, 0)] - a[(0, 1)] - a[(1, 0)] + a[(1, 1)];

    let mut players = Vec::new();
    if denom_q.abs() < config.indifference_epsilon {
        players.push(Player::Row);
    }
    if denom_p.abs() < config.indifference_epsilon {
        players.push(Player::Column);
    }
    if !players.is_empty() {
        log::warn!("no interior mixed equilibrium: degenerate indifference for {:?}", players);
        return Ok(MixedSolution::Degenerate { players });
    }

    let p = (b[(1, 1)] - b[(1, 0)]) / denom_p;
    let q = (a[(1, 1)] - a[(0, 1)]) / denom_q;

    if !is_probability(p) || !is_probability(q) {
        log::warn!("mixed solution p={:.4} q={:.4} lies outside [0, 1]", p, q);
        return Ok(MixedSolution::OutOfRange { p, q });
    }

    let expected_payoffs = profile_payoffs(a, b, p, q);
    log::debug!("mixed equilibrium p={:.4} q={:.4}", p, q);
    Ok(MixedSolution::Interior(MixedEquilibrium {
        p,
        q,
        expected_payoffs,
    }))
}

/// Expected payoffs (player 1, player 2) when player 1 plays row 0 with
/// probability `p` and player 2 plays column 0 with probability `q`.
///
/// # Errors
/// Shape errors as for [`solve_mixed_2x2`]; `InvalidProbability` if `p` or
/// `q` is outside [0, 1].
pub fn expected_payoffs(
    payoff_1: &PayoffMatrix,
    payoff_2: &PayoffMatrix,
    p: f64,
    q: f64,
) -> Result<(f64, f64), AnalysisError> {
    ensure_same_shape(payoff_1, payoff_2)?;
    payoff_1.require_two_by_two()?;
    require_probability(p)?;
    require_probability(q)?;
    Ok(profile_payoffs(payoff_1, payoff_2, p, q))
}

/// Each pure strategy's expected payoff for `player` against the opponent
/// mixing with `opponent_prob` on their first strategy.
pub fn strategy_payoffs(
    payoff: &PayoffMatrix,
    player: Player,
    opponent_prob: f64,
) -> Result<[f64; 2], AnalysisError> {
    payoff.require_two_by_two()?;
    require_probability(opponent_prob)?;
    let x = opponent_prob;
    Ok(match player {
        Player::Row => [
            x * payoff[(0, 0)] + (1.0 - x) * payoff[(0, 1)],
            x * payoff[(1, 0)] + (1.0 - x) * payoff[(1, 1)],
        ],
        Player::Column => [
            x * payoff[(0, 0)] + (1.0 - x) * payoff[(1, 0)],
            x * payoff[(0, 1)] + (1.0 - x) * payoff[(1, 1)],
        ],
    })
}

/// Which of a player's two strategies does better against a mixture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BestChoice {
    /// The first strategy pays strictly more.
    First,
    /// The second strategy pays strictly more.
    Second,
    /// Both pay the same, within tolerance.
    Indifferent,
}

/// A player's best response to the opponent's mixed strategy.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MixedBestResponse {
    /// Expected payoff of each pure strategy.
    pub payoffs: [f64; 2],
    /// The better strategy.
    pub choice: BestChoice,
}

impl MixedBestResponse {
    /// Expected payoff of the best response.
    pub fn payoff(&self) -> f64 {
        self.payoffs[0].max(self.payoffs[1])
    }
}

/// Best response of `player` to the opponent playing their first strategy
/// with probability `opponent_prob`.
pub fn best_response_to_mixed(
    payoff: &PayoffMatrix,
    player: Player,
    opponent_prob: f64,
    config: &AnalyzerConfig,
) -> Result<MixedBestResponse, AnalysisError> {
    let payoffs = strategy_payoffs(payoff, player, opponent_prob)?;
    let diff = payoffs[0] - payoffs[1];
    let choice = if diff.abs() <= config.indifference_epsilon {
        BestChoice::Indifferent
    } else if diff > 0.0 {
        BestChoice::First
    } else {
        BestChoice::Second
    };
    Ok(MixedBestResponse { payoffs, choice })
}

fn profile_payoffs(a: &PayoffMatrix, b: &PayoffMatrix, p: f64, q: f64) -> (f64, f64) {
    let weights = [
        ((0, 0), p * q),
        ((0, 1), p * (1.0 - q)),
        ((1, 0), (1.0 - p) * q),
        ((1, 1), (1.0 - p) * (1.0 - q)),
    ];
    weights.iter().fold((0.0, 0.0), |(u1, u2), &(cell, w)| {
        (u1 + w * a[cell], u2 + w * b[cell])
    })
}

fn is_probability(x: f64) -> bool {
    (0.0..=1.0).contains(&x)
}

fn require_probability(x: f64) -> Result<(), AnalysisError> {
    if is_probability(x) {
        Ok(())
    } else {
        Err(AnalysisError::InvalidProbability(x))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn matrix(array: [[f64; 2]; 2]) -> PayoffMatrix {
        PayoffMatrix::from_array(array).unwrap()
    }

    #[test]
    fn test_matching_pennies() {
        let p1 = matrix([[1.0, -1.0], [-1.0, 1.0]]);
        let p2 = matrix([[-1.0, 1.0], [1.0, -1.0]]);
        let eq = *solve_mixed_2x2(&p1, &p2).unwrap().equilibrium().unwrap();
        assert_eq!(eq.p, 0.5);
        assert_eq!(eq.q, 0.5);
        assert!(eq.expected_payoffs.0.abs() < 1e-12);
        assert!(eq.expected_payoffs.1.abs() < 1e-12);
    }

    #[test]
    fn test_battle_of_the_sexes() {
        let p1 = matrix([[2.0, 0.0], [0.0, 1.0]]);
        let p2 = matrix([[1.0, 0.0], [0.0, 2.0]]);
        let eq = *solve_mixed_2x2(&p1, &p2).unwrap().equilibrium().unwrap();
        assert!((eq.p - 2.0 / 3.0).abs() < 1e-12);
        assert!((eq.q - 1.0 / 3.0).abs() < 1e-12);
        assert!((eq.expected_payoffs.0 - 2.0 / 3.0).abs() < 1e-12);
        assert!((eq.expected_payoffs.1 - 2.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_degenerate_indifference() {
        // Player 1's payoff difference between rows is the same in both
        // columns, so nothing player 2 does can make player 1 indifferent.
        let p1 = matrix([[3.0, 1.0], [2.0, 0.0]]);
        let p2 = matrix([[1.0, 0.0], [0.0, 1.0]]);
        assert_eq!(
            solve_mixed_2x2(&p1, &p2).unwrap(),
            MixedSolution::Degenerate { players: vec![Player::Row] }
        );

        let zeros = matrix([[0.0, 0.0], [0.0, 0.0]]);
        assert_eq!(
            solve_mixed_2x2(&zeros, &zeros).unwrap(),
            MixedSolution::Degenerate { players: vec![Player::Row, Player::Column] }
        );
    }

    #[test]
    fn test_prisoners_dilemma_out_of_range() {
        let p1 = matrix([[3.0, 0.0], [5.0, 1.0]]);
        let p2 = matrix([[3.0, 5.0], [0.0, 1.0]]);
        match solve_mixed_2x2(&p1, &p2).unwrap() {
            MixedSolution::OutOfRange { p, q } => {
                assert!((p - (-1.0)).abs() < 1e-12);
                assert!((q - (-1.0)).abs() < 1e-12);
            }
            other => panic!("expected OutOfRange, got {:?}", other),
        }
    }

    #[test]
    fn test_shape_errors() {
        let two = matrix([[1.0, 0.0], [0.0, 1.0]]);
        let three = PayoffMatrix::zeros(3, 3).unwrap();
        assert!(matches!(
            solve_mixed_2x2(&three, &three),
            Err(AnalysisError::NotTwoByTwo { shape: (3, 3) })
        ));
        assert!(matches!(
            solve_mixed_2x2(&two, &three),
            Err(AnalysisError::ShapeMismatch { .. })
        ));
    }

    #[test]
    fn test_solution_makes_both_players_indifferent() {
        let mut rng = StdRng::seed_from_u64(21);
        let mut found = 0;
        for _ in 0..500 {
            let mut draw = || matrix([
                [rng.gen_range(-10.0..10.0), rng.gen_range(-10.0..10.0)],
                [rng.gen_range(-10.0..10.0), rng.gen_range(-10.0..10.0)],
            ]);
            let p1 = draw();
            let p2 = draw();
            if let MixedSolution::Interior(eq) = solve_mixed_2x2(&p1, &p2).unwrap() {
                found += 1;
                let u1 = strategy_payoffs(&p1, Player::Row, eq.q).unwrap();
                let u2 = strategy_payoffs(&p2, Player::Column, eq.p).unwrap();
                assert!((u1[0] - u1[1]).abs() < 1e-9, "player 1 not indifferent: {:?}", u1);
                assert!((u2[0] - u2[1]).abs() < 1e-9, "player 2 not indifferent: {:?}", u2);
                assert!((eq.expected_payoffs.0 - u1[0]).abs() < 1e-9);
                assert!((eq.expected_payoffs.1 - u2[0]).abs() < 1e-9);
            }
        }
        assert!(found > 0);
    }

    #[test]
    fn test_expected_payoffs() {
        let p1 = matrix([[3.0, 0.0], [5.0, 1.0]]);
        let p2 = matrix([[3.0, 5.0], [0.0, 1.0]]);
        assert_eq!(expected_payoffs(&p1, &p2, 1.0, 1.0).unwrap(), (3.0, 3.0));
        assert_eq!(expected_payoffs(&p1, &p2, 0.0, 0.0).unwrap(), (1.0, 1.0));
        assert_eq!(expected_payoffs(&p1, &p2, 0.5, 0.5).unwrap(), (2.25, 2.25));
        assert_eq!(
            expected_payoffs(&p1, &p2, 1.5, 0.5),
            Err(AnalysisError::InvalidProbability(1.5))
        );
    }

    #[test]
    fn test_best_response_to_mixed() {
        let config = AnalyzerConfig::default();
        let p1 = matrix([[1.0, -1.0], [-1.0, 1.0]]);
        let br = best_response_to_mixed(&p1, Player::Row, 0.5, &config).unwrap();
        assert_eq!(br.choice, BestChoice::Indifferent);
        let br = best_response_to_mixed(&p1, Player::Row, 0.8, &config).unwrap();
        assert_eq!(br.choice, BestChoice::First);
        assert!((br.payoff() - 0.6).abs() < 1e-12);

        let p2 = matrix([[-1.0, 1.0], [1.0, -1.0]]);
        let br = best_response_to_mixed(&p2, Player::Column, 0.8, &config).unwrap();
        assert_eq!(br.choice, BestChoice::Second);
    }
}
