//! Single-population 2×2 games for replicator dynamics.
//!
//! Each game is a single payoff matrix where row `i`, column `j` is what an
//! individual playing strategy `i` earns against one playing `j`. Strategy
//! A is row/column 0.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::analysis::config::AnalysisError;
use crate::analysis::matrix::PayoffMatrix;

/// Hawk-Dove payoffs: `[[(V−C)/2, V], [0, V/2]]`.
///
/// Hawk is strategy A. When `C > V` the interior rest point `V/C` is stable.
pub fn hawk_dove(value: f64, cost: f64) -> Result<PayoffMatrix, AnalysisError> {
    PayoffMatrix::from_array([[(value - cost) / 2.0, value], [0.0, value / 2.0]])
}

/// Prisoner's Dilemma payoffs: `[[R, S], [T, P]]`, Cooperate as strategy A.
pub fn prisoners_dilemma(
    temptation: f64,
    reward: f64,
    punishment: f64,
    sucker: f64,
) -> Result<PayoffMatrix, AnalysisError> {
    PayoffMatrix::from_array([[reward, sucker], [temptation, punishment]])
}

/// A parameterized evolutionary game.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EvolutionaryGame {
    /// Contest over a resource of value V with fighting cost C.
    HawkDove {
        /// Value of the resource.
        value: f64,
        /// Cost of losing a fight.
        cost: f64,
    },
    /// Symmetric Prisoner's Dilemma.
    PrisonersDilemma {
        /// Defect against Cooperate.
        temptation: f64,
        /// Mutual cooperation.
        reward: f64,
        /// Mutual defection.
        punishment: f64,
        /// Cooperate against Defect.
        sucker: f64,
    },
    /// Arbitrary 2×2 payoffs.
    Custom {
        /// A-vs-A, A-vs-B, B-vs-A, B-vs-B.
        payoffs: [[f64; 2]; 2],
    },
}

impl EvolutionaryGame {
    /// Hawk-Dove with V = 10, C = 15.
    pub fn default_hawk_dove() -> Self {
        EvolutionaryGame::HawkDove {
            value: 10.0,
            cost: 15.0,
        }
    }

    /// Prisoner's Dilemma with T = 5, R = 3, P = 1, S = 0.
    pub fn default_dilemma() -> Self {
        EvolutionaryGame::PrisonersDilemma {
            temptation: 5.0,
            reward: 3.0,
            punishment: 1.0,
            sucker: 0.0,
        }
    }

    /// Custom game `[[1, 0], [2, 1]]`, where B dominates.
    pub fn default_custom() -> Self {
        EvolutionaryGame::Custom {
            payoffs: [[1.0, 0.0], [2.0, 1.0]],
        }
    }

    /// Payoff matrix for this game.
    pub fn payoff_matrix(&self) -> Result<PayoffMatrix, AnalysisError> {
        match *self {
            EvolutionaryGame::HawkDove { value, cost } => hawk_dove(value, cost),
            EvolutionaryGame::PrisonersDilemma {
                temptation,
                reward,
                punishment,
                sucker,
            } => prisoners_dilemma(temptation, reward, punishment, sucker),
            EvolutionaryGame::Custom { payoffs } => PayoffMatrix::from_array(payoffs),
        }
    }

    /// Names of strategies A and B.
    pub fn labels(&self) -> [&'static str; 2] {
        match self {
            EvolutionaryGame::HawkDove { .. } => ["Hawk", "Dove"],
            EvolutionaryGame::PrisonersDilemma { .. } => ["Cooperate", "Defect"],
            EvolutionaryGame::Custom { .. } => ["Strategy A", "Strategy B"],
        }
    }
}

impl fmt::Display for EvolutionaryGame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EvolutionaryGame::HawkDove { value, cost } => {
                write!(f, "Hawk-Dove (V={}, C={})", value, cost)
            }
            EvolutionaryGame::PrisonersDilemma {
                temptation,
                reward,
                punishment,
                sucker,
            } => write!(
                f,
                "Prisoner's Dilemma (T={}, R={}, P={}, S={})",
                temptation, reward, punishment, sucker
            ),
            EvolutionaryGame::Custom { .. } => write!(f, "Custom Game"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::config::AnalyzerConfig;
    use crate::analysis::replicator::{evolutionary_outcome, EvolutionaryOutcome};

    #[test]
    fn test_hawk_dove_matrix() {
        let m = hawk_dove(10.0, 15.0).unwrap();
        assert_eq!(m.to_rows(), vec![vec![-2.5, 10.0], vec![0.0, 5.0]]);
    }

    #[test]
    fn test_hawk_dove_rest_point_is_v_over_c() {
        let m = hawk_dove(10.0, 15.0).unwrap();
        match evolutionary_outcome(&m, &AnalyzerConfig::default()).unwrap() {
            EvolutionaryOutcome::Mixed { frequency, stable } => {
                assert!((frequency - 10.0 / 15.0).abs() < 1e-12);
                assert!(stable);
            }
            other => panic!("expected mixed outcome, got {:?}", other),
        }
    }

    #[test]
    fn test_dilemma_favors_defection() {
        let game = EvolutionaryGame::default_dilemma();
        let m = game.payoff_matrix().unwrap();
        assert_eq!(m.to_rows(), vec![vec![3.0, 0.0], vec![5.0, 1.0]]);
        assert_eq!(
            evolutionary_outcome(&m, &AnalyzerConfig::default()).unwrap(),
            EvolutionaryOutcome::FavorsB
        );
        assert_eq!(game.labels(), ["Cooperate", "Defect"]);
    }

    #[test]
    fn test_non_finite_parameters_rejected() {
        assert!(hawk_dove(f64::NAN, 1.0).is_err());
        let game = EvolutionaryGame::Custom {
            payoffs: [[1.0, f64::INFINITY], [0.0, 0.0]],
        };
        assert!(game.payoff_matrix().is_err());
    }

    #[test]
    fn test_json_tagging() {
        let game: EvolutionaryGame =
            serde_json::from_str(r#"{ "kind": "hawk_dove", "value": 4, "cost": 8 }"#).unwrap();
        assert_eq!(game, EvolutionaryGame::HawkDove { value: 4.0, cost: 8.0 });
        assert_eq!(game.to_string(), "Hawk-Dove (V=4, C=8)");
    }
}
