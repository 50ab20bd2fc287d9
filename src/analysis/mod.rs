//! Bimatrix game analysis.
//!
//! This module analyzes finite two-player games in strategic form. A game is
//! a pair of equally shaped payoff matrices: player 1 picks a row, player 2
//! picks a column, and cell (i, j) of each matrix holds that player's payoff.
//!
//! # Analyses
//!
//! - **Pure equilibria**: every cell where both players are best-responding
//!   ([`find_pure_equilibria`]), plus full best-response tables.
//! - **Dominance**: weak dominance among one player's strategies
//!   ([`find_dominance`]).
//! - **Mixed equilibrium**: the closed-form solution of a 2×2 game's
//!   indifference equations ([`solve_mixed_2x2`]).
//! - **Replicator dynamics**: discrete-time evolution of a single population
//!   playing a symmetric 2×2 game ([`simulate_replicator`]), with rest-point
//!   prediction and a sampled direction field.
//! - **Classification**: zero-sum and coordination flags ([`classify`]).
//!
//! [`Session`] ties these together for interactive use and produces an
//! [`AnalysisReport`].
//!
//! # Example
//!
//! ```
//! use bimatrix_solver::analysis::{find_pure_equilibria, solve_mixed_2x2, PayoffMatrix};
//!
//! // Matching Pennies: no pure equilibrium, both players mix evenly.
//! let p1 = PayoffMatrix::from_array([[1.0, -1.0], [-1.0, 1.0]]).unwrap();
//! let p2 = PayoffMatrix::from_array([[-1.0, 1.0], [1.0, -1.0]]).unwrap();
//!
//! assert!(find_pure_equilibria(&p1, &p2).unwrap().is_empty());
//! let mixed = solve_mixed_2x2(&p1, &p2).unwrap();
//! assert_eq!(mixed.equilibrium().unwrap().p, 0.5);
//! ```
//!
//! # Numerics
//!
//! Best-response and dominance checks compare payoffs exactly, so ties count
//! as best responses. The tolerances used elsewhere (indifference denominator,
//! zero-sum test, convergence) live in [`AnalyzerConfig`].

pub mod classify;
pub mod config;
pub mod dominance;
pub mod equilibrium;
pub mod matrix;
pub mod mixed;
pub mod replicator;
pub mod session;

pub use classify::{classify, Classification};
pub use config::{AnalysisError, AnalyzerConfig, ConfigError};
pub use dominance::{find_dominance, DominanceEntry, DominanceReport};
pub use equilibrium::{best_responses, find_pure_equilibria, BestResponse, BestResponses, EquilibriumCell};
pub use matrix::{Bimatrix, PayoffMatrix, Player, StrategyProfile};
pub use mixed::{
    best_response_to_mixed, expected_payoffs, solve_mixed_2x2, solve_mixed_2x2_with, BestChoice,
    MixedBestResponse, MixedEquilibrium, MixedSolution,
};
pub use replicator::{
    check_convergence, direction_field, evolutionary_outcome, simulate_replicator,
    simulate_replicator_detailed, DirectionField, EvolutionaryOutcome, ReplicatorTrajectory,
};
pub use session::{AnalysisReport, Session};
