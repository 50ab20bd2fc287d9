//! Discrete-time replicator dynamics for a 2-strategy, single-population game.
//!
//! The population plays strategy A with frequency `p`. Each generation:
//!
//! ```text
//! fitness(A) = p·a00 + (1-p)·a01
//! fitness(B) = p·a10 + (1-p)·a11
//! average    = p·fitness(A) + (1-p)·fitness(B)
//! p'         = clamp(p + p·(fitness(A) - average)·s·step_scale, 0, 1)
//! ```
//!
//! This is a first-order explicit Euler step of the continuous replicator
//! equation with a fixed step (`step_scale`, 0.01 by default). It is not
//! guaranteed stable for large selection strengths. A generation whose
//! population-average fitness is exactly zero leaves `p` unchanged.

use serde::{Deserialize, Serialize};

use crate::analysis::config::{AnalysisError, AnalyzerConfig};
use crate::analysis::matrix::PayoffMatrix;

/// Fitness of both strategies and the population average at one frequency.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Fitness {
    /// Expected payoff of strategy A.
    pub a: f64,
    /// Expected payoff of strategy B.
    pub b: f64,
    /// Population-average payoff.
    pub average: f64,
}

// Callers check for a 2×2 matrix and `p` in [0, 1] first.
fn fitness(payoff: &PayoffMatrix, p: f64) -> Fitness {
    let q = 1.0 - p;
    let a = p * payoff[(0, 0)] + q * payoff[(0, 1)];
    let b = p * payoff[(1, 0)] + q * payoff[(1, 1)];
    Fitness {
        a,
        b,
        average: p * a + q * b,
    }
}

fn step(payoff: &PayoffMatrix, p: f64, selection_strength: f64, step_scale: f64) -> f64 {
    let f = fitness(payoff, p);
    if f.average == 0.0 {
        return p;
    }
    let delta = p * (f.a - f.average) * selection_strength * step_scale;
    (p + delta).clamp(0.0, 1.0)
}

/// Full record of a simulation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReplicatorTrajectory {
    /// Frequency of A, `generations + 1` entries starting at the initial value.
    pub frequencies: Vec<f64>,
    /// Fitness at the start of each generation, `generations` entries.
    pub fitness: Vec<Fitness>,
}

impl ReplicatorTrajectory {
    /// Frequency of A after the last generation.
    pub fn final_frequency(&self) -> f64 {
        self.frequencies.last().copied().unwrap_or(0.0)
    }

    /// Number of generations simulated.
    pub fn generations(&self) -> usize {
        self.fitness.len()
    }
}

/// Simulate replicator dynamics and return the frequency of A per generation.
///
/// The result has `generations + 1` entries; the first is `initial_freq`.
///
/// # Errors
/// `NotTwoByTwo`, `InvalidFrequency` for an initial frequency outside
/// [0, 1], `InvalidSelectionStrength` for a negative or non-finite strength.
///
/// # Example
/// ```
/// use bimatrix_solver::analysis::{simulate_replicator, PayoffMatrix};
///
/// let hawk_dove = PayoffMatrix::from_array([[-2.5, 10.0], [0.0, 5.0]]).unwrap();
/// let path = simulate_replicator(&hawk_dove, 0.5, 100, 1.0).unwrap();
/// assert_eq!(path.len(), 101);
/// assert!(path[100] > 0.5);
/// ```
pub fn simulate_replicator(
    payoff: &PayoffMatrix,
    initial_freq: f64,
    generations: usize,
    selection_strength: f64,
) -> Result<Vec<f64>, AnalysisError> {
    simulate_replicator_detailed(
        payoff,
        initial_freq,
        generations,
        selection_strength,
        &AnalyzerConfig::default(),
    )
    .map(|trajectory| trajectory.frequencies)
}

/// Simulate replicator dynamics, keeping the fitness history as well.
pub fn simulate_replicator_detailed(
    payoff: &PayoffMatrix,
    initial_freq: f64,
    generations: usize,
    selection_strength: f64,
    config: &AnalyzerConfig,
) -> Result<ReplicatorTrajectory, AnalysisError> {
    payoff.require_two_by_two()?;
    if !(0.0..=1.0).contains(&initial_freq) {
        return Err(AnalysisError::InvalidFrequency(initial_freq));
    }
    check_selection_strength(selection_strength)?;

    let mut frequencies = Vec::with_capacity(generations + 1);
    let mut history = Vec::with_capacity(generations);
    let mut p = initial_freq;
    frequencies.push(p);

    for _ in 0..generations {
        history.push(fitness(payoff, p));
        p = step(payoff, p, selection_strength, config.step_scale);
        frequencies.push(p);
    }

    log::debug!(
        "replicator: {} generations, p {:.4} -> {:.4}",
        generations,
        initial_freq,
        p
    );
    Ok(ReplicatorTrajectory {
        frequencies,
        fitness: history,
    })
}

fn check_selection_strength(selection_strength: f64) -> Result<(), AnalysisError> {
    if !selection_strength.is_finite() || selection_strength < 0.0 {
        return Err(AnalysisError::InvalidSelectionStrength(selection_strength));
    }
    Ok(())
}

/// Where the dynamics are predicted to settle, from `fitness(A) = fitness(B)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum EvolutionaryOutcome {
    /// An interior rest point at `frequency` of A.
    Mixed {
        /// Frequency of A at which both strategies are equally fit.
        frequency: f64,
        /// Whether nearby populations move toward the rest point.
        stable: bool,
    },
    /// The rest point is at or beyond 1: A takes over.
    FavorsA,
    /// The rest point is at or below 0: B takes over.
    FavorsB,
    /// The fitness difference does not depend on `p`.
    Neutral,
}

/// Predict the long-run outcome of the dynamics on a 2×2 payoff matrix.
///
/// `fitness(A) - fitness(B) = p·d + (a01 - a11)` with
/// `d = (a00 - a01) - (a10 - a11)`; an interior root is stable when `d < 0`.
pub fn evolutionary_outcome(
    payoff: &PayoffMatrix,
    config: &AnalyzerConfig,
) -> Result<EvolutionaryOutcome, AnalysisError> {
    payoff.require_two_by_two()?;
    let a = payoff;
    let denominator = (a[(0, 0)] - a[(0, 1)]) - (a[(1, 0)] - a[(1, 1)]);
    if denominator.abs() <= config.indifference_epsilon {
        return Ok(EvolutionaryOutcome::Neutral);
    }

    let frequency = (a[(1, 1)] - a[(0, 1)]) / denominator;
    Ok(if frequency <= 0.0 {
        EvolutionaryOutcome::FavorsB
    } else if frequency >= 1.0 {
        EvolutionaryOutcome::FavorsA
    } else {
        EvolutionaryOutcome::Mixed {
            frequency,
            stable: denominator < 0.0,
        }
    })
}

/// Whether a final frequency agrees with the predicted outcome.
///
/// Returns `None` for neutral games, where no prediction exists.
pub fn check_convergence(
    outcome: EvolutionaryOutcome,
    final_freq: f64,
    config: &AnalyzerConfig,
) -> Option<bool> {
    let tolerance = config.convergence_tolerance;
    match outcome {
        EvolutionaryOutcome::Mixed { frequency, .. } => {
            Some((final_freq - frequency).abs() < tolerance)
        }
        EvolutionaryOutcome::FavorsA => Some(final_freq > 1.0 - tolerance),
        EvolutionaryOutcome::FavorsB => Some(final_freq < tolerance),
        EvolutionaryOutcome::Neutral => None,
    }
}

/// Sampled instantaneous rate of change of `p`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DirectionField {
    /// Evenly spaced frequencies from 0 to 1.
    pub frequencies: Vec<f64>,
    /// `dp/dt` at each frequency; zero at the endpoints.
    pub rates: Vec<f64>,
    /// Sample points after which the rate changes sign.
    pub zero_crossings: Vec<f64>,
}

/// Sample `dp/dt = p·(fitness(A) - average)·s` across [0, 1].
///
/// Uses `config.direction_field_samples` evenly spaced points. A zero
/// crossing is reported at sample `i` when the rates at `i` and `i + 1`
/// have strictly opposite signs.
///
/// # Errors
/// `NotTwoByTwo`, `InvalidSelectionStrength` for a negative or non-finite strength.
pub fn direction_field(
    payoff: &PayoffMatrix,
    selection_strength: f64,
    config: &AnalyzerConfig,
) -> Result<DirectionField, AnalysisError> {
    payoff.require_two_by_two()?;
    check_selection_strength(selection_strength)?;
    let samples = config.direction_field_samples.max(2);
    let last = (samples - 1) as f64;

    let frequencies: Vec<f64> = (0..samples).map(|k| k as f64 / last).collect();
    let rates: Vec<f64> = frequencies
        .iter()
        .map(|&p| {
            if p > 0.0 && p < 1.0 {
                let f = fitness(payoff, p);
                p * (f.a - f.average) * selection_strength
            } else {
                0.0
            }
        })
        .collect();
    let zero_crossings = rates
        .windows(2)
        .zip(&frequencies)
        .filter(|(pair, _)| pair[0] * pair[1] < 0.0)
        .map(|(_, &p)| p)
        .collect();

    Ok(DirectionField {
        frequencies,
        rates,
        zero_crossings,
    })
}
