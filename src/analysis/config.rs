//! Configuration options and error types for the analyzer.
//!
//! Every numeric tolerance the analysis uses lives here as a named constant
//! so behavior stays auditable, and `AnalyzerConfig` carries them into each
//! call.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

/// Denominators with absolute value below this are treated as zero by the
/// mixed-strategy and rest-point solvers.
pub const INDIFFERENCE_EPSILON: f64 = 1e-10;

/// Largest `|P1 + P2|` a cell may have for the game to count as zero-sum.
pub const ZERO_SUM_TOLERANCE: f64 = 1e-8;

/// Fixed Euler step multiplying the selection strength in the replicator update.
pub const STEP_SCALE: f64 = 0.01;

/// Distance from a predicted rest point that counts as "converged".
pub const CONVERGENCE_TOLERANCE: f64 = 0.05;

/// Number of evenly spaced frequencies sampled for a direction field.
pub const DIRECTION_FIELD_SAMPLES: usize = 21;

/// Configuration for the analyzer.
///
/// # Example
/// ```
/// use bimatrix_solver::analysis::AnalyzerConfig;
///
/// let config = AnalyzerConfig::default();
/// assert_eq!(config.step_scale, 0.01);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyzerConfig {
    /// Zero test for indifference-equation denominators.
    pub indifference_epsilon: f64,

    /// Tolerance for the zero-sum classification.
    pub zero_sum_tolerance: f64,

    /// Replicator step scale.
    ///
    /// The reference discretization uses 0.01; smaller values trade speed
    /// for stability at high selection strengths.
    pub step_scale: f64,

    /// Tolerance used when checking whether a simulation reached its
    /// predicted rest point.
    pub convergence_tolerance: f64,

    /// Number of samples in a direction field (at least 2).
    pub direction_field_samples: usize,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            indifference_epsilon: INDIFFERENCE_EPSILON,
            zero_sum_tolerance: ZERO_SUM_TOLERANCE,
            step_scale: STEP_SCALE,
            convergence_tolerance: CONVERGENCE_TOLERANCE,
            direction_field_samples: DIRECTION_FIELD_SAMPLES,
        }
    }
}

impl AnalyzerConfig {
    /// Create a new config with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// A finer replicator step for long, high-strength simulations.
    pub fn fine_step() -> Self {
        Self {
            step_scale: STEP_SCALE / 10.0,
            ..Default::default()
        }
    }

    /// Builder method: set the replicator step scale.
    pub fn with_step_scale(mut self, step_scale: f64) -> Self {
        self.step_scale = step_scale;
        self
    }

    /// Builder method: set the indifference epsilon.
    pub fn with_indifference_epsilon(mut self, epsilon: f64) -> Self {
        self.indifference_epsilon = epsilon;
        self
    }

    /// Builder method: set the convergence tolerance.
    pub fn with_convergence_tolerance(mut self, tolerance: f64) -> Self {
        self.convergence_tolerance = tolerance;
        self
    }

    /// Builder method: set the number of direction-field samples.
    pub fn with_direction_field_samples(mut self, samples: usize) -> Self {
        self.direction_field_samples = samples;
        self
    }

    /// Load configuration from a JSON file.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content =
            fs::read_to_string(path.as_ref()).map_err(|e| ConfigError::IoError(e.to_string()))?;
        Self::from_json_str(&content)
    }

    /// Parse configuration from a JSON string. Missing fields take defaults.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| ConfigError::ParseError(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration and return any errors.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, value) in [
            ("indifference_epsilon", self.indifference_epsilon),
            ("zero_sum_tolerance", self.zero_sum_tolerance),
            ("convergence_tolerance", self.convergence_tolerance),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::InvalidTolerance(name, value));
            }
        }

        if !self.step_scale.is_finite() || self.step_scale <= 0.0 {
            return Err(ConfigError::InvalidStepScale(self.step_scale));
        }

        if self.direction_field_samples < 2 {
            return Err(ConfigError::InvalidSamples(self.direction_field_samples));
        }

        Ok(())
    }
}

/// Errors that can occur when loading or validating an `AnalyzerConfig`.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// The config file could not be read.
    IoError(String),
    /// The config file is not valid JSON for this schema.
    ParseError(String),
    /// A tolerance is negative or not finite.
    InvalidTolerance(&'static str, f64),
    /// The replicator step scale is not a positive finite number.
    InvalidStepScale(f64),
    /// Too few direction-field samples.
    InvalidSamples(usize),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::IoError(e) => write!(f, "Failed to read config: {}", e),
            ConfigError::ParseError(e) => write!(f, "Failed to parse config: {}", e),
            ConfigError::InvalidTolerance(name, val) => {
                write!(f, "{} {} must be a non-negative finite number", name, val)
            }
            ConfigError::InvalidStepScale(val) => {
                write!(f, "Step scale {} must be a positive finite number", val)
            }
            ConfigError::InvalidSamples(n) => {
                write!(f, "Direction field needs at least 2 samples, got {}", n)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Errors raised by analysis calls on malformed input.
///
/// Numeric edge cases of well-formed input (no equilibria, degenerate
/// indifference, out-of-range mixtures) are structured results, not errors.
#[derive(Debug, Clone, PartialEq)]
pub enum AnalysisError {
    /// The two players' payoff matrices differ in dimensions.
    ShapeMismatch {
        /// Shape of player 1's matrix (rows, cols).
        left: (usize, usize),
        /// Shape of player 2's matrix (rows, cols).
        right: (usize, usize),
    },
    /// A matrix with no rows or no columns.
    EmptyMatrix,
    /// Row `row` has `found` entries where `expected` were required.
    RaggedRows {
        /// Offending row index.
        row: usize,
        /// Length of row 0.
        expected: usize,
        /// Length of the offending row.
        found: usize,
    },
    /// A payoff entry is NaN or infinite.
    NonFinite {
        /// Row of the entry.
        row: usize,
        /// Column of the entry.
        col: usize,
    },
    /// A cell index outside the matrix.
    CellOutOfBounds {
        /// Requested row.
        row: usize,
        /// Requested column.
        col: usize,
    },
    /// The operation is defined for 2×2 games only.
    NotTwoByTwo {
        /// Shape actually supplied.
        shape: (usize, usize),
    },
    /// A population frequency outside [0, 1].
    InvalidFrequency(f64),
    /// A mixed-strategy probability outside [0, 1].
    InvalidProbability(f64),
    /// A negative or non-finite selection strength.
    InvalidSelectionStrength(f64),
}

impl std::fmt::Display for AnalysisError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AnalysisError::ShapeMismatch { left, right } => write!(
                f,
                "Payoff matrices differ in shape: {}x{} vs {}x{}",
                left.0, left.1, right.0, right.1
            ),
            AnalysisError::EmptyMatrix => write!(f, "Payoff matrix has no strategies"),
            AnalysisError::RaggedRows { row, expected, found } => write!(
                f,
                "Row {} has {} entries, expected {}",
                row, found, expected
            ),
            AnalysisError::NonFinite { row, col } => {
                write!(f, "Payoff at ({}, {}) is not a finite number", row, col)
            }
            AnalysisError::CellOutOfBounds { row, col } => {
                write!(f, "Cell ({}, {}) is outside the matrix", row, col)
            }
            AnalysisError::NotTwoByTwo { shape } => write!(
                f,
                "Operation requires a 2x2 game, got {}x{}",
                shape.0, shape.1
            ),
            AnalysisError::InvalidFrequency(val) => {
                write!(f, "Frequency {} is out of range [0, 1]", val)
            }
            AnalysisError::InvalidProbability(val) => {
                write!(f, "Probability {} is out of range [0, 1]", val)
            }
            AnalysisError::InvalidSelectionStrength(val) => {
                write!(f, "Selection strength {} must be a non-negative finite number", val)
            }
        }
    }
}

impl std::error::Error for AnalysisError {}
