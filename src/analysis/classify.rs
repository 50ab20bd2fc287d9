//! Coarse classification of a game's payoff structure.

use serde::{Deserialize, Serialize};

use crate::analysis::config::{AnalysisError, AnalyzerConfig};
use crate::analysis::matrix::{ensure_same_shape, PayoffMatrix};

/// Structural properties of a bimatrix game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Classification {
    /// Every cell's payoffs sum to zero (within tolerance).
    pub zero_sum: bool,
    /// More than half the cells give both players payoffs of the same sign.
    pub coordination: bool,
}

/// Classify a game as zero-sum and/or coordination.
///
/// A cell counts toward coordination when both payoffs are strictly
/// positive or both strictly negative; cells with a zero payoff never do.
pub fn classify(
    payoff_1: &PayoffMatrix,
    payoff_2: &PayoffMatrix,
    config: &AnalyzerConfig,
) -> Result<Classification, AnalysisError> {
    let (rows, cols) = ensure_same_shape(payoff_1, payoff_2)?;

    let zero_sum = payoff_1
        .cells()
        .all(|(cell, a)| (a + payoff_2[cell]).abs() <= config.zero_sum_tolerance);

    let aligned = payoff_1
        .cells()
        .filter(|&(cell, a)| {
            let b = payoff_2[cell];
            (a > 0.0 && b > 0.0) || (a < 0.0 && b < 0.0)
        })
        .count();
    let coordination = 2 * aligned > rows * cols;

    Ok(Classification {
        zero_sum,
        coordination,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matrix(array: [[f64; 2]; 2]) -> PayoffMatrix {
        PayoffMatrix::from_array(array).unwrap()
    }

    #[test]
    fn test_matching_pennies_is_zero_sum() {
        let c = classify(
            &matrix([[1.0, -1.0], [-1.0, 1.0]]),
            &matrix([[-1.0, 1.0], [1.0, -1.0]]),
            &AnalyzerConfig::default(),
        )
        .unwrap();
        assert!(c.zero_sum);
        assert!(!c.coordination);
    }

    #[test]
    fn test_prisoners_dilemma_is_not_coordination() {
        // Only (3, 3) and (1, 1) share a strict sign; the other cells hold a zero.
        let c = classify(
            &matrix([[3.0, 0.0], [5.0, 1.0]]),
            &matrix([[3.0, 5.0], [0.0, 1.0]]),
            &AnalyzerConfig::default(),
        )
        .unwrap();
        assert!(!c.zero_sum);
        assert!(!c.coordination);
    }

    #[test]
    fn test_three_aligned_cells_is_coordination() {
        let p = matrix([[2.0, 1.0], [1.0, 0.0]]);
        let c = classify(&p, &p, &AnalyzerConfig::default()).unwrap();
        assert!(c.coordination);
        assert!(!c.zero_sum);

        let negative = matrix([[-2.0, -1.0], [-1.0, 0.0]]);
        assert!(classify(&negative, &negative, &AnalyzerConfig::default()).unwrap().coordination);
    }

    #[test]
    fn test_half_aligned_is_not_coordination() {
        let p = matrix([[2.0, 0.0], [0.0, 1.0]]);
        let c = classify(&p, &p, &AnalyzerConfig::default()).unwrap();
        assert!(!c.coordination);
        assert!(!c.zero_sum);
    }

    #[test]
    fn test_zero_sum_tolerance() {
        let p1 = matrix([[1.0, 0.0], [0.0, 1.0]]);
        let p2 = matrix([[-1.0 + 1e-9, 0.0], [0.0, -1.0]]);
        assert!(classify(&p1, &p2, &AnalyzerConfig::default()).unwrap().zero_sum);
        let p2 = matrix([[-1.0 + 1e-6, 0.0], [0.0, -1.0]]);
        assert!(!classify(&p1, &p2, &AnalyzerConfig::default()).unwrap().zero_sum);
    }
}
