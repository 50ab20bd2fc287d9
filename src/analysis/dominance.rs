//! Weak dominance between one player's pure strategies.
//!
//! Strategy `i` weakly dominates `k` when it pays at least as much against
//! every opponent strategy and strictly more against at least one.

use serde::{Deserialize, Serialize};

use crate::analysis::matrix::{PayoffMatrix, Player};

/// Dominance relations of a single strategy.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DominanceEntry {
    /// Strategies this one weakly dominates, ascending.
    pub dominates: Vec<usize>,
    /// Strategies weakly dominating this one, ascending.
    pub dominated_by: Vec<usize>,
}

/// Dominance relations for every strategy of one player, indexed by strategy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DominanceReport {
    /// Whose strategies were compared.
    pub player: Player,
    /// One entry per strategy.
    pub entries: Vec<DominanceEntry>,
}

impl DominanceReport {
    /// Entry for strategy `index`.
    pub fn get(&self, index: usize) -> Option<&DominanceEntry> {
        self.entries.get(index)
    }

    /// Strategies no other strategy dominates.
    pub fn undominated(&self) -> Vec<usize> {
        self.entries
            .iter()
            .enumerate()
            .filter(|(_, e)| e.dominated_by.is_empty())
            .map(|(k, _)| k)
            .collect()
    }

    /// A strategy dominating every other one, if any.
    pub fn dominant(&self) -> Option<usize> {
        let n = self.entries.len();
        if n < 2 {
            return None;
        }
        self.entries.iter().position(|e| e.dominates.len() == n - 1)
    }

    /// Whether any dominance relation exists at all.
    pub fn is_empty(&self) -> bool {
        self.entries.iter().all(|e| e.dominates.is_empty())
    }
}

/// Compute weak dominance among `player`'s strategies in `payoff`.
///
/// For `Player::Row`, rows are compared across every column; for
/// `Player::Column`, columns are compared across every row. Self-comparison
/// is excluded, so the relation is irreflexive.
///
/// # Example
/// ```
/// use bimatrix_solver::analysis::{find_dominance, PayoffMatrix, Player};
///
/// let p1 = PayoffMatrix::from_array([[3.0, 0.0], [5.0, 1.0]]).unwrap();
/// let report = find_dominance(&p1, Player::Row);
/// assert_eq!(report.get(0).unwrap().dominated_by, vec![1]);
/// ```
pub fn find_dominance(payoff: &PayoffMatrix, player: Player) -> DominanceReport {
    let strategies: Vec<Vec<f64>> = match player {
        Player::Row => (0..payoff.rows()).map(|i| payoff.row(i).to_vec()).collect(),
        Player::Column => (0..payoff.cols()).map(|j| payoff.column(j).collect()).collect(),
    };

    let n = strategies.len();
    let mut entries = vec![DominanceEntry::default(); n];
    for i in 0..n {
        for k in 0..n {
            if i != k && weakly_dominates(&strategies[i], &strategies[k]) {
                entries[i].dominates.push(k);
                entries[k].dominated_by.push(i);
            }
        }
    }
    for entry in &mut entries {
        entry.dominated_by.sort_unstable();
    }

    DominanceReport { player, entries }
}

/// Whether payoff vector `a` weakly dominates `b` (same opponent order).
pub fn weakly_dominates(a: &[f64], b: &[f64]) -> bool {
    let mut strict = false;
    for (&x, &y) in a.iter().zip(b) {
        if x < y {
            return false;
        }
        strict |= x > y;
    }
    strict
}
