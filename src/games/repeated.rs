//! Repeated Prisoner's Dilemma.
//!
//! A match is a sequence of rounds between player 1 and either a second
//! human or a scripted computer opponent. Each round's moves and scores are
//! recorded, and running totals plus an outcome tally are kept alongside.

use std::fmt;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::analysis::config::AnalysisError;
use crate::analysis::matrix::{Bimatrix, PayoffMatrix};

/// A move in the dilemma.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Move {
    /// Stay silent.
    Cooperate,
    /// Betray.
    Defect,
}

impl Move {
    /// Both moves, in matrix order.
    pub const ALL: [Move; 2] = [Move::Cooperate, Move::Defect];

    /// Strategy index in the derived bimatrix.
    pub fn index(self) -> usize {
        match self {
            Move::Cooperate => 0,
            Move::Defect => 1,
        }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Move::Cooperate => write!(f, "Cooperate"),
            Move::Defect => write!(f, "Defect"),
        }
    }
}

/// Scores awarded per round.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DilemmaPayoffs {
    /// Each player's score when both cooperate.
    pub both_cooperate: f64,
    /// Score of a cooperator facing a defector.
    pub sucker: f64,
    /// Score of a defector facing a cooperator.
    pub temptation: f64,
    /// Each player's score when both defect.
    pub both_defect: f64,
}

impl Default for DilemmaPayoffs {
    fn default() -> Self {
        Self {
            both_cooperate: 3.0,
            sucker: 0.0,
            temptation: 5.0,
            both_defect: 1.0,
        }
    }
}

impl DilemmaPayoffs {
    /// Scores for player 1 and player 2 given their moves.
    pub fn score(&self, first: Move, second: Move) -> (f64, f64) {
        match (first, second) {
            (Move::Cooperate, Move::Cooperate) => (self.both_cooperate, self.both_cooperate),
            (Move::Cooperate, Move::Defect) => (self.sucker, self.temptation),
            (Move::Defect, Move::Cooperate) => (self.temptation, self.sucker),
            (Move::Defect, Move::Defect) => (self.both_defect, self.both_defect),
        }
    }

    /// Whether the ordering makes this a true dilemma: T > R > P > S.
    pub fn is_dilemma(&self) -> bool {
        self.temptation > self.both_cooperate
            && self.both_cooperate > self.both_defect
            && self.both_defect > self.sucker
    }

    /// The one-shot game as a bimatrix with Cooperate/Defect labels.
    ///
    /// Fails when any score is not finite.
    pub fn game(&self) -> Result<Bimatrix, AnalysisError> {
        let mut p1 = [[0.0; 2]; 2];
        let mut p2 = [[0.0; 2]; 2];
        for a in Move::ALL {
            for b in Move::ALL {
                let (x, y) = self.score(a, b);
                p1[a.index()][b.index()] = x;
                p2[a.index()][b.index()] = y;
            }
        }
        let labels: Vec<String> = Move::ALL.iter().map(Move::to_string).collect();
        Ok(
            Bimatrix::new(PayoffMatrix::from_array(p1)?, PayoffMatrix::from_array(p2)?)?
                .with_labels(labels.clone(), labels),
        )
    }
}

/// Scripted behavior of a computer opponent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ComputerStrategy {
    /// Always cooperate.
    AlwaysCooperate,
    /// Always defect.
    AlwaysDefect,
    /// Cooperate first, then copy the human's previous move.
    TitForTat,
    /// Fair coin each round.
    Random,
}

impl ComputerStrategy {
    /// Every strategy.
    pub const ALL: [ComputerStrategy; 4] = [
        ComputerStrategy::AlwaysCooperate,
        ComputerStrategy::AlwaysDefect,
        ComputerStrategy::TitForTat,
        ComputerStrategy::Random,
    ];

    /// Pick the computer's move given the match so far.
    pub fn choose<R: Rng + ?Sized>(&self, history: &[RoundRecord], rng: &mut R) -> Move {
        match self {
            ComputerStrategy::AlwaysCooperate => Move::Cooperate,
            ComputerStrategy::AlwaysDefect => Move::Defect,
            ComputerStrategy::TitForTat => history
                .last()
                .map(|round| round.first)
                .unwrap_or(Move::Cooperate),
            ComputerStrategy::Random => {
                if rng.gen_bool(0.5) {
                    Move::Cooperate
                } else {
                    Move::Defect
                }
            }
        }
    }
}

impl fmt::Display for ComputerStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ComputerStrategy::AlwaysCooperate => "Always Cooperate",
            ComputerStrategy::AlwaysDefect => "Always Defect",
            ComputerStrategy::TitForTat => "Tit-for-Tat",
            ComputerStrategy::Random => "Random",
        };
        write!(f, "{}", name)
    }
}

/// One played round.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RoundRecord {
    /// Round number, starting at 1.
    pub round: usize,
    /// Player 1's move.
    pub first: Move,
    /// Opponent's move.
    pub second: Move,
    /// Player 1's score this round.
    pub first_score: f64,
    /// Opponent's score this round.
    pub second_score: f64,
}

/// An ongoing repeated match.
///
/// # Example
/// ```
/// use bimatrix_solver::games::repeated::{ComputerStrategy, Move, RepeatedMatch};
///
/// let mut game = RepeatedMatch::against(ComputerStrategy::TitForTat, Some(7));
/// game.play(Move::Defect);
/// let round = game.play(Move::Cooperate);
/// assert_eq!(round.second, Move::Defect);
/// ```
#[derive(Debug, Clone)]
pub struct RepeatedMatch {
    payoffs: DilemmaPayoffs,
    opponent: Option<ComputerStrategy>,
    history: Vec<RoundRecord>,
    totals: (f64, f64),
    tally: FxHashMap<(Move, Move), usize>,
    rng: StdRng,
}

impl RepeatedMatch {
    /// A match between two humans with the given payoffs.
    pub fn new(payoffs: DilemmaPayoffs) -> Self {
        Self {
            payoffs,
            opponent: None,
            history: Vec::new(),
            totals: (0.0, 0.0),
            tally: FxHashMap::default(),
            rng: StdRng::from_entropy(),
        }
    }

    /// A match against a computer opponent with default payoffs.
    ///
    /// A seed makes the Random opponent reproducible.
    pub fn against(strategy: ComputerStrategy, seed: Option<u64>) -> Self {
        Self::new(DilemmaPayoffs::default()).with_opponent(strategy, seed)
    }

    /// Builder method: play against `strategy`.
    pub fn with_opponent(mut self, strategy: ComputerStrategy, seed: Option<u64>) -> Self {
        self.opponent = Some(strategy);
        self.rng = match seed {
            Some(s) => StdRng::seed_from_u64(s),
            None => StdRng::from_entropy(),
        };
        self
    }

    /// Play one round against the computer opponent.
    ///
    /// Without an opponent configured the other side cooperates.
    pub fn play(&mut self, player_move: Move) -> RoundRecord {
        let reply = match self.opponent {
            Some(strategy) => strategy.choose(&self.history, &mut self.rng),
            None => Move::Cooperate,
        };
        self.record(player_move, reply)
    }

    /// Play one round where both moves are supplied.
    pub fn play_pair(&mut self, first: Move, second: Move) -> RoundRecord {
        self.record(first, second)
    }

    fn record(&mut self, first: Move, second: Move) -> RoundRecord {
        let (first_score, second_score) = self.payoffs.score(first, second);
        let round = RoundRecord {
            round: self.history.len() + 1,
            first,
            second,
            first_score,
            second_score,
        };
        self.totals.0 += first_score;
        self.totals.1 += second_score;
        *self.tally.entry((first, second)).or_insert(0) += 1;
        self.history.push(round);
        log::debug!(
            "Round {}: {} vs {} -> ({}, {})",
            round.round,
            first,
            second,
            first_score,
            second_score
        );
        round
    }

    /// Both players' scores for any pair of moves.
    pub fn score(&self, first: Move, second: Move) -> (f64, f64) {
        self.payoffs.score(first, second)
    }

    /// Payoffs in use.
    pub fn payoffs(&self) -> &DilemmaPayoffs {
        &self.payoffs
    }

    /// Computer opponent, if any.
    pub fn opponent(&self) -> Option<ComputerStrategy> {
        self.opponent
    }

    /// Every round played so far.
    pub fn history(&self) -> &[RoundRecord] {
        &self.history
    }

    /// Number of rounds played.
    pub fn rounds(&self) -> usize {
        self.history.len()
    }

    /// Running totals for player 1 and the opponent.
    pub fn totals(&self) -> (f64, f64) {
        self.totals
    }

    /// How often a pair of moves occurred.
    pub fn count(&self, first: Move, second: Move) -> usize {
        self.tally.get(&(first, second)).copied().unwrap_or(0)
    }

    /// Fraction of rounds in which player 1 cooperated.
    pub fn cooperation_rate(&self) -> Option<f64> {
        if self.history.is_empty() {
            return None;
        }
        let cooperated = self.count(Move::Cooperate, Move::Cooperate)
            + self.count(Move::Cooperate, Move::Defect);
        Some(cooperated as f64 / self.history.len() as f64)
    }

    /// Clear history and totals, keeping payoffs and opponent.
    pub fn reset(&mut self) {
        self.history.clear();
        self.totals = (0.0, 0.0);
        self.tally.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::equilibrium::find_pure_equilibria;
    use crate::analysis::matrix::{Player, StrategyProfile};

    #[test]
    fn test_default_payoffs_form_a_dilemma() {
        let payoffs = DilemmaPayoffs::default();
        assert!(payoffs.is_dilemma());
        assert_eq!(payoffs.score(Move::Cooperate, Move::Defect), (0.0, 5.0));
        assert_eq!(payoffs.score(Move::Defect, Move::Defect), (1.0, 1.0));
    }

    #[test]
    fn test_derived_game_has_mutual_defection_equilibrium() {
        let game = DilemmaPayoffs::default().game().unwrap();
        assert_eq!(game.payoff_1().to_rows(), vec![vec![3.0, 0.0], vec![5.0, 1.0]]);
        assert_eq!(game.payoff_2().to_rows(), vec![vec![3.0, 5.0], vec![0.0, 1.0]]);
        assert_eq!(game.labels(Player::Row), ["Cooperate", "Defect"]);
        assert_eq!(game.labels(Player::Column), ["Cooperate", "Defect"]);
        let eq = find_pure_equilibria(game.payoff_1(), game.payoff_2()).unwrap();
        assert_eq!(eq.len(), 1);
        assert_eq!(eq[0].profile, StrategyProfile::new(1, 1));
    }

    #[test]
    fn test_non_finite_payoffs_rejected() {
        let payoffs = DilemmaPayoffs {
            temptation: f64::NAN,
            ..Default::default()
        };
        assert_eq!(payoffs.game(), Err(AnalysisError::NonFinite { row: 1, col: 0 }));

        let payoffs = DilemmaPayoffs {
            both_defect: f64::INFINITY,
            ..Default::default()
        };
        assert_eq!(payoffs.game(), Err(AnalysisError::NonFinite { row: 1, col: 1 }));

        let payoffs: DilemmaPayoffs = serde_json::from_str(r#"{"sucker": -1.0}"#).unwrap();
        assert!(payoffs.game().is_ok());
    }

    #[test]
    fn test_tit_for_tat_copies_previous_move() {
        let mut game = RepeatedMatch::against(ComputerStrategy::TitForTat, Some(1));
        let moves = [Move::Cooperate, Move::Defect, Move::Defect, Move::Cooperate];
        let replies: Vec<Move> = moves.iter().map(|&m| game.play(m).second).collect();
        assert_eq!(
            replies,
            vec![Move::Cooperate, Move::Cooperate, Move::Defect, Move::Defect]
        );
        assert_eq!(game.rounds(), 4);
        assert_eq!(game.history()[3].round, 4);
    }

    #[test]
    fn test_totals_and_tally() {
        let mut game = RepeatedMatch::against(ComputerStrategy::AlwaysDefect, None);
        game.play(Move::Cooperate);
        game.play(Move::Defect);
        game.play(Move::Defect);
        assert_eq!(game.totals(), (2.0, 7.0));
        assert_eq!(game.count(Move::Defect, Move::Defect), 2);
        assert_eq!(game.count(Move::Cooperate, Move::Defect), 1);
        assert_eq!(game.count(Move::Cooperate, Move::Cooperate), 0);
        assert_eq!(game.cooperation_rate(), Some(1.0 / 3.0));

        game.reset();
        assert_eq!(game.totals(), (0.0, 0.0));
        assert_eq!(game.rounds(), 0);
        assert_eq!(game.cooperation_rate(), None);
        assert_eq!(game.opponent(), Some(ComputerStrategy::AlwaysDefect));
    }

    #[test]
    fn test_random_opponent_is_reproducible_with_seed() {
        let play = |seed| {
            let mut game = RepeatedMatch::against(ComputerStrategy::Random, Some(seed));
            (0..50).map(|_| game.play(Move::Cooperate).second).collect::<Vec<_>>()
        };
        let first = play(42);
        assert_eq!(first, play(42));
        assert!(first.contains(&Move::Cooperate));
        assert!(first.contains(&Move::Defect));
    }

    #[test]
    fn test_two_human_rounds() {
        let mut game = RepeatedMatch::new(DilemmaPayoffs {
            temptation: 10.0,
            ..Default::default()
        });
        let round = game.play_pair(Move::Defect, Move::Cooperate);
        assert_eq!((round.first_score, round.second_score), (10.0, 0.0));
        assert_eq!(game.opponent(), None);
    }
}
