//! Named games for the analyzer.
//!
//! This module collects the inputs the analysis engine is usually fed:
//!
//! 1. **Presets**: classic 2×2 bimatrix games with known structure
//!    (Prisoner's Dilemma, Battle of the Sexes, Matching Pennies, ...).
//!    They double as fixtures for the analysis tests.
//!
//! 2. **Game files**: [`GameSpec`] reads an arbitrary R×C game from JSON.
//!
//! 3. **Evolutionary games**: single-population matrices for replicator
//!    dynamics, see [`evolutionary`].
//!
//! 4. **Repeated dilemma**: an iterated Prisoner's Dilemma against scripted
//!    opponents, see [`repeated`].

pub mod evolutionary;
pub mod repeated;

use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::analysis::config::AnalysisError;
use crate::analysis::matrix::{Bimatrix, PayoffMatrix, Player};

/// Classic two-player games with fixed payoffs and strategy labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Preset {
    /// Defection strictly dominates; the only equilibrium is mutual defection.
    PrisonersDilemma,
    /// Two pure equilibria with opposed preferences over them.
    BattleOfTheSexes,
    /// Zero-sum with no pure equilibrium; mixes at (0.5, 0.5).
    MatchingPennies,
    /// Two pure equilibria, one payoff-dominant.
    CoordinationGame,
    /// Anti-coordination: each player wants the other to swerve.
    ChickenGame,
    /// Two-strategy slice of Rock Paper Scissors.
    RockPaperScissors2x2,
}

impl Preset {
    /// Every preset, in menu order.
    pub const ALL: [Preset; 6] = [
        Preset::PrisonersDilemma,
        Preset::BattleOfTheSexes,
        Preset::MatchingPennies,
        Preset::CoordinationGame,
        Preset::ChickenGame,
        Preset::RockPaperScissors2x2,
    ];

    /// Display name.
    pub fn name(&self) -> &'static str {
        match self {
            Preset::PrisonersDilemma => "Prisoner's Dilemma",
            Preset::BattleOfTheSexes => "Battle of the Sexes",
            Preset::MatchingPennies => "Matching Pennies",
            Preset::CoordinationGame => "Coordination Game",
            Preset::ChickenGame => "Chicken Game",
            Preset::RockPaperScissors2x2 => "Rock Paper Scissors (2x2)",
        }
    }

    /// Command-line identifier.
    pub fn slug(&self) -> &'static str {
        match self {
            Preset::PrisonersDilemma => "prisoners-dilemma",
            Preset::BattleOfTheSexes => "battle-of-the-sexes",
            Preset::MatchingPennies => "matching-pennies",
            Preset::CoordinationGame => "coordination",
            Preset::ChickenGame => "chicken",
            Preset::RockPaperScissors2x2 => "rock-paper-scissors",
        }
    }

    /// Payoff arrays for player 1 and player 2.
    fn arrays(&self) -> ([[f64; 2]; 2], [[f64; 2]; 2]) {
        match self {
            Preset::PrisonersDilemma => ([[3.0, 0.0], [5.0, 1.0]], [[3.0, 5.0], [0.0, 1.0]]),
            Preset::BattleOfTheSexes => ([[2.0, 0.0], [0.0, 1.0]], [[1.0, 0.0], [0.0, 2.0]]),
            Preset::MatchingPennies => {
                ([[1.0, -1.0], [-1.0, 1.0]], [[-1.0, 1.0], [1.0, -1.0]])
            }
            Preset::CoordinationGame => ([[2.0, 0.0], [0.0, 1.0]], [[2.0, 0.0], [0.0, 1.0]]),
            Preset::ChickenGame => ([[0.0, -1.0], [1.0, -10.0]], [[0.0, 1.0], [-1.0, -10.0]]),
            Preset::RockPaperScissors2x2 => {
                ([[0.0, -1.0], [1.0, 0.0]], [[0.0, 1.0], [-1.0, 0.0]])
            }
        }
    }

    /// Strategy labels, shared by both players.
    pub fn labels(&self) -> [&'static str; 2] {
        match self {
            Preset::PrisonersDilemma => ["Cooperate", "Defect"],
            Preset::BattleOfTheSexes => ["Opera", "Football"],
            Preset::MatchingPennies => ["Heads", "Tails"],
            Preset::CoordinationGame => ["Action A", "Action B"],
            Preset::ChickenGame => ["Swerve", "Straight"],
            Preset::RockPaperScissors2x2 => ["Strategy A", "Strategy B"],
        }
    }

    /// Build the game.
    pub fn game(&self) -> Bimatrix {
        let (p1, p2) = self.arrays();
        let labels = self.labels();
        Bimatrix::from_literal(
            PayoffMatrix::from_literal(p1),
            PayoffMatrix::from_literal(p2),
            &labels,
            &labels,
        )
    }
}

impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for Preset {
    type Err = GameError;

    /// Accepts the slug or the display name, ignoring case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Preset::ALL
            .into_iter()
            .find(|p| p.slug().eq_ignore_ascii_case(wanted) || p.name().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| GameError::UnknownPreset(wanted.to_string()))
    }
}

/// A game as stored in a JSON file.
///
/// ```json
/// { "name": "Stag Hunt",
///   "row_labels": ["Stag", "Hare"],
///   "payoff_1": [[4, 0], [3, 3]],
///   "payoff_2": [[4, 3], [0, 3]] }
/// ```
///
/// Labels are optional; lists of the wrong length fall back to `S1`, `S2`, ...
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameSpec {
    /// Display name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Player 1's strategy names.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub row_labels: Option<Vec<String>>,
    /// Player 2's strategy names.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub col_labels: Option<Vec<String>>,
    /// Player 1's payoffs.
    pub payoff_1: PayoffMatrix,
    /// Player 2's payoffs.
    pub payoff_2: PayoffMatrix,
}

impl GameSpec {
    /// Load a game from a JSON file.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, GameError> {
        let content =
            fs::read_to_string(path.as_ref()).map_err(|e| GameError::IoError(e.to_string()))?;
        Self::from_json_str(&content)
    }

    /// Parse a game from a JSON string.
    pub fn from_json_str(json: &str) -> Result<Self, GameError> {
        serde_json::from_str(json).map_err(|e| GameError::ParseError(e.to_string()))
    }

    /// Describe an existing game.
    pub fn from_game(name: impl Into<String>, game: &Bimatrix) -> Self {
        Self {
            name: Some(name.into()),
            row_labels: Some(game.labels(Player::Row).to_vec()),
            col_labels: Some(game.labels(Player::Column).to_vec()),
            payoff_1: game.payoff_1().clone(),
            payoff_2: game.payoff_2().clone(),
        }
    }

    /// Name to show for this game.
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("Custom Game")
    }

    /// Validate shapes and build the game.
    pub fn into_game(self) -> Result<Bimatrix, GameError> {
        let game = Bimatrix::new(self.payoff_1, self.payoff_2)?;
        Ok(game.with_labels(
            self.row_labels.unwrap_or_default(),
            self.col_labels.unwrap_or_default(),
        ))
    }
}

/// Errors raised while resolving a game description.
#[derive(Debug, Clone, PartialEq)]
pub enum GameError {
    /// The game file could not be read.
    IoError(String),
    /// The game file is not valid JSON for this schema.
    ParseError(String),
    /// The payoff matrices do not form a valid game.
    Invalid(AnalysisError),
    /// No preset has this name.
    UnknownPreset(String),
}

impl fmt::Display for GameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameError::IoError(e) => write!(f, "Failed to read game file: {}", e),
            GameError::ParseError(e) => write!(f, "Failed to parse game file: {}", e),
            GameError::Invalid(e) => write!(f, "Invalid game: {}", e),
            GameError::UnknownPreset(name) => {
                let known: Vec<&str> = Preset::ALL.iter().map(|p| p.slug()).collect();
                write!(f, "Unknown preset '{}' (expected one of: {})", name, known.join(", "))
            }
        }
    }
}

impl std::error::Error for GameError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            GameError::Invalid(e) => Some(e),
            _ => None,
        }
    }
}

impl From<AnalysisError> for GameError {
    fn from(e: AnalysisError) -> Self {
        GameError::Invalid(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::classify::classify;
    use crate::analysis::config::AnalyzerConfig;
    use crate::analysis::equilibrium::find_pure_equilibria;
    use crate::analysis::matrix::StrategyProfile;
    use crate::analysis::mixed::{solve_mixed_2x2, MixedSolution};

    fn equilibria(preset: Preset) -> Vec<StrategyProfile> {
        let game = preset.game();
        find_pure_equilibria(game.payoff_1(), game.payoff_2())
            .unwrap()
            .into_iter()
            .map(|cell| cell.profile)
            .collect()
    }

    #[test]
    fn test_preset_equilibria() {
        assert_eq!(equilibria(Preset::PrisonersDilemma), vec![StrategyProfile::new(1, 1)]);
        assert_eq!(
            equilibria(Preset::BattleOfTheSexes),
            vec![StrategyProfile::new(0, 0), StrategyProfile::new(1, 1)]
        );
        assert!(equilibria(Preset::MatchingPennies).is_empty());
        assert_eq!(
            equilibria(Preset::CoordinationGame),
            vec![StrategyProfile::new(0, 0), StrategyProfile::new(1, 1)]
        );
        assert_eq!(
            equilibria(Preset::ChickenGame),
            vec![StrategyProfile::new(0, 1), StrategyProfile::new(1, 0)]
        );
        // The second strategy strictly dominates the first for both players.
        assert_eq!(equilibria(Preset::RockPaperScissors2x2), vec![StrategyProfile::new(1, 1)]);
    }

    #[test]
    fn test_matching_pennies_mixes_evenly() {
        let game = Preset::MatchingPennies.game();
        let solution = solve_mixed_2x2(game.payoff_1(), game.payoff_2()).unwrap();
        let eq = solution.equilibrium().unwrap();
        assert!((eq.p - 0.5).abs() < 1e-12);
        assert!((eq.q - 0.5).abs() < 1e-12);
        assert!(eq.expected_payoffs.0.abs() < 1e-12);
        assert!(matches!(solution, MixedSolution::Interior(_)));

        let class = classify(game.payoff_1(), game.payoff_2(), &AnalyzerConfig::default()).unwrap();
        assert!(class.zero_sum);
    }

    #[test]
    fn test_labels_attached() {
        let game = Preset::ChickenGame.game();
        assert_eq!(game.labels(Player::Row), ["Swerve", "Straight"]);
        assert_eq!(game.labels(Player::Column), ["Swerve", "Straight"]);

        let game = Preset::RockPaperScissors2x2.game();
        assert_eq!(game.labels(Player::Row), ["Strategy A", "Strategy B"]);
        assert_eq!(game.labels(Player::Column), ["Strategy A", "Strategy B"]);
    }

    #[test]
    fn test_preset_parsing() {
        assert_eq!("chicken".parse::<Preset>(), Ok(Preset::ChickenGame));
        assert_eq!("Matching Pennies".parse::<Preset>(), Ok(Preset::MatchingPennies));
        assert_eq!("PRISONERS-DILEMMA".parse::<Preset>(), Ok(Preset::PrisonersDilemma));
        assert!(matches!("stag-hunt".parse::<Preset>(), Err(GameError::UnknownPreset(_))));
        for preset in Preset::ALL {
            assert_eq!(preset.slug().parse::<Preset>(), Ok(preset));
        }
    }

    #[test]
    fn test_game_spec_from_json() {
        let spec = GameSpec::from_json_str(
            r#"{ "name": "Stag Hunt",
                 "row_labels": ["Stag", "Hare"],
                 "payoff_1": [[4, 0], [3, 3]],
                 "payoff_2": [[4, 3], [0, 3]] }"#,
        )
        .unwrap();
        assert_eq!(spec.display_name(), "Stag Hunt");
        let game = spec.into_game().unwrap();
        assert_eq!(game.labels(Player::Row), ["Stag", "Hare"]);
        assert_eq!(game.labels(Player::Column), ["S1", "S2"]);
        assert_eq!(game.payoff_1()[(1, 0)], 3.0);
    }

    #[test]
    fn test_game_spec_rejects_bad_input() {
        let ragged = GameSpec::from_json_str(r#"{ "payoff_1": [[1, 2], [3]], "payoff_2": [[1, 2], [3, 4]] }"#);
        assert!(matches!(ragged, Err(GameError::ParseError(_))));

        let mismatched = GameSpec::from_json_str(
            r#"{ "payoff_1": [[1, 2], [3, 4]], "payoff_2": [[1, 2, 3], [4, 5, 6]] }"#,
        )
        .unwrap();
        assert!(matches!(
            mismatched.into_game(),
            Err(GameError::Invalid(AnalysisError::ShapeMismatch { .. }))
        ));

        assert!(matches!(
            GameSpec::from_json_file("no/such/game.json"),
            Err(GameError::IoError(_))
        ));
    }

    #[test]
    fn test_game_spec_round_trip_through_game() {
        let game = Preset::BattleOfTheSexes.game();
        let spec = GameSpec::from_game("Battle of the Sexes", &game);
        let json = serde_json::to_string(&spec).unwrap();
        let back = GameSpec::from_json_str(&json).unwrap().into_game().unwrap();
        assert_eq!(back, game);
    }
}
