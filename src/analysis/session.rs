//! Caller-owned analyzer state and the report it produces.
//!
//! A `Session` holds the game currently being edited, the analyzer
//! configuration and, optionally, a repeated Prisoner's Dilemma in progress.
//! `Session::analyze` runs every applicable analysis on the current game and
//! bundles the results into an [`AnalysisReport`].

use std::fmt;
use std::fs::File;
use std::io::Write;
use std::path::Path;

use serde::Serialize;

use crate::analysis::classify::{classify, Classification};
use crate::analysis::config::{AnalysisError, AnalyzerConfig, ConfigError};
use crate::analysis::dominance::{find_dominance, DominanceReport};
use crate::analysis::equilibrium::{best_responses, find_pure_equilibria, BestResponses, EquilibriumCell};
use crate::analysis::matrix::{Bimatrix, PayoffMatrix, Player};
use crate::analysis::mixed::{solve_mixed_2x2_with, MixedSolution};
use crate::games::repeated::{ComputerStrategy, DilemmaPayoffs, RepeatedMatch};
use crate::games::{GameError, GameSpec, Preset};

const CUSTOM_GAME: &str = "Custom Game";

/// Everything the analyzer found about one game.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisReport {
    /// Name of the analyzed game.
    pub name: String,
    /// The game itself.
    pub game: Bimatrix,
    /// Pure-strategy Nash equilibria, row-major.
    pub equilibria: Vec<EquilibriumCell>,
    /// Best-response tables for both players.
    pub best_responses: BestResponses,
    /// Dominance among player 1's strategies.
    pub row_dominance: DominanceReport,
    /// Dominance among player 2's strategies.
    pub column_dominance: DominanceReport,
    /// Zero-sum / coordination flags.
    pub classification: Classification,
    /// Mixed-strategy solution, present for 2×2 games only.
    pub mixed: Option<MixedSolution>,
}

impl AnalysisReport {
    /// Save to JSON file.
    pub fn save_json<P: AsRef<Path>>(&self, path: P) -> std::io::Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        let mut file = File::create(path)?;
        file.write_all(json.as_bytes())
    }

    fn label(&self, player: Player, index: usize) -> &str {
        self.game
            .labels(player)
            .get(index)
            .map(String::as_str)
            .unwrap_or("?")
    }

    fn labels(&self, player: Player, indices: &[usize]) -> String {
        indices
            .iter()
            .map(|&k| self.label(player, k))
            .collect::<Vec<_>>()
            .join(", ")
    }

    fn fmt_dominance(&self, f: &mut fmt::Formatter<'_>, report: &DominanceReport) -> fmt::Result {
        let player = report.player;
        if report.is_empty() {
            return writeln!(f, "  {}: no dominance relations", player);
        }
        for (k, entry) in report.entries.iter().enumerate() {
            if !entry.dominates.is_empty() {
                writeln!(
                    f,
                    "  {}: {} dominates {}",
                    player,
                    self.label(player, k),
                    self.labels(player, &entry.dominates)
                )?;
            }
        }
        if let Some(k) = report.dominant() {
            writeln!(f, "  {}: dominant strategy {}", player, self.label(player, k))?;
        }
        Ok(())
    }
}

fn yes_no(flag: bool) -> &'static str {
    if flag {
        "yes"
    } else {
        "no"
    }
}

impl fmt::Display for AnalysisReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (rows, cols) = self.game.shape();
        writeln!(f, "=== {} ({}x{}) ===", self.name, rows, cols)?;
        writeln!(f, "{}", self.game)?;

        writeln!(f, "Pure Nash equilibria:")?;
        if self.equilibria.is_empty() {
            writeln!(f, "  none")?;
        }
        for cell in &self.equilibria {
            writeln!(
                f,
                "  ({}, {}) -> ({}, {})",
                self.label(Player::Row, cell.profile.row),
                self.label(Player::Column, cell.profile.col),
                cell.payoffs.0,
                cell.payoffs.1
            )?;
        }

        writeln!(f, "Best responses:")?;
        for br in &self.best_responses.row_player {
            writeln!(
                f,
                "  Player 1 vs {}: {} (payoff {})",
                self.label(Player::Column, br.against),
                self.labels(Player::Row, &br.strategies),
                br.payoff
            )?;
        }
        for br in &self.best_responses.column_player {
            writeln!(
                f,
                "  Player 2 vs {}: {} (payoff {})",
                self.label(Player::Row, br.against),
                self.labels(Player::Column, &br.strategies),
                br.payoff
            )?;
        }

        writeln!(f, "Dominance:")?;
        self.fmt_dominance(f, &self.row_dominance)?;
        self.fmt_dominance(f, &self.column_dominance)?;

        writeln!(
            f,
            "Classification: zero-sum {}, coordination {}",
            yes_no(self.classification.zero_sum),
            yes_no(self.classification.coordination)
        )?;

        match &self.mixed {
            Some(MixedSolution::Interior(eq)) => writeln!(
                f,
                "Mixed equilibrium: p = {:.4}, q = {:.4}, expected payoffs ({:.4}, {:.4})",
                eq.p, eq.q, eq.expected_payoffs.0, eq.expected_payoffs.1
            ),
            Some(MixedSolution::Degenerate { players }) => {
                let who: Vec<String> = players.iter().map(|p| p.to_string()).collect();
                writeln!(
                    f,
                    "Mixed equilibrium: none (no indifference for {})",
                    who.join(" and ")
                )
            }
            Some(MixedSolution::OutOfRange { p, q }) => writeln!(
                f,
                "Mixed equilibrium: none (solution p = {:.4}, q = {:.4} lies outside [0, 1])",
                p, q
            ),
            None => writeln!(f, "Mixed equilibrium: only solved for 2x2 games"),
        }
    }
}

/// Analyzer state owned by the caller.
///
/// # Example
/// ```
/// use bimatrix_solver::analysis::Session;
/// use bimatrix_solver::games::Preset;
///
/// let mut session = Session::default();
/// session.select_preset(Preset::PrisonersDilemma);
/// let report = session.analyze().unwrap();
/// assert_eq!(report.equilibria.len(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct Session {
    name: String,
    game: Bimatrix,
    config: AnalyzerConfig,
    repeated: Option<RepeatedMatch>,
}

impl Default for Session {
    fn default() -> Self {
        Self::new(AnalyzerConfig::default())
    }
}

impl Session {
    /// A session on the 2×2 game `[[3, 0], [0, 3]]` for both players.
    pub fn new(config: AnalyzerConfig) -> Self {
        let start = PayoffMatrix::from_literal([[3.0, 0.0], [0.0, 3.0]]);
        Self {
            name: CUSTOM_GAME.to_string(),
            game: Bimatrix::from_literal(start.clone(), start, &["S1", "S2"], &["S1", "S2"]),
            config,
            repeated: None,
        }
    }

    /// A session starting on a preset.
    pub fn from_preset(preset: Preset, config: AnalyzerConfig) -> Self {
        let mut session = Self::new(config);
        session.select_preset(preset);
        session
    }

    /// A session starting on a game read from a file description.
    pub fn from_spec(spec: GameSpec, config: AnalyzerConfig) -> Result<Self, GameError> {
        let name = spec.display_name().to_string();
        let game = spec.into_game()?;
        let mut session = Self::new(config);
        session.set_game(name, game);
        Ok(session)
    }

    /// Name of the current game.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The current game.
    pub fn game(&self) -> &Bimatrix {
        &self.game
    }

    /// Analyzer configuration in use.
    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    /// Replace the configuration after validating it.
    pub fn set_config(&mut self, config: AnalyzerConfig) -> Result<(), ConfigError> {
        config.validate()?;
        self.config = config;
        Ok(())
    }

    /// Load a preset, replacing both matrices and labels.
    pub fn select_preset(&mut self, preset: Preset) {
        self.set_game(preset.name(), preset.game());
    }

    /// Replace the current game.
    pub fn set_game(&mut self, name: impl Into<String>, game: Bimatrix) {
        self.name = name.into();
        self.game = game;
        log::debug!("session game set to {} ({:?})", self.name, self.game.shape());
    }

    /// Change the game's dimensions.
    ///
    /// A different shape resets both matrices to zeros and the labels to
    /// defaults; the same shape keeps the game untouched.
    pub fn resize(&mut self, rows: usize, cols: usize) -> Result<(), AnalysisError> {
        if self.game.shape() == (rows, cols) {
            return Ok(());
        }
        let game = Bimatrix::zeros(rows, cols)?;
        self.set_game(CUSTOM_GAME, game);
        Ok(())
    }

    /// Edit one payoff of one player.
    pub fn set_payoff(
        &mut self,
        player: Player,
        row: usize,
        col: usize,
        value: f64,
    ) -> Result<(), AnalysisError> {
        let edited = self.game.payoff(player).with_value(row, col, value)?;
        let (payoff_1, payoff_2) = match player {
            Player::Row => (edited, self.game.payoff_2().clone()),
            Player::Column => (self.game.payoff_1().clone(), edited),
        };
        self.game = Bimatrix::new(payoff_1, payoff_2)?.with_labels(
            self.game.labels(Player::Row).to_vec(),
            self.game.labels(Player::Column).to_vec(),
        );
        Ok(())
    }

    /// Rename strategies. Lists of the wrong length are ignored.
    pub fn set_labels(&mut self, row_labels: Vec<String>, col_labels: Vec<String>) {
        self.game = self.game.clone().with_labels(row_labels, col_labels);
    }

    /// Run every analysis that applies to the current game.
    pub fn analyze(&self) -> Result<AnalysisReport, AnalysisError> {
        let p1 = self.game.payoff_1();
        let p2 = self.game.payoff_2();

        let mixed = if self.game.is_two_by_two() {
            Some(solve_mixed_2x2_with(p1, p2, &self.config)?)
        } else {
            None
        };

        let report = AnalysisReport {
            name: self.name.clone(),
            game: self.game.clone(),
            equilibria: find_pure_equilibria(p1, p2)?,
            best_responses: best_responses(p1, p2)?,
            row_dominance: find_dominance(p1, Player::Row),
            column_dominance: find_dominance(p2, Player::Column),
            classification: classify(p1, p2, &self.config)?,
            mixed,
        };
        log::info!(
            "analyzed {}: {} pure equilibria",
            report.name,
            report.equilibria.len()
        );
        Ok(report)
    }

    /// Start a new repeated dilemma, replacing any match in progress.
    ///
    /// Without an opponent the match is between two humans.
    pub fn start_match(
        &mut self,
        payoffs: DilemmaPayoffs,
        opponent: Option<ComputerStrategy>,
        seed: Option<u64>,
    ) -> &mut RepeatedMatch {
        let game = match opponent {
            Some(strategy) => RepeatedMatch::new(payoffs).with_opponent(strategy, seed),
            None => RepeatedMatch::new(payoffs),
        };
        self.repeated.insert(game)
    }

    /// The repeated match in progress, if any.
    pub fn repeated_match(&self) -> Option<&RepeatedMatch> {
        self.repeated.as_ref()
    }

    /// Mutable access to the repeated match in progress.
    pub fn repeated_match_mut(&mut self) -> Option<&mut RepeatedMatch> {
        self.repeated.as_mut()
    }

    /// End the match in progress and hand it back.
    pub fn end_match(&mut self) -> Option<RepeatedMatch> {
        self.repeated.take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::matrix::StrategyProfile;
    use crate::games::repeated::Move;

    #[test]
    fn test_default_session_game() {
        let session = Session::default();
        assert_eq!(session.name(), "Custom Game");
        assert_eq!(session.game().payoff_1().to_rows(), vec![vec![3.0, 0.0], vec![0.0, 3.0]]);
        let report = session.analyze().unwrap();
        assert_eq!(
            report.equilibria.iter().map(|c| c.profile).collect::<Vec<_>>(),
            vec![StrategyProfile::new(0, 0), StrategyProfile::new(1, 1)]
        );
    }

    #[test]
    fn test_prisoners_dilemma_report() {
        let session = Session::from_preset(Preset::PrisonersDilemma, AnalyzerConfig::default());
        let report = session.analyze().unwrap();

        assert_eq!(report.equilibria.len(), 1);
        assert_eq!(report.equilibria[0].payoffs, (1.0, 1.0));
        assert_eq!(report.row_dominance.dominant(), Some(1));
        assert_eq!(report.column_dominance.dominant(), Some(1));
        assert!(!report.classification.coordination);
        assert_eq!(report.mixed, Some(MixedSolution::OutOfRange { p: -1.0, q: -1.0 }));

        let text = report.to_string();
        assert!(text.contains("(Defect, Defect) -> (1, 1)"));
        assert!(text.contains("Player 1: Defect dominates Cooperate"));
        assert!(text.contains("lies outside [0, 1]"));
    }

    #[test]
    fn test_matching_pennies_report() {
        let session = Session::from_preset(Preset::MatchingPennies, AnalyzerConfig::default());
        let report = session.analyze().unwrap();
        assert!(report.equilibria.is_empty());
        assert!(report.classification.zero_sum);
        let eq = report.mixed.as_ref().and_then(|m| m.equilibrium()).unwrap();
        assert!((eq.p - 0.5).abs() < 1e-12 && (eq.q - 0.5).abs() < 1e-12);

        let text = report.to_string();
        assert!(text.contains("none"));
        assert!(text.contains("p = 0.5000, q = 0.5000"));
    }

    #[test]
    fn test_resize_resets_to_zeros() {
        let mut session = Session::from_preset(Preset::ChickenGame, AnalyzerConfig::default());
        session.resize(2, 2).unwrap();
        assert_eq!(session.name(), "Chicken Game");

        session.resize(3, 2).unwrap();
        assert_eq!(session.game().shape(), (3, 2));
        assert!(session.game().payoff_1().cells().all(|(_, v)| v == 0.0));
        assert!(session.game().payoff_2().cells().all(|(_, v)| v == 0.0));
        assert_eq!(session.game().labels(Player::Row), ["S1", "S2", "S3"]);

        let report = session.analyze().unwrap();
        assert_eq!(report.equilibria.len(), 6);
        assert!(report.mixed.is_none());
        assert!(report.classification.zero_sum);

        assert_eq!(session.resize(0, 2), Err(AnalysisError::EmptyMatrix));
    }

    #[test]
    fn test_set_payoff_keeps_labels() {
        let mut session = Session::from_preset(Preset::CoordinationGame, AnalyzerConfig::default());
        session.set_payoff(Player::Column, 1, 1, 5.0).unwrap();
        assert_eq!(session.game().payoff_2()[(1, 1)], 5.0);
        assert_eq!(session.game().payoff_1()[(1, 1)], 1.0);
        assert_eq!(session.game().labels(Player::Row), ["Action A", "Action B"]);

        assert_eq!(
            session.set_payoff(Player::Row, 2, 0, 1.0),
            Err(AnalysisError::CellOutOfBounds { row: 2, col: 0 })
        );
    }

    #[test]
    fn test_from_spec() {
        let spec = GameSpec::from_json_str(
            r#"{ "payoff_1": [[1, 0, 0], [0, 1, 0]], "payoff_2": [[0, 1, 0], [1, 0, 0]] }"#,
        )
        .unwrap();
        let session = Session::from_spec(spec, AnalyzerConfig::default()).unwrap();
        assert_eq!(session.name(), "Custom Game");
        assert_eq!(session.game().shape(), (2, 3));
        assert!(session.analyze().unwrap().mixed.is_none());
    }

    #[test]
    fn test_report_serializes() {
        let report = Session::from_preset(Preset::BattleOfTheSexes, AnalyzerConfig::default())
            .analyze()
            .unwrap();
        let value = serde_json::to_value(&report).unwrap();
        assert_eq!(value["name"], "Battle of the Sexes");
        assert_eq!(value["equilibria"].as_array().unwrap().len(), 2);
        assert_eq!(value["game"]["row_labels"][0], "Opera");
    }

    #[test]
    fn test_set_config_validates() {
        let mut session = Session::default();
        assert!(session.set_config(AnalyzerConfig::default().with_step_scale(-1.0)).is_err());
        assert_eq!(session.config(), &AnalyzerConfig::default());
        assert!(session.set_config(AnalyzerConfig::fine_step()).is_ok());
    }

    #[test]
    fn test_repeated_match_lifecycle() {
        let mut session = Session::default();
        assert!(session.repeated_match().is_none());

        let game = session.start_match(
            DilemmaPayoffs::default(),
            Some(ComputerStrategy::AlwaysCooperate),
            Some(0),
        );
        game.play(Move::Defect);
        assert_eq!(session.repeated_match().unwrap().totals(), (5.0, 0.0));

        if let Some(game) = session.repeated_match_mut() {
            game.play(Move::Cooperate);
        }
        let finished = session.end_match().unwrap();
        assert_eq!(finished.rounds(), 2);
        assert!(session.repeated_match().is_none());

        // The analyzed game is unaffected by the match.
        let p = PayoffMatrix::from_array([[3.0, 0.0], [0.0, 3.0]]).unwrap();
        assert_eq!(session.game().payoff_1(), &p);
    }
}
