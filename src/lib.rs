//! # Bimatrix Solver
//!
//! Analysis of two-player games in strategic form: pure and mixed Nash
//! equilibria, dominance, replicator dynamics and a repeated Prisoner's
//! Dilemma.
//!
//! ## Features
//!
//! - **Pure equilibria and best responses** for any R×C game
//! - **Weak dominance** for either player
//! - **Closed-form mixed equilibrium** for 2×2 games, with degenerate and
//!   out-of-range cases reported as results
//! - **Replicator dynamics** with rest-point prediction and direction fields
//! - **Presets and game files**: classic games built in, others read from JSON
//!
//! ## Quick Start
//!
//! ```
//! use bimatrix_solver::{Preset, Session};
//!
//! let session = Session::from_preset(Preset::BattleOfTheSexes, Default::default());
//! let report = session.analyze().unwrap();
//! assert_eq!(report.equilibria.len(), 2);
//! println!("{}", report);
//! ```
//!
//! ## Modules
//!
//! - [`analysis`]: the analysis engine and analyzer session
//! - [`games`]: presets, JSON game files, evolutionary games, repeated dilemma
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                         Session                                 │
//! │  - current game + labels  - analyzer config  - repeated match   │
//! └─────────────────────────────────────────────────────────────────┘
//!                               │
//!                               │ analyze()
//!                               ▼
//!         ┌──────────────┬──────┴───────┬──────────────┐
//!         ▼              ▼              ▼              ▼
//!    ┌─────────┐   ┌───────────┐  ┌───────────┐  ┌──────────┐
//!    │  Pure   │   │ Dominance │  │  Mixed    │  │ Classify │
//!    │  Nash   │   │           │  │  (2x2)    │  │          │
//!    └─────────┘   └───────────┘  └───────────┘  └──────────┘
//! ```

#![warn(missing_docs)]

/// Bimatrix analysis module.
///
/// Equilibria, dominance, mixed strategies, replicator dynamics and the
/// analyzer session.
pub mod analysis;

/// Game catalogue module.
///
/// Contains preset games, JSON game files and the repeated dilemma.
pub mod games;

// Re-export commonly used types at crate root for convenience
pub use analysis::{AnalysisError, AnalysisReport, AnalyzerConfig, Bimatrix, PayoffMatrix, Player, Session};
pub use games::{GameSpec, Preset};
