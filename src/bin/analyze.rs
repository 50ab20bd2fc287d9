//! Bimatrix game analyzer binary.
//!
//! Analyzes a preset or a game read from a JSON file and prints the full
//! report, either as text or as JSON.

use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;

use bimatrix_solver::analysis::{AnalyzerConfig, Session};
use bimatrix_solver::games::{GameSpec, Preset};

#[derive(Parser)]
#[command(author, version, about = "Find equilibria, dominance and mixed strategies of a two-player game", long_about = None)]
struct Args {
    /// Preset game to analyze (e.g. prisoners-dilemma, chicken).
    #[arg(long, conflicts_with = "game")]
    preset: Option<String>,

    /// JSON game file with payoff_1 and payoff_2.
    #[arg(long)]
    game: Option<PathBuf>,

    /// JSON analyzer config; missing fields take defaults.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Print the report as JSON.
    #[arg(long)]
    json: bool,

    /// Also write the JSON report to this file.
    #[arg(long)]
    output: Option<PathBuf>,

    /// List the available presets and exit.
    #[arg(long)]
    list: bool,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    if args.list {
        for preset in Preset::ALL {
            println!("{:<22} {}", preset.slug(), preset.name());
        }
        return Ok(());
    }

    let config = match &args.config {
        Some(path) => AnalyzerConfig::from_json_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => AnalyzerConfig::default(),
    };

    let session = match (&args.preset, &args.game) {
        (_, Some(path)) => {
            let spec = GameSpec::from_json_file(path)
                .with_context(|| format!("loading game {}", path.display()))?;
            Session::from_spec(spec, config)?
        }
        (Some(name), None) => Session::from_preset(name.parse::<Preset>()?, config),
        (None, None) => Session::from_preset(Preset::PrisonersDilemma, config),
    };

    let start = Instant::now();
    let report = session.analyze()?;
    log::debug!("analysis took {:.3}ms", start.elapsed().as_secs_f64() * 1e3);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", report);
    }

    if let Some(path) = &args.output {
        report
            .save_json(path)
            .with_context(|| format!("writing report {}", path.display()))?;
        log::info!("saved report to {}", path.display());
    }

    Ok(())
}
