//! Replicator dynamics sweep binary.
//!
//! Simulates one evolutionary game at several selection strengths in
//! parallel and compares each final population with the predicted rest
//! point.

use std::fs::File;
use std::io::Write;
use std::path::PathBuf;
use std::time::Instant;

use anyhow::{bail, Context, Result};
use clap::{Parser, ValueEnum};
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use serde::Serialize;

use bimatrix_solver::analysis::{
    check_convergence, direction_field, evolutionary_outcome, simulate_replicator_detailed,
    AnalyzerConfig, EvolutionaryOutcome, ReplicatorTrajectory,
};
use bimatrix_solver::games::evolutionary::EvolutionaryGame;

#[derive(Clone, Copy, ValueEnum)]
enum GameKind {
    HawkDove,
    Dilemma,
    Custom,
}

#[derive(Parser)]
#[command(author, version, about = "Run replicator dynamics over a sweep of selection strengths", long_about = None)]
struct Args {
    /// Evolutionary game to simulate.
    #[arg(long, value_enum, default_value = "hawk-dove")]
    game: GameKind,

    /// Hawk-Dove resource value V.
    #[arg(long, default_value_t = 10.0)]
    v: f64,

    /// Hawk-Dove fighting cost C.
    #[arg(long, default_value_t = 15.0)]
    c: f64,

    /// Dilemma payoffs T,R,P,S.
    #[arg(long, value_delimiter = ',', default_values_t = [5.0, 3.0, 1.0, 0.0])]
    trps: Vec<f64>,

    /// Custom payoffs A-vs-A,A-vs-B,B-vs-A,B-vs-B.
    #[arg(long, value_delimiter = ',', default_values_t = [1.0, 0.0, 2.0, 1.0])]
    payoffs: Vec<f64>,

    /// Initial frequency of strategy A.
    #[arg(long, default_value_t = 0.5)]
    initial: f64,

    /// Number of generations per run.
    #[arg(long, default_value_t = 100)]
    generations: usize,

    /// Selection strengths to simulate, comma separated.
    #[arg(long, value_delimiter = ',', default_values_t = [0.1, 0.5, 1.0, 1.5, 2.0])]
    strengths: Vec<f64>,

    /// JSON analyzer config; missing fields take defaults.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Write every trajectory to this JSON file.
    #[arg(long)]
    output: Option<PathBuf>,
}

#[derive(Serialize)]
struct Run {
    selection_strength: f64,
    final_frequency: f64,
    converged: Option<bool>,
    trajectory: ReplicatorTrajectory,
}

#[derive(Serialize)]
struct Sweep {
    game: String,
    labels: [&'static str; 2],
    initial_frequency: f64,
    generations: usize,
    outcome: EvolutionaryOutcome,
    zero_crossings: Vec<f64>,
    runs: Vec<Run>,
}

fn build_game(args: &Args) -> Result<EvolutionaryGame> {
    let game = match args.game {
        GameKind::HawkDove => EvolutionaryGame::HawkDove {
            value: args.v,
            cost: args.c,
        },
        GameKind::Dilemma => match args.trps[..] {
            [temptation, reward, punishment, sucker] => EvolutionaryGame::PrisonersDilemma {
                temptation,
                reward,
                punishment,
                sucker,
            },
            _ => bail!("--trps needs exactly four values"),
        },
        GameKind::Custom => match args.payoffs[..] {
            [aa, ab, ba, bb] => EvolutionaryGame::Custom {
                payoffs: [[aa, ab], [ba, bb]],
            },
            _ => bail!("--payoffs needs exactly four values"),
        },
    };
    Ok(game)
}

fn describe(outcome: &EvolutionaryOutcome, labels: [&str; 2]) -> String {
    match outcome {
        EvolutionaryOutcome::Mixed { frequency, stable } => format!(
            "{} rest point at {:.1}% {}",
            if *stable { "stable" } else { "unstable" },
            frequency * 100.0,
            labels[0]
        ),
        EvolutionaryOutcome::FavorsA => format!("{} takes over", labels[0]),
        EvolutionaryOutcome::FavorsB => format!("{} takes over", labels[1]),
        EvolutionaryOutcome::Neutral => "neutral (fitness difference is constant)".to_string(),
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => AnalyzerConfig::from_json_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => AnalyzerConfig::default(),
    };

    let game = build_game(&args)?;
    let labels = game.labels();
    let payoff = game.payoff_matrix()?;

    println!("=== Replicator Dynamics: {} ===", game);
    println!("{}", payoff);
    println!(
        "Initial {}: {:.1}% | Generations: {} | Runs: {}",
        labels[0],
        args.initial * 100.0,
        args.generations,
        args.strengths.len()
    );

    let outcome = evolutionary_outcome(&payoff, &config)?;
    println!("Prediction: {}", describe(&outcome, labels));
    println!();

    let total_start = Instant::now();
    let progress = ProgressBar::new(args.strengths.len() as u64);
    progress.set_style(
        ProgressStyle::with_template("{bar:40} {pos}/{len} runs [{elapsed_precise}]")
            .unwrap_or_else(|_| ProgressStyle::default_bar()),
    );

    let runs: Vec<Run> = args
        .strengths
        .par_iter()
        .map(|&strength| -> Result<Run> {
            let trajectory = simulate_replicator_detailed(
                &payoff,
                args.initial,
                args.generations,
                strength,
                &config,
            )?;
            let final_frequency = trajectory.final_frequency();
            progress.inc(1);
            Ok(Run {
                selection_strength: strength,
                final_frequency,
                converged: check_convergence(outcome, final_frequency, &config),
                trajectory,
            })
        })
        .collect::<Result<Vec<_>>>()?;
    progress.finish_and_clear();

    println!("{:>10} {:>12} {:>10}", "strength", "final A", "converged");
    for run in &runs {
        let converged = match run.converged {
            Some(true) => "yes",
            Some(false) => "no",
            None => "-",
        };
        println!(
            "{:>10.2} {:>11.2}% {:>10}",
            run.selection_strength,
            run.final_frequency * 100.0,
            converged
        );
    }

    let field = direction_field(&payoff, 1.0, &config)?;
    if field.zero_crossings.is_empty() {
        println!("\nDirection field: no interior sign change");
    } else {
        let crossings: Vec<String> = field
            .zero_crossings
            .iter()
            .map(|p| format!("{:.2}", p))
            .collect();
        println!("\nDirection field changes sign near p = {}", crossings.join(", "));
    }
    println!("Total time: {:.2}s", total_start.elapsed().as_secs_f64());

    if let Some(path) = &args.output {
        let sweep = Sweep {
            game: game.to_string(),
            labels,
            initial_frequency: args.initial,
            generations: args.generations,
            outcome,
            zero_crossings: field.zero_crossings,
            runs,
        };
        let json = serde_json::to_string_pretty(&sweep)?;
        let mut file =
            File::create(path).with_context(|| format!("creating {}", path.display()))?;
        file.write_all(json.as_bytes())?;
        log::info!("saved {} runs to {}", sweep.runs.len(), path.display());
    }

    Ok(())
}
