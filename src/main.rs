//! Reckon CLI - solve numbers-game puzzles by genetic programming.

// Allow print in the CLI binary
#![allow(clippy::print_stdout, clippy::print_stderr)]

mod cli;

use clap::{Parser, Subcommand};
use std::process::ExitCode;

/// Reckon - find an arithmetic expression that hits a target number
#[derive(Parser, Debug)]
#[command(name = "reckon")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Log engine progress (sets the default log filter to debug)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
enum Commands {
    /// Evolve one solution and print the best expression
    Solve {
        #[command(flatten)]
        solver: cli::SolverArgs,

        /// Output format: text or json
        #[arg(short, long, default_value = "text")]
        format: cli::OutputFormat,

        /// Write per-generation fitness statistics to a CSV file
        #[arg(long)]
        history: Option<std::path::PathBuf>,

        /// Show progress bar
        #[arg(short, long)]
        progress: bool,
    },

    /// Run many independently seeded solves in parallel and aggregate them
    Batch {
        #[command(flatten)]
        solver: cli::SolverArgs,

        /// Number of runs (seeds increment from --seed)
        #[arg(short, long, default_value = "10")]
        runs: u64,

        /// Parallel threads (default: CPU count)
        #[arg(short = 'j', long)]
        threads: Option<usize>,

        /// Output format: text or json
        #[arg(short, long, default_value = "text")]
        format: cli::OutputFormat,

        /// Show progress bar
        #[arg(short, long)]
        progress: bool,
    },
}

fn main() -> ExitCode {
    let args = Args::parse();

    let default_filter = if args.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    let result = match args.command {
        Commands::Solve {
            solver,
            format,
            history,
            progress,
        } => cli::solve::execute(solver, format, history, progress),

        Commands::Batch {
            solver,
            runs,
            threads,
            format,
            progress,
        } => cli::batch::execute(solver, runs, threads, format, progress),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
