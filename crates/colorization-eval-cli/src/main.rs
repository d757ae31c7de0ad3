//! colorization-eval CLI - scores colorization submissions

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

/// Image colorization submission scorer.
#[derive(Parser)]
#[command(name = "colorization-eval")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Verbose output (debug logging)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Score a submission directory against the ground truth
    Evaluate {
        /// Directory holding the submitted images
        submission: PathBuf,

        /// Ground truth image directory
        #[arg(short, long, env = "COLORIZATION_GROUND_TRUTH_DIR")]
        ground_truth: PathBuf,

        /// Challenge round
        #[arg(long, env = "COLORIZATION_ROUND", default_value_t = 1)]
        round: u32,

        /// Submission identifier, echoed in the output
        #[arg(long, default_value = "local")]
        submission_id: String,

        /// Participant identifier, echoed in the output
        #[arg(long, default_value = "local")]
        participant_id: String,

        /// Output file (JSON); stdout if omitted
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Also write per-image scores to this CSV file
        #[arg(long)]
        csv: Option<PathBuf>,

        /// Print the distribution of per-image scores
        #[arg(long)]
        summary: bool,
    },

    /// Score a single image against its ground truth
    Compare {
        /// Submitted image
        submission: PathBuf,

        /// Ground truth image
        ground_truth: PathBuf,
    },

    /// Check a submission directory's packaging without scoring it
    Check {
        /// Directory to check
        path: PathBuf,

        /// Also pair against this ground truth directory
        #[arg(short, long, env = "COLORIZATION_GROUND_TRUTH_DIR")]
        ground_truth: Option<PathBuf>,
    },
}

fn init_tracing(verbose: bool, json: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.log_json);

    match cli.command {
        Commands::Evaluate {
            submission,
            ground_truth,
            round,
            submission_id,
            participant_id,
            output,
            csv,
            summary,
        } => commands::evaluate::run(commands::evaluate::Args {
            submission,
            ground_truth,
            round,
            submission_id,
            participant_id,
            output,
            csv,
            summary,
        }),
        Commands::Compare { submission, ground_truth } => {
            commands::compare::run(&submission, &ground_truth)
        }
        Commands::Check { path, ground_truth } => {
            commands::check::run(&path, ground_truth.as_deref(), cli.verbose)
        }
    }
}
