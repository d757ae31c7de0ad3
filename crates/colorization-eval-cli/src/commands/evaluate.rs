//! Evaluate command.

use std::path::PathBuf;

use anyhow::{Context, Result};
use colorization_eval::{
    EvaluationContext, EvaluationReport, EvaluationResult, Evaluator, SubmissionRequest,
};
use tracing::info;

pub struct Args {
    pub submission: PathBuf,
    pub ground_truth: PathBuf,
    pub round: u32,
    pub submission_id: String,
    pub participant_id: String,
    pub output: Option<PathBuf>,
    pub csv: Option<PathBuf>,
    pub summary: bool,
}

pub fn run(args: Args) -> Result<()> {
    let evaluator = Evaluator::with_round(&args.ground_truth, args.round)
        .context("Invalid evaluator configuration")?;
    let request = SubmissionRequest::new(
        &args.submission,
        args.submission_id.as_str(),
        args.participant_id.as_str(),
    );

    let mut ctx = EvaluationContext::new();
    let result = evaluator
        .evaluate_with_context(&request, Some(&mut ctx))
        .with_context(|| format!("Failed to evaluate {}", args.submission.display()))?;

    if let Some(elapsed) = ctx.elapsed() {
        info!(
            images = ctx.images_scored,
            elapsed_ms = elapsed.num_milliseconds(),
            "evaluation finished"
        );
    }

    let report = EvaluationReport::new(&request, evaluator.round(), result);
    let json = report.to_json_pretty()?;
    let result = &report.result;

    if let Some(output_path) = &args.output {
        std::fs::write(output_path, &json)
            .with_context(|| format!("Failed to write {}", output_path.display()))?;
        eprintln!("Saved result to: {}", output_path.display());
    } else {
        println!("{json}");
    }

    if let Some(csv_path) = &args.csv {
        result
            .write_csv(csv_path)
            .with_context(|| format!("Failed to write {}", csv_path.display()))?;
        eprintln!("Saved per-image scores to: {}", csv_path.display());
    }

    if args.summary {
        print_summary(result);
    }

    Ok(())
}

fn print_summary(result: &EvaluationResult) {
    let Some(summary) = result.summary() else {
        return;
    };

    eprintln!("Per-image MSE ({} images):", summary.count);
    eprintln!("{:-<40}", "");
    eprintln!("  Mean: {:.4}, Median: {:.4}", summary.mean, summary.median);
    eprintln!("  Min: {:.4}, Max: {:.4}", summary.min, summary.max);
    eprintln!("  P90: {:.4}, StdDev: {:.4}", summary.p90, summary.std_dev);
    if let Some(worst) = result.worst_image() {
        eprintln!("  Worst: {} ({:.4})", worst.name, worst.score);
    }
}
