//! Single-pair compare command.

use std::path::Path;

use anyhow::{Context, Result};

pub fn run(submission: &Path, ground_truth: &Path) -> Result<()> {
    let score = colorization_eval::compute_score(submission, ground_truth).with_context(|| {
        format!(
            "Failed to compare {} against {}",
            submission.display(),
            ground_truth.display()
        )
    })?;

    println!("{score}");
    Ok(())
}
