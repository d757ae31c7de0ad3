//! Packaging check command.

use std::path::Path;

use anyhow::{Context, Result};
use colorization_eval::dataset::pair_sets;
use colorization_eval::{ImageSet, ImageSetKind};

pub fn run(path: &Path, ground_truth: Option<&Path>, verbose: bool) -> Result<()> {
    let submission = ImageSet::scan(path, ImageSetKind::Submission)
        .with_context(|| format!("Failed to scan {}", path.display()))?;
    submission.check_unique_names()?;

    if verbose {
        for image in submission.iter() {
            println!("{}", image.display());
        }
    }
    println!("{}: {} images", submission.root.display(), submission.len());

    if let Some(gt_path) = ground_truth {
        let gt = ImageSet::scan(gt_path, ImageSetKind::GroundTruth)
            .with_context(|| format!("Failed to scan {}", gt_path.display()))?;
        let pairs = pair_sets(&submission, &gt)?;
        println!("All {} images match the ground truth file names", pairs.len());
    }

    Ok(())
}
