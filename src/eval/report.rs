//! Result types for a submission evaluation.
//!
//! These serialize to JSON (the result record handed back to the caller)
//! or CSV (one row per image).

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::eval::evaluator::SubmissionRequest;
use crate::stats::{mean, Summary};

/// Score of one submitted image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageScore {
    /// Basename shared by the submitted and ground truth files.
    pub name: String,

    /// Mean squared error against the ground truth image.
    pub score: f64,
}

/// Outcome of evaluating one submission.
///
/// `score` and `score_secondary` are the same number; both are kept for
/// consumers that expect a two-metric record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationResult {
    /// Mean of all per-image scores. Lower is better.
    pub score: f64,

    /// Secondary metric, identical to `score`.
    pub score_secondary: f64,

    /// Per-image scores in sorted-pair order.
    #[serde(default)]
    pub per_image: Vec<ImageScore>,
}

impl EvaluationResult {
    /// Aggregate per-image scores into a result.
    #[must_use]
    pub fn from_image_scores(per_image: Vec<ImageScore>) -> Self {
        let scores: Vec<f64> = per_image.iter().map(|s| s.score).collect();
        let score = mean(&scores);
        Self {
            score,
            score_secondary: score,
            per_image,
        }
    }

    /// Number of scored images.
    #[must_use]
    pub fn image_count(&self) -> usize {
        self.per_image.len()
    }

    /// Distribution of the per-image scores.
    #[must_use]
    pub fn summary(&self) -> Option<Summary> {
        let scores: Vec<f64> = self.per_image.iter().map(|s| s.score).collect();
        Summary::compute(&scores)
    }

    /// Image with the highest error, if any.
    #[must_use]
    pub fn worst_image(&self) -> Option<&ImageScore> {
        self.per_image.iter().max_by(|a, b| a.score.total_cmp(&b.score))
    }

    /// Write per-image scores as CSV with an `image,score` header.
    pub fn write_csv(&self, path: &Path) -> Result<()> {
        let mut wtr = csv::Writer::from_path(path)?;
        wtr.write_record(["image", "score"])?;
        for image in &self.per_image {
            wtr.write_record([&image.name, &format!("{:.6}", image.score)])?;
        }
        wtr.flush().map_err(csv::Error::from)?;
        Ok(())
    }
}

/// An [`EvaluationResult`] correlated back to the request that produced it.
///
/// Serializes flat: the request ids and round sit beside `score`,
/// `score_secondary` and `per_image`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationReport {
    /// Submission identifier, passed through unchanged.
    pub submission_id: String,

    /// Participant identifier, passed through unchanged.
    pub participant_id: String,

    /// Round the ground truth belongs to.
    pub round: u32,

    /// The scores.
    #[serde(flatten)]
    pub result: EvaluationResult,
}

impl EvaluationReport {
    /// Attach request ids and round to a result.
    #[must_use]
    pub fn new(request: &SubmissionRequest, round: u32, result: EvaluationResult) -> Self {
        Self {
            submission_id: request.submission_id.clone(),
            participant_id: request.participant_id.clone(),
            round,
            result,
        }
    }

    /// Serialize to pretty-printed JSON.
    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
