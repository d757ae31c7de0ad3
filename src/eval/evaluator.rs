//! The submission evaluator.
//!
//! [`Evaluator`] holds the ground truth location for one challenge round and
//! scores [`SubmissionRequest`]s against it. Every call rescans both trees
//! and decodes every image; nothing is cached between calls.

use std::num::NonZeroU32;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::dataset::{pair_sets, ImageSet, ImageSetKind};
use crate::error::{Error, Result};
use crate::eval::report::{EvaluationResult, ImageScore};
use crate::metrics;

/// Configuration for an [`Evaluator`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvaluatorConfig {
    /// Root of the ground truth image tree.
    pub ground_truth_dir: PathBuf,

    /// Challenge round this ground truth belongs to.
    pub round: NonZeroU32,
}

impl EvaluatorConfig {
    /// Create a new configuration builder.
    #[must_use]
    pub fn builder() -> EvaluatorConfigBuilder {
        EvaluatorConfigBuilder::default()
    }
}

/// Builder for [`EvaluatorConfig`].
#[derive(Debug, Default)]
pub struct EvaluatorConfigBuilder {
    ground_truth_dir: Option<PathBuf>,
    round: Option<u32>,
}

impl EvaluatorConfigBuilder {
    /// Set the ground truth directory.
    #[must_use]
    pub fn ground_truth_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.ground_truth_dir = Some(path.into());
        self
    }

    /// Set the round. Defaults to 1.
    #[must_use]
    pub fn round(mut self, round: u32) -> Self {
        self.round = Some(round);
        self
    }

    /// Build the configuration.
    pub fn build(self) -> Result<EvaluatorConfig> {
        let ground_truth_dir = self
            .ground_truth_dir
            .ok_or(Error::MissingConfig("ground_truth_dir"))?;
        let round = self.round.unwrap_or(1);
        let round = NonZeroU32::new(round).ok_or(Error::InvalidRound(round))?;
        Ok(EvaluatorConfig {
            ground_truth_dir,
            round,
        })
    }
}

/// A submission to score.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionRequest {
    /// Directory holding the participant's output images.
    pub submission_dir_path: PathBuf,

    /// Opaque submission identifier. Not used for scoring.
    pub submission_id: String,

    /// Opaque participant identifier. Not used for scoring.
    pub participant_id: String,
}

impl SubmissionRequest {
    /// Create a request.
    #[must_use]
    pub fn new(
        submission_dir_path: impl Into<PathBuf>,
        submission_id: impl Into<String>,
        participant_id: impl Into<String>,
    ) -> Self {
        Self {
            submission_dir_path: submission_dir_path.into(),
            submission_id: submission_id.into(),
            participant_id: participant_id.into(),
        }
    }
}

/// Caller-owned record of a single evaluation call.
///
/// Passed to [`Evaluator::evaluate_with_context`]. It is reset at the start
/// of every call, so reusing one value across calls carries nothing over.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EvaluationContext {
    /// When the call started.
    pub started_at: Option<DateTime<Utc>>,

    /// When the call finished. Stays `None` if the call failed.
    pub finished_at: Option<DateTime<Utc>>,

    /// Number of image pairs scored so far.
    pub images_scored: usize,
}

impl EvaluationContext {
    /// Create an empty context.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Wall time of the last completed call.
    #[must_use]
    pub fn elapsed(&self) -> Option<chrono::Duration> {
        Some(self.finished_at? - self.started_at?)
    }

    fn reset(&mut self) {
        *self = Self {
            started_at: Some(Utc::now()),
            ..Self::default()
        };
    }
}

/// Scores submissions against a fixed ground truth set.
///
/// # Example
///
/// ```rust,ignore
/// use colorization_eval::{Evaluator, SubmissionRequest};
///
/// let evaluator = Evaluator::new("data/ground_truth_images");
/// let request = SubmissionRequest::new("data/output_images", "1123", "1234");
/// let result = evaluator.evaluate(&request)?;
/// println!("MSE: {}", result.score);
/// ```
#[derive(Debug, Clone)]
pub struct Evaluator {
    config: EvaluatorConfig,
}

impl Evaluator {
    /// Create an evaluator for round 1. Performs no I/O.
    #[must_use]
    pub fn new(ground_truth_dir: impl Into<PathBuf>) -> Self {
        Self {
            config: EvaluatorConfig {
                ground_truth_dir: ground_truth_dir.into(),
                round: NonZeroU32::MIN,
            },
        }
    }

    /// Create an evaluator for a specific round. Rounds start at 1.
    pub fn with_round(ground_truth_dir: impl Into<PathBuf>, round: u32) -> Result<Self> {
        let config = EvaluatorConfig::builder()
            .ground_truth_dir(ground_truth_dir)
            .round(round)
            .build()?;
        Ok(Self::from_config(config))
    }

    /// Create an evaluator from a built configuration.
    #[must_use]
    pub fn from_config(config: EvaluatorConfig) -> Self {
        Self { config }
    }

    /// The configuration this evaluator was built with.
    #[must_use]
    pub fn config(&self) -> &EvaluatorConfig {
        &self.config
    }

    /// Root of the ground truth image tree.
    #[must_use]
    pub fn ground_truth_dir(&self) -> &Path {
        &self.config.ground_truth_dir
    }

    /// Challenge round.
    #[must_use]
    pub fn round(&self) -> u32 {
        self.config.round.get()
    }

    /// Evaluate a submission.
    pub fn evaluate(&self, request: &SubmissionRequest) -> Result<EvaluationResult> {
        self.evaluate_with_context(request, None)
    }

    /// Evaluate a submission, recording progress in `context` if given.
    ///
    /// Any failure aborts the whole evaluation; no partial result is returned.
    pub fn evaluate_with_context(
        &self,
        request: &SubmissionRequest,
        mut context: Option<&mut EvaluationContext>,
    ) -> Result<EvaluationResult> {
        if let Some(ctx) = context.as_deref_mut() {
            ctx.reset();
        }

        let ground_truth = ImageSet::scan(&self.config.ground_truth_dir, ImageSetKind::GroundTruth)?;
        let submission = ImageSet::scan(&request.submission_dir_path, ImageSetKind::Submission)?;

        let pairs = pair_sets(&submission, &ground_truth)?;
        if pairs.is_empty() {
            return Err(Error::EmptyGroundTruth {
                path: ground_truth.root.clone(),
            });
        }

        let mut per_image = Vec::with_capacity(pairs.len());
        for pair in &pairs {
            let score = self.compute_score(pair.submission, pair.ground_truth)?;
            debug!(image = %pair.name, score, "scored image");
            per_image.push(ImageScore {
                name: pair.name.clone(),
                score,
            });
            if let Some(ctx) = context.as_deref_mut() {
                ctx.images_scored += 1;
            }
        }

        let result = EvaluationResult::from_image_scores(per_image);

        if let Some(ctx) = context {
            ctx.finished_at = Some(Utc::now());
        }

        info!(
            submission_id = %request.submission_id,
            participant_id = %request.participant_id,
            round = self.round(),
            images = result.image_count(),
            score = result.score,
            "evaluated submission"
        );

        Ok(result)
    }

    /// Score one submitted image against one ground truth image.
    pub fn compute_score(&self, submission_path: &Path, ground_truth_path: &Path) -> Result<f64> {
        metrics::compute_score(submission_path, ground_truth_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_builder_defaults_round() {
        let config = EvaluatorConfig::builder()
            .ground_truth_dir("/data/gt")
            .build()
            .unwrap();
        assert_eq!(config.ground_truth_dir, PathBuf::from("/data/gt"));
        assert_eq!(config.round.get(), 1);
    }

    #[test]
    fn test_config_builder_rejects_round_zero() {
        let err = EvaluatorConfig::builder()
            .ground_truth_dir("/data/gt")
            .round(0)
            .build()
            .unwrap_err();
        assert!(matches!(err, Error::InvalidRound(0)));
    }

    #[test]
    fn test_config_builder_requires_dir() {
        let err = EvaluatorConfig::builder().round(2).build().unwrap_err();
        assert!(matches!(err, Error::MissingConfig("ground_truth_dir")));
    }

    #[test]
    fn test_new_does_no_io() {
        let evaluator = Evaluator::new("/definitely/not/here");
        assert_eq!(evaluator.round(), 1);
        assert_eq!(evaluator.ground_truth_dir(), Path::new("/definitely/not/here"));
    }

    #[test]
    fn test_with_round() {
        let evaluator = Evaluator::with_round("/data/gt", 3).unwrap();
        assert_eq!(evaluator.round(), 3);
    }

    #[test]
    fn test_failed_call_leaves_context_unfinished() {
        let dir = tempfile::TempDir::new().unwrap();
        let evaluator = Evaluator::new(dir.path().join("missing"));
        let request = SubmissionRequest::new(dir.path(), "1", "2");

        let mut ctx = EvaluationContext::new();
        ctx.images_scored = 99;
        let err = evaluator
            .evaluate_with_context(&request, Some(&mut ctx))
            .unwrap_err();

        assert!(matches!(err, Error::Scan { .. }));
        assert!(ctx.started_at.is_some());
        assert!(ctx.finished_at.is_none());
        assert_eq!(ctx.images_scored, 0);
        assert!(ctx.elapsed().is_none());
    }

    #[test]
    fn test_empty_trees() {
        let gt = tempfile::TempDir::new().unwrap();
        let sub = tempfile::TempDir::new().unwrap();
        let evaluator = Evaluator::new(gt.path());
        let err = evaluator
            .evaluate(&SubmissionRequest::new(sub.path(), "1", "2"))
            .unwrap_err();
        assert!(matches!(err, Error::EmptyGroundTruth { .. }));
    }
}
