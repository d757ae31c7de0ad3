//! # colorization-eval
//!
//! Scores image colorization submissions against a ground truth set.
//!
//! A submission is a directory of JPEG images mirroring the ground truth
//! directory: same count, same file names. Each submitted image is compared
//! with its ground truth counterpart by mean squared error over all RGB
//! samples, and the submission score is the mean over all images.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use colorization_eval::{Evaluator, SubmissionRequest};
//!
//! let evaluator = Evaluator::with_round("data/ground_truth_images", 1)?;
//! let request = SubmissionRequest::new("data/output_images", "1123", "1234");
//!
//! let result = evaluator.evaluate(&request)?;
//! assert_eq!(result.score, result.score_secondary);
//! ```
//!
//! ## Modules
//!
//! - [`error`]: Error types and their categories
//! - [`dataset`]: Image tree scanning and positional pairing
//! - [`decode`]: JPEG decoding to RGB8
//! - [`metrics`]: Mean squared error scoring
//! - [`eval`]: The evaluator and its result record
//! - [`stats`]: Distribution of per-image scores

pub mod dataset;
pub mod decode;
pub mod error;
pub mod eval;
pub mod metrics;
pub mod stats;

// Re-export commonly used types
pub use dataset::{ImagePair, ImageSet, ImageSetKind};
pub use decode::{DecodedImage, Shape};
pub use error::{Error, ErrorCategory, Result};
pub use eval::{
    EvaluationContext, EvaluationReport, EvaluationResult, Evaluator, EvaluatorConfig, ImageScore,
    SubmissionRequest,
};
pub use metrics::{compute_score, mean_squared_error};
pub use stats::Summary;
