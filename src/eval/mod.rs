//! Submission evaluation.
//!
//! - [`evaluator::Evaluator`]: scores a submission directory against ground truth
//! - [`evaluator::EvaluatorConfig`]: ground truth location and round
//! - [`report`]: result types returned to the caller

pub mod evaluator;
pub mod report;

pub use evaluator::{
    EvaluationContext, Evaluator, EvaluatorConfig, EvaluatorConfigBuilder, SubmissionRequest,
};
pub use report::{EvaluationReport, EvaluationResult, ImageScore};
