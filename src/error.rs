//! Error types for colorization-eval operations.

use std::path::PathBuf;
use thiserror::Error;

use crate::dataset::ImageSetKind;
use crate::decode::Shape;

/// Result type alias for colorization-eval operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while evaluating a submission.
///
/// Every variant is fatal for the evaluation call that produced it.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// A file without a `.jpg` / `.jpeg` suffix was found in an image tree.
    #[error("{set} dir contains invalid file(s). Unknown file: '{}'", path.display())]
    InvalidFile {
        /// Which tree the file was found in.
        set: ImageSetKind,
        /// Full path of the offending file.
        path: PathBuf,
    },

    /// The submission holds a different number of images than the ground truth.
    #[error("Submission contains {submitted} images, while we expected {expected} images")]
    CountMismatch {
        /// Number of images in the submission.
        submitted: usize,
        /// Number of images in the ground truth.
        expected: usize,
    },

    /// A submission file does not match its positional ground truth counterpart.
    #[error("Invalid submission file {actual}. Expected {expected}")]
    UnexpectedFilename {
        /// Basename found in the submission.
        actual: String,
        /// Basename expected from the ground truth.
        expected: String,
    },

    /// Two files in one tree share a basename, so pairing would be ambiguous.
    #[error("{set} dir contains duplicate file name '{name}': '{}' and '{}'", first.display(), second.display())]
    DuplicateFilename {
        /// Which tree holds the duplicates.
        set: ImageSetKind,
        /// The shared basename.
        name: String,
        /// First path carrying the basename (in sort order).
        first: PathBuf,
        /// Second path carrying the basename.
        second: PathBuf,
    },

    /// An image could not be read or decoded.
    #[error("Error reading image '{}': {reason}", path.display())]
    UnreadableImage {
        /// Path of the image.
        path: PathBuf,
        /// Decoder or I/O failure description.
        reason: String,
    },

    /// A matched pair of images has different shapes.
    #[error("The image size does not match. Expected '{expected}', actual '{actual}'")]
    SizeMismatch {
        /// Shape of the ground truth image.
        expected: Shape,
        /// Shape of the submitted image.
        actual: Shape,
    },

    /// The ground truth tree holds no images, so no mean can be formed.
    #[error("Ground truth dir contains no images: '{}'", path.display())]
    EmptyGroundTruth {
        /// Root of the ground truth tree.
        path: PathBuf,
    },

    /// Rounds are numbered from 1.
    #[error("Invalid round: {0} (rounds start at 1)")]
    InvalidRound(u32),

    /// Missing required configuration value.
    #[error("Missing configuration: {0}")]
    MissingConfig(&'static str),

    /// A directory could not be listed while scanning an image tree.
    #[error("Failed to scan '{}': {source}", path.display())]
    Scan {
        /// Directory that failed to list.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// CSV error.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// Coarse classification of an [`Error`], for callers that present
/// failures differently depending on who has to fix them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// The submission (or ground truth) is packaged wrong: stray files,
    /// wrong count, renamed or duplicated files.
    Packaging,
    /// Image content is unusable: undecodable or wrongly sized.
    Content,
    /// The filesystem or an output sink failed.
    Io,
    /// The evaluator was configured incorrectly.
    Config,
}

impl Error {
    /// Classify this error.
    #[must_use]
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::InvalidFile { .. }
            | Self::CountMismatch { .. }
            | Self::UnexpectedFilename { .. }
            | Self::DuplicateFilename { .. }
            | Self::EmptyGroundTruth { .. } => ErrorCategory::Packaging,
            Self::UnreadableImage { .. } | Self::SizeMismatch { .. } => ErrorCategory::Content,
            Self::InvalidRound(_) | Self::MissingConfig(_) => ErrorCategory::Config,
            Self::Scan { .. } | Self::Json(_) | Self::Csv(_) => ErrorCategory::Io,
        }
    }
}
