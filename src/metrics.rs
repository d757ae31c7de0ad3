//! Pixel error metrics.
//!
//! The challenge score is the mean squared error over every sample of a
//! decoded image pair. Lower is better; 0 means pixel-identical.

use std::path::Path;

use crate::decode::{load_image, DecodedImage};
use crate::error::{Error, Result};

/// Mean squared error between two decoded images.
///
/// Differences are taken in floating point, never in wrapping 8-bit
/// arithmetic. The result is symmetric in its arguments.
pub fn mean_squared_error(test: &DecodedImage, reference: &DecodedImage) -> Result<f64> {
    let expected = reference.shape();
    let actual = test.shape();
    if expected != actual {
        return Err(Error::SizeMismatch { expected, actual });
    }

    let sample_count = expected.sample_count();
    if sample_count == 0 {
        return Ok(0.0);
    }

    let sum: f64 = test
        .samples()
        .zip(reference.samples())
        .map(|(t, r)| {
            let diff = f64::from(t) - f64::from(r);
            diff * diff
        })
        .sum();

    Ok(sum / sample_count as f64)
}

/// Score one submitted image against its ground truth image.
///
/// Both files are decoded from disk. The ground truth image defines the
/// expected shape.
pub fn compute_score(submission_path: &Path, ground_truth_path: &Path) -> Result<f64> {
    let submission = load_image(submission_path)?;
    let ground_truth = load_image(ground_truth_path)?;
    mean_squared_error(&submission, &ground_truth)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decode::Shape;

    fn flat(width: usize, height: usize, value: u8) -> DecodedImage {
        DecodedImage::from_rgb_bytes(&vec![value; width * height * 3], width, height).unwrap()
    }

    #[test]
    fn test_mse_identical() {
        let img = flat(10, 10, 128);
        assert_eq!(mean_squared_error(&img, &img).unwrap(), 0.0);
    }

    #[test]
    fn test_mse_constant_offset() {
        let a = flat(10, 10, 12);
        let b = flat(10, 10, 10);
        assert_eq!(mean_squared_error(&a, &b).unwrap(), 4.0);
    }

    #[test]
    fn test_mse_does_not_wrap() {
        // 0 - 255 would wrap to 1 in u8 arithmetic
        let a = flat(2, 2, 0);
        let b = flat(2, 2, 255);
        assert_eq!(mean_squared_error(&a, &b).unwrap(), 65025.0);
    }

    #[test]
    fn test_mse_symmetric() {
        let a_bytes: Vec<u8> = (0..4 * 3 * 3).map(|i| (i * 7 % 256) as u8).collect();
        let b_bytes: Vec<u8> = (0..4 * 3 * 3).map(|i| (i * 13 % 256) as u8).collect();
        let a = DecodedImage::from_rgb_bytes(&a_bytes, 4, 3).unwrap();
        let b = DecodedImage::from_rgb_bytes(&b_bytes, 4, 3).unwrap();
        assert_eq!(
            mean_squared_error(&a, &b).unwrap(),
            mean_squared_error(&b, &a).unwrap()
        );
    }

    #[test]
    fn test_mse_single_channel_difference() {
        let a = DecodedImage::from_rgb_bytes(&[10, 10, 10, 10, 10, 10], 2, 1).unwrap();
        let b = DecodedImage::from_rgb_bytes(&[10, 16, 10, 10, 10, 10], 2, 1).unwrap();
        // One sample off by 6, averaged over 6 samples
        assert_eq!(mean_squared_error(&a, &b).unwrap(), 6.0);
    }

    #[test]
    fn test_mse_size_mismatch() {
        let sub = flat(8, 8, 0);
        let gt = flat(16, 8, 0);
        match mean_squared_error(&sub, &gt).unwrap_err() {
            Error::SizeMismatch { expected, actual } => {
                assert_eq!(expected, Shape { height: 8, width: 16, channels: 3 });
                assert_eq!(actual, Shape { height: 8, width: 8, channels: 3 });
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
