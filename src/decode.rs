//! JPEG decoding into a uniform RGB8 pixel buffer.
//!
//! Ground truth and submission images are both decoded to three-channel RGB,
//! so grayscale and CMYK JPEGs compare against RGB ones on equal footing.

use std::fmt;
use std::io::Cursor;
use std::path::Path;

use imgref::ImgVec;
use rgb::RGB8;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Dimensions of a decoded image, in (height, width, channels) order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Shape {
    /// Rows.
    pub height: usize,
    /// Columns.
    pub width: usize,
    /// Samples per pixel.
    pub channels: usize,
}

impl Shape {
    /// Total number of samples (`height * width * channels`).
    #[must_use]
    pub fn sample_count(&self) -> usize {
        self.height * self.width * self.channels
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.height, self.width, self.channels)
    }
}

/// A decoded image.
#[derive(Debug, Clone)]
pub struct DecodedImage {
    pixels: ImgVec<RGB8>,
}

impl DecodedImage {
    /// Wrap an RGB8 buffer.
    #[must_use]
    pub fn new(pixels: ImgVec<RGB8>) -> Self {
        Self { pixels }
    }

    /// Build from interleaved RGB bytes.
    ///
    /// Returns `None` if `data` is not exactly `width * height * 3` bytes.
    #[must_use]
    pub fn from_rgb_bytes(data: &[u8], width: usize, height: usize) -> Option<Self> {
        if data.len() != width * height * 3 {
            return None;
        }
        let pixels: Vec<RGB8> = data
            .chunks_exact(3)
            .map(|c| RGB8::new(c[0], c[1], c[2]))
            .collect();
        Some(Self::new(ImgVec::new(pixels, width, height)))
    }

    /// Shape of this image. Channels are always 3.
    #[must_use]
    pub fn shape(&self) -> Shape {
        Shape {
            height: self.pixels.height(),
            width: self.pixels.width(),
            channels: 3,
        }
    }

    /// Iterate over all samples in row-major, channel-interleaved order.
    pub fn samples(&self) -> impl Iterator<Item = u8> + '_ {
        self.pixels.pixels().flat_map(|p| [p.r, p.g, p.b])
    }
}

/// Decode JPEG bytes.
///
/// `path` is only used to label errors.
pub fn decode_jpeg(data: &[u8], path: &Path) -> Result<DecodedImage> {
    let unreadable = |reason: String| Error::UnreadableImage {
        path: path.to_path_buf(),
        reason,
    };

    let mut decoder = jpeg_decoder::Decoder::new(Cursor::new(data));
    let pixels = decoder.decode().map_err(|e| unreadable(e.to_string()))?;

    let info = decoder
        .info()
        .ok_or_else(|| unreadable("Missing JPEG info after decode".to_string()))?;

    let width = usize::from(info.width);
    let height = usize::from(info.height);

    let rgb: Vec<u8> = match info.pixel_format {
        jpeg_decoder::PixelFormat::RGB24 => pixels,
        jpeg_decoder::PixelFormat::L8 => pixels.iter().flat_map(|&g| [g, g, g]).collect(),
        jpeg_decoder::PixelFormat::L16 => pixels
            .chunks_exact(2)
            .flat_map(|c| {
                // High byte of a big-endian sample
                let g = c[0];
                [g, g, g]
            })
            .collect(),
        jpeg_decoder::PixelFormat::CMYK32 => cmyk_to_rgb(&pixels),
    };

    DecodedImage::from_rgb_bytes(&rgb, width, height)
        .ok_or_else(|| unreadable(format!("Decoded buffer does not match {width}x{height}")))
}

/// Convert CMYK samples as produced by jpeg-decoder to RGB.
///
/// The decoder hands back Adobe-style inverted CMYK, so 255 means no ink.
fn cmyk_to_rgb(cmyk: &[u8]) -> Vec<u8> {
    cmyk.chunks_exact(4)
        .flat_map(|px| {
            let k = u16::from(px[3]);
            let channel = |ink: u8| ((u16::from(ink) * k) / 255) as u8;
            [channel(px[0]), channel(px[1]), channel(px[2])]
        })
        .collect()
}

/// Read and decode a JPEG file.
pub fn load_image(path: &Path) -> Result<DecodedImage> {
    let data = std::fs::read(path).map_err(|e| Error::UnreadableImage {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    decode_jpeg(&data, path)
}
