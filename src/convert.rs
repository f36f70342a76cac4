//! Single-shot compression and format conversion.
//!
//! These are the tool's two simpler operations, with no search involved: a
//! percentage compression level mapped straight onto the encoder's quality
//! knob, and a re-encode into another format at that format's default
//! quality. Also holds the target-size spec parsing and byte formatting the
//! CLI shares.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::codec::MimeFamily;
use crate::error::{Error, Result};
use crate::fit::FitEngine;
use crate::pixels::PixelBuffer;

/// Lowest accepted compression level.
pub const MIN_LEVEL: u8 = 10;

/// Highest accepted compression level.
pub const MAX_LEVEL: u8 = 90;

/// Map a compression level (percent, higher = smaller file) onto encoder
/// quality: `(100 - level) / 100`.
pub fn level_to_quality(level: u8) -> Result<f64> {
    if !(MIN_LEVEL..=MAX_LEVEL).contains(&level) {
        return Err(Error::InvalidLevel(level));
    }
    Ok(f64::from(100 - level) / 100.0)
}

impl FitEngine {
    /// Encode once at the quality mapped from `level`, keeping dimensions.
    pub fn compress_with_level(
        &self,
        pixels: &PixelBuffer,
        mime: MimeFamily,
        level: u8,
    ) -> Result<Vec<u8>> {
        let quality = level_to_quality(level)?;
        self.encode_once(pixels, mime, quality)
    }

    /// Re-encode into `target` at that family's default quality.
    pub fn convert(&self, pixels: &PixelBuffer, target: MimeFamily) -> Result<Vec<u8>> {
        self.encode_once(pixels, target, target.default_quality())
    }

    fn encode_once(&self, pixels: &PixelBuffer, mime: MimeFamily, quality: f64) -> Result<Vec<u8>> {
        let bytes = (self.codec.encode)(pixels, mime, quality)?;
        if bytes.is_empty() {
            return Err(Error::EncodingExhausted { trials: 1 });
        }
        Ok(bytes)
    }
}

/// Derive the output name for a compressed image: the stem before the first
/// `.` plus a `_compressed` suffix and the family's extension.
#[must_use]
pub fn compressed_filename(source_name: &str, mime: MimeFamily) -> String {
    format!("{}_compressed.{}", stem_of(source_name), mime.extension())
}

/// Derive the output name for a converted image: same stem, new extension.
#[must_use]
pub fn converted_filename(source_name: &str, target: MimeFamily) -> String {
    format!("{}.{}", stem_of(source_name), target.extension())
}

fn stem_of(source_name: &str) -> &str {
    source_name.split('.').next().unwrap_or(source_name)
}

/// A target output size parsed from user input such as `500KB` or `2MB`.
///
/// Units are 1024-based; a bare number is taken as bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TargetSize(usize);

impl TargetSize {
    /// Target size in bytes. Always strictly positive.
    #[must_use]
    pub fn bytes(self) -> usize {
        self.0
    }

    /// Construct from a raw byte count.
    pub fn from_bytes(bytes: usize) -> Result<Self> {
        if bytes == 0 {
            return Err(Error::InvalidTarget(0));
        }
        Ok(Self(bytes))
    }
}

impl FromStr for TargetSize {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let spec = s.trim();
        let unit_start = spec
            .find(|c: char| c.is_ascii_alphabetic())
            .unwrap_or(spec.len());
        let (number, unit) = spec.split_at(unit_start);

        let value: f64 = number
            .trim()
            .parse()
            .map_err(|_| Error::InvalidSizeSpec(s.to_string()))?;
        let multiplier = match unit.trim().to_ascii_uppercase().as_str() {
            "" | "B" | "BYTES" => 1.0,
            "K" | "KB" => 1024.0,
            "M" | "MB" => 1024.0 * 1024.0,
            "G" | "GB" => 1024.0 * 1024.0 * 1024.0,
            _ => return Err(Error::InvalidSizeSpec(s.to_string())),
        };

        let bytes = (value * multiplier).round();
        if !bytes.is_finite() || bytes < 1.0 {
            return Err(Error::InvalidSizeSpec(s.to_string()));
        }
        Ok(Self(bytes as usize))
    }
}

impl fmt::Display for TargetSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format_bytes(self.0))
    }
}

/// Human-readable byte count with 1024-based units and up to two decimals,
/// trailing zeros trimmed.
#[must_use]
pub fn format_bytes(bytes: usize) -> String {
    const UNITS: [&str; 4] = ["Bytes", "KB", "MB", "GB"];
    if bytes == 0 {
        return "0 Bytes".to_string();
    }
    let exponent = ((bytes as f64).log2() / 10.0).floor() as usize;
    let exponent = exponent.min(UNITS.len() - 1);
    let value = bytes as f64 / 1024f64.powi(exponent as i32);
    let rounded = (value * 100.0).round() / 100.0;

    let number = if rounded.fract().abs() < 1e-9 {
        format!("{rounded:.0}")
    } else if (rounded * 10.0).fract().abs() < 1e-9 {
        format!("{rounded:.1}")
    } else {
        format!("{rounded:.2}")
    };
    format!("{} {}", number, UNITS[exponent])
}
