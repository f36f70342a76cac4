//! Codec callback seam.
//!
//! The engine does not implement decoding, encoding, or resampling itself.
//! External crates provide those as callbacks, bundled into a [`Codec`], and
//! the engine drives them. Encoders must be deterministic for identical
//! inputs; the search contract depends on it.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::pixels::PixelBuffer;

/// Target encoding family.
///
/// Mirrors the `image/<format>` MIME types the encode callback receives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MimeFamily {
    /// JPEG (lossy; the quality knob drives output size).
    Jpeg,
    /// PNG (lossless; quality is ignored by most encoders).
    Png,
    /// WebP.
    WebP,
    /// GIF (palette-based; quality is ignored).
    Gif,
}

impl MimeFamily {
    /// Parse a MIME type such as `image/jpeg`.
    pub fn from_mime(mime: &str) -> Result<Self> {
        match mime.to_ascii_lowercase().as_str() {
            "image/jpeg" | "image/jpg" => Ok(Self::Jpeg),
            "image/png" => Ok(Self::Png),
            "image/webp" => Ok(Self::WebP),
            "image/gif" => Ok(Self::Gif),
            other => Err(Error::UnsupportedFormat(other.to_string())),
        }
    }

    /// Parse a file extension or bare format name such as `jpg` or `PNG`.
    pub fn from_extension(ext: &str) -> Result<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "jpg" | "jpeg" => Ok(Self::Jpeg),
            "png" => Ok(Self::Png),
            "webp" => Ok(Self::WebP),
            "gif" => Ok(Self::Gif),
            other => Err(Error::UnsupportedFormat(other.to_string())),
        }
    }

    /// The canonical MIME type string.
    #[must_use]
    pub fn as_mime(self) -> &'static str {
        match self {
            Self::Jpeg => "image/jpeg",
            Self::Png => "image/png",
            Self::WebP => "image/webp",
            Self::Gif => "image/gif",
        }
    }

    /// File extension for derived output names.
    #[must_use]
    pub fn extension(self) -> &'static str {
        match self {
            Self::Jpeg => "jpeg",
            Self::Png => "png",
            Self::WebP => "webp",
            Self::Gif => "gif",
        }
    }

    /// Whether the quality knob meaningfully drives output size.
    #[must_use]
    pub fn is_lossy(self) -> bool {
        matches!(self, Self::Jpeg | Self::WebP)
    }

    /// Default quality for single-shot conversion into this family.
    ///
    /// JPEG conversions use 0.9; lossless and palette formats ignore the
    /// knob, so they get 1.0.
    #[must_use]
    pub fn default_quality(self) -> f64 {
        match self {
            Self::Jpeg => 0.9,
            Self::Png | Self::WebP | Self::Gif => 1.0,
        }
    }
}

/// Decode callback type.
///
/// Takes encoded bytes, returns a decoded pixel buffer.
pub type DecodeFn = Box<dyn Fn(&[u8]) -> Result<PixelBuffer> + Send + Sync>;

/// Encode callback type.
///
/// Takes a pixel buffer, target family, and quality in `(0.0, 1.0]`, and
/// returns the encoded bytes. Must be deterministic for identical inputs.
pub type EncodeFn = Box<dyn Fn(&PixelBuffer, MimeFamily, f64) -> Result<Vec<u8>> + Send + Sync>;

/// Resample callback type.
///
/// Takes a pixel buffer and a scale factor in `(0.0, 1.0]`, and returns a
/// buffer resized to `floor(width * scale)` x `floor(height * scale)`,
/// clamped to at least 1x1.
pub type ResampleFn = Box<dyn Fn(&PixelBuffer, f64) -> PixelBuffer + Send + Sync>;

/// Bundle of codec capabilities the engine drives.
pub struct Codec {
    pub(crate) encode: EncodeFn,
    pub(crate) resample: ResampleFn,
    pub(crate) decode: Option<DecodeFn>,
}

impl Codec {
    /// Create a codec from encode and resample callbacks.
    #[must_use]
    pub fn new(encode: EncodeFn, resample: ResampleFn) -> Self {
        Self {
            encode,
            resample,
            decode: None,
        }
    }

    /// Attach a decode callback, enabling byte-level entry points.
    #[must_use]
    pub fn with_decode(mut self, decode: DecodeFn) -> Self {
        self.decode = Some(decode);
        self
    }

    /// Whether a decode callback was registered.
    #[must_use]
    pub fn can_decode(&self) -> bool {
        self.decode.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mime_roundtrip() {
        for family in [MimeFamily::Jpeg, MimeFamily::Png, MimeFamily::WebP, MimeFamily::Gif] {
            assert_eq!(MimeFamily::from_mime(family.as_mime()).unwrap(), family);
        }
    }

    #[test]
    fn test_jpg_aliases() {
        assert_eq!(MimeFamily::from_mime("image/jpg").unwrap(), MimeFamily::Jpeg);
        assert_eq!(MimeFamily::from_extension("JPG").unwrap(), MimeFamily::Jpeg);
        assert_eq!(MimeFamily::from_extension("jpeg").unwrap(), MimeFamily::Jpeg);
    }

    #[test]
    fn test_unsupported_format() {
        assert!(matches!(
            MimeFamily::from_mime("image/tiff"),
            Err(Error::UnsupportedFormat(_))
        ));
        assert!(matches!(
            MimeFamily::from_extension("bmp"),
            Err(Error::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn test_default_quality() {
        assert!((MimeFamily::Jpeg.default_quality() - 0.9).abs() < f64::EPSILON);
        assert!((MimeFamily::Png.default_quality() - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_codec_decode_registration() {
        let codec = Codec::new(
            Box::new(|_, _, _| Ok(vec![0u8; 10])),
            Box::new(|buf, _| buf.clone()),
        );
        assert!(!codec.can_decode());

        let codec = codec.with_decode(Box::new(|_| {
            Ok(PixelBuffer::RgbSlice {
                data: vec![0; 3],
                width: 1,
                height: 1,
            })
        }));
        assert!(codec.can_decode());
    }
}
