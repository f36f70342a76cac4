//! Error types for sizefit operations.

use thiserror::Error;

/// Result type alias for sizefit operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while searching for a target-size encoding.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// Source bytes could not be interpreted as an image.
    ///
    /// Fatal for the request; retrying with the same bytes cannot succeed.
    #[error("Decode failed: {reason}")]
    DecodeFailed {
        /// Reason reported by the decoder.
        reason: String,
    },

    /// Every candidate in the search sequence failed to produce an encode.
    #[error("Encoding exhausted: all {trials} candidate encodes failed")]
    EncodingExhausted {
        /// Number of candidates attempted before giving up.
        trials: usize,
    },

    /// The caller abandoned the request between trials.
    #[error("Search cancelled")]
    Cancelled,

    /// Target byte size must be strictly positive.
    #[error("Invalid target size: {0} bytes")]
    InvalidTarget(usize),

    /// Source byte size must be strictly positive.
    #[error("Invalid source size: {0} bytes")]
    InvalidSourceSize(usize),

    /// Source image has a zero dimension.
    #[error("Empty image: {width}x{height}")]
    EmptyImage {
        /// Source width in pixels.
        width: usize,
        /// Source height in pixels.
        height: usize,
    },

    /// Compression level outside the accepted range.
    #[error("Invalid compression level: {0} (expected 10-90)")]
    InvalidLevel(u8),

    /// Error reported by a codec callback.
    ///
    /// Inside the search this only fails the one candidate; single-shot
    /// operations surface it directly.
    #[error("Codec error: {0}")]
    Codec(String),

    /// Unsupported image format or MIME type.
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    /// Could not parse a target size specification such as "500KB".
    #[error("Invalid size spec: {0:?}")]
    InvalidSizeSpec(String),

    /// I/O error wrapper.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// CSV error.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}
