//! # sizefit
//!
//! Target-size image compression search library.
//!
//! This library provides an **API-first design** where external crates
//! provide decode/encode/resample callbacks, and this library finds the
//! (quality, scale) pair whose encoded size lands closest to a requested
//! byte target under a bounded trial budget.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use sizefit::{Codec, CompressionRequest, FitEngine, MimeFamily};
//!
//! let engine = FitEngine::new(
//!     Codec::new(
//!         Box::new(|pixels, mime, quality| {
//!             // Your encoding logic here
//!             Ok(encoded_bytes)
//!         }),
//!         Box::new(|pixels, scale| {
//!             // Your resampling logic here
//!             resized
//!         }),
//!     ),
//! );
//!
//! let result = engine.fit(CompressionRequest {
//!     pixels: &pixels,
//!     source_byte_size: input.len(),
//!     mime: MimeFamily::Jpeg,
//!     target_bytes: 100_000,
//! })?;
//! ```
//!
//! ## Modules
//!
//! - [`error`]: Error types for the library
//! - [`pixels`]: Decoded pixel buffers
//! - [`codec`]: Codec callback seam and MIME families
//! - [`candidates`]: Candidate sequence and search policy constants
//! - [`fit`]: The target-size search engine
//! - [`convert`]: Percentage compression, format conversion, size specs
//! - [`report`]: Serializable search reports

pub mod candidates;
pub mod codec;
pub mod convert;
pub mod error;
pub mod fit;
pub mod pixels;
pub mod report;

// Re-export commonly used types
pub use candidates::{
    Candidate, CandidateGenerator, ESCALATION_QUALITIES, ESCALATION_SCALES, ESCALATION_THRESHOLD,
    FIT_TOLERANCE, MAX_TRIALS, QUALITY_SWEEP,
};
pub use codec::{Codec, DecodeFn, EncodeFn, MimeFamily, ResampleFn};
pub use convert::{
    TargetSize, compressed_filename, converted_filename, format_bytes, level_to_quality,
};
pub use error::{Error, Result};
pub use fit::{CancelFlag, CompressionRequest, CompressionResult, FitEngine, Trial};
pub use pixels::PixelBuffer;
pub use report::FitReport;
