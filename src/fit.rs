//! Target-size search controller.
//!
//! Given a decoded image and a target byte size, [`FitEngine`] drives the
//! candidate sequence against the codec callbacks and returns the encoding
//! whose size lands closest to the target. Target size is not analytically
//! invertible from quality alone (final size depends on image content), so
//! the engine treats the encoder as a black box under a bounded trial
//! budget: a cheap quality-only sweep first, downscaling only when quality
//! reduction cannot reach the target.
//!
//! Each request runs a single-pass, strictly sequential search; no state
//! survives between requests. Independent requests may run concurrently
//! (see [`FitEngine::fit_many`]) since the engine only reads the shared
//! source buffer.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::candidates::{
    Candidate, CandidateGenerator, ESCALATION_THRESHOLD, FIT_TOLERANCE, MAX_TRIALS,
};
use crate::codec::{Codec, MimeFamily};
use crate::error::{Error, Result};
use crate::pixels::PixelBuffer;

/// A single compression request.
///
/// The pixel buffer stays owned by the caller; the engine only reads it.
#[derive(Debug, Clone, Copy)]
pub struct CompressionRequest<'a> {
    /// Decoded source image.
    pub pixels: &'a PixelBuffer,

    /// Byte size of the original encoded input.
    pub source_byte_size: usize,

    /// Target encoding family.
    pub mime: MimeFamily,

    /// Desired output size in bytes.
    pub target_bytes: usize,
}

impl CompressionRequest<'_> {
    /// Check the request invariants: strictly positive sizes and dimensions.
    pub fn validate(&self) -> Result<()> {
        if self.target_bytes == 0 {
            return Err(Error::InvalidTarget(self.target_bytes));
        }
        if self.source_byte_size == 0 {
            return Err(Error::InvalidSourceSize(self.source_byte_size));
        }
        if self.pixels.width() == 0 || self.pixels.height() == 0 {
            return Err(Error::EmptyImage {
                width: self.pixels.width(),
                height: self.pixels.height(),
            });
        }
        Ok(())
    }
}

/// Outcome of one trial encode, reported to observers.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Trial {
    /// Zero-based position in the candidate sequence.
    pub index: usize,

    /// The candidate that was tried.
    pub candidate: Candidate,

    /// Encoded byte size, or `None` if this candidate's encode failed.
    pub size: Option<usize>,
}

impl Trial {
    /// Absolute distance from the target, when the encode succeeded.
    #[must_use]
    pub fn distance(&self, target_bytes: usize) -> Option<usize> {
        self.size.map(|size| size.abs_diff(target_bytes))
    }

    /// Search progress as completed trials over the trial budget.
    #[must_use]
    pub fn progress(&self) -> f64 {
        (self.index + 1) as f64 / MAX_TRIALS as f64
    }
}

/// Final result of a successful search.
///
/// Constructed once from the best attempt observed; never mutated after.
#[derive(Debug, Clone)]
pub struct CompressionResult {
    /// Final encoded output.
    pub bytes: Vec<u8>,

    /// The (quality, scale) pair that produced it.
    pub chosen: Candidate,

    /// Byte length of `bytes`.
    ///
    /// May land outside the tolerance band when the candidate budget ran
    /// out; that is a best-effort success, not an error. Callers needing a
    /// strict guarantee must compare against their target themselves.
    pub achieved_size: usize,

    /// Number of trial encodes performed.
    pub trials: usize,
}

/// Clonable cancellation flag, checked between trials.
///
/// A cancelled search returns [`Error::Cancelled`] and discards any partial
/// result.
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    /// Create a new, unset flag.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation of every search holding a clone of this flag.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    /// Whether cancellation was requested.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Best attempt retained during the search. Trial encodes that don't beat
/// it are dropped immediately.
struct EncodeAttempt {
    candidate: Candidate,
    bytes: Vec<u8>,
    size: usize,
    distance: usize,
}

/// Search engine binding a [`Codec`] to the candidate sequence.
///
/// # Example
///
/// ```rust,ignore
/// use sizefit::{Codec, CompressionRequest, FitEngine, MimeFamily};
///
/// let engine = FitEngine::new(Codec::new(encode, resample));
/// let result = engine.fit(CompressionRequest {
///     pixels: &pixels,
///     source_byte_size: input.len(),
///     mime: MimeFamily::Jpeg,
///     target_bytes: 100_000,
/// })?;
/// println!("{} bytes at q{}", result.achieved_size, result.chosen.quality);
/// ```
pub struct FitEngine {
    pub(crate) codec: Codec,
}

impl FitEngine {
    /// Create an engine around the given codec callbacks.
    #[must_use]
    pub fn new(codec: Codec) -> Self {
        Self { codec }
    }

    /// Run the target-size search for one request.
    pub fn fit(&self, request: CompressionRequest<'_>) -> Result<CompressionResult> {
        self.fit_inner(request, None, &mut |_| {})
    }

    /// Run the search, reporting each trial to `observer`.
    ///
    /// Progress is a pure projection of the trial index; the engine does no
    /// wall-clock pacing of its own.
    pub fn fit_observed<F>(
        &self,
        request: CompressionRequest<'_>,
        mut observer: F,
    ) -> Result<CompressionResult>
    where
        F: FnMut(&Trial),
    {
        self.fit_inner(request, None, &mut observer)
    }

    /// Run the search, aborting between trials once `cancel` is set.
    pub fn fit_cancellable(
        &self,
        request: CompressionRequest<'_>,
        cancel: &CancelFlag,
    ) -> Result<CompressionResult> {
        self.fit_inner(request, Some(cancel), &mut |_| {})
    }

    /// Decode `bytes` with the registered decode callback, then search.
    pub fn fit_bytes(
        &self,
        bytes: &[u8],
        mime: MimeFamily,
        target_bytes: usize,
    ) -> Result<CompressionResult> {
        let Some(decode) = &self.codec.decode else {
            return Err(Error::DecodeFailed {
                reason: "no decode callback registered".to_string(),
            });
        };
        let pixels = decode(bytes)?;
        self.fit(CompressionRequest {
            pixels: &pixels,
            source_byte_size: bytes.len(),
            mime,
            target_bytes,
        })
    }

    /// Run independent requests in parallel.
    ///
    /// Each search stays strictly sequential internally; only whole
    /// requests fan out. Results keep the input order.
    pub fn fit_many(&self, requests: &[CompressionRequest<'_>]) -> Vec<Result<CompressionResult>> {
        requests.par_iter().map(|request| self.fit(*request)).collect()
    }

    fn fit_inner(
        &self,
        request: CompressionRequest<'_>,
        cancel: Option<&CancelFlag>,
        observer: &mut dyn FnMut(&Trial),
    ) -> Result<CompressionResult> {
        request.validate()?;
        let target = request.target_bytes;

        let mut generator = CandidateGenerator::new();
        let mut best: Option<EncodeAttempt> = None;
        let mut trials = 0usize;
        let mut escalated = false;
        // Resampled buffer reused across the quality ladder of one scale.
        let mut scaled: Option<(f64, PixelBuffer)> = None;

        loop {
            let Some(candidate) = generator.next() else {
                if escalated {
                    break;
                }
                // Quality alone couldn't approach the target; bring in the
                // more disruptive lever. A sweep with zero successful
                // encodes escalates too, so exhaustion covers the full
                // sequence.
                let oversized = best
                    .as_ref()
                    .map_or(true, |b| b.size as f64 > target as f64 * ESCALATION_THRESHOLD);
                if !oversized {
                    break;
                }
                escalated = true;
                generator.escalate();
                continue;
            };

            if let Some(cancel) = cancel {
                if cancel.is_cancelled() {
                    return Err(Error::Cancelled);
                }
            }

            if !candidate.is_full_scale()
                && scaled.as_ref().map_or(true, |(s, _)| *s != candidate.scale)
            {
                scaled = Some((
                    candidate.scale,
                    (self.codec.resample)(request.pixels, candidate.scale),
                ));
            }
            let pixels = match (&scaled, candidate.is_full_scale()) {
                (Some((_, buffer)), false) => buffer,
                _ => request.pixels,
            };

            let index = trials;
            trials += 1;

            // A failed or empty encode is "no result for this candidate",
            // not a fatal error; the search moves on.
            let encoded = match (self.codec.encode)(pixels, request.mime, candidate.quality) {
                Ok(bytes) if !bytes.is_empty() => Some(bytes),
                _ => None,
            };

            let trial = Trial {
                index,
                candidate,
                size: encoded.as_ref().map(Vec::len),
            };
            observer(&trial);

            let Some(bytes) = encoded else { continue };
            let size = bytes.len();
            let distance = size.abs_diff(target);

            if best.as_ref().map_or(true, |b| distance < b.distance) {
                best = Some(EncodeAttempt {
                    candidate,
                    bytes,
                    size,
                    distance,
                });
            }

            if !escalated {
                // Tolerance hit: stop the entire search.
                if size <= target && (distance as f64) < target as f64 * FIT_TOLERANCE {
                    break;
                }
            } else {
                // Under the target: lower qualities at this scale only move
                // further away.
                if size <= target {
                    generator.skip_to_next_scale();
                }
                if best.as_ref().is_some_and(|b| b.size <= target) {
                    break;
                }
            }
        }

        match best {
            Some(attempt) => Ok(CompressionResult {
                bytes: attempt.bytes,
                chosen: attempt.candidate,
                achieved_size: attempt.size,
                trials,
            }),
            None => Err(Error::EncodingExhausted { trials }),
        }
    }
}
