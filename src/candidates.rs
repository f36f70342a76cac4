//! Candidate enumeration for the target-size search.
//!
//! A candidate is a (quality, scale) pair to encode and measure. Candidates
//! are produced highest-quality-first: a quality-only sweep at full scale,
//! then, if the controller escalates, a downscale phase that combines
//! reduced dimensions with a coarser quality ladder. The generator is a
//! pure cursor over fixed ladders; it performs no encoding and never
//! inspects pixel content.

use serde::{Deserialize, Serialize};

/// Quality ladder for the full-scale sweep, descending.
///
/// Encode size is assumed non-decreasing in quality at fixed scale, so a
/// single descending pass brackets the target without binary search.
pub const QUALITY_SWEEP: [f64; 9] = [0.9, 0.8, 0.7, 0.6, 0.5, 0.4, 0.3, 0.2, 0.1];

/// Scale ladder for the downscale phase, descending.
pub const ESCALATION_SCALES: [f64; 5] = [0.9, 0.8, 0.7, 0.6, 0.5];

/// Quality ladder tried at each downscale step, descending.
pub const ESCALATION_QUALITIES: [f64; 4] = [0.8, 0.6, 0.4, 0.2];

/// Relative tolerance band under the target within which a result is
/// accepted without further search.
pub const FIT_TOLERANCE: f64 = 0.05;

/// The downscale phase is entered only when the best full-scale result
/// still exceeds `target * ESCALATION_THRESHOLD`.
pub const ESCALATION_THRESHOLD: f64 = 1.1;

/// Upper bound on trial encodes for a single request.
pub const MAX_TRIALS: usize =
    QUALITY_SWEEP.len() + ESCALATION_SCALES.len() * ESCALATION_QUALITIES.len();

/// A trial (quality, scale) pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    /// Encoder quality in `(0.0, 1.0]`.
    pub quality: f64,

    /// Downscale factor in `(0.0, 1.0]`; 1.0 keeps original dimensions.
    pub scale: f64,
}

impl Candidate {
    /// Whether this candidate keeps the original dimensions.
    #[must_use]
    pub fn is_full_scale(&self) -> bool {
        self.scale >= 1.0
    }
}

#[derive(Debug, Clone, Copy)]
enum Cursor {
    Sweep { index: usize },
    Escalation { scale: usize, quality: usize },
    Done,
}

/// Lazy, finite, non-restartable sequence of candidates.
///
/// Yields the quality sweep first. The controller widens the search with
/// [`escalate`](Self::escalate) and abandons the remainder of a scale with
/// [`skip_to_next_scale`](Self::skip_to_next_scale); the cursor only ever
/// moves forward.
#[derive(Debug)]
pub struct CandidateGenerator {
    cursor: Cursor,
}

impl CandidateGenerator {
    /// Start a new sequence at the top of the quality sweep.
    #[must_use]
    pub fn new() -> Self {
        Self {
            cursor: Cursor::Sweep { index: 0 },
        }
    }

    /// Enter the downscale phase.
    ///
    /// Any remaining sweep candidates are abandoned. Has no effect once the
    /// downscale phase has begun.
    pub fn escalate(&mut self) {
        if let Cursor::Sweep { .. } = self.cursor {
            self.cursor = Cursor::Escalation { scale: 0, quality: 0 };
        }
    }

    /// Abandon the remaining qualities at the current scale and move to the
    /// next (smaller) one. Has no effect outside the downscale phase.
    pub fn skip_to_next_scale(&mut self) {
        if let Cursor::Escalation { scale, .. } = self.cursor {
            if scale + 1 < ESCALATION_SCALES.len() {
                self.cursor = Cursor::Escalation { scale: scale + 1, quality: 0 };
            } else {
                self.cursor = Cursor::Done;
            }
        }
    }

    /// Whether the sequence is exhausted.
    #[must_use]
    pub fn is_done(&self) -> bool {
        match self.cursor {
            Cursor::Sweep { index } => index >= QUALITY_SWEEP.len(),
            Cursor::Escalation { scale, .. } => scale >= ESCALATION_SCALES.len(),
            Cursor::Done => true,
        }
    }
}

impl Default for CandidateGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl Iterator for CandidateGenerator {
    type Item = Candidate;

    fn next(&mut self) -> Option<Candidate> {
        match self.cursor {
            Cursor::Sweep { index } => {
                let quality = *QUALITY_SWEEP.get(index)?;
                self.cursor = Cursor::Sweep { index: index + 1 };
                Some(Candidate { quality, scale: 1.0 })
            }
            Cursor::Escalation { scale, quality } => {
                let scale_factor = *ESCALATION_SCALES.get(scale)?;
                let quality_value = ESCALATION_QUALITIES[quality];
                self.cursor = if quality + 1 < ESCALATION_QUALITIES.len() {
                    Cursor::Escalation { scale, quality: quality + 1 }
                } else {
                    Cursor::Escalation { scale: scale + 1, quality: 0 }
                };
                Some(Candidate {
                    quality: quality_value,
                    scale: scale_factor,
                })
            }
            Cursor::Done => None,
        }
    }
}
