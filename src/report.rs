//! Serializable search reports.
//!
//! A [`FitReport`] is a pure projection of a finished search: the chosen
//! candidate, the achieved size, and the trial-by-trial trace collected
//! through [`FitEngine::fit_observed`](crate::fit::FitEngine::fit_observed).
//! The engine itself never touches the filesystem; writing reports is the
//! caller's choice.

use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::candidates::{Candidate, FIT_TOLERANCE};
use crate::error::Result;
use crate::fit::{CompressionResult, Trial};

/// Report for one target-size search.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FitReport {
    /// Source image name or identifier, if known.
    pub source: Option<String>,

    /// Requested target size in bytes.
    pub target_bytes: usize,

    /// Byte size of the returned encoding.
    pub achieved_size: usize,

    /// The (quality, scale) pair that produced it.
    pub chosen: Candidate,

    /// Every trial performed, in order.
    pub trials: Vec<Trial>,

    /// When this report was generated.
    pub timestamp: DateTime<Utc>,
}

impl FitReport {
    /// Build a report from a search result and its observed trials.
    #[must_use]
    pub fn new(target_bytes: usize, result: &CompressionResult, trials: Vec<Trial>) -> Self {
        Self {
            source: None,
            target_bytes,
            achieved_size: result.achieved_size,
            chosen: result.chosen,
            trials,
            timestamp: Utc::now(),
        }
    }

    /// Attach the source image name.
    #[must_use]
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Whether the achieved size landed inside the tolerance band under the
    /// target.
    #[must_use]
    pub fn within_tolerance(&self) -> bool {
        self.achieved_size <= self.target_bytes
            && ((self.target_bytes - self.achieved_size) as f64)
                < self.target_bytes as f64 * FIT_TOLERANCE
    }

    /// Write the report as pretty-printed JSON.
    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Write the trial table as CSV.
    pub fn write_csv(&self, path: impl AsRef<Path>) -> Result<()> {
        let mut wtr = csv::Writer::from_path(path)?;
        wtr.write_record(["trial", "quality", "scale", "size", "distance"])?;
        for trial in &self.trials {
            wtr.write_record([
                trial.index.to_string(),
                format!("{:.2}", trial.candidate.quality),
                format!("{:.2}", trial.candidate.scale),
                trial.size.map_or(String::new(), |s| s.to_string()),
                trial
                    .distance(self.target_bytes)
                    .map_or(String::new(), |d| d.to_string()),
            ])?;
        }
        wtr.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_report() -> FitReport {
        let result = CompressionResult {
            bytes: vec![0u8; 99_000],
            chosen: Candidate { quality: 0.3, scale: 1.0 },
            achieved_size: 99_000,
            trials: 7,
        };
        let trials = vec![
            Trial {
                index: 0,
                candidate: Candidate { quality: 0.9, scale: 1.0 },
                size: Some(300_000),
            },
            Trial {
                index: 1,
                candidate: Candidate { quality: 0.8, scale: 1.0 },
                size: None,
            },
            Trial {
                index: 2,
                candidate: Candidate { quality: 0.3, scale: 1.0 },
                size: Some(99_000),
            },
        ];
        FitReport::new(100_000, &result, trials).with_source("photo.jpg")
    }

    #[test]
    fn test_within_tolerance() {
        let mut report = sample_report();
        assert!(report.within_tolerance());

        report.achieved_size = 80_000;
        assert!(!report.within_tolerance());

        report.achieved_size = 100_001;
        assert!(!report.within_tolerance());
    }

    #[test]
    fn test_json_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.json");

        let report = sample_report();
        report.write_json(&path).unwrap();

        let parsed: FitReport =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(parsed.source.as_deref(), Some("photo.jpg"));
        assert_eq!(parsed.target_bytes, 100_000);
        assert_eq!(parsed.achieved_size, 99_000);
        assert_eq!(parsed.trials.len(), 3);
        assert_eq!(parsed.trials[1].size, None);
    }

    #[test]
    fn test_csv_layout() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("trials.csv");

        sample_report().write_csv(&path).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        let mut lines = contents.lines();
        assert_eq!(lines.next(), Some("trial,quality,scale,size,distance"));
        assert_eq!(lines.next(), Some("0,0.90,1.00,300000,200000"));
        // Failed trial keeps empty size/distance cells.
        assert_eq!(lines.next(), Some("1,0.80,1.00,,"));
        assert_eq!(lines.next(), Some("2,0.30,1.00,99000,1000"));
    }
}
