//! `sizefit fit` - search for an encoding close to a target byte size.

use std::path::{Path, PathBuf};

use anyhow::{Context, bail};
use rayon::prelude::*;

use sizefit::{
    Candidate, CompressionRequest, FitEngine, FitReport, MimeFamily, TargetSize,
    compressed_filename, format_bytes,
};

use crate::backend;
use crate::commands::{display_name, mime_of};

struct Summary {
    name: String,
    out_path: PathBuf,
    achieved: usize,
    chosen: Candidate,
    trials: usize,
    within_tolerance: bool,
}

pub fn run(
    inputs: &[PathBuf],
    target: &str,
    format: Option<&str>,
    out_dir: Option<&Path>,
    report: Option<&Path>,
    trials: Option<&Path>,
    verbose: bool,
) -> anyhow::Result<()> {
    let target: TargetSize = target.parse()?;
    if (report.is_some() || trials.is_some()) && inputs.len() > 1 {
        bail!("--report and --trials only apply to a single input");
    }

    let engine = FitEngine::new(backend::image_codec());

    let outcomes: Vec<(String, anyhow::Result<Summary>)> = inputs
        .par_iter()
        .map(|input| {
            let name = display_name(input);
            let outcome = fit_one(&engine, input, target, format, out_dir, report, trials, verbose);
            (name, outcome)
        })
        .collect();

    println!("sizefit -- {} input(s), target {}\n", inputs.len(), target);
    println!(
        "  {:<32} {:>10} {:>8} {:>6} {:>7}",
        "Input", "Achieved", "Quality", "Scale", "Trials"
    );
    println!("  {}", "-".repeat(70));

    let mut failures = 0;
    for (name, outcome) in outcomes {
        match outcome {
            Ok(summary) => {
                let note = if summary.within_tolerance {
                    ""
                } else {
                    "  (best effort)"
                };
                println!(
                    "  {:<32} {:>10} {:>8.2} {:>6.2} {:>7}{}",
                    summary.name,
                    format_bytes(summary.achieved),
                    summary.chosen.quality,
                    summary.chosen.scale,
                    summary.trials,
                    note,
                );
                if verbose {
                    println!("    -> {}", summary.out_path.display());
                }
            }
            Err(e) => {
                failures += 1;
                eprintln!("  {:<32} ERROR: {:#}", name, e);
            }
        }
    }

    if failures > 0 {
        bail!("{failures} of {} input(s) failed", inputs.len());
    }
    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn fit_one(
    engine: &FitEngine,
    input: &Path,
    target: TargetSize,
    format: Option<&str>,
    out_dir: Option<&Path>,
    report_path: Option<&Path>,
    trials_path: Option<&Path>,
    verbose: bool,
) -> anyhow::Result<Summary> {
    let bytes =
        std::fs::read(input).with_context(|| format!("failed to read {}", input.display()))?;
    let name = display_name(input);

    let mime = match format {
        Some(ext) => MimeFamily::from_extension(ext)?,
        None => mime_of(input)?,
    };

    let pixels = backend::decode_pixels(&bytes)?;
    let mut observed = Vec::new();
    let result = engine.fit_observed(
        CompressionRequest {
            pixels: &pixels,
            source_byte_size: bytes.len(),
            mime,
            target_bytes: target.bytes(),
        },
        |trial| {
            if verbose {
                eprintln!(
                    "  {} trial {:>2}: q{:.2} x{:.2} -> {}",
                    name,
                    trial.index + 1,
                    trial.candidate.quality,
                    trial.candidate.scale,
                    trial.size.map_or_else(|| "failed".to_string(), format_bytes),
                );
            }
            observed.push(*trial);
        },
    )?;

    let out_name = compressed_filename(&name, mime);
    let out_path = match out_dir {
        Some(dir) => dir.join(&out_name),
        None => input.with_file_name(&out_name),
    };
    std::fs::write(&out_path, &result.bytes)
        .with_context(|| format!("failed to write {}", out_path.display()))?;

    let fit_report = FitReport::new(target.bytes(), &result, observed).with_source(name.clone());
    if let Some(path) = report_path {
        fit_report.write_json(path)?;
    }
    if let Some(path) = trials_path {
        fit_report.write_csv(path)?;
    }

    Ok(Summary {
        name,
        out_path,
        achieved: result.achieved_size,
        chosen: result.chosen,
        trials: result.trials,
        within_tolerance: fit_report.within_tolerance(),
    })
}
