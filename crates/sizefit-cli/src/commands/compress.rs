//! `sizefit compress` - percentage-level compression.

use std::path::Path;

use anyhow::Context;

use sizefit::{FitEngine, compressed_filename, format_bytes};

use crate::backend;
use crate::commands::{display_name, mime_of};

pub fn run(input: &Path, level: u8, output: Option<&Path>) -> anyhow::Result<()> {
    let bytes =
        std::fs::read(input).with_context(|| format!("failed to read {}", input.display()))?;
    let name = display_name(input);
    let mime = mime_of(input)?;

    let engine = FitEngine::new(backend::image_codec());
    let pixels = backend::decode_pixels(&bytes)?;
    let encoded = engine.compress_with_level(&pixels, mime, level)?;

    let out_path = match output {
        Some(path) => path.to_path_buf(),
        None => input.with_file_name(compressed_filename(&name, mime)),
    };
    std::fs::write(&out_path, &encoded)
        .with_context(|| format!("failed to write {}", out_path.display()))?;

    println!(
        "{} -> {} (level {}: {} -> {})",
        name,
        out_path.display(),
        level,
        format_bytes(bytes.len()),
        format_bytes(encoded.len()),
    );
    Ok(())
}
