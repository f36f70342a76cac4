//! `sizefit convert` - format conversion.

use std::path::Path;

use anyhow::Context;

use sizefit::{FitEngine, MimeFamily, converted_filename, format_bytes};

use crate::backend;
use crate::commands::display_name;

pub fn run(input: &Path, format: &str, output: Option<&Path>) -> anyhow::Result<()> {
    let target = MimeFamily::from_extension(format)?;
    let bytes =
        std::fs::read(input).with_context(|| format!("failed to read {}", input.display()))?;
    let name = display_name(input);

    let engine = FitEngine::new(backend::image_codec());
    let pixels = backend::decode_pixels(&bytes)?;
    let encoded = engine.convert(&pixels, target)?;

    let out_path = match output {
        Some(path) => path.to_path_buf(),
        None => input.with_file_name(converted_filename(&name, target)),
    };
    std::fs::write(&out_path, &encoded)
        .with_context(|| format!("failed to write {}", out_path.display()))?;

    println!(
        "{} -> {} ({} -> {})",
        name,
        out_path.display(),
        format_bytes(bytes.len()),
        format_bytes(encoded.len()),
    );
    Ok(())
}
