//! CLI subcommand implementations.

use std::path::Path;

use anyhow::Context;
use sizefit::MimeFamily;

pub mod compress;
pub mod convert;
pub mod fit;

/// Determine the encoding family from a file's extension.
pub(crate) fn mime_of(path: &Path) -> anyhow::Result<MimeFamily> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .with_context(|| format!("no file extension on {}", path.display()))?;
    Ok(MimeFamily::from_extension(ext)?)
}

/// File name for display and output-name derivation.
pub(crate) fn display_name(path: &Path) -> String {
    path.file_name()
        .map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().into_owned())
}
