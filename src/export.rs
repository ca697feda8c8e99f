//! Text artifact export.
//!
//! The extracted text can be saved as a plain-text file named after the
//! source document. Contents are written verbatim, including the
//! extractor's inter-fragment and inter-page spacing.

use std::path::{Path, PathBuf};

use crate::error::Result;

/// Derive the artifact name: `<original-without-.pdf>_text.txt`.
pub fn text_artifact_name(original_name: &str) -> String {
    let split = original_name.len().saturating_sub(4);
    let stem = if original_name.is_char_boundary(split)
        && original_name[split..].eq_ignore_ascii_case(".pdf")
    {
        &original_name[..split]
    } else {
        original_name
    };
    format!("{}_text.txt", stem)
}

/// Write the text artifact into `dir`, returning the path written.
pub fn write_text_artifact(dir: &Path, original_name: &str, text: &str) -> Result<PathBuf> {
    let path = dir.join(text_artifact_name(original_name));
    std::fs::write(&path, text)?;
    Ok(path)
}

/// Human-readable byte size: 1024 base, up to two decimals, trailing
/// zeros trimmed (`0 Bytes`, `1.5 KB`, `2 MB`).
pub fn format_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["Bytes", "KB", "MB", "GB"];
    if bytes == 0 {
        return "0 Bytes".to_string();
    }
    let exponent = ((bytes as f64).ln() / 1024_f64.ln()).floor() as usize;
    let exponent = exponent.min(UNITS.len() - 1);
    let value = bytes as f64 / 1024_f64.powi(exponent as i32);

    let mut rendered = format!("{:.2}", value);
    if rendered.contains('.') {
        rendered = rendered.trim_end_matches('0').trim_end_matches('.').to_string();
    }
    format!("{} {}", rendered, UNITS[exponent])
}
