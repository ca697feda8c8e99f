//! PDF document access.
//!
//! Provides a trait-based interface for the operations the extractor and
//! workflow need, isolating the concrete PDF library (lopdf) from the rest
//! of the crate. Decode failures from the library are opaque and mapped to
//! a single generic [`Error::Load`].

mod lopdf_source;

pub use lopdf_source::LopdfSource;

use crate::error::{Error, Result};
use serde::Serialize;
use std::path::Path;

/// PDF magic bytes: %PDF-
const PDF_MAGIC: &[u8] = b"%PDF-";

/// Abstract interface for a decoded PDF document.
///
/// Pages are 1-indexed. Implementations expose the per-page text runs in
/// document order; joining and spacing policy belongs to the extractor.
pub trait PdfSource {
    /// Total number of pages in the document.
    fn page_count(&self) -> u32;

    /// The text fragments of one page, in document order.
    fn page_fragments(&self, page: u32) -> Result<Vec<String>>;

    /// Document-level information for display.
    fn info(&self) -> DocumentInfo;
}

/// Document report shown after a successful load.
#[derive(Debug, Clone, Serialize)]
pub struct DocumentInfo {
    /// Number of pages.
    pub page_count: u32,
    /// PDF version string (e.g. "1.7").
    pub version: String,
    /// Whether the document is encrypted.
    pub encrypted: bool,
    /// Document title from the info dictionary, if present.
    pub title: Option<String>,
}

/// Check that bytes begin with the PDF magic marker.
pub fn is_pdf_bytes(data: &[u8]) -> bool {
    data.starts_with(PDF_MAGIC)
}

/// Load a document from an in-memory byte buffer.
///
/// Fails with [`Error::UnknownFormat`] when the magic bytes are missing and
/// with [`Error::Load`] for any decode failure. No partial handle is ever
/// returned.
pub fn load_bytes(data: &[u8]) -> Result<LopdfSource> {
    if !is_pdf_bytes(data) {
        return Err(Error::UnknownFormat);
    }
    LopdfSource::load_bytes(data).map_err(|e| {
        log::warn!("PDF decode failed: {}", e);
        generalize_load_error(e)
    })
}

/// Load a document from a file path.
pub fn load_file<P: AsRef<Path>>(path: P) -> Result<LopdfSource> {
    let data = std::fs::read(path)?;
    load_bytes(&data)
}

/// Collapse decode failures into one generic load error; I/O errors keep
/// their identity.
fn generalize_load_error(err: Error) -> Error {
    match err {
        Error::Io(e) => Error::Io(e),
        other => Error::Load(other.to_string()),
    }
}
