//! # pdfvox
//!
//! Read PDF documents aloud. pdfvox extracts text from a page range of a
//! PDF, reports progress along the way, and hands the text to a speech
//! engine for playback or to disk as a plain-text artifact.
//!
//! ## Quick Start
//!
//! ```no_run
//! use pdfvox::{extract_text, PageRange};
//!
//! fn main() -> pdfvox::Result<()> {
//!     let text = extract_text("document.pdf", PageRange::new(1, 10))?;
//!     println!("{}", text);
//!     Ok(())
//! }
//! ```
//!
//! Speaking a document end to end:
//!
//! ```no_run
//! # #[cfg(feature = "playback")]
//! # fn run() -> pdfvox::Result<()> {
//! use pdfvox::speech::{EspeakSynthesizer, RodioEngine};
//! use pdfvox::{NullSink, ReaderApp};
//!
//! let engine = RodioEngine::new(EspeakSynthesizer::new())?;
//! let mut app = ReaderApp::new(engine);
//! app.load_file("document.pdf", &NullSink)?;
//! app.convert(&NullSink)?;
//! app.play()?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Features
//!
//! - **Page-range extraction**: inclusive 1-indexed ranges with exact
//!   fractional progress reporting
//! - **Workflow state machine**: pure, UI-free transition function
//! - **Speech playback**: play/pause/stop over pluggable engines, voice
//!   selection with replaceable matching strategies
//! - **Text export**: `<name>_text.txt` artifact with spacing preserved

pub mod app;
pub mod error;
pub mod export;
pub mod extract;
pub mod pdf;
pub mod speech;
pub mod status;
pub mod validate;
pub mod workflow;

#[cfg(test)]
pub(crate) mod testing;

// Re-export commonly used types
pub use app::{ReaderApp, Settings};
pub use error::{Error, Result};
pub use export::{format_size, text_artifact_name, write_text_artifact};
pub use extract::{extract_range, CancelToken, PageRange};
pub use pdf::{load_bytes, load_file, DocumentInfo, LopdfSource, PdfSource};
pub use speech::{PlaybackController, PlaybackState, SpeechEngine, VoiceChoice};
pub use status::{NullSink, RecordingSink, Severity, StatusLine, StatusSink};
pub use validate::{validate_upload, Upload, MAX_UPLOAD_BYTES, PDF_MEDIA_TYPE};
pub use workflow::{Conversion, Phase, WorkflowEvent};

use std::path::Path;

/// Extract the text of a page range from a PDF file.
///
/// Convenience wrapper over [`load_file`] and [`extract_range`]; the
/// range is clamped to the document.
pub fn extract_text<P: AsRef<Path>>(path: P, range: PageRange) -> Result<String> {
    let source = load_file(path)?;
    let range = range.clamped_to(source.page_count());
    extract_range(&source, range, &NullSink, &CancelToken::new())
}

/// Extract the full text of a PDF file.
pub fn extract_all_text<P: AsRef<Path>>(path: P) -> Result<String> {
    let source = load_file(path)?;
    let range = PageRange::full(source.page_count());
    extract_range(&source, range, &NullSink, &CancelToken::new())
}
