//! Conversion workflow.
//!
//! Sequences validation → load → extract → ready. [`Phase`] transitions
//! are a pure function over [`WorkflowEvent`]s so the state machine is
//! testable without any rendering surface; [`Conversion`] is the record
//! that owns the document handle, page range, and extracted text buffer.

use crate::error::{Error, Result};
use crate::extract::{extract_range, CancelToken, PageRange};
use crate::pdf::{DocumentInfo, PdfSource};
use crate::status::{Severity, StatusSink};
use crate::validate::{check_upload, rejection_message, Upload};

/// Workflow phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    /// No document.
    #[default]
    Empty,
    /// Document loaded, range configurable, conversion available.
    Loaded,
    /// Extraction in flight.
    Extracting,
    /// Text available for playback and download.
    Ready,
}

/// Input to the phase transition function.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkflowEvent {
    DocumentLoaded { page_count: u32 },
    ExtractionStarted,
    ExtractionSucceeded,
    ExtractionFailed,
    Reset,
}

impl Phase {
    /// Pure, total transition function. Events that make no sense in the
    /// current phase leave it unchanged.
    pub fn apply(self, event: &WorkflowEvent) -> Phase {
        match (self, event) {
            (_, WorkflowEvent::Reset) => Phase::Empty,
            // A new document may replace the current one at any settled
            // point, but not while an extraction is in flight.
            (Phase::Extracting, WorkflowEvent::DocumentLoaded { .. }) => Phase::Extracting,
            (_, WorkflowEvent::DocumentLoaded { .. }) => Phase::Loaded,
            (Phase::Loaded, WorkflowEvent::ExtractionStarted) => Phase::Extracting,
            (Phase::Extracting, WorkflowEvent::ExtractionSucceeded) => Phase::Ready,
            (Phase::Extracting, WorkflowEvent::ExtractionFailed) => Phase::Loaded,
            (phase, _) => phase,
        }
    }
}

/// One document's journey from upload to playable text.
///
/// Owns the document handle exclusively for its lifetime; the handle is
/// created on successful load and dropped on reset. The text buffer only
/// changes on a successful extraction — failures never expose partial
/// results.
#[derive(Default)]
pub struct Conversion {
    phase: Phase,
    source: Option<Box<dyn PdfSource>>,
    file_name: String,
    page_count: u32,
    range: Option<PageRange>,
    text: String,
}

impl Conversion {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn page_count(&self) -> u32 {
        self.page_count
    }

    /// Original file name of the loaded document.
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// The extracted text; empty until a conversion succeeds.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// The configured page range; covers the whole document after a load.
    pub fn range(&self) -> Option<PageRange> {
        self.range
    }

    pub fn document_info(&self) -> Option<DocumentInfo> {
        self.source.as_deref().map(|s| s.info())
    }

    /// Set the page range, clamping it into the document. Ignored while no
    /// document is loaded. Returns the range actually recorded.
    pub fn set_range(&mut self, range: PageRange) -> Option<PageRange> {
        if self.source.is_none() {
            return None;
        }
        let corrected = range.clamped_to(self.page_count);
        self.range = Some(corrected);
        Some(corrected)
    }

    /// Validate and load a document from bytes.
    ///
    /// On success records the page count, initializes the range to the
    /// full document, and moves to [`Phase::Loaded`]. On any failure the
    /// prior state is untouched and an error status is emitted.
    pub fn load_bytes(&mut self, upload: &Upload, data: &[u8], sink: &dyn StatusSink) -> Result<()> {
        if let Err(err) = check_upload(upload) {
            sink.status(rejection_message(&err), Severity::Error);
            return Err(err);
        }

        sink.status("Loading PDF...", Severity::Info);
        match crate::pdf::load_bytes(data) {
            Ok(source) => {
                self.page_count = source.page_count();
                self.source = Some(Box::new(source));
                self.file_name = upload.name.clone();
                self.range = Some(PageRange::full(self.page_count));
                self.text.clear();
                self.phase = self.phase.apply(&WorkflowEvent::DocumentLoaded {
                    page_count: self.page_count,
                });
                sink.status("PDF loaded successfully!", Severity::Success);
                Ok(())
            }
            Err(err) => {
                log::warn!("load failed for {:?}: {}", upload.name, err);
                sink.status(
                    "Error loading PDF. Please try a different file.",
                    Severity::Error,
                );
                Err(err)
            }
        }
    }

    /// Validate and load a document from a file on disk.
    pub fn load_file(
        &mut self,
        path: impl AsRef<std::path::Path>,
        sink: &dyn StatusSink,
    ) -> Result<()> {
        let path = path.as_ref();
        let upload = Upload::from_path(path)?;
        if let Err(err) = check_upload(&upload) {
            sink.status(rejection_message(&err), Severity::Error);
            return Err(err);
        }
        let data = std::fs::read(path)?;
        self.load_bytes(&upload, &data, sink)
    }

    /// Attach an already-decoded source, for callers that bring their own
    /// [`PdfSource`] implementation.
    pub fn load_source(&mut self, name: impl Into<String>, source: Box<dyn PdfSource>) {
        self.page_count = source.page_count();
        self.source = Some(source);
        self.file_name = name.into();
        self.range = Some(PageRange::full(self.page_count));
        self.text.clear();
        self.phase = self.phase.apply(&WorkflowEvent::DocumentLoaded {
            page_count: self.page_count,
        });
    }

    /// Run the page-range extraction.
    ///
    /// A no-op unless a document is loaded and no text is ready yet. On
    /// success the text buffer is replaced and the phase moves to
    /// [`Phase::Ready`]; on failure the phase returns to [`Phase::Loaded`]
    /// so the conversion can be retried with a different range.
    pub fn convert(&mut self, sink: &dyn StatusSink, cancel: &CancelToken) -> Result<()> {
        if self.phase != Phase::Loaded {
            return Ok(());
        }
        let (Some(source), Some(range)) = (self.source.as_deref(), self.range) else {
            return Ok(());
        };

        // The phase must already read Extracting while pages are walked.
        self.phase = self.phase.apply(&WorkflowEvent::ExtractionStarted);
        sink.progress(0.0, "Extracting text from PDF...");
        let result = extract_range(source, range, sink, cancel);

        match result {
            Ok(text) => {
                self.text = text;
                self.phase = self.phase.apply(&WorkflowEvent::ExtractionSucceeded);
                sink.progress(100.0, "Text extraction complete!");
                sink.status(
                    "Text extraction complete! You can now play the audio or download the text.",
                    Severity::Success,
                );
                Ok(())
            }
            Err(err) => {
                self.phase = self.phase.apply(&WorkflowEvent::ExtractionFailed);
                sink.status(&format!("Conversion failed: {}", err), Severity::Error);
                Err(err)
            }
        }
    }

    /// Drop the document handle, clear the text buffer and range, and
    /// return to [`Phase::Empty`].
    pub fn reset(&mut self) {
        self.phase = self.phase.apply(&WorkflowEvent::Reset);
        self.source = None;
        self.file_name.clear();
        self.page_count = 0;
        self.range = None;
        self.text.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::status::{NullSink, RecordingSink};
    use crate::testing::FakeSource;
    use crate::validate::PDF_MEDIA_TYPE;

    fn loaded_conversion(pages: &[&[&str]]) -> Conversion {
        let mut conversion = Conversion::new();
        conversion.load_source("book.pdf", Box::new(FakeSource::new(pages)));
        conversion
    }

    #[test]
    fn test_phase_transitions() {
        let phase = Phase::Empty;
        let phase = phase.apply(&WorkflowEvent::DocumentLoaded { page_count: 3 });
        assert_eq!(phase, Phase::Loaded);
        let phase = phase.apply(&WorkflowEvent::ExtractionStarted);
        assert_eq!(phase, Phase::Extracting);
        let phase = phase.apply(&WorkflowEvent::ExtractionSucceeded);
        assert_eq!(phase, Phase::Ready);
        assert_eq!(phase.apply(&WorkflowEvent::Reset), Phase::Empty);
    }

    #[test]
    fn test_phase_failure_returns_to_loaded() {
        let phase = Phase::Extracting.apply(&WorkflowEvent::ExtractionFailed);
        assert_eq!(phase, Phase::Loaded);
    }

    #[test]
    fn test_phase_ignores_nonsense_events() {
        assert_eq!(
            Phase::Empty.apply(&WorkflowEvent::ExtractionStarted),
            Phase::Empty
        );
        assert_eq!(
            Phase::Ready.apply(&WorkflowEvent::ExtractionStarted),
            Phase::Ready
        );
        assert_eq!(
            Phase::Extracting.apply(&WorkflowEvent::DocumentLoaded { page_count: 1 }),
            Phase::Extracting
        );
    }

    #[test]
    fn test_reset_available_from_every_phase() {
        for phase in [Phase::Empty, Phase::Loaded, Phase::Extracting, Phase::Ready] {
            assert_eq!(phase.apply(&WorkflowEvent::Reset), Phase::Empty);
        }
    }

    #[test]
    fn test_validation_failure_never_reaches_loader() {
        let mut conversion = Conversion::new();
        let sink = RecordingSink::new();
        let upload = Upload::new("notes.txt", "text/plain", 10);

        let result = conversion.load_bytes(&upload, b"%PDF-1.7 irrelevant", &sink);
        assert!(matches!(result, Err(Error::UnknownFormat)));
        assert_eq!(conversion.phase(), Phase::Empty);
        // Only the rejection message; no "Loading PDF..." from the loader.
        assert_eq!(
            sink.messages(),
            vec![("Please select a PDF file.".to_string(), Severity::Error)]
        );
    }

    #[test]
    fn test_oversized_upload_rejected() {
        let mut conversion = Conversion::new();
        let sink = RecordingSink::new();
        let upload = Upload::new("big.pdf", PDF_MEDIA_TYPE, 51 * 1024 * 1024);

        let result = conversion.load_bytes(&upload, b"%PDF-1.7", &sink);
        assert!(matches!(result, Err(Error::FileTooLarge(..))));
        assert_eq!(conversion.phase(), Phase::Empty);
    }

    #[test]
    fn test_load_failure_leaves_prior_state() {
        let mut conversion = loaded_conversion(&[&["kept"]]);
        let sink = RecordingSink::new();
        let upload = Upload::new("broken.pdf", PDF_MEDIA_TYPE, 8);

        let result = conversion.load_bytes(&upload, b"%PDF-1.7\n", &sink);
        assert!(result.is_err());
        assert_eq!(conversion.phase(), Phase::Loaded);
        assert_eq!(conversion.file_name(), "book.pdf");
        assert_eq!(conversion.page_count(), 1);
        assert_eq!(
            sink.last_message(),
            Some((
                "Error loading PDF. Please try a different file.".to_string(),
                Severity::Error
            ))
        );
    }

    #[test]
    fn test_load_source_initializes_full_range() {
        let conversion = loaded_conversion(&[&["a"], &["b"], &["c"]]);
        assert_eq!(conversion.phase(), Phase::Loaded);
        assert_eq!(conversion.page_count(), 3);
        let range = conversion.range().unwrap();
        assert_eq!((range.start(), range.end()), (1, 3));
    }

    #[test]
    fn test_convert_success_reaches_ready() {
        let mut conversion = loaded_conversion(&[&["Hello"], &["World"], &[]]);
        let sink = RecordingSink::new();
        conversion.convert(&sink, &CancelToken::new()).unwrap();

        assert_eq!(conversion.phase(), Phase::Ready);
        assert_eq!(conversion.text(), "Hello World  ");
        assert!(matches!(
            sink.last_message(),
            Some((_, Severity::Success))
        ));
    }

    #[test]
    fn test_convert_failure_keeps_buffer_and_reenables() {
        let mut conversion = loaded_conversion(&[&["   "]]);
        let sink = RecordingSink::new();

        let result = conversion.convert(&sink, &CancelToken::new());
        assert!(matches!(result, Err(Error::NoText)));
        assert_eq!(conversion.phase(), Phase::Loaded);
        assert_eq!(conversion.text(), "");
        assert_eq!(
            sink.last_message(),
            Some((
                "Conversion failed: No text found in the selected pages".to_string(),
                Severity::Error
            ))
        );
    }

    #[test]
    fn test_convert_respects_configured_range() {
        let mut conversion = loaded_conversion(&[&["one"], &["two"], &["three"]]);
        conversion.set_range(PageRange::new(2, 2));
        conversion.convert(&NullSink, &CancelToken::new()).unwrap();
        assert_eq!(conversion.text(), "two ");
    }

    #[test]
    fn test_set_range_clamps_to_document() {
        let mut conversion = loaded_conversion(&[&["a"], &["b"]]);
        let recorded = conversion.set_range(PageRange::new(1, 50)).unwrap();
        assert_eq!((recorded.start(), recorded.end()), (1, 2));
    }

    #[test]
    fn test_set_range_ignored_when_empty() {
        let mut conversion = Conversion::new();
        assert!(conversion.set_range(PageRange::new(1, 2)).is_none());
    }

    #[test]
    fn test_convert_noop_without_document() {
        let mut conversion = Conversion::new();
        assert!(conversion.convert(&NullSink, &CancelToken::new()).is_ok());
        assert_eq!(conversion.phase(), Phase::Empty);
    }

    #[test]
    fn test_cancelled_conversion_fails_cleanly() {
        let mut conversion = loaded_conversion(&[&["text"]]);
        let cancel = CancelToken::new();
        cancel.cancel();
        let result = conversion.convert(&NullSink, &cancel);
        assert!(matches!(result, Err(Error::Cancelled)));
        assert_eq!(conversion.phase(), Phase::Loaded);
        assert_eq!(conversion.text(), "");
    }

    #[test]
    fn test_phase_is_extracting_while_pages_are_read() {
        use std::panic::{catch_unwind, AssertUnwindSafe};

        // Unwinding out of the page walk freezes the phase as it was
        // during extraction.
        struct HaltingSource;

        impl crate::pdf::PdfSource for HaltingSource {
            fn page_count(&self) -> u32 {
                1
            }

            fn page_fragments(&self, _page: u32) -> crate::error::Result<Vec<String>> {
                panic!("halt mid-extraction");
            }

            fn info(&self) -> crate::pdf::DocumentInfo {
                crate::pdf::DocumentInfo {
                    page_count: 1,
                    version: "1.7".to_string(),
                    encrypted: false,
                    title: None,
                }
            }
        }

        let mut conversion = Conversion::new();
        conversion.load_source("book.pdf", Box::new(HaltingSource));

        let unwound = catch_unwind(AssertUnwindSafe(|| {
            conversion.convert(&NullSink, &CancelToken::new())
        }));
        assert!(unwound.is_err());
        assert_eq!(conversion.phase(), Phase::Extracting);
    }

    #[test]
    fn test_reset_restores_initial_state() {
        let mut conversion = loaded_conversion(&[&["Hello"]]);
        conversion.convert(&NullSink, &CancelToken::new()).unwrap();
        assert_eq!(conversion.phase(), Phase::Ready);

        conversion.reset();
        assert_eq!(conversion.phase(), Phase::Empty);
        assert_eq!(conversion.text(), "");
        assert_eq!(conversion.file_name(), "");
        assert_eq!(conversion.page_count(), 0);
        assert!(conversion.range().is_none());
        assert!(conversion.document_info().is_none());
    }

    #[test]
    fn test_reload_replaces_document() {
        let mut conversion = loaded_conversion(&[&["old"]]);
        conversion.load_source("new.pdf", Box::new(FakeSource::new(&[&["x"], &["y"]])));
        assert_eq!(conversion.page_count(), 2);
        assert_eq!(conversion.file_name(), "new.pdf");
        assert_eq!(conversion.phase(), Phase::Loaded);
    }
}
