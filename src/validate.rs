//! Upload validation.
//!
//! Checks a candidate file's declared media type and byte size against
//! fixed limits before any PDF decoding happens.

use crate::status::{Severity, StatusSink};
use std::path::Path;

/// The only accepted media type.
pub const PDF_MEDIA_TYPE: &str = "application/pdf";

/// Maximum accepted file size: 50 MiB.
pub const MAX_UPLOAD_BYTES: u64 = 50 * 1024 * 1024;

/// Descriptor of a candidate file, independent of where the bytes live.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Upload {
    /// Original file name, used for the text artifact name later.
    pub name: String,
    /// Declared media type (e.g. `application/pdf`).
    pub media_type: String,
    /// Size in bytes.
    pub size: u64,
}

impl Upload {
    pub fn new(name: impl Into<String>, media_type: impl Into<String>, size: u64) -> Self {
        Self {
            name: name.into(),
            media_type: media_type.into(),
            size,
        }
    }

    /// Build a descriptor from a file on disk, deriving the media type
    /// from the extension.
    pub fn from_path<P: AsRef<Path>>(path: P) -> std::io::Result<Self> {
        let path = path.as_ref();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        let media_type = match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("pdf") => PDF_MEDIA_TYPE,
            _ => "application/octet-stream",
        };
        let size = std::fs::metadata(path)?.len();
        Ok(Self::new(name, media_type, size))
    }
}

/// Typed validation of an upload descriptor.
pub fn check_upload(upload: &Upload) -> crate::error::Result<()> {
    if upload.media_type != PDF_MEDIA_TYPE {
        return Err(crate::error::Error::UnknownFormat);
    }
    if upload.size > MAX_UPLOAD_BYTES {
        return Err(crate::error::Error::FileTooLarge(
            upload.size,
            MAX_UPLOAD_BYTES,
        ));
    }
    Ok(())
}

/// The user-facing message for a validation rejection.
pub fn rejection_message(err: &crate::error::Error) -> &'static str {
    match err {
        crate::error::Error::FileTooLarge(..) => "File size exceeds 50MB limit.",
        _ => "Please select a PDF file.",
    }
}

/// Validate an upload descriptor.
///
/// Returns `false` and emits an error status when the media type is not
/// PDF or the size exceeds [`MAX_UPLOAD_BYTES`]. No error is raised to the
/// caller beyond the boolean result, so rejection leaves all state
/// untouched.
pub fn validate_upload(upload: &Upload, sink: &dyn StatusSink) -> bool {
    match check_upload(upload) {
        Ok(()) => true,
        Err(err) => {
            sink.status(rejection_message(&err), Severity::Error);
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::status::RecordingSink;

    #[test]
    fn test_accepts_pdf_within_limit() {
        let sink = RecordingSink::new();
        let upload = Upload::new("report.pdf", PDF_MEDIA_TYPE, 1024);
        assert!(validate_upload(&upload, &sink));
        assert!(sink.messages().is_empty());
    }

    #[test]
    fn test_rejects_wrong_media_type() {
        let sink = RecordingSink::new();
        let upload = Upload::new("notes.txt", "text/plain", 10);
        assert!(!validate_upload(&upload, &sink));
        assert_eq!(
            sink.last_message(),
            Some(("Please select a PDF file.".to_string(), Severity::Error))
        );
    }

    #[test]
    fn test_rejects_oversized_file() {
        let sink = RecordingSink::new();
        let upload = Upload::new("big.pdf", PDF_MEDIA_TYPE, MAX_UPLOAD_BYTES + 1);
        assert!(!validate_upload(&upload, &sink));
        assert_eq!(
            sink.last_message(),
            Some(("File size exceeds 50MB limit.".to_string(), Severity::Error))
        );
    }

    #[test]
    fn test_accepts_exact_limit() {
        let sink = RecordingSink::new();
        let upload = Upload::new("edge.pdf", PDF_MEDIA_TYPE, MAX_UPLOAD_BYTES);
        assert!(validate_upload(&upload, &sink));
    }

    #[test]
    fn test_from_path_derives_media_type() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sample.PDF");
        std::fs::write(&path, b"%PDF-1.4").unwrap();

        let upload = Upload::from_path(&path).unwrap();
        assert_eq!(upload.media_type, PDF_MEDIA_TYPE);
        assert_eq!(upload.size, 8);
        assert_eq!(upload.name, "sample.PDF");
    }

    #[test]
    fn test_from_path_other_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sample.docx");
        std::fs::write(&path, b"zzzz").unwrap();

        let upload = Upload::from_path(&path).unwrap();
        assert_eq!(upload.media_type, "application/octet-stream");
    }
}
