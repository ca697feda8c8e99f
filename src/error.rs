//! Error types for the pdfvox library.

use std::io;
use thiserror::Error;

/// Result type alias for pdfvox operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while converting a document to speech.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The file is not recognized as a PDF.
    #[error("Not a PDF file")]
    UnknownFormat,

    /// The file exceeds the upload size limit.
    #[error("File size {0} bytes exceeds the {1} byte limit")]
    FileTooLarge(u64, u64),

    /// The document could not be decoded by the PDF library.
    #[error("Could not load PDF: {0}")]
    Load(String),

    /// The selected page range contains no extractable text.
    #[error("No text found in the selected pages")]
    NoText,

    /// Invalid page range specification.
    #[error("Invalid page range: {0}")]
    InvalidPageRange(String),

    /// Page number is out of range.
    #[error("Page {0} is out of range (document has {1} pages)")]
    PageOutOfRange(u32, u32),

    /// An in-flight extraction was cancelled.
    #[error("Extraction cancelled")]
    Cancelled,

    /// The speech engine reported a failure.
    #[error("Speech synthesis failed: {0}")]
    Speech(String),
}

impl From<lopdf::Error> for Error {
    fn from(err: lopdf::Error) -> Self {
        match err {
            lopdf::Error::IO(e) => Error::Io(e),
            _ => Error::Load(err.to_string()),
        }
    }
}
