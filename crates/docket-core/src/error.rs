//! Error types for the docket-core library.

use thiserror::Error;

/// Main error type for the docket library.
#[derive(Error, Debug)]
pub enum DocketError {
    /// Document text source error.
    #[error("source error: {0}")]
    Source(#[from] SourceError),

    /// Tabular sink error.
    #[error("sink error: {0}")]
    Sink(#[from] SinkError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Errors from a document text source.
#[derive(Error, Debug)]
pub enum SourceError {
    /// Failed to open/parse the PDF file.
    #[error("failed to parse PDF: {0}")]
    Pdf(String),

    /// The PDF is encrypted and cannot be processed.
    #[error("PDF is encrypted")]
    Encrypted,

    /// The PDF is empty or has no pages.
    #[error("PDF has no pages")]
    NoPages,

    /// The document produced no non-whitespace text. Distinct from an
    /// empty document so callers can report "needs OCR" by name.
    #[error("no extractable text in {0}")]
    NoExtractableText(String),

    /// I/O error while reading the document.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors from the tabular sink.
#[derive(Error, Debug)]
pub enum SinkError {
    /// CSV encoding/decoding error.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// I/O error while writing or reading.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for the docket library.
pub type Result<T> = std::result::Result<T, DocketError>;
