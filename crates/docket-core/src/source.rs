//! Document text sources.
//!
//! A source returns best-effort plain text for a document, already
//! newline-normalized, or signals `NoExtractableText` so callers can
//! tell an image-only scan apart from an empty document. OCR is out of
//! scope; an OCR-backed source can implement the same trait.

use std::fs;
use std::path::Path;

use lopdf::Document;
use tracing::debug;

use crate::error::SourceError;
use crate::text::normalize_newlines;

/// Result type for source operations.
pub type Result<T> = std::result::Result<T, SourceError>;

/// A provider of plain document text.
pub trait DocumentSource {
    /// Best-effort text for the document at `path`, `\n`-delimited.
    fn fetch_text(&self, path: &Path) -> Result<String>;
}

fn document_name(path: &Path) -> String {
    path.file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("document")
        .to_string()
}

/// Normalize line endings and enforce the no-silent-empty contract.
fn finalize(path: &Path, text: &str) -> Result<String> {
    let clean = normalize_newlines(text);
    if clean.trim().is_empty() {
        return Err(SourceError::NoExtractableText(document_name(path)));
    }
    Ok(clean)
}

/// Text source for PDFs with embedded text.
///
/// lopdf validates the document (encryption, page count) and handles
/// empty-password encryption; pdf-extract does the text extraction.
pub struct PdfTextSource;

impl PdfTextSource {
    pub fn new() -> Self {
        Self
    }
}

impl Default for PdfTextSource {
    fn default() -> Self {
        Self::new()
    }
}

impl DocumentSource for PdfTextSource {
    fn fetch_text(&self, path: &Path) -> Result<String> {
        let data = fs::read(path)?;
        let mut doc = Document::load_mem(&data).map_err(|e| SourceError::Pdf(e.to_string()))?;

        let data = if doc.is_encrypted() {
            if doc.decrypt("").is_err() {
                return Err(SourceError::Encrypted);
            }
            debug!("decrypted PDF with empty password");
            let mut decrypted = Vec::new();
            doc.save_to(&mut decrypted)
                .map_err(|e| SourceError::Pdf(e.to_string()))?;
            decrypted
        } else {
            data
        };

        if doc.get_pages().is_empty() {
            return Err(SourceError::NoPages);
        }

        let text = pdf_extract::extract_text_from_mem(&data)
            .map_err(|e| SourceError::Pdf(e.to_string()))?;
        finalize(path, &text)
    }
}

/// Text source for pre-extracted `.txt` documents. Useful for fixtures
/// and for re-running extraction on captured debug text.
pub struct TextFileSource;

impl TextFileSource {
    pub fn new() -> Self {
        Self
    }
}

impl Default for TextFileSource {
    fn default() -> Self {
        Self::new()
    }
}

impl DocumentSource for TextFileSource {
    fn fetch_text(&self, path: &Path) -> Result<String> {
        let text = fs::read_to_string(path)?;
        finalize(path, &text)
    }
}
