//! # Text Extraction Module
//!
//! ## Purpose
//! Obtains the full text content of a ruling document file. Extraction is the
//! only I/O boundary inside the indexing pipeline: any failure here is
//! reported to the indexer, which skips the document and continues.
//!
//! ## Input/Output Specification
//! - **Input**: Path to a document file (PDF or plain text)
//! - **Output**: NFC-normalized UTF-8 text, or `ExtractionFailed`
//! - **Contract**: An empty extraction result is treated by the caller the
//!   same as a failure

use crate::errors::{Result, SearchError};
use std::path::Path;
use unicode_normalization::UnicodeNormalization;

/// Text extraction from a document file.
///
/// Implementations must be safe to call from multiple indexing workers.
pub trait TextExtractor: Send + Sync {
    /// Extract the full text of the document at `path`
    fn extract_text(&self, path: &Path) -> Result<String>;
}

/// PDF text extraction backed by the `pdf-extract` crate
pub struct PdfTextExtractor;

impl TextExtractor for PdfTextExtractor {
    fn extract_text(&self, path: &Path) -> Result<String> {
        let text = pdf_extract::extract_text(path).map_err(|e| SearchError::ExtractionFailed {
            path: path.to_path_buf(),
            details: e.to_string(),
        })?;
        Ok(normalize(&text))
    }
}

/// Plain-text file extraction (UTF-8)
pub struct PlainTextExtractor;

impl TextExtractor for PlainTextExtractor {
    fn extract_text(&self, path: &Path) -> Result<String> {
        let text = std::fs::read_to_string(path).map_err(|e| SearchError::ExtractionFailed {
            path: path.to_path_buf(),
            details: e.to_string(),
        })?;
        Ok(normalize(&text))
    }
}

/// Dispatches to the extractor matching the file extension
pub struct ExtensionRouter;

impl TextExtractor for ExtensionRouter {
    fn extract_text(&self, path: &Path) -> Result<String> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())
            .unwrap_or_default();

        match extension.as_str() {
            "pdf" => PdfTextExtractor.extract_text(path),
            "txt" => PlainTextExtractor.extract_text(path),
            other => Err(SearchError::ExtractionFailed {
                path: path.to_path_buf(),
                details: format!("unsupported document extension: '{}'", other),
            }),
        }
    }
}

/// NFC-normalize extracted text so classifier patterns see composed
/// accented characters regardless of the source encoding
fn normalize(text: &str) -> String {
    text.nfc().collect()
}
