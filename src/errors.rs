//! # Error Handling Module
//!
//! ## Purpose
//! Centralized error handling for the jurisprudence search engine, providing
//! structured error types and conversion utilities for all system components.
//!
//! ## Input/Output Specification
//! - **Input**: Error conditions from extraction, classification, storage,
//!   and search components
//! - **Output**: Structured error types with context and error chains
//! - **Error Categories**: Extraction, Indexing, Storage, Search, Configuration
//!
//! ## Recovery Model
//! A single document's extraction failure is recovered locally inside the
//! indexer (the document is skipped and the run continues). A missing index at
//! search time surfaces as an explicit, actionable `IndexMissing` failure —
//! never as an empty result set.

use std::path::PathBuf;
use thiserror::Error;

/// Result type used throughout the application
pub type Result<T> = std::result::Result<T, SearchError>;

/// Error types for the jurisprudence search engine
#[derive(Debug, Error)]
pub enum SearchError {
    /// Text could not be obtained from a single document
    #[error("Failed to extract text from {path:?}: {details}")]
    ExtractionFailed { path: PathBuf, details: String },

    /// Search invoked before any successful rebuild
    #[error(
        "Index not found at {path:?}: run `juris index` before searching"
    )]
    IndexMissing { path: PathBuf },

    /// A query criterion value has the wrong shape
    #[error("Invalid value for criterion '{criterion}': {reason}")]
    InvalidCriterion { criterion: String, reason: String },

    /// A classifier pattern failed to compile
    #[error("Invalid classifier pattern for '{field}': {details}")]
    Classifier { field: String, details: String },

    /// Configuration errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Generic I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing errors
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),
}

impl SearchError {
    /// Get error category for logging
    pub fn category(&self) -> &'static str {
        match self {
            SearchError::ExtractionFailed { .. } => "extraction",
            SearchError::IndexMissing { .. } => "storage",
            SearchError::InvalidCriterion { .. } => "search",
            SearchError::Classifier { .. } => "classification",
            SearchError::Config { .. } | SearchError::Toml(_) => "configuration",
            SearchError::Io(_) | SearchError::Json(_) => "io",
        }
    }

    /// Whether the indexer may recover by skipping the current document
    pub fn is_recoverable(&self) -> bool {
        matches!(self, SearchError::ExtractionFailed { .. })
    }
}
