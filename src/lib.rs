//! # Jurisprudence Metadata Search Engine
//!
//! ## Overview
//! This library extracts structured metadata from unstructured criminal
//! appellate rulings and retrieves matching documents through a
//! multi-criterion, fuzzy-scored search.
//!
//! ## Architecture
//! The system is composed of several key modules:
//! - `extract`: Text extraction from document files (PDF, plain text)
//! - `classify`: Per-field metadata classifiers over ordered pattern rules
//! - `text_processing`: Accent folding, title casing, keyword extraction
//! - `similarity`: Normalized string-similarity scoring
//! - `indexer`: Full index rebuild over a document collection
//! - `storage`: Persistent collection storage (human-readable JSON)
//! - `search`: Multi-criterion query engine with weighted point accumulation
//! - `config`: Configuration management and settings
//! - `errors`: Centralized error handling and types
//!
//! ## Input/Output Specification
//! - **Input**: Ruling documents (PDF/plain text), multi-criterion queries
//! - **Output**: A persisted metadata collection; ranked scored results
//! - **Guarantees**: Deterministic classification and ranking for identical
//!   inputs; a single unreadable document never aborts an indexing run
//!
//! ## Usage
//! ```rust,no_run
//! use jurisprudence_search::{Config, DocumentIndexer, Criteria, search, storage};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::from_file("juris.toml")?;
//!     let indexer = DocumentIndexer::new(&config)?;
//!     indexer.rebuild()?;
//!
//!     let collection = storage::load_collection(&config.indexing.index_path)?;
//!     let criteria = Criteria {
//!         outcome: Some("PROVIDO".to_string()),
//!         ..Criteria::default()
//!     };
//!     let results = search(&collection, &criteria);
//!     println!("Found {} results", results.len());
//!     Ok(())
//! }
//! ```

// Core modules
pub mod classify;
pub mod config;
pub mod errors;
pub mod extract;
pub mod indexer;
pub mod search;
pub mod similarity;
pub mod storage;
pub mod text_processing;

// Re-exports for convenience
pub use config::Config;
pub use errors::{Result, SearchError};
pub use indexer::DocumentIndexer;
pub use search::{search, Criteria, ScoredResult};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Sentinel value stored for every field no classifier rule matched.
pub const UNIDENTIFIED: &str = "UNIDENTIFIED";

/// Procedural category of a judicial filing.
///
/// Each variant serializes to its canonical uppercase label; the same label is
/// what the fuzzy `appeal_type` search criterion compares against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AppealType {
    #[serde(rename = "APELAÇÃO CRIMINAL")]
    CriminalAppeal,
    #[serde(rename = "AGRAVO EM EXECUÇÃO")]
    ExecutionGrievance,
    #[serde(rename = "HABEAS CORPUS")]
    HabeasCorpus,
    #[serde(rename = "RECURSO EM SENTIDO ESTRITO")]
    InterlocutoryAppeal,
    #[serde(rename = "EMBARGOS INFRINGENTES")]
    InfringementMotion,
    #[serde(rename = "REVISÃO CRIMINAL")]
    CriminalReview,
    #[serde(rename = "UNIDENTIFIED")]
    Unidentified,
}

impl AppealType {
    /// Canonical label as it appears in rulings and in the persisted index.
    pub fn label(&self) -> &'static str {
        match self {
            AppealType::CriminalAppeal => "APELAÇÃO CRIMINAL",
            AppealType::ExecutionGrievance => "AGRAVO EM EXECUÇÃO",
            AppealType::HabeasCorpus => "HABEAS CORPUS",
            AppealType::InterlocutoryAppeal => "RECURSO EM SENTIDO ESTRITO",
            AppealType::InfringementMotion => "EMBARGOS INFRINGENTES",
            AppealType::CriminalReview => "REVISÃO CRIMINAL",
            AppealType::Unidentified => UNIDENTIFIED,
        }
    }
}

impl fmt::Display for AppealType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Disposition of a ruling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    #[serde(rename = "PROVIDO")]
    Granted,
    #[serde(rename = "PARCIALMENTE PROVIDO")]
    PartiallyGranted,
    #[serde(rename = "DESPROVIDO")]
    Denied,
    #[serde(rename = "NÃO CONHECIDO")]
    NotConsidered,
    #[serde(rename = "ORDEM CONCEDIDA")]
    OrderGranted,
    #[serde(rename = "ORDEM DENEGADA")]
    OrderDenied,
    #[serde(rename = "UNIDENTIFIED")]
    Unidentified,
}

impl Outcome {
    /// Canonical label as it appears in rulings and in the persisted index.
    pub fn label(&self) -> &'static str {
        match self {
            Outcome::Granted => "PROVIDO",
            Outcome::PartiallyGranted => "PARCIALMENTE PROVIDO",
            Outcome::Denied => "DESPROVIDO",
            Outcome::NotConsidered => "NÃO CONHECIDO",
            Outcome::OrderGranted => "ORDEM CONCEDIDA",
            Outcome::OrderDenied => "ORDEM DENEGADA",
            Outcome::Unidentified => UNIDENTIFIED,
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Party that filed the challenged recourse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Appellant {
    #[serde(rename = "DEFESA")]
    Defense,
    #[serde(rename = "MINISTÉRIO PÚBLICO")]
    Prosecution,
    #[serde(rename = "UNIDENTIFIED")]
    Unidentified,
}

impl Appellant {
    /// Canonical label as it appears in rulings and in the persisted index.
    pub fn label(&self) -> &'static str {
        match self {
            Appellant::Defense => "DEFESA",
            Appellant::Prosecution => "MINISTÉRIO PÚBLICO",
            Appellant::Unidentified => UNIDENTIFIED,
        }
    }
}

impl fmt::Display for Appellant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Metadata record for one indexed ruling document.
///
/// Every field is always present; fields no rule matched hold their
/// `Unidentified` variant or the [`UNIDENTIFIED`] sentinel string.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentRecord {
    /// Relative location of the source document; stable identifier
    pub path: String,
    /// Original filename
    pub display_name: String,
    /// Procedural category of the filing
    pub appeal_type: AppealType,
    /// Formatted case identifier, or the sentinel
    pub case_number: String,
    /// Normalized chamber name, or the sentinel
    pub judging_body: String,
    /// Raw matched date text, or the sentinel
    pub ruling_date: String,
    /// Disposition of the ruling
    pub outcome: Outcome,
    /// Party that filed the recourse
    pub appellant: Appellant,
    /// Topic tags; never empty — holds the sentinel when nothing matched
    pub subject_matters: Vec<String>,
    /// Most frequent salient terms, descending frequency
    pub keywords: Vec<String>,
    /// Source document size
    pub size_bytes: u64,
    /// Record creation time
    pub indexed_at: DateTime<Utc>,
}

/// Persisted collection of document records plus aggregate header.
///
/// Invariant: `documents.len() == total_documents` after every rebuild.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Collection {
    /// Whose rulings the collection covers (e.g. a rapporteur's name)
    pub subject_label: String,
    /// Court or chamber that issued the documents
    pub issuing_body: String,
    /// Free-text description of the collection contents
    pub description: String,
    /// Timestamp of the last successful rebuild
    pub last_updated: DateTime<Utc>,
    /// Number of indexed documents
    pub total_documents: usize,
    /// One record per successfully indexed document, in discovery order
    pub documents: Vec<DocumentRecord>,
}
