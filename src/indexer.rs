//! # Indexing Pipeline Module
//!
//! ## Purpose
//! Rebuilds the persisted metadata collection from scratch: discovers ruling
//! documents, extracts their text, classifies every metadata field, and
//! persists the assembled collection atomically.
//!
//! ## Input/Output Specification
//! - **Input**: A documents directory and indexing configuration
//! - **Output**: A [`Collection`] persisted at the configured index path
//! - **Guarantees**: A rebuild is always full (never incremental); record
//!   order follows lexicographic path order regardless of worker scheduling;
//!   a document whose extraction fails is skipped with a warning and never
//!   aborts the run
//!
//! ## Pipeline Stages
//! 1. Discovery: scan the documents directory for supported extensions
//! 2. Fan-out: extract + classify each document on a worker pool
//! 3. Assembly: join results in discovery order, dropping failures
//! 4. Persistence: write the collection atomically

use crate::classify::FieldClassifiers;
use crate::config::Config;
use crate::errors::{Result, SearchError};
use crate::extract::{ExtensionRouter, TextExtractor};
use crate::storage;
use crate::text_processing::KeywordExtractor;
use crate::{Collection, DocumentRecord};
use chrono::Utc;
use rayon::prelude::*;
use std::path::{Path, PathBuf};

/// Full-rebuild document indexer.
///
/// Classifier rules and the keyword stopword set are compiled once at
/// construction and shared read-only across all workers.
pub struct DocumentIndexer {
    classifiers: FieldClassifiers,
    keyword_extractor: KeywordExtractor,
    extractor: ExtensionRouter,
    pool: rayon::ThreadPool,
    config: Config,
}

impl DocumentIndexer {
    /// Create an indexer from validated configuration
    pub fn new(config: &Config) -> Result<Self> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(config.performance.worker_threads)
            .build()
            .map_err(|e| SearchError::Config {
                message: format!("Failed to build worker pool: {}", e),
            })?;

        Ok(Self {
            classifiers: FieldClassifiers::new()?,
            keyword_extractor: KeywordExtractor::new(),
            extractor: ExtensionRouter,
            pool,
            config: config.clone(),
        })
    }

    /// Rebuild the collection from the documents directory and persist it.
    ///
    /// Returns the assembled collection. Individual document failures are
    /// logged and skipped; only discovery or persistence failures abort the
    /// run.
    pub fn rebuild(&self) -> Result<Collection> {
        let started = std::time::Instant::now();
        let paths = self.discover_documents()?;
        let discovered = paths.len();

        tracing::info!(
            documents = discovered,
            directory = %self.config.indexing.documents_dir.display(),
            "Starting index rebuild"
        );

        // Ordered fan-out: par_iter keeps item order through collect, so the
        // record sequence matches discovery order whatever the worker
        // scheduling was
        let documents: Vec<DocumentRecord> = self.pool.install(|| {
            paths
                .par_iter()
                .filter_map(|path| match self.index_document(path) {
                    Ok(record) => Some(record),
                    Err(e) => {
                        tracing::warn!(
                            path = %path.display(),
                            error = %e,
                            "Skipping document"
                        );
                        None
                    }
                })
                .collect()
        });

        let indexed = documents.len();
        let collection = Collection {
            subject_label: self.config.collection.subject_label.clone(),
            issuing_body: self.config.collection.issuing_body.clone(),
            description: self.config.collection.description.clone(),
            last_updated: Utc::now(),
            total_documents: indexed,
            documents,
        };

        storage::save_collection(&collection, &self.config.indexing.index_path)?;

        tracing::info!(
            indexed,
            skipped = discovered - indexed,
            elapsed_ms = started.elapsed().as_millis() as u64,
            index_path = %self.config.indexing.index_path.display(),
            "Index rebuild complete"
        );

        Ok(collection)
    }

    /// Scan the documents directory for files with a supported extension,
    /// sorted lexicographically by path
    fn discover_documents(&self) -> Result<Vec<PathBuf>> {
        let dir = &self.config.indexing.documents_dir;
        let mut paths = Vec::new();

        for entry in std::fs::read_dir(dir)? {
            let entry = entry?;
            let path = entry.path();
            if !path.is_file() {
                continue;
            }
            let extension = path
                .extension()
                .and_then(|e| e.to_str())
                .map(|e| e.to_lowercase())
                .unwrap_or_default();
            if self.config.indexing.extensions.contains(&extension) {
                paths.push(path);
            }
        }

        paths.sort();
        Ok(paths)
    }

    /// Extract and classify one document into a metadata record
    fn index_document(&self, path: &Path) -> Result<DocumentRecord> {
        let text = self.extractor.extract_text(path)?;
        if text.chars().count() < self.config.indexing.min_text_length {
            return Err(SearchError::ExtractionFailed {
                path: path.to_path_buf(),
                details: format!(
                    "extracted text too short ({} chars)",
                    text.chars().count()
                ),
            });
        }

        let fields = self.classifiers.classify(&text);
        let keywords = self
            .keyword_extractor
            .extract(&text, self.config.indexing.keyword_limit);
        let size_bytes = std::fs::metadata(path)?.len();

        let display_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.to_string_lossy().into_owned());

        Ok(DocumentRecord {
            path: path.to_string_lossy().into_owned(),
            display_name,
            appeal_type: fields.appeal_type,
            case_number: fields.case_number,
            judging_body: fields.judging_body,
            ruling_date: fields.ruling_date,
            outcome: fields.outcome,
            appellant: fields.appellant,
            subject_matters: fields.subject_matters,
            keywords,
            size_bytes,
            indexed_at: Utc::now(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{AppealType, Appellant, Outcome, UNIDENTIFIED};
    use std::fs;

    const RULING: &str = "\
APELAÇÃO CRIMINAL Nº 0012345-67.2021.8.19.0001\n\
QUARTA CÂMARA CRIMINAL\n\
APELANTE: JOÃO DA SILVA, REPRESENTADO PELA DEFENSORIA PÚBLICA\n\
Rio de Janeiro, 12/03/2021\n\
Crime de roubo majorado, art. 157 do Código Penal.\n\
RECURSO CONHECIDO E PROVIDO.\n";

    fn test_config(root: &Path) -> Config {
        let mut config = Config::default();
        config.indexing.documents_dir = root.join("documents");
        config.indexing.index_path = root.join("metadata/index.json");
        config.performance.worker_threads = 2;
        config
    }

    fn write_document(config: &Config, name: &str, content: &str) {
        fs::create_dir_all(&config.indexing.documents_dir).unwrap();
        fs::write(config.indexing.documents_dir.join(name), content).unwrap();
    }

    #[test]
    fn rebuild_classifies_and_persists_records() {
        let dir = tempfile::tempdir().unwrap();
        let config = test_config(dir.path());
        write_document(&config, "acordao.txt", RULING);

        let indexer = DocumentIndexer::new(&config).unwrap();
        let collection = indexer.rebuild().unwrap();

        assert_eq!(collection.total_documents, 1);
        let record = &collection.documents[0];
        assert_eq!(record.appeal_type, AppealType::CriminalAppeal);
        assert_eq!(record.case_number, "0012345-67.2021.8.19.0001");
        assert_eq!(record.judging_body, "Quarta Câmara Criminal");
        assert_eq!(record.ruling_date, "12/03/2021");
        assert_eq!(record.outcome, Outcome::Granted);
        assert_eq!(record.appellant, Appellant::Defense);
        assert!(record.subject_matters.contains(&"ROUBO".to_string()));
        assert!(record.size_bytes > 0);

        // Rebuild output must round-trip through storage unchanged
        let loaded = storage::load_collection(&config.indexing.index_path).unwrap();
        assert_eq!(loaded.total_documents, 1);
        assert_eq!(loaded.documents[0].case_number, record.case_number);
    }

    #[test]
    fn records_follow_lexicographic_path_order() {
        let dir = tempfile::tempdir().unwrap();
        let config = test_config(dir.path());
        write_document(&config, "c.txt", RULING);
        write_document(&config, "a.txt", RULING);
        write_document(&config, "b.txt", RULING);

        let indexer = DocumentIndexer::new(&config).unwrap();
        let collection = indexer.rebuild().unwrap();

        let names: Vec<&str> = collection
            .documents
            .iter()
            .map(|d| d.display_name.as_str())
            .collect();
        assert_eq!(names, vec!["a.txt", "b.txt", "c.txt"]);
    }

    #[test]
    fn unreadable_document_is_skipped_not_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = test_config(dir.path());
        config.indexing.min_text_length = 10;
        write_document(&config, "good.txt", RULING);
        write_document(&config, "empty.txt", "");

        let indexer = DocumentIndexer::new(&config).unwrap();
        let collection = indexer.rebuild().unwrap();

        assert_eq!(collection.total_documents, 1);
        assert_eq!(collection.documents[0].display_name, "good.txt");
    }

    #[test]
    fn unsupported_extensions_are_not_discovered() {
        let dir = tempfile::tempdir().unwrap();
        let config = test_config(dir.path());
        write_document(&config, "ruling.txt", RULING);
        write_document(&config, "notes.md", "not a ruling");

        let indexer = DocumentIndexer::new(&config).unwrap();
        let collection = indexer.rebuild().unwrap();
        assert_eq!(collection.total_documents, 1);
    }

    #[test]
    fn unmatched_fields_hold_the_sentinel() {
        let dir = tempfile::tempdir().unwrap();
        let config = test_config(dir.path());
        write_document(&config, "plain.txt", "texto sem qualquer marcador juridico");

        let indexer = DocumentIndexer::new(&config).unwrap();
        let collection = indexer.rebuild().unwrap();

        let record = &collection.documents[0];
        assert_eq!(record.appeal_type, AppealType::Unidentified);
        assert_eq!(record.case_number, UNIDENTIFIED);
        assert_eq!(record.outcome, Outcome::Unidentified);
        assert_eq!(record.subject_matters, vec![UNIDENTIFIED.to_string()]);
    }
}
