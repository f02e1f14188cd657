//! # Configuration Management Module
//!
//! ## Purpose
//! Centralized configuration management for the jurisprudence search engine,
//! supporting TOML files and environment variable overrides with validation
//! and type-safe access to all system settings.
//!
//! ## Input/Output Specification
//! - **Input**: Configuration files (TOML), environment variables
//! - **Output**: Validated configuration structs with defaults and overrides
//!
//! ## Configuration Sources (in order of precedence)
//! 1. Environment variables (`JURIS_*`)
//! 2. Configuration file
//! 3. Default values
//!
//! ## Usage
//! ```rust,no_run
//! use jurisprudence_search::config::Config;
//!
//! let config = Config::from_file("juris.toml").unwrap();
//! println!("Index path: {:?}", config.indexing.index_path);
//! ```

use crate::errors::{Result, SearchError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main configuration structure containing all system settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Document discovery and index rebuild settings
    pub indexing: IndexingConfig,
    /// Collection header fields
    pub collection: CollectionConfig,
    /// Search and result display behavior
    pub search: SearchConfig,
    /// Parallelism tuning
    pub performance: PerformanceConfig,
    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Document discovery and index rebuild settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IndexingConfig {
    /// Directory scanned for ruling documents
    pub documents_dir: PathBuf,
    /// Location of the persisted collection
    pub index_path: PathBuf,
    /// File extensions considered document sources (lowercase, no dot)
    pub extensions: Vec<String>,
    /// Maximum number of keywords stored per document
    pub keyword_limit: usize,
    /// Extracted texts shorter than this are treated as extraction failures
    pub min_text_length: usize,
}

/// Collection header fields written on every rebuild
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CollectionConfig {
    /// Whose rulings the collection covers (e.g. a rapporteur's name)
    pub subject_label: String,
    /// Court or chamber that issued the documents
    pub issuing_body: String,
    /// Free-text description of the collection contents
    pub description: String,
}

/// Search and result display behavior
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Default number of results rendered by the presentation layer
    pub display_limit: usize,
    /// Maximum match explanations rendered per result
    pub explanation_display_limit: usize,
}

/// Parallelism tuning
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PerformanceConfig {
    /// Worker threads for the indexing fan-out
    pub worker_threads: usize,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,
    /// Enable structured JSON logging
    pub json_format: bool,
}

impl Config {
    /// Load configuration from default location
    pub fn load() -> Result<Self> {
        Self::from_file("juris.toml")
    }

    /// Load configuration from a specific file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        let mut config = if path.exists() {
            let content = std::fs::read_to_string(path).map_err(|e| SearchError::Config {
                message: format!("Failed to read config file {:?}: {}", path, e),
            })?;
            toml::from_str(&content).map_err(|e| SearchError::Config {
                message: format!("Failed to parse config file {:?}: {}", path, e),
            })?
        } else {
            tracing::warn!("Configuration file not found: {:?}, using defaults", path);
            Self::default()
        };

        config.apply_env_overrides()?;
        config.validate()?;

        Ok(config)
    }

    /// Apply environment variable overrides
    fn apply_env_overrides(&mut self) -> Result<()> {
        if let Ok(dir) = std::env::var("JURIS_DOCUMENTS_DIR") {
            self.indexing.documents_dir = PathBuf::from(dir);
        }
        if let Ok(path) = std::env::var("JURIS_INDEX_PATH") {
            self.indexing.index_path = PathBuf::from(path);
        }
        if let Ok(level) = std::env::var("JURIS_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Ok(threads) = std::env::var("JURIS_WORKER_THREADS") {
            self.performance.worker_threads =
                threads.parse().map_err(|_| SearchError::Config {
                    message: "Invalid thread count in JURIS_WORKER_THREADS".to_string(),
                })?;
        }

        Ok(())
    }

    /// Validate configuration values
    fn validate(&self) -> Result<()> {
        if self.indexing.keyword_limit == 0 {
            return Err(SearchError::Config {
                message: "indexing.keyword_limit must be greater than zero".to_string(),
            });
        }
        if self.indexing.extensions.is_empty() {
            return Err(SearchError::Config {
                message: "indexing.extensions must not be empty".to_string(),
            });
        }
        if self.performance.worker_threads == 0 {
            return Err(SearchError::Config {
                message: "performance.worker_threads must be greater than zero".to_string(),
            });
        }
        if self.search.display_limit == 0 {
            return Err(SearchError::Config {
                message: "search.display_limit must be greater than zero".to_string(),
            });
        }

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            indexing: IndexingConfig::default(),
            collection: CollectionConfig::default(),
            search: SearchConfig::default(),
            performance: PerformanceConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for IndexingConfig {
    fn default() -> Self {
        Self {
            documents_dir: PathBuf::from("documents"),
            index_path: PathBuf::from("metadata/index.json"),
            extensions: vec!["pdf".to_string(), "txt".to_string()],
            keyword_limit: 20,
            min_text_length: 1,
        }
    }
}

impl Default for CollectionConfig {
    fn default() -> Self {
        Self {
            subject_label: "Flávio Itabaiana de Oliveira Nicolau".to_string(),
            issuing_body: "TJ/RJ".to_string(),
            description: "Each document contains: headnote, ruling, report and vote".to_string(),
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            display_limit: 10,
            explanation_display_limit: 5,
        }
    }
}

impl Default for PerformanceConfig {
    fn default() -> Self {
        Self {
            worker_threads: num_cpus::get(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json_format: false,
        }
    }
}
