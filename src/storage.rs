//! # Storage Management Module
//!
//! ## Purpose
//! Persists the document collection as a human-readable UTF-8 JSON file with
//! stable field order and nesting across rebuilds, and loads it back for
//! searching.
//!
//! ## Input/Output Specification
//! - **Input**: A fully built [`Collection`]; the index file path
//! - **Output**: Pretty-printed JSON on disk; a loaded `Collection` in memory
//! - **Atomicity**: Saves write to a temporary file in the target directory
//!   and rename into place, so a partial collection is never visible
//! - **Missing index**: Loading a nonexistent index fails explicitly with
//!   [`SearchError::IndexMissing`], directing the caller to run indexing first

use crate::errors::{Result, SearchError};
use crate::Collection;
use std::io::Write;
use std::path::Path;

/// Atomically persist a collection to `path`.
///
/// The parent directory is created if needed. The JSON is pretty-printed
/// UTF-8 with struct field order, so rebuilds over identical sources produce
/// byte-identical files apart from the timestamps.
pub fn save_collection(collection: &Collection, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let json = serde_json::to_string_pretty(collection)?;

    // Same-directory temp file so the rename never crosses filesystems
    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    let mut temp = tempfile::NamedTempFile::new_in(dir)?;
    temp.write_all(json.as_bytes())?;
    temp.write_all(b"\n")?;
    temp.flush()?;
    temp.persist(path).map_err(|e| e.error)?;

    tracing::debug!(
        path = %path.display(),
        documents = collection.total_documents,
        "Collection persisted"
    );
    Ok(())
}

/// Load a previously persisted collection from `path`.
pub fn load_collection(path: &Path) -> Result<Collection> {
    if !path.exists() {
        return Err(SearchError::IndexMissing {
            path: path.to_path_buf(),
        });
    }

    let content = std::fs::read_to_string(path)?;
    let collection: Collection = serde_json::from_str(&content)?;
    Ok(collection)
}
