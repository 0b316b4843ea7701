//! Shared table-width patterns and their load-once cache.

use super::PatternMap;
use crate::error::{Error, Result};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

/// Default shared pattern file name, looked up under the project root.
pub const PATTERNS_FILE: &str = "patterns.json";

/// Contents of the shared pattern file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SharedPatterns {
    /// Table width patterns
    #[serde(default)]
    pub table_widths: SharedTableWidths,
}

/// Table width section of the shared pattern file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SharedTableWidths {
    /// Patterns shared by every document
    #[serde(default)]
    pub common: PatternMap,

    /// Patterns keyed by document-type tag
    #[serde(default)]
    pub by_doc_type: IndexMap<String, PatternMap>,
}

impl SharedPatterns {
    /// Parse a shared pattern file.
    pub fn from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|e| Error::ConfigParse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Patterns shared by every document.
    pub fn common(&self) -> &PatternMap {
        &self.table_widths.common
    }

    /// Patterns for one document type.
    pub fn for_doc_type(&self, doc_type: &str) -> Option<&PatternMap> {
        self.table_widths.by_doc_type.get(doc_type)
    }
}

/// Lazily loaded, read-only shared patterns.
///
/// The file is read on first access only. A missing or unparsable file caches
/// "no patterns" and is never retried. Initialization goes through
/// [`OnceLock`], so a cache shared across threads is loaded by one writer.
#[derive(Debug)]
pub struct PatternCache {
    path: Option<PathBuf>,
    cell: OnceLock<Option<SharedPatterns>>,
}

impl PatternCache {
    /// Create a cache backed by a file.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
            cell: OnceLock::new(),
        }
    }

    /// Create a cache that never has patterns.
    pub fn empty() -> Self {
        Self {
            path: None,
            cell: OnceLock::new(),
        }
    }

    /// Create a cache pre-filled with patterns.
    pub fn from_patterns(patterns: SharedPatterns) -> Self {
        let cell = OnceLock::new();
        let _ = cell.set(Some(patterns));
        Self { path: None, cell }
    }

    /// Backing file, if any.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Check whether the load has already happened.
    pub fn is_loaded(&self) -> bool {
        self.cell.get().is_some()
    }

    /// Get the shared patterns, loading them on first call.
    pub fn get(&self) -> Option<&SharedPatterns> {
        self.cell.get_or_init(|| self.load()).as_ref()
    }

    fn load(&self) -> Option<SharedPatterns> {
        let path = self.path.as_deref()?;
        if !path.exists() {
            log::debug!("No shared pattern file at {}", path.display());
            return None;
        }

        match SharedPatterns::from_path(path) {
            Ok(patterns) => {
                log::debug!(
                    "Loaded shared patterns from {} ({} common, {} document types)",
                    path.display(),
                    patterns.common().len(),
                    patterns.table_widths.by_doc_type.len()
                );
                Some(patterns)
            }
            Err(e) => {
                log::warn!("Ignoring shared pattern file: {}", e);
                None
            }
        }
    }
}

impl Default for PatternCache {
    fn default() -> Self {
        Self::empty()
    }
}
