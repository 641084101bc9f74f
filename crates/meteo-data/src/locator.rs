//! Archive file discovery.
//!
//! Walks a data root and collects every file whose name matches one of the
//! archive glob patterns.

use std::path::{Path, PathBuf};

use glob::Pattern;
use meteo_core::error::{MeteoError, Result};
use tracing::{debug, warn};
use walkdir::WalkDir;

/// File-name patterns of plain and gzip-compressed archives.
pub const ARCHIVE_PATTERNS: &[&str] = &[
    "meteo_data_archive_*.json",
    "meteo_data_archive_*.json.gz",
];

// ── FileLocator ───────────────────────────────────────────────────────────────

/// Finds archive files by matching base names against glob patterns.
#[derive(Debug, Clone)]
pub struct FileLocator {
    patterns: Vec<Pattern>,
}

impl FileLocator {
    /// Compile `patterns`. A pattern that fails to compile is logged and
    /// never matches.
    pub fn new<S: AsRef<str>>(patterns: &[S]) -> Self {
        let patterns = patterns
            .iter()
            .filter_map(|raw| match Pattern::new(raw.as_ref()) {
                Ok(pattern) => Some(pattern),
                Err(e) => {
                    warn!("Error compiling file pattern \"{}\": {}", raw.as_ref(), e);
                    None
                }
            })
            .collect();
        Self { patterns }
    }

    /// Returns `true` when `file_name` matches at least one pattern.
    pub fn matches(&self, file_name: &str) -> bool {
        self.patterns.iter().any(|p| p.matches(file_name))
    }

    /// Walk `root` and return matching files in walk order.
    ///
    /// Directories are never returned, even when their name matches. Any
    /// error during the walk aborts it; no partial list is returned.
    pub fn try_find(&self, root: &Path) -> Result<Vec<PathBuf>> {
        let mut files = Vec::new();

        for entry in WalkDir::new(root) {
            let entry = entry.map_err(|source| MeteoError::DirectoryWalk {
                path: source.path().unwrap_or(root).to_path_buf(),
                source,
            })?;
            // Symlinked archives are kept; opening them follows the link.
            if entry.file_type().is_dir() {
                continue;
            }
            if self.matches(&entry.file_name().to_string_lossy()) {
                files.push(entry.into_path());
            }
        }

        debug!("Found {} archive files under {}", files.len(), root.display());
        Ok(files)
    }

    /// Like [`FileLocator::try_find`], but logs a failed walk and returns an
    /// empty list.
    pub fn find(&self, root: &Path) -> Vec<PathBuf> {
        match self.try_find(root) {
            Ok(files) => files,
            Err(e) => {
                warn!("Error accessing path: {}", e);
                Vec::new()
            }
        }
    }
}

impl Default for FileLocator {
    fn default() -> Self {
        Self::new(ARCHIVE_PATTERNS)
    }
}

/// Find all archive files under `root` using the default patterns.
pub fn find_archive_files(root: &Path) -> Vec<PathBuf> {
    FileLocator::default().find(root)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
