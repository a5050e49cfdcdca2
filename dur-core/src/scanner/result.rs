use std::path::{Path, PathBuf};

use serde::Serialize;

/// Extension key for files without a suffix
pub const NO_EXTENSION: &str = "(no extension)";

/// A named size: a subdirectory (bare name) or a large file (path relative to the target)
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SizeEntry {
    pub name: String,
    pub size: u64,
}

impl SizeEntry {
    pub fn new(name: impl Into<String>, size: u64) -> Self {
        Self {
            name: name.into(),
            size,
        }
    }
}

/// Aggregate usage for one lower-cased file extension
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExtensionStat {
    /// `.ext` including the dot, or [`NO_EXTENSION`]
    pub extension: String,
    pub file_count: u64,
    pub total_size: u64,
}

impl ExtensionStat {
    pub fn new(extension: impl Into<String>) -> Self {
        Self {
            extension: extension.into(),
            file_count: 0,
            total_size: 0,
        }
    }

    pub(crate) fn add(&mut self, size: u64) {
        self.file_count += 1;
        self.total_size += size;
    }
}

/// Outcome of a single scan, ranked and truncated
#[derive(Debug, Clone, Serialize)]
pub struct ScanResult {
    target: PathBuf,
    total_files: u64,
    total_size: u64,
    threshold_bytes: u64,
    skipped_entries: u64,
    subdirs: Vec<SizeEntry>,
    large_files: Vec<SizeEntry>,
    ext_stats: Vec<ExtensionStat>,
}

impl ScanResult {
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new(
        target: PathBuf,
        total_files: u64,
        total_size: u64,
        threshold_bytes: u64,
        skipped_entries: u64,
        subdirs: Vec<SizeEntry>,
        large_files: Vec<SizeEntry>,
        ext_stats: Vec<ExtensionStat>,
    ) -> Self {
        Self {
            target,
            total_files,
            total_size,
            threshold_bytes,
            skipped_entries,
            subdirs,
            large_files,
            ext_stats,
        }
    }

    /// Canonical path that was scanned
    pub fn target(&self) -> &Path {
        &self.target
    }

    /// Number of non-hidden regular files counted
    pub fn total_files(&self) -> u64 {
        self.total_files
    }

    /// Combined size of every counted file, before truncation
    pub fn total_size(&self) -> u64 {
        self.total_size
    }

    pub fn threshold_bytes(&self) -> u64 {
        self.threshold_bytes
    }

    /// Entries left out because they could not be read
    pub fn skipped_entries(&self) -> u64 {
        self.skipped_entries
    }

    /// Largest immediate subdirectories, largest first
    pub fn subdirs(&self) -> &[SizeEntry] {
        &self.subdirs
    }

    /// Files at or above the threshold, largest first
    pub fn large_files(&self) -> &[SizeEntry] {
        &self.large_files
    }

    /// Extensions ordered by total size, largest first
    pub fn ext_stats(&self) -> &[ExtensionStat] {
        &self.ext_stats
    }

    /// Look up the stats for one extension key
    pub fn ext_stat(&self, extension: &str) -> Option<&ExtensionStat> {
        self.ext_stats.iter().find(|s| s.extension == extension)
    }
}
