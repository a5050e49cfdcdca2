use std::collections::HashMap;
use std::ffi::OsStr;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use jwalk::{Parallelism, WalkDir};
use tracing::{debug, info, warn};

use super::result::{ExtensionStat, NO_EXTENSION, ScanResult, SizeEntry};
use super::sizer::measure_dir;
use super::{is_hidden, log_skipped};
use crate::rank::top_n;
use crate::{DurError, Result};

const MB: u64 = 1024 * 1024;

/// Scanner configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanConfig {
    /// Length of each ranked list
    pub top_n: usize,
    /// Files at or above this size are reported as large
    pub threshold_bytes: u64,
}

impl ScanConfig {
    pub const DEFAULT_TOP_N: usize = 10;
    pub const DEFAULT_THRESHOLD_MB: u64 = 100;

    pub fn with_top_n(mut self, top_n: usize) -> Self {
        self.top_n = top_n;
        self
    }

    /// Set the large-file threshold in megabytes (1 MB = 1024 * 1024 bytes)
    pub fn with_threshold_mb(mut self, mb: u64) -> Self {
        self.threshold_bytes = mb.saturating_mul(MB);
        self
    }
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            top_n: Self::DEFAULT_TOP_N,
            threshold_bytes: Self::DEFAULT_THRESHOLD_MB * MB,
        }
    }
}

/// Running totals for the full-tree walk
#[derive(Default)]
struct Tally {
    total_files: u64,
    total_size: u64,
    skipped: u64,
    large_files: Vec<SizeEntry>,
    /// In first-seen order so ranking ties follow encounter order
    ext_stats: Vec<ExtensionStat>,
    ext_index: HashMap<String, usize>,
}

impl Tally {
    fn record_file(&mut self, relative: &Path, name: &OsStr, size: u64, threshold: u64) {
        self.total_files += 1;
        self.total_size += size;
        self.ext_stat_mut(extension_key(name)).add(size);

        if size >= threshold {
            self.large_files
                .push(SizeEntry::new(relative.to_string_lossy(), size));
        }
    }

    fn ext_stat_mut(&mut self, key: String) -> &mut ExtensionStat {
        let stats = &mut self.ext_stats;
        let idx = *self.ext_index.entry(key).or_insert_with_key(|key| {
            stats.push(ExtensionStat::new(key.clone()));
            stats.len() - 1
        });
        &mut self.ext_stats[idx]
    }
}

/// Lower-cased `.ext` for a file name, or [`NO_EXTENSION`]
fn extension_key(name: &OsStr) -> String {
    match Path::new(name).extension() {
        Some(ext) if !ext.is_empty() => format!(".{}", ext.to_string_lossy().to_lowercase()),
        _ => NO_EXTENSION.to_string(),
    }
}

/// Resolve the target to an absolute path and require an existing directory
fn resolve_target(path: &Path) -> Result<PathBuf> {
    let target = path
        .canonicalize()
        .or_else(|_| std::path::absolute(path))
        .unwrap_or_else(|_| path.to_path_buf());

    let metadata = fs::metadata(&target).map_err(|source| match source.kind() {
        io::ErrorKind::NotFound => DurError::PathNotFound(target.clone()),
        _ => DurError::TargetInaccessible {
            path: target.clone(),
            source,
        },
    })?;
    if !metadata.is_dir() {
        return Err(DurError::NotADirectory(target));
    }

    Ok(target)
}

/// Size every non-hidden immediate subdirectory of `target`
fn measure_subdirs(target: &Path) -> (Vec<SizeEntry>, u64) {
    let mut skipped = 0;

    let read_dir = match fs::read_dir(target) {
        Ok(rd) => rd,
        Err(err) => {
            warn!(
                path = %target.display(),
                error = %err,
                "some directories could not be accessed"
            );
            return (Vec::new(), 1);
        }
    };

    let mut children = Vec::new();
    for entry in read_dir {
        match entry {
            Ok(e) => children.push(e),
            Err(err) => {
                skipped += 1;
                debug!(error = %DurError::entry_access(target, err), "skipping entry");
            }
        }
    }
    children.sort_by_key(|e| e.file_name());

    let mut subdirs = Vec::new();
    for child in children {
        let name = child.file_name();
        if is_hidden(&name) {
            continue;
        }

        // DirEntry::file_type does not follow symlinks
        match child.file_type() {
            Ok(ft) if ft.is_dir() => {
                let measure = measure_dir(&child.path());
                skipped += measure.skipped;
                subdirs.push(SizeEntry::new(name.to_string_lossy(), measure.bytes));
            }
            Ok(_) => {}
            Err(err) => {
                skipped += 1;
                debug!(error = %DurError::entry_access(child.path(), err), "skipping entry");
            }
        }
    }

    (subdirs, skipped)
}

/// Walk the whole tree below `target`, pruning hidden entries
fn walk_files(target: &Path, threshold: u64) -> Tally {
    let mut tally = Tally::default();

    let walker = WalkDir::new(target)
        .skip_hidden(false)
        .follow_links(false)
        .sort(true)
        .parallelism(Parallelism::Serial)
        .process_read_dir(|depth, _path, _read_dir_state, children| {
            // The root arrives with no depth; it is never filtered, even when dot-named
            if depth.is_none() {
                return;
            }
            // Hidden directories are dropped here so they are never descended
            children.retain(|entry| match entry {
                Ok(e) => !is_hidden(e.file_name()),
                Err(_) => true,
            });
        });

    for entry_result in walker {
        let mut entry = match entry_result {
            Ok(e) => e,
            Err(err) => {
                tally.skipped += 1;
                log_skipped(err);
                continue;
            }
        };

        if let Some(err) = entry.read_children_error.take() {
            tally.skipped += 1;
            log_skipped(err);
            continue;
        }

        // Directories carry no size of their own; symlinks are never dereferenced
        if !entry.file_type().is_file() {
            continue;
        }

        let size = match entry.metadata() {
            Ok(meta) => meta.len(),
            Err(err) => {
                tally.skipped += 1;
                log_skipped(err);
                continue;
            }
        };

        let path = entry.path();
        let relative = path.strip_prefix(target).unwrap_or(&path);
        tally.record_file(relative, entry.file_name(), size, threshold);
    }

    tally
}

/// Scan `target` and produce a ranked report snapshot
///
/// Only an invalid target fails; unreadable entries anywhere below it are
/// skipped and counted in [`ScanResult::skipped_entries`].
pub fn scan(target: &Path, config: &ScanConfig) -> Result<ScanResult> {
    let target = resolve_target(target)?;
    info!(target = %target.display(), "scanning directory");

    let (subdirs, subdir_skipped) = measure_subdirs(&target);
    let tally = walk_files(&target, config.threshold_bytes);

    let skipped_entries = subdir_skipped + tally.skipped;
    info!(
        files = tally.total_files,
        bytes = tally.total_size,
        skipped = skipped_entries,
        "scan complete"
    );

    let subdirs = top_n(subdirs, config.top_n, |e| e.size);
    let large_files = top_n(tally.large_files, config.top_n, |e| e.size);
    let ext_stats = top_n(tally.ext_stats, config.top_n, |s| s.total_size);

    Ok(ScanResult::new(
        target,
        tally.total_files,
        tally.total_size,
        config.threshold_bytes,
        skipped_entries,
        subdirs,
        large_files,
        ext_stats,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write_bytes(path: &Path, n: usize) {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, vec![0u8; n]).unwrap();
    }

    #[test]
    fn test_extension_key() {
        assert_eq!(extension_key(OsStr::new("photo.JPG")), ".jpg");
        assert_eq!(extension_key(OsStr::new("archive.tar.gz")), ".gz");
        assert_eq!(extension_key(OsStr::new("Makefile")), NO_EXTENSION);
        assert_eq!(extension_key(OsStr::new("trailing.")), NO_EXTENSION);
    }

    #[test]
    fn test_config_threshold_mb() {
        let config = ScanConfig::default();
        assert_eq!(config.top_n, 10);
        assert_eq!(config.threshold_bytes, 100 * 1024 * 1024);

        let config = ScanConfig::default().with_threshold_mb(0).with_top_n(3);
        assert_eq!(config.threshold_bytes, 0);
        assert_eq!(config.top_n, 3);

        let config = ScanConfig::default().with_threshold_mb(u64::MAX);
        assert_eq!(config.threshold_bytes, u64::MAX);
    }

    #[test]
    fn test_scan_missing_target() {
        let temp = TempDir::new().unwrap();
        let err = scan(&temp.path().join("missing"), &ScanConfig::default()).unwrap_err();
        assert!(matches!(err, DurError::PathNotFound(_)));
        assert!(err.is_invalid_target());
    }

    #[test]
    fn test_scan_dot_named_target() {
        let temp = TempDir::new().unwrap();
        let target = temp.path().join(".config");
        write_bytes(&target.join("settings.toml"), 10);
        write_bytes(&target.join("app/state.json"), 20);
        write_bytes(&target.join(".cache/blob"), 500);

        let result = scan(&target, &ScanConfig::default().with_threshold_mb(0)).unwrap();

        assert_eq!(result.total_files(), 2);
        assert_eq!(result.total_size(), 30);
        assert_eq!(result.subdirs(), &[SizeEntry::new("app", 20)]);
        assert_eq!(result.large_files().len(), 2);
        assert!(result.ext_stat(".toml").is_some());
    }

    #[cfg(unix)]
    #[test]
    fn test_scan_target_behind_unsearchable_parent() {
        use std::os::unix::fs::PermissionsExt;

        let temp = TempDir::new().unwrap();
        let parent = temp.path().join("locked");
        let target = parent.join("inner");
        fs::create_dir_all(&target).unwrap();
        fs::set_permissions(&parent, fs::Permissions::from_mode(0o000)).unwrap();

        // Permission bits do not restrict root
        if fs::metadata(&target).is_ok() {
            fs::set_permissions(&parent, fs::Permissions::from_mode(0o755)).unwrap();
            return;
        }

        let err = scan(&target, &ScanConfig::default()).unwrap_err();
        fs::set_permissions(&parent, fs::Permissions::from_mode(0o755)).unwrap();

        assert!(matches!(err, DurError::TargetInaccessible { .. }));
        assert!(err.is_invalid_target());
        assert!(!err.to_string().contains("does not exist"));
    }

    #[test]
    fn test_scan_file_target() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("plain.txt");
        write_bytes(&file, 3);

        let err = scan(&file, &ScanConfig::default()).unwrap_err();
        assert!(matches!(err, DurError::NotADirectory(_)));
    }

    #[test]
    fn test_scan_empty_dir() {
        let temp = TempDir::new().unwrap();
        let result = scan(temp.path(), &ScanConfig::default()).unwrap();

        assert_eq!(result.total_files(), 0);
        assert_eq!(result.total_size(), 0);
        assert!(result.subdirs().is_empty());
        assert!(result.large_files().is_empty());
        assert!(result.ext_stats().is_empty());
        assert_eq!(result.target(), temp.path().canonicalize().unwrap());
    }

    #[test]
    fn test_scan_with_files() {
        let temp = TempDir::new().unwrap();
        write_bytes(&temp.path().join("file1.txt"), 5);
        write_bytes(&temp.path().join("file2.TXT"), 5);
        write_bytes(&temp.path().join("subdir/file3.rs"), 40);
        write_bytes(&temp.path().join("subdir/deeper/README"), 7);

        let config = ScanConfig {
            top_n: 10,
            threshold_bytes: 10,
        };
        let result = scan(temp.path(), &config).unwrap();

        assert_eq!(result.total_files(), 4);
        assert_eq!(result.total_size(), 57);
        assert_eq!(result.subdirs(), &[SizeEntry::new("subdir", 47)]);

        let expected_large = Path::new("subdir").join("file3.rs");
        assert_eq!(
            result.large_files(),
            &[SizeEntry::new(expected_large.to_string_lossy(), 40)]
        );

        let txt = result.ext_stat(".txt").unwrap();
        assert_eq!((txt.file_count, txt.total_size), (2, 10));
        let none = result.ext_stat(NO_EXTENSION).unwrap();
        assert_eq!((none.file_count, none.total_size), (1, 7));
        assert_eq!(result.ext_stats()[0].extension, ".rs");
    }

    #[test]
    fn test_hidden_entries_excluded() {
        let temp = TempDir::new().unwrap();
        write_bytes(&temp.path().join("shown.txt"), 10);
        write_bytes(&temp.path().join(".secret.txt"), 1000);
        write_bytes(&temp.path().join(".git/objects/pack.bin"), 5000);
        write_bytes(&temp.path().join("src/.env"), 300);
        write_bytes(&temp.path().join("src/main.rs"), 20);

        let config = ScanConfig::default().with_threshold_mb(0);
        let result = scan(temp.path(), &config).unwrap();

        assert_eq!(result.total_files(), 2);
        assert_eq!(result.total_size(), 30);
        assert!(result.large_files().iter().all(|f| !f.name.contains(".git")));
        assert!(result.ext_stat(".bin").is_none());
        assert!(result.ext_stat(".env").is_none());
        // Subdirectory sizes still include hidden files inside them
        assert_eq!(result.subdirs(), &[SizeEntry::new("src", 320)]);
    }

    #[test]
    fn test_top_n_zero_keeps_totals() {
        let temp = TempDir::new().unwrap();
        write_bytes(&temp.path().join("a/x.dat"), 10);
        write_bytes(&temp.path().join("b.dat"), 20);

        let config = ScanConfig::default().with_top_n(0).with_threshold_mb(0);
        let result = scan(temp.path(), &config).unwrap();

        assert_eq!(result.total_files(), 2);
        assert_eq!(result.total_size(), 30);
        assert!(result.subdirs().is_empty());
        assert!(result.large_files().is_empty());
        assert!(result.ext_stats().is_empty());
    }

    #[test]
    fn test_ties_follow_traversal_order() {
        let temp = TempDir::new().unwrap();
        write_bytes(&temp.path().join("b.dat"), 8);
        write_bytes(&temp.path().join("a.dat"), 8);
        write_bytes(&temp.path().join("c.dat"), 8);

        let config = ScanConfig::default().with_threshold_mb(0);
        let result = scan(temp.path(), &config).unwrap();

        let names: Vec<_> = result.large_files().iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["a.dat", "b.dat", "c.dat"]);
    }
}
