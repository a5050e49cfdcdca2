use std::path::Path;

use jwalk::{Parallelism, WalkDir};

use super::log_skipped;

/// Bytes found under a directory, with the number of entries that could not be read
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DirMeasure {
    pub bytes: u64,
    pub skipped: u64,
}

/// Total size of all regular files under `path`
///
/// Never fails: unreadable entries count as zero.
pub fn dir_size(path: &Path) -> u64 {
    measure_dir(path).bytes
}

/// Walk `path` and sum regular file sizes
///
/// Hidden entries are included. Symlinks are neither followed nor counted.
pub fn measure_dir(path: &Path) -> DirMeasure {
    let mut measure = DirMeasure::default();

    let walker = WalkDir::new(path)
        .skip_hidden(false)
        .follow_links(false)
        .sort(true)
        .parallelism(Parallelism::Serial);

    for entry_result in walker {
        let mut entry = match entry_result {
            Ok(e) => e,
            Err(err) => {
                measure.skipped += 1;
                log_skipped(err);
                continue;
            }
        };

        // Listing this directory failed; whatever it held stays uncounted
        if let Some(err) = entry.read_children_error.take() {
            measure.skipped += 1;
            log_skipped(err);
            continue;
        }

        if !entry.file_type().is_file() {
            continue;
        }

        match entry.metadata() {
            Ok(meta) => measure.bytes += meta.len(),
            Err(err) => {
                measure.skipped += 1;
                log_skipped(err);
            }
        }
    }

    measure
}
