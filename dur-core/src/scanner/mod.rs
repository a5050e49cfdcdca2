mod engine;
mod result;
mod sizer;

pub use engine::{ScanConfig, scan};
pub use result::{ExtensionStat, NO_EXTENSION, ScanResult, SizeEntry};
pub use sizer::{DirMeasure, dir_size, measure_dir};

use std::ffi::OsStr;
use std::path::Path;

use crate::DurError;

/// Leading character that marks a file or directory as hidden
pub const HIDDEN_MARKER: u8 = b'.';

/// Check whether an entry name marks it as hidden
pub fn is_hidden(name: &OsStr) -> bool {
    name.as_encoded_bytes().first() == Some(&HIDDEN_MARKER)
}

/// Log a walker error for an entry that is being left out of the scan
fn log_skipped(err: jwalk::Error) {
    let path = err.path().map(Path::to_path_buf).unwrap_or_default();
    match err.into_io_error() {
        Some(source) => {
            let err = DurError::entry_access(path, source);
            tracing::debug!(error = %err, "skipping entry");
        }
        None => {
            tracing::debug!(path = %path.display(), "skipping entry (filesystem loop)");
        }
    }
}
