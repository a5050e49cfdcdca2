pub mod error;
pub mod rank;
pub mod report;
pub mod scanner;
pub mod size;

pub use error::{DurError, Result};
pub use rank::top_n;
pub use report::{Report, render, render_bar, render_json};
pub use scanner::{
    DirMeasure, ExtensionStat, NO_EXTENSION, ScanConfig, ScanResult, SizeEntry, dir_size,
    is_hidden, measure_dir, scan,
};
pub use size::{format_count, format_size};
