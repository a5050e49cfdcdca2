use std::fmt;

use crate::Result;
use crate::scanner::ScanResult;
use crate::size::{format_count, format_size};

const BAR_FILLED: char = '█';
const BAR_EMPTY: char = '░';
/// Cells in each subdirectory bar
const SUBDIR_BAR_WIDTH: usize = 20;
const BANNER_WIDTH: usize = 60;
const RULE_WIDTH: usize = 55;

/// Render a fixed-width bar with `floor(width * ratio)` filled cells
///
/// `ratio` is clamped to `0.0..=1.0`; NaN renders as empty.
pub fn render_bar(ratio: f64, width: usize) -> String {
    let ratio = if ratio.is_nan() {
        0.0
    } else {
        ratio.clamp(0.0, 1.0)
    };
    let filled = ((width as f64) * ratio).floor() as usize;
    let filled = filled.min(width);

    let mut bar = String::with_capacity(width * 3); // Multi-byte block chars
    bar.extend(std::iter::repeat_n(BAR_FILLED, filled));
    bar.extend(std::iter::repeat_n(BAR_EMPTY, width - filled));
    bar
}

/// Plain-text disk usage report over a finished scan
pub struct Report<'a> {
    result: &'a ScanResult,
    top_n: usize,
}

impl<'a> Report<'a> {
    pub fn new(result: &'a ScanResult, top_n: usize) -> Self {
        Self { result, top_n }
    }

    fn write_header(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let banner = "=".repeat(BANNER_WIDTH);
        writeln!(f, "{banner}")?;
        writeln!(f, "          Disk Usage Report")?;
        writeln!(f, "{banner}")?;
        writeln!(f, "  Target:     {}", self.result.target().display())?;
        writeln!(f, "  Files:      {}", format_count(self.result.total_files()))?;
        writeln!(f, "  Total size: {}", format_size(self.result.total_size()))?;
        if self.result.skipped_entries() > 0 {
            writeln!(
                f,
                "  Skipped:    {} unreadable entries",
                format_count(self.result.skipped_entries())
            )?;
        }
        writeln!(f, "{banner}")
    }

    fn write_subdirs(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let subdirs = self.result.subdirs();
        let Some(largest) = subdirs.first() else {
            return Ok(());
        };
        let max_size = largest.size;

        writeln!(f)?;
        writeln!(f, "Top {} subdirectories by size:", self.top_n)?;
        writeln!(f, "{}", "-".repeat(RULE_WIDTH))?;
        for entry in subdirs {
            let ratio = if max_size > 0 {
                entry.size as f64 / max_size as f64
            } else {
                0.0
            };
            writeln!(
                f,
                "  {} {:>10}  {}/",
                render_bar(ratio, SUBDIR_BAR_WIDTH),
                format_size(entry.size),
                entry.name
            )?;
        }
        Ok(())
    }

    fn write_large_files(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let large_files = self.result.large_files();
        writeln!(f)?;
        if large_files.is_empty() {
            return writeln!(f, "No files above the size threshold");
        }

        writeln!(
            f,
            "Large files (>= {}):",
            format_size(self.result.threshold_bytes())
        )?;
        writeln!(f, "{}", "-".repeat(RULE_WIDTH))?;
        for entry in large_files {
            writeln!(f, "  {:>10}  {}", format_size(entry.size), entry.name)?;
        }
        Ok(())
    }

    fn write_extensions(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let stats = self.result.ext_stats();
        if stats.is_empty() {
            return Ok(());
        }

        writeln!(f)?;
        writeln!(f, "Top {} file types by size:", self.top_n)?;
        writeln!(f, "{}", "-".repeat(RULE_WIDTH))?;
        writeln!(f, "  {:<15} {:>8} {:>12}", "Extension", "Files", "Total size")?;
        writeln!(
            f,
            "  {} {} {}",
            "─".repeat(15),
            "─".repeat(8),
            "─".repeat(12)
        )?;
        for stat in stats {
            writeln!(
                f,
                "  {:<15} {:>8} {:>12}",
                stat.extension,
                format_count(stat.file_count),
                format_size(stat.total_size)
            )?;
        }
        Ok(())
    }

    fn write_footer(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let banner = "=".repeat(BANNER_WIDTH);
        writeln!(f)?;
        writeln!(f, "{banner}")?;
        writeln!(f, "  Report complete")?;
        writeln!(f, "{banner}")
    }
}

impl fmt::Display for Report<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_header(f)?;
        self.write_subdirs(f)?;
        self.write_large_files(f)?;
        self.write_extensions(f)?;
        self.write_footer(f)
    }
}

/// Render the full text report
pub fn render(result: &ScanResult, top_n: usize) -> String {
    Report::new(result, top_n).to_string()
}

/// Render the scan result as pretty-printed JSON
pub fn render_json(result: &ScanResult) -> Result<String> {
    Ok(serde_json::to_string_pretty(result)?)
}
