use std::path::PathBuf;

use clap::{ArgAction, Parser};
use color_eyre::Result;
use dur_core::{ScanConfig, render, render_json, scan};
use tracing::Level;

/// DUR - Disk Usage Report
#[derive(Parser, Debug)]
#[command(name = "dur")]
#[command(about = "Scan a directory and report where the disk space went")]
#[command(version)]
struct Args {
    /// Directory to analyze (defaults to current directory)
    #[arg(default_value = ".")]
    path: PathBuf,

    /// Number of entries in each ranking
    #[arg(short = 'n', long = "top", default_value_t = 10, allow_negative_numbers = true)]
    top: i64,

    /// Large-file threshold in MB
    #[arg(short, long, default_value_t = 100, allow_negative_numbers = true)]
    threshold: i64,

    /// Print the scan result as JSON instead of the text report
    #[arg(long)]
    json: bool,

    /// Increase diagnostic output on stderr (repeatable)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

impl Args {
    /// Negative counts and thresholds behave like zero
    fn scan_config(&self) -> ScanConfig {
        ScanConfig::default()
            .with_top_n(usize::try_from(self.top).unwrap_or(0))
            .with_threshold_mb(u64::try_from(self.threshold).unwrap_or(0))
    }

    fn log_level(&self) -> Level {
        match self.verbose {
            0 => Level::WARN,
            1 => Level::INFO,
            2 => Level::DEBUG,
            _ => Level::TRACE,
        }
    }
}

fn main() -> Result<()> {
    color_eyre::install()?;

    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_max_level(args.log_level())
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();

    let config = args.scan_config();

    let result = match scan(&args.path, &config) {
        Ok(result) => result,
        Err(err) if err.is_invalid_target() => {
            eprintln!("Error: {err}");
            std::process::exit(1);
        }
        Err(err) => return Err(err.into()),
    };

    if args.json {
        println!("{}", render_json(&result)?);
    } else {
        print!("{}", render(&result, config.top_n));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let args = Args::try_parse_from(["dur"]).unwrap();
        assert_eq!(args.path, PathBuf::from("."));
        assert!(!args.json);
        assert_eq!(args.log_level(), Level::WARN);

        let config = args.scan_config();
        assert_eq!(config.top_n, 10);
        assert_eq!(config.threshold_bytes, 100 * 1024 * 1024);
    }

    #[test]
    fn test_short_flags() {
        let args = Args::try_parse_from(["dur", "/var/log", "-n", "3", "-t", "0", "-vv"]).unwrap();
        assert_eq!(args.path, PathBuf::from("/var/log"));
        assert_eq!(args.log_level(), Level::DEBUG);

        let config = args.scan_config();
        assert_eq!(config.top_n, 3);
        assert_eq!(config.threshold_bytes, 0);
    }

    #[test]
    fn test_negative_values_clamp_to_zero() {
        let args = Args::try_parse_from(["dur", "--top", "-5", "--threshold", "-1"]).unwrap();
        let config = args.scan_config();
        assert_eq!(config.top_n, 0);
        assert_eq!(config.threshold_bytes, 0);
    }

    #[test]
    fn test_rejects_non_numeric_top() {
        assert!(Args::try_parse_from(["dur", "--top", "many"]).is_err());
    }
}
