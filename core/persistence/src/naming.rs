//! FILENAME: core/persistence/src/naming.rs

use chrono::{DateTime, Local, TimeZone};
use std::path::{Path, PathBuf};

/// Suffix shared by every generated artifact.
pub const ARTIFACT_STEM: &str = "PivotTable";

const TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// `<dir>/<YYYYmmdd_HHMMSS>_PivotTable.<ext>` for the current local time.
pub fn timestamped_path(dir: &Path, extension: &str) -> PathBuf {
    timestamped_path_at(dir, extension, &Local::now())
}

pub fn timestamped_path_at<Tz: TimeZone>(dir: &Path, extension: &str, at: &DateTime<Tz>) -> PathBuf
where
    Tz::Offset: std::fmt::Display,
{
    dir.join(format!(
        "{}_{}.{}",
        at.format(TIMESTAMP_FORMAT),
        ARTIFACT_STEM,
        extension.trim_start_matches('.')
    ))
}

/// Output directory for a file-based run: the source file's directory.
pub fn output_dir_for(source: &Path) -> PathBuf {
    match source.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}
