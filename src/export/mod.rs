use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, TimeZone};

use crate::app::{Result, ScrapeError};
use crate::domain::{PostRecord, COLUMNS};

pub const CSV_MIME_TYPE: &str = "text/csv";

/// Serialize records as CSV: header row first, one row per record, columns
/// in schema order. Identical input always produces identical bytes.
pub fn export_to_csv(records: &[PostRecord]) -> Result<String> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    writer.write_record(COLUMNS)?;
    for record in records {
        writer.serialize(record)?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| ScrapeError::Io(e.into_error()))?;
    String::from_utf8(bytes)
        .map_err(|e| ScrapeError::Io(std::io::Error::new(std::io::ErrorKind::InvalidData, e)))
}

/// `reddit_<subreddit>_<YYYYMMDD_HHMMSS>.csv`
pub fn export_filename<Tz: TimeZone>(subreddit: &str, at: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    format!("reddit_{}_{}.csv", subreddit, at.format("%Y%m%d_%H%M%S"))
}

/// Write the CSV for `records` into `dir` under the conventional filename.
pub fn write_csv<Tz: TimeZone>(
    dir: &Path,
    subreddit: &str,
    at: &DateTime<Tz>,
    records: &[PostRecord],
) -> Result<PathBuf>
where
    Tz::Offset: std::fmt::Display,
{
    let csv = export_to_csv(records)?;
    fs::create_dir_all(dir)?;
    let path = dir.join(export_filename(subreddit, at));
    fs::write(&path, csv)?;
    tracing::info!("Exported {} posts to {}", records.len(), path.display());
    Ok(path)
}
