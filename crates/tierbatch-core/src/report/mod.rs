//! JSON reports: the committed schedule, the missed-jobs summary, and the
//! resizing assignment (or its infeasibility sentinel).
//!
//! Deadline and time values are written with exactly six decimal places.

mod document;

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Serialize;

use crate::resizing::ResizingOutcome;
use crate::scheduler::ScheduleOutcome;

pub use document::{
    missed_report, resizing_document, schedule_document, BatchRecord, ImageRecord, MissedRecord,
    MissedReport, ResizingDocument, ScheduleEntry,
};

pub const COMPRESSION_OUTPUT: &str = "output_compression.json";
pub const COMPRESSION_MISSED: &str = "missed_tasks_compression.json";
pub const RESIZING_OUTPUT: &str = "output_resizing.json";

/// Serialize `value` as pretty JSON to `path`, creating parent dirs.
pub fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("create dir: {}", parent.display()))?;
        }
    }
    let mut json = serde_json::to_string_pretty(value).context("serialize report")?;
    json.push('\n');
    fs::write(path, json).with_context(|| format!("write report: {}", path.display()))?;
    Ok(())
}

/// Write the schedule, and the missed report when any job was missed.
/// Returns the paths written.
pub fn write_compression_reports(out_dir: &Path, outcome: &ScheduleOutcome) -> Result<Vec<PathBuf>> {
    let mut written = Vec::with_capacity(2);

    let path = out_dir.join(COMPRESSION_OUTPUT);
    write_json(&path, &schedule_document(outcome)?)?;
    written.push(path);

    if let Some(report) = missed_report(outcome)? {
        let path = out_dir.join(COMPRESSION_MISSED);
        write_json(&path, &report)?;
        written.push(path);
    }

    tracing::debug!(files = written.len(), dir = %out_dir.display(), "wrote compression reports");
    Ok(written)
}

/// Write the resizing document. Returns the path written.
pub fn write_resizing_report(out_dir: &Path, outcome: &ResizingOutcome) -> Result<PathBuf> {
    let path = out_dir.join(RESIZING_OUTPUT);
    write_json(&path, &resizing_document(outcome)?)?;
    tracing::debug!(path = %path.display(), "wrote resizing report");
    Ok(path)
}
