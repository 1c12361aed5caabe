//! Output locations and result-file writing.
//!
//! The runner works out of a root directory with fixed subdirectories:
//! scripts are read from `SQL/`, results land in `RESULTS/`, the error log
//! in `ERRORLOG/errorlog.txt`, and the legacy mail account record in
//! `EMAILINFO/emailinfo.csv`.

use crate::db::QueryResult;
use crate::error::{AuditError, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Attachment size cap. The mail provider rejects attachments over 10 MB.
pub const MAX_ATTACHMENT_BYTES: u64 = 10_000_000;

/// Filesystem layout for one run, derived from the root directory.
///
/// Built once at startup and immutable afterward.
#[derive(Debug, Clone)]
pub struct OutputPaths {
    /// Directory searched for SQL scripts.
    pub scripts_dir: PathBuf,

    /// Directory where result CSV files are written.
    pub results_dir: PathBuf,

    /// Error log file, truncated at the start of every run.
    pub error_log: PathBuf,

    /// Legacy one-row mail account record.
    pub mail_info: PathBuf,
}

impl OutputPaths {
    /// Derives the fixed subdirectory layout from the root directory.
    pub fn new(root: &Path) -> Self {
        Self {
            scripts_dir: root.join("SQL"),
            results_dir: root.join("RESULTS"),
            error_log: root.join("ERRORLOG").join("errorlog.txt"),
            mail_info: root.join("EMAILINFO").join("emailinfo.csv"),
        }
    }

    /// Creates the output directories and truncates the error log.
    ///
    /// The log is truncated up front so a clean run never attaches a stale
    /// log from a previous failure.
    pub fn prepare(&self) -> Result<()> {
        fs::create_dir_all(&self.results_dir).map_err(|e| {
            AuditError::csv(format!(
                "Failed to create results directory {}: {e}",
                self.results_dir.display()
            ))
        })?;

        if let Some(parent) = self.error_log.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                AuditError::csv(format!(
                    "Failed to create error log directory {}: {e}",
                    parent.display()
                ))
            })?;
        }

        fs::write(&self.error_log, "").map_err(|e| {
            AuditError::csv(format!(
                "Failed to truncate error log {}: {e}",
                self.error_log.display()
            ))
        })?;

        Ok(())
    }

    /// Returns the result CSV path for a task name.
    pub fn result_csv(&self, name: &str) -> PathBuf {
        self.results_dir.join(format!("{name}.csv"))
    }
}

/// Serializes a query result to a CSV file: one header record from the
/// column names, then one record per row. Returns the written file size in
/// bytes.
pub fn write_result_csv(path: &Path, result: &QueryResult) -> Result<u64> {
    let mut writer = csv::Writer::from_path(path).map_err(|e| {
        AuditError::csv(format!("Failed to create {}: {e}", path.display()))
    })?;

    writer
        .write_record(result.columns.iter().map(|col| col.name.as_str()))
        .map_err(|e| AuditError::csv(format!("Failed to write header to {}: {e}", path.display())))?;

    for row in &result.rows {
        writer
            .write_record(row.iter().map(|value| value.to_csv_field()))
            .map_err(|e| {
                AuditError::csv(format!("Failed to write row to {}: {e}", path.display()))
            })?;
    }

    writer
        .flush()
        .map_err(|e| AuditError::csv(format!("Failed to flush {}: {e}", path.display())))?;

    let size = fs::metadata(path)
        .map_err(|e| AuditError::csv(format!("Failed to stat {}: {e}", path.display())))?
        .len();

    Ok(size)
}

/// Overwrites the error log with the accumulated error text.
pub fn write_error_log(path: &Path, text: &str) -> Result<()> {
    fs::write(path, text).map_err(|e| {
        AuditError::csv(format!(
            "Failed to write error log {}: {e}",
            path.display()
        ))
    })
}
