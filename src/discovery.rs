//! SQL script discovery.
//!
//! Walks the scripts directory, building one `QueryTask` per `.sql` file
//! found recursively, sorted by path for a deterministic processing order.

use crate::db::QueryResult;
use crate::error::{AuditError, Result};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, warn};

/// Execution status of a discovered script.
///
/// Transitions only `Pending -> Succeeded` or `Pending -> Failed`; the
/// pipeline is the sole mutator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TaskStatus {
    #[default]
    Pending,
    Succeeded,
    Failed,
}

/// One discovered SQL script and its execution outcome.
#[derive(Debug, Clone)]
pub struct QueryTask {
    /// Identifier derived from the file stem, with whitespace stripped.
    pub name: String,

    /// Source file path.
    pub path: PathBuf,

    /// Raw script text.
    pub source_text: String,

    /// Execution status; Pending until the pipeline runs the task.
    pub status: TaskStatus,

    /// Query wall time; zero until executed.
    pub elapsed: Duration,

    /// Fetched rows; empty until executed.
    pub result: QueryResult,
}

impl QueryTask {
    /// Builds a task from a script file, reading its contents.
    pub fn from_file(path: &Path) -> Result<Self> {
        let source_text = fs::read_to_string(path).map_err(|e| {
            AuditError::discovery(format!("Failed to read script {}: {e}", path.display()))
        })?;

        Ok(Self {
            name: task_name(path),
            path: path.to_path_buf(),
            source_text,
            status: TaskStatus::Pending,
            elapsed: Duration::ZERO,
            result: QueryResult::new(),
        })
    }

    /// Number of rows the task's query returned.
    pub fn row_count(&self) -> usize {
        self.result.row_count
    }
}

/// Derives a task identifier from the file stem, with whitespace removed.
fn task_name(path: &Path) -> String {
    path.file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or_default()
        .split_whitespace()
        .collect()
}

/// Discovers all `.sql` scripts under `scripts_dir`, recursively.
///
/// A missing scripts directory degrades to an empty task list: the run
/// continues and the summary email still goes out. Unreadable directories
/// or files fail with `AuditError::Discovery`.
pub fn discover_tasks(scripts_dir: &Path) -> Result<Vec<QueryTask>> {
    if !scripts_dir.exists() {
        warn!(
            "Scripts directory {} does not exist, nothing to run",
            scripts_dir.display()
        );
        return Ok(Vec::new());
    }

    let mut files = Vec::new();
    collect_sql_files(scripts_dir, &mut files)?;
    files.sort();

    debug!("Found {} script files under {}", files.len(), scripts_dir.display());

    files.iter().map(|path| QueryTask::from_file(path)).collect()
}

/// Recursively collects `.sql` file paths under `dir`.
fn collect_sql_files(dir: &Path, out: &mut Vec<PathBuf>) -> Result<()> {
    let entries = fs::read_dir(dir).map_err(|e| {
        AuditError::discovery(format!("Failed to read directory {}: {e}", dir.display()))
    })?;

    for entry in entries {
        let entry = entry.map_err(|e| {
            AuditError::discovery(format!("Failed to read entry in {}: {e}", dir.display()))
        })?;
        let path = entry.path();

        if path.is_dir() {
            collect_sql_files(&path, out)?;
        } else if is_sql_file(&path) {
            out.push(path);
        }
    }

    Ok(())
}

/// Returns true for files with a `.sql` extension (case-insensitive).
fn is_sql_file(path: &Path) -> bool {
    path.extension()
        .map(|ext| ext.eq_ignore_ascii_case("sql"))
        .unwrap_or(false)
}
