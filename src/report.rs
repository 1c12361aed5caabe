//! Run report accumulation and message text assembly.
//!
//! The `ExecutionReport` collects one summary entry per executed task, the
//! concatenated error text, and the list of CSV files queued for
//! attachment. The pipeline is its only writer; report assembly reads it.

use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::NaiveDate;

/// Subject template for the summary email.
const SUBJECT_PREFIX: &str = "Weekly SQL Audits";

/// Formats the date stamp used in the subject and body.
pub fn datestamp(date: NaiveDate) -> String {
    date.format("%A, %b %d %Y").to_string()
}

/// Accumulated outcome of one run.
#[derive(Debug, Default)]
pub struct ExecutionReport {
    /// One entry per executed task, in processing order.
    summary: Vec<String>,

    /// Additional remarks (oversized results) appended after the summary.
    notes: Vec<String>,

    /// Concatenated failure details, written to the error log.
    error_text: String,

    /// CSV files queued for attachment, in processing order.
    attachments: Vec<PathBuf>,
}

impl ExecutionReport {
    /// Creates an empty report.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a successful task with its row count and query time.
    pub fn record_success(&mut self, name: &str, row_count: usize, elapsed: Duration) {
        self.summary.push(format!(
            "{name}\nRows returned: {row_count}\nQuery Time: {:.3}s",
            elapsed.as_secs_f64()
        ));
    }

    /// Records a failed task: a summary entry flagging the query for
    /// review, plus the driver message in the error text.
    pub fn record_failure(&mut self, name: &str, message: &str) {
        self.summary.push(format!(
            "{name}\nRows returned: ERROR, PLEASE REVIEW SQL QUERY\nQuery Time: N/A"
        ));

        if !self.error_text.is_empty() {
            self.error_text.push_str("\n\n");
        }
        self.error_text
            .push_str(&format!("{name} failed, see error below:\n\n{message}\n"));
    }

    /// Records a result too large to attach; the file stays on disk.
    pub fn record_oversize(&mut self, name: &str, size_bytes: u64, results_dir: &Path) {
        self.notes.push(format!(
            "{name}: file size {:.1} MB too large to attach, see {}",
            size_bytes as f64 / 1_000_000.0,
            results_dir.display()
        ));
    }

    /// Queues a CSV file for attachment.
    pub fn queue_attachment(&mut self, path: PathBuf) {
        self.attachments.push(path);
    }

    /// Number of summary entries (one per executed task).
    pub fn summary_len(&self) -> usize {
        self.summary.len()
    }

    /// Returns true if any task failed.
    pub fn has_errors(&self) -> bool {
        !self.error_text.is_empty()
    }

    /// The accumulated error text.
    pub fn error_text(&self) -> &str {
        &self.error_text
    }

    /// CSV files queued for attachment.
    pub fn attachments(&self) -> &[PathBuf] {
        &self.attachments
    }

    /// Renders the email subject for the given date.
    pub fn subject(&self, stamp: &str) -> String {
        format!("{SUBJECT_PREFIX} - {stamp}")
    }

    /// Renders the plain-text email body: a fixed preamble followed by the
    /// summary entries and any oversize notes.
    pub fn body(&self, stamp: &str) -> String {
        let mut body = format!("The following SQL audits returned results for {stamp}:\n");

        for entry in &self.summary {
            body.push('\n');
            body.push_str(entry);
            body.push('\n');
        }

        for note in &self.notes {
            body.push('\n');
            body.push_str(note);
            body.push('\n');
        }

        body
    }
}
