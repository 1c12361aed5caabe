//! Sequential query execution.
//!
//! Runs every discovered task against the single open database session,
//! strictly one at a time. Scripts may have side effects or contend for
//! resources, so tasks are never executed concurrently. A failing task is
//! recorded and the batch continues; nothing here is fail-fast.

use crate::db::DatabaseClient;
use crate::discovery::{QueryTask, TaskStatus};
use crate::error::Result;
use crate::output::{self, OutputPaths, MAX_ATTACHMENT_BYTES};
use crate::report::ExecutionReport;
use std::time::Instant;
use tracing::{info, warn};

/// Executes all tasks in order and returns the finalized tasks along with
/// the accumulated report.
///
/// Per task: execute, record status and timing, append a summary entry.
/// Successful non-empty results are serialized to CSV under the results
/// directory; files over the attachment cap are noted in the report rather
/// than queued. Only results-directory I/O failures abort the run.
pub async fn run_pipeline(
    tasks: Vec<QueryTask>,
    db: &dyn DatabaseClient,
    paths: &OutputPaths,
) -> Result<(Vec<QueryTask>, ExecutionReport)> {
    let mut report = ExecutionReport::new();
    let mut finished = Vec::with_capacity(tasks.len());

    for mut task in tasks {
        info!("Querying {}...", task.name);
        let start = Instant::now();

        match db.execute_query(&task.source_text).await {
            Ok(result) => {
                task.elapsed = start.elapsed();
                task.status = TaskStatus::Succeeded;
                task.result = result;

                report.record_success(&task.name, task.row_count(), task.elapsed);
                info!(
                    "{} complete, {} rows found in {:.3}s",
                    task.name,
                    task.row_count(),
                    task.elapsed.as_secs_f64()
                );

                if !task.result.is_empty() {
                    let path = paths.result_csv(&task.name);
                    let size = output::write_result_csv(&path, &task.result)?;

                    if size > MAX_ATTACHMENT_BYTES {
                        warn!(
                            "{} result is {} bytes, too large to attach",
                            task.name, size
                        );
                        report.record_oversize(&task.name, size, &paths.results_dir);
                    } else {
                        report.queue_attachment(path);
                    }
                }
            }
            Err(e) => {
                task.status = TaskStatus::Failed;
                warn!("Query failed for {}: {}", task.name, e);
                report.record_failure(&task.name, &e.to_string());
            }
        }

        finished.push(task);
    }

    Ok((finished, report))
}
