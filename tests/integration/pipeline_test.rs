//! End-to-end pipeline scenarios against mock collaborators.
//!
//! These follow the whole run: discovery, sequential execution, CSV and
//! error-log output, report assembly, and delivery through a mock mailer.

use sql_audit::db::{ColumnInfo, MockDatabaseClient, QueryResult, Value};
use sql_audit::discovery::{discover_tasks, TaskStatus};
use sql_audit::mail::{FailingMailer, MailMessage, Mailer, MockMailer};
use sql_audit::output::{self, OutputPaths};
use sql_audit::pipeline::run_pipeline;
use std::fs;
use tempfile::TempDir;

const FIVE_ROWS_SQL: &str = "SELECT region, open FROM tickets";
const EMPTY_SQL: &str = "SELECT region FROM tickets WHERE 1 = 0";
const BROKEN_SQL: &str = "SELECT * FORM tickets";

fn five_row_result() -> QueryResult {
    QueryResult::with_data(
        vec![
            ColumnInfo::new("region", "text"),
            ColumnInfo::new("open", "integer"),
        ],
        (0..5)
            .map(|i| vec![Value::String(format!("region-{i}")), Value::Int(i)])
            .collect(),
    )
}

fn empty_result() -> QueryResult {
    QueryResult::with_data(vec![ColumnInfo::new("region", "text")], vec![])
}

/// Seeds ROOT/SQL with the three scenario scripts and returns the layout.
fn seed_three_scripts(root: &TempDir) -> OutputPaths {
    let paths = OutputPaths::new(root.path());
    fs::create_dir_all(&paths.scripts_dir).unwrap();
    fs::write(paths.scripts_dir.join("a_regions.sql"), FIVE_ROWS_SQL).unwrap();
    fs::write(paths.scripts_dir.join("b_empty.sql"), EMPTY_SQL).unwrap();
    fs::write(paths.scripts_dir.join("c_broken.sql"), BROKEN_SQL).unwrap();
    paths.prepare().unwrap();
    paths
}

fn scenario_db() -> MockDatabaseClient {
    MockDatabaseClient::new()
        .with_result(FIVE_ROWS_SQL, five_row_result())
        .with_result(EMPTY_SQL, empty_result())
        .with_failure(BROKEN_SQL, "ERROR: syntax error at or near \"FORM\"")
}

#[tokio::test]
async fn test_three_script_scenario() {
    let root = TempDir::new().unwrap();
    let paths = seed_three_scripts(&root);
    let db = scenario_db();

    let tasks = discover_tasks(&paths.scripts_dir).unwrap();
    assert_eq!(tasks.len(), 3);

    let (finished, report) = run_pipeline(tasks, &db, &paths).await.unwrap();

    // One summary entry per discovered task
    assert_eq!(report.summary_len(), 3);

    // Statuses in sorted path order: a succeeds, b succeeds, c fails
    assert_eq!(finished[0].status, TaskStatus::Succeeded);
    assert_eq!(finished[0].row_count(), 5);
    assert_eq!(finished[1].status, TaskStatus::Succeeded);
    assert_eq!(finished[1].row_count(), 0);
    assert_eq!(finished[2].status, TaskStatus::Failed);

    // Exactly one CSV attachment candidate (the five-row result)
    assert_eq!(report.attachments().len(), 1);
    assert!(paths.result_csv("a_regions").exists());
    assert!(!paths.result_csv("b_empty").exists());
    assert!(!paths.result_csv("c_broken").exists());

    // The failure contributed to the error text
    assert!(report.has_errors());
    assert!(report.error_text().contains("c_broken failed"));
    assert!(report.error_text().contains("syntax error"));
}

#[tokio::test]
async fn test_three_script_scenario_mail_has_two_attachments() {
    let root = TempDir::new().unwrap();
    let paths = seed_three_scripts(&root);
    let db = scenario_db();

    let tasks = discover_tasks(&paths.scripts_dir).unwrap();
    let (_, report) = run_pipeline(tasks, &db, &paths).await.unwrap();

    output::write_error_log(&paths.error_log, report.error_text()).unwrap();

    let mut attachments = report.attachments().to_vec();
    if report.has_errors() {
        attachments.push(paths.error_log.clone());
    }

    let message = MailMessage {
        from: "audits@example.com".to_string(),
        to: "team@example.com".to_string(),
        subject: report.subject("Friday, May 04 2018"),
        body: report.body("Friday, May 04 2018"),
        attachments,
    };

    let mailer = MockMailer::new();
    mailer.send(&message).await.unwrap();

    let sent = mailer.sent();
    assert_eq!(sent.len(), 1);
    // One CSV plus the error log
    assert_eq!(sent[0].attachments.len(), 2);
    assert!(sent[0]
        .attachments
        .iter()
        .any(|p| p.ends_with("errorlog.txt")));
}

#[tokio::test]
async fn test_missing_scripts_dir_still_sends_report() {
    let root = TempDir::new().unwrap();
    let paths = OutputPaths::new(root.path());
    paths.prepare().unwrap();

    let db = MockDatabaseClient::new();
    let tasks = discover_tasks(&paths.scripts_dir).unwrap();
    let (finished, report) = run_pipeline(tasks, &db, &paths).await.unwrap();

    assert!(finished.is_empty());
    assert_eq!(report.summary_len(), 0);
    assert!(report.attachments().is_empty());

    // Body is the preamble only
    let body = report.body("Friday, May 04 2018");
    assert_eq!(
        body,
        "The following SQL audits returned results for Friday, May 04 2018:\n"
    );

    // The report still goes out, with no attachments
    let message = MailMessage {
        from: "audits@example.com".to_string(),
        to: "team@example.com".to_string(),
        subject: report.subject("Friday, May 04 2018"),
        body,
        attachments: report.attachments().to_vec(),
    };

    let mailer = MockMailer::new();
    mailer.send(&message).await.unwrap();

    let sent = mailer.sent();
    assert_eq!(sent.len(), 1);
    assert!(sent[0].attachments.is_empty());
}

#[tokio::test]
async fn test_rejected_delivery_surfaces_error() {
    let report_subject = "Weekly SQL Audits - Friday, May 04 2018".to_string();
    let message = MailMessage {
        from: "audits@example.com".to_string(),
        to: "team@example.com".to_string(),
        subject: report_subject,
        body: "body".to_string(),
        attachments: vec![],
    };

    let mailer = FailingMailer::default();
    let err = mailer.send(&message).await.unwrap_err();

    assert_eq!(err.category(), "Delivery Error");
}

#[tokio::test]
async fn test_written_csv_roundtrips_row_count_and_columns() {
    let root = TempDir::new().unwrap();
    let paths = seed_three_scripts(&root);
    let db = scenario_db();

    let tasks = discover_tasks(&paths.scripts_dir).unwrap();
    let (finished, _) = run_pipeline(tasks, &db, &paths).await.unwrap();

    let csv_path = paths.result_csv("a_regions");
    let mut reader = csv::Reader::from_path(&csv_path).unwrap();

    let headers: Vec<String> = reader.headers().unwrap().iter().map(String::from).collect();
    let original_columns: Vec<String> = finished[0]
        .result
        .columns
        .iter()
        .map(|c| c.name.clone())
        .collect();
    assert_eq!(headers, original_columns);

    let row_count = reader.records().filter(|r| r.is_ok()).count();
    assert_eq!(row_count, finished[0].row_count());
}
