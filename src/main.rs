//! sqlaudit - scheduled SQL audit runner.

use chrono::Local;
use sql_audit::cli::Cli;
use sql_audit::config::{Config, ConnectionConfig, MailConfig};
use sql_audit::db;
use sql_audit::discovery;
use sql_audit::error::{AuditError, Result};
use sql_audit::mail::{MailMessage, Mailer, SmtpMailer};
use sql_audit::output::{self, OutputPaths};
use sql_audit::pipeline;
use sql_audit::report;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    if let Err(e) = run().await {
        error!("{}: {}", e.category(), e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse_args();

    // Load configuration file
    let config_path = cli.config_path();
    info!("Loading config from: {}", config_path.display());
    let config = Config::load_from_file(&config_path)?;

    let connection = resolve_connection(&cli, &config)?
        .ok_or_else(|| AuditError::config("No database connection configured"))?;
    info!("Connection: {}", connection.display_string());

    let paths = OutputPaths::new(&cli.root);
    paths.prepare()?;

    // Resolve the mail account up front so a bad mail config fails the run
    // before any query executes.
    let mail = if cli.no_email {
        None
    } else {
        Some(resolve_mail(&cli, &config, &paths)?)
    };

    let tasks = discovery::discover_tasks(&paths.scripts_dir)?;
    info!(
        "Discovered {} SQL script(s) under {}",
        tasks.len(),
        paths.scripts_dir.display()
    );

    // The session must be closed on every exit path, including after a
    // pipeline error, so the outcome is unwrapped only after close().
    let client = db::connect(&connection).await?;
    let outcome = pipeline::run_pipeline(tasks, client.as_ref(), &paths).await;
    client.close().await?;
    let (_tasks, run_report) = outcome?;

    if run_report.has_errors() {
        output::write_error_log(&paths.error_log, run_report.error_text())?;
    }

    let stamp = report::datestamp(Local::now().date_naive());
    let subject = run_report.subject(&stamp);
    let body = run_report.body(&stamp);

    let mut attachments = run_report.attachments().to_vec();
    if run_report.has_errors() {
        attachments.push(paths.error_log.clone());
    }

    match mail {
        Some(mail_config) => {
            let message = MailMessage {
                from: mail_config.from.clone(),
                to: mail_config.to.clone(),
                subject,
                body,
                attachments,
            };
            let mailer = SmtpMailer::new(&mail_config)?;
            mailer.send(&message).await?;
            info!("Report sent to {}", mail_config.to);
        }
        None => {
            info!("--no-email set, skipping delivery");
            println!("{subject}\n\n{body}");
        }
    }

    Ok(())
}

/// Resolves the final connection configuration from CLI args, config file, and environment.
fn resolve_connection(cli: &Cli, config: &Config) -> Result<Option<ConnectionConfig>> {
    // Start with CLI connection config if provided
    let mut connection = cli.to_connection_config()?;

    // If no CLI connection, try named connection from config
    if connection.is_none() {
        if let Some(name) = cli.connection_name() {
            connection = config.get_connection(Some(name)).cloned();
            if connection.is_none() {
                return Err(AuditError::config(format!(
                    "Connection '{}' not found in config file",
                    name
                )));
            }
        }
    }

    // If still no connection, try default from config
    if connection.is_none() {
        connection = config.get_connection(None).cloned();
    }

    // Apply environment variable defaults
    if let Some(ref mut conn) = connection {
        conn.apply_env_defaults();
    }

    Ok(connection)
}

/// Resolves the mail account: the config file's [mail] section, or the
/// legacy EMAILINFO/emailinfo.csv record combined with --smtp-host.
fn resolve_mail(cli: &Cli, config: &Config, paths: &OutputPaths) -> Result<MailConfig> {
    let mut mail = match &config.mail {
        Some(mail) => mail.clone(),
        None => {
            let host = cli.smtp_host.clone().ok_or_else(|| {
                AuditError::config(
                    "No [mail] section in config and no --smtp-host for the emailinfo.csv record",
                )
            })?;
            MailConfig::from_csv_record(&paths.mail_info, host, cli.smtp_port)?
        }
    };

    mail.apply_env_defaults();
    Ok(mail)
}
