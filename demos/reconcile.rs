//! Cron entry point: re-check every pending SMS-fly message in a SQLite table.
//!
//! Environment: `SMSFLY_LOGIN`, `SMSFLY_PASSWORD`, `SMSFLY_DB` (database path),
//! optional `SMSFLY_TABLE` (defaults to `sms_queue`).

use std::io;
use std::sync::Arc;

use smsfly::{ReconciliationJob, SmsFlyClientBuilder, SqliteMessageStore};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("smsfly=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let db_path = std::env::var("SMSFLY_DB").map_err(|_| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            "SMSFLY_DB environment variable is required",
        )
    })?;
    let table = std::env::var("SMSFLY_TABLE").unwrap_or_else(|_| "sms_queue".to_owned());

    let client = SmsFlyClientBuilder::from_env()?.build()?;
    let store = Arc::new(SqliteMessageStore::open(db_path, table)?);
    let report = ReconciliationJob::new(client).with_store(store).run().await?;

    for (id, error) in report.failures() {
        eprintln!("message {id}: {error}");
    }
    println!(
        "updated: {}, failed: {}",
        report.updated(),
        report.failed()
    );

    Ok(())
}
