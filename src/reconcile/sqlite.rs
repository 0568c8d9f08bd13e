use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use rusqlite::{Connection, params};
use tracing::debug;

use super::store::{MessageStore, MessageUpdate, StoreError, TrackedMessage};
use crate::domain::KnownStateCode;

/// Campaign status written by the send step once the gateway call finished.
const COMPLETE_STATUS: &str = "complete";

/// [`MessageStore`] backed by a SQLite table.
///
/// The table is expected to have at least the columns `id`, `"to"`,
/// `processing`, `processing_data`, `processing_status`, `status` and
/// `updated_at`. The schema is not created or migrated here.
pub struct SqliteMessageStore {
    conn: Mutex<Connection>,
    table: String,
}

impl SqliteMessageStore {
    /// Wrap an open connection. `table` must be a plain SQL identifier.
    pub fn new(conn: Connection, table: impl Into<String>) -> Result<Self, StoreError> {
        let table = table.into();
        if !is_identifier(&table) {
            return Err(StoreError::InvalidTable { name: table });
        }
        Ok(Self {
            conn: Mutex::new(conn),
            table,
        })
    }

    /// Open the database at `path`.
    pub fn open(path: impl AsRef<Path>, table: impl Into<String>) -> Result<Self, StoreError> {
        let conn = Connection::open(path)?;
        conn.busy_timeout(std::time::Duration::from_secs(5))?;
        Self::new(conn, table)
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>, StoreError> {
        self.conn.lock().map_err(|_| StoreError::LockPoisoned)
    }
}

impl MessageStore for SqliteMessageStore {
    fn select_pending(&self, processing_key: &str) -> Result<Vec<TrackedMessage>, StoreError> {
        let non_terminal = KnownStateCode::NON_TERMINAL
            .iter()
            .map(|state| format!("'{}'", state.as_str()))
            .collect::<Vec<_>>()
            .join(", ");
        let sql = format!(
            "SELECT id, \"to\", processing_data, processing_status FROM {}
             WHERE processing = ?1 AND status = ?2
               AND (processing_status IS NULL OR processing_status IN ({non_terminal}))
             ORDER BY id",
            self.table
        );

        let conn = self.conn()?;
        let mut stmt = conn.prepare(&sql)?;
        let messages = stmt
            .query_map(params![processing_key, COMPLETE_STATUS], |row| {
                Ok(TrackedMessage {
                    id: row.get(0)?,
                    to: row.get(1)?,
                    processing_data: row.get(2)?,
                    processing_status: row.get(3)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        debug!(table = %self.table, processing_key, count = messages.len(), "selected pending messages");
        Ok(messages)
    }

    fn update(&self, id: i64, update: &MessageUpdate) -> Result<(), StoreError> {
        let sql = format!(
            "UPDATE {} SET processing_status = ?1, updated_at = ?2 WHERE id = ?3",
            self.table
        );
        let changed = self.conn()?.execute(
            &sql,
            params![
                update.processing_status.as_str(),
                update.updated_at.to_rfc3339(),
                id
            ],
        )?;
        if changed == 0 {
            return Err(StoreError::NotFound { id });
        }
        Ok(())
    }
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    matches!(chars.next(), Some(first) if first.is_ascii_alphabetic() || first == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::{TimeZone, Utc};

    use super::*;
    use crate::client::SmsFlyError;
    use crate::domain::{CampaignId, DeliveryStatus, RawPhoneNumber, SendSms, SendSmsResponse};
    use crate::provider::{BoxFuture, SmsProvider};
    use crate::reconcile::ReconciliationJob;

    const SCHEMA: &str = "
        CREATE TABLE sms_queue (
            id INTEGER PRIMARY KEY,
            \"to\" TEXT NOT NULL,
            processing TEXT NOT NULL,
            processing_data TEXT,
            processing_status TEXT,
            status TEXT NOT NULL,
            updated_at TEXT
        );
    ";

    fn seeded_store() -> SqliteMessageStore {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(SCHEMA).unwrap();
        let rows: [(i64, &str, &str, Option<&str>, &str); 7] = [
            (1, "sms_fly", r#"{"first":{"campaignID":"11"}}"#, None, "complete"),
            (2, "sms_fly", r#"{"first":{"campaignID":"12"}}"#, Some("SENT"), "complete"),
            (3, "sms_fly", r#"{"first":{"campaignID":"13"}}"#, Some("DELIVERED"), "complete"),
            (4, "sms_fly", r#"{"first":{"campaignID":"14"}}"#, Some("PENDING"), "new"),
            (5, "other", r#"{"first":{"campaignID":"15"}}"#, None, "complete"),
            (6, "sms_fly", r#"{"first":{"campaignID":"16"}}"#, Some("ACCEPTED"), "complete"),
            (7, "sms_fly", r#"{"first":{"campaignID":"17"}}"#, Some("EXPIRED"), "complete"),
        ];
        for (id, processing, data, processing_status, status) in rows {
            conn.execute(
                "INSERT INTO sms_queue (id, \"to\", processing, processing_data, processing_status, status)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![id, format!("+38050{id:07}"), processing, data, processing_status, status],
            )
            .unwrap();
        }
        SqliteMessageStore::new(conn, "sms_queue").unwrap()
    }

    fn status_of(store: &SqliteMessageStore, id: i64) -> (Option<String>, Option<String>) {
        store
            .conn()
            .unwrap()
            .query_row(
                "SELECT processing_status, updated_at FROM sms_queue WHERE id = ?1",
                params![id],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .unwrap()
    }

    #[test]
    fn rejects_non_identifier_table_names() {
        for name in ["", "1table", "sms; DROP TABLE x", "a-b", "\"quoted\""] {
            let conn = Connection::open_in_memory().unwrap();
            assert!(matches!(
                SqliteMessageStore::new(conn, name),
                Err(StoreError::InvalidTable { .. })
            ));
        }
        let conn = Connection::open_in_memory().unwrap();
        assert_eq!(
            SqliteMessageStore::new(conn, "_sms_2").unwrap().table(),
            "_sms_2"
        );
    }

    #[test]
    fn select_pending_filters_by_key_completion_and_state() {
        let store = seeded_store();
        let pending = store.select_pending("sms_fly").unwrap();

        let ids = pending.iter().map(|msg| msg.id).collect::<Vec<_>>();
        assert_eq!(ids, vec![1, 2, 6]);
        assert_eq!(pending[0].to, "+380500000001");
        assert_eq!(pending[0].processing_status, None);
        assert_eq!(pending[1].processing_status.as_deref(), Some("SENT"));
        assert_eq!(pending[2].campaign_id().unwrap().as_str(), "16");
    }

    #[test]
    fn update_writes_status_and_timestamp() {
        let store = seeded_store();
        let updated_at = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        store
            .update(
                2,
                &MessageUpdate {
                    processing_status: DeliveryStatus::new("DELIVERED"),
                    updated_at,
                },
            )
            .unwrap();

        assert_eq!(
            status_of(&store, 2),
            (
                Some("DELIVERED".to_owned()),
                Some("2024-05-01T12:00:00+00:00".to_owned())
            )
        );
        let pending = store.select_pending("sms_fly").unwrap();
        assert!(pending.iter().all(|msg| msg.id != 2));
    }

    #[test]
    fn update_of_missing_row_is_not_found() {
        let store = seeded_store();
        let err = store
            .update(99, &MessageUpdate::now(DeliveryStatus::new("SENT")))
            .unwrap_err();
        assert!(matches!(err, StoreError::NotFound { id: 99 }));
    }

    struct OneFailingProvider;

    impl SmsProvider for OneFailingProvider {
        type Error = SmsFlyError;

        fn processing_key(&self) -> &'static str {
            "sms_fly"
        }

        fn send<'a>(
            &'a self,
            _request: &'a SendSms,
        ) -> BoxFuture<'a, Result<SendSmsResponse, Self::Error>> {
            Box::pin(async {
                Err(SmsFlyError::Transport(Box::new(std::io::Error::other(
                    "not used",
                ))))
            })
        }

        fn check_status<'a>(
            &'a self,
            campaign_id: &'a CampaignId,
            _recipient: &'a RawPhoneNumber,
        ) -> BoxFuture<'a, Result<DeliveryStatus, Self::Error>> {
            Box::pin(async move {
                if campaign_id.as_str() == "11" {
                    return Err(SmsFlyError::Transport(Box::new(std::io::Error::other(
                        "connection reset",
                    ))));
                }
                Ok(DeliveryStatus::new("DELIVERED"))
            })
        }

        fn get_balance(&self) -> BoxFuture<'_, Result<f64, Self::Error>> {
            Box::pin(async { Ok(0.0) })
        }
    }

    #[tokio::test]
    async fn job_keeps_failed_rows_eligible_for_the_next_run() {
        let store = Arc::new(seeded_store());
        let job = ReconciliationJob::new(OneFailingProvider).with_store(store.clone());

        let report = job.run().await.unwrap();
        assert_eq!(report.updated(), 2);
        assert_eq!(report.failed(), 1);

        assert_eq!(status_of(&store, 1).0, None);
        assert_eq!(status_of(&store, 2).0.as_deref(), Some("DELIVERED"));
        assert_eq!(status_of(&store, 6).0.as_deref(), Some("DELIVERED"));

        let pending = store.select_pending("sms_fly").unwrap();
        assert_eq!(pending.iter().map(|msg| msg.id).collect::<Vec<_>>(), vec![1]);
    }
}
