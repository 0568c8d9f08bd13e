//! Delivery-status reconciliation for messages the gateway has not finalized yet.
//!
//! The job is meant to be re-run on a schedule: a message whose status query
//! fails keeps its previous status and is picked up again next time.

mod sqlite;
mod store;

use std::error::Error as StdError;
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::domain::{DeliveryStatus, RawPhoneNumber, ValidationError};
use crate::provider::SmsProvider;

pub use sqlite::SqliteMessageStore;
pub use store::{MessageStore, MessageUpdate, MetadataError, StoreError, TrackedMessage};

#[derive(Debug, thiserror::Error)]
/// Errors that stop a reconciliation run before any message is processed.
pub enum ReconcileError {
    #[error("configuration error: {0}")]
    Configuration(&'static str),

    #[error("failed to load pending messages: {0}")]
    Store(#[from] StoreError),
}

#[derive(Debug, thiserror::Error)]
/// Failure of a single message; never aborts the batch.
pub enum ItemError {
    #[error("{0}")]
    Metadata(#[from] MetadataError),

    #[error("invalid recipient: {0}")]
    Recipient(#[from] ValidationError),

    #[error("status query failed: {0}")]
    Gateway(#[source] Box<dyn StdError + Send + Sync>),

    #[error("status update failed: {0}")]
    Store(#[source] StoreError),
}

#[derive(Debug)]
pub enum ItemOutcome {
    Updated { id: i64, status: DeliveryStatus },
    Failed { id: i64, error: ItemError },
}

impl ItemOutcome {
    pub fn id(&self) -> i64 {
        match self {
            Self::Updated { id, .. } | Self::Failed { id, .. } => *id,
        }
    }
}

/// Per-message results of one reconciliation run, in processing order.
#[derive(Debug, Default)]
pub struct ReconcileReport {
    pub outcomes: Vec<ItemOutcome>,
}

impl ReconcileReport {
    pub fn updated(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|outcome| matches!(outcome, ItemOutcome::Updated { .. }))
            .count()
    }

    pub fn failed(&self) -> usize {
        self.outcomes.len() - self.updated()
    }

    pub fn failures(&self) -> impl Iterator<Item = (i64, &ItemError)> {
        self.outcomes.iter().filter_map(|outcome| match outcome {
            ItemOutcome::Failed { id, error } => Some((*id, error)),
            ItemOutcome::Updated { .. } => None,
        })
    }
}

/// Re-checks the status of every pending message of one provider.
pub struct ReconciliationJob<P> {
    provider: P,
    store: Option<Arc<dyn MessageStore>>,
}

impl<P: SmsProvider> ReconciliationJob<P> {
    pub fn new(provider: P) -> Self {
        Self {
            provider,
            store: None,
        }
    }

    /// Bind the store holding tracked messages. Required before [`Self::run`].
    pub fn with_store(mut self, store: Arc<dyn MessageStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Query the gateway for each pending message, one at a time, and store
    /// the reported status.
    ///
    /// Failures of individual messages are logged and collected in the
    /// report; only a missing store binding or a failing candidate query
    /// fail the whole run.
    pub async fn run(&self) -> Result<ReconcileReport, ReconcileError> {
        let store = self
            .store
            .as_deref()
            .ok_or(ReconcileError::Configuration("message store is not bound"))?;
        let processing_key = self.provider.processing_key();

        let candidates = store.select_pending(processing_key)?;
        debug!(processing_key, candidates = candidates.len(), "reconciling pending messages");

        let mut report = ReconcileReport::default();
        for message in &candidates {
            let outcome = match self.reconcile_one(store, message).await {
                Ok(status) => ItemOutcome::Updated {
                    id: message.id,
                    status,
                },
                Err(error) => {
                    warn!(id = message.id, %error, "skipping message status update");
                    ItemOutcome::Failed {
                        id: message.id,
                        error,
                    }
                }
            };
            report.outcomes.push(outcome);
        }

        info!(
            processing_key,
            updated = report.updated(),
            failed = report.failed(),
            "reconciliation finished"
        );
        Ok(report)
    }

    async fn reconcile_one(
        &self,
        store: &dyn MessageStore,
        message: &TrackedMessage,
    ) -> Result<DeliveryStatus, ItemError> {
        let campaign_id = message.campaign_id()?;
        let recipient = RawPhoneNumber::new(message.to.as_str())?;

        let status = self
            .provider
            .check_status(&campaign_id, &recipient)
            .await
            .map_err(|err| ItemError::Gateway(Box::new(err)))?;

        store
            .update(message.id, &MessageUpdate::now(status.clone()))
            .map_err(ItemError::Store)?;
        Ok(status)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::io;
    use std::sync::Mutex;

    use crate::client::SmsFlyError;
    use crate::domain::{CampaignId, SendSms, SendSmsResponse};
    use crate::provider::BoxFuture;

    use super::*;

    /// Answers status queries from a campaign-id keyed table; unknown campaigns time out.
    struct FakeProvider {
        statuses: HashMap<String, String>,
        queries: Mutex<Vec<(String, String)>>,
    }

    impl FakeProvider {
        fn new(statuses: &[(&str, &str)]) -> Self {
            Self {
                statuses: statuses
                    .iter()
                    .map(|(id, status)| ((*id).to_owned(), (*status).to_owned()))
                    .collect(),
                queries: Mutex::new(Vec::new()),
            }
        }
    }

    impl SmsProvider for Arc<FakeProvider> {
        type Error = SmsFlyError;

        fn processing_key(&self) -> &'static str {
            "sms_fly"
        }

        fn send<'a>(
            &'a self,
            _request: &'a SendSms,
        ) -> BoxFuture<'a, Result<SendSmsResponse, Self::Error>> {
            Box::pin(async {
                Err(SmsFlyError::Transport(Box::new(io::Error::other(
                    "reconciliation never sends",
                ))))
            })
        }

        fn check_status<'a>(
            &'a self,
            campaign_id: &'a CampaignId,
            recipient: &'a RawPhoneNumber,
        ) -> BoxFuture<'a, Result<DeliveryStatus, Self::Error>> {
            Box::pin(async move {
                self.queries
                    .lock()
                    .unwrap()
                    .push((campaign_id.as_str().to_owned(), recipient.wire()));
                match self.statuses.get(campaign_id.as_str()) {
                    Some(status) => Ok(DeliveryStatus::new(status.as_str())),
                    None => Err(SmsFlyError::Transport(Box::new(io::Error::new(
                        io::ErrorKind::TimedOut,
                        "timed out",
                    )))),
                }
            })
        }

        fn get_balance(&self) -> BoxFuture<'_, Result<f64, Self::Error>> {
            Box::pin(async { Ok(0.0) })
        }
    }

    #[derive(Default)]
    struct FakeStore {
        pending: Vec<TrackedMessage>,
        fail_select: bool,
        fail_update_for: Option<i64>,
        selected_key: Mutex<Option<String>>,
        updates: Mutex<Vec<(i64, MessageUpdate)>>,
    }

    impl MessageStore for FakeStore {
        fn select_pending(&self, processing_key: &str) -> Result<Vec<TrackedMessage>, StoreError> {
            *self.selected_key.lock().unwrap() = Some(processing_key.to_owned());
            if self.fail_select {
                return Err(StoreError::LockPoisoned);
            }
            Ok(self.pending.clone())
        }

        fn update(&self, id: i64, update: &MessageUpdate) -> Result<(), StoreError> {
            if self.fail_update_for == Some(id) {
                return Err(StoreError::NotFound { id });
            }
            self.updates.lock().unwrap().push((id, update.clone()));
            Ok(())
        }
    }

    fn tracked(id: i64, to: &str, campaign_id: &str) -> TrackedMessage {
        TrackedMessage {
            id,
            to: to.to_owned(),
            processing_data: Some(format!(r#"{{"first":{{"campaignID":"{campaign_id}"}}}}"#)),
            processing_status: Some("SENT".to_owned()),
        }
    }

    fn updated_ids(store: &FakeStore) -> Vec<(i64, String)> {
        store
            .updates
            .lock()
            .unwrap()
            .iter()
            .map(|(id, update)| (*id, update.processing_status.as_str().to_owned()))
            .collect()
    }

    #[tokio::test]
    async fn failing_status_query_skips_only_that_message() {
        let provider = Arc::new(FakeProvider::new(&[("200", "DELIVERED")]));
        let store = Arc::new(FakeStore {
            pending: vec![
                tracked(1, "+380501111111", "100"),
                tracked(2, "+380502222222", "200"),
            ],
            ..Default::default()
        });

        let job = ReconciliationJob::new(provider.clone()).with_store(store.clone());
        let report = job.run().await.unwrap();

        assert_eq!(updated_ids(&store), vec![(2, "DELIVERED".to_owned())]);
        assert_eq!(report.updated(), 1);
        assert_eq!(report.failed(), 1);
        let failures = report.failures().collect::<Vec<_>>();
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].0, 1);
        assert!(matches!(failures[0].1, ItemError::Gateway(_)));

        assert_eq!(
            *provider.queries.lock().unwrap(),
            vec![
                ("100".to_owned(), "380501111111".to_owned()),
                ("200".to_owned(), "380502222222".to_owned()),
            ]
        );
        assert_eq!(
            store.selected_key.lock().unwrap().as_deref(),
            Some("sms_fly")
        );
    }

    #[tokio::test]
    async fn malformed_metadata_is_isolated() {
        let provider = Arc::new(FakeProvider::new(&[("300", "PENDING")]));
        let mut broken = tracked(1, "+380501111111", "ignored");
        broken.processing_data = Some("{oops".to_owned());
        let mut empty_phone = tracked(2, "  ", "300");
        empty_phone.processing_status = None;
        let store = Arc::new(FakeStore {
            pending: vec![broken, empty_phone, tracked(3, "380503333333", "300")],
            ..Default::default()
        });

        let report = ReconciliationJob::new(provider.clone())
            .with_store(store.clone())
            .run()
            .await
            .unwrap();

        assert_eq!(updated_ids(&store), vec![(3, "PENDING".to_owned())]);
        let ids = report.outcomes.iter().map(ItemOutcome::id).collect::<Vec<_>>();
        assert_eq!(ids, vec![1, 2, 3]);
        assert!(matches!(
            report.outcomes[0],
            ItemOutcome::Failed {
                error: ItemError::Metadata(MetadataError::Json(_)),
                ..
            }
        ));
        assert!(matches!(
            report.outcomes[1],
            ItemOutcome::Failed {
                error: ItemError::Recipient(_),
                ..
            }
        ));
        assert_eq!(provider.queries.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn failing_update_does_not_abort_the_batch() {
        let provider = Arc::new(FakeProvider::new(&[("1", "SENT"), ("2", "EXPIRED")]));
        let store = Arc::new(FakeStore {
            pending: vec![tracked(1, "380501", "1"), tracked(2, "380502", "2")],
            fail_update_for: Some(1),
            ..Default::default()
        });

        let report = ReconciliationJob::new(provider)
            .with_store(store.clone())
            .run()
            .await
            .unwrap();

        assert_eq!(updated_ids(&store), vec![(2, "EXPIRED".to_owned())]);
        assert!(matches!(
            report.outcomes[0],
            ItemOutcome::Failed {
                id: 1,
                error: ItemError::Store(StoreError::NotFound { id: 1 })
            }
        ));
    }

    #[tokio::test]
    async fn run_without_store_is_a_configuration_error() {
        let provider = Arc::new(FakeProvider::new(&[]));
        let err = ReconciliationJob::new(provider).run().await.unwrap_err();
        assert!(matches!(err, ReconcileError::Configuration(_)));
    }

    #[tokio::test]
    async fn failing_candidate_query_fails_the_run() {
        let provider = Arc::new(FakeProvider::new(&[]));
        let store = Arc::new(FakeStore {
            fail_select: true,
            ..Default::default()
        });
        let err = ReconciliationJob::new(provider)
            .with_store(store)
            .run()
            .await
            .unwrap_err();
        assert!(matches!(err, ReconcileError::Store(StoreError::LockPoisoned)));
    }

    #[tokio::test]
    async fn empty_batch_produces_empty_report() {
        let provider = Arc::new(FakeProvider::new(&[]));
        let store = Arc::new(FakeStore::default());
        let report = ReconciliationJob::new(provider)
            .with_store(store)
            .run()
            .await
            .unwrap();
        assert!(report.outcomes.is_empty());
        assert_eq!(report.failed(), 0);
    }
}
