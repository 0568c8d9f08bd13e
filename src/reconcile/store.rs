use std::error::Error as StdError;

use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::domain::{CampaignId, DeliveryStatus, ValidationError};

/// Row of the external message table the reconciliation job works on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackedMessage {
    pub id: i64,
    /// Recipient phone as stored (may carry a leading `+`).
    pub to: String,
    /// JSON recorded by the send step; `first.campaignID` holds the campaign id.
    pub processing_data: Option<String>,
    pub processing_status: Option<String>,
}

impl TrackedMessage {
    /// Recover the campaign id recorded when the message was sent.
    pub fn campaign_id(&self) -> Result<CampaignId, MetadataError> {
        let raw = self
            .processing_data
            .as_deref()
            .filter(|raw| !raw.trim().is_empty())
            .ok_or(MetadataError::Missing)?;
        let data: ProcessingData = serde_json::from_str(raw)?;
        let campaign_id = match data.first.campaign_id {
            StoredCampaignId::Text(value) => CampaignId::new(value)?,
            StoredCampaignId::Number(value) => CampaignId::from(value),
        };
        Ok(campaign_id)
    }
}

#[derive(Debug, Deserialize)]
struct ProcessingData {
    first: FirstSend,
}

#[derive(Debug, Deserialize)]
struct FirstSend {
    #[serde(rename = "campaignID")]
    campaign_id: StoredCampaignId,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum StoredCampaignId {
    Text(String),
    Number(u64),
}

#[derive(Debug, thiserror::Error)]
pub enum MetadataError {
    #[error("processing data is missing")]
    Missing,

    #[error("processing data is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("processing data has an invalid campaign id: {0}")]
    CampaignId(#[from] ValidationError),
}

/// Partial update written after a successful status query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageUpdate {
    pub processing_status: DeliveryStatus,
    pub updated_at: DateTime<Utc>,
}

impl MessageUpdate {
    pub fn now(processing_status: DeliveryStatus) -> Self {
        Self {
            processing_status,
            updated_at: Utc::now(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("invalid table name: {name:?}")]
    InvalidTable { name: String },

    #[error("message {id} not found")]
    NotFound { id: i64 },

    #[error("store lock poisoned")]
    LockPoisoned,

    #[error("store backend error: {0}")]
    Backend(#[source] Box<dyn StdError + Send + Sync>),
}

/// Persistence the reconciliation job reads candidates from and writes results to.
pub trait MessageStore: Send + Sync {
    /// Messages of `processing_key` whose send step is complete and whose
    /// processing status is empty or not yet final, in store order.
    fn select_pending(&self, processing_key: &str) -> Result<Vec<TrackedMessage>, StoreError>;

    /// Apply `update` to the single row identified by `id`.
    fn update(&self, id: i64, update: &MessageUpdate) -> Result<(), StoreError>;
}
