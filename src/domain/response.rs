use crate::domain::codes::DeliveryStatus;
use crate::domain::value::CampaignId;

/// Result of an accepted `SENDSMS` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SendSmsResponse {
    pub campaign_id: CampaignId,
    /// Status of the first recipient entry.
    pub status: DeliveryStatus,
}
