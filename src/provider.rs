//! Provider capability contract shared by SMS gateway clients.

use std::error::Error as StdError;
use std::future::Future;
use std::pin::Pin;

use crate::client::{SmsFlyClient, SmsFlyError};
use crate::domain::{CampaignId, DeliveryStatus, RawPhoneNumber, SendSms, SendSmsResponse};

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Operations the reconciliation job and callers need from an SMS gateway.
///
/// Each gateway normalizes phone numbers and credentials on its own; nothing
/// is shared between implementations.
pub trait SmsProvider: Send + Sync {
    type Error: StdError + Send + Sync + 'static;

    /// Key stored next to each message to tell gateways apart.
    fn processing_key(&self) -> &'static str;

    fn send<'a>(
        &'a self,
        request: &'a SendSms,
    ) -> BoxFuture<'a, Result<SendSmsResponse, Self::Error>>;

    fn check_status<'a>(
        &'a self,
        campaign_id: &'a CampaignId,
        recipient: &'a RawPhoneNumber,
    ) -> BoxFuture<'a, Result<DeliveryStatus, Self::Error>>;

    fn get_balance(&self) -> BoxFuture<'_, Result<f64, Self::Error>>;
}

impl SmsProvider for SmsFlyClient {
    type Error = SmsFlyError;

    fn processing_key(&self) -> &'static str {
        SmsFlyClient::processing_key(self)
    }

    fn send<'a>(
        &'a self,
        request: &'a SendSms,
    ) -> BoxFuture<'a, Result<SendSmsResponse, Self::Error>> {
        Box::pin(self.send_sms(request))
    }

    fn check_status<'a>(
        &'a self,
        campaign_id: &'a CampaignId,
        recipient: &'a RawPhoneNumber,
    ) -> BoxFuture<'a, Result<DeliveryStatus, Self::Error>> {
        Box::pin(SmsFlyClient::check_status(self, campaign_id, recipient))
    }

    fn get_balance(&self) -> BoxFuture<'_, Result<f64, Self::Error>> {
        Box::pin(SmsFlyClient::get_balance(self))
    }
}
