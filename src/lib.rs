//! Typed Rust client for the SMS-fly XML API.
//!
//! The crate has a domain layer of strong types and code catalogs, a transport
//! layer for the XML wire format, a small client layer orchestrating requests,
//! and a reconciliation job that keeps stored delivery statuses in sync with
//! the gateway.
//!
//! ```rust,no_run
//! use smsfly::{Auth, MessageText, RawPhoneNumber, SendSms, SmsFlyClient};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), smsfly::SmsFlyError> {
//!     let client = SmsFlyClient::builder(Auth::new("login", "password")?)
//!         .without_alias()
//!         .build()?;
//!     let phone = RawPhoneNumber::new("+380501234567")?;
//!     let request = SendSms::new(phone.clone(), MessageText::new("hello")?);
//!     let sent = client.send_sms(&request).await?;
//!     let status = client.check_status(&sent.campaign_id, &phone).await?;
//!     println!("{status}: {}", status.description());
//!     Ok(())
//! }
//! ```
#![forbid(unsafe_code)]

pub mod client;
pub mod domain;
pub mod provider;
pub mod reconcile;
mod transport;

pub use client::{Auth, PROCESSING_KEY, SmsFlyClient, SmsFlyClientBuilder, SmsFlyError};
pub use domain::{
    CampaignId, DeliveryStatus, ErrorCode, KnownErrorCode, KnownStateCode, LifetimeHours,
    MessageText, PhoneNumber, RawPhoneNumber, SendOptions, SendRate, SendSms, SendSmsResponse,
    SenderAlias, ValidationError, error_text, process_phone, state_text,
};
pub use provider::SmsProvider;
pub use reconcile::{
    ItemError, ItemOutcome, MessageStore, MessageUpdate, ReconcileError, ReconcileReport,
    ReconciliationJob, SqliteMessageStore, StoreError, TrackedMessage,
};
