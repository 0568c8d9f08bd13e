use crate::domain::value::{LifetimeHours, MessageText, RawPhoneNumber, SendRate};

/// Optional settings for `SENDSMS`.
///
/// Campaigns always start and end as soon as possible (`AUTO`); only the
/// description, lifetime and rate are adjustable.
#[derive(Debug, Clone, Default)]
pub struct SendOptions {
    /// Campaign description shown in the SMS-fly web interface.
    pub description: String,
    pub lifetime: LifetimeHours,
    pub rate: SendRate,
}

#[derive(Debug, Clone)]
pub struct SendSms {
    recipient: RawPhoneNumber,
    text: MessageText,
    options: SendOptions,
}

impl SendSms {
    pub fn new(recipient: RawPhoneNumber, text: MessageText) -> Self {
        Self::with_options(recipient, text, SendOptions::default())
    }

    pub fn with_options(recipient: RawPhoneNumber, text: MessageText, options: SendOptions) -> Self {
        Self {
            recipient,
            text,
            options,
        }
    }

    /// Set the campaign description.
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.options.description = description.into();
        self
    }

    pub fn recipient(&self) -> &RawPhoneNumber {
        &self.recipient
    }

    pub fn text(&self) -> &MessageText {
        &self.text
    }

    pub fn options(&self) -> &SendOptions {
        &self.options
    }
}
