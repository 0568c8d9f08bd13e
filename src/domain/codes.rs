//! Provider code catalogs: SMS-fly error codes and message state codes.

use std::borrow::Cow;
use std::fmt;

/// `state@code` value SMS-fly returns when a `SENDSMS` campaign is accepted.
pub const ACCEPT_CODE: &str = "ACCEPT";

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// Error code returned by SMS-fly in `state@code` when a request is rejected.
///
/// This value is preserved as-is even when the code is unknown to this crate.
pub struct ErrorCode(String);

impl ErrorCode {
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Map this code to a known error code variant, if one exists.
    pub fn known(&self) -> Option<KnownErrorCode> {
        KnownErrorCode::from_code(&self.0)
    }

    /// Human-readable description; unknown codes get a generic text.
    pub fn description(&self) -> Cow<'static, str> {
        error_text(&self.0)
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
/// Known SMS-fly error codes.
pub enum KnownErrorCode {
    XmlError,
    InvalidPhones,
    InvalidStartTime,
    InvalidEndTime,
    InvalidLifetime,
    InvalidSpeed,
    InvalidAlfaname,
    InvalidText,
}

impl KnownErrorCode {
    pub const ALL: [Self; 8] = [
        Self::XmlError,
        Self::InvalidPhones,
        Self::InvalidStartTime,
        Self::InvalidEndTime,
        Self::InvalidLifetime,
        Self::InvalidSpeed,
        Self::InvalidAlfaname,
        Self::InvalidText,
    ];

    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|known| known.as_str() == code)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::XmlError => "XMLERROR",
            Self::InvalidPhones => "ERRPHONES",
            Self::InvalidStartTime => "ERRSTARTTIME",
            Self::InvalidEndTime => "ERRENDTIME",
            Self::InvalidLifetime => "ERRLIFETIME",
            Self::InvalidSpeed => "ERRSPEED",
            Self::InvalidAlfaname => "ERRALFANAME",
            Self::InvalidText => "ERRTEXT",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Self::XmlError => "Malformed XML request",
            Self::InvalidPhones => "Invalid recipient phone number",
            Self::InvalidStartTime => "Invalid sending start time",
            Self::InvalidEndTime => "Invalid campaign end time",
            Self::InvalidLifetime => "Invalid message lifetime",
            Self::InvalidSpeed => "Invalid message sending rate",
            Self::InvalidAlfaname => "This alphanumeric sender name is forbidden or invalid",
            Self::InvalidText => "Invalid message text",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// Message delivery status reported by SMS-fly (`state@status`, `to@status`).
///
/// This value is preserved as-is even when the code is unknown to this crate.
pub struct DeliveryStatus(String);

impl DeliveryStatus {
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }

    /// Map this status to a known state variant, if one exists.
    pub fn known(&self) -> Option<KnownStateCode> {
        KnownStateCode::from_code(&self.0)
    }

    /// Whether the gateway will not report further changes for this message.
    ///
    /// Unknown statuses are not terminal.
    pub fn is_terminal(&self) -> bool {
        matches!(self.known(), Some(kind) if kind.is_terminal())
    }

    /// Human-readable description; unknown codes get a generic text.
    pub fn description(&self) -> Cow<'static, str> {
        state_text(&self.0)
    }
}

impl fmt::Display for DeliveryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
/// Known SMS-fly message states.
pub enum KnownStateCode {
    Accepted,
    Pending,
    Sent,
    Delivered,
    Expired,
    Undelivered,
    AlfanameLimited,
    Stopped,
    UserStopped,
    Error,
}

impl KnownStateCode {
    pub const ALL: [Self; 10] = [
        Self::Accepted,
        Self::Pending,
        Self::Sent,
        Self::Delivered,
        Self::Expired,
        Self::Undelivered,
        Self::AlfanameLimited,
        Self::Stopped,
        Self::UserStopped,
        Self::Error,
    ];

    /// States a message can still leave; everything else is final.
    pub const NON_TERMINAL: [Self; 3] = [Self::Accepted, Self::Pending, Self::Sent];

    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|known| known.as_str() == code)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Accepted => "ACCEPTED",
            Self::Pending => "PENDING",
            Self::Sent => "SENT",
            Self::Delivered => "DELIVERED",
            Self::Expired => "EXPIRED",
            Self::Undelivered => "UNDELIV",
            Self::AlfanameLimited => "ALFANAMELIMITED",
            // Sic: the gateway spells these with a single P.
            Self::Stopped => "STOPED",
            Self::UserStopped => "USERSTOPED",
            Self::Error => "ERROR",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Self::Accepted => "Message accepted by the gateway.",
            Self::Pending => "Message is queued for sending.",
            Self::Sent => "Message sent to the subscriber. Waiting for the operator delivery report.",
            Self::Delivered => "Delivered.",
            Self::Expired => {
                "Message lifetime expired, the message was not delivered to the recipient."
            }
            Self::Undelivered => {
                "Message cannot be delivered. The number may be wrong or the subscriber is disconnected."
            }
            Self::AlfanameLimited => {
                "Message cannot be sent to this operator's subscriber because the sender name is restricted."
            }
            Self::Stopped => "Message stopped by the system. Check the account balance.",
            Self::UserStopped => "Message stopped by the user via the web interface.",
            Self::Error => "System error while sending the message.",
        }
    }

    pub fn is_terminal(self) -> bool {
        !Self::NON_TERMINAL.contains(&self)
    }
}

/// Describe an SMS-fly error code. Total: unknown codes get a generic description.
pub fn error_text(code: &str) -> Cow<'static, str> {
    match KnownErrorCode::from_code(code) {
        Some(known) => Cow::Borrowed(known.description()),
        None => Cow::Owned(format!("unknown error code {code}")),
    }
}

/// Describe an SMS-fly message state. Total: unknown codes get a generic description.
pub fn state_text(code: &str) -> Cow<'static, str> {
    match KnownStateCode::from_code(code) {
        Some(known) => Cow::Borrowed(known.description()),
        None => Cow::Owned(format!("unknown state code {code}")),
    }
}
