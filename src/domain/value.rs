use std::fmt;

use crate::domain::validation::ValidationError;

use phonenumber::country;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// SMS-fly account login used for HTTP basic auth.
///
/// Invariant: non-empty after trimming.
pub struct Login(String);

impl Login {
    /// Field name used in validation errors.
    pub const FIELD: &'static str = "login";

    /// Create a validated [`Login`].
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::Empty { field: Self::FIELD });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Borrow the validated login.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Clone, PartialEq, Eq, Hash)]
/// SMS-fly account password.
///
/// Invariant: must not be empty (whitespace is preserved and allowed).
pub struct Password(String);

impl Password {
    /// Field name used in validation errors.
    pub const FIELD: &'static str = "password";

    /// Create a validated [`Password`].
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        if value.is_empty() {
            return Err(ValidationError::Empty { field: Self::FIELD });
        }
        Ok(Self(value))
    }

    /// Borrow the password as provided.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Password(***)")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// Sender alias ("alfaname") shown to the recipient (`source`).
///
/// Invariant: non-empty after trimming. The alias must be registered in the SMS-fly account.
pub struct SenderAlias(String);

impl SenderAlias {
    /// XML attribute name used by SMS-fly (`source`).
    pub const FIELD: &'static str = "source";

    /// Alias available to every SMS-fly account by default.
    pub const DEFAULT: &'static str = "InfoCenter";

    /// Create a validated [`SenderAlias`].
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::Empty { field: Self::FIELD });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Borrow the validated alias.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for SenderAlias {
    fn default() -> Self {
        Self(Self::DEFAULT.to_owned())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// SMS message text (`body`).
///
/// Invariant: non-empty after trimming. The original value (including whitespace) is preserved.
pub struct MessageText(String);

impl MessageText {
    /// XML element name used by SMS-fly (`body`).
    pub const FIELD: &'static str = "body";

    /// Create validated message text.
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err(ValidationError::Empty { field: Self::FIELD });
        }
        Ok(Self(value))
    }

    /// Borrow the message text as provided.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
/// SMS-fly campaign id (`campaignID`) returned by `SENDSMS`.
///
/// Invariant: non-empty after trimming.
pub struct CampaignId(String);

impl CampaignId {
    /// XML attribute name used by SMS-fly (`campaignID`).
    pub const FIELD: &'static str = "campaignID";

    /// Create a validated [`CampaignId`].
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::Empty { field: Self::FIELD });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Borrow the validated campaign id.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<u64> for CampaignId {
    fn from(value: u64) -> Self {
        Self(value.to_string())
    }
}

impl fmt::Display for CampaignId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
/// Unvalidated phone number as supplied by the caller (`recipient`).
///
/// Invariant: non-empty after trimming. International numbers usually carry a
/// leading `+`; SMS-fly rejects it, so [`RawPhoneNumber::wire`] strips it.
pub struct RawPhoneNumber(String);

impl RawPhoneNumber {
    /// XML name used by SMS-fly (`recipient`).
    pub const FIELD: &'static str = "recipient";

    /// Create a validated (non-empty) raw phone number.
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::Empty { field: Self::FIELD });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Raw (trimmed) value as provided.
    pub fn raw(&self) -> &str {
        &self.0
    }

    /// Value in the form SMS-fly accepts on the wire.
    pub fn wire(&self) -> String {
        process_phone(&self.0)
    }
}

impl From<PhoneNumber> for RawPhoneNumber {
    /// Convert an already-parsed phone number to a normalized raw value (E.164).
    fn from(value: PhoneNumber) -> Self {
        Self(value.e164)
    }
}

/// Remove every `+` from an international phone number, keeping digit order.
pub fn process_phone(international_phone: &str) -> String {
    international_phone.replace('+', "")
}

#[derive(Debug, Clone)]
/// Parsed phone number with an E.164 representation.
///
/// Equality, ordering, and hashing are based on the E.164 form.
pub struct PhoneNumber {
    raw: String,
    e164: String,
    parsed: phonenumber::PhoneNumber,
}

impl PhoneNumber {
    /// Field name used in validation errors.
    pub const FIELD: &'static str = "recipient";

    /// Parse and normalize a phone number into E.164.
    ///
    /// `default_region` is used when the input does not contain an explicit country prefix.
    pub fn parse(
        default_region: Option<country::Id>,
        input: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        let input = input.into();
        let raw = input.trim().to_owned();
        if raw.is_empty() {
            return Err(ValidationError::Empty { field: Self::FIELD });
        }

        let parsed = phonenumber::parse(default_region, &raw)
            .map_err(|_| ValidationError::InvalidPhoneNumber { input: raw.clone() })?;

        let e164 = phonenumber::format(&parsed)
            .mode(phonenumber::Mode::E164)
            .to_string();

        Ok(Self { raw, e164, parsed })
    }

    /// Raw input after trimming.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// Normalized E.164 representation.
    pub fn e164(&self) -> &str {
        &self.e164
    }

    /// The parsed phone number from the `phonenumber` crate.
    pub fn parsed(&self) -> &phonenumber::PhoneNumber {
        &self.parsed
    }
}

impl PartialEq for PhoneNumber {
    fn eq(&self, other: &Self) -> bool {
        self.e164 == other.e164
    }
}

impl Eq for PhoneNumber {}

impl std::hash::Hash for PhoneNumber {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.e164.hash(state);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// Message lifetime in hours (`lifetime`).
///
/// Invariant: `1..=24`.
pub struct LifetimeHours(u8);

impl LifetimeHours {
    /// XML attribute name used by SMS-fly (`lifetime`).
    pub const FIELD: &'static str = "lifetime";

    /// Minimum allowed lifetime.
    pub const MIN: u8 = 1;
    /// Maximum allowed lifetime.
    pub const MAX: u8 = 24;

    /// Create a validated lifetime.
    pub fn new(value: u8) -> Result<Self, ValidationError> {
        if !(Self::MIN..=Self::MAX).contains(&value) {
            return Err(ValidationError::OutOfRange {
                field: Self::FIELD,
                min: u32::from(Self::MIN),
                max: u32::from(Self::MAX),
                actual: u32::from(value),
            });
        }
        Ok(Self(value))
    }

    /// Get the underlying number of hours.
    pub fn value(self) -> u8 {
        self.0
    }
}

impl Default for LifetimeHours {
    fn default() -> Self {
        Self(Self::MAX)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// Sending rate in messages per minute (`rate`).
///
/// Invariant: `1..=120`.
pub struct SendRate(u8);

impl SendRate {
    /// XML attribute name used by SMS-fly (`rate`).
    pub const FIELD: &'static str = "rate";

    /// Minimum allowed rate.
    pub const MIN: u8 = 1;
    /// Maximum allowed rate.
    pub const MAX: u8 = 120;

    /// Create a validated rate.
    pub fn new(value: u8) -> Result<Self, ValidationError> {
        if !(Self::MIN..=Self::MAX).contains(&value) {
            return Err(ValidationError::OutOfRange {
                field: Self::FIELD,
                min: u32::from(Self::MIN),
                max: u32::from(Self::MAX),
                actual: u32::from(value),
            });
        }
        Ok(Self(value))
    }

    /// Get the underlying rate.
    pub fn value(self) -> u8 {
        self.0
    }
}

impl Default for SendRate {
    fn default() -> Self {
        Self(Self::MAX)
    }
}
