//! Domain layer: strong types with validation and invariants (no I/O).

mod codes;
mod request;
mod response;
mod validation;
mod value;

pub use codes::{
    ACCEPT_CODE, DeliveryStatus, ErrorCode, KnownErrorCode, KnownStateCode, error_text,
    state_text,
};
pub use request::{SendOptions, SendSms};
pub use response::SendSmsResponse;
pub use validation::ValidationError;
pub use value::{
    CampaignId, LifetimeHours, Login, MessageText, Password, PhoneNumber, RawPhoneNumber,
    SendRate, SenderAlias, process_phone,
};
