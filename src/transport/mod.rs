//! Transport layer: XML wire-format details (request envelopes and response decoding).

mod amount;
mod balance;
mod check_status;
mod envelope;
mod send_sms;

pub use balance::{decode_get_balance_xml_response, encode_get_balance_body};
pub use check_status::{decode_check_status_xml_response, encode_check_status_body};
pub use envelope::{DecodeError, Operation, encode_envelope};
pub use send_sms::{SendSmsOutcome, decode_send_sms_xml_response, encode_send_sms_body};
