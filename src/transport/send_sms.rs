use serde::Deserialize;

use super::envelope::{DecodeError, escape_text};
use crate::domain::{
    ACCEPT_CODE, CampaignId, DeliveryStatus, ErrorCode, LifetimeHours, MessageText,
    RawPhoneNumber, SendRate, SendSms, SendSmsResponse, SenderAlias,
};

/// Campaign start and end are always left to the gateway.
const AUTO_TIME: &str = "AUTO";

#[derive(Debug, Clone, Deserialize)]
struct SendSmsXmlResponse {
    state: SendStateXml,
    #[serde(default)]
    to: Vec<RecipientXml>,
}

#[derive(Debug, Clone, Deserialize)]
struct SendStateXml {
    #[serde(rename = "@code", default)]
    code: Option<String>,
    #[serde(rename = "@campaignID", default)]
    campaign_id: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
struct RecipientXml {
    #[serde(rename = "@status", default)]
    status: Option<String>,
}

/// Decoded `SENDSMS` response: either an accepted campaign or a rejection code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SendSmsOutcome {
    Accepted(SendSmsResponse),
    Rejected(ErrorCode),
}

/// Build the `<message>` body of a `SENDSMS` request.
///
/// `source` is omitted entirely when `alias` is `None`.
pub fn encode_send_sms_body(request: &SendSms, alias: Option<&SenderAlias>) -> String {
    let options = request.options();

    let mut body = format!(
        r#"<message start_time="{AUTO_TIME}" end_time="{AUTO_TIME}" {}="{}" {}="{}" desc="{}""#,
        LifetimeHours::FIELD,
        options.lifetime.value(),
        SendRate::FIELD,
        options.rate.value(),
        escape_text(&options.description),
    );
    if let Some(alias) = alias {
        body.push_str(&format!(
            r#" {}="{}""#,
            SenderAlias::FIELD,
            escape_text(alias.as_str())
        ));
    }
    body.push('>');
    body.push_str(&format!(
        "<{field}>{}</{field}>",
        escape_text(request.text().as_str()),
        field = MessageText::FIELD,
    ));
    body.push_str(&format!(
        "<{field}>{}</{field}>",
        escape_text(&request.recipient().wire()),
        field = RawPhoneNumber::FIELD,
    ));
    body.push_str("</message>");
    body
}

pub fn decode_send_sms_xml_response(xml: &str) -> Result<SendSmsOutcome, DecodeError> {
    let parsed: SendSmsXmlResponse = quick_xml::de::from_str(xml)?;
    let code = parsed.state.code.unwrap_or_default();

    if code != ACCEPT_CODE {
        return Ok(SendSmsOutcome::Rejected(ErrorCode::new(code)));
    }

    let campaign_id = parsed
        .state
        .campaign_id
        .and_then(|raw| CampaignId::new(raw).ok())
        .ok_or(DecodeError::MissingElement {
            element: "state@campaignID",
        })?;
    let status = parsed
        .to
        .into_iter()
        .next()
        .and_then(|recipient| recipient.status)
        .ok_or(DecodeError::MissingElement {
            element: "to@status",
        })?;

    Ok(SendSmsOutcome::Accepted(SendSmsResponse {
        campaign_id,
        status: DeliveryStatus::new(status),
    }))
}
