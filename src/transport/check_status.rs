use serde::Deserialize;

use super::envelope::{DecodeError, escape_text};
use crate::domain::{CampaignId, DeliveryStatus, RawPhoneNumber};

#[derive(Debug, Clone, Deserialize)]
struct CheckStatusXmlResponse {
    state: StatusStateXml,
}

#[derive(Debug, Clone, Deserialize)]
struct StatusStateXml {
    #[serde(rename = "@status", default)]
    status: Option<String>,
}

pub fn encode_check_status_body(campaign_id: &CampaignId, recipient: &RawPhoneNumber) -> String {
    format!(
        r#"<message {}="{}" {}="{}" />"#,
        CampaignId::FIELD,
        escape_text(campaign_id.as_str()),
        RawPhoneNumber::FIELD,
        escape_text(&recipient.wire()),
    )
}

pub fn decode_check_status_xml_response(xml: &str) -> Result<DeliveryStatus, DecodeError> {
    let parsed: CheckStatusXmlResponse = quick_xml::de::from_str(xml)?;
    parsed
        .state
        .status
        .map(DeliveryStatus::new)
        .ok_or(DecodeError::MissingElement {
            element: "state@status",
        })
}
