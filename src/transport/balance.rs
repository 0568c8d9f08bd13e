use serde::Deserialize;

use super::amount::coerce_amount;
use super::envelope::DecodeError;

#[derive(Debug, Clone, Deserialize)]
struct BalanceXmlResponse {
    #[serde(default)]
    balance: Option<String>,
}

/// `GETBALANCE` carries no body besides the operation name.
pub fn encode_get_balance_body() -> String {
    String::new()
}

/// Decode a `GETBALANCE` response.
///
/// Returns `Ok(None)` when the document is well-formed but has no usable
/// `<balance>` value; callers decide how to treat that.
pub fn decode_get_balance_xml_response(xml: &str) -> Result<Option<f64>, DecodeError> {
    let parsed: BalanceXmlResponse = quick_xml::de::from_str(xml)?;
    Ok(parsed.balance.as_deref().and_then(coerce_amount))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_reads_balance_element() {
        let xml = r#"<?xml version="1.0" encoding="utf-8"?>
        <message><balance>153.20</balance></message>"#;
        assert_eq!(decode_get_balance_xml_response(xml).unwrap(), Some(153.2));
    }

    #[test]
    fn decode_returns_none_for_missing_or_garbage_balance() {
        let xml = r#"<message><state code="OK"/></message>"#;
        assert_eq!(decode_get_balance_xml_response(xml).unwrap(), None);

        let xml = r#"<message><balance>n/a</balance></message>"#;
        assert_eq!(decode_get_balance_xml_response(xml).unwrap(), None);
    }

    #[test]
    fn decode_rejects_malformed_xml() {
        let err = decode_get_balance_xml_response("<message><balance>1").unwrap_err();
        assert!(matches!(err, DecodeError::Xml(_)));
    }
}
