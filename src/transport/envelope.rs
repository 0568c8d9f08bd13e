use std::borrow::Cow;
use std::fmt;

#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    #[error("invalid XML response: {0}")]
    Xml(#[from] quick_xml::DeError),

    #[error("response is missing {element}")]
    MissingElement { element: &'static str },
}

/// SMS-fly API operation, sent as `<operation>` inside every request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    GetBalance,
    SendSms,
    GetMessageStatus,
}

impl Operation {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::GetBalance => "GETBALANCE",
            Self::SendSms => "SENDSMS",
            Self::GetMessageStatus => "GETMESSAGESTATUS",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Wrap an operation body into the `<request>` document SMS-fly expects.
pub fn encode_envelope(operation: Operation, body: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="utf-8"?><request><operation>{}</operation>{body}</request>"#,
        operation.as_str()
    )
}

/// Escape `<`, `>`, `&`, `"` and `'` so caller text is safe in both element
/// content and quoted attribute values.
pub fn escape_text(raw: &str) -> Cow<'_, str> {
    quick_xml::escape::escape(raw)
}
