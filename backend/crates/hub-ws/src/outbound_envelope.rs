use serde::Serialize;
use serde_json::value::RawValue;

/// Envelope written to clients for every delivered broadcast
#[derive(Debug, Serialize)]
pub struct OutboundEnvelope<'a> {
    #[serde(rename = "type")]
    pub message_type: &'a str,
    pub data: Option<&'a RawValue>,
    /// Unix seconds
    pub timestamp: i64,
}
