// Inbound payload helpers.
//
// Responses are opaque JSON of unconstrained shape and are displayed
// as-is. The only field the console inspects is a nested `result.uri`
// string, surfaced as a wallet link when present.

use serde_json::Value;

use super::ProtocolError;

/// Parse an inbound frame as JSON. A malformed frame is an error, never
/// appended to the log as plain text.
pub fn parse(payload: &str) -> Result<Value, ProtocolError> {
    serde_json::from_str(payload).map_err(ProtocolError::Parse)
}

/// Pretty-print a value with 2-space indentation for the console log.
pub fn pretty(value: &Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}

/// Guarded lookup of `result.uri`: `Some` only when the field exists and
/// is a string.
pub fn wallet_uri(value: &Value) -> Option<&str> {
    value.get("result")?.get("uri")?.as_str()
}
