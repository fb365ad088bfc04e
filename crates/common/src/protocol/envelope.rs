// Request envelope for the wallet-service socket protocol.
//
// Wire shape: `{"method": <name>, "params": [<arg>...], "id": <integer>}`
// with `params` omitted entirely for zero-argument methods. There is no
// `jsonrpc` version field on this API.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// An outbound request.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RequestEnvelope {
    pub method: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub params: Option<Vec<Value>>,
    pub id: u64,
}

impl RequestEnvelope {
    /// A zero-argument request (`params` omitted on the wire).
    pub fn new(method: impl Into<String>, id: u64) -> Self {
        Self { method: method.into(), params: None, id }
    }

    /// A request with positional parameters.
    pub fn with_params(method: impl Into<String>, params: Vec<Value>, id: u64) -> Self {
        Self { method: method.into(), params: Some(params), id }
    }
}
