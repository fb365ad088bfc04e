// Wire protocol for the wallet-service socket API.

use thiserror::Error;

pub mod envelope;
pub mod inbound;
pub mod methods;

/// Protocol-layer errors.
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// An inbound frame was not valid JSON.
    #[error("malformed inbound frame: {0}")]
    Parse(#[source] serde_json::Error),
}
