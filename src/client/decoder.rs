// Response decoding.
// Converts raw response bytes into typed models.

use serde::{Deserialize, Serialize, de::DeserializeOwned};

use crate::error::Result;

/// Converts bytes into a typed value. Must be free of side effects.
pub trait Decoder: Send + Sync {
    fn decode<M: DeserializeOwned>(&self, bytes: &[u8]) -> Result<M>;
}

/// JSON decoder backed by serde_json.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonDecoder;

impl Decoder for JsonDecoder {
    fn decode<M: DeserializeOwned>(&self, bytes: &[u8]) -> Result<M> {
        Ok(serde_json::from_slice(bytes)?)
    }
}

/// Response wrapper the menu API puts around list payloads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Envelope<M> {
    pub status_code: u16,
    pub body: M,
}
