//! Request and response frames exchanged with a device.

use aes_core::{Aes128Key, Direction};
use serde::{Deserialize, Serialize};

/// One batch handed to a device.
///
/// The key is sent raw; devices run their own key expansion.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Request {
    /// Mode tag, serialized as `"encrypt"` or `"decrypt"`.
    pub mode: Direction,
    /// Raw 16-byte cipher key.
    pub key: Aes128Key,
    /// Concatenated 16-byte blocks.
    pub data: Vec<u8>,
}

impl Request {
    /// Serializes the request with `bincode`.
    pub fn encode(&self) -> Result<Vec<u8>, bincode::Error> {
        bincode::serialize(self)
    }

    /// Deserializes a request with `bincode`.
    pub fn decode(bytes: &[u8]) -> Result<Self, bincode::Error> {
        bincode::deserialize(bytes)
    }
}

/// Transformed blocks returned by a device.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Response {
    /// Output buffer; must match the request length.
    pub data: Vec<u8>,
}

impl Response {
    /// Serializes the response with `bincode`.
    pub fn encode(&self) -> Result<Vec<u8>, bincode::Error> {
        bincode::serialize(self)
    }

    /// Deserializes a response with `bincode`.
    pub fn decode(bytes: &[u8]) -> Result<Self, bincode::Error> {
        bincode::deserialize(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_survives_framing() {
        let request = Request {
            mode: Direction::Decrypt,
            key: Aes128Key::from([9u8; 16]),
            data: vec![1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15, 16],
        };
        let bytes = request.encode().expect("encode");
        let decoded = Request::decode(&bytes).expect("decode");
        assert_eq!(decoded, request);
    }

    #[test]
    fn truncated_frame_is_rejected() {
        let response = Response {
            data: vec![0u8; 32],
        };
        let bytes = response.encode().expect("encode");
        assert!(Response::decode(&bytes[..bytes.len() - 1]).is_err());
    }
}
