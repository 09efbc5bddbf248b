//! Codec trait and the JSON implementation.
//!
//! A codec converts between Rust types and raw bytes. The server only
//! talks to the [`Codec`] trait, so the wire format can change without
//! touching the room or engine code.
//!
//! The browser client speaks JSON over text frames, which is why the
//! trait also offers [`Codec::encode_text`].

use serde::{Serialize, de::DeserializeOwned};

use crate::ProtocolError;

/// Encodes Rust types to bytes and decodes bytes back.
///
/// `Send + Sync + 'static` because one codec instance is shared by every
/// connection task for the life of the server.
pub trait Codec: Send + Sync + 'static {
    /// Serializes a value into bytes.
    ///
    /// # Errors
    /// Returns `ProtocolError::Encode` if serialization fails.
    fn encode<T: Serialize>(
        &self,
        value: &T,
    ) -> Result<Vec<u8>, ProtocolError>;

    /// Deserializes bytes back into a value.
    ///
    /// # Errors
    /// Returns `ProtocolError::Decode` if the bytes are malformed,
    /// incomplete, or don't match the expected type.
    fn decode<T: DeserializeOwned>(
        &self,
        data: &[u8],
    ) -> Result<T, ProtocolError>;

    /// Serializes a value into a UTF-8 string, for text frames.
    ///
    /// The default goes through [`encode`](Codec::encode) and fails with
    /// `ProtocolError::InvalidMessage` if the output is not UTF-8.
    fn encode_text<T: Serialize>(
        &self,
        value: &T,
    ) -> Result<String, ProtocolError> {
        let bytes = self.encode(value)?;
        String::from_utf8(bytes).map_err(|e| {
            ProtocolError::InvalidMessage(format!(
                "codec produced non-UTF-8 output: {e}"
            ))
        })
    }
}

// ---------------------------------------------------------------------------
// JsonCodec
// ---------------------------------------------------------------------------

/// A [`Codec`] backed by `serde_json`.
///
/// ```rust
/// use gridclash_protocol::{Codec, JsonCodec, ServerMessage, Side};
///
/// let codec = JsonCodec;
/// let text = codec.encode_text(&ServerMessage::GameOver { winner: Side::A }).unwrap();
/// assert_eq!(text, r#"{"type":"gameOver","winner":"A"}"#);
///
/// let decoded: ServerMessage = codec.decode(text.as_bytes()).unwrap();
/// assert_eq!(decoded, ServerMessage::GameOver { winner: Side::A });
/// ```
#[cfg(feature = "json")]
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

#[cfg(feature = "json")]
impl Codec for JsonCodec {
    fn encode<T: Serialize>(
        &self,
        value: &T,
    ) -> Result<Vec<u8>, ProtocolError> {
        serde_json::to_vec(value).map_err(ProtocolError::Encode)
    }

    fn decode<T: DeserializeOwned>(
        &self,
        data: &[u8],
    ) -> Result<T, ProtocolError> {
        serde_json::from_slice(data).map_err(ProtocolError::Decode)
    }

    fn encode_text<T: Serialize>(
        &self,
        value: &T,
    ) -> Result<String, ProtocolError> {
        serde_json::to_string(value).map_err(ProtocolError::Encode)
    }
}

#[cfg(all(test, feature = "json"))]
mod tests {
    use super::*;
    use crate::{ClientMessage, ServerMessage, Side};

    #[test]
    fn test_decode_rejects_garbage() {
        let result: Result<ClientMessage, _> = JsonCodec.decode(b"not json");
        assert!(matches!(result, Err(ProtocolError::Decode(_))));
    }

    #[test]
    fn test_decode_rejects_unknown_type() {
        let result: Result<ClientMessage, _> =
            JsonCodec.decode(br#"{"type":"teleport"}"#);
        assert!(matches!(result, Err(ProtocolError::Decode(_))));
    }

    #[test]
    fn test_encode_text_matches_encode() {
        let msg = ServerMessage::seat(Side::B);
        let bytes = JsonCodec.encode(&msg).unwrap();
        let text = JsonCodec.encode_text(&msg).unwrap();
        assert_eq!(bytes, text.into_bytes());
    }
}
