//! Error types for the protocol layer.
//!
//! A `ProtocolError` always means the bytes or tokens were wrong, never
//! that a move broke a game rule. Rule violations live in the engine.

/// Errors that can occur while encoding, decoding, or parsing wire values.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    /// Serialization failed.
    #[cfg(feature = "json")]
    #[error("encode failed: {0}")]
    Encode(serde_json::Error),

    /// Deserialization failed: malformed JSON, a missing field, or an
    /// unknown `type` tag.
    #[cfg(feature = "json")]
    #[error("decode failed: {0}")]
    Decode(serde_json::Error),

    /// A direction token outside `L R F B FL FR BL BR`.
    #[error("unknown direction token {0:?}")]
    UnknownDirection(String),

    /// The message decoded but is not valid at the protocol level.
    #[error("invalid message: {0}")]
    InvalidMessage(String),
}
