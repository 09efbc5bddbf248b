//! Unified error type for the Gridclash server.

use gridclash_engine::EngineError;
use gridclash_protocol::ProtocolError;
use gridclash_room::RoomError;
use gridclash_transport::TransportError;

/// Top-level error that wraps every crate-specific error.
///
/// `?` converts sub-crate errors through the generated `From` impls.
#[derive(Debug, thiserror::Error)]
pub enum GridclashError {
    /// A transport-level error (bind, accept, send, recv).
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// A protocol-level error (encode, decode, bad token).
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// A room-level error (full, mismatch, bad config).
    #[error(transparent)]
    Room(#[from] RoomError),

    /// A rule violation surfaced outside the room.
    #[error(transparent)]
    Engine(#[from] EngineError),
}
