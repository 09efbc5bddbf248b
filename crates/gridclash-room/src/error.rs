//! Error types for the room layer.

use gridclash_engine::EngineError;
use gridclash_protocol::Side;

/// Errors that can occur during room operations.
///
/// Like [`EngineError`], the `Display` text is what the affected client
/// receives in its `error` message.
#[derive(Debug, thiserror::Error)]
pub enum RoomError {
    /// Both seats are taken.
    #[error("Game room is full. Please try again later.")]
    RoomFull,

    /// A `move` claimed to be from the other seat.
    #[error("You are playing side {actual}, not side {claimed}.")]
    SideMismatch { claimed: Side, actual: Side },

    /// The engine rejected the intent.
    #[error(transparent)]
    Engine(#[from] EngineError),

    /// The room configuration cannot produce a playable match.
    #[error("invalid room config: {0}")]
    InvalidConfig(String),

    /// The room's command channel is closed.
    #[error("room is unavailable")]
    Unavailable,
}
