//! # Gridclash
//!
//! A two-player, turn-based tactics game served over WebSockets.
//!
//! One room holds two seats (`A` and `B`) and a single match on an N×N
//! board. Clients send intents (`join`, `start`, `move`, `newGame`) as
//! JSON; the server validates them against the match rules and pushes
//! snapshots back to both seats.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use gridclash::prelude::*;
//!
//! # async fn run() -> Result<(), GridclashError> {
//! let server = GridclashServer::builder()
//!     .bind("0.0.0.0:3000")
//!     .build()
//!     .await?;
//! server.run().await
//! # }
//! ```

mod error;
mod handler;
mod server;

pub use error::GridclashError;
pub use server::{GridclashServer, GridclashServerBuilder};

/// Everything needed to run a server or drive one from a test.
pub mod prelude {
    pub use crate::{GridclashError, GridclashServer, GridclashServerBuilder};
    pub use gridclash_engine::{DEFAULT_BOARD_SIZE, EngineError, Match};
    pub use gridclash_protocol::{
        ClientMessage, Codec, Direction, GameState, JsonCodec, ServerMessage,
        Side,
    };
    pub use gridclash_room::{
        MAX_BOARD_SIZE, MIN_BOARD_SIZE, RoomConfig, RoomError, RoomHandle,
        RoomInfo, RoomState,
    };
}
