//! Wire protocol for Gridclash.
//!
//! This crate defines what clients and the server say to each other:
//!
//! - **Types** ([`ClientMessage`], [`ServerMessage`], [`GameState`],
//!   [`Side`], [`Direction`]): the JSON shapes on the wire.
//! - **Codec** ([`Codec`] trait, [`JsonCodec`]): bytes ⇄ types.
//! - **Errors** ([`ProtocolError`]).
//!
//! It knows nothing about connections, rooms, or rules.
//!
//! ```text
//! Transport (frames) → Protocol (messages) → Room (intents) → Engine
//! ```

mod codec;
mod error;
mod types;

pub use codec::Codec;
#[cfg(feature = "json")]
pub use codec::JsonCodec;
pub use error::ProtocolError;
pub use types::{
    ClientMessage, Direction, GameState, ServerMessage, Side, occupant_label,
};
