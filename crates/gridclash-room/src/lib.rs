//! The game room for Gridclash.
//!
//! A single room runs as a Tokio task (actor model). It owns the two seats
//! and the current [`Match`](gridclash_engine::Match), and processes one
//! command at a time from its queue.
//!
//! # Key types
//!
//! - [`RoomHandle`]: send commands to the running room actor
//! - [`RoomState`]: seat occupancy (`Empty`, `Occupying`, `Full`)
//! - [`RoomConfig`]: board size, default roster, queue capacity

mod config;
mod error;
mod room;

pub use config::{
    MAX_BOARD_SIZE, MIN_BOARD_SIZE, ROOM_CAPACITY, RoomConfig, RoomState,
};
pub use error::RoomError;
pub use room::{ClientSender, RoomHandle, RoomInfo, spawn_room};
