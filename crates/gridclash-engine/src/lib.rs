//! Game rules for Gridclash.
//!
//! A [`Match`] is a pure state machine: two rosters of named units on an
//! N×N board and a turn marker. It has no idea who is connected. The
//! room layer feeds it moves and broadcasts its [`snapshot`](Match::snapshot).
//!
//! # Rules in brief
//!
//! - Side `A` lines up on row 0, side `B` on the last row.
//! - One unit moves one step per turn in one of eight absolute
//!   directions (`F` is always towards row 0).
//! - Stepping onto an enemy captures it. Stepping onto a friend, off the
//!   board, or out of turn is rejected and changes nothing.
//! - The game ends when a roster is empty.

mod error;
mod game;
mod position;

pub use error::EngineError;
pub use game::{DEFAULT_BOARD_SIZE, Match, MoveOutcome, Unit, UnitId};
pub use position::Position;
