//! Room configuration and occupancy state.

use gridclash_engine::DEFAULT_BOARD_SIZE;
use serde::{Deserialize, Serialize};

use crate::RoomError;

/// Number of seats in a room. One per side.
pub const ROOM_CAPACITY: usize = 2;

/// Smallest playable board. Below this the two home rows coincide.
pub const MIN_BOARD_SIZE: usize = 2;

/// Largest board a room will allocate.
pub const MAX_BOARD_SIZE: usize = 64;

// ---------------------------------------------------------------------------
// RoomConfig
// ---------------------------------------------------------------------------

/// Configuration for the room.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoomConfig {
    /// Edge length of the square board.
    pub board_size: usize,

    /// Roster used by `newGame`, and by `start` when a side's roster is
    /// omitted.
    pub default_roster: Vec<String>,

    /// Capacity of the room's command queue. Senders wait when it is
    /// full.
    pub command_buffer: usize,
}

impl Default for RoomConfig {
    fn default() -> Self {
        Self {
            board_size: DEFAULT_BOARD_SIZE,
            default_roster: ["P1", "P2", "H1", "H2", "H3"]
                .into_iter()
                .map(String::from)
                .collect(),
            command_buffer: 64,
        }
    }
}

impl RoomConfig {
    /// Default config on a `board_size`-wide board.
    ///
    /// The default roster is cut to fit, so a 3-wide board plays
    /// `P1 P2 H1`.
    pub fn with_board_size(board_size: usize) -> Self {
        let mut config = Self {
            board_size,
            ..Self::default()
        };
        config.default_roster.truncate(board_size);
        config
    }

    /// Checks that a default match can actually be set up.
    ///
    /// # Errors
    /// [`RoomError::InvalidConfig`] for a board outside
    /// [`MIN_BOARD_SIZE`]..=[`MAX_BOARD_SIZE`], an empty queue, or a
    /// default roster wider than the board.
    pub fn validate(&self) -> Result<(), RoomError> {
        if !(MIN_BOARD_SIZE..=MAX_BOARD_SIZE).contains(&self.board_size) {
            return Err(RoomError::InvalidConfig(format!(
                "board_size must be between {MIN_BOARD_SIZE} and {MAX_BOARD_SIZE}, got {}",
                self.board_size
            )));
        }
        if self.command_buffer == 0 {
            return Err(RoomError::InvalidConfig(
                "command_buffer must be at least 1".into(),
            ));
        }
        if self.default_roster.len() > self.board_size {
            return Err(RoomError::InvalidConfig(format!(
                "default roster has {} units but the board is {} wide",
                self.default_roster.len(),
                self.board_size
            )));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// RoomState
// ---------------------------------------------------------------------------

/// How many seats are taken.
///
/// ```text
/// Empty ⇄ Occupying ⇄ Full
/// ```
///
/// Dropping back to `Empty` discards the match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoomState {
    Empty,
    Occupying,
    Full,
}

impl RoomState {
    /// State for a given number of seated connections.
    pub fn from_occupants(count: usize) -> Self {
        match count {
            0 => Self::Empty,
            n if n >= ROOM_CAPACITY => Self::Full,
            _ => Self::Occupying,
        }
    }

    /// Returns `true` if another connection can be seated.
    pub fn is_joinable(&self) -> bool {
        !matches!(self, Self::Full)
    }
}

impl std::fmt::Display for RoomState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Empty => write!(f, "Empty"),
            Self::Occupying => write!(f, "Occupying"),
            Self::Full => write!(f, "Full"),
        }
    }
}
