//! Core protocol types for Gridclash's wire format.
//!
//! Everything in this module travels over the WebSocket as JSON. The
//! shapes are fixed by the browser client, so most of the serde
//! attributes below exist to reproduce exact field names such as
//! `charName` and `playerACharacters`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ProtocolError;

// ---------------------------------------------------------------------------
// Side
// ---------------------------------------------------------------------------

/// One of the two competing roles.
///
/// Serializes as the bare letter (`"A"` / `"B"`), which is also how the
/// grid labels its occupants.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize,
    Deserialize,
)]
pub enum Side {
    /// Connects first, starts on row 0, moves first.
    A,
    /// Connects second, starts on the last row.
    B,
}

impl Side {
    /// Both sides, in seating order.
    pub const ALL: [Side; 2] = [Side::A, Side::B];

    /// Returns the opposing side.
    pub fn other(self) -> Side {
        match self {
            Side::A => Side::B,
            Side::B => Side::A,
        }
    }

    /// Stable index (`A` = 0, `B` = 1) for per-side arrays.
    pub fn index(self) -> usize {
        match self {
            Side::A => 0,
            Side::B => 1,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::A => write!(f, "A"),
            Side::B => write!(f, "B"),
        }
    }
}

/// Formats a grid cell label: `"<side>-<unitName>"`, e.g. `"A-P1"`.
pub fn occupant_label(side: Side, name: &str) -> String {
    format!("{side}-{name}")
}

// ---------------------------------------------------------------------------
// Direction
// ---------------------------------------------------------------------------

/// The eight compass moves, in absolute board coordinates.
///
/// "Forward" always means towards row 0, whichever side is moving. The
/// vocabulary is not mirrored for side `B`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    #[serde(rename = "L")]
    Left,
    #[serde(rename = "R")]
    Right,
    #[serde(rename = "F")]
    Forward,
    #[serde(rename = "B")]
    Backward,
    #[serde(rename = "FL")]
    ForwardLeft,
    #[serde(rename = "FR")]
    ForwardRight,
    #[serde(rename = "BL")]
    BackwardLeft,
    #[serde(rename = "BR")]
    BackwardRight,
}

impl Direction {
    /// All eight directions.
    pub const ALL: [Direction; 8] = [
        Direction::Left,
        Direction::Right,
        Direction::Forward,
        Direction::Backward,
        Direction::ForwardLeft,
        Direction::ForwardRight,
        Direction::BackwardLeft,
        Direction::BackwardRight,
    ];

    /// `(row delta, column delta)` for this move.
    pub fn offset(self) -> (isize, isize) {
        match self {
            Direction::Left => (0, -1),
            Direction::Right => (0, 1),
            Direction::Forward => (-1, 0),
            Direction::Backward => (1, 0),
            Direction::ForwardLeft => (-1, -1),
            Direction::ForwardRight => (-1, 1),
            Direction::BackwardLeft => (1, -1),
            Direction::BackwardRight => (1, 1),
        }
    }

    /// The wire token, e.g. `"FL"`.
    pub fn token(self) -> &'static str {
        match self {
            Direction::Left => "L",
            Direction::Right => "R",
            Direction::Forward => "F",
            Direction::Backward => "B",
            Direction::ForwardLeft => "FL",
            Direction::ForwardRight => "FR",
            Direction::BackwardLeft => "BL",
            Direction::BackwardRight => "BR",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

impl FromStr for Direction {
    type Err = ProtocolError;

    /// Parses a wire token. Tokens are case-sensitive.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Direction::ALL
            .into_iter()
            .find(|d| d.token() == s)
            .ok_or_else(|| ProtocolError::UnknownDirection(s.to_string()))
    }
}

// ---------------------------------------------------------------------------
// GameState: the snapshot clients render
// ---------------------------------------------------------------------------

/// Serializable projection of a match: the grid plus whose turn it is.
///
/// `grid[row][col]` is `null` for an empty cell or an occupant label like
/// `"B-H2"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameState {
    pub grid: Vec<Vec<Option<String>>>,
    pub turn: Side,
}

impl GameState {
    /// An empty `size`×`size` board with side `A` to move.
    pub fn empty(size: usize) -> Self {
        Self {
            grid: vec![vec![None; size]; size],
            turn: Side::A,
        }
    }
}

// ---------------------------------------------------------------------------
// ClientMessage: inbound intents
// ---------------------------------------------------------------------------

/// Messages a client sends to the server.
///
/// Internally tagged on `type`, so `Join` arrives as
/// `{"type":"join","playerName":"ada"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ClientMessage {
    /// Attach a display name to this connection's side.
    Join {
        #[serde(rename = "playerName", default)]
        player_name: String,
    },

    /// Start a match. A missing roster falls back to the room default.
    Start {
        #[serde(
            rename = "playerACharacters",
            default,
            skip_serializing_if = "Option::is_none"
        )]
        player_a_characters: Option<Vec<String>>,
        #[serde(
            rename = "playerBCharacters",
            default,
            skip_serializing_if = "Option::is_none"
        )]
        player_b_characters: Option<Vec<String>>,
    },

    /// Move one unit one step.
    ///
    /// `player` is only checked against the connection's seat, never
    /// trusted. `direction` stays a raw token so the engine can report an
    /// unknown token in its own validation order.
    Move {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        player: Option<Side>,
        #[serde(rename = "charName")]
        char_name: String,
        #[serde(rename = "move")]
        direction: String,
    },

    /// Discard the match and start over with default rosters.
    ///
    /// The stock client's "New game" button sends `startGame`.
    #[serde(alias = "startGame")]
    NewGame,
}

impl ClientMessage {
    /// Short name of the intent, for logging.
    pub fn kind(&self) -> &'static str {
        match self {
            ClientMessage::Join { .. } => "join",
            ClientMessage::Start { .. } => "start",
            ClientMessage::Move { .. } => "move",
            ClientMessage::NewGame => "newGame",
        }
    }
}

// ---------------------------------------------------------------------------
// ServerMessage: outbound events
// ---------------------------------------------------------------------------

/// Messages the server sends to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ServerMessage {
    /// Sent on connect (with `player`) and in reply to `join` (with
    /// `state`). Exactly one of the two fields is present.
    Init {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        player: Option<Side>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        state: Option<GameState>,
    },

    /// Fresh snapshot after a start, move, or reset.
    Update { state: GameState },

    /// A move that was just applied, for the client's history list.
    Move {
        player: Side,
        #[serde(rename = "charName")]
        char_name: String,
        #[serde(rename = "move")]
        direction: Direction,
    },

    /// A rejected intent. Only ever sent to the connection that caused it.
    Error { message: String },

    /// The last move emptied a roster.
    GameOver { winner: Side },
}

impl ServerMessage {
    /// The `init` message announcing a seat assignment.
    pub fn seat(player: Side) -> Self {
        ServerMessage::Init {
            player: Some(player),
            state: None,
        }
    }

    /// The `init` message carrying the current snapshot.
    pub fn snapshot(state: GameState) -> Self {
        ServerMessage::Init {
            player: None,
            state: Some(state),
        }
    }

    /// An `error` message.
    pub fn error(message: impl Into<String>) -> Self {
        ServerMessage::Error {
            message: message.into(),
        }
    }
}

// =========================================================================
// Tests
// =========================================================================
