//! Error types for the engine.

use gridclash_protocol::Side;

/// Why the engine refused an operation.
///
/// The `Display` strings are what the requesting client sees in its
/// `error` message, so they are written for players, not operators.
/// Every variant leaves the match exactly as it was.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EngineError {
    /// The moving side does not hold the turn.
    #[error("It is not your turn.")]
    NotYourTurn { side: Side, turn: Side },

    /// No live unit with that name on the moving side.
    #[error("Character not found.")]
    UnitNotFound { side: Side, name: String },

    /// The direction token is not one of the eight moves.
    #[error("Invalid move direction.")]
    InvalidDirection(String),

    /// The step would leave the board. Coordinates are the attempted
    /// target, which may be negative.
    #[error("Move out of bounds.")]
    OutOfBounds { row: isize, col: isize },

    /// The target cell holds a unit of the moving side.
    #[error("Cannot move to a cell occupied by a friendly character.")]
    FriendlyOccupied { row: usize, col: usize },

    /// A roster has more units than the board has columns.
    #[error("Side {side} has {len} characters but the board only fits {max}.")]
    RosterTooLarge { side: Side, len: usize, max: usize },

    /// A unit name appears twice in one side's roster.
    #[error("Side {side} lists character {name} more than once.")]
    DuplicateUnit { side: Side, name: String },
}
