use std::fmt;

use gridclash_protocol::Direction;

use crate::EngineError;

/// A cell on the board, zero-based from the top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position {
    pub row: usize,
    pub col: usize,
}

impl Position {
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Takes one step in `direction` on a `size`×`size` board.
    ///
    /// # Errors
    /// [`EngineError::OutOfBounds`] carrying the attempted coordinates.
    pub fn step(
        self,
        direction: Direction,
        size: usize,
    ) -> Result<Position, EngineError> {
        let (dr, dc) = direction.offset();
        let row = self.row as isize + dr;
        let col = self.col as isize + dc;
        let limit = size as isize;
        if row < 0 || row >= limit || col < 0 || col >= limit {
            return Err(EngineError::OutOfBounds { row, col });
        }
        Ok(Position::new(row as usize, col as usize))
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}
