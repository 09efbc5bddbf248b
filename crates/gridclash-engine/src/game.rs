//! The match: board, rosters, and turn marker.
//!
//! Units live in an arena indexed by [`UnitId`]. Board cells hold ids,
//! never units, and a captured unit's arena slot is emptied for good.
//! Every mutation goes through [`Match::apply_move`], which keeps the
//! board and the unit positions in step.

use std::collections::HashSet;

use gridclash_protocol::{Direction, GameState, Side, occupant_label};

use crate::{EngineError, Position};

/// Board size used when nothing else is configured.
pub const DEFAULT_BOARD_SIZE: usize = 5;

/// Arena index of a unit within its match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UnitId(usize);

/// A named piece on the board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Unit {
    pub id: UnitId,
    pub side: Side,
    pub name: String,
    pub position: Position,
}

/// What a successful move did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveOutcome {
    pub side: Side,
    pub unit: String,
    pub direction: Direction,
    pub from: Position,
    pub to: Position,
    /// Name of the enemy unit removed by this move, if any.
    pub captured: Option<String>,
    pub game_over: bool,
    pub winner: Option<Side>,
}

/// A validated move, ready to apply.
struct ResolvedMove {
    unit: UnitId,
    direction: Direction,
    from: Position,
    to: Position,
    capture: Option<UnitId>,
}

/// One game instance.
#[derive(Debug, Clone)]
pub struct Match {
    size: usize,
    /// Row-major, `size * size` cells.
    cells: Vec<Option<UnitId>>,
    /// `None` once the unit has been captured.
    units: Vec<Option<Unit>>,
    turn: Side,
}

impl Match {
    /// An unstarted match: empty board, side `A` to move.
    pub fn new(size: usize) -> Self {
        Self {
            size,
            cells: vec![None; size * size],
            units: Vec::new(),
            turn: Side::A,
        }
    }

    /// Sets up a fresh match.
    ///
    /// Side `A`'s roster goes left to right along row 0, side `B`'s along
    /// the last row, one unit per column from column 0, in the given
    /// order.
    ///
    /// # Errors
    /// [`EngineError::RosterTooLarge`] if a roster is longer than `size`,
    /// [`EngineError::DuplicateUnit`] if a name repeats within a side.
    pub fn initialize<S: AsRef<str>>(
        size: usize,
        roster_a: &[S],
        roster_b: &[S],
    ) -> Result<Self, EngineError> {
        let mut game = Match::new(size);
        for (side, roster) in [(Side::A, roster_a), (Side::B, roster_b)] {
            if roster.len() > size {
                return Err(EngineError::RosterTooLarge {
                    side,
                    len: roster.len(),
                    max: size,
                });
            }
            let mut seen: HashSet<&str> = HashSet::new();
            if let Some(dup) = roster
                .iter()
                .map(|name| name.as_ref())
                .find(|name| !seen.insert(*name))
            {
                return Err(EngineError::DuplicateUnit {
                    side,
                    name: dup.to_string(),
                });
            }

            let row = game.home_row(side);
            for (col, name) in roster.iter().enumerate() {
                game.place(side, name.as_ref(), Position::new(row, col));
            }
        }
        Ok(game)
    }

    /// Board edge length.
    pub fn size(&self) -> usize {
        self.size
    }

    /// The side allowed to move next.
    pub fn turn(&self) -> Side {
        self.turn
    }

    /// Starting row for `side`: 0 for `A`, the last row for `B`.
    pub fn home_row(&self, side: Side) -> usize {
        match side {
            Side::A => 0,
            Side::B => self.size.saturating_sub(1),
        }
    }

    /// Live units of `side`, in roster order.
    pub fn roster(&self, side: Side) -> impl Iterator<Item = &Unit> + '_ {
        self.units
            .iter()
            .flatten()
            .filter(move |unit| unit.side == side)
    }

    /// Number of live units on `side`.
    pub fn roster_len(&self, side: Side) -> usize {
        self.roster(side).count()
    }

    /// Looks up a live unit by side and name.
    pub fn unit(&self, side: Side, name: &str) -> Option<&Unit> {
        self.roster(side).find(|unit| unit.name == name)
    }

    /// The unit standing on `pos`, if any.
    pub fn occupant(&self, pos: Position) -> Option<&Unit> {
        let id = (*self.cells.get(self.cell_index(pos)?)?)?;
        self.units.get(id.0)?.as_ref()
    }

    /// Number of non-empty cells.
    pub fn occupied_cells(&self) -> usize {
        self.cells.iter().filter(|c| c.is_some()).count()
    }

    /// Checks a move without applying it and returns the target cell.
    ///
    /// Checks run in a fixed order and the first failure wins: unit
    /// lookup, direction token, bounds, friendly occupant. The turn is
    /// not checked here.
    pub fn validate_move(
        &self,
        side: Side,
        unit_name: &str,
        direction: &str,
    ) -> Result<Position, EngineError> {
        self.resolve(side, unit_name, direction).map(|resolved| resolved.to)
    }

    /// Applies a move for `side` and passes the turn.
    ///
    /// On any error the match is left untouched and the turn does not
    /// advance.
    pub fn apply_move(
        &mut self,
        side: Side,
        unit_name: &str,
        direction: &str,
    ) -> Result<MoveOutcome, EngineError> {
        if side != self.turn {
            return Err(EngineError::NotYourTurn {
                side,
                turn: self.turn,
            });
        }
        let resolved = self.resolve(side, unit_name, direction)?;

        let captured = resolved.capture.and_then(|id| {
            self.units
                .get_mut(id.0)
                .and_then(Option::take)
                .map(|unit| unit.name)
        });

        if let Some(from) = self.cell_index(resolved.from) {
            self.cells[from] = None;
        }
        if let Some(to) = self.cell_index(resolved.to) {
            self.cells[to] = Some(resolved.unit);
        }
        if let Some(Some(unit)) = self.units.get_mut(resolved.unit.0) {
            unit.position = resolved.to;
        }
        self.turn = side.other();

        debug_assert!(self.is_consistent(), "board and rosters diverged");

        Ok(MoveOutcome {
            side,
            unit: unit_name.to_string(),
            direction: resolved.direction,
            from: resolved.from,
            to: resolved.to,
            captured,
            game_over: self.is_over(),
            winner: self.winner(),
        })
    }

    /// `true` iff either roster is empty.
    pub fn is_over(&self) -> bool {
        Side::ALL.into_iter().any(|side| self.roster_len(side) == 0)
    }

    /// The side whose opponent has no units left.
    ///
    /// `None` mid-game, and also on an unstarted match where both rosters
    /// are empty.
    pub fn winner(&self) -> Option<Side> {
        let a = self.roster_len(Side::A);
        let b = self.roster_len(Side::B);
        match (a, b) {
            (0, 0) => None,
            (_, 0) => Some(Side::A),
            (0, _) => Some(Side::B),
            _ => None,
        }
    }

    /// The grid and turn, as sent to clients.
    pub fn snapshot(&self) -> GameState {
        let mut state = GameState::empty(self.size);
        state.turn = self.turn;
        for unit in self.units.iter().flatten() {
            state.grid[unit.position.row][unit.position.col] =
                Some(occupant_label(unit.side, &unit.name));
        }
        state
    }

    /// `true` if every live unit sits on a cell pointing back at it and
    /// every occupied cell points at a live unit.
    pub fn is_consistent(&self) -> bool {
        let units_ok = self.units.iter().flatten().all(|unit| {
            self.cell_index(unit.position)
                .and_then(|i| self.cells.get(i).copied().flatten())
                == Some(unit.id)
        });
        let cells_ok = self.cells.iter().enumerate().all(|(i, cell)| {
            cell.is_none_or(|id| {
                matches!(
                    self.units.get(id.0),
                    Some(Some(unit)) if self.cell_index(unit.position) == Some(i)
                )
            })
        });
        units_ok && cells_ok
    }

    fn resolve(
        &self,
        side: Side,
        unit_name: &str,
        direction: &str,
    ) -> Result<ResolvedMove, EngineError> {
        let unit = self.unit(side, unit_name).ok_or_else(|| {
            EngineError::UnitNotFound {
                side,
                name: unit_name.to_string(),
            }
        })?;
        let direction: Direction = direction
            .parse()
            .map_err(|_| EngineError::InvalidDirection(direction.to_string()))?;
        let to = unit.position.step(direction, self.size)?;

        let capture = match self.occupant(to) {
            Some(other) if other.side == side => {
                return Err(EngineError::FriendlyOccupied {
                    row: to.row,
                    col: to.col,
                });
            }
            Some(enemy) => Some(enemy.id),
            None => None,
        };

        Ok(ResolvedMove {
            unit: unit.id,
            direction,
            from: unit.position,
            to,
            capture,
        })
    }

    fn place(&mut self, side: Side, name: &str, position: Position) {
        let id = UnitId(self.units.len());
        if let Some(index) = self.cell_index(position) {
            self.cells[index] = Some(id);
        }
        self.units.push(Some(Unit {
            id,
            side,
            name: name.to_string(),
            position,
        }));
    }

    fn cell_index(&self, pos: Position) -> Option<usize> {
        (pos.row < self.size && pos.col < self.size)
            .then(|| pos.row * self.size + pos.col)
    }
}

impl Default for Match {
    fn default() -> Self {
        Match::new(DEFAULT_BOARD_SIZE)
    }
}
