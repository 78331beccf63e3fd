//! Common types: cell knowledge, shot outcomes and the error enums shared by
//! the board and the engine.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::bitgrid::BitGridError;

/// Result of firing at a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShotOutcome {
    /// The shot hit water.
    Miss,
    /// The shot hit a ship that is still afloat.
    Hit,
    /// The shot destroyed the last intact segment of a ship.
    Sunk,
}

/// What is known about a single opponent cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum CellState {
    #[default]
    Unknown,
    Miss,
    Hit,
    Sunk,
}

impl CellState {
    /// Whether the cell is known to hold part of a ship.
    #[inline]
    pub fn is_ship(self) -> bool {
        matches!(self, CellState::Hit | CellState::Sunk)
    }

    #[inline]
    pub fn is_unknown(self) -> bool {
        self == CellState::Unknown
    }
}

impl From<ShotOutcome> for CellState {
    fn from(outcome: ShotOutcome) -> Self {
        match outcome {
            ShotOutcome::Miss => CellState::Miss,
            ShotOutcome::Hit => CellState::Hit,
            ShotOutcome::Sunk => CellState::Sunk,
        }
    }
}

/// Errors returned by board (rules) operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BoardError {
    #[error("BitGrid error: {0}")]
    BitGrid(#[from] BitGridError),
    #[error("Board dimensions must be positive, got {width}x{height}")]
    InvalidDimensions { width: usize, height: usize },
    #[error("Coordinate ({x}, {y}) is outside the board")]
    OutOfBounds { x: usize, y: usize },
    #[error("Ship placement is out of bounds")]
    ShipOutOfBounds,
    #[error("Ship placement overlaps with another ship")]
    ShipOverlaps,
    #[error("Ship placement touches another ship")]
    ShipTouches,
    #[error("Guess was already made at this position")]
    AlreadyGuessed,
    #[error("Unable to place ship of length {0}")]
    UnableToPlaceShip(usize),
}

/// Errors returned by the targeting engine.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    #[error("Coordinate ({x}, {y}) is outside the board")]
    OutOfBounds { x: usize, y: usize },
    #[error("Cell ({x}, {y}) is already resolved as {state:?}")]
    AlreadyResolved { x: usize, y: usize, state: CellState },
    #[error("No unknown cells left to target")]
    NoUnknownCells,
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("Board error: {0}")]
    Board(#[from] BoardError),
}

/// In-bounds 8-connected neighbours of (x, y).
pub fn neighbours8(
    x: usize,
    y: usize,
    width: usize,
    height: usize,
) -> impl Iterator<Item = (usize, usize)> {
    const OFFSETS: [(isize, isize); 8] = [
        (-1, -1),
        (0, -1),
        (1, -1),
        (-1, 0),
        (1, 0),
        (-1, 1),
        (0, 1),
        (1, 1),
    ];
    offset_cells(x, y, width, height, &OFFSETS)
}

/// In-bounds 4-connected neighbours of (x, y).
pub fn neighbours4(
    x: usize,
    y: usize,
    width: usize,
    height: usize,
) -> impl Iterator<Item = (usize, usize)> {
    const OFFSETS: [(isize, isize); 4] = [(0, -1), (-1, 0), (1, 0), (0, 1)];
    offset_cells(x, y, width, height, &OFFSETS)
}

/// In-bounds diagonal neighbours of (x, y).
pub fn diagonals(
    x: usize,
    y: usize,
    width: usize,
    height: usize,
) -> impl Iterator<Item = (usize, usize)> {
    const OFFSETS: [(isize, isize); 4] = [(-1, -1), (1, -1), (-1, 1), (1, 1)];
    offset_cells(x, y, width, height, &OFFSETS)
}

fn offset_cells(
    x: usize,
    y: usize,
    width: usize,
    height: usize,
    offsets: &'static [(isize, isize)],
) -> impl Iterator<Item = (usize, usize)> {
    offsets.iter().filter_map(move |&(dx, dy)| {
        let nx = x.checked_add_signed(dx)?;
        let ny = y.checked_add_signed(dy)?;
        (nx < width && ny < height).then_some((nx, ny))
    })
}
