//! Ship placements and placed ships.

use core::fmt;
use serde::{Deserialize, Serialize};

use crate::bitgrid::BitGrid;
use crate::common::BoardError;

/// Orientation of a ship on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Orientation {
    Horizontal,
    Vertical,
}

impl Orientation {
    /// Step from one segment to the next as `(dx, dy)`.
    #[inline]
    pub fn step(self) -> (usize, usize) {
        match self {
            Orientation::Horizontal => (1, 0),
            Orientation::Vertical => (0, 1),
        }
    }
}

/// A straight run of `length` cells starting at (`x`, `y`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Placement {
    pub x: usize,
    pub y: usize,
    pub length: usize,
    pub orientation: Orientation,
}

impl Placement {
    pub const fn new(x: usize, y: usize, length: usize, orientation: Orientation) -> Self {
        Self {
            x,
            y,
            length,
            orientation,
        }
    }

    /// Whether every segment lies on a `width × height` board.
    pub fn fits(&self, width: usize, height: usize) -> bool {
        if self.length == 0 {
            return false;
        }
        match self.orientation {
            Orientation::Horizontal => self.y < height && self.x + self.length <= width,
            Orientation::Vertical => self.x < width && self.y + self.length <= height,
        }
    }

    /// Segments in order from the origin.
    pub fn cells(&self) -> impl Iterator<Item = (usize, usize)> {
        let (dx, dy) = self.orientation.step();
        let (x, y) = (self.x, self.y);
        (0..self.length).map(move |k| (x + k * dx, y + k * dy))
    }

    pub fn contains(&self, x: usize, y: usize) -> bool {
        match self.orientation {
            Orientation::Horizontal => y == self.y && x >= self.x && x < self.x + self.length,
            Orientation::Vertical => x == self.x && y >= self.y && y < self.y + self.length,
        }
    }

    /// Mean position of the segments.
    pub fn centroid(&self) -> (f64, f64) {
        let half = (self.length as f64 - 1.0) / 2.0;
        match self.orientation {
            Orientation::Horizontal => (self.x as f64 + half, self.y as f64),
            Orientation::Vertical => (self.x as f64, self.y as f64 + half),
        }
    }

    /// Occupancy mask on a `width × height` board.
    pub fn mask(&self, width: usize, height: usize) -> Result<BitGrid, BoardError> {
        if !self.fits(width, height) {
            return Err(BoardError::ShipOutOfBounds);
        }
        Ok(BitGrid::from_cells(width, height, self.cells())?)
    }
}

/// A ship placed on a board, with hits tracked in a [`BitGrid`].
#[derive(Clone, PartialEq, Eq)]
pub struct Ship {
    name: String,
    placement: Placement,
    mask: BitGrid,
    hits: BitGrid,
}

impl Ship {
    /// Place a ship of `name` at `placement` on a `width × height` board.
    pub fn new(
        name: impl Into<String>,
        placement: Placement,
        width: usize,
        height: usize,
    ) -> Result<Self, BoardError> {
        let mask = placement.mask(width, height)?;
        Ok(Ship {
            name: name.into(),
            placement,
            mask,
            hits: BitGrid::new(width, height),
        })
    }

    /// Register a shot at (`x`, `y`). Returns `true` if it struck this ship.
    pub fn register_hit(&mut self, x: usize, y: usize) -> bool {
        if self.mask.contains(x, y) {
            let _ = self.hits.set(x, y);
            true
        } else {
            false
        }
    }

    /// All segments hit.
    pub fn is_sunk(&self) -> bool {
        self.hits.count_ones() == self.placement.length
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn placement(&self) -> Placement {
        self.placement
    }

    pub fn mask(&self) -> &BitGrid {
        &self.mask
    }
}

impl fmt::Debug for Ship {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Ship {{ name: \"{}\", origin: ({}, {}), length: {}, orientation: {:?}, hits: {} }}",
            self.name,
            self.placement.x,
            self.placement.y,
            self.placement.length,
            self.placement.orientation,
            self.hits.count_ones(),
        )
    }
}
