//! The rules oracle: a real board with ship placements and shot resolution
//! under the no-touch rule.

use core::fmt;
use rand::Rng;

use crate::bitgrid::BitGrid;
use crate::common::{neighbours8, BoardError, ShotOutcome};
use crate::config::GameConfig;
use crate::ship::{Orientation, Placement, Ship};

/// Whether `placement` can be added to a board whose ship cells are
/// `occupied`: it must fit, must not overlap, and no cell outside the
/// placement may touch it (diagonals included).
pub fn placement_is_legal(occupied: &BitGrid, placement: &Placement) -> bool {
    let (width, height) = (occupied.width(), occupied.height());
    if !placement.fits(width, height) {
        return false;
    }
    placement.cells().all(|(x, y)| {
        !occupied.contains(x, y)
            && neighbours8(x, y, width, height)
                .all(|(nx, ny)| placement.contains(nx, ny) || !occupied.contains(nx, ny))
    })
}

/// Draw a uniformly random in-bounds placement of `length`.
pub(crate) fn random_fitting_placement<R: Rng + ?Sized>(
    rng: &mut R,
    width: usize,
    height: usize,
    length: usize,
) -> Option<Placement> {
    let horizontal_fits = length <= width;
    let vertical_fits = length <= height;
    let orientation = match (horizontal_fits, vertical_fits) {
        (true, true) => {
            if rng.random() {
                Orientation::Horizontal
            } else {
                Orientation::Vertical
            }
        }
        (true, false) => Orientation::Horizontal,
        (false, true) => Orientation::Vertical,
        (false, false) => return None,
    };
    let (max_x, max_y) = match orientation {
        Orientation::Horizontal => (width - length, height - 1),
        Orientation::Vertical => (width - 1, height - length),
    };
    let x = rng.random_range(0..=max_x);
    let y = rng.random_range(0..=max_y);
    Some(Placement::new(x, y, length, orientation))
}

/// A real board: ship placements plus the shots fired against it.
#[derive(Clone)]
pub struct Board {
    width: usize,
    height: usize,
    ships: Vec<Ship>,
    ship_map: BitGrid,
    hits: BitGrid,
    misses: BitGrid,
}

impl Board {
    /// Create an empty board (no ships placed).
    pub fn new(width: usize, height: usize) -> Result<Self, BoardError> {
        if width == 0 || height == 0 {
            return Err(BoardError::InvalidDimensions { width, height });
        }
        let empty = BitGrid::new(width, height);
        Ok(Board {
            width,
            height,
            ships: Vec::new(),
            ship_map: empty.clone(),
            hits: empty.clone(),
            misses: empty,
        })
    }

    /// Sample a full fleet for `game`, largest ships first.
    pub fn random<R: Rng + ?Sized>(
        rng: &mut R,
        game: &GameConfig,
        attempts: usize,
    ) -> Result<Self, BoardError> {
        let mut board = Board::new(game.width, game.height)?;
        let mut defs: Vec<_> = game.ships.iter().collect();
        defs.sort_by(|a, b| b.length.cmp(&a.length));
        for def in defs {
            for _ in 0..def.count {
                let placement = board.random_placement(rng, def.length, attempts)?;
                board.place(def.name.clone(), placement)?;
            }
        }
        Ok(board)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn ships(&self) -> &[Ship] {
        &self.ships
    }

    /// Occupancy mask of all ships.
    pub fn ship_map(&self) -> &BitGrid {
        &self.ship_map
    }

    /// Returns `true` when every placed ship is sunk.
    pub fn all_sunk(&self) -> bool {
        self.ships.iter().all(Ship::is_sunk)
    }

    /// Ships still afloat.
    pub fn ships_afloat(&self) -> usize {
        self.ships.iter().filter(|s| !s.is_sunk()).count()
    }

    pub fn can_place(&self, placement: &Placement) -> bool {
        placement_is_legal(&self.ship_map, placement)
    }

    /// Place a named ship, enforcing bounds, overlap and the no-touch rule.
    pub fn place(&mut self, name: impl Into<String>, placement: Placement) -> Result<(), BoardError> {
        let ship = Ship::new(name, placement, self.width, self.height)?;
        if self.ship_map.intersects(ship.mask())? {
            return Err(BoardError::ShipOverlaps);
        }
        if !self.can_place(&placement) {
            return Err(BoardError::ShipTouches);
        }
        self.ship_map |= ship.mask();
        self.ships.push(ship);
        Ok(())
    }

    /// Returns a random legal placement for a ship of `length`.
    pub fn random_placement<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        length: usize,
        attempts: usize,
    ) -> Result<Placement, BoardError> {
        for _ in 0..attempts {
            let Some(placement) = random_fitting_placement(rng, self.width, self.height, length)
            else {
                break;
            };
            if self.can_place(&placement) {
                return Ok(placement);
            }
        }
        Err(BoardError::UnableToPlaceShip(length))
    }

    /// Whether a shot at (x, y) was already fired or revealed.
    pub fn is_resolved(&self, x: usize, y: usize) -> bool {
        self.hits.contains(x, y) || self.misses.contains(x, y)
    }

    /// Resolve a shot at (x, y). Sinking a ship reveals its surroundings as
    /// misses.
    pub fn fire(&mut self, x: usize, y: usize) -> Result<ShotOutcome, BoardError> {
        if x >= self.width || y >= self.height {
            return Err(BoardError::OutOfBounds { x, y });
        }
        if self.is_resolved(x, y) {
            return Err(BoardError::AlreadyGuessed);
        }
        if !self.ship_map.contains(x, y) {
            self.misses.set(x, y)?;
            return Ok(ShotOutcome::Miss);
        }
        self.hits.set(x, y)?;
        let Some(ship) = self.ships.iter_mut().find(|s| s.mask().contains(x, y)) else {
            return Ok(ShotOutcome::Hit);
        };
        ship.register_hit(x, y);
        if !ship.is_sunk() {
            return Ok(ShotOutcome::Hit);
        }
        let placement = ship.placement();
        for (cx, cy) in placement.cells() {
            for (nx, ny) in neighbours8(cx, cy, self.width, self.height) {
                if !self.ship_map.contains(nx, ny) {
                    self.misses.set(nx, ny)?;
                }
            }
        }
        Ok(ShotOutcome::Sunk)
    }
}

impl fmt::Debug for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Board {{\n  ship_map: {:?},\n  hits: {:?},\n  misses: {:?},\n  ships: {:?}\n}}",
            self.ship_map, self.hits, self.misses, self.ships
        )
    }
}
