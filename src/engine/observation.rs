//! Accumulated knowledge of the opponent grid and its unsunk fleet.

use core::fmt;
use log::{debug, warn};
use std::collections::VecDeque;

use crate::bitgrid::BitGrid;
use crate::common::{diagonals, neighbours4, neighbours8, CellState, EngineError, ShotOutcome};
use crate::config::{GameConfig, ShipDef};

/// What a single [`ObservationState::record`] changed.
#[derive(Debug, Clone, PartialEq)]
pub struct ShotRecord {
    pub x: usize,
    pub y: usize,
    pub outcome: ShotOutcome,
    /// Cells moved out of `Unknown`, the shot itself first.
    pub resolved: Vec<(usize, usize)>,
    /// Length of the ship a `Sunk` outcome destroyed.
    pub sunk_length: Option<usize>,
    /// The sunk region matched no remaining ship class.
    pub inconsistent: bool,
}

/// Per-cell knowledge of the opponent grid plus the ships not yet sunk.
///
/// Cells only ever leave `Unknown`; `Hit` cells are promoted to `Sunk` when
/// the ship they belong to goes down.
#[derive(Clone, PartialEq)]
pub struct ObservationState {
    width: usize,
    height: usize,
    cells: Vec<CellState>,
    remaining: Vec<ShipDef>,
    hit_diagonals: bool,
    dead_zones: bool,
}

impl ObservationState {
    /// Everything unknown, the whole fleet afloat.
    pub fn new(game: &GameConfig) -> Self {
        Self {
            width: game.width,
            height: game.height,
            cells: vec![CellState::Unknown; game.width * game.height],
            remaining: game.ships.clone(),
            hit_diagonals: false,
            dead_zones: false,
        }
    }

    /// Mark the diagonal neighbours of every hit as misses.
    pub fn with_hit_diagonals(mut self, enabled: bool) -> Self {
        self.hit_diagonals = enabled;
        self
    }

    /// Mark regions too small for any remaining ship as misses.
    pub fn with_dead_zone_pruning(mut self, enabled: bool) -> Self {
        self.dead_zones = enabled;
        self
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    fn idx(&self, x: usize, y: usize) -> usize {
        y * self.width + x
    }

    /// State of (x, y), `None` when out of bounds.
    pub fn get(&self, x: usize, y: usize) -> Option<CellState> {
        (x < self.width && y < self.height).then(|| self.cells[self.idx(x, y)])
    }

    /// State of an in-bounds cell; out-of-bounds cells read as `Miss`.
    #[inline]
    pub fn state(&self, x: usize, y: usize) -> CellState {
        self.get(x, y).unwrap_or(CellState::Miss)
    }

    fn put(&mut self, x: usize, y: usize, state: CellState) {
        let i = self.idx(x, y);
        self.cells[i] = state;
    }

    /// Ship classes with their counts still afloat.
    pub fn remaining(&self) -> &[ShipDef] {
        &self.remaining
    }

    /// Flat multiset of the lengths still afloat.
    pub fn remaining_lengths(&self) -> Vec<usize> {
        self.remaining
            .iter()
            .flat_map(|s| std::iter::repeat(s.length).take(s.count))
            .collect()
    }

    pub fn min_remaining_length(&self) -> Option<usize> {
        self.remaining
            .iter()
            .filter(|s| s.count > 0)
            .map(|s| s.length)
            .min()
    }

    /// No ship remains afloat.
    pub fn fleet_destroyed(&self) -> bool {
        self.remaining.iter().all(|s| s.count == 0)
    }

    /// A hit exists whose ship is not yet known to be sunk.
    pub fn has_unresolved_hits(&self) -> bool {
        self.cells.contains(&CellState::Hit)
    }

    /// All cells in `state`, row-major.
    pub fn cells_in(&self, state: CellState) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.cells
            .iter()
            .enumerate()
            .filter(move |&(_, &c)| c == state)
            .map(move |(i, _)| (i % self.width, i / self.width))
    }

    pub fn unknown_cells(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.cells_in(CellState::Unknown)
    }

    /// Mask of the cells in `state`.
    pub fn mask(&self, state: CellState) -> BitGrid {
        let mut grid = BitGrid::new(self.width, self.height);
        for (x, y) in self.cells_in(state) {
            let _ = grid.set(x, y);
        }
        grid
    }

    /// Record the outcome of a shot at an unknown cell.
    ///
    /// A `Sunk` outcome promotes the 4-connected run of hit cells through
    /// (x, y) to `Sunk`, retires one ship of that length and marks every
    /// unknown neighbour of the run as a miss. Callers report only the final
    /// shot of a ship as `Sunk`.
    pub fn record(
        &mut self,
        x: usize,
        y: usize,
        outcome: ShotOutcome,
    ) -> Result<ShotRecord, EngineError> {
        let current = self.get(x, y).ok_or(EngineError::OutOfBounds { x, y })?;
        if !current.is_unknown() {
            return Err(EngineError::AlreadyResolved { x, y, state: current });
        }

        self.put(x, y, outcome.into());
        let mut record = ShotRecord {
            x,
            y,
            outcome,
            resolved: vec![(x, y)],
            sunk_length: None,
            inconsistent: false,
        };

        match outcome {
            ShotOutcome::Miss => {}
            ShotOutcome::Hit => {
                if self.hit_diagonals {
                    let cells: Vec<_> = diagonals(x, y, self.width, self.height).collect();
                    self.reveal(cells, &mut record.resolved);
                }
            }
            ShotOutcome::Sunk => {
                let region = self.ship_region(x, y);
                for &(cx, cy) in &region {
                    self.put(cx, cy, CellState::Sunk);
                }
                let length = region.len();
                record.sunk_length = Some(length);
                if !self.retire(length) {
                    warn!(
                        "sunk region at ({}, {}) has length {} which matches no remaining ship",
                        x, y, length
                    );
                    record.inconsistent = true;
                }
                let surroundings: Vec<_> = region
                    .iter()
                    .flat_map(|&(cx, cy)| neighbours8(cx, cy, self.width, self.height))
                    .collect();
                self.reveal(surroundings, &mut record.resolved);
            }
        }

        if self.dead_zones {
            self.prune_dead_zones(&mut record.resolved);
        }
        Ok(record)
    }

    /// Turn the unknown cells among `cells` into misses.
    fn reveal<I>(&mut self, cells: I, resolved: &mut Vec<(usize, usize)>)
    where
        I: IntoIterator<Item = (usize, usize)>,
    {
        for (cx, cy) in cells {
            if self.state(cx, cy).is_unknown() {
                self.put(cx, cy, CellState::Miss);
                resolved.push((cx, cy));
            }
        }
    }

    /// Decrement the first class of `length` still afloat.
    fn retire(&mut self, length: usize) -> bool {
        match self
            .remaining
            .iter_mut()
            .find(|s| s.length == length && s.count > 0)
        {
            Some(class) => {
                class.count -= 1;
                true
            }
            None => false,
        }
    }

    /// BFS over the 4-connected ship cells (hit or sunk) through (x, y).
    fn ship_region(&self, x: usize, y: usize) -> Vec<(usize, usize)> {
        let mut seen = BitGrid::<u64>::new(self.width, self.height);
        let mut queue = VecDeque::from([(x, y)]);
        let _ = seen.set(x, y);
        let mut region = Vec::new();
        while let Some((cx, cy)) = queue.pop_front() {
            region.push((cx, cy));
            for (nx, ny) in neighbours4(cx, cy, self.width, self.height) {
                if self.state(nx, ny).is_ship() && !seen.contains(nx, ny) {
                    let _ = seen.set(nx, ny);
                    queue.push_back((nx, ny));
                }
            }
        }
        region
    }

    /// Mark every unknown cell of a 4-connected unknown/hit region in which
    /// no straight run of the smallest remaining length fits.
    fn prune_dead_zones(&mut self, resolved: &mut Vec<(usize, usize)>) {
        let Some(min_len) = self.min_remaining_length() else {
            return;
        };
        let open = |s: CellState| matches!(s, CellState::Unknown | CellState::Hit);
        let mut seen = BitGrid::<u64>::new(self.width, self.height);
        let mut pruned = 0usize;

        for start in 0..self.cells.len() {
            let (sx, sy) = (start % self.width, start / self.width);
            if !open(self.cells[start]) || seen.contains(sx, sy) {
                continue;
            }
            let mut island = BitGrid::<u64>::new(self.width, self.height);
            let mut members = Vec::new();
            let mut queue = VecDeque::from([(sx, sy)]);
            let _ = seen.set(sx, sy);
            while let Some((cx, cy)) = queue.pop_front() {
                let _ = island.set(cx, cy);
                members.push((cx, cy));
                for (nx, ny) in neighbours4(cx, cy, self.width, self.height) {
                    if open(self.state(nx, ny)) && !seen.contains(nx, ny) {
                        let _ = seen.set(nx, ny);
                        queue.push_back((nx, ny));
                    }
                }
            }
            if !run_fits(&island, &members, min_len) {
                for &(cx, cy) in &members {
                    if self.state(cx, cy).is_unknown() {
                        self.put(cx, cy, CellState::Miss);
                        resolved.push((cx, cy));
                        pruned += 1;
                    }
                }
            }
        }
        if pruned > 0 {
            debug!("dead-zone pruning marked {} cells as misses", pruned);
        }
    }
}

/// Whether a straight run of `len` cells lies entirely inside `island`.
fn run_fits(island: &BitGrid, members: &[(usize, usize)], len: usize) -> bool {
    members.iter().any(|&(x, y)| {
        (0..len).all(|k| island.contains(x + k, y)) || (0..len).all(|k| island.contains(x, y + k))
    })
}

impl fmt::Debug for ObservationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "ObservationState {}x{}:", self.width, self.height)?;
        writeln!(f, "{}", self)?;
        write!(f, "remaining: {:?}", self.remaining)
    }
}

impl fmt::Display for ObservationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for y in 0..self.height {
            for x in 0..self.width {
                let c = match self.state(x, y) {
                    CellState::Unknown => '·',
                    CellState::Miss => '○',
                    CellState::Hit => 'X',
                    CellState::Sunk => '#',
                };
                write!(f, "{} ", c)?;
            }
            if y + 1 < self.height {
                writeln!(f)?;
            }
        }
        Ok(())
    }
}
