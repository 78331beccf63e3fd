//! The hypothesis population: sampled complete layouts consistent with every
//! observation, filtered in place and replenished in parallel under a
//! wall-clock budget.

use log::{debug, info};
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use crate::bitgrid::BitGrid;
use crate::board::random_fitting_placement;
use crate::common::{neighbours4, neighbours8, CellState, ShotOutcome};
use crate::config::EngineConfig;
use crate::engine::observation::{ObservationState, ShotRecord};
use crate::ship::Placement;

/// One complete candidate layout; a set bit is a ship cell.
pub type Hypothesis = BitGrid<u64>;

/// Shared wall-clock cutoff observed by every replenishment worker.
pub struct Deadline {
    at: Instant,
    tripped: AtomicBool,
}

impl Deadline {
    pub fn after(budget: Duration) -> Self {
        Self {
            at: Instant::now() + budget,
            tripped: AtomicBool::new(false),
        }
    }

    /// Once any worker sees the deadline pass, all workers see it.
    pub fn expired(&self) -> bool {
        if self.tripped.load(Ordering::Relaxed) {
            return true;
        }
        if Instant::now() >= self.at {
            self.tripped.store(true, Ordering::Relaxed);
            return true;
        }
        false
    }
}

/// Summary of one replenishment pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReplenishReport {
    pub produced: usize,
    pub trials: usize,
    pub elapsed: Duration,
    pub budget_expired: bool,
}

/// Read-only view of the observations a trial must respect.
struct TrialContext {
    width: usize,
    height: usize,
    misses: BitGrid,
    /// Hit and sunk cells.
    known_ships: BitGrid,
    hits: BitGrid,
    /// Sunk ships are fixed; every trial grid starts from them.
    sunk: BitGrid,
}

impl TrialContext {
    fn new(obs: &ObservationState) -> Self {
        let hits = obs.mask(CellState::Hit);
        let sunk = obs.mask(CellState::Sunk);
        Self {
            width: obs.width(),
            height: obs.height(),
            misses: obs.mask(CellState::Miss),
            known_ships: &hits | &sunk,
            hits,
            sunk,
        }
    }

    /// Legality of `placement` against the trial grid and the observations.
    /// Known ship cells may be covered but not merely touched.
    fn can_place(&self, grid: &BitGrid, placement: &Placement) -> bool {
        placement.cells().all(|(x, y)| {
            !self.misses.contains(x, y)
                && !grid.contains(x, y)
                && neighbours8(x, y, self.width, self.height).all(|(nx, ny)| {
                    placement.contains(nx, ny)
                        || !(grid.contains(nx, ny) || self.known_ships.contains(nx, ny))
                })
        })
    }

    /// Randomized greedy placement of `lengths`; `None` when any ship runs
    /// out of attempts or the result leaves a hit uncovered.
    fn trial<R: Rng + ?Sized>(
        &self,
        lengths: &[usize],
        attempts: usize,
        rng: &mut R,
    ) -> Option<Hypothesis> {
        let mut order = lengths.to_vec();
        order.shuffle(rng);
        let mut grid = self.sunk.clone();

        for len in order {
            let mut placed = false;
            for _ in 0..attempts {
                let placement = random_fitting_placement(rng, self.width, self.height, len)?;
                if self.can_place(&grid, &placement) {
                    for (x, y) in placement.cells() {
                        grid.set(x, y).ok()?;
                    }
                    placed = true;
                    break;
                }
            }
            if !placed {
                return None;
            }
        }

        self.hits.is_subset_of(&grid).ok()?.then_some(grid)
    }
}

/// Whether `hypothesis` agrees with every observed cell.
pub fn is_consistent(hypothesis: &Hypothesis, obs: &ObservationState) -> bool {
    (0..obs.height()).all(|y| {
        (0..obs.width()).all(|x| match obs.state(x, y) {
            CellState::Unknown => true,
            CellState::Miss => !hypothesis.contains(x, y),
            CellState::Hit | CellState::Sunk => hypothesis.contains(x, y),
        })
    })
}

/// Size of the 4-connected ship component through (x, y).
pub fn ship_component_len(hypothesis: &Hypothesis, x: usize, y: usize) -> usize {
    if !hypothesis.contains(x, y) {
        return 0;
    }
    let (w, h) = (hypothesis.width(), hypothesis.height());
    let mut seen = BitGrid::<u64>::new(w, h);
    let _ = seen.set(x, y);
    let mut queue = VecDeque::from([(x, y)]);
    let mut len = 0;
    while let Some((cx, cy)) = queue.pop_front() {
        len += 1;
        for (nx, ny) in neighbours4(cx, cy, w, h) {
            if hypothesis.contains(nx, ny) && !seen.contains(nx, ny) {
                let _ = seen.set(nx, ny);
                queue.push_back((nx, ny));
            }
        }
    }
    len
}

/// A bounded sample of layouts consistent with the observations.
#[derive(Debug, Clone, Default)]
pub struct Population {
    hypotheses: Vec<Hypothesis>,
}

impl Population {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.hypotheses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hypotheses.is_empty()
    }

    pub fn hypotheses(&self) -> &[Hypothesis] {
        &self.hypotheses
    }

    /// Drop every hypothesis contradicting the cells `record` resolved.
    /// Returns the number removed.
    ///
    /// Positional agreement is enough for a sunk shot unless `strict` also
    /// asks the hypothesis ship through the shot to have the sunk length.
    pub fn filter(&mut self, obs: &ObservationState, record: &ShotRecord, strict: bool) -> usize {
        let before = self.hypotheses.len();
        let required: Vec<((usize, usize), bool)> = record
            .resolved
            .iter()
            .map(|&(x, y)| ((x, y), obs.state(x, y).is_ship()))
            .collect();
        let sunk_len = match (strict, record.outcome, record.sunk_length) {
            (true, ShotOutcome::Sunk, Some(len)) => Some(len),
            _ => None,
        };

        self.hypotheses.retain(|h| {
            required
                .iter()
                .all(|&((x, y), ship)| h.contains(x, y) == ship)
                && sunk_len.map_or(true, |len| ship_component_len(h, record.x, record.y) == len)
        });
        before - self.hypotheses.len()
    }

    /// Refill up to `config.max_hypotheses` within `config.time_budget()`.
    ///
    /// Trials run on the rayon pool, one local batch per worker, each worker
    /// with its own generator seeded from `rng`. The deadline is checked
    /// between trials only. Falling short of the target is normal under
    /// dense constraints.
    pub fn replenish<R: Rng + ?Sized>(
        &mut self,
        obs: &ObservationState,
        config: &EngineConfig,
        rng: &mut R,
    ) -> ReplenishReport {
        let start = Instant::now();
        let needed = config.max_hypotheses.saturating_sub(self.hypotheses.len());
        let lengths = obs.remaining_lengths();
        if needed == 0 || lengths.is_empty() {
            return ReplenishReport::default();
        }

        let ctx = TrialContext::new(obs);
        let deadline = Deadline::after(config.time_budget());
        let workers = rayon::current_num_threads().clamp(1, needed);
        let quota = needed.div_ceil(workers);
        let trial_quota = needed
            .saturating_mul(config.trials_per_slot.max(1))
            .div_ceil(workers);
        let seeds: Vec<u64> = (0..workers).map(|_| rng.random()).collect();
        let attempts = config.placement_attempts;

        let batches: Vec<(Vec<Hypothesis>, usize)> = seeds
            .into_par_iter()
            .map(|seed| {
                let mut rng = SmallRng::seed_from_u64(seed);
                // grows with what the budget actually yields
                let mut local = Vec::new();
                let mut trials = 0usize;
                while local.len() < quota && trials < trial_quota && !deadline.expired() {
                    trials += 1;
                    if let Some(h) = ctx.trial(&lengths, attempts, &mut rng) {
                        local.push(h);
                    }
                }
                (local, trials)
            })
            .collect();

        let mut report = ReplenishReport {
            budget_expired: deadline.expired(),
            ..ReplenishReport::default()
        };
        for (batch, trials) in batches {
            report.produced += batch.len();
            report.trials += trials;
            self.hypotheses.extend(batch);
        }
        self.hypotheses.truncate(config.max_hypotheses);
        report.elapsed = start.elapsed();

        if report.budget_expired {
            info!(
                "replenishment hit its {:?} budget: {} new hypotheses from {} trials, population {}",
                config.time_budget(),
                report.produced,
                report.trials,
                self.hypotheses.len()
            );
        } else {
            debug!(
                "replenished {} hypotheses from {} trials in {:?}, population {}",
                report.produced,
                report.trials,
                report.elapsed,
                self.hypotheses.len()
            );
        }
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{GameConfig, ShipDef};

    fn small_game() -> GameConfig {
        GameConfig {
            width: 6,
            height: 6,
            ships: vec![ShipDef::new("Cruiser", 3, 1), ShipDef::new("Destroyer", 2, 1)],
        }
    }

    #[test]
    fn trial_respects_misses_and_covers_hits() {
        let game = small_game();
        let mut obs = ObservationState::new(&game);
        obs.record(0, 0, ShotOutcome::Miss).unwrap();
        obs.record(3, 3, ShotOutcome::Hit).unwrap();
        let ctx = TrialContext::new(&obs);
        let mut rng = SmallRng::seed_from_u64(7);
        let mut found = 0;
        for _ in 0..500 {
            if let Some(h) = ctx.trial(&obs.remaining_lengths(), 50, &mut rng) {
                assert!(is_consistent(&h, &obs));
                assert_eq!(h.count_ones(), 5);
                found += 1;
            }
        }
        assert!(found > 0);
    }

    #[test]
    fn deadline_trips_for_everyone() {
        let deadline = Deadline::after(Duration::ZERO);
        assert!(deadline.expired());
        assert!(deadline.tripped.load(Ordering::Relaxed));
    }

    #[test]
    fn component_len_measures_one_ship() {
        let h = Hypothesis::from_cells(6, 6, [(0, 0), (1, 0), (2, 0), (4, 4)]).unwrap();
        assert_eq!(ship_component_len(&h, 1, 0), 3);
        assert_eq!(ship_component_len(&h, 4, 4), 1);
        assert_eq!(ship_component_len(&h, 5, 5), 0);
    }
}
