//! The targeting engine.
//!
//! [`Hunter`] keeps a population of complete opponent layouts consistent
//! with every shot result, derives a per-cell hit probability from it and
//! picks the next attack cell. Data flows one way per turn:
//!
//! 1. [`Hunter::record_shot`] updates the [`ObservationState`] and filters
//!    the [`Population`]; a population under the low-water mark is
//!    replenished within the time budget.
//! 2. [`Hunter::choose_next_move`] rebuilds the [`ProbabilityMap`] and runs
//!    the selector over it.

pub mod layout;
pub mod observation;
pub mod population;
pub mod probability;
pub mod selector;

use log::debug;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::board::Board;
use crate::common::{EngineError, ShotOutcome};
use crate::config::{EngineConfig, GameConfig};

pub use layout::{dispersion, optimize_layout};
pub use observation::{ObservationState, ShotRecord};
pub use population::{is_consistent, Deadline, Hypothesis, Population, ReplenishReport};
pub use probability::ProbabilityMap;
pub use selector::{select_move, Mode, Move};

/// Population-driven opponent targeting for one game.
pub struct Hunter<R: Rng = SmallRng> {
    game: GameConfig,
    config: EngineConfig,
    observations: ObservationState,
    population: Population,
    rng: R,
}

impl Hunter<SmallRng> {
    /// Engine with a generator seeded from `seed`.
    pub fn seeded(game: GameConfig, config: EngineConfig, seed: u64) -> Result<Self, EngineError> {
        Hunter::new(game, config, SmallRng::seed_from_u64(seed))
    }
}

impl<R: Rng> Hunter<R> {
    /// Validate the configuration and generate the initial population.
    pub fn new(game: GameConfig, config: EngineConfig, rng: R) -> Result<Self, EngineError> {
        game.validate()?;
        config.validate()?;
        let observations = ObservationState::new(&game)
            .with_hit_diagonals(config.reveal_hit_diagonals)
            .with_dead_zone_pruning(config.prune_dead_zones);
        let mut hunter = Self {
            game,
            config,
            observations,
            population: Population::new(),
            rng,
        };
        hunter.replenish();
        Ok(hunter)
    }

    pub fn game(&self) -> &GameConfig {
        &self.game
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn observations(&self) -> &ObservationState {
        &self.observations
    }

    pub fn population(&self) -> &Population {
        &self.population
    }

    pub fn mode(&self) -> Mode {
        Mode::of(&self.observations)
    }

    /// Record the outcome of a shot at an unknown cell, filter the
    /// population and refill it if it fell below the low-water mark.
    pub fn record_shot(
        &mut self,
        x: usize,
        y: usize,
        outcome: ShotOutcome,
    ) -> Result<ShotRecord, EngineError> {
        let record = self.observations.record(x, y, outcome)?;
        let removed =
            self.population
                .filter(&self.observations, &record, self.config.strict_sunk_filter);
        debug!(
            "({}, {}) {:?}: resolved {} cells, filtered {} hypotheses, {} remain",
            x,
            y,
            outcome,
            record.resolved.len(),
            removed,
            self.population.len()
        );
        if self.population.len() < self.config.min_hypotheses {
            self.replenish();
        }
        Ok(record)
    }

    /// Current probability map over the population.
    pub fn probability_map(&self) -> ProbabilityMap {
        ProbabilityMap::from_hypotheses(
            self.observations.width(),
            self.observations.height(),
            self.population.hypotheses(),
        )
    }

    /// Choose the next attack cell and the probability behind it.
    pub fn choose_next_move(&mut self) -> Result<Move, EngineError> {
        if self.population.len() < self.config.min_hypotheses {
            self.replenish();
        }
        let map = self.probability_map();
        select_move(&self.observations, &map, &self.config, &mut self.rng)
    }

    /// A dispersed fleet for the engine's own board.
    pub fn optimized_layout(&mut self) -> Result<Board, EngineError> {
        let (board, _) = optimize_layout(
            &mut self.rng,
            &self.game,
            self.config.layout_candidates,
            self.config.layout_placement_attempts,
        )?;
        Ok(board)
    }

    fn replenish(&mut self) -> ReplenishReport {
        self.population
            .replenish(&self.observations, &self.config, &mut self.rng)
    }
}
