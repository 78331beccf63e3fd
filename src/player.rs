use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::board::Board;
use crate::common::{EngineError, ShotOutcome};
use crate::config::{EngineConfig, GameConfig};
use crate::engine::selector::random_unknown_cell;
use crate::engine::{Hunter, Move, ObservationState};

/// Interface implemented by different player types.
///
/// A Player is responsible for:
/// - Placing its own fleet
/// - Selecting targets to attack
/// - Absorbing the result of each of its shots
pub trait Player {
    /// Produce the player's own board with every ship placed.
    fn place_ships(&mut self) -> Result<Board, EngineError>;

    /// Choose the next target cell.
    fn select_target(&mut self) -> Result<Move, EngineError>;

    /// Inform the player of the result of its last guess.
    fn handle_guess_result(
        &mut self,
        x: usize,
        y: usize,
        outcome: ShotOutcome,
    ) -> Result<(), EngineError>;
}

impl<R: Rng> Player for Hunter<R> {
    fn place_ships(&mut self) -> Result<Board, EngineError> {
        self.optimized_layout()
    }

    fn select_target(&mut self) -> Result<Move, EngineError> {
        self.choose_next_move()
    }

    fn handle_guess_result(
        &mut self,
        x: usize,
        y: usize,
        outcome: ShotOutcome,
    ) -> Result<(), EngineError> {
        self.record_shot(x, y, outcome).map(|_| ())
    }
}

/// Baseline that fires at uniformly random unknown cells and places its
/// fleet at random.
pub struct RandomPlayer {
    game: GameConfig,
    observations: ObservationState,
    placement_attempts: usize,
    rng: SmallRng,
}

impl RandomPlayer {
    pub fn new(game: GameConfig, seed: u64) -> Self {
        Self {
            observations: ObservationState::new(&game),
            placement_attempts: EngineConfig::default().layout_placement_attempts,
            game,
            rng: SmallRng::seed_from_u64(seed),
        }
    }
}

impl Player for RandomPlayer {
    fn place_ships(&mut self) -> Result<Board, EngineError> {
        Ok(Board::random(
            &mut self.rng,
            &self.game,
            self.placement_attempts,
        )?)
    }

    fn select_target(&mut self) -> Result<Move, EngineError> {
        let (x, y) = random_unknown_cell(&self.observations, &mut self.rng)?;
        let unknown = self.observations.unknown_cells().count();
        Ok(Move {
            x,
            y,
            confidence: 1.0 / unknown as f64,
        })
    }

    fn handle_guess_result(
        &mut self,
        x: usize,
        y: usize,
        outcome: ShotOutcome,
    ) -> Result<(), EngineError> {
        self.observations.record(x, y, outcome).map(|_| ())
    }
}
