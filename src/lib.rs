mod bitgrid;
mod board;
mod common;
mod config;
pub mod engine;
pub mod game;
mod logging;
mod player;
mod ship;

pub use bitgrid::{BitGrid, BitGridError, SetBits};
pub use board::{placement_is_legal, Board};
pub use common::*;
pub use config::*;
pub use engine::{
    dispersion, is_consistent, optimize_layout, select_move, Hunter, Hypothesis, Mode, Move,
    ObservationState, Population, ProbabilityMap, ReplenishReport, ShotRecord,
};
pub use game::{duel, play_solo, DuelReport, GameStatus, SideReport, SoloReport};
pub use logging::{init_logging, try_init_logging, LOG_ENV};
pub use player::*;
pub use ship::*;
