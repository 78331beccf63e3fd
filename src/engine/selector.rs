//! Move selection: maximum probability over unknown cells, with a parity
//! bonus while hunting.

use log::info;
use rand::seq::IndexedRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::common::EngineError;
use crate::config::EngineConfig;
use crate::engine::observation::ObservationState;
use crate::engine::probability::ProbabilityMap;

/// Targeting phase, derived from the observations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Mode {
    /// No unresolved hits; parity lattice applies.
    Hunt,
    /// At least one hit whose ship is still afloat.
    Target,
}

impl Mode {
    pub fn of(obs: &ObservationState) -> Self {
        if obs.has_unresolved_hits() {
            Mode::Target
        } else {
            Mode::Hunt
        }
    }
}

/// A chosen attack cell with the map probability behind it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Move {
    pub x: usize,
    pub y: usize,
    pub confidence: f64,
}

/// Parity-boosted score of an unknown cell.
fn score(p: f64, x: usize, y: usize, mode: Mode, lattice: usize, config: &EngineConfig) -> f64 {
    if mode == Mode::Hunt && p < config.parity_cutoff && (x + y) % lattice == 0 {
        p * config.parity_boost
    } else {
        p
    }
}

/// Pick the unknown cell with the highest score, first in row-major order on
/// ties. Falls back to a uniformly random unknown cell when no cell scores
/// above zero.
pub fn select_move<R: Rng + ?Sized>(
    obs: &ObservationState,
    map: &ProbabilityMap,
    config: &EngineConfig,
    rng: &mut R,
) -> Result<Move, EngineError> {
    let mode = Mode::of(obs);
    let lattice = obs.min_remaining_length().unwrap_or(1).max(1);

    let mut best: Option<(Move, f64)> = None;
    for (x, y) in obs.unknown_cells() {
        let p = map.get(x, y);
        let s = score(p, x, y, mode, lattice, config);
        if best.map_or(true, |(_, top)| s > top) {
            best = Some((
                Move {
                    x,
                    y,
                    confidence: p,
                },
                s,
            ));
        }
    }

    match best {
        None => Err(EngineError::NoUnknownCells),
        Some((mv, s)) if s > 0.0 => Ok(mv),
        Some(_) => random_move(obs, config.fallback_confidence, rng),
    }
}

/// Uniformly random unknown cell.
pub fn random_unknown_cell<R: Rng + ?Sized>(
    obs: &ObservationState,
    rng: &mut R,
) -> Result<(usize, usize), EngineError> {
    let candidates: Vec<_> = obs.unknown_cells().collect();
    candidates.choose(rng).copied().ok_or(EngineError::NoUnknownCells)
}

/// Random unknown cell with a fixed placeholder confidence.
fn random_move<R: Rng + ?Sized>(
    obs: &ObservationState,
    confidence: f64,
    rng: &mut R,
) -> Result<Move, EngineError> {
    let (x, y) = random_unknown_cell(obs, rng)?;
    info!("no cell carries probability mass, falling back to random ({}, {})", x, y);
    Ok(Move { x, y, confidence })
}
