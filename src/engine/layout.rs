//! Monte Carlo choice of the engine's own fleet: sample legal layouts and
//! keep the most dispersed one.

use log::debug;
use rand::Rng;

use crate::board::Board;
use crate::common::BoardError;
use crate::config::GameConfig;

/// Mean pairwise Euclidean distance between ship centroids.
pub fn dispersion(board: &Board) -> f64 {
    let centres: Vec<(f64, f64)> = board
        .ships()
        .iter()
        .map(|s| s.placement().centroid())
        .collect();
    let mut sum = 0.0;
    let mut pairs = 0usize;
    for (i, a) in centres.iter().enumerate() {
        for b in &centres[i + 1..] {
            sum += (a.0 - b.0).hypot(a.1 - b.1);
            pairs += 1;
        }
    }
    if pairs == 0 {
        0.0
    } else {
        sum / pairs as f64
    }
}

/// Sample `candidates` random fleets and return the highest-scoring one with
/// its score. Candidates that fail to place are skipped.
pub fn optimize_layout<R: Rng + ?Sized>(
    rng: &mut R,
    game: &GameConfig,
    candidates: usize,
    attempts: usize,
) -> Result<(Board, f64), BoardError> {
    let mut best: Option<(Board, f64)> = None;
    let mut last_err = BoardError::UnableToPlaceShip(0);

    for _ in 0..candidates.max(1) {
        match Board::random(rng, game, attempts) {
            Ok(board) => {
                let fit = dispersion(&board);
                if best.as_ref().map_or(true, |(_, top)| fit > *top) {
                    best = Some((board, fit));
                }
            }
            Err(e) => last_err = e,
        }
    }

    let (board, fit) = best.ok_or(last_err)?;
    debug!("optimized layout with dispersion {:.3}", fit);
    Ok((board, fit))
}
