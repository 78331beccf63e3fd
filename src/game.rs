//! Turn loops that pit players against real boards.

use log::debug;
use serde::{Deserialize, Serialize};

use crate::board::Board;
use crate::common::{EngineError, ShotOutcome};
use crate::player::Player;

/// Current status of a game from one side's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameStatus {
    InProgress,
    Won,
    Lost,
}

/// Tally of one player's shots against one board.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SoloReport {
    pub shots: usize,
    pub hits: usize,
    pub sunk: usize,
    /// Every ship on the target board went down.
    pub finished: bool,
    /// Mean reported confidence over all shots.
    pub mean_confidence: f64,
}

impl SoloReport {
    fn absorb(&mut self, outcome: ShotOutcome, confidence: f64) {
        let n = self.shots as f64;
        self.mean_confidence = (self.mean_confidence * n + confidence) / (n + 1.0);
        self.shots += 1;
        match outcome {
            ShotOutcome::Miss => {}
            ShotOutcome::Hit => self.hits += 1,
            ShotOutcome::Sunk => {
                self.hits += 1;
                self.sunk += 1;
            }
        }
    }
}

/// Fire one shot chosen by `player` at `target`.
fn take_turn<P: Player + ?Sized>(
    player: &mut P,
    target: &mut Board,
    report: &mut SoloReport,
) -> Result<(), EngineError> {
    let mv = player.select_target()?;
    let outcome = target.fire(mv.x, mv.y)?;
    player.handle_guess_result(mv.x, mv.y, outcome)?;
    report.absorb(outcome, mv.confidence);
    debug!("shot ({}, {}) -> {:?} (confidence {:.3})", mv.x, mv.y, outcome, mv.confidence);
    Ok(())
}

/// Let `player` shoot at `target` until every ship is sunk or `max_turns`
/// shots have been fired.
pub fn play_solo<P: Player + ?Sized>(
    player: &mut P,
    target: &mut Board,
    max_turns: usize,
) -> Result<SoloReport, EngineError> {
    let mut report = SoloReport::default();
    while report.shots < max_turns && !target.all_sunk() {
        take_turn(player, target, &mut report)?;
    }
    report.finished = target.all_sunk();
    Ok(report)
}

/// One side of a duel.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SideReport {
    pub status: GameStatus,
    pub shots: SoloReport,
}

/// Result of a duel between two players.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DuelReport {
    pub first: SideReport,
    pub second: SideReport,
    pub turns: usize,
}

/// Alternate shots between two players, `first` opening, until one fleet is
/// destroyed or each side has fired `max_turns` shots.
pub fn duel(
    first: &mut dyn Player,
    second: &mut dyn Player,
    max_turns: usize,
) -> Result<DuelReport, EngineError> {
    let mut first_board = first.place_ships()?;
    let mut second_board = second.place_ships()?;
    let mut first_report = SoloReport::default();
    let mut second_report = SoloReport::default();
    let mut turns = 0;

    while turns < max_turns {
        turns += 1;
        take_turn(first, &mut second_board, &mut first_report)?;
        if second_board.all_sunk() {
            break;
        }
        take_turn(second, &mut first_board, &mut second_report)?;
        if first_board.all_sunk() {
            break;
        }
    }

    first_report.finished = second_board.all_sunk();
    second_report.finished = first_board.all_sunk();
    let (first_status, second_status) = match (first_report.finished, second_report.finished) {
        (true, _) => (GameStatus::Won, GameStatus::Lost),
        (_, true) => (GameStatus::Lost, GameStatus::Won),
        _ => (GameStatus::InProgress, GameStatus::InProgress),
    };
    Ok(DuelReport {
        first: SideReport {
            status: first_status,
            shots: first_report,
        },
        second: SideReport {
            status: second_status,
            shots: second_report,
        },
        turns,
    })
}
