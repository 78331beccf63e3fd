//! Game and engine configuration.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::common::EngineError;

pub const BOARD_SIZE: usize = 10;

/// Largest population `EngineConfig::validate` accepts.
pub const MAX_POPULATION: usize = 1_000_000;

/// A class of ship: display name, length and how many of them are in play.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShipDef {
    pub name: String,
    pub length: usize,
    #[serde(default = "one")]
    pub count: usize,
}

fn one() -> usize {
    1
}

impl ShipDef {
    pub fn new(name: impl Into<String>, length: usize, count: usize) -> Self {
        Self {
            name: name.into(),
            length,
            count,
        }
    }
}

/// Board shape plus the fleet each side places.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConfig {
    pub width: usize,
    pub height: usize,
    pub ships: Vec<ShipDef>,
}

impl GameConfig {
    /// The 10×10 fleet: Carrier 5, Battleship 4, two Cruisers 3, Destroyer 2.
    pub fn standard() -> Self {
        Self {
            width: BOARD_SIZE,
            height: BOARD_SIZE,
            ships: vec![
                ShipDef::new("Carrier", 5, 1),
                ShipDef::new("Battleship", 4, 1),
                ShipDef::new("Cruiser", 3, 2),
                ShipDef::new("Destroyer", 2, 1),
            ],
        }
    }

    /// 12×12 with one Carrier, two Battleships, three Cruisers and two
    /// Destroyers.
    pub fn large() -> Self {
        Self {
            width: 12,
            height: 12,
            ships: vec![
                ShipDef::new("Carrier", 5, 1),
                ShipDef::new("Battleship", 4, 2),
                ShipDef::new("Cruiser", 3, 3),
                ShipDef::new("Destroyer", 2, 2),
            ],
        }
    }

    /// 15×15 with two Carriers, two Battleships, four Cruisers and three
    /// Destroyers.
    pub fn huge() -> Self {
        Self {
            width: 15,
            height: 15,
            ships: vec![
                ShipDef::new("Carrier", 5, 2),
                ShipDef::new("Battleship", 4, 2),
                ShipDef::new("Cruiser", 3, 4),
                ShipDef::new("Destroyer", 2, 3),
            ],
        }
    }

    /// Flat multiset of ship lengths, one entry per ship.
    pub fn lengths(&self) -> Vec<usize> {
        self.ships
            .iter()
            .flat_map(|s| std::iter::repeat(s.length).take(s.count))
            .collect()
    }

    /// Total number of ship cells in the fleet.
    pub fn total_ship_cells(&self) -> usize {
        self.ships.iter().map(|s| s.length * s.count).sum()
    }

    pub fn validate(&self) -> Result<(), EngineError> {
        if self.width == 0 || self.height == 0 {
            return Err(EngineError::InvalidConfig(format!(
                "board must be non-empty, got {}x{}",
                self.width, self.height
            )));
        }
        let longest = self.width.max(self.height);
        for s in &self.ships {
            if s.length == 0 || s.length > longest {
                return Err(EngineError::InvalidConfig(format!(
                    "ship {} has length {} which does not fit a {}x{} board",
                    s.name, s.length, self.width, self.height
                )));
            }
        }
        if self.total_ship_cells() > self.width * self.height {
            return Err(EngineError::InvalidConfig(
                "fleet has more cells than the board".into(),
            ));
        }
        Ok(())
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::standard()
    }
}

/// Tunables of the targeting engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Replenishment refills the population up to this size.
    pub max_hypotheses: usize,
    /// Replenishment triggers when the population drops below this size.
    pub min_hypotheses: usize,
    /// Wall-clock budget of a single replenishment, in milliseconds.
    pub time_budget_ms: u64,
    /// Random placements tried per ship inside one trial.
    pub placement_attempts: usize,
    /// Trials allowed per missing hypothesis before replenishment gives up.
    pub trials_per_slot: usize,
    /// Hunt-mode multiplier for parity-lattice cells.
    pub parity_boost: f64,
    /// Cells at or above this probability never receive the parity boost.
    pub parity_cutoff: f64,
    /// Confidence reported when the move is a uniform-random fallback.
    pub fallback_confidence: f64,
    /// Candidate fleets sampled by the layout optimizer.
    pub layout_candidates: usize,
    /// Placement attempts per ship when sampling a candidate fleet.
    pub layout_placement_attempts: usize,
    /// Require the hypothesis ship through a sunk shot to have the sunk length.
    pub strict_sunk_filter: bool,
    /// Mark the diagonal neighbours of a hit as misses.
    pub reveal_hit_diagonals: bool,
    /// Mark unknown regions too small for any remaining ship as misses.
    pub prune_dead_zones: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_hypotheses: 50_000,
            min_hypotheses: 5_000,
            time_budget_ms: 2_000,
            placement_attempts: 50,
            trials_per_slot: 4,
            parity_boost: 1.2,
            parity_cutoff: 0.9,
            fallback_confidence: 0.1,
            layout_candidates: 100,
            layout_placement_attempts: 10_000,
            strict_sunk_filter: false,
            reveal_hit_diagonals: true,
            prune_dead_zones: true,
        }
    }
}

impl EngineConfig {
    /// A lighter setting for simulations and tests: smaller population and
    /// a shorter budget.
    pub fn fast() -> Self {
        Self {
            max_hypotheses: 4_000,
            min_hypotheses: 800,
            time_budget_ms: 500,
            layout_candidates: 20,
            ..Self::default()
        }
    }

    pub fn time_budget(&self) -> Duration {
        Duration::from_millis(self.time_budget_ms)
    }

    pub fn validate(&self) -> Result<(), EngineError> {
        if self.max_hypotheses > MAX_POPULATION {
            return Err(EngineError::InvalidConfig(format!(
                "max_hypotheses ({}) exceeds the limit of {}",
                self.max_hypotheses, MAX_POPULATION
            )));
        }
        if self.min_hypotheses > self.max_hypotheses {
            return Err(EngineError::InvalidConfig(format!(
                "min_hypotheses ({}) exceeds max_hypotheses ({})",
                self.min_hypotheses, self.max_hypotheses
            )));
        }
        if self.placement_attempts == 0 || self.layout_placement_attempts == 0 {
            return Err(EngineError::InvalidConfig(
                "placement attempts must be positive".into(),
            ));
        }
        if !(self.parity_boost.is_finite() && self.parity_boost >= 1.0) {
            return Err(EngineError::InvalidConfig(format!(
                "parity_boost must be >= 1.0, got {}",
                self.parity_boost
            )));
        }
        if !(0.0..=1.0).contains(&self.parity_cutoff) {
            return Err(EngineError::InvalidConfig(format!(
                "parity_cutoff must lie in [0, 1], got {}",
                self.parity_cutoff
            )));
        }
        if !(0.0..=1.0).contains(&self.fallback_confidence) {
            return Err(EngineError::InvalidConfig(format!(
                "fallback_confidence must lie in [0, 1], got {}",
                self.fallback_confidence
            )));
        }
        Ok(())
    }
}

/// Configuration file layout accepted by the binaries.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub game: GameConfig,
    pub engine: EngineConfig,
}

impl Settings {
    pub fn from_json(text: &str) -> anyhow::Result<Self> {
        let settings: Settings = serde_json::from_str(text)?;
        settings.game.validate()?;
        settings.engine.validate()?;
        Ok(settings)
    }
}
