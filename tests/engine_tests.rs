use hunter::{
    is_consistent, CellState, EngineConfig, EngineError, GameConfig, Hunter, Mode, ShipDef,
    ShotOutcome,
};

fn classic() -> GameConfig {
    GameConfig {
        width: 10,
        height: 10,
        ships: vec![
            ShipDef::new("Carrier", 5, 1),
            ShipDef::new("Battleship", 4, 1),
            ShipDef::new("Cruiser", 3, 1),
            ShipDef::new("Submarine", 3, 1),
            ShipDef::new("Destroyer", 2, 1),
        ],
    }
}

fn light() -> EngineConfig {
    EngineConfig {
        max_hypotheses: 1_500,
        min_hypotheses: 300,
        time_budget_ms: 1_000,
        ..EngineConfig::default()
    }
}

#[test]
fn test_initial_population_is_filled() {
    let hunter = Hunter::seeded(classic(), light(), 1).unwrap();
    assert!(hunter.population().len() >= light().min_hypotheses);
    assert!(hunter.population().len() <= light().max_hypotheses);
    assert_eq!(hunter.mode(), Mode::Hunt);
}

#[test]
fn test_hit_concentrates_mass_on_orthogonal_neighbours() {
    let mut hunter = Hunter::seeded(classic(), light(), 2).unwrap();
    hunter.record_shot(4, 4, ShotOutcome::Hit).unwrap();
    assert_eq!(hunter.mode(), Mode::Target);

    let map = hunter.probability_map();
    for (x, y) in [(3, 3), (5, 3), (3, 5), (5, 5)] {
        assert_eq!(hunter.observations().state(x, y), CellState::Miss);
        assert_eq!(map.get(x, y), 0.0);
    }
    // every ship through (4, 4) continues into at least one neighbour
    let orthogonal = [(4, 3), (3, 4), (5, 4), (4, 5)];
    let around: f64 = orthogonal.iter().map(|&(x, y)| map.get(x, y)).sum();
    assert!(around >= 1.0 - 1e-9);
    assert!((map.get(4, 4) - 1.0).abs() < 1e-12);

    let best_neighbour = orthogonal
        .iter()
        .map(|&(x, y)| map.get(x, y))
        .fold(0.0, f64::max);
    let mv = hunter.choose_next_move().unwrap();
    assert_eq!(hunter.observations().state(mv.x, mv.y), CellState::Unknown);
    assert!(mv.confidence >= best_neighbour - 1e-12, "picked {:?}", mv);
    assert!(mv.confidence <= 1.0);
}

#[test]
fn test_map_bounds_and_total() {
    let mut hunter = Hunter::seeded(classic(), light(), 3).unwrap();
    hunter.record_shot(0, 0, ShotOutcome::Miss).unwrap();
    hunter.record_shot(6, 2, ShotOutcome::Hit).unwrap();

    let map = hunter.probability_map();
    assert_eq!(map.samples(), hunter.population().len());
    assert!(map.values().iter().all(|&p| (0.0..=1.0).contains(&p)));

    let population = hunter.population().hypotheses();
    let expected = population.iter().map(|h| h.count_ones() as f64).sum::<f64>()
        / population.len() as f64;
    assert!((map.total() - expected).abs() < 1e-9);
    // recomputing from the same population gives the same map
    assert_eq!(map, hunter.probability_map());
}

#[test]
fn test_population_stays_consistent_through_a_sinking() {
    let mut hunter = Hunter::seeded(classic(), light(), 4).unwrap();
    hunter.record_shot(2, 5, ShotOutcome::Hit).unwrap();
    hunter.record_shot(3, 5, ShotOutcome::Hit).unwrap();
    hunter.record_shot(4, 5, ShotOutcome::Sunk).unwrap();
    hunter.record_shot(8, 8, ShotOutcome::Miss).unwrap();

    let obs = hunter.observations();
    assert_eq!(
        obs.remaining().iter().filter(|s| s.length == 3).map(|s| s.count).sum::<usize>(),
        1
    );
    assert!(!hunter.population().is_empty());
    for h in hunter.population().hypotheses() {
        assert!(is_consistent(h, obs));
    }
    assert_eq!(hunter.mode(), Mode::Hunt);
}

#[test]
fn test_rejected_shot_leaves_state_untouched() {
    let mut hunter = Hunter::seeded(classic(), light(), 5).unwrap();
    hunter.record_shot(1, 1, ShotOutcome::Miss).unwrap();
    let before = hunter.observations().clone();
    let population = hunter.population().len();
    assert!(matches!(
        hunter.record_shot(1, 1, ShotOutcome::Hit),
        Err(EngineError::AlreadyResolved { .. })
    ));
    assert!(matches!(
        hunter.record_shot(0, 12, ShotOutcome::Hit),
        Err(EngineError::OutOfBounds { .. })
    ));
    assert_eq!(hunter.observations(), &before);
    assert_eq!(hunter.population().len(), population);
}

#[test]
fn test_empty_population_falls_back_to_random_unknown_cell() {
    let config = EngineConfig {
        max_hypotheses: 400,
        min_hypotheses: 100,
        time_budget_ms: 200,
        ..EngineConfig::default()
    };
    let mut hunter = Hunter::seeded(classic(), config.clone(), 6).unwrap();
    // six hits no ship can share, with only five ships in the fleet
    for (x, y) in [(0, 0), (9, 0), (0, 9), (9, 9), (4, 4), (7, 2)] {
        hunter.record_shot(x, y, ShotOutcome::Hit).unwrap();
    }
    assert!(hunter.population().is_empty());

    let mv = hunter.choose_next_move().unwrap();
    assert!(mv.x < 10 && mv.y < 10);
    assert_eq!(
        hunter.observations().state(mv.x, mv.y),
        CellState::Unknown
    );
    assert_eq!(mv.confidence, config.fallback_confidence);
}

#[test]
fn test_destroyed_fleet_still_terminates() {
    let game = GameConfig {
        width: 6,
        height: 6,
        ships: vec![ShipDef::new("Destroyer", 2, 1)],
    };
    let mut hunter = Hunter::seeded(game, light(), 7).unwrap();
    hunter.record_shot(1, 1, ShotOutcome::Hit).unwrap();
    hunter.record_shot(2, 1, ShotOutcome::Sunk).unwrap();
    assert!(hunter.observations().fleet_destroyed());

    let mv = hunter.choose_next_move().unwrap();
    assert_eq!(hunter.observations().state(mv.x, mv.y), CellState::Unknown);
    assert_eq!(mv.confidence, light().fallback_confidence);
}

#[test]
fn test_no_unknown_cells_is_an_error() {
    let game = GameConfig {
        width: 2,
        height: 1,
        ships: vec![ShipDef::new("Destroyer", 2, 1)],
    };
    let config = EngineConfig {
        reveal_hit_diagonals: false,
        prune_dead_zones: false,
        ..light()
    };
    let mut hunter = Hunter::seeded(game, config, 8).unwrap();
    hunter.record_shot(0, 0, ShotOutcome::Hit).unwrap();
    hunter.record_shot(1, 0, ShotOutcome::Sunk).unwrap();
    assert_eq!(
        hunter.choose_next_move().unwrap_err(),
        EngineError::NoUnknownCells
    );
}

#[test]
fn test_strict_sunk_filter_checks_ship_length() {
    let config = EngineConfig {
        strict_sunk_filter: true,
        ..light()
    };
    let mut hunter = Hunter::seeded(classic(), config, 9).unwrap();
    hunter.record_shot(5, 0, ShotOutcome::Hit).unwrap();
    hunter.record_shot(5, 1, ShotOutcome::Sunk).unwrap();
    for h in hunter.population().hypotheses() {
        assert!(h.contains(5, 0) && h.contains(5, 1));
        assert!(!h.contains(5, 2));
    }
}

#[test]
fn test_invalid_configuration_is_rejected() {
    let config = EngineConfig {
        min_hypotheses: 10,
        max_hypotheses: 5,
        ..EngineConfig::default()
    };
    assert!(matches!(
        Hunter::seeded(classic(), config, 0),
        Err(EngineError::InvalidConfig(_))
    ));
    let game = GameConfig {
        width: 3,
        height: 3,
        ships: vec![ShipDef::new("Carrier", 5, 1)],
    };
    assert!(matches!(
        Hunter::seeded(game, light(), 0),
        Err(EngineError::InvalidConfig(_))
    ));
}
