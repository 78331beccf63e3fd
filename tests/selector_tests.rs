use hunter::{
    select_move, EngineConfig, GameConfig, Hypothesis, Mode, ObservationState, ProbabilityMap,
    ShipDef, ShotOutcome,
};
use rand::rngs::SmallRng;
use rand::SeedableRng;

/// Two rows of four cells and a single destroyer, so the parity lattice is
/// every second cell.
fn strip() -> ObservationState {
    ObservationState::new(&GameConfig {
        width: 4,
        height: 2,
        ships: vec![ShipDef::new("Destroyer", 2, 1)],
    })
}

fn map_of(layouts: &[&[(usize, usize)]]) -> ProbabilityMap {
    let hypotheses: Vec<Hypothesis> = layouts
        .iter()
        .map(|cells| Hypothesis::from_cells(4, 2, cells.iter().copied()).unwrap())
        .collect();
    ProbabilityMap::from_hypotheses(4, 2, &hypotheses)
}

/// Top row probabilities 1/3, 2/3, 2/3, 1/3.
fn sliding_destroyer() -> ProbabilityMap {
    map_of(&[&[(0, 0), (1, 0)], &[(1, 0), (2, 0)], &[(2, 0), (3, 0)]])
}

#[test]
fn test_parity_boost_breaks_in_favour_of_lattice_cell() {
    let obs = strip();
    let map = sliding_destroyer();
    assert_eq!(map.samples(), 3);
    assert_eq!(Mode::of(&obs), Mode::Hunt);

    let mv = select_move(
        &obs,
        &map,
        &EngineConfig::default(),
        &mut SmallRng::seed_from_u64(1),
    )
    .unwrap();
    // (2, 0) scores 2/3 * 1.2 but reports the raw frequency
    assert_eq!((mv.x, mv.y), (2, 0));
    assert_eq!(mv.confidence, map.get(2, 0));
    assert!((mv.confidence - 2.0 / 3.0).abs() < 1e-12);
}

#[test]
fn test_lattice_cell_beats_a_likelier_neighbour() {
    let obs = strip();
    // (1, 0) at 0.6 is off the lattice; (0, 0) at 0.55 boosted to 0.66 wins
    let mut layouts: Vec<Vec<(usize, usize)>> = Vec::new();
    layouts.extend(std::iter::repeat(vec![(0, 0), (1, 0)]).take(11));
    layouts.extend(std::iter::repeat(vec![(1, 0), (2, 0)]).take(1));
    layouts.extend(std::iter::repeat(vec![(2, 0), (3, 0)]).take(7));
    layouts.extend(std::iter::repeat(vec![(0, 1), (1, 1)]).take(1));
    let refs: Vec<&[(usize, usize)]> = layouts.iter().map(Vec::as_slice).collect();
    let map = map_of(&refs);
    assert!(map.get(1, 0) > map.get(0, 0));

    let mv = select_move(
        &obs,
        &map,
        &EngineConfig::default(),
        &mut SmallRng::seed_from_u64(2),
    )
    .unwrap();
    assert_eq!((mv.x, mv.y), (0, 0));
    assert_eq!(mv.confidence, map.get(0, 0));
}

#[test]
fn test_target_mode_ignores_parity_and_keeps_first_tie() {
    let mut obs = strip();
    obs.record(3, 1, ShotOutcome::Hit).unwrap();
    assert_eq!(Mode::of(&obs), Mode::Target);
    let map = sliding_destroyer();

    let mv = select_move(
        &obs,
        &map,
        &EngineConfig::default(),
        &mut SmallRng::seed_from_u64(3),
    )
    .unwrap();
    // (1, 0) and (2, 0) tie at 2/3; row-major order keeps (1, 0)
    assert_eq!((mv.x, mv.y), (1, 0));
    assert_eq!(mv.confidence, map.get(1, 0));
}

#[test]
fn test_exact_tie_in_hunt_mode_keeps_first_cell() {
    let obs = strip();
    // only off-lattice cells carry mass, equally
    let map = map_of(&[&[(1, 0)], &[(3, 0)]]);
    let mv = select_move(
        &obs,
        &map,
        &EngineConfig::default(),
        &mut SmallRng::seed_from_u64(4),
    )
    .unwrap();
    assert_eq!((mv.x, mv.y), (1, 0));
    assert_eq!(mv.confidence, 0.5);
}

#[test]
fn test_near_certain_cells_are_not_boosted() {
    let obs = strip();
    // (0, 0) is certain and stays at 1.0; (2, 0) at 0.85 is boosted to 1.02
    let layouts: Vec<Vec<(usize, usize)>> = (0..20)
        .map(|i| if i < 17 { vec![(0, 0), (2, 0)] } else { vec![(0, 0)] })
        .collect();
    let refs: Vec<&[(usize, usize)]> = layouts.iter().map(Vec::as_slice).collect();
    let map = map_of(&refs);

    let mv = select_move(
        &obs,
        &map,
        &EngineConfig::default(),
        &mut SmallRng::seed_from_u64(5),
    )
    .unwrap();
    assert_eq!((mv.x, mv.y), (2, 0));
    assert!((mv.confidence - 0.85).abs() < 1e-12);

    // with no boost at all the certain cell wins
    let config = EngineConfig {
        parity_boost: 1.0,
        ..EngineConfig::default()
    };
    let mv = select_move(&obs, &map, &config, &mut SmallRng::seed_from_u64(6)).unwrap();
    assert_eq!((mv.x, mv.y), (0, 0));
    assert_eq!(mv.confidence, 1.0);
}
