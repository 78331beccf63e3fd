use hunter::{
    duel, play_solo, Board, EngineConfig, GameConfig, GameStatus, Hunter, Player, RandomPlayer,
};
use rand::rngs::SmallRng;
use rand::SeedableRng;

#[test]
fn test_hunter_sinks_a_random_fleet() {
    let game = GameConfig::standard();
    let mut rng = SmallRng::seed_from_u64(123);
    let mut target = Board::random(&mut rng, &game, 10_000).unwrap();
    let mut hunter = Hunter::seeded(game, EngineConfig::fast(), 77).unwrap();

    let report = play_solo(&mut hunter, &mut target, 100).unwrap();
    assert!(report.finished);
    assert!(target.all_sunk());
    assert!(report.shots <= 100);
    assert_eq!(report.hits, GameConfig::standard().total_ship_cells());
    assert_eq!(report.sunk, GameConfig::standard().lengths().len());
    assert!(hunter.observations().fleet_destroyed());
}

#[test]
fn test_hunter_beats_blind_firing_on_average() {
    let game = GameConfig::standard();
    let mut hunter_total = 0;
    let mut random_total = 0;
    for seed in 0..3u64 {
        let mut rng = SmallRng::seed_from_u64(seed);
        let target = Board::random(&mut rng, &game, 10_000).unwrap();

        let mut hunter = Hunter::seeded(game.clone(), EngineConfig::fast(), seed).unwrap();
        hunter_total += play_solo(&mut hunter, &mut target.clone(), 100).unwrap().shots;

        let mut random = RandomPlayer::new(game.clone(), seed);
        random_total += play_solo(&mut random, &mut target.clone(), 100).unwrap().shots;
    }
    assert!(hunter_total < random_total, "{} vs {}", hunter_total, random_total);
}

#[test]
fn test_duel_produces_a_winner() {
    let game = GameConfig::standard();
    let mut hunter = Hunter::seeded(game.clone(), EngineConfig::fast(), 5).unwrap();
    let mut random = RandomPlayer::new(game, 6);

    let report = duel(&mut hunter, &mut random, 100).unwrap();
    let statuses = (report.first.status, report.second.status);
    assert!(matches!(
        statuses,
        (GameStatus::Won, GameStatus::Lost) | (GameStatus::Lost, GameStatus::Won)
    ));
    assert!(report.turns <= 100);
    assert!(report.first.shots.shots >= report.second.shots.shots);
}

#[test]
fn test_hunter_places_a_full_fleet() {
    let game = GameConfig::standard();
    let mut hunter = Hunter::seeded(game.clone(), EngineConfig::fast(), 11).unwrap();
    let board = hunter.place_ships().unwrap();
    assert_eq!(board.ships().len(), game.lengths().len());
    assert_eq!(board.ship_map().count_ones(), game.total_ship_cells());
    assert!(!board.all_sunk());
}
