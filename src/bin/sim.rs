use hunter::{duel, EngineConfig, GameConfig, GameStatus, Hunter, RandomPlayer};
use serde_json::json;

fn main() -> anyhow::Result<()> {
    let args: Vec<String> = std::env::args().collect();
    if args.len() != 3 {
        eprintln!("Usage: {} <seed1> <seed2>", args[0]);
        std::process::exit(1);
    }
    let seed1: u64 = args[1].parse()?;
    let seed2: u64 = args[2].parse()?;

    let game = GameConfig::standard();
    let max_turns = game.width * game.height;
    let mut p1 = Hunter::seeded(game.clone(), EngineConfig::fast(), seed1)?;
    let mut p2 = RandomPlayer::new(game, seed2);

    let report = duel(&mut p1, &mut p2, max_turns)?;

    let winner = match (report.first.status, report.second.status) {
        (GameStatus::Won, GameStatus::Lost) => Some("player1"),
        (GameStatus::Lost, GameStatus::Won) => Some("player2"),
        _ => None,
    };

    let result = json!({
        "player1": {"status": format!("{:?}", report.first.status), "guesses": report.first.shots.shots},
        "player2": {"status": format!("{:?}", report.second.status), "guesses": report.second.shots.shots},
        "winner": winner,
    });

    println!("{}", serde_json::to_string(&result)?);
    Ok(())
}
