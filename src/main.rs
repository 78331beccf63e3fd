use clap::{Parser, Subcommand, ValueEnum};
use hunter::{
    duel, init_logging, optimize_layout, play_solo, Board, GameConfig, Hunter, Player,
    RandomPlayer, Settings,
};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use serde_json::json;
use std::path::PathBuf;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// JSON file with `game` and `engine` sections; defaults apply otherwise.
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Board and fleet preset; replaces the `game` section of `--config`.
    #[arg(long, global = true, value_enum)]
    preset: Option<Preset>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum Preset {
    /// 10×10, five ships.
    Standard,
    /// 12×12, eight ships.
    Large,
    /// 15×15, eleven ships.
    Huge,
}

impl Preset {
    fn game(self) -> GameConfig {
        match self {
            Preset::Standard => GameConfig::standard(),
            Preset::Large => GameConfig::large(),
            Preset::Huge => GameConfig::huge(),
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum Opponent {
    Hunter,
    Random,
}

#[derive(Subcommand)]
enum Commands {
    /// Hunt down randomly placed fleets and report shot counts.
    Solo {
        #[arg(long, help = "Fix RNG seed for reproducible games (e.g., --seed 12345)")]
        seed: Option<u64>,
        #[arg(long, default_value_t = 1)]
        games: usize,
    },
    /// Play the hunter against another player.
    Duel {
        #[arg(long, help = "Fix RNG seed for reproducible games (e.g., --seed 12345)")]
        seed: Option<u64>,
        #[arg(long, value_enum, default_value_t = Opponent::Random)]
        opponent: Opponent,
    },
    /// Print the dispersion-optimized layout for our own fleet.
    Layout {
        #[arg(long, help = "Fix RNG seed for reproducible games (e.g., --seed 12345)")]
        seed: Option<u64>,
    },
}

fn load_settings(path: Option<&PathBuf>) -> anyhow::Result<Settings> {
    match path {
        Some(p) => Settings::from_json(&std::fs::read_to_string(p)?),
        None => Ok(Settings::default()),
    }
}

fn seed_or_random(seed: Option<u64>) -> u64 {
    seed.unwrap_or_else(|| rand::rng().random())
}

fn main() -> anyhow::Result<()> {
    init_logging();
    let cli = Cli::parse();
    let mut settings = load_settings(cli.config.as_ref())?;
    if let Some(preset) = cli.preset {
        settings.game = preset.game();
    }
    let max_turns = settings.game.width * settings.game.height;

    let output = match cli.command {
        Commands::Solo { seed, games } => {
            let seed = seed_or_random(seed);
            let mut rng = SmallRng::seed_from_u64(seed);
            let mut reports = Vec::with_capacity(games);
            for _ in 0..games {
                let mut target = Board::random(
                    &mut rng,
                    &settings.game,
                    settings.engine.layout_placement_attempts,
                )?;
                let mut hunter = Hunter::seeded(
                    settings.game.clone(),
                    settings.engine.clone(),
                    rng.random(),
                )?;
                reports.push(play_solo(&mut hunter, &mut target, max_turns)?);
            }
            let mean = reports.iter().map(|r| r.shots as f64).sum::<f64>() / games.max(1) as f64;
            json!({ "seed": seed, "games": reports, "mean_shots": mean })
        }
        Commands::Duel { seed, opponent } => {
            let seed = seed_or_random(seed);
            let mut hunter =
                Hunter::seeded(settings.game.clone(), settings.engine.clone(), seed)?;
            let mut other: Box<dyn Player> = match opponent {
                Opponent::Hunter => Box::new(Hunter::seeded(
                    settings.game.clone(),
                    settings.engine.clone(),
                    seed.wrapping_add(1),
                )?),
                Opponent::Random => {
                    Box::new(RandomPlayer::new(settings.game.clone(), seed.wrapping_add(1)))
                }
            };
            let report = duel(&mut hunter, other.as_mut(), max_turns)?;
            json!({ "seed": seed, "opponent": format!("{:?}", opponent), "report": report })
        }
        Commands::Layout { seed } => {
            let seed = seed_or_random(seed);
            let mut rng = SmallRng::seed_from_u64(seed);
            let (board, score) = optimize_layout(
                &mut rng,
                &settings.game,
                settings.engine.layout_candidates,
                settings.engine.layout_placement_attempts,
            )?;
            eprintln!("{}", board.ship_map());
            let ships: Vec<_> = board
                .ships()
                .iter()
                .map(|s| json!({ "name": s.name(), "placement": s.placement() }))
                .collect();
            json!({ "seed": seed, "dispersion": score, "ships": ships })
        }
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
